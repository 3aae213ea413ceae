// Native accessor - string-level pass-through to the OS audio session
//
// This is the layer the C boundary calls. It speaks identifier strings and
// comma-separated option names, never returns structured errors, and reports
// OS refusals as `false` plus a logged diagnostic.

use colored::Colorize;
use tracing::{error, info, warn};

use super::driver::SessionDriver;
use super::identifiers::parse_option_list;
use super::snapshot::SessionSnapshot;
use super::types::{Category, CategoryOptions, Mode, OsFeature, SetActiveOptions};
use crate::session_debug;

/// Direct query/mutation of the OS audio session through a driver
#[derive(Debug, Clone, Default)]
pub struct NativeAccessor<D: SessionDriver> {
    driver: D,
}

impl<D: SessionDriver> NativeAccessor<D> {
    pub fn new(driver: D) -> Self {
        Self { driver }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Current raw category identifier
    pub fn get_category(&self) -> String {
        self.driver.category()
    }

    /// Current raw mode identifier
    pub fn get_mode(&self) -> String {
        self.driver.mode()
    }

    /// Raw platform option bits of the current category
    pub fn get_category_options(&self) -> u32 {
        self.driver.category_options()
    }

    pub fn get_other_audio_playing(&self) -> bool {
        self.driver.flags().is_other_audio_playing
    }

    pub fn get_silence_hint(&self) -> bool {
        self.driver.flags().secondary_audio_should_be_silenced_hint
    }

    pub fn get_output_volume(&self) -> f32 {
        self.driver.output_volume()
    }

    /// Applies `name` (platform identifier or short name) with a
    /// comma-separated option list. Unknown option names are logged and
    /// skipped; the call then proceeds with the options that did parse.
    pub fn set_category(&self, name: &str, options: &str) -> bool {
        let Some(category) = Category::resolve(name) else {
            error!(
                "{} Unknown category: {}",
                "SESSION_SET_CATEGORY".bright_red(),
                name
            );
            return false;
        };

        let parsed = parse_option_list(options);
        for token in &parsed.rejected {
            warn!("{} Unknown option: {}", "SESSION_OPTIONS".yellow(), token);
        }

        let mut requested = parsed.options;
        let muted_mic = CategoryOptions::OVERRIDE_MUTED_MICROPHONE_INTERRUPTION;
        if requested.contains(muted_mic)
            && !self.driver.supports(OsFeature::MutedMicrophoneOverride)
        {
            // Not an error: the OS simply predates the option
            session_debug!("overrideMutedMicrophoneInterruption unavailable on this OS, dropped");
            requested = CategoryOptions::from_bits_truncate(requested.bits() & !muted_mic.bits());
        }

        session_debug!(
            "set_category {} options {} (platform bits {:#x})",
            category.identifier(),
            requested,
            requested.to_platform_bits()
        );

        match self
            .driver
            .set_category(category.identifier(), requested.to_platform_bits())
        {
            Ok(()) => {
                info!(
                    "{} {} [{}]",
                    "SESSION_CATEGORY".bright_cyan(),
                    category,
                    requested
                );
                true
            }
            Err(e) => {
                error!(
                    "{} Failed to set category: {}",
                    "SESSION_SET_CATEGORY".bright_red(),
                    e
                );
                false
            }
        }
    }

    /// Applies `name` (platform identifier or short name)
    pub fn set_mode(&self, name: &str) -> bool {
        let Some(mode) = Mode::resolve(name) else {
            error!("{} Unknown mode: {}", "SESSION_SET_MODE".bright_red(), name);
            return false;
        };

        match self.driver.set_mode(mode.identifier()) {
            Ok(()) => {
                info!("{} {}", "SESSION_MODE".bright_cyan(), mode);
                true
            }
            Err(e) => {
                error!(
                    "{} Failed to set mode: {}",
                    "SESSION_SET_MODE".bright_red(),
                    e
                );
                false
            }
        }
    }

    /// Only the exact option `notifyOthersOnDeactivation` is honoured; any
    /// other string, including an empty one, means no option.
    pub fn set_active(&self, active: bool, option: &str) -> bool {
        let options = SetActiveOptions::from_option_name(option);

        match self.driver.set_active(active, options) {
            Ok(()) => {
                info!(
                    "{} {} ({})",
                    "SESSION_ACTIVE".bright_cyan(),
                    if active { "activated" } else { "deactivated" },
                    options
                );
                true
            }
            Err(e) => {
                error!(
                    "{} Failed to set active: {}",
                    "SESSION_SET_ACTIVE".bright_red(),
                    e
                );
                false
            }
        }
    }

    /// Serialized snapshot; `None` if serialization fails
    pub fn get_session_snapshot(&self, detail: bool) -> Option<String> {
        match SessionSnapshot::capture(&self.driver, detail).to_json() {
            Ok(json) => Some(json),
            Err(e) => {
                error!(
                    "{} Failed to serialize snapshot: {}",
                    "SESSION_SNAPSHOT".bright_red(),
                    e
                );
                None
            }
        }
    }

    /// Logs the detailed snapshot followed by the option legend
    pub fn print_info(&self) {
        let info = self
            .get_session_snapshot(true)
            .unwrap_or_else(|| "null".to_string());

        let mut legend = String::from("\nCategoryOptions:");
        for (name, raw) in CategoryOptions::platform_legend() {
            legend.push_str(&format!("\n    - {}: {:#x}", name, raw));
        }

        info!("{}{}", info, legend);
    }
}
