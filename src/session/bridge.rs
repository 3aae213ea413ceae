// Bridged audio session - enum-level view over the native accessor
//
// Translates enums to the platform identifiers (total by exhaustive match)
// and identifiers back to enums. An identifier with no variant is a contract
// violation and surfaces as `SessionError::UnmappedIdentifier`.

use tracing::error;

use super::backend::AudioSession;
use super::driver::SessionDriver;
use super::error::{Result, SessionError};
use super::native::NativeAccessor;
use super::types::{Category, CategoryOptions, Mode, SetActiveOptions};

pub struct BridgedAudioSession<D: SessionDriver> {
    native: NativeAccessor<D>,
}

impl<D: SessionDriver> BridgedAudioSession<D> {
    pub fn new(driver: D) -> Self {
        Self {
            native: NativeAccessor::new(driver),
        }
    }

    pub fn native(&self) -> &NativeAccessor<D> {
        &self.native
    }
}

fn unmapped(kind: &'static str, identifier: String) -> SessionError {
    error!("Unmapped {} identifier from OS: {}", kind, identifier);
    SessionError::UnmappedIdentifier { kind, identifier }
}

impl<D: SessionDriver> AudioSession for BridgedAudioSession<D> {
    fn category(&self) -> Result<Category> {
        let identifier = self.native.get_category();
        Category::from_identifier(&identifier).ok_or_else(|| unmapped("category", identifier))
    }

    fn category_options(&self) -> CategoryOptions {
        CategoryOptions::from_platform_bits(self.native.get_category_options())
    }

    fn mode(&self) -> Result<Mode> {
        let identifier = self.native.get_mode();
        Mode::from_identifier(&identifier).ok_or_else(|| unmapped("mode", identifier))
    }

    fn is_other_audio_playing(&self) -> bool {
        self.native.get_other_audio_playing()
    }

    fn secondary_audio_should_be_silenced_hint(&self) -> bool {
        self.native.get_silence_hint()
    }

    fn output_volume(&self) -> f32 {
        self.native.get_output_volume()
    }

    fn set_category(&self, category: Category, options: CategoryOptions) -> bool {
        self.native
            .set_category(category.identifier(), &options.to_option_names())
    }

    fn set_mode(&self, mode: Mode) -> bool {
        self.native.set_mode(mode.identifier())
    }

    fn set_active(&self, active: bool, options: SetActiveOptions) -> bool {
        self.native.set_active(active, options.option_name())
    }

    fn info_string(&self, detail: bool) -> Option<String> {
        self.native.get_session_snapshot(detail)
    }

    fn print_info(&self) {
        self.native.print_info();
    }

    fn name(&self) -> &'static str {
        self.native.driver().name()
    }
}
