//! Driver seam over the OS audio session singleton
//!
//! `SessionDriver` is the narrow capability object through which every read
//! and write of the OS audio session goes. It speaks the platform's
//! vocabulary: raw identifier strings and raw option bits.
//!
//! # Important
//!
//! This file must NOT contain any platform-specific imports (objc2, AVFAudio).
//! The AVAudioSession implementation lives in `avaudiosession.rs`.

use tracing::info;

use super::error::Result;
use super::identifiers::NOTIFY_OTHERS_ON_DEACTIVATION;
use super::types::{
    Category, HardwareInfo, Mode, OsFeature, RouteDescription, SessionFlags, SetActiveOptions,
};

/// Direct access to the OS audio session.
///
/// Implementations hold no session state of their own: every call reads or
/// writes the live OS object.
#[cfg_attr(test, mockall::automock)]
pub trait SessionDriver: Send + Sync {
    /// Current category identifier, e.g. `AVAudioSessionCategoryPlayback`
    fn category(&self) -> String;

    /// Categories the current device supports
    fn available_categories(&self) -> Vec<String>;

    /// Current mode identifier, e.g. `AVAudioSessionModeDefault`
    fn mode(&self) -> String;

    fn available_modes(&self) -> Vec<String>;

    /// Raw platform option bits of the current category
    fn category_options(&self) -> u32;

    fn flags(&self) -> SessionFlags;

    fn output_volume(&self) -> f32;

    /// `None` when the OS has no rendering mode property
    fn rendering_mode(&self) -> Option<i64>;

    fn current_route(&self) -> RouteDescription;

    fn hardware(&self) -> HardwareInfo;

    fn supports(&self, feature: OsFeature) -> bool;

    /// Applies a category identifier with raw platform option bits
    fn set_category(&self, identifier: &str, options: u32) -> Result<()>;

    fn set_mode(&self, identifier: &str) -> Result<()>;

    fn set_active(&self, active: bool, options: SetActiveOptions) -> Result<()>;

    /// Backend name for logs (e.g., "AVAudioSession")
    fn name(&self) -> &'static str;
}

/// Driver for targets without an OS audio session.
///
/// Reports the state a freshly launched app would see and accepts every
/// change without remembering it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDriver;

impl SessionDriver for NullDriver {
    fn category(&self) -> String {
        Category::default().identifier().to_string()
    }

    fn available_categories(&self) -> Vec<String> {
        Category::ALL.iter().map(|c| c.identifier().to_string()).collect()
    }

    fn mode(&self) -> String {
        Mode::default().identifier().to_string()
    }

    fn available_modes(&self) -> Vec<String> {
        Mode::ALL.iter().map(|m| m.identifier().to_string()).collect()
    }

    fn category_options(&self) -> u32 {
        0
    }

    fn flags(&self) -> SessionFlags {
        SessionFlags::default()
    }

    fn output_volume(&self) -> f32 {
        1.0
    }

    fn rendering_mode(&self) -> Option<i64> {
        None
    }

    fn current_route(&self) -> RouteDescription {
        RouteDescription::default()
    }

    fn hardware(&self) -> HardwareInfo {
        HardwareInfo {
            output_volume: 1.0,
            ..HardwareInfo::default()
        }
    }

    fn supports(&self, _feature: OsFeature) -> bool {
        false
    }

    fn set_category(&self, identifier: &str, options: u32) -> Result<()> {
        info!(
            "[NullDriver] set_category: {}, options: {:#x}",
            identifier, options
        );
        Ok(())
    }

    fn set_mode(&self, identifier: &str) -> Result<()> {
        info!("[NullDriver] set_mode: {}", identifier);
        Ok(())
    }

    fn set_active(&self, active: bool, options: SetActiveOptions) -> Result<()> {
        let option = match options {
            SetActiveOptions::None => "none",
            SetActiveOptions::NotifyOthersOnDeactivation => NOTIFY_OTHERS_ON_DEACTIVATION,
        };
        info!("[NullDriver] set_active: {}, options: {}", active, option);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "Null"
    }
}

/// Driver backing the C boundary on this target
#[cfg(avaudiosession)]
pub type PlatformDriver = super::avaudiosession::AvAudioSessionDriver;

#[cfg(not(avaudiosession))]
pub type PlatformDriver = NullDriver;
