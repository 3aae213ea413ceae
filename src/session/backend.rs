//! Audio session capability interface
//!
//! `AudioSession` is the enum-level view of the OS audio session that hosts
//! program against. There are exactly two implementations:
//!
//! - [`BridgedAudioSession`](super::bridge::BridgedAudioSession) delegates to
//!   the native accessor (Apple mobile targets).
//! - [`StandInAudioSession`](super::stand_in::StandInAudioSession) reports
//!   fixed defaults and always succeeds (everywhere else).
//!
//! The choice is made once, at startup, by [`create_session`].
//!
//! # Example
//!
//! ```ignore
//! let session = shared_session()?;
//!
//! if session.set_category(Category::PlayAndRecord, CategoryOptions::DEFAULT_TO_SPEAKER) {
//!     session.set_mode(Mode::VoiceChat);
//!     session.set_active(true, SetActiveOptions::None);
//! }
//!
//! println!("{}", session.info_string(true).unwrap_or_default());
//! ```

use std::sync::OnceLock;

use colored::Colorize;
use tracing::info;

use super::error::Result;
use super::identifiers::verify_tables;
use super::stand_in::StandInAudioSession;
use super::types::{Category, CategoryOptions, Mode, SetActiveOptions};
use crate::config::BridgeConfig;

pub trait AudioSession: Send + Sync {
    // === State ===

    /// Current category. Fails only if the OS reports an identifier outside
    /// the closed category set.
    fn category(&self) -> Result<Category>;

    fn category_options(&self) -> CategoryOptions;

    /// Current mode. Fails only if the OS reports an identifier outside the
    /// closed mode set.
    fn mode(&self) -> Result<Mode>;

    fn is_other_audio_playing(&self) -> bool;

    fn secondary_audio_should_be_silenced_hint(&self) -> bool;

    fn output_volume(&self) -> f32;

    // === Changes ===

    /// Returns false if the OS refuses the category/options combination
    fn set_category(&self, category: Category, options: CategoryOptions) -> bool;

    fn set_mode(&self, mode: Mode) -> bool;

    fn set_active(&self, active: bool, options: SetActiveOptions) -> bool;

    // === Info ===

    /// Serialized snapshot, `None` if serialization failed
    fn info_string(&self, detail: bool) -> Option<String>;

    /// Log the detailed snapshot
    fn print_info(&self);

    /// Implementation name (e.g., "AVAudioSession", "StandIn")
    fn name(&self) -> &'static str;
}

/// Creates the session implementation for the current platform
pub fn create_session(config: &BridgeConfig) -> Result<Box<dyn AudioSession>> {
    verify_tables()?;

    let session: Box<dyn AudioSession> = if config.force_stand_in {
        Box::new(StandInAudioSession)
    } else {
        platform_session()
    };

    info!(
        "{} Using {} audio session",
        "SESSION_INIT".bright_green(),
        session.name()
    );
    Ok(session)
}

#[cfg(avaudiosession)]
fn platform_session() -> Box<dyn AudioSession> {
    use super::avaudiosession::AvAudioSessionDriver;
    use super::bridge::BridgedAudioSession;

    Box::new(BridgedAudioSession::new(AvAudioSessionDriver))
}

#[cfg(not(avaudiosession))]
fn platform_session() -> Box<dyn AudioSession> {
    Box::new(StandInAudioSession)
}

static SHARED_SESSION: OnceLock<Box<dyn AudioSession>> = OnceLock::new();

/// Process-wide session, created on first use from the environment config
pub fn shared_session() -> Result<&'static dyn AudioSession> {
    if let Some(session) = SHARED_SESSION.get() {
        return Ok(session.as_ref());
    }

    let session = create_session(&BridgeConfig::from_env())?;
    Ok(SHARED_SESSION.get_or_init(move || session).as_ref())
}
