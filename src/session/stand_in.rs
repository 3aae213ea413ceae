// Stand-in audio session for platforms without AVAudioSession
//
// Reports the state of a freshly launched app, logs every change request and
// always reports success. Nothing is remembered between calls.

use tracing::info;

use super::backend::AudioSession;
use super::error::Result;
use super::types::{Category, CategoryOptions, Mode, SetActiveOptions};

#[derive(Debug, Clone, Copy, Default)]
pub struct StandInAudioSession;

impl AudioSession for StandInAudioSession {
    fn category(&self) -> Result<Category> {
        Ok(Category::SoloAmbient)
    }

    fn category_options(&self) -> CategoryOptions {
        CategoryOptions::NONE
    }

    fn mode(&self) -> Result<Mode> {
        Ok(Mode::Default)
    }

    fn is_other_audio_playing(&self) -> bool {
        false
    }

    fn secondary_audio_should_be_silenced_hint(&self) -> bool {
        false
    }

    fn output_volume(&self) -> f32 {
        1.0
    }

    fn set_category(&self, category: Category, options: CategoryOptions) -> bool {
        info!("[StandInAudioSession] SetCategory: {}, options: {}", category, options);
        true
    }

    fn set_mode(&self, mode: Mode) -> bool {
        info!("[StandInAudioSession] SetMode: {}", mode);
        true
    }

    fn set_active(&self, active: bool, options: SetActiveOptions) -> bool {
        info!("[StandInAudioSession] SetActive: {}, options: {}", active, options);
        true
    }

    /// Always empty: there is no session to describe
    fn info_string(&self, _detail: bool) -> Option<String> {
        Some(String::new())
    }

    fn print_info(&self) {}

    fn name(&self) -> &'static str {
        "StandIn"
    }
}
