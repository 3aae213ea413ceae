// AVAudioSession driver for iOS / tvOS / visionOS
//
// Every call fetches `AVAudioSession::sharedInstance()` and reads or writes it
// directly. Nothing is cached: the OS may change the session at any time
// (interruptions, route changes, competing apps).
//
// This file is only compiled where build.rs sets cfg(avaudiosession).

use objc2::available;
use objc2::rc::Retained;
use objc2_avf_audio::{
    AVAudioSession, AVAudioSessionCategoryOptions, AVAudioSessionPortDescription,
    AVAudioSessionSetActiveOptions,
};
use objc2_foundation::{NSArray, NSError, NSString};
use tracing::error;

use super::driver::SessionDriver;
use super::error::{Result, SessionError};
use super::types::{
    HardwareInfo, OsFeature, RouteDescription, RoutePort, SessionFlags, SetActiveOptions,
};

/// Stateless handle to the shared AVAudioSession
#[derive(Debug, Clone, Copy, Default)]
pub struct AvAudioSessionDriver;

fn shared() -> Retained<AVAudioSession> {
    // SAFETY: sharedInstance has no preconditions and may be called from any thread
    unsafe { AVAudioSession::sharedInstance() }
}

fn strings(array: &NSArray<NSString>) -> Vec<String> {
    array.to_vec().iter().map(|s| s.to_string()).collect()
}

fn ports(array: &NSArray<AVAudioSessionPortDescription>) -> Vec<RoutePort> {
    array
        .to_vec()
        .iter()
        .map(|port| {
            // SAFETY: plain property getters on a live port description
            let (name, kind) = unsafe { (port.portName(), port.portType()) };
            RoutePort::new(name.to_string(), kind.to_string())
        })
        .collect()
}

fn rejected(operation: &'static str, err: &NSError) -> SessionError {
    let reason = err.localizedDescription().to_string();
    error!("AVAudioSession rejected {}: {} (code {})", operation, reason, err.code());
    SessionError::Rejected { operation, reason }
}

impl SessionDriver for AvAudioSessionDriver {
    fn category(&self) -> String {
        // SAFETY: property getter on the shared session
        unsafe { shared().category() }.to_string()
    }

    fn available_categories(&self) -> Vec<String> {
        let categories = unsafe { shared().availableCategories() };
        strings(&categories)
    }

    fn mode(&self) -> String {
        unsafe { shared().mode() }.to_string()
    }

    fn available_modes(&self) -> Vec<String> {
        let modes = unsafe { shared().availableModes() };
        strings(&modes)
    }

    fn category_options(&self) -> u32 {
        unsafe { shared().categoryOptions() }.0 as u32
    }

    fn flags(&self) -> SessionFlags {
        let session = shared();
        // SAFETY: version-gated getters are only called when `supports` says the OS has them
        unsafe {
            SessionFlags {
                is_other_audio_playing: session.isOtherAudioPlaying(),
                secondary_audio_should_be_silenced_hint: session
                    .secondaryAudioShouldBeSilencedHint(),
                allow_haptics_and_system_sounds_during_recording: session
                    .allowHapticsAndSystemSoundsDuringRecording(),
                prefers_no_interruptions_from_system_alerts: self
                    .supports(OsFeature::SystemAlertInterruptionPreference)
                    .then(|| session.prefersNoInterruptionsFromSystemAlerts()),
                prefers_interruption_on_route_disconnect: self
                    .supports(OsFeature::RouteDisconnectInterruption)
                    .then(|| session.prefersInterruptionOnRouteDisconnect()),
            }
        }
    }

    fn output_volume(&self) -> f32 {
        unsafe { shared().outputVolume() }
    }

    fn rendering_mode(&self) -> Option<i64> {
        if !self.supports(OsFeature::RenderingMode) {
            return None;
        }
        Some(unsafe { shared().renderingMode() }.0 as i64)
    }

    fn current_route(&self) -> RouteDescription {
        let route = unsafe { shared().currentRoute() };
        let (inputs, outputs) = unsafe { (route.inputs(), route.outputs()) };
        RouteDescription {
            inputs: ports(&inputs),
            outputs: ports(&outputs),
        }
    }

    fn hardware(&self) -> HardwareInfo {
        let session = shared();
        // SAFETY: hardware configuration getters, no preconditions
        unsafe {
            HardwareInfo {
                sample_rate: session.sampleRate(),
                preferred_sample_rate: session.preferredSampleRate(),
                input_gain: session.inputGain(),
                is_input_gain_settable: session.isInputGainSettable(),
                io_buffer_duration: session.IOBufferDuration(),
                preferred_io_buffer_duration: session.preferredIOBufferDuration(),
                input_latency: session.inputLatency(),
                output_latency: session.outputLatency(),
                output_volume: session.outputVolume(),
                preferred_input_number_of_channels: session.preferredInputNumberOfChannels()
                    as i64,
                input_number_of_channels: session.inputNumberOfChannels() as i64,
                maximum_input_number_of_channels: session.maximumInputNumberOfChannels() as i64,
                preferred_output_number_of_channels: session.preferredOutputNumberOfChannels()
                    as i64,
                output_number_of_channels: session.outputNumberOfChannels() as i64,
                maximum_output_number_of_channels: session.maximumOutputNumberOfChannels()
                    as i64,
            }
        }
    }

    fn supports(&self, feature: OsFeature) -> bool {
        match feature {
            OsFeature::MutedMicrophoneOverride | OsFeature::SystemAlertInterruptionPreference => {
                available!(ios = 14.5, tvos = 14.5, visionos = 1.0, ..)
            }
            OsFeature::RouteDisconnectInterruption => {
                available!(ios = 17.0, tvos = 17.0, visionos = 1.0, ..)
            }
            OsFeature::RenderingMode => available!(ios = 17.2, tvos = 17.2, visionos = 1.0, ..),
        }
    }

    fn set_category(&self, identifier: &str, options: u32) -> Result<()> {
        let category = NSString::from_str(identifier);
        let options = AVAudioSessionCategoryOptions(options as _);
        // SAFETY: the OS validates the identifier/options combination and reports errors
        unsafe { shared().setCategory_withOptions_error(&category, options) }
            .map_err(|err| rejected("set_category", &err))
    }

    fn set_mode(&self, identifier: &str) -> Result<()> {
        let mode = NSString::from_str(identifier);
        unsafe { shared().setMode_error(&mode) }.map_err(|err| rejected("set_mode", &err))
    }

    fn set_active(&self, active: bool, options: SetActiveOptions) -> Result<()> {
        let options = match options {
            SetActiveOptions::None => AVAudioSessionSetActiveOptions(0),
            SetActiveOptions::NotifyOthersOnDeactivation => {
                AVAudioSessionSetActiveOptions::NotifyOthersOnDeactivation
            }
        };
        unsafe { shared().setActive_withOptions_error(active, options) }
            .map_err(|err| rejected("set_active", &err))
    }

    fn name(&self) -> &'static str {
        "AVAudioSession"
    }
}
