use audio_session_bridge::session::{
    HardwareInfo, OsFeature, Result, RouteDescription, RoutePort, SessionFlags,
};
use audio_session_bridge::{
    AudioSession, BridgedAudioSession, Category, CategoryOptions, Mode, NativeAccessor,
    SessionDriver, SessionError, SetActiveOptions,
};
use mockall::mock;
use mockall::predicate::eq;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

mock! {
    pub Driver {}

    impl SessionDriver for Driver {
        fn category(&self) -> String;
        fn available_categories(&self) -> Vec<String>;
        fn mode(&self) -> String;
        fn available_modes(&self) -> Vec<String>;
        fn category_options(&self) -> u32;
        fn flags(&self) -> SessionFlags;
        fn output_volume(&self) -> f32;
        fn rendering_mode(&self) -> Option<i64>;
        fn current_route(&self) -> RouteDescription;
        fn hardware(&self) -> HardwareInfo;
        fn supports(&self, feature: OsFeature) -> bool;
        fn set_category(&self, identifier: &str, options: u32) -> Result<()>;
        fn set_mode(&self, identifier: &str) -> Result<()>;
        fn set_active(&self, active: bool, options: SetActiveOptions) -> Result<()>;
        fn name(&self) -> &'static str;
    }
}

/// Counts WARN events seen while installed
struct WarnCounter(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Runs `f` under a scoped subscriber and returns how many warnings it logged
fn count_warnings<T>(f: impl FnOnce() -> T) -> (T, usize) {
    let count = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarnCounter(count.clone()));
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, count.load(Ordering::SeqCst))
}

fn rejection(operation: &'static str) -> SessionError {
    SessionError::Rejected {
        operation,
        reason: "The operation couldn't be completed. (OSStatus error 560557684.)".to_string(),
    }
}

/// Driver with every read stubbed to a plausible iPhone state
fn stubbed_driver() -> MockDriver {
    let mut driver = MockDriver::new();
    driver
        .expect_category()
        .returning(|| "AVAudioSessionCategoryPlayAndRecord".to_string());
    driver.expect_available_categories().returning(|| {
        vec![
            "AVAudioSessionCategoryAmbient".to_string(),
            "AVAudioSessionCategoryPlayback".to_string(),
        ]
    });
    driver
        .expect_mode()
        .returning(|| "AVAudioSessionModeVoiceChat".to_string());
    driver
        .expect_available_modes()
        .returning(|| vec!["AVAudioSessionModeDefault".to_string()]);
    driver.expect_category_options().return_const(0x8u32 | 0x4);
    driver.expect_flags().returning(|| SessionFlags {
        is_other_audio_playing: true,
        secondary_audio_should_be_silenced_hint: false,
        allow_haptics_and_system_sounds_during_recording: false,
        prefers_no_interruptions_from_system_alerts: Some(false),
        prefers_interruption_on_route_disconnect: None,
    });
    driver.expect_output_volume().return_const(0.5f32);
    driver.expect_rendering_mode().return_const(Some(1i64));
    driver.expect_current_route().returning(|| RouteDescription {
        inputs: vec![RoutePort::new("iPhone Microphone", "MicrophoneBuiltIn")],
        outputs: vec![RoutePort::new("Receiver", "Receiver")],
    });
    driver.expect_hardware().returning(|| HardwareInfo {
        sample_rate: 48000.0,
        preferred_sample_rate: 0.0,
        input_gain: 0.5,
        is_input_gain_settable: true,
        io_buffer_duration: 0.02,
        preferred_io_buffer_duration: 0.0,
        input_latency: 0.001,
        output_latency: 0.002,
        output_volume: 0.5,
        preferred_input_number_of_channels: 0,
        input_number_of_channels: 1,
        maximum_input_number_of_channels: 1,
        preferred_output_number_of_channels: 0,
        output_number_of_channels: 1,
        maximum_output_number_of_channels: 1,
    });
    driver.expect_supports().return_const(true);
    driver.expect_name().return_const("Mock");
    driver
}

fn assert_sorted(value: &Value, path: &str) {
    match value {
        Value::Object(map) => {
            let keys: Vec<&String> = map.keys().collect();
            let mut sorted = keys.clone();
            sorted.sort();
            assert_eq!(keys, sorted, "keys not sorted at {}", path);
            for (key, child) in map {
                assert_sorted(child, &format!("{}.{}", path, key));
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                assert_sorted(child, &format!("{}[{}]", path, i));
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod set_category_tests {
    use super::*;

    #[test]
    fn test_two_options_reach_driver() {
        let mut driver = MockDriver::new();
        driver
            .expect_set_category()
            .withf(|id, bits| id == "AVAudioSessionCategoryPlayback" && *bits == 0x1 | 0x2)
            .times(1)
            .returning(|_, _| Ok(()));

        let accessor = NativeAccessor::new(driver);
        assert!(accessor.set_category("Playback", "mixWithOthers,duckOthers"));
    }

    #[test]
    fn test_whitespace_around_commas_is_ignored() {
        let mut driver = MockDriver::new();
        driver
            .expect_set_category()
            .withf(|_, bits| *bits == 0x1 | 0x2)
            .times(1)
            .returning(|_, _| Ok(()));

        let accessor = NativeAccessor::new(driver);
        assert!(accessor.set_category(
            "AVAudioSessionCategoryPlayback",
            "  mixWithOthers ,   duckOthers  "
        ));
    }

    #[test]
    fn test_bogus_option_is_skipped() {
        let mut driver = MockDriver::new();
        driver
            .expect_set_category()
            .with(eq("AVAudioSessionCategoryPlayback"), eq(0u32))
            .times(1)
            .returning(|_, _| Ok(()));

        let accessor = NativeAccessor::new(driver);
        assert!(accessor.set_category("Playback", "bogusOption"));
    }

    #[test]
    fn test_valid_options_survive_next_to_bogus_ones() {
        let mut driver = MockDriver::new();
        driver
            .expect_set_category()
            .withf(|_, bits| *bits == 0x40)
            .times(1)
            .returning(|_, _| Ok(()));

        let accessor = NativeAccessor::new(driver);
        assert!(accessor.set_category("Playback", "bogusOption,allowAirPlay,,"));
    }

    #[test]
    fn test_bogus_option_logs_one_warning() {
        let mut driver = MockDriver::new();
        driver
            .expect_set_category()
            .with(eq("AVAudioSessionCategoryPlayback"), eq(0u32))
            .times(1)
            .returning(|_, _| Ok(()));

        let accessor = NativeAccessor::new(driver);
        let (ok, warnings) = count_warnings(|| accessor.set_category("Playback", "bogusOption"));
        assert!(ok);
        assert_eq!(warnings, 1);
    }

    #[test]
    fn test_one_warning_per_unknown_token() {
        let mut driver = MockDriver::new();
        driver
            .expect_set_category()
            .withf(|_, bits| *bits == 0x40)
            .times(1)
            .returning(|_, _| Ok(()));

        let accessor = NativeAccessor::new(driver);
        let (ok, warnings) =
            count_warnings(|| accessor.set_category("Playback", "bogusA,allowAirPlay,bogusB"));
        assert!(ok);
        assert_eq!(warnings, 2);
    }

    #[test]
    fn test_valid_options_log_no_warning() {
        let mut driver = MockDriver::new();
        driver
            .expect_set_category()
            .times(1)
            .returning(|_, _| Ok(()));

        let accessor = NativeAccessor::new(driver);
        let (ok, warnings) =
            count_warnings(|| accessor.set_category("Playback", "mixWithOthers, duckOthers"));
        assert!(ok);
        assert_eq!(warnings, 0);
    }

    #[test]
    fn test_interrupt_spoken_audio_uses_platform_bits() {
        let mut driver = MockDriver::new();
        driver
            .expect_set_category()
            .withf(|_, bits| *bits == 0x11)
            .times(1)
            .returning(|_, _| Ok(()));

        let accessor = NativeAccessor::new(driver);
        assert!(accessor.set_category("Playback", "interruptSpokenAudioAndMixWithOthers"));
    }

    #[test]
    fn test_os_rejection_returns_false() {
        let mut driver = MockDriver::new();
        driver
            .expect_set_category()
            .returning(|_, _| Err(rejection("set_category")));

        let accessor = NativeAccessor::new(driver);
        assert!(!accessor.set_category("Record", "defaultToSpeaker"));
    }

    #[test]
    fn test_unknown_category_returns_false() {
        let mut driver = MockDriver::new();
        driver.expect_set_category().never();

        let accessor = NativeAccessor::new(driver);
        assert!(!accessor.set_category("AVAudioSessionCategoryKaraoke", ""));
    }
}

#[cfg(test)]
mod set_mode_and_active_tests {
    use super::*;

    #[test]
    fn test_set_mode_passes_identifier() {
        let mut driver = MockDriver::new();
        driver
            .expect_set_mode()
            .with(eq("AVAudioSessionModeMeasurement"))
            .times(1)
            .returning(|_| Ok(()));

        let accessor = NativeAccessor::new(driver);
        assert!(accessor.set_mode("Measurement"));
    }

    #[test]
    fn test_set_mode_unknown_returns_false() {
        let mut driver = MockDriver::new();
        driver.expect_set_mode().never();

        let accessor = NativeAccessor::new(driver);
        assert!(!accessor.set_mode("Karaoke"));
    }

    #[test]
    fn test_set_active_recognizes_notify_option() {
        let mut driver = MockDriver::new();
        driver
            .expect_set_active()
            .with(eq(false), eq(SetActiveOptions::NotifyOthersOnDeactivation))
            .times(1)
            .returning(|_, _| Ok(()));

        let accessor = NativeAccessor::new(driver);
        assert!(accessor.set_active(false, "notifyOthersOnDeactivation"));
    }

    #[test]
    fn test_set_active_other_strings_mean_no_option() {
        let mut driver = MockDriver::new();
        driver
            .expect_set_active()
            .with(eq(true), eq(SetActiveOptions::None))
            .times(3)
            .returning(|_, _| Ok(()));

        let accessor = NativeAccessor::new(driver);
        assert!(accessor.set_active(true, ""));
        assert!(accessor.set_active(true, "NotifyOthersOnDeactivation"));
        assert!(accessor.set_active(true, "somethingElse"));
    }

    #[test]
    fn test_set_active_rejection_returns_false() {
        let mut driver = MockDriver::new();
        driver
            .expect_set_active()
            .returning(|_, _| Err(rejection("set_active")));

        let accessor = NativeAccessor::new(driver);
        assert!(!accessor.set_active(true, ""));
    }
}

#[cfg(test)]
mod snapshot_tests {
    use super::*;

    const DETAIL_KEYS: [&str; 3] = ["hardware", "currentRoute", "renderingMode"];

    #[test]
    fn test_detailed_snapshot_has_detail_keys() {
        let accessor = NativeAccessor::new(stubbed_driver());
        let json = accessor.get_session_snapshot(true).expect("snapshot");
        let value: Value = serde_json::from_str(&json).unwrap();

        for key in DETAIL_KEYS {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        for key in ["category", "mode", "categoryOptions", "flags"] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
    }

    #[test]
    fn test_summary_snapshot_omits_detail_keys() {
        let accessor = NativeAccessor::new(stubbed_driver());
        let json = accessor.get_session_snapshot(false).expect("snapshot");
        let value: Value = serde_json::from_str(&json).unwrap();

        for key in DETAIL_KEYS {
            assert!(value.get(key).is_none(), "unexpected {}", key);
        }
        assert_eq!(value.as_object().unwrap().len(), 4);
    }

    #[test]
    fn test_snapshot_keys_sorted_at_every_level() {
        let accessor = NativeAccessor::new(stubbed_driver());
        for detail in [false, true] {
            let json = accessor.get_session_snapshot(detail).unwrap();
            let value: Value = serde_json::from_str(&json).unwrap();
            assert_sorted(&value, "$");
        }
    }

    #[test]
    fn test_snapshot_values() {
        let accessor = NativeAccessor::new(stubbed_driver());
        let json = accessor.get_session_snapshot(true).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(
            value["category"]["category"],
            "AVAudioSessionCategoryPlayAndRecord"
        );
        assert_eq!(value["mode"]["mode"], "AVAudioSessionModeVoiceChat");
        assert_eq!(value["categoryOptions"]["rawValue"], 0xC);
        assert_eq!(value["categoryOptions"]["defaultToSpeaker"], true);
        assert_eq!(value["categoryOptions"]["allowBluetooth"], true);
        assert_eq!(value["categoryOptions"]["mixWithOthers"], false);
        assert_eq!(
            value["categoryOptions"]["[iOS 14.5+] overrideMutedMicrophoneInterruption"],
            false
        );
        assert_eq!(value["flags"]["isOtherAudioPlaying"], true);
        assert!(value["flags"]
            .get("[iOS 17.0+] prefersInterruptionOnRouteDisconnect")
            .is_none());
        assert_eq!(value["renderingMode"]["[iOS 17.2+] rawValue"], 1);
        assert_eq!(
            value["currentRoute"]["inputs"][0]["portName"],
            "iPhone Microphone"
        );
        assert_eq!(value["currentRoute"]["outputs"][0]["portType"], "Receiver");
        assert_eq!(value["hardware"]["sampleRate"]["sampleRate"], 48000.0);
        assert_eq!(value["hardware"]["IOBufferDuration"]["ioBufferDuration"], 0.02);
        assert_eq!(value["hardware"]["outputVolume"], 0.5);
        assert_eq!(
            value["hardware"]["inputChannels"]["maximumInputNumberOfChannels"],
            1
        );
    }

    #[test]
    fn test_snapshot_is_reproducible() {
        let accessor = NativeAccessor::new(stubbed_driver());
        let first = accessor.get_session_snapshot(true).unwrap();
        let second = accessor.get_session_snapshot(true).unwrap();
        assert_eq!(first, second);
    }
}

#[cfg(test)]
mod bridged_session_tests {
    use super::*;

    #[test]
    fn test_bridged_reads_translate_to_enums() {
        let session = BridgedAudioSession::new(stubbed_driver());
        assert_eq!(session.category().unwrap(), Category::PlayAndRecord);
        assert_eq!(session.mode().unwrap(), Mode::VoiceChat);
        assert_eq!(
            session.category_options(),
            CategoryOptions::DEFAULT_TO_SPEAKER | CategoryOptions::ALLOW_BLUETOOTH
        );
        assert!(session.is_other_audio_playing());
        assert!(!session.secondary_audio_should_be_silenced_hint());
        assert_eq!(session.output_volume(), 0.5);
        assert_eq!(session.name(), "Mock");
    }

    #[test]
    fn test_unmapped_category_is_an_error() {
        let mut driver = MockDriver::new();
        driver
            .expect_category()
            .returning(|| "AVAudioSessionCategoryAudioProcessing".to_string());

        let session = BridgedAudioSession::new(driver);
        match session.category() {
            Err(SessionError::UnmappedIdentifier { kind, identifier }) => {
                assert_eq!(kind, "category");
                assert_eq!(identifier, "AVAudioSessionCategoryAudioProcessing");
            }
            other => panic!("expected UnmappedIdentifier, got {:?}", other),
        }
    }

    #[test]
    fn test_unmapped_mode_is_an_error() {
        let mut driver = MockDriver::new();
        driver.expect_mode().returning(|| "AVAudioSessionModeShortFormVideo".to_string());

        let session = BridgedAudioSession::new(driver);
        assert!(matches!(
            session.mode(),
            Err(SessionError::UnmappedIdentifier { kind: "mode", .. })
        ));
    }

    #[test]
    fn test_bridged_set_category_sends_option_names() {
        let mut driver = MockDriver::new();
        driver
            .expect_set_category()
            .withf(|id, bits| id == "AVAudioSessionCategoryPlayAndRecord" && *bits == 0x8 | 0x20)
            .times(1)
            .returning(|_, _| Ok(()));

        let session = BridgedAudioSession::new(driver);
        assert!(session.set_category(
            Category::PlayAndRecord,
            CategoryOptions::DEFAULT_TO_SPEAKER | CategoryOptions::ALLOW_BLUETOOTH_A2DP
        ));
    }

    #[test]
    fn test_bridged_set_active_with_notify() {
        let mut driver = MockDriver::new();
        driver
            .expect_set_active()
            .with(eq(false), eq(SetActiveOptions::NotifyOthersOnDeactivation))
            .times(1)
            .returning(|_, _| Ok(()));

        let session = BridgedAudioSession::new(driver);
        assert!(session.set_active(false, SetActiveOptions::NotifyOthersOnDeactivation));
    }

    #[test]
    fn test_bridged_set_mode_rejection() {
        let mut driver = MockDriver::new();
        driver
            .expect_set_mode()
            .returning(|_| Err(rejection("set_mode")));

        let session = BridgedAudioSession::new(driver);
        assert!(!session.set_mode(Mode::GameChat));
    }
}
