// Audio session type definitions
//
// Platform-agnostic enums and flag sets shared by the native accessor, the
// marshalling layer and the FFI boundary. NO platform-specific imports here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};
use std::str::FromStr;

use super::error::SessionError;

/// Top-level intent of the application's audio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Ambient,
    SoloAmbient,
    Playback,
    Record,
    PlayAndRecord,
    MultiRoute,
}

impl Category {
    /// Every category, in declaration order
    pub const ALL: [Category; 6] = [
        Category::Ambient,
        Category::SoloAmbient,
        Category::Playback,
        Category::Record,
        Category::PlayAndRecord,
        Category::MultiRoute,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Ambient => "Ambient",
            Category::SoloAmbient => "SoloAmbient",
            Category::Playback => "Playback",
            Category::Record => "Record",
            Category::PlayAndRecord => "PlayAndRecord",
            Category::MultiRoute => "MultiRoute",
        }
    }
}

impl Default for Category {
    /// The category the OS assigns before the app configures anything
    fn default() -> Self {
        Category::SoloAmbient
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| SessionError::UnknownName {
                kind: "category",
                name: s.to_string(),
            })
    }
}

/// Refinement of the category for a specific use pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    Default,
    VoiceChat,
    GameChat,
    VideoRecording,
    Measurement,
    MoviePlayback,
    VideoChat,
    SpokenAudio,
    VoicePrompt,
}

impl Mode {
    /// Every mode, in declaration order
    pub const ALL: [Mode; 9] = [
        Mode::Default,
        Mode::VoiceChat,
        Mode::GameChat,
        Mode::VideoRecording,
        Mode::Measurement,
        Mode::MoviePlayback,
        Mode::VideoChat,
        Mode::SpokenAudio,
        Mode::VoicePrompt,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Mode::Default => "Default",
            Mode::VoiceChat => "VoiceChat",
            Mode::GameChat => "GameChat",
            Mode::VideoRecording => "VideoRecording",
            Mode::Measurement => "Measurement",
            Mode::MoviePlayback => "MoviePlayback",
            Mode::VideoChat => "VideoChat",
            Mode::SpokenAudio => "SpokenAudio",
            Mode::VoicePrompt => "VoicePrompt",
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Default
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| SessionError::UnknownName {
                kind: "mode",
                name: s.to_string(),
            })
    }
}

/// Bit-flag set modifying category behavior.
///
/// Bits follow the managed layout (`1 << n`), which is NOT the platform's raw
/// layout: `interruptSpokenAudioAndMixWithOthers` is `0x11` on the platform.
/// Use [`CategoryOptions::from_platform_bits`] and
/// [`CategoryOptions::to_platform_bits`] when talking to the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryOptions(u32);

impl CategoryOptions {
    pub const NONE: Self = Self(0);
    pub const MIX_WITH_OTHERS: Self = Self(1 << 0);
    pub const DUCK_OTHERS: Self = Self(1 << 1);
    pub const ALLOW_BLUETOOTH: Self = Self(1 << 2);
    pub const DEFAULT_TO_SPEAKER: Self = Self(1 << 3);
    pub const INTERRUPT_SPOKEN_AUDIO_AND_MIX_WITH_OTHERS: Self = Self(1 << 4);
    pub const ALLOW_BLUETOOTH_A2DP: Self = Self(1 << 5);
    pub const ALLOW_AIR_PLAY: Self = Self(1 << 6);
    pub const OVERRIDE_MUTED_MICROPHONE_INTERRUPTION: Self = Self(1 << 7);

    /// Single-bit flags in bit order (NONE excluded)
    pub const FLAGS: [Self; 8] = [
        Self::MIX_WITH_OTHERS,
        Self::DUCK_OTHERS,
        Self::ALLOW_BLUETOOTH,
        Self::DEFAULT_TO_SPEAKER,
        Self::INTERRUPT_SPOKEN_AUDIO_AND_MIX_WITH_OTHERS,
        Self::ALLOW_BLUETOOTH_A2DP,
        Self::ALLOW_AIR_PLAY,
        Self::OVERRIDE_MUTED_MICROPHONE_INTERRUPTION,
    ];

    const MASK: u32 = (1 << 8) - 1;

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Drops bits that do not name a known option
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Self(bits & Self::MASK)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Individual flags set in `self`, in bit order
    pub fn iter(self) -> impl Iterator<Item = Self> {
        Self::FLAGS.into_iter().filter(move |f| self.contains(*f))
    }
}

impl BitOr for CategoryOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for CategoryOptions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for CategoryOptions {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Display for CategoryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("None");
        }
        f.write_str(&self.to_option_names())
    }
}

/// Options for activation requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SetActiveOptions {
    #[default]
    None,
    NotifyOthersOnDeactivation,
}

impl fmt::Display for SetActiveOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetActiveOptions::None => f.write_str("None"),
            SetActiveOptions::NotifyOthersOnDeactivation => {
                f.write_str("NotifyOthersOnDeactivation")
            }
        }
    }
}

/// OS capabilities that only exist from a given OS release on.
/// The driver decides whether each one is available at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFeature {
    /// `overrideMutedMicrophoneInterruption` option (iOS 14.5+)
    MutedMicrophoneOverride,
    /// `prefersNoInterruptionsFromSystemAlerts` flag (iOS 14.5+)
    SystemAlertInterruptionPreference,
    /// `prefersInterruptionOnRouteDisconnect` flag (iOS 17.0+)
    RouteDisconnectInterruption,
    /// `renderingMode` property (iOS 17.2+)
    RenderingMode,
}

/// Boolean session flags as read from the OS.
/// Version-gated flags are `None` when the OS does not provide them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionFlags {
    pub is_other_audio_playing: bool,
    pub secondary_audio_should_be_silenced_hint: bool,
    pub allow_haptics_and_system_sounds_during_recording: bool,
    pub prefers_no_interruptions_from_system_alerts: Option<bool>,
    pub prefers_interruption_on_route_disconnect: Option<bool>,
}

/// A single input or output endpoint of the current route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePort {
    pub port_name: String,
    pub port_type: String,
}

impl RoutePort {
    pub fn new(port_name: impl Into<String>, port_type: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            port_type: port_type.into(),
        }
    }
}

/// Active input/output endpoints, in the order the OS reports them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteDescription {
    pub inputs: Vec<RoutePort>,
    pub outputs: Vec<RoutePort>,
}

/// Hardware parameters of the session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HardwareInfo {
    pub sample_rate: f64,
    pub preferred_sample_rate: f64,
    pub input_gain: f32,
    pub is_input_gain_settable: bool,
    pub io_buffer_duration: f64,
    pub preferred_io_buffer_duration: f64,
    pub input_latency: f64,
    pub output_latency: f64,
    pub output_volume: f32,
    pub preferred_input_number_of_channels: i64,
    pub input_number_of_channels: i64,
    pub maximum_input_number_of_channels: i64,
    pub preferred_output_number_of_channels: i64,
    pub output_number_of_channels: i64,
    pub maximum_output_number_of_channels: i64,
}
