// Fixed identifier vocabulary shared with the platform
//
// Category and mode variants map 1:1 to the platform's constant strings;
// option flags map 1:1 to lower-camel-case option names and to the platform's
// raw option bits. Enum -> string is total by exhaustive `match`; the reverse
// direction and uniqueness are checked by `verify_tables` at startup.

use std::collections::HashSet;

use tracing::debug;

use super::error::{Result, SessionError};
use super::types::{Category, CategoryOptions, Mode, SetActiveOptions};

/// The only activation option name the native side recognizes
pub const NOTIFY_OTHERS_ON_DEACTIVATION: &str = "notifyOthersOnDeactivation";

/// (managed flag, option name, platform raw bits)
const OPTION_TABLE: [(CategoryOptions, &str, u32); 8] = [
    (CategoryOptions::MIX_WITH_OTHERS, "mixWithOthers", 0x1),
    (CategoryOptions::DUCK_OTHERS, "duckOthers", 0x2),
    (CategoryOptions::ALLOW_BLUETOOTH, "allowBluetooth", 0x4),
    (CategoryOptions::DEFAULT_TO_SPEAKER, "defaultToSpeaker", 0x8),
    (
        CategoryOptions::INTERRUPT_SPOKEN_AUDIO_AND_MIX_WITH_OTHERS,
        "interruptSpokenAudioAndMixWithOthers",
        0x11,
    ),
    (CategoryOptions::ALLOW_BLUETOOTH_A2DP, "allowBluetoothA2DP", 0x20),
    (CategoryOptions::ALLOW_AIR_PLAY, "allowAirPlay", 0x40),
    (
        CategoryOptions::OVERRIDE_MUTED_MICROPHONE_INTERRUPTION,
        "overrideMutedMicrophoneInterruption",
        0x80,
    ),
];

impl Category {
    /// Platform constant string for this category
    pub fn identifier(self) -> &'static str {
        match self {
            Category::Ambient => "AVAudioSessionCategoryAmbient",
            Category::SoloAmbient => "AVAudioSessionCategorySoloAmbient",
            Category::Playback => "AVAudioSessionCategoryPlayback",
            Category::Record => "AVAudioSessionCategoryRecord",
            Category::PlayAndRecord => "AVAudioSessionCategoryPlayAndRecord",
            Category::MultiRoute => "AVAudioSessionCategoryMultiRoute",
        }
    }

    pub fn from_identifier(identifier: &str) -> Option<Self> {
        match identifier {
            "AVAudioSessionCategoryAmbient" => Some(Category::Ambient),
            "AVAudioSessionCategorySoloAmbient" => Some(Category::SoloAmbient),
            "AVAudioSessionCategoryPlayback" => Some(Category::Playback),
            "AVAudioSessionCategoryRecord" => Some(Category::Record),
            "AVAudioSessionCategoryPlayAndRecord" => Some(Category::PlayAndRecord),
            "AVAudioSessionCategoryMultiRoute" => Some(Category::MultiRoute),
            _ => None,
        }
    }

    /// Accepts either the platform identifier or the short variant name
    pub fn resolve(name: &str) -> Option<Self> {
        Self::from_identifier(name).or_else(|| name.parse().ok())
    }
}

impl Mode {
    /// Platform constant string for this mode
    pub fn identifier(self) -> &'static str {
        match self {
            Mode::Default => "AVAudioSessionModeDefault",
            Mode::VoiceChat => "AVAudioSessionModeVoiceChat",
            Mode::GameChat => "AVAudioSessionModeGameChat",
            Mode::VideoRecording => "AVAudioSessionModeVideoRecording",
            Mode::Measurement => "AVAudioSessionModeMeasurement",
            Mode::MoviePlayback => "AVAudioSessionModeMoviePlayback",
            Mode::VideoChat => "AVAudioSessionModeVideoChat",
            Mode::SpokenAudio => "AVAudioSessionModeSpokenAudio",
            Mode::VoicePrompt => "AVAudioSessionModeVoicePrompt",
        }
    }

    pub fn from_identifier(identifier: &str) -> Option<Self> {
        match identifier {
            "AVAudioSessionModeDefault" => Some(Mode::Default),
            "AVAudioSessionModeVoiceChat" => Some(Mode::VoiceChat),
            "AVAudioSessionModeGameChat" => Some(Mode::GameChat),
            "AVAudioSessionModeVideoRecording" => Some(Mode::VideoRecording),
            "AVAudioSessionModeMeasurement" => Some(Mode::Measurement),
            "AVAudioSessionModeMoviePlayback" => Some(Mode::MoviePlayback),
            "AVAudioSessionModeVideoChat" => Some(Mode::VideoChat),
            "AVAudioSessionModeSpokenAudio" => Some(Mode::SpokenAudio),
            "AVAudioSessionModeVoicePrompt" => Some(Mode::VoicePrompt),
            _ => None,
        }
    }

    /// Accepts either the platform identifier or the short variant name
    pub fn resolve(name: &str) -> Option<Self> {
        Self::from_identifier(name).or_else(|| name.parse().ok())
    }
}

impl CategoryOptions {
    /// Option name of a single flag; `None` for NONE or multi-bit values
    pub fn option_name(self) -> Option<&'static str> {
        OPTION_TABLE
            .iter()
            .find(|(flag, _, _)| *flag == self)
            .map(|(_, name, _)| *name)
    }

    /// Case-sensitive lookup of a single option name
    pub fn from_option_name(name: &str) -> Option<Self> {
        OPTION_TABLE
            .iter()
            .find(|(_, option, _)| *option == name)
            .map(|(flag, _, _)| *flag)
    }

    /// Comma-joined option names in bit order; empty string for NONE
    pub fn to_option_names(self) -> String {
        self.iter()
            .filter_map(|flag| flag.option_name())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Converts the platform's raw option value to managed flags.
    /// A flag is set only when all of its platform bits are present.
    pub fn from_platform_bits(raw: u32) -> Self {
        let mut options = CategoryOptions::NONE;
        for (flag, _, platform) in OPTION_TABLE {
            if raw & platform == platform {
                options.insert(flag);
            }
        }
        options
    }

    pub fn to_platform_bits(self) -> u32 {
        OPTION_TABLE
            .iter()
            .filter(|(flag, _, _)| self.contains(*flag))
            .fold(0, |raw, (_, _, platform)| raw | platform)
    }

    /// (option name, platform raw bits) pairs in bit order
    pub fn platform_legend() -> impl Iterator<Item = (&'static str, u32)> {
        OPTION_TABLE.into_iter().map(|(_, name, raw)| (name, raw))
    }
}

impl SetActiveOptions {
    /// Option string sent across the native boundary; empty for none
    pub fn option_name(self) -> &'static str {
        match self {
            SetActiveOptions::None => "",
            SetActiveOptions::NotifyOthersOnDeactivation => NOTIFY_OTHERS_ON_DEACTIVATION,
        }
    }

    /// Exact match only; any other string means no option
    pub fn from_option_name(name: &str) -> Self {
        if name == NOTIFY_OTHERS_ON_DEACTIVATION {
            SetActiveOptions::NotifyOthersOnDeactivation
        } else {
            SetActiveOptions::None
        }
    }
}

/// Result of parsing a comma-separated option list
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedOptions {
    pub options: CategoryOptions,
    /// Tokens that matched no option name, trimmed
    pub rejected: Vec<String>,
}

/// Splits on `,`, trims whitespace around each token, skips empty tokens.
/// Unrecognized tokens are collected, not treated as an error.
pub fn parse_option_list(list: &str) -> ParsedOptions {
    let mut parsed = ParsedOptions::default();
    for token in list.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match CategoryOptions::from_option_name(token) {
            Some(flag) => parsed.options.insert(flag),
            None => parsed.rejected.push(token.to_string()),
        }
    }
    parsed
}

/// Checks that every variant has exactly one identifier and that every
/// identifier maps back to the variant it came from.
pub fn verify_tables() -> Result<()> {
    fn check_unique<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> Result<()> {
        let mut seen = HashSet::new();
        for id in ids {
            if !seen.insert(id) {
                return Err(SessionError::IdentifierTable(format!(
                    "duplicate {} identifier {}",
                    kind, id
                )));
            }
        }
        Ok(())
    }

    for category in Category::ALL {
        if Category::from_identifier(category.identifier()) != Some(category) {
            return Err(SessionError::IdentifierTable(format!(
                "category {} does not round-trip",
                category
            )));
        }
    }
    check_unique("category", Category::ALL.iter().map(|c| c.identifier()))?;

    for mode in Mode::ALL {
        if Mode::from_identifier(mode.identifier()) != Some(mode) {
            return Err(SessionError::IdentifierTable(format!(
                "mode {} does not round-trip",
                mode
            )));
        }
    }
    check_unique("mode", Mode::ALL.iter().map(|m| m.identifier()))?;

    for flag in CategoryOptions::FLAGS {
        let name = flag.option_name().ok_or_else(|| {
            SessionError::IdentifierTable(format!("option bit {:#x} has no name", flag.bits()))
        })?;
        if CategoryOptions::from_option_name(name) != Some(flag) {
            return Err(SessionError::IdentifierTable(format!(
                "option {} does not round-trip",
                name
            )));
        }
    }
    check_unique(
        "option",
        CategoryOptions::FLAGS.iter().filter_map(|f| f.option_name()),
    )?;

    debug!(
        "Identifier tables verified: {} categories, {} modes, {} options",
        Category::ALL.len(),
        Mode::ALL.len(),
        CategoryOptions::FLAGS.len()
    );
    Ok(())
}
