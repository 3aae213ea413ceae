// Session snapshot - point-in-time read of the OS audio session
//
// Built on demand from a single pass over the driver and never cached.
// Serialized as pretty JSON with keys sorted at every nesting level so two
// snapshots of the same state diff cleanly.

use serde::Serialize;
use serde_json::{Map, Value};

use super::driver::SessionDriver;
use super::error::Result;
use super::types::{CategoryOptions, OsFeature, RouteDescription, RoutePort};

/// Keys that only appear in a detailed snapshot
pub const DETAIL_KEYS: [&str; 3] = ["currentRoute", "hardware", "renderingMode"];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySection {
    pub category: String,
    pub available_categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeSection {
    pub mode: String,
    pub available_modes: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryOptionsSection {
    /// Platform raw option bits
    pub raw_value: u32,
    pub mix_with_others: bool,
    pub duck_others: bool,
    pub allow_bluetooth: bool,
    pub default_to_speaker: bool,
    pub interrupt_spoken_audio_and_mix_with_others: bool,
    #[serde(rename = "allowBluetoothA2DP")]
    pub allow_bluetooth_a2dp: bool,
    pub allow_air_play: bool,
    #[serde(
        rename = "[iOS 14.5+] overrideMutedMicrophoneInterruption",
        skip_serializing_if = "Option::is_none"
    )]
    pub override_muted_microphone_interruption: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagsSection {
    pub is_other_audio_playing: bool,
    pub secondary_audio_should_be_silenced_hint: bool,
    pub allow_haptics_and_system_sounds_during_recording: bool,
    #[serde(
        rename = "[iOS 14.5+] prefersNoInterruptionsFromSystemAlerts",
        skip_serializing_if = "Option::is_none"
    )]
    pub prefers_no_interruptions_from_system_alerts: Option<bool>,
    #[serde(
        rename = "[iOS 17.0+] prefersInterruptionOnRouteDisconnect",
        skip_serializing_if = "Option::is_none"
    )]
    pub prefers_interruption_on_route_disconnect: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderingModeSection {
    #[serde(rename = "[iOS 17.2+] rawValue", skip_serializing_if = "Option::is_none")]
    pub raw_value: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteSection {
    pub inputs: Vec<RoutePort>,
    pub outputs: Vec<RoutePort>,
}

impl From<RouteDescription> for RouteSection {
    fn from(route: RouteDescription) -> Self {
        Self {
            inputs: route.inputs,
            outputs: route.outputs,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleRateSection {
    pub sample_rate: f64,
    pub preferred_sample_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputGainSection {
    pub input_gain: f64,
    pub is_input_gain_settable: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IoBufferDurationSection {
    pub io_buffer_duration: f64,
    #[serde(rename = "preferredIOBufferDuration")]
    pub preferred_io_buffer_duration: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatencySection {
    pub input_latency: f64,
    pub output_latency: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputChannelsSection {
    pub preferred_input_number_of_channels: i64,
    pub input_number_of_channels: i64,
    pub maximum_input_number_of_channels: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputChannelsSection {
    pub preferred_output_number_of_channels: i64,
    pub output_number_of_channels: i64,
    pub maximum_output_number_of_channels: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareSection {
    pub sample_rate: SampleRateSection,
    pub input_gain: InputGainSection,
    #[serde(rename = "IOBufferDuration")]
    pub io_buffer_duration: IoBufferDurationSection,
    pub inspecting_latency: LatencySection,
    pub output_volume: f64,
    pub input_channels: InputChannelsSection,
    pub output_channels: OutputChannelsSection,
}

/// Detail-only sections, captured together or not at all
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailSections {
    pub rendering_mode: RenderingModeSection,
    pub current_route: RouteSection,
    pub hardware: HardwareSection,
}

/// Point-in-time aggregate of the session state
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub category: CategorySection,
    pub mode: ModeSection,
    pub category_options: CategoryOptionsSection,
    pub flags: FlagsSection,
    #[serde(flatten)]
    pub detail: Option<DetailSections>,
}

/// f32 -> f64 keeping the shortest decimal form (0.7f32 stays 0.7, not 0.699999988...)
fn widen(value: f32) -> f64 {
    value.to_string().parse().unwrap_or(value as f64)
}

impl SessionSnapshot {
    /// Reads the session once through `driver`
    pub fn capture<D: SessionDriver + ?Sized>(driver: &D, detail: bool) -> Self {
        let raw_options = driver.category_options();
        let options = CategoryOptions::from_platform_bits(raw_options);
        let flags = driver.flags();

        let detail = detail.then(|| {
            let hw = driver.hardware();
            DetailSections {
                rendering_mode: RenderingModeSection {
                    raw_value: driver.rendering_mode(),
                },
                current_route: driver.current_route().into(),
                hardware: HardwareSection {
                    sample_rate: SampleRateSection {
                        sample_rate: hw.sample_rate,
                        preferred_sample_rate: hw.preferred_sample_rate,
                    },
                    input_gain: InputGainSection {
                        input_gain: widen(hw.input_gain),
                        is_input_gain_settable: hw.is_input_gain_settable,
                    },
                    io_buffer_duration: IoBufferDurationSection {
                        io_buffer_duration: hw.io_buffer_duration,
                        preferred_io_buffer_duration: hw.preferred_io_buffer_duration,
                    },
                    inspecting_latency: LatencySection {
                        input_latency: hw.input_latency,
                        output_latency: hw.output_latency,
                    },
                    output_volume: widen(hw.output_volume),
                    input_channels: InputChannelsSection {
                        preferred_input_number_of_channels: hw.preferred_input_number_of_channels,
                        input_number_of_channels: hw.input_number_of_channels,
                        maximum_input_number_of_channels: hw.maximum_input_number_of_channels,
                    },
                    output_channels: OutputChannelsSection {
                        preferred_output_number_of_channels: hw
                            .preferred_output_number_of_channels,
                        output_number_of_channels: hw.output_number_of_channels,
                        maximum_output_number_of_channels: hw.maximum_output_number_of_channels,
                    },
                },
            }
        });

        Self {
            category: CategorySection {
                category: driver.category(),
                available_categories: driver.available_categories(),
            },
            mode: ModeSection {
                mode: driver.mode(),
                available_modes: driver.available_modes(),
            },
            category_options: CategoryOptionsSection {
                raw_value: raw_options,
                mix_with_others: options.contains(CategoryOptions::MIX_WITH_OTHERS),
                duck_others: options.contains(CategoryOptions::DUCK_OTHERS),
                allow_bluetooth: options.contains(CategoryOptions::ALLOW_BLUETOOTH),
                default_to_speaker: options.contains(CategoryOptions::DEFAULT_TO_SPEAKER),
                interrupt_spoken_audio_and_mix_with_others: options
                    .contains(CategoryOptions::INTERRUPT_SPOKEN_AUDIO_AND_MIX_WITH_OTHERS),
                allow_bluetooth_a2dp: options.contains(CategoryOptions::ALLOW_BLUETOOTH_A2DP),
                allow_air_play: options.contains(CategoryOptions::ALLOW_AIR_PLAY),
                override_muted_microphone_interruption: driver
                    .supports(OsFeature::MutedMicrophoneOverride)
                    .then(|| {
                        options.contains(CategoryOptions::OVERRIDE_MUTED_MICROPHONE_INTERRUPTION)
                    }),
            },
            flags: FlagsSection {
                is_other_audio_playing: flags.is_other_audio_playing,
                secondary_audio_should_be_silenced_hint: flags
                    .secondary_audio_should_be_silenced_hint,
                allow_haptics_and_system_sounds_during_recording: flags
                    .allow_haptics_and_system_sounds_during_recording,
                prefers_no_interruptions_from_system_alerts: flags
                    .prefers_no_interruptions_from_system_alerts,
                prefers_interruption_on_route_disconnect: flags
                    .prefers_interruption_on_route_disconnect,
            },
            detail,
        }
    }

    pub fn is_detailed(&self) -> bool {
        self.detail.is_some()
    }

    /// JSON tree with keys sorted at every level
    pub fn to_value(&self) -> Result<Value> {
        Ok(sort_keys(serde_json::to_value(self)?))
    }

    /// Pretty-printed JSON with keys sorted at every level
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_value()?)?)
    }
}

/// Rebuilds every object with lexicographically ordered keys. Holds regardless
/// of whether serde_json's `preserve_order` feature is enabled in the build.
pub fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::new();
            for (key, child) in entries {
                sorted.insert(key, sort_keys(child));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}
