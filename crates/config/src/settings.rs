//! Process settings
//!
//! Immutable per-process configuration: audio tunables, VAD thresholds,
//! model names and endpoints. Loaded once at startup and passed by
//! reference; nothing reads configuration after construction.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Audio capture configuration
    #[serde(default)]
    pub audio: AudioConfig,

    /// VAD calibration and thresholds
    #[serde(default)]
    pub vad: VadConfig,

    /// Speech and dialog model configuration
    #[serde(default)]
    pub models: ModelConfig,

    /// Agent loop configuration
    #[serde(default)]
    pub agent: AgentConfig,

    /// IANA timezone name the business operates in
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Path to the business profile YAML
    #[serde(default = "default_business_config_path")]
    pub business_config_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            audio: AudioConfig::default(),
            vad: VadConfig::default(),
            models: ModelConfig::default(),
            agent: AgentConfig::default(),
            timezone: default_timezone(),
            business_config_path: default_business_config_path(),
        }
    }
}

/// Audio capture configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Capture sample rate in Hz
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Capture channel count (mono only)
    #[serde(default = "default_channels")]
    pub channels: u16,

    /// Duration of one analysis frame in seconds
    #[serde(default = "default_frame_duration_sec")]
    pub frame_duration_sec: f32,

    /// Hard cap on a single utterance recording in seconds
    #[serde(default = "default_record_max_seconds")]
    pub record_max_seconds: f32,

    /// Trailing silence that finalizes an utterance, in seconds
    #[serde(default = "default_silence_duration_sec")]
    pub silence_duration_sec: f32,

    /// How long to wait for speech to start before giving up, in seconds
    #[serde(default = "default_speech_wait_timeout_sec")]
    pub speech_wait_timeout_sec: f32,

    /// Input device name; the system default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_device: Option<String>,

    /// Output device name; the system default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_device: Option<String>,
}

impl AudioConfig {
    /// Samples per analysis frame
    pub fn frame_samples(&self) -> usize {
        (self.sample_rate as f32 * self.frame_duration_sec) as usize
    }
}

fn default_sample_rate() -> u32 {
    16000
}

fn default_channels() -> u16 {
    1
}

fn default_frame_duration_sec() -> f32 {
    0.064
}

fn default_record_max_seconds() -> f32 {
    15.0
}

fn default_silence_duration_sec() -> f32 {
    1.0
}

fn default_speech_wait_timeout_sec() -> f32 {
    10.0
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            channels: default_channels(),
            frame_duration_sec: default_frame_duration_sec(),
            record_max_seconds: default_record_max_seconds(),
            silence_duration_sec: default_silence_duration_sec(),
            speech_wait_timeout_sec: default_speech_wait_timeout_sec(),
            input_device: None,
            output_device: None,
        }
    }
}

/// VAD calibration and threshold configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VadConfig {
    /// Ambient noise sampling window at call start, in seconds
    #[serde(default = "default_calibration_duration_sec")]
    pub calibration_duration_sec: f32,

    /// Ambient energy multiplier for the start threshold
    #[serde(default = "default_ambient_multiplier")]
    pub ambient_multiplier: f32,

    /// Lower clamp for the start threshold
    #[serde(default = "default_energy_floor")]
    pub energy_floor: f32,

    /// Upper clamp for the start threshold
    #[serde(default = "default_energy_ceil")]
    pub energy_ceil: f32,

    /// Stop threshold as a fraction of the start threshold
    #[serde(default = "default_stop_threshold_ratio")]
    pub stop_threshold_ratio: f32,
}

fn default_calibration_duration_sec() -> f32 {
    2.0
}

fn default_ambient_multiplier() -> f32 {
    2.0
}

fn default_energy_floor() -> f32 {
    0.010
}

fn default_energy_ceil() -> f32 {
    0.050
}

fn default_stop_threshold_ratio() -> f32 {
    0.70
}

impl Default for VadConfig {
    fn default() -> Self {
        Self {
            calibration_duration_sec: default_calibration_duration_sec(),
            ambient_multiplier: default_ambient_multiplier(),
            energy_floor: default_energy_floor(),
            energy_ceil: default_energy_ceil(),
            stop_threshold_ratio: default_stop_threshold_ratio(),
        }
    }
}

/// Speech and dialog model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// OpenAI-compatible API base URL
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// API key, read from the environment by default
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// Transcription model name
    #[serde(default = "default_stt_model")]
    pub stt_model: String,

    /// Synthesis model name
    #[serde(default = "default_tts_model")]
    pub tts_model: String,

    /// Synthesis voice name
    #[serde(default = "default_tts_voice")]
    pub tts_voice: String,

    /// Dialog decision model name
    #[serde(default = "default_dialog_model")]
    pub dialog_model: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Retry attempts for the dialog model
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_api_base() -> String {
    std::env::var("OPENAI_API_BASE").unwrap_or_else(|_| "https://api.openai.com/v1".to_string())
}

fn default_api_key() -> String {
    std::env::var("OPENAI_API_KEY").unwrap_or_default()
}

fn default_stt_model() -> String {
    "whisper-1".to_string()
}

fn default_tts_model() -> String {
    "tts-1".to_string()
}

fn default_tts_voice() -> String {
    "alloy".to_string()
}

fn default_dialog_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    2
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key: default_api_key(),
            stt_model: default_stt_model(),
            tts_model: default_tts_model(),
            tts_voice: default_tts_voice(),
            dialog_model: default_dialog_model(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

/// Agent loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum decision rounds per caller turn
    #[serde(default = "default_max_decision_rounds")]
    pub max_decision_rounds: u32,

    /// Per-tool execution timeout in seconds
    #[serde(default = "default_tool_timeout_secs")]
    pub tool_timeout_secs: u64,
}

fn default_max_decision_rounds() -> u32 {
    5
}

fn default_tool_timeout_secs() -> u64 {
    10
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_decision_rounds: default_max_decision_rounds(),
            tool_timeout_secs: default_tool_timeout_secs(),
        }
    }
}

fn default_timezone() -> String {
    std::env::var("APP_TIMEZONE").unwrap_or_else(|_| "America/New_York".to_string())
}

fn default_business_config_path() -> String {
    "config/business.yaml".to_string()
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.audio.channels != 1 {
            return Err(ConfigError::InvalidValue {
                field: "audio.channels".to_string(),
                message: "Only mono capture is supported".to_string(),
            });
        }

        if !(0.005..=1.0).contains(&self.audio.frame_duration_sec) {
            return Err(ConfigError::InvalidValue {
                field: "audio.frame_duration_sec".to_string(),
                message: format!(
                    "Must be between 0.005 and 1.0 seconds, got {}",
                    self.audio.frame_duration_sec
                ),
            });
        }

        if self.audio.record_max_seconds <= self.audio.silence_duration_sec {
            return Err(ConfigError::InvalidValue {
                field: "audio.record_max_seconds".to_string(),
                message: "Hard cap must exceed the silence window".to_string(),
            });
        }

        if self.vad.energy_floor > self.vad.energy_ceil {
            return Err(ConfigError::InvalidValue {
                field: "vad.energy_floor".to_string(),
                message: format!(
                    "Floor {} exceeds ceiling {}",
                    self.vad.energy_floor, self.vad.energy_ceil
                ),
            });
        }

        if !(0.0..1.0).contains(&self.vad.stop_threshold_ratio) {
            return Err(ConfigError::InvalidValue {
                field: "vad.stop_threshold_ratio".to_string(),
                message: format!(
                    "Must be in [0, 1), got {}",
                    self.vad.stop_threshold_ratio
                ),
            });
        }

        if self.agent.max_decision_rounds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "agent.max_decision_rounds".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (FRONTDESK_ prefix)
/// 2. config/{env}.yaml (if env specified)
/// 3. config/default.yaml
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("FRONTDESK")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.audio.sample_rate, 16000);
        assert_eq!(settings.audio.frame_samples(), 1024);
        assert_eq!(settings.vad.stop_threshold_ratio, 0.70);
        assert_eq!(settings.agent.max_decision_rounds, 5);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_stereo() {
        let mut settings = Settings::default();
        settings.audio.channels = 2;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_inverted_clamp() {
        let mut settings = Settings::default();
        settings.vad.energy_floor = 0.2;
        settings.vad.energy_ceil = 0.1;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_stop_ratio() {
        let mut settings = Settings::default();
        settings.vad.stop_threshold_ratio = 1.0;
        assert!(settings.validate().is_err());
    }
}
