//! Configuration for the frontdesk voice agent
//!
//! Two layers: process [`Settings`] (audio tunables, VAD thresholds, model
//! names) loaded env-first, and the [`BusinessProfile`] (services, staff,
//! hours, booking rules, personality) loaded from YAML.

pub mod business;
pub mod settings;

pub use business::{
    BookingRules, BusinessProfile, DayHours, Personality, Service, Staff, WeeklyHours,
};
pub use settings::{load_settings, AgentConfig, AudioConfig, ModelConfig, Settings, VadConfig};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
