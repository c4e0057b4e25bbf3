//! Business profile
//!
//! Everything that makes one deployment a particular business: services,
//! staff, weekly hours, booking rules, and the agent's personality. Loaded
//! from YAML at startup; the agent never mutates it.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ConfigError;

/// Serde helper for `HH:MM` times
mod hhmm {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// A bookable service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    pub duration_minutes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A staff member who can take appointments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Services this person handles; empty means all of them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<String>,
}

impl Staff {
    pub fn handles(&self, service: &str) -> bool {
        self.services.is_empty()
            || self
                .services
                .iter()
                .any(|s| s.eq_ignore_ascii_case(service))
    }
}

/// Open interval for one day
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DayHours {
    #[serde(with = "hhmm")]
    pub open: NaiveTime,
    #[serde(with = "hhmm")]
    pub close: NaiveTime,
}

/// Weekly opening hours; a missing day is closed
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WeeklyHours {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monday: Option<DayHours>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tuesday: Option<DayHours>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wednesday: Option<DayHours>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thursday: Option<DayHours>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friday: Option<DayHours>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saturday: Option<DayHours>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunday: Option<DayHours>,
}

impl WeeklyHours {
    pub fn for_weekday(&self, weekday: Weekday) -> Option<DayHours> {
        match weekday {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }
}

/// Slot generation and booking rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRules {
    /// Padding around existing bookings, in minutes
    #[serde(default = "default_buffer_minutes")]
    pub buffer_minutes: u32,

    /// Candidate slot granularity, in minutes
    #[serde(default = "default_slot_step_minutes")]
    pub slot_step_minutes: u32,

    /// Maximum slots offered to the caller in one answer
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
}

fn default_buffer_minutes() -> u32 {
    10
}

fn default_slot_step_minutes() -> u32 {
    15
}

fn default_max_suggestions() -> usize {
    6
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            buffer_minutes: default_buffer_minutes(),
            slot_step_minutes: default_slot_step_minutes(),
            max_suggestions: default_max_suggestions(),
        }
    }
}

/// Agent voice and phrasing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Personality {
    /// Spoken before the first caller turn; `{business_name}` is substituted
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Spoken when the call wraps up
    #[serde(default = "default_closing")]
    pub closing: String,

    /// Free-form tone guidance for the dialog model
    #[serde(default = "default_style")]
    pub style: String,
}

fn default_greeting() -> String {
    "Thank you for calling {business_name}. How can I help you today?".to_string()
}

fn default_closing() -> String {
    "Thanks for calling. Have a great day!".to_string()
}

fn default_style() -> String {
    "Warm, concise, and professional. Keep replies to one or two sentences.".to_string()
}

impl Default for Personality {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            closing: default_closing(),
            style: default_style(),
        }
    }
}

/// The full business profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub services: Vec<Service>,
    #[serde(default)]
    pub staff: Vec<Staff>,
    pub hours: WeeklyHours,
    #[serde(default)]
    pub booking: BookingRules,
    #[serde(default)]
    pub personality: Personality,
}

impl BusinessProfile {
    /// Load a profile from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;
        let profile: Self =
            serde_yaml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        profile.validate()?;
        Ok(profile)
    }

    /// Validate the profile
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::MissingField("name".to_string()));
        }

        if self.services.is_empty() {
            return Err(ConfigError::MissingField("services".to_string()));
        }

        for service in &self.services {
            if service.duration_minutes == 0 {
                return Err(ConfigError::InvalidValue {
                    field: format!("services.{}.duration_minutes", service.name),
                    message: "Must be at least 1".to_string(),
                });
            }
        }

        for staff in &self.staff {
            for service in &staff.services {
                if self.find_service(service).is_none() {
                    return Err(ConfigError::InvalidValue {
                        field: format!("staff.{}.services", staff.name),
                        message: format!("Unknown service '{}'", service),
                    });
                }
            }
        }

        for weekday in [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ] {
            if let Some(hours) = self.hours.for_weekday(weekday) {
                if hours.open >= hours.close {
                    return Err(ConfigError::InvalidValue {
                        field: format!("hours.{:?}", weekday),
                        message: "Opening time must precede closing time".to_string(),
                    });
                }
            }
        }

        if self.booking.slot_step_minutes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "booking.slot_step_minutes".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Look up a service by name, case-insensitive
    pub fn find_service(&self, name: &str) -> Option<&Service> {
        self.services
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Look up a staff member by name, case-insensitive
    pub fn find_staff(&self, name: &str) -> Option<&Staff> {
        self.staff
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Greeting with the business name substituted
    pub fn greeting_line(&self) -> String {
        self.personality
            .greeting
            .replace("{business_name}", &self.name)
    }
}
