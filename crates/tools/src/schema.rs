//! Tool trait and argument schemas
//!
//! Tools declare a JSON-schema-shaped argument contract; the default
//! `validate` walks it before execution so individual tools only see
//! well-formed arguments.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::ToolError;

/// Property types supported in tool schemas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Number,
    Integer,
    Boolean,
}

/// Schema for one argument
#[derive(Debug, Clone, Serialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub description: String,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
}

impl PropertySchema {
    fn new(property_type: PropertyType, description: impl Into<String>) -> Self {
        Self {
            property_type,
            description: description.into(),
            enum_values: None,
            minimum: None,
            maximum: None,
        }
    }

    pub fn string(description: impl Into<String>) -> Self {
        Self::new(PropertyType::String, description)
    }

    pub fn number(description: impl Into<String>) -> Self {
        Self::new(PropertyType::Number, description)
    }

    pub fn integer(description: impl Into<String>) -> Self {
        Self::new(PropertyType::Integer, description)
    }

    pub fn boolean(description: impl Into<String>) -> Self {
        Self::new(PropertyType::Boolean, description)
    }

    pub fn enum_type(description: impl Into<String>, values: &[&str]) -> Self {
        let mut schema = Self::new(PropertyType::String, description);
        schema.enum_values = Some(values.iter().map(|v| v.to_string()).collect());
        schema
    }

    pub fn with_range(mut self, minimum: f64, maximum: f64) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self
    }
}

/// Object schema for a tool's arguments
#[derive(Debug, Clone, Serialize, Default)]
pub struct InputSchema {
    pub properties: BTreeMap<String, PropertySchema>,
    pub required: Vec<String>,
}

impl InputSchema {
    pub fn object() -> Self {
        Self::default()
    }

    pub fn property(
        mut self,
        name: impl Into<String>,
        schema: PropertySchema,
        required: bool,
    ) -> Self {
        let name = name.into();
        if required {
            self.required.push(name.clone());
        }
        self.properties.insert(name, schema);
        self
    }

    /// Render as a JSON-schema object for the system prompt
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": self.properties,
            "required": self.required,
        })
    }

    /// Check arguments against this schema
    pub fn validate(&self, arguments: &Value) -> Result<(), ToolError> {
        let object = match arguments {
            Value::Object(map) => map,
            Value::Null => {
                if self.required.is_empty() {
                    return Ok(());
                }
                return Err(ToolError::invalid(format!(
                    "missing required arguments: {}",
                    self.required.join(", ")
                )));
            },
            other => {
                return Err(ToolError::invalid(format!(
                    "arguments must be an object, got {}",
                    value_kind(other)
                )))
            },
        };

        for name in &self.required {
            if object.get(name).map_or(true, Value::is_null) {
                return Err(ToolError::invalid(format!("missing required argument '{}'", name)));
            }
        }

        for (name, value) in object {
            let Some(schema) = self.properties.get(name) else {
                return Err(ToolError::invalid(format!("unexpected argument '{}'", name)));
            };
            if value.is_null() {
                continue;
            }
            validate_property(name, schema, value)?;
        }

        Ok(())
    }
}

fn validate_property(name: &str, schema: &PropertySchema, value: &Value) -> Result<(), ToolError> {
    match schema.property_type {
        PropertyType::String => {
            let Some(s) = value.as_str() else {
                return Err(ToolError::invalid(format!("'{}' must be a string", name)));
            };
            if let Some(allowed) = &schema.enum_values {
                if !allowed.iter().any(|v| v.eq_ignore_ascii_case(s)) {
                    return Err(ToolError::invalid(format!(
                        "'{}' must be one of: {}",
                        name,
                        allowed.join(", ")
                    )));
                }
            }
        },
        PropertyType::Number | PropertyType::Integer => {
            let number = if schema.property_type == PropertyType::Integer {
                if !value.is_i64() && !value.is_u64() {
                    return Err(ToolError::invalid(format!("'{}' must be an integer", name)));
                }
                value.as_f64()
            } else {
                value.as_f64()
            };
            let Some(number) = number else {
                return Err(ToolError::invalid(format!("'{}' must be a number", name)));
            };
            if let Some(minimum) = schema.minimum {
                if number < minimum {
                    return Err(ToolError::invalid(format!(
                        "'{}' must be at least {}",
                        name, minimum
                    )));
                }
            }
            if let Some(maximum) = schema.maximum {
                if number > maximum {
                    return Err(ToolError::invalid(format!(
                        "'{}' must be at most {}",
                        name, maximum
                    )));
                }
            }
        },
        PropertyType::Boolean => {
            if !value.is_boolean() {
                return Err(ToolError::invalid(format!("'{}' must be a boolean", name)));
            }
        },
    }
    Ok(())
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A callable tool
#[async_trait]
pub trait Tool: Send + Sync {
    /// Registered name the decision model calls this tool by
    fn name(&self) -> &str;

    /// One-line description for the system prompt
    fn description(&self) -> &str;

    /// Argument contract
    fn schema(&self) -> InputSchema;

    /// Per-tool execution timeout
    fn timeout_secs(&self) -> u64 {
        10
    }

    /// Validate arguments before execution
    fn validate(&self, arguments: &Value) -> Result<(), ToolError> {
        self.schema().validate(arguments)
    }

    /// Execute with validated arguments
    async fn execute(&self, arguments: Value) -> Result<Value, ToolError>;
}
