use std::borrow::Cow;
use std::fmt;

use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Identifier of a Forge resource (server, site, database, ...).
///
/// Accepts either a JSON string or integer and normalises it to its decimal
/// string form, so `"12"` and `12` bind to the same confirmation. Identifiers
/// are interpolated into endpoint paths and therefore may not be empty,
/// contain path, query or fragment separators, or be a `.` or `..` segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn parse(raw: impl Into<String>) -> Result<Self, String> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err("identifier must not be empty".to_string());
        }
        if trimmed.contains(['/', '?', '#', '%']) || trimmed.chars().any(char::is_whitespace) {
            return Err(format!("identifier '{trimmed}' contains characters that are not allowed"));
        }
        if matches!(trimmed, "." | "..") {
            return Err(format!("identifier '{trimmed}' is a path segment, not an id"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric JSON value when the identifier is all digits, otherwise a string.
    pub fn to_json(&self) -> Value {
        self.0
            .parse::<u64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(self.0.clone()))
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for ResourceId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for ResourceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = match RawId::deserialize(deserializer)? {
            RawId::Text(text) => text,
            RawId::Number(number) => number.to_string(),
        };
        ResourceId::parse(raw).map_err(serde::de::Error::custom)
    }
}

impl JsonSchema for ResourceId {
    fn schema_name() -> Cow<'static, str> {
        Cow::Borrowed("ResourceId")
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": ["string", "integer"],
            "description": "Forge resource identifier, as a string or integer."
        })
    }

    fn inline_schema() -> bool {
        true
    }
}
