//! Attribute values stored in aggregation buckets.
//!
//! Values form a closed set so accumulation can check numeric kinds exhaustively. Serialisation
//! produces the natural JSON scalar for each variant, which is what the event transport sends as
//! event properties.

use std::collections::BTreeMap;
use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::engine::Engine as _;
use serde::{Serialize, Serializer};

/// Named attribute values collected under one aggregation key.
pub type Attributes = BTreeMap<String, AttributeValue>;

/// A single attribute value.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    Int(i64),
    Float(f32),
    Double(f64),
    String(String),
    Bool(bool),
    /// Opaque payload, sent as standard base64 text.
    Bytes(Vec<u8>),
    Null,
}

/// Discriminant of an [`AttributeValue`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Int,
    Float,
    Double,
    String,
    Bool,
    Bytes,
    Null,
}

impl AttributeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeKind::Int => "integer",
            AttributeKind::Float => "float",
            AttributeKind::Double => "double",
            AttributeKind::String => "string",
            AttributeKind::Bool => "boolean",
            AttributeKind::Bytes => "bytes",
            AttributeKind::Null => "null",
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AttributeValue {
    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeValue::Int(_) => AttributeKind::Int,
            AttributeValue::Float(_) => AttributeKind::Float,
            AttributeValue::Double(_) => AttributeKind::Double,
            AttributeValue::String(_) => AttributeKind::String,
            AttributeValue::Bool(_) => AttributeKind::Bool,
            AttributeValue::Bytes(_) => AttributeKind::Bytes,
            AttributeValue::Null => AttributeKind::Null,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }
}

impl Serialize for AttributeValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            AttributeValue::Int(value) => serializer.serialize_i64(*value),
            AttributeValue::Float(value) => serializer.serialize_f32(*value),
            AttributeValue::Double(value) => serializer.serialize_f64(*value),
            AttributeValue::String(value) => serializer.serialize_str(value),
            AttributeValue::Bool(value) => serializer.serialize_bool(*value),
            AttributeValue::Bytes(bytes) => serializer.serialize_str(&STANDARD.encode(bytes)),
            AttributeValue::Null => serializer.serialize_unit(),
        }
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Int(i64::from(value))
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<u32> for AttributeValue {
    fn from(value: u32) -> Self {
        AttributeValue::Int(i64::from(value))
    }
}

impl From<f32> for AttributeValue {
    fn from(value: f32) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Double(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<Vec<u8>> for AttributeValue {
    fn from(value: Vec<u8>) -> Self {
        AttributeValue::Bytes(value)
    }
}

impl<T> From<Option<T>> for AttributeValue
where
    T: Into<AttributeValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(AttributeValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn conversions_pick_matching_variant() {
        assert_eq!(AttributeValue::from(1), AttributeValue::Int(1));
        assert_eq!(AttributeValue::from(1.5f32), AttributeValue::Float(1.5));
        assert_eq!(AttributeValue::from(1.5f64), AttributeValue::Double(1.5));
        assert_eq!(
            AttributeValue::from("12.0000"),
            AttributeValue::String("12.0000".into())
        );
        assert_eq!(AttributeValue::from(None::<i64>), AttributeValue::Null);
        assert_eq!(AttributeValue::from(Some(true)), AttributeValue::Bool(true));
    }

    #[test]
    fn kind_matches_variant() {
        assert_eq!(AttributeValue::Int(1).kind(), AttributeKind::Int);
        assert_eq!(AttributeValue::Float(1.0).kind(), AttributeKind::Float);
        assert_eq!(AttributeValue::Null.kind(), AttributeKind::Null);
        assert_eq!(AttributeKind::Bool.to_string(), "boolean");
    }

    #[test]
    fn serializes_to_plain_json_scalars() {
        let attributes = Attributes::from([
            ("count".to_string(), AttributeValue::Int(3)),
            ("enabled".to_string(), AttributeValue::Bool(false)),
            ("payload".to_string(), AttributeValue::Bytes(b"hi".to_vec())),
            ("missing".to_string(), AttributeValue::Null),
            ("ratio".to_string(), AttributeValue::Double(0.25)),
        ]);

        let value = serde_json::to_value(&attributes).unwrap();
        assert_eq!(
            value,
            json!({
                "count": 3,
                "enabled": false,
                "payload": "aGk=",
                "missing": null,
                "ratio": 0.25
            })
        );
    }
}
