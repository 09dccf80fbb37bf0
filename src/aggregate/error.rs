use std::fmt::{Display, Formatter};

use crate::aggregate::value::AttributeKind;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AggregateErrorCode {
    TypeMismatch,
}

impl AggregateErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateErrorCode::TypeMismatch => "aggregate/type-mismatch",
        }
    }
}

/// Numeric kind an accumulation expected to find.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpectedKind {
    Float,
    Double,
    /// Any of integer, float or double.
    Numeric,
}

impl ExpectedKind {
    /// Kind an accumulation needs given what is stored under the attribute, if anything.
    pub fn for_stored(stored: Option<AttributeKind>) -> Self {
        match stored {
            Some(AttributeKind::Float) => ExpectedKind::Float,
            Some(AttributeKind::Double) => ExpectedKind::Double,
            _ => ExpectedKind::Numeric,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpectedKind::Float => "float",
            ExpectedKind::Double => "double",
            ExpectedKind::Numeric => "double, float or integer",
        }
    }
}

/// Recoverable accumulation failure. Plain writes report it to the log and to an optional
/// observer; `try_write_attribute` hands it back instead.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregateError {
    pub code: AggregateErrorCode,
    key: String,
    attribute: String,
    expected: ExpectedKind,
}

impl AggregateError {
    pub fn type_mismatch(
        key: impl Into<String>,
        attribute: impl Into<String>,
        expected: ExpectedKind,
    ) -> Self {
        Self {
            code: AggregateErrorCode::TypeMismatch,
            key: key.into(),
            attribute: attribute.into(),
            expected,
        }
    }

    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    /// Aggregation key of the bucket the write targeted.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn expected(&self) -> ExpectedKind {
        self.expected
    }
}

impl Display for AggregateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "saved attribute {} under {} isn't type of {} ({})",
            self.attribute,
            self.key,
            self.expected.as_str(),
            self.code_str()
        )
    }
}

impl std::error::Error for AggregateError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_attribute_and_expected_kind() {
        let err = AggregateError::type_mismatch("EVENT1", "duration", ExpectedKind::Float);
        assert_eq!(err.code_str(), "aggregate/type-mismatch");
        let message = err.to_string();
        assert!(message.contains("duration"));
        assert!(message.contains("float"));
    }

    #[test]
    fn expected_kind_follows_stored_kind() {
        assert_eq!(
            ExpectedKind::for_stored(Some(AttributeKind::Float)),
            ExpectedKind::Float
        );
        assert_eq!(
            ExpectedKind::for_stored(Some(AttributeKind::Double)),
            ExpectedKind::Double
        );
        assert_eq!(
            ExpectedKind::for_stored(Some(AttributeKind::String)),
            ExpectedKind::Numeric
        );
        assert_eq!(ExpectedKind::for_stored(None), ExpectedKind::Numeric);
    }
}
