//! Serde utilities for loosely typed JSON peers.

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};
use serde_json::Value;
use std::fmt;

/// Module to handle IDs that might arrive as strings or numbers.
///
/// Different OneBot implementations disagree on whether `message_id`,
/// `group_id` and friends are numbers or strings, so they are normalized to
/// their decimal string form.
pub mod id_string {
    use super::{Deserializer, Serializer, Visitor, de, fmt};

    /// Serializes an ID string as-is.
    ///
    /// # Errors
    ///
    /// Returns an error if the serializer fails.
    pub fn serialize<S>(value: &str, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(value)
    }

    struct IdVisitor;

    impl Visitor<'_> for IdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer ID")
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }
    }

    /// Deserializes an ID from a string or integer.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is neither a string nor an integer.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(IdVisitor)
    }

    /// Optional variant of [`id_string`](super::id_string).
    pub mod option {
        use super::{Deserializer, IdVisitor, Serializer, de, fmt};
        use serde::de::Visitor;

        /// Serializes an optional ID string.
        ///
        /// # Errors
        ///
        /// Returns an error if the serializer fails.
        #[allow(clippy::ref_option)]
        pub fn serialize<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(v) => serializer.serialize_some(v),
                None => serializer.serialize_none(),
            }
        }

        struct OptionalIdVisitor;

        impl<'de> Visitor<'de> for OptionalIdVisitor {
            type Value = Option<String>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an optional string or integer ID")
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(None)
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(None)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer.deserialize_any(IdVisitor).map(Some)
            }
        }

        /// Deserializes an optional ID from a string, integer or null.
        ///
        /// # Errors
        ///
        /// Returns an error if the value has an unexpected type.
        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_option(OptionalIdVisitor)
        }
    }
}

/// Reports whether a JSON value counts as "set": non-empty strings, arrays and
/// objects, non-zero numbers and `true`.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Reads an integer out of a number or a decimal string.
///
/// Floats truncate toward zero. Strings must hold an integer.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|u| i64::try_from(u).unwrap_or(i64::MAX)))
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}
