//! Bridging `serde` data into structural values.

use serde::Serialize;

use super::{ToValue, Value};

impl Value {
    /// Projects any `Serialize` value through `serde_json`.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when the value cannot be represented as
    /// JSON (for example a map with non-string keys).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use deferio::value::Value;
    ///
    /// let value = Value::from_serialize(&vec![1, 2]).unwrap();
    /// assert_eq!(value.to_string(), "[1, 2]");
    /// ```
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Self::from)
    }
}

impl From<serde_json::Value> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(flag) => Self::Bool(flag),
            serde_json::Value::Number(number) => number.as_i64().map_or_else(
                || Self::Float(number.as_f64().unwrap_or(f64::NAN)),
                Self::Integer,
            ),
            serde_json::Value::String(text) => Self::Text(text),
            serde_json::Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            serde_json::Value::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

/// Adapter that lets any `Serialize` type be used as an effect argument or
/// asserted result.
///
/// Values that fail to serialize project to [`Value::Null`] and emit a
/// `warn` event.
///
/// # Examples
///
/// ```rust
/// use deferio::value::{Serialized, ToValue};
/// use serde::Serialize;
///
/// #[derive(Clone, Serialize)]
/// struct UserId {
///     id: u32,
/// }
///
/// let value = Serialized(UserId { id: 7 }).to_value();
/// assert_eq!(value.to_string(), "{id: 7}");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Serialized<T>(pub T);

impl<T: Serialize> ToValue for Serialized<T> {
    fn to_value(&self) -> Value {
        Value::from_serialize(&self.0).unwrap_or_else(|error| {
            tracing::warn!(%error, "value could not be projected through serde");
            Value::Null
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_numbers_keep_integers() {
        let value = Value::from(serde_json::json!({ "count": 3, "ratio": 0.5 }));
        assert!(matches!(value.member("count"), Some(Value::Integer(3))));
        assert!(matches!(value.member("ratio"), Some(Value::Float(_))));
    }

    #[test]
    fn test_non_string_keys_fail() {
        let mut map = std::collections::BTreeMap::new();
        map.insert((1, 2), "pair");
        assert!(Value::from_serialize(&map).is_err());
        assert!(matches!(Serialized(map).to_value(), Value::Null));
    }
}
