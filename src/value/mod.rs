//! Structural values used to compare effect calls and asserted results.
//!
//! Effect arguments and the results checked by [`test_io`](crate::effect::test_io)
//! are projected into a [`Value`] tree before they are compared. The comparison
//! itself lives in [`structurally_equal`], which deliberately keeps the loose
//! semantics of a key-by-key object walk:
//!
//! - composite values (lists and maps) are compared by walking the keys of the
//!   left-hand side only;
//! - any two callables are equal;
//! - everything else uses strict equality.
//!
//! # Examples
//!
//! ```rust
//! use deferio::value::{ToValue, Value, structurally_equal};
//!
//! let left = (1, "a").to_value();
//! let right = vec![Value::from(1), Value::from("a"), Value::from(true)].to_value();
//!
//! // Extra members on the right-hand side are not noticed.
//! assert!(structurally_equal(&left, &right));
//! assert!(!structurally_equal(&right, &left));
//! ```

mod equality;
#[cfg(feature = "serde")]
mod serde_support;

pub use equality::structurally_equal;
#[cfg(feature = "serde")]
pub use serde_support::Serialized;

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// A loosely-typed value tree.
///
/// `List` and `Map` are the composite variants. `Callable` stands in for
/// function-like values; its name is only used for diagnostics.
#[derive(Debug, Clone)]
pub enum Value {
    /// The absent value.
    Null,
    /// A boolean.
    Bool(bool),
    /// An integral number.
    Integer(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    Text(String),
    /// An ordered sequence, keyed by decimal index.
    List(Vec<Value>),
    /// A string-keyed mapping.
    Map(BTreeMap<String, Value>),
    /// A function-like value.
    Callable(Callable),
}

/// Placeholder for a function-like value inside a [`Value`].
///
/// All callables are structurally equal regardless of their name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Callable {
    name: String,
}

impl Callable {
    /// Creates a callable placeholder with a diagnostic name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the diagnostic name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Value {
    /// Creates a [`Value::Callable`] with the given diagnostic name.
    pub fn callable(name: impl Into<String>) -> Self {
        Self::Callable(Callable::new(name))
    }

    /// Creates a [`Value::List`] from anything that projects into values.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToValue,
    {
        Self::List(items.into_iter().map(|item| item.to_value()).collect())
    }

    /// Creates a [`Value::Map`] from key/value pairs.
    pub fn map<I, K, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: ToValue,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.to_value()))
                .collect(),
        )
    }

    /// Returns `true` for the object-like variants (`List` and `Map`).
    pub const fn is_composite(&self) -> bool {
        matches!(self, Self::List(_) | Self::Map(_))
    }

    /// Returns `true` for [`Value::Callable`].
    pub const fn is_callable(&self) -> bool {
        matches!(self, Self::Callable(_))
    }

    /// Looks up a member by key.
    ///
    /// Lists are indexed by the canonical decimal representation of the
    /// position, so keys such as `"01"` or `"+1"` find nothing.
    /// Non-composite values have no members.
    pub fn member(&self, key: &str) -> Option<&Self> {
        match self {
            Self::List(items) => key
                .parse::<usize>()
                .ok()
                .filter(|index| index.to_string() == key)
                .and_then(|index| items.get(index)),
            Self::Map(entries) => entries.get(key),
            _ => None,
        }
    }

    /// Returns the own members of a composite value in key order.
    pub fn members(&self) -> Vec<(String, &Self)> {
        match self {
            Self::List(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| (index.to_string(), item))
                .collect(),
            Self::Map(entries) => entries.iter().map(|(key, value)| (key.clone(), value)).collect(),
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(formatter, "null"),
            Self::Bool(value) => write!(formatter, "{value}"),
            Self::Integer(value) => write!(formatter, "{value}"),
            Self::Float(value) => write!(formatter, "{value}"),
            Self::Text(value) => write!(formatter, "{value:?}"),
            Self::List(items) => {
                write!(formatter, "[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        write!(formatter, ", ")?;
                    }
                    write!(formatter, "{item}")?;
                }
                write!(formatter, "]")
            }
            Self::Map(entries) => {
                write!(formatter, "{{")?;
                for (index, (key, value)) in entries.iter().enumerate() {
                    if index > 0 {
                        write!(formatter, ", ")?;
                    }
                    write!(formatter, "{key}: {value}")?;
                }
                write!(formatter, "}}")
            }
            Self::Callable(callable) => write!(formatter, "<fn {}>", callable.name),
        }
    }
}

// =============================================================================
// ToValue
// =============================================================================

/// Projection of a Rust value into a structural [`Value`].
///
/// Effect arguments and the results asserted by
/// [`test_io`](crate::effect::test_io) must implement this trait.
pub trait ToValue {
    /// Builds the structural view of `self`.
    fn to_value(&self) -> Value;
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl ToValue for Callable {
    fn to_value(&self) -> Value {
        Value::Callable(self.clone())
    }
}

impl ToValue for () {
    fn to_value(&self) -> Value {
        Value::Null
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

macro_rules! impl_to_value_for_integers {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToValue for $ty {
                fn to_value(&self) -> Value {
                    Value::Integer(i64::from(*self))
                }
            }
        )*
    };
}

impl_to_value_for_integers!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! impl_to_value_for_wide_integers {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToValue for $ty {
                #[allow(clippy::cast_precision_loss)]
                fn to_value(&self) -> Value {
                    i64::try_from(*self).map_or_else(|_| Value::Float(*self as f64), Value::Integer)
                }
            }
        )*
    };
}

impl_to_value_for_wide_integers!(u64, usize, isize, i128, u128);

impl ToValue for f32 {
    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl ToValue for char {
    fn to_value(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::Text(self.to_owned())
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, ToValue::to_value)
    }
}

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue, const N: usize> ToValue for [T; N] {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: ToValue> ToValue for VecDeque<T> {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(ToValue::to_value).collect())
    }
}

impl<K, T> ToValue for BTreeMap<K, T>
where
    K: AsRef<str>,
    T: ToValue,
{
    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(key, value)| (key.as_ref().to_owned(), value.to_value()))
                .collect(),
        )
    }
}

impl<K, T, S> ToValue for HashMap<K, T, S>
where
    K: AsRef<str>,
    T: ToValue,
{
    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(key, value)| (key.as_ref().to_owned(), value.to_value()))
                .collect(),
        )
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Box<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Rc<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Arc<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

macro_rules! impl_to_value_for_tuples {
    ($(($($name:ident),+)),* $(,)?) => {
        $(
            impl<$($name: ToValue),+> ToValue for ($($name,)+) {
                #[allow(non_snake_case)]
                fn to_value(&self) -> Value {
                    let ($($name,)+) = self;
                    Value::List(vec![$($name.to_value()),+])
                }
            }
        )*
    };
}

impl_to_value_for_tuples!(
    (T1),
    (T1, T2),
    (T1, T2, T3),
    (T1, T2, T3, T4),
    (T1, T2, T3, T4, T5),
    (T1, T2, T3, T4, T5, T6),
);

// =============================================================================
// From conversions
// =============================================================================

macro_rules! impl_from_for_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    value.to_value()
                }
            }
        )*
    };
}

impl_from_for_value!(bool, i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64, char, String, &str);

impl From<Vec<Self>> for Value {
    fn from(items: Vec<Self>) -> Self {
        Self::List(items)
    }
}

impl From<BTreeMap<String, Self>> for Value {
    fn from(entries: BTreeMap<String, Self>) -> Self {
        Self::Map(entries)
    }
}
