//! Structural equality over [`Value`] trees.

use super::Value;

/// Compares two values the way replayed effect calls are matched.
///
/// - Two composite values are equal when every own member of `left` is
///   structurally equal to the member with the same key in `right`. Members
///   that exist only in `right` are not inspected, so the relation is
///   asymmetric: an empty composite on the left equals any composite.
/// - `Null` on the right of a composite comparison acts as a composite with no
///   members, so an empty composite equals `Null` and a non-empty one does not.
/// - Two callables are always equal. Function identity is never compared,
///   only the data passed to it.
/// - Anything else uses strict equality. Integers and floats compare
///   numerically and `NaN` is never equal to itself.
///
/// # Examples
///
/// ```rust
/// use deferio::value::{Value, structurally_equal};
///
/// assert!(structurally_equal(&Value::callable("a"), &Value::callable("b")));
/// assert!(structurally_equal(&Value::List(vec![]), &Value::list([1, 2])));
/// assert!(!structurally_equal(&Value::from(1), &Value::from("1")));
/// ```
pub fn structurally_equal(left: &Value, right: &Value) -> bool {
    if left.is_composite() && (right.is_composite() || matches!(right, Value::Null)) {
        return left.members().into_iter().all(|(key, member)| {
            right
                .member(&key)
                .is_some_and(|other| structurally_equal(member, other))
        });
    }

    if left.is_callable() && right.is_callable() {
        return true;
    }

    strictly_equal(left, right)
}

#[allow(clippy::cast_precision_loss, clippy::float_cmp)]
fn strictly_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(left), Value::Bool(right)) => left == right,
        (Value::Integer(left), Value::Integer(right)) => left == right,
        (Value::Float(left), Value::Float(right)) => left == right,
        (Value::Integer(left), Value::Float(right)) | (Value::Float(right), Value::Integer(left)) => {
            *left as f64 == *right
        }
        (Value::Text(left), Value::Text(right)) => left == right,
        _ => false,
    }
}
