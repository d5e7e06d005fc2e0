//! Error types for replay execution.
//!
//! These errors are never part of a computation's own failure channel `E`.
//! They report that a replay test itself was set up wrongly, or that an
//! assertion over its result failed, and they abort the replay walk.

use thiserror::Error;

/// Fatal outcome of replaying an `IO` against a [`ReplayList`](super::ReplayList).
///
/// # Examples
///
/// ```rust
/// use deferio::effect::ReplayError;
///
/// let error = ReplayError::Mismatch {
///     index: 0,
///     expected: "[9, 9]".to_string(),
///     actual: "[1, 2]".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "replay mismatch at entry 0: expected [9, 9] but saw [1, 2]"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    /// An effect call does not match the recorded call at the cursor.
    #[error("replay mismatch at entry {index}: expected {expected} but saw {actual}")]
    Mismatch {
        /// Cursor position of the recorded entry.
        index: usize,
        /// Rendering of the recorded call.
        expected: String,
        /// Rendering of the call that was reached.
        actual: String,
    },
    /// An effect call was reached after every recorded entry was consumed.
    #[error("replay exhausted at entry {index}: {actual} was reached but only {length} entries were recorded")]
    Exhausted {
        /// Cursor position that had no entry.
        index: usize,
        /// Number of recorded entries.
        length: usize,
        /// Rendering of the call that was reached.
        actual: String,
    },
    /// The recorded return does not have the type the effect produces.
    #[error("replay entry {index} records a {recorded} but the effect expects {required}")]
    ReturnType {
        /// Cursor position of the recorded entry.
        index: usize,
        /// Type name of the recorded value.
        recorded: &'static str,
        /// Type name the effect call requires.
        required: &'static str,
    },
    /// The replayed value differs from the expected result.
    #[error("value invalid, expected {expected} but saw {actual}")]
    Assertion {
        /// Rendering of the expected value.
        expected: String,
        /// Rendering of the produced value.
        actual: String,
    },
    /// The replayed error differs from the expected error.
    #[error("error invalid, expected {expected} but saw {actual}")]
    FailureAssertion {
        /// Rendering of the expected error.
        expected: String,
        /// Rendering of the produced error.
        actual: String,
    },
    /// A failure was expected but the computation produced a value.
    #[error("expected failure {expected} but the computation produced {actual}")]
    UnexpectedValue {
        /// Rendering of the expected error.
        expected: String,
        /// Rendering of the produced value.
        actual: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhausted_display() {
        let error = ReplayError::Exhausted {
            index: 2,
            length: 2,
            actual: "<fn save>(1)".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "replay exhausted at entry 2: <fn save>(1) was reached but only 2 entries were recorded"
        );
    }

    #[test]
    fn test_return_type_display() {
        let error = ReplayError::ReturnType {
            index: 0,
            recorded: "&str",
            required: "i32",
        };
        assert_eq!(
            error.to_string(),
            "replay entry 0 records a &str but the effect expects i32"
        );
    }

    #[test]
    fn test_assertion_display_names_both_values() {
        let error = ReplayError::Assertion {
            expected: "42".to_string(),
            actual: "41".to_string(),
        };
        assert_eq!(error.to_string(), "value invalid, expected 42 but saw 41");
    }

    #[test]
    fn test_errors_are_comparable() {
        let first = ReplayError::UnexpectedValue {
            expected: "\"boom\"".to_string(),
            actual: "1".to_string(),
        };
        assert_eq!(first.clone(), first);
        assert_ne!(
            first,
            ReplayError::FailureAssertion {
                expected: "\"boom\"".to_string(),
                actual: "1".to_string(),
            }
        );
    }
}
