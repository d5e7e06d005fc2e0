//! Assertion helpers built on the replay driver.

use super::error::ReplayError;
use super::io::{IO, Payload};
use super::replay::{Outcome, ReplayList};
use crate::value::{ToValue, structurally_equal};

/// Replays `io` from the start of `replay` and checks the produced value.
///
/// The produced value is compared with `expected` using
/// [`structurally_equal`], with the produced value on the left.
///
/// When the replayed computation fails instead of producing a value, nothing
/// is compared and `Ok(())` is returned; a `warn` event records the skipped
/// check. Use [`test_io_failure`] to assert on the failure path.
///
/// # Errors
///
/// - Any [`ReplayError`] raised by the walk itself (mismatch, exhaustion,
///   wrong recorded type).
/// - [`ReplayError::Assertion`] when the value differs from `expected`.
///
/// # Examples
///
/// ```rust
/// use deferio::effect::{IO, ReplayList, call, test_io};
///
/// fn add(left: i32, right: i32) -> Result<i32, String> {
///     Ok(left + right)
/// }
///
/// let io: IO<i32, String> = call(add, (1, 2));
/// let replay = ReplayList::new().record(&call(add, (1, 2)), 42);
///
/// assert!(test_io(&io, &replay, 42).is_ok());
/// assert!(test_io(&io, &replay, 3).is_err());
/// ```
pub fn test_io<A, E, T>(io: &IO<A, E>, replay: &ReplayList, expected: T) -> Result<(), ReplayError>
where
    A: Payload + ToValue,
    E: Payload,
    T: ToValue,
{
    let (outcome, cursor) = io.test(replay, 0)?;
    match outcome {
        Outcome::Value(actual) => {
            let actual = actual.to_value();
            let expected = expected.to_value();
            if structurally_equal(&actual, &expected) {
                Ok(())
            } else {
                Err(ReplayError::Assertion {
                    expected: expected.to_string(),
                    actual: actual.to_string(),
                })
            }
        }
        Outcome::Error(_) => {
            tracing::warn!(
                consumed = cursor,
                "replayed computation failed; expected value was not compared"
            );
            Ok(())
        }
    }
}

/// Replays `io` from the start of `replay` and checks the produced failure.
///
/// # Errors
///
/// - Any [`ReplayError`] raised by the walk itself.
/// - [`ReplayError::UnexpectedValue`] when the computation produced a value.
/// - [`ReplayError::FailureAssertion`] when the failure differs from
///   `expected`.
///
/// # Examples
///
/// ```rust
/// use deferio::effect::{IO, ReplayList, test_io_failure};
///
/// let io: IO<i32, String> = IO::raise("boom".to_string());
/// assert!(test_io_failure(&io, &ReplayList::new(), "boom").is_ok());
/// ```
pub fn test_io_failure<A, E, T>(io: &IO<A, E>, replay: &ReplayList, expected: T) -> Result<(), ReplayError>
where
    A: Payload + ToValue,
    E: Payload + ToValue,
    T: ToValue,
{
    let (outcome, _) = io.test(replay, 0)?;
    let expected = expected.to_value();
    match outcome {
        Outcome::Value(actual) => Err(ReplayError::UnexpectedValue {
            expected: expected.to_string(),
            actual: actual.to_value().to_string(),
        }),
        Outcome::Error(actual) => {
            let actual = actual.to_value();
            if structurally_equal(&actual, &expected) {
                Ok(())
            } else {
                Err(ReplayError::FailureAssertion {
                    expected: expected.to_string(),
                    actual: actual.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_skips_failed_outcome() {
        let io: IO<i32, String> = IO::raise("boom".to_string());
        assert_eq!(test_io(&io, &ReplayList::new(), 42), Ok(()));
    }

    #[test]
    fn test_io_reports_both_values() {
        let io: IO<i32, String> = IO::pure(41);
        assert_eq!(
            test_io(&io, &ReplayList::new(), 42),
            Err(ReplayError::Assertion {
                expected: "42".to_string(),
                actual: "41".to_string(),
            })
        );
    }

    #[test]
    fn test_io_failure_rejects_value() {
        let io: IO<i32, String> = IO::pure(1);
        assert_eq!(
            test_io_failure(&io, &ReplayList::new(), "boom"),
            Err(ReplayError::UnexpectedValue {
                expected: "\"boom\"".to_string(),
                actual: "1".to_string(),
            })
        );
    }

    #[test]
    fn test_io_failure_compares_errors() {
        let io: IO<i32, String> = IO::raise("boom".to_string());
        assert!(matches!(
            test_io_failure(&io, &ReplayList::new(), "bang"),
            Err(ReplayError::FailureAssertion { .. })
        ));
    }
}
