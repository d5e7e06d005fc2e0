//! Replay execution: walking an `IO` against recorded effect calls.
//!
//! A [`ReplayList`] holds, in order, the effect calls a computation is
//! expected to make together with the value (or failure) each call should
//! produce. [`IO::test`] walks the tree synchronously, threading a cursor
//! through the list: every `EffectCall` leaf is checked against the entry at
//! the cursor and the cursor then advances by one. No other node touches the
//! list, so a tree without effect calls ignores it entirely.
//!
//! # Examples
//!
//! ```rust
//! use deferio::effect::{IO, Outcome, ReplayList, call};
//!
//! fn fetch_price(_item: String) -> Result<u32, String> {
//!     unreachable!("never called during replay")
//! }
//!
//! let io: IO<u32, String> = call(fetch_price, ("apple".to_string(),)).fmap(|price| price * 2);
//!
//! let replay = ReplayList::new().record(&call(fetch_price, ("apple".to_string(),)), 21_u32);
//!
//! let (outcome, cursor) = io.test(&replay, 0).unwrap();
//! assert_eq!(outcome, Outcome::Value(42));
//! assert_eq!(cursor, 1);
//! ```

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use super::call::EffectCall;
use super::error::ReplayError;
use super::io::{IO, Node, Payload};
use crate::value::{Value, structurally_equal};

/// Terminal state of a replay walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome<A, E> {
    /// The computation produced a value.
    Value(A),
    /// The computation failed.
    Error(E),
}

impl<A, E> Outcome<A, E> {
    /// Returns `true` for [`Outcome::Value`].
    pub const fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Returns `true` for [`Outcome::Error`].
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Returns the produced value, if any.
    pub fn value(self) -> Option<A> {
        match self {
            Self::Value(value) => Some(value),
            Self::Error(_) => None,
        }
    }

    /// Returns the failure, if any.
    pub fn error(self) -> Option<E> {
        match self {
            Self::Value(_) => None,
            Self::Error(error) => Some(error),
        }
    }

    /// Converts into the `Result` that [`IO::run`] would resolve to.
    ///
    /// # Errors
    ///
    /// Returns `Err` for [`Outcome::Error`].
    pub fn into_result(self) -> Result<A, E> {
        match self {
            Self::Value(value) => Ok(value),
            Self::Error(error) => Err(error),
        }
    }
}

impl<A, E> From<Result<A, E>> for Outcome<A, E> {
    fn from(result: Result<A, E>) -> Self {
        match result {
            Ok(value) => Self::Value(value),
            Err(error) => Self::Error(error),
        }
    }
}

// =============================================================================
// ReplayEntry
// =============================================================================

#[derive(Clone)]
enum Recorded {
    Value(Arc<dyn Any + Send + Sync>),
    Error(Arc<dyn Any + Send + Sync>),
}

/// One recorded effect call and what it produces.
///
/// The expected call is kept only as its structural shape, so the entry can
/// be built from any `IO` regardless of its value and error types. Recorded
/// returns are type-erased and checked when the matching call is replayed.
#[derive(Clone)]
pub struct ReplayEntry {
    expected: Value,
    recorded: Recorded,
    recorded_type: &'static str,
}

impl ReplayEntry {
    /// Records that `expected` returns `value`.
    pub fn returns<B, F, T>(expected: &IO<B, F>, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            expected: expected.shape(),
            recorded: Recorded::Value(Arc::new(value)),
            recorded_type: type_name::<T>(),
        }
    }

    /// Records that `expected` fails with `error`.
    pub fn fails<B, F, T>(expected: &IO<B, F>, error: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            expected: expected.shape(),
            recorded: Recorded::Error(Arc::new(error)),
            recorded_type: type_name::<T>(),
        }
    }

    /// Returns the structural shape of the expected call.
    pub const fn expected(&self) -> &Value {
        &self.expected
    }

    /// Returns `true` when this entry records a failure.
    pub const fn is_failure(&self) -> bool {
        matches!(self.recorded, Recorded::Error(_))
    }

    fn outcome<A, E>(&self, index: usize) -> Result<Outcome<A, E>, ReplayError>
    where
        A: Clone + 'static,
        E: Clone + 'static,
    {
        let outcome = match &self.recorded {
            Recorded::Value(value) => value.downcast_ref::<A>().cloned().map(Outcome::Value),
            Recorded::Error(error) => error.downcast_ref::<E>().cloned().map(Outcome::Error),
        };
        outcome.ok_or_else(|| ReplayError::ReturnType {
            index,
            recorded: self.recorded_type,
            required: if self.is_failure() {
                type_name::<E>()
            } else {
                type_name::<A>()
            },
        })
    }
}

impl fmt::Debug for ReplayEntry {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ReplayEntry")
            .field("expected", &self.expected)
            .field("failure", &self.is_failure())
            .field("recorded_type", &self.recorded_type)
            .finish()
    }
}

// =============================================================================
// ReplayList
// =============================================================================

/// Ordered list of recorded effect calls.
///
/// The list is read-only while a walk is in progress; the cursor is threaded
/// through [`IO::test`] instead of being stored here.
#[derive(Debug, Clone, Default)]
pub struct ReplayList {
    entries: Vec<ReplayEntry>,
}

impl ReplayList {
    /// Creates an empty list.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends an entry recording that `expected` returns `value`.
    #[must_use]
    pub fn record<B, F, T>(mut self, expected: &IO<B, F>, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        self.entries.push(ReplayEntry::returns(expected, value));
        self
    }

    /// Appends an entry recording that `expected` fails with `error`.
    #[must_use]
    pub fn record_failure<B, F, T>(mut self, expected: &IO<B, F>, error: T) -> Self
    where
        T: Any + Send + Sync,
    {
        self.entries.push(ReplayEntry::fails(expected, error));
        self
    }

    /// Appends an entry.
    pub fn push(&mut self, entry: ReplayEntry) {
        self.entries.push(entry);
    }

    /// Returns the entry at `index`.
    pub fn get(&self, index: usize) -> Option<&ReplayEntry> {
        self.entries.get(index)
    }

    /// Returns the number of entries.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no entries were recorded.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the entries in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ReplayEntry> {
        self.entries.iter()
    }
}

impl From<Vec<ReplayEntry>> for ReplayList {
    fn from(entries: Vec<ReplayEntry>) -> Self {
        Self { entries }
    }
}

impl FromIterator<ReplayEntry> for ReplayList {
    fn from_iter<I: IntoIterator<Item = ReplayEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Extend<ReplayEntry> for ReplayList {
    fn extend<I: IntoIterator<Item = ReplayEntry>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl<'a> IntoIterator for &'a ReplayList {
    type Item = &'a ReplayEntry;
    type IntoIter = std::slice::Iter<'a, ReplayEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// Replay driver
// =============================================================================

impl<A: Payload, E: Payload> IO<A, E> {
    /// Walks this tree against `replay`, starting at `cursor`.
    ///
    /// Returns the outcome together with the cursor after the walk. No real
    /// effect is performed: each effect call is matched against the entry at
    /// the cursor and its recorded return is used instead.
    ///
    /// # Errors
    ///
    /// Returns a [`ReplayError`] when an effect call does not match its entry,
    /// when the list runs out, or when a recorded return has the wrong type.
    /// These abort the walk and are never routed through `catch_error`.
    pub fn test(&self, replay: &ReplayList, cursor: usize) -> Result<(Outcome<A, E>, usize), ReplayError> {
        match &self.node {
            Node::Pure(value) => Ok((Outcome::Value(value.clone()), cursor)),
            Node::Raise(error) => Ok((Outcome::Error(error.clone()), cursor)),
            Node::EffectCall(call) => call.replay(replay, cursor),
            Node::FlatMap(bound) => bound.test(replay, cursor),
            Node::Catch(recover) => {
                let (outcome, next_cursor) = recover.source.test(replay, cursor)?;
                match outcome {
                    Outcome::Value(value) => Ok((Outcome::Value(value), next_cursor)),
                    Outcome::Error(error) => (recover.handler)(error).test(replay, next_cursor),
                }
            }
        }
    }
}

impl<A: Payload, E: Payload> EffectCall<A, E> {
    fn replay(&self, replay: &ReplayList, cursor: usize) -> Result<(Outcome<A, E>, usize), ReplayError> {
        let Some(entry) = replay.get(cursor) else {
            return Err(ReplayError::Exhausted {
                index: cursor,
                length: replay.len(),
                actual: self.to_string(),
            });
        };

        let actual = self.shape();
        if !structurally_equal(&actual, entry.expected()) {
            return Err(ReplayError::Mismatch {
                index: cursor,
                expected: entry.expected().to_string(),
                actual: actual.to_string(),
            });
        }

        let outcome = entry.outcome(cursor)?;
        tracing::trace!(index = cursor, effect = %self, failure = entry.is_failure(), "replayed effect");
        Ok((outcome, cursor + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::call;

    fn add(left: i32, right: i32) -> Result<i32, String> {
        Ok(left + right)
    }

    #[test]
    fn test_pure_keeps_cursor() {
        let io: IO<i32, String> = IO::pure(1);
        let (outcome, cursor) = io.test(&ReplayList::new(), 3).unwrap();
        assert_eq!(outcome, Outcome::Value(1));
        assert_eq!(cursor, 3);
    }

    #[test]
    fn test_raise_keeps_cursor() {
        let io: IO<i32, String> = IO::raise("e".to_string());
        let (outcome, cursor) = io.test(&ReplayList::new(), 0).unwrap();
        assert_eq!(outcome, Outcome::Error("e".to_string()));
        assert_eq!(cursor, 0);
    }

    #[test]
    fn test_effect_call_consumes_one_entry() {
        let io: IO<i32, String> = call(add, (1, 2));
        let replay = ReplayList::new().record(&call(add, (1, 2)), 42);
        let (outcome, cursor) = io.test(&replay, 0).unwrap();
        assert_eq!(outcome, Outcome::Value(42));
        assert_eq!(cursor, 1);
    }

    #[test]
    fn test_recorded_failure_replays_as_error() {
        let io: IO<i32, String> = call(add, (1, 2));
        let replay = ReplayList::new().record_failure(&call(add, (1, 2)), "down".to_string());
        let (outcome, cursor) = io.test(&replay, 0).unwrap();
        assert_eq!(outcome, Outcome::Error("down".to_string()));
        assert_eq!(cursor, 1);
    }

    #[test]
    fn test_wrong_return_type_is_fatal() {
        let io: IO<i32, String> = call(add, (1, 2));
        let replay = ReplayList::new().record(&call(add, (1, 2)), "42");
        let error = io.test(&replay, 0).unwrap_err();
        assert_eq!(
            error,
            ReplayError::ReturnType {
                index: 0,
                recorded: "&str",
                required: "i32",
            }
        );
    }

    #[test]
    fn test_non_call_entry_never_matches() {
        let io: IO<i32, String> = call(add, (1, 2));
        let replay = ReplayList::new().record(&IO::<i32, String>::pure(3), 42);
        assert!(matches!(
            io.test(&replay, 0),
            Err(ReplayError::Mismatch { index: 0, .. })
        ));
    }

    #[test]
    fn test_outcome_conversions() {
        let outcome: Outcome<i32, String> = Ok(1).into();
        assert!(outcome.is_value());
        assert_eq!(outcome.clone().into_result(), Ok(1));
        assert_eq!(outcome.value(), Some(1));

        let failed: Outcome<i32, String> = Err("e".to_string()).into();
        assert!(failed.is_error());
        assert_eq!(failed.error(), Some("e".to_string()));
    }

    #[test]
    fn test_replay_list_collects_entries() {
        let expected: IO<i32, String> = call(add, (1, 2));
        let replay: ReplayList = vec![
            ReplayEntry::returns(&expected, 1),
            ReplayEntry::fails(&expected, "e".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(replay.len(), 2);
        assert!(!replay.is_empty());
        assert!(replay.get(1).is_some_and(ReplayEntry::is_failure));
        assert_eq!(replay.iter().count(), 2);
    }
}
