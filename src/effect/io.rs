//! IO - a deferred computation described as an immutable tree.
//!
//! An `IO<A, E>` describes a computation that eventually produces an `A` or
//! fails with an `E`. Building one never performs an effect: the combinators
//! only allocate new nodes that refer to existing ones. The tree is executed
//! later by one of two drivers:
//!
//! - [`IO::run`] performs the effects for real and yields a future.
//! - [`IO::test`] walks the same tree against a [`ReplayList`] and substitutes
//!   recorded returns for every effect call.
//!
//! # Node Variants
//!
//! ```text
//! IO<A, E> = Pure(A)
//!          | FlatMap(IO<S, E>, S -> IO<A, E>)
//!          | EffectCall(effect, arguments)
//!          | Raise(E)
//!          | Catch(IO<A, E>, E -> IO<A, E>)
//! ```
//!
//! # Examples
//!
//! ```rust
//! use deferio::effect::IO;
//! use futures::executor::block_on;
//!
//! let io: IO<i32, String> = IO::pure(10)
//!     .fmap(|x| x * 2)
//!     .flat_map(|x| IO::pure(x + 1));
//!
//! assert_eq!(block_on(io.run()), Ok(21));
//! ```

use std::fmt;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use static_assertions::assert_impl_all;

use super::call::EffectCall;
use super::error::ReplayError;
use super::replay::{Outcome, ReplayList};
use crate::value::Value;

/// Bound shared by values and errors carried through an [`IO`].
///
/// A tree can be run any number of times and from any thread, so its pure
/// values and raised errors are cloned on every execution.
pub trait Payload: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Payload for T {}

/// A deferred computation producing `A` or failing with `E`.
///
/// `IO` is immutable: combinators take `self` and return a new tree that
/// shares the old one. Cloning is cheap apart from cloning a top-level pure
/// value or raised error.
///
/// # Laws
///
/// 1. **Left Identity**: `IO::pure(a).flat_map(f) == f(a)`
/// 2. **Right Identity**: `m.flat_map(IO::pure) == m`
/// 3. **Associativity**: `m.flat_map(f).flat_map(g) == m.flat_map(|x| f(x).flat_map(g))`
/// 4. **Short-circuit**: `IO::raise(e).flat_map(f) == IO::raise(e)`
/// 5. **Absorption**: `IO::raise(e).catch_error(h) == h(e)`
pub struct IO<A, E> {
    pub(super) node: Node<A, E>,
}

/// The closed set of node variants.
pub(super) enum Node<A, E> {
    Pure(A),
    FlatMap(Arc<dyn Continue<A, E>>),
    EffectCall(EffectCall<A, E>),
    Raise(E),
    Catch(Arc<Recover<A, E>>),
}

/// Outermost variant of an [`IO`] tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// An already-resolved value.
    Pure,
    /// A computation followed by a continuation.
    FlatMap,
    /// A single external effect with bound arguments.
    EffectCall,
    /// An already-failed computation.
    Raise,
    /// A computation with a recovery handler attached.
    Catch,
}

impl NodeKind {
    /// Returns the snake case name of the variant.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pure => "pure",
            Self::FlatMap => "flat_map",
            Self::EffectCall => "effect_call",
            Self::Raise => "raise",
            Self::Catch => "catch",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

// =============================================================================
// FlatMap and Catch payloads
// =============================================================================

/// A `FlatMap` node with its intermediate type hidden.
pub(super) trait Continue<B, E>: Send + Sync {
    fn run(&self) -> BoxFuture<'_, Result<B, E>>;

    fn test(&self, replay: &ReplayList, cursor: usize) -> Result<(Outcome<B, E>, usize), ReplayError>;
}

struct Bound<S, E, F> {
    source: IO<S, E>,
    continuation: F,
}

impl<S, B, E, F> Continue<B, E> for Bound<S, E, F>
where
    S: Payload,
    B: Payload,
    E: Payload,
    F: Fn(S) -> IO<B, E> + Send + Sync + 'static,
{
    fn run(&self) -> BoxFuture<'_, Result<B, E>> {
        async move {
            let value = self.source.run().await?;
            let next = (self.continuation)(value);
            next.run().await
        }
        .boxed()
    }

    fn test(&self, replay: &ReplayList, cursor: usize) -> Result<(Outcome<B, E>, usize), ReplayError> {
        let (outcome, next_cursor) = self.source.test(replay, cursor)?;
        match outcome {
            Outcome::Value(value) => (self.continuation)(value).test(replay, next_cursor),
            Outcome::Error(error) => Ok((Outcome::Error(error), next_cursor)),
        }
    }
}

/// A `Catch` node.
pub(super) struct Recover<A, E> {
    pub(super) source: IO<A, E>,
    pub(super) handler: Box<dyn Fn(E) -> IO<A, E> + Send + Sync>,
}

// =============================================================================
// Construction and composition
// =============================================================================

impl<A, E> IO<A, E> {
    pub(super) const fn from_node(node: Node<A, E>) -> Self {
        Self { node }
    }

    /// Returns the outermost variant of this tree.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use deferio::effect::{IO, NodeKind};
    ///
    /// let io: IO<i32, String> = IO::pure(1).fmap(|x| x + 1);
    /// assert_eq!(io.kind(), NodeKind::FlatMap);
    /// ```
    pub const fn kind(&self) -> NodeKind {
        match &self.node {
            Node::Pure(_) => NodeKind::Pure,
            Node::FlatMap(_) => NodeKind::FlatMap,
            Node::EffectCall(_) => NodeKind::EffectCall,
            Node::Raise(_) => NodeKind::Raise,
            Node::Catch(_) => NodeKind::Catch,
        }
    }

    /// Returns the structural view used to match effect calls during replay.
    ///
    /// An effect call projects to `{arguments: [...], effect: <fn name>}`.
    /// Every other node projects to `{node: "<kind>"}`, which never matches an
    /// effect call.
    pub fn shape(&self) -> Value {
        match &self.node {
            Node::EffectCall(call) => call.shape(),
            _ => Value::map([("node", self.kind().name())]),
        }
    }
}

impl<A: Payload, E: Payload> IO<A, E> {
    /// Wraps an already-computed value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use deferio::effect::IO;
    /// use futures::executor::block_on;
    ///
    /// let io: IO<i32, String> = IO::pure(42);
    /// assert_eq!(block_on(io.run()), Ok(42));
    /// ```
    pub const fn pure(value: A) -> Self {
        Self::from_node(Node::Pure(value))
    }

    /// Alias for [`IO::pure`].
    pub const fn of(value: A) -> Self {
        Self::pure(value)
    }

    /// Builds an already-failed computation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use deferio::effect::IO;
    /// use futures::executor::block_on;
    ///
    /// let io: IO<i32, String> = IO::raise("boom".to_string());
    /// assert_eq!(block_on(io.run()), Err("boom".to_string()));
    /// ```
    pub const fn raise(error: E) -> Self {
        Self::from_node(Node::Raise(error))
    }

    /// Sequences this computation with a continuation.
    ///
    /// The continuation is only called once this computation has produced a
    /// value. A failure skips it entirely.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use deferio::effect::IO;
    /// use futures::executor::block_on;
    ///
    /// let io: IO<i32, String> = IO::pure(10).flat_map(|x| IO::pure(x * 2));
    /// assert_eq!(block_on(io.run()), Ok(20));
    /// ```
    pub fn flat_map<B, F>(self, function: F) -> IO<B, E>
    where
        B: Payload,
        F: Fn(A) -> IO<B, E> + Send + Sync + 'static,
    {
        IO::from_node(Node::FlatMap(Arc::new(Bound {
            source: self,
            continuation: function,
        })))
    }

    /// Alias for [`IO::flat_map`].
    pub fn chain<B, F>(self, function: F) -> IO<B, E>
    where
        B: Payload,
        F: Fn(A) -> IO<B, E> + Send + Sync + 'static,
    {
        self.flat_map(function)
    }

    /// Alias for [`IO::flat_map`].
    pub fn and_then<B, F>(self, function: F) -> IO<B, E>
    where
        B: Payload,
        F: Fn(A) -> IO<B, E> + Send + Sync + 'static,
    {
        self.flat_map(function)
    }

    /// Transforms the produced value.
    ///
    /// Equivalent to `flat_map(|a| IO::pure(function(a)))`; failures pass
    /// through untouched.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use deferio::effect::IO;
    /// use futures::executor::block_on;
    ///
    /// let io: IO<i32, String> = IO::pure(21).fmap(|x| x * 2);
    /// assert_eq!(block_on(io.run()), Ok(42));
    /// ```
    pub fn fmap<B, F>(self, function: F) -> IO<B, E>
    where
        B: Payload,
        F: Fn(A) -> B + Send + Sync + 'static,
    {
        self.flat_map(move |value| IO::pure(function(value)))
    }

    /// Alias for [`IO::fmap`].
    pub fn map<B, F>(self, function: F) -> IO<B, E>
    where
        B: Payload,
        F: Fn(A) -> B + Send + Sync + 'static,
    {
        self.fmap(function)
    }

    /// Sequences two computations, discarding the value of the first.
    pub fn then<B>(self, next: IO<B, E>) -> IO<B, E>
    where
        B: Payload,
    {
        self.flat_map(move |_| next.clone())
    }

    /// Runs `other` after this computation and combines both values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use deferio::effect::IO;
    /// use futures::executor::block_on;
    ///
    /// let io: IO<i32, String> = IO::pure(10).map2(IO::pure(20), |a, b| a + b);
    /// assert_eq!(block_on(io.run()), Ok(30));
    /// ```
    pub fn map2<B, C, F>(self, other: IO<B, E>, function: F) -> IO<C, E>
    where
        B: Payload,
        C: Payload,
        F: Fn(A, B) -> C + Send + Sync + 'static,
    {
        let function = Arc::new(function);
        self.flat_map(move |first| {
            let function = Arc::clone(&function);
            other
                .clone()
                .fmap(move |second| function(first.clone(), second))
        })
    }

    /// Runs `other` after this computation and pairs both values.
    pub fn product<B>(self, other: IO<B, E>) -> IO<(A, B), E>
    where
        B: Payload,
    {
        self.map2(other, |first, second| (first, second))
    }

    /// Attaches a recovery handler.
    ///
    /// When this computation fails with `e`, the result of `handler(e)` is
    /// used instead. The failure does not propagate further unless the
    /// handler's computation fails too.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use deferio::effect::IO;
    /// use futures::executor::block_on;
    ///
    /// let io: IO<usize, String> = IO::raise("boom".to_string())
    ///     .catch_error(|error: String| IO::pure(error.len()));
    /// assert_eq!(block_on(io.run()), Ok(4));
    /// ```
    pub fn catch_error<F>(self, handler: F) -> Self
    where
        F: Fn(E) -> Self + Send + Sync + 'static,
    {
        Self::from_node(Node::Catch(Arc::new(Recover {
            source: self,
            handler: Box::new(handler),
        })))
    }
}

// =============================================================================
// Trait implementations
// =============================================================================

impl<A: Clone, E: Clone> Clone for IO<A, E> {
    fn clone(&self) -> Self {
        let node = match &self.node {
            Node::Pure(value) => Node::Pure(value.clone()),
            Node::FlatMap(bound) => Node::FlatMap(Arc::clone(bound)),
            Node::EffectCall(call) => Node::EffectCall(call.clone()),
            Node::Raise(error) => Node::Raise(error.clone()),
            Node::Catch(recover) => Node::Catch(Arc::clone(recover)),
        };
        Self { node }
    }
}

impl<A, E> fmt::Debug for IO<A, E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("IO")
            .field("kind", &self.kind())
            .finish_non_exhaustive()
    }
}

impl<A, E> fmt::Display for IO<A, E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node {
            Node::EffectCall(call) => write!(formatter, "<IO::{} {call}>", self.kind()),
            _ => write!(formatter, "<IO::{}>", self.kind()),
        }
    }
}

assert_impl_all!(IO<i32, String>: Send, Sync, Clone);
