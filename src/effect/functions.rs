//! Free-function forms of the `IO` constructors and combinators.
//!
//! These take the function first and the computation last, which reads well
//! when building pipelines:
//!
//! ```rust
//! use deferio::effect::{chain, map, of, run};
//! use deferio::effect::IO;
//! use futures::executor::block_on;
//!
//! let io: IO<i32, String> = chain(|x| of(x + 1), map(|x: i32| x * 2, of(20)));
//! assert_eq!(block_on(run(&io)), Ok(41));
//! ```

use futures::future::BoxFuture;

use super::io::{IO, Payload};

/// Wraps an already-computed value. Same as [`IO::pure`].
pub const fn of<A: Payload, E: Payload>(value: A) -> IO<A, E> {
    IO::pure(value)
}

/// Builds an already-failed computation. Same as [`IO::raise`].
pub const fn raise<A: Payload, E: Payload>(error: E) -> IO<A, E> {
    IO::raise(error)
}

/// Transforms the value of `io`. Same as [`IO::fmap`].
pub fn map<A, B, E, F>(function: F, io: IO<A, E>) -> IO<B, E>
where
    A: Payload,
    B: Payload,
    E: Payload,
    F: Fn(A) -> B + Send + Sync + 'static,
{
    io.fmap(function)
}

/// Sequences `io` with a continuation. Same as [`IO::flat_map`].
pub fn chain<A, B, E, F>(function: F, io: IO<A, E>) -> IO<B, E>
where
    A: Payload,
    B: Payload,
    E: Payload,
    F: Fn(A) -> IO<B, E> + Send + Sync + 'static,
{
    io.flat_map(function)
}

/// Alias for [`chain`].
pub fn flat_map<A, B, E, F>(function: F, io: IO<A, E>) -> IO<B, E>
where
    A: Payload,
    B: Payload,
    E: Payload,
    F: Fn(A) -> IO<B, E> + Send + Sync + 'static,
{
    io.flat_map(function)
}

/// Attaches a recovery handler to `io`. Same as [`IO::catch_error`].
pub fn catch_error<A, E, F>(handler: F, io: IO<A, E>) -> IO<A, E>
where
    A: Payload,
    E: Payload,
    F: Fn(E) -> IO<A, E> + Send + Sync + 'static,
{
    io.catch_error(handler)
}

/// Runs `io`, performing its effects. Same as [`IO::run`].
pub fn run<A: Payload, E: Payload>(io: &IO<A, E>) -> BoxFuture<'_, Result<A, E>> {
    io.run()
}
