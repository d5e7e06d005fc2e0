//! Real execution of an `IO` tree.
//!
//! Execution is sequential and cooperative: the only suspension points are
//! the futures returned by effect calls. Every `run` is independent, so a
//! tree may be run many times (or from several tasks at once) and each run
//! invokes its effects again.

use std::future::IntoFuture;

use futures::FutureExt;
use futures::future::{self, BoxFuture};

use super::io::{IO, Node, Payload};

impl<A: Payload, E: Payload> IO<A, E> {
    /// Executes the tree, performing its effects.
    ///
    /// - `Pure` resolves immediately and `Raise` fails immediately.
    /// - An effect call runs the wrapped function and passes its result through.
    /// - `FlatMap` awaits its source; a failure skips the continuation.
    /// - `Catch` awaits its source; a failure is replaced by the handler's
    ///   computation.
    ///
    /// # Errors
    ///
    /// The future resolves to `Err` with the first failure that no enclosing
    /// `catch_error` absorbed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use deferio::effect::IO;
    /// use futures::executor::block_on;
    ///
    /// let io: IO<i32, String> = IO::raise("boom".to_string()).flat_map(|x: i32| IO::pure(x + 1));
    /// assert_eq!(block_on(io.run()), Err("boom".to_string()));
    /// ```
    pub fn run(&self) -> BoxFuture<'_, Result<A, E>> {
        match &self.node {
            Node::Pure(value) => future::ready(Ok(value.clone())).boxed(),
            Node::Raise(error) => future::ready(Err(error.clone())).boxed(),
            Node::EffectCall(call) => call.invoke(),
            Node::FlatMap(bound) => bound.run(),
            Node::Catch(recover) => async move {
                match recover.source.run().await {
                    Ok(value) => Ok(value),
                    Err(error) => {
                        tracing::debug!("recovering from failure");
                        let fallback = (recover.handler)(error);
                        fallback.run().await
                    }
                }
            }
            .boxed(),
        }
    }
}

impl<A: Payload, E: Payload> IntoFuture for IO<A, E> {
    type Output = Result<A, E>;
    type IntoFuture = BoxFuture<'static, Result<A, E>>;

    /// Consumes the tree and runs it, so an `IO` can be awaited directly.
    fn into_future(self) -> Self::IntoFuture {
        async move { self.run().await }.boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_run_catch_passes_value_through() {
        let io: IO<i32, String> = IO::pure(1).catch_error(|_| IO::pure(0));
        assert_eq!(block_on(io.run()), Ok(1));
    }

    #[test]
    fn test_run_catch_absorbs_failure() {
        let io: IO<i32, String> = IO::raise("e".to_string()).catch_error(|error| IO::pure(error.len() as i32));
        assert_eq!(block_on(io.run()), Ok(1));
    }

    #[test]
    fn test_run_catch_handler_may_fail() {
        let io: IO<i32, String> =
            IO::raise("first".to_string()).catch_error(|error| IO::raise(format!("{error} then second")));
        assert_eq!(block_on(io.run()), Err("first then second".to_string()));
    }

    #[test]
    fn test_into_future() {
        let io: IO<i32, String> = IO::pure(20).fmap(|x| x + 1);
        assert_eq!(block_on(io.into_future()), Ok(21));
    }
}
