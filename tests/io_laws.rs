//! Property-based tests for IO laws.
//!
//! This module verifies that both drivers agree with the algebraic laws:
//! - Functor Identity: fmap(id) == id
//! - Left Identity: pure(a).flat_map(f) == f(a)
//! - Associativity: m.flat_map(f).flat_map(g) == m.flat_map(|x| f(x).flat_map(g))
//! - Short-circuit: raise(e).flat_map(f) == raise(e), f never called
//! - Map failure: map(f, raise(e)) == raise(e), f never called
//! - Catch absorption: raise(e).catch_error(h) == h(e)

use deferio::effect::{IO, Outcome, ReplayList, call, catch_error, chain, map, of, raise};
use futures::executor::block_on;
use proptest::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn increment(value: i32) -> Result<i32, String> {
    Ok(value.wrapping_add(1))
}

fn replay_value<A, E>(io: &IO<A, E>) -> Outcome<A, E>
where
    A: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    io.test(&ReplayList::new(), 0).expect("tree without effect calls").0
}

// =============================================================================
// Functor and Monad Laws
// =============================================================================

proptest! {
    /// Identity Law: run(map(x => x, of(a))) resolves to a.
    #[test]
    fn prop_io_functor_identity(value: i32) {
        let io: IO<i32, String> = map(|x| x, of(value));

        prop_assert_eq!(block_on(io.run()), Ok(value));
        prop_assert_eq!(replay_value(&io), Outcome::Value(value));
    }

    /// Left Identity Law: pure(a).flat_map(f) == f(a)
    #[test]
    fn prop_io_left_identity(value: i32) {
        let function = |n: i32| IO::<i32, String>::pure(n.wrapping_mul(2));

        let left_result = block_on(IO::pure(value).flat_map(function).run());
        let right_result = block_on(function(value).run());

        prop_assert_eq!(left_result, right_result);
    }

    /// Right Identity Law: m.flat_map(pure) == m
    #[test]
    fn prop_io_right_identity(value: i32) {
        let io: IO<i32, String> = IO::pure(value).flat_map(IO::pure);
        prop_assert_eq!(block_on(io.run()), Ok(value));
    }

    /// Sequencing Law: chain(g, chain(f, of(a))) == chain(x => chain(g, f(x)), of(a))
    #[test]
    fn prop_io_associativity(value: i32) {
        let function1 = |n: i32| -> IO<i32, String> { of(n.wrapping_add(1)) };
        let function2 = |n: i32| -> IO<i32, String> { of(n.wrapping_mul(2)) };

        let left = chain(function2, chain(function1, of(value)));
        let right = chain(move |x| chain(function2, function1(x)), of(value));

        prop_assert_eq!(block_on(left.run()), block_on(right.run()));
        prop_assert_eq!(replay_value(&left), replay_value(&right));
    }

    /// Associativity holds with effect calls too, and both sides consume the
    /// same replay entries.
    #[test]
    fn prop_io_associativity_with_effects(value: i32, recorded: i32) {
        let function1 = |n: i32| call(increment, (n,));
        let function2 = |n: i32| -> IO<i32, String> { of(n.wrapping_mul(3)) };

        let left = call(increment, (value,)).flat_map(function1).flat_map(function2);
        let right = call(increment, (value,)).flat_map(move |x| function1(x).flat_map(function2));

        prop_assert_eq!(block_on(left.run()), block_on(right.run()));

        let replay = ReplayList::new()
            .record(&call(increment, (value,)), recorded)
            .record(&call(increment, (recorded,)), recorded);
        prop_assert_eq!(left.test(&replay, 0), right.test(&replay, 0));
    }
}

// =============================================================================
// Error Laws
// =============================================================================

proptest! {
    /// Short-circuit Law: the continuation of a failure is never called.
    #[test]
    fn prop_io_short_circuit(error: String, value: i32) {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);

        let io: IO<i32, String> = chain(
            move |x: i32| {
                calls_clone.fetch_add(1, Ordering::SeqCst);
                of(x.wrapping_add(value))
            },
            raise(error.clone()),
        );

        prop_assert_eq!(block_on(io.run()), Err(error.clone()));
        prop_assert_eq!(replay_value(&io), Outcome::Error(error));
        prop_assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    /// Map Failure Law: map(f, raise(e)) == raise(e), f never called
    #[test]
    fn prop_io_map_preserves_failure(error: String) {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);

        let io: IO<i32, String> = map(
            move |x: i32| {
                calls_clone.fetch_add(1, Ordering::SeqCst);
                x.wrapping_add(1)
            },
            raise(error.clone()),
        );

        prop_assert_eq!(block_on(io.run()), Err(error.clone()));
        prop_assert_eq!(replay_value(&io), Outcome::Error(error));
        prop_assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    /// Catch Absorption Law: catch_error(h, raise(e)) == h(e)
    #[test]
    fn prop_io_catch_absorption(error: String) {
        let handler = |e: String| -> IO<usize, String> { of(e.len()) };

        let caught = catch_error(handler, raise(error.clone()));

        prop_assert_eq!(block_on(caught.run()), block_on(handler(error.clone()).run()));
        prop_assert_eq!(replay_value(&caught), replay_value(&handler(error)));
    }

    /// Catch Pure Law: catch_error(h, pure(a)) == pure(a)
    #[test]
    fn prop_io_catch_pure(value: i32) {
        let io: IO<i32, String> = catch_error(|_| of(0), of(value));
        prop_assert_eq!(block_on(io.run()), Ok(value));
    }
}
