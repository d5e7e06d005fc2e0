//! Deferred effects with real and replayed execution.
//!
//! This module provides [`IO`], a value describing a computation that may
//! perform side effects and may fail. Building and composing an `IO` never
//! runs anything. The same value can then be executed in two ways:
//!
//! - [`IO::run`] (or `.await`) performs the effects.
//! - [`IO::test`] replays the tree against a [`ReplayList`] of recorded
//!   effect calls, substituting recorded returns for real ones. This makes
//!   effectful code testable without mocks of the underlying services.
//!
//! # Construction
//!
//! - [`IO::pure`] / [`of`]: an already-computed value
//! - [`IO::raise`] / [`raise`]: an already-failed computation
//! - [`call`], [`call_async`], [`with_effects`], [`with_effects_async`]:
//!   lift a function call into an effect leaf
//!
//! # Composition
//!
//! - [`IO::fmap`] / [`map`]
//! - [`IO::flat_map`] / [`chain`] / [`flat_map`]
//! - [`IO::catch_error`] / [`catch_error`]
//!
//! # Examples
//!
//! ```rust
//! use deferio::effect::{IO, ReplayList, call, test_io};
//! use futures::executor::block_on;
//!
//! fn load_balance(account: u32) -> Result<i64, String> {
//!     Ok(i64::from(account) * 100)
//! }
//!
//! fn save_balance(account: u32, balance: i64) -> Result<(), String> {
//!     let _ = (account, balance);
//!     Ok(())
//! }
//!
//! fn deposit(account: u32, amount: i64) -> IO<i64, String> {
//!     call(load_balance, (account,)).flat_map(move |balance| {
//!         let updated = balance + amount;
//!         call(save_balance, (account, updated)).fmap(move |()| updated)
//!     })
//! }
//!
//! // Real execution
//! assert_eq!(block_on(deposit(7, 50).run()), Ok(750));
//!
//! // Replayed execution: no effect runs
//! let replay = ReplayList::new()
//!     .record(&call(load_balance, (7_u32,)), 10_i64)
//!     .record(&call(save_balance, (7_u32, 60_i64)), ());
//! assert!(test_io(&deposit(7, 50), &replay, 60).is_ok());
//! ```

mod assertion;
mod call;
mod error;
mod functions;
mod io;
mod replay;
mod run;

pub use assertion::{test_io, test_io_failure};
pub use call::{Arguments, AsyncEffect, Effect, call, call_async, with_effects, with_effects_async};
pub use error::ReplayError;
pub use functions::{catch_error, chain, flat_map, map, of, raise, run};
pub use io::{IO, NodeKind, Payload};
pub use replay::{Outcome, ReplayEntry, ReplayList};
