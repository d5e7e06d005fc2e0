//! # deferio
//!
//! Deferred effect values that can be run for real or replayed against
//! recorded calls in tests.
//!
//! ## Overview
//!
//! An [`IO`](effect::IO) describes a computation that performs side effects
//! (I/O, network calls, failures) without performing them. Computations are
//! composed with `fmap`, `flat_map` and `catch_error`, and the finished value
//! is executed in one of two ways:
//!
//! - **run**: the effects happen and the result arrives as a future.
//! - **test**: the effects are replayed from a list of expected calls and
//!   their recorded returns, so effectful code can be unit tested
//!   deterministically.
//!
//! The crate contains:
//!
//! - [`effect`]: the `IO` type, its combinators, effect lifting and both drivers
//! - [`value`]: the structural values used to compare replayed calls
//!
//! ## Feature Flags
//!
//! - `serde`: project any `Serialize` type into a structural value
//! - `full`: enable all features
//!
//! ## Example
//!
//! ```rust
//! use deferio::prelude::*;
//!
//! fn fetch_user(id: u32) -> Result<String, String> {
//!     Ok(format!("user-{id}"))
//! }
//!
//! let io: IO<usize, String> = call(fetch_user, (1_u32,)).fmap(|name| name.len());
//!
//! let replay = ReplayList::new().record(&call(fetch_user, (1_u32,)), "ann".to_string());
//! assert!(test_io(&io, &replay, 3_usize).is_ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and functions.
///
/// # Usage
///
/// ```rust
/// use deferio::prelude::*;
/// ```
pub mod prelude {
    pub use crate::effect::*;
    pub use crate::value::{ToValue, Value, structurally_equal};
}

pub mod effect;
pub mod value;
