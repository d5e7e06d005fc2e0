//! Effect lifting: turning ordinary functions into `EffectCall` leaves.
//!
//! An effect function together with its argument tuple is bound into a leaf
//! that is invoked only when the tree is run. The arguments are snapshotted
//! as structural [`Value`]s when the leaf is built, so a replay test can
//! compare them against the recorded call without running anything.
//!
//! All four constructors derive from a single binding primitive:
//!
//! | Constructor | Shape | Effect returns |
//! |-------------|-------|----------------|
//! | [`call`] | `call(f, args)` | `Result<A, E>` |
//! | [`call_async`] | `call_async(f, args)` | `impl Future<Output = Result<A, E>>` |
//! | [`with_effects`] | `with_effects(f)(args)` | `Result<A, E>` |
//! | [`with_effects_async`] | `with_effects_async(f)(args)` | `impl Future<Output = Result<A, E>>` |
//!
//! # Examples
//!
//! ```rust
//! use deferio::effect::{IO, call};
//! use futures::executor::block_on;
//!
//! fn add(left: i32, right: i32) -> Result<i32, String> {
//!     Ok(left + right)
//! }
//!
//! let io: IO<i32, String> = call(add, (1, 2));
//! assert_eq!(block_on(io.run()), Ok(3));
//! ```

use std::any::type_name;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

use super::io::{IO, Node, Payload};
use crate::value::{ToValue, Value};

// =============================================================================
// Traits
// =============================================================================

/// An argument tuple that can be bound into an effect call.
///
/// Implemented for tuples of up to six [`ToValue`] elements, including `()`.
pub trait Arguments: Clone + Send + Sync + 'static {
    /// Snapshots every argument as a structural value.
    fn to_values(&self) -> Vec<Value>;
}

/// A synchronous effect function taking the argument tuple `Args`.
///
/// Implemented for every `Fn(T1, ..., Tn) -> Result<A, E>` with `n <= 6`.
pub trait Effect<Args, A, E>: Send + Sync + 'static {
    /// Invokes the function with the unpacked arguments.
    ///
    /// # Errors
    ///
    /// Returns whatever failure the wrapped function returns.
    fn invoke(&self, arguments: Args) -> Result<A, E>;
}

/// An asynchronous effect function taking the argument tuple `Args`.
///
/// Implemented for every `Fn(T1, ..., Tn) -> Fut` where
/// `Fut: Future<Output = Result<A, E>> + Send + 'static` and `n <= 6`.
pub trait AsyncEffect<Args, A, E>: Send + Sync + 'static {
    /// Starts the function with the unpacked arguments.
    fn invoke(&self, arguments: Args) -> BoxFuture<'static, Result<A, E>>;
}

macro_rules! impl_effect_arities {
    ($(($($name:ident),*)),* $(,)?) => {
        $(
            impl<$($name,)*> Arguments for ($($name,)*)
            where
                $($name: ToValue + Clone + Send + Sync + 'static,)*
            {
                #[allow(non_snake_case, clippy::unused_unit)]
                fn to_values(&self) -> Vec<Value> {
                    let ($($name,)*) = self;
                    vec![$($name.to_value()),*]
                }
            }

            impl<Function, A, E, $($name,)*> Effect<($($name,)*), A, E> for Function
            where
                Function: Fn($($name),*) -> Result<A, E> + Send + Sync + 'static,
            {
                #[allow(non_snake_case)]
                fn invoke(&self, arguments: ($($name,)*)) -> Result<A, E> {
                    let ($($name,)*) = arguments;
                    (self)($($name),*)
                }
            }

            impl<Function, Output, A, E, $($name,)*> AsyncEffect<($($name,)*), A, E> for Function
            where
                Function: Fn($($name),*) -> Output + Send + Sync + 'static,
                Output: Future<Output = Result<A, E>> + Send + 'static,
            {
                #[allow(non_snake_case)]
                fn invoke(&self, arguments: ($($name,)*)) -> BoxFuture<'static, Result<A, E>> {
                    let ($($name,)*) = arguments;
                    (self)($($name),*).boxed()
                }
            }
        )*
    };
}

impl_effect_arities!(
    (),
    (T1),
    (T1, T2),
    (T1, T2, T3),
    (T1, T2, T3, T4),
    (T1, T2, T3, T4, T5),
    (T1, T2, T3, T4, T5, T6),
);

// =============================================================================
// EffectCall leaf
// =============================================================================

type Invoke<A, E> = Arc<dyn Fn() -> BoxFuture<'static, Result<A, E>> + Send + Sync>;

/// The `EffectCall` node: one external invocation with bound arguments.
pub(super) struct EffectCall<A, E> {
    label: &'static str,
    arguments: Vec<Value>,
    invoke: Invoke<A, E>,
}

impl<A, E> EffectCall<A, E> {
    /// Starts the underlying effect.
    pub(super) fn invoke(&self) -> BoxFuture<'static, Result<A, E>> {
        tracing::debug!(effect = self.label, arguments = ?self.arguments, "invoking effect");
        (self.invoke)()
    }

    /// `{arguments: [...], effect: <fn label>}`.
    pub(super) fn shape(&self) -> Value {
        Value::map([
            ("effect", Value::callable(self.label)),
            ("arguments", Value::List(self.arguments.clone())),
        ])
    }
}

impl<A, E> Clone for EffectCall<A, E> {
    fn clone(&self) -> Self {
        Self {
            label: self.label,
            arguments: self.arguments.clone(),
            invoke: Arc::clone(&self.invoke),
        }
    }
}

impl<A, E> fmt::Display for EffectCall<A, E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}(", self.label)?;
        for (index, argument) in self.arguments.iter().enumerate() {
            if index > 0 {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{argument}")?;
        }
        write!(formatter, ")")
    }
}

/// Binds an invoker and its arguments into an `EffectCall` leaf.
fn bind<Args, A, E, F>(label: &'static str, arguments: Args, invoke: F) -> IO<A, E>
where
    Args: Arguments,
    F: Fn(Args) -> BoxFuture<'static, Result<A, E>> + Send + Sync + 'static,
{
    let snapshot = arguments.to_values();
    IO::from_node(Node::EffectCall(EffectCall {
        label,
        arguments: snapshot,
        invoke: Arc::new(move || invoke(arguments.clone())),
    }))
}

fn lift<F, Args, A, E>(effect: Arc<F>, arguments: Args) -> IO<A, E>
where
    F: Effect<Args, A, E>,
    Args: Arguments,
    A: Payload,
    E: Payload,
{
    bind(type_name::<F>(), arguments, move |arguments| {
        let effect = Arc::clone(&effect);
        async move { Effect::invoke(&*effect, arguments) }.boxed()
    })
}

fn lift_async<F, Args, A, E>(effect: Arc<F>, arguments: Args) -> IO<A, E>
where
    F: AsyncEffect<Args, A, E>,
    Args: Arguments,
    A: Payload,
    E: Payload,
{
    bind(type_name::<F>(), arguments, move |arguments| {
        AsyncEffect::invoke(&*effect, arguments)
    })
}

// =============================================================================
// Public constructors
// =============================================================================

/// Lifts a synchronous function call into an `EffectCall` leaf.
///
/// The function is not called until the returned `IO` is run.
///
/// # Examples
///
/// ```rust
/// use deferio::effect::{IO, call};
/// use futures::executor::block_on;
///
/// fn greet(name: String) -> Result<String, String> {
///     Ok(format!("hello {name}"))
/// }
///
/// let io: IO<String, String> = call(greet, ("ann".to_string(),));
/// assert_eq!(block_on(io.run()), Ok("hello ann".to_string()));
/// ```
pub fn call<F, Args, A, E>(effect: F, arguments: Args) -> IO<A, E>
where
    F: Effect<Args, A, E>,
    Args: Arguments,
    A: Payload,
    E: Payload,
{
    lift(Arc::new(effect), arguments)
}

/// Lifts an asynchronous function call into an `EffectCall` leaf.
///
/// # Examples
///
/// ```rust
/// use deferio::effect::{IO, call_async};
/// use futures::executor::block_on;
///
/// async fn double(value: i32) -> Result<i32, String> {
///     Ok(value * 2)
/// }
///
/// let io: IO<i32, String> = call_async(double, (21,));
/// assert_eq!(block_on(io.run()), Ok(42));
/// ```
pub fn call_async<F, Args, A, E>(effect: F, arguments: Args) -> IO<A, E>
where
    F: AsyncEffect<Args, A, E>,
    Args: Arguments,
    A: Payload,
    E: Payload,
{
    lift_async(Arc::new(effect), arguments)
}

/// Curried form of [`call`]: returns a factory that builds a leaf per call.
///
/// # Examples
///
/// ```rust
/// use deferio::effect::{IO, with_effects};
/// use futures::executor::block_on;
///
/// fn add(left: i32, right: i32) -> Result<i32, String> {
///     Ok(left + right)
/// }
///
/// let add_io = with_effects(add);
/// let io: IO<i32, String> = add_io((2, 3));
/// assert_eq!(block_on(io.run()), Ok(5));
/// ```
pub fn with_effects<F, Args, A, E>(effect: F) -> impl Fn(Args) -> IO<A, E> + Clone + Send + Sync + 'static
where
    F: Effect<Args, A, E>,
    Args: Arguments,
    A: Payload,
    E: Payload,
{
    let effect = Arc::new(effect);
    move |arguments| lift(Arc::clone(&effect), arguments)
}

/// Curried form of [`call_async`].
pub fn with_effects_async<F, Args, A, E>(effect: F) -> impl Fn(Args) -> IO<A, E> + Clone + Send + Sync + 'static
where
    F: AsyncEffect<Args, A, E>,
    Args: Arguments,
    A: Payload,
    E: Payload,
{
    let effect = Arc::new(effect);
    move |arguments| lift_async(Arc::clone(&effect), arguments)
}
