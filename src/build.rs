//! Building descriptors from scratch.
//!
//! Shorthands for the common shapes of sequence. Each returns a plain
//! [`Descriptor`]; nothing here adds runtime behavior beyond wiring the three
//! callbacks.

use crate::descriptor::Descriptor;
use crate::step::Step;

/// A sequence unfolded from a seed by a step function, with no cleanup beyond
/// dropping the state.
///
/// The seed is cloned once per traversal, so the descriptor stays reusable.
///
/// ```rust
/// use unfurl::{unfold, Step};
///
/// let collatz = unfold(27_u64, |n| {
///     if n == 1 {
///         Step::Halt(n)
///     } else if n % 2 == 0 {
///         Step::one(n, n / 2)
///     } else {
///         Step::one(n, 3 * n + 1)
///     }
/// });
///
/// let orbit = collatz.begin().to_list().unwrap();
/// assert_eq!(orbit.len(), 111);
/// assert_eq!(orbit[0], 27);
/// ```
pub fn unfold<S, T, F>(seed: S, step: F) -> Descriptor<S, T>
where
    S: Clone + Send + Sync + 'static,
    F: Fn(S) -> Step<T, S> + Send + Sync + 'static,
{
    Descriptor::new(move || seed.clone(), step, |_| {})
}

/// The endless sequence `seed, f(seed), f(f(seed)), ...`.
///
/// Never halts; bound it with [`take`](crate::Traversal::take) or
/// [`stop`](crate::Traversal::stop).
///
/// ```rust
/// use unfurl::iterate;
///
/// let powers = iterate(1_u64, |n| n * 2);
/// assert_eq!(powers.begin().take(5).unwrap(), vec![1, 2, 4, 8, 16]);
/// ```
pub fn iterate<S, F>(seed: S, f: F) -> Descriptor<S, S>
where
    S: Clone + Send + Sync + 'static,
    F: Fn(S) -> S + Send + Sync + 'static,
{
    unfold(seed, move |state| {
        let next = f(state.clone());
        Step::one(state, next)
    })
}

/// A finite sequence over prebuilt elements, emitted as a single batch.
///
/// ```rust
/// use unfurl::items;
///
/// let descriptor = items(vec!["a", "b", "c"]);
/// assert_eq!(descriptor.begin().to_list().unwrap(), vec!["a", "b", "c"]);
/// ```
pub fn items<T>(elements: Vec<T>) -> Descriptor<bool, T>
where
    T: Clone + Send + Sync + 'static,
{
    Descriptor::new(
        || false,
        move |emitted| {
            if emitted {
                Step::Halt(emitted)
            } else {
                Step::Emit(elements.clone(), true)
            }
        },
        |_| {},
    )
}

/// A sequence that halts immediately, producing nothing.
///
/// ```rust
/// use unfurl::empty;
///
/// let descriptor = empty::<String>();
/// assert!(descriptor.begin().to_list().unwrap().is_empty());
/// ```
pub fn empty<T>() -> Descriptor<(), T> {
    Descriptor::new(|| (), |state| Step::Halt(state), drop)
}
