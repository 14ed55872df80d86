//! Descriptors: the immutable callback triple that defines one sequence.
//!
//! A [`Descriptor`] bundles an initializer, a step, and a finalizer. Creating
//! one has no side effects; no callback runs until a traversal demands its
//! first element. Descriptors are stateless factories: the stateful unit is
//! the [`Traversal`](crate::Traversal), and the same descriptor can be begun
//! any number of times, each traversal fully independent.

use std::fmt;
use std::sync::Arc;

use crate::error::{Fault, ProtocolError, StepError};
use crate::step::Step;
use crate::traversal::Traversal;

pub(crate) type InitFn<S> = Arc<dyn Fn() -> Result<S, Fault> + Send + Sync>;
pub(crate) type StepFn<S, T> = Arc<dyn Fn(S) -> Result<Step<T, S>, StepError<S>> + Send + Sync>;
pub(crate) type FinalizeFn<S> = Arc<dyn Fn(S) -> Result<(), Fault> + Send + Sync>;

/// An immutable triple of callbacks defining one sequence's behavior.
///
/// - `initializer: () -> S` produces the starting state, invoked lazily on
///   first demand, at most once per traversal.
/// - `step: (S) -> Step<T, S>` produces one batch and the next state, or
///   halts with the final state.
/// - `finalizer: (S)` releases whatever the state holds; it runs exactly once
///   per traversal that acquired a state, on every termination path.
///
/// Cloning a descriptor is cheap (the callbacks are shared), and a descriptor
/// is `Send + Sync` whenever its callbacks are, so independent traversals may
/// run on independent threads.
///
/// # Examples
///
/// ```rust
/// use unfurl::{Descriptor, Step};
///
/// let countdown = Descriptor::new(
///     || 3_u32,
///     |n| if n > 0 { Step::one(n, n - 1) } else { Step::Halt(n) },
///     |_final_state| {},
/// );
///
/// assert_eq!(countdown.begin().to_list().unwrap(), vec![3, 2, 1]);
/// // The descriptor is reusable; each traversal is independent.
/// assert_eq!(countdown.begin().to_list().unwrap(), vec![3, 2, 1]);
/// ```
pub struct Descriptor<S, T> {
    pub(crate) init: InitFn<S>,
    pub(crate) step: StepFn<S, T>,
    pub(crate) finalize: FinalizeFn<S>,
}

impl<S, T> Clone for Descriptor<S, T> {
    fn clone(&self) -> Self {
        Self {
            init: Arc::clone(&self.init),
            step: Arc::clone(&self.step),
            finalize: Arc::clone(&self.finalize),
        }
    }
}

impl<S, T> fmt::Debug for Descriptor<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor").finish_non_exhaustive()
    }
}

impl<S, T> Descriptor<S, T> {
    /// Builds a descriptor from three infallible callbacks.
    ///
    /// All three callbacks are present by construction, so this cannot fail.
    /// For fallible callbacks, or to omit the finalizer, use [`builder`].
    ///
    /// [`builder`]: Descriptor::builder
    pub fn new<I, F, C>(initializer: I, step: F, finalizer: C) -> Self
    where
        I: Fn() -> S + Send + Sync + 'static,
        F: Fn(S) -> Step<T, S> + Send + Sync + 'static,
        C: Fn(S) + Send + Sync + 'static,
    {
        Self {
            init: Arc::new(move || Ok(initializer())),
            step: Arc::new(move |state| Ok(step(state))),
            finalize: Arc::new(move |state| {
                finalizer(state);
                Ok(())
            }),
        }
    }

    /// Starts building a descriptor piece by piece.
    ///
    /// The builder accepts fallible callback variants and validates at
    /// [`build`](DescriptorBuilder::build) that an initializer and a step were
    /// supplied, surfacing a [`ProtocolError`] before any traversal exists.
    pub fn builder() -> DescriptorBuilder<S, T> {
        DescriptorBuilder::default()
    }

    /// Begins a fresh traversal of this descriptor.
    ///
    /// The traversal starts in [`Phase::NotStarted`](crate::Phase::NotStarted);
    /// no callback is invoked until the first [`pull`](Traversal::pull).
    pub fn begin(&self) -> Traversal<S, T> {
        Traversal::new(self.clone())
    }
}

/// Builder for [`Descriptor`], with construction-time validation.
///
/// The finalizer may be omitted; the default is the identity pass-through
/// (the terminal state is dropped and nothing else runs). Omitting the
/// initializer or the step is a [`ProtocolError`] at [`build`].
///
/// [`build`]: DescriptorBuilder::build
///
/// # Examples
///
/// ```rust
/// use unfurl::{Descriptor, Step, StepError};
///
/// let descriptor: Descriptor<u32, u32> = Descriptor::builder()
///     .initializer(|| 0)
///     .try_step(|n| {
///         if n < 1_000 {
///             Ok(Step::one(n, n + 1))
///         } else {
///             Err(StepError::new(n, "counter overflow"))
///         }
///     })
///     .build()
///     .unwrap();
/// ```
pub struct DescriptorBuilder<S, T> {
    init: Option<InitFn<S>>,
    step: Option<StepFn<S, T>>,
    finalize: Option<FinalizeFn<S>>,
}

impl<S, T> Default for DescriptorBuilder<S, T> {
    fn default() -> Self {
        Self {
            init: None,
            step: None,
            finalize: None,
        }
    }
}

impl<S, T> DescriptorBuilder<S, T> {
    /// Sets an infallible initializer.
    pub fn initializer<I>(mut self, initializer: I) -> Self
    where
        I: Fn() -> S + Send + Sync + 'static,
    {
        self.init = Some(Arc::new(move || Ok(initializer())));
        self
    }

    /// Sets a fallible initializer. A fault here fails the traversal before
    /// any state exists, so the finalizer is not involved.
    pub fn try_initializer<I>(mut self, initializer: I) -> Self
    where
        I: Fn() -> Result<S, Fault> + Send + Sync + 'static,
    {
        self.init = Some(Arc::new(initializer));
        self
    }

    /// Sets an infallible step.
    pub fn step<F>(mut self, step: F) -> Self
    where
        F: Fn(S) -> Step<T, S> + Send + Sync + 'static,
    {
        self.step = Some(Arc::new(move |state| Ok(step(state))));
        self
    }

    /// Sets a fallible step. Return [`StepError::new`] with the state so the
    /// engine can still run the finalizer on the failure path.
    pub fn try_step<F>(mut self, step: F) -> Self
    where
        F: Fn(S) -> Result<Step<T, S>, StepError<S>> + Send + Sync + 'static,
    {
        self.step = Some(Arc::new(step));
        self
    }

    /// Sets an infallible finalizer.
    pub fn finalizer<C>(mut self, finalizer: C) -> Self
    where
        C: Fn(S) + Send + Sync + 'static,
    {
        self.finalize = Some(Arc::new(move |state| {
            finalizer(state);
            Ok(())
        }));
        self
    }

    /// Sets a fallible finalizer. Its fault is surfaced on clean termination,
    /// or attached as a secondary fault when a step has already failed.
    pub fn try_finalizer<C>(mut self, finalizer: C) -> Self
    where
        C: Fn(S) -> Result<(), Fault> + Send + Sync + 'static,
    {
        self.finalize = Some(Arc::new(finalizer));
        self
    }

    /// Validates and assembles the descriptor.
    pub fn build(self) -> Result<Descriptor<S, T>, ProtocolError> {
        let init = self.init.ok_or(ProtocolError::MissingInitializer)?;
        let step = self.step.ok_or(ProtocolError::MissingStep)?;
        let finalize = self.finalize.unwrap_or_else(|| {
            Arc::new(|state: S| -> Result<(), Fault> {
                drop(state);
                Ok(())
            })
        });
        Ok(Descriptor {
            init,
            step,
            finalize,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    fn counting(n: u32) -> Descriptor<u32, u32> {
        Descriptor::new(
            move || n,
            |x| if x < 3 { Step::one(x, x + 1) } else { Step::Halt(x) },
            |_| {},
        )
    }

    #[test]
    fn test_create_has_no_side_effects() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let descriptor = Descriptor::new(
            move || {
                seen.fetch_add(1, Ordering::SeqCst);
                0_u32
            },
            |x| Step::one(x, x + 1),
            |_| {},
        );
        let _traversal = descriptor.begin();

        // Neither construction nor begin() touches any callback.
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_descriptor_is_reusable() {
        let descriptor = counting(0);
        assert_eq!(descriptor.begin().to_list().unwrap(), vec![0, 1, 2]);
        assert_eq!(descriptor.begin().to_list().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_builder_requires_initializer() {
        let result: Result<Descriptor<u32, u32>, _> = Descriptor::builder()
            .step(|x| Step::one(x, x + 1))
            .build();
        assert_eq!(result.unwrap_err(), ProtocolError::MissingInitializer);
    }

    #[test]
    fn test_builder_requires_step() {
        let result: Result<Descriptor<u32, u32>, _> =
            Descriptor::builder().initializer(|| 0).build();
        assert_eq!(result.unwrap_err(), ProtocolError::MissingStep);
    }

    #[test]
    fn test_builder_default_finalizer_passes_state_through() {
        let descriptor: Descriptor<u32, u32> = Descriptor::builder()
            .initializer(|| 5)
            .step(|x| if x > 0 { Step::one(x, x - 1) } else { Step::Halt(x) })
            .build()
            .unwrap();
        assert_eq!(descriptor.begin().to_list().unwrap(), vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_builder_with_all_fallible_callbacks() {
        let descriptor: Descriptor<u32, u32> = Descriptor::builder()
            .try_initializer(|| Ok(10))
            .try_step(|x| {
                if x < 12 {
                    Ok(Step::one(x, x + 1))
                } else {
                    Ok(Step::Halt(x))
                }
            })
            .try_finalizer(|_| Ok(()))
            .build()
            .unwrap();
        assert_eq!(descriptor.begin().to_list().unwrap(), vec![10, 11]);
    }

    #[test]
    fn test_clones_share_callbacks_but_not_traversal_state() {
        let descriptor = counting(1);
        let cloned = descriptor.clone();

        let mut a = descriptor.begin();
        let mut b = cloned.begin();
        assert_eq!(a.pull().unwrap(), Some(1));
        assert_eq!(a.pull().unwrap(), Some(2));
        // b starts from its own initializer call, unaffected by a's progress.
        assert_eq!(b.pull().unwrap(), Some(1));
    }

    #[test]
    fn test_debug_does_not_expose_callbacks() {
        let descriptor = counting(0);
        assert_eq!(format!("{descriptor:?}"), "Descriptor { .. }");
    }
}
