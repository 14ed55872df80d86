//! The traversal engine: demand-driven stepping with exactly-once cleanup.
//!
//! A [`Traversal`] is one stateful run of a [`Descriptor`]. It owns the state
//! lineage, invokes the step callback only to satisfy outstanding demand, and
//! reconciles the finalizer with every way consumption can end:
//!
//! - exhaustion ([`Step::Halt`](crate::Step::Halt) from the step callback),
//! - early stop ([`Traversal::stop`]),
//! - failure (a step fault, surfaced as [`TraversalError`]),
//! - cancellation (the traversal is dropped while still running, including
//!   drops during panic unwinding).
//!
//! Whichever termination path runs first wins; the finalizer fires exactly
//! once per traversal that acquired a state, never zero times, never twice.

use std::collections::VecDeque;
use std::fmt;

use tracing::{debug, error, trace};

use crate::descriptor::Descriptor;
use crate::error::TraversalError;
use crate::step::Step;

/// Lifecycle phase of a traversal.
///
/// `NotStarted` and `Running` are live; the other four are terminal and
/// finalizer-reconciled. Once terminal, a traversal stays terminal: further
/// [`pull`](Traversal::pull)s report end-of-sequence and further
/// [`stop`](Traversal::stop)s are no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No callback has run yet.
    NotStarted,
    /// The initializer has produced a state and the sequence is live.
    Running,
    /// The step callback halted; the sequence produced all its elements.
    Exhausted,
    /// The consumer stopped the traversal early.
    Stopped,
    /// A callback faulted; the fault was surfaced after finalization.
    Failed,
    /// The traversal was dropped while still live.
    Cancelled,
}

impl Phase {
    /// Whether this phase is terminal.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Phase::NotStarted | Phase::Running)
    }
}

enum Lifecycle<S> {
    NotStarted,
    Running(S),
    Finished(Phase),
}

/// One run of a descriptor, from first demand to a terminal phase.
///
/// `pull` and `stop` take `&mut self`: a traversal has a single logical
/// consumer and provides no internal locking of its own state. Concurrency
/// lives at the descriptor level, where independent traversals of the same
/// descriptor may run on independent threads.
///
/// # Examples
///
/// ```rust
/// use unfurl::{Descriptor, Phase, Step};
///
/// let descriptor = Descriptor::new(
///     || 97_i64,
///     |x| if x <= 99 { Step::one(x, x + 1) } else { Step::Halt(x) },
///     |_| {},
/// );
///
/// let mut traversal = descriptor.begin();
/// assert_eq!(traversal.phase(), Phase::NotStarted);
/// assert_eq!(traversal.pull().unwrap(), Some(97));
/// assert_eq!(traversal.phase(), Phase::Running);
/// ```
pub struct Traversal<S, T> {
    descriptor: Descriptor<S, T>,
    lifecycle: Lifecycle<S>,
    buffer: VecDeque<T>,
}

impl<S, T> Traversal<S, T> {
    pub(crate) fn new(descriptor: Descriptor<S, T>) -> Self {
        Self {
            descriptor,
            lifecycle: Lifecycle::NotStarted,
            buffer: VecDeque::new(),
        }
    }

    /// Takes the lifecycle out for a transition, leaving a terminal
    /// placeholder. If an author callback panics while the state is out,
    /// `Drop` sees the placeholder and does not double-finalize; the state
    /// itself unwinds inside the callback that consumed it.
    fn take_lifecycle(&mut self) -> Lifecycle<S> {
        std::mem::replace(&mut self.lifecycle, Lifecycle::Finished(Phase::Cancelled))
    }

    /// The current lifecycle phase.
    pub fn phase(&self) -> Phase {
        match &self.lifecycle {
            Lifecycle::NotStarted => Phase::NotStarted,
            Lifecycle::Running(_) => Phase::Running,
            Lifecycle::Finished(phase) => *phase,
        }
    }

    /// Pulls the next element, or `Ok(None)` at end of sequence.
    ///
    /// The first pull runs the initializer; after that each pull drains the
    /// buffered batch before stepping again. Steps that emit an empty batch
    /// advance the state and loop without returning to the caller, so a step
    /// callback that never halts and never emits turns this call into an
    /// endless loop; bounding such sequences is the consumer's job, via
    /// [`stop`](Traversal::stop) or [`take`](Traversal::take).
    ///
    /// On a step fault the finalizer runs with the state current at the
    /// moment of failure before the fault is surfaced. Terminal traversals
    /// are fused: pulling again just reports `Ok(None)`.
    pub fn pull(&mut self) -> Result<Option<T>, TraversalError> {
        if let Some(element) = self.buffer.pop_front() {
            return Ok(Some(element));
        }

        let mut state = match self.take_lifecycle() {
            Lifecycle::NotStarted => {
                trace!("traversal starting");
                match (self.descriptor.init)() {
                    Ok(state) => state,
                    Err(fault) => {
                        self.lifecycle = Lifecycle::Finished(Phase::Failed);
                        debug!("traversal failed in initializer");
                        return Err(TraversalError::Init { fault });
                    }
                }
            }
            Lifecycle::Running(state) => state,
            finished @ Lifecycle::Finished(_) => {
                self.lifecycle = finished;
                return Ok(None);
            }
        };

        loop {
            match (self.descriptor.step)(state) {
                Ok(Step::Emit(batch, next_state)) if batch.is_empty() => {
                    // Nothing for the consumer yet; keep stepping.
                    state = next_state;
                }
                Ok(Step::Emit(batch, next_state)) => {
                    self.buffer.extend(batch);
                    self.lifecycle = Lifecycle::Running(next_state);
                    return Ok(self.buffer.pop_front());
                }
                Ok(Step::Halt(final_state)) => {
                    self.lifecycle = Lifecycle::Finished(Phase::Exhausted);
                    debug!("traversal exhausted");
                    return match (self.descriptor.finalize)(final_state) {
                        Ok(()) => Ok(None),
                        Err(fault) => Err(TraversalError::Finalizer { fault }),
                    };
                }
                Err(step_error) => {
                    let (final_state, fault) = step_error.into_parts();
                    self.lifecycle = Lifecycle::Finished(Phase::Failed);
                    debug!("traversal failed in step");
                    let finalizer_fault = match final_state {
                        Some(final_state) => (self.descriptor.finalize)(final_state).err(),
                        None => None,
                    };
                    return Err(TraversalError::Step {
                        fault,
                        finalizer_fault,
                    });
                }
            }
        }
    }

    /// Stops the traversal early, running the finalizer with the current
    /// state.
    ///
    /// Any buffered but unconsumed elements are discarded. Stopping before
    /// the first pull terminates without invoking any callback, since no
    /// state was ever created. Stopping an already-terminal traversal is a
    /// no-op: whichever termination path ran first has already finalized.
    pub fn stop(&mut self) -> Result<(), TraversalError> {
        match self.take_lifecycle() {
            Lifecycle::NotStarted => {
                self.lifecycle = Lifecycle::Finished(Phase::Stopped);
                Ok(())
            }
            Lifecycle::Running(state) => {
                self.lifecycle = Lifecycle::Finished(Phase::Stopped);
                self.buffer.clear();
                debug!("traversal stopped");
                match (self.descriptor.finalize)(state) {
                    Ok(()) => Ok(()),
                    Err(fault) => Err(TraversalError::Finalizer { fault }),
                }
            }
            finished @ Lifecycle::Finished(_) => {
                self.lifecycle = finished;
                Ok(())
            }
        }
    }
}

impl<S, T> fmt::Debug for Traversal<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Traversal")
            .field("phase", &self.phase())
            .field("buffered", &self.buffer.len())
            .finish_non_exhaustive()
    }
}

/// Cancellation path: dropping a live traversal runs the finalizer as part of
/// unwinding, then lets the drop (or panic) continue propagating. A finalizer
/// fault here cannot propagate out of `drop`, so it is surfaced on the error
/// log instead.
impl<S, T> Drop for Traversal<S, T> {
    fn drop(&mut self) {
        if let Lifecycle::Running(state) = self.take_lifecycle() {
            debug!("traversal cancelled");
            if let Err(fault) = (self.descriptor.finalize)(state) {
                error!(%fault, "finalizer failed during cancellation");
            }
        }
    }
}
