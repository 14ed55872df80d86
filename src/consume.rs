//! Generic consumption utilities driven purely by `pull` and `stop`.
//!
//! Everything here sits on top of the traversal engine's two operations; none
//! of it reaches into the engine's internals. [`TraversalIter`] additionally
//! bridges into `std::iter`, and because dropping the iterator drops the
//! traversal, the exactly-once cleanup guarantee extends to abandoned
//! iteration.
//!
//! # Examples
//!
//! ```rust
//! use unfurl::{Descriptor, Step};
//!
//! let naturals = Descriptor::new(|| 0_u64, |n| Step::one(n, n + 1), |_| {});
//!
//! // Bounded consumption of an unbounded sequence.
//! let mut traversal = naturals.begin();
//! assert_eq!(traversal.take(3).unwrap(), vec![0, 1, 2]);
//! ```

use crate::error::TraversalError;
use crate::traversal::{Phase, Traversal};

impl<S, T> Traversal<S, T> {
    /// Pulls up to `n` elements, then stops the traversal.
    ///
    /// Returns fewer than `n` elements if the sequence exhausts first; in
    /// that case the traversal has already finalized and the trailing `stop`
    /// is a no-op.
    ///
    /// ```rust
    /// use unfurl::{Descriptor, Phase, Step};
    ///
    /// let naturals = Descriptor::new(|| 97_i64, |x| Step::one(x, x + 1), |_| {});
    /// let mut traversal = naturals.begin();
    ///
    /// assert_eq!(traversal.take(2).unwrap(), vec![97, 98]);
    /// assert_eq!(traversal.phase(), Phase::Stopped);
    /// ```
    pub fn take(&mut self, n: usize) -> Result<Vec<T>, TraversalError> {
        let mut elements = Vec::with_capacity(n);
        while elements.len() < n {
            match self.pull()? {
                Some(element) => elements.push(element),
                None => return Ok(elements),
            }
        }
        self.stop()?;
        Ok(elements)
    }

    /// Pulls the traversal to exhaustion and collects every element, in the
    /// order batches were produced.
    ///
    /// Unbounded: on a sequence that never halts this never returns. Bounding
    /// such sequences is the caller's responsibility, via
    /// [`take`](Traversal::take) or [`stop`](Traversal::stop).
    pub fn to_list(mut self) -> Result<Vec<T>, TraversalError> {
        let mut elements = Vec::new();
        while let Some(element) = self.pull()? {
            elements.push(element);
        }
        Ok(elements)
    }

    /// Folds every element into an accumulator, pulling to exhaustion.
    ///
    /// ```rust
    /// use unfurl::{Descriptor, Step};
    ///
    /// let digits = Descriptor::new(
    ///     || 1_u32,
    ///     |d| if d <= 4 { Step::one(d, d + 1) } else { Step::Halt(d) },
    ///     |_| {},
    /// );
    /// let sum = digits.begin().fold(0, |acc, d| acc + d).unwrap();
    /// assert_eq!(sum, 10);
    /// ```
    pub fn fold<B, F>(mut self, init: B, mut f: F) -> Result<B, TraversalError>
    where
        F: FnMut(B, T) -> B,
    {
        let mut accumulator = init;
        while let Some(element) = self.pull()? {
            accumulator = f(accumulator, element);
        }
        Ok(accumulator)
    }

    /// Applies `f` to every element, pulling to exhaustion.
    pub fn for_each<F>(self, mut f: F) -> Result<(), TraversalError>
    where
        F: FnMut(T),
    {
        self.fold((), |(), element| f(element))
    }
}

/// Iterator adapter over a traversal.
///
/// Yields `Ok` per element and a single `Err` if the traversal faults, after
/// which the iterator is exhausted. The wrapped traversal is dropped with the
/// iterator, so abandoning iteration mid-sequence still finalizes.
///
/// ```rust
/// use unfurl::{Descriptor, Step};
///
/// let descriptor = Descriptor::new(
///     || 0_u32,
///     |n| if n < 3 { Step::one(n, n + 1) } else { Step::Halt(n) },
///     |_| {},
/// );
///
/// let elements: Result<Vec<_>, _> = descriptor.begin().into_iter().collect();
/// assert_eq!(elements.unwrap(), vec![0, 1, 2]);
/// ```
pub struct TraversalIter<S, T> {
    traversal: Traversal<S, T>,
    faulted: bool,
}

impl<S, T> TraversalIter<S, T> {
    /// The wrapped traversal's current phase.
    pub fn phase(&self) -> Phase {
        self.traversal.phase()
    }

    /// Unwraps back into the traversal.
    pub fn into_inner(self) -> Traversal<S, T> {
        self.traversal
    }
}

impl<S, T> Iterator for TraversalIter<S, T> {
    type Item = Result<T, TraversalError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.faulted {
            return None;
        }
        match self.traversal.pull() {
            Ok(Some(element)) => Some(Ok(element)),
            Ok(None) => None,
            Err(err) => {
                self.faulted = true;
                Some(Err(err))
            }
        }
    }
}

impl<S, T> IntoIterator for Traversal<S, T> {
    type Item = Result<T, TraversalError>;
    type IntoIter = TraversalIter<S, T>;

    fn into_iter(self) -> Self::IntoIter {
        TraversalIter {
            traversal: self,
            faulted: false,
        }
    }
}
