/// Result of one step of a sequence: a batch of elements with the next state,
/// or a halt with the final state.
///
/// `Step` is the return type of a descriptor's step callback, playing the role
/// `Option` plays for optional values and `Result` plays for fallible ones.
/// Both variants carry a state: `Emit` threads the state forward into the next
/// step, `Halt` hands it to the finalizer.
///
/// # Examples
///
/// ```rust
/// use unfurl::Step;
///
/// let emitting: Step<i32, u32> = Step::Emit(vec![1, 2, 3], 4);
/// let halting: Step<i32, u32> = Step::Halt(4);
///
/// assert!(emitting.is_emit());
/// assert_eq!(halting.into_state(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step<T, S> {
    /// An ordered, possibly empty batch of elements and the state to thread
    /// into the next step. An empty batch produces nothing for the consumer;
    /// the engine steps again with the new state.
    Emit(Vec<T>, S),
    /// No further elements; carries the state handed to the finalizer.
    Halt(S),
}

impl<T, S> Step<T, S> {
    /// Emit a single element.
    ///
    /// ```rust
    /// use unfurl::Step;
    ///
    /// assert_eq!(Step::one(7, 8), Step::Emit(vec![7], 8));
    /// ```
    #[inline]
    pub fn one(element: T, next_state: S) -> Self {
        Step::Emit(vec![element], next_state)
    }

    /// Emit nothing and advance the state.
    ///
    /// ```rust
    /// use unfurl::Step;
    ///
    /// let step: Step<i32, _> = Step::skip(9);
    /// assert_eq!(step, Step::Emit(vec![], 9));
    /// ```
    #[inline]
    pub fn skip(next_state: S) -> Self {
        Step::Emit(Vec::new(), next_state)
    }

    /// Returns `true` if the step is `Emit`.
    ///
    /// ```rust
    /// use unfurl::Step;
    ///
    /// let x: Step<i32, u32> = Step::Emit(vec![1], 2);
    /// assert!(x.is_emit());
    ///
    /// let y: Step<i32, u32> = Step::Halt(2);
    /// assert!(!y.is_emit());
    /// ```
    #[inline]
    pub const fn is_emit(&self) -> bool {
        matches!(self, Step::Emit(_, _))
    }

    /// Returns `true` if the step is `Halt`.
    ///
    /// ```rust
    /// use unfurl::Step;
    ///
    /// let x: Step<i32, u32> = Step::Halt(2);
    /// assert!(x.is_halt());
    /// ```
    #[inline]
    pub const fn is_halt(&self) -> bool {
        matches!(self, Step::Halt(_))
    }

    /// The state carried by either variant.
    ///
    /// ```rust
    /// use unfurl::Step;
    ///
    /// let x: Step<i32, u32> = Step::Emit(vec![1], 2);
    /// assert_eq!(x.state(), &2);
    ///
    /// let y: Step<i32, u32> = Step::Halt(3);
    /// assert_eq!(y.state(), &3);
    /// ```
    #[inline]
    pub const fn state(&self) -> &S {
        match self {
            Step::Emit(_, state) | Step::Halt(state) => state,
        }
    }

    /// Consumes the step, returning the carried state and discarding any batch.
    #[inline]
    pub fn into_state(self) -> S {
        match self {
            Step::Emit(_, state) | Step::Halt(state) => state,
        }
    }

    /// The emitted batch, or `None` for `Halt`.
    ///
    /// ```rust
    /// use unfurl::Step;
    ///
    /// let x: Step<i32, u32> = Step::Emit(vec![1, 2], 3);
    /// assert_eq!(x.batch(), Some(&[1, 2][..]));
    ///
    /// let y: Step<i32, u32> = Step::Halt(3);
    /// assert_eq!(y.batch(), None);
    /// ```
    #[inline]
    pub fn batch(&self) -> Option<&[T]> {
        match self {
            Step::Emit(batch, _) => Some(batch),
            Step::Halt(_) => None,
        }
    }

    /// Number of elements this step contributes; zero for `Halt` and for an
    /// empty batch alike.
    #[inline]
    pub fn batch_len(&self) -> usize {
        match self {
            Step::Emit(batch, _) => batch.len(),
            Step::Halt(_) => 0,
        }
    }

    /// Maps the carried state with `f`, leaving any batch untouched.
    ///
    /// ```rust
    /// use unfurl::Step;
    ///
    /// let x: Step<i32, u32> = Step::Emit(vec![1], 2);
    /// assert_eq!(x.map_state(|s| s * 10), Step::Emit(vec![1], 20));
    ///
    /// let y: Step<i32, u32> = Step::Halt(3);
    /// assert_eq!(y.map_state(|s| s * 10), Step::Halt(30));
    /// ```
    #[inline]
    pub fn map_state<S2, F>(self, f: F) -> Step<T, S2>
    where
        F: FnOnce(S) -> S2,
    {
        match self {
            Step::Emit(batch, state) => Step::Emit(batch, f(state)),
            Step::Halt(state) => Step::Halt(f(state)),
        }
    }

    /// Maps every element of the batch with `f`, leaving the state untouched.
    ///
    /// ```rust
    /// use unfurl::Step;
    ///
    /// let x: Step<i32, u32> = Step::Emit(vec![1, 2], 3);
    /// assert_eq!(x.map_batch(|e| e * 2), Step::Emit(vec![2, 4], 3));
    /// ```
    #[inline]
    pub fn map_batch<T2, F>(self, f: F) -> Step<T2, S>
    where
        F: FnMut(T) -> T2,
    {
        match self {
            Step::Emit(batch, state) => Step::Emit(batch.into_iter().map(f).collect(), state),
            Step::Halt(state) => Step::Halt(state),
        }
    }

    /// Converts from `&Step<T, S>` to `Step<&T, &S>`.
    #[inline]
    pub fn as_ref(&self) -> Step<&T, &S> {
        match self {
            Step::Emit(batch, state) => Step::Emit(batch.iter().collect(), state),
            Step::Halt(state) => Step::Halt(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_emit_and_is_halt() {
        let e: Step<i32, u32> = Step::Emit(vec![1], 2);
        let h: Step<i32, u32> = Step::Halt(2);

        assert!(e.is_emit());
        assert!(!e.is_halt());
        assert!(h.is_halt());
        assert!(!h.is_emit());
    }

    #[test]
    fn test_one_and_skip_shorthands() {
        assert_eq!(Step::one('a', 1), Step::Emit(vec!['a'], 1));
        let skipped: Step<char, i32> = Step::skip(1);
        assert_eq!(skipped, Step::Emit(vec![], 1));
        assert_eq!(skipped.batch_len(), 0);
    }

    #[test]
    fn test_state_accessors() {
        let e: Step<i32, u32> = Step::Emit(vec![1, 2], 7);
        let h: Step<i32, u32> = Step::Halt(9);

        assert_eq!(e.state(), &7);
        assert_eq!(h.state(), &9);
        assert_eq!(e.into_state(), 7);
        assert_eq!(h.into_state(), 9);
    }

    #[test]
    fn test_batch_and_batch_len() {
        let e: Step<i32, u32> = Step::Emit(vec![1, 2, 3], 0);
        let h: Step<i32, u32> = Step::Halt(0);

        assert_eq!(e.batch(), Some(&[1, 2, 3][..]));
        assert_eq!(e.batch_len(), 3);
        assert_eq!(h.batch(), None);
        assert_eq!(h.batch_len(), 0);
    }

    #[test]
    fn test_map_state() {
        let e: Step<i32, u32> = Step::Emit(vec![1], 2);
        let h: Step<i32, u32> = Step::Halt(3);

        assert_eq!(e.map_state(|s| s + 1), Step::Emit(vec![1], 3));
        assert_eq!(h.map_state(|s| s + 1), Step::Halt(4));
    }

    #[test]
    fn test_map_batch_leaves_halt_alone() {
        let e: Step<i32, u32> = Step::Emit(vec![1, 2], 3);
        let h: Step<i32, u32> = Step::Halt(3);

        assert_eq!(e.map_batch(|x| x * x), Step::Emit(vec![1, 4], 3));
        assert_eq!(h.map_batch(|x: i32| x * x), Step::Halt(3));
    }

    #[test]
    fn test_as_ref() {
        let e: Step<i32, String> = Step::Emit(vec![1, 2], "s".to_string());
        assert_eq!(e.as_ref(), Step::Emit(vec![&1, &2], &"s".to_string()));

        let h: Step<i32, String> = Step::Halt("s".to_string());
        assert_eq!(h.as_ref(), Step::Halt(&"s".to_string()));
    }
}
