//! Error types for descriptor construction and traversal execution.

use std::fmt;

use thiserror::Error;

/// Boxed fault payload raised by an author callback.
///
/// Anything convertible into a boxed error works, including string literals:
///
/// ```rust
/// use unfurl::Fault;
///
/// let fault: Fault = "upstream connection dropped".into();
/// assert_eq!(fault.to_string(), "upstream connection dropped");
/// ```
pub type Fault = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Malformed descriptor construction, detected before any traversal exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The builder was finished without an initializer callback.
    #[error("descriptor has no initializer callback")]
    MissingInitializer,
    /// The builder was finished without a step callback.
    #[error("descriptor has no step callback")]
    MissingStep,
}

/// A state value whose shape does not match what a callback expected.
///
/// This is an author-level fault: a step or initializer body raises it when
/// the state it received cannot be reconciled with the shape it handles. The
/// engine treats it like any other step fault and routes it through the
/// failure path.
///
/// ```rust
/// use unfurl::StateMatchError;
///
/// let err = StateMatchError::new("open file handle", "already-closed handle");
/// assert!(err.to_string().contains("open file handle"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("state shape mismatch: expected {expected}, found {found}")]
pub struct StateMatchError {
    expected: String,
    found: String,
}

impl StateMatchError {
    pub fn new(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// A fault raised by a step callback, carrying the state back to the engine.
///
/// Step callbacks take the state by value. Returning the state alongside the
/// fault is what lets the engine hand the finalizer the state that was
/// current at the moment of failure. When the state genuinely cannot be
/// recovered (it was consumed before the fault was detected), use
/// [`StepError::lost`]; the finalizer is then skipped for want of a state.
pub struct StepError<S> {
    state: Option<S>,
    fault: Fault,
}

impl<S> StepError<S> {
    /// A fault with the state returned for finalization.
    pub fn new(state: S, fault: impl Into<Fault>) -> Self {
        Self {
            state: Some(state),
            fault: fault.into(),
        }
    }

    /// A fault whose state was consumed and cannot be finalized.
    pub fn lost(fault: impl Into<Fault>) -> Self {
        Self {
            state: None,
            fault: fault.into(),
        }
    }

    /// The state returned for finalization, if any.
    pub fn state(&self) -> Option<&S> {
        self.state.as_ref()
    }

    /// The underlying fault.
    pub fn fault(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.fault.as_ref()
    }

    /// Split into the recovered state and the fault.
    pub fn into_parts(self) -> (Option<S>, Fault) {
        (self.state, self.fault)
    }
}

impl<S> fmt::Debug for StepError<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepError")
            .field("state_returned", &self.state.is_some())
            .field("fault", &self.fault)
            .finish()
    }
}

impl<S> fmt::Display for StepError<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step failed: {}", self.fault)
    }
}

/// A fault surfaced by a traversal.
///
/// The engine never suppresses the original cause: on the failure path the
/// finalizer runs first, and if that attempt itself faults the secondary
/// fault rides along in `finalizer_fault` instead of replacing the primary.
#[derive(Debug, Error)]
pub enum TraversalError {
    /// The initializer faulted before any state existed.
    #[error("initializer failed")]
    Init {
        #[source]
        fault: Fault,
    },
    /// A step faulted while producing a batch. The finalizer has already run
    /// (when a state was recoverable); its own fault, if any, is attached.
    #[error("step failed while producing a batch")]
    Step {
        #[source]
        fault: Fault,
        finalizer_fault: Option<Fault>,
    },
    /// The finalizer faulted during an otherwise clean termination.
    #[error("finalizer failed")]
    Finalizer {
        #[source]
        fault: Fault,
    },
}

impl TraversalError {
    /// The primary fault, regardless of which path raised it.
    pub fn fault(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        match self {
            TraversalError::Init { fault }
            | TraversalError::Step { fault, .. }
            | TraversalError::Finalizer { fault } => fault.as_ref(),
        }
    }

    /// The secondary finalizer fault attached to a failed step, if any.
    pub fn finalizer_fault(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            TraversalError::Step {
                finalizer_fault: Some(fault),
                ..
            } => Some(fault.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_error_messages() {
        assert_eq!(
            ProtocolError::MissingInitializer.to_string(),
            "descriptor has no initializer callback"
        );
        assert_eq!(
            ProtocolError::MissingStep.to_string(),
            "descriptor has no step callback"
        );
    }

    #[test]
    fn test_state_match_error_display() {
        let err = StateMatchError::new("pair", "single");
        assert_eq!(err.to_string(), "state shape mismatch: expected pair, found single");
    }

    #[test]
    fn test_step_error_carries_state_back() {
        let err = StepError::new(41_u32, "ran dry");
        assert_eq!(err.state(), Some(&41));
        assert_eq!(err.fault().to_string(), "ran dry");

        let (state, fault) = err.into_parts();
        assert_eq!(state, Some(41));
        assert_eq!(fault.to_string(), "ran dry");
    }

    #[test]
    fn test_step_error_lost_state() {
        let err: StepError<u32> = StepError::lost("state consumed");
        assert_eq!(err.state(), None);
        assert_eq!(err.to_string(), "step failed: state consumed");
    }

    #[test]
    fn test_traversal_error_primary_and_secondary_faults() {
        let err = TraversalError::Step {
            fault: "primary".into(),
            finalizer_fault: Some("secondary".into()),
        };
        assert_eq!(err.fault().to_string(), "primary");
        assert_eq!(err.finalizer_fault().unwrap().to_string(), "secondary");

        let clean = TraversalError::Init { fault: "boom".into() };
        assert!(clean.finalizer_fault().is_none());
        assert_eq!(clean.fault().to_string(), "boom");
    }

    #[test]
    fn test_traversal_error_source_chain() {
        use std::error::Error as _;

        let err = TraversalError::Finalizer { fault: "close failed".into() };
        assert_eq!(err.source().unwrap().to_string(), "close failed");
    }
}
