use crate::element::ElementKind;

/// Failure reported by an environment while looking up an element.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvironmentError {
    /// The underlying compiler aborted the current compilation. This is a
    /// tooling condition on the consumer side, not a property of the element
    /// being looked up.
    #[error("compilation aborted: {reason}")]
    Aborted { reason: String },

    /// Any other lookup failure.
    #[error("environment lookup failed: {message}")]
    Failure { message: String },
}

/// Error raised when capturing a handle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandleError {
    #[error("element {element} with kind {kind} not supported")]
    UnsupportedElementKind { kind: ElementKind, element: String },
}

/// Error raised when re-resolving a handle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Environment(#[from] EnvironmentError),
}
