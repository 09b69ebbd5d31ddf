use thiserror::Error;

/// Type alias for boxed errors that can be sent across threads.
///
/// This is the error type producers return from their build closures; any
/// concrete error converts into it with `?`.
pub type StdError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by [`Container::inject`](crate::Container::inject) and the
/// other lifecycle operations.
///
/// All errors are returned synchronously to the immediate caller. A failed
/// resolution never leaves a cache entry for the failing slot, but transitive
/// dependencies that resolved before the failure stay cached.
#[derive(Debug, Error)]
pub enum InjectError {
    /// The requested (key, scope) pair has no registration.
    #[error("Dependency not found for type: {key} in key: {scope}")]
    NotFound { key: String, scope: String },

    /// The producer for the slot returned an error.
    #[error("Producer failed for type: {key} in key: {scope}")]
    Construction {
        key: String,
        scope: String,
        #[source]
        source: StdError,
    },

    /// The constructed or cached instance is not of the requested handle
    /// type. Registration performs no producer-shape validation, so a
    /// mismatched producer surfaces here, at injection time.
    #[error("Type mismatch for {key}: registered producer built a value that is not {expected}")]
    TypeMismatch { key: String, expected: String },

    /// A constructor asked for a dependency position beyond its declaration.
    /// The wrapping [`InjectError::Construction`] error names the slot whose
    /// constructor overran.
    #[error("No resolved dependency at position {index}")]
    NoSuchArgument { index: usize },
}
