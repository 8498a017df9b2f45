use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Errors reported by the generator and its transform engines.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    /// Invalid construction parameters.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The selected backend cannot run a transform of this shape.
    #[error("unsupported transform size {frame_size} (batch {batch_size}): {reason}")]
    UnsupportedSize {
        frame_size: usize,
        batch_size: usize,
        reason: String,
    },

    /// Engine memory could not be allocated.
    #[error("out of engine memory ({requested} bytes requested): {reason}")]
    ResourceExhausted { requested: usize, reason: String },

    /// The requested backend is not available in this build or on this host.
    #[error("transform device unavailable: {0}")]
    DeviceUnavailable(String),

    /// Input does not hold exactly one block per symbol.
    #[error("invalid input size: expected {expected} samples, got {actual}")]
    InvalidInputSize { expected: usize, actual: usize },

    /// Output cannot be sized to one frame per symbol.
    #[error("invalid output size: expected {expected} samples, got {actual}")]
    InvalidOutputSize { expected: usize, actual: usize },

    /// The transform itself failed.
    #[error("transform failed: {0}")]
    Transform(String),
}
