// ============================================================
// Layer 3 - Engine Errors
// ============================================================
// The only failures the core can produce. Shape problems are
// detected before any compute loop starts and are never
// retried: they mean the caller handed over a tensor that was
// not resized/normalized the way the network expects.
//
// Reference: Rust Book §9 (Recoverable Errors with Result)

use thiserror::Error;

/// Result alias used by the tensor and pipeline code.
pub type EngineResult<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// An activation and the weight it meets disagree on a
    /// dimension, or an operation would produce an empty tensor.
    #[error("Shape mismatch in {op}: {detail}")]
    ShapeMismatch { op: &'static str, detail: String },

    /// A configuration value outside its allowed range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EngineError {
    pub fn shape(op: &'static str, detail: impl Into<String>) -> Self {
        Self::ShapeMismatch { op, detail: detail.into() }
    }

    /// True for the input-validation failures callers may want
    /// to answer with a default prediction.
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, Self::ShapeMismatch { .. })
    }
}
