//! Error types for network construction and training.

use thiserror::Error;

/// Errors returned by fallible network operations.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// A network must contain at least one layer.
    #[error("network has no layers")]
    EmptyNetwork,

    /// Adjacent layers disagree on the width of the vector passed between them.
    ///
    /// `layer` is the index of the later layer of the pair, `expected` the
    /// output width of the layer before it and `actual` its own input width.
    #[error("layer {layer} takes {actual} inputs, but the previous layer outputs {expected}")]
    ShapeMismatch {
        layer: usize,
        expected: usize,
        actual: usize,
    },

    /// A weight vector does not match the size of a layer's parameters.
    #[error("expected {expected} weights, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// No training examples were provided.
    #[error("no training examples")]
    EmptyDataset,

    /// A training example does not fit the network's input or output width.
    #[error("example {index} has width {actual}, expected {expected}")]
    InvalidExample {
        index: usize,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
