//! Layer types that can be composed into a `Network`.

use std::fmt;

use crate::error::Result;

pub mod dense;

pub use self::dense::Dense;

/// A single trainable layer of a feedforward network.
///
/// Layers own the buffers their kernels write into. `forward` and `backward`
/// return slices borrowed from those buffers, which are overwritten by the
/// next call. They are scratch space, not model state.
pub trait Layer: fmt::Debug {
    /// Returns the number of inputs to this layer.
    fn input_len(&self) -> usize;

    /// Returns the number of outputs from this layer.
    fn output_len(&self) -> usize;

    /// Returns the layer's parameters.
    fn weights(&self) -> &[f64];

    /// Overwrites the layer's parameters with `weights`.
    ///
    /// Fails without modifying the layer if `weights` is not exactly as long
    /// as the current parameter vector.
    fn set_weights(&mut self, weights: &[f64]) -> Result<()>;

    /// Feeds `inputs` forward through the layer, returning its activations.
    fn forward(&mut self, inputs: &[f64]) -> &[f64];

    /// Feeds `output_errors` backwards through the layer, returning the
    /// error attributed to each input and applying a gradient descent step
    /// scaled by `rate`.
    ///
    /// `inputs` must be the vector passed to the most recent call to
    /// `forward`.
    fn backward(
        &mut self,
        inputs: &[f64],
        output_errors: &[f64],
        rate: f64,
    ) -> &[f64];
}
