//! A [Feedforward neural network]
//! (https://en.wikipedia.org/wiki/Feedforward_neural_network).
//!
//! # Example
//!
//! A two layer network, using the weights from Matt Mazur's step-by-step
//! backpropagation walkthrough:
//!
//! ```
//! # use sgdnet::activator::Activator;
//! # use sgdnet::feed_forward::Network;
//! # use sgdnet::layers::Dense;
//! let hidden = Dense::from_weights(2, 2, Activator::Sigmoid,
//!                                  vec![0.15, 0.2, 0.35, 0.25, 0.3, 0.35])?;
//! let output = Dense::from_weights(2, 2, Activator::Sigmoid,
//!                                  vec![0.4, 0.45, 0.6, 0.5, 0.55, 0.6])?;
//! let mut network = Network::new(vec![Box::new(hidden), Box::new(output)])?;
//!
//! let prediction = network.predict(&[0.05, 0.1]);
//! assert!((prediction[0] - 0.75136507).abs() < 1e-4);
//!
//! // One step of gradient descent lowers the error for this example.
//! let before = network.train(&[0.05, 0.1], &[0.01, 0.99], 0.5);
//! let after = network.train(&[0.05, 0.1], &[0.01, 0.99], 0.0);
//! assert!(after < before);
//! # Ok::<(), sgdnet::Error>(())
//! ```

use log::debug;

use crate::activator::Activator;
use crate::error::{Error, Result};
use crate::layers::{Dense, Layer};

/// A Feedforward neural network
///
/// Besides its layers, the network keeps a copy of the input fed to each layer
/// and the error at each layer's output. Both are rewritten by every call to
/// `train` and carry nothing from one call to the next.
#[derive(Debug)]
pub struct Network {
    layers: Vec<Box<dyn Layer>>,
    inputs: Vec<Vec<f64>>,
    errors: Vec<Vec<f64>>,
}

impl Network {
    /// Composes `layers` into a network, first to last.
    ///
    /// Fails if `layers` is empty, or if any layer's input width differs from
    /// the output width of the layer before it.
    pub fn new(layers: Vec<Box<dyn Layer>>) -> Result<Self> {
        if layers.is_empty() {
            return Err(Error::EmptyNetwork);
        }
        for (i, pair) in layers.windows(2).enumerate() {
            if pair[0].output_len() != pair[1].input_len() {
                return Err(Error::ShapeMismatch {
                    layer: i + 1,
                    expected: pair[0].output_len(),
                    actual: pair[1].input_len(),
                });
            }
        }
        let inputs = layers.iter().map(|l| vec![0.0; l.input_len()]).collect();
        let errors = layers.iter().map(|l| vec![0.0; l.output_len()]).collect();
        debug!(
            "built network with {} layers: {:?}",
            layers.len(),
            layer_widths(&layers)
        );
        Ok(Network {
            layers,
            inputs,
            errors,
        })
    }

    /// Creates a new, untrained network of dense layers.
    ///
    /// Arguments:
    ///  * `activator` - the activation function to use for each neuron.
    ///  * `layer_sizes` - the number of neurons in each layer, starting with
    ///                    the input layer. Must contain at least 2 elements.
    pub fn from_sizes(activator: Activator, layer_sizes: &[usize]) -> Result<Self> {
        let layers = layer_sizes
            .windows(2)
            .map(|w| Box::new(Dense::with_activator(w[0], w[1], activator)) as Box<dyn Layer>)
            .collect();
        Network::new(layers)
    }

    /// Returns the size of the input layer to the network.
    pub fn input_len(&self) -> usize {
        self.layers[0].input_len()
    }

    /// Returns the size of the output layer from the network.
    pub fn output_len(&self) -> usize {
        self.layers[self.layers.len() - 1].output_len()
    }

    /// Returns the layers of the network, first to last.
    pub fn layers(&self) -> &[Box<dyn Layer>] {
        &self.layers
    }

    /// Returns mutable access to the layer at `index`, e.g. to restore its
    /// weights.
    pub fn layer_mut(&mut self, index: usize) -> Option<&mut (dyn Layer + 'static)> {
        self.layers.get_mut(index).map(|l| &mut **l)
    }

    /// Feeds the provided `input` through the network, returning the output
    /// layer.
    pub fn predict(&mut self, input: &[f64]) -> Vec<f64> {
        feed_forward(&mut self.layers, &mut self.inputs, input).to_vec()
    }

    /// Runs a single step of stochastic gradient descent on one example.
    ///
    /// Returns the mean squared error of the prediction made before the
    /// weights were updated.
    pub fn train(&mut self, input: &[f64], expected: &[f64], rate: f64) -> f64 {
        assert_eq!(expected.len(), self.output_len(), "invalid expected output size");
        let last = self.layers.len() - 1;

        let output = feed_forward(&mut self.layers, &mut self.inputs, input);
        for ((e, y), t) in self.errors[last].iter_mut().zip(output).zip(expected) {
            *e = t - y;
        }
        let error = mean_square(&self.errors[last]);

        for i in (0..=last).rev() {
            let input_errors = self.layers[i].backward(&self.inputs[i], &self.errors[i], rate);
            if i > 0 {
                self.errors[i - 1].copy_from_slice(input_errors);
            }
        }
        error
    }
}

/// Feeds `input` through `layers`, recording the input to each layer in
/// `inputs`. Returns the activations of the last layer.
fn feed_forward<'a>(
    layers: &'a mut [Box<dyn Layer>],
    inputs: &mut [Vec<f64>],
    input: &[f64],
) -> &'a [f64] {
    assert_eq!(input.len(), inputs[0].len(), "invalid input size");
    inputs[0].copy_from_slice(input);
    let (last, rest) = match layers.split_last_mut() {
        Some(split) => split,
        None => return &[],
    };
    for (i, layer) in rest.iter_mut().enumerate() {
        let output = layer.forward(&inputs[i]);
        inputs[i + 1].copy_from_slice(output);
    }
    last.forward(&inputs[inputs.len() - 1])
}

/// Computes the mean of the squares of `errors`, or zero if there are none.
fn mean_square(errors: &[f64]) -> f64 {
    if errors.is_empty() {
        return 0.0;
    }
    errors.iter().map(|e| e * e).sum::<f64>() / errors.len() as f64
}

fn layer_widths(layers: &[Box<dyn Layer>]) -> Vec<usize> {
    let mut widths = Vec::with_capacity(layers.len() + 1);
    widths.push(layers[0].input_len());
    widths.extend(layers.iter().map(|l| l.output_len()));
    widths
}
