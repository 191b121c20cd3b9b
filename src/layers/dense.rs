use crate::activator::Activator;
use crate::error::{Error, Result};
use crate::layers::Layer;

use itertools::multizip;
use rand::distributions::{Distribution, Uniform};
use rand::Rng;

/// A fully connected layer of a neural network
///
/// The weights of every unit are stored contiguously, followed by that unit's
/// bias. The weight for unit `i` and input `j` lives at `i * (inputs + 1) + j`
/// and the bias for unit `i` at `i * (inputs + 1) + inputs`.
#[derive(Clone, Debug)]
pub struct Dense {
    /// The activation function to be used for every unit in the layer.
    activator: Activator,
    /// The number of inputs to the layer.
    inputs: usize,
    /// The layer weights, one row of `inputs + 1` values per unit.
    weights: Vec<f64>,

    // Scratch buffers, sized once and rewritten by every forward/backward call.
    sums: Vec<f64>,
    outputs: Vec<f64>,
    deltas: Vec<f64>,
    errors: Vec<f64>,
}

impl Dense {
    /// Initializes a new, untrained layer using the sigmoid activation
    /// function.
    pub fn new(inputs: usize, units: usize) -> Self {
        Self::with_activator(inputs, units, Activator::default())
    }

    /// Initializes a new, untrained layer.
    ///
    /// Arguments:
    ///
    ///  * `inputs` - the number of inputs to this layer.
    ///  * `units` - the number of outputs from this layer.
    ///  * `activator` - the activation function to be used for this layer's
    ///                  output.
    ///
    /// Weights are drawn uniformly from `[-1, 1]`.
    pub fn with_activator(inputs: usize, units: usize, activator: Activator) -> Self {
        Self::random(inputs, units, activator, &mut rand::thread_rng())
    }

    /// Like `with_activator`, but draws the initial weights from `rng`.
    pub fn random<R>(inputs: usize, units: usize, activator: Activator, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let range = Uniform::new_inclusive(-1.0, 1.0);
        let weights = (0..units * (inputs + 1))
            .map(|_| range.sample(rng))
            .collect();
        Self::build(inputs, units, activator, weights)
    }

    /// Creates a layer from an existing weight vector.
    ///
    /// Fails if `weights` does not hold exactly `units * (inputs + 1)` values.
    pub fn from_weights(
        inputs: usize,
        units: usize,
        activator: Activator,
        weights: Vec<f64>,
    ) -> Result<Self> {
        let expected = units * (inputs + 1);
        if weights.len() != expected {
            return Err(Error::LengthMismatch {
                expected,
                actual: weights.len(),
            });
        }
        Ok(Self::build(inputs, units, activator, weights))
    }

    fn build(inputs: usize, units: usize, activator: Activator, weights: Vec<f64>) -> Self {
        Dense {
            activator,
            inputs,
            weights,
            sums: vec![0.0; units],
            outputs: vec![0.0; units],
            deltas: vec![0.0; units],
            errors: vec![0.0; inputs],
        }
    }

    /// Returns the activation function used by this layer.
    pub fn activator(&self) -> Activator {
        self.activator
    }

    fn stride(&self) -> usize {
        self.inputs + 1
    }
}

impl Layer for Dense {
    fn input_len(&self) -> usize {
        self.inputs
    }

    fn output_len(&self) -> usize {
        self.outputs.len()
    }

    fn weights(&self) -> &[f64] {
        &self.weights
    }

    fn set_weights(&mut self, weights: &[f64]) -> Result<()> {
        if weights.len() != self.weights.len() {
            return Err(Error::LengthMismatch {
                expected: self.weights.len(),
                actual: weights.len(),
            });
        }
        self.weights.copy_from_slice(weights);
        Ok(())
    }

    fn forward(&mut self, inputs: &[f64]) -> &[f64] {
        assert_eq!(inputs.len(), self.inputs, "invalid input size");
        let stride = self.stride();
        for (row, sum, y) in multizip((
            self.weights.chunks_exact(stride),
            self.sums.iter_mut(),
            self.outputs.iter_mut(),
        )) {
            let (w, bias) = row.split_at(self.inputs);
            let dot: f64 = w.iter().zip(inputs).map(|(w, x)| w * x).sum();
            *sum = dot + bias[0];
            *y = self.activator.f(*sum);
        }
        &self.outputs
    }

    fn backward(
        &mut self,
        inputs: &[f64],
        output_errors: &[f64],
        rate: f64,
    ) -> &[f64] {
        assert_eq!(inputs.len(), self.inputs, "invalid input size");
        assert_eq!(output_errors.len(), self.output_len(), "invalid error size");
        let stride = self.stride();

        for (d, e, x, y) in multizip((
            self.deltas.iter_mut(),
            output_errors.iter(),
            self.sums.iter(),
            self.outputs.iter(),
        )) {
            *d = e * self.activator.fprime(*x, *y);
        }

        // The upstream error must see the weights used by the forward pass,
        // so it is accumulated before any weight moves.
        for e in self.errors.iter_mut() {
            *e = 0.0;
        }
        for (row, d) in self.weights.chunks_exact(stride).zip(&self.deltas) {
            for (e, w) in self.errors.iter_mut().zip(&row[..self.inputs]) {
                *e += d * w;
            }
        }

        for (row, d) in self.weights.chunks_exact_mut(stride).zip(&self.deltas) {
            let step = rate * d;
            let (w, bias) = row.split_at_mut(self.inputs);
            for (w, x) in w.iter_mut().zip(inputs) {
                *w += step * x;
            }
            bias[0] += step;
        }

        &self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const ACTIVATORS: [Activator; 5] = [
        Activator::Sigmoid,
        Activator::ReLU,
        Activator::LeakyReLU,
        Activator::SoftPlus,
        Activator::Linear,
    ];

    fn textbook_layer() -> Dense {
        let weights = vec![1.74481176, -0.7612069, 0.3190391, -0.24937038];
        Dense::from_weights(3, 1, Activator::Sigmoid, weights).unwrap()
    }

    #[test]
    fn forward() {
        let mut layer = textbook_layer();
        let z = layer.forward(&[1.62434536, -0.52817175, 0.86540763]);
        assert_abs_diff_eq!(z[0], 0.96313579, epsilon = 1e-3);
        let z = layer.forward(&[-0.61175641, -1.07296862, -2.3015387]);
        assert_abs_diff_eq!(z[0], 0.22542973, epsilon = 1e-3);
    }

    #[test]
    fn shapes() {
        let layer = Dense::new(3, 4);
        assert_eq!(layer.input_len(), 3);
        assert_eq!(layer.output_len(), 4);
        assert_eq!(layer.weights().len(), 16);
        assert_eq!(layer.activator(), Activator::Sigmoid);
    }

    #[test]
    fn random_weights_in_range() {
        let layer = Dense::with_activator(5, 7, Activator::ReLU);
        assert!(layer.weights().iter().all(|w| (-1.0..=1.0).contains(w)));
    }

    #[test]
    fn seeded_weights_are_reproducible() {
        let a = Dense::random(2, 3, Activator::Sigmoid, &mut StdRng::seed_from_u64(7));
        let b = Dense::random(2, 3, Activator::Sigmoid, &mut StdRng::seed_from_u64(7));
        assert_eq!(a.weights(), b.weights());
    }

    #[test]
    fn from_weights_checks_length() {
        let err = Dense::from_weights(3, 1, Activator::Sigmoid, vec![0.0; 3]).unwrap_err();
        assert_eq!(
            err,
            Error::LengthMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn set_weights_checks_length() {
        let mut layer = textbook_layer();
        let before = layer.weights().to_vec();
        assert!(layer.set_weights(&[0.0; 5]).is_err());
        assert!(layer.set_weights(&[0.0; 3]).is_err());
        assert_eq!(layer.weights(), &before[..]);
    }

    #[test]
    fn set_weights_roundtrip() {
        let input = [0.3, -0.2, 0.9];
        let mut layer = Dense::new(3, 2);
        let expected = layer.forward(&input).to_vec();
        let weights = layer.weights().to_vec();
        layer.set_weights(&weights).unwrap();
        assert_eq!(layer.forward(&input), &expected[..]);
    }

    #[test]
    fn zero_error_is_a_no_op() {
        let input = [0.5, -1.5, 2.0];
        for &activator in ACTIVATORS.iter() {
            let mut layer = Dense::with_activator(3, 4, activator);
            let before = layer.weights().to_vec();
            layer.forward(&input);
            let errors = layer.backward(&input, &[0.0; 4], 0.5);
            assert!(errors.iter().all(|&e| e == 0.0));
            assert_eq!(layer.weights(), &before[..]);
        }
    }

    #[test]
    fn backward_propagates_with_old_weights() {
        let mut layer =
            Dense::from_weights(2, 2, Activator::Linear, vec![1.0, 2.0, 0.5, -3.0, 4.0, 0.0])
                .unwrap();
        let input = [1.0, 1.0];
        assert_eq!(layer.forward(&input), &[3.5, 1.0]);

        let errors = layer.backward(&input, &[1.0, 2.0], 10.0).to_vec();
        // delta = [1, 2]; error_j = sum_i delta_i * w_ij, before the update
        assert_eq!(errors, vec![1.0 * 1.0 + 2.0 * -3.0, 1.0 * 2.0 + 2.0 * 4.0]);
        assert_eq!(
            layer.weights(),
            &[11.0, 12.0, 10.5, 17.0, 24.0, 20.0]
        );
    }

    #[test]
    fn softplus_gradient_is_exact() {
        let mut layer = Dense::from_weights(2, 1, Activator::SoftPlus, vec![0.8, -1.3, 0.2])
            .unwrap();
        let input = [0.4, 0.9];
        layer.forward(&input);
        let analytic = layer.backward(&input, &[1.0], 0.0).to_vec();

        let h = 1e-6;
        for j in 0..2 {
            let mut hi = input;
            let mut lo = input;
            hi[j] += h;
            lo[j] -= h;
            let above = layer.forward(&hi)[0];
            let below = layer.forward(&lo)[0];
            assert_abs_diff_eq!(analytic[j], (above - below) / (2.0 * h), epsilon = 1e-6);
        }
    }

    // Use a single unit to learn the OR function.
    #[test]
    fn learns_or() {
        let x = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
        let y = [0.0, 1.0, 1.0, 1.0];
        let mut layer = Dense::new(2, 1);
        for _ in 0..1000 {
            for (x, &y) in x.iter().zip(y.iter()) {
                let e = y - layer.forward(x)[0];
                layer.backward(x, &[e], 1.0);
            }
        }
        for (x, &y) in x.iter().zip(y.iter()) {
            assert_abs_diff_eq!(layer.forward(x)[0], y, epsilon = 0.1);
        }
    }
}
