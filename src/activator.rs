//! Activation function types.

/// Slope used by `LeakyReLU` for negative inputs.
pub const LEAKY_SLOPE: f64 = 0.01;

/// [Activation function](https://en.wikipedia.org/wiki/Activation_function)
/// types.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activator {
    /// Sigmoid function
    #[default]
    Sigmoid,
    /// Rectified Linear Unit
    #[serde(rename = "relu")]
    ReLU,
    /// Leaky Rectified Linear Unit, with a fixed slope of `0.01` for negative
    /// inputs.
    #[serde(rename = "leaky_relu")]
    LeakyReLU,
    /// Smooth approximation of ReLU, `ln(1 + e^x)`.
    SoftPlus,
    /// Identity function
    Linear,
}

impl Activator {
    /// Evaluates `f(x)` for the selected the activation function.
    pub fn f(&self, x: f64) -> f64 {
        match *self {
            Activator::Sigmoid => sigmoid(x),
            Activator::ReLU => if x > 0.0 { x } else { 0.0 },
            Activator::LeakyReLU => if x > 0.0 { x } else { LEAKY_SLOPE * x },
            // Rearranged so that large |x| neither overflows nor loses the
            // linear tail.
            Activator::SoftPlus => x.max(0.0) + (-x.abs()).exp().ln_1p(),
            Activator::Linear => x,
        }
    }

    /// Evaluates the derivative `f'(x)`, where `y = f(x)`.
    ///
    /// Most variants only look at the *output* `y` of the activation
    /// function, so callers do not need to know the pre-activation value
    /// `x` for them. `SoftPlus` has no closed form in terms of `y` that is
    /// cheaper than its closed form in `x`, so it reads `x` instead.
    pub fn fprime(&self, x: f64, y: f64) -> f64 {
        match *self {
            Activator::Sigmoid => y * (1.0 - y),
            Activator::ReLU => if y > 0.0 { 1.0 } else { 0.0 },
            Activator::LeakyReLU => if y > 0.0 { 1.0 } else { LEAKY_SLOPE },
            Activator::SoftPlus => sigmoid(x),
            Activator::Linear => 1.0,
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const ALL: [Activator; 5] = [
        Activator::Sigmoid,
        Activator::ReLU,
        Activator::LeakyReLU,
        Activator::SoftPlus,
        Activator::Linear,
    ];

    #[test]
    fn sigmoid_values() {
        assert_eq!(Activator::Sigmoid.f(0.0), 0.5);
        assert_abs_diff_eq!(Activator::Sigmoid.f(2.0), 0.880797, epsilon = 1e-4);
    }

    #[test]
    fn default_is_sigmoid() {
        assert_eq!(Activator::default(), Activator::Sigmoid);
    }

    #[test]
    fn rectifiers() {
        assert_eq!(Activator::ReLU.f(-3.0), 0.0);
        assert_eq!(Activator::ReLU.f(3.0), 3.0);
        assert_abs_diff_eq!(Activator::LeakyReLU.f(-3.0), -0.03, epsilon = 1e-12);
        assert_eq!(Activator::LeakyReLU.f(3.0), 3.0);
        assert_eq!(Activator::ReLU.fprime(-3.0, 0.0), 0.0);
        assert_eq!(Activator::LeakyReLU.fprime(-3.0, -0.03), LEAKY_SLOPE);
        assert_eq!(Activator::Linear.f(-7.5), -7.5);
        assert_eq!(Activator::Linear.fprime(-7.5, -7.5), 1.0);
    }

    #[test]
    fn softplus_is_stable() {
        assert_abs_diff_eq!(Activator::SoftPlus.f(0.0), 2f64.ln(), epsilon = 1e-12);
        assert_abs_diff_eq!(Activator::SoftPlus.f(1000.0), 1000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(Activator::SoftPlus.f(-1000.0), 0.0, epsilon = 1e-9);
        assert!(Activator::SoftPlus.f(-1000.0) >= 0.0);
    }

    #[test]
    fn derivatives_match_finite_differences() {
        let h = 1e-6;
        for activator in ALL.iter() {
            // Stay away from the kink at zero for the rectifiers.
            for &x in [-2.5, -0.7, 0.4, 1.9].iter() {
                let numeric =
                    (activator.f(x + h) - activator.f(x - h)) / (2.0 * h);
                let analytic = activator.fprime(x, activator.f(x));
                assert_abs_diff_eq!(numeric, analytic, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn serde_names() {
        let names: Vec<String> = ALL
            .iter()
            .map(|a| serde_json::to_string(a).unwrap())
            .collect();
        assert_eq!(
            names,
            [
                "\"sigmoid\"",
                "\"relu\"",
                "\"leaky_relu\"",
                "\"soft_plus\"",
                "\"linear\""
            ]
        );
        let parsed: Activator = serde_json::from_str("\"leaky_relu\"").unwrap();
        assert_eq!(parsed, Activator::LeakyReLU);
    }
}
