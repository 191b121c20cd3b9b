//! Utilities for training neural networks.
//!
//! `Network::train` takes a single gradient descent step. The `Trainer` wraps
//! it in the usual epoch loop: every example is visited once per iteration,
//! and training ends when any of the configured stop conditions holds.

use std::time::{Duration, Instant};

use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{Error, Result};
use crate::feed_forward::Network;

/// The outcome of a training run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Summary {
    /// The number of completed iterations over the training examples.
    pub iterations: usize,
    /// The mean squared error averaged over the last iteration's examples.
    pub error: f64,
}

/// A builder for training networks.
#[derive(Debug)]
pub struct Trainer {
    network: Network,
    learning_rate: f64,
    logging: Logging,
    stop_conditions: Vec<StopCondition>,
    shuffle: bool,
    seed: Option<u64>,
}

impl Trainer {
    /// Creates a new Trainer instance.
    ///
    /// The trainer is initialized with some default values. These defaults are:
    ///
    /// * A learning rate of 0.1.
    /// * Stops after 1000 training iterations.
    /// * Logs on training completion.
    /// * Visits the examples in the order given.
    pub fn new(network: Network) -> Self {
        Trainer {
            network,
            learning_rate: 0.1,
            logging: Logging::Completion,
            stop_conditions: Vec::new(),
            shuffle: false,
            seed: None,
        }
    }

    /// Sets the learning rate to use during gradient descent.
    pub fn learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    /// Sets the type of logging to be emitted during training.
    pub fn logging(mut self, logging: Logging) -> Self {
        self.logging = logging;
        self
    }

    /// Adds a condition to finish training.
    ///
    /// Training stops as soon as any added condition holds. Without any,
    /// training stops after 1000 iterations.
    pub fn stop_condition<C>(mut self, condition: C) -> Self
    where
        C: Into<StopCondition>,
    {
        self.stop_conditions.push(condition.into());
        self
    }

    /// Visits the examples in a fresh random order on every iteration.
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Seeds the random number generator used for shuffling.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns the network being trained.
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Returns mutable access to the network being trained.
    pub fn network_mut(&mut self) -> &mut Network {
        &mut self.network
    }

    /// Consumes the trainer, returning its network.
    pub fn into_network(self) -> Network {
        self.network
    }

    /// Trains the network using the provided labelled data.
    ///
    /// The provided `examples` should be a list of labelled data, where each
    /// element takes the form `(network input, expected output)`.
    ///
    /// Returns:
    ///   A summary of the final iteration, or an error if the examples do not
    ///   fit the network. The network is left untouched on error, and training
    ///   may be resumed by calling `train` again.
    pub fn train<I, O>(&mut self, examples: &[(I, O)]) -> Result<Summary>
    where
        I: AsRef<[f64]>,
        O: AsRef<[f64]>,
    {
        self.validate(examples)?;
        let default_stop = [StopCondition::Iterations(1000)];
        let stop_conditions = if self.stop_conditions.is_empty() {
            &default_stop[..]
        } else {
            &self.stop_conditions[..]
        };

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut order: Vec<usize> = (0..examples.len()).collect();

        let start_time = Instant::now();
        let mut iteration = 0;
        let mut training_error;
        loop {
            if self.shuffle {
                order.shuffle(&mut rng);
            }
            training_error = 0.0;
            for &i in &order {
                let (ref input, ref expected) = examples[i];
                training_error += self.network.train(
                    input.as_ref(),
                    expected.as_ref(),
                    self.learning_rate,
                );
            }
            training_error /= examples.len() as f64;
            iteration += 1;

            self.logging.iteration(iteration, training_error);
            if stop_conditions
                .iter()
                .any(|c| c.should_stop(iteration, training_error, start_time))
            {
                break;
            }
        }
        self.logging.completion(iteration, training_error, start_time);
        Ok(Summary {
            iterations: iteration,
            error: training_error,
        })
    }

    /// Verifies that the provided examples fit the network, returning an
    /// error if something is wrong.
    pub fn validate<I, O>(&self, examples: &[(I, O)]) -> Result<()>
    where
        I: AsRef<[f64]>,
        O: AsRef<[f64]>,
    {
        if examples.is_empty() {
            return Err(Error::EmptyDataset);
        }
        let inputs = self.network.input_len();
        let outputs = self.network.output_len();
        for (index, (input, output)) in examples.iter().enumerate() {
            let widths = [
                (input.as_ref().len(), inputs),
                (output.as_ref().len(), outputs),
            ];
            for (actual, expected) in widths {
                if actual != expected {
                    return Err(Error::InvalidExample {
                        index,
                        expected,
                        actual,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Logging frequency to use during training
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Logging {
    /// No logs will be emitted
    Silent,
    /// A summary will be logged at completion
    Completion,
    /// A summary will be logged after every `n` training iterations
    Iterations(usize),
}

impl Logging {
    /// Performs logging at the current `iteration` of training.
    fn iteration(&self, iteration: usize, training_error: f64) {
        if let Logging::Iterations(freq) = *self {
            if freq > 0 && iteration % freq == 0 {
                info!("Iteration {}:\tMSE={}", iteration, training_error);
            }
        }
    }

    /// Performs logging at the end of training.
    fn completion(&self, iterations: usize, training_error: f64, start_time: Instant) {
        if let Logging::Silent = *self {
            return;
        }
        info!(
            "Ran {} iterations in {:.3} seconds.",
            iterations,
            start_time.elapsed().as_secs_f64()
        );
        info!("Final MSE: {}", training_error);
    }
}

/// When to stop training
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum StopCondition {
    /// Stops after the provided number of training iterations
    Iterations(usize),
    /// Stops when the training error drops below the provided threshold
    ErrorThreshold(f64),
    /// Stops after the provided duration
    Duration(Duration),
}

impl From<Duration> for StopCondition {
    fn from(duration: Duration) -> StopCondition {
        StopCondition::Duration(duration)
    }
}

impl StopCondition {
    /// Returns true if training is complete.
    fn should_stop(&self, iteration: usize, training_error: f64, start_time: Instant) -> bool {
        match *self {
            StopCondition::Iterations(iterations) => iteration >= iterations,
            StopCondition::ErrorThreshold(threshold) => training_error < threshold,
            StopCondition::Duration(duration) => start_time.elapsed() >= duration,
        }
    }
}
