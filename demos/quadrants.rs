//! Trains a network to tell whether a noisy point on the unit circle lies in
//! the first/third or second/fourth quadrant.
//!
//! Run with `RUST_LOG=info cargo run --example quadrants`.

use rand::distributions::{Distribution, Uniform};
use rand_distr::Normal;

use sgdnet::activator::Activator;
use sgdnet::feed_forward::Network;
use sgdnet::trainer::{Logging, StopCondition, Trainer};

type Input = Vec<f64>;
type Output = Vec<f64>;

fn generate_data(num_samples: usize) -> Vec<(Input, Output)> {
    let mut rng = rand::thread_rng();
    let radians = Uniform::new(0.0, 2.0 * std::f64::consts::PI);
    let noise = Normal::new(0.0, 0.1).expect("valid standard deviation");

    let mut data = Vec::new();
    for _ in 0..num_samples {
        let theta = radians.sample(&mut rng);
        let dx = noise.sample(&mut rng);
        let dy = noise.sample(&mut rng);
        let point = vec![theta.cos() + dx, theta.sin() + dy];
        let class = if point[0] * point[1] > 0.0 {
            vec![1.0, 0.0]
        } else {
            vec![0.0, 1.0]
        };
        data.push((point, class));
    }
    data
}

fn score(set_name: &str, network: &mut Network, test_data: &[(Input, Output)]) {
    let mut num_correct = 0;
    for (input, expected) in test_data {
        let output = network.predict(input);
        let class = if output[0] > output[1] { 0 } else { 1 };
        if expected[class] == 1.0 {
            num_correct += 1;
        }
    }
    println!(
        "{} set results: {} of {} correct",
        set_name,
        num_correct,
        test_data.len()
    );
}

fn main() -> Result<(), sgdnet::Error> {
    env_logger::init();

    let training_data = generate_data(2_000);
    let network = Network::from_sizes(Activator::Sigmoid, &[2, 5, 5, 2])?;
    let mut trainer = Trainer::new(network)
        .learning_rate(0.3)
        .shuffle(true)
        .stop_condition(StopCondition::ErrorThreshold(0.01))
        .stop_condition(StopCondition::Iterations(200))
        .logging(Logging::Iterations(20));
    let summary = trainer.train(&training_data)?;
    let mut network = trainer.into_network();

    println!(
        "Stopped after {} iterations with MSE {:.5}",
        summary.iterations, summary.error
    );
    score("Training", &mut network, &training_data);
    score("Test", &mut network, &generate_data(1_000));
    Ok(())
}
