//! A small feedforward neural network library.
//!
//! Networks are sequences of [`layers::Layer`]s, trained one example at a time
//! by backpropagation and stochastic gradient descent. The only layer type
//! provided is the fully connected [`layers::Dense`].
//!
//! None of the types here synchronize internally. Every kernel takes
//! `&mut self`, so use one network per thread or put it behind a lock.

#[macro_use]
extern crate serde_derive;

pub mod activator;
pub mod data;
pub mod feed_forward;
pub mod layers;
pub mod trainer;

mod error;

pub use crate::error::{Error, Result};
