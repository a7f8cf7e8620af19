//! # Activation Layers
pub mod activation_wrapper;

pub use activation_wrapper::{Activation, ActivationConfig};
