//! # Models
//!
//! Compositions of [`crate::layers::inception`] blocks.

pub mod inception_stack;
