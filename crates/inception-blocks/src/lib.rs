#![warn(missing_docs)]
//!# inception-blocks - Inception Blocks for Burn
//!
//! ## Notable Components
//!
//! * [`layers`] - reusable neural network modules.
//!   * [`layers::activation`] - activation layer abstraction wrapper.
//!   * [`layers::blocks::conv_act`] - ``Conv2d + Activation`` block.
//!   * [`layers::padding`] - TensorFlow-style "same" padding.
//!   * [`layers::pool::max_pool_2d_same`] - "same" max pooling.
//!   * [`layers::inception`] - the Inception block family.
//!     * [`layers::inception::v1_basic`] - naive V1 block.
//!     * [`layers::inception::v1_reduction`] - V1 block with 1x1 bottlenecks.
//!     * [`layers::inception::v2_basic`] - V2 block with stacked 3x3 convolutions.
//!     * [`layers::inception::v2_deep`] - V2 block with stacked factorized convolutions.
//!     * [`layers::inception::v2_wide`] - V2 block with sibling factorized convolutions.
//!     * [`layers::inception::lazy`] - build-on-first-forward wrapper.
//!     * [`layers::inception::any_block`] - enum dispatch over the family.
//! * [`models`] - compositions of blocks.
//!   * [`models::inception_stack`] - a channel-chained stack of blocks.
//!
//! All tensors are ``[batch, channels, height, width]``;
//! blocks concatenate their branches along the channel dimension.

/// Test-only macro import.
#[cfg(test)]
#[allow(unused_imports)]
#[macro_use]
extern crate hamcrest;

pub mod layers;
pub mod models;
