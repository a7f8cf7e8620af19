//! # Inception Blocks
//!
//! An Inception block runs several convolution/pooling branches over the
//! same input, and concatenates their outputs along the channel dimension.
//!
//! Every block in this module:
//! * is configured by a [`Config`] implementing [`InceptionBlockConfig`],
//! * is built by [`InceptionBlockConfig::init`] once the input channel count is known,
//! * runs through [`InceptionBlock::forward`].
//!
//! All branches use stride 1 and "same" padding, so every block maps
//! ``[batch, in_channels, height, width]`` to
//! ``[batch, out_channels, height, width]``.
//!
//! [`lazy::LazyInceptionBlock`] defers [`InceptionBlockConfig::init`]
//! to the first forward call.

use burn::config::Config;
use burn::module::Module;
use burn::prelude::{Backend, Tensor};

pub mod any_block;
pub mod lazy;
pub mod v1_basic;
pub mod v1_reduction;
pub mod v2_basic;
pub mod v2_deep;
pub mod v2_wide;

/// Default filter count of the V1 blocks.
pub const V1_DEFAULT_FILTERS: usize = 64;

/// Default filter count of the V2 blocks.
pub const V2_DEFAULT_FILTERS: usize = 28;

/// The concatenation axis of ``[batch, channels, height, width]`` tensors.
pub const CHANNEL_DIM: usize = 1;

/// Build capability shared by all Inception block configs.
pub trait InceptionBlockConfig: Config {
    /// The block module this config builds.
    type Block<B: Backend>: InceptionBlock<B>;

    /// Optional human-readable name of the block.
    fn name(&self) -> Option<&str>;

    /// Per-branch filter count.
    fn filters(&self) -> usize;

    /// Output channel count for a given input channel count.
    fn output_channels(
        &self,
        in_channels: usize,
    ) -> usize;

    /// Build the block and all its sub-layers for `in_channels` inputs.
    ///
    /// # Panics
    ///
    /// If `in_channels` or the filter count is zero.
    fn init<B: Backend>(
        &self,
        in_channels: usize,
        device: &B::Device,
    ) -> Self::Block<B>;
}

/// Forward capability shared by all Inception block modules.
pub trait InceptionBlock<B: Backend>: Module<B> {
    /// Number of input channels.
    fn in_channels(&self) -> usize;

    /// Number of output channels.
    fn out_channels(&self) -> usize;

    /// Forward Pass.
    ///
    /// # Arguments
    ///
    /// - `input`: ``[batch, in_channels, height, width]``.
    ///
    /// # Returns
    ///
    /// ``[batch, out_channels, height, width]``
    fn forward(
        &self,
        input: Tensor<B, 4>,
    ) -> Tensor<B, 4>;
}

/// Check the shared build arguments of a block.
///
/// # Panics
///
/// If either count is zero.
pub(crate) fn expect_build_args(
    block: &'static str,
    in_channels: usize,
    filters: usize,
) {
    assert!(
        in_channels > 0,
        "{block}: in_channels must be > 0, got {in_channels}"
    );
    assert!(filters > 0, "{block}: filters must be > 0, got {filters}");
}

/// Concatenate named branch outputs along [`CHANNEL_DIM`].
///
/// Branches are concatenated in the given order.
///
/// # Arguments
///
/// - `block`: the block name, for diagnostics.
/// - `branches`: ``(branch_name, [batch, channels_i, height, width])`` pairs.
///
/// # Returns
///
/// ``[batch, sum(channels_i), height, width]``
///
/// # Panics
///
/// If `branches` is empty, or if any branch disagrees with the first
/// branch on a non-channel dimension; the message names the branch.
pub fn concat_branches<B: Backend>(
    block: &'static str,
    branches: Vec<(&'static str, Tensor<B, 4>)>,
) -> Tensor<B, 4> {
    let Some((first_name, first)) = branches.first() else {
        panic!("{block}: no branches to concatenate");
    };
    let [batch, _, height, width] = first.dims();

    for (name, branch) in &branches[1..] {
        let [b, _, h, w] = branch.dims();
        if [b, h, w] != [batch, height, width] {
            panic!(
                "{block}: branch {name} has [batch, height, width] = [{b}, {h}, {w}], \
                 expected [{batch}, {height}, {width}] (from branch {first_name})"
            );
        }
    }

    Tensor::cat(
        branches.into_iter().map(|(_, tensor)| tensor).collect(),
        CHANNEL_DIM,
    )
}
