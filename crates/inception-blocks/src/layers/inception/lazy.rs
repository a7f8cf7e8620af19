//! # Lazily Built Inception Blocks
//!
//! A block's convolution shapes depend on its input channel count.
//! [`LazyInceptionBlock`] holds a config and a device, and builds the block
//! on the first [`LazyInceptionBlock::forward`] call, from that input's shape.
//!
//! Construction happens exactly once per wrapper; concurrent first calls
//! race on a [`OnceLock`], and exactly one of them builds.
//! Every later call reuses the same block, and so the same weights.

use crate::layers::inception::{CHANNEL_DIM, InceptionBlock, InceptionBlockConfig};
use burn::prelude::{Backend, Tensor};
use std::sync::OnceLock;

/// An [`InceptionBlockConfig`] whose block is built on first use.
pub struct LazyInceptionBlock<B: Backend, C: InceptionBlockConfig> {
    config: C,
    device: B::Device,
    block: OnceLock<C::Block<B>>,
}

impl<B: Backend, C: InceptionBlockConfig> LazyInceptionBlock<B, C> {
    /// Wrap `config`; nothing is built until the first forward.
    pub fn new(
        config: C,
        device: &B::Device,
    ) -> Self {
        Self {
            config,
            device: device.clone(),
            block: OnceLock::new(),
        }
    }

    /// The wrapped config.
    pub fn config(&self) -> &C {
        &self.config
    }

    /// Has the block been built?
    pub fn is_built(&self) -> bool {
        self.block.get().is_some()
    }

    /// The built block, if any.
    pub fn block(&self) -> Option<&C::Block<B>> {
        self.block.get()
    }

    /// Take the built block, if any.
    pub fn into_block(self) -> Option<C::Block<B>> {
        self.block.into_inner()
    }

    /// Build the block for `in_channels`, unless it is already built.
    ///
    /// Returns the block; a block built earlier is returned unchanged,
    /// even if it was built for a different channel count.
    pub fn build(
        &self,
        in_channels: usize,
    ) -> &C::Block<B> {
        self.block.get_or_init(|| {
            tracing::debug!(
                name = ?self.config.name(),
                in_channels,
                out_channels = self.config.output_channels(in_channels),
                "building inception block"
            );
            self.config.init::<B>(in_channels, &self.device)
        })
    }

    /// Forward Pass.
    ///
    /// Builds the block from the input's channel count on the first call.
    ///
    /// # Arguments
    ///
    /// - `input`: ``[batch, in_channels, height, width]``.
    ///
    /// # Returns
    ///
    /// ``[batch, out_channels, height, width]``
    ///
    /// # Panics
    ///
    /// If a later input's channel count differs from the first.
    pub fn forward(
        &self,
        input: Tensor<B, 4>,
    ) -> Tensor<B, 4> {
        let in_channels = input.dims()[CHANNEL_DIM];
        self.build(in_channels).forward(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::inception::v1_basic::InceptionV1BasicConfig;
    use crate::layers::inception::v2_deep::InceptionV2DeepConfig;
    use crate::layers::inception::v2_wide::InceptionV2WideConfig;
    use burn::backend::NdArray;
    use burn::tensor::Distribution;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_builds_on_first_forward() {
        let device = Default::default();
        let lazy: LazyInceptionBlock<TestBackend, _> =
            LazyInceptionBlock::new(InceptionV2DeepConfig::new().with_filters(4), &device);

        assert!(!lazy.is_built());
        assert!(lazy.block().is_none());
        assert_eq!(lazy.config().filters, 4);

        let input = Tensor::random([1, 5, 6, 6], Distribution::Default, &device);
        let output = lazy.forward(input);

        assert!(lazy.is_built());
        assert_eq!(output.dims(), [1, 16, 6, 6]);

        let block = lazy.into_block().unwrap();
        assert_eq!(block.in_channels(), 5);
        assert_eq!(block.out_channels(), 16);
    }

    #[test]
    fn test_builds_exactly_once() {
        let device = Default::default();
        let lazy: LazyInceptionBlock<TestBackend, _> =
            LazyInceptionBlock::new(InceptionV2WideConfig::new().with_filters(3), &device);

        let input = Tensor::random([2, 4, 5, 5], Distribution::Default, &device);
        let first = lazy.forward(input.clone());
        let first_block: *const _ = lazy.block().unwrap();

        let second = lazy.forward(input);
        let second_block: *const _ = lazy.block().unwrap();

        // A rebuilt block would carry fresh random weights.
        assert_eq!(first_block, second_block);
        first.to_data().assert_eq(&second.to_data(), true);
    }

    #[test]
    fn test_build_keeps_first_block() {
        let device = Default::default();
        let lazy: LazyInceptionBlock<TestBackend, _> =
            LazyInceptionBlock::new(InceptionV1BasicConfig::new().with_filters(2), &device);

        assert_eq!(lazy.build(3).in_channels(), 3);
        assert_eq!(lazy.build(7).in_channels(), 3);
    }

    #[test]
    #[should_panic]
    fn test_channel_change_panics() {
        let device = Default::default();
        let lazy: LazyInceptionBlock<TestBackend, _> =
            LazyInceptionBlock::new(InceptionV1BasicConfig::new().with_filters(2), &device);

        let _ = lazy.forward(Tensor::zeros([1, 3, 4, 4], &device));
        let _ = lazy.forward(Tensor::zeros([1, 2, 4, 4], &device));
    }
}
