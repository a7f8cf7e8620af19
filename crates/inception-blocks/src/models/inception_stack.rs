//! # Inception Stack
//!
//! An [`InceptionStack`] is a sequence of [`AnyInceptionBlock`]s,
//! where each block consumes the channels its predecessor produces.
//!
//! [`InceptionStackConfig`] implements [`Config`]; it does not fix an input
//! channel count, so [`InceptionStackConfig::init`] takes one and threads it
//! through [`InceptionBlockConfig::output_channels`].
//!
//! [`InceptionStack`] implements [`Module`] and [`InceptionBlock`].

use crate::layers::inception::any_block::{AnyInceptionBlock, AnyInceptionBlockConfig};
use crate::layers::inception::{InceptionBlock, InceptionBlockConfig};
use bimm_contracts::{assert_shape_contract_periodically, unpack_shape_contract};
use burn::config::Config;
use burn::prelude::{Backend, Module, Tensor};

/// [`InceptionStack`] Config.
#[derive(Config, Debug)]
pub struct InceptionStackConfig {
    /// The component blocks, in forward order.
    pub blocks: Vec<AnyInceptionBlockConfig>,
}

impl From<Vec<AnyInceptionBlockConfig>> for InceptionStackConfig {
    fn from(blocks: Vec<AnyInceptionBlockConfig>) -> Self {
        Self { blocks }
    }
}

impl InceptionStackConfig {
    /// The number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Append a block.
    pub fn with_block<C>(
        mut self,
        block: C,
    ) -> Self
    where
        C: Into<AnyInceptionBlockConfig>,
    {
        self.blocks.push(block.into());
        self
    }

    /// The input channel count of every block, in order.
    ///
    /// # Arguments
    ///
    /// - `in_channels`: input channels of the first block.
    pub fn block_in_channels(
        &self,
        in_channels: usize,
    ) -> Vec<usize> {
        self.blocks
            .iter()
            .scan(in_channels, |channels, block| {
                let current = *channels;
                *channels = block.output_channels(current);
                Some(current)
            })
            .collect()
    }

    /// Output channel count of the stack.
    ///
    /// An empty stack passes its input through.
    pub fn output_channels(
        &self,
        in_channels: usize,
    ) -> usize {
        self.blocks
            .iter()
            .fold(in_channels, |channels, block| block.output_channels(channels))
    }

    /// Initialize a new [`InceptionStack`].
    ///
    /// # Panics
    ///
    /// If `in_channels` is zero, or if any block rejects its build arguments.
    pub fn init<B: Backend>(
        &self,
        in_channels: usize,
        device: &B::Device,
    ) -> InceptionStack<B> {
        assert!(
            in_channels > 0,
            "inception_stack: in_channels must be > 0, got {in_channels}"
        );

        let blocks = self
            .blocks
            .iter()
            .zip(self.block_in_channels(in_channels))
            .map(|(block, channels)| block.init::<B>(channels, device))
            .collect();

        InceptionStack {
            in_channels,
            blocks,
        }
    }
}

/// Inception Stack.
///
/// Built by [`InceptionStackConfig`].
#[derive(Module, Debug)]
pub struct InceptionStack<B: Backend> {
    /// Input channels of the stack; kept for empty stacks.
    pub in_channels: usize,

    /// Internal blocks.
    pub blocks: Vec<AnyInceptionBlock<B>>,
}

impl<B: Backend> InceptionStack<B> {
    /// The number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl<B: Backend> InceptionBlock<B> for InceptionStack<B> {
    fn in_channels(&self) -> usize {
        self.in_channels
    }

    fn out_channels(&self) -> usize {
        match self.blocks.last() {
            Some(block) => block.out_channels(),
            None => self.in_channels,
        }
    }

    fn forward(
        &self,
        input: Tensor<B, 4>,
    ) -> Tensor<B, 4> {
        let [batch, height, width] = unpack_shape_contract!(
            ["batch", "in_channels", "height", "width"],
            &input,
            &["batch", "height", "width"],
            &[("in_channels", self.in_channels())]
        );

        let x = self.blocks.iter().fold(input, |x, block| block.forward(x));

        assert_shape_contract_periodically!(
            ["batch", "out_channels", "height", "width"],
            &x,
            &[
                ("batch", batch),
                ("out_channels", self.out_channels()),
                ("height", height),
                ("width", width)
            ]
        );

        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::inception::v1_basic::InceptionV1BasicConfig;
    use crate::layers::inception::v1_reduction::InceptionV1ReductionConfig;
    use crate::layers::inception::v2_deep::InceptionV2DeepConfig;
    use crate::layers::inception::v2_wide::InceptionV2WideConfig;
    use bimm_contracts::assert_shape_contract;
    use burn::backend::{Autodiff, NdArray};
    use burn::tensor::Distribution;
    use hamcrest::prelude::*;

    fn mixed_config() -> InceptionStackConfig {
        InceptionStackConfig::new(vec![])
            .with_block(InceptionV1BasicConfig::new().with_filters(4))
            .with_block(InceptionV1ReductionConfig::new().with_filters(5))
            .with_block(InceptionV2DeepConfig::new().with_filters(3))
            .with_block(InceptionV2WideConfig::new().with_filters(2))
    }

    #[test]
    fn test_config_channel_chain() {
        let config = mixed_config();
        assert_that!(config.len(), equal_to(4));

        // 3 -> 3*4+3 -> 4*5 -> 4*3 -> 6*2
        assert_eq!(config.block_in_channels(3), vec![3, 15, 20, 12]);
        assert_that!(config.output_channels(3), equal_to(12));
    }

    #[test]
    fn test_empty_stack_is_identity() {
        type B = NdArray<f32>;
        let device = Default::default();

        let config = InceptionStackConfig::new(vec![]);
        assert!(config.is_empty());
        assert_eq!(config.output_channels(7), 7);

        let stack: InceptionStack<B> = config.init(7, &device);
        assert!(stack.is_empty());
        assert_eq!(stack.in_channels(), 7);
        assert_eq!(stack.out_channels(), 7);

        let input = Tensor::random([1, 7, 3, 3], Distribution::Default, &device);
        let output = stack.forward(input.clone());
        output.to_data().assert_eq(&input.to_data(), true);
    }

    #[test]
    fn test_forward() {
        type B = Autodiff<NdArray<f32>>;
        let device = Default::default();

        let stack: InceptionStack<B> = mixed_config().init(3, &device);
        assert_eq!(stack.len(), 4);
        assert_eq!(stack.in_channels(), 3);
        assert_eq!(stack.out_channels(), 12);

        let channels: Vec<[usize; 2]> = stack
            .blocks
            .iter()
            .map(|block| [block.in_channels(), block.out_channels()])
            .collect();
        assert_eq!(channels, vec![[3, 15], [15, 20], [20, 12], [12, 12]]);

        let input = Tensor::random([2, 3, 6, 5], Distribution::Default, &device);
        let output = stack.forward(input);

        assert_shape_contract!(
            ["batch", "out_channels", "height", "width"],
            &output,
            &[
                ("batch", 2),
                ("out_channels", 12),
                ("height", 6),
                ("width", 5)
            ],
        );
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = mixed_config();
        let json = config.to_string();
        let loaded = InceptionStackConfig::load_binary(json.as_bytes()).unwrap();

        assert_eq!(loaded.len(), 4);
        assert_eq!(loaded.block_in_channels(3), config.block_in_channels(3));
    }

    #[test]
    #[should_panic(expected = "in_channels must be > 0")]
    fn test_zero_in_channels_panics() {
        type B = NdArray<f32>;
        let device = Default::default();
        let _stack: InceptionStack<B> = mixed_config().init(0, &device);
    }
}
