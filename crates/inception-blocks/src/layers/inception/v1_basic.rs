//! # Inception V1 Basic Block
//!
//! The naive Inception module: four parallel branches over the same input.
//!
//! ```text
//!            +-> conv 1x1 ---------+
//!            +-> conv 3x3 ---------+
//! input -----+-> conv 5x5 ---------+--> concat(channels)
//!            +-> max-pool 3x3 -----+
//! ```
//!
//! The pool branch passes the input channels through unchanged, so
//! ``out_channels = 3 * filters + in_channels``.

use crate::layers::activation::ActivationConfig;
use crate::layers::blocks::conv_act::{ConvAct2d, ConvAct2dConfig, ConvAct2dMeta};
use crate::layers::inception::{
    InceptionBlock, InceptionBlockConfig, V1_DEFAULT_FILTERS, concat_branches, expect_build_args,
};
use crate::layers::pool::max_pool_2d_same::{MaxPool2dSame, MaxPool2dSameConfig};
use bimm_contracts::{assert_shape_contract_periodically, unpack_shape_contract};
use burn::prelude::{Backend, Config, Module, Tensor};

const BLOCK: &str = "inception_v1_basic";

/// [`InceptionV1Basic`] Config.
#[derive(Config, Debug)]
pub struct InceptionV1BasicConfig {
    /// Filters of each convolution branch.
    #[config(default = "V1_DEFAULT_FILTERS")]
    pub filters: usize,

    /// Activation applied after every convolution.
    #[config(default = "ActivationConfig::Relu")]
    pub activation: ActivationConfig,

    /// Optional block name.
    #[config(default = "None")]
    pub name: Option<String>,
}

impl InceptionBlockConfig for InceptionV1BasicConfig {
    type Block<B: Backend> = InceptionV1Basic<B>;

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn filters(&self) -> usize {
        self.filters
    }

    fn output_channels(
        &self,
        in_channels: usize,
    ) -> usize {
        3 * self.filters + in_channels
    }

    fn init<B: Backend>(
        &self,
        in_channels: usize,
        device: &B::Device,
    ) -> InceptionV1Basic<B> {
        expect_build_args(BLOCK, in_channels, self.filters);
        tracing::trace!(block = BLOCK, name = ?self.name, in_channels, "init");

        let conv = |kernel_size: [usize; 2]| -> ConvAct2d<B> {
            ConvAct2dConfig::same(
                [in_channels, self.filters],
                kernel_size,
                self.activation.clone(),
            )
            .init(device)
        };

        InceptionV1Basic {
            conv_1x1: conv([1, 1]),
            conv_3x3: conv([3, 3]),
            conv_5x5: conv([5, 5]),
            pool: MaxPool2dSameConfig::new([3, 3]).init(),
        }
    }
}

/// Inception V1 Basic Block.
///
/// Built by [`InceptionV1BasicConfig`].
#[derive(Module, Debug)]
pub struct InceptionV1Basic<B: Backend> {
    /// 1x1 branch.
    pub conv_1x1: ConvAct2d<B>,

    /// 3x3 branch.
    pub conv_3x3: ConvAct2d<B>,

    /// 5x5 branch.
    pub conv_5x5: ConvAct2d<B>,

    /// 3x3 max-pool branch.
    pub pool: MaxPool2dSame,
}

impl<B: Backend> InceptionV1Basic<B> {
    /// Filters of each convolution branch.
    pub fn filters(&self) -> usize {
        self.conv_1x1.out_channels()
    }
}

impl<B: Backend> InceptionBlock<B> for InceptionV1Basic<B> {
    fn in_channels(&self) -> usize {
        self.conv_1x1.in_channels()
    }

    fn out_channels(&self) -> usize {
        3 * self.filters() + self.in_channels()
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

        let x = concat_branches(
            BLOCK,
            vec![
                ("1x1", self.conv_1x1.forward(input.clone())),
                ("3x3", self.conv_3x3.forward(input.clone())),
                ("5x5", self.conv_5x5.forward(input.clone())),
                ("pool", self.pool.forward(input)),
            ],
        );

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
    use bimm_contracts::assert_shape_contract;
    use burn::backend::{Autodiff, NdArray};
    use burn::tensor::Distribution;
    use hamcrest::prelude::*;

    #[test]
    fn test_config_defaults() {
        let config = InceptionV1BasicConfig::new();

        assert_that!(config.filters(), equal_to(64));
        assert_that!(config.output_channels(3), equal_to(195));
        assert_that!(config.output_channels(64), equal_to(256));
        assert!(matches!(config.activation, ActivationConfig::Relu));
        assert_eq!(InceptionBlockConfig::name(&config), None);

        let config = config.with_name(Some("mixed_3a".to_string()));
        assert_eq!(InceptionBlockConfig::name(&config), Some("mixed_3a"));
    }

    #[test]
    fn test_branch_kernels() {
        type B = NdArray<f32>;
        let device = Default::default();

        let block: InceptionV1Basic<B> = InceptionV1BasicConfig::new()
            .with_filters(4)
            .init(3, &device);

        assert_eq!(block.conv_1x1.kernel_size(), [1, 1]);
        assert_eq!(block.conv_3x3.kernel_size(), [3, 3]);
        assert_eq!(block.conv_5x5.kernel_size(), [5, 5]);
        assert_eq!(block.pool.kernel_size, [3, 3]);
        assert_eq!(block.pool.stride, [1, 1]);
        assert_eq!(block.in_channels(), 3);
        assert_eq!(block.out_channels(), 15);
    }

    #[test]
    fn test_forward_default_rgb() {
        type B = NdArray<f32>;
        let device = Default::default();

        let block: InceptionV1Basic<B> = InceptionV1BasicConfig::new().init(3, &device);

        let input = Tensor::random([1, 3, 32, 32], Distribution::Default, &device);
        let output = block.forward(input);

        assert_shape_contract!(
            ["batch", "out_channels", "height", "width"],
            &output,
            &[
                ("batch", 1),
                ("out_channels", 195),
                ("height", 32),
                ("width", 32)
            ],
        );
    }

    #[test]
    fn test_forward_64_channels_autodiff() {
        type B = Autodiff<NdArray<f32>>;
        let device = Default::default();

        let block: InceptionV1Basic<B> = InceptionV1BasicConfig::new().init(64, &device);

        let input = Tensor::random([2, 64, 8, 8], Distribution::Default, &device);
        let output = block.forward(input);

        assert_eq!(output.dims(), [2, 256, 8, 8]);
    }

    #[test]
    fn test_pool_branch_passes_input() {
        type B = NdArray<f32>;
        let device = Default::default();

        let block: InceptionV1Basic<B> = InceptionV1BasicConfig::new()
            .with_filters(2)
            .init(1, &device);

        // A constant input pools to itself.
        let input: Tensor<B, 4> = Tensor::full([1, 1, 5, 5], 3.0, &device);
        let output = block.forward(input.clone());

        let pooled = output.slice([0..1, 6..7, 0..5, 0..5]);
        pooled.to_data().assert_eq(&input.to_data(), true);
    }

    #[test]
    fn test_forward_is_repeatable() {
        type B = NdArray<f32>;
        let device = Default::default();

        let block: InceptionV1Basic<B> = InceptionV1BasicConfig::new()
            .with_filters(8)
            .init(3, &device);

        let input = Tensor::random([1, 3, 6, 6], Distribution::Default, &device);
        let first = block.forward(input.clone());
        let second = block.forward(input);

        first.to_data().assert_eq(&second.to_data(), true);
    }

    #[test]
    fn test_forward_smaller_than_kernel() {
        type B = NdArray<f32>;
        let device = Default::default();

        let block: InceptionV1Basic<B> = InceptionV1BasicConfig::new().init(2, &device);

        for [height, width] in [[1, 1], [2, 3]] {
            let input = Tensor::random([1, 2, height, width], Distribution::Default, &device);
            let output = block.forward(input);

            assert_eq!(output.dims(), [1, 194, height, width]);
        }
    }

    #[test]
    #[should_panic(expected = "inception_v1_basic: filters must be > 0")]
    fn test_zero_filters() {
        type B = NdArray<f32>;
        let device = Default::default();

        let _block: InceptionV1Basic<B> = InceptionV1BasicConfig::new()
            .with_filters(0)
            .init(3, &device);
    }
}
