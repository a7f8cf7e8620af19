//! # Inception V1 Reduction Block
//!
//! The dimension-reduced Inception module. 1x1 "bottleneck" convolutions cut
//! the channel depth before the expensive 3x3 and 5x5 convolutions, and
//! project the pooled branch.
//!
//! ```text
//!            +-> conv 1x1 ------------------+
//!            +-> conv 1x1 -> conv 3x3 ------+
//! input -----+-> conv 1x1 -> conv 5x5 ------+--> concat(channels)
//!            +-> max-pool 3x3 -> conv 1x1 --+
//! ```

use crate::layers::activation::ActivationConfig;
use crate::layers::blocks::conv_act::{ConvAct2d, ConvAct2dConfig, ConvAct2dMeta};
use crate::layers::inception::{
    InceptionBlock, InceptionBlockConfig, V1_DEFAULT_FILTERS, concat_branches, expect_build_args,
};
use crate::layers::pool::max_pool_2d_same::{MaxPool2dSame, MaxPool2dSameConfig};
use bimm_contracts::{assert_shape_contract_periodically, unpack_shape_contract};
use burn::prelude::{Backend, Config, Module, Tensor};

const BLOCK: &str = "inception_v1_reduction";

/// [`InceptionV1Reduction`] Config.
#[derive(Config, Debug)]
pub struct InceptionV1ReductionConfig {
    /// Filters of every convolution.
    #[config(default = "V1_DEFAULT_FILTERS")]
    pub filters: usize,

    /// Activation applied after every convolution.
    #[config(default = "ActivationConfig::Relu")]
    pub activation: ActivationConfig,

    /// Optional block name.
    #[config(default = "None")]
    pub name: Option<String>,
}

impl InceptionBlockConfig for InceptionV1ReductionConfig {
    type Block<B: Backend> = InceptionV1Reduction<B>;

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn filters(&self) -> usize {
        self.filters
    }

    fn output_channels(
        &self,
        _in_channels: usize,
    ) -> usize {
        4 * self.filters
    }

    fn init<B: Backend>(
        &self,
        in_channels: usize,
        device: &B::Device,
    ) -> InceptionV1Reduction<B> {
        expect_build_args(BLOCK, in_channels, self.filters);
        tracing::trace!(block = BLOCK, name = ?self.name, in_channels, "init");

        let filters = self.filters;
        let conv = |in_channels: usize, kernel_size: [usize; 2]| -> ConvAct2d<B> {
            ConvAct2dConfig::same([in_channels, filters], kernel_size, self.activation.clone())
                .init(device)
        };

        InceptionV1Reduction {
            conv_1x1_a: conv(in_channels, [1, 1]),
            reduce_b: conv(in_channels, [1, 1]),
            conv_3x3_b: conv(filters, [3, 3]),
            reduce_c: conv(in_channels, [1, 1]),
            conv_5x5_c: conv(filters, [5, 5]),
            pool_d: MaxPool2dSameConfig::new([3, 3]).init(),
            project_d: conv(in_channels, [1, 1]),
        }
    }
}

/// Inception V1 Reduction Block.
///
/// Built by [`InceptionV1ReductionConfig`].
#[derive(Module, Debug)]
pub struct InceptionV1Reduction<B: Backend> {
    /// Branch A: 1x1.
    pub conv_1x1_a: ConvAct2d<B>,

    /// Branch B: 1x1 bottleneck.
    pub reduce_b: ConvAct2d<B>,
    /// Branch B: 3x3.
    pub conv_3x3_b: ConvAct2d<B>,

    /// Branch C: 1x1 bottleneck.
    pub reduce_c: ConvAct2d<B>,
    /// Branch C: 5x5.
    pub conv_5x5_c: ConvAct2d<B>,

    /// Branch D: 3x3 max-pool.
    pub pool_d: MaxPool2dSame,
    /// Branch D: 1x1 projection.
    pub project_d: ConvAct2d<B>,
}

impl<B: Backend> InceptionV1Reduction<B> {
    /// Filters of every convolution.
    pub fn filters(&self) -> usize {
        self.conv_1x1_a.out_channels()
    }
}

impl<B: Backend> InceptionBlock<B> for InceptionV1Reduction<B> {
    fn in_channels(&self) -> usize {
        self.conv_1x1_a.in_channels()
    }

    fn out_channels(&self) -> usize {
        4 * self.filters()
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

        let a = self.conv_1x1_a.forward(input.clone());

        let b = self.reduce_b.forward(input.clone());
        let b = self.conv_3x3_b.forward(b);

        let c = self.reduce_c.forward(input.clone());
        let c = self.conv_5x5_c.forward(c);

        let d = self.pool_d.forward(input);
        let d = self.project_d.forward(d);

        let x = concat_branches(BLOCK, vec![("a", a), ("b", b), ("c", c), ("d", d)]);

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
