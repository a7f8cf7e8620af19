//! # Inception V2 Wide Block
//!
//! Factorized convolutions laid out side by side: the ``1 x 3`` and
//! ``3 x 1`` convolutions read the same intermediate and are concatenated
//! as siblings, widening the block rather than deepening it.
//!
//! ```text
//!            +-> conv 1x1 -----------------------------+
//!            |                       +-> conv 1x3 (b1) -+
//!            +-> conv 1x1 -----------+-> conv 3x1 (b2) -+
//! input -----+                       +-> conv 1x3 (c1) -+--> concat(channels)
//!            +-> conv 1x1 -> 3x3 ----+-> conv 3x1 (c2) -+
//!            +-> max-pool 3x3 -> conv 1x1 --------------+
//! ```
//!
//! ## Concatenation layout
//!
//! [`WideConcatConfig::Siblings`] (the default) concatenates
//! ``[a, b1, b2, c1, c2, d]``.
//!
//! Earlier releases of this block concatenated ``[a, b1, b2, c1, c1, d]``:
//! `c1` twice and `c2` never. That looks like a copy/paste defect;
//! [`WideConcatConfig::Historical`] keeps it for models whose outputs must
//! match those releases. Both layouts have ``6 * filters`` output channels.

use crate::layers::activation::ActivationConfig;
use crate::layers::blocks::conv_act::{ConvAct2d, ConvAct2dConfig, ConvAct2dMeta};
use crate::layers::inception::{
    InceptionBlock, InceptionBlockConfig, V2_DEFAULT_FILTERS, concat_branches, expect_build_args,
};
use crate::layers::pool::max_pool_2d_same::{MaxPool2dSame, MaxPool2dSameConfig};
use bimm_contracts::{assert_shape_contract_periodically, unpack_shape_contract};
use burn::prelude::{Backend, Config, Module, Tensor};

const BLOCK: &str = "inception_v2_wide";

/// Branch concatenation layout of [`InceptionV2Wide`].
#[derive(Config, Debug, PartialEq, Eq)]
pub enum WideConcatConfig {
    /// ``[a, b1, b2, c1, c2, d]``.
    Siblings,

    /// ``[a, b1, b2, c1, c1, d]``; the `c2` convolution is built but unused.
    Historical,
}

impl Default for WideConcatConfig {
    fn default() -> Self {
        Self::Siblings
    }
}

/// [`InceptionV2Wide`] Config.
#[derive(Config, Debug)]
pub struct InceptionV2WideConfig {
    /// Filters of every convolution.
    #[config(default = "V2_DEFAULT_FILTERS")]
    pub filters: usize,

    /// Activation applied after every convolution.
    #[config(default = "ActivationConfig::Relu")]
    pub activation: ActivationConfig,

    /// Branch concatenation layout.
    #[config(default = "WideConcatConfig::Siblings")]
    pub concat: WideConcatConfig,

    /// Optional block name.
    #[config(default = "None")]
    pub name: Option<String>,
}

impl InceptionBlockConfig for InceptionV2WideConfig {
    type Block<B: Backend> = InceptionV2Wide<B>;

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
        6 * self.filters
    }

    fn init<B: Backend>(
        &self,
        in_channels: usize,
        device: &B::Device,
    ) -> InceptionV2Wide<B> {
        expect_build_args(BLOCK, in_channels, self.filters);
        tracing::trace!(
            block = BLOCK,
            name = ?self.name,
            concat = ?self.concat,
            in_channels,
            "init"
        );

        let filters = self.filters;
        let conv = |in_channels: usize, kernel_size: [usize; 2]| -> ConvAct2d<B> {
            ConvAct2dConfig::same([in_channels, filters], kernel_size, self.activation.clone())
                .init(device)
        };

        InceptionV2Wide {
            duplicate_c1: self.concat == WideConcatConfig::Historical,

            conv_1x1_a: conv(in_channels, [1, 1]),

            reduce_b: conv(in_channels, [1, 1]),
            conv_1x3_b: conv(filters, [1, 3]),
            conv_3x1_b: conv(filters, [3, 1]),

            reduce_c: conv(in_channels, [1, 1]),
            conv_3x3_c: conv(filters, [3, 3]),
            conv_1x3_c: conv(filters, [1, 3]),
            conv_3x1_c: conv(filters, [3, 1]),

            pool_d: MaxPool2dSameConfig::new([3, 3]).init(),
            project_d: conv(in_channels, [1, 1]),
        }
    }
}

/// Inception V2 Wide Block.
///
/// Built by [`InceptionV2WideConfig`].
#[derive(Module, Debug)]
pub struct InceptionV2Wide<B: Backend> {
    /// Concatenate `c1` in place of `c2`; see [`WideConcatConfig::Historical`].
    pub duplicate_c1: bool,

    /// Branch A: 1x1.
    pub conv_1x1_a: ConvAct2d<B>,

    /// Branch B: 1x1 bottleneck.
    pub reduce_b: ConvAct2d<B>,
    /// Branch B1: 1x3.
    pub conv_1x3_b: ConvAct2d<B>,
    /// Branch B2: 3x1.
    pub conv_3x1_b: ConvAct2d<B>,

    /// Branch C: 1x1 bottleneck.
    pub reduce_c: ConvAct2d<B>,
    /// Branch C: 3x3.
    pub conv_3x3_c: ConvAct2d<B>,
    /// Branch C1: 1x3.
    pub conv_1x3_c: ConvAct2d<B>,
    /// Branch C2: 3x1.
    pub conv_3x1_c: ConvAct2d<B>,

    /// Branch D: 3x3 max-pool.
    pub pool_d: MaxPool2dSame,
    /// Branch D: 1x1 projection.
    pub project_d: ConvAct2d<B>,
}

impl<B: Backend> InceptionV2Wide<B> {
    /// Filters of every convolution.
    pub fn filters(&self) -> usize {
        self.conv_1x1_a.out_channels()
    }

    /// The concatenation layout this block was built with.
    pub fn concat(&self) -> WideConcatConfig {
        if self.duplicate_c1 {
            WideConcatConfig::Historical
        } else {
            WideConcatConfig::Siblings
        }
    }
}

impl<B: Backend> InceptionBlock<B> for InceptionV2Wide<B> {
    fn in_channels(&self) -> usize {
        self.conv_1x1_a.in_channels()
    }

    fn out_channels(&self) -> usize {
        6 * self.filters()
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
        let b1 = self.conv_1x3_b.forward(b.clone());
        let b2 = self.conv_3x1_b.forward(b);

        let c = self.reduce_c.forward(input.clone());
        let c = self.conv_3x3_c.forward(c);
        let c1 = self.conv_1x3_c.forward(c.clone());
        let c2 = if self.duplicate_c1 {
            ("c1", c1.clone())
        } else {
            ("c2", self.conv_3x1_c.forward(c))
        };

        let d = self.pool_d.forward(input);
        let d = self.project_d.forward(d);

        let x = concat_branches(
            BLOCK,
            vec![("a", a), ("b1", b1), ("b2", b2), ("c1", c1), c2, ("d", d)],
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
