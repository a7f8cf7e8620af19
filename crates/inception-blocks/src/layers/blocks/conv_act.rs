//! # `ConvAct2d` - conv/activation block.
//!
//! A [`ConvAct2d`] module is:
//! * a [`Conv2d`] layer,
//! * an [`Activation`] layer.
//!
//! This is the unit every Inception branch is built from.
//!
//! "Same" padding is applied explicitly with zeros (see
//! [`crate::layers::padding::pad_same`]), and the convolution itself is
//! unpadded. Inputs smaller than the kernel keep their spatial size.

use crate::layers::activation::{Activation, ActivationConfig};
use crate::layers::padding::pad_same;
use bimm_contracts::{assert_shape_contract_periodically, unpack_shape_contract};
use burn::config::Config;
use burn::module::Module;
use burn::nn::PaddingConfig2d;
use burn::nn::conv::{Conv2d, Conv2dConfig};
use burn::prelude::{Backend, Tensor};

/// [`ConvAct2d`] Meta.
pub trait ConvAct2dMeta {
    /// Number of input channels.
    fn in_channels(&self) -> usize;

    /// Number of output channels.
    fn out_channels(&self) -> usize;

    /// The ``[height, width]`` kernel size.
    fn kernel_size(&self) -> [usize; 2];

    /// The ``[height, width]`` stride.
    fn stride(&self) -> [usize; 2];

    /// Output ``[height, width]`` for an input resolution, under "same" padding.
    ///
    /// ``out = ceil(in / stride)``; equal to the input at stride 1.
    fn output_resolution(
        &self,
        input_resolution: [usize; 2],
    ) -> [usize; 2] {
        let [height, width] = input_resolution;
        let [height_stride, width_stride] = self.stride();
        [height.div_ceil(height_stride), width.div_ceil(width_stride)]
    }
}

/// [`ConvAct2d`] Config.
///
/// Implements [`ConvAct2dMeta`].
#[derive(Config, Debug)]
pub struct ConvAct2dConfig {
    /// The [`Conv2d`] config.
    pub conv: Conv2dConfig,

    /// The [`Activation`] config.
    #[config(default = "ActivationConfig::Relu")]
    pub act: ActivationConfig,
}

impl ConvAct2dMeta for ConvAct2dConfig {
    fn in_channels(&self) -> usize {
        self.conv.channels[0]
    }

    fn out_channels(&self) -> usize {
        self.conv.channels[1]
    }

    fn kernel_size(&self) -> [usize; 2] {
        self.conv.kernel_size
    }

    fn stride(&self) -> [usize; 2] {
        self.conv.stride
    }
}

impl ConvAct2dConfig {
    /// A stride-1, "same"-padded conv/act config.
    ///
    /// The output keeps the input's spatial resolution. The [`Conv2dConfig`]
    /// is `Valid`; [`ConvAct2d::forward`] pads the input first.
    ///
    /// # Arguments
    ///
    /// - `channels`: ``[in_channels, out_channels]``.
    /// - `kernel_size`: ``[height, width]``; each side must be odd.
    /// - `act`: the activation applied after the convolution.
    pub fn same(
        channels: [usize; 2],
        kernel_size: [usize; 2],
        act: ActivationConfig,
    ) -> Self {
        Self {
            conv: Conv2dConfig::new(channels, kernel_size)
                .with_stride([1, 1])
                .with_padding(PaddingConfig2d::Valid),
            act,
        }
    }

    /// Initialize a [`ConvAct2d`].
    pub fn init<B: Backend>(
        self,
        device: &B::Device,
    ) -> ConvAct2d<B> {
        ConvAct2d {
            conv: self.conv.init(device),
            act: self.act.init(device),
        }
    }
}

/// Sequenced conv/activation block.
///
/// Implements [`ConvAct2dMeta`].
#[derive(Module, Debug)]
pub struct ConvAct2d<B: Backend> {
    /// Internal Conv2d layer.
    pub conv: Conv2d<B>,

    /// Activation layer.
    pub act: Activation<B>,
}

impl<B: Backend> ConvAct2dMeta for ConvAct2d<B> {
    fn in_channels(&self) -> usize {
        self.conv.weight.shape().dims[1] * self.conv.groups
    }

    fn out_channels(&self) -> usize {
        self.conv.weight.shape().dims[0]
    }

    fn kernel_size(&self) -> [usize; 2] {
        self.conv.kernel_size
    }

    fn stride(&self) -> [usize; 2] {
        self.conv.stride
    }
}

impl<B: Backend> ConvAct2d<B> {
    /// Forward Pass.
    ///
    /// Zero-pads the input to "same" size, then convolves.
    ///
    /// # Arguments
    ///
    /// - `input`: ``[batch, in_channels, in_height, in_width]``.
    ///
    /// # Returns
    ///
    /// ``[batch, out_channels, out_height, out_width]``, see
    /// [`ConvAct2dMeta::output_resolution`].
    pub fn forward(
        &self,
        input: Tensor<B, 4>,
    ) -> Tensor<B, 4> {
        let [batch, in_height, in_width] = unpack_shape_contract!(
            ["batch", "in_channels", "in_height", "in_width"],
            &input,
            &["batch", "in_height", "in_width"],
            &[("in_channels", self.in_channels())]
        );
        let [out_height, out_width] = self.output_resolution([in_height, in_width]);

        let x = pad_same(input, self.kernel_size(), self.stride(), 0.0);
        let x = self.conv.forward(x);
        let x = self.act.forward(x);

        assert_shape_contract_periodically!(
            ["batch", "out_channels", "out_height", "out_width"],
            &x,
            &[
                ("batch", batch),
                ("out_channels", self.out_channels()),
                ("out_height", out_height),
                ("out_width", out_width)
            ]
        );

        x
    }
}
