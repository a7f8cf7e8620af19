//! # `MaxPool2dSame`
//!
//! TensorFlow-like "same" max pooling.
//!
//! The input is padded (asymmetrically, if needed) with ``-inf`` so that
//! ``out_size = ceil(in_size / stride)``; the padded cells never win a max.
use crate::layers::padding::pad_same;
use burn::config::Config;
use burn::module::Module;
use burn::nn::pool::{MaxPool2d, MaxPool2dConfig};
use burn::prelude::{Backend, Tensor};

/// [`MaxPool2dSame`] Config.
#[derive(Config, Debug)]
pub struct MaxPool2dSameConfig {
    /// The ``[height, width]`` pooling window.
    pub kernel_size: [usize; 2],

    /// The ``[height, width]`` stride.
    #[config(default = "[1, 1]")]
    pub stride: [usize; 2],
}

impl MaxPool2dSameConfig {
    /// Initialize a [`MaxPool2dSame`].
    pub fn init(&self) -> MaxPool2dSame {
        MaxPool2dSame {
            kernel_size: self.kernel_size,
            stride: self.stride,
            pool: MaxPool2dConfig::new(self.kernel_size)
                .with_strides(self.stride)
                .init(),
        }
    }
}

/// `MaxPool2dSame`
///
/// Max pooling which keeps ``ceil(in_size / stride)`` output cells per side.
#[derive(Module, Clone, Debug)]
pub struct MaxPool2dSame {
    /// The ``[height, width]`` pooling window.
    pub kernel_size: [usize; 2],

    /// The ``[height, width]`` stride.
    pub stride: [usize; 2],

    pool: MaxPool2d,
}

impl MaxPool2dSame {
    /// Forward Pass.
    ///
    /// # Arguments
    ///
    /// - `input`: ``[batch, channels, in_height, in_width]``.
    ///
    /// # Returns
    ///
    /// ``[batch, channels, ceil(in_height/stride), ceil(in_width/stride)]``
    pub fn forward<B: Backend>(
        &self,
        input: Tensor<B, 4>,
    ) -> Tensor<B, 4> {
        let x = pad_same(input, self.kernel_size, self.stride, f32::NEG_INFINITY);
        self.pool.forward(x)
    }
}
