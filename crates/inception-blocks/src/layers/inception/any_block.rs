//! # Any Inception Block
//!
//! [`AnyInceptionBlockConfig`] and [`AnyInceptionBlock`] dispatch over every
//! Inception block in this crate, so mixed sequences of blocks can be
//! configured, serialized and built uniformly.
use crate::layers::inception::v1_basic::{InceptionV1Basic, InceptionV1BasicConfig};
use crate::layers::inception::v1_reduction::{InceptionV1Reduction, InceptionV1ReductionConfig};
use crate::layers::inception::v2_basic::{InceptionV2Basic, InceptionV2BasicConfig};
use crate::layers::inception::v2_deep::{InceptionV2Deep, InceptionV2DeepConfig};
use crate::layers::inception::v2_wide::{InceptionV2Wide, InceptionV2WideConfig};
use crate::layers::inception::{InceptionBlock, InceptionBlockConfig};
use burn::prelude::{Backend, Config, Module, Tensor};

/// [`AnyInceptionBlock`] Config.
#[derive(Config, Debug)]
#[non_exhaustive]
pub enum AnyInceptionBlockConfig {
    /// [`InceptionV1Basic`] block.
    V1Basic(InceptionV1BasicConfig),

    /// [`InceptionV1Reduction`] block.
    V1Reduction(InceptionV1ReductionConfig),

    /// [`InceptionV2Basic`] block.
    V2Basic(InceptionV2BasicConfig),

    /// [`InceptionV2Deep`] block.
    V2Deep(InceptionV2DeepConfig),

    /// [`InceptionV2Wide`] block.
    V2Wide(InceptionV2WideConfig),
}

impl From<InceptionV1BasicConfig> for AnyInceptionBlockConfig {
    fn from(config: InceptionV1BasicConfig) -> Self {
        Self::V1Basic(config)
    }
}

impl From<InceptionV1ReductionConfig> for AnyInceptionBlockConfig {
    fn from(config: InceptionV1ReductionConfig) -> Self {
        Self::V1Reduction(config)
    }
}

impl From<InceptionV2BasicConfig> for AnyInceptionBlockConfig {
    fn from(config: InceptionV2BasicConfig) -> Self {
        Self::V2Basic(config)
    }
}

impl From<InceptionV2DeepConfig> for AnyInceptionBlockConfig {
    fn from(config: InceptionV2DeepConfig) -> Self {
        Self::V2Deep(config)
    }
}

impl From<InceptionV2WideConfig> for AnyInceptionBlockConfig {
    fn from(config: InceptionV2WideConfig) -> Self {
        Self::V2Wide(config)
    }
}

impl InceptionBlockConfig for AnyInceptionBlockConfig {
    type Block<B: Backend> = AnyInceptionBlock<B>;

    fn name(&self) -> Option<&str> {
        match self {
            Self::V1Basic(config) => config.name(),
            Self::V1Reduction(config) => config.name(),
            Self::V2Basic(config) => config.name(),
            Self::V2Deep(config) => config.name(),
            Self::V2Wide(config) => config.name(),
        }
    }

    fn filters(&self) -> usize {
        match self {
            Self::V1Basic(config) => config.filters,
            Self::V1Reduction(config) => config.filters,
            Self::V2Basic(config) => config.filters,
            Self::V2Deep(config) => config.filters,
            Self::V2Wide(config) => config.filters,
        }
    }

    fn output_channels(
        &self,
        in_channels: usize,
    ) -> usize {
        match self {
            Self::V1Basic(config) => config.output_channels(in_channels),
            Self::V1Reduction(config) => config.output_channels(in_channels),
            Self::V2Basic(config) => config.output_channels(in_channels),
            Self::V2Deep(config) => config.output_channels(in_channels),
            Self::V2Wide(config) => config.output_channels(in_channels),
        }
    }

    fn init<B: Backend>(
        &self,
        in_channels: usize,
        device: &B::Device,
    ) -> AnyInceptionBlock<B> {
        match self {
            Self::V1Basic(config) => {
                AnyInceptionBlock::V1Basic(config.init::<B>(in_channels, device))
            }
            Self::V1Reduction(config) => {
                AnyInceptionBlock::V1Reduction(config.init::<B>(in_channels, device))
            }
            Self::V2Basic(config) => {
                AnyInceptionBlock::V2Basic(config.init::<B>(in_channels, device))
            }
            Self::V2Deep(config) => {
                AnyInceptionBlock::V2Deep(config.init::<B>(in_channels, device))
            }
            Self::V2Wide(config) => {
                AnyInceptionBlock::V2Wide(config.init::<B>(in_channels, device))
            }
        }
    }
}

/// Any Inception block.
#[derive(Module, Debug)]
#[non_exhaustive]
pub enum AnyInceptionBlock<B: Backend> {
    /// [`InceptionV1Basic`] block.
    V1Basic(InceptionV1Basic<B>),

    /// [`InceptionV1Reduction`] block.
    V1Reduction(InceptionV1Reduction<B>),

    /// [`InceptionV2Basic`] block.
    V2Basic(InceptionV2Basic<B>),

    /// [`InceptionV2Deep`] block.
    V2Deep(InceptionV2Deep<B>),

    /// [`InceptionV2Wide`] block.
    V2Wide(InceptionV2Wide<B>),
}

impl<B: Backend> InceptionBlock<B> for AnyInceptionBlock<B> {
    fn in_channels(&self) -> usize {
        match self {
            Self::V1Basic(block) => block.in_channels(),
            Self::V1Reduction(block) => block.in_channels(),
            Self::V2Basic(block) => block.in_channels(),
            Self::V2Deep(block) => block.in_channels(),
            Self::V2Wide(block) => block.in_channels(),
        }
    }

    fn out_channels(&self) -> usize {
        match self {
            Self::V1Basic(block) => block.out_channels(),
            Self::V1Reduction(block) => block.out_channels(),
            Self::V2Basic(block) => block.out_channels(),
            Self::V2Deep(block) => block.out_channels(),
            Self::V2Wide(block) => block.out_channels(),
        }
    }

    fn forward(
        &self,
        input: Tensor<B, 4>,
    ) -> Tensor<B, 4> {
        match self {
            Self::V1Basic(block) => block.forward(input),
            Self::V1Reduction(block) => block.forward(input),
            Self::V2Basic(block) => block.forward(input),
            Self::V2Deep(block) => block.forward(input),
            Self::V2Wide(block) => block.forward(input),
        }
    }
}
