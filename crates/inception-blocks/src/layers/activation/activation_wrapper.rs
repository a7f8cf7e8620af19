//! # Activation Layer Wrapper
//!
//! Every convolution in an Inception block applies the same activation.
//! [`ActivationConfig`] is that per-block choice, as a plain config value
//! which serializes with the block config and parses from a short name;
//! [`Activation`] is the initialized layer.
use burn::nn::{
    Gelu, HardSigmoid, HardSigmoidConfig, LeakyRelu, LeakyReluConfig, PRelu, PReluConfig, Relu,
    Sigmoid, Tanh,
};
use burn::prelude::{Backend, Config, Module, Tensor};
use std::str::FromStr;

/// Short names accepted by [`ActivationConfig::from_str`].
pub const ACTIVATION_NAMES: [&str; 7] = [
    "relu",
    "leaky_relu",
    "prelu",
    "gelu",
    "sigmoid",
    "tanh",
    "hard_sigmoid",
];

/// Choice of activation, applied after a convolution.
#[derive(Config, Debug)]
#[non_exhaustive]
pub enum ActivationConfig {
    /// ``max(x, 0)``; the default.
    Relu,

    /// ReLU with a configurable negative slope.
    LeakyRelu(LeakyReluConfig),

    /// ReLU with a learned negative slope.
    PRelu(PReluConfig),

    /// Gaussian error linear unit.
    Gelu,

    /// Logistic sigmoid.
    Sigmoid,

    /// Hyperbolic tangent.
    Tanh,

    /// Piecewise-linear sigmoid.
    HardSigmoid(HardSigmoidConfig),
}

impl Default for ActivationConfig {
    fn default() -> Self {
        Self::Relu
    }
}

impl From<LeakyReluConfig> for ActivationConfig {
    fn from(config: LeakyReluConfig) -> Self {
        Self::LeakyRelu(config)
    }
}

impl From<PReluConfig> for ActivationConfig {
    fn from(config: PReluConfig) -> Self {
        Self::PRelu(config)
    }
}

impl From<HardSigmoidConfig> for ActivationConfig {
    fn from(config: HardSigmoidConfig) -> Self {
        Self::HardSigmoid(config)
    }
}

impl FromStr for ActivationConfig {
    type Err = String;

    /// Parse one of [`ACTIVATION_NAMES`], case-insensitively.
    ///
    /// Parameterized activations get their default parameters.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_ascii_lowercase().as_str() {
            "relu" => Ok(Self::Relu),
            "leaky_relu" => Ok(LeakyReluConfig::new().into()),
            "prelu" => Ok(PReluConfig::new().into()),
            "gelu" => Ok(Self::Gelu),
            "sigmoid" => Ok(Self::Sigmoid),
            "tanh" => Ok(Self::Tanh),
            "hard_sigmoid" => Ok(HardSigmoidConfig::new().into()),
            other => Err(format!(
                "unknown activation: {other:?}, expected one of {ACTIVATION_NAMES:?}"
            )),
        }
    }
}

impl ActivationConfig {
    /// The short name; [`ActivationConfig::from_str`] parses it back.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Relu => "relu",
            Self::LeakyRelu(_) => "leaky_relu",
            Self::PRelu(_) => "prelu",
            Self::Gelu => "gelu",
            Self::Sigmoid => "sigmoid",
            Self::Tanh => "tanh",
            Self::HardSigmoid(_) => "hard_sigmoid",
        }
    }

    /// Build the layer.
    ///
    /// Only [`ActivationConfig::PRelu`] allocates parameters on `device`.
    pub fn init<B: Backend>(
        &self,
        device: &B::Device,
    ) -> Activation<B> {
        match self {
            Self::Relu => Activation::Relu(Relu),
            Self::LeakyRelu(config) => Activation::LeakyRelu(config.init()),
            Self::PRelu(config) => Activation::PRelu(config.init(device)),
            Self::Gelu => Activation::Gelu(Gelu),
            Self::Sigmoid => Activation::Sigmoid(Sigmoid),
            Self::Tanh => Activation::Tanh(Tanh),
            Self::HardSigmoid(config) => Activation::HardSigmoid(config.init()),
        }
    }
}

/// An initialized activation layer.
///
/// Each one is owned by exactly one convolution.
#[derive(Module, Debug)]
#[non_exhaustive]
#[allow(missing_docs)]
pub enum Activation<B: Backend> {
    Relu(Relu),
    LeakyRelu(LeakyRelu),
    PRelu(PRelu<B>),
    Gelu(Gelu),
    Sigmoid(Sigmoid),
    Tanh(Tanh),
    HardSigmoid(HardSigmoid),
}

impl<B: Backend> Activation<B> {
    /// The short name of the config this layer was built from.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Relu(_) => "relu",
            Self::LeakyRelu(_) => "leaky_relu",
            Self::PRelu(_) => "prelu",
            Self::Gelu(_) => "gelu",
            Self::Sigmoid(_) => "sigmoid",
            Self::Tanh(_) => "tanh",
            Self::HardSigmoid(_) => "hard_sigmoid",
        }
    }

    /// Apply the activation elementwise; the shape is unchanged.
    #[tracing::instrument(level = "trace", skip_all, fields(act = self.name()))]
    pub fn forward<const D: usize>(
        &self,
        input: Tensor<B, D>,
    ) -> Tensor<B, D> {
        match self {
            Self::Relu(layer) => layer.forward(input),
            Self::LeakyRelu(layer) => layer.forward(input),
            Self::PRelu(layer) => layer.forward(input),
            Self::Gelu(layer) => layer.forward(input),
            Self::Sigmoid(layer) => layer.forward(input),
            Self::Tanh(layer) => layer.forward(input),
            Self::HardSigmoid(layer) => layer.forward(input),
        }
    }
}
