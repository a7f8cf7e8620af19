use burn::backend::NdArray;
use burn::prelude::Tensor;
use burn::tensor::Distribution;
use clap::{Parser, ValueEnum};
use inception_blocks::layers::activation::ActivationConfig;
use inception_blocks::layers::inception::any_block::AnyInceptionBlockConfig;
use inception_blocks::layers::inception::v1_basic::InceptionV1BasicConfig;
use inception_blocks::layers::inception::v1_reduction::InceptionV1ReductionConfig;
use inception_blocks::layers::inception::v2_basic::InceptionV2BasicConfig;
use inception_blocks::layers::inception::v2_deep::InceptionV2DeepConfig;
use inception_blocks::layers::inception::v2_wide::{InceptionV2WideConfig, WideConcatConfig};
use inception_blocks::layers::inception::{InceptionBlock, InceptionBlockConfig};
use inception_blocks::models::inception_stack::InceptionStackConfig;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum WideConcat {
    Siblings,
    Historical,
}

impl From<WideConcat> for WideConcatConfig {
    fn from(value: WideConcat) -> Self {
        match value {
            WideConcat::Siblings => WideConcatConfig::Siblings,
            WideConcat::Historical => WideConcatConfig::Historical,
        }
    }
}

/// Build every Inception block and report its output shape.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[arg(long, default_value = "2")]
    batch: usize,

    #[arg(long, default_value = "32")]
    height: usize,

    #[arg(long, default_value = "32")]
    width: usize,

    /// Input channels.
    #[arg(long, default_value = "3")]
    channels: usize,

    /// Filters per convolution; each block's default when unset.
    #[arg(long)]
    filters: Option<usize>,

    /// Concatenation layout of the V2 wide block.
    #[arg(long, value_enum, default_value = "siblings")]
    wide_concat: WideConcat,

    /// Activation after every convolution.
    #[arg(long, default_value = "relu", value_parser = ActivationConfig::from_str)]
    activation: ActivationConfig,

    /// Also run every block as one channel-chained stack.
    #[arg(long)]
    stack: bool,

    /// Print the block configs as JSON.
    #[arg(long)]
    dump_config: bool,
}

fn block_configs(args: &Args) -> Vec<AnyInceptionBlockConfig> {
    let activation = args.activation.clone();

    let mut v1_basic = InceptionV1BasicConfig::new()
        .with_activation(activation.clone())
        .with_name(Some("v1_basic".to_string()));
    let mut v1_reduction = InceptionV1ReductionConfig::new()
        .with_activation(activation.clone())
        .with_name(Some("v1_reduction".to_string()));
    let mut v2_basic = InceptionV2BasicConfig::new()
        .with_activation(activation.clone())
        .with_name(Some("v2_basic".to_string()));
    let mut v2_deep = InceptionV2DeepConfig::new()
        .with_activation(activation.clone())
        .with_name(Some("v2_deep".to_string()));
    let mut v2_wide = InceptionV2WideConfig::new()
        .with_activation(activation)
        .with_concat(args.wide_concat.into())
        .with_name(Some("v2_wide".to_string()));

    if let Some(filters) = args.filters {
        v1_basic.filters = filters;
        v1_reduction.filters = filters;
        v2_basic.filters = filters;
        v2_deep.filters = filters;
        v2_wide.filters = filters;
    }

    vec![
        v1_basic.into(),
        v1_reduction.into(),
        v2_basic.into(),
        v2_deep.into(),
        v2_wide.into(),
    ]
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    anyhow::ensure!(
        args.batch > 0 && args.height > 0 && args.width > 0 && args.channels > 0,
        "batch, height, width and channels must all be > 0: {args:?}"
    );
    anyhow::ensure!(args.filters != Some(0), "--filters must be > 0");

    type B = NdArray<f32>;
    let device = Default::default();

    let input: Tensor<B, 4> = Tensor::random(
        [args.batch, args.channels, args.height, args.width],
        Distribution::Default,
        &device,
    );
    tracing::info!(
        shape = ?input.dims(),
        activation = args.activation.name(),
        "input"
    );

    let configs = block_configs(&args);

    for config in &configs {
        if args.dump_config {
            println!("{config}");
        }

        let block = config.init::<B>(args.channels, &device);
        let output = block.forward(input.clone());
        tracing::info!(
            block = config.name().unwrap_or("unnamed"),
            filters = config.filters(),
            in_channels = block.in_channels(),
            out_channels = block.out_channels(),
            shape = ?output.dims(),
            "forward"
        );
    }

    if args.stack {
        let stack = InceptionStackConfig::from(configs).init::<B>(args.channels, &device);
        let output = stack.forward(input);
        tracing::info!(
            blocks = stack.len(),
            in_channels = stack.in_channels(),
            out_channels = stack.out_channels(),
            shape = ?output.dims(),
            "stack forward"
        );
    }

    Ok(())
}
