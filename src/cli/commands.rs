// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `fetch`, `train`, `evaluate`
// and all their configurable flags.
//
// Training flags are optional: anything left out falls back
// to the preset of the chosen model (see TrainConfig::preset).

use clap::{Args, Subcommand, ValueEnum};
use std::time::Duration;

use crate::application::fetch_use_case::{FetchConfig, DEFAULT_PAGE_URL};
use crate::application::train_use_case::{ModelKind, OptimizerKind, TrainConfig};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download the .lzh race-result archives linked from the download page
    Fetch(FetchArgs),

    /// Train a digit classifier on MNIST and evaluate it on the test set
    Train(TrainArgs),

    /// Evaluate a trained checkpoint on the MNIST test set
    Evaluate(EvaluateArgs),
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Page listing the archives
    #[arg(long, default_value = DEFAULT_PAGE_URL)]
    pub page_url: String,

    /// Directory the archives are written into
    #[arg(long, default_value = "boat-racer_lzh")]
    pub out_dir: String,

    /// Pause before each archive request, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub delay_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, default_value_t = 60)]
    pub timeout_secs: u64,
}

impl From<FetchArgs> for FetchConfig {
    fn from(a: FetchArgs) -> Self {
        FetchConfig {
            page_url: a.page_url,
            out_dir:  a.out_dir,
            delay:    Duration::from_millis(a.delay_ms),
            timeout:  Duration::from_secs(a.timeout_secs),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelArg {
    /// ReLU network with dropout
    Dnn,
    /// Swish network
    Swish,
    /// Bidirectional LSTM
    Birnn,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptimizerArg {
    Sgd,
    Adam,
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Which architecture to train
    #[arg(long, value_enum, default_value_t = ModelArg::Dnn)]
    pub model: ModelArg,

    /// Directory to save the checkpoint, config and metrics.csv
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Number of full passes through the training data
    #[arg(long)]
    pub epochs: Option<usize>,

    /// Number of samples per gradient step
    #[arg(long)]
    pub batch_size: Option<usize>,

    #[arg(long, value_enum)]
    pub optimizer: Option<OptimizerArg>,

    /// Learning rate
    #[arg(long)]
    pub lr: Option<f64>,

    /// Hidden units per layer (per direction for birnn)
    #[arg(long)]
    pub hidden_dim: Option<usize>,

    /// Dropout probability (dnn)
    #[arg(long)]
    pub dropout: Option<f64>,

    /// β in x·sigmoid(βx) (swish)
    #[arg(long)]
    pub beta: Option<f64>,

    /// Share of the training images held out for validation
    #[arg(long)]
    pub val_fraction: Option<f64>,

    /// Stop after this many epochs without improvement
    #[arg(long)]
    pub patience: Option<usize>,

    /// Disable early stopping even if the preset enables it
    #[arg(long, conflicts_with = "patience")]
    pub no_early_stopping: bool,

    #[arg(long, default_value_t = 123)]
    pub seed: u64,

    /// Only use the first N images of each MNIST partition
    #[arg(long)]
    pub limit: Option<usize>,

    /// Draw the loss curve in the terminal after training
    #[arg(long)]
    pub plot: bool,
}

impl From<ModelArg> for ModelKind {
    fn from(m: ModelArg) -> Self {
        match m {
            ModelArg::Dnn   => ModelKind::Dnn,
            ModelArg::Swish => ModelKind::Swish,
            ModelArg::Birnn => ModelKind::BiRnn,
        }
    }
}

impl From<OptimizerArg> for OptimizerKind {
    fn from(o: OptimizerArg) -> Self {
        match o {
            OptimizerArg::Sgd  => OptimizerKind::Sgd,
            OptimizerArg::Adam => OptimizerKind::Adam,
        }
    }
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        let preset = TrainConfig::preset(a.model.into());
        let patience = if a.no_early_stopping {
            None
        } else {
            a.patience.or(preset.patience)
        };

        TrainConfig {
            model:          preset.model,
            checkpoint_dir: a.checkpoint_dir,
            epochs:         a.epochs.unwrap_or(preset.epochs),
            batch_size:     a.batch_size.unwrap_or(preset.batch_size),
            optimizer:      a.optimizer.map(Into::into).unwrap_or(preset.optimizer),
            lr:             a.lr.unwrap_or(preset.lr),
            hidden_dim:     a.hidden_dim.unwrap_or(preset.hidden_dim),
            dropout:        a.dropout.unwrap_or(preset.dropout),
            swish_beta:     a.beta.unwrap_or(preset.swish_beta),
            val_fraction:   a.val_fraction.unwrap_or(preset.val_fraction),
            patience,
            seed:           a.seed,
            limit:          a.limit,
            plot:           a.plot,
        }
    }
}

/// All arguments for the `evaluate` command
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Directory written by `train`
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    #[arg(long, default_value_t = 100)]
    pub batch_size: usize,

    /// Only use the first N test images
    #[arg(long)]
    pub limit: Option<usize>,

    /// Print the predicted digit for the first N test images
    #[arg(long, default_value_t = 0)]
    pub show: usize,
}
