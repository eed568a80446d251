// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses the command line with clap and hands off to the
// matching use case in Layer 2:
//
//   1. `fetch`    — download .lzh race-result archives
//   2. `train`    — train a digit classifier on MNIST
//   3. `evaluate` — score a saved checkpoint on the test set

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, EvaluateArgs, FetchArgs, TrainArgs};

use crate::data::mnist::MnistSource;

#[derive(Parser, Debug)]
#[command(
    name = "boatrace-mnist",
    version,
    about = "Download boat race result archives, or train small MNIST classifiers."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Fetch(args)    => run_fetch(args),
            Commands::Train(args)    => run_train(args),
            Commands::Evaluate(args) => run_evaluate(args),
        }
    }
}

fn run_fetch(args: FetchArgs) -> Result<()> {
    use crate::application::fetch_use_case::{FetchConfig, FetchUseCase};
    use crate::infra::http::HttpFetcher;

    let config: FetchConfig = args.into();
    let fetcher = HttpFetcher::new(config.timeout)?;
    let report  = FetchUseCase::new(config, fetcher).execute()?;

    println!(
        "{} archives downloaded, {} skipped, {} rejected.",
        report.downloaded.len(),
        report.skipped.len(),
        report.rejected.len()
    );
    Ok(())
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::{TrainConfig, TrainUseCase};

    let config: TrainConfig = args.into();
    tracing::info!("Starting {:?} training for up to {} epochs", config.model, config.epochs);

    let source = MnistSource::with_limit(config.limit);
    let report = TrainUseCase::new(config).execute(&source)?;

    if report.stopped_early {
        println!("Stopped early after {} epochs.", report.history.len());
    }
    tracing::info!(
        "Final test accuracy {:.3} over {} images",
        report.test.accuracy,
        report.test.samples
    );
    println!("Training complete. Checkpoint saved.");
    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    use crate::application::evaluate_use_case::EvaluateUseCase;

    let source = MnistSource::with_limit(args.limit);
    EvaluateUseCase::new(args.checkpoint_dir, args.batch_size)
        .with_preview(args.show)
        .execute(&source)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::{ModelKind, OptimizerKind, TrainConfig};

    fn train_config(argv: &[&str]) -> TrainConfig {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Train(args) => args.into(),
            other => panic!("expected train, got {other:?}"),
        }
    }

    #[test]
    fn test_train_uses_model_preset() {
        let cfg = train_config(&["boatrace-mnist", "train", "--model", "birnn"]);
        assert_eq!(cfg, TrainConfig::preset(ModelKind::BiRnn));
    }

    #[test]
    fn test_train_overrides() {
        let cfg = train_config(&[
            "boatrace-mnist", "train", "--model", "swish",
            "--epochs", "3", "--optimizer", "adam", "--beta", "1.5", "--plot",
        ]);
        assert_eq!(cfg.model, ModelKind::Swish);
        assert_eq!(cfg.epochs, 3);
        assert_eq!(cfg.optimizer, OptimizerKind::Adam);
        assert_eq!(cfg.swish_beta, 1.5);
        assert!(cfg.plot);
        // untouched values still come from the preset
        assert_eq!(cfg.batch_size, 100);
    }

    #[test]
    fn test_early_stopping_can_be_disabled() {
        let cfg = train_config(&["boatrace-mnist", "train", "--model", "birnn", "--no-early-stopping"]);
        assert_eq!(cfg.patience, None);
    }

    #[test]
    fn test_fetch_defaults() {
        let cli = Cli::try_parse_from(["boatrace-mnist", "fetch"]).unwrap();
        let Commands::Fetch(args) = cli.command else { panic!("expected fetch") };
        let cfg: crate::application::fetch_use_case::FetchConfig = args.into();
        assert_eq!(cfg.out_dir, "boat-racer_lzh");
        assert_eq!(cfg.delay, std::time::Duration::from_secs(1));
        assert!(cfg.page_url.ends_with("download.html"));
    }

    #[test]
    fn test_evaluate_preview_flag() {
        let cli = Cli::try_parse_from(["boatrace-mnist", "evaluate", "--show", "5"]).unwrap();
        let Commands::Evaluate(args) = cli.command else { panic!("expected evaluate") };
        assert_eq!(args.show, 5);
        assert_eq!(args.batch_size, 100);

        let cli = Cli::try_parse_from(["boatrace-mnist", "evaluate"]).unwrap();
        let Commands::Evaluate(args) = cli.command else { panic!("expected evaluate") };
        assert_eq!(args.show, 0);
    }

    #[test]
    fn test_unknown_model_rejected() {
        assert!(Cli::try_parse_from(["boatrace-mnist", "train", "--model", "cnn"]).is_err());
    }
}
