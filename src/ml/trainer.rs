// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Full train + validation loop using Burn's DataLoader.
//
// Per epoch:
//   1. shuffled training batches: forward → cross-entropy →
//      backward → optimiser step
//   2. validation batches on model.valid() (no autodiff,
//      dropout disabled)
//   3. print + CSV-log the epoch metrics, checkpoint the model
//   4. ask early stopping whether to continue
//
// After the last epoch the model is evaluated once on the
// held-out test partition.
//
// The three architectures are different types, so the entry
// point matches on ModelKind once and hands a concrete model
// to the generic loop.

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer, SgdConfig},
    prelude::*,
};

use crate::application::train_use_case::{ModelKind, OptimizerKind, TrainConfig};
use crate::data::{batcher::DigitBatcher, dataset::DigitDataset};
use crate::domain::digit::{IMAGE_PIXELS, IMAGE_SIDE, NUM_CLASSES};
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::{
    birnn::BiRnnConfig,
    classifier::DigitClassifier,
    default_device,
    dnn::DnnConfig,
    early_stopping::EarlyStopping,
    evaluator::{evaluate, EvalMetrics, MetricAccumulator},
    swish::SwishNetConfig,
    InferBackend, TrainBackend,
};

type Device = <InferBackend as Backend>::Device;

/// The three partitions a run works with.
pub struct SplitData {
    pub train: DigitDataset,
    /// None when the whole training partition is used for fitting
    pub val:   Option<DigitDataset>,
    pub test:  DigitDataset,
}

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub history:       Vec<EpochMetrics>,
    pub test:          EvalMetrics,
    pub stopped_early: bool,
}

pub fn run_training(
    cfg:          &TrainConfig,
    data:         SplitData,
    ckpt_manager: &CheckpointManager,
    metrics:      &MetricsLogger,
) -> Result<TrainingReport> {
    let device = default_device();
    tracing::info!("Using device: {:?}", device);
    TrainBackend::seed(cfg.seed);

    match cfg.model {
        ModelKind::Dnn => {
            let model = DnnConfig::new(IMAGE_PIXELS, cfg.hidden_dim, NUM_CLASSES)
                .with_dropout(cfg.dropout)
                .init::<TrainBackend>(&device);
            tracing::info!("Model ready: dnn, hidden={}, dropout={}", cfg.hidden_dim, cfg.dropout);
            with_optimizer(cfg, model, data, ckpt_manager, metrics, device)
        }
        ModelKind::Swish => {
            let model = SwishNetConfig::new(IMAGE_PIXELS, cfg.hidden_dim, NUM_CLASSES)
                .with_beta(cfg.swish_beta)
                .init::<TrainBackend>(&device);
            tracing::info!("Model ready: swish, hidden={}, beta={}", cfg.hidden_dim, cfg.swish_beta);
            with_optimizer(cfg, model, data, ckpt_manager, metrics, device)
        }
        ModelKind::BiRnn => {
            let model = BiRnnConfig::new(IMAGE_SIDE, cfg.hidden_dim, NUM_CLASSES)
                .init::<TrainBackend>(&device);
            tracing::info!("Model ready: birnn, hidden={} per direction", cfg.hidden_dim);
            with_optimizer(cfg, model, data, ckpt_manager, metrics, device)
        }
    }
}

fn with_optimizer<M>(
    cfg:          &TrainConfig,
    model:        M,
    data:         SplitData,
    ckpt_manager: &CheckpointManager,
    metrics:      &MetricsLogger,
    device:       Device,
) -> Result<TrainingReport>
where
    M: AutodiffModule<TrainBackend> + DigitClassifier<TrainBackend>,
    M::InnerModule: DigitClassifier<InferBackend>,
{
    match cfg.optimizer {
        OptimizerKind::Sgd => {
            let optim = SgdConfig::new().init::<TrainBackend, M>();
            train_loop(cfg, model, optim, data, ckpt_manager, metrics, device)
        }
        OptimizerKind::Adam => {
            // m = β1*m + (1-β1)*g        (mean)
            // v = β2*v + (1-β2)*g²       (variance)
            // θ = θ - lr * m / (√v + ε)  (update)
            let optim = AdamConfig::new()
                .with_beta_1(0.9)
                .with_beta_2(0.999)
                .with_epsilon(1e-7)
                .init::<TrainBackend, M>();
            train_loop(cfg, model, optim, data, ckpt_manager, metrics, device)
        }
    }
}

fn train_loop<M, O>(
    cfg:          &TrainConfig,
    mut model:    M,
    mut optim:    O,
    data:         SplitData,
    ckpt_manager: &CheckpointManager,
    metrics:      &MetricsLogger,
    device:       Device,
) -> Result<TrainingReport>
where
    M: AutodiffModule<TrainBackend> + DigitClassifier<TrainBackend>,
    M::InnerModule: DigitClassifier<InferBackend>,
    O: Optimizer<M, TrainBackend>,
{
    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    let train_loader = DataLoaderBuilder::new(DigitBatcher::<TrainBackend>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(data.train);

    // ── Validation data loader (InnerBackend — no autodiff overhead) ──────────
    let val_loader = data.val.map(|ds| {
        DataLoaderBuilder::new(DigitBatcher::<InferBackend>::new(device.clone()))
            .batch_size(cfg.batch_size)
            .num_workers(1)
            .build(ds)
    });

    let mut stopper       = cfg.patience.map(|p| EarlyStopping::new(p, true));
    let mut history       = Vec::with_capacity(cfg.epochs);
    let mut stopped_early = false;

    for epoch in 1..=cfg.epochs {
        // ── Training phase ───────────────────────────────────────────────────
        let mut train_acc = MetricAccumulator::default();

        for batch in train_loader.iter() {
            let step = model.forward_classification(batch);
            train_acc.add(&step);

            let grads = step.loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }
        let train = train_acc.finish();

        // ── Validation phase ─────────────────────────────────────────────────
        let val = val_loader
            .as_ref()
            .map(|loader| evaluate(&model.valid(), loader.as_ref()));

        let row = EpochMetrics::new(
            epoch,
            train.loss,
            train.accuracy,
            val.map(|v| v.loss),
            val.map(|v| v.accuracy),
        );
        println!("{}", row.summary());
        metrics.log(&row)?;
        history.push(row);

        ckpt_manager.save_model(&model, epoch)?;
        tracing::debug!("Checkpoint saved for epoch {}", epoch);

        // Validation loss when there is a validation set, training loss otherwise
        let monitored = val.map_or(train.loss, |v| v.loss);
        if let Some(es) = stopper.as_mut() {
            if es.should_stop(monitored) {
                tracing::info!("Early stop at epoch {} (best loss {:.4})", epoch, es.best());
                stopped_early = true;
                break;
            }
        }
    }

    // ── Test evaluation ───────────────────────────────────────────────────────
    let test_loader = DataLoaderBuilder::new(DigitBatcher::<InferBackend>::new(device))
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(data.test);
    let test = evaluate(&model.valid(), test_loader.as_ref());

    println!("test_loss: {:.3}, test_acc: {:.3}", test.loss, test.accuracy);
    tracing::info!("Training complete!");

    Ok(TrainingReport { history, test, stopped_early })
}
