// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records training metrics to a CSV file after each epoch.
//
// Metrics recorded per epoch:
//   - epoch:      the epoch number (1, 2, 3, ...)
//   - train_loss: mean cross-entropy over the training samples
//   - train_acc:  fraction of training samples classified correctly
//   - val_loss:   mean cross-entropy on the validation set
//   - val_acc:    validation accuracy
//
// Runs without a validation set leave the last two cells empty.
//
// Output file: checkpoints/metrics.csv, recreated for every run
//
// Example CSV output:
//   epoch,train_loss,train_acc,val_loss,val_acc
//   1,1.024500,0.683000,0.489200,0.871000
//   2,0.530100,0.842000,0.354300,0.899000

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

const HEADER: &str = "epoch,train_loss,train_acc,val_loss,val_acc";

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    pub train_loss: f64,
    pub train_acc:  f64,

    /// None when training without a validation split
    pub val_loss: Option<f64>,
    pub val_acc:  Option<f64>,
}

impl EpochMetrics {
    pub fn new(
        epoch:      usize,
        train_loss: f64,
        train_acc:  f64,
        val_loss:   Option<f64>,
        val_acc:    Option<f64>,
    ) -> Self {
        Self { epoch, train_loss, train_acc, val_loss, val_acc }
    }

    /// The console line printed after each epoch.
    pub fn summary(&self) -> String {
        let mut line = format!(
            "epoch: {}, loss: {:.3}, acc: {:.3}",
            self.epoch, self.train_loss, self.train_acc
        );
        if let (Some(l), Some(a)) = (self.val_loss, self.val_acc) {
            line.push_str(&format!(", val_loss: {:.3}, val_acc: {:.3}", l, a));
        }
        line
    }

    fn csv_row(&self) -> String {
        let opt = |v: Option<f64>| v.map(|x| format!("{x:.6}")).unwrap_or_default();
        format!(
            "{},{:.6},{:.6},{},{}",
            self.epoch,
            self.train_loss,
            self.train_acc,
            opt(self.val_loss),
            opt(self.val_acc),
        )
    }
}

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger, truncating any CSV left over
    /// from a previous run and writing the header.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let csv_path = dir.join("metrics.csv");
        let mut f = fs::File::create(&csv_path)
            .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
        writeln!(f, "{HEADER}")?;
        tracing::debug!("Created metrics CSV: '{}'", csv_path.display());

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(f, "{}", m.csv_row())?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, val_loss={:?}",
            m.epoch,
            m.train_loss,
            m.val_loss,
        );

        Ok(())
    }

    #[cfg(test)]
    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_format() {
        let m = EpochMetrics::new(3, 0.31234, 0.9, Some(0.25), Some(0.93));
        assert_eq!(
            m.summary(),
            "epoch: 3, loss: 0.312, acc: 0.900, val_loss: 0.250, val_acc: 0.930"
        );
        let m = EpochMetrics::new(1, 1.0, 0.5, None, None);
        assert_eq!(m.summary(), "epoch: 1, loss: 1.000, acc: 0.500");
    }

    #[test]
    fn test_csv_rows() {
        let dir    = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path()).unwrap();
        logger.log(&EpochMetrics::new(1, 0.5, 0.75, Some(0.4), Some(0.8))).unwrap();
        logger.log(&EpochMetrics::new(2, 0.3, 0.85, None, None)).unwrap();

        let text = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], HEADER);
        assert_eq!(lines[1], "1,0.500000,0.750000,0.400000,0.800000");
        assert_eq!(lines[2], "2,0.300000,0.850000,,");

        // a new logger starts a fresh file
        let again = MetricsLogger::new(dir.path()).unwrap();
        assert_eq!(fs::read_to_string(again.csv_path()).unwrap().lines().count(), 1);
    }
}
