// ============================================================
// Layer 6 — Loss curve
// ============================================================
// Draws the loss history as a braille line chart in the
// terminal once training has finished. x = epoch, y = loss.
// Training loss is always drawn; validation loss is added
// when the run had a validation split.
//
// The persisted version of the same curve is metrics.csv.

use textplots::{Chart, Plot, Shape};

use crate::infra::metrics::EpochMetrics;

const WIDTH:  u32 = 120;
const HEIGHT: u32 = 60;

/// (epoch, loss) points for the training and validation series.
pub fn loss_series(history: &[EpochMetrics]) -> (Vec<(f32, f32)>, Vec<(f32, f32)>) {
    let train = history
        .iter()
        .map(|m| (m.epoch as f32, m.train_loss as f32))
        .collect();
    let val = history
        .iter()
        .filter_map(|m| m.val_loss.map(|l| (m.epoch as f32, l as f32)))
        .collect();
    (train, val)
}

/// Print the chart to stdout. Needs at least two epochs.
pub fn plot_loss(history: &[EpochMetrics]) {
    if history.len() < 2 {
        tracing::info!("Not enough epochs to plot a loss curve");
        return;
    }

    let (train, val) = loss_series(history);
    let x_min = history[0].epoch as f32;
    let x_max = history[history.len() - 1].epoch as f32;

    let train_shape = Shape::Lines(&train);
    let val_shape   = Shape::Lines(&val);

    if val.is_empty() {
        println!("loss (epochs →)");
        Chart::new(WIDTH, HEIGHT, x_min, x_max)
            .lineplot(&train_shape)
            .display();
    } else {
        println!("loss, val_loss (epochs →)");
        Chart::new(WIDTH, HEIGHT, x_min, x_max)
            .lineplot(&train_shape)
            .lineplot(&val_shape)
            .display();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_skip_missing_validation() {
        let history = vec![
            EpochMetrics::new(1, 1.0, 0.5, Some(0.9), Some(0.6)),
            EpochMetrics::new(2, 0.5, 0.7, None, None),
        ];
        let (train, val) = loss_series(&history);
        assert_eq!(train, vec![(1.0, 1.0), (2.0, 0.5)]);
        assert_eq!(val, vec![(1.0, 0.9)]);
    }
}
