// ============================================================
// Layer 4 — MNIST Source
// ============================================================
// Loads MNIST through Burn's built-in vision dataset.
//
// MnistDataset::train() / ::test() download the original
// IDX files on first use and cache them under the user's
// cache directory (~/.cache/burn-dataset/mnist), so only the
// first run needs network access.
//
// Burn hands back raw grey levels (0.0–255.0) as a 28×28
// array; they are flattened row by row and scaled to [0, 1].

use anyhow::{ensure, Result};
use burn::data::dataset::{
    vision::{MnistDataset, MnistItem},
    Dataset,
};

use crate::domain::digit::DigitSample;
use crate::domain::traits::DigitSource;

/// The MNIST dataset as shipped by the framework.
#[derive(Debug, Default, Clone)]
pub struct MnistSource {
    /// Keep only the first `limit` images of each partition
    limit: Option<usize>,
}

impl MnistSource {
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self { limit }
    }

    fn convert(&self, dataset: MnistDataset, partition: &str) -> Result<Vec<DigitSample>> {
        let take = self.limit.unwrap_or(usize::MAX);
        let samples: Vec<DigitSample> = dataset
            .iter()
            .take(take)
            .map(|item| to_sample(&item))
            .collect();

        ensure!(!samples.is_empty(), "MNIST {partition} partition is empty");
        ensure!(
            samples.iter().all(DigitSample::is_well_formed),
            "MNIST {partition} partition contains malformed images"
        );
        tracing::info!("Loaded {} MNIST {} images", samples.len(), partition);
        Ok(samples)
    }
}

impl DigitSource for MnistSource {
    fn load_train(&self) -> Result<Vec<DigitSample>> {
        self.convert(MnistDataset::train(), "train")
    }

    fn load_test(&self) -> Result<Vec<DigitSample>> {
        self.convert(MnistDataset::test(), "test")
    }
}

fn to_sample(item: &MnistItem) -> DigitSample {
    let levels: Vec<f32> = item.image.iter().flatten().copied().collect();
    DigitSample::from_grey_levels(&levels, item.label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::digit::{IMAGE_PIXELS, IMAGE_SIDE};

    #[test]
    fn test_item_conversion() {
        let mut image = [[0.0f32; IMAGE_SIDE]; IMAGE_SIDE];
        image[0][1] = 255.0;
        image[27][27] = 127.5;
        let s = to_sample(&MnistItem { image, label: 4 });
        assert_eq!(s.pixels.len(), IMAGE_PIXELS);
        assert_eq!(s.pixels[1], 1.0);
        assert!((s.pixels[IMAGE_PIXELS - 1] - 0.5).abs() < 1e-6);
        assert_eq!(s.label, 4);
    }
}
