use burn::data::dataset::Dataset;

use crate::domain::digit::{DigitSample, NUM_CLASSES};

/// In-memory digit images served to Burn's DataLoader.
pub struct DigitDataset {
    samples: Vec<DigitSample>,
}

impl DigitDataset {
    pub fn new(samples: Vec<DigitSample>) -> Self { Self { samples } }

    /// Number of samples per class, indexed by digit
    pub fn class_counts(&self) -> [usize; NUM_CLASSES] {
        let mut counts = [0usize; NUM_CLASSES];
        for s in &self.samples {
            if let Some(c) = counts.get_mut(s.label as usize) {
                *c += 1;
            }
        }
        counts
    }
}

impl Dataset<DigitSample> for DigitDataset {
    fn get(&self, index: usize) -> Option<DigitSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
