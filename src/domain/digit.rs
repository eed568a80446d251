// ============================================================
// Layer 3 — Digit Domain Type
// ============================================================
// One handwritten digit image with its class label.
//
// Images are stored flattened in row-major order:
//   pixel (row, col) lives at index row * IMAGE_SIDE + col
// and every value has already been scaled into [0.0, 1.0].
//
// The models decide how to read the pixels: the feed-forward
// networks see one 784-wide vector, the BiRNN sees 28 time
// steps of 28 features. The domain type stays neutral.

use serde::{Deserialize, Serialize};

/// Width and height of an MNIST image
pub const IMAGE_SIDE: usize = 28;

/// Number of pixels per image (28 × 28)
pub const IMAGE_PIXELS: usize = IMAGE_SIDE * IMAGE_SIDE;

/// Digits 0 through 9
pub const NUM_CLASSES: usize = 10;

/// A normalised digit image and its label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigitSample {
    /// IMAGE_PIXELS values in [0.0, 1.0], row-major
    pub pixels: Vec<f32>,

    /// The digit shown in the image (0..=9)
    pub label: u8,
}

impl DigitSample {
    /// Build a sample from raw 0–255 grey levels.
    /// Each value is divided by 255 so the network sees [0, 1].
    pub fn from_grey_levels(levels: &[f32], label: u8) -> Self {
        Self {
            pixels: levels.iter().map(|&v| v / 255.0).collect(),
            label,
        }
    }

    /// True when the sample has the expected shape and label range
    pub fn is_well_formed(&self) -> bool {
        self.pixels.len() == IMAGE_PIXELS && (self.label as usize) < NUM_CLASSES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grey_levels_are_scaled() {
        let mut levels = vec![0.0f32; IMAGE_PIXELS];
        levels[0] = 255.0;
        levels[1] = 51.0;
        let s = DigitSample::from_grey_levels(&levels, 7);
        assert_eq!(s.pixels[0], 1.0);
        assert!((s.pixels[1] - 0.2).abs() < 1e-6);
        assert!(s.is_well_formed());
    }

    #[test]
    fn test_bad_label_is_rejected() {
        let s = DigitSample { pixels: vec![0.0; IMAGE_PIXELS], label: 10 };
        assert!(!s.is_well_formed());
    }
}
