// ============================================================
// Layer 4 — Train/Validation Splitter
// ============================================================
// Randomly shuffles samples and splits them into two sets:
//   - Training set:   used to update model weights
//   - Validation set: used to measure performance on unseen data
//
// MNIST ships a 60k training partition and a 10k test
// partition. The test partition is kept for the very end,
// so validation has to be carved out of the training data.
//
// Split ratio: 80% training, 20% validation for dnn/birnn,
// 100% training for swish (no validation at all).
//
// The RNG is passed in so a fixed seed gives the same split
// on every run.

use rand::{seq::SliceRandom, Rng};

/// Shuffle `samples` and split into (train, validation).
///
/// # Arguments
/// * `samples`        - All available samples (consumed by this function)
/// * `train_fraction` - Proportion for training, e.g. 0.8 = 80%
/// * `rng`            - Source of randomness for the shuffle
///
/// # Returns
/// A tuple (train_samples, val_samples)
pub fn split_train_val<T, R: Rng + ?Sized>(
    mut samples:    Vec<T>,
    train_fraction: f64,
    rng:            &mut R,
) -> (Vec<T>, Vec<T>) {
    // Fisher-Yates shuffle
    samples.shuffle(rng);

    // e.g. 60000 samples * 0.8 = 48000 → first 48000 are training
    let total    = samples.len();
    let split_at = ((total as f64) * train_fraction).round() as usize;

    // Clamp to valid range to avoid panics on tiny datasets
    let split_at = split_at.min(total);

    // After this: samples = [0..split_at], val = [split_at..total]
    let val = samples.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} validation ({}% / {}%)",
        samples.len(),
        val.len(),
        (samples.len() * 100) / total.max(1),
        (val.len()     * 100) / total.max(1),
    );

    (samples, val)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_correct_split_sizes() {
        let items: Vec<usize> = (0..100).collect();
        let (train, val)      = split_train_val(items, 0.8, &mut StdRng::seed_from_u64(123));
        assert_eq!(train.len(), 80);
        assert_eq!(val.len(),   20);
    }

    #[test]
    fn test_all_items_preserved() {
        let items: Vec<usize> = (0..50).collect();
        let (train, val)      = split_train_val(items, 0.7, &mut StdRng::seed_from_u64(1));
        let mut all: Vec<usize> = train.into_iter().chain(val).collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_split() {
        let (a, _) = split_train_val((0..30).collect::<Vec<u32>>(), 0.8, &mut StdRng::seed_from_u64(123));
        let (b, _) = split_train_val((0..30).collect::<Vec<u32>>(), 0.8, &mut StdRng::seed_from_u64(123));
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_dataset() {
        let items: Vec<usize> = Vec::new();
        let (train, val)      = split_train_val(items, 0.8, &mut StdRng::seed_from_u64(0));
        assert!(train.is_empty());
        assert!(val.is_empty());
    }

    #[test]
    fn test_full_training_split() {
        // 1.0 fraction means everything goes to training
        let items: Vec<usize> = (0..10).collect();
        let (train, val)      = split_train_val(items, 1.0, &mut StdRng::seed_from_u64(0));
        assert_eq!(train.len(), 10);
        assert!(val.is_empty());
    }
}
