// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Two independent pipelines live here.
//
// Training data:
//
//   MnistSource       → Burn's MNIST loader, scaled to [0, 1]
//       │
//       ▼
//   split_train_val   → seeded shuffle + train/validation split
//       │
//       ▼
//   DigitDataset      → implements Burn's Dataset trait
//       │
//       ▼
//   DigitBatcher      → stacks samples into [N, 28, 28] tensors
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// Scraping:
//
//   download page HTML → extract_archive_links → Vec<ArchiveLink>

/// Loads MNIST through burn's vision dataset
pub mod mnist;

/// Implements Burn's Dataset trait for digit samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Shuffles and splits data into train/validation sets
pub mod splitter;

/// Finds .lzh archive links in the download page
pub mod links;
