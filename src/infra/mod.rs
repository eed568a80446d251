// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that touches the disk, the network or the
// terminal on behalf of the other layers:
//
//   checkpoint.rs    — model weights (Burn CompactRecorder)
//                      plus the run's TrainConfig as JSON
//   metrics.rs       — per-epoch metrics CSV
//   plot.rs          — terminal loss curve
//   http.rs          — blocking reqwest client (PageFetcher)
//   archive_store.rs — writes downloaded .lzh files

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;

/// Loss curve drawn after training
pub mod plot;

/// HTTP GET for the scraper
pub mod http;

/// Output directory for downloaded archives
pub mod archive_store;
