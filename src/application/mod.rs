// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal each.
//
// Rules for this layer:
//   - No model code here (that's Layer 5)
//   - No argument parsing here (that's Layer 1)
//   - No direct HTTP or file access (that's Layer 6)
//   - Only workflow coordination

// Scrape the download page and save .lzh archives
pub mod fetch_use_case;

// Train a digit classifier and evaluate it on the test set
pub mod train_use_case;

// Reload a checkpoint and evaluate it on the test set
pub mod evaluate_use_case;
