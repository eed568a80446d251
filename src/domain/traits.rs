// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer talks to the outside world through
// these two traits, so it can be exercised in tests without
// a network connection or a dataset download:
//
//   PageFetcher — HttpFetcher (reqwest) in production,
//                 an in-memory map in tests
//   DigitSource — MnistSource (Burn's MNIST loader) in
//                 production, synthetic digits in tests

use anyhow::Result;

use crate::domain::archive::FetchResponse;
use crate::domain::digit::DigitSample;

// ─── PageFetcher ──────────────────────────────────────────────────────────────
/// Anything that can perform a GET request and hand back
/// the status code and body.
///
/// A non-success status is NOT an error at this level —
/// the caller decides what to do with it. Errors are
/// reserved for transport failures (DNS, timeouts, ...).
pub trait PageFetcher {
    fn get(&self, url: &str) -> Result<FetchResponse>;
}

// ─── DigitSource ──────────────────────────────────────────────────────────────
/// A provider of labelled digit images, split the way MNIST
/// ships them: a training partition and a held-out test partition.
pub trait DigitSource {
    /// Training partition (validation is carved out of this later)
    fn load_train(&self) -> Result<Vec<DigitSample>>;

    /// Test partition, only used for the final evaluation
    fn load_test(&self) -> Result<Vec<DigitSample>>;
}
