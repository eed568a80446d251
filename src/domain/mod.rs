// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, constants and traits that describe
// what the program works with.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O or network calls
//   - Only plain Rust structs, enums, and traits

// A normalised MNIST image and its label
pub mod digit;

// Download links and HTTP outcomes for the archive scraper
pub mod archive;

// Core abstractions (traits) that other layers implement
pub mod traits;
