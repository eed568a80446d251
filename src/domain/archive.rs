// ============================================================
// Layer 3 — Archive Domain Types
// ============================================================
// The scraper works with three plain values:
//
//   ArchiveLink   — where to download one .lzh file and what
//                   to call it locally
//   FetchResponse — what came back from one HTTP GET
//   FetchReport   — what happened over a whole scrape run
//
// No HTTP client types appear here; the infra layer converts
// its responses into FetchResponse.

use serde::{Deserialize, Serialize};

/// The only status code that results in a file being written
pub const HTTP_OK: u16 = 200;

/// A resolved download link for one race-result archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveLink {
    /// Absolute URL of the archive
    pub url: String,

    /// Trailing path segment of the href, used as the local filename
    pub file_name: String,
}

impl ArchiveLink {
    pub fn new(url: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            url:       url.into(),
            file_name: file_name.into(),
        }
    }
}

/// Status code and raw body of one GET request.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body:   Vec<u8>,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, body: body.into() }
    }

    /// Exactly 200. Other 2xx codes do not count.
    pub fn is_ok(&self) -> bool {
        self.status == HTTP_OK
    }
}

/// Outcome of one scrape run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    /// File names written to disk, in download order
    pub downloaded: Vec<String>,

    /// (file name, status) for every archive that was not written
    pub skipped: Vec<(String, u16)>,

    /// Links whose file name cannot be written locally; never requested
    pub rejected: Vec<String>,
}

impl FetchReport {
    pub fn total(&self) -> usize {
        self.downloaded.len() + self.skipped.len() + self.rejected.len()
    }
}
