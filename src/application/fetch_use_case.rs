// ============================================================
// Layer 2 — FetchUseCase
// ============================================================
// Downloads every race-result archive linked from the
// download page, one at a time:
//
//   Step 1: GET the download page
//   Step 2: Extract .lzh links              (Layer 4 - data)
//   Step 3: For each link:
//             unusable local file name → reject, no request
//             sleep `delay` (politeness to the server)
//             GET the archive
//             status == 200 → write file     (Layer 6 - infra)
//             anything else → skip, no retry
//
// Transport errors (DNS, timeout, connection reset) abort the
// run; an unexpected status only skips that one archive.

use anyhow::{bail, Result};
use std::{thread, time::Duration};

use crate::data::links::extract_archive_links;
use crate::domain::archive::FetchReport;
use crate::domain::traits::PageFetcher;
use crate::infra::archive_store::ArchiveStore;

pub const DEFAULT_PAGE_URL: &str = "http://www.boatrace.jp/owpc/pc/extra/data/download.html";

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub page_url: String,
    pub out_dir:  String,
    /// Pause before each archive request
    pub delay:    Duration,
    pub timeout:  Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            page_url: DEFAULT_PAGE_URL.to_string(),
            out_dir:  "boat-racer_lzh".to_string(),
            delay:    Duration::from_secs(1),
            timeout:  Duration::from_secs(60),
        }
    }
}

pub struct FetchUseCase<F: PageFetcher> {
    config:  FetchConfig,
    fetcher: F,
}

impl<F: PageFetcher> FetchUseCase<F> {
    pub fn new(config: FetchConfig, fetcher: F) -> Self {
        Self { config, fetcher }
    }

    pub fn execute(&self) -> Result<FetchReport> {
        let cfg = &self.config;

        // ── Step 1: Download page ────────────────────────────────────────────
        tracing::info!("Fetching download page '{}'", cfg.page_url);
        let page = self.fetcher.get(&cfg.page_url)?;
        if !page.is_ok() {
            bail!("Download page '{}' answered HTTP {}", cfg.page_url, page.status);
        }
        let html = String::from_utf8_lossy(&page.body);

        // ── Step 2: Links ────────────────────────────────────────────────────
        let links = extract_archive_links(&html, &cfg.page_url)?;
        let store = ArchiveStore::new(&cfg.out_dir)?;

        // ── Step 3: Sequential downloads ─────────────────────────────────────
        let mut report = FetchReport::default();
        for link in links {
            if !ArchiveStore::accepts(&link.file_name) {
                tracing::warn!("Skipping {}: unusable file name '{}'", link.url, link.file_name);
                report.rejected.push(link.file_name);
                continue;
            }

            thread::sleep(cfg.delay);

            let response = self.fetcher.get(&link.url)?;
            if response.is_ok() {
                store.save(&link.file_name, &response.body)?;
                println!("{} downloaded", link.file_name);
                report.downloaded.push(link.file_name);
            } else {
                tracing::debug!("Skipping {} (HTTP {})", link.url, response.status);
                report.skipped.push((link.file_name, response.status));
            }
        }

        tracing::info!(
            "Saved {} of {} archives to '{}'",
            report.downloaded.len(),
            report.total(),
            store.dir().display()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::archive::FetchResponse;
    use std::{cell::RefCell, collections::HashMap, fs, time::Instant};

    /// Serves canned responses and remembers what was requested.
    struct StubFetcher {
        pages:     HashMap<String, FetchResponse>,
        requested: RefCell<Vec<String>>,
    }

    impl StubFetcher {
        fn new(pages: Vec<(&str, u16, &str)>) -> Self {
            let pages = pages
                .into_iter()
                .map(|(url, status, body)| (url.to_string(), FetchResponse::new(status, body.as_bytes())))
                .collect();
            Self { pages, requested: RefCell::new(Vec::new()) }
        }
    }

    impl PageFetcher for StubFetcher {
        fn get(&self, url: &str) -> Result<FetchResponse> {
            self.requested.borrow_mut().push(url.to_string());
            match self.pages.get(url) {
                Some(r) => Ok(r.clone()),
                None    => bail!("connection refused: {url}"),
            }
        }
    }

    const PAGE: &str = "http://race.test/data/download.html";
    const HTML: &str = r#"<ul class="data_list h-mt15">
        <li><a href="/data/dl/a.lzh">a</a></li>
        <li><a href="/data/dl/b.lzh">b</a></li>
        <li><a href="/data/dl/c.lzh">c</a></li>
    </ul>"#;

    fn config(out_dir: &std::path::Path) -> FetchConfig {
        FetchConfig {
            page_url: PAGE.to_string(),
            out_dir:  out_dir.to_string_lossy().into_owned(),
            delay:    Duration::ZERO,
            ..FetchConfig::default()
        }
    }

    #[test]
    fn test_writes_only_on_status_200() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = StubFetcher::new(vec![
            (PAGE, 200, HTML),
            ("http://race.test/data/dl/a.lzh", 200, "AAA"),
            ("http://race.test/data/dl/b.lzh", 404, "not found"),
            ("http://race.test/data/dl/c.lzh", 204, ""),
        ]);

        let report = FetchUseCase::new(config(dir.path()), fetcher).execute().unwrap();

        assert_eq!(report.downloaded, vec!["a.lzh".to_string()]);
        assert_eq!(
            report.skipped,
            vec![("b.lzh".to_string(), 404), ("c.lzh".to_string(), 204)]
        );
        assert_eq!(fs::read(dir.path().join("a.lzh")).unwrap(), b"AAA");
        assert!(!dir.path().join("b.lzh").exists());
        assert!(!dir.path().join("c.lzh").exists());
    }

    #[test]
    fn test_requests_are_sequential_in_page_order() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = StubFetcher::new(vec![
            (PAGE, 200, HTML),
            ("http://race.test/data/dl/a.lzh", 200, "A"),
            ("http://race.test/data/dl/b.lzh", 200, "B"),
            ("http://race.test/data/dl/c.lzh", 200, "C"),
        ]);

        let use_case = FetchUseCase::new(config(dir.path()), fetcher);
        use_case.execute().unwrap();

        let requested = use_case.fetcher.requested.borrow();
        assert_eq!(requested[0], PAGE);
        assert_eq!(
            &requested[1..],
            &[
                "http://race.test/data/dl/a.lzh".to_string(),
                "http://race.test/data/dl/b.lzh".to_string(),
                "http://race.test/data/dl/c.lzh".to_string(),
            ]
        );
    }

    #[test]
    fn test_bad_page_status_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = StubFetcher::new(vec![(PAGE, 503, "busy")]);
        assert!(FetchUseCase::new(config(dir.path()), fetcher).execute().is_err());
    }

    #[test]
    fn test_transport_error_aborts() {
        let dir = tempfile::tempdir().unwrap();
        // a.lzh is missing from the stub → connection error
        let fetcher = StubFetcher::new(vec![(PAGE, 200, HTML)]);
        assert!(FetchUseCase::new(config(dir.path()), fetcher).execute().is_err());
    }

    #[test]
    fn test_waits_before_every_archive_request() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = StubFetcher::new(vec![
            (PAGE, 200, HTML),
            ("http://race.test/data/dl/a.lzh", 200, "A"),
            ("http://race.test/data/dl/b.lzh", 404, ""),
            ("http://race.test/data/dl/c.lzh", 200, "C"),
        ]);
        let cfg = FetchConfig {
            delay: Duration::from_millis(20),
            ..config(dir.path())
        };

        let started = Instant::now();
        let report  = FetchUseCase::new(cfg, fetcher).execute().unwrap();

        assert_eq!(report.total(), 3);
        assert!(started.elapsed() >= Duration::from_millis(60));
    }

    #[test]
    fn test_unusable_file_name_does_not_stop_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let html = r#"<ul class="data_list">
            <li><a href="/data/dl/a.lzh">a</a></li>
            <li><a href="/data/dl\bad.lzh">bad</a></li>
            <li><a href="/data/dl/c.lzh">c</a></li>
        </ul>"#;
        let fetcher = StubFetcher::new(vec![
            (PAGE, 200, html),
            ("http://race.test/data/dl/a.lzh", 200, "A"),
            ("http://race.test/data/dl/c.lzh", 200, "C"),
        ]);

        let use_case = FetchUseCase::new(config(dir.path()), fetcher);
        let report   = use_case.execute().unwrap();

        assert_eq!(report.downloaded, vec!["a.lzh".to_string(), "c.lzh".to_string()]);
        assert_eq!(report.rejected, vec!["dl\\bad.lzh".to_string()]);
        assert!(report.skipped.is_empty());
        assert_eq!(use_case.fetcher.requested.borrow().len(), 3);
        assert_eq!(fs::read(dir.path().join("c.lzh")).unwrap(), b"C");
    }
}
