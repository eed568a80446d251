// ============================================================
// Layer 4 — Archive Link Extractor
// ============================================================
// Pulls the .lzh download links out of the race-result
// download page.
//
// The page groups its archives in lists like:
//
//   <ul class="data_list h-mt15">
//     <li><a href="/owpc/pc/extra/data/download/k2401.lzh">...</a></li>
//     ...
//   </ul>
//
// Extraction is two passes:
//   1. find every <ul> whose class list contains `data_list`
//      (class quoted either way) and walk the <ul>/</ul> tags
//      after it to its matching close, so nested lists stay
//      inside the block
//   2. inside those blocks, match anchors whose href ends in .lzh
//
// If the page has no such list (markup changed), the whole
// document is searched instead so a redesign doesn't silently
// produce zero downloads.
//
// Hrefs are usually site-relative, so each one is resolved
// against the page URL. The local filename is whatever follows
// the last '/' in the href.

use anyhow::{Context, Result};
use regex::Regex;
use reqwest::Url;
use std::collections::HashSet;

use crate::domain::archive::ArchiveLink;

const LIST_OPEN_PATTERN: &str =
    r#"(?i)<ul\b[^>]*\bclass\s*=\s*(?:"[^"]*\bdata_list\b[^"]*"|'[^']*\bdata_list\b[^']*')[^>]*>"#;

const UL_TAG_PATTERN: &str = r"(?i)<(/?)ul\b[^>]*>";

const HREF_PATTERN: &str = r#"(?i)<a\b[^>]*?\bhref\s*=\s*["']([^"']+\.lzh)["']"#;

/// Find all .lzh archive links on the download page.
///
/// # Arguments
/// * `html`     - Raw page markup
/// * `page_url` - URL the page was fetched from, used to resolve relative hrefs
///
/// # Returns
/// Links in order of appearance, each URL at most once.
pub fn extract_archive_links(html: &str, page_url: &str) -> Result<Vec<ArchiveLink>> {
    let base = Url::parse(page_url)
        .with_context(|| format!("Invalid page URL '{page_url}'"))?;

    let href_re = Regex::new(HREF_PATTERN)?;
    let blocks  = data_list_blocks(html)?;

    let search_space: Vec<&str> = if blocks.is_empty() {
        tracing::warn!("No data_list block on '{}', searching the whole page", page_url);
        vec![html]
    } else {
        tracing::debug!("Found {} data_list blocks", blocks.len());
        blocks
    };

    let mut seen  = HashSet::new();
    let mut links = Vec::new();

    for block in search_space {
        for cap in href_re.captures_iter(block) {
            let href = &cap[1];

            let file_name = href.rsplit('/').next().unwrap_or(href).trim();
            if file_name.is_empty() {
                tracing::debug!("Skipping href without a filename: '{}'", href);
                continue;
            }

            let url = base
                .join(href)
                .with_context(|| format!("Cannot resolve href '{href}' against '{page_url}'"))?;

            if seen.insert(url.to_string()) {
                links.push(ArchiveLink::new(url.to_string(), file_name));
            }
        }
    }

    tracing::info!("Found {} archive links", links.len());
    Ok(links)
}

/// Inner markup of every `data_list` <ul>. An unclosed list runs to
/// the end of the document; lists nested in an earlier block are
/// already part of it and are not returned again.
fn data_list_blocks(html: &str) -> Result<Vec<&str>> {
    let open_re = Regex::new(LIST_OPEN_PATTERN)?;
    let tag_re  = Regex::new(UL_TAG_PATTERN)?;

    let mut blocks = Vec::new();
    let mut covered = 0;

    for open in open_re.find_iter(html) {
        if open.start() < covered {
            continue;
        }

        let start   = open.end();
        let mut end = html.len();
        let mut depth = 1usize;
        for tag in tag_re.captures_iter(&html[start..]) {
            if tag[1].is_empty() {
                depth += 1;
            } else {
                depth -= 1;
                if depth == 0 {
                    end = start + tag.get(0).map_or(0, |m| m.start());
                    break;
                }
            }
        }

        blocks.push(&html[start..end]);
        covered = end;
    }
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "http://www.boatrace.jp/owpc/pc/extra/data/download.html";

    const FIXTURE: &str = r#"
<html><body>
  <ul class="menu"><li><a href="/owpc/pc/other.lzh">menu link</a></li></ul>
  <ul class="data_list h-mt15">
    <li><a href="/owpc/pc/extra/data/download/k2401.lzh">2024/01</a></li>
    <li><a class="btn" href="/owpc/pc/extra/data/download/k2402.LZH">2024/02</a></li>
    <li><a href="/owpc/pc/extra/data/download/readme.pdf">readme</a></li>
  </ul>
  <ul class="data_list h-mt15">
    <li><a href="http://mirror.example.com/files/b2401.lzh">mirror</a></li>
    <li><a href="/owpc/pc/extra/data/download/k2401.lzh">dup</a></li>
  </ul>
</body></html>
"#;

    #[test]
    fn test_only_links_inside_data_lists() {
        let links = extract_archive_links(FIXTURE, PAGE).unwrap();
        let names: Vec<&str> = links.iter().map(|l| l.file_name.as_str()).collect();
        assert_eq!(names, vec!["k2401.lzh", "k2402.LZH", "b2401.lzh"]);
    }

    #[test]
    fn test_relative_hrefs_resolve_against_site_root() {
        let links = extract_archive_links(FIXTURE, PAGE).unwrap();
        assert_eq!(
            links[0].url,
            "http://www.boatrace.jp/owpc/pc/extra/data/download/k2401.lzh"
        );
        // absolute hrefs are kept as-is
        assert_eq!(links[2].url, "http://mirror.example.com/files/b2401.lzh");
    }

    #[test]
    fn test_falls_back_to_whole_page() {
        let html = r#"<p><a href="files/x1.lzh">x</a> <a href="y.txt">y</a></p>"#;
        let links = extract_archive_links(html, PAGE).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].file_name, "x1.lzh");
        assert_eq!(
            links[0].url,
            "http://www.boatrace.jp/owpc/pc/extra/data/files/x1.lzh"
        );
    }

    #[test]
    fn test_page_without_archives() {
        let links = extract_archive_links("<html></html>", PAGE).unwrap();
        assert!(links.is_empty());
    }

    #[test]
    fn test_invalid_page_url() {
        assert!(extract_archive_links(FIXTURE, "not a url").is_err());
    }

    #[test]
    fn test_single_quoted_class() {
        let html = r#"
<ul class='menu'><li><a href="/owpc/pc/other.lzh">menu</a></li></ul>
<ul class='data_list h-mt15'><li><a href='/dl/k2403.lzh'>x</a></li></ul>"#;
        let links = extract_archive_links(html, PAGE).unwrap();
        let names: Vec<&str> = links.iter().map(|l| l.file_name.as_str()).collect();
        assert_eq!(names, vec!["k2403.lzh"]);
    }

    #[test]
    fn test_nested_list_keeps_later_links() {
        let html = r#"
<ul class="data_list">
  <li>2024
    <ul class="months"><li><a href="/dl/k2401.lzh">01</a></li></ul>
  </li>
  <li><a href="/dl/k2402.lzh">02</a></li>
</ul>
<p><a href="/dl/outside.lzh">outside</a></p>"#;
        let links = extract_archive_links(html, PAGE).unwrap();
        let names: Vec<&str> = links.iter().map(|l| l.file_name.as_str()).collect();
        assert_eq!(names, vec!["k2401.lzh", "k2402.lzh"]);
    }

    #[test]
    fn test_unclosed_list_runs_to_end() {
        let html = r#"<ul class="data_list"><li><a href="/dl/k2404.lzh">x</a></li>"#;
        let links = extract_archive_links(html, PAGE).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].file_name, "k2404.lzh");
    }
}
