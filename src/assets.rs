//! Loading templates and workbooks from files or URLs.

use anyhow::{bail, Context};
use std::path::Path;

/// Where an asset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Given,
    Default,
}

#[derive(Debug)]
pub struct Asset {
    pub source: String,
    pub origin: Origin,
    pub bytes: Vec<u8>,
}

pub fn is_url(source: &str) -> bool {
    let lower = source.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Reads `source` as an http(s) URL or a local path.
pub fn fetch(source: &str) -> anyhow::Result<Vec<u8>> {
    if is_url(source) {
        log::info!("[Assets] downloading {}", source);
        let response = reqwest::blocking::get(source)
            .with_context(|| format!("download of {} failed", source))?;
        if !response.status().is_success() {
            bail!("download of {} failed with status {}", source, response.status());
        }
        let bytes = response
            .bytes()
            .with_context(|| format!("reading {} failed", source))?;
        return Ok(bytes.to_vec());
    }

    std::fs::read(source).with_context(|| format!("cannot read {}", source))
}

/// Loads `given` when set; otherwise tries `default`. A missing default is
/// not an error and yields `None`.
pub fn load(given: Option<&str>, default: &str) -> anyhow::Result<Option<Asset>> {
    if let Some(source) = given {
        return Ok(Some(Asset {
            source: source.to_string(),
            origin: Origin::Given,
            bytes: fetch(source)?,
        }));
    }

    if default.is_empty() || (!is_url(default) && !Path::new(default).exists()) {
        log::debug!("[Assets] default {:?} not found", default);
        return Ok(None);
    }

    Ok(Some(Asset {
        source: default.to_string(),
        origin: Origin::Default,
        bytes: fetch(default)?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/t.pdf"));
        assert!(is_url("HTTP://example.com/t.pdf"));
        assert!(!is_url("template.pdf"));
        assert!(!is_url("ftp://example.com/t.pdf"));
    }

    #[test]
    fn test_given_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.pdf");
        std::fs::write(&path, b"%PDF").unwrap();

        let asset = load(path.to_str(), "unused.pdf").unwrap().unwrap();
        assert_eq!(asset.origin, Origin::Given);
        assert_eq!(asset.bytes, b"%PDF");
    }

    #[test]
    fn test_missing_given_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.pdf");
        assert!(load(path.to_str(), "unused.pdf").is_err());
    }

    #[test]
    fn test_default_used_or_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.xlsx");
        let default = path.to_str().unwrap();
        assert!(load(None, default).unwrap().is_none());

        std::fs::write(&path, b"xlsx").unwrap();
        let asset = load(None, default).unwrap().unwrap();
        assert_eq!(asset.origin, Origin::Default);
        assert_eq!(asset.source, default);
    }
}
