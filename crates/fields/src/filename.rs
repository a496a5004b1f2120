//! Output file names for generated certificates.

use regex::Regex;
use std::sync::OnceLock;

pub const MAX_NAME_LEN: usize = 60;

fn disallowed() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_.\s-]").expect("static pattern"))
}

/// Replaces every character outside `[A-Za-z0-9_.\s-]` with `_` and cuts
/// the result to [`MAX_NAME_LEN`] characters.
pub fn sanitize_filename(name: &str) -> String {
    disallowed()
        .replace_all(name, "_")
        .chars()
        .take(MAX_NAME_LEN)
        .collect()
}

/// Name used when a row has no usable name value. `row_index` is zero-based.
pub fn fallback_name(row_index: usize) -> String {
    format!("uczestnik_{}", row_index + 1)
}

/// `cert_<n>_<sanitized name>.pdf`; the row number keeps names unique.
pub fn certificate_filename(row_index: usize, name: &str) -> String {
    format!("cert_{}_{}.pdf", row_index + 1, sanitize_filename(name))
}
