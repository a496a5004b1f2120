//! Field key lookup against a data row.
//!
//! Header spellings differ between spreadsheets (`$name` vs `name`), so a
//! key is tried under an ordered list of candidate spellings. The first
//! column present in the row wins, even when its cell is blank.

use crate::value::{CellValue, DataRow};

/// Marker that prefixes logical column names.
pub const DEFAULT_MARKER: char = '$';

/// One way of deriving a column name from a field key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCandidate {
    /// The key as written
    Verbatim,
    /// The key without one leading marker
    StripMarker,
    /// The stripped key with the marker put back in front
    AddMarker,
}

impl KeyCandidate {
    pub fn apply(&self, key: &str, marker: char) -> String {
        match self {
            KeyCandidate::Verbatim => key.to_string(),
            KeyCandidate::StripMarker => strip_marker(key, marker).to_string(),
            KeyCandidate::AddMarker => format!("{}{}", marker, strip_marker(key, marker)),
        }
    }
}

fn strip_marker(key: &str, marker: char) -> &str {
    key.strip_prefix(marker).unwrap_or(key)
}

#[derive(Debug, Clone)]
pub struct ValueResolver {
    marker: char,
    candidates: Vec<KeyCandidate>,
}

impl Default for ValueResolver {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER)
    }
}

impl ValueResolver {
    pub fn new(marker: char) -> Self {
        Self::with_candidates(
            marker,
            vec![
                KeyCandidate::Verbatim,
                KeyCandidate::StripMarker,
                KeyCandidate::AddMarker,
            ],
        )
    }

    pub fn with_candidates(marker: char, candidates: Vec<KeyCandidate>) -> Self {
        Self { marker, candidates }
    }

    pub fn marker(&self) -> char {
        self.marker
    }

    /// Column names tried for `key`, in order, without duplicates.
    pub fn candidate_keys(&self, key: &str) -> Vec<String> {
        let mut keys: Vec<String> = Vec::with_capacity(self.candidates.len());
        for candidate in &self.candidates {
            let name = candidate.apply(key, self.marker);
            if !keys.contains(&name) {
                keys.push(name);
            }
        }
        keys
    }

    /// Looks `key` up in `row`. Returns [`CellValue::Empty`] when no
    /// candidate column exists.
    pub fn resolve(&self, row: &DataRow, key: &str) -> CellValue {
        self.candidate_keys(key)
            .iter()
            .find_map(|name| row.get(name))
            .cloned()
            .unwrap_or_default()
    }

    /// True when `key` names `column` under any candidate spelling.
    pub fn refers_to(&self, key: &str, column: &str) -> bool {
        strip_marker(key, self.marker) == strip_marker(column, self.marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, CellValue)]) -> DataRow {
        pairs.iter().cloned().collect()
    }

    #[test]
    fn test_exact_match() {
        let r = row(&[("$name", "Anna Nowak".into()), ("name", "other".into())]);
        let resolver = ValueResolver::default();
        assert_eq!(resolver.resolve(&r, "$name"), CellValue::Text("Anna Nowak".into()));
        assert_eq!(resolver.resolve(&r, "name"), CellValue::Text("other".into()));
    }

    #[test]
    fn test_strip_marker_fallback() {
        let r = row(&[("course", "Spawanie".into())]);
        let resolver = ValueResolver::default();
        assert_eq!(resolver.resolve(&r, "$course"), CellValue::Text("Spawanie".into()));
    }

    #[test]
    fn test_add_marker_fallback() {
        let r = row(&[("$hours", CellValue::Number(16.0))]);
        let resolver = ValueResolver::default();
        assert_eq!(resolver.resolve(&r, "hours"), CellValue::Number(16.0));
    }

    #[test]
    fn test_missing_is_empty() {
        let r = row(&[("$name", "Anna".into())]);
        let resolver = ValueResolver::default();
        assert_eq!(resolver.resolve(&r, "$score"), CellValue::Empty);
        assert_eq!(resolver.resolve(&r, "score"), CellValue::Empty);
        assert_eq!(resolver.resolve(&DataRow::new(), "$name"), CellValue::Empty);
    }

    #[test]
    fn test_present_blank_cell_stops_lookup() {
        let r = row(&[("$name", CellValue::Empty), ("name", "fallback".into())]);
        let resolver = ValueResolver::default();
        assert_eq!(resolver.resolve(&r, "$name"), CellValue::Empty);
    }

    #[test]
    fn test_custom_marker_and_candidates() {
        let r = row(&[("#city", "Kraków".into())]);
        let resolver = ValueResolver::new('#');
        assert_eq!(resolver.resolve(&r, "city"), CellValue::Text("Kraków".into()));

        let strict = ValueResolver::with_candidates('#', vec![KeyCandidate::Verbatim]);
        assert_eq!(strict.resolve(&r, "city"), CellValue::Empty);
    }

    #[test]
    fn test_candidate_keys_dedup() {
        let resolver = ValueResolver::default();
        assert_eq!(resolver.candidate_keys("$name"), vec!["$name", "name"]);
        assert_eq!(resolver.candidate_keys("name"), vec!["name", "$name"]);
    }

    #[test]
    fn test_refers_to() {
        let resolver = ValueResolver::default();
        assert!(resolver.refers_to("$name", "name"));
        assert!(resolver.refers_to("name", "name"));
        assert!(!resolver.refers_to("$surname", "name"));
    }
}
