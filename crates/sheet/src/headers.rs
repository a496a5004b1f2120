//! Field keys offered for a dataset's header row.

/// Lists the keys a user can bind fields to, one per header in column order.
///
/// Headers are offered as-is, except that a birthday column is guessed from
/// its name: anything mentioning both "data" and "urod" (as in "Data
/// urodzenia") is offered as `<marker>bday`. A bare `bday` column stays
/// selectable under its own name and additionally adds `<marker>bday` when no
/// other header produced it. This is a best-effort guess; use `dateColumns`
/// for reliable date formatting.
pub fn field_keys(headers: &[String], marker: char) -> Vec<String> {
    let bday = format!("{}bday", marker);
    let mut keys: Vec<String> = Vec::new();

    for header in headers {
        let lower = header.to_lowercase();
        let key = if !header.starts_with(marker) && lower.contains("data") && lower.contains("urod") {
            bday.clone()
        } else {
            header.clone()
        };
        if !keys.contains(&key) {
            keys.push(key);
        }
    }

    if !keys.contains(&bday) && headers.iter().any(|h| h.eq_ignore_ascii_case("bday")) {
        keys.push(bday);
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_all_headers_kept_in_order() {
        let keys = field_keys(&headers(&["$name", "email", "$course"]), '$');
        assert_eq!(keys, vec!["$name", "email", "$course"]);
    }

    #[test]
    fn test_plain_headers_are_bindable() {
        let keys = field_keys(&headers(&["name", "course", "bday"]), '$');
        assert_eq!(keys, vec!["name", "course", "bday", "$bday"]);
    }

    #[test]
    fn test_birthday_heuristic() {
        let keys = field_keys(&headers(&["$name", "Data Urodzenia"]), '$');
        assert_eq!(keys, vec!["$name", "$bday"]);

        let keys = field_keys(&headers(&["bday", "$bday"]), '$');
        assert_eq!(keys, vec!["bday", "$bday"]);

        let keys = field_keys(&headers(&["data urodzenia", "Data urodzin"]), '$');
        assert_eq!(keys, vec!["$bday"]);
    }

    #[test]
    fn test_custom_marker() {
        let keys = field_keys(&headers(&["#name", "$name", "BDAY"]), '#');
        assert_eq!(keys, vec!["#name", "$name", "BDAY", "#bday"]);
    }

    #[test]
    fn test_empty_header_row() {
        assert!(field_keys(&[], '$').is_empty());
    }
}
