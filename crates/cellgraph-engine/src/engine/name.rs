//! Cell name validity.
//!
//! A cell name is one or more ASCII letters followed by one or more ASCII
//! digits, nothing else: `A1`, `bb12`, `ZZ999`. `1A`, `A1A1`, `A_1` and
//! `apple` are not names.

use regex::Regex;
use std::sync::OnceLock;

fn cell_name_re() -> &'static Regex {
    static NAME_RE: OnceLock<Regex> = OnceLock::new();
    NAME_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z]+[0-9]+$").expect("cell name regex must compile")
    })
}

/// Structural check only; the engine's configured validator is applied separately.
pub fn is_cell_name(name: &str) -> bool {
    cell_name_re().is_match(name)
}

#[cfg(test)]
mod tests {
    use super::is_cell_name;

    #[test]
    fn test_valid_names() {
        assert!(is_cell_name("A1"));
        assert!(is_cell_name("a1"));
        assert!(is_cell_name("AA100"));
        assert!(is_cell_name("xYz0042"));
    }

    #[test]
    fn test_invalid_names() {
        assert!(!is_cell_name(""));
        assert!(!is_cell_name("123"));
        assert!(!is_cell_name("ABC"));
        assert!(!is_cell_name("1A"));
        assert!(!is_cell_name("1_1"));
        assert!(!is_cell_name("A1A1"));
        assert!(!is_cell_name("A 1"));
        assert!(!is_cell_name("A&$#1"));
        assert!(!is_cell_name("apple"));
        assert!(!is_cell_name("A1\n"));
    }
}
