//! Text normalization for comparisons
//!
//! Names and continents are compared on their normalized form only. Stored
//! and displayed values keep their original spelling.

/// Canonicalize text for comparison: trim, then apply Unicode default case folding
///
/// Case folding goes beyond lower-casing, so `"STRASSE"` and `"Straße"`
/// normalize to the same string.
pub fn normalize(text: &str) -> String {
    caseless::default_case_fold_str(text.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_and_fold() {
        assert_eq!(normalize("  Argentina "), "argentina");
        assert_eq!(normalize("ÁVILA"), normalize("ávila"));
        assert_eq!(normalize("Straße"), normalize("STRASSE"));
    }

    #[test]
    fn test_blank_is_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_accents_are_not_stripped() {
        assert_eq!(normalize("América"), normalize(" américa"));
        assert_ne!(normalize("America"), normalize("América"));
    }
}
