//! Certification token extraction.
//!
//! Certification fields arrive as prose (`"ISO 9001 and BIS certified"`).
//! Only a fixed vocabulary matters for the subset gate, so parsing is a
//! contains-scan over lowercased text producing canonical tokens.

use std::collections::BTreeSet;

/// Parses certification free text into the canonical token set.
pub fn parse_certifications(text: &str) -> BTreeSet<String> {
    let lower = text.trim().to_ascii_lowercase();
    let mut out = BTreeSet::new();
    if lower.is_empty() {
        return out;
    }
    if lower.contains("bis") {
        out.insert("BIS".to_string());
    }
    if lower.contains("iso 9001") {
        out.insert("ISO9001".to_string());
    }
    if lower.contains("iso 14001") {
        out.insert("ISO14001".to_string());
    }
    if lower.contains("pollution board") {
        out.insert("PollutionBoard".to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tokens_are_extracted() {
        let certs = parse_certifications("ISO 9001 and BIS certified, Pollution Board approved");
        assert!(certs.contains("ISO9001"));
        assert!(certs.contains("BIS"));
        assert!(certs.contains("PollutionBoard"));
        assert!(!certs.contains("ISO14001"));
    }

    #[test]
    fn case_does_not_matter() {
        let certs = parse_certifications("iso 14001");
        assert!(certs.contains("ISO14001"));
    }

    #[test]
    fn unknown_text_yields_empty_set() {
        assert!(parse_certifications("organic farming label").is_empty());
        assert!(parse_certifications("").is_empty());
    }
}
