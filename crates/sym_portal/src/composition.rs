//! Free-text composition and requirement parsing.
//!
//! Facilities describe chemistry in whatever shape their lab report used:
//! `"55% SiO2, 5% Fe2O3"` (value before key) or `"SiO2: 55%; Fe2O3 5"`
//! (key before value). Receivers write constraints like
//! `"Requires SiO2 > 40%, Fe2O3 < 10%"`. Both parsers are best-effort:
//! fragments that match neither form are dropped with a debug log.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use sym_requirement::Requirement;
use tracing::debug;

static FRAGMENT_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[;,]\s*").expect("fragment split pattern is valid"));

// Value-leading form: "55% SiO2". Anchored so a digit inside the key
// ("SiO2") cannot masquerade as the value.
static VALUE_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<val>\d+(\.\d+)?)\s*%?\s*(?P<key>[A-Za-z][A-Za-z0-9()._+-]*)\s*$")
        .expect("value-key pattern is valid")
});

// Key-leading form: "SiO2 55%" / "SiO2: 55".
static KEY_VALUE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<key>[A-Za-z][A-Za-z0-9()._+-]*)\s*[:=]?\s*(?P<val>\d+(\.\d+)?)\s*%?\s*$")
        .expect("key-value pattern is valid")
});

static REQUIREMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<key>[A-Za-z][A-Za-z0-9()._+-]*)\s*(?P<op>>=|<=|>|<|=)?\s*(?P<val>\d+(\.\d+)?)\s*%?")
        .expect("requirement pattern is valid")
});

static REQUIRES_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)requires?").expect("requires prefix pattern is valid"));

/// Parses composition free text into `key → "N%"` pairs.
pub fn parse_composition_text(text: &str) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    let trimmed = text.trim().trim_matches(|c| c == ' ' || c == '.');
    if trimmed.is_empty() {
        return out;
    }
    for fragment in FRAGMENT_SPLIT_RE.split(trimmed) {
        let caps = VALUE_KEY_RE
            .captures(fragment)
            .or_else(|| KEY_VALUE_RE.captures(fragment));
        match caps {
            Some(caps) => {
                out.insert(caps["key"].to_string(), format!("{}%", &caps["val"]));
            }
            None => debug!(fragment = %fragment, "composition fragment unparseable; dropped"),
        }
    }
    out
}

/// Parses requirement free text into typed per-key requirements.
///
/// An explicit operator (`>`, `>=`, `<`, `<=`) becomes `Gt`/`Lt`; `=` or a
/// bare number becomes `Eq`.
pub fn parse_requirement_text(text: &str) -> BTreeMap<String, Requirement> {
    let mut out = BTreeMap::new();
    let cleaned = REQUIRES_PREFIX_RE.replace_all(text, "");
    let trimmed = cleaned.trim().trim_matches(|c| c == ' ' || c == '.');
    if trimmed.is_empty() {
        return out;
    }
    for fragment in FRAGMENT_SPLIT_RE.split(trimmed) {
        match REQUIREMENT_RE.captures(fragment) {
            Some(caps) => {
                let value: f64 = match caps["val"].parse() {
                    Ok(v) => v,
                    Err(_) => continue,
                };
                let requirement = match caps.name("op").map(|m| m.as_str()) {
                    Some(">") | Some(">=") => Requirement::Gt(value),
                    Some("<") | Some("<=") => Requirement::Lt(value),
                    _ => Requirement::Eq(value),
                };
                out.insert(caps["key"].to_string(), requirement);
            }
            None => debug!(fragment = %fragment, "requirement fragment unparseable; dropped"),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_before_key_form() {
        let parsed = parse_composition_text("55% SiO2, 5% Fe2O3");
        assert_eq!(parsed.get("SiO2"), Some(&"55%".to_string()));
        assert_eq!(parsed.get("Fe2O3"), Some(&"5%".to_string()));
    }

    #[test]
    fn key_before_value_form() {
        let parsed = parse_composition_text("SiO2: 55%; Fe2O3 5");
        assert_eq!(parsed.get("SiO2"), Some(&"55%".to_string()));
        assert_eq!(parsed.get("Fe2O3"), Some(&"5%".to_string()));
    }

    #[test]
    fn mixed_forms_and_trailing_period() {
        let parsed = parse_composition_text("40% CaO, Al2O3 12.5.");
        assert_eq!(parsed.get("CaO"), Some(&"40%".to_string()));
        assert_eq!(parsed.get("Al2O3"), Some(&"12.5%".to_string()));
    }

    #[test]
    fn garbage_fragments_are_dropped() {
        let parsed = parse_composition_text("mostly ash; 30% SiO2");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.get("SiO2"), Some(&"30%".to_string()));
        assert!(parse_composition_text("").is_empty());
        assert!(parse_composition_text("no numbers here").is_empty());
    }

    #[test]
    fn requirement_operators_become_typed_bounds() {
        let parsed = parse_requirement_text("Requires SiO2 > 40%, Fe2O3 < 10%");
        assert_eq!(parsed.get("SiO2"), Some(&Requirement::Gt(40.0)));
        assert_eq!(parsed.get("Fe2O3"), Some(&Requirement::Lt(10.0)));
    }

    #[test]
    fn ge_le_collapse_to_gt_lt() {
        let parsed = parse_requirement_text("purity >= 90; moisture <= 5");
        assert_eq!(parsed.get("purity"), Some(&Requirement::Gt(90.0)));
        assert_eq!(parsed.get("moisture"), Some(&Requirement::Lt(5.0)));
    }

    #[test]
    fn bare_and_equals_values_become_eq() {
        let parsed = parse_requirement_text("CaO = 40, MgO 5%");
        assert_eq!(parsed.get("CaO"), Some(&Requirement::Eq(40.0)));
        assert_eq!(parsed.get("MgO"), Some(&Requirement::Eq(5.0)));
    }

    #[test]
    fn empty_requirement_text_yields_nothing() {
        assert!(parse_requirement_text("").is_empty());
        assert!(parse_requirement_text("Requires").is_empty());
    }
}
