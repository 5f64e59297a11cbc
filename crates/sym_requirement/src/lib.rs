//! # Requirement Expressions
//!
//! This crate parses the loosely structured requirement text a facility
//! types into a materials portal (`">40%"`, `"<10"`, `"25-35"`,
//! `"7.2"`) into a typed [`Requirement`], and scores actual measured
//! values against it with tolerance-based ramps instead of hard pass/fail
//! edges.
//!
//! ## Core Responsibilities
//!
//! - **Parsing**: Decorated strings become `Gt`/`Lt`, dash ranges become
//!   `Range`, bare numbers become `Eq`. Percent suffixes are cosmetic and
//!   stripped before numeric parsing. Anything unparseable degrades to
//!   [`Requirement::Any`]; parse failures are never errors.
//! - **Scoring**: Each mode maps an actual value to [0.0, 1.0]. Values
//!   inside the constraint score 1.0; values just outside ramp down
//!   linearly across a tolerance window (20% of the bound or range width)
//!   so near misses are still ranked above clear misses.
//! - **Property flags**: [`PropertyRequirement`] covers the
//!   "requirement-or-flag" shape of physical-property specs, where a spec
//!   is either numeric (`"<10%"` moisture) or a plain label (`"granular"`)
//!   compared case-insensitively.
//!
//! Scoring is deterministic and allocation-free; the same input always
//! produces the same score.
//!
//! ## Example Usage
//!
//! ```
//! use sym_requirement::{parse_actual_value, Requirement};
//!
//! let req = Requirement::parse(">40%");
//! assert_eq!(req, Requirement::Gt(40.0));
//!
//! assert_eq!(req.score(parse_actual_value("55%")), 1.0);
//! assert_eq!(req.score(None), 0.0);
//!
//! // 36 sits inside the 20% tolerance window below 40.
//! let partial = req.score(Some(36.0));
//! assert!(partial > 0.0 && partial < 1.0);
//! ```

use serde::{Deserialize, Serialize};

/// A parsed requirement expression.
///
/// The variants mirror the portal's accepted notations: `Any` (absent or
/// unparseable), `Eq` (bare number), `Gt`/`Lt` (`>` / `<` decorations,
/// `>=` / `<=` accepted as synonyms), and `Range` (`a-b` with `a <= b`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Requirement {
    /// No constraint; always satisfied, even without evidence.
    Any,
    /// Target value with a 5% full-score band and a 20% zero-score band.
    Eq(f64),
    /// Lower bound with a tolerance ramp below it.
    Gt(f64),
    /// Upper bound with a tolerance ramp above it.
    Lt(f64),
    /// Inclusive interval with tolerance ramps on both sides.
    Range(f64, f64),
}

impl Default for Requirement {
    fn default() -> Self {
        Requirement::Any
    }
}

/// Parses a numeric token, tolerating a percent suffix and surrounding
/// whitespace. Returns `None` when the token is not a number.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    raw.trim().replace('%', "").trim().parse::<f64>().ok()
}

/// Parses a measured value string (`"55%"`, `"7.2"`) into a number.
///
/// Non-numeric values (`"high"`, `"6.8-7.2"`) yield `None`; scoring treats
/// missing evidence as a failure for every constraining mode.
pub fn parse_actual_value(raw: &str) -> Option<f64> {
    parse_numeric(raw)
}

impl Requirement {
    /// Parses a requirement expression from free text.
    ///
    /// Unparseable input degrades to [`Requirement::Any`] rather than
    /// erroring: a constraint the engine cannot read is a constraint it
    /// does not enforce.
    pub fn parse(raw: &str) -> Requirement {
        let s = raw.trim();
        if s.is_empty() {
            return Requirement::Any;
        }
        if let Some(rest) = s.strip_prefix(">=").or_else(|| s.strip_prefix('>')) {
            return match parse_numeric(rest) {
                Some(v) => Requirement::Gt(v),
                None => Requirement::Any,
            };
        }
        if let Some(rest) = s.strip_prefix("<=").or_else(|| s.strip_prefix('<')) {
            return match parse_numeric(rest) {
                Some(v) => Requirement::Lt(v),
                None => Requirement::Any,
            };
        }
        // A dash inside the token is a range; a leading dash is a sign.
        if !s.starts_with('-') {
            if let Some((lo, hi)) = s.split_once('-') {
                if let (Some(a), Some(b)) = (parse_numeric(lo), parse_numeric(hi)) {
                    if a <= b {
                        return Requirement::Range(a, b);
                    }
                }
            }
        }
        match parse_numeric(s) {
            Some(v) => Requirement::Eq(v),
            None => Requirement::Any,
        }
    }

    /// Builds an exact-target requirement from an already-numeric value.
    pub fn from_value(value: f64) -> Requirement {
        Requirement::Eq(value)
    }

    /// Scores an actual value against this requirement, in [0.0, 1.0].
    ///
    /// A missing actual value scores 0.0 for every constraining mode:
    /// absence of evidence never satisfies a constraint. `Any` requires no
    /// evidence and scores 1.0 unconditionally.
    pub fn score(&self, actual: Option<f64>) -> f64 {
        let x = match (self, actual) {
            (Requirement::Any, _) => return 1.0,
            (_, None) => return 0.0,
            (_, Some(x)) => x,
        };
        match *self {
            Requirement::Any => 1.0,
            Requirement::Gt(a) => {
                if x >= a {
                    return 1.0;
                }
                let tol = (0.20 * a).max(1e-6);
                clamp_unit((x - (a - tol)) / tol)
            }
            Requirement::Lt(a) => {
                if x <= a {
                    return 1.0;
                }
                let tol = (0.20 * a).max(1e-6);
                clamp_unit(((a + tol) - x) / tol)
            }
            Requirement::Range(a, b) => {
                if (a..=b).contains(&x) {
                    return 1.0;
                }
                let tol = 0.20 * (b - a).max(1e-6);
                if x < a {
                    clamp_unit((x - (a - tol)) / tol)
                } else {
                    clamp_unit(((b + tol) - x) / tol)
                }
            }
            Requirement::Eq(t) => {
                if t == 0.0 {
                    return if x == 0.0 { 1.0 } else { 0.0 };
                }
                let diff = (x - t).abs();
                let perfect = 0.05 * t.abs();
                let zero = 0.20 * t.abs();
                if diff <= perfect {
                    1.0
                } else if diff >= zero {
                    0.0
                } else {
                    (zero - diff) / (zero - perfect)
                }
            }
        }
    }
}

/// A physical-property specification: either a numeric requirement or a
/// plain label flag.
///
/// Portals accept both shapes in the same field (`"moisture < 10%"` next
/// to `"form: granular"`), so the adapter decides per key which variant a
/// spec becomes, and scoring dispatches accordingly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyRequirement {
    /// Numeric constraint scored through [`Requirement::score`].
    Numeric(Requirement),
    /// Case-insensitive exact label match, scored 1.0/0.0. An empty label
    /// constrains nothing and scores 1.0.
    Label(String),
}

impl PropertyRequirement {
    /// Parses a property spec, choosing `Numeric` when the text carries
    /// digits or comparison decorations and `Label` otherwise.
    pub fn parse(raw: &str) -> PropertyRequirement {
        let s = raw.trim();
        if s.chars().any(|c| c.is_ascii_digit() || matches!(c, '<' | '>' | '-')) {
            PropertyRequirement::Numeric(Requirement::parse(s))
        } else {
            PropertyRequirement::Label(s.to_ascii_lowercase())
        }
    }

    /// Scores a supplier's raw property value against this spec.
    pub fn score(&self, actual: Option<&str>) -> f64 {
        match self {
            PropertyRequirement::Numeric(req) => {
                req.score(actual.and_then(parse_actual_value))
            }
            PropertyRequirement::Label(label) => {
                if label.is_empty() {
                    return 1.0;
                }
                let actual = actual.unwrap_or("").trim().to_ascii_lowercase();
                if actual == *label {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

fn clamp_unit(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decorated_expressions() {
        assert_eq!(Requirement::parse(">40%"), Requirement::Gt(40.0));
        assert_eq!(Requirement::parse(">= 40"), Requirement::Gt(40.0));
        assert_eq!(Requirement::parse("<10%"), Requirement::Lt(10.0));
        assert_eq!(Requirement::parse("<=10"), Requirement::Lt(10.0));
        assert_eq!(Requirement::parse("25-35"), Requirement::Range(25.0, 35.0));
        assert_eq!(Requirement::parse("6.8-7.2"), Requirement::Range(6.8, 7.2));
        assert_eq!(Requirement::parse("7.2"), Requirement::Eq(7.2));
        assert_eq!(Requirement::parse(" 55% "), Requirement::Eq(55.0));
    }

    #[test]
    fn leading_dash_is_a_sign_not_a_range() {
        assert_eq!(Requirement::parse("-5"), Requirement::Eq(-5.0));
    }

    #[test]
    fn inverted_range_falls_through_to_any() {
        // "35-25" is not a valid range and "35-25" is not a number either.
        assert_eq!(Requirement::parse("35-25"), Requirement::Any);
    }

    #[test]
    fn garbage_degrades_to_any() {
        assert_eq!(Requirement::parse(""), Requirement::Any);
        assert_eq!(Requirement::parse("high purity"), Requirement::Any);
        assert_eq!(Requirement::parse(">abc"), Requirement::Any);
    }

    #[test]
    fn gt_scores_full_above_bound_and_zero_below_window() {
        let req = Requirement::Gt(40.0);
        assert_eq!(req.score(Some(40.0)), 1.0);
        assert_eq!(req.score(Some(100.0)), 1.0);
        // Window is 20% of the bound: zero at 32.0 and below.
        assert_eq!(req.score(Some(32.0)), 0.0);
        assert_eq!(req.score(Some(10.0)), 0.0);
    }

    #[test]
    fn gt_ramp_is_strictly_monotonic() {
        let req = Requirement::Gt(40.0);
        let samples = [33.0, 34.5, 36.0, 37.5, 39.0];
        let scores: Vec<f64> = samples.iter().map(|&x| req.score(Some(x))).collect();
        for pair in scores.windows(2) {
            assert!(pair[0] < pair[1], "expected increasing scores: {scores:?}");
        }
        assert!(scores[0] > 0.0 && scores[4] < 1.0);
    }

    #[test]
    fn lt_is_symmetric_to_gt() {
        let req = Requirement::Lt(10.0);
        assert_eq!(req.score(Some(10.0)), 1.0);
        assert_eq!(req.score(Some(0.0)), 1.0);
        assert_eq!(req.score(Some(12.0)), 0.0);
        let mid = req.score(Some(11.0));
        assert!(mid > 0.0 && mid < 1.0);
    }

    #[test]
    fn range_scores_inside_and_ramps_outside() {
        let req = Requirement::Range(25.0, 35.0);
        assert_eq!(req.score(Some(25.0)), 1.0);
        assert_eq!(req.score(Some(30.0)), 1.0);
        assert_eq!(req.score(Some(35.0)), 1.0);
        // Tolerance is 20% of the width (2.0) on each side.
        assert_eq!(req.score(Some(23.0)), 0.0);
        assert_eq!(req.score(Some(37.0)), 0.0);
        assert!((req.score(Some(24.0)) - 0.5).abs() < 1e-9);
        assert!((req.score(Some(36.0)) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn eq_bands_match_five_and_twenty_percent() {
        let req = Requirement::Eq(100.0);
        assert_eq!(req.score(Some(100.0)), 1.0);
        assert_eq!(req.score(Some(104.9)), 1.0);
        assert_eq!(req.score(Some(95.1)), 1.0);
        assert_eq!(req.score(Some(120.0)), 0.0);
        assert_eq!(req.score(Some(80.0)), 0.0);
        let mid = req.score(Some(110.0));
        assert!(mid > 0.0 && mid < 1.0);
        // Monotonically decreasing between the bands.
        assert!(req.score(Some(107.0)) > req.score(Some(113.0)));
    }

    #[test]
    fn eq_zero_target_requires_exact_zero() {
        let req = Requirement::Eq(0.0);
        assert_eq!(req.score(Some(0.0)), 1.0);
        assert_eq!(req.score(Some(0.001)), 0.0);
        assert_eq!(req.score(Some(-0.001)), 0.0);
    }

    #[test]
    fn missing_actual_scores_zero_except_any() {
        assert_eq!(Requirement::Gt(40.0).score(None), 0.0);
        assert_eq!(Requirement::Lt(10.0).score(None), 0.0);
        assert_eq!(Requirement::Range(1.0, 2.0).score(None), 0.0);
        assert_eq!(Requirement::Eq(5.0).score(None), 0.0);
        assert_eq!(Requirement::Any.score(None), 1.0);
    }

    #[test]
    fn actual_value_parsing_strips_percent() {
        assert_eq!(parse_actual_value("55%"), Some(55.0));
        assert_eq!(parse_actual_value(" 7.2 "), Some(7.2));
        assert_eq!(parse_actual_value("high"), None);
        assert_eq!(parse_actual_value("6.8-7.2"), None);
    }

    #[test]
    fn property_requirement_dispatches_on_shape() {
        assert_eq!(
            PropertyRequirement::parse("<10%"),
            PropertyRequirement::Numeric(Requirement::Lt(10.0))
        );
        assert_eq!(
            PropertyRequirement::parse("high"),
            PropertyRequirement::Label("high".into())
        );
    }

    #[test]
    fn label_match_is_case_insensitive() {
        let req = PropertyRequirement::Label("non-hazardous".into());
        // "non-hazardous" contains a dash, so it must be built (not parsed)
        // as a label; the adapter does exactly that for checkbox flags.
        assert_eq!(req.score(Some("Non-Hazardous")), 1.0);
        assert_eq!(req.score(Some(" non-hazardous ")), 1.0);
        assert_eq!(req.score(Some("flammable")), 0.0);
        assert_eq!(req.score(None), 0.0);
    }

    #[test]
    fn empty_label_constrains_nothing() {
        let req = PropertyRequirement::Label(String::new());
        assert_eq!(req.score(None), 1.0);
        assert_eq!(req.score(Some("anything")), 1.0);
    }

    #[test]
    fn numeric_property_scores_through_requirement() {
        let req = PropertyRequirement::parse("6.8-7.2");
        assert_eq!(req.score(Some("7.0")), 1.0);
        assert_eq!(req.score(Some("9.0")), 0.0);
        // Unparseable actuals are missing evidence, not label matches.
        assert_eq!(req.score(Some("neutral")), 0.0);
    }
}
