//! Quantity, unit, and frequency normalization.
//!
//! Portals accept quantities as loose text (`"150 tons per week"`,
//! `"500 kg per day"`, `"2 t"`), optionally paired with a separate cadence
//! label (`"daily"`, `"weekly"`, `"monthly"`). Everything funnels into the
//! engine's canonical unit, tons per week:
//!
//! - kilograms divide by 1000;
//! - per-day multiplies by 7, per-month divides by `weeks_per_month`;
//! - unparseable text degrades to 0.0, never an error.

use once_cell::sync::Lazy;
use regex::Regex;
use sym_requirement::parse_numeric;
use tracing::debug;

use crate::config::PortalConfig;

static QUANTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*([\d.]+)\s*(kg|kgs|kilogram|kilograms|t|ton|tons|tonne|tonnes)?\s*(?:per\s*(day|week|month))?\s*$",
    )
    .expect("quantity pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MassUnit {
    Kilogram,
    Ton,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Period {
    Day,
    Week,
    Month,
}

fn parse_quantity(text: &str) -> Option<(f64, Option<MassUnit>, Option<Period>)> {
    let caps = QUANTITY_RE.captures(text)?;
    let value = parse_numeric(caps.get(1)?.as_str())?;
    let unit = caps.get(2).map(|m| match m.as_str().to_ascii_lowercase().as_str() {
        "kg" | "kgs" | "kilogram" | "kilograms" => MassUnit::Kilogram,
        _ => MassUnit::Ton,
    });
    let period = caps.get(3).map(|m| match m.as_str().to_ascii_lowercase().as_str() {
        "day" => Period::Day,
        "month" => Period::Month,
        _ => Period::Week,
    });
    Some((value, unit, period))
}

fn to_tons(value: f64, unit: Option<MassUnit>) -> f64 {
    match unit {
        Some(MassUnit::Kilogram) => value / 1000.0,
        // A bare number is already in tons.
        Some(MassUnit::Ton) | None => value,
    }
}

fn period_week_factor(period: Period, cfg: &PortalConfig) -> f64 {
    match period {
        Period::Day => 7.0,
        Period::Week => 1.0,
        Period::Month => 1.0 / cfg.weeks_per_month,
    }
}

/// Normalizes quantity text plus an optional cadence label into
/// tons per week. Unparseable input yields 0.0.
pub fn normalize_quantity(
    quantity: Option<&str>,
    frequency: Option<&str>,
    cfg: &PortalConfig,
) -> f64 {
    let mut tons_per_week = 0.0;
    if let Some(text) = quantity {
        match parse_quantity(text) {
            Some((value, unit, period)) => {
                let tons = to_tons(value, unit);
                tons_per_week = match period {
                    Some(p) => tons * period_week_factor(p, cfg),
                    None => tons,
                };
            }
            None => debug!(text = %text, "quantity text unparseable; defaulting to 0"),
        }
    }
    // The standalone cadence label only matters when the quantity text
    // itself carried no usable amount.
    if tons_per_week == 0.0 {
        if let (Some(freq), Some(text)) = (frequency, quantity) {
            if let Some((value, unit, _)) = parse_quantity(text) {
                let tons = to_tons(value, unit);
                tons_per_week = match freq.trim().to_ascii_lowercase().as_str() {
                    "daily" => tons * 7.0,
                    "weekly" => tons,
                    "monthly" => tons / cfg.weeks_per_month,
                    _ => tons_per_week,
                };
            }
        }
    }
    tons_per_week
}
