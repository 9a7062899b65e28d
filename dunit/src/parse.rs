//! Quantity string parsing - free text like "1m 50cm" or 5'6"

use std::sync::OnceLock;

use dunit_core::Number;
use regex::Regex;
use tracing::debug;

use crate::{Quantity, Registry, UnitError};

/// `<number><unit>`: digits with an optional fraction, optional whitespace,
/// then letters
fn get_quantity_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"([0-9]+\.?[0-9]*)\s*([a-zA-Z]+)").unwrap()
    })
}

/// Parse every `<number><unit>` pair in `text` and add them up
///
/// `'` and `"` are shorthand for feet and inches. The total is expressed in
/// the unit of the first pair; pairs of different dimensions fail with
/// `IncompatibleDimension` when they are added.
pub fn parse_quantity<'r>(registry: &'r Registry, text: &str) -> Result<Quantity<'r>, UnitError> {
    let normalized = text.replace('\'', "ft").replace('"', "in");

    let mut total: Option<Quantity<'r>> = None;
    for (value, unit) in pairs(&normalized) {
        let unit_ref = registry.lookup(unit)?;
        let number = Number::from_str(value)?;
        debug!(value, unit, "parsed quantity token");

        let quantity = Quantity::new(registry, number, unit_ref);
        total = Some(match total {
            None => quantity,
            Some(acc) => acc.add(&quantity)?,
        });
    }

    total.ok_or_else(|| UnitError::NoQuantityFound(text.to_string()))
}

/// Non-overlapping `(number, unit)` matches, left to right
fn pairs(text: &str) -> impl Iterator<Item = (&str, &str)> {
    get_quantity_regex().captures_iter(text).filter_map(|caps| {
        let value = caps.get(1)?.as_str();
        let unit = caps.get(2)?.as_str();
        Some((value, unit))
    })
}
