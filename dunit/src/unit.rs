//! Unit representation with its scale factor

use std::fmt;
use serde::{Serialize, Deserialize, Deserializer};
use serde::de::Error as _;
use dunit_core::Number;
use crate::{Dimension, UnitError};

/// A unit of measure
///
/// Immutable once built. Equality and hashing cover every field; inside a
/// registry a unit is additionally identified by its `Arc` allocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Unit {
    name: String,
    symbol: String,
    dimension: Dimension,
    /// Ratio of this unit to the reference unit of its dimension
    scale: Number,
    aliases: Vec<String>,
}

impl Unit {
    pub fn new(
        name: &str,
        symbol: &str,
        dimension: Dimension,
        scale: Number,
        aliases: Vec<String>,
    ) -> Self {
        Unit {
            name: name.to_string(),
            symbol: symbol.to_string(),
            dimension,
            scale,
            aliases,
        }
    }

    /// Build a unit from a flat definition record
    pub fn from_record(record: UnitRecord) -> Result<Self, UnitError> {
        if record.name.trim().is_empty() {
            return Err(UnitError::InvalidRecord("unit name is empty".to_string()));
        }
        if record.symbol.trim().is_empty() {
            return Err(UnitError::InvalidRecord(format!("unit {:?} has an empty symbol", record.name)));
        }

        let scale = Number::from_str(&record.scale).map_err(|_| {
            UnitError::InvalidRecord(format!("unit {:?} has an invalid scale {:?}", record.name, record.scale))
        })?;

        Ok(Unit::new(&record.name, &record.symbol, record.dimension, scale, record.aliases))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn dimension(&self) -> &Dimension {
        &self.dimension
    }

    pub fn scale(&self) -> &Number {
        &self.scale
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Every string this unit answers to: name, symbol, then aliases.
    /// Repeats within the unit are listed once.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::with_capacity(2 + self.aliases.len());
        let all = [self.name.as_str(), self.symbol.as_str()]
            .into_iter()
            .chain(self.aliases.iter().map(String::as_str));
        for key in all {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    /// Check if two units are dimensionally compatible (can be converted)
    pub fn is_compatible(&self, other: &Unit) -> bool {
        self.dimension == other.dimension
    }

    pub fn is_dimensionless(&self) -> bool {
        self.dimension.is_dimensionless()
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

/// One entry of a unit definition file
///
/// ```json
/// { "name": "foot", "symbol": "ft", "dimension": "length",
///   "scale": "0.3048", "aliases": ["feet"] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub dimension: Dimension,
    /// Decimal text; JSON numbers are taken verbatim, never through f64
    #[serde(default = "default_scale", deserialize_with = "scale_text")]
    pub scale: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

fn default_scale() -> String {
    "1".to_string()
}

fn scale_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("scale must be a string or a number, got {}", other))),
    }
}
