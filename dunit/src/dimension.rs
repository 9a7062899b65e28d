//! Dimension tags
//!
//! A dimension is an opaque category such as "length" or "mass". Units that
//! share a dimension convert into each other by scale ratio; the
//! dimensionless category is written as JSON `null` in unit records.

use std::fmt;
use serde::{Serialize, Deserialize};

/// The category of measurement a unit belongs to
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Dimension {
    /// Pure numbers (counts, ratios)
    #[default]
    Dimensionless,
    /// A named physical dimension, e.g. "length"
    Named(String),
}

impl Dimension {
    pub fn named(tag: &str) -> Self {
        Dimension::Named(tag.to_string())
    }

    pub fn is_dimensionless(&self) -> bool {
        matches!(self, Dimension::Dimensionless)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Dimensionless => write!(f, "dimensionless"),
            Dimension::Named(tag) => write!(f, "{}", tag),
        }
    }
}

impl From<Option<String>> for Dimension {
    fn from(tag: Option<String>) -> Self {
        match tag {
            Some(tag) => Dimension::Named(tag),
            None => Dimension::Dimensionless,
        }
    }
}

impl From<Dimension> for Option<String> {
    fn from(dimension: Dimension) -> Self {
        match dimension {
            Dimension::Dimensionless => None,
            Dimension::Named(tag) => Some(tag),
        }
    }
}

impl From<&str> for Dimension {
    fn from(tag: &str) -> Self {
        Dimension::named(tag)
    }
}

impl From<Option<&str>> for Dimension {
    fn from(tag: Option<&str>) -> Self {
        tag.map_or(Dimension::Dimensionless, Dimension::named)
    }
}
