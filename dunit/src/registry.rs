//! Unit registry - resolves names, symbols and aliases to units

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use dunit_core::Number;
use tracing::{debug, info};

use crate::{Dimension, Quantity, Unit, UnitError, UnitRecord};

/// Bundled baseline unit set (length, mass, time, volume, information, counts)
const DEFAULT_UNITS: &str = include_str!("../data/units.json");

/// Lookup table from every registered key to its unit
///
/// Each registry owns its own table; there is no process-wide unit state.
/// Writes (`register`, `load*`) need `&mut self`, so sharing a registry
/// across threads for writing requires an external lock.
#[derive(Debug, Default)]
pub struct Registry {
    index: HashMap<String, Arc<Unit>>,
    /// Distinct units in registration order
    units: Vec<Arc<Unit>>,
}

impl Registry {
    /// Create a registry, optionally seeded with the bundled unit set
    pub fn new(load_defaults: bool) -> Result<Self, UnitError> {
        let mut registry = Registry::empty();
        if load_defaults {
            registry.load_defaults()?;
        }
        Ok(registry)
    }

    pub fn empty() -> Self {
        Registry::default()
    }

    /// Create a unit and index it under its name, symbol and aliases
    pub fn register(
        &mut self,
        name: &str,
        symbol: &str,
        dimension: impl Into<Dimension>,
        scale: Number,
        aliases: &[&str],
    ) -> Result<Arc<Unit>, UnitError> {
        let aliases = aliases.iter().map(|a| a.to_string()).collect();
        self.register_unit(Unit::new(name, symbol, dimension.into(), scale, aliases))
    }

    /// Index an already-built unit
    ///
    /// Fails with `DuplicateKey` if any of its keys belongs to a unit already
    /// registered, or `InvalidRecord` if its scale is not positive; in either
    /// case nothing is inserted.
    pub fn register_unit(&mut self, unit: Unit) -> Result<Arc<Unit>, UnitError> {
        if unit.scale() <= &Number::zero() {
            return Err(UnitError::InvalidRecord(format!(
                "unit {:?} has a non-positive scale {}",
                unit.name(),
                unit.scale()
            )));
        }

        let keys = unit.keys();
        if keys.iter().any(|key| key.trim().is_empty()) {
            return Err(UnitError::InvalidRecord(format!("unit {:?} has an empty key", unit.name())));
        }

        for key in &keys {
            if let Some(existing) = self.index.get(*key) {
                return Err(UnitError::DuplicateKey {
                    key: key.to_string(),
                    existing: existing.name().to_string(),
                });
            }
        }

        let keys: Vec<String> = keys.into_iter().map(str::to_string).collect();
        let unit = Arc::new(unit);
        for key in keys {
            self.index.insert(key, Arc::clone(&unit));
        }
        self.units.push(Arc::clone(&unit));

        debug!(
            name = unit.name(),
            symbol = unit.symbol(),
            dimension = %unit.dimension(),
            scale = %unit.scale(),
            "registered unit"
        );
        Ok(unit)
    }

    /// Resolve a key to its unit
    pub fn lookup(&self, key: &str) -> Result<Arc<Unit>, UnitError> {
        self.get(key)
            .cloned()
            .ok_or_else(|| UnitError::UnitNotFound(key.to_string()))
    }

    pub fn get(&self, key: &str) -> Option<&Arc<Unit>> {
        self.index.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Distinct units in registration order
    pub fn units(&self) -> impl Iterator<Item = &Arc<Unit>> {
        self.units.iter()
    }

    /// Number of distinct units
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Register records in order
    ///
    /// Stops at the first bad record; units registered before it stay.
    pub fn load<I>(&mut self, records: I) -> Result<(), UnitError>
    where
        I: IntoIterator<Item = UnitRecord>,
    {
        let mut count = 0usize;
        for record in records {
            self.register_unit(Unit::from_record(record)?)?;
            count += 1;
        }
        info!(count, total = self.len(), "loaded unit definitions");
        Ok(())
    }

    /// Register units from a JSON array of records
    pub fn load_json(&mut self, json: &str) -> Result<(), UnitError> {
        let records: Vec<UnitRecord> = serde_json::from_str(json)?;
        self.load(records)
    }

    /// Register units from a JSON definition file
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<(), UnitError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| UnitError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "reading unit definitions");
        self.load_json(&json)
    }

    /// Register the bundled baseline unit set
    pub fn load_defaults(&mut self) -> Result<(), UnitError> {
        self.load_json(DEFAULT_UNITS)
    }

    /// Parse free text such as `"1m 50cm"` or `5'6"` into one quantity
    pub fn parse_quantity(&self, text: &str) -> Result<Quantity<'_>, UnitError> {
        crate::parse::parse_quantity(self, text)
    }
}
