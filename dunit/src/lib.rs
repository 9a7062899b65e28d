//! dunit - Exact decimal physical quantities
//!
//! A `Quantity` pairs an exact base-10 value with a `Unit` taken from a
//! `Registry`. Quantities of the same dimension convert into each other by
//! linear scale factors and can be added, subtracted and compared; mixing
//! dimensions is an error rather than a silent coercion.
//!
//! ```
//! use dunit::Registry;
//!
//! let registry = Registry::new(true).unwrap();
//! let height = registry.parse_quantity("5'6\"").unwrap();
//! assert_eq!(height.to("cm").unwrap().to_string(), "167.640cm");
//! ```

mod dimension;
mod error;
mod unit;
mod registry;
mod quantity;
mod parse;

pub use dimension::Dimension;
pub use error::UnitError;
pub use unit::{Unit, UnitRecord};
pub use registry::Registry;
pub use quantity::{Quantity, Operand, UnitRef};
pub use parse::parse_quantity;

pub use dunit_core::{Number, NumberError};
