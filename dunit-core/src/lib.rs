//! dunit Core - Fundamental types
//!
//! This crate provides the exact decimal `Number` used for every magnitude
//! and scale factor in dunit, together with its `NumberError`.

mod number;

pub use number::{Number, NumberError};
