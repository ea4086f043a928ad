//! Byte unit conversion at binary (1024) scale.

use serde::{Deserialize, Serialize};

/// A byte magnitude unit.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Unit {
    #[default]
    B,
    KB,
    MB,
    GB,
    TB,
}

impl Unit {
    /// Number of bytes in one of this unit.
    pub fn bytes(self) -> f64 {
        let exp = match self {
            Unit::B => 0,
            Unit::KB => 1,
            Unit::MB => 2,
            Unit::GB => 3,
            Unit::TB => 4,
        };
        1024f64.powi(exp)
    }
}

/// Reusable conversion between two units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Converter {
    pub from: Unit,
    pub to: Unit,
}

impl Converter {
    pub fn new(from: Unit, to: Unit) -> Self {
        Self { from, to }
    }

    pub fn convert(&self, value: f64) -> f64 {
        value * self.from.bytes() / self.to.bytes()
    }
}

/// Convert `value` expressed in `from` into `to`.
pub fn convert(value: f64, from: Unit, to: Unit) -> f64 {
    Converter::new(from, to).convert(value)
}

pub fn to_bytes(value: f64, from: Unit) -> f64 {
    convert(value, from, Unit::B)
}

pub fn to_kilo_bytes(value: f64, from: Unit) -> f64 {
    convert(value, from, Unit::KB)
}

pub fn to_mega_bytes(value: f64, from: Unit) -> f64 {
    convert(value, from, Unit::MB)
}

pub fn to_giga_bytes(value: f64, from: Unit) -> f64 {
    convert(value, from, Unit::GB)
}

pub fn to_tera_bytes(value: f64, from: Unit) -> f64 {
    convert(value, from, Unit::TB)
}
