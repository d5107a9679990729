//! Tagged physical quantities.
//!
//! Every value crossing the public API carries a unit. Callers may pass
//! either a [`Quantity`] in any compatible unit or a bare `f64` in the
//! parameter's documented canonical unit; the wrapper layer attaches the
//! canonical unit to bare numbers and converts tagged quantities, it
//! never guesses.

use serde::{Deserialize, Serialize};

use crate::{AttenuationError, Result};

/// Physical dimension of a unit. Conversions are only defined between
/// units of the same dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dimension {
    Length,
    Angle,
    RainRate,
    /// Power ratio in dB (attenuation terms).
    Attenuation,
    /// Power ratio per unit path length in dB/km.
    SpecificAttenuation,
    /// Absolute power level in dBm.
    PowerLevel,
}

/// Units understood by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    Meter,
    Kilometer,
    Micrometer,
    Radian,
    Milliradian,
    MillimeterPerHour,
    Decibel,
    DecibelPerKilometer,
    DecibelMilliwatt,
}

impl Unit {
    pub fn dimension(self) -> Dimension {
        match self {
            Unit::Meter | Unit::Kilometer | Unit::Micrometer => Dimension::Length,
            Unit::Radian | Unit::Milliradian => Dimension::Angle,
            Unit::MillimeterPerHour => Dimension::RainRate,
            Unit::Decibel => Dimension::Attenuation,
            Unit::DecibelPerKilometer => Dimension::SpecificAttenuation,
            Unit::DecibelMilliwatt => Dimension::PowerLevel,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Meter => "m",
            Unit::Kilometer => "km",
            Unit::Micrometer => "um",
            Unit::Radian => "rad",
            Unit::Milliradian => "mrad",
            Unit::MillimeterPerHour => "mm/h",
            Unit::Decibel => "dB",
            Unit::DecibelPerKilometer => "dB/km",
            Unit::DecibelMilliwatt => "dBm",
        }
    }

    /// Scale factor to the dimension's base unit (m, rad). Dimensionally
    /// unique units scale by 1.
    fn scale_to_base(self) -> f64 {
        match self {
            Unit::Meter => 1.0,
            Unit::Kilometer => 1.0e3,
            Unit::Micrometer => 1.0e-6,
            Unit::Radian => 1.0,
            Unit::Milliradian => 1.0e-3,
            Unit::MillimeterPerHour
            | Unit::Decibel
            | Unit::DecibelPerKilometer
            | Unit::DecibelMilliwatt => 1.0,
        }
    }
}

/// A numeric value tagged with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// Convert to another unit of the same dimension. Conversions between
    /// incompatible dimensions fail instead of silently reinterpreting
    /// the value.
    pub fn to(self, target: Unit) -> Result<Quantity> {
        if self.unit == target {
            return Ok(self);
        }
        if self.unit.dimension() != target.dimension() {
            return Err(AttenuationError::InvalidInput(format!(
                "cannot convert {} to {}",
                self.unit.symbol(),
                target.symbol()
            )));
        }
        let base = self.value * self.unit.scale_to_base();
        Ok(Quantity::new(base / target.scale_to_base(), target))
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.value, self.unit.symbol())
    }
}

/// Accepted form of every public formula parameter: a tagged quantity in
/// any compatible unit, or a bare number in the canonical unit.
#[derive(Debug, Clone, Copy)]
pub enum QuantityInput {
    Bare(f64),
    Tagged(Quantity),
}

impl From<f64> for QuantityInput {
    fn from(value: f64) -> Self {
        QuantityInput::Bare(value)
    }
}

impl From<Quantity> for QuantityInput {
    fn from(quantity: Quantity) -> Self {
        QuantityInput::Tagged(quantity)
    }
}

/// Normalize a parameter to its canonical unit and return the bare value.
/// Bare numbers are taken to already be in `canonical`; tagged quantities
/// are converted, and an incompatible unit is reported against `name`.
pub(crate) fn prepare(input: QuantityInput, canonical: Unit, name: &str) -> Result<f64> {
    match input {
        QuantityInput::Bare(value) => Ok(value),
        QuantityInput::Tagged(quantity) => quantity
            .to(canonical)
            .map(|q| q.value)
            .map_err(|_| {
                AttenuationError::InvalidInput(format!(
                    "{}: cannot convert {} to {}",
                    name,
                    quantity.unit.symbol(),
                    canonical.symbol()
                ))
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_round_trip() {
        let km = Quantity::new(1.5, Unit::Kilometer);
        let m = km.to(Unit::Meter).unwrap();
        assert_eq!(m.value, 1500.0);
        let back = m.to(Unit::Kilometer).unwrap();
        assert_eq!(back.value, 1.5);
    }

    #[test]
    fn test_angle_conversion() {
        let rad = Quantity::new(0.001, Unit::Radian);
        let mrad = rad.to(Unit::Milliradian).unwrap();
        assert!((mrad.value - 1.0).abs() < 1e-12, "mrad={}", mrad.value);
    }

    #[test]
    fn test_micrometer_conversion() {
        let um = Quantity::new(1550.0, Unit::Micrometer);
        let m = um.to(Unit::Meter).unwrap();
        assert!((m.value - 1.55e-3).abs() < 1e-15);
    }

    #[test]
    fn test_same_unit_is_identity() {
        let q = Quantity::new(42.0, Unit::Decibel);
        assert_eq!(q.to(Unit::Decibel).unwrap(), q);
    }

    #[test]
    fn test_incompatible_dimensions_rejected() {
        let q = Quantity::new(1.0, Unit::Meter);
        let err = q.to(Unit::Milliradian).unwrap_err();
        assert!(matches!(err, AttenuationError::InvalidInput(_)));
    }

    #[test]
    fn test_prepare_bare_uses_canonical_unit() {
        let v = prepare(QuantityInput::from(2.5), Unit::Kilometer, "distance").unwrap();
        assert_eq!(v, 2.5);
    }

    #[test]
    fn test_prepare_tagged_converts() {
        let q = Quantity::new(2500.0, Unit::Meter);
        let v = prepare(QuantityInput::from(q), Unit::Kilometer, "distance").unwrap();
        assert!((v - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_prepare_reports_parameter_name() {
        let q = Quantity::new(5.0, Unit::MillimeterPerHour);
        let err = prepare(QuantityInput::from(q), Unit::Meter, "capture_diameter").unwrap_err();
        assert!(err.to_string().contains("capture_diameter"), "err={err}");
    }
}
