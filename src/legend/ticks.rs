//! Measurement units and colorbar tick labels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TilesError};

/// Primary measurement unit of a variable, with its imperial counterpart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Unit {
    Meters,
    MetersPerSecond,
}

impl Unit {
    /// Axis label of the primary unit
    pub fn name(&self) -> &'static str {
        match self {
            Unit::Meters => "meters",
            Unit::MetersPerSecond => "meters per second",
        }
    }

    /// Axis label of the secondary unit
    pub fn secondary_name(&self) -> &'static str {
        match self {
            Unit::Meters => "feet",
            Unit::MetersPerSecond => "miles per hour",
        }
    }

    /// Secondary units per primary unit
    pub fn conversion_factor(&self) -> f64 {
        match self {
            Unit::Meters => 3.28084,
            Unit::MetersPerSecond => 2.23694,
        }
    }

    pub fn to_secondary(&self, value: f64) -> f64 {
        value * self.conversion_factor()
    }

    pub fn from_secondary(&self, value: f64) -> f64 {
        value / self.conversion_factor()
    }
}

impl FromStr for Unit {
    type Err = TilesError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "meters" => Ok(Unit::Meters),
            "meters per second" => Ok(Unit::MetersPerSecond),
            _ => Err(TilesError::InvalidParameter {
                param: "unit".to_string(),
                message: format!(
                    "Unknown unit: {}. Must be one of: meters, meters per second",
                    s
                ),
            }),
        }
    }
}

impl TryFrom<String> for Unit {
    type Error = TilesError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Unit> for String {
    fn from(unit: Unit) -> Self {
        unit.name().to_string()
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Five tick positions along a colorbar axis with their labels
#[derive(Debug, Clone, PartialEq)]
pub struct Ticks {
    pub values: [f64; 5],
    pub labels: [String; 5],
}

impl Ticks {
    /// Ticks at the first value, a quarter, half and 1/1.33 of the range,
    /// and the last value. The ends are marked as open-ended.
    pub fn from_bounds(first: f64, last: f64) -> Self {
        let range = (first - last).abs();
        let values = [first, range / 4.0, range / 2.0, range / 1.33, last];
        let labels = [
            format!("<{:.2}", values[0]),
            format!("{:.2}", values[1]),
            format!("{:.2}", values[2]),
            format!("{:.2}", values[3]),
            format!("{:.2}>", values[4]),
        ];
        Self { values, labels }
    }
}

/// Primary-unit ticks for the breakpoint values of a ramp
pub fn primary_ticks(values: &[f64]) -> Result<Ticks> {
    let (first, last) = end_values(values)?;
    Ok(Ticks::from_bounds(first, last))
}

/// The same ticks converted to the secondary unit
pub fn secondary_ticks(values: &[f64], unit: Unit) -> Result<Ticks> {
    let (first, last) = end_values(values)?;
    Ok(Ticks::from_bounds(
        unit.to_secondary(first),
        unit.to_secondary(last),
    ))
}

fn end_values(values: &[f64]) -> Result<(f64, f64)> {
    match (values.first(), values.last()) {
        (Some(&first), Some(&last)) if last > first => Ok((first, last)),
        (Some(&first), Some(&last)) => Err(TilesError::ImageGeneration {
            message: format!(
                "colorbar needs ascending end values (got {} and {})",
                first, last
            ),
        }),
        _ => Err(TilesError::ImageGeneration {
            message: "colorbar needs at least one value".to_string(),
        }),
    }
}
