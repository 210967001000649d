//! Colormap trait and utilities.
//!
//! A [`Colormap`] turns a normalized position along a legend bar into a pixel
//! color. Discrete ramps map to equal-width bands, interpolated ramps to a
//! continuous gradient through their anchor colors.

use colorgrad::{Color, CustomGradient, Gradient};

use super::ramp::{ColorRamp, RampKind};
use crate::error::{Result, TilesError};

/// Trait for color mapping implementations
pub trait Colormap {
    /// Map a normalized value (0.0 to 1.0) to an RGBA color
    fn map_normalized(&self, value: f64) -> [u8; 4];

    /// Map a value to an RGBA color given the data range
    fn map(&self, value: f64, min: f64, max: f64) -> [u8; 4] {
        let normalized = if max > min {
            ((value - min) / (max - min)).clamp(0.0, 1.0)
        } else {
            0.5
        };
        self.map_normalized(normalized)
    }

    /// Get the name of this colormap
    fn name(&self) -> &str;
}

/// Equal-width bands, one per color.
pub struct ListedColormap {
    colors: Vec<[u8; 3]>,
}

impl ListedColormap {
    pub fn new(colors: Vec<[u8; 3]>) -> Result<Self> {
        if colors.is_empty() {
            return Err(TilesError::Classification {
                message: "listed colormap needs at least one color".to_string(),
            });
        }
        Ok(Self { colors })
    }
}

impl Colormap for ListedColormap {
    fn map_normalized(&self, value: f64) -> [u8; 4] {
        let n = self.colors.len();
        let index = ((value.clamp(0.0, 1.0) * n as f64).floor() as usize).min(n - 1);
        let [r, g, b] = self.colors[index];
        [r, g, b, 255]
    }

    fn name(&self) -> &str {
        "listed"
    }
}

/// Linear RGB gradient through anchor colors at given positions.
pub struct GradientColormap {
    gradient: Gradient,
}

impl GradientColormap {
    /// `positions` are ascending, one per color, from 0.0 to 1.0
    pub fn new(colors: &[[u8; 3]], positions: &[f64]) -> Result<Self> {
        let colors: Vec<Color> = colors
            .iter()
            .map(|[r, g, b]| Color::from_rgba8(*r, *g, *b, 255))
            .collect();
        let gradient = CustomGradient::new()
            .colors(&colors)
            .domain(positions)
            .build()
            .map_err(|e| TilesError::Classification {
                message: format!("Failed to build gradient: {}", e),
            })?;
        Ok(Self { gradient })
    }
}

impl Colormap for GradientColormap {
    fn map_normalized(&self, value: f64) -> [u8; 4] {
        self.gradient.at(value.clamp(0.0, 1.0)).to_rgba8()
    }

    fn name(&self) -> &str {
        "gradient"
    }
}

/// Stop values rescaled to [0, 1] over the ramp's extent
fn normalized_positions(values: &[f64]) -> Result<Vec<f64>> {
    let (first, last) = match (values.first(), values.last()) {
        (Some(&first), Some(&last)) if last > first => (first, last),
        _ => {
            return Err(TilesError::Classification {
                message: format!("ramp values {:?} do not span a range", values),
            })
        }
    };
    Ok(values
        .iter()
        .map(|v| ((v - first) / (last - first)).clamp(0.0, 1.0))
        .collect())
}

/// Get the colormap that draws a ramp on a legend bar
pub fn colormap_for(ramp: &ColorRamp) -> Result<Box<dyn Colormap>> {
    let colors = ramp.colors();
    match ramp.kind() {
        RampKind::Discrete => Ok(Box::new(ListedColormap::new(colors)?)),
        RampKind::Interpolated => {
            let positions = normalized_positions(&ramp.values())?;
            Ok(Box::new(GradientColormap::new(&colors, &positions)?))
        }
    }
}
