//! Color ramp construction.
//!
//! A [`ColorRamp`] is the ordered list of value/color stops handed to the
//! raster styler. Interpolated ramps have four anchors the styler blends
//! between; discrete ramps assign one flat color to each class.

use std::fmt;
use std::str::FromStr;

use super::hsl::hsl_chain;
use super::palette::{to_hex, Palette};
use crate::classify::{SpanRule, ValueRange};
use crate::error::{Result, TilesError};

/// How raster values are mapped onto the palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationMode {
    Interpolated,
    Discrete,
}

impl ClassificationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationMode::Interpolated => "interpolated",
            ClassificationMode::Discrete => "discrete",
        }
    }
}

impl FromStr for ClassificationMode {
    type Err = TilesError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "interpolated" => Ok(ClassificationMode::Interpolated),
            "discrete" => Ok(ClassificationMode::Discrete),
            _ => Err(TilesError::InvalidParameter {
                param: "classification".to_string(),
                message: format!(
                    "Incorrect colorscaling value: {}. Must be one of: interpolated, discrete",
                    s
                ),
            }),
        }
    }
}

impl fmt::Display for ClassificationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ramp variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampKind {
    Interpolated,
    Discrete,
}

impl From<ClassificationMode> for RampKind {
    fn from(mode: ClassificationMode) -> Self {
        match mode {
            ClassificationMode::Interpolated => RampKind::Interpolated,
            ClassificationMode::Discrete => RampKind::Discrete,
        }
    }
}

/// A value and the color assigned to it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub value: f64,
    pub color: [u8; 3],
}

impl ColorStop {
    pub fn new(value: f64, color: [u8; 3]) -> Self {
        Self { value, color }
    }

    pub fn hex(&self) -> String {
        to_hex(self.color)
    }
}

/// Ordered value/color stops
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    kind: RampKind,
    stops: Vec<ColorStop>,
}

impl ColorRamp {
    /// Pair up breakpoints and colors. Lengths must match exactly.
    pub fn from_parts(kind: RampKind, values: &[f64], colors: &[[u8; 3]]) -> Result<Self> {
        if values.len() != colors.len() {
            return Err(TilesError::Classification {
                message: format!(
                    "ramp has {} values but {} colors",
                    values.len(),
                    colors.len()
                ),
            });
        }
        if values.is_empty() {
            return Err(TilesError::Classification {
                message: "ramp has no stops".to_string(),
            });
        }

        let stops = values
            .iter()
            .zip(colors)
            .map(|(&value, &color)| ColorStop::new(value, color))
            .collect();
        Ok(Self { kind, stops })
    }

    /// Build the ramp for `range` in the requested mode
    pub fn build(
        mode: ClassificationMode,
        range: ValueRange,
        rule: SpanRule,
        palette: &Palette,
    ) -> Result<Self> {
        match mode {
            ClassificationMode::Interpolated => Self::interpolated(range, rule, palette),
            ClassificationMode::Discrete => Self::discrete(range, rule, palette),
        }
    }

    /// Four anchors at bottom, the two palette fractions of the span, and top
    pub fn interpolated(range: ValueRange, rule: SpanRule, palette: &Palette) -> Result<Self> {
        let span = range.span(rule);
        let [low, high] = palette.fractions;
        let values = [
            range.bottom,
            range.bottom + span * low,
            range.bottom + span * high,
            range.top,
        ];

        if values.windows(2).any(|w| w[1] < w[0]) {
            return Err(TilesError::Classification {
                message: format!(
                    "interpolated stops are not ascending for range {} (span {}): {:?}",
                    range, span, values
                ),
            });
        }

        let colors = palette.anchor_colors()?;
        Self::from_parts(RampKind::Interpolated, &values, &colors)
    }

    /// Evenly spaced classes colored by the palette's HSL chain
    pub fn discrete(range: ValueRange, rule: SpanRule, palette: &Palette) -> Result<Self> {
        let scheme = &palette.discrete;
        let colors = hsl_chain(&scheme.anchor_colors()?, &scheme.steps);
        let classes = scheme.class_count();
        let span = range.span(rule);

        if span.is_nan() || span <= 0.0 || classes < 2 {
            return Err(TilesError::Classification {
                message: format!("cannot split range {} into classes (span {})", range, span),
            });
        }

        let values: Vec<f64> = if scheme.include_top {
            let step = span / (classes - 1) as f64;
            (0..classes - 1)
                .map(|i| range.bottom + i as f64 * step)
                .chain(std::iter::once(range.top))
                .collect()
        } else {
            let step = span / classes as f64;
            (0..classes)
                .map(|i| range.bottom + i as f64 * step)
                .collect()
        };

        Self::from_parts(RampKind::Discrete, &values, &colors)
    }

    pub fn kind(&self) -> RampKind {
        self.kind
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.stops.iter().map(|s| s.value).collect()
    }

    pub fn colors(&self) -> Vec<[u8; 3]> {
        self.stops.iter().map(|s| s.color).collect()
    }

    /// Stops for the raster shader.
    ///
    /// Discrete ramps are framed with the first color at the raster minimum
    /// and the last color at the raster maximum.
    pub fn shader_stops(&self, raster_bounds: ValueRange) -> Vec<ColorStop> {
        match self.kind {
            RampKind::Interpolated => self.stops.clone(),
            RampKind::Discrete => {
                let first = self.stops[0].color;
                let last = self.stops[self.stops.len() - 1].color;
                let mut stops = Vec::with_capacity(self.stops.len() + 2);
                stops.push(ColorStop::new(raster_bounds.bottom, first));
                stops.extend_from_slice(&self.stops);
                stops.push(ColorStop::new(raster_bounds.top, last));
                stops
            }
        }
    }
}
