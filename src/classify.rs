//! Range and histogram classification.
//!
//! Produces the effective `(bottom, top)` range a color ramp is stretched
//! over, either from a fixed per-variable range or from a histogram of the
//! raster with near-empty tails trimmed off.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::colormaps::ClassificationMode;
use crate::error::{Result, TilesError};

/// Bins with this many values or fewer count as noise
pub const DEFAULT_NOISE_THRESHOLD: u64 = 5;

/// Scalar bounds of a raster band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub bottom: f64,
    pub top: f64,
}

impl ValueRange {
    pub fn new(bottom: f64, top: f64) -> Self {
        Self { bottom, top }
    }

    /// Span of the range under the given rule
    pub fn span(&self, rule: SpanRule) -> f64 {
        match rule {
            SpanRule::Legacy if self.bottom < 0.0 => self.top + self.bottom,
            SpanRule::Legacy | SpanRule::Difference => self.top - self.bottom,
        }
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.bottom, self.top)
    }
}

/// How the span of a range is computed.
///
/// `Legacy` adds the bottom to the top when the bottom is negative, which
/// reproduces previously published rasters. `Difference` always subtracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanRule {
    #[default]
    Legacy,
    Difference,
}

/// Histogram of a raster band with equal-width bins over `[minimum, maximum)`
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    minimum: f64,
    maximum: f64,
    counts: Vec<u64>,
}

impl Histogram {
    pub fn new(minimum: f64, maximum: f64, counts: Vec<u64>) -> Result<Self> {
        if counts.is_empty() {
            return Err(TilesError::Classification {
                message: "histogram has no bins".to_string(),
            });
        }
        if !minimum.is_finite() || !maximum.is_finite() || maximum < minimum {
            return Err(TilesError::Classification {
                message: format!(
                    "histogram bounds are invalid: minimum {}, maximum {}",
                    minimum, maximum
                ),
            });
        }
        Ok(Self {
            minimum,
            maximum,
            counts,
        })
    }

    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    pub fn bin_count(&self) -> usize {
        self.counts.len()
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Width of one bin
    pub fn bin_width(&self) -> f64 {
        (self.maximum - self.minimum) / self.counts.len() as f64
    }

    /// Lower edge of bin `index`
    pub fn bin_lower_bound(&self, index: usize) -> f64 {
        self.minimum + index as f64 * self.bin_width()
    }

    /// `(lower bound, count)` pairs in ascending order
    pub fn bins(&self) -> impl Iterator<Item = (f64, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(move |(i, &count)| (self.bin_lower_bound(i), count))
    }

    /// Lower edges of the first and last bins holding more than `threshold` values
    pub fn signal_range(&self, threshold: u64) -> Result<ValueRange> {
        let first = self.counts.iter().position(|&c| c > threshold);
        let last = self.counts.iter().rposition(|&c| c > threshold);

        match (first, last) {
            (Some(first), Some(last)) => Ok(ValueRange::new(
                self.bin_lower_bound(first),
                self.bin_lower_bound(last),
            )),
            _ => Err(TilesError::Classification {
                message: format!(
                    "no histogram bin holds more than {} values ({} bins over [{}, {}])",
                    threshold,
                    self.counts.len(),
                    self.minimum,
                    self.maximum
                ),
            }),
        }
    }
}

/// Where a variable's range comes from
#[derive(Debug, Clone, PartialEq)]
pub enum RangeSource {
    /// Known variable with a fixed range
    Fixed(ValueRange),
    /// Computed histogram of the raster
    Histogram(Histogram),
}

impl RangeSource {
    /// Effective range for the given classification mode.
    ///
    /// Discrete classes of a histogram-derived range start at zero; fixed
    /// ranges are used as configured.
    pub fn effective_range(&self, threshold: u64, mode: ClassificationMode) -> Result<ValueRange> {
        match self {
            RangeSource::Fixed(range) => Ok(*range),
            RangeSource::Histogram(histogram) => {
                let signal = histogram.signal_range(threshold)?;
                match mode {
                    ClassificationMode::Interpolated => Ok(signal),
                    ClassificationMode::Discrete => Ok(ValueRange::new(0.0, signal.top)),
                }
            }
        }
    }

    /// Bounds of the raster values, used to frame discrete shader tables
    pub fn raster_bounds(&self) -> ValueRange {
        match self {
            RangeSource::Fixed(range) => *range,
            RangeSource::Histogram(histogram) => {
                ValueRange::new(histogram.minimum(), histogram.maximum())
            }
        }
    }
}
