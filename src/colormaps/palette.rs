//! Palette definitions.
//!
//! A palette carries everything a variable needs to be colored in either
//! classification mode: four anchors with their split fractions for the
//! interpolated ramp, and an HSL chain for the discrete ramp.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TilesError};

/// Discrete color scheme: HSL chain through `colors` with `steps` colors per segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscreteScheme {
    /// Anchor colors of the chain, bottom to top
    pub colors: Vec<String>,

    /// Number of colors generated between each pair of successive anchors
    pub steps: Vec<usize>,

    /// Whether the top of the range is itself the last breakpoint
    #[serde(default)]
    pub include_top: bool,
}

impl DiscreteScheme {
    /// Number of classes the chain yields once shared boundaries are dropped
    pub fn class_count(&self) -> usize {
        let total: usize = self.steps.iter().sum();
        total.saturating_sub(self.steps.len().saturating_sub(1))
    }

    /// Parsed anchor colors
    pub fn anchor_colors(&self) -> Result<Vec<[u8; 3]>> {
        self.colors.iter().map(|c| parse_hex(c)).collect()
    }

    fn validate(&self) -> Result<()> {
        if self.colors.len() < 2 || self.steps.len() != self.colors.len() - 1 {
            return Err(TilesError::Config {
                message: format!(
                    "Discrete scheme needs one step count per pair of colors (got {} colors, {} step counts)",
                    self.colors.len(),
                    self.steps.len()
                ),
            });
        }
        if self.steps.iter().any(|&n| n < 2) {
            return Err(TilesError::Config {
                message: "Each discrete segment needs at least 2 steps".to_string(),
            });
        }
        self.anchor_colors()?;
        Ok(())
    }
}

/// Complete palette for one variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    /// Interpolated anchors: bottom, bottom middle, top middle, top
    pub anchors: [String; 4],

    /// Span fractions placing the two middle anchors
    pub fractions: [f64; 2],

    /// Discrete scheme
    pub discrete: DiscreteScheme,
}

impl Palette {
    /// Blue to red palette for fixed-range water levels
    pub fn surge() -> Self {
        Self {
            anchors: [
                "#0000ff".to_string(),
                "#00ffff".to_string(),
                "#ffff00".to_string(),
                "#ff0000".to_string(),
            ],
            fractions: [0.3333, 0.6667],
            discrete: DiscreteScheme {
                colors: vec!["#0000ff".to_string(), "#ff0000".to_string()],
                steps: vec![32],
                include_top: true,
            },
        }
    }

    /// Black through red and yellow to white, for histogram-derived ranges
    pub fn heat() -> Self {
        Self {
            anchors: [
                "#000000".to_string(),
                "#ff0000".to_string(),
                "#ffff00".to_string(),
                "#ffffff".to_string(),
            ],
            fractions: [0.375, 0.75],
            discrete: DiscreteScheme {
                colors: vec![
                    "#000000".to_string(),
                    "#ff0000".to_string(),
                    "#ffff00".to_string(),
                    "#ffffff".to_string(),
                ],
                steps: vec![11, 12, 11],
                include_top: false,
            },
        }
    }

    /// Parsed interpolated anchors
    pub fn anchor_colors(&self) -> Result<[[u8; 3]; 4]> {
        Ok([
            parse_hex(&self.anchors[0])?,
            parse_hex(&self.anchors[1])?,
            parse_hex(&self.anchors[2])?,
            parse_hex(&self.anchors[3])?,
        ])
    }

    /// Validate colors, fractions and the discrete scheme
    pub fn validate(&self) -> Result<()> {
        self.anchor_colors()?;

        let [low, high] = self.fractions;
        if !(0.0..=1.0).contains(&low) || !(0.0..=1.0).contains(&high) || low > high {
            return Err(TilesError::Config {
                message: format!(
                    "Palette fractions must satisfy 0 <= low <= high <= 1 (got {}, {})",
                    low, high
                ),
            });
        }

        self.discrete.validate()
    }
}

/// Parse a `#rrggbb` color
pub fn parse_hex(hex: &str) -> Result<[u8; 3]> {
    let trimmed = hex.trim();
    if trimmed.len() != 7 || !trimmed.starts_with('#') {
        return Err(TilesError::Config {
            message: format!("Invalid hex color: {}", hex),
        });
    }
    let color = colorgrad::Color::from_html(trimmed).map_err(|e| TilesError::Config {
        message: format!("Invalid hex color {}: {}", hex, e),
    })?;
    let [r, g, b, _] = color.to_rgba8();
    Ok([r, g, b])
}

/// Format a color as lowercase `#rrggbb`
pub fn to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}
