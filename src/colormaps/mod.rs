//! Color ramps, palettes and colormaps.
//!
//! Ramps feed the raster styler; colormaps draw the same ramp on the legend bar.

pub mod colormap;
pub mod hsl;
pub mod palette;
pub mod ramp;

pub use colormap::{colormap_for, Colormap, GradientColormap, ListedColormap};
pub use hsl::{hsl_chain, hsl_scale, Hsl};
pub use palette::{parse_hex, to_hex, DiscreteScheme, Palette};
pub use ramp::{ClassificationMode, ColorRamp, ColorStop, RampKind};
