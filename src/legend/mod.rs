//! Colorbar legends with dual-unit tick labels.

pub mod render;
pub mod ticks;

pub use render::{render_colorbar, write_colorbar, LegendStyle};
pub use ticks::{primary_ticks, secondary_ticks, Ticks, Unit};
