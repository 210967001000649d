//! # adcirc-tiles
//!
//! Turns ADCIRC storm-surge model output into map-ready products.
//!
//! Two programs are built on this library:
//!
//! - **adcirc2geotiff**: regrids a NetCDF mesh variable onto a raster, picks a
//!   value range, styles the raster with a color ramp and renders a colorbar
//!   legend with dual-unit tick labels.
//! - **geotiff2mbtiles**: cuts a styled raster into an MBTiles tile archive.
//!
//! ## Architecture
//!
//! - **Classification**: value ranges from fixed profiles or raster histograms
//!   ([`classify`])
//! - **Color**: HSL-interpolated palettes and color ramps ([`colormaps`])
//! - **Legend**: colorbar rendering ([`legend`])
//! - **External tools**: QGIS and GDAL programs behind traits ([`tools`], [`mesh`])
//! - **Orchestration**: file naming, staging moves and the two pipelines
//!   ([`layout`], [`pipeline`])

pub mod classify;
pub mod colormaps;
pub mod config;
pub mod error;
pub mod layout;
pub mod legend;
pub mod logging;
pub mod mesh;
pub mod pipeline;
pub mod tools;

pub use classify::{Histogram, RangeSource, SpanRule, ValueRange};
pub use colormaps::{ClassificationMode, ColorRamp, ColorStop, Palette};
pub use config::{Config, GeotiffArgs, MbtilesArgs, VariableProfile};
pub use error::{Result, TilesError};
pub use legend::Unit;
pub use logging::{
    generate_run_id, init_tracing, log_error, log_operation_end, log_operation_start,
    log_timed_operation,
};
pub use pipeline::Outcome;
