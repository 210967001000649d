//! Error types for the adcirc-tiles programs.
//!
//! One enum covers every failure a conversion run can hit. Skips (missing
//! input, empty mesh dimensions) are not errors; see [`crate::pipeline::Outcome`].

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for adcirc-tiles operations.
#[derive(Error, Debug)]
pub enum TilesError {
    /// NetCDF file operation errors
    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid parameter errors
    #[error("Invalid parameter: {param} - {message}")]
    InvalidParameter { param: String, message: String },

    /// The mesh rasterizer could not open or regrid the mesh
    #[error("Invalid mesh {path}: {message}")]
    InvalidMesh { path: PathBuf, message: String },

    /// The raster backend could not open or style the raster
    #[error("Invalid raster {path}: {message}")]
    InvalidRaster { path: PathBuf, message: String },

    /// Range classification or color ramp construction errors
    #[error("Classification error: {message}")]
    Classification { message: String },

    /// Legend image generation errors
    #[error("Image generation error: {message}")]
    ImageGeneration { message: String },

    /// An external program could not be started or exited unsuccessfully
    #[error("External tool {tool} failed: {message}")]
    ExternalTool { tool: String, message: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results with TilesError
pub type Result<T> = std::result::Result<T, TilesError>;

impl From<image::ImageError> for TilesError {
    fn from(err: image::ImageError) -> Self {
        TilesError::ImageGeneration {
            message: err.to_string(),
        }
    }
}
