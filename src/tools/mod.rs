//! External GIS programs behind collaborator traits.
//!
//! The pipelines only talk to [`MeshRasterizer`], [`RasterStyler`] and
//! [`TileGenerator`]; the implementations in the submodules shell out to
//! QGIS, GDAL and `gdal2mbtiles.py`. Tests substitute in-process fakes.

pub mod gdal;
pub mod mbtiles;
pub mod qgis;

pub use gdal::{color_table, parse_histogram_json, GdalRasterTools};
pub use mbtiles::{Gdal2Mbtiles, ZoomRange};
pub use qgis::QgisMeshRasterizer;

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::classify::Histogram;
use crate::colormaps::{ColorStop, RampKind};
use crate::error::{Result, TilesError};

/// Regrids a mesh variable onto a regular float raster
pub trait MeshRasterizer {
    fn rasterize(&self, mesh: &Path, output: &Path) -> Result<()>;
}

/// What the styler needs to turn a float raster into an 8-bit RGBA raster
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub kind: RampKind,
    pub stops: Vec<ColorStop>,
    /// 0 to 1, applied as the alpha of every colored pixel
    pub opacity: f64,
}

/// Reads band statistics and applies color ramps
pub trait RasterStyler {
    /// Histogram of band 1
    fn histogram(&self, raster: &Path) -> Result<Histogram>;

    fn style(&self, request: &StyleRequest) -> Result<()>;
}

/// What the tile generator needs for one archive
#[derive(Debug, Clone, PartialEq)]
pub struct TileRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub zoom: ZoomRange,
    pub processes: u32,
}

/// Builds a tile pyramid archive from a raster
pub trait TileGenerator {
    fn generate(&self, request: &TileRequest) -> Result<()>;
}

/// Captured output of a successful tool run
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Run `command` to completion.
///
/// A spawn failure or unsuccessful exit status becomes
/// [`TilesError::ExternalTool`] carrying the captured stderr. Stderr of
/// successful runs is logged at debug level.
pub fn run_tool(command: &mut Command) -> Result<ToolOutput> {
    let tool = command.get_program().to_string_lossy().into_owned();
    let args: Vec<String> = command
        .get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();

    info!(tool = %tool, args = %args.join(" "), "Running external tool");
    let start = Instant::now();

    let output = command.output().map_err(|e| TilesError::ExternalTool {
        tool: tool.clone(),
        message: format!("could not start: {}", e),
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

    if !output.status.success() {
        warn!(
            tool = %tool,
            status = %output.status,
            duration_ms = duration_ms,
            stderr = %stderr.trim(),
            "External tool failed"
        );
        return Err(TilesError::ExternalTool {
            tool,
            message: format!("{}: {}", output.status, stderr.trim()),
        });
    }

    if !stderr.trim().is_empty() {
        debug!(tool = %tool, stderr = %stderr.trim(), "External tool stderr");
    }
    info!(tool = %tool, duration_ms = duration_ms, "External tool finished");

    Ok(ToolOutput { stdout, stderr })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_tool_captures_stdout() {
        let output = run_tool(Command::new("sh").args(["-c", "echo maxele; echo noise >&2"])).unwrap();
        assert_eq!(output.stdout.trim(), "maxele");
        assert_eq!(output.stderr.trim(), "noise");
    }

    #[test]
    fn test_run_tool_reports_failure_status() {
        let err = run_tool(Command::new("sh").args(["-c", "echo broken mesh >&2; exit 3"])).unwrap_err();
        match err {
            TilesError::ExternalTool { tool, message } => {
                assert_eq!(tool, "sh");
                assert!(message.contains("broken mesh"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_run_tool_reports_missing_program() {
        let err = run_tool(&mut Command::new("/nonexistent/qgis_process")).unwrap_err();
        assert!(matches!(err, TilesError::ExternalTool { .. }));
    }
}
