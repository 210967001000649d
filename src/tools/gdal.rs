//! Histogram and color-relief styling with the GDAL command-line utilities.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

use super::{run_tool, RasterStyler, StyleRequest};
use crate::classify::Histogram;
use crate::colormaps::{ColorStop, RampKind};
use crate::error::{Result, TilesError};

#[derive(Debug, Deserialize)]
struct GdalInfo {
    #[serde(default)]
    bands: Vec<BandInfo>,
}

#[derive(Debug, Deserialize)]
struct BandInfo {
    histogram: Option<BandHistogram>,
}

#[derive(Debug, Deserialize)]
struct BandHistogram {
    min: f64,
    max: f64,
    buckets: Vec<u64>,
}

/// Extract the band 1 histogram from `gdalinfo -json -hist` output
pub fn parse_histogram_json(json: &str) -> Result<Histogram> {
    let info: GdalInfo = serde_json::from_str(json)?;
    let histogram = info
        .bands
        .into_iter()
        .next()
        .and_then(|band| band.histogram)
        .ok_or_else(|| TilesError::Classification {
            message: "gdalinfo reported no histogram for band 1".to_string(),
        })?;
    Histogram::new(histogram.min, histogram.max, histogram.buckets)
}

/// Offset of a class's lower edge above the previous breakpoint, as a share of the class width
const CLASS_EDGE_OFFSET: f64 = 1e-9;

/// gdaldem color table, then transparent no-data.
///
/// Interpolated ramps get one `value r g b a` line per stop. Discrete ramps
/// color the band (v[i-1], v[i]] with the color of v[i], so each class is a
/// pair of same-color lines: just above v[i-1] and at v[i]. A breakpoint
/// equal to the previous one adds nothing.
pub fn color_table(kind: RampKind, stops: &[ColorStop], opacity: f64) -> String {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    let mut table = String::new();
    let mut entry = |value: f64, [r, g, b]: [u8; 3]| {
        table.push_str(&format!("{} {} {} {} {}\n", value, r, g, b, alpha));
    };

    match kind {
        RampKind::Interpolated => {
            for stop in stops {
                entry(stop.value, stop.color);
            }
        }
        RampKind::Discrete => {
            let mut previous: Option<f64> = None;
            for stop in stops {
                match previous {
                    None => entry(stop.value, stop.color),
                    Some(lower) if stop.value > lower => {
                        let edge = lower + (stop.value - lower) * CLASS_EDGE_OFFSET;
                        entry(edge, stop.color);
                        entry(stop.value, stop.color);
                    }
                    Some(_) => continue,
                }
                previous = Some(stop.value);
            }
        }
    }

    table.push_str("nv 0 0 0 0\n");
    table
}

/// `gdalinfo` for statistics, `gdaldem color-relief` for styling
#[derive(Debug, Clone)]
pub struct GdalRasterTools {
    gdalinfo: PathBuf,
    gdaldem: PathBuf,
}

impl GdalRasterTools {
    pub fn new(gdalinfo: impl Into<PathBuf>, gdaldem: impl Into<PathBuf>) -> Self {
        Self {
            gdalinfo: gdalinfo.into(),
            gdaldem: gdaldem.into(),
        }
    }

    pub fn color_relief_command(&self, request: &StyleRequest, table: &Path) -> Command {
        let mut command = Command::new(&self.gdaldem);
        command.args(["color-relief", "-alpha", "-of", "GTiff"]);
        command.arg(&request.input).arg(table).arg(&request.output);
        command
    }
}

/// Color table file written beside the styled raster
fn table_path(output: &Path) -> PathBuf {
    output.with_extension("colors.txt")
}

impl RasterStyler for GdalRasterTools {
    fn histogram(&self, raster: &Path) -> Result<Histogram> {
        let mut command = Command::new(&self.gdalinfo);
        command.args(["-json", "-hist"]).arg(raster);

        let output = run_tool(&mut command).map_err(|e| TilesError::InvalidRaster {
            path: raster.to_path_buf(),
            message: e.to_string(),
        })?;
        let histogram = parse_histogram_json(&output.stdout)?;

        debug!(
            raster = %raster.display(),
            bins = histogram.bin_count(),
            minimum = histogram.minimum(),
            maximum = histogram.maximum(),
            "Histogram computed"
        );
        Ok(histogram)
    }

    fn style(&self, request: &StyleRequest) -> Result<()> {
        let table = table_path(&request.output);
        std::fs::write(&table, color_table(request.kind, &request.stops, request.opacity))?;

        let result = run_tool(&mut self.color_relief_command(request, &table));

        if let Err(e) = std::fs::remove_file(&table) {
            warn!(path = %table.display(), error = %e, "Could not remove color table");
        }

        result.map_err(|e| TilesError::InvalidRaster {
            path: request.input.clone(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}
