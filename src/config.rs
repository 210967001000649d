//! Configuration management for adcirc-tiles.
//!
//! This module handles the layered configuration system with the following precedence:
//! 1. Command-line arguments (highest priority)
//! 2. JSON config file named by `ADCIRC_TILES_CONFIG`
//! 3. Default values (lowest priority)
//!
//! Command-line arguments only name files and directories; everything that
//! shapes the output (variable ranges, palettes, units, tool paths) lives in
//! [`Config`].

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::classify::{SpanRule, ValueRange, DEFAULT_NOISE_THRESHOLD};
use crate::colormaps::{ClassificationMode, Palette};
use crate::error::{Result, TilesError};
use crate::legend::{LegendStyle, Unit};

/// Level used when no configuration could be loaded
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable naming the JSON configuration file
pub const CONFIG_ENV: &str = "ADCIRC_TILES_CONFIG";

/// Command-line arguments for adcirc2geotiff
#[derive(Parser, Debug, Clone)]
#[command(name = "adcirc2geotiff")]
#[command(author, version, about = "Regrid an ADCIRC mesh to a styled GeoTIFF with a colorbar", long_about = None)]
pub struct GeotiffArgs {
    /// Input file name
    #[arg(long = "inputFile", alias = "inputFILE")]
    pub input_file: String,

    /// Input directory path
    #[arg(long = "inputDir", alias = "inputDIR")]
    pub input_dir: PathBuf,

    /// Output directory path
    #[arg(long = "outputDir", alias = "outputDIR")]
    pub output_dir: PathBuf,

    /// Final directory path
    #[arg(long = "finalDir", alias = "finalDIR")]
    pub final_dir: PathBuf,
}

/// Command-line arguments for geotiff2mbtiles
#[derive(Parser, Debug, Clone)]
#[command(name = "geotiff2mbtiles")]
#[command(author, version, about = "Build an MBTiles archive from a GeoTIFF", long_about = None)]
pub struct MbtilesArgs {
    /// Input file name
    #[arg(long = "inputFile", alias = "inputFILE")]
    pub input_file: String,

    /// Start zoom level
    #[arg(long)]
    pub zlstart: u32,

    /// Stop zoom level
    #[arg(long)]
    pub zlstop: u32,

    /// Number of CPUs to use
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub cpu: u32,

    /// Input directory path
    #[arg(long = "inputDir", alias = "inputDIR")]
    pub input_dir: PathBuf,

    /// Output directory path
    #[arg(long = "outputDir", alias = "outputDIR")]
    pub output_dir: PathBuf,

    /// Final directory path
    #[arg(long = "finalDir", alias = "finalDIR")]
    pub final_dir: PathBuf,
}

/// How a variable is ranged, colored and labelled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableProfile {
    /// Fixed range; `None` derives the range from the raster histogram
    #[serde(default)]
    pub range: Option<ValueRange>,

    /// Colors for both classification modes
    pub palette: Palette,

    /// Unit of the raster values
    pub unit: Unit,
}

/// Mesh regridding parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshConfig {
    /// Dataset group index inside the mesh file
    #[serde(default = "default_dataset_group")]
    pub dataset_group: u32,

    /// Timestep index inside the dataset group
    #[serde(default)]
    pub timestep: u32,

    /// Output extent as "xmin,xmax,ymin,ymax"
    #[serde(default = "default_extent")]
    pub extent: String,

    /// Map units per pixel
    #[serde(default = "default_resolution")]
    pub resolution: f64,

    /// Output coordinate reference system
    #[serde(default = "default_crs")]
    pub crs: String,
}

/// Paths of the external programs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_qgis_process")]
    pub qgis_process: PathBuf,

    #[serde(default = "default_gdalinfo")]
    pub gdalinfo: PathBuf,

    #[serde(default = "default_gdaldem")]
    pub gdaldem: PathBuf,

    #[serde(default = "default_ncdump")]
    pub ncdump: PathBuf,

    /// Interpreter used to run the tile generator script
    #[serde(default = "default_python")]
    pub python: PathBuf,

    #[serde(default = "default_gdal2mbtiles")]
    pub gdal2mbtiles: PathBuf,
}

/// Complete configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Histogram bins with this many values or fewer are ignored
    #[serde(default = "default_noise_threshold")]
    pub noise_threshold: u64,

    /// Span computation for negative-leaning ranges
    #[serde(default)]
    pub span_rule: SpanRule,

    /// Classification mode: "interpolated" or "discrete"
    #[serde(default = "default_classification")]
    pub classification: String,

    /// Opacity of the styled raster, 0 to 1
    #[serde(default = "default_opacity")]
    pub opacity: f64,

    #[serde(default)]
    pub mesh: MeshConfig,

    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub legend: LegendStyle,

    /// Profiles keyed by variable name (the part of the file name before the first dot)
    #[serde(default = "default_variables")]
    pub variables: BTreeMap<String, VariableProfile>,
}

impl Config {
    /// Load configuration from the defaults and the optional JSON file
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let file_config = Self::load_from_file(Path::new(&path))?;
            config.merge(file_config);
        }

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| TilesError::Config {
            message: format!("Failed to read {}: {}", path.display(), e),
        })?;
        serde_json::from_str(&content).map_err(|e| TilesError::Config {
            message: format!("Failed to parse {}: {}", path.display(), e),
        })
    }

    /// Merge another config into this one (other takes precedence).
    /// Variable profiles are merged by name.
    fn merge(&mut self, other: Config) {
        self.log_level = other.log_level;
        self.noise_threshold = other.noise_threshold;
        self.span_rule = other.span_rule;
        self.classification = other.classification;
        self.opacity = other.opacity;
        self.mesh = other.mesh;
        self.tools = other.tools;
        self.legend = other.legend;
        self.variables.extend(other.variables);
    }

    /// Parsed classification mode
    pub fn classification_mode(&self) -> Result<ClassificationMode> {
        self.classification.parse()
    }

    /// Profile of a variable
    pub fn profile(&self, variable: &str) -> Result<&VariableProfile> {
        self.variables.get(variable).ok_or_else(|| TilesError::Config {
            message: format!(
                "No profile for variable {}. Known variables: {}",
                variable,
                self.variables
                    .keys()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        // Validate log level
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(TilesError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        self.classification_mode()?;

        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(TilesError::Config {
                message: format!("Opacity must be between 0 and 1, got {}", self.opacity),
            });
        }

        if !(self.mesh.resolution > 0.0) {
            return Err(TilesError::Config {
                message: format!(
                    "Mesh resolution must be positive, got {}",
                    self.mesh.resolution
                ),
            });
        }

        let extent: Vec<&str> = self.mesh.extent.split(',').collect();
        if extent.len() != 4 || extent.iter().any(|v| v.trim().parse::<f64>().is_err()) {
            return Err(TilesError::Config {
                message: format!(
                    "Mesh extent must be 'xmin,xmax,ymin,ymax', got {}",
                    self.mesh.extent
                ),
            });
        }

        if self.variables.is_empty() {
            return Err(TilesError::Config {
                message: "At least one variable profile is required".to_string(),
            });
        }

        for (name, profile) in &self.variables {
            profile.palette.validate().map_err(|e| TilesError::Config {
                message: format!("Variable {}: {}", name, e),
            })?;
            if let Some(range) = profile.range {
                if !(range.top > range.bottom) {
                    return Err(TilesError::Config {
                        message: format!("Variable {}: range {} is empty", name, range),
                    });
                }
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            noise_threshold: default_noise_threshold(),
            span_rule: SpanRule::default(),
            classification: default_classification(),
            opacity: default_opacity(),
            mesh: MeshConfig::default(),
            tools: ToolsConfig::default(),
            legend: LegendStyle::default(),
            variables: default_variables(),
        }
    }
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            dataset_group: default_dataset_group(),
            timestep: 0,
            extent: default_extent(),
            resolution: default_resolution(),
            crs: default_crs(),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            qgis_process: default_qgis_process(),
            gdalinfo: default_gdalinfo(),
            gdaldem: default_gdaldem(),
            ncdump: default_ncdump(),
            python: default_python(),
            gdal2mbtiles: default_gdal2mbtiles(),
        }
    }
}

// Default value functions for serde
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_noise_threshold() -> u64 {
    DEFAULT_NOISE_THRESHOLD
}

fn default_classification() -> String {
    "discrete".to_string()
}

fn default_opacity() -> f64 {
    0.75
}

fn default_dataset_group() -> u32 {
    1
}

fn default_extent() -> String {
    "-97.85833,-60.040029999999994,7.909559999999999,45.83612".to_string()
}

fn default_resolution() -> f64 {
    0.001
}

fn default_crs() -> String {
    "EPSG:4326".to_string()
}

fn default_qgis_process() -> PathBuf {
    PathBuf::from("qgis_process")
}

fn default_gdalinfo() -> PathBuf {
    PathBuf::from("gdalinfo")
}

fn default_gdaldem() -> PathBuf {
    PathBuf::from("gdaldem")
}

fn default_ncdump() -> PathBuf {
    PathBuf::from("ncdump")
}

fn default_python() -> PathBuf {
    PathBuf::from("python")
}

fn default_gdal2mbtiles() -> PathBuf {
    PathBuf::from("gdal2mbtiles.py")
}

fn default_variables() -> BTreeMap<String, VariableProfile> {
    let mut variables = BTreeMap::new();
    variables.insert(
        "maxele".to_string(),
        VariableProfile {
            range: Some(ValueRange::new(0.0, 2.0)),
            palette: Palette::surge(),
            unit: Unit::Meters,
        },
    );
    variables.insert(
        "maxwvel".to_string(),
        VariableProfile {
            range: None,
            palette: Palette::heat(),
            unit: Unit::MetersPerSecond,
        },
    );
    variables.insert(
        "swan_HS_max".to_string(),
        VariableProfile {
            range: None,
            palette: Palette::heat(),
            unit: Unit::Meters,
        },
    );
    variables
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.noise_threshold, 5);
        assert_eq!(config.span_rule, SpanRule::Legacy);
        assert_eq!(config.classification, "discrete");
        assert_eq!(config.opacity, 0.75);
        assert_eq!(config.mesh.dataset_group, 1);
        assert_eq!(config.mesh.timestep, 0);
        assert_eq!(config.mesh.resolution, 0.001);
        assert!(config.validate().is_ok());

        let maxele = config.profile("maxele").unwrap();
        assert_eq!(maxele.range, Some(ValueRange::new(0.0, 2.0)));
        assert_eq!(maxele.unit, Unit::Meters);
        assert_eq!(
            config.profile("maxwvel").unwrap().unit,
            Unit::MetersPerSecond
        );
        assert!(config.profile("swan_HS_max").unwrap().range.is_none());
        assert!(config.profile("unknown").is_err());
    }

    #[test]
    fn test_config_merge() {
        let mut config1 = Config::default();
        let mut config2 = Config::default();

        config2.noise_threshold = 10;
        config2.tools.python = PathBuf::from("/opt/conda/bin/python");
        config2.variables.clear();
        config2.variables.insert(
            "maxvel".to_string(),
            VariableProfile {
                range: None,
                palette: Palette::heat(),
                unit: Unit::MetersPerSecond,
            },
        );

        config1.merge(config2);

        assert_eq!(config1.noise_threshold, 10);
        assert_eq!(config1.tools.python, PathBuf::from("/opt/conda/bin/python"));
        assert!(config1.variables.contains_key("maxele"));
        assert!(config1.variables.contains_key("maxvel"));
    }

    #[test]
    fn test_config_from_json() {
        let json = r##"{
            "classification": "interpolated",
            "tools": { "gdal2mbtiles": "/home/nru/repos/gdal2mbtiles/gdal2mbtiles.py" },
            "variables": {
                "maxele": {
                    "range": { "bottom": 0.0, "top": 3.0 },
                    "palette": {
                        "anchors": ["#0000ff", "#00ffff", "#ffff00", "#ff0000"],
                        "fractions": [0.25, 0.5],
                        "discrete": { "colors": ["#0000ff", "#ff0000"], "steps": [32], "include_top": true }
                    },
                    "unit": "meters"
                }
            }
        }"##;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(
            config.classification_mode().unwrap(),
            ClassificationMode::Interpolated
        );
        assert_eq!(config.tools.gdaldem, PathBuf::from("gdaldem"));
        assert_eq!(
            config.tools.gdal2mbtiles,
            PathBuf::from("/home/nru/repos/gdal2mbtiles/gdal2mbtiles.py")
        );
        let maxele = config.profile("maxele").unwrap();
        assert_eq!(maxele.range, Some(ValueRange::new(0.0, 3.0)));
        assert_eq!(maxele.palette.fractions, [0.25, 0.5]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_unit_rejected_at_load() {
        let json = r##"{
            "variables": {
                "maxele": {
                    "palette": {
                        "anchors": ["#0000ff", "#00ffff", "#ffff00", "#ff0000"],
                        "fractions": [0.25, 0.5],
                        "discrete": { "colors": ["#0000ff", "#ff0000"], "steps": [32] }
                    },
                    "unit": "fathoms"
                }
            }
        }"##;
        assert!(serde_json::from_str::<Config>(json).is_err());
    }

    #[test]
    fn test_config_validation() {
        // Valid config should pass
        let config = Config::default();
        assert!(config.validate().is_ok());

        // Test invalid log level
        let mut config = Config::default();
        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());

        // Test invalid classification mode
        let mut config = Config::default();
        config.classification = "stepped".to_string();
        assert!(config.validate().is_err());

        // Test invalid opacity
        let mut config = Config::default();
        config.opacity = 1.5;
        assert!(config.validate().is_err());

        // Test invalid extent
        let mut config = Config::default();
        config.mesh.extent = "-97.8,-60.0,7.9".to_string();
        assert!(config.validate().is_err());

        // Test empty fixed range
        let mut config = Config::default();
        if let Some(profile) = config.variables.get_mut("maxele") {
            profile.range = Some(ValueRange::new(2.0, 2.0));
        }
        assert!(config.validate().is_err());

        // Test broken palette
        let mut config = Config::default();
        if let Some(profile) = config.variables.get_mut("maxwvel") {
            profile.palette.anchors[0] = "#12345".to_string();
        }
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_geotiff_args() {
        let args = GeotiffArgs::try_parse_from([
            "adcirc2geotiff",
            "--inputFILE",
            "maxele.63.nc",
            "--inputDIR",
            "/data/input",
            "--outputDir",
            "/data/tiff",
            "--finalDIR",
            "/data/final/tiff",
        ])
        .unwrap();
        assert_eq!(args.input_file, "maxele.63.nc");
        assert_eq!(args.input_dir, PathBuf::from("/data/input"));
        assert_eq!(args.final_dir, PathBuf::from("/data/final/tiff"));

        // Every argument is required
        assert!(GeotiffArgs::try_parse_from(["adcirc2geotiff", "--inputFile", "x.63.nc"]).is_err());
    }

    #[test]
    fn test_mbtiles_args() {
        let args = MbtilesArgs::try_parse_from([
            "geotiff2mbtiles",
            "--inputFile",
            "maxele.63.tif",
            "--zlstart",
            "0",
            "--zlstop",
            "9",
            "--cpu",
            "4",
            "--inputDir",
            "/data/tiff",
            "--outputDir",
            "/data/mbtiles",
            "--finalDir",
            "/data/final/mbtiles",
        ])
        .unwrap();
        assert_eq!(args.zlstart, 0);
        assert_eq!(args.zlstop, 9);
        assert_eq!(args.cpu, 4);

        let zero_cpus = MbtilesArgs::try_parse_from([
            "geotiff2mbtiles",
            "--inputFile",
            "maxele.63.tif",
            "--zlstart",
            "0",
            "--zlstop",
            "9",
            "--cpu",
            "0",
            "--inputDir",
            "a",
            "--outputDir",
            "b",
            "--finalDir",
            "c",
        ]);
        assert!(zero_cpus.is_err());
    }
}
