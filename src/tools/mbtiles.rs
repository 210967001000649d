//! Tile pyramid generation with `gdal2mbtiles.py`.

use std::fmt;
use std::path::PathBuf;
use std::process::Command;

use super::{run_tool, TileGenerator, TileRequest};
use crate::error::{Result, TilesError};

/// Inclusive range of zoom levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomRange {
    start: u32,
    stop: u32,
}

impl ZoomRange {
    pub fn new(start: u32, stop: u32) -> Result<Self> {
        if stop < start {
            return Err(TilesError::InvalidParameter {
                param: "zlstop".to_string(),
                message: format!(
                    "Incorrect zoom level: stop {} is below start {}",
                    stop, start
                ),
            });
        }
        Ok(Self { start, stop })
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn stop(&self) -> u32 {
        self.stop
    }

    /// Zoom argument for the generator: "a-b", or "a" for a single level
    pub fn arg(&self) -> String {
        if self.start == self.stop {
            self.start.to_string()
        } else {
            format!("{}-{}", self.start, self.stop)
        }
    }
}

impl fmt::Display for ZoomRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.arg())
    }
}

/// Runs the `gdal2mbtiles.py` script through an interpreter
#[derive(Debug, Clone)]
pub struct Gdal2Mbtiles {
    interpreter: PathBuf,
    script: PathBuf,
}

impl Gdal2Mbtiles {
    pub fn new(interpreter: impl Into<PathBuf>, script: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            script: script.into(),
        }
    }

    pub fn command(&self, request: &TileRequest) -> Command {
        let mut command = Command::new(&self.interpreter);
        command
            .arg(&self.script)
            .arg(&request.input)
            .arg("-z")
            .arg(request.zoom.arg())
            .arg(format!("--processes={}", request.processes))
            .arg(&request.output);
        command
    }
}

impl TileGenerator for Gdal2Mbtiles {
    fn generate(&self, request: &TileRequest) -> Result<()> {
        run_tool(&mut self.command(request))?;
        Ok(())
    }
}
