//! Mesh regridding with `qgis_process`.

use std::path::{Path, PathBuf};
use std::process::Command;

use super::{run_tool, MeshRasterizer};
use crate::config::MeshConfig;
use crate::error::{Result, TilesError};

/// Runs the `native:meshrasterize` algorithm on an ADCIRC UGRID mesh
#[derive(Debug, Clone)]
pub struct QgisMeshRasterizer {
    program: PathBuf,
    mesh: MeshConfig,
}

impl QgisMeshRasterizer {
    pub fn new(program: impl Into<PathBuf>, mesh: MeshConfig) -> Self {
        Self {
            program: program.into(),
            mesh,
        }
    }

    /// Algorithm parameters as `NAME=value` arguments
    pub fn parameters(&self, mesh: &Path, output: &Path) -> Vec<String> {
        vec![
            format!("INPUT=Ugrid:\"{}\"", mesh.display()),
            format!("DATASET_GROUPS={}", self.mesh.dataset_group),
            format!(
                "DATASET_TIME=dataset-time-step:{},{}",
                self.mesh.dataset_group, self.mesh.timestep
            ),
            format!("EXTENT={} [{}]", self.mesh.extent, self.mesh.crs),
            format!("PIXEL_SIZE={}", self.mesh.resolution),
            format!("CRS_OUTPUT={}", self.mesh.crs),
            format!("OUTPUT={}", output.display()),
        ]
    }

    pub fn command(&self, mesh: &Path, output: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(["run", "native:meshrasterize", "--"])
            .args(self.parameters(mesh, output));
        command
    }
}

impl MeshRasterizer for QgisMeshRasterizer {
    fn rasterize(&self, mesh: &Path, output: &Path) -> Result<()> {
        run_tool(&mut self.command(mesh, output)).map_err(|e| TilesError::InvalidMesh {
            path: mesh.to_path_buf(),
            message: e.to_string(),
        })?;

        if !output.exists() {
            return Err(TilesError::InvalidMesh {
                path: mesh.to_path_buf(),
                message: format!("rasterizer produced no output at {}", output.display()),
            });
        }
        Ok(())
    }
}
