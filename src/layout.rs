//! File naming conventions and staging-directory moves.
//!
//! Input names look like `<variable>.<sequence>.<ext>` (`maxele.63.nc`); every
//! derived file name keeps those first two dot-separated parts.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Result, TilesError};
use crate::tools::ZoomRange;

/// The `<variable>.<sequence>` prefix shared by every output of one input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStem {
    variable: String,
    sequence: String,
}

impl FileStem {
    pub fn parse(file_name: &str) -> Result<Self> {
        let file_name = file_name.trim();
        let mut parts = file_name.split('.');
        match (parts.next(), parts.next()) {
            (Some(variable), Some(sequence)) if !variable.is_empty() && !sequence.is_empty() => {
                Ok(Self {
                    variable: variable.to_string(),
                    sequence: sequence.to_string(),
                })
            }
            _ => Err(TilesError::InvalidParameter {
                param: "inputFile".to_string(),
                message: format!(
                    "expected a name like <variable>.<sequence>.<ext>, got {}",
                    file_name
                ),
            }),
        }
    }

    /// Variable name, the key of its profile
    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    /// Regridded float raster: `maxele.raw.63.tif`
    pub fn raw_tiff(&self) -> String {
        format!("{}.raw.{}.tif", self.variable, self.sequence)
    }

    /// Styled 8-bit raster: `maxele.63.tif`
    pub fn styled_tiff(&self) -> String {
        format!("{}.{}.tif", self.variable, self.sequence)
    }

    /// Legend image: `maxele.63.colorbar.png`
    pub fn colorbar(&self) -> String {
        format!("{}.{}.colorbar.png", self.variable, self.sequence)
    }

    /// Tile archive: `maxele.63.0.9.mbtiles`
    pub fn mbtiles(&self, zoom: ZoomRange) -> String {
        format!(
            "{}.{}.{}.{}.mbtiles",
            self.variable,
            self.sequence,
            zoom.start(),
            zoom.stop()
        )
    }
}

/// Create `dir` and its parents if missing
pub fn make_dirs(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        info!(dir = %dir.display(), "Directory already made");
    } else {
        fs::create_dir_all(dir)?;
        info!(dir = %dir.display(), "Made directory");
    }
    Ok(())
}

/// Move `file` into `dir`, keeping its name. Falls back to copy and remove
/// when a rename is not possible (different filesystems).
pub fn move_into(file: &Path, dir: &Path) -> Result<PathBuf> {
    let name = file.file_name().ok_or_else(|| TilesError::InvalidParameter {
        param: "file".to_string(),
        message: format!("{} has no file name", file.display()),
    })?;
    let target = dir.join(name);

    if let Err(e) = fs::rename(file, &target) {
        debug!(
            from = %file.display(),
            to = %target.display(),
            error = %e,
            "Rename failed, copying instead"
        );
        fs::copy(file, &target)?;
        fs::remove_file(file)?;
    }

    info!(from = %file.display(), to = %target.display(), "Moved file");
    Ok(target)
}

/// Remove the `.aux.xml` statistics sidecar GDAL leaves next to a raster
pub fn remove_sidecar(raster: &Path) -> Result<bool> {
    let mut sidecar = raster.as_os_str().to_owned();
    sidecar.push(".aux.xml");
    let sidecar = PathBuf::from(sidecar);

    if sidecar.exists() {
        fs::remove_file(&sidecar)?;
        info!(path = %sidecar.display(), "Removed aux.xml file");
        Ok(true)
    } else {
        debug!(path = %sidecar.display(), "No aux.xml file to remove");
        Ok(false)
    }
}
