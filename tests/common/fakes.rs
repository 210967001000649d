//! In-process stand-ins for the external GIS programs.
//!
//! Each fake writes placeholder output files where the real tool would and
//! records what it was asked to do.

use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};

use adcirc_tiles::mesh::{MeshDimension, MeshInspector};
use adcirc_tiles::tools::{
    MeshRasterizer, RasterStyler, StyleRequest, TileGenerator, TileRequest,
};
use adcirc_tiles::{Histogram, Result, TilesError};

/// Reports a fixed set of dimensions
pub struct FakeInspector {
    pub dimensions: Vec<MeshDimension>,
}

impl FakeInspector {
    /// A typical ADCIRC maximum-elevation file
    pub fn adcirc() -> Self {
        Self::with_sizes(&[("time", 1), ("node", 1813443), ("nele", 3564104), ("nvertex", 3)])
    }

    pub fn with_sizes(sizes: &[(&str, usize)]) -> Self {
        Self {
            dimensions: sizes
                .iter()
                .map(|&(name, size)| MeshDimension {
                    name: name.to_string(),
                    size,
                })
                .collect(),
        }
    }
}

impl MeshInspector for FakeInspector {
    fn dimensions(&self, _mesh: &Path) -> Result<Vec<MeshDimension>> {
        Ok(self.dimensions.clone())
    }
}

/// Writes a placeholder raster, or fails like a mesh QGIS cannot open
#[derive(Default)]
pub struct FakeRasterizer {
    pub fail: bool,
    pub calls: RefCell<Vec<(PathBuf, PathBuf)>>,
}

impl FakeRasterizer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl MeshRasterizer for FakeRasterizer {
    fn rasterize(&self, mesh: &Path, output: &Path) -> Result<()> {
        self.calls
            .borrow_mut()
            .push((mesh.to_path_buf(), output.to_path_buf()));
        if self.fail {
            return Err(TilesError::InvalidMesh {
                path: mesh.to_path_buf(),
                message: "Invalid mesh".to_string(),
            });
        }
        fs::write(output, b"float64 raster")?;
        Ok(())
    }
}

/// Serves a canned histogram and writes a placeholder styled raster.
/// Computing the histogram leaves an `.aux.xml` sidecar, as gdalinfo does.
pub struct FakeStyler {
    pub histogram: Histogram,
    pub histogram_calls: Cell<usize>,
    pub requests: RefCell<Vec<StyleRequest>>,
}

impl FakeStyler {
    pub fn new(histogram: Histogram) -> Self {
        Self {
            histogram,
            histogram_calls: Cell::new(0),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Bins over [0, 6) with counts 1, 10, 20, 15, 6, 0
    pub fn example() -> Self {
        Self::new(Histogram::new(0.0, 6.0, vec![1, 10, 20, 15, 6, 0]).unwrap())
    }

    pub fn last_request(&self) -> StyleRequest {
        self.requests.borrow().last().cloned().unwrap()
    }
}

impl RasterStyler for FakeStyler {
    fn histogram(&self, raster: &Path) -> Result<Histogram> {
        self.histogram_calls.set(self.histogram_calls.get() + 1);
        let mut sidecar = raster.as_os_str().to_owned();
        sidecar.push(".aux.xml");
        fs::write(PathBuf::from(sidecar), b"<PAMDataset/>")?;
        Ok(self.histogram.clone())
    }

    fn style(&self, request: &StyleRequest) -> Result<()> {
        self.requests.borrow_mut().push(request.clone());
        fs::write(&request.output, b"8-bit raster")?;
        Ok(())
    }
}

/// Writes a placeholder archive, or fails like a crashed tiler
#[derive(Default)]
pub struct FakeTileGenerator {
    pub fail: bool,
    pub requests: RefCell<Vec<TileRequest>>,
    /// Whether the output already existed when each request arrived
    pub output_existed: RefCell<Vec<bool>>,
}

impl FakeTileGenerator {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

impl TileGenerator for FakeTileGenerator {
    fn generate(&self, request: &TileRequest) -> Result<()> {
        self.requests.borrow_mut().push(request.clone());
        self.output_existed
            .borrow_mut()
            .push(request.output.exists());
        if self.fail {
            return Err(TilesError::ExternalTool {
                tool: "python".to_string(),
                message: "exit status: 1".to_string(),
            });
        }
        fs::write(&request.output, b"SQLite format 3")?;
        Ok(())
    }
}
