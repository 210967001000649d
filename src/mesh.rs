//! Mesh file inspection.
//!
//! Before regridding, every dimension of the NetCDF mesh file is checked; a
//! zero-size dimension means the model run wrote no data and the conversion
//! is skipped. By default the header is read with `ncdump -h`. With the
//! `netcdf` feature the file is opened directly.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Result, TilesError};
use crate::tools::run_tool;

/// A named dimension and its current length
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshDimension {
    pub name: String,
    pub size: usize,
}

/// Lists the dimensions of a mesh file
pub trait MeshInspector {
    fn dimensions(&self, mesh: &Path) -> Result<Vec<MeshDimension>>;
}

/// First dimension with size zero, if any
pub fn find_empty_dimension(dimensions: &[MeshDimension]) -> Option<&MeshDimension> {
    dimensions.iter().find(|d| d.size == 0)
}

/// Reads dimensions from `ncdump -h` output
#[derive(Debug, Clone)]
pub struct NcdumpInspector {
    program: PathBuf,
}

impl NcdumpInspector {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl MeshInspector for NcdumpInspector {
    fn dimensions(&self, mesh: &Path) -> Result<Vec<MeshDimension>> {
        let mut command = Command::new(&self.program);
        command.arg("-h").arg(mesh);

        let output = run_tool(&mut command).map_err(|e| TilesError::InvalidMesh {
            path: mesh.to_path_buf(),
            message: e.to_string(),
        })?;
        parse_ncdump_dimensions(&output.stdout).map_err(|message| TilesError::InvalidMesh {
            path: mesh.to_path_buf(),
            message,
        })
    }
}

/// Parse the `dimensions:` section of an `ncdump -h` header.
///
/// Handles both `node = 1813443 ;` and the unlimited form
/// `time = UNLIMITED ; // (1 currently)`.
pub fn parse_ncdump_dimensions(header: &str) -> std::result::Result<Vec<MeshDimension>, String> {
    let mut lines = header.lines().skip_while(|line| line.trim() != "dimensions:");
    if lines.next().is_none() {
        return Err("no dimensions section in header".to_string());
    }

    let mut dimensions = Vec::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.ends_with(':') || line.starts_with('}') {
            break;
        }
        dimensions.push(parse_dimension_line(line)?);
    }
    Ok(dimensions)
}

fn parse_dimension_line(line: &str) -> std::result::Result<MeshDimension, String> {
    let (name, rest) = line
        .split_once('=')
        .ok_or_else(|| format!("malformed dimension line: {}", line))?;
    let name = name.trim().to_string();
    let rest = rest.trim();

    let size = if rest.starts_with("UNLIMITED") {
        // UNLIMITED ; // (N currently)
        rest.split_once('(')
            .and_then(|(_, tail)| tail.split_whitespace().next())
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| format!("malformed unlimited dimension: {}", line))?
    } else {
        rest.trim_end_matches(';')
            .trim()
            .parse()
            .map_err(|_| format!("malformed dimension size: {}", line))?
    };

    Ok(MeshDimension { name, size })
}

/// Opens the mesh with the NetCDF library
#[cfg(feature = "netcdf")]
#[derive(Debug, Clone, Default)]
pub struct NetcdfInspector;

#[cfg(feature = "netcdf")]
impl MeshInspector for NetcdfInspector {
    fn dimensions(&self, mesh: &Path) -> Result<Vec<MeshDimension>> {
        let file = netcdf::open(mesh)?;
        Ok(file
            .dimensions()
            .map(|d| MeshDimension {
                name: d.name(),
                size: d.len(),
            })
            .collect())
    }
}

/// Inspector for this build: the NetCDF library when compiled in, `ncdump` otherwise
#[cfg_attr(feature = "netcdf", allow(unused_variables))]
pub fn default_inspector(ncdump: &Path) -> Box<dyn MeshInspector> {
    #[cfg(feature = "netcdf")]
    {
        Box::new(NetcdfInspector)
    }
    #[cfg(not(feature = "netcdf"))]
    {
        Box::new(NcdumpInspector::new(ncdump))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HEADER: &str = "netcdf maxele.63 {
dimensions:
\ttime = UNLIMITED ; // (1 currently)
\tnode = 1813443 ;
\tnele = 3564104 ;
\tnvertex = 3 ;
variables:
\tdouble time(time) ;
}
";

    fn dim(name: &str, size: usize) -> MeshDimension {
        MeshDimension {
            name: name.to_string(),
            size,
        }
    }

    #[test]
    fn test_parse_ncdump_dimensions() {
        let dims = parse_ncdump_dimensions(HEADER).unwrap();
        assert_eq!(
            dims,
            vec![
                dim("time", 1),
                dim("node", 1813443),
                dim("nele", 3564104),
                dim("nvertex", 3),
            ]
        );
        assert!(find_empty_dimension(&dims).is_none());
    }

    #[test]
    fn test_empty_unlimited_dimension_detected() {
        let header = HEADER.replace("(1 currently)", "(0 currently)");
        let dims = parse_ncdump_dimensions(&header).unwrap();
        assert_eq!(find_empty_dimension(&dims), Some(&dim("time", 0)));
    }

    #[test]
    fn test_malformed_headers() {
        assert!(parse_ncdump_dimensions("netcdf x {\n}\n").is_err());
        assert!(parse_ncdump_dimensions("dimensions:\n\tnode = many ;\n").is_err());
        assert!(parse_ncdump_dimensions("dimensions:\n\tnode 12 ;\n").is_err());
    }

    #[test]
    fn test_header_without_variables_section() {
        let dims = parse_ncdump_dimensions("netcdf x {\ndimensions:\n\tnode = 0 ;\n}\n").unwrap();
        assert_eq!(dims, vec![dim("node", 0)]);
    }

    #[test]
    fn test_ncdump_failure_is_invalid_mesh() {
        let inspector = NcdumpInspector::new("/nonexistent/ncdump");
        let err = inspector.dimensions(Path::new("maxele.63.nc")).unwrap_err();
        assert!(matches!(err, TilesError::InvalidMesh { .. }));
    }

    #[test]
    fn test_default_inspector_reports_unreadable_mesh() {
        let inspector = default_inspector(Path::new("/nonexistent/ncdump"));
        assert!(inspector
            .dimensions(Path::new("/nonexistent/maxele.63.nc"))
            .is_err());
    }
}
