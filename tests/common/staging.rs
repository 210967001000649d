//! Scratch input, output and final directories for pipeline runs.

use std::fs;
use std::path::{Path, PathBuf};

use adcirc_tiles::{GeotiffArgs, MbtilesArgs};

/// A temporary tree with the three directories the programs work in.
/// Only the input directory exists up front.
pub struct Staging {
    root: tempfile::TempDir,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub final_dir: PathBuf,
}

impl Staging {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let input_dir = root.path().join("input");
        fs::create_dir(&input_dir).unwrap();
        Self {
            output_dir: root.path().join("output"),
            final_dir: root.path().join("final"),
            input_dir,
            root,
        }
    }

    /// The temporary directory holding the three work directories
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Write an input file with placeholder contents
    pub fn add_input(&self, name: &str) -> PathBuf {
        let path = self.input_dir.join(name);
        fs::write(&path, b"placeholder").unwrap();
        path
    }

    pub fn geotiff_args(&self, input_file: &str) -> GeotiffArgs {
        GeotiffArgs {
            input_file: input_file.to_string(),
            input_dir: self.input_dir.clone(),
            output_dir: self.output_dir.clone(),
            final_dir: self.final_dir.clone(),
        }
    }

    pub fn mbtiles_args(&self, input_file: &str, zlstart: u32, zlstop: u32, cpu: u32) -> MbtilesArgs {
        MbtilesArgs {
            input_file: input_file.to_string(),
            zlstart,
            zlstop,
            cpu,
            input_dir: self.input_dir.clone(),
            output_dir: self.output_dir.clone(),
            final_dir: self.final_dir.clone(),
        }
    }
}

/// Sorted file names in `dir`, empty when it does not exist
pub fn list_dir(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
