//! GeoTIFF to MBTiles archive.

use std::fs;
use std::path::PathBuf;
use tracing::info;

use super::Outcome;
use crate::config::{Config, MbtilesArgs};
use crate::error::Result;
use crate::layout::{make_dirs, move_into, FileStem};
use crate::logging::log_timed_operation;
use crate::tools::{Gdal2Mbtiles, TileGenerator, TileRequest, ZoomRange};

/// The geotiff2mbtiles steps over a pluggable tile generator
pub struct MbtilesPipeline<'a> {
    generator: &'a dyn TileGenerator,
}

impl<'a> MbtilesPipeline<'a> {
    pub fn new(generator: &'a dyn TileGenerator) -> Self {
        Self { generator }
    }

    /// Returns the archive path in the final directory
    pub fn run(&self, args: &MbtilesArgs) -> Result<Outcome<PathBuf>> {
        let input = args.input_dir.join(args.input_file.trim());

        if !input.exists() {
            let reason = format!("{} does not exist", input.display());
            info!(reason = %reason, "Skipping");
            return Ok(Outcome::Skipped(reason));
        }

        let stem = FileStem::parse(&args.input_file)?;

        let zoom = ZoomRange::new(args.zlstart, args.zlstop)?;
        info!(
            input = %input.display(),
            zoom = %zoom,
            cpu = args.cpu,
            "Creating mbtiles file"
        );

        make_dirs(&args.output_dir)?;

        let output = args.output_dir.join(stem.mbtiles(zoom));
        if output.exists() {
            fs::remove_file(&output)?;
            info!(path = %output.display(), "Removed old mbtiles file");
        }

        let request = TileRequest {
            input,
            output: output.clone(),
            zoom,
            processes: args.cpu,
        };
        log_timed_operation("tile", || self.generator.generate(&request))?;

        make_dirs(&args.final_dir)?;
        let archive = move_into(&output, &args.final_dir)?;

        Ok(Outcome::Completed(archive))
    }
}

/// Run geotiff2mbtiles with the generator named in `config`
pub fn run_geotiff2mbtiles(config: &Config, args: &MbtilesArgs) -> Result<Outcome<PathBuf>> {
    let generator = Gdal2Mbtiles::new(&config.tools.python, &config.tools.gdal2mbtiles);
    MbtilesPipeline::new(&generator).run(args)
}
