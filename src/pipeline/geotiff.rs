//! ADCIRC mesh to styled GeoTIFF and colorbar.

use std::path::PathBuf;
use tracing::info;

use super::Outcome;
use crate::classify::RangeSource;
use crate::colormaps::ColorRamp;
use crate::config::{Config, GeotiffArgs};
use crate::error::Result;
use crate::layout::{make_dirs, move_into, remove_sidecar, FileStem};
use crate::legend::write_colorbar;
use crate::logging::{log_ramp_summary, log_timed_operation};
use crate::mesh::{default_inspector, find_empty_dimension, MeshInspector};
use crate::tools::{
    GdalRasterTools, MeshRasterizer, QgisMeshRasterizer, RasterStyler, StyleRequest,
};

/// Files produced by a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct GeotiffOutputs {
    /// Float raster, moved to the final directory
    pub raw_tiff: PathBuf,
    /// Styled raster, left in the output directory for tiling
    pub styled_tiff: PathBuf,
    /// Legend image, moved to the final directory
    pub colorbar: PathBuf,
    pub ramp: ColorRamp,
}

/// The adcirc2geotiff steps over pluggable collaborators
pub struct GeotiffPipeline<'a> {
    config: &'a Config,
    inspector: &'a dyn MeshInspector,
    rasterizer: &'a dyn MeshRasterizer,
    styler: &'a dyn RasterStyler,
}

impl<'a> GeotiffPipeline<'a> {
    pub fn new(
        config: &'a Config,
        inspector: &'a dyn MeshInspector,
        rasterizer: &'a dyn MeshRasterizer,
        styler: &'a dyn RasterStyler,
    ) -> Self {
        Self {
            config,
            inspector,
            rasterizer,
            styler,
        }
    }

    pub fn run(&self, args: &GeotiffArgs) -> Result<Outcome<GeotiffOutputs>> {
        let input = args.input_dir.join(args.input_file.trim());

        if !input.exists() {
            let reason = format!("{} does not exist", input.display());
            info!(reason = %reason, "Skipping");
            return Ok(Outcome::Skipped(reason));
        }

        let stem = FileStem::parse(&args.input_file)?;
        let profile = self.config.profile(stem.variable())?;
        let mode = self.config.classification_mode()?;

        make_dirs(&args.output_dir)?;

        let dimensions = self.inspector.dimensions(&input)?;
        if let Some(empty) = find_empty_dimension(&dimensions) {
            let reason = format!(
                "{} has an invalid dimension value of 0 ({})",
                input.display(),
                empty.name
            );
            info!(reason = %reason, "Skipping");
            return Ok(Outcome::Skipped(reason));
        }

        let raw_tiff = args.output_dir.join(stem.raw_tiff());
        log_timed_operation("rasterize", || {
            self.rasterizer.rasterize(&input, &raw_tiff)
        })?;

        let source = match profile.range {
            Some(range) => RangeSource::Fixed(range),
            None => RangeSource::Histogram(self.styler.histogram(&raw_tiff)?),
        };
        let range = source.effective_range(self.config.noise_threshold, mode)?;
        info!(
            variable = stem.variable(),
            classification = %mode,
            range = %range,
            "Range classified"
        );

        let ramp = ColorRamp::build(mode, range, self.config.span_rule, &profile.palette)?;
        log_ramp_summary(stem.variable(), &ramp);

        let styled_tiff = args.output_dir.join(stem.styled_tiff());
        let request = StyleRequest {
            input: raw_tiff.clone(),
            output: styled_tiff.clone(),
            kind: ramp.kind(),
            stops: ramp.shader_stops(source.raster_bounds()),
            opacity: self.config.opacity,
        };
        log_timed_operation("style", || self.styler.style(&request))?;

        let colorbar = args.output_dir.join(stem.colorbar());
        log_timed_operation("colorbar", || {
            write_colorbar(
                &colorbar,
                &ramp.values(),
                &ramp,
                profile.unit,
                &self.config.legend,
            )
        })?;

        make_dirs(&args.final_dir)?;
        remove_sidecar(&raw_tiff)?;
        let raw_tiff = move_into(&raw_tiff, &args.final_dir)?;
        let colorbar = move_into(&colorbar, &args.final_dir)?;

        Ok(Outcome::Completed(GeotiffOutputs {
            raw_tiff,
            styled_tiff,
            colorbar,
            ramp,
        }))
    }
}

/// Run adcirc2geotiff with the external tools named in `config`
pub fn run_adcirc2geotiff(config: &Config, args: &GeotiffArgs) -> Result<Outcome<GeotiffOutputs>> {
    let inspector = default_inspector(&config.tools.ncdump);
    let rasterizer = QgisMeshRasterizer::new(&config.tools.qgis_process, config.mesh.clone());
    let styler = GdalRasterTools::new(&config.tools.gdalinfo, &config.tools.gdaldem);

    GeotiffPipeline::new(config, inspector.as_ref(), &rasterizer, &styler).run(args)
}
