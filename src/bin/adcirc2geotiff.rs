//! adcirc2geotiff - regrid an ADCIRC mesh file into a styled GeoTIFF and a
//! colorbar legend.

use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info, info_span};

use adcirc_tiles::logging::{
    generate_run_id, init_tracing, log_dir, log_error, log_operation_end, log_operation_start,
};
use adcirc_tiles::pipeline::{run_adcirc2geotiff, GeotiffOutputs, Outcome};
use adcirc_tiles::config::DEFAULT_LOG_LEVEL;
use adcirc_tiles::{Config, GeotiffArgs, TilesError};

const LOG_FILE: &str = "adcirc2geotiff_vmbtiles.log";

fn main() -> ExitCode {
    let args = GeotiffArgs::parse();

    let loaded = Config::load().and_then(|config| config.validate().map(|_| config));
    let log_level = loaded
        .as_ref()
        .map(|config| config.log_level.as_str())
        .unwrap_or(DEFAULT_LOG_LEVEL);

    let _guard = match init_tracing(log_level, &log_dir(), LOG_FILE) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            if let Err(config_error) = &loaded {
                eprintln!("Configuration error: {}", config_error);
            }
            return ExitCode::FAILURE;
        }
    };

    let run_id = generate_run_id();
    let span = info_span!("adcirc2geotiff", run_id = %run_id);
    let _entered = span.enter();

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            log_error(&e, "Loading configuration");
            return ExitCode::FAILURE;
        }
    };

    info!("Starting adcirc2geotiff v{}", env!("CARGO_PKG_VERSION"));
    log_operation_start("adcirc2geotiff", Some(args.input_file.as_str()));
    let start = Instant::now();

    match run(&config, &args) {
        Ok(Outcome::Completed(outputs)) => {
            info!(
                raw_tiff = %outputs.raw_tiff.display(),
                styled_tiff = %outputs.styled_tiff.display(),
                colorbar = %outputs.colorbar.display(),
                "Conversion finished"
            );
            log_operation_end("adcirc2geotiff", start, true);
            ExitCode::SUCCESS
        }
        Ok(Outcome::Skipped(reason)) => {
            info!(reason = %reason, "Nothing to convert");
            log_operation_end("adcirc2geotiff", start, false);
            ExitCode::SUCCESS
        }
        Err(e) => {
            match e.downcast_ref::<TilesError>() {
                Some(tiles_error) => log_error(tiles_error, &format!("{:#}", e)),
                None => error!("{:#}", e),
            }
            log_operation_end("adcirc2geotiff", start, false);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, args: &GeotiffArgs) -> anyhow::Result<Outcome<GeotiffOutputs>> {
    run_adcirc2geotiff(config, args).with_context(|| {
        format!(
            "Failed to convert {}",
            args.input_dir.join(&args.input_file).display()
        )
    })
}
