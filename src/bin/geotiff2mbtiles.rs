//! geotiff2mbtiles - build an MBTiles tile archive from a styled GeoTIFF.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info, info_span};

use adcirc_tiles::logging::{
    generate_run_id, init_tracing, log_dir, log_error, log_operation_end, log_operation_start,
};
use adcirc_tiles::pipeline::{run_geotiff2mbtiles, Outcome};
use adcirc_tiles::config::DEFAULT_LOG_LEVEL;
use adcirc_tiles::{Config, MbtilesArgs, TilesError};

const LOG_FILE: &str = "geotiff2mbtiles.log";

fn main() -> ExitCode {
    let args = MbtilesArgs::parse();

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
    let span = info_span!("geotiff2mbtiles", run_id = %run_id);
    let _entered = span.enter();

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            log_error(&e, "Loading configuration");
            return ExitCode::FAILURE;
        }
    };

    info!("Starting geotiff2mbtiles v{}", env!("CARGO_PKG_VERSION"));
    let details = format!(
        "{} zoom {}-{} on {} CPUs",
        args.input_file, args.zlstart, args.zlstop, args.cpu
    );
    log_operation_start("geotiff2mbtiles", Some(details.as_str()));
    let start = Instant::now();

    match run(&config, &args) {
        Ok(Outcome::Completed(archive)) => {
            info!(archive = %archive.display(), "Mbtiles file created");
            log_operation_end("geotiff2mbtiles", start, true);
            ExitCode::SUCCESS
        }
        Ok(Outcome::Skipped(reason)) => {
            info!(reason = %reason, "Nothing to tile");
            log_operation_end("geotiff2mbtiles", start, false);
            ExitCode::SUCCESS
        }
        Err(e) => {
            match e.downcast_ref::<TilesError>() {
                Some(tiles_error) => log_error(tiles_error, &format!("{:#}", e)),
                None => error!("{:#}", e),
            }
            log_operation_end("geotiff2mbtiles", start, false);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, args: &MbtilesArgs) -> anyhow::Result<Outcome<PathBuf>> {
    run_geotiff2mbtiles(config, args).with_context(|| {
        format!(
            "Failed to tile {}",
            args.input_dir.join(&args.input_file).display()
        )
    })
}
