use std::process::ExitCode;

use api::{
	bootstrap,
	config::{Config, RelayArgs},
	error::StartupError,
};
use clap::Parser;
use tracing::{error, info, level_filters::LevelFilter};

/// Single exit point for every startup failure.
fn fatal(err: &StartupError) -> ExitCode {
	error!(stage = %err.stage(), kind = ?err.kind(), error = %err, "Relay startup failed");
	ExitCode::FAILURE
}

#[tokio::main]
async fn main() -> ExitCode {
	let args = RelayArgs::parse();

	let config = match Config::from_args(args) {
		Ok(config) => config,
		Err(err) => {
			// Logging settings are part of what failed to resolve
			if let Err(e) = common::logging::setup_logging(false, LevelFilter::INFO) {
				eprintln!("{:#}", e);
				eprintln!("relay startup failed at {}: {}", err.stage(), err);
				return ExitCode::FAILURE;
			}
			return fatal(&err);
		}
	};

	if let Err(e) = common::logging::setup_logging(config.log_json, config.log_level) {
		eprintln!("{:#}", e);
		return ExitCode::FAILURE;
	}

	info!("boost-relay {}", env!("CARGO_PKG_VERSION"));

	match bootstrap::run(config).await {
		Ok(()) => {
			info!("Relay stopped");
			ExitCode::SUCCESS
		}
		Err(err) => fatal(&err),
	}
}
