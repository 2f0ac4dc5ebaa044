use eyre::{Result, bail};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Parse an operator supplied log level.
///
/// Accepts `trace, debug, info, warn/warning, error, fatal, panic`. The last two have no
/// tracing equivalent and collapse to `error`.
pub fn parse_log_level(level: &str) -> Result<LevelFilter> {
	let filter = match level.trim().to_ascii_lowercase().as_str() {
		"trace" => LevelFilter::TRACE,
		"debug" => LevelFilter::DEBUG,
		"info" => LevelFilter::INFO,
		"warn" | "warning" => LevelFilter::WARN,
		"error" | "fatal" | "panic" => LevelFilter::ERROR,
		other => bail!("unknown log level '{}'", other),
	};
	Ok(filter)
}

/// Install the global tracing subscriber.
///
/// `json` switches the formatter to one JSON object per line, otherwise the plain text
/// formatter is used.
pub fn setup_logging(json: bool, level: LevelFilter) -> Result<()> {
	let filter = EnvFilter::builder().with_default_directive(level.into()).parse_lossy("");

	let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

	let result = if json { builder.json().try_init() } else { builder.try_init() };
	result.map_err(|e| eyre::eyre!("Failed to install tracing subscriber: {}", e))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_log_level_known_names() {
		assert_eq!(parse_log_level("trace").unwrap(), LevelFilter::TRACE);
		assert_eq!(parse_log_level("debug").unwrap(), LevelFilter::DEBUG);
		assert_eq!(parse_log_level("info").unwrap(), LevelFilter::INFO);
		assert_eq!(parse_log_level("INFO").unwrap(), LevelFilter::INFO);
		assert_eq!(parse_log_level("warn").unwrap(), LevelFilter::WARN);
		assert_eq!(parse_log_level("warning").unwrap(), LevelFilter::WARN);
		assert_eq!(parse_log_level("error").unwrap(), LevelFilter::ERROR);
	}

	#[test]
	fn test_parse_log_level_fatal_and_panic_map_to_error() {
		assert_eq!(parse_log_level("fatal").unwrap(), LevelFilter::ERROR);
		assert_eq!(parse_log_level("panic").unwrap(), LevelFilter::ERROR);
	}

	#[test]
	fn test_parse_log_level_rejects_unknown() {
		assert!(parse_log_level("verbose").is_err());
		assert!(parse_log_level("").is_err());
	}
}
