/// Builder API status endpoint
pub const STATUS: &str = "/eth/v1/builder/status";

/// Validator registration endpoint
pub const REGISTER_VALIDATORS: &str = "/eth/v1/builder/validators";

/// Header request endpoint
pub const GET_HEADER: &str = "/eth/v1/builder/header/{slot}/{parent_hash}/{pubkey}";

/// Prometheus metrics, only mounted when profiling endpoints are enabled
pub const DEBUG_METRICS: &str = "/debug/metrics";
