pub const NODE_SYNCING_ROUTE: &str = "eth/v1/node/syncing";

/// Upper bound on a single beacon API request
pub const BEACON_REQUEST_TIMEOUT_SECS: u64 = 30;
