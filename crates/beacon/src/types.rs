pub use alloy::rpc::types::beacon::node::SyncStatus;
use serde::{Deserialize, Serialize};

/// Configuration for Beacon API integration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeaconApiConfig {
	/// Beacon node endpoint, e.g. `http://localhost:5052`
	pub endpoint: String,
	/// Request timeout in seconds
	pub request_timeout_secs: u64,
}

/// Envelope of `/eth/v1/node/syncing`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncStatusResponse {
	pub data: SyncStatus,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_sync_status_parsing() {
		let body = r#"{"data":{"head_slot":"8000123","sync_distance":"0","is_syncing":false,"is_optimistic":false,"el_offline":false}}"#;
		let response: SyncStatusResponse = serde_json::from_str(body).unwrap();
		assert_eq!(response.data.head_slot, 8_000_123);
		assert_eq!(response.data.sync_distance, 0);
		assert!(!response.data.is_syncing);
		assert!(!response.data.el_offline);
	}

	#[test]
	fn test_sync_status_optional_fields_missing() {
		let body = r#"{"data":{"head_slot":"1","sync_distance":"5","is_syncing":true}}"#;
		let response: SyncStatusResponse = serde_json::from_str(body).unwrap();
		assert!(response.data.is_syncing);
		assert!(!response.data.is_optimistic);
	}

	#[test]
	fn test_sync_status_unquoted_slot_rejected() {
		let body = r#"{"data":{"head_slot":1,"sync_distance":"0","is_syncing":false}}"#;
		assert!(serde_json::from_str::<SyncStatusResponse>(body).is_err());
	}
}
