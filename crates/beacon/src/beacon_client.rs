//! Minimal Beacon API client for checking node sync state
#![allow(async_fn_in_trait)]

use eyre::{Context, Result};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::constants::NODE_SYNCING_ROUTE;
use crate::types::{BeaconApiConfig, SyncStatus, SyncStatusResponse};

/// HTTP response containing status code and body
#[derive(Debug, Clone)]
pub struct HttpResponse {
	pub status: u16,
	pub body: Vec<u8>,
}

/// Trait for making HTTP requests (mockable for testing)
/// When test-utils feature is enabled, mockall will generate MockHttpClient
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
pub trait HttpClient: Send + Sync {
	/// Perform an HTTP GET request to the given URL
	async fn get(&self, url: &str) -> Result<HttpResponse>;
}

/// Production HTTP client implementation using reqwest
pub struct ReqwestClient {
	client: Client,
}

impl ReqwestClient {
	/// Create a new ReqwestClient with the given timeout
	pub fn new(timeout_secs: u64) -> Result<Self> {
		let client = Client::builder()
			.timeout(Duration::from_secs(timeout_secs))
			.build()
			.context("Failed to create HTTP client")?;
		Ok(Self { client })
	}
}

impl HttpClient for ReqwestClient {
	async fn get(&self, url: &str) -> Result<HttpResponse> {
		let response = self
			.client
			.get(url)
			.header("Accept", "application/json")
			.send()
			.await
			.with_context(|| format!("Failed to send request to {}", url))?;

		let status = response.status().as_u16();
		let body =
			response.bytes().await.with_context(|| format!("Failed to read response body from {}", url))?.to_vec();

		Ok(HttpResponse { status, body })
	}
}

/// Beacon API client bound to a single beacon node
pub struct BeaconApiClient<H: HttpClient> {
	http_client: Arc<H>,
	config: BeaconApiConfig,
}

// Manual Debug implementation since H might not implement Debug
impl<H: HttpClient> std::fmt::Debug for BeaconApiClient<H> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BeaconApiClient").field("config", &self.config).finish()
	}
}

// Manual Clone implementation since H might not implement Clone
impl<H: HttpClient> Clone for BeaconApiClient<H> {
	fn clone(&self) -> Self {
		Self { http_client: Arc::clone(&self.http_client), config: self.config.clone() }
	}
}

impl<H: HttpClient> BeaconApiClient<H> {
	/// Creates a new BeaconApiClient configured with the provided BeaconApiConfig and HTTP client.
	///
	/// # Errors
	///
	/// Returns an error if:
	/// - The endpoint is empty or not a valid URL
	/// - The request timeout is zero (would cause immediate timeouts)
	pub fn new(config: BeaconApiConfig, http_client: H) -> Result<Self> {
		if config.endpoint.trim().is_empty() {
			eyre::bail!("Beacon endpoint is not configured");
		}
		Url::parse(&config.endpoint).with_context(|| format!("Invalid beacon endpoint '{}'", config.endpoint))?;
		if config.request_timeout_secs == 0 {
			eyre::bail!("Request timeout must be greater than zero");
		}

		Ok(Self { http_client: Arc::new(http_client), config })
	}

	pub fn endpoint(&self) -> &str {
		&self.config.endpoint
	}

	/// Queries the node's sync status once.
	///
	/// A node that reports `is_syncing` is treated as an error, as are transport failures,
	/// non-200 responses and bodies that do not parse.
	pub async fn sync_status(&self) -> Result<SyncStatus> {
		let response: SyncStatusResponse = self.make_request(NODE_SYNCING_ROUTE).await?;
		let status = response.data;

		if status.is_syncing {
			eyre::bail!(
				"Beacon node is syncing (head slot {}, sync distance {})",
				status.head_slot,
				status.sync_distance
			);
		}

		Ok(status)
	}

	/// Perform an HTTP GET to `endpoint` on the configured beacon node, validate the response,
	/// and deserialize the JSON body into `T`.
	///
	/// # Errors
	///
	/// Returns an error if the request fails to send, the response status is not successful, or the response body cannot be parsed as `T`.
	async fn make_request<T>(&self, endpoint: &str) -> Result<T>
	where
		T: for<'de> Deserialize<'de>,
	{
		let base_url = self.config.endpoint.as_str();
		let url = if base_url.ends_with('/') {
			format!("{}{}", base_url, endpoint)
		} else {
			format!("{}/{}", base_url, endpoint)
		};

		debug!(url = %url, "Making beacon API request");

		let response =
			self.http_client.get(&url).await.with_context(|| format!("Failed to send request to {}", url))?;

		if response.status != 200 {
			let error_text = String::from_utf8(response.body.clone()).unwrap_or_else(|_| "Unknown error".to_string());
			eyre::bail!("Beacon API request failed with status {}: {}", response.status, error_text);
		}

		let result: T =
			serde_json::from_slice(&response.body).with_context(|| format!("Failed to parse response from {}", url))?;

		Ok(result)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::constants::BEACON_REQUEST_TIMEOUT_SECS;

	fn config(endpoint: &str) -> BeaconApiConfig {
		BeaconApiConfig { endpoint: endpoint.to_string(), request_timeout_secs: BEACON_REQUEST_TIMEOUT_SECS }
	}

	fn ok_response(is_syncing: bool) -> HttpResponse {
		let body = format!(
			r#"{{"data":{{"head_slot":"100","sync_distance":"{}","is_syncing":{}}}}}"#,
			if is_syncing { 64 } else { 0 },
			is_syncing
		);
		HttpResponse { status: 200, body: body.into_bytes() }
	}

	#[test]
	fn test_new_rejects_empty_endpoint() {
		let result = BeaconApiClient::new(config(""), MockHttpClient::new());
		assert!(result.is_err());
	}

	#[test]
	fn test_new_rejects_invalid_url() {
		let result = BeaconApiClient::new(config("not a url"), MockHttpClient::new());
		assert!(result.is_err());
	}

	#[test]
	fn test_new_rejects_zero_timeout() {
		let mut cfg = config("http://localhost:5052");
		cfg.request_timeout_secs = 0;
		assert!(BeaconApiClient::new(cfg, MockHttpClient::new()).is_err());
	}

	#[tokio::test]
	async fn test_sync_status_synced() {
		let mut http = MockHttpClient::new();
		http.expect_get()
			.withf(|url| url == "http://localhost:5052/eth/v1/node/syncing")
			.times(1)
			.returning(|_| Ok(ok_response(false)));

		let client = BeaconApiClient::new(config("http://localhost:5052"), http).unwrap();
		let status = client.sync_status().await.unwrap();
		assert_eq!(status.head_slot, 100);
		assert!(!status.is_syncing);
	}

	#[tokio::test]
	async fn test_sync_status_trailing_slash_endpoint() {
		let mut http = MockHttpClient::new();
		http.expect_get()
			.withf(|url| url == "http://localhost:5052/eth/v1/node/syncing")
			.times(1)
			.returning(|_| Ok(ok_response(false)));

		let client = BeaconApiClient::new(config("http://localhost:5052/"), http).unwrap();
		assert!(client.sync_status().await.is_ok());
	}

	#[tokio::test]
	async fn test_sync_status_syncing_is_error() {
		let mut http = MockHttpClient::new();
		http.expect_get().times(1).returning(|_| Ok(ok_response(true)));

		let client = BeaconApiClient::new(config("http://localhost:5052"), http).unwrap();
		let err = client.sync_status().await.unwrap_err();
		assert!(err.to_string().contains("syncing"));
	}

	#[tokio::test]
	async fn test_sync_status_non_200() {
		let mut http = MockHttpClient::new();
		http.expect_get()
			.times(1)
			.returning(|_| Ok(HttpResponse { status: 503, body: b"not ready".to_vec() }));

		let client = BeaconApiClient::new(config("http://localhost:5052"), http).unwrap();
		let err = client.sync_status().await.unwrap_err();
		assert!(err.to_string().contains("503"));
	}

	#[tokio::test]
	async fn test_sync_status_malformed_body() {
		let mut http = MockHttpClient::new();
		http.expect_get().times(1).returning(|_| Ok(HttpResponse { status: 200, body: b"{}".to_vec() }));

		let client = BeaconApiClient::new(config("http://localhost:5052"), http).unwrap();
		assert!(client.sync_status().await.is_err());
	}

	#[tokio::test]
	async fn test_sync_status_unreachable() {
		let mut http = MockHttpClient::new();
		http.expect_get().times(1).returning(|_| Err(eyre::eyre!("connection refused")));

		let client = BeaconApiClient::new(config("http://localhost:5052"), http).unwrap();
		let err = client.sync_status().await.unwrap_err();
		assert!(format!("{:#}", err).contains("connection refused"));
	}
}
