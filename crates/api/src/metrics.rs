use std::time::Instant;

use lazy_static::lazy_static;
use prometheus::{
	Encoder, HistogramVec, IntCounterVec, Registry, TextEncoder, register_histogram_vec_with_registry,
	register_int_counter_vec_with_registry,
};

pub const SERVER_REGISTRY_NAME: &str = "relay_api";

lazy_static! {
	pub static ref RELAY_SERVER_METRICS_REGISTRY: Registry =
		Registry::new_custom(Some(SERVER_REGISTRY_NAME.to_string()), None).unwrap();
	pub static ref RELAY_SERVER_REQUESTS_TOTAL: IntCounterVec =
		register_int_counter_vec_with_registry!(
			"http_requests_total",
			"Total number of HTTP requests",
			&["endpoint", "method"],
			RELAY_SERVER_METRICS_REGISTRY
		)
		.unwrap();
	pub static ref RELAY_SERVER_RESPONSES_TOTAL: IntCounterVec =
		register_int_counter_vec_with_registry!(
			"http_responses_total",
			"Total number of HTTP responses by status",
			&["endpoint", "method", "status"],
			RELAY_SERVER_METRICS_REGISTRY
		)
		.unwrap();
	pub static ref RELAY_SERVER_REQUEST_LATENCY_SECONDS: HistogramVec =
		register_histogram_vec_with_registry!(
			"http_request_duration_seconds",
			"Request latency in seconds",
			&["endpoint", "method"],
			RELAY_SERVER_METRICS_REGISTRY
		)
		.unwrap();
	pub static ref RELAY_REGISTRATIONS_TOTAL: IntCounterVec =
		register_int_counter_vec_with_registry!(
			"validator_registrations_total",
			"Validator registrations processed by outcome",
			&["outcome"],
			RELAY_SERVER_METRICS_REGISTRY
		)
		.unwrap();
}

/// Records requests, responses and latency for one endpoint.
#[derive(Clone, Copy)]
pub struct HttpMetrics {
	pub requests: &'static IntCounterVec,
	pub responses: &'static IntCounterVec,
	pub latency: &'static HistogramVec,
}

impl HttpMetrics {
	pub fn start(&self, endpoint: &'static str, method: &'static str) -> Instant {
		self.requests.with_label_values(&[endpoint, method]).inc();
		Instant::now()
	}

	pub fn finish_status(&self, endpoint: &'static str, method: &'static str, status: u16, start: Instant) {
		let status = status.to_string();
		self.latency.with_label_values(&[endpoint, method]).observe(start.elapsed().as_secs_f64());
		self.responses.with_label_values(&[endpoint, method, status.as_str()]).inc();
	}
}

pub fn server_http_metrics() -> HttpMetrics {
	HttpMetrics {
		requests: &RELAY_SERVER_REQUESTS_TOTAL,
		responses: &RELAY_SERVER_RESPONSES_TOTAL,
		latency: &RELAY_SERVER_REQUEST_LATENCY_SECONDS,
	}
}

/// Render every relay metric in the Prometheus text format.
pub fn encode_metrics() -> eyre::Result<String> {
	let mut buffer = Vec::new();
	TextEncoder::new().encode(&RELAY_SERVER_METRICS_REGISTRY.gather(), &mut buffer)?;
	Ok(String::from_utf8(buffer)?)
}
