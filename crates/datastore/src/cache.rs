use std::fmt;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use eyre::{Context, Result};
use redis::{AsyncCommands, Client, aio::MultiplexedConnection};

/// Namespace for every key the relay writes.
pub const CACHE_PREFIX: &str = "boost-relay";

/// Upper bound on establishing the cache connection
pub const CACHE_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Helper for building namespaced keys like:
/// "prefix:part1:part2:part3".
pub fn key_with_prefix<I, T>(prefix: &str, parts: I) -> String
where
	I: IntoIterator<Item = T>,
	T: fmt::Display,
{
	let mut s = String::new();
	s.push_str(prefix);

	for part in parts {
		s.push(':');
		let _ = write!(&mut s, "{}", part);
	}

	s
}

/// Hash-oriented cache operations the proposer datastore is built on.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait Cache: Send + Sync {
	async fn ping(&self) -> Result<()>;
	async fn hget_raw(&self, key: &str, field: &str) -> Result<Option<Vec<u8>>>;
	async fn hset_raw(&self, key: &str, field: &str, value: Vec<u8>) -> Result<()>;
	async fn hlen(&self, key: &str) -> Result<u64>;
}

/// Opens cache connections. Split out from `Cache` so startup can be exercised without a
/// running Redis.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait CacheConnector: Send + Sync {
	async fn connect(&self, uri: &str) -> Result<Arc<dyn Cache>>;
}

/// Redis backed cache.
#[derive(Clone)]
pub struct RedisCache {
	conn: MultiplexedConnection,
}

impl RedisCache {
	/// Connect to `uri` and verify the server answers `PING`.
	///
	/// A bare `host:port` is accepted and treated as `redis://host:port`.
	pub async fn connect(uri: &str, timeout: Duration) -> Result<Self> {
		let url = normalize_redis_uri(uri);
		let client = Client::open(url.as_str()).with_context(|| format!("Invalid redis uri '{}'", uri))?;

		let conn = tokio::time::timeout(timeout, client.get_multiplexed_async_connection())
			.await
			.map_err(|_| eyre::eyre!("Timed out after {:?} connecting to redis", timeout))?
			.context("Failed to open redis connection")?;

		let cache = Self { conn };
		cache.ping().await?;
		Ok(cache)
	}
}

#[async_trait]
impl Cache for RedisCache {
	async fn ping(&self) -> Result<()> {
		let mut conn = self.conn.clone();
		let pong: String = redis::cmd("PING").query_async(&mut conn).await.context("Redis PING failed")?;
		if pong != "PONG" {
			eyre::bail!("Unexpected PING reply from redis: {}", pong);
		}
		Ok(())
	}

	async fn hget_raw(&self, key: &str, field: &str) -> Result<Option<Vec<u8>>> {
		let mut conn = self.conn.clone();
		let value: Option<Vec<u8>> = conn.hget(key, field).await?;
		Ok(value)
	}

	async fn hset_raw(&self, key: &str, field: &str, value: Vec<u8>) -> Result<()> {
		let mut conn = self.conn.clone();
		let _: () = conn.hset(key, field, value).await?;
		Ok(())
	}

	async fn hlen(&self, key: &str) -> Result<u64> {
		let mut conn = self.conn.clone();
		let len: u64 = conn.hlen(key).await?;
		Ok(len)
	}
}

/// Production connector that dials Redis.
#[derive(Debug, Clone)]
pub struct RedisConnector {
	timeout: Duration,
}

impl RedisConnector {
	pub fn new(timeout: Duration) -> Self {
		Self { timeout }
	}
}

impl Default for RedisConnector {
	fn default() -> Self {
		Self::new(CACHE_CONNECT_TIMEOUT)
	}
}

#[async_trait]
impl CacheConnector for RedisConnector {
	async fn connect(&self, uri: &str) -> Result<Arc<dyn Cache>> {
		let cache = RedisCache::connect(uri, self.timeout).await?;
		tracing::debug!(uri, "Redis answered PING");
		Ok(Arc::new(cache))
	}
}

fn normalize_redis_uri(uri: &str) -> String {
	if uri.contains("://") { uri.to_string() } else { format!("redis://{}", uri) }
}
