pub mod cache;
pub mod datastore;

pub use cache::{Cache, CacheConnector, RedisCache, RedisConnector};
pub use datastore::ProposerDatastore;
