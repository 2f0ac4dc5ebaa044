pub mod beacon_client;
pub mod constants;
pub mod types;
