pub mod bootstrap;
pub mod config;
pub mod error;
pub mod metrics;
pub mod network;
pub mod routes;
pub mod server;
