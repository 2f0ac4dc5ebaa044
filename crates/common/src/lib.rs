pub mod logging;
pub mod network;
pub mod utils;
