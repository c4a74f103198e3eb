pub mod db;
pub mod listing;
pub mod quiz;
pub mod server;
pub mod settings;
pub mod telemetry;
pub mod transfer;
