pub mod configuration;
pub mod db;
pub mod error;
pub mod pagination;
pub mod quiz;
pub mod server;
pub mod telemetry;
pub mod transfer;

pub use error::TriviaError;
