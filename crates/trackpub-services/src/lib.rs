//! Trackpub Services Library
//!
//! Outbound HTTP clients for the relay: the deposition API, the history
//! spreadsheet script, and the weather forecast API. Each client owns a
//! `reqwest::Client` built with a client-wide timeout and takes its base URL
//! from configuration so tests can point it at a mock server.

pub mod history;
pub mod weather;
pub mod zenodo;

pub use history::HistoryClient;
pub use weather::WeatherClient;
pub use zenodo::ZenodoClient;
