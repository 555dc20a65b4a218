//! Trackpub Core Library
//!
//! This crate provides the domain models, error types, configuration, upload
//! validation, and wind-vector math shared across all Trackpub components.
//! It performs no I/O; the outbound clients live in `trackpub-services`.

pub mod config;
pub mod error;
pub mod models;
pub mod validation;
pub mod wind;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, DepositionStep, ErrorMetadata, LogLevel};
pub use models::{DepositionMetadata, HistoryEntry};
pub use wind::{GridSpec, WindGrid, WindObservation};
