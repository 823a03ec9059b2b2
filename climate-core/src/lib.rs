//! Core library for the `climate` CLI.
//!
//! This crate defines:
//! - The daily climate data model and input sanitizing
//! - The analysis pipeline: transform, summarize, hazard probabilities
//! - Abstractions over the point-data source and the geocoder
//! - Export documents and configuration handling
//!
//! It is used by `climate-cli`, but the pipeline functions are plain
//! synchronous code and can be reused by other binaries or services.

pub mod aggregate;
pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod probability;
pub mod provider;
pub mod sanitize;
pub mod transform;

pub use analysis::{ClimateAnalyzer, analyze};
pub use config::{Config, Endpoints};
pub use error::{AnalysisError, ValidationError};
pub use export::{ExportDocument, ExportFormat};
pub use model::{
    ClimateAnalysisResult, DailyClimateRecord, DateRange, HazardProbabilities, LocationInfo,
    PowerResponse, SummaryStatistics,
};
pub use provider::{ClimateDataSource, Geocoder};
