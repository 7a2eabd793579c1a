pub mod analysis;
pub mod config;
pub mod error;
pub mod fetch;
pub mod format;
pub mod models;

pub use error::AnalysisError;
