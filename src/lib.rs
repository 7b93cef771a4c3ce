//! cu-analyze - run documents through a content-understanding analyzer.
//!
//! Submits a document URL to a named analyzer, polls the operation until it
//! leaves the `Running` state, and prints the result JSON on success.

pub mod client;
pub mod config;
pub mod error;
pub mod report;
pub mod workflow;

pub use client::{AnalysisClient, AnalysisOperation, AnalysisRequest, OperationStatus, Submission};
pub use config::{ConfigError, ServiceConfig, WaitPolicy};
pub use error::AnalysisError;
