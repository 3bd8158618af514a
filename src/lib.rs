//! Resume relevance library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod processing;
pub mod storage;
pub mod output;

pub use error::{Result, ResumeRelevanceError};
pub use config::Config;
pub use processing::analyzer::{AnalysisEngine, ResumeInput};
