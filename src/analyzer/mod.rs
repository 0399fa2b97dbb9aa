// Analyzer module: derived views over the filtered order table.

pub mod data_analysis;
pub mod distribution;
pub mod summary;

// Re-export the main Analyzer implementation for ease of use.
pub use data_analysis::{AnalysisResult, Analyzer, DataAnalyzer};
