//! Pipeline artifacts and reports
//!
//! This module handles:
//! - Reading and writing the JSON files passed between stages
//! - Exporting Q&A pairs as CSV
//! - Recording run statistics and the status report

mod artifacts;
mod export;
pub mod stats;

pub use artifacts::{read_json, write_json, ArtifactError};
pub use export::{write_qa_csv, CSV_HEADER};
pub use stats::{print_statistics, tail_lines, PipelineStats, StatusReport};
