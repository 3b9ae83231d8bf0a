//! Pipeline statistics and the status report
//!
//! Each pipeline run records its counters to a JSON stats file. The status
//! report shows those counters next to the tail of the log file.

use crate::output::{read_json, write_json, ArtifactError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Counters recorded by one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineStats {
    /// When the run started
    pub timestamp: DateTime<Utc>,

    /// Domains that produced a crawl result
    pub domains_crawled: usize,

    /// Pages scraped across all domains
    pub pages_crawled: usize,

    /// Unique Q&A pairs extracted
    pub qa_extracted: usize,

    /// Entries the remote API reported as imported
    pub imported: usize,

    /// Entries the remote API reported as duplicates
    pub duplicates: usize,

    /// Entries in batches that failed
    pub failed: usize,

    pub execution_time_seconds: f64,

    pub success: bool,

    /// Stage that stopped the run, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_stage: Option<String>,
}

impl PipelineStats {
    /// Empty counters stamped with the current time
    pub fn new() -> Self {
        Self {
            timestamp: Utc::now(),
            domains_crawled: 0,
            pages_crawled: 0,
            qa_extracted: 0,
            imported: 0,
            duplicates: 0,
            failed: 0,
            execution_time_seconds: 0.0,
            success: false,
            failed_stage: None,
        }
    }

    /// Imported entries per minute of run time
    pub fn entries_per_minute(&self) -> f64 {
        if self.execution_time_seconds > 0.0 {
            self.imported as f64 / (self.execution_time_seconds / 60.0)
        } else {
            0.0
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ArtifactError> {
        write_json(path, self)
    }

    /// Loads the stats file, or `None` when no run has written one yet
    pub fn load(path: &Path) -> Result<Option<Self>, ArtifactError> {
        match read_json(path) {
            Ok(stats) => Ok(Some(stats)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl Default for PipelineStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints run statistics to stdout in a formatted manner
pub fn print_statistics(stats: &PipelineStats) {
    println!("=== Pipeline Statistics ===\n");

    println!("  Timestamp: {}", stats.timestamp.to_rfc3339());
    println!("  Domains crawled: {}", stats.domains_crawled);
    println!("  Pages crawled: {}", stats.pages_crawled);
    println!("  Q&A extracted: {}", stats.qa_extracted);
    println!("  Imported: {}", stats.imported);
    if stats.duplicates > 0 {
        println!("  Duplicates skipped: {}", stats.duplicates);
    }
    println!("  Failed: {}", stats.failed);
    println!("  Execution time: {:.1}s", stats.execution_time_seconds);
    println!("  Entries/minute: {:.0}", stats.entries_per_minute());

    match &stats.failed_stage {
        Some(stage) => println!("\nResult: FAILED at {} stage", stage),
        None if stats.success => println!("\nResult: completed successfully"),
        None => println!("\nResult: incomplete"),
    }
}

/// Latest recorded state of the pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub stats: Option<PipelineStats>,
    /// Last lines of the log file, oldest first
    pub recent_log: Vec<String>,
}

impl StatusReport {
    /// Gathers the stats file and the last `lines` log lines
    ///
    /// Missing files yield an empty report rather than an error.
    pub fn load(stats_path: &Path, log_path: &Path, lines: usize) -> Result<Self, ArtifactError> {
        Ok(Self {
            stats: PipelineStats::load(stats_path)?,
            recent_log: tail_lines(log_path, lines)?,
        })
    }

    pub fn print(&self) {
        match &self.stats {
            Some(stats) => print_statistics(stats),
            None => println!("No execution data yet (first run will create stats)"),
        }

        println!("\n=== Recent Log Entries (last {}) ===\n", self.recent_log.len());
        if self.recent_log.is_empty() {
            println!("  No logs yet");
        }
        for line in &self.recent_log {
            println!("  {}", line);
        }
    }
}

/// Returns the last `n` lines of a file, or nothing if it does not exist
pub fn tail_lines(path: &Path, n: usize) -> Result<Vec<String>, ArtifactError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(ArtifactError::io(path, e)),
    };

    let lines: Vec<&str> = content.lines().collect();
    let start = lines.len().saturating_sub(n);
    Ok(lines[start..].iter().map(|l| l.to_string()).collect())
}
