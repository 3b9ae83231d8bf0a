//! CSV export of Q&A pairs for manual upload

use crate::extract::QaPair;
use crate::output::ArtifactError;
use serde::Serialize;
use std::path::Path;

/// Header row of the export
pub const CSV_HEADER: [&str; 6] = ["question", "answer", "source_url", "domain", "confidence", "tags"];

#[derive(Serialize)]
struct CsvRow<'a> {
    question: &'a str,
    answer: &'a str,
    source_url: &'a str,
    domain: &'a str,
    confidence: f64,
    /// Tags joined with `;`
    tags: String,
}

impl<'a> From<&'a QaPair> for CsvRow<'a> {
    fn from(pair: &'a QaPair) -> Self {
        Self {
            question: &pair.question,
            answer: &pair.answer,
            source_url: &pair.source_url,
            domain: &pair.domain,
            confidence: pair.confidence,
            tags: pair.tags.join(";"),
        }
    }
}

/// Writes Q&A pairs as CSV, always starting with the header row
pub fn write_qa_csv(path: &Path, pairs: &[QaPair]) -> Result<(), ArtifactError> {
    let csv_error = |source| ArtifactError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(csv_error)?;

    writer.write_record(CSV_HEADER).map_err(csv_error)?;
    for pair in pairs {
        writer.serialize(CsvRow::from(pair)).map_err(csv_error)?;
    }
    writer.flush().map_err(|e| ArtifactError::io(path, e))?;

    tracing::info!("Saved {} rows to CSV: {}", pairs.len(), path.display());
    Ok(())
}
