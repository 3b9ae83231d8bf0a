//! Batched import into the remote knowledge base
//!
//! Q&A pairs are posted in consecutive chunks. Each chunk is attempted
//! exactly once; a failed chunk is counted and the import moves on.

use crate::config::ImportTarget;
use crate::extract::QaPair;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Marker in an error body meaning the rows already exist remotely
pub const DUPLICATE_KEY_MARKER: &str = "duplicate key";

/// Import failures
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to build import client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Status {status}")]
    Rejected { status: StatusCode, body: String },
}

impl ImportError {
    /// True when the server refused the batch only because the rows exist
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::Rejected { body, .. } if body.contains(DUPLICATE_KEY_MARKER))
    }
}

/// Aggregate outcome of an import run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub batches: usize,
    pub imported: usize,
    pub duplicates: usize,
    pub failed: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportRequest<'a> {
    entries: &'a [QaPair],
    dry_run: bool,
}

/// Counts reported by the server for an accepted batch
#[derive(Debug, Default, Deserialize)]
pub struct BatchReceipt {
    #[serde(default)]
    pub imported: usize,
    #[serde(default)]
    pub duplicates: usize,
}

/// Splits entries into consecutive chunks of at most `batch_size`
///
/// Yields `ceil(len / batch_size)` chunks; a zero size is treated as one.
pub fn partition<T>(entries: &[T], batch_size: usize) -> std::slice::Chunks<'_, T> {
    entries.chunks(batch_size.max(1))
}

/// Posts Q&A pairs to the configured endpoint in batches
pub struct BatchImporter<'a> {
    client: Client,
    target: &'a ImportTarget,
}

impl<'a> BatchImporter<'a> {
    /// Creates an importer with a client using the target's timeout
    pub fn new(target: &'a ImportTarget) -> Result<Self, ImportError> {
        let client = Client::builder()
            .timeout(target.timeout)
            .build()
            .map_err(ImportError::Client)?;
        Ok(Self { client, target })
    }

    /// Imports every entry, one batch at a time
    ///
    /// | Batch outcome | Effect |
    /// |---------------|--------|
    /// | 2xx | add reported `imported` / `duplicates` |
    /// | non-2xx, body mentions "duplicate key" | logged only |
    /// | other non-2xx | batch size added to `failed` |
    /// | transport or decode error | batch size added to `failed` |
    pub async fn import_all(&self, entries: &[QaPair]) -> ImportSummary {
        let mut summary = ImportSummary::default();

        if entries.is_empty() {
            tracing::warn!("No Q&A entries to import");
            return summary;
        }

        tracing::info!(
            "Importing {} entries to {} (batch size {}{})",
            entries.len(),
            self.target.endpoint,
            self.target.batch_size,
            if self.target.dry_run { ", dry run" } else { "" }
        );

        let mut offset = 0;
        for (i, batch) in partition(entries, self.target.batch_size).enumerate() {
            let number = i + 1;
            let first = offset + 1;
            offset += batch.len();
            summary.batches += 1;

            match self.submit(batch).await {
                Ok(receipt) => {
                    tracing::info!(
                        "[Batch {}] ({}-{}) {} imported, {} duplicates",
                        number,
                        first,
                        offset,
                        receipt.imported,
                        receipt.duplicates
                    );
                    summary.imported += receipt.imported;
                    summary.duplicates += receipt.duplicates;
                }
                Err(e) if e.is_duplicate_key() => {
                    tracing::warn!("[Batch {}] {} (duplicate key)", number, e);
                }
                Err(e) => {
                    tracing::error!("[Batch {}] {}", number, e);
                    summary.failed += batch.len();
                }
            }
        }

        tracing::info!(
            "Import completed: {} imported, {} duplicates, {} failed",
            summary.imported,
            summary.duplicates,
            summary.failed
        );

        summary
    }

    /// Posts one batch
    pub async fn submit(&self, batch: &[QaPair]) -> Result<BatchReceipt, ImportError> {
        let response = self
            .client
            .post(&self.target.endpoint)
            .header(self.target.api_key_header.as_str(), self.target.api_key())
            .json(&ImportRequest {
                entries: batch,
                dry_run: self.target.dry_run,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ImportError::Rejected { status, body });
        }

        Ok(response.json::<BatchReceipt>().await?)
    }
}
