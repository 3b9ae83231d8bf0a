//! Stage orchestration
//!
//! The pipeline runs three stages in order, each reading the previous
//! stage's artifact from disk:
//!
//! 1. **crawl** - deep crawl every configured domain (bounded by a stage
//!    timeout) and write the crawl results
//! 2. **extract** - turn the crawl results into deduplicated Q&A pairs,
//!    written as JSON and CSV
//! 3. **import** - post the Q&A pairs to the knowledge base in batches
//!
//! The first failing stage stops the run. Counters are written to the stats
//! file whether or not the run succeeds.

use crate::config::{Config, ImportTarget};
use crate::crawler::{self, DomainCrawlResult, ScrapedPage};
use crate::extract::{ExtractionProfile, QaExtractor, QaPair};
use crate::import::{BatchImporter, ImportSummary};
use crate::output::{read_json, write_json, write_qa_csv, PipelineStats};
use crate::{HarvestError, Result};
use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};

/// Pipeline stages, in run order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Crawl,
    Extract,
    Import,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Crawl => "crawl",
            Stage::Extract => "extract",
            Stage::Import => "import",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which artifact the extract stage reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractInput {
    /// Deep crawl results
    Crawl,
    /// Scraped source pages
    Sources,
}

/// Runs the crawl stage and writes the crawl artifact
pub async fn run_crawl(config: &Config) -> Result<Vec<DomainCrawlResult>> {
    let seconds = config.crawler.crawl_timeout_secs;
    let results = tokio::time::timeout(Duration::from_secs(seconds), crawler::crawl(config))
        .await
        .map_err(|_| HarvestError::StageTimeout {
            stage: Stage::Crawl.as_str(),
            seconds,
        })??;

    let pages: usize = results.iter().map(|r| r.pages_scraped).sum();
    tracing::info!(
        "Crawled {} domains, {} pages total",
        results.len(),
        pages
    );

    write_json(Path::new(&config.output.crawl_path), &results)?;
    tracing::info!("Saved crawl results to {}", config.output.crawl_path);
    Ok(results)
}

/// Scrapes the configured source pages and writes the scraped artifact
pub async fn run_scrape(config: &Config) -> Result<Vec<ScrapedPage>> {
    let pages = crawler::scrape(config).await?;
    write_json(Path::new(&config.output.scraped_path), &pages)?;
    tracing::info!(
        "Saved {} scraped pages to {}",
        pages.len(),
        config.output.scraped_path
    );
    Ok(pages)
}

/// Extracts Q&A pairs from an artifact and writes the JSON and CSV outputs
pub fn run_extract(config: &Config, input: ExtractInput) -> Result<Vec<QaPair>> {
    let pairs = match input {
        ExtractInput::Crawl => {
            let results: Vec<DomainCrawlResult> = read_json(Path::new(&config.output.crawl_path))?;
            QaExtractor::new(ExtractionProfile::deep_crawl()).extract_from_crawl(&results)
        }
        ExtractInput::Sources => {
            let pages: Vec<ScrapedPage> = read_json(Path::new(&config.output.scraped_path))?;
            QaExtractor::new(ExtractionProfile::source_pages()).extract_from_sources(&pages)
        }
    };

    write_json(Path::new(&config.output.qa_path), &pairs)?;
    write_qa_csv(Path::new(&config.output.csv_path), &pairs)?;
    tracing::info!("Saved {} Q&A pairs to {}", pairs.len(), config.output.qa_path);
    Ok(pairs)
}

/// Imports the Q&A artifact into the knowledge base
pub async fn run_import(config: &Config, target: &ImportTarget) -> Result<ImportSummary> {
    let pairs: Vec<QaPair> = read_json(Path::new(&config.output.qa_path))?;
    tracing::info!("Total entries to import: {}", pairs.len());

    let importer = BatchImporter::new(target)?;
    Ok(importer.import_all(&pairs).await)
}

/// Full crawl, extract and import run
pub struct Pipeline<'a> {
    config: &'a Config,
    target: &'a ImportTarget,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config, target: &'a ImportTarget) -> Self {
        Self { config, target }
    }

    /// Executes every stage in order
    ///
    /// Never returns an error: the failing stage is logged and recorded in
    /// the returned stats, which are also saved to the stats file.
    pub async fn run(&self) -> PipelineStats {
        let mut stats = PipelineStats::new();
        let started = Instant::now();

        tracing::info!("Starting knowledge base pipeline");

        if let Err((stage, e)) = self.run_stages(&mut stats).await {
            tracing::error!("{} stage failed: {}", stage, e);
            tracing::error!("PIPELINE FAILED AT {} STAGE", stage.as_str().to_uppercase());
            stats.failed_stage = Some(stage.to_string());
        } else {
            stats.success = true;
        }

        stats.execution_time_seconds = started.elapsed().as_secs_f64();

        if stats.success {
            tracing::info!("Pipeline completed successfully");
            tracing::info!(
                "Pages crawled: {}, Q&A pairs extracted: {}, entries imported: {}",
                stats.pages_crawled,
                stats.qa_extracted,
                stats.imported
            );
            tracing::info!(
                "Total execution time: {:.1} seconds ({:.0} entries/minute)",
                stats.execution_time_seconds,
                stats.entries_per_minute()
            );
        }

        if let Err(e) = stats.save(Path::new(&self.config.output.stats_path)) {
            tracing::error!("Failed to save pipeline stats: {}", e);
        }

        stats
    }

    async fn run_stages(
        &self,
        stats: &mut PipelineStats,
    ) -> std::result::Result<(), (Stage, HarvestError)> {
        tracing::info!("STEP 1: deep crawling web sources");
        let results = run_crawl(self.config)
            .await
            .map_err(|e| (Stage::Crawl, e))?;
        stats.domains_crawled = results.len();
        stats.pages_crawled = results.iter().map(|r| r.pages_scraped).sum();

        tracing::info!("STEP 2: extracting Q&A pairs from crawl");
        let pairs = run_extract(self.config, ExtractInput::Crawl).map_err(|e| (Stage::Extract, e))?;
        stats.qa_extracted = pairs.len();

        tracing::info!("STEP 3: importing to knowledge base");
        let summary = run_import(self.config, self.target)
            .await
            .map_err(|e| (Stage::Import, e))?;
        stats.imported = summary.imported;
        stats.duplicates = summary.duplicates;
        stats.failed = summary.failed;

        Ok(())
    }
}
