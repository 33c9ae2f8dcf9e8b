//! End-to-end term extraction for one batch of ticket rows.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::classify::classify;
use crate::clean::clean_text;
use crate::compound::build_compounds;
use crate::config::PipelineConfig;
use crate::error::{Result, TermError};
use crate::frequency::FrequencyTable;
use crate::request::{CloudSummary, RawRecord, parse_request, summarize_ticket_types};
use crate::segment::{JiebaSegmenter, Segment};
use crate::vocabulary::{self, Vocabulary};

/// Shared default pipeline (built once, reused)
static DEFAULT_PIPELINE: OnceLock<TermPipeline> = OnceLock::new();

/// Everything one pipeline run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Accepted terms in token order.
    pub classified: Vec<String>,
    /// Device+fault compounds in window order.
    pub compounds: Vec<String>,
    pub table: FrequencyTable,
}

pub struct TermPipeline<S = JiebaSegmenter> {
    vocabulary: Arc<Vocabulary>,
    segmenter: S,
    config: PipelineConfig,
}

impl TermPipeline<JiebaSegmenter> {
    /// Build a jieba-backed pipeline; registry terms are loaded into the
    /// segmentation dictionary here.
    pub fn new(vocabulary: Arc<Vocabulary>, config: PipelineConfig) -> Self {
        let segmenter = JiebaSegmenter::new(&vocabulary).with_hmm(config.hmm);
        Self {
            vocabulary,
            segmenter,
            config,
        }
    }
}

impl<S: Segment> TermPipeline<S> {
    pub fn with_segmenter(vocabulary: Arc<Vocabulary>, segmenter: S, config: PipelineConfig) -> Self {
        Self {
            vocabulary,
            segmenter,
            config,
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run cleaning, segmentation, classification, compounding and
    /// counting over every description in the batch.
    pub fn extract(&self, records: &[RawRecord]) -> Result<Extraction> {
        if records.is_empty() {
            return Err(TermError::InputShape("no fault descriptions".to_string()));
        }
        let text = records
            .iter()
            .map(|record| record.description.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        self.extract_text(&text)
    }

    /// Same as [`extract`](Self::extract) for already-joined text.
    pub fn extract_text(&self, text: &str) -> Result<Extraction> {
        let cleaned = clean_text(text);
        info!(cleaned_len = cleaned.chars().count(), "cleaned fault descriptions");
        if cleaned.is_empty() {
            return Err(TermError::EmptyContent);
        }

        let classified = self.classify_cleaned(&cleaned);
        info!(terms = classified.len(), "filtered fault terms");

        let compounds = build_compounds(&self.vocabulary, &classified);
        let table = FrequencyTable::from_terms(&compounds, &classified);
        info!(
            compounds = compounds.len(),
            top = ?table.most_common(self.config.log_top_n),
            "term frequencies"
        );

        Ok(Extraction {
            classified,
            compounds,
            table,
        })
    }

    /// Segment and classify cleaned text, keeping accepted terms in order.
    pub fn classify_cleaned(&self, cleaned: &str) -> Vec<String> {
        self.segmenter
            .segment(cleaned)
            .filter_map(|token| classify(&self.vocabulary, &token))
            .collect()
    }

    /// Extract and build the response document for a batch.
    pub fn summarize(&self, records: &[RawRecord]) -> Result<CloudSummary> {
        let extraction = self.extract(records)?;
        let ticket_type = summarize_ticket_types(records);
        Ok(CloudSummary::new(&extraction.table, ticket_type, self.config.top_n))
    }

    /// Summarize one request file.
    pub fn summarize_file(&self, path: &Path) -> Result<CloudSummary> {
        let body = fs::read_to_string(path)?;
        let records = parse_request(&body)?;
        debug!(path = %path.display(), rows = records.len(), "parsed request");
        self.summarize(&records)
    }
}

impl<S: Segment + Sync> TermPipeline<S> {
    /// Summarize several request files in parallel. Each file is an
    /// independent batch; results follow input order.
    pub fn summarize_files(&self, paths: &[PathBuf]) -> Vec<Result<CloudSummary>> {
        paths
            .par_iter()
            .map(|path| self.summarize_file(path))
            .collect()
    }
}

/// Pipeline over the process-wide vocabulary with default settings.
pub fn default_pipeline() -> &'static TermPipeline {
    DEFAULT_PIPELINE
        .get_or_init(|| TermPipeline::new(vocabulary::global(), PipelineConfig::default()))
}

/// Term frequencies for a batch, using the default pipeline.
pub fn extract_term_frequencies(records: &[RawRecord]) -> Result<FrequencyTable> {
    default_pipeline().extract(records).map(|e| e.table)
}
