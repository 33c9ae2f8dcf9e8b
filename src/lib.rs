//! Fault-term extraction for manufacturing ticket descriptions.
//!
//! Cleans free-text fault descriptions, segments them with a domain-biased
//! dictionary, keeps failure terminology through a fixed rule table, joins
//! device+fault neighbours into compound terms and counts everything into a
//! frequency table for word-cloud rendering.

pub mod classify;
pub mod clean;
pub mod compound;
pub mod config;
pub mod error;
pub mod frequency;
pub mod pipeline;
pub mod request;
pub mod segment;
pub mod vocabulary;

pub use crate::classify::{YIELD_RATE_LABEL, classify};
pub use crate::clean::clean_text;
pub use crate::compound::build_compounds;
pub use crate::config::PipelineConfig;
pub use crate::error::{Result, TermError};
pub use crate::frequency::FrequencyTable;
pub use crate::pipeline::{Extraction, TermPipeline, default_pipeline, extract_term_frequencies};
pub use crate::request::{CloudSummary, RawRecord, TicketType};
pub use crate::segment::{JiebaSegmenter, ScriptedSegmenter, Segment, Token};
pub use crate::vocabulary::{TermKind, Vocabulary};

#[cfg(feature = "python")]
mod python {
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::{RawRecord, default_pipeline};

    /// Clean a fault description
    #[pyfunction]
    fn clean_text(text: String) -> PyResult<String> {
        Ok(crate::clean::clean_text(&text))
    }

    /// Term frequencies for a batch of descriptions.
    /// Returns: list of (term, count), most frequent first
    #[pyfunction]
    #[pyo3(signature = (descriptions, top_n = 20))]
    fn extract_term_frequencies(
        descriptions: Vec<String>,
        top_n: usize,
    ) -> PyResult<Vec<(String, u64)>> {
        let records: Vec<RawRecord> = descriptions.into_iter().map(RawRecord::new).collect();
        let extraction = default_pipeline()
            .extract(&records)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(extraction.table.most_common(top_n))
    }

    #[pymodule]
    fn fault_terms(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(clean_text, m)?)?;
        m.add_function(wrap_pyfunction!(extract_term_frequencies, m)?)?;
        Ok(())
    }
}
