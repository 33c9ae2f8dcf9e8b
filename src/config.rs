/// Tunables for a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Terms returned in the response document.
    pub top_n: usize,
    /// Terms written to the log after aggregation.
    pub log_top_n: usize,
    /// Let the segmenter discover words missing from its dictionary.
    pub hmm: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_n: 20,
            log_top_n: 10,
            hmm: true,
        }
    }
}

impl PipelineConfig {
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_log_top_n(mut self, log_top_n: usize) -> Self {
        self.log_top_n = log_top_n;
        self
    }

    pub fn with_hmm(mut self, hmm: bool) -> Self {
        self.hmm = hmm;
        self
    }
}
