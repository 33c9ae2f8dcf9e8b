//! Domain vocabulary registry for fault-term extraction.
//!
//! Holds the three weighted term sets that bias segmentation (device
//! prefixes, fault compounds, electrical faults) together with the trigger
//! lists the classifier consults. A registry is built once and only read
//! afterwards; share it through `Arc`.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Result, TermError};

const EMBEDDED_VOCABULARY: &str = include_str!("../data/vocabulary.json");

/// Process-wide vocabulary (loaded once, reused)
static VOCABULARY: OnceLock<Arc<Vocabulary>> = OnceLock::new();

/// Which weighted set a registry term belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermKind {
    Device,
    Fault,
    Electrical,
}

#[derive(Debug, Deserialize)]
struct WeightedList {
    weight: usize,
    terms: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct VocabularyFile {
    device_prefixes: WeightedList,
    fault_compounds: WeightedList,
    electrical_faults: WeightedList,
    positive_markers: Vec<String>,
    units: Vec<String>,
    neutral_terms: Vec<String>,
    technical_faults: Vec<String>,
    negative_compounds: Vec<String>,
}

/// Read-only registry of domain terms and classifier trigger lists.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    entries: HashMap<String, (TermKind, usize)>,
    /// Registry terms in first-registration order.
    order: Vec<String>,
    device_prefixes: Vec<String>,
    device_set: HashSet<String>,
    positive_markers: Vec<String>,
    units: HashSet<String>,
    neutral_terms: HashSet<String>,
    technical_faults: HashSet<String>,
    negative_compounds: HashSet<String>,
}

impl Vocabulary {
    /// Vocabulary compiled into the binary.
    pub fn builtin() -> Self {
        Self::from_json(EMBEDDED_VOCABULARY).expect("embedded vocabulary.json must parse")
    }

    /// Parse a vocabulary document.
    pub fn from_json(source: &str) -> Result<Self> {
        let raw: VocabularyFile = serde_json::from_str(source)
            .map_err(|e| TermError::Vocabulary(format!("parse error: {}", e)))?;
        Self::from_file(raw)
    }

    /// Load a vocabulary document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let vocab = Self::from_json(&content)?;
        debug!(path = %path.display(), "{}", vocab.stats());
        Ok(vocab)
    }

    fn from_file(raw: VocabularyFile) -> Result<Self> {
        let mut entries = HashMap::new();
        let mut order = Vec::new();

        // Later sets overwrite earlier ones on overlap
        let sets = [
            (TermKind::Device, raw.device_prefixes),
            (TermKind::Fault, raw.fault_compounds),
            (TermKind::Electrical, raw.electrical_faults),
        ];
        for (kind, list) in sets {
            if list.weight == 0 {
                return Err(TermError::Vocabulary(format!(
                    "{:?} weight must be positive",
                    kind
                )));
            }
            for term in list.terms {
                if term.is_empty() {
                    return Err(TermError::Vocabulary(format!("empty {:?} term", kind)));
                }
                if let Some((previous, _)) = entries.insert(term.clone(), (kind, list.weight)) {
                    if previous != kind {
                        warn!(%term, ?previous, now = ?kind, "term registered in two sets");
                    }
                } else {
                    order.push(term);
                }
            }
        }

        let device_prefixes: Vec<String> = order
            .iter()
            .filter(|term| matches!(entries.get(*term), Some((TermKind::Device, _))))
            .cloned()
            .collect();
        let device_set = device_prefixes.iter().cloned().collect();

        Ok(Self {
            entries,
            order,
            device_prefixes,
            device_set,
            positive_markers: raw.positive_markers,
            units: raw.units.into_iter().collect(),
            neutral_terms: raw.neutral_terms.into_iter().collect(),
            technical_faults: raw.technical_faults.into_iter().collect(),
            negative_compounds: raw.negative_compounds.into_iter().collect(),
        })
    }

    /// Set membership of a registry term.
    pub fn kind(&self, term: &str) -> Option<TermKind> {
        self.entries.get(term).map(|(kind, _)| *kind)
    }

    /// Registry terms with their segmentation weight, in registration order.
    pub fn weighted_terms(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.order
            .iter()
            .filter_map(|term| self.entries.get(term).map(|(_, w)| (term.as_str(), *w)))
    }

    /// Terms of one set, in registration order.
    pub fn terms_of(&self, kind: TermKind) -> Vec<&str> {
        self.order
            .iter()
            .filter(|term| self.kind(term) == Some(kind))
            .map(String::as_str)
            .collect()
    }

    pub fn device_prefixes(&self) -> &[String] {
        &self.device_prefixes
    }

    pub fn is_device_prefix(&self, term: &str) -> bool {
        self.device_set.contains(term)
    }

    /// True if `term` is a device prefix or starts with one.
    pub fn has_device_prefix(&self, term: &str) -> bool {
        self.is_device_prefix(term)
            || self
                .device_prefixes
                .iter()
                .any(|prefix| term.starts_with(prefix.as_str()))
    }

    pub fn contains_positive_marker(&self, term: &str) -> bool {
        self.positive_markers
            .iter()
            .any(|marker| term.contains(marker.as_str()))
    }

    pub fn is_unit(&self, term: &str) -> bool {
        self.units.contains(term)
    }

    pub fn is_neutral(&self, term: &str) -> bool {
        self.neutral_terms.contains(term)
    }

    pub fn is_technical_fault(&self, term: &str) -> bool {
        self.technical_faults.contains(term)
    }

    pub fn is_negative_compound(&self, term: &str) -> bool {
        self.negative_compounds.contains(term)
    }

    /// Summary line for logs
    pub fn stats(&self) -> String {
        format!(
            "Vocabulary loaded: device={}, fault={}, electrical={}",
            self.terms_of(TermKind::Device).len(),
            self.terms_of(TermKind::Fault).len(),
            self.terms_of(TermKind::Electrical).len()
        )
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Install a vocabulary file as the process-wide default.
///
/// Returns `false` if a vocabulary was already installed; the existing one
/// stays in place.
pub fn init_vocabulary(path: &Path) -> Result<bool> {
    let vocab = Vocabulary::load(path)?;
    match VOCABULARY.set(Arc::new(vocab)) {
        Ok(_) => Ok(true),
        Err(_) => {
            warn!("vocabulary already initialized");
            Ok(false)
        }
    }
}

/// Process-wide vocabulary, falling back to the built-in lists.
pub fn global() -> Arc<Vocabulary> {
    VOCABULARY
        .get_or_init(|| {
            let vocab = Vocabulary::builtin();
            debug!("{}", vocab.stats());
            Arc::new(vocab)
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_sets_are_populated() {
        let v = Vocabulary::builtin();
        assert_eq!(v.terms_of(TermKind::Device).len(), 42);
        assert_eq!(v.terms_of(TermKind::Electrical).len(), 10);
        assert!(v.is_device_prefix("设备"));
        assert_eq!(v.kind("不转动"), Some(TermKind::Fault));
        assert_eq!(v.kind("IR不良"), Some(TermKind::Electrical));
        assert_eq!(v.kind("良率"), None);
    }

    #[test]
    fn test_duplicate_terms_registered_once() {
        let v = Vocabulary::builtin();
        let count = v.weighted_terms().filter(|(t, _)| *t == "不转动").count();
        assert_eq!(count, 1);
        assert!(v.weighted_terms().all(|(_, w)| w == 1000));
    }

    #[test]
    fn test_device_prefix_matching() {
        let v = Vocabulary::builtin();
        assert!(v.has_device_prefix("马达"));
        assert!(v.has_device_prefix("马达异响"));
        assert!(v.has_device_prefix("机台"));
        assert!(!v.has_device_prefix("异响"));
        assert!(!v.is_device_prefix("马达异响"));
    }

    #[test]
    fn test_trigger_lists() {
        let v = Vocabulary::builtin();
        assert!(v.contains_positive_marker("测试通过"));
        assert!(v.is_unit("mA"));
        assert!(!v.is_unit("ma"));
        assert!(v.is_neutral("调试"));
        assert!(v.is_technical_fault("虚焊"));
        assert!(v.is_negative_compound("不良品"));
        assert!(!v.is_negative_compound("未焊住"));
    }

    #[test]
    fn test_last_registered_set_wins() {
        let doc = r#"{
            "device_prefixes": {"weight": 10, "terms": ["马达", "夹子"]},
            "fault_compounds": {"weight": 20, "terms": ["夹子", "卡料"]},
            "electrical_faults": {"weight": 30, "terms": ["卡料"]},
            "positive_markers": [], "units": [], "neutral_terms": [],
            "technical_faults": [], "negative_compounds": []
        }"#;
        let v = Vocabulary::from_json(doc).unwrap();
        assert_eq!(v.kind("夹子"), Some(TermKind::Fault));
        assert_eq!(v.kind("卡料"), Some(TermKind::Electrical));
        assert!(!v.is_device_prefix("夹子"));
        assert_eq!(v.device_prefixes(), &["马达".to_string()]);
        let weights: Vec<_> = v.weighted_terms().collect();
        assert_eq!(weights, vec![("马达", 10), ("夹子", 20), ("卡料", 30)]);
    }

    #[test]
    fn test_rejects_malformed_documents() {
        assert!(matches!(
            Vocabulary::from_json("{}"),
            Err(TermError::Vocabulary(_))
        ));
        let zero_weight = r#"{
            "device_prefixes": {"weight": 0, "terms": ["马达"]},
            "fault_compounds": {"weight": 1, "terms": []},
            "electrical_faults": {"weight": 1, "terms": []},
            "positive_markers": [], "units": [], "neutral_terms": [],
            "technical_faults": [], "negative_compounds": []
        }"#;
        assert!(Vocabulary::from_json(zero_weight).is_err());
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.json");
        fs::write(&path, EMBEDDED_VOCABULARY).unwrap();
        let v = Vocabulary::load(&path).unwrap();
        assert!(v.is_device_prefix("锡膏"));
        assert!(Vocabulary::load(&dir.path().join("missing.json")).is_err());
    }
}
