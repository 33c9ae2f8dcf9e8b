use crate::classify::YIELD_RATE_LABEL;
use crate::vocabulary::Vocabulary;

const PROBLEM_SUFFIXES: [&str; 2] = ["问题", "故障"];

/// Synthesize device+fault compounds from adjacent classified terms.
///
/// Every window `(terms[i], terms[i + 1])` is tested on its own, so
/// overlapping windows can each emit. Unrelated neighbours are joined too.
pub fn build_compounds(vocabulary: &Vocabulary, terms: &[String]) -> Vec<String> {
    terms
        .windows(2)
        .filter(|pair| qualifies(vocabulary, &pair[0], &pair[1]))
        .map(|pair| format!("{}{}", pair[0], pair[1]))
        .collect()
}

fn qualifies(vocabulary: &Vocabulary, head: &str, tail: &str) -> bool {
    vocabulary.is_device_prefix(head)
        && !vocabulary.is_device_prefix(tail)
        && !tail.contains(YIELD_RATE_LABEL)
        && !PROBLEM_SUFFIXES.iter().any(|suffix| tail.ends_with(suffix))
}
