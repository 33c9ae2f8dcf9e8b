use lazy_static::lazy_static;
use regex::Regex;

// Pre-compile cleaning patterns at module load time. Order matters.
lazy_static! {
    // Markup tags
    static ref TAG_PATTERN: Regex = Regex::new(r"<[^>]+>").unwrap();
    // Numerals, Latin letters, whitespace and benign punctuation
    static ref ALNUM_RUN_PATTERN: Regex = Regex::new(r"[a-zA-Z0-9\s+.%/、°&;\-]+").unwrap();
    // Anything left that is not a letter, number or underscore
    static ref NON_WORD_PATTERN: Regex = Regex::new(r"[^\p{L}\p{N}_]").unwrap();
    static ref WHITESPACE_PATTERN: Regex = Regex::new(r"\s+").unwrap();
}

/// Strip markup, numerals, Latin letters and punctuation from a fault
/// description, leaving content words separated by single spaces.
pub fn clean_text(text: &str) -> String {
    let text = TAG_PATTERN.replace_all(text, "");
    let text = ALNUM_RUN_PATTERN.replace_all(&text, " ");
    let text = NON_WORD_PATTERN.replace_all(&text, " ");
    let text = WHITESPACE_PATTERN.replace_all(&text, " ");
    text.trim().to_string()
}
