//! Per-token fault-term classification.
//!
//! A fixed decision table evaluated top to bottom; the first rule that
//! decides wins. Rule order is significant because the categories overlap
//! by substring (e.g. "不良率" is both a yield-rate variant and a negative
//! compound).

use lazy_static::lazy_static;
use regex::Regex;

use crate::segment::Token;
use crate::vocabulary::Vocabulary;

/// Canonical label for every yield-rate term.
pub const YIELD_RATE_LABEL: &str = "良率问题";

const YIELD_RATE_MARKER: &str = "良率";

lazy_static! {
    static ref ELECTRICAL_FAULT_PATTERN: Regex =
        Regex::new(r"(IR|VF|VB|CP|AP|O/S).*(不良|大|小|高|低|超标)").unwrap();
    static ref PASSING_QUALIFIER_PATTERN: Regex = Regex::new(r"(合格|正常|Pass)").unwrap();
}

/// Outcome of a rule that fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Discard,
    Keep(String),
}

/// A rule returns `None` when it does not apply to the token.
pub type RuleFn = fn(&Vocabulary, &Token) -> Option<Verdict>;

/// Decision table, in evaluation order.
pub const RULES: &[(&str, RuleFn)] = &[
    ("positive_marker", positive_marker),
    ("unit", unit),
    ("neutral_term", neutral_term),
    ("yield_rate", yield_rate),
    ("electrical_fault", electrical_fault),
    ("device_prefix", device_prefix),
    ("technical_fault", technical_fault),
    ("negative_compound", negative_compound),
    ("short_noun", short_noun),
];

/// Classify one token; `None` means the token is discarded.
pub fn classify(vocabulary: &Vocabulary, token: &Token) -> Option<String> {
    for (_, rule) in RULES {
        if let Some(verdict) = rule(vocabulary, token) {
            return match verdict {
                Verdict::Discard => None,
                Verdict::Keep(term) => Some(term),
            };
        }
    }
    None
}

/// Name of the rule that decides a token, for diagnostics.
pub fn deciding_rule(vocabulary: &Vocabulary, token: &Token) -> Option<&'static str> {
    RULES
        .iter()
        .find(|(_, rule)| rule(vocabulary, token).is_some())
        .map(|(name, _)| *name)
}

/// Rewrite passing qualifiers inside an electrical-fault term to "不良".
///
/// Passing readings come out labelled as failures. Kept until the intended
/// labelling is confirmed.
pub fn normalize_electrical_fault(term: &str) -> String {
    PASSING_QUALIFIER_PATTERN.replace_all(term, "不良").into_owned()
}

pub fn is_electrical_fault(term: &str) -> bool {
    ELECTRICAL_FAULT_PATTERN.is_match(term)
}

fn keep(token: &Token) -> Option<Verdict> {
    Some(Verdict::Keep(token.word.clone()))
}

fn positive_marker(vocab: &Vocabulary, token: &Token) -> Option<Verdict> {
    vocab
        .contains_positive_marker(&token.word)
        .then_some(Verdict::Discard)
}

fn unit(vocab: &Vocabulary, token: &Token) -> Option<Verdict> {
    vocab.is_unit(&token.word).then_some(Verdict::Discard)
}

fn neutral_term(vocab: &Vocabulary, token: &Token) -> Option<Verdict> {
    vocab.is_neutral(&token.word).then_some(Verdict::Discard)
}

fn yield_rate(_: &Vocabulary, token: &Token) -> Option<Verdict> {
    token
        .word
        .contains(YIELD_RATE_MARKER)
        .then(|| Verdict::Keep(YIELD_RATE_LABEL.to_string()))
}

fn electrical_fault(_: &Vocabulary, token: &Token) -> Option<Verdict> {
    is_electrical_fault(&token.word)
        .then(|| Verdict::Keep(normalize_electrical_fault(&token.word)))
}

fn device_prefix(vocab: &Vocabulary, token: &Token) -> Option<Verdict> {
    if vocab.has_device_prefix(&token.word) {
        return keep(token);
    }
    None
}

fn technical_fault(vocab: &Vocabulary, token: &Token) -> Option<Verdict> {
    if vocab.is_technical_fault(&token.word) {
        return keep(token);
    }
    None
}

fn negative_compound(vocab: &Vocabulary, token: &Token) -> Option<Verdict> {
    if vocab.is_negative_compound(&token.word) {
        return keep(token);
    }
    None
}

// 2-4 character nouns
fn short_noun(_: &Vocabulary, token: &Token) -> Option<Verdict> {
    let len = token.word.chars().count();
    if (2..=4).contains(&len) && token.tag.starts_with('n') {
        return keep(token);
    }
    None
}
