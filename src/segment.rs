//! Word segmentation with part-of-speech tags.
//!
//! General dictionary segmentation is delegated to `jieba-rs`. Registry
//! terms are added to the dictionary with their weight before any text is
//! cut, so multi-character domain terms survive as single tokens.

use jieba_rs::Jieba;
use tracing::debug;

use crate::vocabulary::Vocabulary;

/// Tag reported for words the dictionary carries without a part of speech.
pub const UNKNOWN_TAG: &str = "x";

/// A segmented word with its part-of-speech tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub word: String,
    pub tag: String,
}

impl Token {
    pub fn new(word: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            tag: tag.into(),
        }
    }
}

/// Splits cleaned text into tagged tokens, in text order.
pub trait Segment {
    fn segment<'a>(&'a self, text: &'a str) -> impl Iterator<Item = Token> + 'a;
}

/// `jieba-rs` segmenter biased by a vocabulary registry.
pub struct JiebaSegmenter {
    jieba: Jieba,
    hmm: bool,
}

impl JiebaSegmenter {
    pub fn new(vocabulary: &Vocabulary) -> Self {
        let mut jieba = Jieba::new();
        let mut added = 0usize;
        for (term, weight) in vocabulary.weighted_terms() {
            jieba.add_word(term, Some(weight), None);
            added += 1;
        }
        debug!(added, "registry terms added to segmentation dictionary");
        Self { jieba, hmm: true }
    }

    /// Toggle HMM discovery of words missing from the dictionary.
    pub fn with_hmm(mut self, hmm: bool) -> Self {
        self.hmm = hmm;
        self
    }
}

impl Segment for JiebaSegmenter {
    fn segment<'a>(&'a self, text: &'a str) -> impl Iterator<Item = Token> + 'a {
        self.jieba.tag(text, self.hmm).into_iter().map(|tag| {
            let pos = if tag.tag.is_empty() { UNKNOWN_TAG } else { tag.tag };
            Token::new(tag.word, pos)
        })
    }
}

/// Segmenter that replays a fixed token list regardless of input.
///
/// Lets callers and tests drive the classifier with a known segmentation.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSegmenter {
    tokens: Vec<Token>,
}

impl ScriptedSegmenter {
    pub fn new<I, W, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = (W, T)>,
        W: Into<String>,
        T: Into<String>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .map(|(word, tag)| Token::new(word, tag))
                .collect(),
        }
    }
}

impl Segment for ScriptedSegmenter {
    fn segment<'a>(&'a self, _text: &'a str) -> impl Iterator<Item = Token> + 'a {
        self.tokens.iter().cloned()
    }
}
