//! Sentence tokenizers used when a block only carries raw text

use serde::Serialize;
use std::sync::LazyLock;

use regex::Regex;

static PROTECTED_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\.,;:?!"' \(\)\[\]\{\}]"#).expect("valid separator pattern"));

/// A token and its byte span in the sentence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Splits a sentence into tokens
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, sentence: &str) -> Vec<Token>;

    /// Token texts only
    fn words(&self, sentence: &str) -> Vec<String> {
        self.tokenize(sentence).into_iter().map(|t| t.text).collect()
    }
}

/// Splits on whitespace; used for pre-tokenized `::tok` fields
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, sentence: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut start = None;
        for (position, ch) in sentence.char_indices() {
            match (ch.is_whitespace(), start) {
                (true, Some(begin)) => {
                    tokens.push(Token {
                        text: sentence[begin..position].to_string(),
                        start: begin,
                        end: position,
                    });
                    start = None;
                }
                (false, None) => start = Some(position),
                _ => {}
            }
        }
        if let Some(begin) = start {
            tokens.push(Token {
                text: sentence[begin..].to_string(),
                start: begin,
                end: sentence.len(),
            });
        }
        tokens
    }
}

/// Splits on punctuation and spaces, keeping punctuation as tokens
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtectedTokenizer;

impl Tokenizer for ProtectedTokenizer {
    fn tokenize(&self, sentence: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut start = 0;
        let mut push = |begin: usize, end: usize| {
            let text = &sentence[begin..end];
            if !text.trim().is_empty() {
                tokens.push(Token {
                    text: text.to_string(),
                    start: begin,
                    end,
                });
            }
        };

        for separator in PROTECTED_SEPARATORS.find_iter(sentence) {
            push(start, separator.start());
            push(separator.start(), separator.end());
            start = separator.end();
        }
        push(start, sentence.len());
        tokens
    }
}
