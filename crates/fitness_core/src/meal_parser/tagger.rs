//! Part-of-speech tagging for meal descriptions.
//!
//! The tokenizer only needs a coarse grammatical category per word, so the
//! tagger sits behind a trait. `LexiconTagger` is the built-in implementation:
//! a closed-vocabulary lookup that is good enough for short food sentences.

use super::numbers;
use super::servings::ServingUnit;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartOfSpeech {
    Numeral,
    Determiner,
    Noun,
    Adjective,
    Punctuation,
    Conjunction,
    /// Verbs, pronouns, prepositions and anything else the tokenizer ignores.
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken {
    pub text: String,
    pub pos: PartOfSpeech,
}

impl TaggedToken {
    pub fn new(text: impl Into<String>, pos: PartOfSpeech) -> Self {
        Self {
            text: text.into(),
            pos,
        }
    }
}

/// Splits a sentence into word tokens and tags each one.
pub trait PartOfSpeechTagger {
    fn tag(&self, sentence: &str) -> Vec<TaggedToken>;
}

const DETERMINERS: &[&str] = &[
    "a", "an", "the", "some", "this", "that", "these", "those", "any", "each", "every",
    "another", "my", "our", "your", "his", "her", "their",
];

const CONJUNCTIONS: &[&str] = &["and", "or", "but", "nor", "&"];

const IGNORED: &[&str] = &[
    "i", "me", "we", "you", "he", "she", "it", "they", "ate", "eat", "eaten", "eating", "had",
    "have", "has", "got", "do", "did", "can", "could", "will", "would", "should", "drank", "drink", "drinking", "was", "were", "is", "are", "be", "of", "with",
    "for", "in", "on", "at", "to", "from", "about", "around", "like", "also", "then", "just",
    "only", "too", "today", "yesterday", "tonight", "morning", "afternoon", "evening", "night",
    "breakfast", "lunch", "dinner", "snack",
];

const ADJECTIVES: &[&str] = &[
    "fried", "grilled", "baked", "boiled", "roasted", "steamed", "scrambled", "poached", "raw",
    "fresh", "large", "small", "medium", "big", "little", "whole", "half", "green", "red",
    "brown", "white", "black", "hot", "cold", "iced", "sweet", "spicy", "plain", "toasted",
    "mashed", "dried", "frozen", "low-fat", "skim", "greek", "lean", "sliced", "chopped",
];

const PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '(', ')', '"', '\''];

/// Tags words from fixed word lists; unknown words are nouns.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconTagger;

impl LexiconTagger {
    fn classify(word: &str) -> PartOfSpeech {
        let lower = word.to_lowercase();
        let lower = lower.as_str();

        if lower.chars().all(|c| PUNCTUATION.contains(&c)) {
            PartOfSpeech::Punctuation
        } else if CONJUNCTIONS.contains(&lower) {
            PartOfSpeech::Conjunction
        } else if DETERMINERS.contains(&lower) {
            PartOfSpeech::Determiner
        } else if numbers::looks_numeric(lower) {
            PartOfSpeech::Numeral
        } else if IGNORED.contains(&lower) {
            PartOfSpeech::Other
        } else if ADJECTIVES.contains(&lower) {
            PartOfSpeech::Adjective
        } else {
            PartOfSpeech::Noun
        }
    }
}

impl PartOfSpeechTagger for LexiconTagger {
    fn tag(&self, sentence: &str) -> Vec<TaggedToken> {
        let mut tokens: Vec<TaggedToken> = Vec::new();
        for word in split_words(sentence) {
            let mut pos = Self::classify(&word);
            // "a can of soda": an auxiliary that doubles as a unit is a noun after a quantity.
            let after_quantity = tokens.last().map_or(false, |prev| {
                matches!(
                    prev.pos,
                    PartOfSpeech::Determiner | PartOfSpeech::Numeral | PartOfSpeech::Adjective
                )
            });
            if pos == PartOfSpeech::Other
                && after_quantity
                && ServingUnit::from_word(&word).is_some()
            {
                pos = PartOfSpeech::Noun;
            }
            tokens.push(TaggedToken::new(word, pos));
        }
        tokens
    }
}

/// Whitespace split that peels leading and trailing punctuation into their own tokens.
///
/// Inner punctuation stays put so "2.5" and "1/2" remain single tokens.
fn split_words(sentence: &str) -> Vec<String> {
    let mut words = Vec::new();
    for raw in sentence.split_whitespace() {
        let body = raw.trim_start_matches(PUNCTUATION);
        for c in raw[..raw.len() - body.len()].chars() {
            words.push(c.to_string());
        }

        let core = body.trim_end_matches(PUNCTUATION);
        if !core.is_empty() {
            words.push(core.to_string());
        }
        for c in body[core.len()..].chars() {
            words.push(c.to_string());
        }
    }
    words
}
