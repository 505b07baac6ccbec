use std::collections::{BTreeSet, HashSet};

use rust_stemmers::{Algorithm, Stemmer};

/// Standard English stopword list, apostrophe-free forms.
const ENGLISH_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your",
    "yours", "yourself", "yourselves", "he", "him", "his", "himself", "she",
    "her", "hers", "herself", "it", "its", "itself", "they", "them", "their",
    "theirs", "themselves", "what", "which", "who", "whom", "this", "that",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being",
    "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of",
    "at", "by", "for", "with", "about", "against", "between", "into",
    "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again",
    "further", "then", "once", "here", "there", "when", "where", "why", "how",
    "all", "any", "both", "each", "few", "more", "most", "other", "some",
    "such", "no", "nor", "not", "only", "own", "same", "so", "than", "too",
    "very", "s", "t", "can", "will", "just", "don", "should", "now", "d",
    "ll", "m", "o", "re", "ve", "y", "ain", "aren", "couldn", "didn",
    "doesn", "hadn", "hasn", "haven", "isn", "ma", "mightn", "mustn",
    "needn", "shan", "shouldn", "wasn", "weren", "won", "wouldn",
];

/// Measurement and filler words that carry no signal in ingredient phrases.
const RECIPE_STOP_WORDS: &[&str] = &[
    "cup", "cups", "teaspoon", "teaspoons", "tablespoon", "tablespoons",
    "oz", "ml", "g", "kg", "pinch", "taste",
];

/// Turns raw ingredient text into a canonical token set.
///
/// Holds the stopword set and the English stemmer as immutable state,
/// built once and passed explicitly to whatever needs normalization.
pub struct Normalizer {
    stop_words: HashSet<&'static str>,
    stemmer: Stemmer,
}

impl Normalizer {
    pub fn new() -> Self {
        let mut stop_words: HashSet<&'static str> =
            ENGLISH_STOP_WORDS.iter().copied().collect();
        stop_words.extend(RECIPE_STOP_WORDS.iter().copied());
        Normalizer {
            stop_words,
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    /// Normalize a collection of ingredient phrases into a token set.
    ///
    /// Per phrase: lowercase, strip everything that is not a letter, split on
    /// whitespace, drop stopwords, stem. Tokens that stem onto a stopword are
    /// dropped as well, which keeps the whole pipeline idempotent:
    /// `normalize(normalize(x)) == normalize(x)`.
    pub fn normalize_phrases<I, S>(&self, phrases: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tokens = BTreeSet::new();
        for phrase in phrases {
            let lowered = phrase.as_ref().to_lowercase();
            let cleaned: String = lowered
                .chars()
                .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
                .collect();
            for word in cleaned.split_whitespace() {
                if self.stop_words.contains(word) {
                    continue;
                }
                let stemmed = self.stemmer.stem(word);
                if stemmed.is_empty() || self.stop_words.contains(stemmed.as_ref()) {
                    continue;
                }
                tokens.insert(stemmed.into_owned());
            }
        }
        tokens
    }

    /// Normalize a string-encoded list of ingredient phrases, e.g.
    /// `'["1 cup of chopped tomatoes", "salt to taste"]'`.
    ///
    /// Malformed input yields an empty set rather than an error; one corrupt
    /// record must not abort batch processing.
    pub fn normalize_listing(&self, raw: &str) -> BTreeSet<String> {
        match parse_listing(raw) {
            Some(phrases) => self.normalize_phrases(phrases),
            None => BTreeSet::new(),
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a string-encoded list of phrases into its raw phrases.
///
/// Accepts single- or double-quoted items inside brackets. Returns `None`
/// when the input is not a well-formed listing.
pub fn parse_listing(raw: &str) -> Option<Vec<String>> {
    let inner = raw.trim().strip_prefix('[')?.strip_suffix(']')?;
    let mut phrases = Vec::new();
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                let quote = c;
                let mut phrase = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == quote {
                        closed = true;
                        break;
                    }
                    phrase.push(c);
                }
                if !closed {
                    return None;
                }
                phrases.push(phrase);
            }
            ',' => {}
            c if c.is_whitespace() => {}
            _ => return None,
        }
    }
    Some(phrases)
}
