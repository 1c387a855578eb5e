//! Text processing and normalization

use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

/// Pronouns and auxiliaries ignored by the lexical overlap score
const OVERLAP_STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does", "did",
    "will", "would", "could", "should", "may", "might", "must", "can", "this", "that", "these",
    "those", "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them", "my",
    "your", "his", "its", "our", "their", "mine", "yours", "hers", "ours", "theirs",
];

/// English stop words (NLTK corpus)
const ENGLISH_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

pub struct TextProcessor {
    stop_words: HashSet<&'static str>,
    overlap_stop_words: HashSet<&'static str>,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        Self {
            stop_words: ENGLISH_STOP_WORDS.iter().copied().collect(),
            overlap_stop_words: OVERLAP_STOP_WORDS.iter().copied().collect(),
        }
    }

    /// Lower-case and replace every character except alphanumerics, `-`, `+` and `&` with a space
    pub fn normalize(&self, text: &str) -> String {
        text.to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() || matches!(c, '-' | '+' | '&') { c } else { ' ' })
            .collect()
    }

    /// Like `normalize`, but keeps the list separators the mention patterns rely on
    pub fn pattern_text(&self, text: &str) -> String {
        text.to_lowercase()
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c.is_whitespace() || matches!(c, ',' | ':' | '+' | '-') {
                    c
                } else {
                    ' '
                }
            })
            .collect()
    }

    /// Whitespace tokens of normalized text, minus stop words and tokens of two characters or fewer
    pub fn content_tokens<'a>(&self, normalized: &'a str) -> Vec<&'a str> {
        normalized
            .split_whitespace()
            .filter(|token| token.chars().count() > 2 && !self.stop_words.contains(token))
            .collect()
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Unicode word set used by the lexical overlap score
    pub fn overlap_tokens(&self, text: &str) -> HashSet<String> {
        text.unicode_words()
            .map(|word| word.to_lowercase())
            .filter(|word| !self.overlap_stop_words.contains(word.as_str()))
            .collect()
    }

    /// Jaccard similarity on word sets
    pub fn text_similarity(&self, text1: &str, text2: &str) -> f32 {
        let set1 = self.overlap_tokens(text1);
        let set2 = self.overlap_tokens(text2);

        if set1.is_empty() || set2.is_empty() {
            return 0.0;
        }

        let intersection = set1.intersection(&set2).count();
        let union = set1.union(&set2).count();

        intersection as f32 / union as f32
    }
}
