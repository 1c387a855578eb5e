//! Categorized skill extraction from free text

use crate::error::{MatcherError, Result};
use crate::processing::text_processor::TextProcessor;
use crate::processing::vocabulary::{SkillCategory, SkillVocabulary};
use aho_corasick::{AhoCorasick, MatchKind};
use log::debug;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Category -> canonical skills found in one document. Every category is always present.
pub type ExtractedSkills = BTreeMap<SkillCategory, BTreeSet<String>>;

/// Phrases that introduce a single mention
const MENTION_PHRASES: &[&str] = &[
    "experience with",
    "proficient in",
    "expertise in",
    "knowledge of",
    "skilled in",
    "familiar with",
    "worked with",
    "developed using",
    "built with",
];

/// Headings that introduce a comma separated list
const LIST_HEADINGS: &[&str] = &[
    "technologies:",
    "skills:",
    "tools:",
    "programming languages:",
    "frameworks:",
    "databases:",
    "cloud platforms:",
];

pub fn empty_extraction() -> ExtractedSkills {
    SkillCategory::ALL
        .iter()
        .map(|category| (*category, BTreeSet::new()))
        .collect()
}

/// Total number of skills across categories
pub fn skill_count(skills: &ExtractedSkills) -> usize {
    skills.values().map(BTreeSet::len).sum()
}

pub struct SkillExtractor {
    vocabulary: Arc<SkillVocabulary>,
    processor: TextProcessor,
    keyword_matcher: AhoCorasick,
    /// Skills searched through the automaton, indexed by pattern id
    plain_skills: Vec<String>,
    /// Skills carrying characters that normalization strips (`c#`, `node.js`)
    symbol_skills: Vec<String>,
    mention_patterns: Vec<Regex>,
    token_splitter: Regex,
    word_boundary: bool,
}

impl SkillExtractor {
    pub fn new(vocabulary: Arc<SkillVocabulary>, word_boundary: bool) -> Result<Self> {
        let processor = TextProcessor::new();

        let (plain_skills, symbol_skills): (Vec<String>, Vec<String>) = vocabulary
            .all_skills()
            .into_iter()
            .map(str::to_string)
            .partition(|skill| processor.normalize(skill) == *skill);

        let keyword_matcher = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(&plain_skills)
            .map_err(|e| MatcherError::Processing(format!("Failed to build skill matcher: {}", e)))?;

        let mut mention_patterns = Vec::with_capacity(MENTION_PHRASES.len() + LIST_HEADINGS.len());
        for phrase in MENTION_PHRASES {
            mention_patterns.push(Self::compile_pattern(phrase, r"(\w+(?:\s+\w+)*)")?);
        }
        for heading in LIST_HEADINGS {
            mention_patterns.push(Self::compile_pattern(heading, r"(\w+(?:[,\s]+\w+)*)")?);
        }

        let token_splitter = Regex::new(r"[,\s]+")
            .map_err(|e| MatcherError::Processing(format!("Invalid token splitter: {}", e)))?;

        debug!(
            "Skill extractor ready: {} plain skills, {} symbol skills, word_boundary={}",
            plain_skills.len(),
            symbol_skills.len(),
            word_boundary
        );

        Ok(Self {
            vocabulary,
            processor,
            keyword_matcher,
            plain_skills,
            symbol_skills,
            mention_patterns,
            token_splitter,
            word_boundary,
        })
    }

    /// Extractor over the built-in vocabulary in word-boundary mode
    pub fn with_defaults() -> Result<Self> {
        Self::new(Arc::new(SkillVocabulary::builtin()), true)
    }

    fn compile_pattern(prefix: &str, capture: &str) -> Result<Regex> {
        let pattern = format!(r"(?i){} {}", regex::escape(prefix), capture);
        Regex::new(&pattern)
            .map_err(|e| MatcherError::Processing(format!("Invalid mention pattern '{}': {}", prefix, e)))
    }

    pub fn vocabulary(&self) -> &SkillVocabulary {
        &self.vocabulary
    }

    pub fn word_boundary(&self) -> bool {
        self.word_boundary
    }

    /// Extract categorized skills. Blank input yields every category empty.
    pub fn extract(&self, text: &str) -> ExtractedSkills {
        let mut skills = empty_extraction();

        if text.trim().is_empty() {
            return skills;
        }

        let normalized = self.processor.normalize(text);

        self.scan_keywords(text, &normalized, &mut skills);
        self.expand_abbreviations(&normalized, &mut skills);
        self.extract_mentions(text, &mut skills);
        self.scan_tokens(&normalized, &mut skills);

        debug!("Extracted {} skills", skill_count(&skills));
        skills
    }

    /// Direct vocabulary scan over the normalized text
    pub fn scan_keywords(&self, raw: &str, normalized: &str, skills: &mut ExtractedSkills) {
        for mat in self.keyword_matcher.find_overlapping_iter(normalized) {
            if self.word_boundary && !on_word_boundary(normalized, mat.start(), mat.end()) {
                continue;
            }
            let skill = &self.plain_skills[mat.pattern().as_usize()];
            self.insert_everywhere(skill, skills);
        }

        let lowered = raw.to_lowercase();
        for skill in &self.symbol_skills {
            if self.occurs(&lowered, skill) {
                self.insert_everywhere(skill, skills);
            }
        }
    }

    /// Abbreviations found in the text add their full phrase to its first category
    pub fn expand_abbreviations(&self, normalized: &str, skills: &mut ExtractedSkills) {
        for (abbrev, full_form) in self.vocabulary.abbreviations() {
            let Some(category) = self.vocabulary.resolve_abbreviation(full_form) else {
                continue;
            };
            if self.occurs(normalized, abbrev) {
                debug!("Abbreviation '{}' -> '{}'", abbrev, full_form);
                skills.entry(category).or_default().insert(full_form.clone());
            }
        }
    }

    /// Phrase patterns such as "proficient in ..." or "skills: a, b, c"
    pub fn extract_mentions(&self, text: &str, skills: &mut ExtractedSkills) {
        let pattern_text = self.processor.pattern_text(text);

        for pattern in &self.mention_patterns {
            for captures in pattern.captures_iter(&pattern_text) {
                let Some(capture) = captures.get(1) else {
                    continue;
                };
                for token in self.token_splitter.split(capture.as_str()) {
                    let token = token.trim();
                    if token.chars().count() > 2 {
                        self.insert_everywhere(token, skills);
                    }
                }
            }
        }
    }

    /// Content tokens that are themselves vocabulary entries
    pub fn scan_tokens(&self, normalized: &str, skills: &mut ExtractedSkills) {
        for token in self.processor.content_tokens(normalized) {
            self.insert_everywhere(token, skills);
        }
    }

    fn insert_everywhere(&self, skill: &str, skills: &mut ExtractedSkills) {
        for category in self.vocabulary.categories_of(skill) {
            skills.entry(category).or_default().insert(skill.to_string());
        }
    }

    fn occurs(&self, haystack: &str, needle: &str) -> bool {
        if self.word_boundary {
            haystack
                .match_indices(needle)
                .any(|(start, found)| on_word_boundary(haystack, start, start + found.len()))
        } else {
            haystack.contains(needle)
        }
    }
}

/// `text[start..end]` is not glued to a neighbouring word.
///
/// Hyphens and ampersands join words the same way `normalize` keeps them, so
/// `go-to` holds no `go` and `r&d` holds no `r`.
/// A trailing ASCII digit is a version suffix and still ends the word (`python3`).
fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();

    let joins = |c: char| c.is_alphanumeric() || c == '-' || c == '&';

    !before.map_or(false, joins) && !after.map_or(false, |c| joins(c) && !c.is_ascii_digit())
}
