//! Sentence-level boundary strategies.
//!
//! Every strategy is lossless: concatenating the returned pieces yields the
//! input exactly. A single-element result means no boundary was found.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use super::config::{BoundaryKind, SplitterConfig, DEFAULT_CHUNKING_REGEX};
use crate::core::error::{Result, SplitterError};

const ENGLISH_DATA: &str = include_str!("data/english.json");

lazy_static! {
    static ref DEFAULT_SENTENCE_RE: Regex =
        Regex::new(DEFAULT_CHUNKING_REGEX).expect("default chunking regex is valid");
    static ref INITIALISM_RE: Regex =
        Regex::new(r"^(?:\p{L}\.){2,}$").expect("initialism regex is valid");
}


pub trait BoundaryStrategy: Send + Sync {
    fn segment<'a>(&self, text: &'a str) -> Vec<&'a str>;

    fn name(&self) -> &'static str;
}

/// Pieces start at every match after the first, so unmatched gaps stay with
/// the piece before them.
pub fn split_by_regex<'a>(re: &Regex, text: &'a str) -> Vec<&'a str> {
    let mut cuts = re
        .find_iter(text)
        .filter(|m| !m.is_empty())
        .map(|m| m.start())
        .skip(1)
        .peekable();

    if cuts.peek().is_none() {
        return vec![text];
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for cut in cuts {
        pieces.push(&text[start..cut]);
        start = cut;
    }
    pieces.push(&text[start..]);
    pieces
}


#[derive(Debug, Clone)]
pub struct RegexBoundary {
    re: Regex,
}

impl RegexBoundary {
    pub fn new(pattern: &str) -> Result<Self> {
        let re = Regex::new(pattern).map_err(|e| {
            SplitterError::configuration(format!("invalid sentence pattern {pattern:?}: {e}"))
        })?;
        Ok(Self { re })
    }

    pub fn pattern(&self) -> &str {
        self.re.as_str()
    }
}

impl Default for RegexBoundary {
    fn default() -> Self {
        Self {
            re: DEFAULT_SENTENCE_RE.clone(),
        }
    }
}

impl BoundaryStrategy for RegexBoundary {
    fn segment<'a>(&self, text: &'a str) -> Vec<&'a str> {
        split_by_regex(&self.re, text)
    }

    fn name(&self) -> &'static str {
        "regex"
    }
}


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageData {
    pub language: String,

    /// Lowercase, without the trailing period.
    #[serde(default)]
    pub abbreviations: Vec<String>,

    #[serde(default = "default_join_before_lowercase")]
    pub join_before_lowercase: bool,
}

fn default_join_before_lowercase() -> bool { true }

impl LanguageData {
    pub fn english() -> Result<Self> {
        Self::from_json(ENGLISH_DATA)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let data: Self = serde_json::from_str(json)?;
        if data.language.trim().is_empty() {
            return Err(SplitterError::configuration("language data must name a language"));
        }
        Ok(data)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}


#[derive(Debug, Clone)]
pub struct RuleBasedBoundary {
    language: String,
    abbreviations: HashSet<String>,
    join_before_lowercase: bool,
}

impl RuleBasedBoundary {
    pub fn new(data: LanguageData) -> Self {
        Self {
            language: data.language,
            abbreviations: data
                .abbreviations
                .into_iter()
                .map(|a| a.trim().trim_end_matches('.').to_lowercase())
                .collect(),
            join_before_lowercase: data.join_before_lowercase,
        }
    }

    pub fn english() -> Result<Self> {
        Ok(Self::new(LanguageData::english()?))
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    fn ends_with_abbreviation(&self, sentence: &str) -> bool {
        let Some(last) = sentence.split_whitespace().next_back() else {
            return false;
        };
        let last = last.trim_start_matches(|c: char| !c.is_alphanumeric());
        let Some(stem) = last.strip_suffix('.') else {
            return false;
        };
        if stem.is_empty() {
            return false;
        }
        INITIALISM_RE.is_match(last) || self.abbreviations.contains(&stem.to_lowercase())
    }

    fn starts_lowercase(text: &str) -> bool {
        text.trim_start()
            .chars()
            .next()
            .is_some_and(char::is_lowercase)
    }

    fn keep_together(&self, sentence: &str, next: &str) -> bool {
        self.ends_with_abbreviation(sentence)
            || (self.join_before_lowercase && Self::starts_lowercase(next))
    }
}

impl BoundaryStrategy for RuleBasedBoundary {
    fn segment<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let bounds: Vec<&str> = text.split_sentence_bounds().collect();
        if bounds.len() <= 1 {
            return vec![text];
        }

        let mut pieces = Vec::new();
        let mut start = 0;
        let mut end = 0;
        for (i, bound) in bounds.iter().enumerate() {
            end += bound.len();
            let joined = &text[start..end];
            match bounds.get(i + 1) {
                Some(next) if self.keep_together(joined, next) => {}
                _ => {
                    pieces.push(joined);
                    start = end;
                }
            }
        }
        pieces
    }

    fn name(&self) -> &'static str {
        "rule_based"
    }
}


pub fn boundary_from_config(config: &SplitterConfig) -> Result<Arc<dyn BoundaryStrategy>> {
    Ok(match config.boundary {
        BoundaryKind::Regex => Arc::new(RegexBoundary::new(&config.sentence_pattern)?),
        BoundaryKind::RuleBased => {
            let data = match &config.language_data {
                Some(path) => LanguageData::from_path(path)?,
                None => LanguageData::english()?,
            };
            Arc::new(RuleBasedBoundary::new(data))
        }
    })
}
