

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr};

use crate::core::error::{Result, SplitterError};

pub const DEFAULT_CHUNK_SIZE: usize = 1024;
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;
pub const DEFAULT_WORD_SEPARATOR: &str = " ";
pub const DEFAULT_PARAGRAPH_SEPARATOR: &str = "\n\n\n";
pub const DEFAULT_LINE_SEPARATOR: &str = "\n";
pub const DEFAULT_CHUNKING_REGEX: &str = r"[^,.;。？！]+[,.;。？！]?|[,.;。？！]";
pub const DEFAULT_TOKENIZER_MODEL: &str = "gpt-3.5-turbo";

pub const ENV_PREFIX: &str = "FLOWSPLIT";


#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ChunkingStrategy {
    #[default]
    Sentence,
    Paragraph,
}


#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MeasureKind {
    #[default]
    Whitespace,
    Tiktoken,
    Bytes,
}


#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BoundaryKind {
    #[default]
    Regex,
    RuleBased,
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitterConfig {
    #[serde(default)]
    pub strategy: ChunkingStrategy,

    #[serde(default = "default_max_size")]
    pub max_size: usize,

    #[serde(default = "default_overlap_size")]
    pub overlap_size: usize,

    #[serde(default = "default_word_separator")]
    pub word_separator: String,

    #[serde(default = "default_paragraph_separator")]
    pub paragraph_separator: String,

    /// Paragraph chunker only.
    #[serde(default = "default_line_separator")]
    pub line_separator: String,

    #[serde(default = "default_chunking_regex")]
    pub secondary_boundary_pattern: String,

    #[serde(default = "default_chunking_regex")]
    pub sentence_pattern: String,

    #[serde(default)]
    pub measure: MeasureKind,

    #[serde(default = "default_tokenizer_model")]
    pub tokenizer_model: String,

    #[serde(default)]
    pub boundary: BoundaryKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_data: Option<PathBuf>,
}

fn default_max_size() -> usize { DEFAULT_CHUNK_SIZE }
fn default_overlap_size() -> usize { DEFAULT_CHUNK_OVERLAP }
fn default_word_separator() -> String { DEFAULT_WORD_SEPARATOR.to_string() }
fn default_paragraph_separator() -> String { DEFAULT_PARAGRAPH_SEPARATOR.to_string() }
fn default_line_separator() -> String { DEFAULT_LINE_SEPARATOR.to_string() }
fn default_chunking_regex() -> String { DEFAULT_CHUNKING_REGEX.to_string() }
fn default_tokenizer_model() -> String { DEFAULT_TOKENIZER_MODEL.to_string() }

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            strategy: ChunkingStrategy::default(),
            max_size: default_max_size(),
            overlap_size: default_overlap_size(),
            word_separator: default_word_separator(),
            paragraph_separator: default_paragraph_separator(),
            line_separator: default_line_separator(),
            secondary_boundary_pattern: default_chunking_regex(),
            sentence_pattern: default_chunking_regex(),
            measure: MeasureKind::default(),
            tokenizer_model: default_tokenizer_model(),
            boundary: BoundaryKind::default(),
            language_data: None,
        }
    }
}

impl SplitterConfig {

    pub fn sentence(max_size: usize, overlap_size: usize) -> Self {
        Self {
            max_size,
            overlap_size,
            strategy: ChunkingStrategy::Sentence,
            ..Default::default()
        }
    }


    pub fn paragraph(max_bytes: usize) -> Self {
        Self {
            max_size: max_bytes,
            overlap_size: 0,
            strategy: ChunkingStrategy::Paragraph,
            measure: MeasureKind::Bytes,
            ..Default::default()
        }
    }

    /// Optional config file (toml/json/yaml by extension), then `FLOWSPLIT_*` env vars.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(true));
        }
        let settings = builder
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }


    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            return Err(SplitterError::configuration("max_size must be greater than 0"));
        }
        if self.strategy == ChunkingStrategy::Sentence && self.overlap_size >= self.max_size {
            return Err(SplitterError::configuration(format!(
                "overlap_size ({}) must be smaller than max_size ({})",
                self.overlap_size, self.max_size
            )));
        }
        for (name, value) in [
            ("word_separator", &self.word_separator),
            ("paragraph_separator", &self.paragraph_separator),
            ("line_separator", &self.line_separator),
        ] {
            if value.is_empty() {
                return Err(SplitterError::configuration(format!("{name} must not be empty")));
            }
        }
        for (name, pattern) in [
            ("secondary_boundary_pattern", &self.secondary_boundary_pattern),
            ("sentence_pattern", &self.sentence_pattern),
        ] {
            regex::Regex::new(pattern).map_err(|e| {
                SplitterError::configuration(format!("invalid {name} {pattern:?}: {e}"))
            })?;
        }
        Ok(())
    }
}
