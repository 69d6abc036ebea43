

use tracing::{info, warn};

use super::config::{SplitterConfig, DEFAULT_CHUNK_SIZE, DEFAULT_LINE_SEPARATOR};
use super::splitter::ContentSplitter;
use crate::core::error::{Result, SplitterError};
use crate::utils::take_bytes_at_char_boundary;

/// Byte-bounded chunker working at paragraph granularity. Each new chunk
/// starts with the last paragraph of the previous one when both fit.
#[derive(Debug, Clone)]
pub struct ParagraphSplitter {
    max_chunk_size: usize,
    separator: String,
}

impl ParagraphSplitter {
    /// A zero size falls back to the default chunk size.
    pub fn new(max_chunk_size: usize) -> Self {
        let max_chunk_size = if max_chunk_size == 0 {
            DEFAULT_CHUNK_SIZE
        } else {
            max_chunk_size
        };
        Self {
            max_chunk_size,
            separator: DEFAULT_LINE_SEPARATOR.to_string(),
        }
    }

    pub fn with_separator(mut self, separator: &str) -> Result<Self> {
        if separator.is_empty() {
            return Err(SplitterError::configuration("line separator must not be empty"));
        }
        self.separator = separator.to_string();
        Ok(self)
    }

    pub fn from_config(config: &SplitterConfig) -> Result<Self> {
        config.validate()?;
        let splitter = Self::new(config.max_size).with_separator(&config.line_separator)?;
        info!(
            "ParagraphSplitter initialized: max_chunk_size={}",
            splitter.max_chunk_size
        );
        Ok(splitter)
    }

    pub fn max_chunk_size(&self) -> usize {
        self.max_chunk_size
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        let sep = self.separator.as_str();
        let pieces = text
            .split(sep)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .flat_map(|p| self.hard_split(p))
            .map(str::trim)
            .filter(|p| !p.is_empty());

        let mut chunks = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut current_size = 0;

        for piece in pieces {
            let added = if current.is_empty() {
                piece.len()
            } else {
                piece.len() + sep.len()
            };

            if current_size + added <= self.max_chunk_size {
                current.push(piece);
                current_size += added;
                continue;
            }

            let Some(&last) = current.last() else {
                warn!(
                    "Single character wider than max_chunk_size={}, emitting {} bytes",
                    self.max_chunk_size,
                    piece.len()
                );
                current.push(piece);
                current_size = piece.len();
                continue;
            };

            chunks.push(current.join(sep));

            let with_overlap = last.len() + sep.len() + piece.len();
            if with_overlap > self.max_chunk_size {
                current = vec![piece];
                current_size = piece.len();
            } else {
                current = vec![last, piece];
                current_size = with_overlap;
            }
        }

        if !current.is_empty() {
            chunks.push(current.join(sep));
        }

        chunks
    }

    /// Cuts an oversized paragraph at code-point boundaries into maximal pieces.
    fn hard_split<'a>(&self, paragraph: &'a str) -> Vec<&'a str> {
        if paragraph.len() <= self.max_chunk_size {
            return vec![paragraph];
        }

        let mut parts = Vec::new();
        let mut rest = paragraph;
        while !rest.is_empty() {
            let (head, tail) = take_bytes_at_char_boundary(rest, self.max_chunk_size);
            parts.push(head);
            rest = tail;
        }
        parts
    }
}

impl Default for ParagraphSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl ContentSplitter for ParagraphSplitter {
    fn split(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.split_text(text))
    }

    fn measure(&self, text: &str) -> usize {
        text.len()
    }

    fn name(&self) -> &'static str {
        "ParagraphSplitter"
    }
}
