

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::config::{ChunkingStrategy, SplitterConfig};
use super::paragraph::ParagraphSplitter;
use super::sentence::SentenceSplitter;
use crate::core::error::Result;


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChunk {

    pub text: String,

    pub size: usize,

    pub position: usize,
}


pub trait ContentSplitter: Send + Sync {

    fn split(&self, text: &str) -> Result<Vec<String>>;

    /// Size of `text` in the splitter's own units.
    fn measure(&self, text: &str) -> usize;


    fn name(&self) -> &'static str;

    fn split_chunks(&self, text: &str) -> Result<Vec<TextChunk>> {
        Ok(self
            .split(text)?
            .into_iter()
            .enumerate()
            .map(|(position, text)| TextChunk {
                size: self.measure(&text),
                text,
                position,
            })
            .collect())
    }
}


pub fn splitter_from_config(config: &SplitterConfig) -> Result<Arc<dyn ContentSplitter>> {
    Ok(match config.strategy {
        ChunkingStrategy::Sentence => Arc::new(SentenceSplitter::from_config(config)?),
        ChunkingStrategy::Paragraph => Arc::new(ParagraphSplitter::from_config(config)?),
    })
}
