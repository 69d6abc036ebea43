

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::config::SplitterConfig;
use super::splitter::{splitter_from_config, ContentSplitter, TextChunk};
use crate::core::error::Result;


pub struct ChunkingService {

    splitter: Arc<dyn ContentSplitter>,

    config: SplitterConfig,
}


#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkStats {

    pub chunk_count: usize,

    pub min_size: usize,

    pub max_size: usize,

    pub total_chars: usize,

    pub duration_ms: f64,
}


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkedDocument {

    pub document_id: String,

    pub splitter: String,

    pub chunks: Vec<TextChunk>,

    pub stats: ChunkStats,
}

impl ChunkedDocument {
    pub fn chunk_lengths(&self) -> Vec<usize> {
        self.chunks.iter().map(|c| c.text.len()).collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.chunks.iter().map(|c| c.text.as_str()).collect()
    }
}

impl ChunkingService {

    pub fn new(config: SplitterConfig) -> Result<Self> {
        let splitter = splitter_from_config(&config)?;

        info!(
            "ChunkingService initialized: strategy={:?}, max_size={}, overlap={}",
            config.strategy, config.max_size, config.overlap_size
        );

        Ok(Self { splitter, config })
    }


    pub fn with_splitter(splitter: Arc<dyn ContentSplitter>, config: SplitterConfig) -> Self {
        Self { splitter, config }
    }

    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    pub fn splitter_name(&self) -> &'static str {
        self.splitter.name()
    }


    pub fn chunk_document(&self, document_id: &str, content: &str) -> Result<ChunkedDocument> {
        let start_time = Instant::now();

        debug!(
            "Processing document: {} (length={})",
            document_id,
            content.len()
        );

        let chunks = match self.splitter.split_chunks(content) {
            Ok(chunks) => chunks,
            Err(e) => {
                warn!("Chunking failed for {}: {}", document_id, e);
                return Err(e);
            }
        };

        let stats = ChunkStats {
            chunk_count: chunks.len(),
            min_size: chunks.iter().map(|c| c.size).min().unwrap_or(0),
            max_size: chunks.iter().map(|c| c.size).max().unwrap_or(0),
            total_chars: chunks.iter().map(|c| c.text.chars().count()).sum(),
            duration_ms: start_time.elapsed().as_secs_f64() * 1000.0,
        };

        debug!(
            "Split {} into {} chunks (sizes {}..={})",
            document_id, stats.chunk_count, stats.min_size, stats.max_size
        );

        Ok(ChunkedDocument {
            document_id: document_id.to_string(),
            splitter: self.splitter.name().to_string(),
            chunks,
            stats,
        })
    }


    pub fn chunk_documents<'a, I>(&self, documents: I) -> Result<Vec<ChunkedDocument>>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        documents
            .into_iter()
            .map(|(id, content)| self.chunk_document(id, content))
            .collect()
    }
}
