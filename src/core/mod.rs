

pub mod error;
pub mod services;

pub use error::{Result, SplitterError};
pub use services::{
    ChunkingService, ChunkingStrategy, ChunkedDocument, ChunkStats,
    ContentSplitter, ParagraphSplitter, SentenceSplitter, SplitterConfig, TextChunk,
};
