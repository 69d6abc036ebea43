

pub mod chunking;

pub use chunking::{
    ChunkingService, ChunkingStrategy, ChunkedDocument, ChunkStats,
    ContentSplitter, ParagraphSplitter, SentenceSplitter, SplitterConfig, TextChunk,
};
