//! Size-bounded, boundary-aware text chunking.
//!
//! ```rust
//! use flowsplit::SentenceSplitter;
//!
//! let splitter = SentenceSplitter::builder()
//!     .max_size(200)
//!     .overlap_size(20)
//!     .build()
//!     .unwrap();
//! let chunks = splitter.split_text("First sentence. Second sentence.").unwrap();
//! assert_eq!(chunks, vec!["First sentence. Second sentence."]);
//! ```

pub mod core;
pub mod utils;

pub use utils::safe_truncate_ellipsis;


pub use crate::core::error::{Result, SplitterError};
pub use crate::core::services::chunking::{
    BoundaryKind, BoundaryStrategy, ByteMeasure, ChunkStats, ChunkedDocument, ChunkingService,
    ChunkingStrategy, ContentSplitter, Fragment, LanguageData, MeasureKind, ParagraphSplitter,
    RegexBoundary, RuleBasedBoundary, SentenceSplitter, SizeMeasure, SplitterConfig, TextChunk,
    TiktokenMeasure, WhitespaceMeasure,
};


/// Splits `text` with a splitter built from `config`.
pub fn split_text(config: &SplitterConfig, text: &str) -> Result<Vec<String>> {
    crate::core::services::chunking::splitter_from_config(config)?.split(text)
}
