

mod boundary;
mod config;
mod measure;
mod paragraph;
mod segmenter;
mod sentence;
mod service;
mod splitter;

pub use boundary::{
    boundary_from_config, split_by_regex, BoundaryStrategy, LanguageData, RegexBoundary,
    RuleBasedBoundary,
};
pub use self::config::{
    BoundaryKind, ChunkingStrategy, MeasureKind, SplitterConfig, DEFAULT_CHUNKING_REGEX,
    DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_LINE_SEPARATOR,
    DEFAULT_PARAGRAPH_SEPARATOR, DEFAULT_TOKENIZER_MODEL, DEFAULT_WORD_SEPARATOR, ENV_PREFIX,
};
pub use measure::{measure_from_config, ByteMeasure, SizeMeasure, TiktokenMeasure, WhitespaceMeasure};
pub use paragraph::ParagraphSplitter;
pub use segmenter::{
    BoundarySegmenter, CharSegmenter, RegexSegmenter, Segmentation, Segmenter, SegmenterChain,
    SeparatorSegmenter,
};
pub use sentence::{postprocess, Fragment, SentenceSplitter, SentenceSplitterBuilder};
pub use service::{ChunkStats, ChunkedDocument, ChunkingService};
pub use splitter::{splitter_from_config, ContentSplitter, TextChunk};
