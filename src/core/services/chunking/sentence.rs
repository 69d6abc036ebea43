//! Sentence-aware recursive splitter.
//!
//! Text is decomposed through a fixed chain (paragraph, sentence boundary,
//! secondary regex, word, character) into leaves that each fit `max_size`,
//! then packed greedily into chunks with trailing overlap carried forward.

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::{debug, info};

use super::boundary::{boundary_from_config, BoundaryStrategy, RegexBoundary};
use super::config::{
    SplitterConfig, DEFAULT_CHUNKING_REGEX, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE,
    DEFAULT_PARAGRAPH_SEPARATOR, DEFAULT_WORD_SEPARATOR,
};
use super::measure::{measure_from_config, SizeMeasure, WhitespaceMeasure};
use super::segmenter::SegmenterChain;
use super::splitter::ContentSplitter;
use crate::core::error::{Result, SplitterError};


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment<'a> {
    pub text: &'a str,
    pub size: usize,
    /// False when produced by the secondary regex, word, or character fallback.
    pub is_natural_boundary: bool,
}


pub struct SentenceSplitter {
    max_size: usize,
    overlap_size: usize,
    measure: Arc<dyn SizeMeasure>,
    boundary: Arc<dyn BoundaryStrategy>,
    chain: SegmenterChain,
}

impl SentenceSplitter {
    pub fn builder() -> SentenceSplitterBuilder {
        SentenceSplitterBuilder::new()
    }

    pub fn from_config(config: &SplitterConfig) -> Result<Self> {
        config.validate()?;
        Self::builder()
            .max_size(config.max_size)
            .overlap_size(config.overlap_size)
            .word_separator(&config.word_separator)
            .paragraph_separator(&config.paragraph_separator)
            .secondary_boundary_pattern(&config.secondary_boundary_pattern)
            .measure(measure_from_config(config)?)
            .boundary(boundary_from_config(config)?)
            .build()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn overlap_size(&self) -> usize {
        self.overlap_size
    }

    pub fn size_of(&self, text: &str) -> usize {
        self.measure.measure(text)
    }

    /// Empty input yields `[""]` rather than an empty list.
    pub fn split_text(&self, text: &str) -> Result<Vec<String>> {
        if text.is_empty() {
            return Ok(vec![String::new()]);
        }

        let leaves = self.decompose(text)?;
        let chunks = self.merge(&leaves)?;
        let chunks = postprocess(chunks);

        debug!(
            "Split {} bytes into {} leaves and {} chunks (max_size={}, overlap={})",
            text.len(),
            leaves.len(),
            chunks.len(),
            self.max_size,
            self.overlap_size
        );

        Ok(chunks)
    }

    /// Leaves concatenate back to `text` exactly.
    pub fn decompose<'a>(&self, text: &'a str) -> Result<Vec<Fragment<'a>>> {
        let mut leaves = Vec::new();
        self.decompose_into(text, &mut leaves)?;
        Ok(leaves)
    }

    fn decompose_into<'a>(&self, text: &'a str, leaves: &mut Vec<Fragment<'a>>) -> Result<()> {
        let size = self.measure.measure(text);
        if size <= self.max_size {
            leaves.push(Fragment { text, size, is_natural_boundary: true });
            return Ok(());
        }

        let segmentation = self.chain.segment(text);
        if segmentation.pieces.len() <= 1 {
            return Err(SplitterError::invariant(text, size, self.max_size));
        }

        for piece in segmentation.pieces {
            let size = self.measure.measure(piece);
            if size <= self.max_size {
                leaves.push(Fragment {
                    text: piece,
                    size,
                    is_natural_boundary: segmentation.natural,
                });
            } else {
                self.decompose_into(piece, leaves)?;
            }
        }
        Ok(())
    }

    /// Greedy single pass. Chunks are untrimmed; see [`postprocess`].
    pub fn merge(&self, leaves: &[Fragment<'_>]) -> Result<Vec<String>> {
        let mut chunks = Vec::new();
        let mut acc = Accumulator::open();
        let mut idx = 0;

        while idx < leaves.len() {
            let leaf = &leaves[idx];
            if leaf.size > self.max_size {
                return Err(SplitterError::invariant(leaf.text, leaf.size, self.max_size));
            }

            if !self.fits(&acc, leaf) {
                if !acc.fresh {
                    acc = acc.close(&mut chunks, self.overlap_size);
                    continue;
                }
                let dropped = acc.evict_until(|acc| self.fits(acc, leaf));
                if dropped > 0 {
                    debug!("Dropped {} overlap leaves so the next leaf fits", dropped);
                }
            }
            acc.push(leaf.text, leaf.size);
            idx += 1;
        }

        if !acc.fresh {
            chunks.push(acc.text());
        }

        Ok(chunks)
    }

    /// Summed leaf sizes decide first. Measures that are not subadditive also
    /// re-measure the joined text, raw and trimmed.
    fn fits(&self, acc: &Accumulator<'_>, leaf: &Fragment<'_>) -> bool {
        if acc.size + leaf.size > self.max_size {
            return false;
        }
        if acc.items.is_empty() || self.measure.is_subadditive() {
            return true;
        }

        let mut joined = acc.text();
        joined.push_str(leaf.text);
        let trimmed = joined.trim();
        self.measure.measure(&joined) <= self.max_size
            && (trimmed.len() == joined.len() || self.measure.measure(trimmed) <= self.max_size)
    }
}

impl ContentSplitter for SentenceSplitter {
    fn split(&self, text: &str) -> Result<Vec<String>> {
        self.split_text(text)
    }

    fn measure(&self, text: &str) -> usize {
        self.size_of(text)
    }

    fn name(&self) -> &'static str {
        "SentenceSplitter"
    }
}

impl std::fmt::Debug for SentenceSplitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceSplitter")
            .field("max_size", &self.max_size)
            .field("overlap_size", &self.overlap_size)
            .field("measure", &self.measure.name())
            .field("boundary", &self.boundary.name())
            .field("chain", &self.chain.names())
            .finish()
    }
}

/// Trims every chunk and drops the ones left empty.
pub fn postprocess(chunks: Vec<String>) -> Vec<String> {
    chunks
        .into_iter()
        .filter_map(|chunk| {
            let trimmed = chunk.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect()
}


struct Accumulator<'a> {
    items: VecDeque<(&'a str, usize)>,
    size: usize,
    fresh: bool,
}

impl<'a> Accumulator<'a> {
    fn open() -> Self {
        Self {
            items: VecDeque::new(),
            size: 0,
            fresh: true,
        }
    }

    fn text(&self) -> String {
        self.items.iter().map(|(text, _)| *text).collect()
    }

    fn push(&mut self, text: &'a str, size: usize) {
        self.items.push_back((text, size));
        self.size += size;
        self.fresh = false;
    }

    /// Emits this chunk and opens the next one seeded with trailing leaves
    /// whose cumulative size stays within `overlap_size`.
    fn close(self, chunks: &mut Vec<String>, overlap_size: usize) -> Self {
        chunks.push(self.text());

        let mut next = Self::open();
        for &(text, size) in self.items.iter().rev() {
            if next.size + size > overlap_size {
                break;
            }
            next.items.push_front((text, size));
            next.size += size;
        }
        next
    }

    fn evict_until(&mut self, mut fits: impl FnMut(&Self) -> bool) -> usize {
        let mut dropped = 0;
        while !fits(self) {
            let Some((_, size)) = self.items.pop_front() else {
                break;
            };
            self.size -= size;
            dropped += 1;
        }
        dropped
    }
}


pub struct SentenceSplitterBuilder {
    max_size: usize,
    overlap_size: usize,
    word_separator: String,
    paragraph_separator: String,
    secondary_boundary_pattern: String,
    measure: Option<Arc<dyn SizeMeasure>>,
    boundary: Option<Arc<dyn BoundaryStrategy>>,
}

impl SentenceSplitterBuilder {
    pub fn new() -> Self {
        Self {
            max_size: DEFAULT_CHUNK_SIZE,
            overlap_size: DEFAULT_CHUNK_OVERLAP,
            word_separator: DEFAULT_WORD_SEPARATOR.to_string(),
            paragraph_separator: DEFAULT_PARAGRAPH_SEPARATOR.to_string(),
            secondary_boundary_pattern: DEFAULT_CHUNKING_REGEX.to_string(),
            measure: None,
            boundary: None,
        }
    }

    pub fn max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn overlap_size(mut self, overlap_size: usize) -> Self {
        self.overlap_size = overlap_size;
        self
    }

    pub fn word_separator(mut self, separator: &str) -> Self {
        self.word_separator = separator.to_string();
        self
    }

    pub fn paragraph_separator(mut self, separator: &str) -> Self {
        self.paragraph_separator = separator.to_string();
        self
    }

    pub fn secondary_boundary_pattern(mut self, pattern: &str) -> Self {
        self.secondary_boundary_pattern = pattern.to_string();
        self
    }

    /// Defaults to [`WhitespaceMeasure`].
    pub fn measure(mut self, measure: Arc<dyn SizeMeasure>) -> Self {
        self.measure = Some(measure);
        self
    }

    /// Defaults to [`RegexBoundary`] with the built-in terminator pattern.
    pub fn boundary(mut self, boundary: Arc<dyn BoundaryStrategy>) -> Self {
        self.boundary = Some(boundary);
        self
    }

    pub fn build(self) -> Result<SentenceSplitter> {
        if self.max_size == 0 {
            return Err(SplitterError::configuration("max_size must be greater than 0"));
        }
        if self.overlap_size >= self.max_size {
            return Err(SplitterError::configuration(format!(
                "overlap_size ({}) must be smaller than max_size ({})",
                self.overlap_size, self.max_size
            )));
        }

        let measure = self.measure.unwrap_or_else(|| Arc::new(WhitespaceMeasure));
        let boundary = self
            .boundary
            .unwrap_or_else(|| Arc::new(RegexBoundary::default()));
        let chain = SegmenterChain::new(
            &self.paragraph_separator,
            Arc::clone(&boundary),
            &self.secondary_boundary_pattern,
            &self.word_separator,
        )?;

        info!(
            "SentenceSplitter initialized: max_size={}, overlap={}, measure={}, boundary={}",
            self.max_size,
            self.overlap_size,
            measure.name(),
            boundary.name()
        );

        Ok(SentenceSplitter {
            max_size: self.max_size,
            overlap_size: self.overlap_size,
            measure,
            boundary,
            chain,
        })
    }
}

impl Default for SentenceSplitterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::chunking::measure::ByteMeasure;

    fn splitter(max_size: usize, overlap_size: usize) -> SentenceSplitter {
        SentenceSplitter::builder()
            .max_size(max_size)
            .overlap_size(overlap_size)
            .build()
            .unwrap()
    }

    fn leaf(text: &str, size: usize, natural: bool) -> Fragment<'_> {
        Fragment { text, size, is_natural_boundary: natural }
    }

    #[test]
    fn test_small_text_single_chunk() {
        let s = splitter(1024, 200);
        let text = "Para1\n\n\nPara2\n\n\nPara3";
        assert_eq!(s.split_text(text).unwrap(), vec![text.to_string()]);
    }

    #[test]
    fn test_single_chunk_is_trimmed() {
        let s = splitter(10, 2);
        assert_eq!(s.split_text("  hello there \n").unwrap(), vec!["hello there"]);
    }

    #[test]
    fn test_empty_input_quirk() {
        let s = splitter(10, 2);
        assert_eq!(s.split_text("").unwrap(), vec![String::new()]);
    }

    #[test]
    fn test_whitespace_only_input_is_pruned() {
        let s = splitter(10, 2);
        assert!(s.split_text("   \n\n ").unwrap().is_empty());
    }

    #[test]
    fn test_decompose_reconstructs_input() {
        let s = splitter(3, 1);
        let text = "One two three. Four five six seven, eight.\n\n\nNine ten eleven twelve thirteen";
        let leaves = s.decompose(text).unwrap();
        let rebuilt: String = leaves.iter().map(|l| l.text).collect();
        assert_eq!(rebuilt, text);
        assert!(leaves.iter().all(|l| l.size <= 3));
    }

    #[test]
    fn test_decompose_tags_fallback_leaves() {
        let s = splitter(2, 0);
        let leaves = s.decompose("alpha beta gamma").unwrap();
        assert_eq!(
            leaves,
            vec![leaf("alpha", 1, false), leaf(" beta", 1, false), leaf(" gamma", 1, false)]
        );

        let leaves = s.decompose("One two. Three four.").unwrap();
        assert_eq!(leaves, vec![leaf("One two.", 2, true), leaf(" Three four.", 2, true)]);
    }

    #[test]
    fn test_decompose_fits_as_natural() {
        let s = splitter(5, 0);
        assert_eq!(s.decompose("a b c").unwrap(), vec![leaf("a b c", 3, true)]);
    }

    #[test]
    fn test_merge_packs_and_overlaps() {
        let s = splitter(4, 2);
        let leaves = vec![
            leaf("a ", 1, true),
            leaf("b ", 1, true),
            leaf("c ", 1, true),
            leaf("d ", 1, true),
            leaf("e ", 1, true),
        ];
        let chunks = s.merge(&leaves).unwrap();
        assert_eq!(chunks, vec!["a b c d ", "c d e "]);
    }

    #[test]
    fn test_merge_drops_overlap_when_next_leaf_would_not_fit() {
        let s = splitter(4, 2);
        let leaves = vec![
            leaf("a ", 1, true),
            leaf("b ", 1, true),
            leaf("c ", 1, true),
            leaf("big ", 3, true),
        ];
        // overlap "b c" (2) + big (3) > 4, so "b " is evicted first
        let chunks = s.merge(&leaves).unwrap();
        assert_eq!(chunks, vec!["a b c ", "c big "]);
    }

    #[test]
    fn test_merge_evicts_all_overlap() {
        let s = splitter(4, 2);
        let leaves = vec![leaf("a ", 2, true), leaf("b ", 2, true), leaf("huge ", 4, false)];
        let chunks = s.merge(&leaves).unwrap();
        assert_eq!(chunks, vec!["a b ", "huge "]);
    }

    #[test]
    fn test_merge_zero_overlap() {
        let s = splitter(2, 0);
        let leaves = vec![leaf("a ", 1, true), leaf("b ", 1, true), leaf("c ", 1, true)];
        assert_eq!(s.merge(&leaves).unwrap(), vec!["a b ", "c "]);
    }

    /// Squared char count: joining two pieces costs more than their sum.
    struct SquaredChars;

    impl SizeMeasure for SquaredChars {
        fn measure(&self, text: &str) -> usize {
            text.chars().count().pow(2)
        }

        fn name(&self) -> &'static str {
            "squared_chars"
        }
    }

    #[test]
    fn test_merge_remeasures_non_additive_chunks() {
        let s = SentenceSplitter::builder()
            .max_size(5)
            .overlap_size(0)
            .measure(Arc::new(SquaredChars))
            .build()
            .unwrap();

        let chunks = s.split_text("abcd").unwrap();
        assert_eq!(chunks, vec!["ab", "cd"]);
        assert!(chunks.iter().all(|c| s.size_of(c) <= 5));
    }

    #[test]
    fn test_eviction_remeasures_non_additive_overlap() {
        let s = SentenceSplitter::builder()
            .max_size(9)
            .overlap_size(4)
            .measure(Arc::new(SquaredChars))
            .build()
            .unwrap();

        // summed overlap seeds three leaves; the joined check evicts one
        let chunks = s.split_text("abcdef").unwrap();
        assert_eq!(chunks, vec!["abc", "bcd", "cde", "def"]);
        assert!(chunks.iter().all(|c| s.size_of(c) <= 9));
    }

    #[test]
    fn test_merge_rejects_oversized_leaf() {
        let s = splitter(2, 0);
        let err = s.merge(&[leaf("abc", 3, true)]).unwrap_err();
        assert!(err.is_invariant());
    }

    #[test]
    fn test_invariant_error_for_multibyte_char() {
        let s = SentenceSplitter::builder()
            .max_size(1)
            .overlap_size(0)
            .measure(Arc::new(ByteMeasure))
            .build()
            .unwrap();
        let err = s.split_text("aé").unwrap_err();
        match err {
            SplitterError::ChunkingInvariant { size, max_size, fragment } => {
                assert_eq!(size, 2);
                assert_eq!(max_size, 1);
                assert_eq!(fragment, "é");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_multi_sentence_paragraph() {
        let s = splitter(20, 7);
        let text = (0..12)
            .map(|i| format!("Sentence number {i} has exactly seven words."))
            .collect::<Vec<_>>()
            .join(" ");
        let chunks = s.split_text(&text).unwrap();

        assert_eq!(chunks.len(), 11);
        for chunk in &chunks {
            assert!(s.size_of(chunk) <= 20, "chunk too large: {chunk}");
        }
        for pair in chunks.windows(2) {
            let last_sentence = pair[0].rsplit(". ").next().unwrap();
            assert!(pair[1].starts_with(last_sentence), "{:?} -> {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_builder_validation() {
        assert!(SentenceSplitter::builder().max_size(0).overlap_size(0).build().is_err());
        assert!(SentenceSplitter::builder().max_size(10).overlap_size(10).build().is_err());
        assert!(SentenceSplitter::builder().word_separator("").build().is_err());
        assert!(SentenceSplitter::builder().secondary_boundary_pattern("(").build().is_err());
    }

    #[test]
    fn test_from_config() {
        let config = SplitterConfig::sentence(200, 20);
        let s = SentenceSplitter::from_config(&config).unwrap();
        assert_eq!(s.max_size(), 200);
        assert_eq!(s.overlap_size(), 20);

        let bad = SplitterConfig::sentence(20, 200);
        assert!(SentenceSplitter::from_config(&bad).is_err());
    }
}
