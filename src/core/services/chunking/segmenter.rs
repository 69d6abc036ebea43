

use std::sync::Arc;

use regex::Regex;

use super::boundary::{split_by_regex, BoundaryStrategy};
use crate::core::error::{Result, SplitterError};

/// One link in the decomposition chain. Output must concatenate back to the input.
pub trait Segmenter: Send + Sync {
    fn segment<'a>(&self, text: &'a str) -> Vec<&'a str>;

    fn name(&self) -> &'static str;
}

/// The separator stays at the head of the piece that follows it.
#[derive(Debug, Clone)]
pub struct SeparatorSegmenter {
    separator: String,
    name: &'static str,
}

impl SeparatorSegmenter {
    pub fn new(separator: impl Into<String>, name: &'static str) -> Result<Self> {
        let separator = separator.into();
        if separator.is_empty() {
            return Err(SplitterError::configuration(format!("{name} separator must not be empty")));
        }
        Ok(Self { separator, name })
    }
}

impl Segmenter for SeparatorSegmenter {
    fn segment<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut pieces = Vec::new();
        let mut start = 0;
        for (idx, _) in text.match_indices(self.separator.as_str()) {
            if idx > start {
                pieces.push(&text[start..idx]);
                start = idx;
            }
        }
        if start < text.len() || pieces.is_empty() {
            pieces.push(&text[start..]);
        }
        pieces
    }

    fn name(&self) -> &'static str {
        self.name
    }
}


pub struct BoundarySegmenter {
    strategy: Arc<dyn BoundaryStrategy>,
}

impl BoundarySegmenter {
    pub fn new(strategy: Arc<dyn BoundaryStrategy>) -> Self {
        Self { strategy }
    }
}

impl Segmenter for BoundarySegmenter {
    fn segment<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.strategy.segment(text)
    }

    fn name(&self) -> &'static str {
        self.strategy.name()
    }
}


#[derive(Debug, Clone)]
pub struct RegexSegmenter {
    re: Regex,
}

impl RegexSegmenter {
    pub fn new(pattern: &str) -> Result<Self> {
        let re = Regex::new(pattern).map_err(|e| {
            SplitterError::configuration(format!("invalid secondary boundary pattern {pattern:?}: {e}"))
        })?;
        Ok(Self { re })
    }
}

impl Segmenter for RegexSegmenter {
    fn segment<'a>(&self, text: &'a str) -> Vec<&'a str> {
        split_by_regex(&self.re, text)
    }

    fn name(&self) -> &'static str {
        "secondary_regex"
    }
}


#[derive(Debug, Clone, Copy, Default)]
pub struct CharSegmenter;

impl Segmenter for CharSegmenter {
    fn segment<'a>(&self, text: &'a str) -> Vec<&'a str> {
        if text.is_empty() {
            return vec![text];
        }
        text.char_indices()
            .map(|(idx, c)| &text[idx..idx + c.len_utf8()])
            .collect()
    }

    fn name(&self) -> &'static str {
        "char"
    }
}


pub struct SegmenterChain {
    primary: [Box<dyn Segmenter>; 2],
    fallback: [Box<dyn Segmenter>; 3],
}

/// Pieces plus whether they came from the primary (natural boundary) chain.
pub struct Segmentation<'a> {
    pub pieces: Vec<&'a str>,
    pub natural: bool,
    pub segmenter: &'static str,
}

impl SegmenterChain {
    pub fn new(
        paragraph_separator: &str,
        boundary: Arc<dyn BoundaryStrategy>,
        secondary_pattern: &str,
        word_separator: &str,
    ) -> Result<Self> {
        Ok(Self {
            primary: [
                Box::new(SeparatorSegmenter::new(paragraph_separator, "paragraph")?),
                Box::new(BoundarySegmenter::new(boundary)),
            ],
            fallback: [
                Box::new(RegexSegmenter::new(secondary_pattern)?),
                Box::new(SeparatorSegmenter::new(word_separator, "word")?),
                Box::new(CharSegmenter),
            ],
        })
    }

    /// First segmenter yielding more than one piece wins. If none does, the
    /// character segmenter's single piece is returned.
    pub fn segment<'a>(&self, text: &'a str) -> Segmentation<'a> {
        for segmenter in &self.primary {
            let pieces = segmenter.segment(text);
            if pieces.len() > 1 {
                return Segmentation { pieces, natural: true, segmenter: segmenter.name() };
            }
        }

        let mut last = Segmentation { pieces: vec![text], natural: false, segmenter: "none" };
        for segmenter in &self.fallback {
            let pieces = segmenter.segment(text);
            let found = pieces.len() > 1;
            last = Segmentation { pieces, natural: false, segmenter: segmenter.name() };
            if found {
                break;
            }
        }
        last
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.primary
            .iter()
            .chain(self.fallback.iter())
            .map(|s| s.name())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::chunking::boundary::RegexBoundary;
    use crate::core::services::chunking::config::DEFAULT_CHUNKING_REGEX;

    fn chain() -> SegmenterChain {
        SegmenterChain::new("\n\n\n", Arc::new(RegexBoundary::default()), DEFAULT_CHUNKING_REGEX, " ")
            .unwrap()
    }

    #[test]
    fn test_separator_keeps_separator_on_next_piece() {
        let s = SeparatorSegmenter::new(" ", "word").unwrap();
        assert_eq!(s.segment("a b  c"), vec!["a", " b", " ", " c"]);
        assert_eq!(s.segment(" lead"), vec![" lead"]);
        assert_eq!(s.segment("none"), vec!["none"]);
        assert_eq!(s.segment(""), vec![""]);
    }

    #[test]
    fn test_separator_rejects_empty() {
        assert!(SeparatorSegmenter::new("", "word").is_err());
    }

    #[test]
    fn test_char_segmenter() {
        assert_eq!(CharSegmenter.segment("aé😀"), vec!["a", "é", "😀"]);
        assert_eq!(CharSegmenter.segment("x"), vec!["x"]);
    }

    #[test]
    fn test_chain_prefers_paragraphs() {
        let seg = chain().segment("One. Two.\n\n\nThree.");
        assert!(seg.natural);
        assert_eq!(seg.segmenter, "paragraph");
        assert_eq!(seg.pieces, vec!["One. Two.", "\n\n\nThree."]);
    }

    #[test]
    fn test_chain_then_sentences() {
        let seg = chain().segment("One. Two.");
        assert!(seg.natural);
        assert_eq!(seg.segmenter, "regex");
        assert_eq!(seg.pieces, vec!["One.", " Two."]);
    }

    #[test]
    fn test_chain_falls_back_to_words_then_chars() {
        let seg = chain().segment("alpha beta");
        assert!(!seg.natural);
        assert_eq!(seg.segmenter, "word");
        assert_eq!(seg.pieces, vec!["alpha", " beta"]);

        let seg = chain().segment("abc");
        assert!(!seg.natural);
        assert_eq!(seg.segmenter, "char");
        assert_eq!(seg.pieces, vec!["a", "b", "c"]);

        let seg = chain().segment("a");
        assert_eq!(seg.pieces, vec!["a"]);
    }

    #[test]
    fn test_chain_order() {
        assert_eq!(
            chain().names(),
            vec!["paragraph", "regex", "secondary_regex", "word", "char"]
        );
    }
}
