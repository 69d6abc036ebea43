

use thiserror::Error;

use crate::utils::safe_truncate_ellipsis;


const PREVIEW_CHARS: usize = 40;

#[derive(Error, Debug)]
pub enum SplitterError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Chunking invariant violated: fragment {fragment:?} measures {size} > max_size {max_size}")]
    ChunkingInvariant {
        size: usize,
        max_size: usize,
        fragment: String,
    },

    #[error("Settings error: {0}")]
    Settings(#[from] ::config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SplitterError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Fragment that cannot be decomposed further yet still exceeds `max_size`.
    pub fn invariant(fragment: &str, size: usize, max_size: usize) -> Self {
        Self::ChunkingInvariant {
            size,
            max_size,
            fragment: safe_truncate_ellipsis(fragment, PREVIEW_CHARS),
        }
    }

    pub fn is_invariant(&self) -> bool {
        matches!(self, Self::ChunkingInvariant { .. })
    }
}

pub type Result<T> = std::result::Result<T, SplitterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invariant_preview_is_truncated() {
        let long = "x".repeat(100);
        let err = SplitterError::invariant(&long, 3, 1);
        match err {
            SplitterError::ChunkingInvariant { fragment, size, max_size } => {
                assert_eq!(fragment.chars().count(), PREVIEW_CHARS + 3);
                assert_eq!(size, 3);
                assert_eq!(max_size, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_error_display() {
        let err = SplitterError::configuration("unknown model foo");
        assert_eq!(err.to_string(), "Configuration error: unknown model foo");
        assert!(!err.is_invariant());
        assert!(SplitterError::invariant("😀", 2, 1).is_invariant());
    }
}
