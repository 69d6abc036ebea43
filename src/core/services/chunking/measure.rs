

use std::num::NonZeroUsize;
use std::sync::Arc;

use lazy_static::lazy_static;
use lru::LruCache;
use parking_lot::Mutex;
use tiktoken_rs::CoreBPE;
use tracing::debug;

use super::config::{MeasureKind, SplitterConfig};
use crate::core::error::{Result, SplitterError};

const BPE_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(4) {
    Some(n) => n,
    None => unreachable!(),
};

lazy_static! {
    static ref BPE_CACHE: Mutex<LruCache<String, Arc<CoreBPE>>> =
        Mutex::new(LruCache::new(BPE_CACHE_CAPACITY));
}

/// Converts a fragment into size units. Implementations must be pure.
pub trait SizeMeasure: Send + Sync {
    fn measure(&self, text: &str) -> usize;

    fn name(&self) -> &'static str;

    /// True when `measure(a + b) <= measure(a) + measure(b)` for all inputs,
    /// so summed leaf sizes bound the size of the joined chunk.
    fn is_subadditive(&self) -> bool {
        false
    }
}


#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceMeasure;

impl SizeMeasure for WhitespaceMeasure {
    fn measure(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }

    fn name(&self) -> &'static str {
        "whitespace"
    }

    fn is_subadditive(&self) -> bool {
        true
    }
}


#[derive(Debug, Clone, Copy, Default)]
pub struct ByteMeasure;

impl SizeMeasure for ByteMeasure {
    fn measure(&self, text: &str) -> usize {
        text.len()
    }

    fn name(&self) -> &'static str {
        "bytes"
    }

    fn is_subadditive(&self) -> bool {
        true
    }
}


pub struct TiktokenMeasure {
    model: String,
    bpe: Arc<CoreBPE>,
}

impl TiktokenMeasure {
    pub fn for_model(model: &str) -> Result<Self> {
        let model = if model.is_empty() {
            super::config::DEFAULT_TOKENIZER_MODEL
        } else {
            model
        };

        if let Some(bpe) = BPE_CACHE.lock().get(model) {
            return Ok(Self {
                model: model.to_string(),
                bpe: Arc::clone(bpe),
            });
        }

        let bpe = tiktoken_rs::get_bpe_from_model(model).map_err(|e| {
            SplitterError::configuration(format!("failed to get encoding for model {model}: {e}"))
        })?;
        let bpe = Arc::new(bpe);
        BPE_CACHE.lock().put(model.to_string(), Arc::clone(&bpe));
        debug!("Loaded tokenizer tables for {}", model);

        Ok(Self {
            model: model.to_string(),
            bpe,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl std::fmt::Debug for TiktokenMeasure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TiktokenMeasure").field("model", &self.model).finish()
    }
}

impl SizeMeasure for TiktokenMeasure {
    fn measure(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    fn name(&self) -> &'static str {
        "tiktoken"
    }
}


pub fn measure_from_config(config: &SplitterConfig) -> Result<Arc<dyn SizeMeasure>> {
    Ok(match config.measure {
        MeasureKind::Whitespace => Arc::new(WhitespaceMeasure),
        MeasureKind::Bytes => Arc::new(ByteMeasure),
        MeasureKind::Tiktoken => Arc::new(TiktokenMeasure::for_model(&config.tokenizer_model)?),
    })
}
