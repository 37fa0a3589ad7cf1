//! Compiled selector cache
//!
//! Stored addresses repeat the same handful of selectors (`body`,
//! `p:nth-child(3)`, ...), so compiled lists are kept in a process-wide LRU.

use super::parser::{parse, SelectorList};
use crate::error::{Error, Result};
use lru::LruCache;
use once_cell::sync::Lazy;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::trace;

/// Maximum number of compiled selectors kept
pub const CACHE_CAPACITY: usize = 256;

static SELECTOR_CACHE: Lazy<Mutex<LruCache<String, Arc<SelectorList>>>> = Lazy::new(|| {
    let capacity = NonZeroUsize::new(CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
    Mutex::new(LruCache::new(capacity))
});

/// Compile selector text, reusing a cached list when available.
/// Parse failures are not cached.
pub fn compile(selector: &str) -> Result<Arc<SelectorList>> {
    {
        let mut cache = SELECTOR_CACHE.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(list) = cache.get(selector) {
            trace!(selector, "selector cache hit");
            return Ok(Arc::clone(list));
        }
    }

    let list = Arc::new(parse(selector).map_err(|reason| Error::invalid_selector(selector, reason))?);

    let mut cache = SELECTOR_CACHE.lock().unwrap_or_else(PoisonError::into_inner);
    cache.put(selector.to_string(), Arc::clone(&list));
    Ok(list)
}

/// Number of cached selectors
pub fn cached_len() -> usize {
    SELECTOR_CACHE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .len()
}
