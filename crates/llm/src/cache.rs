use crate::request::ChatRequest;
use crate::transport::ChatCompletion;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;

/// Short-circuit in front of the invoker.
///
/// Keyed on [`ChatRequest::cache_key`], which covers the semantic request
/// content and nothing else. A hit returns the stored completion without
/// touching the transport, so no new origin header is ever emitted for a
/// cached answer; whichever caller populated the entry is the only one
/// whose origin reached the network for it.
pub struct CacheGate {
    entries: Mutex<LruCache<String, ChatCompletion>>,
}

impl CacheGate {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("non-zero after max");
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get(&self, request: &ChatRequest) -> Option<ChatCompletion> {
        let key = request.cache_key();
        let hit = self.entries.lock().ok()?.get(&key).cloned();
        if hit.is_some() {
            log::debug!("cache hit: model={} key={key}", request.model);
        }
        hit
    }

    pub fn put(&self, request: &ChatRequest, completion: ChatCompletion) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.put(request.cache_key(), completion);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
