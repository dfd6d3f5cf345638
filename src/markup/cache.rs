//! Memoization cache for markup rendering
//!
//! Caches rendered HTML keyed by a hash of the source text. During a stream
//! only the reply being written changes; every finished message hits.

use std::collections::{HashMap, VecDeque};
use std::hash::{DefaultHasher, Hash, Hasher};

use super::{render_markup, MARKUP_CACHE_MAX_ENTRIES};

struct CachedHtml {
    source: String,
    html: String,
}

/// Memoization cache for [`render_markup`].
pub struct MarkupCache {
    /// Cache entries keyed by content hash
    entries: HashMap<u64, CachedHtml>,
    /// Insertion order for eviction (oldest first)
    insertion_order: VecDeque<u64>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl Default for MarkupCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupCache {
    pub fn new() -> Self {
        Self::with_capacity(MARKUP_CACHE_MAX_ENTRIES)
    }

    /// Create a cache holding at most `capacity` entries (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            insertion_order: VecDeque::new(),
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    fn hash_content(content: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        content.hash(&mut hasher);
        hasher.finish()
    }

    /// Render with caching.
    pub fn render(&mut self, content: &str) -> String {
        let hash = Self::hash_content(content);

        if let Some(cached) = self.entries.get(&hash) {
            if cached.source == content {
                self.hits += 1;
                return cached.html.clone();
            }
        }

        self.misses += 1;
        let html = render_markup(content);

        if !self.entries.contains_key(&hash) {
            while self.entries.len() >= self.capacity {
                match self.insertion_order.pop_front() {
                    Some(oldest) => {
                        self.entries.remove(&oldest);
                    }
                    None => break,
                }
            }
            self.insertion_order.push_back(hash);
        }

        self.entries.insert(
            hash,
            CachedHtml {
                source: content.to_string(),
                html: html.clone(),
            },
        );

        html
    }

    /// Cache statistics (hits, misses)
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear all entries. Statistics are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.insertion_order.clear();
    }
}
