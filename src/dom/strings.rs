//! String Interning Pool
//!
//! Deduplicated storage for tag names, attribute names and values, and text
//! content. Id 0 is reserved for the empty string.
//!
//! Uses hash-based lookup to avoid storing duplicate string data.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// String interning pool
#[derive(Debug)]
pub struct StringPool {
    /// Strings indexed by id
    entries: Vec<Box<str>>,
    /// Hash of string content -> ids with that hash
    hash_index: HashMap<u64, Vec<u32>>,
}

impl Default for StringPool {
    fn default() -> Self {
        Self::new()
    }
}

impl StringPool {
    /// Create a new pool holding only the empty string
    pub fn new() -> Self {
        StringPool {
            entries: vec![Box::from("")],
            hash_index: HashMap::new(),
        }
    }

    #[inline]
    fn compute_hash(s: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        s.hash(&mut hasher);
        hasher.finish()
    }

    /// Intern a string, returning its id
    pub fn intern(&mut self, s: &str) -> u32 {
        if s.is_empty() {
            return 0;
        }

        let hash = Self::compute_hash(s);
        if let Some(ids) = self.hash_index.get(&hash) {
            for &id in ids {
                if self.get(id) == Some(s) {
                    return id;
                }
            }
        }

        let id = self.entries.len() as u32;
        self.entries.push(Box::from(s));
        self.hash_index.entry(hash).or_default().push(id);
        id
    }

    /// Intern raw bytes, replacing invalid UTF-8 sequences
    pub fn intern_bytes(&mut self, bytes: &[u8]) -> u32 {
        self.intern(&String::from_utf8_lossy(bytes))
    }

    /// Resolve an id
    #[inline]
    pub fn get(&self, id: u32) -> Option<&str> {
        self.entries.get(id as usize).map(|s| s.as_ref())
    }

    /// Number of distinct strings (including the empty string)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if only the empty string is stored
    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }
}
