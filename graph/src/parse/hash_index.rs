use std::collections::HashMap;

use crate::core::CommitIndex;

/// Assigns dense commit indices to hashes in first-seen order
#[derive(Debug, Clone, Default)]
pub struct HashIndex {
    by_hash: HashMap<String, CommitIndex>,
    hashes: Vec<String>,
}

impl HashIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `hash`, assigning the next free one if it is new
    pub fn index_of(&mut self, hash: &str) -> CommitIndex {
        if let Some(&index) = self.by_hash.get(hash) {
            return index;
        }
        let index = self.hashes.len() as CommitIndex;
        self.hashes.push(hash.to_string());
        self.by_hash.insert(hash.to_string(), index);
        index
    }

    pub fn get(&self, hash: &str) -> Option<CommitIndex> {
        self.by_hash.get(hash).copied()
    }

    pub fn hash(&self, index: CommitIndex) -> Option<&str> {
        self.hashes.get(index as usize).map(String::as_str)
    }

    /// First `len` characters of the hash, for display
    pub fn short_hash(&self, index: CommitIndex, len: usize) -> Option<&str> {
        self.hash(index).map(|h| h.get(..len).unwrap_or(h))
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}
