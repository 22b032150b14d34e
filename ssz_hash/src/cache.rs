//! Bounded memoization of Merkle roots keyed by encoded content.
//!
//! [`HashCache::canonical_key`] is the BLAKE3 digest of a value's canonical
//! encoding alone. Cache-backed strategies store roots under
//! [`HashCache::typed_key`], which also binds the value's type: a `Vec<u8>`
//! and a `Vec<u16>` may encode identically but never share a root. The bound
//! is enforced by the
//! cache's own maintenance and is only eventually reached: right after a
//! burst of insertions [`HashCache::entry_count`] may exceed
//! [`HashCache::max_entries`].

use std::hash::{DefaultHasher, Hash, Hasher};

use bytemuck_derive::{Pod, Zeroable};
use moka::sync::Cache;
use tracing::debug;

use crate::encode::encode_to_vec;
use crate::error::EncodeError;
use crate::hash::Root;
use crate::value::{SszValue, TypeDesc};

/// Digest of a canonical encoding.
pub type CacheKey = [u8; 32];

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct CacheEntry {
    /// Key the entry was stored under.
    pub hash: CacheKey,
    pub merkle_root: Root,
}

pub struct HashCache {
    entries: Cache<CacheKey, CacheEntry>,
    max_entries: u64,
}

impl HashCache {
    pub fn new(max_entries: u64) -> Self {
        let entries = Cache::builder().max_capacity(max_entries).build();
        Self {
            entries,
            max_entries,
        }
    }

    /// Key for `value`, derived from its canonical encoding rather than its root.
    pub fn canonical_key(value: &dyn SszValue) -> Result<CacheKey, EncodeError> {
        let encoded = encode_to_vec(value)?;
        Ok(*blake3::hash(&encoded).as_bytes())
    }

    /// Key for `value` bound to its type as well as its encoding.
    pub fn typed_key(value: &dyn SszValue) -> Result<CacheKey, EncodeError> {
        let encoded = encode_to_vec(value)?;
        Ok(Self::key_for(&value.type_desc(), &encoded))
    }

    pub(crate) fn key_for(desc: &TypeDesc, encoded: &[u8]) -> CacheKey {
        let mut type_id = DefaultHasher::new();
        desc.id().hash(&mut type_id);

        let name = desc.name().as_bytes();
        let mut hasher = blake3::Hasher::new();
        hasher.update(&type_id.finish().to_le_bytes());
        hasher.update(&(name.len() as u64).to_le_bytes());
        hasher.update(name);
        hasher.update(encoded);
        *hasher.finalize().as_bytes()
    }

    /// Insert or overwrite the root stored under `key`.
    pub fn add_root(&self, key: CacheKey, merkle_root: Root) {
        self.entries.insert(
            key,
            CacheEntry {
                hash: key,
                merkle_root,
            },
        );
    }

    pub fn lookup_by_encoded_hash(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.entries.get(key)
    }

    /// Approximate number of live entries.
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }

    pub fn max_entries(&self) -> u64 {
        self.max_entries
    }

    /// Apply pending evictions now instead of on the next cache operations.
    pub fn sync(&self) {
        self.entries.run_pending_tasks();
    }

    /// Drop every entry.
    pub fn reset(&self) {
        self.entries.invalidate_all();
        self.entries.run_pending_tasks();
        debug!(max_entries = self.max_entries, "hash cache reset");
    }
}

impl std::fmt::Debug for HashCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashCache")
            .field("entry_count", &self.entry_count())
            .field("max_entries", &self.max_entries)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    fn key(i: u64) -> CacheKey {
        let mut k = [0u8; 32];
        k[..8].copy_from_slice(&i.to_le_bytes());
        k
    }

    #[test]
    fn test_lookup_on_empty_cache() {
        let cache = HashCache::new(16);
        assert!(cache.lookup_by_encoded_hash(&key(1)).is_none());
    }

    #[test]
    fn test_add_then_lookup() {
        let cache = HashCache::new(16);
        cache.add_root(key(1), [7u8; 32]);

        let entry = cache.lookup_by_encoded_hash(&key(1)).unwrap();
        assert_eq!(entry.hash, key(1));
        assert_eq!(entry.merkle_root, [7u8; 32]);
    }

    #[test]
    fn test_add_overwrites() {
        let cache = HashCache::new(16);
        cache.add_root(key(1), [1u8; 32]);
        cache.add_root(key(1), [2u8; 32]);
        assert_eq!(
            cache.lookup_by_encoded_hash(&key(1)).unwrap().merkle_root,
            [2u8; 32]
        );
    }

    #[test]
    fn test_canonical_key_follows_encoding() {
        // Same bytes, different types.
        let a = HashCache::canonical_key(&vec![1u8, 0]).unwrap();
        let b = HashCache::canonical_key(&1u16).unwrap();
        assert_eq!(a, b);

        let c = HashCache::canonical_key(&2u16).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_typed_key_separates_types() {
        let bytes = HashCache::typed_key(&vec![1u8, 0]).unwrap();
        let words = HashCache::typed_key(&vec![1u16]).unwrap();
        assert_ne!(bytes, words);
        assert_ne!(bytes, HashCache::canonical_key(&vec![1u8, 0]).unwrap());
        assert_eq!(bytes, HashCache::typed_key(&vec![1u8, 0]).unwrap());
    }

    #[test]
    fn test_canonical_key_unsupported() {
        assert!(HashCache::canonical_key(&String::from("x")).is_err());
    }

    #[test]
    fn test_max_size_is_eventually_enforced() {
        let max_entries = 1_000u64;
        let extra = 500u64;
        let cache = HashCache::new(max_entries);
        for i in 0..max_entries + extra {
            cache.add_root(key(i), [1u8; 32]);
        }

        let mut attempts = 0;
        while cache.entry_count() > max_entries && attempts < 100 {
            cache.sync();
            thread::sleep(Duration::from_millis(10));
            attempts += 1;
        }
        assert!(
            cache.entry_count() <= max_entries,
            "expected at most {} entries, got {}",
            max_entries,
            cache.entry_count()
        );
    }

    #[test]
    fn test_reset() {
        let cache = HashCache::new(16);
        cache.add_root(key(1), [1u8; 32]);
        cache.reset();
        assert!(cache.lookup_by_encoded_hash(&key(1)).is_none());
        assert_eq!(cache.entry_count(), 0);
    }

    #[test]
    fn test_entry_is_pod() {
        let entry = CacheEntry {
            hash: key(3),
            merkle_root: [9u8; 32],
        };
        let bytes = bytemuck::bytes_of(&entry);
        assert_eq!(bytes.len(), 64);
        assert_eq!(&bytes[32..], &[9u8; 32]);
    }
}
