//! Serialization constants and hasher configuration.

/// Size of a merkleization chunk in bytes.
pub const BYTES_PER_CHUNK: usize = 32;

/// Size of the offset written for each variable-size child.
pub const BYTES_PER_LENGTH_OFFSET: usize = 4;

pub const BITS_PER_BYTE: usize = 8;

/// Exclusive upper bound for an encoded offset.
pub const MAX_BYTE_OFFSET: u64 = 1 << (BYTES_PER_LENGTH_OFFSET * BITS_PER_BYTE);

/// Entry bound used when a hasher builds its own cache.
pub const DEFAULT_CACHE_ENTRIES: u64 = 100_000;

/// Controls how a [`TreeHasher`](crate::TreeHasher) builds its strategies.
///
/// `use_cache` only affects performance. Roots are identical either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HasherConfig {
    /// Consult the hash cache before recomputing list and struct roots.
    pub use_cache: bool,
    /// Bound for the cache a hasher creates for itself.
    pub cache_entries: u64,
}

impl HasherConfig {
    /// Always recompute.
    pub const fn uncached() -> Self {
        Self {
            use_cache: false,
            cache_entries: DEFAULT_CACHE_ENTRIES,
        }
    }

    /// Memoize list and struct roots in a cache bounded to `entries`.
    pub const fn cached(entries: u64) -> Self {
        Self {
            use_cache: true,
            cache_entries: entries,
        }
    }
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self::uncached()
    }
}
