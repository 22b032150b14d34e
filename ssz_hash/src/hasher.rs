//! The hash-tree-root entrypoint.

use std::sync::Arc;

use crate::cache::HashCache;
use crate::config::HasherConfig;
use crate::error::HashError;
use crate::hash::Root;
use crate::strategy::{HashContext, Registry, StrategyKind};
use crate::value::{SszValue, TypeDesc};

/// Computes hash-tree-roots.
///
/// A hasher owns the per-type strategy registry and shares a [`HashCache`]
/// with anyone holding the same `Arc`. It is `Send + Sync`, and one instance
/// is meant to serve every caller in a process.
///
/// ```
/// use ssz_hash::{HasherConfig, TreeHasher};
///
/// let hasher = TreeHasher::new(HasherConfig::default());
/// let root = hasher.root_of(&5u64).unwrap();
/// assert_eq!(root[0], 5);
/// assert!(root[1..].iter().all(|&b| b == 0));
/// ```
pub struct TreeHasher {
    registry: Registry,
    cache: Arc<HashCache>,
}

impl TreeHasher {
    /// Create a hasher with its own cache of `config.cache_entries` entries.
    pub fn new(config: HasherConfig) -> Self {
        let cache = Arc::new(HashCache::new(config.cache_entries));
        Self::with_cache(config, cache)
    }

    /// Create a hasher backed by an existing cache.
    pub fn with_cache(config: HasherConfig, cache: Arc<HashCache>) -> Self {
        Self {
            registry: Registry::new(config),
            cache,
        }
    }

    pub fn config(&self) -> &HasherConfig {
        self.registry.config()
    }

    pub fn cache(&self) -> &Arc<HashCache> {
        &self.cache
    }

    /// Hash-tree-root of `value`.
    ///
    /// `None` stands for an untyped nil and fails with
    /// [`ErrorKind::NilInput`](crate::ErrorKind::NilInput). Every other
    /// failure is reported together with the type of `value`.
    pub fn hash_tree_root(&self, value: Option<&dyn SszValue>) -> Result<Root, HashError> {
        let value = value.ok_or_else(HashError::nil_input)?;
        let desc = value.type_desc();
        let strategy = self
            .registry
            .resolve(&desc)
            .map_err(|err| HashError::wrap(err, desc.name()))?;
        let ctx = HashContext {
            registry: &self.registry,
            cache: &self.cache,
        };
        strategy
            .hash(value, &ctx)
            .map_err(|err| HashError::wrap(err, desc.name()))
    }

    pub fn root_of<T: SszValue>(&self, value: &T) -> Result<Root, HashError> {
        self.hash_tree_root(Some(value as &dyn SszValue))
    }

    /// Strategy the registry resolves `desc` to, building it if needed.
    pub fn strategy_kind(&self, desc: &TypeDesc) -> Result<StrategyKind, HashError> {
        self.registry
            .resolve(desc)
            .map(|strategy| strategy.kind())
            .map_err(|err| HashError::wrap(err, desc.name()))
    }

    /// Number of types with a built strategy.
    pub fn registered_types(&self) -> usize {
        self.registry.len()
    }
}

impl Default for TreeHasher {
    fn default() -> Self {
        Self::new(HasherConfig::default())
    }
}
