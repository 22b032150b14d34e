//! Per-type hashing strategies and the registry that builds them.
//!
//! A strategy is built once per type, on first use, and shared by every
//! caller afterwards. Building only inspects the type's own shape. Child
//! strategies are looked up lazily through the same registry and pinned in a
//! [`OnceLock`] the first time they are needed.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::cache::HashCache;
use crate::config::HasherConfig;
use crate::encode::encode_acyclic;
use crate::error::StrategyError;
use crate::fields::resolve_fields;
use crate::hash::{Root, hash};
use crate::merkle::{length_chunk, merkleize, mix_in_length, pack};
use crate::size::pointer_cycle;
use crate::value::{Shape, SszValue, TypeDesc};

/// Which hashing rule a type resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// Bool or unsigned integer.
    Basic,
    /// Fixed array of basic elements.
    ByteArray,
    /// List of basic elements.
    BasicSlice,
    /// Fixed array of composite elements.
    CompositeArray,
    /// List of composite elements.
    CompositeSlice,
    Struct,
    Pointer,
}

/// A child strategy, resolved on first use.
pub(crate) struct Child {
    desc: TypeDesc,
    resolved: OnceLock<Arc<Strategy>>,
}

impl Child {
    fn new(desc: TypeDesc) -> Self {
        Self {
            desc,
            resolved: OnceLock::new(),
        }
    }

    fn get(&self, registry: &Registry) -> Result<&Strategy, StrategyError> {
        if let Some(strategy) = self.resolved.get() {
            return Ok(&**strategy);
        }
        let strategy = registry.resolve(&self.desc)?;
        Ok(&**self.resolved.get_or_init(|| strategy))
    }
}

pub(crate) struct FieldSlot {
    name: &'static str,
    selector: usize,
    child: Child,
}

pub(crate) enum Strategy {
    Basic,
    ByteArray,
    BasicSlice {
        cached: bool,
    },
    CompositeArray {
        elem: Child,
    },
    CompositeSlice {
        elem: Child,
        cached: bool,
    },
    Struct {
        type_name: &'static str,
        fields: Vec<FieldSlot>,
        cached: bool,
    },
    Pointer {
        elem: Child,
    },
}

impl Strategy {
    fn build(desc: &TypeDesc, config: &HasherConfig) -> Result<Self, StrategyError> {
        let cached = config.use_cache;
        let shape = desc.shape();
        if !matches!(shape, Shape::Basic(_) | Shape::Unsupported) {
            if let Some(type_name) = pointer_cycle(desc) {
                return Err(StrategyError::RecursivePointer { type_name });
            }
        }

        let strategy = match shape {
            Shape::Basic(_) => Strategy::Basic,
            Shape::Vector { elem, .. } if elem.basic_kind().is_some() => Strategy::ByteArray,
            Shape::Vector { elem, .. } => Strategy::CompositeArray {
                elem: supported_child(elem)?,
            },
            Shape::List { elem } if elem.basic_kind().is_some() => Strategy::BasicSlice { cached },
            Shape::List { elem } => Strategy::CompositeSlice {
                elem: supported_child(elem)?,
                cached,
            },
            Shape::Container(_) => {
                let fields = resolve_fields(desc)?
                    .into_iter()
                    .map(|f| {
                        Ok(FieldSlot {
                            name: f.name,
                            selector: f.selector,
                            child: supported_child(f.ty).map_err(|source| {
                                StrategyError::Field {
                                    container: desc.name(),
                                    field: f.name,
                                    source: Box::new(source),
                                }
                            })?,
                        })
                    })
                    .collect::<Result<Vec<_>, StrategyError>>()?;
                Strategy::Struct {
                    type_name: desc.name(),
                    fields,
                    cached,
                }
            }
            Shape::Pointer { elem, .. } => Strategy::Pointer {
                elem: supported_child(elem)?,
            },
            Shape::Unsupported => {
                return Err(StrategyError::Unsupported {
                    type_name: desc.name(),
                });
            }
        };
        Ok(strategy)
    }

    pub(crate) fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Basic => StrategyKind::Basic,
            Strategy::ByteArray => StrategyKind::ByteArray,
            Strategy::BasicSlice { .. } => StrategyKind::BasicSlice,
            Strategy::CompositeArray { .. } => StrategyKind::CompositeArray,
            Strategy::CompositeSlice { .. } => StrategyKind::CompositeSlice,
            Strategy::Struct { .. } => StrategyKind::Struct,
            Strategy::Pointer { .. } => StrategyKind::Pointer,
        }
    }

    /// Merkle root of `value`, which must be of the type this strategy was built for.
    pub(crate) fn hash(&self, value: &dyn SszValue, ctx: &HashContext<'_>) -> Result<Root, StrategyError> {
        match self {
            Strategy::Basic | Strategy::ByteArray => {
                let encoded = encode_acyclic(value)?;
                Ok(merkleize(&pack(&[encoded])))
            }
            Strategy::BasicSlice { cached } => ctx.memoize(*cached, value, || {
                let items = (0..value.len())
                    .map(|i| encode_acyclic(element(value, i)?).map_err(StrategyError::from))
                    .collect::<Result<Vec<_>, StrategyError>>()?;
                let root = merkleize(&pack(&items));
                Ok(mix_in_length(&root, &length_chunk(value.len() as u64)))
            }),
            Strategy::CompositeArray { elem } => {
                let roots = element_roots(value, elem, ctx)?;
                Ok(merkleize(&roots))
            }
            Strategy::CompositeSlice { elem, cached } => ctx.memoize(*cached, value, || {
                let roots = element_roots(value, elem, ctx)?;
                Ok(mix_in_length(&merkleize(&roots), &length_chunk(value.len() as u64)))
            }),
            Strategy::Struct {
                type_name,
                fields,
                cached,
            } => ctx.memoize(*cached, value, || {
                let mut concat = Vec::with_capacity(fields.len() * 32);
                for slot in fields {
                    let root = hash_field(value, slot, ctx).map_err(|source| StrategyError::Field {
                        container: *type_name,
                        field: slot.name,
                        source: Box::new(source),
                    })?;
                    concat.extend_from_slice(&root);
                }
                Ok(hash(&concat))
            }),
            Strategy::Pointer { elem } => match value.pointee() {
                Some(inner) => elem.get(ctx.registry)?.hash(inner, ctx),
                None => Ok(hash(&encode_acyclic(value)?)),
            },
        }
    }
}

fn supported_child(desc: TypeDesc) -> Result<Child, StrategyError> {
    if !desc.is_supported() {
        return Err(StrategyError::Unsupported {
            type_name: desc.name(),
        });
    }
    Ok(Child::new(desc))
}

fn element(value: &dyn SszValue, index: usize) -> Result<&dyn SszValue, StrategyError> {
    value.element(index).ok_or_else(|| StrategyError::ShapeMismatch {
        type_name: value.type_desc().name(),
        detail: format!("missing element {index}"),
    })
}

fn element_roots(
    value: &dyn SszValue,
    elem: &Child,
    ctx: &HashContext<'_>,
) -> Result<Vec<Root>, StrategyError> {
    if value.is_empty() {
        return Ok(Vec::new());
    }
    let strategy = elem.get(ctx.registry)?;
    (0..value.len())
        .map(|i| strategy.hash(element(value, i)?, ctx))
        .collect()
}

fn hash_field(
    value: &dyn SszValue,
    slot: &FieldSlot,
    ctx: &HashContext<'_>,
) -> Result<Root, StrategyError> {
    let field = value
        .field(slot.selector)
        .ok_or_else(|| StrategyError::FieldResolution {
            type_name: value.type_desc().name(),
            reason: format!("no value for field `{}`", slot.name),
        })?;
    slot.child.get(ctx.registry)?.hash(field, ctx)
}

/// Shared state threaded through one hashing call.
pub(crate) struct HashContext<'a> {
    pub(crate) registry: &'a Registry,
    pub(crate) cache: &'a HashCache,
}

impl HashContext<'_> {
    fn memoize<F>(&self, cached: bool, value: &dyn SszValue, compute: F) -> Result<Root, StrategyError>
    where
        F: FnOnce() -> Result<Root, StrategyError>,
    {
        if !cached {
            return compute();
        }

        let desc = value.type_desc();
        let key = HashCache::key_for(&desc, &encode_acyclic(value)?);
        if let Some(entry) = self.cache.lookup_by_encoded_hash(&key) {
            trace!(type_name = desc.name(), "hash cache hit");
            return Ok(entry.merkle_root);
        }

        trace!(type_name = desc.name(), "hash cache miss");
        let root = compute()?;
        self.cache.add_root(key, root);
        Ok(root)
    }
}

/// Strategies keyed by type identity. Each type is built at most once.
pub(crate) struct Registry {
    config: HasherConfig,
    strategies: RwLock<HashMap<TypeId, Arc<Strategy>>>,
}

impl Registry {
    pub(crate) fn new(config: HasherConfig) -> Self {
        Self {
            config,
            strategies: RwLock::new(HashMap::new()),
        }
    }

    pub(crate) fn config(&self) -> &HasherConfig {
        &self.config
    }

    pub(crate) fn resolve(&self, desc: &TypeDesc) -> Result<Arc<Strategy>, StrategyError> {
        if let Some(strategy) = self.strategies.read().get(&desc.id()) {
            return Ok(Arc::clone(strategy));
        }

        let mut strategies = self.strategies.write();
        if let Some(strategy) = strategies.get(&desc.id()) {
            return Ok(Arc::clone(strategy));
        }

        let strategy = Arc::new(Strategy::build(desc, &self.config)?);
        debug!(
            type_name = desc.name(),
            kind = ?strategy.kind(),
            cached = self.config.use_cache,
            "built hashing strategy"
        );
        strategies.insert(desc.id(), Arc::clone(&strategy));
        Ok(strategy)
    }

    pub(crate) fn len(&self) -> usize {
        self.strategies.read().len()
    }
}
