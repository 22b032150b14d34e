//! SSZ hash-tree-root for Rust values.
//!
//! Values describe themselves through [`SszType`] and [`SszValue`]. A
//! [`TreeHasher`] resolves each type to a hashing strategy once, then
//! computes 32-byte Merkle roots, optionally memoizing list and struct roots
//! in a shared [`HashCache`].

pub mod cache;
pub mod config;
pub mod encode;
pub mod error;
pub mod fields;
pub mod hash;
pub mod hasher;
pub mod merkle;
pub mod size;
pub mod strategy;
pub mod value;

#[cfg(test)]
mod fixtures;

// Re-export the derive macro
#[cfg(feature = "derive")]
pub use ssz_hash_derive::Ssz;

pub use cache::{CacheEntry, CacheKey, HashCache};
pub use config::HasherConfig;
pub use encode::{encode, encode_to_vec};
pub use error::{EncodeError, ErrorKind, HashError, StrategyError};
pub use hash::Root;
pub use hasher::TreeHasher;
pub use strategy::StrategyKind;
pub use value::{BasicKind, BasicValue, FieldDesc, Shape, SszType, SszValue, TypeDesc};
