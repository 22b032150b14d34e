//! SHA-256 digest helpers.

use sha2::{Digest, Sha256};

use crate::encode::encode_to_vec;
use crate::error::EncodeError;
use crate::value::SszValue;

/// A 32-byte Merkle root.
pub type Root = [u8; 32];

/// SHA-256 of `data`.
#[inline]
pub fn hash(data: &[u8]) -> Root {
    Sha256::digest(data).into()
}

/// SHA-256 of `left ‖ right`.
#[inline]
pub(crate) fn hash_concat(left: &[u8], right: &[u8]) -> Root {
    Sha256::new()
        .chain_update(left)
        .chain_update(right)
        .finalize()
        .into()
}

/// Copy `bytes` into a 32-byte array, truncating or zero-extending.
pub fn to_fixed32(bytes: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let n = bytes.len().min(out.len());
    out[..n].copy_from_slice(&bytes[..n]);
    out
}

/// SHA-256 of the canonical encoding of `value`.
pub fn hashed_encoding(value: &dyn SszValue) -> Result<Root, EncodeError> {
    let encoded = encode_to_vec(value)?;
    Ok(hash(&encoded))
}
