//! Chunk packing and binary Merkle reduction.
//!
//! Leaves are 32-byte chunks. A chunk sequence is padded with zero chunks to
//! a power of two and reduced pairwise, bottom-up, into a single root:
//!
//! ```text
//!            root
//!          /      \
//!      h(a,b)    h(c,0)
//!      /   \     /   \
//!     a     b   c     0
//! ```
//!
//! A single chunk is its own root.

use crate::config::BYTES_PER_CHUNK;
use crate::hash::{Root, hash, hash_concat, to_fixed32};

/// One merkleization leaf.
pub type Chunk = [u8; BYTES_PER_CHUNK];

const ZERO_CHUNK: Chunk = [0u8; BYTES_PER_CHUNK];

/// Pack serialized items into 32-byte chunks.
///
/// - no items: a single zero chunk
/// - every item exactly one chunk long: the items, unchanged
/// - otherwise: the concatenated bytes split into chunks, the last one
///   right-padded with zeros
pub fn pack<B: AsRef<[u8]>>(serialized_items: &[B]) -> Vec<Chunk> {
    if serialized_items.is_empty() {
        return vec![ZERO_CHUNK];
    }

    if serialized_items
        .iter()
        .all(|item| item.as_ref().len() == BYTES_PER_CHUNK)
    {
        return serialized_items
            .iter()
            .map(|item| to_fixed32(item.as_ref()))
            .collect();
    }

    let mut buf: Vec<u8> = serialized_items
        .iter()
        .flat_map(|item| item.as_ref().iter().copied())
        .collect();
    let chunk_count = buf.len().div_ceil(BYTES_PER_CHUNK).max(1);
    buf.resize(chunk_count * BYTES_PER_CHUNK, 0);

    bytemuck::cast_slice::<u8, Chunk>(&buf).to_vec()
}

/// Reduce `chunks` to their Merkle root.
pub fn merkleize(chunks: &[Chunk]) -> Root {
    let mut level = chunks.to_vec();
    while !is_power_of_two(level.len()) {
        level.push(ZERO_CHUNK);
    }

    while level.len() > 1 {
        level = level
            .chunks_exact(2)
            .map(|pair| hash(bytemuck::cast_slice(pair)))
            .collect();
    }

    level[0]
}

/// `hash(root ‖ length)`, binding a collection length into its root.
pub fn mix_in_length(root: &Root, length: &[u8]) -> Root {
    hash_concat(root, length)
}

/// `hash(root ‖ type_index)`, binding a union selector into its root.
pub fn mix_in_type(root: &Root, type_index: &[u8]) -> Root {
    hash_concat(root, type_index)
}

/// `value` as a 32-byte little-endian chunk, the form mix-ins expect.
pub fn length_chunk(value: u64) -> Chunk {
    let mut chunk = ZERO_CHUNK;
    chunk[..8].copy_from_slice(&value.to_le_bytes());
    chunk
}

#[inline]
pub fn is_power_of_two(n: usize) -> bool {
    n != 0 && n & (n - 1) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(fill: u8) -> Chunk {
        [fill; BYTES_PER_CHUNK]
    }

    #[test]
    fn test_pack_empty() {
        let items: [Vec<u8>; 0] = [];
        assert_eq!(pack(&items), vec![ZERO_CHUNK]);
    }

    #[test]
    fn test_pack_full_chunks_unchanged() {
        let items = vec![chunk(1).to_vec(), chunk(2).to_vec(), chunk(3).to_vec()];
        assert_eq!(pack(&items), vec![chunk(1), chunk(2), chunk(3)]);
    }

    #[test]
    fn test_pack_small_items_share_chunk() {
        let items: Vec<Vec<u8>> = (1u16..=3).map(|v| v.to_le_bytes().to_vec()).collect();
        let chunks = pack(&items);
        assert_eq!(chunks.len(), 1);
        assert_eq!(&chunks[0][..6], &[1, 0, 2, 0, 3, 0]);
        assert!(chunks[0][6..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_pack_spills_into_second_chunk() {
        let items: Vec<Vec<u8>> = (0u64..5).map(|v| v.to_le_bytes().to_vec()).collect();
        let chunks = pack(&items);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1][0], 4);
        assert!(chunks[1][8..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_pack_long_item() {
        let item: Vec<u8> = (0..40).collect();
        let chunks = pack(&[item.clone()]);
        assert_eq!(chunks.len(), 2);
        assert_eq!(&chunks[0][..], &item[..32]);
        assert_eq!(&chunks[1][..8], &item[32..]);
    }

    #[test]
    fn test_merkleize_single_chunk_is_identity() {
        assert_eq!(merkleize(&[chunk(7)]), chunk(7));
    }

    #[test]
    fn test_merkleize_empty_is_zero_chunk() {
        assert_eq!(merkleize(&[]), ZERO_CHUNK);
    }

    #[test]
    fn test_merkleize_pair() {
        let expected = hash_concat(&chunk(1), &chunk(2));
        assert_eq!(merkleize(&[chunk(1), chunk(2)]), expected);
    }

    #[test]
    fn test_merkleize_pads_to_power_of_two() {
        let left = hash_concat(&chunk(1), &chunk(2));
        let right = hash_concat(&chunk(3), &ZERO_CHUNK);
        let expected = hash_concat(&left, &right);
        assert_eq!(merkleize(&[chunk(1), chunk(2), chunk(3)]), expected);
    }

    #[test]
    fn test_zero_hash_depth_one() {
        // Well-known zero hash: sha256 of two zero chunks.
        let expected = [
            0xf5, 0xa5, 0xfd, 0x42, 0xd1, 0x6a, 0x20, 0x30, 0x27, 0x98, 0xef, 0x6e, 0xd3, 0x09,
            0x97, 0x9b, 0x43, 0x00, 0x3d, 0x23, 0x20, 0xd9, 0xf0, 0xe8, 0xea, 0x98, 0x31, 0xa9,
            0x27, 0x59, 0xfb, 0x4b,
        ];
        assert_eq!(merkleize(&[ZERO_CHUNK, ZERO_CHUNK]), expected);
    }

    #[test]
    fn test_mix_ins() {
        let root = chunk(9);
        let length = length_chunk(3);
        assert_eq!(mix_in_length(&root, &length), hash_concat(&root, &length));
        assert_eq!(mix_in_type(&root, &length), mix_in_length(&root, &length));
        assert_ne!(mix_in_length(&root, &length), root);
        assert_ne!(
            mix_in_length(&root, &length_chunk(3)),
            mix_in_length(&root, &length_chunk(4))
        );
    }

    #[test]
    fn test_length_chunk() {
        let c = length_chunk(0x0102);
        assert_eq!(&c[..2], &[0x02, 0x01]);
        assert!(c[2..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_is_power_of_two() {
        assert!(!is_power_of_two(0));
        for n in [1, 2, 4, 8, 16, 1024] {
            assert!(is_power_of_two(n));
        }
        for n in [3, 5, 6, 7, 9, 12, 1023] {
            assert!(!is_power_of_two(n));
        }
    }
}
