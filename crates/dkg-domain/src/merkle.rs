use alloy::{
    primitives::{B256, U256, keccak256},
    sol_types::SolValue,
};

/// Chunk unit used for both leaf hashing and billed dataset size.
pub const CHUNK_BYTE_SIZE: usize = 32;

/// Merkle root over the newline-joined triples split into 32-byte chunks.
///
/// Leaves are `keccak256(abi.encodePacked(chunk, uint256(index)))`; each level
/// hashes sorted pairs and carries an odd node up unchanged. Returns `None` when
/// there is nothing to hash.
pub fn calculate_merkle_root(triples: &[String]) -> Option<B256> {
    let mut level: Vec<B256> = split_into_chunks(triples)
        .iter()
        .enumerate()
        .map(|(i, chunk)| leaf_hash(chunk, i))
        .collect();

    if level.is_empty() {
        return None;
    }

    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));

        for pair in level.chunks(2) {
            match pair {
                [left, right] => next.push(hash_sorted_pair(*left, *right)),
                [single] => next.push(*single),
                _ => unreachable!("chunks(2) yields one or two elements"),
            }
        }

        level = next;
    }

    Some(level[0])
}

/// Size billed for a dataset: the joined byte length rounded up to whole chunks.
pub fn calculate_dataset_size(triples: &[String]) -> u64 {
    let total_bytes = triples.join("\n").len();
    (total_bytes.div_ceil(CHUNK_BYTE_SIZE) * CHUNK_BYTE_SIZE) as u64
}

fn hash_sorted_pair(left: B256, right: B256) -> B256 {
    let (a, b) = if left <= right {
        (left, right)
    } else {
        (right, left)
    };

    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(a.as_slice());
    buf[32..].copy_from_slice(b.as_slice());
    keccak256(buf)
}

fn split_into_chunks(triples: &[String]) -> Vec<String> {
    let joined = triples.join("\n");

    joined
        .as_bytes()
        .chunks(CHUNK_BYTE_SIZE)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect()
}

fn leaf_hash(chunk: &str, index: usize) -> B256 {
    let packed = (chunk.to_string(), U256::from(index)).abi_encode_packed();
    keccak256(packed)
}
