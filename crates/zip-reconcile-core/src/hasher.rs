use std::hash::Hasher as _;
use twox_hash::XxHash64;

/// XxHash64 digest of an in-memory member, seed 0.
pub fn hash_data(data: &[u8]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(data);
    hasher.finish()
}
