/// CRC-32 (IEEE 802.3 polynomial) of the UTF-8 bytes of `value`.
///
/// Bit-compatible with `hash64(value, 'crc32')` from the pghashlib
/// PostgreSQL extension, so database-side sharding agrees with ours.
pub fn crc32(value: &str) -> u32 {
    crc32fast::hash(value.as_bytes())
}

/// Maps `value` onto `[0, shard_count)` by CRC-32 modulo shard count.
///
/// Returns 0 when `shard_count` is 0; a constructed cluster always has at
/// least one shard.
pub fn shard_index_for(value: &str, shard_count: usize) -> usize {
    if shard_count == 0 {
        return 0;
    }
    (u64::from(crc32(value)) % shard_count as u64) as usize
}
