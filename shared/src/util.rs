use std::sync::atomic::{AtomicI64, Ordering};

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Last id handed out by this process
static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random start, then a per-process sequence
///
/// Ids are strictly increasing within a process: when the random candidate
/// is not above the last id (same millisecond), the last id plus one is used.
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let ts = (now_millis() - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let candidate = (ts << 12) | rand::thread_rng().gen_range(0..0x1000);
    match LAST_ID.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |last| {
        Some(candidate.max(last + 1))
    }) {
        Ok(prev) | Err(prev) => candidate.max(prev + 1),
    }
}
