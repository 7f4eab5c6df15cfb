//! Todo ID generation.
//!
//! Todo IDs are creation timestamps in milliseconds since the Unix epoch.
//! Two todos created within the same millisecond would collide, so
//! [`next_todo_id`] bumps the candidate forward until it is unused.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

/// Clock value used while deterministic IDs are enabled.
static TEST_CLOCK: AtomicI64 = AtomicI64::new(0);

/// Whether to use deterministic IDs (for testing).
static USE_DETERMINISTIC_IDS: AtomicBool = AtomicBool::new(false);

/// Base of the deterministic clock: 2024-01-01T00:00:00Z.
const TEST_CLOCK_START: i64 = 1_704_067_200_000;

/// Enable deterministic ID generation for testing.
///
/// When enabled, the clock starts at a fixed instant and advances by one
/// millisecond per call.
pub fn enable_deterministic_ids() {
    USE_DETERMINISTIC_IDS.store(true, Ordering::SeqCst);
    TEST_CLOCK.store(TEST_CLOCK_START, Ordering::SeqCst);
}

/// Disable deterministic ID generation.
pub fn disable_deterministic_ids() {
    USE_DETERMINISTIC_IDS.store(false, Ordering::SeqCst);
}

/// Current time in milliseconds since the Unix epoch.
#[must_use]
pub fn now_millis() -> i64 {
    if USE_DETERMINISTIC_IDS.load(Ordering::SeqCst) {
        TEST_CLOCK.fetch_add(1, Ordering::SeqCst)
    } else {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Pick an ID for a new todo.
///
/// Starts from `now` and moves forward one millisecond at a time until
/// `is_taken` returns false.
#[must_use]
pub fn next_todo_id(now: i64, is_taken: impl Fn(i64) -> bool) -> i64 {
    let mut candidate = now;
    while is_taken(candidate) {
        candidate = candidate.saturating_add(1);
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_next_todo_id_free_slot() {
        assert_eq!(next_todo_id(1000, |_| false), 1000);
    }

    #[test]
    fn test_next_todo_id_skips_taken() {
        let taken = [1000, 1001, 1003];
        assert_eq!(next_todo_id(1000, |id| taken.contains(&id)), 1002);
    }

    #[test]
    #[serial]
    fn test_deterministic_clock_advances() {
        enable_deterministic_ids();
        let first = now_millis();
        let second = now_millis();
        assert_eq!(first, TEST_CLOCK_START);
        assert_eq!(second, TEST_CLOCK_START + 1);
        disable_deterministic_ids();
    }

    #[test]
    #[serial]
    fn test_real_clock_is_recent() {
        disable_deterministic_ids();
        // Anything after 2024 is plausible
        assert!(now_millis() > TEST_CLOCK_START);
    }
}
