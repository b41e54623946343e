//! Kitchen wait time and priority
//!
//! Derived on every read from `created_at` and the caller's `now`; never
//! stored.

use shared::order::Priority;

/// Wait above this many minutes is `MEDIUM`
pub const MEDIUM_AFTER_MINUTES: i64 = 15;
/// Wait above this many minutes is `HIGH`
pub const HIGH_AFTER_MINUTES: i64 = 30;

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Whole minutes elapsed since creation, clamped at zero for clock skew
pub fn wait_minutes(created_at: i64, now: i64) -> i64 {
    (now - created_at).max(0) / MILLIS_PER_MINUTE
}

/// Priority tier for a wait time
pub fn priority_for(wait_minutes: i64) -> Priority {
    if wait_minutes > HIGH_AFTER_MINUTES {
        Priority::High
    } else if wait_minutes > MEDIUM_AFTER_MINUTES {
        Priority::Medium
    } else {
        Priority::Normal
    }
}

/// Wait minutes and priority for an order created at `created_at`
pub fn derive(created_at: i64, now: i64) -> (i64, Priority) {
    let minutes = wait_minutes(created_at, now);
    (minutes, priority_for(minutes))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: i64 = 60_000;

    #[test]
    fn thresholds() {
        assert_eq!(priority_for(0), Priority::Normal);
        assert_eq!(priority_for(14), Priority::Normal);
        assert_eq!(priority_for(15), Priority::Normal);
        assert_eq!(priority_for(16), Priority::Medium);
        assert_eq!(priority_for(30), Priority::Medium);
        assert_eq!(priority_for(31), Priority::High);
    }

    #[test]
    fn wait_minutes_floors() {
        assert_eq!(wait_minutes(0, 59_999), 0);
        assert_eq!(wait_minutes(0, MINUTE), 1);
        assert_eq!(wait_minutes(0, 16 * MINUTE - 1), 15);
    }

    #[test]
    fn future_created_at_clamps_to_zero() {
        assert_eq!(derive(10 * MINUTE, 0), (0, Priority::Normal));
    }

    #[test]
    fn derive_combines_both() {
        let created = 1_700_000_000_000;
        assert_eq!(derive(created, created + 31 * MINUTE), (31, Priority::High));
        assert_eq!(derive(created, created + 16 * MINUTE), (16, Priority::Medium));
    }
}
