//! Clock helpers shared by the desktop shell and apps.

use std::cell::Cell;
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

thread_local! {
    static LAST_TIMESTAMP_MS: Cell<u64> = const { Cell::new(0) };
    static SESSION_START_MS: Cell<Option<u64>> = const { Cell::new(None) };
}

/// Returns the current unix timestamp in milliseconds.
pub fn unix_time_ms_now() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now().max(0.0) as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Returns a unix millisecond timestamp strictly greater than any previously returned one.
///
/// Used for storage keys that must not collide when two saves land in the same millisecond.
pub fn next_monotonic_timestamp_ms() -> u64 {
    let now = unix_time_ms_now();
    LAST_TIMESTAMP_MS.with(|last| {
        let next = now.max(last.get().saturating_add(1));
        last.set(next);
        next
    })
}

/// Records the session start the first time it is called and returns it afterwards.
pub fn session_started_ms() -> u64 {
    SESSION_START_MS.with(|start| match start.get() {
        Some(ms) => ms,
        None => {
            let now = unix_time_ms_now();
            start.set(Some(now));
            now
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_timestamps_strictly_increase() {
        let first = next_monotonic_timestamp_ms();
        let second = next_monotonic_timestamp_ms();
        assert!(second > first);
    }

    #[test]
    fn session_start_is_stable() {
        let start = session_started_ms();
        assert_eq!(session_started_ms(), start);
        assert!(start <= unix_time_ms_now());
    }
}
