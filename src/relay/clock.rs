// relay/clock.rs - Upload timestamps and remote file naming

use std::sync::atomic::{AtomicI64, Ordering};

/// Millisecond clock that never hands out the same value twice.
///
/// When the wall clock has not advanced since the previous call (or went
/// backwards) the next value is the previous one plus one.
#[derive(Debug, Default)]
pub struct UploadClock {
    last: AtomicI64,
}

impl UploadClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> i64 {
        self.next_after(chrono::Utc::now().timestamp_millis())
    }

    fn next_after(&self, now: i64) -> i64 {
        let previous = match self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(now.max(last + 1)))
        {
            Ok(prev) | Err(prev) => prev,
        };
        now.max(previous + 1)
    }
}

/// `{dir}/{ts}-{name}` or `{dir}/{ts}-{prefix}-{name}`.
pub fn remote_path(remote_dir: &str, timestamp: i64, prefix: Option<&str>, file_name: &str) -> String {
    let dir = remote_dir.trim_end_matches('/');
    match prefix {
        Some(prefix) => format!("{}/{}-{}-{}", dir, timestamp, prefix, file_name),
        None => format!("{}/{}-{}", dir, timestamp, file_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_millisecond_still_increases() {
        let clock = UploadClock::new();
        assert_eq!(clock.next_after(1_700_000_000_000), 1_700_000_000_000);
        assert_eq!(clock.next_after(1_700_000_000_000), 1_700_000_000_001);
        // wall clock stepped back
        assert_eq!(clock.next_after(1_699_999_999_000), 1_700_000_000_002);
        assert_eq!(clock.next_after(1_700_000_000_500), 1_700_000_000_500);
    }

    #[test]
    fn real_clock_is_strictly_increasing() {
        let clock = UploadClock::new();
        let values: Vec<i64> = (0..1000).map(|_| clock.next()).collect();
        assert!(values.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn remote_path_layout() {
        assert_eq!(remote_path("/uploads", 17, None, "a.pdf"), "/uploads/17-a.pdf");
        assert_eq!(remote_path("/uploads/", 17, Some("ddc"), "a.pdf"), "/uploads/17-ddc-a.pdf");
    }
}
