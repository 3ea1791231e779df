//! Packet pacing arithmetic

/// Length of one status reporting window
pub const STATUS_WINDOW_MS: u32 = 1000;

/// Pure pacing helpers for the attack controller
pub struct RateScheduler;

impl RateScheduler {
    /// Minimum gap between two target visits
    ///
    /// Each visit emits `frames_per_visit` frames, so the per-frame budget
    /// `1000 / rate` (integer division) is multiplied by it. `rate` must be
    /// non-zero.
    pub fn interval_ms(rate: u32, frames_per_visit: u32) -> u32 {
        (1000 / rate).saturating_mul(frames_per_visit)
    }

    /// Milliseconds from `since` to `now` on the wrapping clock
    pub fn elapsed(now_ms: u32, since_ms: u32) -> u32 {
        now_ms.wrapping_sub(since_ms)
    }

    pub fn due(now_ms: u32, since_ms: u32, interval_ms: u32) -> bool {
        Self::elapsed(now_ms, since_ms) >= interval_ms
    }
}

/// Render milliseconds as `1h 2min 3s`, dropping leading zero units
pub fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        return format!("{}ms", ms);
    }

    let secs = ms / 1000;
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    match (h, m) {
        (0, 0) => format!("{}s", s),
        (0, _) => format!("{}min {}s", m, s),
        _ => format!("{}h {}min {}s", h, m, s),
    }
}
