//! ### English
//! Time source for frame pacing.
//!
//! ### 中文
//! 帧节奏控制所用的时间源。
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// ### English
/// Monotonic time source.
///
/// ### 中文
/// 单调时间源。
pub trait Clock {
    fn now(&self) -> Instant;
}

/// ### English
/// `Instant::now()`.
///
/// ### 中文
/// `Instant::now()`。
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// ### English
/// Clock that only moves when told to. Clones share the same time.
///
/// ### 中文
/// 只有在显式推进时才前进的时钟；克隆体共享同一时间。
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    elapsed_nanos: Arc<AtomicU64>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed_nanos: Arc::new(AtomicU64::new(0)),
        }
    }

    /// ### English
    /// Moves time forward by `by` for this clock and every clone of it.
    ///
    /// ### 中文
    /// 将本时钟及其所有克隆体的时间向前推进 `by`。
    pub fn advance(&self, by: Duration) {
        let nanos = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        self.elapsed_nanos.fetch_add(nanos, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + Duration::from_nanos(self.elapsed_nanos.load(Ordering::Relaxed))
    }
}
