//! ### English
//! Throttle for buffer swaps submitted but not yet executed.
//!
//! ### 中文
//! 已提交但尚未执行的缓冲交换（swap）计数与节流。
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct SwapState {
    queued: usize,
    shut_down: bool,
}

/// ### English
/// Counts queued swaps; `wait` blocks until all of them ran on the GPU thread.
///
/// ### 中文
/// 统计已排队的 swap；`wait` 会阻塞直到它们都在 GPU 线程上执行完毕。
#[derive(Debug, Default)]
pub(crate) struct SwapThrottle {
    state: Mutex<SwapState>,
    drained: Condvar,
}

impl SwapThrottle {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn lock(&self) -> MutexGuard<'_, SwapState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// ### English
    /// Called by the producer right before submitting a swap.
    ///
    /// ### 中文
    /// 由生产者在提交 swap 之前调用。
    pub(crate) fn begin(&self) {
        self.lock().queued += 1;
    }

    /// ### English
    /// Called once the swap executed (or was never submitted). Wakes waiters at zero.
    ///
    /// ### 中文
    /// 在 swap 执行完成（或最终未被提交）后调用；计数归零时唤醒等待者。
    pub(crate) fn complete(&self) {
        let mut state = self.lock();
        state.queued = state.queued.saturating_sub(1);
        if state.queued == 0 {
            drop(state);
            self.drained.notify_all();
        }
    }

    /// ### English
    /// Blocks until no swap is outstanding. Returns immediately after shutdown.
    ///
    /// ### 中文
    /// 阻塞直到没有未完成的 swap；关闭后立即返回。
    pub(crate) fn wait(&self) {
        let state = self.lock();
        let _state = self
            .drained
            .wait_while(state, |state| !state.shut_down && state.queued != 0)
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// ### English
    /// Releases every current and future waiter.
    ///
    /// ### 中文
    /// 释放所有当前及之后的等待者。
    pub(crate) fn shut_down(&self) {
        self.lock().shut_down = true;
        self.drained.notify_all();
    }

    pub(crate) fn queued(&self) -> usize {
        self.lock().queued
    }
}
