use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicU8, Ordering};
use std::thread;
use std::time::{Duration, Instant};

const EMPTY: u8 = 0;
const WRITING: u8 = 1;
const READY: u8 = 2;
const TAKEN: u8 = 3;

/// ### English
/// One-shot value handoff from a spawned thread back to the thread that spawned it.
///
/// Used for the GPU thread's readiness report: the GPU thread sends exactly one
/// `Result`, the spawning thread parks until it arrives or the deadline passes.
///
/// - No locks.
/// - The receiving thread is captured at construction so the sender can `unpark()` it.
///
/// ### 中文
/// 从被创建线程回传给创建者线程的一次性值交接。
///
/// 用于 GPU 线程的就绪报告：GPU 线程只发送一次 `Result`，创建者线程 park 等待，
/// 直到结果到达或超过截止时间。
///
/// - 无锁。
/// - 构造时记录接收线程，发送方据此 `unpark()` 唤醒。
pub(crate) struct OneShot<T> {
    /// ### English
    /// `EMPTY` -> `WRITING` -> `READY` -> `TAKEN`.
    ///
    /// ### 中文
    /// `EMPTY` -> `WRITING` -> `READY` -> `TAKEN`。
    state: AtomicU8,
    value: UnsafeCell<MaybeUninit<T>>,
    receiver: thread::Thread,
}

unsafe impl<T: Send> Send for OneShot<T> {}
unsafe impl<T: Send> Sync for OneShot<T> {}

impl<T> OneShot<T> {
    /// ### English
    /// Creates an empty handoff whose receiver is the calling thread.
    ///
    /// ### 中文
    /// 创建一个空的交接槽，接收方为当前线程。
    #[inline]
    pub(crate) fn for_current_thread() -> Self {
        Self {
            state: AtomicU8::new(EMPTY),
            value: UnsafeCell::new(MaybeUninit::uninit()),
            receiver: thread::current(),
        }
    }

    /// ### English
    /// Publishes `value`. Returns `false` (and drops `value`) if something was already sent.
    ///
    /// ### 中文
    /// 发布 `value`；若之前已发送过则返回 `false`（并丢弃 `value`）。
    pub(crate) fn send(&self, value: T) -> bool {
        if self
            .state
            .compare_exchange(EMPTY, WRITING, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return false;
        }

        unsafe {
            (*self.value.get()).write(value);
        }
        self.state.store(READY, Ordering::Release);
        self.receiver.unpark();
        true
    }

    #[inline]
    fn try_take(&self) -> Option<T> {
        self.state
            .compare_exchange(READY, TAKEN, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| unsafe { (*self.value.get()).assume_init_read() })
    }

    /// ### English
    /// Parks until the value arrives or `timeout` elapses (`None`).
    ///
    /// Must be called from the thread that created this handoff.
    ///
    /// ### 中文
    /// park 等待值到达，或在 `timeout` 超时后返回 `None`。
    ///
    /// 必须由创建本交接槽的线程调用。
    pub(crate) fn recv_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(value) = self.try_take() {
                return Some(value);
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            thread::park_timeout(deadline - now);
        }
    }
}

impl<T> Drop for OneShot<T> {
    fn drop(&mut self) {
        if *self.state.get_mut() == READY {
            unsafe {
                self.value.get_mut().assume_init_drop();
            }
        }
    }
}
