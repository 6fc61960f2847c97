//! ### English
//! Blocking multi-producer / single-consumer work queue with a priority lane.
//!
//! ### 中文
//! 带优先通道的阻塞式多生产者/单消费者工作队列。
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

struct State<T> {
    /// ### English
    /// `items[..priority_len]` is the priority lane (FIFO), the rest is the ordinary lane.
    ///
    /// ### 中文
    /// `items[..priority_len]` 为优先通道（FIFO），其余为普通通道。
    items: VecDeque<T>,
    priority_len: usize,
    closed: bool,
}

/// ### English
/// Unbounded FIFO consumed by exactly one thread.
///
/// - `push` appends to the ordinary lane.
/// - `push_front` jumps ahead of every queued ordinary item but stays behind earlier priority items.
/// - After `close`, pushes are rejected and the item is handed back; queued items stay poppable.
///
/// ### 中文
/// 由单个线程消费的无界 FIFO 队列。
///
/// - `push` 追加到普通通道。
/// - `push_front` 插到所有已排队普通项之前，但排在更早的优先项之后。
/// - `close` 之后 push 会被拒绝并把元素交还调用方；已排队元素仍可被 pop。
pub struct WorkQueue<T> {
    state: Mutex<State<T>>,
    available: Condvar,
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> WorkQueue<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                items: VecDeque::new(),
                priority_len: 0,
                closed: false,
            }),
            available: Condvar::new(),
        }
    }

    #[inline]
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// ### English
    /// Appends `item` to the ordinary lane and wakes the consumer.
    ///
    /// Returns `Err(item)` once the queue is closed.
    ///
    /// ### 中文
    /// 将 `item` 追加到普通通道并唤醒消费者。
    ///
    /// 队列关闭后返回 `Err(item)`。
    pub fn push(&self, item: T) -> Result<(), T> {
        let mut state = self.lock();
        if state.closed {
            return Err(item);
        }
        state.items.push_back(item);
        drop(state);
        self.available.notify_one();
        Ok(())
    }

    /// ### English
    /// Enqueues `item` in the priority lane: it is dequeued before every ordinary item already
    /// queued, and after every priority item already queued.
    ///
    /// Returns `Err(item)` once the queue is closed.
    ///
    /// ### 中文
    /// 将 `item` 放入优先通道：它会先于所有已排队的普通项出队，并晚于所有已排队的优先项。
    ///
    /// 队列关闭后返回 `Err(item)`。
    pub fn push_front(&self, item: T) -> Result<(), T> {
        let mut state = self.lock();
        if state.closed {
            return Err(item);
        }
        let at = state.priority_len;
        state.items.insert(at, item);
        state.priority_len += 1;
        drop(state);
        self.available.notify_one();
        Ok(())
    }

    /// ### English
    /// Pops the next item, blocking up to `timeout` while the queue is empty and open.
    ///
    /// Returns `None` on timeout, or immediately when the queue is closed and empty.
    ///
    /// ### 中文
    /// 弹出下一个元素；队列为空且未关闭时最多阻塞 `timeout`。
    ///
    /// 超时返回 `None`；队列已关闭且为空时立即返回 `None`。
    pub fn try_pop(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        let mut state = self.lock();
        loop {
            if let Some(item) = state.items.pop_front() {
                state.priority_len = state.priority_len.saturating_sub(1);
                return Some(item);
            }
            if state.closed {
                return None;
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            state = self
                .available
                .wait_timeout(state, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    /// ### English
    /// Number of queued items (approximate under concurrent use).
    ///
    /// ### 中文
    /// 已排队元素数量（并发下为近似值）。
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// ### English
    /// Rejects further pushes and wakes every waiter. Queued items remain poppable.
    ///
    /// ### 中文
    /// 拒绝后续 push 并唤醒所有等待者；已排队元素仍可被 pop。
    pub fn close(&self) {
        self.lock().closed = true;
        self.available.notify_all();
    }

    /// ### English
    /// Appends `item` as the last item the queue will ever accept, then closes it.
    ///
    /// Both happen under one lock, so no concurrent push can land behind `item`.
    /// Returns `Err(item)` when the queue was already closed.
    ///
    /// ### 中文
    /// 将 `item` 作为队列接受的最后一个元素追加，随后关闭队列。
    ///
    /// 两步在同一把锁内完成，因此不会有并发 push 排在 `item` 之后。
    /// 队列已关闭时返回 `Err(item)`。
    pub fn push_and_close(&self, item: T) -> Result<(), T> {
        let mut state = self.lock();
        if state.closed {
            return Err(item);
        }
        state.items.push_back(item);
        state.closed = true;
        drop(state);
        self.available.notify_all();
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// ### English
    /// `true` once the queue is closed and every queued item was popped.
    ///
    /// ### 中文
    /// 队列已关闭且所有元素均已被 pop 时返回 `true`。
    pub fn is_drained(&self) -> bool {
        let state = self.lock();
        state.closed && state.items.is_empty()
    }

    /// ### English
    /// Closes the queue and drops every queued item. Returns how many items were dropped.
    ///
    /// Only used when the consumer is gone: dropping a queued command drops its reply sender,
    /// which releases the blocked caller.
    ///
    /// ### 中文
    /// 关闭队列并丢弃所有已排队元素，返回被丢弃的数量。
    ///
    /// 仅在消费者已不存在时使用：丢弃排队命令会同时丢弃其回复发送端，从而释放阻塞的调用方。
    pub fn close_and_discard(&self) -> usize {
        let discarded = {
            let mut state = self.lock();
            state.closed = true;
            state.priority_len = 0;
            std::mem::take(&mut state.items)
        };
        self.available.notify_all();
        discarded.len()
    }
}
