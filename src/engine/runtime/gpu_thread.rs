//! ### English
//! Dedicated GPU thread: owns the GL context and drains the command queue.
//!
//! ### 中文
//! 独立 GPU 线程：持有 GL 上下文并 drain 命令队列。
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::engine::error::DispatchError;
use crate::engine::lockfree::OneShot;
use crate::engine::queue::WorkQueue;

use super::command::GlCommand;
use super::context::GpuContext;
use super::swap::SwapThrottle;

/// ### English
/// Name of the GPU thread, visible in logs and debuggers.
///
/// ### 中文
/// GPU 线程名称，在日志与调试器中可见。
pub const GPU_THREAD_NAME: &str = "n64gl-gpu";

/// ### English
/// Submission lane.
///
/// ### 中文
/// 提交通道。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lane {
    Ordinary,
    /// ### English
    /// Runs before every ordinary command already queued.
    ///
    /// ### 中文
    /// 在所有已排队的普通命令之前执行。
    Priority,
}

pub(crate) struct GpuThread {
    queue: Arc<WorkQueue<GlCommand>>,
    handle: Mutex<Option<JoinHandle<Result<(), DispatchError>>>>,
    /// ### English
    /// Set when the thread stopped on a fatal error (or panicked).
    ///
    /// ### 中文
    /// 线程因致命错误（或 panic）停止时置位。
    lost: Arc<AtomicBool>,
}

impl GpuThread {
    /// ### English
    /// Moves `ctx` onto a new GPU thread and waits until it is running.
    ///
    /// #### Parameters
    /// - `ctx`: Execution context; owned by the GPU thread from now on.
    /// - `poll_interval`: Upper bound of one blocking dequeue.
    /// - `init_timeout`: How long to wait for the thread to report readiness.
    ///
    /// ### 中文
    /// 将 `ctx` 移动到新的 GPU 线程，并等待其开始运行。
    ///
    /// #### 参数
    /// - `ctx`：执行上下文；此后由 GPU 线程持有。
    /// - `poll_interval`：单次阻塞出队的时间上限。
    /// - `init_timeout`：等待线程报告就绪的时长。
    pub(crate) fn spawn(
        ctx: GpuContext,
        poll_interval: Duration,
        init_timeout: Duration,
    ) -> Result<Self, DispatchError> {
        let queue = Arc::new(WorkQueue::new());
        let queue_for_thread = queue.clone();

        let lost = Arc::new(AtomicBool::new(false));
        let lost_for_thread = lost.clone();

        let ready = Arc::new(OneShot::for_current_thread());
        let ready_for_thread = ready.clone();

        let handle = thread::Builder::new()
            .name(GPU_THREAD_NAME.to_string())
            .spawn(move || run(ctx, queue_for_thread, poll_interval, ready_for_thread, lost_for_thread))
            .map_err(|err| DispatchError::Init(format!("failed to spawn GPU thread: {err}")))?;

        match ready.recv_timeout(init_timeout) {
            Some(()) => {
                tracing::debug!(thread = GPU_THREAD_NAME, "GPU thread running");
                Ok(Self {
                    queue,
                    handle: Mutex::new(Some(handle)),
                    lost,
                })
            }
            None => {
                queue.close();
                let _ = handle.join();
                Err(DispatchError::Init("timed out starting GPU thread".to_string()))
            }
        }
    }

    pub(crate) fn submit(&self, lane: Lane, command: GlCommand) -> Result<(), DispatchError> {
        let pushed = match lane {
            Lane::Ordinary => self.queue.push(command),
            Lane::Priority => self.queue.push_front(command),
        };
        if pushed.is_ok() {
            return Ok(());
        }
        if self.lost.load(Ordering::Acquire) {
            Err(DispatchError::GpuThreadLost)
        } else {
            tracing::warn!("GL command rejected by closed queue");
            Err(DispatchError::ShutDown)
        }
    }

    /// ### English
    /// Queues `last`, closes the queue and joins once everything before it ran.
    ///
    /// Returns the error that stopped the thread, if any.
    ///
    /// ### 中文
    /// 排入 `last`，关闭队列，并在此前的所有命令执行完后 join。
    ///
    /// 若线程曾因错误停止，则返回该错误。
    pub(crate) fn finish(&self, last: GlCommand) -> Result<(), DispatchError> {
        if self.queue.push_and_close(last).is_err() {
            tracing::debug!("queue already closed; final command dropped");
        }

        let handle = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match handle {
            Some(handle) => handle.join().unwrap_or_else(|_| {
                tracing::error!("GPU thread panicked");
                Err(DispatchError::GpuThreadLost)
            }),
            None => Ok(()),
        }
    }

    pub(crate) fn is_lost(&self) -> bool {
        self.lost.load(Ordering::Acquire)
    }

    #[cfg(test)]
    pub(crate) fn queued(&self) -> usize {
        self.queue.len()
    }
}

/// ### English
/// Closes and empties the queue when the GPU thread exits.
///
/// On an unclean exit (fatal error or panic) the thread is marked lost first, so producers whose
/// commands get discarded see `GpuThreadLost`.
///
/// ### 中文
/// GPU 线程退出时关闭并清空队列。
///
/// 非正常退出（致命错误或 panic）时先标记线程丢失，使被丢弃命令的生产者看到 `GpuThreadLost`。
struct ExitGuard {
    queue: Arc<WorkQueue<GlCommand>>,
    lost: Arc<AtomicBool>,
    swaps: Arc<SwapThrottle>,
    clean: bool,
}

impl Drop for ExitGuard {
    fn drop(&mut self) {
        if !self.clean {
            self.lost.store(true, Ordering::Release);
            self.swaps.shut_down();
        }
        let discarded = self.queue.close_and_discard();
        if discarded > 0 {
            tracing::error!(discarded, "GPU thread lost; pending commands discarded");
        }
    }
}

fn run(
    mut ctx: GpuContext,
    queue: Arc<WorkQueue<GlCommand>>,
    poll_interval: Duration,
    ready: Arc<OneShot<()>>,
    lost: Arc<AtomicBool>,
) -> Result<(), DispatchError> {
    let mut guard = ExitGuard {
        queue: queue.clone(),
        lost,
        swaps: ctx.swaps.clone(),
        clean: false,
    };
    ready.send(());

    /*
    ### English
    Keep draining after close: shutdown must not drop anything submitted before it.

    ### 中文
    关闭后继续 drain：关闭之前提交的命令一条都不能丢。
    */
    while !queue.is_drained() {
        let Some(command) = queue.try_pop(poll_interval) else {
            continue;
        };
        if let Err(err) = command.execute(&mut ctx) {
            tracing::error!(%err, "fatal GL command error; stopping GPU thread");
            return Err(err);
        }
    }

    guard.clean = true;
    tracing::debug!("GPU thread drained and stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;

    use super::*;
    use crate::engine::gl::recording::{GlProbe, RecordingGl};
    use crate::engine::host::recording::RecordingHost;

    fn spawn() -> (GpuThread, GlProbe) {
        let (gl, probe) = RecordingGl::new();
        let mut ctx = GpuContext::new(RecordingHost::new(), Arc::new(SwapThrottle::new()), true);
        ctx.install_gl(Box::new(gl));
        let thread = GpuThread::spawn(ctx, Duration::from_millis(5), Duration::from_secs(5)).unwrap();
        (thread, probe)
    }

    #[test]
    fn finish_drains_everything_submitted_before_it() {
        let (thread, probe) = spawn();
        for mode in 0..50 {
            thread
                .submit(Lane::Ordinary, GlCommand::CullFace(mode))
                .unwrap();
        }
        thread.finish(GlCommand::LineWidth(2.0)).unwrap();

        let calls = probe.calls();
        assert_eq!(calls.len(), 51);
        assert_eq!(calls[0], "cull_face(0x0)");
        assert_eq!(calls[49], "cull_face(0x31)");
        assert_eq!(calls[50], "line_width(2)");
        assert_eq!(
            thread.submit(Lane::Ordinary, GlCommand::Clear(0)),
            Err(DispatchError::ShutDown)
        );
    }

    #[test]
    fn fatal_error_releases_blocked_callers() {
        let (thread, probe) = spawn();
        probe.inject_error(glow::INVALID_ENUM);
        thread.submit(Lane::Ordinary, GlCommand::Enable(0xdead)).unwrap();

        let (tx, rx) = bounded(1);
        // Either discarded (sender dropped) or rejected at submission.
        let submitted = thread.submit(Lane::Ordinary, GlCommand::CreateProgram(tx));
        match submitted {
            Ok(()) => assert!(rx.recv().is_err()),
            Err(err) => assert_eq!(err, DispatchError::GpuThreadLost),
        }

        assert!(thread.is_lost());
        assert_eq!(
            thread.finish(GlCommand::VideoQuit),
            Err(DispatchError::Gl {
                command: "glEnable",
                code: glow::INVALID_ENUM
            })
        );
        assert_eq!(thread.queued(), 0);
    }
}
