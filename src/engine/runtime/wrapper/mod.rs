//! ### English
//! `FunctionWrapper`: the thread-safe front of the GL command dispatcher.
//!
//! Every GL/host call becomes a [`GlCommand`] that either runs inline on the calling thread or is
//! queued for the GPU thread. Calls returning a value are synced: the caller blocks on a
//! rendezvous channel until the executor replied.
//!
//! ### 中文
//! `FunctionWrapper`：GL 命令分发器的线程安全前端。
//!
//! 每个 GL/宿主调用都会变成一条 [`GlCommand`]，要么在调用线程上内联执行，要么排队交给 GPU 线程。
//! 有返回值的调用是同步的：调用方阻塞在会合通道上，直到执行器回复。
mod gl_calls;
mod host_calls;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::engine::config::PluginConfig;
use crate::engine::error::DispatchError;
use crate::engine::host::HostVideo;

use super::command::GlCommand;
use super::context::{GpuContext, Reply};
use super::gpu_thread::{GpuThread, Lane};
use super::swap::SwapThrottle;

const DEFAULT_UNPACK_ALIGNMENT: usize = 4;

enum Mode {
    /// ### English
    /// Commands execute on the calling thread; `None` after shutdown.
    ///
    /// ### 中文
    /// 命令在调用线程上执行；关闭后为 `None`。
    Inline(Mutex<Option<GpuContext>>),
    Threaded(GpuThread),
}

/// ### English
/// Dispatcher for GL and host video calls.
///
/// Starts in inline mode. [`FunctionWrapper::set_threaded_mode`] moves execution onto a dedicated
/// GPU thread; it must be called before the first command. All other methods take `&self` and may
/// be called from any thread.
///
/// ### 中文
/// GL 与宿主视频调用的分发器。
///
/// 初始为内联模式。[`FunctionWrapper::set_threaded_mode`] 会把执行转移到独立的 GPU 线程，
/// 且必须在第一条命令之前调用。其余方法均接收 `&self`，可在任意线程调用。
pub struct FunctionWrapper {
    mode: Mode,
    /// ### English
    /// Set by the first submission; locks the threading mode.
    ///
    /// ### 中文
    /// 第一次提交时置位；此后线程模式被锁定。
    issued: AtomicBool,
    shutdown: AtomicBool,
    /// ### English
    /// Last `GL_UNPACK_ALIGNMENT` submitted; sizes the client data texture uploads must provide.
    ///
    /// ### 中文
    /// 最近提交的 `GL_UNPACK_ALIGNMENT`；用于计算纹理上传必须提供的客户端数据大小。
    unpack_alignment: AtomicUsize,
    swaps: Arc<SwapThrottle>,
    poll_interval: Duration,
    init_timeout: Duration,
}

impl FunctionWrapper {
    /// ### English
    /// Creates an inline-mode dispatcher driving `host`.
    ///
    /// #### Parameters
    /// - `host`: Host video extension; called on the executing thread.
    /// - `config`: Error checking, poll interval and init timeout are taken from here.
    ///
    /// ### 中文
    /// 创建驱动 `host` 的内联模式分发器。
    ///
    /// #### 参数
    /// - `host`：宿主视频扩展；在执行线程上调用。
    /// - `config`：错误检查、轮询间隔与初始化超时取自此处。
    pub fn new(host: Arc<dyn HostVideo>, config: &PluginConfig) -> Self {
        let swaps = Arc::new(SwapThrottle::new());
        let ctx = GpuContext::new(host, swaps.clone(), config.gl_error_checks_enabled());
        Self {
            mode: Mode::Inline(Mutex::new(Some(ctx))),
            issued: AtomicBool::new(false),
            shutdown: AtomicBool::new(false),
            unpack_alignment: AtomicUsize::new(DEFAULT_UNPACK_ALIGNMENT),
            swaps,
            poll_interval: config.poll_interval,
            init_timeout: config.init_timeout,
        }
    }

    /// ### English
    /// Spawns the GPU thread and routes every later command through the work queue.
    ///
    /// One-shot: fails with `ModeLocked` when already threaded or after the first command, and
    /// with `ShutDown` after [`Self::quit`]. A failed spawn leaves the dispatcher shut down.
    ///
    /// ### 中文
    /// 创建 GPU 线程，之后的所有命令都经由工作队列执行。
    ///
    /// 只能调用一次：已是线程模式或已提交过命令时返回 `ModeLocked`，[`Self::quit`] 之后返回 `ShutDown`。
    /// 创建线程失败时分发器进入关闭状态。
    pub fn set_threaded_mode(&mut self) -> Result<(), DispatchError> {
        if self.shutdown.load(Ordering::Acquire) {
            return Err(DispatchError::ShutDown);
        }
        let Mode::Inline(ctx) = &mut self.mode else {
            return Err(DispatchError::ModeLocked);
        };
        if self.issued.load(Ordering::Acquire) {
            return Err(DispatchError::ModeLocked);
        }
        let Some(ctx) = ctx.get_mut().unwrap_or_else(PoisonError::into_inner).take() else {
            return Err(DispatchError::ShutDown);
        };

        match GpuThread::spawn(ctx, self.poll_interval, self.init_timeout) {
            Ok(thread) => {
                self.mode = Mode::Threaded(thread);
                Ok(())
            }
            Err(err) => {
                tracing::error!(%err, "failed to enter threaded mode");
                self.shutdown.store(true, Ordering::Release);
                self.swaps.shut_down();
                Err(err)
            }
        }
    }

    pub fn is_threaded(&self) -> bool {
        matches!(self.mode, Mode::Threaded(_))
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    pub(crate) fn submit(&self, lane: Lane, command: GlCommand) -> Result<(), DispatchError> {
        if self.shutdown.load(Ordering::Acquire) {
            tracing::warn!("GL command submitted after shutdown");
            return Err(DispatchError::ShutDown);
        }
        self.issued.store(true, Ordering::Release);

        match &self.mode {
            Mode::Inline(ctx) => {
                let mut ctx = ctx.lock().unwrap_or_else(PoisonError::into_inner);
                match ctx.as_mut() {
                    Some(ctx) => command.execute(ctx),
                    None => Err(DispatchError::ShutDown),
                }
            }
            Mode::Threaded(thread) => thread.submit(lane, command),
        }
    }

    /// ### English
    /// Submits a synced command and blocks until the executor replied.
    ///
    /// ### 中文
    /// 提交一条同步命令并阻塞，直到执行器回复。
    pub(crate) fn call<T>(
        &self,
        lane: Lane,
        command: impl FnOnce(Reply<T>) -> GlCommand,
    ) -> Result<T, DispatchError> {
        let (reply, outcome) = crossbeam_channel::bounded(1);
        self.submit(lane, command(reply))?;
        outcome.recv().map_err(|_| DispatchError::GpuThreadLost)?
    }

    /// ### English
    /// Blocks until every submitted buffer swap executed. Returns immediately after shutdown.
    ///
    /// ### 中文
    /// 阻塞直到所有已提交的缓冲交换执行完毕；关闭后立即返回。
    pub fn wait_for_swap_buffers(&self) {
        self.swaps.wait();
    }

    /// ### English
    /// Shuts the dispatcher down.
    ///
    /// Queues the host video quit behind everything already submitted, closes the queue, releases
    /// swap waiters and joins the GPU thread once the queue is drained. Returns the error that
    /// stopped the GPU thread, if any; a second call returns `ShutDown`.
    ///
    /// ### 中文
    /// 关闭分发器。
    ///
    /// 在所有已提交命令之后排入宿主视频退出，关闭队列，释放 swap 等待者，并在队列 drain 完成后
    /// join GPU 线程。若 GPU 线程曾因错误停止则返回该错误；重复调用返回 `ShutDown`。
    pub fn quit(&self) -> Result<(), DispatchError> {
        if self.shutdown.swap(true, Ordering::AcqRel) {
            return Err(DispatchError::ShutDown);
        }
        tracing::debug!(threaded = self.is_threaded(), "shutting down GL dispatcher");

        let result = match &self.mode {
            Mode::Inline(ctx) => {
                let ctx = ctx.lock().unwrap_or_else(PoisonError::into_inner).take();
                self.swaps.shut_down();
                match ctx {
                    Some(mut ctx) => GlCommand::VideoQuit.execute(&mut ctx),
                    None => Ok(()),
                }
            }
            Mode::Threaded(thread) => {
                self.swaps.shut_down();
                thread.finish(GlCommand::VideoQuit)
            }
        };

        if let Err(err) = &result {
            tracing::error!(%err, "GL dispatcher stopped with an error");
        }
        result
    }
}

impl Drop for FunctionWrapper {
    fn drop(&mut self) {
        if !self.shutdown.load(Ordering::Acquire) {
            let _ = self.quit();
        }
    }
}

#[cfg(test)]
impl FunctionWrapper {
    pub(crate) fn queued(&self) -> usize {
        match &self.mode {
            Mode::Inline(_) => 0,
            Mode::Threaded(thread) => thread.queued(),
        }
    }
}
