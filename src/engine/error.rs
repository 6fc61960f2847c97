//! ### English
//! Error types surfaced by the GL dispatcher and the host video bridge.
//!
//! ### 中文
//! GL 分发器与宿主视频桥接层对外暴露的错误类型。

/// ### English
/// Failure of one dispatched GL/host call.
///
/// ### 中文
/// 单次 GL/宿主调用分发失败的原因。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// ### English
    /// The dispatcher was shut down; the call was not submitted.
    ///
    /// ### 中文
    /// 分发器已关闭；该调用未被提交。
    #[error("GL dispatcher is shut down")]
    ShutDown,
    /// ### English
    /// Threading mode can only be chosen once, before the first GL call.
    ///
    /// ### 中文
    /// 线程模式只能在第一次 GL 调用之前设置一次。
    #[error("threading mode must be set once before the first GL call")]
    ModeLocked,
    /// ### English
    /// The GPU thread terminated before executing the command.
    ///
    /// ### 中文
    /// GPU 线程在执行该命令之前已经终止。
    #[error("GPU thread terminated before the command completed")]
    GpuThreadLost,
    /// ### English
    /// The GL implementation reported an error after executing `command`.
    ///
    /// ### 中文
    /// 执行 `command` 之后 GL 实现报告了错误。
    #[error("OpenGL error 0x{code:04x} after {command}")]
    Gl { command: &'static str, code: u32 },
    /// ### English
    /// A GL command ran before GL entry points were loaded.
    ///
    /// ### 中文
    /// 在 GL 入口函数加载之前就执行了 GL 命令。
    #[error("{command} executed before GL functions were loaded")]
    GlNotLoaded { command: &'static str },
    /// ### English
    /// A host video-extension call returned a non-success status.
    ///
    /// ### 中文
    /// 宿主视频扩展调用返回了非成功状态。
    #[error("host call {call} failed with status {code}")]
    Host { call: &'static str, code: i32 },
    /// ### English
    /// The GPU thread (or GL loader) failed to initialize.
    ///
    /// ### 中文
    /// GPU 线程（或 GL 加载器）初始化失败。
    #[error("initialization failed: {0}")]
    Init(String),
}

impl DispatchError {
    /// ### English
    /// Errors raised by the GL state itself; they stop the GPU thread.
    ///
    /// ### 中文
    /// 由 GL 状态本身引发的错误；会终止 GPU 线程。
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Gl { .. } | Self::GlNotLoaded { .. })
    }
}

/// ### English
/// Errors raised while installing the host-provided video function table.
///
/// ### 中文
/// 安装宿主提供的视频函数表时产生的错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostApiError {
    #[error("EmbedderVideoApi.{0} is NULL")]
    MissingSymbol(&'static str),
    #[error("GL entry point {0} could not be resolved")]
    MissingGlSymbol(&'static str),
    /// ### English
    /// `glGetString(GL_VERSION)` returned nothing usable: no GL context is current.
    ///
    /// ### 中文
    /// `glGetString(GL_VERSION)` 未返回可用结果：当前没有 GL 上下文。
    #[error("no GL context is current on the loading thread")]
    NoCurrentContext,
}
