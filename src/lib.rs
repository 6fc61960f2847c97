/// ### English
/// `n64_gl_dispatch` crate root.
/// Exposes the C ABI via `ffi`; core implementation lives under `engine`.
///
/// ### 中文
/// `n64_gl_dispatch` 的 crate 根。
/// 通过 `ffi` 导出 C ABI；核心实现位于 `engine` 模块。
mod engine;
mod ffi;

pub use engine::config::{DEFAULT_POLL_INTERVAL, FrameSkipConfig, GL_ERROR_CHECKS_COMPILED, PluginConfig};
pub use engine::error::{DispatchError, HostApiError};
pub use engine::flags;
pub use engine::gl::{AttribLayout, GlApi, GlowBackend, PixelRect, TexImage2D, TexSubImage2D};
pub use engine::host::{EmbedderVideoApi, HOST_SUCCESS, HostVideo, LoadedVideoApi};
pub use engine::logging;
pub use engine::queue::WorkQueue;
pub use engine::refresh::{Clock, FrameSkipManager, FrameSkipMode, ManualClock, MonotonicClock};
pub use engine::runtime::{
    CachedVertexAttribArray, DrawRects, DrawTriangles, FunctionWrapper, GPU_THREAD_NAME, GlLoader,
    MAX_ATTRIB_INDEX, RectVertex, SpVertex, UnbufferedDrawer, rect_attrib, triangle_attrib,
};
pub use ffi::{N64GlConfig, N64GlPlugin};
