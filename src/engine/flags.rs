//! ### English
//! Bitflags controlling optional plugin behaviors.
//!
//! These are passed through the C ABI as a `u32` bitmask (`N64GlConfig.flags`).
//!
//! ### 中文
//! 控制插件可选行为的位标志（bitflags）。
//!
//! 通过 C ABI 以 `u32` 位掩码传入（`N64GlConfig.flags`）。

/// ### English
/// Run every GL call on a dedicated GPU thread instead of the calling (interpreter) thread.
///
/// ### 中文
/// 所有 GL 调用在独立 GPU 线程执行，而不是在调用方（解释器）线程执行。
pub const N64GL_PLUGIN_FLAG_THREADED: u32 = 1 << 0;

/// ### English
/// Query `glGetError` after every command and treat a non-zero result as fatal.
///
/// Only honored when error checks are compiled in (debug builds or the `gl-debug` feature).
///
/// ### 中文
/// 每条命令执行后查询 `glGetError`，非零结果视为致命错误。
///
/// 仅在编译启用错误检查时生效（debug 构建或 `gl-debug` feature）。
pub const N64GL_PLUGIN_FLAG_CHECK_GL_ERRORS: u32 = 1 << 1;

/// ### English
/// Upload the per-vertex light count (`numlights` attribute) for hardware lighting shaders.
///
/// ### 中文
/// 为硬件光照着色器上传每顶点光源数量（`numlights` 属性）。
pub const N64GL_PLUGIN_FLAG_HW_LIGHTING: u32 = 1 << 2;

/// ### English
/// Draw indexed triangles one by one behind an image-access barrier (N64 depth compare).
///
/// ### 中文
/// 逐个三角形绘制索引图元，并在每次绘制前插入 image-access barrier（N64 深度比较）。
pub const N64GL_PLUGIN_FLAG_PER_TRIANGLE_DEPTH: u32 = 1 << 3;
