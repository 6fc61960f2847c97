//! ### English
//! Host emulator video extension (window/context management owned by the host core).
//!
//! ### 中文
//! 宿主模拟器的视频扩展接口（窗口/上下文由宿主核心管理）。
use std::ffi::{CStr, c_void};

mod loaded;
#[cfg(test)]
pub(crate) mod recording;

pub use loaded::LoadedVideoApi;

/// ### English
/// Status code returned by every host call on success (`M64ERR_SUCCESS`).
///
/// ### 中文
/// 宿主调用成功时返回的状态码（`M64ERR_SUCCESS`）。
pub const HOST_SUCCESS: i32 = 0;

/// ### English
/// Video extension exposed by the host core.
///
/// Every call is made from the thread owning the GL context (the GPU thread in threaded mode).
/// Status codes follow the host convention: `0` is success.
///
/// ### 中文
/// 宿主核心暴露的视频扩展。
///
/// 所有调用都在持有 GL 上下文的线程上进行（线程模式下即 GPU 线程）。
/// 状态码遵循宿主约定：`0` 表示成功。
pub trait HostVideo: Send + Sync {
    fn init(&self) -> i32;
    fn quit(&self) -> i32;
    /// ### English
    /// Creates the window and GL context.
    ///
    /// #### Parameters
    /// - `mode`: Windowed / fullscreen selector (host enum).
    /// - `flags`: Host video flags (e.g. resizable).
    ///
    /// ### 中文
    /// 创建窗口与 GL 上下文。
    ///
    /// #### 参数
    /// - `mode`：窗口/全屏选择（宿主枚举）。
    /// - `flags`：宿主视频标志（例如可调整大小）。
    fn set_video_mode(&self, width: i32, height: i32, bits_per_pixel: i32, mode: i32, flags: i32) -> i32;
    fn gl_set_attribute(&self, attribute: i32, value: i32) -> i32;
    /// ### English
    /// Returns `(status, value)`.
    ///
    /// ### 中文
    /// 返回 `(status, value)`。
    fn gl_get_attribute(&self, attribute: i32) -> (i32, i32);
    fn swap_buffers(&self) -> i32;
    fn get_proc_address(&self, name: &CStr) -> *const c_void;
}

#[repr(C)]
#[derive(Clone, Copy, Default)]
/// ### English
/// Function pointer table for the host video extension (`VidExt_*`).
///
/// All fields are raw addresses (`usize`) and must be non-zero.
///
/// ### 中文
/// 宿主视频扩展（`VidExt_*`）的函数指针表。
///
/// 所有字段都是原始地址（`usize`），且必须全部为非 0。
pub struct EmbedderVideoApi {
    pub vid_init: usize,
    pub vid_quit: usize,
    pub vid_set_video_mode: usize,
    pub vid_gl_get_proc_address: usize,
    pub vid_gl_set_attribute: usize,
    pub vid_gl_get_attribute: usize,
    pub vid_gl_swap_buffers: usize,
}
