//! ### English
//! Host video-extension hooks and GL loading.
//!
//! ### 中文
//! 宿主视频扩展钩子与 GL 加载。
use crate::engine::error::DispatchError;
use crate::engine::gl::{GlApi, GlowBackend};
use crate::engine::host::HostVideo;
use crate::engine::runtime::command::{GlCommand, GlLoader};
use crate::engine::runtime::gpu_thread::Lane;

use super::FunctionWrapper;

impl FunctionWrapper {
    /// ### English
    /// Initializes the host video extension (synced).
    ///
    /// ### 中文
    /// 初始化宿主视频扩展（同步）。
    pub fn video_init(&self) -> Result<(), DispatchError> {
        self.call(Lane::Ordinary, GlCommand::VideoInit)
    }

    /// ### English
    /// Asks the host to create the window/context. Returns the host status (`0` = success).
    ///
    /// ### 中文
    /// 请求宿主创建窗口/上下文。返回宿主状态码（`0` 表示成功）。
    pub fn set_video_mode(
        &self,
        width: i32,
        height: i32,
        bits_per_pixel: i32,
        mode: i32,
        flags: i32,
    ) -> Result<i32, DispatchError> {
        self.call(Lane::Ordinary, |reply| GlCommand::SetVideoMode {
            width,
            height,
            bits_per_pixel,
            mode,
            flags,
            reply,
        })
    }

    pub fn gl_set_attribute(&self, attribute: i32, value: i32) -> Result<(), DispatchError> {
        self.submit(Lane::Ordinary, GlCommand::GlSetAttribute { attribute, value })
    }

    pub fn gl_get_attribute(&self, attribute: i32) -> Result<i32, DispatchError> {
        self.call(Lane::Ordinary, |reply| GlCommand::GlGetAttribute { attribute, reply })
    }

    /// ### English
    /// Queues a buffer swap. [`Self::wait_for_swap_buffers`] blocks until it ran.
    ///
    /// ### 中文
    /// 排入一次缓冲交换。[`Self::wait_for_swap_buffers`] 会阻塞直到其执行完毕。
    pub fn swap_buffers(&self) -> Result<(), DispatchError> {
        self.swaps.begin();
        let submitted = self.submit(Lane::Ordinary, GlCommand::SwapBuffers);
        if submitted.is_err() {
            self.swaps.complete();
        }
        submitted
    }

    /// ### English
    /// Runs `loader` on the executing thread and installs the GL entry points it returns (synced).
    ///
    /// Must follow a successful [`Self::set_video_mode`]: the host context has to be current on
    /// the executing thread.
    ///
    /// ### 中文
    /// 在执行线程上运行 `loader`，并装载其返回的 GL 入口函数（同步）。
    ///
    /// 必须在 [`Self::set_video_mode`] 成功之后调用：宿主上下文必须在执行线程上处于 current 状态。
    pub fn load_gl(&self, loader: GlLoader) -> Result<(), DispatchError> {
        self.call(Lane::Ordinary, |reply| GlCommand::LoadGl { loader, reply })
    }

    /// ### English
    /// Loader for the `glow` backend, resolving entry points through the host proc-address hook.
    ///
    /// ### 中文
    /// `glow` 后端的加载器，通过宿主 proc-address 钩子解析入口函数。
    pub fn glow_loader() -> GlLoader {
        Box::new(|host: &dyn HostVideo| {
            // The host hands out entry points of the context it made current on this thread.
            let gl = unsafe { GlowBackend::load_with(|name| host.get_proc_address(name)) }?;
            Ok(Box::new(gl) as Box<dyn GlApi>)
        })
    }
}
