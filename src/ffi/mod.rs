//! ### English
//! C ABI surface for `n64_gl_dispatch`.
//!
//! All exported symbols are `extern "C"` functions; structs C reads are `#[repr(C)]`, the plugin
//! handle is opaque.
//! Every function accepts a NULL plugin pointer and treats it as a no-op (or a neutral result).
//!
//! ### 中文
//! `n64_gl_dispatch` 的 C ABI 接口层。
//!
//! 所有导出符号均为 `extern "C"` 函数；C 侧读取的结构体使用 `#[repr(C)]`，插件句柄为不透明指针。
//! 每个函数都接受 NULL 插件指针，并将其视为空操作（或返回中性结果）。
mod abi;
mod frame_skip;
mod plugin;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::engine::config::PluginConfig;
use crate::engine::error::DispatchError;
use crate::engine::host::{HOST_SUCCESS, HostVideo};
use crate::engine::refresh::FrameSkipManager;
use crate::engine::runtime::{FunctionWrapper, GlLoader, UnbufferedDrawer};

/// ### English
/// C ABI version for `n64_gl_dispatch`.
///
/// ### 中文
/// `n64_gl_dispatch` 的 C ABI 版本号。
const N64GL_ABI_VERSION: u32 = 1;

/// ### English
/// Status returned by `n64gl_plugin_set_video_mode` when the dispatcher (not the host) failed.
///
/// ### 中文
/// 当分发器（而非宿主）失败时，`n64gl_plugin_set_video_mode` 返回的状态码。
pub const N64GL_STATUS_DISPATCH_ERROR: i32 = -1;

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
/// ### English
/// Plugin configuration passed by the host.
///
/// ### 中文
/// 宿主传入的插件配置。
pub struct N64GlConfig {
    /// ### English
    /// `N64GL_PLUGIN_FLAG_*` bitmask.
    ///
    /// ### 中文
    /// `N64GL_PLUGIN_FLAG_*` 位掩码。
    pub flags: u32,
    /// ### English
    /// `1` = manual frame skip, anything else = auto.
    ///
    /// ### 中文
    /// `1` = 手动跳帧，其它值 = 自动。
    pub frame_skip_mode: u32,
    pub max_skips: i32,
    /// ### English
    /// Target frame rate; `<= 0` keeps 60.
    ///
    /// ### 中文
    /// 目标帧率；`<= 0` 时保持 60。
    pub target_fps: i32,
}

impl From<N64GlConfig> for PluginConfig {
    fn from(value: N64GlConfig) -> Self {
        PluginConfig::from_ffi(value.flags, value.frame_skip_mode, value.max_skips, value.target_fps)
    }
}

/// ### English
/// Opaque plugin handle: GL dispatcher, frame-skip controller and drawer.
///
/// ### 中文
/// 不透明插件句柄：GL 分发器、跳帧控制器与绘制器。
pub struct N64GlPlugin {
    wrapper: FunctionWrapper,
    config: PluginConfig,
    /// ### English
    /// Loader used after the first successful video mode change; `None` once consumed.
    ///
    /// ### 中文
    /// 第一次成功切换视频模式后使用的加载器；使用后为 `None`。
    pending_loader: Mutex<Option<GlLoader>>,
    frame_skip: Mutex<FrameSkipManager>,
    drawer: Mutex<Option<UnbufferedDrawer>>,
}

impl N64GlPlugin {
    /// ### English
    /// Creates a plugin whose GL entry points come from the `glow` backend.
    ///
    /// ### 中文
    /// 创建使用 `glow` 后端 GL 入口函数的插件。
    pub fn new(host: Arc<dyn HostVideo>, config: PluginConfig) -> Result<Self, DispatchError> {
        Self::with_loader(host, config, FunctionWrapper::glow_loader())
    }

    /// ### English
    /// Creates a plugin: builds the dispatcher, enters threaded mode when configured and
    /// initializes the host video extension.
    ///
    /// #### Parameters
    /// - `host`: Host video extension.
    /// - `config`: Plugin configuration.
    /// - `loader`: Installs GL entry points after the first successful `set_video_mode`.
    ///
    /// ### 中文
    /// 创建插件：构建分发器，按配置进入线程模式，并初始化宿主视频扩展。
    ///
    /// #### 参数
    /// - `host`：宿主视频扩展。
    /// - `config`：插件配置。
    /// - `loader`：在第一次成功 `set_video_mode` 之后装载 GL 入口函数。
    pub fn with_loader(
        host: Arc<dyn HostVideo>,
        config: PluginConfig,
        loader: GlLoader,
    ) -> Result<Self, DispatchError> {
        let mut wrapper = FunctionWrapper::new(host, &config);
        if config.threaded {
            wrapper.set_threaded_mode()?;
        }
        wrapper.video_init()?;

        Ok(Self {
            wrapper,
            frame_skip: Mutex::new(FrameSkipManager::new(config.frame_skip)),
            config,
            pending_loader: Mutex::new(Some(loader)),
            drawer: Mutex::new(None),
        })
    }

    pub fn wrapper(&self) -> &FunctionWrapper {
        &self.wrapper
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn frame_skip(&self) -> MutexGuard<'_, FrameSkipManager> {
        self.frame_skip.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// ### English
    /// Changes the video mode; the first success also loads GL and creates the drawer.
    ///
    /// Returns the host status (`0` = success).
    ///
    /// ### 中文
    /// 切换视频模式；第一次成功时还会加载 GL 并创建绘制器。
    ///
    /// 返回宿主状态码（`0` 表示成功）。
    pub fn set_video_mode(
        &self,
        width: i32,
        height: i32,
        bits_per_pixel: i32,
        mode: i32,
        flags: i32,
    ) -> Result<i32, DispatchError> {
        let status = self
            .wrapper
            .set_video_mode(width, height, bits_per_pixel, mode, flags)?;
        if status != HOST_SUCCESS {
            return Ok(status);
        }

        let loader = self
            .pending_loader
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(loader) = loader {
            self.wrapper.load_gl(loader)?;
            let drawer = UnbufferedDrawer::new(
                &self.wrapper,
                self.config.hw_lighting,
                self.config.per_triangle_depth,
            )?;
            *self.drawer.lock().unwrap_or_else(PoisonError::into_inner) = Some(drawer);
        }
        Ok(status)
    }

    /// ### English
    /// Runs `draw` with the drawer; fails with `GlNotLoaded` before the first video mode.
    ///
    /// ### 中文
    /// 使用绘制器执行 `draw`；第一次设置视频模式之前返回 `GlNotLoaded`。
    pub fn with_drawer<R>(
        &self,
        draw: impl FnOnce(&mut UnbufferedDrawer, &FunctionWrapper) -> Result<R, DispatchError>,
    ) -> Result<R, DispatchError> {
        let mut drawer = self.drawer.lock().unwrap_or_else(PoisonError::into_inner);
        match drawer.as_mut() {
            Some(drawer) => draw(drawer, &self.wrapper),
            None => Err(DispatchError::GlNotLoaded {
                command: "UnbufferedDrawer",
            }),
        }
    }

    /// ### English
    /// Shuts the dispatcher down; see [`FunctionWrapper::quit`].
    ///
    /// ### 中文
    /// 关闭分发器；参见 [`FunctionWrapper::quit`]。
    pub fn quit(&self) -> Result<(), DispatchError> {
        self.wrapper.quit()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::engine::gl::GlApi;
    use crate::engine::gl::recording::{GlProbe, RecordingGl};
    use crate::engine::host::recording::RecordingHost;
    use crate::engine::runtime::{DrawTriangles, SpVertex};

    fn plugin(threaded: bool) -> (N64GlPlugin, GlProbe, Arc<RecordingHost>) {
        let host = RecordingHost::new();
        let (gl, probe) = RecordingGl::new();
        let loader: GlLoader = Box::new(move |_: &dyn HostVideo| Ok(Box::new(gl) as Box<dyn GlApi>));
        let config = PluginConfig {
            threaded,
            hw_lighting: true,
            ..PluginConfig::default()
        };
        let plugin = N64GlPlugin::with_loader(host.clone(), config, loader).unwrap();
        (plugin, probe, host)
    }

    #[test]
    fn gl_is_loaded_after_the_first_successful_video_mode() {
        let (plugin, probe, host) = plugin(true);
        assert_eq!(
            plugin.with_drawer(|_, _| Ok(())),
            Err(DispatchError::GlNotLoaded {
                command: "UnbufferedDrawer"
            })
        );

        host.fail_set_video_mode(3);
        assert_eq!(plugin.set_video_mode(320, 240, 16, 1, 0), Ok(3));
        assert!(probe.calls().is_empty());

        host.fail_set_video_mode(0);
        assert_eq!(plugin.set_video_mode(640, 480, 32, 1, 0), Ok(0));
        assert_eq!(probe.calls().len(), 8);

        let vertices = [SpVertex::default(); 3];
        plugin
            .with_drawer(|drawer, wrapper| {
                drawer.draw_triangles(
                    wrapper,
                    &DrawTriangles {
                        mode: glow::TRIANGLES,
                        vertices: &vertices,
                        elements: None,
                        uses_shade: false,
                        uses_texture: false,
                        flat_colors: false,
                    },
                )
            })
            .unwrap();
        plugin.quit().unwrap();

        assert_eq!(probe.calls_named("vertex_attrib_1f"), vec!["vertex_attrib_1f(3, 0)"]);
        assert_eq!(probe.calls_named("draw_arrays"), vec!["draw_arrays(0x4, 0, 3)"]);
        assert_eq!(
            host.calls(),
            vec![
                "init",
                "set_video_mode(320, 240, 16, 1, 0)",
                "set_video_mode(640, 480, 32, 1, 0)",
                "quit"
            ]
        );
    }

    #[test]
    fn config_conversion_uses_flags() {
        let config = PluginConfig::from(N64GlConfig {
            flags: crate::engine::flags::N64GL_PLUGIN_FLAG_THREADED,
            frame_skip_mode: 1,
            max_skips: 4,
            target_fps: 0,
        });
        assert!(config.threaded);
        assert_eq!(config.frame_skip.max_skips, 4);
        assert_eq!(config.frame_skip.target_fps, 60);
    }
}
