//! ### English
//! Plugin configuration (threading, GL error checks, frame skipping).
//!
//! ### 中文
//! 插件配置（线程模式、GL 错误检查、跳帧）。
use std::time::Duration;

use crate::engine::flags;
use crate::engine::refresh::FrameSkipMode;

/// ### English
/// Whether post-command `glGetError` checks are compiled into this build.
///
/// Release builds skip the query entirely and assume success.
///
/// ### 中文
/// 本次构建是否编译了命令执行后的 `glGetError` 检查。
///
/// release 构建完全跳过该查询并假定成功。
pub const GL_ERROR_CHECKS_COMPILED: bool = cfg!(any(debug_assertions, feature = "gl-debug"));

/// ### English
/// Default dequeue poll interval of the GPU thread.
///
/// ### 中文
/// GPU 线程出队轮询的默认间隔。
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// ### English
/// Frame-skip settings applied when the plugin starts.
///
/// ### 中文
/// 插件启动时应用的跳帧设置。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSkipConfig {
    pub mode: FrameSkipMode,
    /// ### English
    /// Maximum consecutive skipped frames; `< 1` disables frame skipping.
    ///
    /// ### 中文
    /// 最大连续跳帧数；`< 1` 表示禁用跳帧。
    pub max_skips: i32,
    pub target_fps: i32,
}

impl Default for FrameSkipConfig {
    fn default() -> Self {
        Self {
            mode: FrameSkipMode::Auto,
            max_skips: 2,
            target_fps: 60,
        }
    }
}

/// ### English
/// Runtime configuration of the GL dispatcher and its companions.
///
/// ### 中文
/// GL 分发器及其配套组件的运行时配置。
#[derive(Debug, Clone, PartialEq)]
pub struct PluginConfig {
    /// ### English
    /// Spawn a dedicated GPU thread (`true`) or execute inline on the caller (`false`).
    ///
    /// ### 中文
    /// 创建独立 GPU 线程（`true`），或在调用方线程内联执行（`false`）。
    pub threaded: bool,
    /// ### English
    /// Query `glGetError` after each command (ignored unless compiled in).
    ///
    /// ### 中文
    /// 每条命令后查询 `glGetError`（未编译启用时忽略）。
    pub check_gl_errors: bool,
    pub hw_lighting: bool,
    pub per_triangle_depth: bool,
    /// ### English
    /// How long the GPU thread blocks in one dequeue before rechecking shutdown.
    ///
    /// ### 中文
    /// GPU 线程单次出队阻塞的最长时间，超时后重新检查关闭状态。
    pub poll_interval: Duration,
    /// ### English
    /// Maximum time to wait for the GPU thread to report readiness.
    ///
    /// ### 中文
    /// 等待 GPU 线程报告就绪的最长时间。
    pub init_timeout: Duration,
    pub frame_skip: FrameSkipConfig,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            threaded: false,
            check_gl_errors: GL_ERROR_CHECKS_COMPILED,
            hw_lighting: false,
            per_triangle_depth: false,
            poll_interval: DEFAULT_POLL_INTERVAL,
            init_timeout: Duration::from_secs(30),
            frame_skip: FrameSkipConfig::default(),
        }
    }
}

impl PluginConfig {
    /// ### English
    /// Builds a configuration from the C ABI representation.
    ///
    /// #### Parameters
    /// - `plugin_flags`: `N64GL_PLUGIN_FLAG_*` bitmask.
    /// - `frame_skip_mode`: `1` = manual, anything else = auto.
    /// - `max_skips`: Maximum consecutive skips (`< 1` disables skipping).
    /// - `target_fps`: Target frame rate; `<= 0` keeps the default (60).
    ///
    /// ### 中文
    /// 由 C ABI 表示构建配置。
    ///
    /// #### 参数
    /// - `plugin_flags`：`N64GL_PLUGIN_FLAG_*` 位掩码。
    /// - `frame_skip_mode`：`1` = 手动，其它值 = 自动。
    /// - `max_skips`：最大连续跳帧数（`< 1` 表示禁用）。
    /// - `target_fps`：目标帧率；`<= 0` 时保持默认值（60）。
    pub fn from_ffi(plugin_flags: u32, frame_skip_mode: u32, max_skips: i32, target_fps: i32) -> Self {
        let defaults = Self::default();
        Self {
            threaded: (plugin_flags & flags::N64GL_PLUGIN_FLAG_THREADED) != 0,
            check_gl_errors: (plugin_flags & flags::N64GL_PLUGIN_FLAG_CHECK_GL_ERRORS) != 0,
            hw_lighting: (plugin_flags & flags::N64GL_PLUGIN_FLAG_HW_LIGHTING) != 0,
            per_triangle_depth: (plugin_flags & flags::N64GL_PLUGIN_FLAG_PER_TRIANGLE_DEPTH) != 0,
            frame_skip: FrameSkipConfig {
                mode: FrameSkipMode::from_raw(frame_skip_mode),
                max_skips,
                target_fps: if target_fps > 0 {
                    target_fps
                } else {
                    defaults.frame_skip.target_fps
                },
            },
            ..defaults
        }
    }

    /// ### English
    /// Whether GL errors are actually checked (requested and compiled in).
    ///
    /// ### 中文
    /// 是否真正执行 GL 错误检查（既被请求又已编译启用）。
    pub fn gl_error_checks_enabled(&self) -> bool {
        GL_ERROR_CHECKS_COMPILED && self.check_gl_errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_ffi_decodes_flags_and_frame_skip() {
        let config = PluginConfig::from_ffi(
            flags::N64GL_PLUGIN_FLAG_THREADED | flags::N64GL_PLUGIN_FLAG_HW_LIGHTING,
            1,
            3,
            50,
        );
        assert!(config.threaded);
        assert!(config.hw_lighting);
        assert!(!config.check_gl_errors);
        assert!(!config.per_triangle_depth);
        assert_eq!(config.frame_skip.mode, FrameSkipMode::Manual);
        assert_eq!(config.frame_skip.max_skips, 3);
        assert_eq!(config.frame_skip.target_fps, 50);
        assert_eq!(config.poll_interval, DEFAULT_POLL_INTERVAL);
    }

    #[test]
    fn non_positive_target_fps_keeps_default() {
        let config = PluginConfig::from_ffi(0, 0, 2, 0);
        assert_eq!(config.frame_skip.mode, FrameSkipMode::Auto);
        assert_eq!(config.frame_skip.target_fps, 60);
    }
}
