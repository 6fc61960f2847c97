//! ### English
//! Process-wide `tracing` subscriber installation.
//!
//! ### 中文
//! 进程级 `tracing` subscriber 安装。
use tracing_subscriber::EnvFilter;

/// ### English
/// Environment variable holding the log filter directives (e.g. `N64GL_LOG=n64_gl_dispatch=debug`).
///
/// ### 中文
/// 存放日志过滤指令的环境变量（例如 `N64GL_LOG=n64_gl_dispatch=debug`）。
pub const LOG_ENV_VAR: &str = "N64GL_LOG";

const DEFAULT_DIRECTIVES: &str = "warn";

/// ### English
/// Installs a fmt subscriber filtered by `N64GL_LOG` (default `warn`).
///
/// The host process may already have a global subscriber; in that case this is a no-op.
///
/// ### 中文
/// 安装按 `N64GL_LOG` 过滤的 fmt subscriber（默认 `warn`）。
///
/// 宿主进程可能已经安装了全局 subscriber；此时本函数不做任何事。
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .with_target(true)
        .try_init();
}
