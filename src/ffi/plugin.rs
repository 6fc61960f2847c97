//! ### English
//! C ABI bindings for the plugin lifecycle and host video hooks.
//!
//! ### 中文
//! 插件生命周期与宿主视频钩子相关的 C ABI 绑定。
use std::sync::Arc;

use crate::engine::config::PluginConfig;
use crate::engine::host::{EmbedderVideoApi, LoadedVideoApi};
use crate::engine::logging;

use super::{N64GL_STATUS_DISPATCH_ERROR, N64GlConfig, N64GlPlugin};

#[unsafe(no_mangle)]
/// ### English
/// Creates a plugin bound to the host video extension table `api`.
///
/// Installs logging, builds the dispatcher, enters threaded mode when
/// `N64GL_PLUGIN_FLAG_THREADED` is set and calls `VidExt_Init`. GL entry points are loaded on
/// the first successful `n64gl_plugin_set_video_mode`.
///
/// Returns NULL when `api` is NULL, has a NULL entry, or initialization fails.
/// A NULL `config` means defaults.
///
/// # Safety
/// `api` (and `config` when non-NULL) must point to valid structs for the duration of the call;
/// every function in `api` must stay callable until `n64gl_plugin_destroy`.
///
/// ### 中文
/// 创建绑定到宿主视频扩展函数表 `api` 的插件。
///
/// 安装日志，构建分发器，设置了 `N64GL_PLUGIN_FLAG_THREADED` 时进入线程模式，并调用 `VidExt_Init`。
/// GL 入口函数在第一次成功的 `n64gl_plugin_set_video_mode` 时加载。
///
/// `api` 为 NULL、含 NULL 项或初始化失败时返回 NULL。`config` 为 NULL 表示使用默认配置。
///
/// # Safety
/// `api`（以及非 NULL 时的 `config`）在调用期间必须指向有效结构体；
/// `api` 中的每个函数在 `n64gl_plugin_destroy` 之前都必须保持可调用。
pub unsafe extern "C" fn n64gl_plugin_create(
    api: *const EmbedderVideoApi,
    config: *const N64GlConfig,
) -> *mut N64GlPlugin {
    logging::init();

    if api.is_null() {
        return std::ptr::null_mut();
    }
    let host = match unsafe { LoadedVideoApi::from_table(*api) } {
        Ok(host) => host,
        Err(err) => {
            tracing::error!(%err, "invalid host video table");
            return std::ptr::null_mut();
        }
    };

    let config = if config.is_null() {
        PluginConfig::default()
    } else {
        PluginConfig::from(unsafe { *config })
    };

    match N64GlPlugin::new(Arc::new(host), config) {
        Ok(plugin) => Box::into_raw(Box::new(plugin)),
        Err(err) => {
            tracing::error!(%err, "failed to create plugin");
            std::ptr::null_mut()
        }
    }
}

#[unsafe(no_mangle)]
/// ### English
/// Destroys a plugin created by `n64gl_plugin_create`.
///
/// Drains every submitted command, calls `VidExt_Quit` and joins the GPU thread.
///
/// ### 中文
/// 销毁由 `n64gl_plugin_create` 创建的插件。
///
/// 会执行完所有已提交命令，调用 `VidExt_Quit` 并 join GPU 线程。
pub unsafe extern "C" fn n64gl_plugin_destroy(plugin: *mut N64GlPlugin) {
    if plugin.is_null() {
        return;
    }
    let plugin = unsafe { Box::from_raw(plugin) };
    if let Err(err) = plugin.quit() {
        tracing::warn!(%err, "plugin shut down with an error");
    }
}

#[unsafe(no_mangle)]
/// ### English
/// Changes the video mode. Returns the host status, or `N64GL_STATUS_DISPATCH_ERROR` when the
/// dispatcher failed (including GL loading).
///
/// ### 中文
/// 切换视频模式。返回宿主状态码；分发器失败（包括 GL 加载失败）时返回 `N64GL_STATUS_DISPATCH_ERROR`。
pub unsafe extern "C" fn n64gl_plugin_set_video_mode(
    plugin: *mut N64GlPlugin,
    width: i32,
    height: i32,
    bits_per_pixel: i32,
    mode: i32,
    flags: i32,
) -> i32 {
    if plugin.is_null() {
        return N64GL_STATUS_DISPATCH_ERROR;
    }
    match unsafe { (*plugin).set_video_mode(width, height, bits_per_pixel, mode, flags) } {
        Ok(status) => status,
        Err(err) => {
            tracing::error!(%err, width, height, "set_video_mode failed");
            N64GL_STATUS_DISPATCH_ERROR
        }
    }
}

#[unsafe(no_mangle)]
/// ### English
/// Queues a buffer swap.
///
/// ### 中文
/// 排入一次缓冲交换。
pub unsafe extern "C" fn n64gl_plugin_swap_buffers(plugin: *mut N64GlPlugin) {
    if plugin.is_null() {
        return;
    }
    if let Err(err) = unsafe { (*plugin).wrapper().swap_buffers() } {
        tracing::warn!(%err, "swap_buffers rejected");
    }
}

#[unsafe(no_mangle)]
/// ### English
/// Blocks until every queued buffer swap executed.
///
/// ### 中文
/// 阻塞直到所有已排队的缓冲交换执行完毕。
pub unsafe extern "C" fn n64gl_plugin_wait_for_swap_buffers(plugin: *mut N64GlPlugin) {
    if plugin.is_null() {
        return;
    }
    unsafe { (*plugin).wrapper().wait_for_swap_buffers() };
}

#[cfg(test)]
mod tests {
    use std::ffi::{c_char, c_int, c_void};
    use std::sync::atomic::{AtomicI32, Ordering};

    use super::*;
    use crate::engine::flags::N64GL_PLUGIN_FLAG_THREADED;

    static SWAPS: AtomicI32 = AtomicI32::new(0);

    unsafe extern "C" fn ok() -> c_int {
        0
    }

    unsafe extern "C" fn swap() -> c_int {
        SWAPS.fetch_add(1, Ordering::SeqCst);
        0
    }

    unsafe extern "C" fn set_mode(_: c_int, _: c_int, _: c_int, _: c_int, _: c_int) -> c_int {
        0
    }

    unsafe extern "C" fn no_symbols(_: *const c_char) -> *const c_void {
        std::ptr::null()
    }

    unsafe extern "C" fn set_attribute(_: c_int, _: c_int) -> c_int {
        0
    }

    unsafe extern "C" fn get_attribute(_: c_int, value: *mut c_int) -> c_int {
        unsafe { *value = 0 };
        0
    }

    fn table() -> EmbedderVideoApi {
        EmbedderVideoApi {
            vid_init: ok as usize,
            vid_quit: ok as usize,
            vid_set_video_mode: set_mode as usize,
            vid_gl_get_proc_address: no_symbols as usize,
            vid_gl_set_attribute: set_attribute as usize,
            vid_gl_get_attribute: get_attribute as usize,
            vid_gl_swap_buffers: swap as usize,
        }
    }

    #[test]
    fn null_arguments_are_tolerated() {
        let api = EmbedderVideoApi {
            vid_init: 0,
            ..table()
        };
        unsafe {
            assert!(n64gl_plugin_create(std::ptr::null(), std::ptr::null()).is_null());
            assert!(n64gl_plugin_create(&api, std::ptr::null()).is_null());
            n64gl_plugin_destroy(std::ptr::null_mut());
            n64gl_plugin_swap_buffers(std::ptr::null_mut());
            n64gl_plugin_wait_for_swap_buffers(std::ptr::null_mut());
            assert_eq!(
                n64gl_plugin_set_video_mode(std::ptr::null_mut(), 640, 480, 32, 1, 0),
                N64GL_STATUS_DISPATCH_ERROR
            );
        }
    }

    #[test]
    fn threaded_plugin_lifecycle() {
        let api = table();
        let config = N64GlConfig {
            flags: N64GL_PLUGIN_FLAG_THREADED,
            ..N64GlConfig::default()
        };
        unsafe {
            let plugin = n64gl_plugin_create(&api, &config);
            assert!(!plugin.is_null());
            assert!((*plugin).wrapper().is_threaded());

            // Host succeeds but exposes no GL symbols: loading fails on the dispatcher side.
            assert_eq!(
                n64gl_plugin_set_video_mode(plugin, 640, 480, 32, 1, 0),
                N64GL_STATUS_DISPATCH_ERROR
            );

            let before = SWAPS.load(Ordering::SeqCst);
            n64gl_plugin_swap_buffers(plugin);
            n64gl_plugin_swap_buffers(plugin);
            n64gl_plugin_wait_for_swap_buffers(plugin);
            assert_eq!(SWAPS.load(Ordering::SeqCst) - before, 2);

            n64gl_plugin_destroy(plugin);
        }
    }
}
