//! ### English
//! C ABI bindings for the frame-skip controller.
//!
//! ### 中文
//! 跳帧控制器相关的 C ABI 绑定。
use crate::engine::refresh::FrameSkipMode;

use super::N64GlPlugin;

#[unsafe(no_mangle)]
/// ### English
/// Sets the frame-skip mode (`1` = manual, otherwise auto) and the maximum consecutive skips
/// (`< 1` disables skipping).
///
/// ### 中文
/// 设置跳帧模式（`1` = 手动，其它 = 自动）与最大连续跳帧数（`< 1` 表示禁用）。
pub unsafe extern "C" fn n64gl_frame_skip_set_skips(plugin: *mut N64GlPlugin, mode: u32, max_skips: i32) {
    if plugin.is_null() {
        return;
    }
    unsafe { (*plugin).frame_skip() }.set_skips(FrameSkipMode::from_raw(mode), max_skips);
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn n64gl_frame_skip_set_target_fps(plugin: *mut N64GlPlugin, fps: i32) {
    if plugin.is_null() {
        return;
    }
    unsafe { (*plugin).frame_skip() }.set_target_fps(fps);
}

#[unsafe(no_mangle)]
/// ### English
/// Returns `true` when the next frame should not be sent to the GPU. NULL returns `false`.
///
/// ### 中文
/// 下一帧不应发送给 GPU 时返回 `true`；NULL 返回 `false`。
pub unsafe extern "C" fn n64gl_frame_skip_will_skip_next(plugin: *mut N64GlPlugin) -> bool {
    if plugin.is_null() {
        return false;
    }
    unsafe { (*plugin).frame_skip() }.will_skip_next()
}

#[unsafe(no_mangle)]
/// ### English
/// Advances the controller by one emulated frame.
///
/// ### 中文
/// 将控制器推进一个模拟帧。
pub unsafe extern "C" fn n64gl_frame_skip_update(plugin: *mut N64GlPlugin) {
    if plugin.is_null() {
        return;
    }
    unsafe { (*plugin).frame_skip() }.update();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::PluginConfig;
    use crate::engine::host::recording::RecordingHost;

    #[test]
    fn manual_skipping_through_the_c_abi() {
        let plugin = N64GlPlugin::new(RecordingHost::new(), PluginConfig::default()).unwrap();
        let plugin = Box::into_raw(Box::new(plugin));
        unsafe {
            n64gl_frame_skip_set_skips(plugin, 1, 1);
            let mut skips = Vec::new();
            for _ in 0..4 {
                n64gl_frame_skip_update(plugin);
                skips.push(n64gl_frame_skip_will_skip_next(plugin));
            }
            assert_eq!(skips, vec![true, false, true, false]);

            n64gl_frame_skip_set_target_fps(plugin, 30);
            assert_eq!((*plugin).frame_skip().target_fps(), 30);
            assert!(!n64gl_frame_skip_will_skip_next(std::ptr::null_mut()));

            drop(Box::from_raw(plugin));
        }
    }
}
