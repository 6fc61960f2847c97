//! ### English
//! `HostVideo` backed by the host-provided `EmbedderVideoApi` table.
//!
//! ### 中文
//! 由宿主提供的 `EmbedderVideoApi` 函数表支撑的 `HostVideo`。
use std::ffi::{CStr, c_char, c_int, c_void};

use crate::engine::error::HostApiError;

use super::{EmbedderVideoApi, HostVideo};

/// ### English
/// Function pointer type for `VidExt_Init` / `VidExt_Quit` / `VidExt_GL_SwapBuffers`.
///
/// ### 中文
/// `VidExt_Init` / `VidExt_Quit` / `VidExt_GL_SwapBuffers` 的函数指针类型。
type VidExtVoid = unsafe extern "C" fn() -> c_int;
/// ### English
/// Function pointer type for `VidExt_SetVideoMode`.
///
/// ### 中文
/// `VidExt_SetVideoMode` 的函数指针类型。
type VidExtSetVideoMode = unsafe extern "C" fn(c_int, c_int, c_int, c_int, c_int) -> c_int;
/// ### English
/// Function pointer type for `VidExt_GL_GetProcAddress`.
///
/// ### 中文
/// `VidExt_GL_GetProcAddress` 的函数指针类型。
type VidExtGetProcAddress = unsafe extern "C" fn(*const c_char) -> *const c_void;
type VidExtSetAttribute = unsafe extern "C" fn(c_int, c_int) -> c_int;
type VidExtGetAttribute = unsafe extern "C" fn(c_int, *mut c_int) -> c_int;

/// ### English
/// Validated, typed copy of an `EmbedderVideoApi`.
///
/// ### 中文
/// 经过校验并转换为强类型的 `EmbedderVideoApi` 副本。
#[derive(Clone, Copy)]
pub struct LoadedVideoApi {
    init: VidExtVoid,
    quit: VidExtVoid,
    set_video_mode: VidExtSetVideoMode,
    get_proc_address: VidExtGetProcAddress,
    set_attribute: VidExtSetAttribute,
    get_attribute: VidExtGetAttribute,
    swap_buffers: VidExtVoid,
}

impl LoadedVideoApi {
    /// ### English
    /// Checks every entry of `api` and converts it into typed function pointers.
    ///
    /// # Safety
    /// Every non-zero field must be the address of a function with the matching `VidExt_*`
    /// signature, callable for the whole lifetime of the returned value.
    ///
    /// ### 中文
    /// 校验 `api` 的每一项并转换为强类型函数指针。
    ///
    /// # Safety
    /// 每个非 0 字段都必须是签名匹配的 `VidExt_*` 函数地址，并在返回值的整个生命周期内可调用。
    pub unsafe fn from_table(api: EmbedderVideoApi) -> Result<Self, HostApiError> {
        let checks = [
            (api.vid_init, "vid_init"),
            (api.vid_quit, "vid_quit"),
            (api.vid_set_video_mode, "vid_set_video_mode"),
            (api.vid_gl_get_proc_address, "vid_gl_get_proc_address"),
            (api.vid_gl_set_attribute, "vid_gl_set_attribute"),
            (api.vid_gl_get_attribute, "vid_gl_get_attribute"),
            (api.vid_gl_swap_buffers, "vid_gl_swap_buffers"),
        ];
        if let Some((_, field)) = checks.iter().find(|(addr, _)| *addr == 0) {
            return Err(HostApiError::MissingSymbol(field));
        }

        Ok(Self {
            init: unsafe { std::mem::transmute::<usize, VidExtVoid>(api.vid_init) },
            quit: unsafe { std::mem::transmute::<usize, VidExtVoid>(api.vid_quit) },
            set_video_mode: unsafe {
                std::mem::transmute::<usize, VidExtSetVideoMode>(api.vid_set_video_mode)
            },
            get_proc_address: unsafe {
                std::mem::transmute::<usize, VidExtGetProcAddress>(api.vid_gl_get_proc_address)
            },
            set_attribute: unsafe {
                std::mem::transmute::<usize, VidExtSetAttribute>(api.vid_gl_set_attribute)
            },
            get_attribute: unsafe {
                std::mem::transmute::<usize, VidExtGetAttribute>(api.vid_gl_get_attribute)
            },
            swap_buffers: unsafe {
                std::mem::transmute::<usize, VidExtVoid>(api.vid_gl_swap_buffers)
            },
        })
    }
}

impl HostVideo for LoadedVideoApi {
    fn init(&self) -> i32 {
        unsafe { (self.init)() }
    }

    fn quit(&self) -> i32 {
        unsafe { (self.quit)() }
    }

    fn set_video_mode(&self, width: i32, height: i32, bits_per_pixel: i32, mode: i32, flags: i32) -> i32 {
        unsafe { (self.set_video_mode)(width, height, bits_per_pixel, mode, flags) }
    }

    fn gl_set_attribute(&self, attribute: i32, value: i32) -> i32 {
        unsafe { (self.set_attribute)(attribute, value) }
    }

    fn gl_get_attribute(&self, attribute: i32) -> (i32, i32) {
        let mut value: c_int = 0;
        let status = unsafe { (self.get_attribute)(attribute, &mut value) };
        (status, value)
    }

    fn swap_buffers(&self) -> i32 {
        unsafe { (self.swap_buffers)() }
    }

    fn get_proc_address(&self, name: &CStr) -> *const c_void {
        unsafe { (self.get_proc_address)(name.as_ptr()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    unsafe extern "C" fn ok() -> c_int {
        0
    }

    unsafe extern "C" fn set_mode(width: c_int, height: c_int, _: c_int, _: c_int, _: c_int) -> c_int {
        if width > 0 && height > 0 { 0 } else { 3 }
    }

    unsafe extern "C" fn proc_address(_: *const c_char) -> *const c_void {
        std::ptr::null()
    }

    unsafe extern "C" fn set_attribute(_: c_int, _: c_int) -> c_int {
        0
    }

    unsafe extern "C" fn get_attribute(attribute: c_int, value: *mut c_int) -> c_int {
        unsafe { *value = attribute * 2 };
        0
    }

    fn full_table() -> EmbedderVideoApi {
        EmbedderVideoApi {
            vid_init: ok as usize,
            vid_quit: ok as usize,
            vid_set_video_mode: set_mode as usize,
            vid_gl_get_proc_address: proc_address as usize,
            vid_gl_set_attribute: set_attribute as usize,
            vid_gl_get_attribute: get_attribute as usize,
            vid_gl_swap_buffers: ok as usize,
        }
    }

    #[test]
    fn null_entries_are_reported_by_name() {
        let api = EmbedderVideoApi {
            vid_gl_swap_buffers: 0,
            ..full_table()
        };
        let err = unsafe { LoadedVideoApi::from_table(api) }.err();
        assert_eq!(err, Some(HostApiError::MissingSymbol("vid_gl_swap_buffers")));
    }

    #[test]
    fn calls_are_forwarded_to_the_table() {
        let host = unsafe { LoadedVideoApi::from_table(full_table()) }.unwrap();
        assert_eq!(host.init(), 0);
        assert_eq!(host.set_video_mode(640, 480, 32, 1, 0), 0);
        assert_eq!(host.set_video_mode(0, 480, 32, 1, 0), 3);
        assert_eq!(host.gl_get_attribute(21), (0, 42));
        assert!(host.get_proc_address(c"glClear").is_null());
    }
}
