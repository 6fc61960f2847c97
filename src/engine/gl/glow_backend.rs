//! ### English
//! Production `GlApi` on top of `glow`.
//!
//! `glow` covers every typed entry point. Calls that hand GL a client-memory pointer
//! (client-side vertex arrays, client index arrays, texture uploads, pixel read-back) go through a
//! small raw function table resolved with the same loader.
//!
//! ### 中文
//! 基于 `glow` 的生产 `GlApi` 实现。
//!
//! 所有带类型的入口函数由 `glow` 提供。需要向 GL 传入客户端内存指针的调用（客户端顶点数组、
//! 客户端索引数组、纹理上传、像素回读）通过同一 loader 解析出的少量原始函数表完成。

use std::ffi::{CStr, c_void};
use std::num::NonZeroU32;

use glow::HasContext as _;

use crate::engine::error::HostApiError;

use super::{AttribLayout, GlApi, PixelRect, TexImage2D, TexSubImage2D, index_size};

type VertexAttribPointerFn = unsafe extern "system" fn(u32, i32, u32, u8, i32, *const c_void);
type DrawElementsFn = unsafe extern "system" fn(u32, i32, u32, *const c_void);
type TexImage2DFn =
    unsafe extern "system" fn(u32, i32, i32, i32, i32, i32, u32, u32, *const c_void);
type TexSubImage2DFn =
    unsafe extern "system" fn(u32, i32, i32, i32, i32, i32, u32, u32, *const c_void);
type ReadPixelsFn = unsafe extern "system" fn(i32, i32, i32, i32, u32, u32, *mut c_void);

/// ### English
/// Entry points taking client-memory pointers.
///
/// ### 中文
/// 接收客户端内存指针的入口函数。
#[derive(Clone, Copy)]
struct ClientPointerFns {
    vertex_attrib_pointer: VertexAttribPointerFn,
    draw_elements: DrawElementsFn,
    tex_image_2d: TexImage2DFn,
    tex_sub_image_2d: TexSubImage2DFn,
    read_pixels: ReadPixelsFn,
}

/// ### English
/// Entry points `glow` calls while building its context, besides `glGetString`.
///
/// ### 中文
/// 除 `glGetString` 外，`glow` 构建上下文期间会调用的入口函数。
const CONTEXT_QUERIES: [(&CStr, &str); 2] = [
    (c"glGetIntegerv", "glGetIntegerv"),
    (c"glGetError", "glGetError"),
];

type GetStringFn = unsafe extern "system" fn(u32) -> *const u8;

fn resolve(
    loader: &mut dyn FnMut(&CStr) -> *const c_void,
    name: &CStr,
    label: &'static str,
) -> Result<*const c_void, HostApiError> {
    let ptr = loader(name);
    if ptr.is_null() {
        return Err(HostApiError::MissingGlSymbol(label));
    }
    Ok(ptr)
}

impl ClientPointerFns {
    fn load(loader: &mut dyn FnMut(&CStr) -> *const c_void) -> Result<Self, HostApiError> {
        let vertex_attrib_pointer = resolve(loader, c"glVertexAttribPointer", "glVertexAttribPointer")?;
        let draw_elements = resolve(loader, c"glDrawElements", "glDrawElements")?;
        let tex_image_2d = resolve(loader, c"glTexImage2D", "glTexImage2D")?;
        let tex_sub_image_2d = resolve(loader, c"glTexSubImage2D", "glTexSubImage2D")?;
        let read_pixels = resolve(loader, c"glReadPixels", "glReadPixels")?;

        Ok(Self {
            vertex_attrib_pointer: unsafe {
                std::mem::transmute::<*const c_void, VertexAttribPointerFn>(vertex_attrib_pointer)
            },
            draw_elements: unsafe {
                std::mem::transmute::<*const c_void, DrawElementsFn>(draw_elements)
            },
            tex_image_2d: unsafe { std::mem::transmute::<*const c_void, TexImage2DFn>(tex_image_2d) },
            tex_sub_image_2d: unsafe {
                std::mem::transmute::<*const c_void, TexSubImage2DFn>(tex_sub_image_2d)
            },
            read_pixels: unsafe { std::mem::transmute::<*const c_void, ReadPixelsFn>(read_pixels) },
        })
    }
}

/// ### English
/// Checks what `glow::Context` construction relies on, so a broken host surfaces as an error
/// instead of a panic inside `glow`: the probe symbols resolve and `GL_VERSION` is readable.
///
/// ### 中文
/// 检查 `glow::Context` 构建所依赖的条件，使宿主异常以错误而非 `glow` 内部 panic 的形式暴露：
/// 探测符号均可解析，且 `GL_VERSION` 可读。
unsafe fn check_context(loader: &mut dyn FnMut(&CStr) -> *const c_void) -> Result<(), HostApiError> {
    let get_string = resolve(loader, c"glGetString", "glGetString")?;
    for (symbol, label) in CONTEXT_QUERIES {
        resolve(loader, symbol, label)?;
    }

    let get_string = unsafe { std::mem::transmute::<*const c_void, GetStringFn>(get_string) };
    let version = unsafe { get_string(glow::VERSION) };
    if version.is_null() {
        return Err(HostApiError::NoCurrentContext);
    }
    match unsafe { CStr::from_ptr(version.cast()) }.to_str() {
        Ok(_) => Ok(()),
        Err(_) => Err(HostApiError::NoCurrentContext),
    }
}

/// ### English
/// `GlApi` backed by a `glow::Context` created on the GPU thread.
///
/// ### 中文
/// 由 GPU 线程上创建的 `glow::Context` 支撑的 `GlApi`。
pub struct GlowBackend {
    gl: glow::Context,
    client: ClientPointerFns,
}

/// ### English
/// The context is created on the GPU thread and only used there; `Send` lets the loaded backend
/// travel back into the executor that lives on that same thread.
///
/// ### 中文
/// 上下文在 GPU 线程上创建且只在该线程使用；`Send` 仅用于把加载好的后端交给同一线程上的执行器。
unsafe impl Send for GlowBackend {}

#[inline]
fn name(raw: u32) -> Option<NonZeroU32> {
    NonZeroU32::new(raw)
}

#[inline]
fn uniform(location: i32) -> Option<glow::NativeUniformLocation> {
    u32::try_from(location).ok().map(glow::NativeUniformLocation)
}

#[inline]
fn fence(sync: u64) -> glow::NativeFence {
    glow::NativeFence(sync as usize as *mut _)
}

impl GlowBackend {
    /// ### English
    /// Resolves every entry point through `loader` (typically the host's `GetProcAddress`).
    ///
    /// # Safety
    /// A GL context must be current on the calling thread, and the returned backend must only be
    /// used while that context stays current on that thread.
    ///
    /// #### Parameters
    /// - `loader`: Maps a NUL-terminated GL symbol name to its address (NULL when missing).
    ///
    /// ### 中文
    /// 通过 `loader`（通常为宿主的 `GetProcAddress`）解析所有入口函数。
    ///
    /// # Safety
    /// 调用线程上必须有当前 GL 上下文，且返回的后端只能在该上下文仍为该线程当前上下文时使用。
    ///
    /// #### 参数
    /// - `loader`：将以 NUL 结尾的 GL 符号名映射为地址（缺失时为 NULL）。
    pub unsafe fn load_with<F>(mut loader: F) -> Result<Self, HostApiError>
    where
        F: FnMut(&CStr) -> *const c_void,
    {
        unsafe { check_context(&mut loader)? };
        let client = ClientPointerFns::load(&mut loader)?;
        let gl = unsafe { glow::Context::from_loader_function_cstr(&mut loader) };

        tracing::debug!(
            version = %unsafe { gl.get_parameter_string(glow::VERSION) },
            renderer = %unsafe { gl.get_parameter_string(glow::RENDERER) },
            "GL functions loaded"
        );

        Ok(Self { gl, client })
    }

    fn unpack_alignment(&self) -> usize {
        unsafe { self.gl.get_parameter_i32(glow::UNPACK_ALIGNMENT) }.max(1) as usize
    }

    /// ### English
    /// `false` (and logged) when `provided` bytes cannot back a call reading `needed` bytes.
    ///
    /// ### 中文
    /// `provided` 字节不足以支撑读取 `needed` 字节的调用时返回 `false`（并记录日志）。
    fn covers(command: &'static str, needed: usize, provided: usize) -> bool {
        if provided < needed {
            tracing::error!(command, needed, provided, "client data too short; GL call skipped");
            return false;
        }
        true
    }

    fn gen_names<T>(&self, n: usize, create: impl Fn(&glow::Context) -> Result<T, String>, raw: impl Fn(T) -> u32) -> Vec<u32> {
        (0..n)
            .map(|_| match create(&self.gl) {
                Ok(object) => raw(object),
                Err(err) => {
                    tracing::warn!(%err, "GL object creation failed");
                    0
                }
            })
            .collect()
    }
}

impl GlApi for GlowBackend {
    fn blend_func(&mut self, sfactor: u32, dfactor: u32) {
        unsafe { self.gl.blend_func(sfactor, dfactor) };
    }

    fn blend_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        unsafe { self.gl.blend_color(red, green, blue, alpha) };
    }

    fn pixel_store_i(&mut self, pname: u32, param: i32) {
        unsafe { self.gl.pixel_store_i32(pname, param) };
    }

    fn clear_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        unsafe { self.gl.clear_color(red, green, blue, alpha) };
    }

    fn clear_depth_f(&mut self, depth: f32) {
        unsafe { self.gl.clear_depth_f32(depth) };
    }

    fn clear(&mut self, mask: u32) {
        unsafe { self.gl.clear(mask) };
    }

    fn cull_face(&mut self, mode: u32) {
        unsafe { self.gl.cull_face(mode) };
    }

    fn depth_func(&mut self, func: u32) {
        unsafe { self.gl.depth_func(func) };
    }

    fn depth_mask(&mut self, flag: bool) {
        unsafe { self.gl.depth_mask(flag) };
    }

    fn depth_range_f(&mut self, near: f32, far: f32) {
        unsafe { self.gl.depth_range_f32(near, far) };
    }

    fn enable(&mut self, cap: u32) {
        unsafe { self.gl.enable(cap) };
    }

    fn disable(&mut self, cap: u32) {
        unsafe { self.gl.disable(cap) };
    }

    fn polygon_offset(&mut self, factor: f32, units: f32) {
        unsafe { self.gl.polygon_offset(factor, units) };
    }

    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.scissor(x, y, width, height) };
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.viewport(x, y, width, height) };
    }

    fn line_width(&mut self, width: f32) {
        unsafe { self.gl.line_width(width) };
    }

    fn gen_textures(&mut self, n: usize) -> Vec<u32> {
        self.gen_names(n, |gl| unsafe { gl.create_texture() }, |t| t.0.get())
    }

    fn delete_textures(&mut self, textures: &[u32]) {
        for texture in textures.iter().copied().filter_map(name) {
            unsafe { self.gl.delete_texture(glow::NativeTexture(texture)) };
        }
    }

    fn active_texture(&mut self, texture: u32) {
        unsafe { self.gl.active_texture(texture) };
    }

    fn bind_texture(&mut self, target: u32, texture: u32) {
        unsafe { self.gl.bind_texture(target, name(texture).map(glow::NativeTexture)) };
    }

    fn tex_parameter_i(&mut self, target: u32, pname: u32, param: i32) {
        unsafe { self.gl.tex_parameter_i32(target, pname, param) };
    }

    fn tex_parameter_f(&mut self, target: u32, pname: u32, param: f32) {
        unsafe { self.gl.tex_parameter_f32(target, pname, param) };
    }

    fn tex_storage_2d(&mut self, target: u32, levels: i32, internal_format: u32, width: i32, height: i32) {
        unsafe { self.gl.tex_storage_2d(target, levels, internal_format, width, height) };
    }

    fn tex_image_2d(&mut self, params: TexImage2D, pixels: Option<&[u8]>) {
        let needed = pixels.map_or(0, |_| params.byte_len(self.unpack_alignment()));
        if !Self::covers("glTexImage2D", needed, pixels.map_or(0, <[u8]>::len)) {
            return;
        }
        let data = pixels.map_or(std::ptr::null(), |bytes| bytes.as_ptr().cast::<c_void>());
        unsafe {
            (self.client.tex_image_2d)(
                params.target,
                params.level,
                params.internal_format,
                params.width,
                params.height,
                0,
                params.format,
                params.ty,
                data,
            )
        };
    }

    fn tex_sub_image_2d(&mut self, params: TexSubImage2D, pixels: &[u8]) {
        if !Self::covers("glTexSubImage2D", params.byte_len(self.unpack_alignment()), pixels.len()) {
            return;
        }
        unsafe {
            (self.client.tex_sub_image_2d)(
                params.target,
                params.level,
                params.x_offset,
                params.y_offset,
                params.width,
                params.height,
                params.format,
                params.ty,
                pixels.as_ptr().cast::<c_void>(),
            )
        };
    }

    fn gen_framebuffers(&mut self, n: usize) -> Vec<u32> {
        self.gen_names(n, |gl| unsafe { gl.create_framebuffer() }, |f| f.0.get())
    }

    fn delete_framebuffers(&mut self, framebuffers: &[u32]) {
        for framebuffer in framebuffers.iter().copied().filter_map(name) {
            unsafe { self.gl.delete_framebuffer(glow::NativeFramebuffer(framebuffer)) };
        }
    }

    fn bind_framebuffer(&mut self, target: u32, framebuffer: u32) {
        unsafe {
            self.gl
                .bind_framebuffer(target, name(framebuffer).map(glow::NativeFramebuffer))
        };
    }

    fn framebuffer_texture_2d(&mut self, target: u32, attachment: u32, tex_target: u32, texture: u32, level: i32) {
        unsafe {
            self.gl.framebuffer_texture_2d(
                target,
                attachment,
                tex_target,
                name(texture).map(glow::NativeTexture),
                level,
            )
        };
    }

    fn gen_renderbuffers(&mut self, n: usize) -> Vec<u32> {
        self.gen_names(n, |gl| unsafe { gl.create_renderbuffer() }, |r| r.0.get())
    }

    fn delete_renderbuffers(&mut self, renderbuffers: &[u32]) {
        for renderbuffer in renderbuffers.iter().copied().filter_map(name) {
            unsafe { self.gl.delete_renderbuffer(glow::NativeRenderbuffer(renderbuffer)) };
        }
    }

    fn bind_renderbuffer(&mut self, target: u32, renderbuffer: u32) {
        unsafe {
            self.gl
                .bind_renderbuffer(target, name(renderbuffer).map(glow::NativeRenderbuffer))
        };
    }

    fn renderbuffer_storage(&mut self, target: u32, internal_format: u32, width: i32, height: i32) {
        unsafe {
            self.gl
                .renderbuffer_storage(target, internal_format, width, height)
        };
    }

    fn framebuffer_renderbuffer(&mut self, target: u32, attachment: u32, rb_target: u32, renderbuffer: u32) {
        unsafe {
            self.gl.framebuffer_renderbuffer(
                target,
                attachment,
                rb_target,
                name(renderbuffer).map(glow::NativeRenderbuffer),
            )
        };
    }

    fn check_framebuffer_status(&mut self, target: u32) -> u32 {
        unsafe { self.gl.check_framebuffer_status(target) }
    }

    fn blit_framebuffer(&mut self, src: [i32; 4], dst: [i32; 4], mask: u32, filter: u32) {
        unsafe {
            self.gl.blit_framebuffer(
                src[0], src[1], src[2], src[3], dst[0], dst[1], dst[2], dst[3], mask, filter,
            )
        };
    }

    fn read_buffer(&mut self, mode: u32) {
        unsafe { self.gl.read_buffer(mode) };
    }

    fn draw_buffers(&mut self, buffers: &[u32]) {
        unsafe { self.gl.draw_buffers(buffers) };
    }

    fn read_pixels(&mut self, rect: PixelRect) -> Vec<u8> {
        let alignment = unsafe { self.gl.get_parameter_i32(glow::PACK_ALIGNMENT) };
        let mut pixels = vec![0u8; rect.byte_len(alignment.max(1) as usize)];
        if pixels.is_empty() {
            return pixels;
        }
        unsafe {
            (self.client.read_pixels)(
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                rect.format,
                rect.ty,
                pixels.as_mut_ptr().cast::<c_void>(),
            )
        };
        pixels
    }

    fn gen_buffers(&mut self, n: usize) -> Vec<u32> {
        self.gen_names(n, |gl| unsafe { gl.create_buffer() }, |b| b.0.get())
    }

    fn delete_buffers(&mut self, buffers: &[u32]) {
        for buffer in buffers.iter().copied().filter_map(name) {
            unsafe { self.gl.delete_buffer(glow::NativeBuffer(buffer)) };
        }
    }

    fn bind_buffer(&mut self, target: u32, buffer: u32) {
        unsafe { self.gl.bind_buffer(target, name(buffer).map(glow::NativeBuffer)) };
    }

    fn buffer_data(&mut self, target: u32, data: &[u8], usage: u32) {
        unsafe { self.gl.buffer_data_u8_slice(target, data, usage) };
    }

    fn buffer_sub_data(&mut self, target: u32, offset: i32, data: &[u8]) {
        unsafe { self.gl.buffer_sub_data_u8_slice(target, offset, data) };
    }

    fn gen_vertex_arrays(&mut self, n: usize) -> Vec<u32> {
        self.gen_names(n, |gl| unsafe { gl.create_vertex_array() }, |v| v.0.get())
    }

    fn delete_vertex_arrays(&mut self, arrays: &[u32]) {
        for array in arrays.iter().copied().filter_map(name) {
            unsafe { self.gl.delete_vertex_array(glow::NativeVertexArray(array)) };
        }
    }

    fn bind_vertex_array(&mut self, array: u32) {
        unsafe { self.gl.bind_vertex_array(name(array).map(glow::NativeVertexArray)) };
    }

    fn enable_vertex_attrib_array(&mut self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) };
    }

    fn disable_vertex_attrib_array(&mut self, index: u32) {
        unsafe { self.gl.disable_vertex_attrib_array(index) };
    }

    fn vertex_attrib_pointer(&mut self, layout: AttribLayout, offset: i32) {
        unsafe {
            self.gl.vertex_attrib_pointer_f32(
                layout.index,
                layout.size,
                layout.ty,
                layout.normalized,
                layout.stride,
                offset,
            )
        };
    }

    unsafe fn vertex_attrib_pointer_client(&mut self, layout: AttribLayout, pointer: *const u8) {
        unsafe {
            (self.client.vertex_attrib_pointer)(
                layout.index,
                layout.size,
                layout.ty,
                u8::from(layout.normalized),
                layout.stride,
                pointer.cast::<c_void>(),
            )
        };
    }

    fn vertex_attrib_1f(&mut self, index: u32, x: f32) {
        unsafe { self.gl.vertex_attrib_1_f32(index, x) };
    }

    fn vertex_attrib_4f(&mut self, index: u32, x: f32, y: f32, z: f32, w: f32) {
        unsafe { self.gl.vertex_attrib_4_f32(index, x, y, z, w) };
    }

    fn draw_arrays(&mut self, mode: u32, first: i32, count: i32) {
        unsafe { self.gl.draw_arrays(mode, first, count) };
    }

    fn draw_elements(&mut self, mode: u32, count: i32, ty: u32, indices: &[u8]) {
        let needed = usize::try_from(count).unwrap_or(0).saturating_mul(index_size(ty));
        if !Self::covers("glDrawElements", needed, indices.len()) {
            return;
        }
        unsafe {
            (self.client.draw_elements)(mode, count, ty, indices.as_ptr().cast::<c_void>())
        };
    }

    fn memory_barrier(&mut self, barriers: u32) {
        unsafe { self.gl.memory_barrier(barriers) };
    }

    fn finish(&mut self) {
        unsafe { self.gl.finish() };
    }

    fn create_shader(&mut self, shader_type: u32) -> u32 {
        match unsafe { self.gl.create_shader(shader_type) } {
            Ok(shader) => shader.0.get(),
            Err(err) => {
                tracing::warn!(%err, shader_type, "glCreateShader failed");
                0
            }
        }
    }

    fn shader_source(&mut self, shader: u32, source: &str) {
        if let Some(shader) = name(shader) {
            unsafe { self.gl.shader_source(glow::NativeShader(shader), source) };
        }
    }

    fn compile_shader(&mut self, shader: u32) {
        if let Some(shader) = name(shader) {
            unsafe { self.gl.compile_shader(glow::NativeShader(shader)) };
        }
    }

    fn get_shader_compile_status(&mut self, shader: u32) -> bool {
        name(shader).is_some_and(|shader| unsafe {
            self.gl.get_shader_compile_status(glow::NativeShader(shader))
        })
    }

    fn get_shader_info_log(&mut self, shader: u32) -> String {
        name(shader).map_or_else(String::new, |shader| unsafe {
            self.gl.get_shader_info_log(glow::NativeShader(shader))
        })
    }

    fn delete_shader(&mut self, shader: u32) {
        if let Some(shader) = name(shader) {
            unsafe { self.gl.delete_shader(glow::NativeShader(shader)) };
        }
    }

    fn create_program(&mut self) -> u32 {
        match unsafe { self.gl.create_program() } {
            Ok(program) => program.0.get(),
            Err(err) => {
                tracing::warn!(%err, "glCreateProgram failed");
                0
            }
        }
    }

    fn attach_shader(&mut self, program: u32, shader: u32) {
        if let (Some(program), Some(shader)) = (name(program), name(shader)) {
            unsafe {
                self.gl
                    .attach_shader(glow::NativeProgram(program), glow::NativeShader(shader))
            };
        }
    }

    fn detach_shader(&mut self, program: u32, shader: u32) {
        if let (Some(program), Some(shader)) = (name(program), name(shader)) {
            unsafe {
                self.gl
                    .detach_shader(glow::NativeProgram(program), glow::NativeShader(shader))
            };
        }
    }

    fn bind_attrib_location(&mut self, program: u32, index: u32, attrib: &str) {
        if let Some(program) = name(program) {
            unsafe {
                self.gl
                    .bind_attrib_location(glow::NativeProgram(program), index, attrib)
            };
        }
    }

    fn link_program(&mut self, program: u32) {
        if let Some(program) = name(program) {
            unsafe { self.gl.link_program(glow::NativeProgram(program)) };
        }
    }

    fn get_program_link_status(&mut self, program: u32) -> bool {
        name(program).is_some_and(|program| unsafe {
            self.gl.get_program_link_status(glow::NativeProgram(program))
        })
    }

    fn get_program_info_log(&mut self, program: u32) -> String {
        name(program).map_or_else(String::new, |program| unsafe {
            self.gl.get_program_info_log(glow::NativeProgram(program))
        })
    }

    fn use_program(&mut self, program: u32) {
        unsafe { self.gl.use_program(name(program).map(glow::NativeProgram)) };
    }

    fn delete_program(&mut self, program: u32) {
        if let Some(program) = name(program) {
            unsafe { self.gl.delete_program(glow::NativeProgram(program)) };
        }
    }

    fn get_uniform_location(&mut self, program: u32, uniform_name: &str) -> i32 {
        let Some(program) = name(program) else {
            return -1;
        };
        unsafe {
            self.gl
                .get_uniform_location(glow::NativeProgram(program), uniform_name)
        }
        .and_then(|location| i32::try_from(location.0).ok())
        .unwrap_or(-1)
    }

    fn uniform_1i(&mut self, location: i32, x: i32) {
        unsafe { self.gl.uniform_1_i32(uniform(location).as_ref(), x) };
    }

    fn uniform_1f(&mut self, location: i32, x: f32) {
        unsafe { self.gl.uniform_1_f32(uniform(location).as_ref(), x) };
    }

    fn uniform_2f(&mut self, location: i32, x: f32, y: f32) {
        unsafe { self.gl.uniform_2_f32(uniform(location).as_ref(), x, y) };
    }

    fn uniform_2i(&mut self, location: i32, x: i32, y: i32) {
        unsafe { self.gl.uniform_2_i32(uniform(location).as_ref(), x, y) };
    }

    fn uniform_4i(&mut self, location: i32, x: i32, y: i32, z: i32, w: i32) {
        unsafe { self.gl.uniform_4_i32(uniform(location).as_ref(), x, y, z, w) };
    }

    fn uniform_4f(&mut self, location: i32, x: f32, y: f32, z: f32, w: f32) {
        unsafe { self.gl.uniform_4_f32(uniform(location).as_ref(), x, y, z, w) };
    }

    fn uniform_3fv(&mut self, location: i32, values: &[f32]) {
        unsafe { self.gl.uniform_3_f32_slice(uniform(location).as_ref(), values) };
    }

    fn uniform_4fv(&mut self, location: i32, values: &[f32]) {
        unsafe { self.gl.uniform_4_f32_slice(uniform(location).as_ref(), values) };
    }

    fn get_integer(&mut self, pname: u32) -> i32 {
        unsafe { self.gl.get_parameter_i32(pname) }
    }

    fn get_float(&mut self, pname: u32) -> f32 {
        unsafe { self.gl.get_parameter_f32(pname) }
    }

    fn get_string(&mut self, string_name: u32) -> String {
        unsafe { self.gl.get_parameter_string(string_name) }
    }

    fn get_string_i(&mut self, string_name: u32, index: u32) -> String {
        unsafe { self.gl.get_parameter_indexed_string(string_name, index) }
    }

    fn get_error(&mut self) -> u32 {
        unsafe { self.gl.get_error() }
    }

    fn fence_sync(&mut self, condition: u32, flags: u32) -> u64 {
        match unsafe { self.gl.fence_sync(condition, flags) } {
            Ok(sync) => sync.0 as usize as u64,
            Err(err) => {
                tracing::warn!(%err, "glFenceSync failed");
                0
            }
        }
    }

    fn client_wait_sync(&mut self, sync: u64, flags: u32, timeout_ns: u64) -> u32 {
        if sync == 0 {
            return glow::WAIT_FAILED;
        }
        let timeout = i32::try_from(timeout_ns).unwrap_or(i32::MAX);
        unsafe { self.gl.client_wait_sync(fence(sync), flags, timeout) }
    }

    fn delete_sync(&mut self, sync: u64) {
        if sync != 0 {
            unsafe { self.gl.delete_sync(fence(sync)) };
        }
    }
}
