//! ### English
//! OpenGL entry points as seen by the command executor.
//!
//! `GlApi` mirrors the native calls one-to-one with raw object names (`u32`) and client data as
//! slices. The production implementation is [`GlowBackend`]; tests use a recording fake.
//!
//! ### 中文
//! 命令执行器视角下的 OpenGL 入口函数。
//!
//! `GlApi` 与原生调用一一对应，对象名使用原始 `u32`，客户端数据使用切片。
//! 生产实现为 [`GlowBackend`]；测试使用记录调用的伪实现。
mod glow_backend;
#[cfg(test)]
pub(crate) mod recording;

pub use glow_backend::GlowBackend;

/// ### English
/// Raw `glTexImage2D` parameters (everything but the pixel data).
///
/// ### 中文
/// `glTexImage2D` 的原始参数（像素数据除外）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TexImage2D {
    pub target: u32,
    pub level: i32,
    pub internal_format: i32,
    pub width: i32,
    pub height: i32,
    pub format: u32,
    pub ty: u32,
}

/// ### English
/// Raw `glTexSubImage2D` parameters (everything but the pixel data).
///
/// ### 中文
/// `glTexSubImage2D` 的原始参数（像素数据除外）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TexSubImage2D {
    pub target: u32,
    pub level: i32,
    pub x_offset: i32,
    pub y_offset: i32,
    pub width: i32,
    pub height: i32,
    pub format: u32,
    pub ty: u32,
}

/// ### English
/// Pixel rectangle read back by `glReadPixels`.
///
/// ### 中文
/// `glReadPixels` 回读的像素矩形。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub format: u32,
    pub ty: u32,
}

impl PixelRect {
    /// ### English
    /// Bytes `glReadPixels` writes for this rectangle with the given `GL_PACK_ALIGNMENT`.
    ///
    /// Every row but the last is padded up to `pack_alignment`.
    ///
    /// ### 中文
    /// 在给定 `GL_PACK_ALIGNMENT` 下 `glReadPixels` 为该矩形写入的字节数。
    ///
    /// 除最后一行外，每行都会补齐到 `pack_alignment`。
    pub fn byte_len(&self, pack_alignment: usize) -> usize {
        image_byte_len(self.width, self.height, self.format, self.ty, pack_alignment)
    }
}

impl TexImage2D {
    /// ### English
    /// Bytes `glTexImage2D` reads from client memory with the given `GL_UNPACK_ALIGNMENT`.
    ///
    /// ### 中文
    /// 在给定 `GL_UNPACK_ALIGNMENT` 下 `glTexImage2D` 从客户端内存读取的字节数。
    pub fn byte_len(&self, unpack_alignment: usize) -> usize {
        image_byte_len(self.width, self.height, self.format, self.ty, unpack_alignment)
    }
}

impl TexSubImage2D {
    pub fn byte_len(&self, unpack_alignment: usize) -> usize {
        image_byte_len(self.width, self.height, self.format, self.ty, unpack_alignment)
    }
}

/// ### English
/// Bytes spanned by a `width` x `height` image whose rows start on `alignment` boundaries.
///
/// Every row but the last is padded up to `alignment`; empty or negative extents span nothing.
///
/// ### 中文
/// 行起始按 `alignment` 对齐的 `width` x `height` 图像所占字节数。
///
/// 除最后一行外，每行都会补齐到 `alignment`；宽高为 0 或负数时为 0。
pub fn image_byte_len(width: i32, height: i32, format: u32, ty: u32, alignment: usize) -> usize {
    let width = width.max(0) as usize;
    let height = height.max(0) as usize;
    if width == 0 || height == 0 {
        return 0;
    }
    let row = width * bytes_per_pixel(format, ty);
    let align = alignment.max(1);
    let padded_row = row.div_ceil(align) * align;
    padded_row * (height - 1) + row
}

/// ### English
/// Layout of one vertex attribute (`glVertexAttribPointer` minus the pointer).
///
/// ### 中文
/// 单个顶点属性的布局（`glVertexAttribPointer` 去掉指针参数）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttribLayout {
    pub index: u32,
    pub size: i32,
    pub ty: u32,
    pub normalized: bool,
    pub stride: i32,
}

/// ### English
/// Size in bytes of one pixel for a `format`/`type` pair.
///
/// Packed types (`UNSIGNED_SHORT_5_6_5`, ...) cover the whole pixel.
///
/// ### 中文
/// 给定 `format`/`type` 组合时单个像素的字节数。
///
/// 打包类型（`UNSIGNED_SHORT_5_6_5` 等）按整个像素计。
pub fn bytes_per_pixel(format: u32, ty: u32) -> usize {
    let components = match format {
        glow::RED | glow::RED_INTEGER | glow::DEPTH_COMPONENT => 1,
        glow::RG | glow::RG_INTEGER | glow::DEPTH_STENCIL => 2,
        glow::RGB | glow::RGB_INTEGER | glow::BGR => 3,
        _ => 4,
    };
    match ty {
        glow::UNSIGNED_BYTE | glow::BYTE => components,
        glow::UNSIGNED_SHORT | glow::SHORT | glow::HALF_FLOAT => components * 2,
        glow::UNSIGNED_SHORT_5_6_5
        | glow::UNSIGNED_SHORT_4_4_4_4
        | glow::UNSIGNED_SHORT_5_5_5_1 => 2,
        glow::UNSIGNED_INT_24_8
        | glow::UNSIGNED_INT_2_10_10_10_REV
        | glow::UNSIGNED_INT_10F_11F_11F_REV => 4,
        glow::FLOAT_32_UNSIGNED_INT_24_8_REV => 8,
        _ => components * 4,
    }
}

/// ### English
/// Size in bytes of one element index of type `ty` (`UNSIGNED_BYTE/SHORT/INT`).
///
/// ### 中文
/// 类型为 `ty`（`UNSIGNED_BYTE/SHORT/INT`）的单个索引所占字节数。
pub fn index_size(ty: u32) -> usize {
    match ty {
        glow::UNSIGNED_BYTE => 1,
        glow::UNSIGNED_SHORT => 2,
        _ => 4,
    }
}

/// ### English
/// The OpenGL surface driven by the dispatcher.
///
/// Implementations are moved onto the GPU thread and only ever called there, so every method
/// takes `&mut self`. Object names are raw GL names; `0` means "none" / "unbind".
/// Fence handles are `GLsync` pointers cast to `u64`.
///
/// ### 中文
/// 分发器驱动的 OpenGL 接口。
///
/// 实现会被移动到 GPU 线程并且只在该线程上调用，因此所有方法都接收 `&mut self`。
/// 对象名为原始 GL 名称；`0` 表示“无”/“解绑”。fence 句柄为转换成 `u64` 的 `GLsync` 指针。
pub trait GlApi: Send {
    // Fixed-function state.
    fn blend_func(&mut self, sfactor: u32, dfactor: u32);
    fn blend_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32);
    fn pixel_store_i(&mut self, pname: u32, param: i32);
    fn clear_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32);
    fn clear_depth_f(&mut self, depth: f32);
    fn clear(&mut self, mask: u32);
    fn cull_face(&mut self, mode: u32);
    fn depth_func(&mut self, func: u32);
    fn depth_mask(&mut self, flag: bool);
    fn depth_range_f(&mut self, near: f32, far: f32);
    fn enable(&mut self, cap: u32);
    fn disable(&mut self, cap: u32);
    fn polygon_offset(&mut self, factor: f32, units: f32);
    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn line_width(&mut self, width: f32);

    // Textures.
    fn gen_textures(&mut self, n: usize) -> Vec<u32>;
    fn delete_textures(&mut self, textures: &[u32]);
    fn active_texture(&mut self, texture: u32);
    fn bind_texture(&mut self, target: u32, texture: u32);
    fn tex_parameter_i(&mut self, target: u32, pname: u32, param: i32);
    fn tex_parameter_f(&mut self, target: u32, pname: u32, param: f32);
    fn tex_storage_2d(&mut self, target: u32, levels: i32, internal_format: u32, width: i32, height: i32);
    fn tex_image_2d(&mut self, params: TexImage2D, pixels: Option<&[u8]>);
    fn tex_sub_image_2d(&mut self, params: TexSubImage2D, pixels: &[u8]);

    // Framebuffers and renderbuffers.
    fn gen_framebuffers(&mut self, n: usize) -> Vec<u32>;
    fn delete_framebuffers(&mut self, framebuffers: &[u32]);
    fn bind_framebuffer(&mut self, target: u32, framebuffer: u32);
    fn framebuffer_texture_2d(&mut self, target: u32, attachment: u32, tex_target: u32, texture: u32, level: i32);
    fn gen_renderbuffers(&mut self, n: usize) -> Vec<u32>;
    fn delete_renderbuffers(&mut self, renderbuffers: &[u32]);
    fn bind_renderbuffer(&mut self, target: u32, renderbuffer: u32);
    fn renderbuffer_storage(&mut self, target: u32, internal_format: u32, width: i32, height: i32);
    fn framebuffer_renderbuffer(&mut self, target: u32, attachment: u32, rb_target: u32, renderbuffer: u32);
    fn check_framebuffer_status(&mut self, target: u32) -> u32;
    /// ### English
    /// `src`/`dst` are `[x0, y0, x1, y1]`.
    ///
    /// ### 中文
    /// `src`/`dst` 为 `[x0, y0, x1, y1]`。
    fn blit_framebuffer(&mut self, src: [i32; 4], dst: [i32; 4], mask: u32, filter: u32);
    fn read_buffer(&mut self, mode: u32);
    fn draw_buffers(&mut self, buffers: &[u32]);
    fn read_pixels(&mut self, rect: PixelRect) -> Vec<u8>;

    // Buffers and vertex arrays.
    fn gen_buffers(&mut self, n: usize) -> Vec<u32>;
    fn delete_buffers(&mut self, buffers: &[u32]);
    fn bind_buffer(&mut self, target: u32, buffer: u32);
    fn buffer_data(&mut self, target: u32, data: &[u8], usage: u32);
    fn buffer_sub_data(&mut self, target: u32, offset: i32, data: &[u8]);
    fn gen_vertex_arrays(&mut self, n: usize) -> Vec<u32>;
    fn delete_vertex_arrays(&mut self, arrays: &[u32]);
    fn bind_vertex_array(&mut self, array: u32);
    fn enable_vertex_attrib_array(&mut self, index: u32);
    fn disable_vertex_attrib_array(&mut self, index: u32);
    /// ### English
    /// `glVertexAttribPointer` sourcing from the bound `ARRAY_BUFFER` at byte `offset`.
    ///
    /// ### 中文
    /// 从已绑定 `ARRAY_BUFFER` 的字节偏移 `offset` 处取数据的 `glVertexAttribPointer`。
    fn vertex_attrib_pointer(&mut self, layout: AttribLayout, offset: i32);
    /// ### English
    /// `glVertexAttribPointer` with a client-memory pointer (no `ARRAY_BUFFER` bound).
    ///
    /// # Safety
    /// `pointer` must stay valid and unmodified until every draw call that reads the attribute
    /// has been issued.
    ///
    /// ### 中文
    /// 使用客户端内存指针的 `glVertexAttribPointer`（未绑定 `ARRAY_BUFFER`）。
    ///
    /// # Safety
    /// 在读取该属性的所有 draw 调用发出之前，`pointer` 必须保持有效且内容不变。
    unsafe fn vertex_attrib_pointer_client(&mut self, layout: AttribLayout, pointer: *const u8);
    fn vertex_attrib_1f(&mut self, index: u32, x: f32);
    fn vertex_attrib_4f(&mut self, index: u32, x: f32, y: f32, z: f32, w: f32);

    // Drawing.
    fn draw_arrays(&mut self, mode: u32, first: i32, count: i32);
    /// ### English
    /// `glDrawElements` reading `count` indices of type `ty` from client memory.
    ///
    /// ### 中文
    /// 从客户端内存读取 `count` 个 `ty` 类型索引的 `glDrawElements`。
    fn draw_elements(&mut self, mode: u32, count: i32, ty: u32, indices: &[u8]);
    fn memory_barrier(&mut self, barriers: u32);
    fn finish(&mut self);

    // Shaders and programs.
    fn create_shader(&mut self, shader_type: u32) -> u32;
    fn shader_source(&mut self, shader: u32, source: &str);
    fn compile_shader(&mut self, shader: u32);
    fn get_shader_compile_status(&mut self, shader: u32) -> bool;
    fn get_shader_info_log(&mut self, shader: u32) -> String;
    fn delete_shader(&mut self, shader: u32);
    fn create_program(&mut self) -> u32;
    fn attach_shader(&mut self, program: u32, shader: u32);
    fn detach_shader(&mut self, program: u32, shader: u32);
    fn bind_attrib_location(&mut self, program: u32, index: u32, name: &str);
    fn link_program(&mut self, program: u32);
    fn get_program_link_status(&mut self, program: u32) -> bool;
    fn get_program_info_log(&mut self, program: u32) -> String;
    fn use_program(&mut self, program: u32);
    fn delete_program(&mut self, program: u32);
    fn get_uniform_location(&mut self, program: u32, name: &str) -> i32;
    fn uniform_1i(&mut self, location: i32, x: i32);
    fn uniform_1f(&mut self, location: i32, x: f32);
    fn uniform_2f(&mut self, location: i32, x: f32, y: f32);
    fn uniform_2i(&mut self, location: i32, x: i32, y: i32);
    fn uniform_4i(&mut self, location: i32, x: i32, y: i32, z: i32, w: i32);
    fn uniform_4f(&mut self, location: i32, x: f32, y: f32, z: f32, w: f32);
    fn uniform_3fv(&mut self, location: i32, values: &[f32]);
    fn uniform_4fv(&mut self, location: i32, values: &[f32]);

    // Queries.
    fn get_integer(&mut self, pname: u32) -> i32;
    fn get_float(&mut self, pname: u32) -> f32;
    fn get_string(&mut self, name: u32) -> String;
    fn get_string_i(&mut self, name: u32, index: u32) -> String;
    fn get_error(&mut self) -> u32;

    // Sync objects.
    fn fence_sync(&mut self, condition: u32, flags: u32) -> u64;
    fn client_wait_sync(&mut self, sync: u64, flags: u32, timeout_ns: u64) -> u32;
    fn delete_sync(&mut self, sync: u64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_sizes_cover_plain_and_packed_types() {
        assert_eq!(bytes_per_pixel(glow::RGBA, glow::UNSIGNED_BYTE), 4);
        assert_eq!(bytes_per_pixel(glow::RGB, glow::UNSIGNED_SHORT_5_6_5), 2);
        assert_eq!(bytes_per_pixel(glow::RGBA, glow::FLOAT), 16);
        assert_eq!(bytes_per_pixel(glow::DEPTH_COMPONENT, glow::FLOAT), 4);
        assert_eq!(bytes_per_pixel(glow::RED, glow::HALF_FLOAT), 2);
    }

    #[test]
    fn read_rect_size_ignores_negative_extents() {
        let rect = PixelRect {
            x: 0,
            y: 0,
            width: 320,
            height: -1,
            format: glow::RGBA,
            ty: glow::UNSIGNED_BYTE,
        };
        assert_eq!(rect.byte_len(1), 0);
        assert_eq!(PixelRect { height: 240, ..rect }.byte_len(1), 320 * 240 * 4);
    }

    #[test]
    fn read_rect_rows_are_padded_to_pack_alignment() {
        let rect = PixelRect {
            x: 0,
            y: 0,
            width: 3,
            height: 2,
            format: glow::RGB,
            ty: glow::UNSIGNED_BYTE,
        };
        // 9-byte rows padded to 12, last row unpadded.
        assert_eq!(rect.byte_len(4), 12 + 9);
        assert_eq!(rect.byte_len(1), 18);
    }

    #[test]
    fn index_sizes() {
        assert_eq!(index_size(glow::UNSIGNED_BYTE), 1);
        assert_eq!(index_size(glow::UNSIGNED_SHORT), 2);
        assert_eq!(index_size(glow::UNSIGNED_INT), 4);
    }
}
