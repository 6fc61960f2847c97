//! ### English
//! GL entry points of `FunctionWrapper`.
//!
//! One method per native call. Transient slices are copied before submission, so callers may
//! reuse their buffers as soon as a method returns.
//!
//! ### 中文
//! `FunctionWrapper` 的 GL 入口函数。
//!
//! 每个原生调用对应一个方法。临时切片在提交前会被复制，因此方法返回后调用方即可复用自己的缓冲区。
use std::sync::Arc;
use std::sync::atomic::Ordering;

use crate::engine::config::GL_ERROR_CHECKS_COMPILED;
use crate::engine::error::DispatchError;
use crate::engine::gl::{AttribLayout, PixelRect, TexImage2D, TexSubImage2D, index_size};
use crate::engine::runtime::command::GlCommand;
use crate::engine::runtime::gpu_thread::Lane;
use crate::engine::runtime::unbuffered::MAX_ATTRIB_INDEX;

use super::FunctionWrapper;

type Result<T> = std::result::Result<T, DispatchError>;

impl FunctionWrapper {
    #[inline]
    fn post(&self, command: GlCommand) -> Result<()> {
        self.submit(Lane::Ordinary, command)
    }

    /// ### English
    /// Rejects client data shorter than what GL would read from it.
    ///
    /// ### 中文
    /// 拒绝短于 GL 将要读取长度的客户端数据。
    fn require_len(command: &'static str, needed: usize, provided: usize) -> Result<()> {
        if provided < needed {
            tracing::warn!(command, needed, provided, "client data too short; call rejected");
            return Err(DispatchError::Gl {
                command,
                code: glow::INVALID_VALUE,
            });
        }
        Ok(())
    }

    fn unpack_alignment(&self) -> usize {
        self.unpack_alignment.load(Ordering::Acquire)
    }

    pub fn blend_func(&self, sfactor: u32, dfactor: u32) -> Result<()> {
        self.post(GlCommand::BlendFunc { sfactor, dfactor })
    }

    pub fn blend_color(&self, red: f32, green: f32, blue: f32, alpha: f32) -> Result<()> {
        self.post(GlCommand::BlendColor([red, green, blue, alpha]))
    }

    pub fn pixel_store_i(&self, pname: u32, param: i32) -> Result<()> {
        self.post(GlCommand::PixelStorei { pname, param })?;
        if pname == glow::UNPACK_ALIGNMENT && matches!(param, 1 | 2 | 4 | 8) {
            self.unpack_alignment.store(param as usize, Ordering::Release);
        }
        Ok(())
    }

    pub fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) -> Result<()> {
        self.post(GlCommand::ClearColor([red, green, blue, alpha]))
    }

    pub fn clear_depth_f(&self, depth: f32) -> Result<()> {
        self.post(GlCommand::ClearDepthf(depth))
    }

    pub fn clear(&self, mask: u32) -> Result<()> {
        self.post(GlCommand::Clear(mask))
    }

    pub fn cull_face(&self, mode: u32) -> Result<()> {
        self.post(GlCommand::CullFace(mode))
    }

    pub fn depth_func(&self, func: u32) -> Result<()> {
        self.post(GlCommand::DepthFunc(func))
    }

    pub fn depth_mask(&self, flag: bool) -> Result<()> {
        self.post(GlCommand::DepthMask(flag))
    }

    pub fn depth_range_f(&self, near: f32, far: f32) -> Result<()> {
        self.post(GlCommand::DepthRangef { near, far })
    }

    pub fn enable(&self, cap: u32) -> Result<()> {
        self.post(GlCommand::Enable(cap))
    }

    pub fn disable(&self, cap: u32) -> Result<()> {
        self.post(GlCommand::Disable(cap))
    }

    pub fn polygon_offset(&self, factor: f32, units: f32) -> Result<()> {
        self.post(GlCommand::PolygonOffset { factor, units })
    }

    pub fn scissor(&self, x: i32, y: i32, width: i32, height: i32) -> Result<()> {
        self.post(GlCommand::Scissor([x, y, width, height]))
    }

    pub fn viewport(&self, x: i32, y: i32, width: i32, height: i32) -> Result<()> {
        self.post(GlCommand::Viewport([x, y, width, height]))
    }

    pub fn line_width(&self, width: f32) -> Result<()> {
        self.post(GlCommand::LineWidth(width))
    }

    /// ### English
    /// Generates `n` texture names (priority lane).
    ///
    /// ### 中文
    /// 生成 `n` 个纹理名（优先通道）。
    pub fn gen_textures(&self, n: usize) -> Result<Vec<u32>> {
        self.call(Lane::Priority, |reply| GlCommand::GenTextures { n, reply })
    }

    pub fn delete_textures(&self, textures: &[u32]) -> Result<()> {
        self.post(GlCommand::DeleteTextures(textures.to_vec()))
    }

    pub fn active_texture(&self, texture: u32) -> Result<()> {
        self.post(GlCommand::ActiveTexture(texture))
    }

    pub fn bind_texture(&self, target: u32, texture: u32) -> Result<()> {
        self.post(GlCommand::BindTexture { target, texture })
    }

    pub fn tex_parameter_i(&self, target: u32, pname: u32, param: i32) -> Result<()> {
        self.post(GlCommand::TexParameteri { target, pname, param })
    }

    pub fn tex_parameter_f(&self, target: u32, pname: u32, param: f32) -> Result<()> {
        self.post(GlCommand::TexParameterf { target, pname, param })
    }

    pub fn tex_storage_2d(
        &self,
        target: u32,
        levels: i32,
        internal_format: u32,
        width: i32,
        height: i32,
    ) -> Result<()> {
        self.post(GlCommand::TexStorage2D {
            target,
            levels,
            internal_format,
            width,
            height,
        })
    }

    /// ### English
    /// `glTexImage2D`; `None` allocates storage without uploading.
    ///
    /// ### 中文
    /// `glTexImage2D`；`None` 表示只分配存储、不上传数据。
    /// ### English
    /// `glTexImage2D`. `pixels` must cover the image at the current unpack alignment; `None`
    /// only allocates storage.
    ///
    /// ### 中文
    /// `glTexImage2D`。`pixels` 必须按当前 unpack 对齐覆盖整幅图像；`None` 只分配存储。
    pub fn tex_image_2d(&self, params: TexImage2D, pixels: Option<&[u8]>) -> Result<()> {
        if let Some(pixels) = pixels {
            Self::require_len("glTexImage2D", params.byte_len(self.unpack_alignment()), pixels.len())?;
        }
        self.post(GlCommand::TexImage2D {
            params,
            pixels: pixels.map(<[u8]>::to_vec),
        })
    }

    pub fn tex_sub_image_2d(&self, params: TexSubImage2D, pixels: &[u8]) -> Result<()> {
        Self::require_len("glTexSubImage2D", params.byte_len(self.unpack_alignment()), pixels.len())?;
        self.post(GlCommand::TexSubImage2D {
            params,
            pixels: pixels.to_vec(),
        })
    }

    pub fn gen_framebuffers(&self, n: usize) -> Result<Vec<u32>> {
        self.call(Lane::Priority, |reply| GlCommand::GenFramebuffers { n, reply })
    }

    pub fn delete_framebuffers(&self, framebuffers: &[u32]) -> Result<()> {
        self.post(GlCommand::DeleteFramebuffers(framebuffers.to_vec()))
    }

    pub fn bind_framebuffer(&self, target: u32, framebuffer: u32) -> Result<()> {
        self.post(GlCommand::BindFramebuffer { target, framebuffer })
    }

    pub fn framebuffer_texture_2d(
        &self,
        target: u32,
        attachment: u32,
        tex_target: u32,
        texture: u32,
        level: i32,
    ) -> Result<()> {
        self.post(GlCommand::FramebufferTexture2D {
            target,
            attachment,
            tex_target,
            texture,
            level,
        })
    }

    pub fn gen_renderbuffers(&self, n: usize) -> Result<Vec<u32>> {
        self.call(Lane::Priority, |reply| GlCommand::GenRenderbuffers { n, reply })
    }

    pub fn delete_renderbuffers(&self, renderbuffers: &[u32]) -> Result<()> {
        self.post(GlCommand::DeleteRenderbuffers(renderbuffers.to_vec()))
    }

    pub fn bind_renderbuffer(&self, target: u32, renderbuffer: u32) -> Result<()> {
        self.post(GlCommand::BindRenderbuffer { target, renderbuffer })
    }

    pub fn renderbuffer_storage(&self, target: u32, internal_format: u32, width: i32, height: i32) -> Result<()> {
        self.post(GlCommand::RenderbufferStorage {
            target,
            internal_format,
            width,
            height,
        })
    }

    pub fn framebuffer_renderbuffer(
        &self,
        target: u32,
        attachment: u32,
        rb_target: u32,
        renderbuffer: u32,
    ) -> Result<()> {
        self.post(GlCommand::FramebufferRenderbuffer {
            target,
            attachment,
            rb_target,
            renderbuffer,
        })
    }

    /// ### English
    /// `glCheckFramebufferStatus`. Without compiled-in GL checks this answers
    /// `FRAMEBUFFER_COMPLETE` and never reaches the GPU.
    ///
    /// ### 中文
    /// `glCheckFramebufferStatus`。未编译启用 GL 检查时直接返回 `FRAMEBUFFER_COMPLETE`，不会触达 GPU。
    pub fn check_framebuffer_status(&self, target: u32) -> Result<u32> {
        if !GL_ERROR_CHECKS_COMPILED {
            return Ok(glow::FRAMEBUFFER_COMPLETE);
        }
        self.call(Lane::Ordinary, |reply| GlCommand::CheckFramebufferStatus { target, reply })
    }

    /// ### English
    /// `src`/`dst` are `[x0, y0, x1, y1]`.
    ///
    /// ### 中文
    /// `src`/`dst` 为 `[x0, y0, x1, y1]`。
    pub fn blit_framebuffer(&self, src: [i32; 4], dst: [i32; 4], mask: u32, filter: u32) -> Result<()> {
        self.post(GlCommand::BlitFramebuffer { src, dst, mask, filter })
    }

    pub fn read_buffer(&self, mode: u32) -> Result<()> {
        self.post(GlCommand::ReadBuffer(mode))
    }

    pub fn draw_buffers(&self, buffers: &[u32]) -> Result<()> {
        self.post(GlCommand::DrawBuffers(buffers.to_vec()))
    }

    /// ### English
    /// Reads `rect` back from the bound read framebuffer (synced).
    ///
    /// ### 中文
    /// 从当前绑定的读 framebuffer 回读 `rect`（同步）。
    pub fn read_pixels(&self, rect: PixelRect) -> Result<Vec<u8>> {
        self.call(Lane::Ordinary, |reply| GlCommand::ReadPixels { rect, reply })
    }

    pub fn gen_buffers(&self, n: usize) -> Result<Vec<u32>> {
        self.call(Lane::Priority, |reply| GlCommand::GenBuffers { n, reply })
    }

    pub fn delete_buffers(&self, buffers: &[u32]) -> Result<()> {
        self.post(GlCommand::DeleteBuffers(buffers.to_vec()))
    }

    pub fn bind_buffer(&self, target: u32, buffer: u32) -> Result<()> {
        self.post(GlCommand::BindBuffer { target, buffer })
    }

    pub fn buffer_data(&self, target: u32, data: &[u8], usage: u32) -> Result<()> {
        self.post(GlCommand::BufferData {
            target,
            data: data.to_vec(),
            usage,
        })
    }

    /// ### English
    /// Writes `data` at `offset` into the buffer bound to `target`, without waiting.
    ///
    /// ### 中文
    /// 将 `data` 写入 `target` 上绑定缓冲区的 `offset` 处，不等待完成。
    pub fn buffer_sub_data_async(&self, target: u32, offset: i32, data: &[u8]) -> Result<()> {
        self.post(GlCommand::BufferSubData {
            target,
            offset,
            data: data.to_vec(),
        })
    }

    pub fn gen_vertex_arrays(&self, n: usize) -> Result<Vec<u32>> {
        self.call(Lane::Priority, |reply| GlCommand::GenVertexArrays { n, reply })
    }

    pub fn delete_vertex_arrays(&self, arrays: &[u32]) -> Result<()> {
        self.post(GlCommand::DeleteVertexArrays(arrays.to_vec()))
    }

    pub fn bind_vertex_array(&self, array: u32) -> Result<()> {
        self.post(GlCommand::BindVertexArray(array))
    }

    pub fn enable_vertex_attrib_array(&self, index: u32) -> Result<()> {
        self.post(GlCommand::EnableVertexAttribArray(index))
    }

    pub fn disable_vertex_attrib_array(&self, index: u32) -> Result<()> {
        self.post(GlCommand::DisableVertexAttribArray(index))
    }

    /// ### English
    /// Attribute pointer into the bound `ARRAY_BUFFER` at byte `offset`.
    ///
    /// ### 中文
    /// 指向已绑定 `ARRAY_BUFFER` 中字节偏移 `offset` 处的属性指针。
    pub fn vertex_attrib_pointer(&self, layout: AttribLayout, offset: i32) -> Result<()> {
        self.post(GlCommand::VertexAttribPointer { layout, offset })
    }

    /// ### English
    /// Attribute pointer into client memory without a bound `ARRAY_BUFFER`.
    ///
    /// `data` is shared, not copied, at submission; the executor copies it into the persistent
    /// slot of `layout.index` and points GL at `slot + offset`. Indices `>= 8` are rejected with
    /// `GL_INVALID_VALUE` before submission.
    ///
    /// #### Parameters
    /// - `layout`: Attribute layout.
    /// - `offset`: Byte offset of the first element inside `data`.
    /// - `data`: Vertex bytes, usually shared by all attributes of one draw.
    ///
    /// ### 中文
    /// 指向客户端内存的属性指针（未绑定 `ARRAY_BUFFER`）。
    ///
    /// 提交时 `data` 只是共享而不复制；执行器会把它复制到 `layout.index` 的持久槽位，
    /// 并让 GL 指向 `槽位 + offset`。索引 `>= 8` 会在提交前以 `GL_INVALID_VALUE` 拒绝。
    ///
    /// #### 参数
    /// - `layout`：属性布局。
    /// - `offset`：首个元素在 `data` 中的字节偏移。
    /// - `data`：顶点字节，通常由同一次 draw 的所有属性共享。
    pub fn vertex_attrib_pointer_unbuffered(
        &self,
        layout: AttribLayout,
        offset: usize,
        data: Arc<[u8]>,
    ) -> Result<()> {
        if layout.index as usize >= MAX_ATTRIB_INDEX {
            return Err(DispatchError::Gl {
                command: "glVertexAttribPointer",
                code: glow::INVALID_VALUE,
            });
        }
        self.post(GlCommand::VertexAttribPointerUnbuffered { layout, offset, data })
    }

    pub fn vertex_attrib_1f(&self, index: u32, x: f32) -> Result<()> {
        self.post(GlCommand::VertexAttrib1f { index, x })
    }

    pub fn vertex_attrib_4f(&self, index: u32, x: f32, y: f32, z: f32, w: f32) -> Result<()> {
        self.post(GlCommand::VertexAttrib4f {
            index,
            values: [x, y, z, w],
        })
    }

    pub fn draw_arrays(&self, mode: u32, first: i32, count: i32) -> Result<()> {
        self.post(GlCommand::DrawArrays { mode, first, count })
    }

    /// ### English
    /// `glDrawElements` with client-side indices; the `count` indices of type `ty` are copied.
    ///
    /// ### 中文
    /// 使用客户端索引的 `glDrawElements`；会复制 `count` 个 `ty` 类型的索引。
    /// ### English
    /// `glDrawElements` with client-side indices; only the `count` indices GL reads are copied.
    ///
    /// ### 中文
    /// 使用客户端索引的 `glDrawElements`；只复制 GL 会读取的 `count` 个索引。
    pub fn draw_elements(&self, mode: u32, count: i32, ty: u32, indices: &[u8]) -> Result<()> {
        let Ok(count_usize) = usize::try_from(count) else {
            return Err(DispatchError::Gl {
                command: "glDrawElements",
                code: glow::INVALID_VALUE,
            });
        };
        let len = count_usize.saturating_mul(index_size(ty));
        Self::require_len("glDrawElements", len, indices.len())?;
        self.post(GlCommand::DrawElements {
            mode,
            count,
            ty,
            indices: indices[..len].to_vec(),
        })
    }

    pub fn memory_barrier(&self, barriers: u32) -> Result<()> {
        self.post(GlCommand::MemoryBarrier(barriers))
    }

    /// ### English
    /// `glFinish`; returns once the GPU thread executed it.
    ///
    /// ### 中文
    /// `glFinish`；GPU 线程执行完毕后才返回。
    pub fn finish(&self) -> Result<()> {
        self.call(Lane::Ordinary, GlCommand::Finish)
    }

    pub fn create_shader(&self, shader_type: u32) -> Result<u32> {
        self.call(Lane::Ordinary, |reply| GlCommand::CreateShader { shader_type, reply })
    }

    pub fn shader_source(&self, shader: u32, source: &str) -> Result<()> {
        self.post(GlCommand::ShaderSource {
            shader,
            source: source.to_string(),
        })
    }

    pub fn compile_shader(&self, shader: u32) -> Result<()> {
        self.post(GlCommand::CompileShader(shader))
    }

    pub fn get_shader_compile_status(&self, shader: u32) -> Result<bool> {
        self.call(Lane::Ordinary, |reply| GlCommand::GetShaderCompileStatus { shader, reply })
    }

    pub fn get_shader_info_log(&self, shader: u32) -> Result<String> {
        self.call(Lane::Ordinary, |reply| GlCommand::GetShaderInfoLog { shader, reply })
    }

    pub fn delete_shader(&self, shader: u32) -> Result<()> {
        self.post(GlCommand::DeleteShader(shader))
    }

    pub fn create_program(&self) -> Result<u32> {
        self.call(Lane::Ordinary, GlCommand::CreateProgram)
    }

    pub fn attach_shader(&self, program: u32, shader: u32) -> Result<()> {
        self.post(GlCommand::AttachShader { program, shader })
    }

    pub fn detach_shader(&self, program: u32, shader: u32) -> Result<()> {
        self.post(GlCommand::DetachShader { program, shader })
    }

    pub fn bind_attrib_location(&self, program: u32, index: u32, name: &str) -> Result<()> {
        self.post(GlCommand::BindAttribLocation {
            program,
            index,
            name: name.to_string(),
        })
    }

    pub fn link_program(&self, program: u32) -> Result<()> {
        self.post(GlCommand::LinkProgram(program))
    }

    pub fn get_program_link_status(&self, program: u32) -> Result<bool> {
        self.call(Lane::Ordinary, |reply| GlCommand::GetProgramLinkStatus { program, reply })
    }

    pub fn get_program_info_log(&self, program: u32) -> Result<String> {
        self.call(Lane::Ordinary, |reply| GlCommand::GetProgramInfoLog { program, reply })
    }

    pub fn use_program(&self, program: u32) -> Result<()> {
        self.post(GlCommand::UseProgram(program))
    }

    pub fn delete_program(&self, program: u32) -> Result<()> {
        self.post(GlCommand::DeleteProgram(program))
    }

    pub fn get_uniform_location(&self, program: u32, name: &str) -> Result<i32> {
        let name = name.to_string();
        self.call(Lane::Ordinary, |reply| GlCommand::GetUniformLocation { program, name, reply })
    }

    pub fn uniform_1i(&self, location: i32, x: i32) -> Result<()> {
        self.post(GlCommand::Uniform1i { location, x })
    }

    pub fn uniform_1f(&self, location: i32, x: f32) -> Result<()> {
        self.post(GlCommand::Uniform1f { location, x })
    }

    pub fn uniform_2f(&self, location: i32, x: f32, y: f32) -> Result<()> {
        self.post(GlCommand::Uniform2f {
            location,
            values: [x, y],
        })
    }

    pub fn uniform_2i(&self, location: i32, x: i32, y: i32) -> Result<()> {
        self.post(GlCommand::Uniform2i {
            location,
            values: [x, y],
        })
    }

    pub fn uniform_4i(&self, location: i32, x: i32, y: i32, z: i32, w: i32) -> Result<()> {
        self.post(GlCommand::Uniform4i {
            location,
            values: [x, y, z, w],
        })
    }

    pub fn uniform_4f(&self, location: i32, x: f32, y: f32, z: f32, w: f32) -> Result<()> {
        self.post(GlCommand::Uniform4f {
            location,
            values: [x, y, z, w],
        })
    }

    pub fn uniform_3fv(&self, location: i32, values: &[f32]) -> Result<()> {
        self.post(GlCommand::Uniform3fv {
            location,
            values: values.to_vec(),
        })
    }

    pub fn uniform_4fv(&self, location: i32, values: &[f32]) -> Result<()> {
        self.post(GlCommand::Uniform4fv {
            location,
            values: values.to_vec(),
        })
    }

    pub fn get_integer(&self, pname: u32) -> Result<i32> {
        self.call(Lane::Ordinary, |reply| GlCommand::GetIntegerv { pname, reply })
    }

    pub fn get_float(&self, pname: u32) -> Result<f32> {
        self.call(Lane::Priority, |reply| GlCommand::GetFloatv { pname, reply })
    }

    pub fn get_string(&self, name: u32) -> Result<String> {
        self.call(Lane::Ordinary, |reply| GlCommand::GetString { name, reply })
    }

    pub fn get_string_i(&self, name: u32, index: u32) -> Result<String> {
        self.call(Lane::Priority, |reply| GlCommand::GetStringi { name, index, reply })
    }

    /// ### English
    /// `glGetError`. Without compiled-in GL checks this answers `NO_ERROR` and never reaches the
    /// GPU.
    ///
    /// ### 中文
    /// `glGetError`。未编译启用 GL 检查时直接返回 `NO_ERROR`，不会触达 GPU。
    pub fn get_error(&self) -> Result<u32> {
        if !GL_ERROR_CHECKS_COMPILED {
            return Ok(glow::NO_ERROR);
        }
        self.call(Lane::Ordinary, GlCommand::GetError)
    }

    /// ### English
    /// Inserts a fence and returns its handle (priority lane).
    ///
    /// ### 中文
    /// 插入一个 fence 并返回其句柄（优先通道）。
    pub fn fence_sync(&self, condition: u32, flags: u32) -> Result<u64> {
        self.call(Lane::Priority, |reply| GlCommand::FenceSync {
            condition,
            flags,
            reply,
        })
    }

    pub fn client_wait_sync(&self, sync: u64, flags: u32, timeout_ns: u64) -> Result<u32> {
        self.call(Lane::Priority, |reply| GlCommand::ClientWaitSync {
            sync,
            flags,
            timeout_ns,
            reply,
        })
    }

    pub fn delete_sync(&self, sync: u64) -> Result<()> {
        self.post(GlCommand::DeleteSync(sync))
    }
}
