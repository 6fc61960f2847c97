//! ### English
//! Deferred GL/host invocations and their executor.
//!
//! Every variant owns its arguments; synced variants carry the reply channel the executor writes
//! into. A command is consumed by [`GlCommand::execute`], so it runs exactly once.
//!
//! ### 中文
//! 延迟执行的 GL/宿主调用及其执行器。
//!
//! 每个变体都持有自己的参数；同步变体携带执行器写入结果的回复通道。
//! 命令会被 [`GlCommand::execute`] 消耗，因此恰好执行一次。
use std::sync::Arc;

use crate::engine::error::{DispatchError, HostApiError};
use crate::engine::gl::{AttribLayout, GlApi, PixelRect, TexImage2D, TexSubImage2D};
use crate::engine::host::{HOST_SUCCESS, HostVideo};

use super::context::{GpuContext, Reply};

/// ### English
/// Produces the GL entry points once the host created a context. Runs on the executing thread.
///
/// ### 中文
/// 在宿主创建上下文之后生成 GL 入口函数；在执行线程上运行。
pub type GlLoader =
    Box<dyn FnOnce(&dyn HostVideo) -> Result<Box<dyn GlApi>, HostApiError> + Send + 'static>;

pub(crate) enum GlCommand {
    // Fixed-function state.
    BlendFunc { sfactor: u32, dfactor: u32 },
    BlendColor([f32; 4]),
    PixelStorei { pname: u32, param: i32 },
    ClearColor([f32; 4]),
    ClearDepthf(f32),
    Clear(u32),
    CullFace(u32),
    DepthFunc(u32),
    DepthMask(bool),
    DepthRangef { near: f32, far: f32 },
    Enable(u32),
    Disable(u32),
    PolygonOffset { factor: f32, units: f32 },
    Scissor([i32; 4]),
    Viewport([i32; 4]),
    LineWidth(f32),

    // Textures.
    GenTextures { n: usize, reply: Reply<Vec<u32>> },
    DeleteTextures(Vec<u32>),
    ActiveTexture(u32),
    BindTexture { target: u32, texture: u32 },
    TexParameteri { target: u32, pname: u32, param: i32 },
    TexParameterf { target: u32, pname: u32, param: f32 },
    TexStorage2D {
        target: u32,
        levels: i32,
        internal_format: u32,
        width: i32,
        height: i32,
    },
    TexImage2D {
        params: TexImage2D,
        pixels: Option<Vec<u8>>,
    },
    TexSubImage2D {
        params: TexSubImage2D,
        pixels: Vec<u8>,
    },

    // Framebuffers and renderbuffers.
    GenFramebuffers { n: usize, reply: Reply<Vec<u32>> },
    DeleteFramebuffers(Vec<u32>),
    BindFramebuffer { target: u32, framebuffer: u32 },
    FramebufferTexture2D {
        target: u32,
        attachment: u32,
        tex_target: u32,
        texture: u32,
        level: i32,
    },
    GenRenderbuffers { n: usize, reply: Reply<Vec<u32>> },
    DeleteRenderbuffers(Vec<u32>),
    BindRenderbuffer { target: u32, renderbuffer: u32 },
    RenderbufferStorage {
        target: u32,
        internal_format: u32,
        width: i32,
        height: i32,
    },
    FramebufferRenderbuffer {
        target: u32,
        attachment: u32,
        rb_target: u32,
        renderbuffer: u32,
    },
    CheckFramebufferStatus { target: u32, reply: Reply<u32> },
    BlitFramebuffer {
        src: [i32; 4],
        dst: [i32; 4],
        mask: u32,
        filter: u32,
    },
    ReadBuffer(u32),
    DrawBuffers(Vec<u32>),
    ReadPixels { rect: PixelRect, reply: Reply<Vec<u8>> },

    // Buffers and vertex arrays.
    GenBuffers { n: usize, reply: Reply<Vec<u32>> },
    DeleteBuffers(Vec<u32>),
    BindBuffer { target: u32, buffer: u32 },
    BufferData { target: u32, data: Vec<u8>, usage: u32 },
    BufferSubData { target: u32, offset: i32, data: Vec<u8> },
    GenVertexArrays { n: usize, reply: Reply<Vec<u32>> },
    DeleteVertexArrays(Vec<u32>),
    BindVertexArray(u32),
    EnableVertexAttribArray(u32),
    DisableVertexAttribArray(u32),
    VertexAttribPointer { layout: AttribLayout, offset: i32 },
    /// ### English
    /// Client-array attribute pointer. `data` is copied into the persistent slot of
    /// `layout.index`; GL reads from that slot at `offset`.
    ///
    /// ### 中文
    /// 客户端数组属性指针。`data` 会被复制到 `layout.index` 的持久槽位；GL 从该槽位的 `offset` 处读取。
    VertexAttribPointerUnbuffered {
        layout: AttribLayout,
        offset: usize,
        data: Arc<[u8]>,
    },
    VertexAttrib1f { index: u32, x: f32 },
    VertexAttrib4f { index: u32, values: [f32; 4] },

    // Drawing.
    DrawArrays { mode: u32, first: i32, count: i32 },
    DrawElements {
        mode: u32,
        count: i32,
        ty: u32,
        indices: Vec<u8>,
    },
    MemoryBarrier(u32),
    Finish(Reply<()>),

    // Shaders and programs.
    CreateShader { shader_type: u32, reply: Reply<u32> },
    ShaderSource { shader: u32, source: String },
    CompileShader(u32),
    GetShaderCompileStatus { shader: u32, reply: Reply<bool> },
    GetShaderInfoLog { shader: u32, reply: Reply<String> },
    DeleteShader(u32),
    CreateProgram(Reply<u32>),
    AttachShader { program: u32, shader: u32 },
    DetachShader { program: u32, shader: u32 },
    BindAttribLocation { program: u32, index: u32, name: String },
    LinkProgram(u32),
    GetProgramLinkStatus { program: u32, reply: Reply<bool> },
    GetProgramInfoLog { program: u32, reply: Reply<String> },
    UseProgram(u32),
    DeleteProgram(u32),
    GetUniformLocation {
        program: u32,
        name: String,
        reply: Reply<i32>,
    },
    Uniform1i { location: i32, x: i32 },
    Uniform1f { location: i32, x: f32 },
    Uniform2f { location: i32, values: [f32; 2] },
    Uniform2i { location: i32, values: [i32; 2] },
    Uniform4i { location: i32, values: [i32; 4] },
    Uniform4f { location: i32, values: [f32; 4] },
    Uniform3fv { location: i32, values: Vec<f32> },
    Uniform4fv { location: i32, values: Vec<f32> },

    // Queries.
    GetIntegerv { pname: u32, reply: Reply<i32> },
    GetFloatv { pname: u32, reply: Reply<f32> },
    GetString { name: u32, reply: Reply<String> },
    GetStringi { name: u32, index: u32, reply: Reply<String> },
    GetError(Reply<u32>),

    // Sync objects.
    FenceSync { condition: u32, flags: u32, reply: Reply<u64> },
    ClientWaitSync {
        sync: u64,
        flags: u32,
        timeout_ns: u64,
        reply: Reply<u32>,
    },
    DeleteSync(u64),

    // Host video extension.
    LoadGl { loader: GlLoader, reply: Reply<()> },
    VideoInit(Reply<()>),
    VideoQuit,
    SetVideoMode {
        width: i32,
        height: i32,
        bits_per_pixel: i32,
        mode: i32,
        flags: i32,
        reply: Reply<i32>,
    },
    GlSetAttribute { attribute: i32, value: i32 },
    GlGetAttribute { attribute: i32, reply: Reply<i32> },
    /// ### English
    /// Presents the frame and releases one slot of the swap throttle.
    ///
    /// ### 中文
    /// 呈现当前帧并释放 swap 节流器的一个计数。
    SwapBuffers,
}

/// ### English
/// Runs a value-returning GL call and delivers its outcome to `reply`.
///
/// ### 中文
/// 执行一个有返回值的 GL 调用，并把结果投递到 `reply`。
fn answer<T>(
    ctx: &mut GpuContext,
    command: &'static str,
    reply: Reply<T>,
    call: impl FnOnce(&mut dyn GlApi) -> T,
) -> Result<(), DispatchError> {
    let outcome = ctx.run(command, call);
    ctx.reply_with(reply, outcome)
}

impl GlCommand {
    /// ### English
    /// Executes the command against `ctx`.
    ///
    /// Returns `Err` only for fatal failures (GL error state, GL not loaded); the executor stops
    /// on them. Non-fatal failures of synced commands travel back through their reply channel.
    ///
    /// ### 中文
    /// 在 `ctx` 上执行该命令。
    ///
    /// 仅在致命失败（GL 错误状态、GL 未加载）时返回 `Err`，执行器遇到后会停止。
    /// 同步命令的非致命失败通过其回复通道返回。
    pub(crate) fn execute(self, ctx: &mut GpuContext) -> Result<(), DispatchError> {
        match self {
            Self::BlendFunc { sfactor, dfactor } => {
                ctx.run("glBlendFunc", |gl| gl.blend_func(sfactor, dfactor))
            }
            Self::BlendColor([r, g, b, a]) => ctx.run("glBlendColor", |gl| gl.blend_color(r, g, b, a)),
            Self::PixelStorei { pname, param } => {
                ctx.run("glPixelStorei", |gl| gl.pixel_store_i(pname, param))
            }
            Self::ClearColor([r, g, b, a]) => ctx.run("glClearColor", |gl| gl.clear_color(r, g, b, a)),
            Self::ClearDepthf(depth) => ctx.run("glClearDepthf", |gl| gl.clear_depth_f(depth)),
            Self::Clear(mask) => ctx.run("glClear", |gl| gl.clear(mask)),
            Self::CullFace(mode) => ctx.run("glCullFace", |gl| gl.cull_face(mode)),
            Self::DepthFunc(func) => ctx.run("glDepthFunc", |gl| gl.depth_func(func)),
            Self::DepthMask(flag) => ctx.run("glDepthMask", |gl| gl.depth_mask(flag)),
            Self::DepthRangef { near, far } => ctx.run("glDepthRangef", |gl| gl.depth_range_f(near, far)),
            Self::Enable(cap) => ctx.run("glEnable", |gl| gl.enable(cap)),
            Self::Disable(cap) => ctx.run("glDisable", |gl| gl.disable(cap)),
            Self::PolygonOffset { factor, units } => {
                ctx.run("glPolygonOffset", |gl| gl.polygon_offset(factor, units))
            }
            Self::Scissor([x, y, w, h]) => ctx.run("glScissor", |gl| gl.scissor(x, y, w, h)),
            Self::Viewport([x, y, w, h]) => ctx.run("glViewport", |gl| gl.viewport(x, y, w, h)),
            Self::LineWidth(width) => ctx.run("glLineWidth", |gl| gl.line_width(width)),

            Self::GenTextures { n, reply } => answer(ctx, "glGenTextures", reply, |gl| gl.gen_textures(n)),
            Self::DeleteTextures(names) => ctx.run("glDeleteTextures", |gl| gl.delete_textures(&names)),
            Self::ActiveTexture(texture) => ctx.run("glActiveTexture", |gl| gl.active_texture(texture)),
            Self::BindTexture { target, texture } => {
                ctx.run("glBindTexture", |gl| gl.bind_texture(target, texture))
            }
            Self::TexParameteri { target, pname, param } => {
                ctx.run("glTexParameteri", |gl| gl.tex_parameter_i(target, pname, param))
            }
            Self::TexParameterf { target, pname, param } => {
                ctx.run("glTexParameterf", |gl| gl.tex_parameter_f(target, pname, param))
            }
            Self::TexStorage2D {
                target,
                levels,
                internal_format,
                width,
                height,
            } => ctx.run("glTexStorage2D", |gl| {
                gl.tex_storage_2d(target, levels, internal_format, width, height)
            }),
            Self::TexImage2D { params, pixels } => {
                ctx.run("glTexImage2D", |gl| gl.tex_image_2d(params, pixels.as_deref()))
            }
            Self::TexSubImage2D { params, pixels } => {
                ctx.run("glTexSubImage2D", |gl| gl.tex_sub_image_2d(params, &pixels))
            }

            Self::GenFramebuffers { n, reply } => {
                answer(ctx, "glGenFramebuffers", reply, |gl| gl.gen_framebuffers(n))
            }
            Self::DeleteFramebuffers(names) => {
                ctx.run("glDeleteFramebuffers", |gl| gl.delete_framebuffers(&names))
            }
            Self::BindFramebuffer { target, framebuffer } => {
                ctx.run("glBindFramebuffer", |gl| gl.bind_framebuffer(target, framebuffer))
            }
            Self::FramebufferTexture2D {
                target,
                attachment,
                tex_target,
                texture,
                level,
            } => ctx.run("glFramebufferTexture2D", |gl| {
                gl.framebuffer_texture_2d(target, attachment, tex_target, texture, level)
            }),
            Self::GenRenderbuffers { n, reply } => {
                answer(ctx, "glGenRenderbuffers", reply, |gl| gl.gen_renderbuffers(n))
            }
            Self::DeleteRenderbuffers(names) => {
                ctx.run("glDeleteRenderbuffers", |gl| gl.delete_renderbuffers(&names))
            }
            Self::BindRenderbuffer { target, renderbuffer } => {
                ctx.run("glBindRenderbuffer", |gl| gl.bind_renderbuffer(target, renderbuffer))
            }
            Self::RenderbufferStorage {
                target,
                internal_format,
                width,
                height,
            } => ctx.run("glRenderbufferStorage", |gl| {
                gl.renderbuffer_storage(target, internal_format, width, height)
            }),
            Self::FramebufferRenderbuffer {
                target,
                attachment,
                rb_target,
                renderbuffer,
            } => ctx.run("glFramebufferRenderbuffer", |gl| {
                gl.framebuffer_renderbuffer(target, attachment, rb_target, renderbuffer)
            }),
            Self::CheckFramebufferStatus { target, reply } => answer(
                ctx,
                "glCheckFramebufferStatus",
                reply,
                |gl| gl.check_framebuffer_status(target),
            ),
            Self::BlitFramebuffer {
                src,
                dst,
                mask,
                filter,
            } => ctx.run("glBlitFramebuffer", |gl| gl.blit_framebuffer(src, dst, mask, filter)),
            Self::ReadBuffer(mode) => ctx.run("glReadBuffer", |gl| gl.read_buffer(mode)),
            Self::DrawBuffers(buffers) => ctx.run("glDrawBuffers", |gl| gl.draw_buffers(&buffers)),
            Self::ReadPixels { rect, reply } => answer(ctx, "glReadPixels", reply, |gl| gl.read_pixels(rect)),

            Self::GenBuffers { n, reply } => answer(ctx, "glGenBuffers", reply, |gl| gl.gen_buffers(n)),
            Self::DeleteBuffers(names) => ctx.run("glDeleteBuffers", |gl| gl.delete_buffers(&names)),
            Self::BindBuffer { target, buffer } => ctx.run("glBindBuffer", |gl| gl.bind_buffer(target, buffer)),
            Self::BufferData { target, data, usage } => {
                ctx.run("glBufferData", |gl| gl.buffer_data(target, &data, usage))
            }
            Self::BufferSubData { target, offset, data } => {
                ctx.run("glBufferSubData", |gl| gl.buffer_sub_data(target, offset, &data))
            }
            Self::GenVertexArrays { n, reply } => {
                answer(ctx, "glGenVertexArrays", reply, |gl| gl.gen_vertex_arrays(n))
            }
            Self::DeleteVertexArrays(names) => {
                ctx.run("glDeleteVertexArrays", |gl| gl.delete_vertex_arrays(&names))
            }
            Self::BindVertexArray(array) => ctx.run("glBindVertexArray", |gl| gl.bind_vertex_array(array)),
            Self::EnableVertexAttribArray(index) => {
                ctx.run("glEnableVertexAttribArray", |gl| gl.enable_vertex_attrib_array(index))
            }
            Self::DisableVertexAttribArray(index) => {
                ctx.run("glDisableVertexAttribArray", |gl| gl.disable_vertex_attrib_array(index))
            }
            Self::VertexAttribPointer { layout, offset } => {
                ctx.run("glVertexAttribPointer", |gl| gl.vertex_attrib_pointer(layout, offset))
            }
            Self::VertexAttribPointerUnbuffered { layout, offset, data } => {
                ctx.attrib_pointer_unbuffered(layout, offset, &data)
            }
            Self::VertexAttrib1f { index, x } => ctx.run("glVertexAttrib1f", |gl| gl.vertex_attrib_1f(index, x)),
            Self::VertexAttrib4f {
                index,
                values: [x, y, z, w],
            } => ctx.run("glVertexAttrib4f", |gl| gl.vertex_attrib_4f(index, x, y, z, w)),

            Self::DrawArrays { mode, first, count } => {
                ctx.run("glDrawArrays", |gl| gl.draw_arrays(mode, first, count))
            }
            Self::DrawElements {
                mode,
                count,
                ty,
                indices,
            } => ctx.run("glDrawElements", |gl| gl.draw_elements(mode, count, ty, &indices)),
            Self::MemoryBarrier(barriers) => ctx.run("glMemoryBarrier", |gl| gl.memory_barrier(barriers)),
            Self::Finish(reply) => answer(ctx, "glFinish", reply, |gl| gl.finish()),

            Self::CreateShader { shader_type, reply } => {
                answer(ctx, "glCreateShader", reply, |gl| gl.create_shader(shader_type))
            }
            Self::ShaderSource { shader, source } => {
                ctx.run("glShaderSource", |gl| gl.shader_source(shader, &source))
            }
            Self::CompileShader(shader) => ctx.run("glCompileShader", |gl| gl.compile_shader(shader)),
            Self::GetShaderCompileStatus { shader, reply } => {
                answer(ctx, "glGetShaderiv", reply, |gl| gl.get_shader_compile_status(shader))
            }
            Self::GetShaderInfoLog { shader, reply } => {
                answer(ctx, "glGetShaderInfoLog", reply, |gl| gl.get_shader_info_log(shader))
            }
            Self::DeleteShader(shader) => ctx.run("glDeleteShader", |gl| gl.delete_shader(shader)),
            Self::CreateProgram(reply) => answer(ctx, "glCreateProgram", reply, |gl| gl.create_program()),
            Self::AttachShader { program, shader } => {
                ctx.run("glAttachShader", |gl| gl.attach_shader(program, shader))
            }
            Self::DetachShader { program, shader } => {
                ctx.run("glDetachShader", |gl| gl.detach_shader(program, shader))
            }
            Self::BindAttribLocation { program, index, name } => {
                ctx.run("glBindAttribLocation", |gl| gl.bind_attrib_location(program, index, &name))
            }
            Self::LinkProgram(program) => ctx.run("glLinkProgram", |gl| gl.link_program(program)),
            Self::GetProgramLinkStatus { program, reply } => {
                answer(ctx, "glGetProgramiv", reply, |gl| gl.get_program_link_status(program))
            }
            Self::GetProgramInfoLog { program, reply } => {
                answer(ctx, "glGetProgramInfoLog", reply, |gl| gl.get_program_info_log(program))
            }
            Self::UseProgram(program) => ctx.run("glUseProgram", |gl| gl.use_program(program)),
            Self::DeleteProgram(program) => ctx.run("glDeleteProgram", |gl| gl.delete_program(program)),
            Self::GetUniformLocation { program, name, reply } => answer(
                ctx,
                "glGetUniformLocation",
                reply,
                |gl| gl.get_uniform_location(program, &name),
            ),
            Self::Uniform1i { location, x } => ctx.run("glUniform1i", |gl| gl.uniform_1i(location, x)),
            Self::Uniform1f { location, x } => ctx.run("glUniform1f", |gl| gl.uniform_1f(location, x)),
            Self::Uniform2f {
                location,
                values: [x, y],
            } => ctx.run("glUniform2f", |gl| gl.uniform_2f(location, x, y)),
            Self::Uniform2i {
                location,
                values: [x, y],
            } => ctx.run("glUniform2i", |gl| gl.uniform_2i(location, x, y)),
            Self::Uniform4i {
                location,
                values: [x, y, z, w],
            } => ctx.run("glUniform4i", |gl| gl.uniform_4i(location, x, y, z, w)),
            Self::Uniform4f {
                location,
                values: [x, y, z, w],
            } => ctx.run("glUniform4f", |gl| gl.uniform_4f(location, x, y, z, w)),
            Self::Uniform3fv { location, values } => {
                ctx.run("glUniform3fv", |gl| gl.uniform_3fv(location, &values))
            }
            Self::Uniform4fv { location, values } => {
                ctx.run("glUniform4fv", |gl| gl.uniform_4fv(location, &values))
            }

            Self::GetIntegerv { pname, reply } => answer(ctx, "glGetIntegerv", reply, |gl| gl.get_integer(pname)),
            Self::GetFloatv { pname, reply } => answer(ctx, "glGetFloatv", reply, |gl| gl.get_float(pname)),
            Self::GetString { name, reply } => answer(ctx, "glGetString", reply, |gl| gl.get_string(name)),
            Self::GetStringi { name, index, reply } => {
                answer(ctx, "glGetStringi", reply, |gl| gl.get_string_i(name, index))
            }
            // Reading the error clears it, so no follow-up check.
            Self::GetError(reply) => {
                let outcome = ctx.gl("glGetError").map(|gl| gl.get_error());
                ctx.reply_with(reply, outcome)
            }

            Self::FenceSync {
                condition,
                flags,
                reply,
            } => answer(ctx, "glFenceSync", reply, |gl| gl.fence_sync(condition, flags)),
            Self::ClientWaitSync {
                sync,
                flags,
                timeout_ns,
                reply,
            } => answer(ctx, "glClientWaitSync", reply, |gl| {
                gl.client_wait_sync(sync, flags, timeout_ns)
            }),
            Self::DeleteSync(sync) => ctx.run("glDeleteSync", |gl| gl.delete_sync(sync)),

            Self::LoadGl { loader, reply } => {
                let outcome = match loader(ctx.host.as_ref()) {
                    Ok(gl) => {
                        ctx.install_gl(gl);
                        tracing::debug!("GL entry points loaded");
                        Ok(())
                    }
                    Err(err) => {
                        tracing::error!(%err, "failed to load GL entry points");
                        Err(DispatchError::Init(err.to_string()))
                    }
                };
                ctx.reply_with(reply, outcome)
            }
            Self::VideoInit(reply) => {
                let code = ctx.host.init();
                let outcome = host_status("VidExt_Init", code);
                ctx.reply_with(reply, outcome)
            }
            Self::VideoQuit => {
                if let Err(err) = host_status("VidExt_Quit", ctx.host.quit()) {
                    tracing::warn!(%err, "host video quit failed");
                }
                Ok(())
            }
            Self::SetVideoMode {
                width,
                height,
                bits_per_pixel,
                mode,
                flags,
                reply,
            } => {
                let status = ctx.host.set_video_mode(width, height, bits_per_pixel, mode, flags);
                if status != HOST_SUCCESS {
                    tracing::warn!(width, height, status, "host rejected video mode");
                }
                ctx.reply_with(reply, Ok(status))
            }
            Self::GlSetAttribute { attribute, value } => {
                let status = ctx.host.gl_set_attribute(attribute, value);
                if let Err(err) = host_status("VidExt_GL_SetAttribute", status) {
                    tracing::warn!(%err, attribute, value, "host rejected GL attribute");
                }
                Ok(())
            }
            Self::GlGetAttribute { attribute, reply } => {
                let (status, value) = ctx.host.gl_get_attribute(attribute);
                let outcome = host_status("VidExt_GL_GetAttribute", status).map(|()| value);
                ctx.reply_with(reply, outcome)
            }
            Self::SwapBuffers => {
                let status = ctx.host.swap_buffers();
                ctx.swaps.complete();
                if let Err(err) = host_status("VidExt_GL_SwapBuffers", status) {
                    tracing::warn!(%err, "buffer swap failed");
                }
                Ok(())
            }
        }
    }
}

fn host_status(call: &'static str, code: i32) -> Result<(), DispatchError> {
    if code == HOST_SUCCESS {
        Ok(())
    } else {
        Err(DispatchError::Host { call, code })
    }
}
