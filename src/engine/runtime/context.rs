//! ### English
//! State owned by whichever thread executes GL commands.
//!
//! ### 中文
//! 由执行 GL 命令的线程所持有的状态。
use std::sync::Arc;

use crate::engine::error::DispatchError;
use crate::engine::gl::{AttribLayout, GlApi};
use crate::engine::host::HostVideo;

use super::swap::SwapThrottle;
use super::unbuffered::UnbufferedAttribs;

/// ### English
/// Reply channel of a synced command.
///
/// ### 中文
/// 同步命令的回复通道。
pub(crate) type Reply<T> = crossbeam_channel::Sender<Result<T, DispatchError>>;

/// ### English
/// Execution context of the command executor (GPU thread or inline caller).
///
/// ### 中文
/// 命令执行器（GPU 线程或内联调用方）的执行上下文。
pub(crate) struct GpuContext {
    /// ### English
    /// `None` until a `LoadGl` command installed the entry points.
    ///
    /// ### 中文
    /// 在 `LoadGl` 命令装载入口函数之前为 `None`。
    gl: Option<Box<dyn GlApi>>,
    pub(crate) host: Arc<dyn HostVideo>,
    attribs: UnbufferedAttribs,
    pub(crate) swaps: Arc<SwapThrottle>,
    check_errors: bool,
}

impl GpuContext {
    pub(crate) fn new(host: Arc<dyn HostVideo>, swaps: Arc<SwapThrottle>, check_errors: bool) -> Self {
        Self {
            gl: None,
            host,
            attribs: UnbufferedAttribs::new(),
            swaps,
            check_errors,
        }
    }

    pub(crate) fn install_gl(&mut self, gl: Box<dyn GlApi>) {
        self.gl = Some(gl);
    }

    pub(crate) fn gl(&mut self, command: &'static str) -> Result<&mut dyn GlApi, DispatchError> {
        match self.gl.as_deref_mut() {
            Some(gl) => Ok(gl),
            None => Err(DispatchError::GlNotLoaded { command }),
        }
    }

    /// ### English
    /// Queries `glGetError` after `command` when checks are enabled.
    ///
    /// ### 中文
    /// 启用检查时，在 `command` 之后查询 `glGetError`。
    pub(crate) fn check(&mut self, command: &'static str) -> Result<(), DispatchError> {
        if !self.check_errors {
            return Ok(());
        }
        let Some(gl) = self.gl.as_deref_mut() else {
            return Ok(());
        };
        let code = gl.get_error();
        if code == glow::NO_ERROR {
            return Ok(());
        }
        tracing::error!(command, code = format_args!("{code:#06x}"), "OpenGL error");
        Err(DispatchError::Gl { command, code })
    }

    /// ### English
    /// Runs one GL call and checks the error state afterwards.
    ///
    /// ### 中文
    /// 执行一次 GL 调用并在之后检查错误状态。
    pub(crate) fn run<T>(
        &mut self,
        command: &'static str,
        call: impl FnOnce(&mut dyn GlApi) -> T,
    ) -> Result<T, DispatchError> {
        let value = call(self.gl(command)?);
        self.check(command)?;
        Ok(value)
    }

    /// ### English
    /// Delivers the outcome of a synced command.
    ///
    /// The caller always receives the outcome. Only fatal errors are returned to the executor.
    ///
    /// ### 中文
    /// 投递同步命令的执行结果。
    ///
    /// 调用方总会收到结果；只有致命错误会返回给执行器。
    pub(crate) fn reply_with<T>(
        &mut self,
        reply: Reply<T>,
        outcome: Result<T, DispatchError>,
    ) -> Result<(), DispatchError> {
        let fatal = match &outcome {
            Err(err) if err.is_fatal() => Some(err.clone()),
            _ => None,
        };
        // A dropped receiver means the producer gave up; nothing left to deliver.
        let _ = reply.send(outcome);
        match fatal {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// ### English
    /// Copies `data` into the persistent slot for `layout.index` and points GL at it.
    ///
    /// #### Parameters
    /// - `layout`: Attribute layout; `layout.index` selects the slot.
    /// - `offset`: Byte offset of the first element inside `data`.
    /// - `data`: Vertex bytes shared by every attribute of one draw.
    ///
    /// ### 中文
    /// 将 `data` 复制到 `layout.index` 对应的持久槽位，并让 GL 指向该槽位。
    ///
    /// #### 参数
    /// - `layout`：属性布局；`layout.index` 决定槽位。
    /// - `offset`：首个元素在 `data` 中的字节偏移。
    /// - `data`：同一次 draw 的所有属性共享的顶点字节。
    pub(crate) fn attrib_pointer_unbuffered(
        &mut self,
        layout: AttribLayout,
        offset: usize,
        data: &[u8],
    ) -> Result<(), DispatchError> {
        const COMMAND: &str = "glVertexAttribPointer";
        let Some(gl) = self.gl.as_deref_mut() else {
            return Err(DispatchError::GlNotLoaded { command: COMMAND });
        };
        let Some(slot) = self.attribs.update(layout.index as usize, data) else {
            return Err(DispatchError::Gl {
                command: COMMAND,
                code: glow::INVALID_VALUE,
            });
        };
        let pointer = slot.as_ptr().wrapping_add(offset);
        // The slot lives as long as the context and is only rewritten by the next pointer command
        // for the same index, which is queued after every draw that reads this one.
        unsafe { gl.vertex_attrib_pointer_client(layout, pointer) };
        self.check(COMMAND)
    }

    #[cfg(test)]
    pub(crate) fn attrib_slot(&self, index: usize) -> Option<&[u8]> {
        self.attribs.slot(index)
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;

    use super::*;
    use crate::engine::gl::recording::{GlProbe, RecordingGl};
    use crate::engine::host::recording::RecordingHost;

    fn context(check_errors: bool) -> (GpuContext, GlProbe) {
        let (gl, probe) = RecordingGl::new();
        let mut ctx = GpuContext::new(RecordingHost::new(), Arc::new(SwapThrottle::new()), check_errors);
        ctx.install_gl(Box::new(gl));
        (ctx, probe)
    }

    const LAYOUT: AttribLayout = AttribLayout {
        index: 2,
        size: 2,
        ty: glow::FLOAT,
        normalized: false,
        stride: 8,
    };

    #[test]
    fn commands_before_load_are_rejected() {
        let mut ctx = GpuContext::new(RecordingHost::new(), Arc::new(SwapThrottle::new()), true);
        let err = ctx.run("glClear", |gl| gl.clear(glow::COLOR_BUFFER_BIT));
        assert_eq!(err, Err(DispatchError::GlNotLoaded { command: "glClear" }));
    }

    #[test]
    fn error_state_is_only_checked_when_enabled() {
        let (mut ctx, probe) = context(false);
        probe.inject_error(glow::INVALID_ENUM);
        assert_eq!(ctx.run("glEnable", |gl| gl.enable(glow::BLEND)), Ok(()));

        let (mut ctx, probe) = context(true);
        probe.inject_error(glow::INVALID_ENUM);
        assert_eq!(
            ctx.run("glEnable", |gl| gl.enable(glow::BLEND)),
            Err(DispatchError::Gl {
                command: "glEnable",
                code: glow::INVALID_ENUM
            })
        );
    }

    #[test]
    fn reply_with_forwards_non_fatal_errors_only_to_the_caller() {
        let (mut ctx, _probe) = context(true);
        let (tx, rx) = bounded(1);
        let host_err = DispatchError::Host {
            call: "VidExt_Init",
            code: 2,
        };
        assert_eq!(ctx.reply_with::<()>(tx, Err(host_err.clone())), Ok(()));
        assert_eq!(rx.recv().unwrap(), Err(host_err));

        let (tx, rx) = bounded(1);
        let gl_err = DispatchError::Gl {
            command: "glFinish",
            code: glow::OUT_OF_MEMORY,
        };
        assert_eq!(ctx.reply_with::<()>(tx, Err(gl_err.clone())), Err(gl_err.clone()));
        assert_eq!(rx.recv().unwrap(), Err(gl_err));
    }

    #[test]
    fn unbuffered_pointer_targets_the_persistent_slot() {
        let (mut ctx, probe) = context(true);
        ctx.attrib_pointer_unbuffered(LAYOUT, 4, &[0u8; 32]).unwrap();

        let slot = ctx.attrib_slot(2).unwrap();
        assert_eq!(slot.len(), 32);
        assert_eq!(probe.client_pointer(2), Some(slot.as_ptr() as usize + 4));
    }

    #[test]
    fn unbuffered_pointer_rejects_out_of_range_index() {
        let (mut ctx, probe) = context(true);
        let layout = AttribLayout { index: 8, ..LAYOUT };
        assert_eq!(
            ctx.attrib_pointer_unbuffered(layout, 0, &[1, 2, 3]),
            Err(DispatchError::Gl {
                command: "glVertexAttribPointer",
                code: glow::INVALID_VALUE
            })
        );
        assert!(probe.calls().is_empty());
    }
}
