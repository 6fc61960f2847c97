//! ### English
//! Draws client-memory vertex arrays through the dispatcher.
//!
//! Each draw copies its vertices once into an `Arc<[u8]>` shared by every attribute pointer of
//! that draw; the executor then copies them into the persistent attribute slots.
//!
//! ### 中文
//! 通过分发器绘制客户端内存中的顶点数组。
//!
//! 每次 draw 把顶点复制一次到 `Arc<[u8]>`，由该次 draw 的所有属性指针共享；
//! 执行器随后再把它们复制到持久属性槽位。
use std::mem::{offset_of, size_of};
use std::sync::Arc;

use crate::engine::error::DispatchError;
use crate::engine::gl::AttribLayout;

use super::unbuffered::MAX_ATTRIB_INDEX;
use super::vertex::{RectVertex, SpVertex, rect_attrib, triangle_attrib};
use super::wrapper::FunctionWrapper;

/// ### English
/// Last submitted enable state of each vertex attribute array.
///
/// `None` means unknown, so the first toggle is always submitted.
///
/// ### 中文
/// 每个顶点属性数组最后一次提交的启用状态。
///
/// `None` 表示未知，因此第一次切换一定会提交。
#[derive(Debug, Default)]
pub struct CachedVertexAttribArray {
    enabled: [Option<bool>; MAX_ATTRIB_INDEX],
}

impl CachedVertexAttribArray {
    pub fn new() -> Self {
        Self::default()
    }

    /// ### English
    /// Enables or disables attribute `index`, skipping the call when the state is unchanged.
    ///
    /// ### 中文
    /// 启用或禁用属性 `index`；状态未变化时跳过调用。
    pub fn set(&mut self, wrapper: &FunctionWrapper, index: u32, enable: bool) -> Result<(), DispatchError> {
        let Some(state) = self.enabled.get_mut(index as usize) else {
            return Err(DispatchError::Gl {
                command: "glEnableVertexAttribArray",
                code: glow::INVALID_VALUE,
            });
        };
        if *state == Some(enable) {
            return Ok(());
        }
        if enable {
            wrapper.enable_vertex_attrib_array(index)?;
        } else {
            wrapper.disable_vertex_attrib_array(index)?;
        }
        *state = Some(enable);
        Ok(())
    }

    pub fn is_enabled(&self, index: u32) -> Option<bool> {
        self.enabled.get(index as usize).copied().flatten()
    }
}

/// ### English
/// One triangle batch.
///
/// ### 中文
/// 一批三角形。
#[derive(Debug, Clone, Copy)]
pub struct DrawTriangles<'a> {
    pub mode: u32,
    pub vertices: &'a [SpVertex],
    /// ### English
    /// `UNSIGNED_BYTE` indices; `None` draws `vertices` in order.
    ///
    /// ### 中文
    /// `UNSIGNED_BYTE` 索引；`None` 表示按顺序绘制 `vertices`。
    pub elements: Option<&'a [u8]>,
    pub uses_shade: bool,
    pub uses_texture: bool,
    /// ### English
    /// Source colors from `flat_*` instead of the interpolated `r/g/b/a`.
    ///
    /// ### 中文
    /// 颜色取自 `flat_*` 而不是插值的 `r/g/b/a`。
    pub flat_colors: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct DrawRects<'a> {
    pub mode: u32,
    pub vertices: &'a [RectVertex],
    pub texrect: bool,
    /// ### English
    /// Whether the combiner samples tile 0 / tile 1.
    ///
    /// ### 中文
    /// 合成器是否采样 tile 0 / tile 1。
    pub uses_tile: [bool; 2],
}

/// ### English
/// Immediate-mode drawer for triangles, rectangles and lines.
///
/// ### 中文
/// 三角形、矩形与线段的立即模式绘制器。
pub struct UnbufferedDrawer {
    attribs: CachedVertexAttribArray,
    hw_lighting: bool,
    per_triangle_depth: bool,
}

fn float_attrib<V>(index: u32, size: i32) -> AttribLayout {
    AttribLayout {
        index,
        size,
        ty: glow::FLOAT,
        normalized: false,
        stride: size_of::<V>() as i32,
    }
}

impl UnbufferedDrawer {
    /// ### English
    /// Creates a drawer and disables every attribute array it manages.
    ///
    /// #### Parameters
    /// - `hw_lighting`: Upload the per-draw light count as the `numlights` attribute.
    /// - `per_triangle_depth`: Draw indexed triangles one by one behind an image-access barrier.
    ///
    /// ### 中文
    /// 创建绘制器，并禁用其管理的所有属性数组。
    ///
    /// #### 参数
    /// - `hw_lighting`：以 `numlights` 属性上传每次 draw 的光源数量。
    /// - `per_triangle_depth`：在图像访问屏障之后逐个绘制带索引的三角形。
    pub fn new(
        wrapper: &FunctionWrapper,
        hw_lighting: bool,
        per_triangle_depth: bool,
    ) -> Result<Self, DispatchError> {
        let mut attribs = CachedVertexAttribArray::new();
        for index in 0..MAX_ATTRIB_INDEX as u32 {
            attribs.set(wrapper, index, false)?;
        }
        Ok(Self {
            attribs,
            hw_lighting,
            per_triangle_depth,
        })
    }

    pub fn attribs(&self) -> &CachedVertexAttribArray {
        &self.attribs
    }

    fn pointer(
        &mut self,
        wrapper: &FunctionWrapper,
        layout: AttribLayout,
        offset: usize,
        data: &Arc<[u8]>,
    ) -> Result<(), DispatchError> {
        self.attribs.set(wrapper, layout.index, true)?;
        wrapper.vertex_attrib_pointer_unbuffered(layout, offset, data.clone())
    }

    fn disable(&mut self, wrapper: &FunctionWrapper, indices: &[u32]) -> Result<(), DispatchError> {
        for &index in indices {
            self.attribs.set(wrapper, index, false)?;
        }
        Ok(())
    }

    pub fn draw_triangles(&mut self, wrapper: &FunctionWrapper, params: &DrawTriangles<'_>) -> Result<(), DispatchError> {
        let Some(first) = params.vertices.first() else {
            return Ok(());
        };
        let data: Arc<[u8]> = Arc::from(bytemuck::cast_slice::<SpVertex, u8>(params.vertices));

        self.pointer(
            wrapper,
            float_attrib::<SpVertex>(triangle_attrib::POSITION, 4),
            offset_of!(SpVertex, x),
            &data,
        )?;

        if params.uses_shade {
            let offset = if params.flat_colors {
                offset_of!(SpVertex, flat_r)
            } else {
                offset_of!(SpVertex, r)
            };
            self.pointer(wrapper, float_attrib::<SpVertex>(triangle_attrib::COLOR, 4), offset, &data)?;
        } else {
            self.attribs.set(wrapper, triangle_attrib::COLOR, false)?;
        }

        if params.uses_texture {
            self.pointer(
                wrapper,
                float_attrib::<SpVertex>(triangle_attrib::TEXCOORD, 2),
                offset_of!(SpVertex, s),
                &data,
            )?;
        } else {
            self.attribs.set(wrapper, triangle_attrib::TEXCOORD, false)?;
        }

        let modify = AttribLayout {
            ty: glow::BYTE,
            ..float_attrib::<SpVertex>(triangle_attrib::MODIFY, 4)
        };
        self.pointer(wrapper, modify, offset_of!(SpVertex, modify), &data)?;

        if self.hw_lighting {
            wrapper.vertex_attrib_1f(triangle_attrib::NUMLIGHTS, f32::from(first.hw_light))?;
        }

        self.disable(
            wrapper,
            &[rect_attrib::POSITION, rect_attrib::TEXCOORD0, rect_attrib::TEXCOORD1],
        )?;

        let Some(elements) = params.elements else {
            return wrapper.draw_arrays(params.mode, 0, params.vertices.len() as i32);
        };

        if !self.per_triangle_depth {
            return wrapper.draw_elements(params.mode, elements.len() as i32, glow::UNSIGNED_BYTE, elements);
        }

        for triangle in elements.chunks(3) {
            wrapper.memory_barrier(glow::SHADER_IMAGE_ACCESS_BARRIER_BIT)?;
            wrapper.draw_elements(params.mode, triangle.len() as i32, glow::UNSIGNED_BYTE, triangle)?;
        }
        Ok(())
    }

    pub fn draw_rects(&mut self, wrapper: &FunctionWrapper, params: &DrawRects<'_>) -> Result<(), DispatchError> {
        if params.vertices.is_empty() {
            return Ok(());
        }
        let data: Arc<[u8]> = Arc::from(bytemuck::cast_slice::<RectVertex, u8>(params.vertices));

        self.pointer(
            wrapper,
            float_attrib::<RectVertex>(rect_attrib::POSITION, 4),
            offset_of!(RectVertex, x),
            &data,
        )?;

        let tiles = [
            (rect_attrib::TEXCOORD0, offset_of!(RectVertex, s0)),
            (rect_attrib::TEXCOORD1, offset_of!(RectVertex, s1)),
        ];
        for ((index, offset), uses_tile) in tiles.into_iter().zip(params.uses_tile) {
            if params.texrect && uses_tile {
                self.pointer(wrapper, float_attrib::<RectVertex>(index, 2), offset, &data)?;
            } else {
                self.attribs.set(wrapper, index, false)?;
            }
        }

        self.disable(
            wrapper,
            &[
                triangle_attrib::POSITION,
                triangle_attrib::COLOR,
                triangle_attrib::TEXCOORD,
                triangle_attrib::MODIFY,
            ],
        )?;

        wrapper.draw_arrays(params.mode, 0, params.vertices.len() as i32)
    }

    pub fn draw_line(&mut self, wrapper: &FunctionWrapper, width: f32, vertices: &[SpVertex; 2]) -> Result<(), DispatchError> {
        let data: Arc<[u8]> = Arc::from(bytemuck::cast_slice::<SpVertex, u8>(vertices));

        self.pointer(
            wrapper,
            float_attrib::<SpVertex>(triangle_attrib::POSITION, 4),
            offset_of!(SpVertex, x),
            &data,
        )?;
        self.pointer(
            wrapper,
            float_attrib::<SpVertex>(triangle_attrib::COLOR, 4),
            offset_of!(SpVertex, r),
            &data,
        )?;

        self.disable(
            wrapper,
            &[
                triangle_attrib::TEXCOORD,
                triangle_attrib::MODIFY,
                rect_attrib::POSITION,
                rect_attrib::TEXCOORD0,
                rect_attrib::TEXCOORD1,
            ],
        )?;

        wrapper.line_width(width)?;
        wrapper.draw_arrays(glow::LINES, 0, 2)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::engine::config::PluginConfig;
    use crate::engine::gl::GlApi;
    use crate::engine::gl::recording::{GlProbe, RecordingGl};
    use crate::engine::host::HostVideo;
    use crate::engine::host::recording::RecordingHost;
    use crate::engine::runtime::command::GlLoader;

    fn setup(hw_lighting: bool, per_triangle_depth: bool) -> (FunctionWrapper, UnbufferedDrawer, GlProbe) {
        let wrapper = FunctionWrapper::new(RecordingHost::new(), &PluginConfig::default());
        let (gl, probe) = RecordingGl::new();
        let loader: GlLoader = Box::new(move |_: &dyn HostVideo| Ok(Box::new(gl) as Box<dyn GlApi>));
        wrapper.load_gl(loader).unwrap();
        let drawer = UnbufferedDrawer::new(&wrapper, hw_lighting, per_triangle_depth).unwrap();
        (wrapper, drawer, probe)
    }

    fn draw_calls(probe: &GlProbe) -> Vec<String> {
        probe.calls().into_iter().skip(MAX_ATTRIB_INDEX).collect()
    }

    fn triangle() -> [SpVertex; 3] {
        [SpVertex {
            hw_light: 2,
            ..SpVertex::default()
        }; 3]
    }

    #[test]
    fn construction_disables_every_attribute() {
        let (_wrapper, drawer, probe) = setup(false, false);
        let expected: Vec<String> = (0..8).map(|i| format!("disable_vertex_attrib_array({i})")).collect();
        assert_eq!(probe.calls(), expected);
        assert_eq!(drawer.attribs().is_enabled(7), Some(false));
    }

    #[test]
    fn shaded_textured_triangles_use_draw_arrays() {
        let (wrapper, mut drawer, probe) = setup(true, false);
        let vertices = triangle();
        let params = DrawTriangles {
            mode: glow::TRIANGLES,
            vertices: &vertices,
            elements: None,
            uses_shade: true,
            uses_texture: true,
            flat_colors: false,
        };
        drawer.draw_triangles(&wrapper, &params).unwrap();

        assert_eq!(
            draw_calls(&probe),
            vec![
                "enable_vertex_attrib_array(0)",
                "vertex_attrib_pointer_client(0, 4, 0x1406, false, 80)",
                "enable_vertex_attrib_array(1)",
                "vertex_attrib_pointer_client(1, 4, 0x1406, false, 80)",
                "enable_vertex_attrib_array(2)",
                "vertex_attrib_pointer_client(2, 2, 0x1406, false, 80)",
                "enable_vertex_attrib_array(4)",
                "vertex_attrib_pointer_client(4, 4, 0x1400, false, 80)",
                "vertex_attrib_1f(3, 2)",
                "draw_arrays(0x4, 0, 3)",
            ]
        );
    }

    #[test]
    fn redundant_attribute_toggles_are_not_submitted() {
        let (wrapper, mut drawer, probe) = setup(false, false);
        let vertices = triangle();
        let params = DrawTriangles {
            mode: glow::TRIANGLES,
            vertices: &vertices,
            elements: None,
            uses_shade: false,
            uses_texture: false,
            flat_colors: false,
        };
        drawer.draw_triangles(&wrapper, &params).unwrap();
        drawer.draw_triangles(&wrapper, &params).unwrap();

        assert_eq!(probe.calls_named("enable_vertex_attrib_array").len(), 2);
        assert_eq!(probe.calls_named("disable_vertex_attrib_array").len(), 8);
        assert_eq!(probe.calls_named("vertex_attrib_1f"), Vec::<String>::new());
    }

    #[test]
    fn indexed_triangles_copy_their_indices() {
        let (wrapper, mut drawer, probe) = setup(false, false);
        let vertices = triangle();
        let elements = [0u8, 1, 2, 2, 1, 0];
        let params = DrawTriangles {
            mode: glow::TRIANGLES,
            vertices: &vertices,
            elements: Some(&elements),
            uses_shade: true,
            uses_texture: false,
            flat_colors: true,
        };
        drawer.draw_triangles(&wrapper, &params).unwrap();
        assert_eq!(
            probe.calls_named("draw_elements"),
            vec!["draw_elements(0x4, 6, 0x1401, [0, 1, 2, 2, 1, 0])"]
        );
    }

    #[test]
    fn per_triangle_depth_draws_one_triangle_per_barrier() {
        let (wrapper, mut drawer, probe) = setup(false, true);
        let vertices = triangle();
        let elements = [0u8, 1, 2, 2, 1, 0];
        let params = DrawTriangles {
            mode: glow::TRIANGLES,
            vertices: &vertices,
            elements: Some(&elements),
            uses_shade: false,
            uses_texture: false,
            flat_colors: false,
        };
        drawer.draw_triangles(&wrapper, &params).unwrap();

        let tail: Vec<String> = probe.calls().into_iter().rev().take(4).rev().collect();
        assert_eq!(
            tail,
            vec![
                "memory_barrier(0x20)",
                "draw_elements(0x4, 3, 0x1401, [0, 1, 2])",
                "memory_barrier(0x20)",
                "draw_elements(0x4, 3, 0x1401, [2, 1, 0])",
            ]
        );
    }

    #[test]
    fn rects_switch_from_triangle_attributes() {
        let (wrapper, mut drawer, probe) = setup(false, false);
        let vertices = triangle();
        drawer
            .draw_triangles(
                &wrapper,
                &DrawTriangles {
                    mode: glow::TRIANGLES,
                    vertices: &vertices,
                    elements: None,
                    uses_shade: true,
                    uses_texture: true,
                    flat_colors: false,
                },
            )
            .unwrap();
        let before = probe.calls().len();

        let rects = [RectVertex::default(); 4];
        drawer
            .draw_rects(
                &wrapper,
                &DrawRects {
                    mode: glow::TRIANGLE_STRIP,
                    vertices: &rects,
                    texrect: true,
                    uses_tile: [true, false],
                },
            )
            .unwrap();

        let calls: Vec<String> = probe.calls().into_iter().skip(before).collect();
        assert_eq!(
            calls,
            vec![
                "enable_vertex_attrib_array(5)",
                "vertex_attrib_pointer_client(5, 4, 0x1406, false, 32)",
                "enable_vertex_attrib_array(6)",
                "vertex_attrib_pointer_client(6, 2, 0x1406, false, 32)",
                "disable_vertex_attrib_array(0)",
                "disable_vertex_attrib_array(1)",
                "disable_vertex_attrib_array(2)",
                "disable_vertex_attrib_array(4)",
                "draw_arrays(0x5, 0, 4)",
            ]
        );
    }

    #[test]
    fn line_sets_width_and_draws_two_vertices() {
        let (wrapper, mut drawer, probe) = setup(false, false);
        let vertices = [SpVertex::default(); 2];
        drawer.draw_line(&wrapper, 3.0, &vertices).unwrap();
        assert_eq!(
            draw_calls(&probe),
            vec![
                "enable_vertex_attrib_array(0)",
                "vertex_attrib_pointer_client(0, 4, 0x1406, false, 80)",
                "enable_vertex_attrib_array(1)",
                "vertex_attrib_pointer_client(1, 4, 0x1406, false, 80)",
                "line_width(3)",
                "draw_arrays(0x1, 0, 2)",
            ]
        );
    }
}
