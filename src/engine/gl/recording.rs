//! Recording `GlApi` fake for unit tests.
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use super::{AttribLayout, GlApi, PixelRect, TexImage2D, TexSubImage2D};

/// Shared view into a `RecordingGl` that stays with the test after the fake moved to the GPU thread.
#[derive(Clone, Default)]
pub(crate) struct GlProbe {
    calls: Arc<Mutex<Vec<String>>>,
    errors: Arc<Mutex<VecDeque<u32>>>,
    integers: Arc<Mutex<HashMap<u32, i32>>>,
    client_pointers: Arc<Mutex<HashMap<u32, usize>>>,
}

impl GlProbe {
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn calls_named(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| call.starts_with(prefix))
            .collect()
    }

    /// The next `glGetError` returns `code`.
    pub(crate) fn inject_error(&self, code: u32) {
        self.errors.lock().unwrap().push_back(code);
    }

    pub(crate) fn set_integer(&self, pname: u32, value: i32) {
        self.integers.lock().unwrap().insert(pname, value);
    }

    /// Last client pointer handed to `glVertexAttribPointer` for `index`.
    pub(crate) fn client_pointer(&self, index: u32) -> Option<usize> {
        self.client_pointers.lock().unwrap().get(&index).copied()
    }
}

pub(crate) struct RecordingGl {
    probe: GlProbe,
    next_name: u32,
    next_sync: u64,
}

impl RecordingGl {
    pub(crate) fn new() -> (Self, GlProbe) {
        let probe = GlProbe::default();
        (
            Self {
                probe: probe.clone(),
                next_name: 1,
                next_sync: 0x1000,
            },
            probe,
        )
    }

    fn log(&self, call: String) {
        self.probe.calls.lock().unwrap().push(call);
    }

    fn names(&mut self, call: &str, n: usize) -> Vec<u32> {
        let names: Vec<u32> = (0..n as u32).map(|i| self.next_name + i).collect();
        self.next_name += n as u32;
        self.log(format!("{call}({n})"));
        names
    }
}

impl GlApi for RecordingGl {
    fn blend_func(&mut self, sfactor: u32, dfactor: u32) {
        self.log(format!("blend_func({sfactor:#x}, {dfactor:#x})"));
    }

    fn blend_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.log(format!("blend_color({red}, {green}, {blue}, {alpha})"));
    }

    fn pixel_store_i(&mut self, pname: u32, param: i32) {
        self.log(format!("pixel_store_i({pname:#x}, {param})"));
    }

    fn clear_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.log(format!("clear_color({red}, {green}, {blue}, {alpha})"));
    }

    fn clear_depth_f(&mut self, depth: f32) {
        self.log(format!("clear_depth_f({depth})"));
    }

    fn clear(&mut self, mask: u32) {
        self.log(format!("clear({mask:#x})"));
    }

    fn cull_face(&mut self, mode: u32) {
        self.log(format!("cull_face({mode:#x})"));
    }

    fn depth_func(&mut self, func: u32) {
        self.log(format!("depth_func({func:#x})"));
    }

    fn depth_mask(&mut self, flag: bool) {
        self.log(format!("depth_mask({flag})"));
    }

    fn depth_range_f(&mut self, near: f32, far: f32) {
        self.log(format!("depth_range_f({near}, {far})"));
    }

    fn enable(&mut self, cap: u32) {
        self.log(format!("enable({cap:#x})"));
    }

    fn disable(&mut self, cap: u32) {
        self.log(format!("disable({cap:#x})"));
    }

    fn polygon_offset(&mut self, factor: f32, units: f32) {
        self.log(format!("polygon_offset({factor}, {units})"));
    }

    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.log(format!("scissor({x}, {y}, {width}, {height})"));
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.log(format!("viewport({x}, {y}, {width}, {height})"));
    }

    fn line_width(&mut self, width: f32) {
        self.log(format!("line_width({width})"));
    }

    fn gen_textures(&mut self, n: usize) -> Vec<u32> {
        self.names("gen_textures", n)
    }

    fn delete_textures(&mut self, textures: &[u32]) {
        self.log(format!("delete_textures({textures:?})"));
    }

    fn active_texture(&mut self, texture: u32) {
        self.log(format!("active_texture({texture:#x})"));
    }

    fn bind_texture(&mut self, target: u32, texture: u32) {
        self.log(format!("bind_texture({target:#x}, {texture})"));
    }

    fn tex_parameter_i(&mut self, target: u32, pname: u32, param: i32) {
        self.log(format!("tex_parameter_i({target:#x}, {pname:#x}, {param})"));
    }

    fn tex_parameter_f(&mut self, target: u32, pname: u32, param: f32) {
        self.log(format!("tex_parameter_f({target:#x}, {pname:#x}, {param})"));
    }

    fn tex_storage_2d(&mut self, target: u32, levels: i32, internal_format: u32, width: i32, height: i32) {
        self.log(format!(
            "tex_storage_2d({target:#x}, {levels}, {internal_format:#x}, {width}, {height})"
        ));
    }

    fn tex_image_2d(&mut self, params: TexImage2D, pixels: Option<&[u8]>) {
        self.log(format!(
            "tex_image_2d({}x{}, {:?})",
            params.width,
            params.height,
            pixels.map(<[u8]>::len)
        ));
    }

    fn tex_sub_image_2d(&mut self, params: TexSubImage2D, pixels: &[u8]) {
        self.log(format!(
            "tex_sub_image_2d({}, {}, {}x{}, {})",
            params.x_offset,
            params.y_offset,
            params.width,
            params.height,
            pixels.len()
        ));
    }

    fn gen_framebuffers(&mut self, n: usize) -> Vec<u32> {
        self.names("gen_framebuffers", n)
    }

    fn delete_framebuffers(&mut self, framebuffers: &[u32]) {
        self.log(format!("delete_framebuffers({framebuffers:?})"));
    }

    fn bind_framebuffer(&mut self, target: u32, framebuffer: u32) {
        self.log(format!("bind_framebuffer({target:#x}, {framebuffer})"));
    }

    fn framebuffer_texture_2d(&mut self, target: u32, attachment: u32, tex_target: u32, texture: u32, level: i32) {
        self.log(format!(
            "framebuffer_texture_2d({target:#x}, {attachment:#x}, {tex_target:#x}, {texture}, {level})"
        ));
    }

    fn gen_renderbuffers(&mut self, n: usize) -> Vec<u32> {
        self.names("gen_renderbuffers", n)
    }

    fn delete_renderbuffers(&mut self, renderbuffers: &[u32]) {
        self.log(format!("delete_renderbuffers({renderbuffers:?})"));
    }

    fn bind_renderbuffer(&mut self, target: u32, renderbuffer: u32) {
        self.log(format!("bind_renderbuffer({target:#x}, {renderbuffer})"));
    }

    fn renderbuffer_storage(&mut self, target: u32, internal_format: u32, width: i32, height: i32) {
        self.log(format!(
            "renderbuffer_storage({target:#x}, {internal_format:#x}, {width}, {height})"
        ));
    }

    fn framebuffer_renderbuffer(&mut self, target: u32, attachment: u32, rb_target: u32, renderbuffer: u32) {
        self.log(format!(
            "framebuffer_renderbuffer({target:#x}, {attachment:#x}, {rb_target:#x}, {renderbuffer})"
        ));
    }

    fn check_framebuffer_status(&mut self, target: u32) -> u32 {
        self.log(format!("check_framebuffer_status({target:#x})"));
        glow::FRAMEBUFFER_COMPLETE
    }

    fn blit_framebuffer(&mut self, src: [i32; 4], dst: [i32; 4], mask: u32, filter: u32) {
        self.log(format!("blit_framebuffer({src:?}, {dst:?}, {mask:#x}, {filter:#x})"));
    }

    fn read_buffer(&mut self, mode: u32) {
        self.log(format!("read_buffer({mode:#x})"));
    }

    fn draw_buffers(&mut self, buffers: &[u32]) {
        self.log(format!("draw_buffers({buffers:?})"));
    }

    fn read_pixels(&mut self, rect: PixelRect) -> Vec<u8> {
        self.log(format!(
            "read_pixels({}, {}, {}, {})",
            rect.x, rect.y, rect.width, rect.height
        ));
        (0..rect.byte_len(1)).map(|i| i as u8).collect()
    }

    fn gen_buffers(&mut self, n: usize) -> Vec<u32> {
        self.names("gen_buffers", n)
    }

    fn delete_buffers(&mut self, buffers: &[u32]) {
        self.log(format!("delete_buffers({buffers:?})"));
    }

    fn bind_buffer(&mut self, target: u32, buffer: u32) {
        self.log(format!("bind_buffer({target:#x}, {buffer})"));
    }

    fn buffer_data(&mut self, target: u32, data: &[u8], usage: u32) {
        self.log(format!("buffer_data({target:#x}, {data:?}, {usage:#x})"));
    }

    fn buffer_sub_data(&mut self, target: u32, offset: i32, data: &[u8]) {
        self.log(format!("buffer_sub_data({target:#x}, {offset}, {data:?})"));
    }

    fn gen_vertex_arrays(&mut self, n: usize) -> Vec<u32> {
        self.names("gen_vertex_arrays", n)
    }

    fn delete_vertex_arrays(&mut self, arrays: &[u32]) {
        self.log(format!("delete_vertex_arrays({arrays:?})"));
    }

    fn bind_vertex_array(&mut self, array: u32) {
        self.log(format!("bind_vertex_array({array})"));
    }

    fn enable_vertex_attrib_array(&mut self, index: u32) {
        self.log(format!("enable_vertex_attrib_array({index})"));
    }

    fn disable_vertex_attrib_array(&mut self, index: u32) {
        self.log(format!("disable_vertex_attrib_array({index})"));
    }

    fn vertex_attrib_pointer(&mut self, layout: AttribLayout, offset: i32) {
        self.log(format!(
            "vertex_attrib_pointer({}, {}, {:#x}, {}, {}, {offset})",
            layout.index, layout.size, layout.ty, layout.normalized, layout.stride
        ));
    }

    unsafe fn vertex_attrib_pointer_client(&mut self, layout: AttribLayout, pointer: *const u8) {
        self.probe
            .client_pointers
            .lock()
            .unwrap()
            .insert(layout.index, pointer as usize);
        self.log(format!(
            "vertex_attrib_pointer_client({}, {}, {:#x}, {}, {})",
            layout.index, layout.size, layout.ty, layout.normalized, layout.stride
        ));
    }

    fn vertex_attrib_1f(&mut self, index: u32, x: f32) {
        self.log(format!("vertex_attrib_1f({index}, {x})"));
    }

    fn vertex_attrib_4f(&mut self, index: u32, x: f32, y: f32, z: f32, w: f32) {
        self.log(format!("vertex_attrib_4f({index}, {x}, {y}, {z}, {w})"));
    }

    fn draw_arrays(&mut self, mode: u32, first: i32, count: i32) {
        self.log(format!("draw_arrays({mode:#x}, {first}, {count})"));
    }

    fn draw_elements(&mut self, mode: u32, count: i32, ty: u32, indices: &[u8]) {
        self.log(format!("draw_elements({mode:#x}, {count}, {ty:#x}, {indices:?})"));
    }

    fn memory_barrier(&mut self, barriers: u32) {
        self.log(format!("memory_barrier({barriers:#x})"));
    }

    fn finish(&mut self) {
        self.log("finish()".to_string());
    }

    fn create_shader(&mut self, shader_type: u32) -> u32 {
        self.log(format!("create_shader({shader_type:#x})"));
        let shader = self.next_name;
        self.next_name += 1;
        shader
    }

    fn shader_source(&mut self, shader: u32, source: &str) {
        self.log(format!("shader_source({shader}, {source:?})"));
    }

    fn compile_shader(&mut self, shader: u32) {
        self.log(format!("compile_shader({shader})"));
    }

    fn get_shader_compile_status(&mut self, shader: u32) -> bool {
        self.log(format!("get_shader_compile_status({shader})"));
        true
    }

    fn get_shader_info_log(&mut self, shader: u32) -> String {
        self.log(format!("get_shader_info_log({shader})"));
        String::new()
    }

    fn delete_shader(&mut self, shader: u32) {
        self.log(format!("delete_shader({shader})"));
    }

    fn create_program(&mut self) -> u32 {
        self.log("create_program()".to_string());
        let program = self.next_name;
        self.next_name += 1;
        program
    }

    fn attach_shader(&mut self, program: u32, shader: u32) {
        self.log(format!("attach_shader({program}, {shader})"));
    }

    fn detach_shader(&mut self, program: u32, shader: u32) {
        self.log(format!("detach_shader({program}, {shader})"));
    }

    fn bind_attrib_location(&mut self, program: u32, index: u32, name: &str) {
        self.log(format!("bind_attrib_location({program}, {index}, {name:?})"));
    }

    fn link_program(&mut self, program: u32) {
        self.log(format!("link_program({program})"));
    }

    fn get_program_link_status(&mut self, program: u32) -> bool {
        self.log(format!("get_program_link_status({program})"));
        true
    }

    fn get_program_info_log(&mut self, program: u32) -> String {
        self.log(format!("get_program_info_log({program})"));
        format!("program {program} linked")
    }

    fn use_program(&mut self, program: u32) {
        self.log(format!("use_program({program})"));
    }

    fn delete_program(&mut self, program: u32) {
        self.log(format!("delete_program({program})"));
    }

    fn get_uniform_location(&mut self, program: u32, name: &str) -> i32 {
        self.log(format!("get_uniform_location({program}, {name:?})"));
        name.len() as i32
    }

    fn uniform_1i(&mut self, location: i32, x: i32) {
        self.log(format!("uniform_1i({location}, {x})"));
    }

    fn uniform_1f(&mut self, location: i32, x: f32) {
        self.log(format!("uniform_1f({location}, {x})"));
    }

    fn uniform_2f(&mut self, location: i32, x: f32, y: f32) {
        self.log(format!("uniform_2f({location}, {x}, {y})"));
    }

    fn uniform_2i(&mut self, location: i32, x: i32, y: i32) {
        self.log(format!("uniform_2i({location}, {x}, {y})"));
    }

    fn uniform_4i(&mut self, location: i32, x: i32, y: i32, z: i32, w: i32) {
        self.log(format!("uniform_4i({location}, {x}, {y}, {z}, {w})"));
    }

    fn uniform_4f(&mut self, location: i32, x: f32, y: f32, z: f32, w: f32) {
        self.log(format!("uniform_4f({location}, {x}, {y}, {z}, {w})"));
    }

    fn uniform_3fv(&mut self, location: i32, values: &[f32]) {
        self.log(format!("uniform_3fv({location}, {values:?})"));
    }

    fn uniform_4fv(&mut self, location: i32, values: &[f32]) {
        self.log(format!("uniform_4fv({location}, {values:?})"));
    }

    fn get_integer(&mut self, pname: u32) -> i32 {
        self.log(format!("get_integer({pname:#x})"));
        self.probe
            .integers
            .lock()
            .unwrap()
            .get(&pname)
            .copied()
            .unwrap_or(0)
    }

    fn get_float(&mut self, pname: u32) -> f32 {
        self.log(format!("get_float({pname:#x})"));
        1.5
    }

    fn get_string(&mut self, name: u32) -> String {
        self.log(format!("get_string({name:#x})"));
        "RecordingGl".to_string()
    }

    fn get_string_i(&mut self, name: u32, index: u32) -> String {
        self.log(format!("get_string_i({name:#x}, {index})"));
        format!("GL_EXT_recorded_{index}")
    }

    fn get_error(&mut self) -> u32 {
        self.probe
            .errors
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(glow::NO_ERROR)
    }

    fn fence_sync(&mut self, condition: u32, flags: u32) -> u64 {
        self.log(format!("fence_sync({condition:#x}, {flags})"));
        self.next_sync += 1;
        self.next_sync
    }

    fn client_wait_sync(&mut self, sync: u64, flags: u32, timeout_ns: u64) -> u32 {
        self.log(format!("client_wait_sync({sync:#x}, {flags}, {timeout_ns})"));
        glow::ALREADY_SIGNALED
    }

    fn delete_sync(&mut self, sync: u64) {
        self.log(format!("delete_sync({sync:#x})"));
    }
}
