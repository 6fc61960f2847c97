//! ### English
//! Vertex layouts consumed by the unbuffered drawer, and their attribute indices.
//!
//! ### 中文
//! 无缓冲绘制器使用的顶点布局及其属性索引。
use bytemuck::{Pod, Zeroable};

/// ### English
/// Attribute indices of triangle/line vertices ([`SpVertex`]).
///
/// ### 中文
/// 三角形/线段顶点（[`SpVertex`]）的属性索引。
pub mod triangle_attrib {
    pub const POSITION: u32 = 0;
    pub const COLOR: u32 = 1;
    pub const TEXCOORD: u32 = 2;
    pub const NUMLIGHTS: u32 = 3;
    pub const MODIFY: u32 = 4;
}

/// ### English
/// Attribute indices of rectangle vertices ([`RectVertex`]).
///
/// ### 中文
/// 矩形顶点（[`RectVertex`]）的属性索引。
pub mod rect_attrib {
    pub const POSITION: u32 = 5;
    pub const TEXCOORD0: u32 = 6;
    pub const TEXCOORD1: u32 = 7;
}

/// ### English
/// Transformed RSP vertex as produced by the microcode interpreter.
///
/// ### 中文
/// 微码解释器产出的、已变换的 RSP 顶点。
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct SpVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
    pub nx: f32,
    pub ny: f32,
    pub nz: f32,
    pub _pad0: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
    pub flat_r: f32,
    pub flat_g: f32,
    pub flat_b: f32,
    pub flat_a: f32,
    pub s: f32,
    pub t: f32,
    /// ### English
    /// Four per-vertex modifier bytes, read by the shader as a `BYTE` vec4.
    ///
    /// ### 中文
    /// 四个逐顶点修饰字节，着色器以 `BYTE` vec4 读取。
    pub modify: u32,
    pub hw_light: u8,
    pub clip: u8,
    pub flag: i16,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RectVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
    pub s0: f32,
    pub t0: f32,
    pub s1: f32,
    pub t1: f32,
}
