//! ### English
//! GL command dispatch runtime (public API).
//!
//! ### 中文
//! GL 命令分发运行时（对外公开 API）。

mod command;
mod context;
mod drawer;
mod gpu_thread;
mod swap;
mod unbuffered;
mod vertex;
mod wrapper;

pub use command::GlLoader;
pub use drawer::{CachedVertexAttribArray, DrawRects, DrawTriangles, UnbufferedDrawer};
pub use gpu_thread::GPU_THREAD_NAME;
pub use unbuffered::MAX_ATTRIB_INDEX;
pub use vertex::{RectVertex, SpVertex, rect_attrib, triangle_attrib};
pub use wrapper::FunctionWrapper;
