//! ### English
//! Lock-free handoff primitives used by the dispatcher runtime.
//!
//! ### 中文
//! 分发器运行时使用的无锁交接原语。
mod oneshot;

pub(crate) use oneshot::OneShot;
