/// ### English
/// Engine internal modules (command dispatch, GL/host bridges, frame pacing).
///
/// ### 中文
/// 引擎内部模块（命令分发、GL/宿主桥接、帧节奏控制）。
pub mod config;
pub mod error;
pub mod flags;
pub mod gl;
pub mod host;
pub(crate) mod lockfree;
pub mod logging;
pub mod queue;
pub mod refresh;
pub mod runtime;
