//! ### English
//! Frame pacing: the per-frame skip decision and the clock it reads.
//!
//! ### 中文
//! 帧节奏控制：逐帧跳帧决策及其读取的时钟。
mod clock;
mod frame_skip;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use frame_skip::{FrameSkipManager, FrameSkipMode};
