//! ### English
//! Adaptive frame-skip controller.
//!
//! Consulted once per emulated frame: `update()` advances the state, `will_skip_next()` tells the
//! interpreter whether to drop the next frame's draw calls.
//!
//! ### 中文
//! 自适应跳帧控制器。
//!
//! 每个模拟帧调用一次：`update()` 推进状态，`will_skip_next()` 告诉解释器是否丢弃下一帧的绘制调用。
use std::time::Instant;

use crate::engine::config::FrameSkipConfig;

use super::clock::{Clock, MonotonicClock};

/// ### English
/// How skipped frames are chosen.
///
/// ### 中文
/// 跳帧的选择方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameSkipMode {
    /// ### English
    /// Skip only while behind the wall-clock schedule.
    ///
    /// ### 中文
    /// 仅在落后于墙钟进度时跳帧。
    #[default]
    Auto,
    /// ### English
    /// Skip a fixed `max_skips` frames out of every `max_skips + 1`.
    ///
    /// ### 中文
    /// 每 `max_skips + 1` 帧中固定跳过 `max_skips` 帧。
    Manual,
}

impl FrameSkipMode {
    /// ### English
    /// Host encoding: `1` is manual, every other value is auto.
    ///
    /// ### 中文
    /// 宿主编码：`1` 为手动，其余值均为自动。
    pub fn from_raw(raw: u32) -> Self {
        if raw == 1 { Self::Manual } else { Self::Auto }
    }
}

/// ### English
/// Frame-skip state machine.
///
/// Single-threaded: it lives with the interpreter and is never shared.
///
/// ### 中文
/// 跳帧状态机。
///
/// 单线程使用：随解释器存在，从不共享。
#[derive(Debug)]
pub struct FrameSkipManager<C: Clock = MonotonicClock> {
    clock: C,
    mode: FrameSkipMode,
    max_skips: i32,
    target_fps: i32,
    skip_counter: i32,
    /// ### English
    /// Wall-clock origin of auto mode; `None` until the first auto update.
    ///
    /// ### 中文
    /// 自动模式的墙钟起点；首次自动模式 update 之前为 `None`。
    baseline: Option<Instant>,
    actual_frame: i64,
}

impl Default for FrameSkipManager {
    fn default() -> Self {
        Self::new(FrameSkipConfig::default())
    }
}

impl FrameSkipManager {
    pub fn new(config: FrameSkipConfig) -> Self {
        Self::with_clock(config, MonotonicClock)
    }
}

impl<C: Clock> FrameSkipManager<C> {
    pub fn with_clock(config: FrameSkipConfig, clock: C) -> Self {
        Self {
            clock,
            mode: config.mode,
            max_skips: config.max_skips,
            target_fps: config.target_fps,
            skip_counter: 0,
            baseline: None,
            actual_frame: 0,
        }
    }

    /// ### English
    /// Sets the mode and the maximum number of consecutive skipped frames (`< 1` disables).
    ///
    /// The auto-mode baseline is kept; call [`Self::reset`] to re-establish it.
    ///
    /// ### 中文
    /// 设置模式与最大连续跳帧数（`< 1` 表示禁用）。
    ///
    /// 自动模式的基准时间会被保留；如需重新建立基准请调用 [`Self::reset`]。
    pub fn set_skips(&mut self, mode: FrameSkipMode, max_skips: i32) {
        self.mode = mode;
        self.max_skips = max_skips;
    }

    pub fn set_target_fps(&mut self, fps: i32) {
        self.target_fps = fps;
    }

    /// ### English
    /// `true` when the next frame should not be submitted to the GPU.
    ///
    /// ### 中文
    /// 下一帧不应提交给 GPU 时返回 `true`。
    #[inline]
    pub fn will_skip_next(&self) -> bool {
        self.skip_counter > 0
    }

    /// ### English
    /// Advances the state machine by one emulated frame.
    ///
    /// ### 中文
    /// 将状态机推进一个模拟帧。
    pub fn update(&mut self) {
        if self.max_skips < 1 {
            return;
        }

        if self.mode == FrameSkipMode::Manual {
            self.skip_counter = if self.skip_counter >= self.max_skips {
                0
            } else {
                self.skip_counter + 1
            };
            return;
        }

        let Some(baseline) = self.baseline else {
            self.baseline = Some(self.clock.now());
            self.actual_frame = 0;
            self.skip_counter = 0;
            return;
        };

        let elapsed_ms = self.clock.now().saturating_duration_since(baseline).as_millis();
        let elapsed_ms = i64::try_from(elapsed_ms).unwrap_or(i64::MAX);
        let desired_frame = elapsed_ms.saturating_mul(i64::from(self.target_fps)) / 1000;

        self.actual_frame += 1;

        if desired_frame < self.actual_frame {
            // Ahead of schedule.
        } else if desired_frame > self.actual_frame && self.skip_counter < self.max_skips {
            self.skip_counter += 1;
        } else {
            self.skip_counter = 0;
            self.actual_frame = desired_frame;
        }
    }

    /// ### English
    /// Drops the auto-mode baseline; the next auto update re-initializes it.
    ///
    /// ### 中文
    /// 丢弃自动模式基准；下一次自动模式 update 会重新初始化。
    pub fn reset(&mut self) {
        self.baseline = None;
        self.actual_frame = 0;
        self.skip_counter = 0;
    }

    pub fn mode(&self) -> FrameSkipMode {
        self.mode
    }

    pub fn max_skips(&self) -> i32 {
        self.max_skips
    }

    pub fn target_fps(&self) -> i32 {
        self.target_fps
    }

    pub fn skip_counter(&self) -> i32 {
        self.skip_counter
    }

    /// ### English
    /// Frame number auto mode believes it is at (`0` before the baseline exists).
    ///
    /// ### 中文
    /// 自动模式认为当前所处的帧号（基准建立之前为 `0`）。
    pub fn actual_frame(&self) -> i64 {
        self.actual_frame
    }

    /// ### English
    /// `true` once auto mode has recorded its baseline.
    ///
    /// ### 中文
    /// 自动模式已记录基准时间后返回 `true`。
    pub fn is_running(&self) -> bool {
        self.baseline.is_some()
    }
}
