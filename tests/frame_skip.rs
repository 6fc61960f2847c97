use std::time::Duration;

use n64_gl_dispatch::{FrameSkipConfig, FrameSkipManager, FrameSkipMode, ManualClock};
use pretty_assertions::assert_eq;

fn frames_per_sixty(manager: &mut FrameSkipManager<ManualClock>, clock: &ManualClock, step: Duration) -> usize {
    let mut drawn = 0;
    for _ in 0..60 {
        clock.advance(step);
        manager.update();
        if !manager.will_skip_next() {
            drawn += 1;
        }
    }
    drawn
}

#[test]
fn manual_mode_draws_one_frame_in_three() {
    let clock = ManualClock::new();
    let mut manager = FrameSkipManager::with_clock(
        FrameSkipConfig {
            mode: FrameSkipMode::Manual,
            max_skips: 2,
            target_fps: 60,
        },
        clock.clone(),
    );
    assert_eq!(frames_per_sixty(&mut manager, &clock, Duration::from_millis(16)), 20);
}

#[test]
fn auto_mode_on_time_never_skips() {
    let clock = ManualClock::new();
    let mut manager = FrameSkipManager::with_clock(FrameSkipConfig::default(), clock.clone());
    // 10 ms per frame against a 16.6 ms budget: running ahead, nothing to catch up.
    assert_eq!(frames_per_sixty(&mut manager, &clock, Duration::from_millis(10)), 60);
}

#[test]
fn auto_mode_skips_when_falling_behind() {
    let clock = ManualClock::new();
    let mut manager = FrameSkipManager::with_clock(FrameSkipConfig::default(), clock.clone());
    // 50 ms per frame against a 16.6 ms budget: always behind.
    let drawn = frames_per_sixty(&mut manager, &clock, Duration::from_millis(50));
    // Two skips, then a draw that snaps back onto the schedule.
    assert_eq!(drawn, 20);
}

#[test]
fn disabling_skips_stops_skipping() {
    let clock = ManualClock::new();
    let mut manager = FrameSkipManager::with_clock(
        FrameSkipConfig {
            mode: FrameSkipMode::Manual,
            max_skips: 3,
            target_fps: 60,
        },
        clock.clone(),
    );
    manager.update();
    assert!(manager.will_skip_next());

    manager.set_skips(FrameSkipMode::Manual, 0);
    manager.reset();
    assert_eq!(frames_per_sixty(&mut manager, &clock, Duration::from_millis(16)), 60);
}
