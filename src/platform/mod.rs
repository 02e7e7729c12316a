//! Platform abstraction layer
//!
//! The simulation only needs three collaborators from the outside world:
//! - a renderer that draws the current state once per frame
//! - an input source polled once per frame (keys plus quit)
//! - a clock that paces the loop to the target frame rate
//!
//! `run_session` wires them together around `sim::tick`.

pub mod autopilot;
pub mod headless;

use std::time::{Duration, Instant};

use crate::sim::{GameState, TickInput, tick};

pub use autopilot::Autopilot;
pub use headless::{LogRenderer, QuitSwitch};

/// Keys held this frame plus the window's quit signal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputFrame {
    pub keys: TickInput,
    pub quit: bool,
}

pub trait Renderer {
    /// Draw one frame. Must finish before the next clock gate.
    fn render(&mut self, state: &GameState);
}

pub trait InputSource {
    /// Current key state. Keyboard sources ignore `state`; demo players read it.
    fn poll(&mut self, state: &GameState) -> InputFrame;
}

pub trait Clock {
    /// Block until the next frame is due
    fn tick(&mut self, target_fps: u32);
}

/// Sleeps out the remainder of each frame
#[derive(Debug)]
pub struct FixedRateClock {
    last: Option<Instant>,
}

impl FixedRateClock {
    pub fn new() -> Self {
        Self { last: None }
    }
}

impl Default for FixedRateClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FixedRateClock {
    fn tick(&mut self, target_fps: u32) {
        let frame = Duration::from_secs_f64(1.0 / target_fps.max(1) as f64);
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < frame {
                std::thread::sleep(frame - elapsed);
            }
        }
        self.last = Some(Instant::now());
    }
}

/// Never blocks; for simulations and tests
#[derive(Debug, Default)]
pub struct UnpacedClock;

impl Clock for UnpacedClock {
    fn tick(&mut self, _target_fps: u32) {}
}

/// Why a session loop returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionExit {
    /// Loss grace period ran out; back to the menu
    Terminated,
    /// The player closed the window; the caller exits the process
    Quit,
    /// Frame budget exhausted before the session ended
    FrameLimit,
}

/// Run one session until it terminates, the player quits, or `max_frames`
/// loop iterations have passed.
pub fn run_session(
    state: &mut GameState,
    input: &mut dyn InputSource,
    renderer: &mut dyn Renderer,
    clock: &mut dyn Clock,
    max_frames: Option<u64>,
) -> SessionExit {
    let fps = state.config.fps;
    let mut frames = 0u64;

    loop {
        if max_frames.is_some_and(|max| frames >= max) {
            log::info!("Frame limit reached after {frames} frames");
            return SessionExit::FrameLimit;
        }

        clock.tick(fps);
        renderer.render(state);

        let polled = input.poll(state);
        if polled.quit {
            log::info!("Quit requested");
            return SessionExit::Quit;
        }

        tick(state, &polled.keys);
        frames += 1;

        if state.is_terminated() {
            return SessionExit::Terminated;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Ruleset;
    use crate::sim::Phase;

    /// Replays a fixed key state, optionally quitting at a frame
    struct Scripted {
        keys: TickInput,
        quit_at: Option<u64>,
        polls: u64,
    }

    impl InputSource for Scripted {
        fn poll(&mut self, _state: &GameState) -> InputFrame {
            self.polls += 1;
            InputFrame {
                keys: self.keys,
                quit: self.quit_at == Some(self.polls),
            }
        }
    }

    #[derive(Default)]
    struct CountingRenderer {
        frames: u64,
        lost_frames: u64,
    }

    impl Renderer for CountingRenderer {
        fn render(&mut self, state: &GameState) {
            self.frames += 1;
            if state.is_lost() {
                self.lost_frames += 1;
            }
        }
    }

    #[test]
    fn test_quit_is_checked_every_frame() {
        let mut state = GameState::with_rules(Ruleset::basic(), 5).unwrap();
        let mut input = Scripted {
            keys: TickInput::default(),
            quit_at: Some(3),
            polls: 0,
        };
        let mut renderer = CountingRenderer::default();
        let exit = run_session(&mut state, &mut input, &mut renderer, &mut UnpacedClock, None);
        assert_eq!(exit, SessionExit::Quit);
        // Two full frames simulated before the quit poll
        assert_eq!(state.frame, 2);
        assert_eq!(renderer.frames, 3);
    }

    #[test]
    fn test_session_runs_to_termination() {
        let mut state = GameState::with_rules(Ruleset::basic(), 5).unwrap();
        state.lives = 0;
        let mut input = Scripted {
            keys: TickInput::default(),
            quit_at: None,
            polls: 0,
        };
        let mut renderer = CountingRenderer::default();
        let exit = run_session(
            &mut state,
            &mut input,
            &mut renderer,
            &mut UnpacedClock,
            Some(1_000),
        );
        assert_eq!(exit, SessionExit::Terminated);
        assert_eq!(state.phase, Phase::Terminated);
        // 1 losing frame + 120 grace frames; the overlay shows for all but the first render
        assert_eq!(renderer.frames, 121);
        assert_eq!(renderer.lost_frames, 120);
    }

    #[test]
    fn test_frame_limit() {
        let mut state = GameState::with_rules(Ruleset::basic(), 5).unwrap();
        let mut input = Scripted {
            keys: TickInput::default(),
            quit_at: None,
            polls: 0,
        };
        let mut renderer = CountingRenderer::default();
        let exit = run_session(&mut state, &mut input, &mut renderer, &mut UnpacedClock, Some(10));
        assert_eq!(exit, SessionExit::FrameLimit);
        assert_eq!(state.frame, 10);
    }
}
