//! Headless frontends: a log renderer and a stdin quit switch

use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::sim::GameState;

use super::{InputFrame, InputSource, Renderer};

#[derive(Debug, Default)]
pub struct LogRenderer {
    frames: u64,
    hud_lines: u64,
    announced_loss: bool,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// HUD text as a windowed renderer would draw it
    pub fn hud_line(state: &GameState) -> String {
        let bar = state.player.health_bar();
        format!(
            "Lives: {}  Level: {}  Score: {}  Health: {}/{} ({:.0}px)  Enemies: {}  Pickups: {}",
            state.lives,
            state.level,
            state.score(),
            state.player.health,
            state.player.max_health,
            bar.fill_width,
            state.enemies.len(),
            state.pickups.len()
        )
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, state: &GameState) {
        self.frames += 1;

        if state.is_lost() {
            if !self.announced_loss {
                self.announced_loss = true;
                log::info!("You Lost!! (score {})", state.score());
            }
            return;
        }

        // First frame, then once per second
        if (self.frames - 1) % state.config.fps.max(1) as u64 == 0 {
            self.hud_lines += 1;
            log::info!("{}", Self::hud_line(state));
        }
    }
}

/// Wraps another input source and raises quit once the flag is set.
///
/// `listen_stdin` sets it when a line reading `q` or `quit` arrives, which
/// stands in for closing the window when running headless.
#[derive(Debug)]
pub struct QuitSwitch<I> {
    inner: I,
    quit: Arc<AtomicBool>,
}

impl<I: InputSource> QuitSwitch<I> {
    pub fn new(inner: I, quit: Arc<AtomicBool>) -> Self {
        Self { inner, quit }
    }

    /// Wrap `inner` and start a background reader on stdin
    pub fn listen_stdin(inner: I) -> Self {
        let quit = Arc::new(AtomicBool::new(false));
        let flag = quit.clone();
        std::thread::spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if matches!(line.trim(), "q" | "quit") {
                    flag.store(true, Ordering::Relaxed);
                    break;
                }
            }
        });
        Self::new(inner, quit)
    }
}

impl<I: InputSource> InputSource for QuitSwitch<I> {
    fn poll(&mut self, state: &GameState) -> InputFrame {
        let mut frame = self.inner.poll(state);
        frame.quit |= self.quit.load(Ordering::Relaxed);
        frame
    }
}
