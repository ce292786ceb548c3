//! Evasive fake-installer popup
//!
//! Armed once by the bait selection, the window flees the pointer for a fixed
//! window of time while a fake progress bar ticks upward. The close button
//! only works once the evasion timer has expired.

use glam::Vec2;

use crate::consts::*;

#[derive(Debug, Clone, PartialEq)]
pub enum MinerEvent {
    /// Window appeared at its home position
    Armed,
    /// Window jumped away from the pointer
    Dodged { x: f32, y: f32 },
    /// Close button accepted; window is gone
    Dismissed,
}

pub struct Miner {
    armed_once: bool,
    visible: bool,
    /// Position in viewport percent
    x: f32,
    y: f32,
    /// Fake install progress, 0..=100
    progress: f32,
    evade_until: f64,
    next_progress_at: f64,
}

impl Miner {
    pub fn new() -> Self {
        Self {
            armed_once: false,
            visible: false,
            x: MINER_HOME.0,
            y: MINER_HOME.1,
            progress: 0.0,
            evade_until: 0.0,
            next_progress_at: 0.0,
        }
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Position in viewport percent
    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn evading(&self, now: f64) -> bool {
        self.visible && now < self.evade_until
    }

    /// Show the window. One-shot: re-arming after the first time is inert.
    pub fn arm(&mut self, now: f64, events: &mut Vec<MinerEvent>) {
        if self.armed_once {
            return;
        }
        self.armed_once = true;
        self.visible = true;
        self.x = MINER_HOME.0;
        self.y = MINER_HOME.1;
        self.progress = 0.0;
        self.evade_until = now + MINER_EVADE_SECS;
        self.next_progress_at = now + MINER_PROGRESS_INTERVAL;
        events.push(MinerEvent::Armed);
        log::info!("miner popup armed at t={now:.1}s");
    }

    /// Dodge the pointer while the evasion timer runs. `pointer_px` and the
    /// window position are compared in pixels; the stored position stays in
    /// viewport percent so the host can keep it responsive.
    pub fn pointer_move(
        &mut self,
        pointer_px: Vec2,
        viewport: Vec2,
        now: f64,
        events: &mut Vec<MinerEvent>,
    ) {
        if !self.evading(now) || viewport.x <= 0.0 || viewport.y <= 0.0 {
            return;
        }

        let window_px = Vec2::new(self.x / 100.0 * viewport.x, self.y / 100.0 * viewport.y);
        let delta = window_px - pointer_px;
        let dist = delta.length();
        if dist >= MINER_FLEE_RADIUS {
            return;
        }

        let push = (MINER_FLEE_RADIUS - dist) * MINER_PUSH_GAIN + MINER_PUSH_MIN;
        // A pointer dead on the window still pushes somewhere deterministic
        let dir = if dist > 1e-3 { delta / dist } else { Vec2::X };
        let pushed = window_px + dir * push;

        self.x = (pushed.x / viewport.x * 100.0).clamp(MINER_X_RANGE.0, MINER_X_RANGE.1);
        self.y = (pushed.y / viewport.y * 100.0).clamp(MINER_Y_RANGE.0, MINER_Y_RANGE.1);
        events.push(MinerEvent::Dodged {
            x: self.x,
            y: self.y,
        });
    }

    /// Tick the fake progress bar. A late frame catches up step by step; the
    /// bar saturates at 100 and keeps ticking nowhere after that.
    pub fn advance(&mut self, now: f64) {
        if !self.visible {
            return;
        }
        while now >= self.next_progress_at && self.progress < 100.0 {
            self.progress = (self.progress + MINER_PROGRESS_STEP).min(100.0);
            self.next_progress_at += MINER_PROGRESS_INTERVAL;
        }
    }

    /// Close button. Ignored while the window is still evading.
    pub fn dismiss(&mut self, now: f64, events: &mut Vec<MinerEvent>) -> bool {
        if !self.visible {
            return false;
        }
        if self.evading(now) {
            log::debug!("miner dismiss ignored while evading");
            return false;
        }
        self.visible = false;
        events.push(MinerEvent::Dismissed);
        true
    }
}

impl Default for Miner {
    fn default() -> Self {
        Self::new()
    }
}
