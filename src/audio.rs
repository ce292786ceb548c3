//! Audio cues via HtmlAudioElement
//!
//! File-backed playback, wasm only; the fade schedule itself is plain state
//! so it runs on any target. Every call is fire-and-forget: a missing file
//! or a blocked autoplay must never take the scene down, so errors are
//! swallowed after a log line.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use web_sys::HtmlAudioElement;

#[cfg(target_arch = "wasm32")]
const MUSIC_SRC: &str = "assets/audio/meadow-loop.mp3";
#[cfg(target_arch = "wasm32")]
const POPUP_SRC: &str = "assets/audio/popup.mp3";
#[cfg(target_arch = "wasm32")]
const SCREAM_SRC: &str = "assets/audio/scream.mp3";

/// Scream fade: volume drops by this step on each interval
const FADE_STEP: f64 = 0.05;
const FADE_INTERVAL: f64 = 0.2;

/// Stepped volume ramp from full volume down to silence.
///
/// Runs on accumulated frame time, so a late frame catches up step by step
/// instead of jumping. The ramp starts the moment it is created.
#[derive(Debug, Clone, Copy)]
pub struct FadeRamp {
    volume: f64,
    accum: f64,
}

impl FadeRamp {
    pub fn new() -> Self {
        Self {
            volume: 1.0,
            accum: 0.0,
        }
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn finished(&self) -> bool {
        self.volume <= 0.0
    }

    /// Advance by one frame delta. Returns true if the volume changed.
    pub fn advance(&mut self, dt: f64) -> bool {
        if self.finished() {
            return false;
        }
        self.accum += dt;
        let mut changed = false;
        while self.accum >= FADE_INTERVAL && !self.finished() {
            self.accum -= FADE_INTERVAL;
            self.volume = (self.volume - FADE_STEP).max(0.0);
            changed = true;
        }
        changed
    }
}

impl Default for FadeRamp {
    fn default() -> Self {
        Self::new()
    }
}

/// Kick off playback without waiting on it. The returned promise rejects
/// when autoplay is blocked; attach a no-op handler so the rejection never
/// reaches the console. Returns whether the call itself was accepted.
#[cfg(target_arch = "wasm32")]
fn play_detached(el: &HtmlAudioElement) -> bool {
    match el.play() {
        Ok(promise) => {
            let noop = Closure::<dyn FnMut(JsValue)>::new(|_: JsValue| {});
            let _ = promise.catch(&noop);
            noop.forget();
            true
        }
        Err(_) => false,
    }
}

#[cfg(target_arch = "wasm32")]
pub struct AudioManager {
    /// Looping background track, started on the first user gesture
    music: Option<HtmlAudioElement>,
    music_started: bool,
    /// The jump-scare scream; fades out from the moment it starts
    scream: Option<(HtmlAudioElement, FadeRamp)>,
    muted: bool,
}

#[cfg(target_arch = "wasm32")]
impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl AudioManager {
    pub fn new() -> Self {
        let music = HtmlAudioElement::new_with_src(MUSIC_SRC).ok();
        if let Some(el) = &music {
            el.set_loop(true);
            el.set_volume(0.35);
        } else {
            log::warn!("failed to create background audio element");
        }
        Self {
            music,
            music_started: false,
            scream: None,
            muted: false,
        }
    }

    /// Start the background loop. Only a user-activation gesture (pointer
    /// down, key down) may call this; autoplay is rejected from anything
    /// else, and the latch only spends itself on an accepted play call.
    /// Idempotent.
    pub fn unlock(&mut self) {
        if self.music_started || self.muted {
            return;
        }
        if let Some(el) = &self.music {
            if play_detached(el) {
                self.music_started = true;
            }
        }
    }

    /// One popup blip. A fresh element per call so storm-burst blips overlap
    /// instead of restarting each other.
    pub fn play_popup(&self) {
        if self.muted {
            return;
        }
        if let Ok(el) = HtmlAudioElement::new_with_src(POPUP_SRC) {
            el.set_volume(0.5);
            play_detached(&el);
        }
    }

    /// The jump-scare scream, at full volume. The stepped fade-out starts
    /// immediately; [`AudioManager::advance`] carries it to silence.
    pub fn play_scream(&mut self) {
        if self.muted {
            return;
        }
        match HtmlAudioElement::new_with_src(SCREAM_SRC) {
            Ok(el) => {
                el.set_volume(1.0);
                play_detached(&el);
                self.scream = Some((el, FadeRamp::new()));
            }
            Err(_) => log::warn!("failed to create scream audio element"),
        }
    }

    /// Advance the scream fade one frame. Returns true on the frame the
    /// scream reaches silence, so the host can drop its overlay.
    pub fn advance(&mut self, dt: f64) -> bool {
        let Some((el, ramp)) = &mut self.scream else {
            return false;
        };
        if ramp.advance(dt) {
            el.set_volume(ramp.volume());
        }
        if ramp.finished() {
            let _ = el.pause();
            self.scream = None;
            return true;
        }
        false
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if let Some(el) = &self.music {
            el.set_muted(muted);
        }
        if let Some((el, _)) = &self.scream {
            el.set_muted(muted);
        }
    }
}
