//! Meadow Gallery - an interactive 3D portfolio gallery
//!
//! Core modules:
//! - `scene`: Deterministic choreography (scenery animation, selection,
//!   camera, scripted popup sequences)
//! - `config`: Gallery content supplied by the host
//! - `audio`: Fire-and-forget sound cues (playback wasm only)
//!
//! The renderer, scene-graph, and router are external collaborators: they
//! feed the per-frame clock, pointer and selection events in, and read the
//! camera pose, entity poses, and overlay records back out.

pub mod audio;
pub mod config;
pub mod scene;

pub use config::{GalleryConfig, GalleryItem, ItemId};
pub use scene::{FrameInput, Scene, SceneEvent};

/// Choreography constants
pub mod consts {
    /// Golden ratio - the frames' aspect and the viewing-offset height
    pub const GOLDEN_RATIO: f32 = 1.618_034;

    // === Camera ===
    /// Smoothing window for the damped camera (seconds)
    pub const CAMERA_SMOOTH_TIME: f32 = 0.4;
    /// Overview anchor when nothing is selected
    pub const OVERVIEW_POS: [f32; 3] = [0.0, 0.6, 8.5];
    /// Local offset from a frame to its viewing point
    pub const VIEWING_OFFSET: [f32; 3] = [0.0, GOLDEN_RATIO / 2.0, 1.8];
    /// Idle drone-shot orbit (horizontal ellipse + vertical bob)
    pub const IDLE_ORBIT_RATE: f32 = 0.25;
    pub const IDLE_ORBIT_RADIUS: f32 = 0.8;
    pub const IDLE_BOB_RATE: f32 = 0.8;
    pub const IDLE_BOB_AMPLITUDE: f32 = 0.25;
    /// Liveliness bob while focused on a frame
    pub const FOCUS_BOB_RATE: f32 = 1.2;
    pub const FOCUS_BOB_AMPLITUDE: f32 = 0.08;
    /// Pointer parallax tilt cap (radians per axis)
    pub const MAX_POINTER_TILT: f32 = 0.15;
    /// Slow rotation of the whole gallery while idle (radians/sec)
    pub const GALLERY_SPIN_RATE: f32 = 0.18;
    /// Frame image scale targets: selected, hovered, at rest
    pub const FRAME_SCALE_ACTIVE: f32 = 1.15;
    pub const FRAME_SCALE_HOVER: f32 = 1.05;
    /// Smoothing window for the damped frame scales (seconds)
    pub const FRAME_SCALE_SMOOTH_TIME: f32 = 0.25;

    // === Selection ===
    /// Delay before a settled selection reveals its panel or video (seconds)
    pub const REVEAL_DELAY: f64 = 0.6;
    /// The Nth non-null selection that arms the miner popup
    pub const BAIT_SELECTION: u32 = 2;

    // === Popup storm ===
    /// Quiet period after scene start before the storm arms (seconds)
    pub const STORM_START_DELAY: f64 = 30.0;
    pub const STORM_TOTAL_SPAWNS: u32 = 500;
    /// The whole spawn sequence fits in this window (seconds)
    pub const STORM_TOTAL_DURATION: f64 = 10.0;
    /// Geometric ratio between consecutive inter-spawn delays
    pub const STORM_DECAY: f64 = 0.98;
    /// Pause between the last spawn and the atomic clear (seconds)
    pub const STORM_GRACE: f64 = 0.15;
    /// Spawn positions stay this far from the viewport edges (percent)
    pub const STORM_MARGIN_PCT: f32 = 5.0;

    // === Miner popup ===
    /// Where the window appears when armed (viewport percent)
    pub const MINER_HOME: (f32, f32) = (50.0, 40.0);
    /// How long the window flees the pointer (seconds)
    pub const MINER_EVADE_SECS: f64 = 5.0;
    /// Fake install progress: +step every interval until 100
    pub const MINER_PROGRESS_STEP: f32 = 5.0;
    pub const MINER_PROGRESS_INTERVAL: f64 = 0.1;
    /// Pointer distance that triggers a dodge (pixels)
    pub const MINER_FLEE_RADIUS: f32 = 180.0;
    /// Push = penetration * gain + minimum (pixels)
    pub const MINER_PUSH_GAIN: f32 = 0.35;
    pub const MINER_PUSH_MIN: f32 = 20.0;
    /// Safe margins the window can never leave (viewport percent)
    pub const MINER_X_RANGE: (f32, f32) = (10.0, 90.0);
    pub const MINER_Y_RANGE: (f32, f32) = (8.0, 82.0);

    // === Scenery population ===
    pub const GRASS_TUFTS: usize = 260;
    pub const TREES: usize = 26;
    pub const FLOWERS: usize = 80;
    pub const CLOUDS: usize = 10;
    /// Clouds drift across this span and wrap seamlessly
    pub const CLOUD_SPAN: f32 = 140.0;
    /// Pond center (water surface + duck orbits)
    pub const POND_CENTER: (f32, f32) = (3.0, -3.0);
}

/// Map `x` into `[-span/2, span/2)` with seamless wraparound.
///
/// Used by drifting entities (clouds) so unbounded `elapsed * speed` motion
/// stays inside a fixed band without a visible jump at the seam.
#[inline]
pub fn wrap_span(x: f32, span: f32) -> f32 {
    (x + span / 2.0).rem_euclid(span) - span / 2.0
}

/// Exponential smoothing factor for a critically damped step.
///
/// Covers ~98% of the remaining distance after `smooth_time` seconds,
/// independent of how `dt` slices that interval. Always in `[0, 1)`, so the
/// interpolation can never overshoot the target.
#[inline]
pub fn damp_factor(smooth_time: f32, dt: f32) -> f32 {
    1.0 - (-4.0 * dt / smooth_time.max(1e-4)).exp()
}
