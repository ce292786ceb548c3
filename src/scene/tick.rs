//! Per-frame orchestration
//!
//! [`Scene`] owns every choreographed component and advances them in a fixed
//! order each frame: scenery, selection timers, camera, storm, miner. The
//! host drives it with a monotonic clock and drains one event buffer.

use glam::Vec2;

use crate::config::{GalleryConfig, ItemId};
use crate::consts::{FRAME_SCALE_ACTIVE, FRAME_SCALE_HOVER, FRAME_SCALE_SMOOTH_TIME};
use crate::damp_factor;
use crate::scene::camera::CameraRig;
use crate::scene::miner::{Miner, MinerEvent};
use crate::scene::scenery::{Pose, Scenery};
use crate::scene::selection::{SelectionEvent, SelectionState};
use crate::scene::storm::{Storm, StormArtifact, StormEvent};

/// Host-supplied pointer state for one frame
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// Pointer in normalized device coordinates, `[-1, 1]` per axis
    pub pointer_ndc: Vec2,
    /// Pointer in viewport pixels
    pub pointer_px: Vec2,
    /// Viewport size in pixels
    pub viewport: Vec2,
}

/// Everything the host reacts to, in the order it occurred
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    SelectionChanged(Option<ItemId>),
    /// First-ever selection: jump scare
    Startle,
    /// Text panel for the active item is due
    RevealText(ItemId),
    /// Video for the active item is due
    RevealVideo(ItemId, String),
    StormSpawned(StormArtifact),
    StormCleared,
    MinerArmed,
    MinerDodged { x: f32, y: f32 },
    MinerDismissed,
}

pub struct Scene {
    config: GalleryConfig,
    pub scenery: Scenery,
    pub camera: CameraRig,
    pub selection: SelectionState,
    pub storm: Storm,
    pub miner: Miner,
    /// Item the pointer is over, per the host's hit test
    hovered: Option<ItemId>,
    /// Per-item image scale, damped toward active/hover/rest targets
    frame_scales: Vec<f32>,
    // Scratch buffers reused across frames
    selection_events: Vec<SelectionEvent>,
    storm_events: Vec<StormEvent>,
    miner_events: Vec<MinerEvent>,
}

impl Scene {
    pub fn new(config: GalleryConfig, seed: u64) -> Self {
        let popup_images = config.popup_images.len().max(1) as u32;
        let item_count = config.items.len();
        Self {
            scenery: Scenery::generate(seed),
            camera: CameraRig::new(),
            selection: SelectionState::new(),
            storm: Storm::new(seed.wrapping_add(1), popup_images),
            miner: Miner::new(),
            hovered: None,
            frame_scales: vec![1.0; item_count],
            config,
            selection_events: Vec::new(),
            storm_events: Vec::new(),
            miner_events: Vec::new(),
        }
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    /// Current smoothed camera pose
    pub fn camera_pose(&self) -> Pose {
        Pose {
            position: self.camera.position,
            rotation: self.camera.rotation,
        }
    }

    /// Apply a selection from a click or a route change. Drives the camera
    /// and the miner bait alongside the selection machine.
    pub fn select(&mut self, id: Option<ItemId>, now: f64, events: &mut Vec<SceneEvent>) {
        self.selection_events.clear();
        self.selection
            .select(id, &self.config, now, &mut self.selection_events);
        self.route_selection_events(now, events);
    }

    /// Select by URL slug, for the hash router. Unknown slugs deselect.
    pub fn select_slug(&mut self, slug: Option<&str>, now: f64, events: &mut Vec<SceneEvent>) {
        let id = slug.and_then(|s| self.config.find_by_slug(s));
        if id.is_none() && slug.is_some() {
            log::warn!("no gallery item for slug {:?}", slug);
        }
        self.select(id, now, events);
    }

    /// Pointer hovering a frame, per the host's hit test. Unknown ids clear
    /// the hover.
    pub fn set_hover(&mut self, id: Option<ItemId>) {
        self.hovered = id.filter(|id| self.config.get(*id).is_some());
    }

    /// Current per-item image scales, indexed like the config's item list
    pub fn frame_scales(&self) -> &[f32] {
        &self.frame_scales
    }

    /// Pointer moved: feed the miner's dodge logic. The camera reads the
    /// pointer from [`FrameInput`] during [`Scene::advance`] instead.
    pub fn pointer_move(&mut self, input: &FrameInput, now: f64, events: &mut Vec<SceneEvent>) {
        self.miner_events.clear();
        self.miner
            .pointer_move(input.pointer_px, input.viewport, now, &mut self.miner_events);
        self.route_miner_events(events);
    }

    /// Close button on the miner window. Returns false while it is evading.
    pub fn dismiss_miner(&mut self, now: f64, events: &mut Vec<SceneEvent>) -> bool {
        self.miner_events.clear();
        let dismissed = self.miner.dismiss(now, &mut self.miner_events);
        self.route_miner_events(events);
        dismissed
    }

    /// Advance one frame. `elapsed` is total simulated seconds since scene
    /// start, `dt` the delta since the previous frame.
    pub fn advance(
        &mut self,
        elapsed: f64,
        dt: f32,
        input: &FrameInput,
        events: &mut Vec<SceneEvent>,
    ) {
        self.scenery.advance(elapsed);

        self.selection_events.clear();
        self.selection
            .advance(elapsed, &self.config, &mut self.selection_events);
        self.route_selection_events(elapsed, events);

        self.camera.advance(elapsed, dt, input.pointer_ndc);

        // Selected frames swell toward 1.15, hovered toward 1.05, the rest
        // relax back to 1.0, all with the same damping as the camera
        let k = damp_factor(FRAME_SCALE_SMOOTH_TIME, dt);
        let active = self.selection.active();
        for (i, scale) in self.frame_scales.iter_mut().enumerate() {
            let id = ItemId(i as u32);
            let target = if active == Some(id) {
                FRAME_SCALE_ACTIVE
            } else if self.hovered == Some(id) {
                FRAME_SCALE_HOVER
            } else {
                1.0
            };
            *scale += (target - *scale) * k;
        }

        self.storm_events.clear();
        self.storm.advance(elapsed, &mut self.storm_events);
        for ev in self.storm_events.drain(..) {
            events.push(match ev {
                StormEvent::Spawned(a) => SceneEvent::StormSpawned(a),
                StormEvent::Cleared => SceneEvent::StormCleared,
            });
        }

        self.miner.advance(elapsed);
    }

    fn route_selection_events(&mut self, now: f64, events: &mut Vec<SceneEvent>) {
        for ev in self.selection_events.drain(..) {
            match ev {
                SelectionEvent::Changed(id) => {
                    match id.and_then(|id| self.config.get(id)) {
                        Some(item) => self.camera.focus_item(item),
                        None => self.camera.clear_focus(),
                    }
                    events.push(SceneEvent::SelectionChanged(id));
                }
                SelectionEvent::Startle => events.push(SceneEvent::Startle),
                SelectionEvent::Bait => {
                    self.miner_events.clear();
                    self.miner.arm(now, &mut self.miner_events);
                    for mev in self.miner_events.drain(..) {
                        Self::push_miner_event(mev, events);
                    }
                }
                SelectionEvent::RevealText(id) => events.push(SceneEvent::RevealText(id)),
                SelectionEvent::RevealVideo(id, url) => {
                    events.push(SceneEvent::RevealVideo(id, url));
                }
            }
        }
    }

    fn route_miner_events(&mut self, events: &mut Vec<SceneEvent>) {
        for ev in self.miner_events.drain(..) {
            Self::push_miner_event(ev, events);
        }
    }

    fn push_miner_event(ev: MinerEvent, events: &mut Vec<SceneEvent>) {
        events.push(match ev {
            MinerEvent::Armed => SceneEvent::MinerArmed,
            MinerEvent::Dodged { x, y } => SceneEvent::MinerDodged { x, y },
            MinerEvent::Dismissed => SceneEvent::MinerDismissed,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GalleryConfig;
    use crate::consts::*;

    fn scene() -> Scene {
        Scene::new(GalleryConfig::sample(), 7)
    }

    // Ids are positional indexes into the config's item list
    fn first_two_ids(_scene: &Scene) -> (ItemId, ItemId) {
        (ItemId(0), ItemId(1))
    }

    #[test]
    fn test_first_selection_startles_second_baits_miner() {
        let mut s = scene();
        let mut events = Vec::new();
        let (a, b) = first_two_ids(&s);

        s.select(Some(a), 0.0, &mut events);
        assert!(events.contains(&SceneEvent::Startle));
        assert!(!events.iter().any(|e| matches!(e, SceneEvent::MinerArmed)));

        events.clear();
        s.select(Some(b), 1.0, &mut events);
        assert!(!events.contains(&SceneEvent::Startle));
        assert!(events.contains(&SceneEvent::MinerArmed));
        assert!(s.miner.visible());
    }

    #[test]
    fn test_selection_focuses_camera_deselect_releases_it() {
        let mut s = scene();
        let mut events = Vec::new();
        let (a, _) = first_two_ids(&s);

        s.select(Some(a), 0.0, &mut events);
        assert!(s.camera.focus().is_some());

        s.select(None, 1.0, &mut events);
        assert!(s.camera.focus().is_none());
    }

    #[test]
    fn test_reveal_arrives_through_advance() {
        let mut s = scene();
        let mut events = Vec::new();
        let (a, _) = first_two_ids(&s);
        let input = FrameInput::default();

        s.select(Some(a), 0.0, &mut events);
        events.clear();

        s.advance(REVEAL_DELAY / 2.0, 0.016, &input, &mut events);
        assert!(!events.iter().any(|e| matches!(e, SceneEvent::RevealText(_))));

        s.advance(REVEAL_DELAY + 0.05, 0.016, &input, &mut events);
        assert!(events.iter().any(
            |e| matches!(e, SceneEvent::RevealText(id) if *id == a)
        ));
    }

    #[test]
    fn test_video_item_reveals_video() {
        let mut s = scene();
        let mut events = Vec::new();
        let input = FrameInput::default();

        let video_id = s
            .config()
            .items
            .iter()
            .position(|i| i.video.is_some())
            .map(|i| ItemId(i as u32))
            .expect("sample config has a video item");

        s.select(Some(video_id), 0.0, &mut events);
        events.clear();
        s.advance(REVEAL_DELAY + 0.05, 0.016, &input, &mut events);
        assert!(events
            .iter()
            .any(|e| matches!(e, SceneEvent::RevealVideo(id, _) if *id == video_id)));
    }

    #[test]
    fn test_route_slug_selects_and_unknown_slug_deselects() {
        let mut s = scene();
        let mut events = Vec::new();
        let slug = s.config().items[0].slug.clone();

        s.select_slug(Some(&slug), 0.0, &mut events);
        assert_eq!(s.selection.active(), Some(ItemId(0)));

        events.clear();
        s.select_slug(Some("no-such-item"), 1.0, &mut events);
        assert_eq!(s.selection.active(), None);
        assert!(events.contains(&SceneEvent::SelectionChanged(None)));
    }

    #[test]
    fn test_storm_flows_through_scene_events() {
        let mut s = scene();
        let mut events = Vec::new();
        let input = FrameInput::default();

        s.advance(STORM_START_DELAY + STORM_TOTAL_DURATION + 1.0, 0.016, &input, &mut events);
        let spawned = events
            .iter()
            .filter(|e| matches!(e, SceneEvent::StormSpawned(_)))
            .count();
        assert_eq!(spawned as u32, STORM_TOTAL_SPAWNS);

        events.clear();
        s.advance(STORM_START_DELAY + STORM_TOTAL_DURATION + 2.0, 0.016, &input, &mut events);
        assert!(events.contains(&SceneEvent::StormCleared));
    }

    #[test]
    fn test_miner_dismiss_honors_evasion_via_scene() {
        let mut s = scene();
        let mut events = Vec::new();
        let (a, b) = first_two_ids(&s);

        s.select(Some(a), 0.0, &mut events);
        s.select(Some(b), 1.0, &mut events);
        assert!(s.miner.visible());

        assert!(!s.dismiss_miner(2.0, &mut events));
        assert!(s.dismiss_miner(1.0 + MINER_EVADE_SECS + 0.1, &mut events));
        assert!(!s.miner.visible());
    }

    #[test]
    fn test_frame_scales_track_active_and_hover() {
        let mut s = scene();
        let mut events = Vec::new();
        let input = FrameInput::default();

        s.select(Some(ItemId(0)), 0.0, &mut events);
        s.set_hover(Some(ItemId(1)));

        // Four seconds is well past the smoothing window
        for i in 0..240 {
            s.advance(i as f64 / 60.0, 1.0 / 60.0, &input, &mut events);
        }
        let scales = s.frame_scales();
        assert!((scales[0] - FRAME_SCALE_ACTIVE).abs() < 1e-2, "active: {}", scales[0]);
        assert!((scales[1] - FRAME_SCALE_HOVER).abs() < 1e-2, "hover: {}", scales[1]);
        assert!((scales[2] - 1.0).abs() < 1e-2, "rest: {}", scales[2]);
    }

    #[test]
    fn test_frame_scales_relax_back_to_rest() {
        let mut s = scene();
        let mut events = Vec::new();
        let input = FrameInput::default();

        s.select(Some(ItemId(0)), 0.0, &mut events);
        s.set_hover(Some(ItemId(1)));
        for i in 0..120 {
            s.advance(i as f64 / 60.0, 1.0 / 60.0, &input, &mut events);
        }
        assert!(s.frame_scales()[0] > 1.1);

        s.select(None, 2.0, &mut events);
        s.set_hover(None);
        for i in 120..360 {
            s.advance(i as f64 / 60.0, 1.0 / 60.0, &input, &mut events);
        }
        for (i, scale) in s.frame_scales().iter().enumerate() {
            assert!((scale - 1.0).abs() < 1e-2, "item {i} stuck at {scale}");
        }
    }

    #[test]
    fn test_hover_with_unknown_id_is_cleared() {
        let mut s = scene();
        let mut events = Vec::new();
        let input = FrameInput::default();

        s.set_hover(Some(ItemId(99)));
        for i in 0..120 {
            s.advance(i as f64 / 60.0, 1.0 / 60.0, &input, &mut events);
        }
        for scale in s.frame_scales() {
            assert!((scale - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_frame_advance_is_deterministic() {
        let input = FrameInput::default();
        let mut ea = Vec::new();
        let mut eb = Vec::new();

        let mut run = |events: &mut Vec<SceneEvent>| {
            let mut s = Scene::new(GalleryConfig::sample(), 42);
            let mut t = 0.0;
            while t < 45.0 {
                s.advance(t, 0.05, &input, events);
                t += 0.05;
            }
            s.camera_pose()
        };
        let pa = run(&mut ea);
        let pb = run(&mut eb);
        assert_eq!(ea, eb);
        assert_eq!(pa.position, pb.position);
    }
}
