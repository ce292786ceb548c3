//! Camera choreographer
//!
//! Derives a target pose from the selection state and pointer, then advances
//! the live camera toward it with critically damped smoothing. The live pose
//! is written here and nowhere else; it only teleports at construction.

use glam::{EulerRot, Quat, Vec2, Vec3};

use crate::config::GalleryItem;
use crate::consts::*;
use crate::damp_factor;

use super::scenery::Pose;

pub struct CameraRig {
    pub position: Vec3,
    pub rotation: Quat,
    /// Yaw of the whole frame ring; drifts while nothing is selected so the
    /// gallery rotates past the idle camera
    pub gallery_yaw: f32,
    /// Viewing pose captured at the moment of selection, held constant
    focus: Option<Pose>,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraRig {
    pub fn new() -> Self {
        Self {
            position: Vec3::from(OVERVIEW_POS),
            rotation: Quat::IDENTITY,
            gallery_yaw: 0.0,
            focus: None,
        }
    }

    /// Capture the item's viewing pose in world space, at the ring's current
    /// yaw. Not re-derived afterwards: the shot stays planted even though the
    /// idle spin resumes later.
    pub fn focus_item(&mut self, item: &GalleryItem) {
        let spin = Quat::from_rotation_y(self.gallery_yaw);
        let frame_rot = spin * Quat::from_rotation_y(item.yaw);
        let frame_pos = spin * Vec3::from(item.position);
        self.focus = Some(Pose {
            position: frame_pos + frame_rot * Vec3::from(VIEWING_OFFSET),
            rotation: frame_rot,
        });
    }

    pub fn clear_focus(&mut self) {
        self.focus = None;
    }

    pub fn focus(&self) -> Option<&Pose> {
        self.focus.as_ref()
    }

    /// Target pose for the current state: overview + drone orbit when idle,
    /// captured viewing pose + liveliness bob when focused, pointer parallax
    /// on top of either.
    pub fn target(&self, elapsed: f64, pointer_ndc: Vec2) -> Pose {
        let t = elapsed as f32;

        let (mut position, rotation) = match &self.focus {
            None => {
                let mut p = Vec3::from(OVERVIEW_POS);
                p.x += (t * IDLE_ORBIT_RATE).sin() * IDLE_ORBIT_RADIUS;
                p.z += (t * IDLE_ORBIT_RATE).cos() * IDLE_ORBIT_RADIUS * 0.6;
                (p, Quat::IDENTITY)
            }
            Some(focus) => (focus.position, focus.rotation),
        };
        position.y += match self.focus {
            None => (t * IDLE_BOB_RATE).sin() * IDLE_BOB_AMPLITUDE,
            Some(_) => (t * FOCUS_BOB_RATE).sin() * FOCUS_BOB_AMPLITUDE,
        };

        // Parallax tilt from the pointer, clamped to the small cap
        let pitch = (pointer_ndc.y * MAX_POINTER_TILT).clamp(-MAX_POINTER_TILT, MAX_POINTER_TILT);
        let yaw = (-pointer_ndc.x * MAX_POINTER_TILT).clamp(-MAX_POINTER_TILT, MAX_POINTER_TILT);
        let tilt = Quat::from_euler(EulerRot::XYZ, pitch, yaw, 0.0);

        Pose {
            position,
            rotation: rotation * tilt,
        }
    }

    /// Advance the live pose one frame toward the target. The damping factor
    /// stays below 1, so the remaining distance shrinks but never flips sign.
    pub fn advance(&mut self, elapsed: f64, dt: f32, pointer_ndc: Vec2) {
        let target = self.target(elapsed, pointer_ndc);
        let k = damp_factor(CAMERA_SMOOTH_TIME, dt);

        self.position = self.position.lerp(target.position, k);
        self.rotation = self.rotation.slerp(target.rotation, k).normalize();

        if self.focus.is_none() {
            self.gallery_yaw += dt * GALLERY_SPIN_RATE;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GalleryConfig;

    #[test]
    fn test_converges_monotonically_without_overshoot() {
        let config = GalleryConfig::sample();
        let mut rig = CameraRig::new();
        rig.focus_item(&config.items[0]);

        // Hold elapsed constant so the target is fixed
        let target = rig.target(2.0, Vec2::ZERO);
        let mut prev_dist = rig.position.distance(target.position);
        assert!(prev_dist > 0.1);

        for _ in 0..600 {
            rig.advance(2.0, 1.0 / 60.0, Vec2::ZERO);
            let dist = rig.position.distance(target.position);
            assert!(dist <= prev_dist + 1e-6, "distance increased: {dist} > {prev_dist}");
            prev_dist = dist;
        }
        assert!(prev_dist < 1e-3, "did not converge: {prev_dist}");
    }

    #[test]
    fn test_convergence_is_framerate_independent() {
        let config = GalleryConfig::sample();

        let mut coarse = CameraRig::new();
        coarse.focus_item(&config.items[0]);
        let mut fine = CameraRig::new();
        fine.focus_item(&config.items[0]);

        // One second of simulated smoothing at 30 vs 120 Hz
        for _ in 0..30 {
            coarse.advance(2.0, 1.0 / 30.0, Vec2::ZERO);
        }
        for _ in 0..120 {
            fine.advance(2.0, 1.0 / 120.0, Vec2::ZERO);
        }
        assert!(coarse.position.distance(fine.position) < 0.05);
    }

    #[test]
    fn test_focus_pose_captured_not_rederived() {
        let config = GalleryConfig::sample();
        let mut rig = CameraRig::new();
        rig.gallery_yaw = 0.7;
        rig.focus_item(&config.items[3]);

        let captured = *rig.focus().unwrap();
        rig.gallery_yaw = 2.0;
        assert_eq!(*rig.focus().unwrap(), captured);
    }

    #[test]
    fn test_idle_spin_stops_while_focused() {
        let config = GalleryConfig::sample();
        let mut rig = CameraRig::new();

        rig.advance(0.0, 0.1, Vec2::ZERO);
        assert!(rig.gallery_yaw > 0.0);

        let yaw = rig.gallery_yaw;
        rig.focus_item(&config.items[0]);
        rig.advance(0.1, 0.1, Vec2::ZERO);
        assert_eq!(rig.gallery_yaw, yaw);

        rig.clear_focus();
        rig.advance(0.2, 0.1, Vec2::ZERO);
        assert!(rig.gallery_yaw > yaw);
    }

    #[test]
    fn test_pointer_tilt_is_clamped() {
        let rig = CameraRig::new();
        // Pointer far outside the viewport must not exceed the tilt cap
        let wild = rig.target(0.0, Vec2::new(50.0, -50.0));
        let capped = rig.target(0.0, Vec2::new(1.0, -1.0));
        let dot = wild.rotation.dot(capped.rotation).abs();
        assert!(dot > 0.9999, "tilt not clamped: dot={dot}");
    }
}
