//! Per-collection pose animation
//!
//! Every update is a pure function of (seed, elapsed): no allocation, no
//! dependency between entities, safe to run in any order. Each collection
//! carries its own time scale so the meadow doesn't move in lockstep.

use glam::{EulerRot, Quat, Vec3};

use crate::consts::CLOUD_SPAN;
use crate::wrap_span;

use super::scenery::{
    CloudLayer, CritterKind, CritterTroupe, FlowerBed, GrassField, Scenery, SunTrack, TreeStand,
    WaterSurface,
};

impl GrassField {
    /// Wind sway: rotation only, blades stay rooted
    pub fn advance(&mut self, elapsed: f64) {
        let t = (elapsed * 0.7) as f32;
        for (seed, pose) in self.seeds.iter().zip(self.poses.iter_mut()) {
            let sway_x = (t * 1.2 + seed.phase).sin() * 0.22;
            let sway_z = (t * 0.9 + seed.phase).cos() * 0.16;
            pose.position = Vec3::new(seed.x, -0.5, seed.z);
            pose.rotation = Quat::from_euler(EulerRot::YXZ, seed.yaw, sway_x, sway_z);
        }
    }
}

impl TreeStand {
    pub fn advance(&mut self, elapsed: f64) {
        let t = (elapsed * 0.5) as f32;
        for (seed, pose) in self.seeds.iter().zip(self.poses.iter_mut()) {
            pose.position = Vec3::new(seed.x, -0.5, seed.z);
            pose.rotation = Quat::from_rotation_z((t + seed.phase).sin() * 0.1);
        }
    }
}

impl FlowerBed {
    /// Gentle bob plus sway; amplitudes small enough not to uproot anything
    pub fn advance(&mut self, elapsed: f64) {
        let t = (elapsed * 0.7) as f32;
        for (seed, pose) in self.seeds.iter().zip(self.poses.iter_mut()) {
            let bob = (t * 2.0 + seed.phase).sin() * 0.04;
            pose.position = Vec3::new(seed.x, -0.35 + bob, seed.z);
            pose.rotation = Quat::from_rotation_z((t * 1.3 + seed.phase).sin() * 0.08);
        }
    }
}

impl CloudLayer {
    /// Lateral drift with seamless wraparound across the fixed span
    pub fn advance(&mut self, elapsed: f64) {
        let t = (elapsed * 0.5) as f32;
        for (seed, pose) in self.seeds.iter().zip(self.poses.iter_mut()) {
            let x = wrap_span(seed.base_x + t * seed.speed, CLOUD_SPAN);
            let y = seed.y + (t * 0.7 + seed.phase).sin() * 0.3;
            pose.position = Vec3::new(x, y, seed.z);
            pose.rotation = Quat::IDENTITY;
        }
    }
}

impl CritterTroupe {
    pub fn advance(&mut self, elapsed: f64) {
        for (seed, pose) in self.seeds.iter().zip(self.poses.iter_mut()) {
            match seed.kind {
                CritterKind::Cat => {
                    let t = (elapsed * 0.6) as f32;
                    let angle = t * seed.orbit_rate + seed.phase;
                    pose.position = Vec3::new(
                        seed.anchor.x + angle.cos() * seed.orbit_radius,
                        seed.anchor.y + (t * 2.0 + seed.phase).sin() * 0.1,
                        seed.anchor.z + angle.sin() * seed.orbit_radius,
                    );
                    pose.rotation = Quat::from_rotation_y((t * 1.8 + seed.phase).sin() * 0.8);
                }
                CritterKind::Frog => {
                    let t = (elapsed * 0.8) as f32;
                    pose.position = Vec3::new(
                        seed.anchor.x,
                        seed.anchor.y + (t * 1.4 + seed.phase).sin() * 0.03,
                        seed.anchor.z,
                    );
                    pose.rotation = Quat::from_rotation_y((t * 0.8 + seed.phase).sin() * 0.5);
                }
                CritterKind::Duck => {
                    let t = (elapsed * 0.4) as f32;
                    let angle = t * seed.orbit_rate + seed.phase;
                    pose.position = Vec3::new(
                        seed.anchor.x + angle.cos() * seed.orbit_radius,
                        seed.anchor.y + (t * 1.2 + seed.phase).sin() * 0.02,
                        seed.anchor.z + angle.sin() * seed.orbit_radius,
                    );
                    // Heading follows the swim path
                    pose.rotation = Quat::from_rotation_y(-angle + std::f32::consts::FRAC_PI_2);
                }
            }
        }
    }
}

impl WaterSurface {
    pub fn advance(&mut self, elapsed: f64) {
        let t = (elapsed * 0.6) as f32;
        self.pose.position = Vec3::new(self.base.x, self.base.y + 0.02 + t.sin() * 0.03, self.base.z);
        self.pose.rotation = Quat::IDENTITY;
    }
}

impl SunTrack {
    /// Wide slow orbit; drives the host's directional light
    pub fn advance(&mut self, elapsed: f64) {
        let t = (elapsed * 0.25) as f32;
        self.pose.position = Vec3::new(
            t.cos() * self.radius,
            18.0 + (t * 2.0).sin() * 2.0,
            t.sin() * self.radius,
        );
        self.pose.rotation = Quat::IDENTITY;
    }
}

impl Scenery {
    /// Recompute every pose for the given elapsed time, in place
    pub fn advance(&mut self, elapsed: f64) {
        self.grass.advance(elapsed);
        self.trees.advance(elapsed);
        self.flowers.advance(elapsed);
        self.clouds.advance(elapsed);
        self.critters.advance(elapsed);
        self.water.advance(elapsed);
        self.sun.advance(elapsed);
    }
}
