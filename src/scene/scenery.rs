//! Procedural scenery seeds and pose arenas
//!
//! Each collection owns an array of immutable seeds (randomized once at
//! generation) and a parallel array of poses recomputed in place every frame.
//! Nothing here is created or destroyed after `Scenery::generate`.

use glam::{Quat, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;

/// A position + orientation, recomputed each frame from seed + elapsed time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };
}

/// One clump of grass blades
#[derive(Debug, Clone, Copy)]
pub struct TuftSeed {
    pub x: f32,
    pub z: f32,
    pub height: f32,
    pub width: f32,
    pub phase: f32,
    pub yaw: f32,
    pub hue_variant: u8,
}

#[derive(Debug, Clone, Copy)]
pub struct TreeSeed {
    pub x: f32,
    pub z: f32,
    pub scale: f32,
    pub phase: f32,
    pub variant: u8,
}

#[derive(Debug, Clone, Copy)]
pub struct FlowerSeed {
    pub x: f32,
    pub z: f32,
    pub phase: f32,
    pub color_variant: u8,
}

/// Clouds drift along x and wrap across [`CLOUD_SPAN`]
#[derive(Debug, Clone, Copy)]
pub struct CloudSeed {
    pub base_x: f32,
    pub y: f32,
    pub z: f32,
    pub speed: f32,
    pub scale: f32,
    pub phase: f32,
}

/// Hand-placed small animals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CritterKind {
    /// Paces a small circle around its anchor, bobbing and swinging its head
    Cat,
    /// Sits still, bobbing and swaying near the pond edge
    Frog,
    /// Swims a circle on the pond, heading along its path
    Duck,
}

#[derive(Debug, Clone, Copy)]
pub struct CritterSeed {
    pub kind: CritterKind,
    pub anchor: Vec3,
    pub orbit_radius: f32,
    pub orbit_rate: f32,
    pub phase: f32,
    pub variant: u8,
}

pub struct GrassField {
    pub seeds: Vec<TuftSeed>,
    pub poses: Vec<Pose>,
}

pub struct TreeStand {
    pub seeds: Vec<TreeSeed>,
    pub poses: Vec<Pose>,
}

pub struct FlowerBed {
    pub seeds: Vec<FlowerSeed>,
    pub poses: Vec<Pose>,
}

pub struct CloudLayer {
    pub seeds: Vec<CloudSeed>,
    pub poses: Vec<Pose>,
}

pub struct CritterTroupe {
    pub seeds: Vec<CritterSeed>,
    pub poses: Vec<Pose>,
}

/// The pond surface; a single gently bobbing plane
pub struct WaterSurface {
    pub base: Vec3,
    pub pose: Pose,
}

/// The sun orbits the whole scene on a wide circle
pub struct SunTrack {
    pub radius: f32,
    pub pose: Pose,
}

/// All procedural collections, generated once per scene
pub struct Scenery {
    pub grass: GrassField,
    pub trees: TreeStand,
    pub flowers: FlowerBed,
    pub clouds: CloudLayer,
    pub critters: CritterTroupe,
    pub water: WaterSurface,
    pub sun: SunTrack,
}

impl Scenery {
    /// Generate every seed from one master seed. Same seed, same meadow.
    pub fn generate(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let tau = std::f32::consts::TAU;

        let grass_seeds: Vec<TuftSeed> = (0..GRASS_TUFTS)
            .map(|_| TuftSeed {
                x: rng.random_range(-16.0..16.0),
                z: rng.random_range(-16.0..16.0),
                height: rng.random_range(0.7..2.0),
                width: rng.random_range(0.07..0.12),
                phase: rng.random_range(0.0..tau),
                yaw: rng.random_range(0.0..tau),
                hue_variant: rng.random_range(0..3u8),
            })
            .collect();

        let tree_seeds: Vec<TreeSeed> = (0..TREES)
            .map(|i| TreeSeed {
                x: rng.random_range(-25.0..25.0),
                z: rng.random_range(-25.0..25.0),
                scale: rng.random_range(1.2..2.5),
                phase: rng.random_range(0.0..tau),
                variant: (i % 4) as u8,
            })
            .collect();

        let flower_seeds: Vec<FlowerSeed> = (0..FLOWERS)
            .map(|_| FlowerSeed {
                x: rng.random_range(-9.0..9.0),
                z: rng.random_range(-9.0..9.0),
                phase: rng.random_range(0.0..tau),
                color_variant: rng.random_range(0..4u8),
            })
            .collect();

        let cloud_seeds: Vec<CloudSeed> = (0..CLOUDS)
            .map(|_| CloudSeed {
                base_x: rng.random_range(-30.0..30.0),
                y: rng.random_range(10.0..16.0),
                z: rng.random_range(-40.0..-20.0),
                speed: rng.random_range(0.6..1.2),
                scale: rng.random_range(2.0..4.0),
                phase: rng.random_range(0.0..tau),
            })
            .collect();

        let critter_seeds = Self::place_critters();

        let water_base = Vec3::new(POND_CENTER.0, -0.5, POND_CENTER.1);

        Self {
            grass: GrassField {
                poses: vec![Pose::IDENTITY; grass_seeds.len()],
                seeds: grass_seeds,
            },
            trees: TreeStand {
                poses: vec![Pose::IDENTITY; tree_seeds.len()],
                seeds: tree_seeds,
            },
            flowers: FlowerBed {
                poses: vec![Pose::IDENTITY; flower_seeds.len()],
                seeds: flower_seeds,
            },
            clouds: CloudLayer {
                poses: vec![Pose::IDENTITY; cloud_seeds.len()],
                seeds: cloud_seeds,
            },
            critters: CritterTroupe {
                poses: vec![Pose::IDENTITY; critter_seeds.len()],
                seeds: critter_seeds,
            },
            water: WaterSurface {
                base: water_base,
                pose: Pose {
                    position: water_base,
                    rotation: Quat::IDENTITY,
                },
            },
            sun: SunTrack {
                radius: 30.0,
                pose: Pose::IDENTITY,
            },
        }
    }

    /// The animals are art-directed, not random: cats near the frames,
    /// frogs at the pond edge, ducks on the water.
    fn place_critters() -> Vec<CritterSeed> {
        use CritterKind::*;
        let (px, pz) = POND_CENTER;
        let mut seeds = Vec::with_capacity(9);

        let cats = [(-2.2, 2.4), (2.5, 1.8), (-1.5, -1.8), (1.2, -2.3)];
        for (i, (x, z)) in cats.into_iter().enumerate() {
            seeds.push(CritterSeed {
                kind: Cat,
                anchor: Vec3::new(x, -0.35, z),
                orbit_radius: 0.4,
                orbit_rate: 1.0,
                phase: i as f32,
                variant: i as u8,
            });
        }

        let frogs = [(2.1, -2.1, 0.0), (3.6, -3.8, 1.3), (3.4, -2.3, 2.2)];
        for (i, (x, z, phase)) in frogs.into_iter().enumerate() {
            seeds.push(CritterSeed {
                kind: Frog,
                anchor: Vec3::new(x, -0.46, z),
                orbit_radius: 0.0,
                orbit_rate: 0.0,
                phase,
                variant: i as u8,
            });
        }

        let ducks = [(1.1, 0.4, 0.0), (1.6, 0.35, std::f32::consts::PI)];
        for (i, (radius, rate, phase)) in ducks.into_iter().enumerate() {
            seeds.push(CritterSeed {
                kind: Duck,
                anchor: Vec3::new(px, -0.46, pz),
                orbit_radius: radius,
                orbit_rate: rate,
                phase,
                variant: i as u8,
            });
        }

        seeds
    }

    /// Total animated entity count (for the host's instance buffers)
    pub fn entity_count(&self) -> usize {
        self.grass.seeds.len()
            + self.trees.seeds.len()
            + self.flowers.seeds.len()
            + self.clouds.seeds.len()
            + self.critters.seeds.len()
            + 2 // water + sun
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_counts() {
        let scenery = Scenery::generate(7);
        assert_eq!(scenery.grass.seeds.len(), GRASS_TUFTS);
        assert_eq!(scenery.trees.seeds.len(), TREES);
        assert_eq!(scenery.flowers.seeds.len(), FLOWERS);
        assert_eq!(scenery.clouds.seeds.len(), CLOUDS);
        assert_eq!(scenery.critters.seeds.len(), 9);
        assert_eq!(scenery.grass.poses.len(), scenery.grass.seeds.len());
        assert_eq!(
            scenery.entity_count(),
            GRASS_TUFTS + TREES + FLOWERS + CLOUDS + 9 + 2
        );
    }

    #[test]
    fn test_generate_deterministic() {
        let a = Scenery::generate(42);
        let b = Scenery::generate(42);
        for (sa, sb) in a.grass.seeds.iter().zip(&b.grass.seeds) {
            assert_eq!(sa.x, sb.x);
            assert_eq!(sa.phase, sb.phase);
            assert_eq!(sa.hue_variant, sb.hue_variant);
        }
        for (ca, cb) in a.clouds.seeds.iter().zip(&b.clouds.seeds) {
            assert_eq!(ca.base_x, cb.base_x);
            assert_eq!(ca.speed, cb.speed);
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = Scenery::generate(1);
        let b = Scenery::generate(2);
        let same = a
            .grass
            .seeds
            .iter()
            .zip(&b.grass.seeds)
            .all(|(sa, sb)| sa.x == sb.x);
        assert!(!same);
    }

    #[test]
    fn test_tree_variants_cycle() {
        let scenery = Scenery::generate(3);
        for (i, tree) in scenery.trees.seeds.iter().enumerate() {
            assert_eq!(tree.variant, (i % 4) as u8);
        }
    }
}
