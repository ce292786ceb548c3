//! Deterministic choreography module
//!
//! Everything that moves lives here. This module must stay pure and
//! deterministic:
//! - Driven only by the host-supplied clock (elapsed seconds + frame delta)
//! - Seeded RNG only
//! - Timers are explicit deadlines in simulated time, checked per frame
//! - No rendering or platform dependencies

pub mod animate;
pub mod camera;
pub mod miner;
pub mod scenery;
pub mod selection;
pub mod storm;
pub mod tick;

pub use camera::CameraRig;
pub use miner::Miner;
pub use scenery::{Pose, Scenery};
pub use selection::{RevealKind, SelectionState};
pub use storm::{Storm, StormArtifact, StormPhase};
pub use tick::{FrameInput, Scene, SceneEvent};
