//! Popup storm scheduler
//!
//! A fixed delay after scene start, spawns a bounded flood of overlay popups
//! whose inter-arrival times shrink geometrically: slow at first, then an
//! avalanche, then everything vanishes in a single atomic clear. Runs exactly
//! once per scene; only the host decides how the artifacts look.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;

/// Where the storm currently is in its script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StormPhase {
    /// Waiting for the start delay (or finished, if the latch is spent)
    Dormant,
    /// Spawning popups at an accelerating rate
    Spawning,
    /// All spawns done; waiting out the grace period before the clear
    Draining,
}

/// One transient overlay popup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StormArtifact {
    pub id: u32,
    /// Viewport position in percent
    pub x: f32,
    pub y: f32,
    /// Index into the configured popup image pool
    pub image: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StormEvent {
    /// A popup appeared; the host renders it and fires one overlapping sound
    Spawned(StormArtifact),
    /// The storm ended; every artifact disappears in the same frame
    Cleared,
}

pub struct Storm {
    phase: StormPhase,
    /// Arm deadline; the arm is one-shot, never re-set
    start_at: f64,
    armed_once: bool,
    next_spawn_at: f64,
    spawn_index: u32,
    /// First inter-spawn delay; the i-th delay is `base * decay^i`
    base_delay: f64,
    clear_at: f64,
    population: Vec<StormArtifact>,
    rng: Pcg32,
    image_pool: u32,
}

impl Storm {
    pub fn new(seed: u64, image_pool: u32) -> Self {
        // Geometric series: base * (1 - d^n) / (1 - d) == total duration
        let base_delay = STORM_TOTAL_DURATION * (1.0 - STORM_DECAY)
            / (1.0 - STORM_DECAY.powi(STORM_TOTAL_SPAWNS as i32));

        Self {
            phase: StormPhase::Dormant,
            start_at: STORM_START_DELAY,
            armed_once: false,
            next_spawn_at: 0.0,
            spawn_index: 0,
            base_delay,
            clear_at: 0.0,
            population: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            image_pool: image_pool.max(1),
        }
    }

    pub fn phase(&self) -> StormPhase {
        self.phase
    }

    /// Live artifacts, oldest first, for the host to render
    pub fn population(&self) -> &[StormArtifact] {
        &self.population
    }

    /// Check deadlines against the frame clock. A late frame catches up by
    /// emitting every spawn whose deadline has passed.
    pub fn advance(&mut self, now: f64, events: &mut Vec<StormEvent>) {
        match self.phase {
            StormPhase::Dormant => {
                if self.armed_once || now < self.start_at {
                    return;
                }
                self.armed_once = true;
                self.phase = StormPhase::Spawning;
                self.next_spawn_at = self.start_at + self.base_delay;
                self.population.reserve(STORM_TOTAL_SPAWNS as usize);
                log::info!("popup storm armed at t={now:.1}s");
                // Fall through to spawning on the next frame; nothing is due
                // before the first delay anyway
                self.spawn_due(now, events);
            }
            StormPhase::Spawning => self.spawn_due(now, events),
            StormPhase::Draining => {
                if now >= self.clear_at {
                    // Synchronized disappearance, never a partial fade
                    self.population.clear();
                    self.phase = StormPhase::Dormant;
                    events.push(StormEvent::Cleared);
                    log::info!("popup storm cleared after {} spawns", self.spawn_index);
                }
            }
        }
    }

    fn spawn_due(&mut self, now: f64, events: &mut Vec<StormEvent>) {
        let lo = STORM_MARGIN_PCT;
        let hi = 100.0 - STORM_MARGIN_PCT;

        while self.spawn_index < STORM_TOTAL_SPAWNS && now >= self.next_spawn_at {
            let artifact = StormArtifact {
                id: self.spawn_index,
                x: self.rng.random_range(lo..hi),
                y: self.rng.random_range(lo..hi),
                image: self.rng.random_range(0..self.image_pool),
            };
            self.population.push(artifact);
            events.push(StormEvent::Spawned(artifact));

            self.spawn_index += 1;
            self.next_spawn_at += self.base_delay * STORM_DECAY.powi(self.spawn_index as i32);
        }

        if self.spawn_index == STORM_TOTAL_SPAWNS {
            self.phase = StormPhase::Draining;
            self.clear_at = self.next_spawn_at + STORM_GRACE;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_series_sums_to_total_duration() {
        let base = STORM_TOTAL_DURATION * (1.0 - STORM_DECAY)
            / (1.0 - STORM_DECAY.powi(STORM_TOTAL_SPAWNS as i32));
        let sum: f64 = (0..STORM_TOTAL_SPAWNS)
            .map(|i| base * STORM_DECAY.powi(i as i32))
            .sum();
        assert!(
            (sum - STORM_TOTAL_DURATION).abs() < 0.01,
            "delay sum {sum} != {STORM_TOTAL_DURATION}"
        );
    }

    #[test]
    fn test_dormant_until_start_delay() {
        let mut storm = Storm::new(1, 8);
        let mut events = Vec::new();
        storm.advance(STORM_START_DELAY - 0.001, &mut events);
        assert!(events.is_empty());
        assert_eq!(storm.phase(), StormPhase::Dormant);
    }

    #[test]
    fn test_exactly_total_spawns_then_atomic_clear() {
        let mut storm = Storm::new(1, 8);
        let mut events = Vec::new();

        // Drive in 10ms steps well past the whole sequence
        let mut now = STORM_START_DELAY;
        let mut spawned = 0u32;
        let mut cleared = 0u32;
        while now < STORM_START_DELAY + STORM_TOTAL_DURATION + 1.0 {
            storm.advance(now, &mut events);
            for ev in events.drain(..) {
                match ev {
                    StormEvent::Spawned(_) => spawned += 1,
                    StormEvent::Cleared => {
                        cleared += 1;
                        assert_eq!(spawned, STORM_TOTAL_SPAWNS, "cleared early");
                        assert!(storm.population().is_empty());
                    }
                }
            }
            now += 0.01;
        }
        assert_eq!(spawned, STORM_TOTAL_SPAWNS);
        assert_eq!(cleared, 1);
        assert_eq!(storm.phase(), StormPhase::Dormant);
    }

    #[test]
    fn test_population_tracks_spawn_count_until_clear() {
        let mut storm = Storm::new(2, 8);
        let mut events = Vec::new();

        storm.advance(STORM_START_DELAY + STORM_TOTAL_DURATION / 2.0, &mut events);
        let spawned = events
            .iter()
            .filter(|e| matches!(e, StormEvent::Spawned(_)))
            .count();
        assert!(spawned > 0 && (spawned as u32) < STORM_TOTAL_SPAWNS);
        assert_eq!(storm.population().len(), spawned);
    }

    #[test]
    fn test_spawns_accelerate() {
        // Inter-spawn delays strictly shrink
        let base = 1.0;
        let mut prev = f64::MAX;
        for i in 0..10 {
            let delay = base * STORM_DECAY.powi(i);
            assert!(delay < prev);
            prev = delay;
        }
    }

    #[test]
    fn test_storm_never_rearms() {
        let mut storm = Storm::new(3, 8);
        let mut events = Vec::new();

        // Run the full sequence in one late catch-up frame plus the drain
        storm.advance(STORM_START_DELAY + STORM_TOTAL_DURATION + 1.0, &mut events);
        storm.advance(STORM_START_DELAY + STORM_TOTAL_DURATION + 2.0, &mut events);
        assert!(events.contains(&StormEvent::Cleared));

        events.clear();
        storm.advance(STORM_START_DELAY + 1000.0, &mut events);
        assert!(events.is_empty());
        assert!(storm.population().is_empty());
    }

    #[test]
    fn test_spawn_positions_respect_margin() {
        let mut storm = Storm::new(4, 8);
        let mut events = Vec::new();
        storm.advance(STORM_START_DELAY + STORM_TOTAL_DURATION, &mut events);

        for ev in &events {
            if let StormEvent::Spawned(a) = ev {
                assert!(a.x >= STORM_MARGIN_PCT && a.x < 100.0 - STORM_MARGIN_PCT);
                assert!(a.y >= STORM_MARGIN_PCT && a.y < 100.0 - STORM_MARGIN_PCT);
                assert!(a.image < 8);
            }
        }
    }

    #[test]
    fn test_deterministic_for_same_seed() {
        let mut a = Storm::new(9, 8);
        let mut b = Storm::new(9, 8);
        let mut ea = Vec::new();
        let mut eb = Vec::new();
        a.advance(STORM_START_DELAY + 2.0, &mut ea);
        b.advance(STORM_START_DELAY + 2.0, &mut eb);
        assert_eq!(ea, eb);
    }
}
