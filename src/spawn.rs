//! Spawn manager: speed-fair obstacle cadence, score-gated type mix, clouds.

use rand::Rng;
use rand_pcg::Pcg32;

use crate::game::{AltitudeBand, Cloud, GameState, Obstacle, FIELD_WIDTH};

/// Threshold to the next spawn is drawn from [speed * 50, speed * 100],
/// so reaction time stays roughly constant as the world speeds up.
pub const GAP_MIN_FACTOR: f32 = 50.0;
pub const GAP_MAX_FACTOR: f32 = 100.0;

/// Ground obstacle size ranges, drawn per instance (not per cluster).
pub const GROUND_WIDTH_MIN: f32 = 20.0;
pub const GROUND_WIDTH_MAX: f32 = 45.0;
pub const GROUND_HEIGHT_MIN: f32 = 30.0;
pub const GROUND_HEIGHT_MAX: f32 = 70.0;

/// Space between cluster members; one wide hazard, not several.
pub const CLUSTER_GAP: f32 = 6.0;

/// Roll thresholds and score gates for the type mix. Checked in this
/// order; a failed score gate falls through to the next check rather
/// than retrying the draw. Keep the order as-is: reordering shifts the
/// effective branch probabilities.
pub const AERIAL_ROLL: f32 = 0.9;
pub const AERIAL_SCORE_GATE: u32 = 500;
pub const TRIPLE_ROLL: f32 = 0.8;
pub const TRIPLE_SCORE_GATE: u32 = 1000;
pub const DOUBLE_ROLL: f32 = 0.6;
pub const DOUBLE_SCORE_GATE: u32 = 300;

/// One cloud every this many ticks, at a random sky altitude.
pub const CLOUD_INTERVAL_TICKS: u64 = 150;
const CLOUD_MIN_Y: f32 = 40.0;
const CLOUD_MAX_Y: f32 = 220.0;

/// What a single spawn event produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnKind {
    Aerial,
    /// 1 to 3 adjacent ground obstacles.
    Cluster(u8),
}

/// Map one uniform roll in [0, 1) to a spawn kind. First match wins.
pub fn choose_kind(roll: f32, score: u32) -> SpawnKind {
    if roll > AERIAL_ROLL && score > AERIAL_SCORE_GATE {
        SpawnKind::Aerial
    } else if roll > TRIPLE_ROLL && score > TRIPLE_SCORE_GATE {
        SpawnKind::Cluster(3)
    } else if roll > DOUBLE_ROLL && score > DOUBLE_SCORE_GATE {
        SpawnKind::Cluster(2)
    } else {
        SpawnKind::Cluster(1)
    }
}

/// Draw a fresh distance-to-next-spawn threshold for the given speed.
pub fn draw_gap_threshold(rng: &mut Pcg32, speed: f32) -> f32 {
    rng.random_range(speed * GAP_MIN_FACTOR..=speed * GAP_MAX_FACTOR)
        .floor()
}

/// Per-tick spawn step: cloud cadence plus the obstacle gap trigger.
pub fn step(state: &mut GameState) {
    if state.tick_count % CLOUD_INTERVAL_TICKS == 0 {
        let y = state.rng.random_range(CLOUD_MIN_Y..=CLOUD_MAX_Y);
        state.clouds.push(Cloud { x: FIELD_WIDTH, y });
    }

    // Gap between the field's right edge and the newest obstacle's
    // trailing edge. No obstacle at all means we are overdue.
    let due = match state.obstacles.last() {
        None => true,
        Some(last) => FIELD_WIDTH - last.trailing_edge() >= state.next_spawn_gap,
    };
    if due {
        let roll: f32 = state.rng.random();
        spawn_with_roll(state, roll);
    }
}

/// Execute one spawn event for an already-drawn roll, then redraw the
/// gap threshold. Split out so tests can force the roll.
pub fn spawn_with_roll(state: &mut GameState, roll: f32) {
    match choose_kind(roll, state.score) {
        SpawnKind::Aerial => {
            let band = AltitudeBand::ALL[state.rng.random_range(0..AltitudeBand::ALL.len())];
            state.obstacles.push(Obstacle::Aerial {
                x: FIELD_WIDTH,
                band,
            });
        }
        SpawnKind::Cluster(count) => {
            let mut x = FIELD_WIDTH;
            for _ in 0..count {
                let width = state.rng.random_range(GROUND_WIDTH_MIN..=GROUND_WIDTH_MAX);
                let height = state.rng.random_range(GROUND_HEIGHT_MIN..=GROUND_HEIGHT_MAX);
                state.obstacles.push(Obstacle::Ground { x, width, height });
                x += width + CLUSTER_GAP;
            }
        }
    }
    state.next_spawn_gap = draw_gap_threshold(&mut state.rng, state.speed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::DEFAULT_START_SPEED;
    use rand::SeedableRng;

    #[test]
    fn test_gap_threshold_within_bounds() {
        let mut rng = Pcg32::seed_from_u64(1);
        for speed in [6.0f32, 8.5, 13.0, 20.0] {
            for _ in 0..200 {
                let gap = draw_gap_threshold(&mut rng, speed);
                assert!(gap >= (speed * GAP_MIN_FACTOR).floor());
                assert!(gap <= speed * GAP_MAX_FACTOR);
                assert_eq!(gap, gap.floor());
            }
        }
    }

    #[test]
    fn test_score_gates_override_roll() {
        // Below every gate, even a 0.95 roll yields the plain single.
        assert_eq!(choose_kind(0.95, 250), SpawnKind::Cluster(1));
        // Past the aerial gate the same roll goes aerial.
        assert_eq!(choose_kind(0.95, 501), SpawnKind::Aerial);
        // 0.85 wants a triple but falls through to double below 1000.
        assert_eq!(choose_kind(0.85, 600), SpawnKind::Cluster(2));
        assert_eq!(choose_kind(0.85, 1500), SpawnKind::Cluster(3));
        // 0.65 wants a double but needs score > 300.
        assert_eq!(choose_kind(0.65, 300), SpawnKind::Cluster(1));
        assert_eq!(choose_kind(0.65, 301), SpawnKind::Cluster(2));
    }

    #[test]
    fn test_failed_gate_falls_through_not_retried() {
        // 0.92 at score 400: the roll clears the aerial threshold but
        // its score gate fails, so evaluation falls through to the
        // triple check (gate also fails) and then the double (passes).
        // No fresh draw anywhere along the chain.
        assert_eq!(choose_kind(0.92, 400), SpawnKind::Cluster(2));
        // Same roll below every gate lands on the plain single.
        assert_eq!(choose_kind(0.92, 250), SpawnKind::Cluster(1));
    }

    #[test]
    fn test_forced_roll_spawns_single_below_gates() {
        let mut state = GameState::new(3, DEFAULT_START_SPEED);
        state.score = 250;
        spawn_with_roll(&mut state, 0.95);
        assert_eq!(state.obstacles.len(), 1);
        assert!(matches!(state.obstacles[0], Obstacle::Ground { .. }));
    }

    #[test]
    fn test_forced_roll_spawns_triple_with_spacing() {
        let mut state = GameState::new(3, DEFAULT_START_SPEED);
        state.score = 1500;
        spawn_with_roll(&mut state, 0.85);
        assert_eq!(state.obstacles.len(), 3);
        assert_eq!(state.obstacles[0].x(), FIELD_WIDTH);
        for pair in state.obstacles.windows(2) {
            assert!((pair[1].x() - pair[0].trailing_edge() - CLUSTER_GAP).abs() < 1e-4);
        }
    }

    #[test]
    fn test_cluster_members_sized_independently() {
        // With per-instance sizing, 3 members all identical would need a
        // vanishingly unlikely triple collision of draws.
        let mut state = GameState::new(11, DEFAULT_START_SPEED);
        state.score = 1500;
        spawn_with_roll(&mut state, 0.85);
        let dims: Vec<(f32, f32)> = state
            .obstacles
            .iter()
            .map(|o| match *o {
                Obstacle::Ground { width, height, .. } => (width, height),
                Obstacle::Aerial { .. } => unreachable!(),
            })
            .collect();
        assert!(dims.windows(2).any(|w| w[0] != w[1]));
        for (width, height) in dims {
            assert!((GROUND_WIDTH_MIN..=GROUND_WIDTH_MAX).contains(&width));
            assert!((GROUND_HEIGHT_MIN..=GROUND_HEIGHT_MAX).contains(&height));
        }
    }

    #[test]
    fn test_threshold_redrawn_after_spawn() {
        let mut state = GameState::new(5, DEFAULT_START_SPEED);
        state.score = 100;
        let mut thresholds = Vec::new();
        for _ in 0..8 {
            spawn_with_roll(&mut state, 0.1);
            thresholds.push(state.next_spawn_gap);
            state.obstacles.clear();
        }
        assert!(thresholds.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn test_cloud_cadence() {
        let mut state = GameState::new(9, DEFAULT_START_SPEED);
        // Park an obstacle near the right edge so the gap trigger stays
        // quiet and only the cloud cadence runs.
        state.next_spawn_gap = 10_000.0;
        state.obstacles.push(Obstacle::Ground {
            x: 750.0,
            width: 30.0,
            height: 40.0,
        });
        for t in 1..=(CLOUD_INTERVAL_TICKS * 3) {
            state.tick_count = t;
            step(&mut state);
        }
        // One cloud each at ticks 150, 300 and 450.
        assert_eq!(state.clouds.len(), 3);
    }

    #[test]
    fn test_spawn_trigger_respects_gap() {
        let mut state = GameState::new(13, DEFAULT_START_SPEED);
        state.next_spawn_gap = 10_000.0; // unreachable: nothing may spawn
        state.obstacles.push(Obstacle::Ground {
            x: 500.0,
            width: 30.0,
            height: 40.0,
        });
        step(&mut state);
        assert_eq!(state.obstacles.len(), 1);

        state.next_spawn_gap = 10.0; // gap (270) is ample: must spawn
        step(&mut state);
        assert!(state.obstacles.len() > 1);
    }
}
