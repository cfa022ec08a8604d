//! Game state: player physics, entities, per-tick simulation.
//!
//! Everything here is deterministic: a seeded RNG, fixed-order updates and
//! no wall-clock reads, so tests can drive the session with virtual ticks.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::collision;
use crate::spawn;

/// Logical field size. The renderer maps this onto terminal cells.
pub const FIELD_WIDTH: f32 = 800.0;
pub const FIELD_HEIGHT: f32 = 400.0;
/// Vertical coordinate of the walking surface.
pub const GROUND_Y: f32 = 360.0;

/// Player geometry (logical units). `x` never changes; the world scrolls.
pub const PLAYER_X: f32 = 60.0;
pub const PLAYER_WIDTH: f32 = 40.0;
pub const STAND_HEIGHT: f32 = 90.0;
pub const DUCK_HEIGHT: f32 = 40.0;

/// Tuned physics constants (per tick / per tick squared).
pub const GRAVITY: f32 = 0.6;
pub const LAUNCH_VELOCITY: f32 = -12.0;

/// Scroll speed starts here and creeps up every tick, forever.
pub const DEFAULT_START_SPEED: f32 = 6.0;
pub const SPEED_STEP: f32 = 0.001;

/// Clouds drift at their own constant pace regardless of scroll speed.
pub const CLOUD_SPEED: f32 = 1.0;
pub const CLOUD_WIDTH: f32 = 70.0;
pub const CLOUD_HEIGHT: f32 = 25.0;

/// Raw score is a tick counter; the HUD shows score / 10.
pub const SCORE_DISPLAY_DIVISOR: u32 = 10;

/// Axis-aligned box in logical field coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// The runner. `y` is the top edge; feet rest on [`GROUND_Y`] when grounded.
#[derive(Debug, Clone)]
pub struct Player {
    pub y: f32,
    pub vy: f32,
    pub height: f32,
    pub airborne: bool,
    pub ducking: bool,
}

impl Player {
    pub fn new() -> Self {
        Self {
            y: GROUND_Y - STAND_HEIGHT,
            vy: 0.0,
            height: STAND_HEIGHT,
            airborne: false,
            ducking: false,
        }
    }

    /// Ground-line top edge for the current duck state.
    fn ground_top(&self) -> f32 {
        GROUND_Y - self.height
    }

    /// Launch into the air. No-op unless grounded and standing: ducking
    /// pins the runner to the ground, and there are no double jumps.
    pub fn jump(&mut self) {
        if self.airborne || self.ducking {
            return;
        }
        self.vy = LAUNCH_VELOCITY;
        self.airborne = true;
    }

    /// Level-triggered duck. Ignored entirely while airborne; on the ground
    /// it swaps the hitbox height and keeps the feet on the ground line.
    pub fn duck(&mut self, pressed: bool) {
        if self.airborne {
            return;
        }
        self.ducking = pressed;
        self.height = if pressed { DUCK_HEIGHT } else { STAND_HEIGHT };
        self.y = self.ground_top();
    }

    /// Explicit Euler step, applied only while airborne.
    fn integrate(&mut self) {
        if !self.airborne {
            return;
        }
        self.vy += GRAVITY;
        self.y += self.vy;
        if self.y >= self.ground_top() {
            self.y = self.ground_top();
            self.vy = 0.0;
            self.airborne = false;
        }
    }

    pub fn hitbox(&self) -> Aabb {
        Aabb {
            x: PLAYER_X,
            y: self.y,
            width: PLAYER_WIDTH,
            height: self.height,
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// Flight altitude for aerial obstacles. Which action clears each band
/// falls out of the geometry: Low overlaps both stances (jump it), Mid
/// clears a ducking runner and an easy jump, High sits at head height
/// (duck it; only a frame-perfect jump squeaks over).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AltitudeBand {
    Low,
    Mid,
    High,
}

impl AltitudeBand {
    pub const ALL: [Self; 3] = [Self::Low, Self::Mid, Self::High];

    /// Top edge of the obstacle box for this band.
    pub fn top(self) -> f32 {
        match self {
            Self::Low => GROUND_Y - 35.0,
            Self::Mid => GROUND_Y - 75.0,
            Self::High => GROUND_Y - 110.0,
        }
    }
}

pub const AERIAL_WIDTH: f32 = 46.0;
pub const AERIAL_HEIGHT: f32 = 30.0;

/// A hazard scrolling toward the player.
#[derive(Debug, Clone, PartialEq)]
pub enum Obstacle {
    /// Resting on the ground line, sized per instance.
    Ground { x: f32, width: f32, height: f32 },
    /// Fixed-size flyer at one of three altitudes.
    Aerial { x: f32, band: AltitudeBand },
}

impl Obstacle {
    pub fn x(&self) -> f32 {
        match self {
            Self::Ground { x, .. } | Self::Aerial { x, .. } => *x,
        }
    }

    pub fn width(&self) -> f32 {
        match self {
            Self::Ground { width, .. } => *width,
            Self::Aerial { .. } => AERIAL_WIDTH,
        }
    }

    /// Right edge; the spawn gap is measured from here.
    pub fn trailing_edge(&self) -> f32 {
        self.x() + self.width()
    }

    pub fn hitbox(&self) -> Aabb {
        match *self {
            Self::Ground { x, width, height } => Aabb {
                x,
                y: GROUND_Y - height,
                width,
                height,
            },
            Self::Aerial { x, band } => Aabb {
                x,
                y: band.top(),
                width: AERIAL_WIDTH,
                height: AERIAL_HEIGHT,
            },
        }
    }

    fn advance(&mut self, speed: f32) {
        match self {
            Self::Ground { x, .. } | Self::Aerial { x, .. } => *x -= speed,
        }
    }
}

/// Decoration only; never collides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
}

/// One game session. Created fresh on every start/restart.
#[derive(Debug)]
pub struct GameState {
    pub player: Player,
    /// Live obstacles in spawn order; the last element is the newest.
    pub obstacles: Vec<Obstacle>,
    pub clouds: Vec<Cloud>,
    /// Raw score, one point per tick.
    pub score: u32,
    pub speed: f32,
    pub tick_count: u64,
    pub crashed: bool,
    /// Horizontal clearance required behind the newest obstacle before the
    /// next spawn fires. Redrawn after every spawn.
    pub next_spawn_gap: f32,
    pub rng: Pcg32,
    pub seed: u64,
}

impl GameState {
    pub fn new(seed: u64, start_speed: f32) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let next_spawn_gap = spawn::draw_gap_threshold(&mut rng, start_speed);
        Self {
            player: Player::new(),
            obstacles: Vec::new(),
            clouds: Vec::new(),
            score: 0,
            speed: start_speed,
            tick_count: 0,
            crashed: false,
            next_spawn_gap,
            rng,
            seed,
        }
    }

    /// Score shown on the HUD (and recorded as the high score).
    pub fn displayed_score(&self) -> u32 {
        self.score / SCORE_DISPLAY_DIVISOR
    }

    /// Edge-triggered jump intent from the input layer.
    pub fn jump(&mut self) {
        if !self.crashed {
            self.player.jump();
        }
    }

    /// Level-triggered duck intent from the input layer.
    pub fn duck(&mut self, pressed: bool) {
        if !self.crashed {
            self.player.duck(pressed);
        }
    }

    /// Advance the session by one tick: score and speed first, then player
    /// physics, spawning, scroll + prune, and finally collision. Rendering
    /// is a separate read-only pass; nothing here draws.
    pub fn tick(&mut self) {
        if self.crashed {
            return;
        }
        self.tick_count += 1;
        self.score += 1;
        self.speed += SPEED_STEP;

        self.player.integrate();

        spawn::step(self);

        for obstacle in &mut self.obstacles {
            obstacle.advance(self.speed);
        }
        for cloud in &mut self.clouds {
            cloud.x -= CLOUD_SPEED;
        }
        self.obstacles.retain(|o| o.trailing_edge() > 0.0);
        self.clouds.retain(|c| c.x + CLOUD_WIDTH > 0.0);

        if collision::any_hit(&self.player, &self.obstacles) {
            self.crashed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> GameState {
        GameState::new(7, DEFAULT_START_SPEED)
    }

    #[test]
    fn test_jump_lands_at_tick_39() {
        // v0 = -12, g = 0.6: displacement after n ticks is -12n + 0.3n(n+1),
        // which first reaches >= 0 at n = 39.
        let mut state = fresh();
        state.jump();
        assert!(state.player.airborne);
        for n in 1..=38u32 {
            state.tick();
            assert!(state.player.airborne, "still airborne at tick {}", n);
        }
        state.tick();
        assert!(!state.player.airborne);
        assert_eq!(state.player.y, GROUND_Y - STAND_HEIGHT);
        assert_eq!(state.player.vy, 0.0);
        // Stays grounded until the next jump.
        state.tick();
        assert!(!state.player.airborne);
    }

    #[test]
    fn test_airborne_and_ducking_exclusive() {
        let mut state = fresh();
        state.jump();
        state.duck(true);
        assert!(state.player.airborne);
        assert!(!state.player.ducking, "duck must be ignored while airborne");

        let mut state = fresh();
        state.duck(true);
        state.jump();
        assert!(state.player.ducking);
        assert!(!state.player.airborne, "jump must be ignored while ducking");
    }

    #[test]
    fn test_jump_while_airborne_is_noop() {
        let mut state = fresh();
        state.jump();
        state.tick();
        let vy = state.player.vy;
        state.jump();
        assert_eq!(state.player.vy, vy);
    }

    #[test]
    fn test_duck_keeps_feet_on_ground() {
        let mut state = fresh();
        state.duck(true);
        assert_eq!(state.player.height, DUCK_HEIGHT);
        assert_eq!(state.player.y, GROUND_Y - DUCK_HEIGHT);
        state.duck(false);
        assert_eq!(state.player.height, STAND_HEIGHT);
        assert_eq!(state.player.y, GROUND_Y - STAND_HEIGHT);
    }

    #[test]
    fn test_score_and_speed_strictly_increase() {
        let mut state = fresh();
        for _ in 0..80 {
            let (score, speed) = (state.score, state.speed);
            state.tick();
            if state.crashed {
                break;
            }
            assert!(state.score > score);
            assert!(state.speed > speed);
        }
    }

    #[test]
    fn test_obstacles_scroll_by_current_speed() {
        let mut state = fresh();
        state.tick(); // first tick spawns the opening obstacle
        assert!(!state.obstacles.is_empty());
        let before: Vec<f32> = state.obstacles.iter().map(Obstacle::x).collect();
        let count = state.obstacles.len();
        state.tick();
        for (obstacle, x0) in state.obstacles.iter().take(count).zip(before) {
            assert!((x0 - obstacle.x() - state.speed).abs() < 1e-4);
        }
    }

    #[test]
    fn test_offscreen_obstacles_pruned() {
        let mut state = fresh();
        state.obstacles.push(Obstacle::Ground {
            x: -50.0,
            width: 30.0,
            height: 40.0,
        });
        state.tick();
        assert!(state.obstacles.iter().all(|o| o.trailing_edge() > 0.0));
    }

    #[test]
    fn test_offscreen_clouds_pruned() {
        let mut state = fresh();
        state.clouds.push(Cloud {
            x: -CLOUD_WIDTH - 1.0,
            y: 100.0,
        });
        state.tick();
        assert!(state.clouds.iter().all(|c| c.x + CLOUD_WIDTH > 0.0));
    }

    #[test]
    fn test_crash_freezes_session() {
        let mut state = fresh();
        state.crashed = true;
        let (score, ticks) = (state.score, state.tick_count);
        state.tick();
        assert_eq!(state.score, score);
        assert_eq!(state.tick_count, ticks);
    }

    #[test]
    fn test_seed_kept_for_replay() {
        // The game-over screen shows the seed so a course can be
        // replayed with --seed; it must survive as passed in.
        let state = GameState::new(0xDEAD_BEEF, DEFAULT_START_SPEED);
        assert_eq!(state.seed, 0xDEAD_BEEF);
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = GameState::new(42, DEFAULT_START_SPEED);
        let mut b = GameState::new(42, DEFAULT_START_SPEED);
        for _ in 0..300 {
            a.tick();
            b.tick();
        }
        assert_eq!(a.obstacles, b.obstacles);
        assert_eq!(a.clouds, b.clouds);
        assert_eq!(a.crashed, b.crashed);
    }

    #[test]
    fn test_displayed_score_divides_by_ten() {
        let mut state = fresh();
        state.score = 457;
        assert_eq!(state.displayed_score(), 45);
    }
}
