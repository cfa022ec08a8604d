//! Tolerance-adjusted AABB collision between the player and obstacles.
//!
//! The player's box is shrunk by a few pixels on every side before the
//! overlap test, so grazing an obstacle edge does not end the run. Pure
//! functions of their inputs; no state.

use crate::game::{Aabb, Obstacle, Player};

/// Forgiveness margin in logical pixels, applied to all four sides.
pub const TOLERANCE: f32 = 5.0;

/// Strict AABB overlap: touching edges do not count.
fn overlaps(a: &Aabb, b: &Aabb) -> bool {
    a.x < b.x + b.width && b.x < a.x + a.width && a.y < b.y + b.height && b.y < a.y + a.height
}

/// Overlap test with the forgiveness margin applied to the player box.
/// Deterministic: same boxes in, same answer out.
pub fn boxes_collide(player: &Aabb, obstacle: &Aabb) -> bool {
    let forgiving = Aabb {
        x: player.x + TOLERANCE,
        y: player.y + TOLERANCE,
        width: player.width - 2.0 * TOLERANCE,
        height: player.height - 2.0 * TOLERANCE,
    };
    overlaps(&forgiving, obstacle)
}

/// Check the player against every live obstacle. Any hit is fatal, so
/// the first one short-circuits and order does not matter.
pub fn any_hit(player: &Player, obstacles: &[Obstacle]) -> bool {
    let hitbox = player.hitbox();
    obstacles.iter().any(|o| boxes_collide(&hitbox, &o.hitbox()))
}
