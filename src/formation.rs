/// Formation controller: the shared sideways sweep of all attached enemies.
///
/// Only enemies in `EnemyState::Formation` take part.  Divers and returners
/// animate on their own and neither push the bounds nor follow the offset.

use crate::entities::{Enemy, Formation, VIEW_H, VIEW_W};

pub const FORMATION_DROP: f32 = 26.0;
/// Half an enemy sprite in from each wall.
pub const FORMATION_MARGIN: f32 = 24.0;
/// Dropping below this line means the formation reached the player zone.
pub const FORMATION_FLOOR_Y: f32 = VIEW_H - 140.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormationStep {
    /// Nothing attached; the formation stands still.
    Idle,
    Moved,
    /// A wall was hit this tick: direction flipped and rows dropped.
    Bounced,
    /// A drop pushed the formation past the floor.  Terminal.
    ReachedPlayerZone,
}

pub fn new_formation(speed: f32) -> Formation {
    Formation {
        offset_x: 0.0,
        dir: 1.0,
        speed,
        drop: FORMATION_DROP,
        left_bound: FORMATION_MARGIN,
        right_bound: VIEW_W - FORMATION_MARGIN,
        floor_y: FORMATION_FLOOR_Y,
    }
}

/// Where an enemy would sit if it were attached right now.
pub fn slot_position(formation: &Formation, enemy: &Enemy) -> (f32, f32) {
    (enemy.base_x + formation.offset_x, enemy.base_y)
}

/// Advance the formation by `dt` seconds.
///
/// The wall test only fires while the formation is heading into the wall it
/// touches, so one breach flips the direction exactly once even when the
/// sweep needs several ticks to leave the margin again.
pub fn step(formation: &mut Formation, enemies: &mut [Enemy], dt: f32) -> FormationStep {
    let mut min_x = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    for e in enemies.iter().filter(|e| e.is_attached()) {
        min_x = min_x.min(e.x);
        max_x = max_x.max(e.x);
    }
    if min_x > max_x {
        return FormationStep::Idle;
    }

    let hit_left = min_x <= formation.left_bound && formation.dir < 0.0;
    let hit_right = max_x >= formation.right_bound && formation.dir > 0.0;

    let mut outcome = FormationStep::Moved;
    if hit_left || hit_right {
        formation.dir = -formation.dir;
        let mut lowest = f32::NEG_INFINITY;
        for e in enemies.iter_mut().filter(|e| e.is_attached()) {
            e.base_y += formation.drop;
            lowest = lowest.max(e.base_y);
        }
        outcome = if lowest > formation.floor_y {
            FormationStep::ReachedPlayerZone
        } else {
            FormationStep::Bounced
        };
    }

    formation.offset_x += formation.speed * formation.dir * dt;

    for e in enemies.iter_mut().filter(|e| e.is_attached()) {
        let (x, y) = slot_position(formation, e);
        e.x = x;
        e.y = y;
    }

    outcome
}
