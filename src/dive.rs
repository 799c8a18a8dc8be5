/// Dive AI: `Formation -> Diving -> Returning -> Formation`.
///
/// Every flight is a start time plus a duration; position is recomputed from
/// the clock each tick and the phase change happens on the first tick whose
/// progress reaches 1.0.

use std::f32::consts::PI;

use rand::Rng;

use crate::entities::{Cue, Enemy, EnemyState, Flight, GameState, SoundId, VIEW_W};
use crate::formation::{slot_position, FORMATION_MARGIN};
use crate::wave::enemy_bullet_speed;

pub const DIVE_DURATION_MS: u64 = 1100;
pub const RETURN_DURATION_MS: u64 = 900;
/// How many of the lowest attached enemies are eligible to dive.
pub const DIVE_CANDIDATES: usize = 8;
pub const WIGGLE_AMPLITUDE: f32 = 30.0;
pub const WIGGLE_CYCLES: f32 = 1.5;
pub const AIM_LEAD: f32 = 1.2;
pub const AIM_MAX_VX: f32 = 160.0;
/// Enemy shots leave from just below the sprite.
pub const MUZZLE_BELOW_ENEMY: f32 = 16.0;

/// Fraction of `flight` completed at `now`, clamped to `0.0..=1.0`.
pub fn progress(flight: &Flight, now: u64) -> f32 {
    if flight.duration_ms == 0 {
        return 1.0;
    }
    let elapsed = now.saturating_sub(flight.started_at) as f32;
    (elapsed / flight.duration_ms as f32).min(1.0)
}

fn ease_in_out(t: f32) -> f32 {
    -((PI * t).cos() - 1.0) / 2.0
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Position along a dive at progress `t`: eased path plus a lateral wiggle
/// that fades out so the dive ends exactly on its target.
pub fn dive_position(flight: &Flight, t: f32) -> (f32, f32) {
    let k = ease_in_out(t);
    let wiggle = (t * 2.0 * PI * WIGGLE_CYCLES).sin() * WIGGLE_AMPLITUDE * (1.0 - t);
    (
        lerp(flight.from_x, flight.to_x, k) + wiggle,
        lerp(flight.from_y, flight.to_y, k),
    )
}

/// Indices of the attached enemies allowed to dive: the ones closest to the
/// player (largest `base_y`), spawn order breaking ties.
pub fn dive_candidates(enemies: &[Enemy]) -> Vec<usize> {
    let mut attached: Vec<usize> = enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_attached())
        .map(|(i, _)| i)
        .collect();
    // Stable sort keeps spawn order among equal rows.
    attached.sort_by(|&a, &b| enemies[b].base_y.total_cmp(&enemies[a].base_y));
    attached.truncate(DIVE_CANDIDATES);
    attached
}

/// Start a new dive if the cooldown has elapsed.  Returns the diver's index.
pub fn try_launch(state: &mut GameState, rng: &mut impl Rng) -> Option<usize> {
    let now = state.now_ms;
    if now < state.aggression.next_dive_at {
        return None;
    }
    let candidates = dive_candidates(&state.enemies);
    if candidates.is_empty() {
        return None;
    }
    let idx = candidates[rng.gen_range(0..candidates.len())];

    let target_x = state
        .player
        .x
        .clamp(FORMATION_MARGIN, VIEW_W - FORMATION_MARGIN);
    // Aim at the ship's own row so a diver that isn't dodged rams it.
    let target_y = state.player.y;
    let enemy = &mut state.enemies[idx];
    enemy.state = EnemyState::Diving(Flight {
        started_at: now,
        duration_ms: DIVE_DURATION_MS,
        from_x: enemy.x,
        from_y: enemy.y,
        to_x: target_x,
        to_y: target_y,
    });
    state.aggression.next_dive_at = now + state.aggression.dive_interval_ms;
    tracing::debug!(enemy = idx, wave = state.wave, "dive launched");
    Some(idx)
}

/// Move every diving and returning enemy along its flight.
pub fn advance(state: &mut GameState) {
    let now = state.now_ms;
    let bullet_vy = enemy_bullet_speed(state.wave);
    let (player_x, formation) = (state.player.x, &state.formation);

    for enemy in state.enemies.iter_mut() {
        match enemy.state {
            EnemyState::Diving(flight) => {
                let t = progress(&flight, now);
                let (x, y) = dive_position(&flight, t);
                enemy.x = x;
                enemy.y = y;
                if t >= 1.0 {
                    let vx = ((player_x - x) * AIM_LEAD).clamp(-AIM_MAX_VX, AIM_MAX_VX);
                    let shot = state
                        .enemy_bullets
                        .acquire(x, y + MUZZLE_BELOW_ENEMY, vx, bullet_vy, ());
                    if shot.is_some() {
                        state.cues.push(Cue::Sound(SoundId::EnemyShoot));
                    }
                    enemy.state = EnemyState::Returning(Flight {
                        started_at: now,
                        duration_ms: RETURN_DURATION_MS,
                        from_x: x,
                        from_y: y,
                        to_x: x,
                        to_y: y,
                    });
                }
            }
            EnemyState::Returning(flight) => {
                let t = progress(&flight, now);
                let (home_x, home_y) = slot_position(formation, enemy);
                if t >= 1.0 {
                    enemy.x = home_x;
                    enemy.y = home_y;
                    enemy.state = EnemyState::Formation;
                } else {
                    let k = ease_in_out(t);
                    enemy.x = lerp(flight.from_x, home_x, k);
                    enemy.y = lerp(flight.from_y, home_y, k);
                }
            }
            EnemyState::Formation | EnemyState::Dead => {}
        }
    }
}
