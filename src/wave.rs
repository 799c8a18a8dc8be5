/// Wave director: formation layout, difficulty curve and enemy fire cadence.

use rand::Rng;

use crate::entities::{Cue, Enemy, EnemyState, GameState, SoundId, VIEW_W};
use crate::dive::MUZZLE_BELOW_ENEMY;
use crate::formation::new_formation;
use crate::player::grant_bomb;

pub const GRID_SPACING: f32 = 34.0;
pub const GRID_TOP: f32 = 90.0;
/// Every n-th wave hands out a bonus bomb.
pub const BOMB_WAVE_CADENCE: u32 = 3;

// ── Difficulty tables ────────────────────────────────────────────────────────

pub fn formation_rows(wave: u32) -> usize {
    (3 + wave as usize).clamp(3, 7)
}

pub fn formation_cols(wave: u32) -> usize {
    (6 + wave as usize / 2).clamp(6, 10)
}

/// Horizontal sweep speed, capped so the formation stays readable.
pub fn formation_speed(wave: u32) -> f32 {
    (40 + wave * 10).min(160) as f32
}

pub fn enemy_fire_interval_ms(wave: u32) -> u64 {
    850u64.saturating_sub(wave as u64 * 55).max(320)
}

pub fn dive_interval_ms(wave: u32) -> u64 {
    3000u64.saturating_sub(wave as u64 * 180).max(1100)
}

pub fn enemy_bullet_speed(wave: u32) -> f32 {
    (320 + wave * 10) as f32
}

// ── Spawning ─────────────────────────────────────────────────────────────────

/// Replace the enemy population with wave `wave`'s formation and retune the
/// difficulty.  `state.now_ms` anchors the new dive cooldown.
pub fn spawn_wave(state: &mut GameState, wave: u32) {
    let rows = formation_rows(wave);
    let cols = formation_cols(wave);
    let start_x = (VIEW_W - (cols - 1) as f32 * GRID_SPACING) / 2.0;

    state.enemies.clear();
    for r in 0..rows {
        for c in 0..cols {
            let x = start_x + c as f32 * GRID_SPACING;
            let y = GRID_TOP + r as f32 * GRID_SPACING;
            state.enemies.push(Enemy {
                base_x: x,
                base_y: y,
                x,
                y,
                hp: 1,
                state: EnemyState::Formation,
                flash_until: 0,
            });
        }
    }

    state.wave = wave;
    state.formation = new_formation(formation_speed(wave));
    state.aggression.fire_interval_ms = enemy_fire_interval_ms(wave);
    state.aggression.dive_interval_ms = dive_interval_ms(wave);
    state.aggression.next_dive_at = state.now_ms + state.aggression.dive_interval_ms;

    if wave % BOMB_WAVE_CADENCE == 0 {
        grant_bomb(&mut state.player);
    }

    tracing::info!(wave, rows, cols, "wave spawned");
}

/// Move on to the next wave if the last enemy just went down.
pub fn advance_if_cleared(state: &mut GameState) -> bool {
    if state.is_over() || state.active_enemy_count() > 0 {
        return false;
    }
    state.cues.push(Cue::Sound(SoundId::WaveClear));
    state.cues.push(Cue::Burst {
        x: VIEW_W / 2.0,
        y: 160.0,
        color: 0xfde68a,
    });
    let next = state.wave + 1;
    spawn_wave(state, next);
    true
}

// ── Enemy fire ───────────────────────────────────────────────────────────────

/// Let one random living enemy shoot straight down once the fire interval has
/// elapsed.  Returns true when a bullet actually spawned.
pub fn enemy_fire(state: &mut GameState, rng: &mut impl Rng) -> bool {
    let now = state.now_ms;
    if now < state.aggression.next_shot_at {
        return false;
    }
    let alive: Vec<usize> = state
        .enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_active())
        .map(|(i, _)| i)
        .collect();
    if alive.is_empty() {
        return false;
    }
    let shooter = &state.enemies[alive[rng.gen_range(0..alive.len())]];
    let (x, y) = (shooter.x, shooter.y + MUZZLE_BELOW_ENEMY);
    let vy = enemy_bullet_speed(state.wave);
    if state
        .enemy_bullets
        .acquire(x, y, 0.0, vy, ())
        .is_none()
    {
        return false;
    }
    state.aggression.next_shot_at = now + state.aggression.fire_interval_ms;
    state.cues.push(Cue::Sound(SoundId::EnemyShoot));
    true
}
