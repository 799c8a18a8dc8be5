/// Combat resolver: overlap tests and their consequences for score, health
/// and the enemy population.

use rand::Rng;

use crate::entities::{Cue, EnemyState, GameState, GameStatus, PowerupKind, SoundId};
use crate::player::{apply_powerup, shield_active, BLINK_MS};
use crate::wave::advance_if_cleared;

// ── Hitboxes (width, height), centred on the entity ──────────────────────────

pub const PLAYER_BOX: (f32, f32) = (24.0, 24.0);
pub const ENEMY_BOX: (f32, f32) = (24.0, 24.0);
pub const PLAYER_BULLET_BOX: (f32, f32) = (4.0, 12.0);
pub const ENEMY_BULLET_BOX: (f32, f32) = (4.0, 10.0);
pub const POWERUP_BOX: (f32, f32) = (16.0, 16.0);

pub const KILL_SCORE: u32 = 10;
pub const DROP_CHANCE: f64 = 0.12;
pub const POWERUP_FALL_SPEED: f32 = 140.0;
pub const HIT_FLASH_MS: u64 = 60;

const ENEMY_COLOR: u32 = 0xfca5a5;
const PLAYER_COLOR: u32 = 0x7dd3fc;

/// Axis-aligned box overlap for two centred boxes.
pub fn overlaps(ax: f32, ay: f32, a: (f32, f32), bx: f32, by: f32, b: (f32, f32)) -> bool {
    (ax - bx).abs() * 2.0 < a.0 + b.0 && (ay - by).abs() * 2.0 < a.1 + b.1
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Damage {
    /// Enemy bullet.
    Light,
    /// Body contact with an enemy.
    Heavy,
}

impl Damage {
    pub fn lives(self) -> i32 {
        match self {
            Damage::Light => 1,
            Damage::Heavy => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The game was already over.
    Ignored,
    /// The shield soaked it up.
    Absorbed,
    Applied,
    /// This hit ended the game.
    Fatal,
}

// ── Player damage & game over ────────────────────────────────────────────────

pub fn damage_player(state: &mut GameState, damage: Damage) -> DamageOutcome {
    if state.is_over() {
        return DamageOutcome::Ignored;
    }
    let now = state.now_ms;
    if shield_active(&state.player, now) {
        state.cues.push(Cue::Sound(SoundId::ShieldBlock));
        return DamageOutcome::Absorbed;
    }

    let player = &mut state.player;
    player.lives -= damage.lives();
    player.blink_until = now + BLINK_MS;
    state.cues.push(Cue::Burst {
        x: player.x,
        y: player.y,
        color: PLAYER_COLOR,
    });
    state.cues.push(Cue::Sound(SoundId::PlayerHit));

    if state.player.lives <= 0 {
        end_game(state);
        DamageOutcome::Fatal
    } else {
        DamageOutcome::Applied
    }
}

/// Enter the terminal state.  Idempotent.
pub fn end_game(state: &mut GameState) {
    if state.is_over() {
        return;
    }
    state.status = GameStatus::GameOver;
    state.player.vx = 0.0;
    state.player.ax = 0.0;
    state.cues.push(Cue::StopLoop);
    state.cues.push(Cue::Sound(SoundId::GameOver));
    tracing::info!(score = state.score, wave = state.wave, "game over");
}

// ── Enemy damage ─────────────────────────────────────────────────────────────

/// Apply one point of damage to enemy `idx`.  Returns true if it died.
///
/// A kill scores, bursts, and may drop a powerup of uniformly random kind.
pub fn hit_enemy(state: &mut GameState, idx: usize, rng: &mut impl Rng) -> bool {
    let now = state.now_ms;
    let Some(enemy) = state.enemies.get_mut(idx).filter(|e| e.is_active()) else {
        return false;
    };
    enemy.hp -= 1;
    enemy.flash_until = now + HIT_FLASH_MS;
    if enemy.hp > 0 {
        return false;
    }

    enemy.hp = 0;
    enemy.state = EnemyState::Dead;
    let (x, y) = (enemy.x, enemy.y);
    state.score += KILL_SCORE;
    state.cues.push(Cue::Burst { x, y, color: ENEMY_COLOR });
    state.cues.push(Cue::Sound(SoundId::Explosion));

    if rng.gen_bool(DROP_CHANCE) {
        let kind = PowerupKind::ALL[rng.gen_range(0..PowerupKind::ALL.len())];
        state.powerups.acquire(x, y, 0.0, POWERUP_FALL_SPEED, kind);
    }
    true
}

// ── Pairwise resolution ──────────────────────────────────────────────────────

/// Player bullets against enemies.  Returns the number of kills.
///
/// Each bullet hits at most one enemy.  Clearing the last enemy advances the
/// wave on the spot and ends this pass so leftover bullets cannot touch the
/// freshly spawned formation in the same tick.
pub fn resolve_player_bullets(state: &mut GameState, rng: &mut impl Rng) -> usize {
    let mut kills = 0;
    for bullet in state.player_bullets.active_refs() {
        let Some(slot) = state.player_bullets.get(bullet) else {
            continue;
        };
        let (bx, by) = (slot.body.x, slot.body.y);
        let target = state.enemies.iter().position(|e| {
            e.is_active() && overlaps(bx, by, PLAYER_BULLET_BOX, e.x, e.y, ENEMY_BOX)
        });
        let Some(idx) = target else {
            continue;
        };

        state.player_bullets.release(bullet);
        if hit_enemy(state, idx, rng) {
            kills += 1;
            if advance_if_cleared(state) {
                break;
            }
        }
    }
    kills
}

/// Enemy bullets against the player ship.
pub fn resolve_enemy_bullets(state: &mut GameState) {
    let (px, py) = (state.player.x, state.player.y);
    for bullet in state.enemy_bullets.active_refs() {
        if state.is_over() {
            return;
        }
        let hit = state
            .enemy_bullets
            .get(bullet)
            .is_some_and(|s| overlaps(s.body.x, s.body.y, ENEMY_BULLET_BOX, px, py, PLAYER_BOX));
        if hit {
            state.enemy_bullets.release(bullet);
            damage_player(state, Damage::Light);
        }
    }
}

/// Enemies colliding with the ship.  The rammer is destroyed without score so
/// one contact costs exactly one heavy hit.
pub fn resolve_rams(state: &mut GameState) {
    let (px, py) = (state.player.x, state.player.y);
    for idx in 0..state.enemies.len() {
        if state.is_over() {
            return;
        }
        let enemy = &mut state.enemies[idx];
        if !enemy.is_active() || !overlaps(enemy.x, enemy.y, ENEMY_BOX, px, py, PLAYER_BOX) {
            continue;
        }
        enemy.hp = 0;
        enemy.state = EnemyState::Dead;
        let (x, y) = (enemy.x, enemy.y);
        state.cues.push(Cue::Burst { x, y, color: ENEMY_COLOR });
        damage_player(state, Damage::Heavy);
        if advance_if_cleared(state) {
            return;
        }
    }
}

/// Falling powerups against the ship.
pub fn resolve_pickups(state: &mut GameState) {
    let now = state.now_ms;
    let (px, py) = (state.player.x, state.player.y);
    for pickup in state.powerups.active_refs() {
        let Some(slot) = state.powerups.get(pickup) else {
            continue;
        };
        if !overlaps(slot.body.x, slot.body.y, POWERUP_BOX, px, py, PLAYER_BOX) {
            continue;
        }
        let kind = slot.kind;
        state.powerups.release(pickup);
        apply_powerup(&mut state.player, kind, now);
        state.cues.push(Cue::Sound(SoundId::Powerup));
        tracing::debug!(?kind, "powerup collected");
    }
}

/// Run every collision pass in a fixed order.
pub fn resolve_all(state: &mut GameState, rng: &mut impl Rng) {
    resolve_player_bullets(state, rng);
    if state.is_over() {
        return;
    }
    resolve_enemy_bullets(state);
    resolve_rams(state);
    if state.is_over() {
        return;
    }
    resolve_pickups(state);
}
