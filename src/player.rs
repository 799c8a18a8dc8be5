/// Player ship: movement physics, fire pattern, powerups and bombs.

use crate::entities::{Cue, EnemyState, GameState, Input, Player, PowerupKind, SoundId, VIEW_H, VIEW_W};

pub const START_LIVES: i32 = 3;
pub const START_BOMBS: u8 = 1;
pub const MAX_BOMBS: u8 = 9;
pub const MAX_SHOT_LEVEL: u8 = 3;

pub const ACCEL: f32 = 1200.0;
pub const DRAG: f32 = 1800.0;
pub const MAX_SPEED: f32 = 320.0;
/// Half the ship sprite; keeps the hull inside the viewport.
pub const HALF_WIDTH: f32 = 12.0;

pub const FIRE_COOLDOWN_MS: u64 = 160;
pub const BULLET_SPEED: f32 = 520.0;
pub const MUZZLE_ABOVE_SHIP: f32 = 18.0;
pub const SPREAD_L2_DEG: f32 = 6.0;
pub const SPREAD_L3_DEG: f32 = 12.0;

pub const SHOT_DURATION_MS: u64 = 12_000;
pub const SHIELD_DURATION_MS: u64 = 10_000;
/// 9 fade cycles of 160 ms.
pub const BLINK_MS: u64 = 1_440;
pub const BOMB_KILL_SCORE: u32 = 5;

pub fn new_player() -> Player {
    Player {
        x: VIEW_W / 2.0,
        y: VIEW_H - 80.0,
        vx: 0.0,
        ax: 0.0,
        lives: START_LIVES,
        shot_level: 1,
        shot_expires_at: 0,
        shield_expires_at: 0,
        bombs: START_BOMBS,
        next_fire_at: 0,
        blink_until: 0,
    }
}

pub fn shield_active(player: &Player, now: u64) -> bool {
    now < player.shield_expires_at
}

// ── Movement ─────────────────────────────────────────────────────────────────

/// Integrate one frame of horizontal motion.
///
/// A drag position wins over the keyboard axis and places the ship directly.
pub fn steer(player: &mut Player, input: &Input, dt: f32) {
    if let Some(target) = input.drag_x {
        player.x = target.clamp(HALF_WIDTH, VIEW_W - HALF_WIDTH);
        player.vx = 0.0;
        player.ax = 0.0;
        return;
    }

    player.ax = ACCEL * input.move_axis.signum() as f32;
    if player.ax != 0.0 {
        player.vx += player.ax * dt;
    } else {
        // Drag decelerates toward zero without overshooting.
        let slow = DRAG * dt;
        player.vx = if player.vx.abs() <= slow {
            0.0
        } else {
            player.vx - slow * player.vx.signum()
        };
    }
    player.vx = player.vx.clamp(-MAX_SPEED, MAX_SPEED);
    player.x += player.vx * dt;

    let clamped = player.x.clamp(HALF_WIDTH, VIEW_W - HALF_WIDTH);
    if clamped != player.x {
        player.x = clamped;
        player.vx = 0.0;
    }
}

// ── Firing ───────────────────────────────────────────────────────────────────

/// Launch angles in degrees from vertical for a spread level.
pub fn spread_angles(level: u8) -> &'static [f32] {
    match level {
        0 | 1 => &[0.0],
        2 => &[-SPREAD_L2_DEG, SPREAD_L2_DEG],
        _ => &[-SPREAD_L3_DEG, 0.0, SPREAD_L3_DEG],
    }
}

/// Fire the current spread if the cooldown allows.  Returns bullets spawned;
/// a full pool silently truncates the volley.
pub fn try_fire(state: &mut GameState) -> usize {
    let now = state.now_ms;
    if state.is_over() || now < state.player.next_fire_at {
        return 0;
    }
    let (x, y) = (state.player.x, state.player.y - MUZZLE_ABOVE_SHIP);
    let mut spawned = 0;
    for deg in spread_angles(state.player.shot_level) {
        let rad = deg.to_radians();
        let (vx, vy) = if *deg == 0.0 {
            (0.0, -BULLET_SPEED)
        } else {
            (rad.sin() * BULLET_SPEED, -rad.cos() * BULLET_SPEED)
        };
        if state
            .player_bullets
            .acquire(x, y, vx, vy, ())
            .is_some()
        {
            spawned += 1;
        }
    }
    state.player.next_fire_at = now + FIRE_COOLDOWN_MS;
    if spawned > 0 {
        state.cues.push(Cue::Sound(SoundId::Shoot));
    }
    spawned
}

/// Drop back to a single shot once a spread powerup runs out.
pub fn expire_shot_level(player: &mut Player, now: u64) {
    if player.shot_level > 1 && now > player.shot_expires_at {
        player.shot_level = 1;
    }
}

// ── Powerups ─────────────────────────────────────────────────────────────────

pub fn grant_bomb(player: &mut Player) {
    player.bombs = player.bombs.saturating_add(1).min(MAX_BOMBS);
}

pub fn apply_powerup(player: &mut Player, kind: PowerupKind, now: u64) {
    match kind {
        PowerupKind::Shot => {
            player.shot_level = player.shot_level.saturating_add(1).min(MAX_SHOT_LEVEL);
            player.shot_expires_at = now + SHOT_DURATION_MS;
        }
        PowerupKind::Shield => {
            player.shield_expires_at = now + SHIELD_DURATION_MS;
        }
        PowerupKind::Bomb => grant_bomb(player),
    }
}

// ── Bombs ────────────────────────────────────────────────────────────────────

/// Detonate a bomb: every active enemy dies for a reduced score and every
/// enemy bullet vanishes.  Returns the number of enemies destroyed, or `None`
/// when no bomb was available.  Bomb kills never drop powerups.
///
/// The wave-clear check is left to the caller.
pub fn use_bomb(state: &mut GameState) -> Option<usize> {
    if state.is_over() || state.player.bombs == 0 {
        return None;
    }
    state.player.bombs -= 1;

    let mut killed = 0;
    for enemy in state.enemies.iter_mut().filter(|e| e.is_active()) {
        enemy.hp = 0;
        enemy.state = EnemyState::Dead;
        state.cues.push(Cue::Burst {
            x: enemy.x,
            y: enemy.y,
            color: 0xfca5a5,
        });
        killed += 1;
    }
    state.score += killed as u32 * BOMB_KILL_SCORE;
    state.enemy_bullets.clear();
    state.cues.push(Cue::Sound(SoundId::Bomb));

    tracing::debug!(killed, bombs_left = state.player.bombs, "bomb detonated");
    Some(killed)
}
