/// Per-frame game loop.
///
/// `tick` mutates the single `GameState` in a fixed order.  All randomness
/// comes through the injected `rng` so callers control determinism (tests use
/// a seeded `StdRng`).

use rand::Rng;

use crate::combat::{end_game, resolve_all};
use crate::dive;
use crate::entities::{
    Aggression, Clock, Cue, GameState, GameStatus, Input, PowerupKind, TrackId, VIEW_H, VIEW_W,
};
use crate::formation::{self, new_formation, FormationStep};
use crate::player::{self, new_player};
use crate::pool::Pool;
use crate::wave::{self, spawn_wave};

pub const PLAYER_BULLET_POOL: usize = 50;
pub const ENEMY_BULLET_POOL: usize = 80;
pub const POWERUP_POOL: usize = 16;
/// Projectiles this far outside the viewport are recycled.
pub const CULL_MARGIN: f32 = 30.0;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build a fresh session at wave 1, anchored at `now_ms`.
pub fn init_state(now_ms: u64) -> GameState {
    let mut state = GameState {
        player: new_player(),
        enemies: Vec::new(),
        formation: new_formation(wave::formation_speed(1)),
        aggression: Aggression {
            fire_interval_ms: wave::enemy_fire_interval_ms(1),
            next_shot_at: now_ms + wave::enemy_fire_interval_ms(1),
            dive_interval_ms: wave::dive_interval_ms(1),
            next_dive_at: now_ms,
        },
        player_bullets: Pool::new(PLAYER_BULLET_POOL),
        enemy_bullets: Pool::new(ENEMY_BULLET_POOL),
        powerups: Pool::<PowerupKind>::new(POWERUP_POOL),
        wave: 1,
        score: 0,
        status: GameStatus::Playing,
        now_ms,
        cues: vec![Cue::StartLoop(TrackId::Background)],
    };
    spawn_wave(&mut state, 1);
    state
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame.
///
/// Order: input and player motion, projectile and enemy motion, collisions,
/// AI timers, off-screen cleanup.  Once the game is over only `restart` is
/// honoured and it rebuilds the whole state.
pub fn tick(state: &mut GameState, input: &Input, clock: Clock, rng: &mut impl Rng) {
    if state.is_over() {
        if input.restart {
            tracing::info!("restarting session");
            *state = init_state(clock.now_ms);
        }
        return;
    }

    state.now_ms = clock.now_ms;
    let dt = clock.dt_secs();

    // ── 1. Player ────────────────────────────────────────────────────────────
    player::expire_shot_level(&mut state.player, state.now_ms);
    player::steer(&mut state.player, input, dt);
    if input.fire {
        player::try_fire(state);
    }
    if input.bomb && player::use_bomb(state).is_some() {
        wave::advance_if_cleared(state);
    }

    // ── 2. Motion ────────────────────────────────────────────────────────────
    state.player_bullets.integrate(dt);
    state.enemy_bullets.integrate(dt);
    state.powerups.integrate(dt);

    if formation::step(&mut state.formation, &mut state.enemies, dt)
        == FormationStep::ReachedPlayerZone
    {
        end_game(state);
        return;
    }
    dive::advance(state);

    // ── 3. Collisions ────────────────────────────────────────────────────────
    resolve_all(state, rng);
    if state.is_over() {
        return;
    }

    // ── 4. AI timers ─────────────────────────────────────────────────────────
    wave::enemy_fire(state, rng);
    dive::try_launch(state, rng);

    // ── 5. Cleanup ───────────────────────────────────────────────────────────
    cull_offscreen(state);
}

/// Recycle projectiles and pickups that left the playfield.
pub fn cull_offscreen(state: &mut GameState) {
    state.player_bullets.release_where(|b| {
        b.y < -CULL_MARGIN || b.x < -CULL_MARGIN || b.x > VIEW_W + CULL_MARGIN
    });
    state.enemy_bullets.release_where(|b| {
        b.y > VIEW_H + CULL_MARGIN || b.x < -CULL_MARGIN || b.x > VIEW_W + CULL_MARGIN
    });
    state.powerups.release_where(|b| b.y > VIEW_H + CULL_MARGIN);
}

/// Hand the accumulated cues to the front end.
pub fn drain_cues(state: &mut GameState) -> Vec<Cue> {
    std::mem::take(&mut state.cues)
}
