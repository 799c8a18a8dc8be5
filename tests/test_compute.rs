use mini_galaga::combat::resolve_player_bullets;
use mini_galaga::compute::*;
use mini_galaga::entities::*;
use mini_galaga::player::FIRE_COOLDOWN_MS;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn idle() -> Input {
    Input::default()
}

/// Drive `tick` in 10 ms steps from `from` (exclusive) to `to` (inclusive).
fn run(state: &mut GameState, input: &Input, from: u64, to: u64, rng: &mut StdRng) {
    let mut now = from;
    while now < to {
        now += 10;
        tick(state, input, Clock::new(now, 10), rng);
    }
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_starts_wave_one() {
    let s = init_state(0);
    assert_eq!(s.wave, 1);
    assert_eq!(s.score, 0);
    assert_eq!(s.status, GameStatus::Playing);
    assert_eq!(s.active_enemy_count(), 24);
    assert_eq!(s.player.lives, 3);
    assert_eq!(s.player_bullets.capacity(), PLAYER_BULLET_POOL);
    assert_eq!(s.enemy_bullets.capacity(), ENEMY_BULLET_POOL);
    assert_eq!(s.powerups.capacity(), POWERUP_POOL);
    assert!(s.cues.contains(&Cue::StartLoop(TrackId::Background)));
}

// ── scenarios ─────────────────────────────────────────────────────────────────

#[test]
fn clearing_wave_one_spawns_larger_wave_two() {
    let mut s = init_state(0);
    let mut rng = seeded_rng();
    let mut kills = 0;
    while s.wave == 1 {
        let target = s.enemies.iter().find(|e| e.is_active()).unwrap();
        let (x, y) = (target.x, target.y);
        s.player_bullets.acquire(x, y, 0.0, -520.0, ());
        kills += resolve_player_bullets(&mut s, &mut rng);
    }
    assert_eq!(kills, 24);
    assert_eq!(s.wave, 2);
    assert_eq!(s.score, 240);
    assert_eq!(s.active_enemy_count(), 35);

    let mut rows: Vec<f32> = s.enemies.iter().map(|e| e.base_y).collect();
    rows.dedup();
    assert_eq!(rows.len(), 5);
}

#[test]
fn held_fire_through_tick_respects_cooldown() {
    let mut s = init_state(0);
    s.enemies.clear();
    let mut rng = seeded_rng();
    let fire = Input { fire: true, ..Input::default() };

    let mut spawned_at = Vec::new();
    let mut last_count = 0;
    for now in (0..=1000u64).step_by(10) {
        let dt = if now == 0 { 0 } else { 10 };
        tick(&mut s, &fire, Clock::new(now, dt), &mut rng);
        let count = s.player_bullets.active_count();
        if count > last_count {
            spawned_at.push(now);
        }
        last_count = count;
    }

    let expected: Vec<u64> = (0..=1000).step_by(FIRE_COOLDOWN_MS as usize).collect();
    assert_eq!(spawned_at, expected);
    assert!(s.player_bullets.iter_active().all(|(_, b)| b.body.vx == 0.0));
}

#[test]
fn formation_drop_past_floor_ends_game_with_lives_left() {
    let mut s = init_state(0);
    let push = VIEW_W - 24.0 - 295.0;
    for e in s.enemies.iter_mut() {
        e.base_y += 400.0;
        e.y = e.base_y;
        e.x = e.base_x + push;
    }
    s.formation.offset_x = push;

    tick(&mut s, &idle(), Clock::new(10, 10), &mut seeded_rng());
    assert_eq!(s.status, GameStatus::GameOver);
    assert_eq!(s.player.lives, 3);
    assert!(s.cues.contains(&Cue::StopLoop));
}

#[test]
fn game_over_freezes_the_world() {
    let mut s = init_state(0);
    s.status = GameStatus::GameOver;
    let xs: Vec<f32> = s.enemies.iter().map(|e| e.x).collect();
    let fire = Input { fire: true, bomb: true, move_axis: 1, ..Input::default() };

    let mut rng = seeded_rng();
    run(&mut s, &fire, 0, 500, &mut rng);

    let after: Vec<f32> = s.enemies.iter().map(|e| e.x).collect();
    assert_eq!(xs, after);
    assert_eq!(s.player_bullets.active_count(), 0);
    assert_eq!(s.enemy_bullets.active_count(), 0);
    assert_eq!(s.player.bombs, 1);
    assert_eq!(s.player.x, 210.0);
}

#[test]
fn restart_rebuilds_everything() {
    let mut s = init_state(0);
    s.score = 500;
    s.wave = 4;
    s.player.lives = 0;
    s.status = GameStatus::GameOver;

    let restart = Input { restart: true, ..Input::default() };
    tick(&mut s, &restart, Clock::new(9000, 16), &mut seeded_rng());
    assert_eq!(s.status, GameStatus::Playing);
    assert_eq!(s.score, 0);
    assert_eq!(s.wave, 1);
    assert_eq!(s.player.lives, 3);
    assert_eq!(s.now_ms, 9000);
    assert_eq!(s.active_enemy_count(), 24);
}

#[test]
fn restart_is_ignored_while_playing() {
    let mut s = init_state(0);
    s.score = 70;
    let restart = Input { restart: true, ..Input::default() };
    tick(&mut s, &restart, Clock::new(10, 10), &mut seeded_rng());
    assert_eq!(s.score, 70);
}

#[test]
fn bomb_through_tick_clears_wave() {
    let mut s = init_state(0);
    let bomb = Input { bomb: true, ..Input::default() };
    tick(&mut s, &bomb, Clock::new(10, 10), &mut seeded_rng());
    assert_eq!(s.player.bombs, 0);
    assert_eq!(s.score, 120);
    assert_eq!(s.wave, 2);

    // Second press with an empty rack does nothing.
    tick(&mut s, &bomb, Clock::new(20, 10), &mut seeded_rng());
    assert_eq!(s.score, 120);
    assert_eq!(s.wave, 2);
}

#[test]
fn dives_start_after_the_cooldown() {
    let mut s = init_state(0);
    let mut rng = seeded_rng();
    run(&mut s, &idle(), 0, 2810, &mut rng);
    assert!(s.enemies.iter().all(|e| !matches!(e.state, EnemyState::Diving(_))));
    run(&mut s, &idle(), 2810, 2830, &mut rng);
    let diving = s
        .enemies
        .iter()
        .filter(|e| matches!(e.state, EnemyState::Diving(_)))
        .count();
    assert_eq!(diving, 1);
}

#[test]
fn formation_sweeps_during_play() {
    let mut s = init_state(0);
    let x0 = s.enemies[0].x;
    run(&mut s, &idle(), 0, 1000, &mut seeded_rng());
    assert!(s.formation.offset_x > 0.0);
    assert!(s.enemies[0].x > x0);
}

#[test]
fn same_seed_same_session() {
    let fire = Input { fire: true, move_axis: -1, ..Input::default() };
    let mut a = init_state(0);
    let mut b = init_state(0);
    run(&mut a, &fire, 0, 6000, &mut seeded_rng());
    run(&mut b, &fire, 0, 6000, &mut seeded_rng());
    assert_eq!(a.score, b.score);
    assert_eq!(a.player.lives, b.player.lives);
    assert_eq!(a.active_enemy_count(), b.active_enemy_count());
    assert_eq!(a.enemy_bullets.active_count(), b.enemy_bullets.active_count());
}

#[test]
fn enemies_hold_fire_for_one_interval_after_start() {
    let mut s = init_state(0);
    let mut rng = seeded_rng();
    run(&mut s, &idle(), 0, 790, &mut rng);
    assert_eq!(s.enemy_bullets.active_count(), 0);
    run(&mut s, &idle(), 790, 800, &mut rng);
    assert_eq!(s.enemy_bullets.active_count(), 1);
}

#[test]
fn undodged_dive_rams_the_ship() {
    let mut s = init_state(0);
    let mut rng = seeded_rng();
    // Only the diver can reach the ship.
    s.aggression.next_shot_at = u64::MAX;

    let mut now = 0;
    while s.player.lives == 3 && now < 10_000 {
        now += 10;
        tick(&mut s, &idle(), Clock::new(now, 10), &mut rng);
        assert_eq!(s.enemy_bullets.active_count(), 0);
    }

    assert_eq!(s.player.lives, 1);
    assert_eq!(s.status, GameStatus::Playing);
    assert_eq!(s.score, 0);
    assert_eq!(s.active_enemy_count(), 23);
    assert!(s.cues.contains(&Cue::Sound(SoundId::PlayerHit)));
}

// ── cleanup ───────────────────────────────────────────────────────────────────

#[test]
fn offscreen_projectiles_are_recycled() {
    let mut s = init_state(0);
    s.player_bullets.acquire(100.0, -31.0, 0.0, -520.0, ());
    s.player_bullets.acquire(100.0, -29.0, 0.0, -520.0, ());
    s.enemy_bullets.acquire(100.0, VIEW_H + 31.0, 0.0, 330.0, ());
    s.enemy_bullets.acquire(-31.0, 300.0, -160.0, 330.0, ());
    s.powerups.acquire(100.0, VIEW_H + 31.0, 0.0, 140.0, PowerupKind::Shot);

    cull_offscreen(&mut s);
    assert_eq!(s.player_bullets.active_count(), 1);
    assert_eq!(s.enemy_bullets.active_count(), 0);
    assert_eq!(s.powerups.active_count(), 0);
}

#[test]
fn drain_cues_empties_queue() {
    let mut s = init_state(0);
    let cues = drain_cues(&mut s);
    assert!(!cues.is_empty());
    assert!(s.cues.is_empty());
}
