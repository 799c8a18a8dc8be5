use mini_galaga::combat::end_game;
use mini_galaga::compute::init_state;
use mini_galaga::entities::*;
use mini_galaga::services::*;

#[derive(Default)]
struct Recorder {
    sprites: Vec<(SpriteKind, f32, f32, Option<u32>)>,
    texts: Vec<String>,
    bursts: usize,
}

impl Renderer for Recorder {
    fn draw_sprite(&mut self, kind: SpriteKind, x: f32, y: f32, _rotation: f32, tint: Option<u32>) {
        self.sprites.push((kind, x, y, tint));
    }

    fn draw_text(&mut self, _x: f32, _y: f32, text: &str) {
        self.texts.push(text.to_string());
    }

    fn emit_particle_burst(&mut self, _x: f32, _y: f32, _color: u32) {
        self.bursts += 1;
    }
}

#[derive(Default)]
struct SoundLog {
    sounds: Vec<SoundId>,
    looping: bool,
}

impl Audio for SoundLog {
    fn play_sound(&mut self, id: SoundId) {
        self.sounds.push(id);
    }

    fn start_loop(&mut self, _track: TrackId) {
        self.looping = true;
    }

    fn stop_loop(&mut self) {
        self.looping = false;
    }
}

fn count(r: &Recorder, kind: SpriteKind) -> usize {
    r.sprites.iter().filter(|s| s.0 == kind).count()
}

// ── present ───────────────────────────────────────────────────────────────────

#[test]
fn present_draws_every_live_entity() {
    let mut s = init_state(0);
    s.enemies[0].state = EnemyState::Dead;
    s.player_bullets.acquire(100.0, 300.0, 0.0, -520.0, ());
    s.enemy_bullets.acquire(100.0, 400.0, 0.0, 330.0, ());
    s.powerups.acquire(50.0, 50.0, 0.0, 140.0, PowerupKind::Shield);

    let mut r = Recorder::default();
    present(&s, &mut r);
    assert_eq!(count(&r, SpriteKind::Enemy), 23);
    assert_eq!(count(&r, SpriteKind::Player), 1);
    assert_eq!(count(&r, SpriteKind::PlayerBullet), 1);
    assert_eq!(count(&r, SpriteKind::EnemyBullet), 1);
    assert_eq!(count(&r, SpriteKind::Powerup(PowerupKind::Shield)), 1);
    assert!(r.texts[0].contains("Score: 0"));
    assert!(r.texts[0].contains("Wave: 1"));
}

#[test]
fn present_shows_timers_and_tints() {
    let mut s = init_state(0);
    s.now_ms = 1000;
    s.player.shield_expires_at = 3500;
    s.player.shot_level = 2;
    s.player.shot_expires_at = 13_000;
    s.enemies[2].flash_until = 1060;

    let mut r = Recorder::default();
    present(&s, &mut r);
    assert!(r.texts.iter().any(|t| t.contains("Shield 3s") && t.contains("Shot x2 12s")));
    let player = r.sprites.iter().find(|s| s.0 == SpriteKind::Player).unwrap();
    assert_eq!(player.3, Some(TINT_SHIELD));
    assert_eq!(r.sprites[2].3, Some(TINT_FLASH));
}

#[test]
fn present_blinks_the_ship_after_damage() {
    let mut s = init_state(0);
    s.player.blink_until = 1440;
    let mut hidden = 0;
    for now in (0..1440).step_by(20) {
        s.now_ms = now;
        let mut r = Recorder::default();
        present(&s, &mut r);
        if count(&r, SpriteKind::Player) == 0 {
            hidden += 1;
        }
    }
    assert!(hidden > 0 && hidden < 72);
}

#[test]
fn present_shows_game_over_banner() {
    let mut s = init_state(0);
    end_game(&mut s);
    let mut r = Recorder::default();
    present(&s, &mut r);
    assert!(r.texts.iter().any(|t| t.contains("GAME OVER")));
}

// ── dispatch_cues ─────────────────────────────────────────────────────────────

#[test]
fn dispatch_routes_cues_and_drains() {
    let mut s = init_state(0);
    s.cues.push(Cue::Sound(SoundId::Explosion));
    s.cues.push(Cue::Burst { x: 1.0, y: 2.0, color: 0xffffff });

    let mut r = Recorder::default();
    let mut audio = SoundLog::default();
    dispatch_cues(&mut s, &mut r, &mut audio);
    assert!(audio.looping);
    assert_eq!(audio.sounds, vec![SoundId::Explosion]);
    assert_eq!(r.bursts, 1);
    assert!(s.cues.is_empty());

    end_game(&mut s);
    dispatch_cues(&mut s, &mut r, &mut audio);
    assert!(!audio.looping);
    assert_eq!(audio.sounds.last(), Some(&SoundId::GameOver));
}

#[test]
fn silent_audio_tracks_loop_without_failing() {
    let mut s = init_state(0);
    let mut r = Recorder::default();
    let mut audio = SilentAudio::default();
    dispatch_cues(&mut s, &mut r, &mut audio);
    assert_eq!(audio.current_loop, Some(TrackId::Background));
    end_game(&mut s);
    dispatch_cues(&mut s, &mut r, &mut audio);
    assert_eq!(audio.current_loop, None);
}
