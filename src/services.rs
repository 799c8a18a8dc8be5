/// Front-end collaborators and the glue that feeds them.
///
/// The simulation never draws or plays anything itself.  `present` walks the
/// state and issues draw calls; `dispatch_cues` forwards the side effects a
/// tick collected.  Implementations must never fail: a missing sprite or
/// sound degrades to something simpler or to nothing.

use crate::compute::drain_cues;
use crate::entities::{Cue, EnemyState, GameState, SoundId, SpriteKind, TrackId, VIEW_H, VIEW_W};
use crate::player::shield_active;

/// Tint overlays understood by renderers.
pub const TINT_FLASH: u32 = 0xffffff;
pub const TINT_SHIELD: u32 = 0x93c5fd;

pub trait Renderer {
    fn draw_sprite(&mut self, kind: SpriteKind, x: f32, y: f32, rotation: f32, tint: Option<u32>);
    fn draw_text(&mut self, x: f32, y: f32, text: &str);
    fn emit_particle_burst(&mut self, x: f32, y: f32, color: u32);
}

pub trait Audio {
    fn play_sound(&mut self, id: SoundId);
    fn start_loop(&mut self, track: TrackId);
    fn stop_loop(&mut self);
}

/// Audio sink used when no real backend is available.  Remembers the loop it
/// was asked to play so callers can still observe the request.
#[derive(Debug, Default)]
pub struct SilentAudio {
    pub current_loop: Option<TrackId>,
}

impl Audio for SilentAudio {
    fn play_sound(&mut self, id: SoundId) {
        tracing::trace!(?id, "sound (silent)");
    }

    fn start_loop(&mut self, track: TrackId) {
        self.current_loop = Some(track);
    }

    fn stop_loop(&mut self) {
        self.current_loop = None;
    }
}

/// Forward every pending cue to the renderer or audio backend.
pub fn dispatch_cues(state: &mut GameState, renderer: &mut impl Renderer, audio: &mut impl Audio) {
    for cue in drain_cues(state) {
        match cue {
            Cue::Sound(id) => audio.play_sound(id),
            Cue::Burst { x, y, color } => renderer.emit_particle_burst(x, y, color),
            Cue::StartLoop(track) => audio.start_loop(track),
            Cue::StopLoop => audio.stop_loop(),
        }
    }
}

/// Blink phase: visible for the first half of every 160 ms cycle.
fn blink_visible(now: u64, blink_until: u64) -> bool {
    now >= blink_until || (blink_until - now) % 160 >= 80
}

/// Issue draw calls for one frame.
pub fn present(state: &GameState, renderer: &mut impl Renderer) {
    let now = state.now_ms;

    for enemy in state.enemies.iter().filter(|e| e.is_active()) {
        let tint = (now < enemy.flash_until).then_some(TINT_FLASH);
        let rotation = match enemy.state {
            EnemyState::Diving(_) => std::f32::consts::PI,
            _ => 0.0,
        };
        renderer.draw_sprite(SpriteKind::Enemy, enemy.x, enemy.y, rotation, tint);
    }
    for (_, slot) in state.powerups.iter_active() {
        renderer.draw_sprite(SpriteKind::Powerup(slot.kind), slot.body.x, slot.body.y, 0.0, None);
    }
    for (_, slot) in state.player_bullets.iter_active() {
        let rotation = slot.body.vx.atan2(-slot.body.vy);
        renderer.draw_sprite(SpriteKind::PlayerBullet, slot.body.x, slot.body.y, rotation, None);
    }
    for (_, slot) in state.enemy_bullets.iter_active() {
        renderer.draw_sprite(SpriteKind::EnemyBullet, slot.body.x, slot.body.y, 0.0, None);
    }

    let p = &state.player;
    if blink_visible(now, p.blink_until) {
        let tint = if now < p.blink_until {
            Some(TINT_FLASH)
        } else if shield_active(p, now) {
            Some(TINT_SHIELD)
        } else {
            None
        };
        renderer.draw_sprite(SpriteKind::Player, p.x, p.y, 0.0, tint);
    }

    renderer.draw_text(
        14.0,
        14.0,
        &format!(
            "Score: {}   Lives: {}   Wave: {}   Bombs: {}",
            state.score,
            p.lives.max(0),
            state.wave,
            p.bombs
        ),
    );

    let mut timers = Vec::new();
    if shield_active(p, now) {
        timers.push(format!("Shield {}s", (p.shield_expires_at - now).div_ceil(1000)));
    }
    if p.shot_level > 1 && now <= p.shot_expires_at {
        timers.push(format!(
            "Shot x{} {}s",
            p.shot_level,
            (p.shot_expires_at - now).div_ceil(1000)
        ));
    }
    if !timers.is_empty() {
        renderer.draw_text(14.0, 36.0, &timers.join("   "));
    }

    if state.is_over() {
        renderer.draw_text(
            VIEW_W / 2.0,
            VIEW_H / 2.0,
            &format!("GAME OVER\nScore {}\nPress R to Restart", state.score),
        );
    }
}
