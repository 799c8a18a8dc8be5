/// All game entity types. Pure data, no logic.

use crate::pool::Pool;

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Logical playfield width in world units.
pub const VIEW_W: f32 = 420.0;
/// Logical playfield height in world units.
pub const VIEW_H: f32 = 720.0;

// ── Status & clock ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

/// External clock sample handed to every tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Clock {
    /// Monotonic milliseconds since the session started.
    pub now_ms: u64,
    /// Milliseconds elapsed since the previous frame.
    pub dt_ms: u64,
}

impl Clock {
    pub fn new(now_ms: u64, dt_ms: u64) -> Self {
        Clock { now_ms, dt_ms }
    }

    /// Elapsed frame time in seconds.
    pub fn dt_secs(&self) -> f32 {
        self.dt_ms as f32 / 1000.0
    }
}

/// Input snapshot polled once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Input {
    /// Horizontal intent: -1 left, 0 idle, +1 right.
    pub move_axis: i8,
    /// Absolute pointer/drag x; overrides `move_axis` when present.
    pub drag_x: Option<f32>,
    pub fire: bool,
    /// Edge-triggered: true only on the frame the bomb key went down.
    pub bomb: bool,
    pub restart: bool,
}

// ── Presentation vocabulary ───────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteKind {
    Player,
    Enemy,
    PlayerBullet,
    EnemyBullet,
    Powerup(PowerupKind),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundId {
    Shoot,
    EnemyShoot,
    Explosion,
    PlayerHit,
    ShieldBlock,
    Powerup,
    Bomb,
    WaveClear,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrackId {
    Background,
}

/// A side effect produced during a tick, drained by the front end.
#[derive(Clone, Debug, PartialEq)]
pub enum Cue {
    Sound(SoundId),
    Burst { x: f32, y: f32, color: u32 },
    StartLoop(TrackId),
    StopLoop,
}

// ── Projectiles & pickups ─────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PowerupKind {
    /// Raises the spread level (max 3) for SHOT_DURATION_MS.
    Shot,
    /// Absorbs all damage for SHIELD_DURATION_MS.
    Shield,
    /// One extra screen-clearing bomb (max 9).
    Bomb,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 3] = [PowerupKind::Shot, PowerupKind::Shield, PowerupKind::Bomb];
}

/// Position and velocity shared by every pooled object.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub ax: f32,
    /// Signed so heavy damage can overshoot below zero.
    pub lives: i32,
    /// Spread level, 1..=3.
    pub shot_level: u8,
    pub shot_expires_at: u64,
    pub shield_expires_at: u64,
    pub bombs: u8,
    /// Fire requests before this instant are dropped.
    pub next_fire_at: u64,
    /// Damage blink is shown until this instant. Cosmetic only.
    pub blink_until: u64,
}

// ── Enemies ───────────────────────────────────────────────────────────────────

/// A timed interpolation between two points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Flight {
    pub started_at: u64,
    pub duration_ms: u64,
    pub from_x: f32,
    pub from_y: f32,
    pub to_x: f32,
    pub to_y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EnemyState {
    /// Attached to the formation and moved by it.
    Formation,
    Diving(Flight),
    /// `to_x`/`to_y` are ignored; the live formation slot is the target.
    Returning(Flight),
    Dead,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub base_x: f32,
    pub base_y: f32,
    pub x: f32,
    pub y: f32,
    pub hp: i32,
    pub state: EnemyState,
    pub flash_until: u64,
}

impl Enemy {
    pub fn is_active(&self) -> bool {
        self.state != EnemyState::Dead
    }

    pub fn is_attached(&self) -> bool {
        self.state == EnemyState::Formation
    }
}

// ── Formation ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Formation {
    /// Cumulative horizontal displacement applied to every attached enemy.
    pub offset_x: f32,
    /// +1 right, -1 left.
    pub dir: f32,
    /// Horizontal speed in units per second.
    pub speed: f32,
    pub drop: f32,
    pub left_bound: f32,
    pub right_bound: f32,
    /// Any attached base_y beyond this after a drop ends the game.
    pub floor_y: f32,
}

/// Per-wave timers for enemy aggression.
#[derive(Clone, Debug)]
pub struct Aggression {
    pub fire_interval_ms: u64,
    pub next_shot_at: u64,
    pub dive_interval_ms: u64,
    pub next_dive_at: u64,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state.  Owned by the frame loop and rebuilt wholesale on
/// restart.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub formation: Formation,
    pub aggression: Aggression,
    /// Bullets carry no payload; the owning pool says whose they are.
    pub player_bullets: Pool<()>,
    pub enemy_bullets: Pool<()>,
    pub powerups: Pool<PowerupKind>,
    pub wave: u32,
    pub score: u32,
    pub status: GameStatus,
    /// Clock value of the most recent tick.
    pub now_ms: u64,
    /// Side effects raised since the front end last drained them.
    pub cues: Vec<Cue>,
}

impl GameState {
    pub fn active_enemy_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_active()).count()
    }

    pub fn is_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }
}
