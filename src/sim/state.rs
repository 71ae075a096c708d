//! Game state and core simulation types
//!
//! The [`World`] owns every entity collection; a [`Wave`] owns its invaders.
//! Nothing is shared between owners, so removal is a plain mark-then-compact.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::particles;
use super::wave::Wave;
use crate::error::ConfigError;
use crate::settings::Settings;

/// Visual asset readiness. Entities with a pending sprite have no size yet and
/// are neither stepped, collided against, nor rendered.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Sprite {
    #[default]
    Pending,
    Ready { size: Vec2 },
}

impl Sprite {
    #[inline]
    pub fn size(&self) -> Option<Vec2> {
        match self {
            Sprite::Pending => None,
            Sprite::Ready { size } => Some(*size),
        }
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(self, Sprite::Ready { .. })
    }
}

/// Shared per-tick stepping: position advances by velocity exactly once
pub trait Advance {
    fn advance(&mut self);
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Normal play
    Active,
    /// Player destroyed; explosion plays out before game over
    Ending { ticks_left: u32 },
    /// Run ended, no further ticks run
    Over,
}

/// Events produced by a tick, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    WaveSpawned { columns: u32, rows: u32 },
    InvaderDestroyed { position: Vec2 },
    ScoreChanged { score: u64 },
    PlayerHit { position: Vec2 },
    GameOver { score: u64 },
}

/// Monotonic entity ID source
#[derive(Debug, Clone, Default)]
pub struct EntityIds {
    next: u32,
}

impl EntityIds {
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner (meaningless until the sprite resolves)
    pub pos: Vec2,
    /// Horizontal only; y stays 0
    pub vel: Vec2,
    /// Tilt in radians, follows the sign of horizontal velocity
    pub rotation: f32,
    /// 1.0 alive, 0.0 destroyed
    pub opacity: f32,
    pub sprite: Sprite,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            rotation: 0.0,
            opacity: 1.0,
            sprite: Sprite::Pending,
        }
    }
}

impl Player {
    pub fn bounds(&self) -> Option<Aabb> {
        self.sprite
            .size()
            .map(|size| Aabb::from_pos_size(self.pos, size))
    }

    pub fn is_ready(&self) -> bool {
        self.sprite.is_ready()
    }

    /// Keep the ship inside the playfield horizontally
    pub fn clamp_to(&mut self, playfield_width: f32) {
        if let Some(size) = self.sprite.size() {
            let max_x = (playfield_width - size.x).max(0.0);
            self.pos.x = self.pos.x.clamp(0.0, max_x);
        }
    }
}

impl Advance for Player {
    fn advance(&mut self) {
        if self.is_ready() {
            self.pos.x += self.vel.x;
        }
    }
}

/// Player-fired projectile (a small circle, collided by its box)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    /// Center
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    #[serde(skip)]
    pub(crate) spent: bool,
}

impl Projectile {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            radius,
            spent: false,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_circle(self.pos, self.radius)
    }

    /// Fully above the top edge
    pub fn is_off_screen(&self) -> bool {
        self.pos.y + self.radius <= 0.0
    }
}

impl Advance for Projectile {
    fn advance(&mut self) {
        self.pos += self.vel;
    }
}

/// Invader-fired projectile (a rectangle)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvaderProjectile {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    #[serde(skip)]
    pub(crate) spent: bool,
}

impl InvaderProjectile {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, size: Vec2) -> Self {
        Self {
            id,
            pos,
            vel,
            size,
            spent: false,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    /// Fully below the bottom edge
    pub fn is_off_screen(&self, playfield_height: f32) -> bool {
        self.pos.y >= playfield_height
    }
}

impl Advance for InvaderProjectile {
    fn advance(&mut self) {
        self.pos += self.vel;
    }
}

/// One enemy. Its velocity is always its owning wave's velocity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invader {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub sprite: Sprite,
    #[serde(skip)]
    pub(crate) destroyed: bool,
}

impl Invader {
    pub fn new(id: u32, pos: Vec2, sprite: Sprite) -> Self {
        Self {
            id,
            pos,
            sprite,
            destroyed: false,
        }
    }

    pub fn bounds(&self) -> Option<Aabb> {
        self.sprite
            .size()
            .map(|size| Aabb::from_pos_size(self.pos, size))
    }

    /// Step by the wave's velocity
    pub fn advance_with(&mut self, vel: Vec2) {
        if self.sprite.is_ready() {
            self.pos += vel;
        }
    }

    /// Width once the sprite resolves (zero while pending)
    pub fn width(&self) -> f32 {
        self.sprite.size().map_or(0.0, |s| s.x)
    }
}

/// Background star or explosion debris
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Persistent, wraps from the bottom back above the top
    Star,
    /// Transient, fades out and is removed
    Debris,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub id: u32,
    pub kind: ParticleKind,
    /// Center
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// 0xRRGGBB
    pub color: u32,
    pub opacity: f32,
    /// Opacity lost per tick (0 = never fades)
    pub fade_rate: f32,
}

/// Opacity at or below this counts as fully faded
pub const FADED_EPSILON: f32 = 1e-4;

impl Particle {
    pub fn fades(&self) -> bool {
        self.fade_rate > 0.0
    }

    pub fn is_faded(&self) -> bool {
        self.fades() && self.opacity <= FADED_EPSILON
    }
}

impl Advance for Particle {
    fn advance(&mut self) {
        self.pos += self.vel;
        if self.fades() {
            self.opacity = (self.opacity - self.fade_rate).max(0.0);
        }
    }
}

/// Complete simulation state, explicitly owned and passed to [`super::tick`]
#[derive(Debug, Clone)]
pub struct World {
    /// Validated tuning
    pub settings: Settings,
    /// Run seed for reproducibility
    pub seed: u64,
    /// Random source for waves, shooters, intervals and particles
    pub rng: Pcg32,
    /// Invaders destroyed
    pub score: u64,
    /// Ticks since the last wave arrival
    pub frames: u32,
    /// Ticks until the next wave arrival
    pub next_spawn_interval: u32,
    /// Simulation tick counter (monotonic)
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub paused: bool,
    pub player: Player,
    pub projectiles: Vec<Projectile>,
    pub invader_projectiles: Vec<InvaderProjectile>,
    pub waves: Vec<Wave>,
    pub particles: Vec<Particle>,
    /// Sprite handed to invaders of new waves
    pub invader_sprite: Sprite,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    /// Input levels seen last tick (for edge detection)
    pub(crate) fire_held: bool,
    pub(crate) pause_held: bool,
    pub(crate) ids: EntityIds,
}

impl World {
    /// Create a world from default settings with the given seed.
    /// Sprites start pending.
    pub fn new(seed: u64) -> Self {
        Self::with_rng(Settings::default(), seed, Pcg32::seed_from_u64(seed))
    }

    /// Create a world from custom settings, validating them first
    pub fn try_new(settings: Settings, seed: u64) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self::with_rng(settings, seed, Pcg32::seed_from_u64(seed)))
    }

    /// Create a world with settings already validated and sprites resolved to
    /// their configured sizes
    pub fn ready(settings: Settings, seed: u64) -> Result<Self, ConfigError> {
        let mut world = Self::try_new(settings, seed)?;
        let player_size = world.settings.player_size;
        let invader_size = world.settings.invader_size;
        world.resolve_player_sprite(player_size);
        world.resolve_invader_sprite(invader_size);
        Ok(world)
    }

    /// Create a world around an injected generator. `settings` must already
    /// be valid.
    pub fn with_rng(settings: Settings, seed: u64, mut rng: Pcg32) -> Self {
        let mut ids = EntityIds::default();
        let particles = particles::starfield(&mut rng, &settings, &mut ids);
        let next_spawn_interval = roll_interval(&mut rng, &settings);
        log::info!(
            "World created (seed {}, first interval {} ticks)",
            seed,
            next_spawn_interval
        );
        Self {
            settings,
            seed,
            rng,
            score: 0,
            frames: 0,
            next_spawn_interval,
            time_ticks: 0,
            phase: GamePhase::Active,
            paused: false,
            player: Player::default(),
            projectiles: Vec::new(),
            invader_projectiles: Vec::new(),
            waves: Vec::new(),
            particles,
            invader_sprite: Sprite::Pending,
            events: Vec::new(),
            fire_held: false,
            pause_held: false,
            ids,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        self.ids.next_id()
    }

    /// Player sprite loaded: fix its size and place it bottom center
    pub fn resolve_player_sprite(&mut self, size: Vec2) {
        let field = self.settings.playfield;
        self.player.sprite = Sprite::Ready { size };
        self.player.pos = Vec2::new(
            field.x / 2.0 - size.x / 2.0,
            field.y - size.y - self.settings.player_bottom_margin,
        );
        log::debug!("Player sprite ready ({}x{})", size.x, size.y);
    }

    /// Invader sprite loaded: ready every current invader and all later ones
    pub fn resolve_invader_sprite(&mut self, size: Vec2) {
        self.invader_sprite = Sprite::Ready { size };
        for wave in &mut self.waves {
            wave.resolve_sprite(self.invader_sprite);
        }
        log::debug!("Invader sprite ready ({}x{})", size.x, size.y);
    }

    /// Take all events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Total live invaders across all waves
    pub fn invader_count(&self) -> usize {
        self.waves.iter().map(|w| w.invaders.len()).sum()
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::Over
    }

    /// Spawn a fresh wave at the top-left corner
    pub fn spawn_wave(&mut self) {
        let wave = Wave::spawn(
            &mut self.rng,
            &self.settings,
            self.invader_sprite,
            &mut self.ids,
        );
        log::info!(
            "Wave spawned: {}x{} ({} invaders)",
            wave.columns,
            wave.rows,
            wave.invaders.len()
        );
        self.events.push(GameEvent::WaveSpawned {
            columns: wave.columns,
            rows: wave.rows,
        });
        self.waves.push(wave);
    }

    /// Draw the next wave-arrival interval
    pub fn reroll_spawn_interval(&mut self) {
        self.next_spawn_interval = roll_interval(&mut self.rng, &self.settings);
    }
}

fn roll_interval(rng: &mut impl Rng, settings: &Settings) -> u32 {
    rng.random_range(settings.spawn_interval.min..=settings.spawn_interval.max)
}
