//! Host-side session
//!
//! Bridges a variable-rate host loop (display refresh, terminal, test driver)
//! to the fixed-tick simulation: accumulates frame time, latches key presses
//! that land between ticks, forwards events to a [`Presenter`], and rebuilds
//! the world on restart.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::SIM_DT;
use crate::error::ConfigError;
use crate::settings::Settings;
use crate::sim::{GameEvent, Snapshot, TickInput, World, tick};

/// Longest frame time accepted in one go (seconds)
const MAX_FRAME_TIME: f32 = 0.1;

/// Presentation collaborators. Every hook is optional.
pub trait Presenter {
    /// Score display
    fn score_changed(&mut self, _score: u64) {}
    /// One-shot game-over notification
    fn game_over(&mut self, _score: u64) {}
    /// A new wave arrived
    fn wave_spawned(&mut self, _columns: u32, _rows: u32) {}
    /// Render sink
    fn render(&mut self, _snapshot: &Snapshot) {}
}

/// A running game plus its host-side timing and input state
pub struct Session {
    settings: Settings,
    world: World,
    accumulator: f32,
    /// Held keys
    input: TickInput,
    /// Fire pressed since the last tick (survives a release before the tick)
    fire_tap: bool,
    /// Pause requested since the last tick
    pause_tap: bool,
}

impl Session {
    /// Validate settings and start a game with resolved sprites
    pub fn new(settings: Settings, seed: u64) -> Result<Self, ConfigError> {
        settings.validate()?;
        let world = build_world(&settings, seed);
        Ok(Self {
            settings,
            world,
            accumulator: 0.0,
            input: TickInput::default(),
            fire_tap: false,
            pause_tap: false,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace all held keys at once. Fire and pause presses are latched until
    /// the next tick.
    pub fn set_input(&mut self, input: TickInput) {
        if input.fire && !self.input.fire {
            self.fire_tap = true;
        }
        if input.pause && !self.input.pause {
            self.pause_tap = true;
        }
        self.input = input;
    }

    /// Held movement keys (level-triggered)
    pub fn set_movement(&mut self, left: bool, right: bool) {
        self.input.move_left = left;
        self.input.move_right = right;
    }

    pub fn press_fire(&mut self) {
        self.input.fire = true;
        self.fire_tap = true;
    }

    pub fn release_fire(&mut self) {
        self.input.fire = false;
    }

    pub fn toggle_pause(&mut self) {
        self.pause_tap = true;
    }

    /// Run as many fixed ticks as `elapsed` seconds cover (bounded), notify
    /// the presenter, and hand it a fresh snapshot. Returns the ticks run.
    pub fn frame(&mut self, elapsed: f32, presenter: &mut impl Presenter) -> u32 {
        self.accumulator += elapsed.clamp(0.0, MAX_FRAME_TIME);

        // Anything queued outside a tick (restart)
        for event in self.world.drain_events() {
            dispatch(event, presenter);
        }

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < self.settings.max_substeps {
            if self.world.is_over() {
                self.accumulator = 0.0;
                break;
            }
            let input = TickInput {
                fire: self.input.fire || self.fire_tap,
                pause: self.pause_tap,
                ..self.input
            };
            tick(&mut self.world, &input);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.fire_tap = false;
            self.pause_tap = false;

            for event in self.world.drain_events() {
                dispatch(event, presenter);
            }
        }

        if self.accumulator >= SIM_DT {
            log::warn!(
                "Dropping {:.3}s of simulation after {} substeps",
                self.accumulator,
                substeps
            );
            self.accumulator = 0.0;
        }

        presenter.render(&Snapshot::capture(&self.world));
        substeps
    }

    /// Discard the world and start over from scratch
    pub fn restart(&mut self, seed: u64) {
        log::info!("Restarting with seed {}", seed);
        self.world = build_world(&self.settings, seed);
        // The score display still shows the last run
        self.world.events.push(GameEvent::ScoreChanged { score: 0 });
        self.accumulator = 0.0;
        self.input = TickInput::default();
        self.fire_tap = false;
        self.pause_tap = false;
    }
}

fn build_world(settings: &Settings, seed: u64) -> World {
    let mut world = World::with_rng(settings.clone(), seed, Pcg32::seed_from_u64(seed));
    world.resolve_player_sprite(settings.player_size);
    world.resolve_invader_sprite(settings.invader_size);
    world
}

fn dispatch(event: GameEvent, presenter: &mut impl Presenter) {
    match event {
        GameEvent::ScoreChanged { score } => presenter.score_changed(score),
        GameEvent::GameOver { score } => presenter.game_over(score),
        GameEvent::WaveSpawned { columns, rows } => presenter.wave_spawned(columns, rows),
        GameEvent::InvaderDestroyed { .. } | GameEvent::PlayerHit { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::IntRange;
    use crate::sim::{GamePhase, InvaderProjectile};
    use glam::Vec2;

    #[derive(Default)]
    struct Recorder {
        scores: Vec<u64>,
        game_overs: Vec<u64>,
        waves: u32,
        frames: u32,
        last: Option<Snapshot>,
    }

    impl Presenter for Recorder {
        fn score_changed(&mut self, score: u64) {
            self.scores.push(score);
        }
        fn game_over(&mut self, score: u64) {
            self.game_overs.push(score);
        }
        fn wave_spawned(&mut self, _columns: u32, _rows: u32) {
            self.waves += 1;
        }
        fn render(&mut self, snapshot: &Snapshot) {
            self.frames += 1;
            self.last = Some(snapshot.clone());
        }
    }

    #[test]
    fn test_rejects_invalid_settings() {
        let settings = Settings {
            wave_columns: IntRange::new(0, 3),
            ..Default::default()
        };
        assert!(Session::new(settings, 1).is_err());
    }

    #[test]
    fn test_frame_runs_fixed_ticks() {
        let mut session = Session::new(Settings::default(), 1).unwrap();
        let mut rec = Recorder::default();
        // Slightly more than three ticks of time
        let ran = session.frame(SIM_DT * 3.0 + 0.001, &mut rec);
        assert_eq!(ran, 3);
        assert_eq!(session.world().time_ticks, 3);
        assert_eq!(rec.waves, 1);
        assert_eq!(rec.frames, 1);
        assert!(rec.last.unwrap().player.is_some());
    }

    #[test]
    fn test_long_frame_is_bounded() {
        let settings = Settings {
            max_substeps: 2,
            ..Default::default()
        };
        let mut session = Session::new(settings, 1).unwrap();
        let mut rec = Recorder::default();
        assert_eq!(session.frame(5.0, &mut rec), 2);
        // The backlog is dropped rather than carried into the next frame
        assert_eq!(session.frame(0.0, &mut rec), 0);
        assert_eq!(session.world().time_ticks, 2);
    }

    #[test]
    fn test_quick_tap_still_fires() {
        let mut session = Session::new(Settings::default(), 1).unwrap();
        let mut rec = Recorder::default();
        session.press_fire();
        session.release_fire();
        session.frame(SIM_DT, &mut rec);
        assert_eq!(session.world().projectiles.len(), 1);
        session.frame(SIM_DT, &mut rec);
        assert_eq!(session.world().projectiles.len(), 1);
    }

    #[test]
    fn test_set_input_latches_press() {
        let mut session = Session::new(Settings::default(), 1).unwrap();
        let mut rec = Recorder::default();
        let held = TickInput {
            move_right: true,
            fire: true,
            ..Default::default()
        };
        session.set_input(held);
        session.set_input(TickInput {
            move_right: true,
            ..Default::default()
        });
        let start_x = session.world().player.pos.x;
        session.frame(SIM_DT, &mut rec);
        assert_eq!(session.world().projectiles.len(), 1);
        assert_eq!(session.world().player.pos.x, start_x + 10.0);
    }

    #[test]
    fn test_pause_toggle() {
        let mut session = Session::new(Settings::default(), 1).unwrap();
        let mut rec = Recorder::default();
        session.toggle_pause();
        session.frame(SIM_DT, &mut rec);
        assert!(session.world().paused);
        for _ in 0..4 {
            session.frame(SIM_DT, &mut rec);
        }
        assert_eq!(session.world().time_ticks, 0);
        session.toggle_pause();
        session.frame(SIM_DT, &mut rec);
        assert!(!session.world().paused);
        assert_eq!(session.world().time_ticks, 1);
    }

    #[test]
    fn test_game_over_notified_once_then_restart() {
        let settings = Settings {
            game_over_delay_ticks: 2,
            ..Default::default()
        };
        let mut session = Session::new(settings, 1).unwrap();
        let mut rec = Recorder::default();

        let pos = session.world.player.pos;
        let id = session.world.next_entity_id();
        session.world.invader_projectiles.push(InvaderProjectile::new(
            id,
            pos,
            Vec2::ZERO,
            Vec2::new(6.0, 12.0),
        ));
        for _ in 0..10 {
            session.frame(SIM_DT, &mut rec);
        }
        assert_eq!(session.world().phase, GamePhase::Over);
        assert_eq!(rec.game_overs, vec![0]);

        session.restart(2);
        assert_eq!(session.world().phase, GamePhase::Active);
        assert_eq!(session.world().score, 0);
        assert_eq!(session.world().time_ticks, 0);
        assert!(session.world().waves.is_empty());
        assert_eq!(session.world().player.opacity, 1.0);
    }

    #[test]
    fn test_score_forwarded() {
        let mut session = Session::new(Settings::default(), 1).unwrap();
        let mut rec = Recorder::default();
        session.frame(SIM_DT, &mut rec);

        // Put a projectile inside the first invader of the opening wave
        let target = session.world.waves[0].invaders[0].pos + Vec2::splat(15.0);
        let id = session.world.next_entity_id();
        session
            .world
            .projectiles
            .push(crate::sim::Projectile::new(id, target, Vec2::ZERO, 4.0));
        session.frame(SIM_DT, &mut rec);
        assert_eq!(rec.scores, vec![1]);
    }

    #[test]
    fn test_restart_resets_score_display() {
        let mut session = Session::new(Settings::default(), 1).unwrap();
        let mut rec = Recorder::default();
        session.frame(SIM_DT, &mut rec);

        let target = session.world.waves[0].invaders[0].pos + Vec2::splat(15.0);
        let id = session.world.next_entity_id();
        session
            .world
            .projectiles
            .push(crate::sim::Projectile::new(id, target, Vec2::ZERO, 4.0));
        session.frame(SIM_DT, &mut rec);
        assert_eq!(rec.scores.last(), Some(&1));

        session.restart(2);
        session.frame(SIM_DT, &mut rec);
        assert_eq!(session.world().score, 0);
        assert_eq!(rec.scores.last(), Some(&0));
        assert_eq!(rec.scores, vec![1, 0]);
    }
}
