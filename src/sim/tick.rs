//! Fixed timestep simulation tick
//!
//! One call advances the world by exactly one discrete step:
//! input -> advance -> invader fire -> collisions -> prune -> wave schedule.
//! Removals are marked during the collision scan and compacted afterwards, so
//! no scan ever sees a shifted index.

use glam::Vec2;

use super::particles;
use super::state::{Advance, GameEvent, GamePhase, Projectile, World};
use crate::consts::{INVADER_DEBRIS_COLOR, PLAYER_DEBRIS_COLOR};

/// Input intents for a single tick (levels, as sampled from the keyboard)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Fire key is down; a projectile spawns only on the press transition
    pub fire: bool,
    /// Pause key is down; toggles on the press transition
    pub pause: bool,
}

/// Advance the world by one tick
pub fn tick(world: &mut World, input: &TickInput) {
    if world.phase == GamePhase::Over {
        return;
    }

    // Pause toggle (edge)
    let pause_pressed = input.pause && !world.pause_held;
    world.pause_held = input.pause;
    if pause_pressed {
        world.paused = !world.paused;
        log::info!("{}", if world.paused { "Paused" } else { "Resumed" });
    }
    if world.paused {
        return;
    }

    // Game-over countdown
    if let GamePhase::Ending { ticks_left } = world.phase {
        let ticks_left = ticks_left.saturating_sub(1);
        if ticks_left == 0 {
            world.phase = GamePhase::Over;
            world.events.push(GameEvent::GameOver { score: world.score });
            log::info!("Game over, final score {}", world.score);
            return;
        }
        world.phase = GamePhase::Ending { ticks_left };
    }

    world.time_ticks += 1;

    apply_input(world, input);
    advance_entities(world);
    invaders_fire(world);
    resolve_player_hits(world);
    resolve_invader_hits(world);
    prune(world);
    schedule_waves(world);
}

/// Player velocity/tilt from held keys; projectile on a fire press
fn apply_input(world: &mut World, input: &TickInput) {
    let fire_pressed = input.fire && !world.fire_held;
    world.fire_held = input.fire;

    let player = &mut world.player;
    let Some(bounds) = player.bounds() else {
        return;
    };

    if world.phase != GamePhase::Active {
        player.vel.x = 0.0;
        player.rotation = 0.0;
        return;
    }

    let speed = world.settings.player_speed;
    let tilt = world.settings.player_tilt;
    if input.move_left && bounds.min.x >= 0.0 {
        player.vel.x = -speed;
        player.rotation = -tilt;
    } else if input.move_right && bounds.max.x <= world.settings.playfield.x {
        player.vel.x = speed;
        player.rotation = tilt;
    } else {
        player.vel.x = 0.0;
        player.rotation = 0.0;
    }

    if fire_pressed {
        let id = world.next_entity_id();
        let muzzle = Vec2::new(bounds.center().x, bounds.min.y);
        world.projectiles.push(Projectile::new(
            id,
            muzzle,
            Vec2::new(0.0, -world.settings.projectile_speed),
            world.settings.projectile_radius,
        ));
    }
}

/// Every entity moves by its velocity exactly once
fn advance_entities(world: &mut World) {
    world.player.advance();
    world.player.clamp_to(world.settings.playfield.x);

    for projectile in &mut world.projectiles {
        projectile.advance();
    }
    for projectile in &mut world.invader_projectiles {
        projectile.advance();
    }

    let width = world.settings.playfield.x;
    let drop = world.settings.wave_drop();
    for wave in &mut world.waves {
        wave.sweep(width, drop);
    }

    for particle in &mut world.particles {
        particle.advance();
        particles::wrap_star(particle, &mut world.rng, &world.settings);
    }
}

/// Each wave shoots from a random survivor on the fire period
fn invaders_fire(world: &mut World) {
    if world.time_ticks % world.settings.invader_fire_period as u64 != 0 {
        return;
    }
    for wave in &world.waves {
        if !wave.is_ready() {
            continue;
        }
        if let Some(shot) = wave.shoot(&mut world.rng, &world.settings, &mut world.ids) {
            world.invader_projectiles.push(shot);
        }
    }
}

/// Invader projectiles against the player. Only the first hit counts.
fn resolve_player_hits(world: &mut World) {
    if world.phase != GamePhase::Active {
        return;
    }
    let Some(player_box) = world.player.bounds() else {
        return;
    };

    let Some(shot) = world
        .invader_projectiles
        .iter_mut()
        .find(|p| !p.spent && p.bounds().overlaps(&player_box))
    else {
        return;
    };
    shot.spent = true;

    world.player.opacity = 0.0;
    world.phase = GamePhase::Ending {
        ticks_left: world.settings.game_over_delay_ticks,
    };

    let center = player_box.center();
    let debris = particles::burst(
        &mut world.rng,
        &world.settings,
        &mut world.ids,
        center,
        PLAYER_DEBRIS_COLOR,
    );
    world.particles.extend(debris);
    world.events.push(GameEvent::PlayerHit { position: center });
    log::info!("Player hit at x={:.1}, score {}", world.player.pos.x, world.score);
}

/// Player projectiles against invaders. Each projectile and each invader is
/// consumed at most once; emptied waves go in the same tick.
fn resolve_invader_hits(world: &mut World) {
    let mut kills: Vec<Vec2> = Vec::new();

    for wave in &mut world.waves {
        for invader in &mut wave.invaders {
            if invader.destroyed {
                continue;
            }
            let Some(invader_box) = invader.bounds() else {
                continue;
            };
            let hit = world
                .projectiles
                .iter_mut()
                .find(|p| !p.spent && p.bounds().overlaps(&invader_box));
            if let Some(projectile) = hit {
                projectile.spent = true;
                invader.destroyed = true;
                kills.push(invader_box.center());
            }
        }
    }

    for center in kills {
        world.score += 1;
        let debris = particles::burst(
            &mut world.rng,
            &world.settings,
            &mut world.ids,
            center,
            INVADER_DEBRIS_COLOR,
        );
        world.particles.extend(debris);
        world.events.push(GameEvent::InvaderDestroyed { position: center });
        world.events.push(GameEvent::ScoreChanged { score: world.score });
        log::debug!("Invader destroyed at ({:.1}, {:.1})", center.x, center.y);
    }

    for wave in &mut world.waves {
        wave.compact();
    }
    world.waves.retain(|w| {
        if w.is_empty() {
            log::info!("Wave {} cleared", w.id);
        }
        !w.is_empty()
    });
}

/// Drop spent and off-screen projectiles, faded debris, and waves that have
/// descended past the bottom edge
fn prune(world: &mut World) {
    let height = world.settings.playfield.y;
    world.waves.retain(|w| {
        let gone = w.is_below(height);
        if gone {
            log::info!("Wave {} left the playfield", w.id);
        }
        !gone
    });
    world
        .projectiles
        .retain(|p| !p.spent && !p.is_off_screen());
    world
        .invader_projectiles
        .retain(|p| !p.spent && !p.is_off_screen(height));
    world.particles.retain(|p| !p.is_faded());
}

/// Spawn a wave whenever the randomized interval elapses. The counter starts
/// at zero, so the opening wave arrives on the first tick.
fn schedule_waves(world: &mut World) {
    if world.frames % world.next_spawn_interval == 0 {
        world.spawn_wave();
        world.reroll_spawn_interval();
        world.frames = 0;
    }
    world.frames += 1;
}
