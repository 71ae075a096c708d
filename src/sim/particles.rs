//! Particle effects: the falling starfield and explosion bursts

use glam::Vec2;
use rand::Rng;

use super::state::{EntityIds, Particle, ParticleKind};
use crate::settings::Settings;

/// Background stars scattered over the whole playfield
pub fn starfield(rng: &mut impl Rng, settings: &Settings, ids: &mut EntityIds) -> Vec<Particle> {
    let field = settings.playfield;
    (0..settings.star_count)
        .map(|_| Particle {
            id: ids.next_id(),
            kind: ParticleKind::Star,
            pos: Vec2::new(
                rng.random::<f32>() * field.x,
                rng.random::<f32>() * field.y,
            ),
            vel: Vec2::new(0.0, settings.star_fall_speed),
            radius: rng.random::<f32>() * settings.star_max_radius,
            color: crate::consts::STAR_COLOR,
            opacity: settings.particle_start_opacity,
            fade_rate: 0.0,
        })
        .collect()
}

/// Fading debris bursting out of `center` in random directions
pub fn burst(
    rng: &mut impl Rng,
    settings: &Settings,
    ids: &mut EntityIds,
    center: Vec2,
    color: u32,
) -> Vec<Particle> {
    let spread = settings.burst_speed_spread;
    (0..settings.burst_count)
        .map(|_| Particle {
            id: ids.next_id(),
            kind: ParticleKind::Debris,
            pos: center,
            vel: Vec2::new(
                (rng.random::<f32>() - 0.5) * spread,
                (rng.random::<f32>() - 0.5) * spread,
            ),
            radius: rng.random::<f32>() * settings.burst_max_radius,
            color,
            opacity: settings.particle_start_opacity,
            fade_rate: settings.particle_fade_rate,
        })
        .collect()
}

/// Move a star that fell off the bottom back above the top at a random x.
/// Returns whether it wrapped.
pub fn wrap_star(particle: &mut Particle, rng: &mut impl Rng, settings: &Settings) -> bool {
    if particle.kind != ParticleKind::Star {
        return false;
    }
    if particle.pos.y - particle.radius >= settings.playfield.y {
        particle.pos.x = rng.random::<f32>() * settings.playfield.x;
        particle.pos.y = -particle.radius;
        return true;
    }
    false
}
