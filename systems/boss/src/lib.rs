#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Boss controller deciding when the boss wanders and when it attacks.
//!
//! The world owns the boss timers and reports them through the boss
//! snapshot. This system turns elapsed timers into commands: a fresh wander
//! target drawn from a seeded random stream, and a radial volley.

use angkor_escape_core::{BossSnapshot, Command, Event, Rect};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Number of projectiles in a full radial volley.
pub const VOLLEY_SPOKES: usize = 18;

const SPOKE_SPACING_DEGREES: f32 = 360.0 / VOLLEY_SPOKES as f32;

/// Configuration parameters required to construct the boss controller.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Unit directions of a full volley: one every 20 degrees starting along +X.
#[must_use]
pub fn shoot_volley() -> Vec<Vec2> {
    (0..VOLLEY_SPOKES)
        .map(|spoke| Vec2::from_angle((spoke as f32 * SPOKE_SPACING_DEGREES).to_radians()))
        .collect()
}

/// Pure system that emits re-target and volley commands for the boss.
#[derive(Debug)]
pub struct BossController {
    rng: ChaCha8Rng,
    volley: Vec<Vec2>,
}

impl BossController {
    /// Creates a new controller using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            volley: shoot_volley(),
        }
    }

    /// Consumes tick events and the boss snapshot to emit boss commands.
    ///
    /// `arena` is the playable floor inside the arena walls. Nothing is
    /// emitted unless time advanced and the boss is alive.
    pub fn handle(
        &mut self,
        events: &[Event],
        boss: Option<&BossSnapshot>,
        arena: Option<Rect>,
        out: &mut Vec<Command>,
    ) {
        let time_advanced = events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }));
        if !time_advanced {
            return;
        }

        let Some(boss) = boss.filter(|boss| boss.actor.alive) else {
            return;
        };

        if boss.retarget_due {
            if let Some(arena) = arena {
                let target = self.pick_target(&arena, boss.actor.hitbox.size());
                out.push(Command::RetargetBoss { target });
            }
        }

        if boss.volley_ready {
            out.push(Command::FireVolley {
                directions: self.volley.clone(),
            });
        }
    }

    /// Draws a point where the boss hitbox, centred on it, fits inside `arena`.
    fn pick_target(&mut self, arena: &Rect, hitbox: Vec2) -> Vec2 {
        let reachable = arena.inflated(-hitbox.x, -hitbox.y);
        let x = self.rng.gen_range(reachable.left()..=reachable.right());
        let y = self.rng.gen_range(reachable.top()..=reachable.bottom());
        Vec2::new(x, y)
    }
}
