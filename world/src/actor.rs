//! Shared actor state for the player and the boss.
//!
//! Both characters are the same data structure. What differs is a small
//! behavior descriptor: how the actor decides where to move and whether it
//! attacks on its own.

use std::time::Duration;

use angkor_escape_core::{ActorSnapshot, Facing, Health, InputState, Rect};
use angkor_escape_system_collision::{clamp_inside, resolve};
use glam::Vec2;

use crate::{ActorTuning, HitboxShape};

/// Distance under which a seeking actor considers its target reached.
const ARRIVAL_RADIUS: f32 = 1.0;

/// How an actor chooses its displacement each tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum MovePolicy {
    /// Follows the held direction keys.
    Input,
    /// Steers toward a wander target that is replaced periodically.
    Seek {
        target: Vec2,
        since_retarget: Duration,
        retarget_interval: Duration,
    },
}

/// Whether an actor attacks on its own.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum AttackPolicy {
    None,
    PeriodicVolley {
        interval: Duration,
        last_attack: Duration,
    },
}

#[derive(Clone, Copy, Debug)]
struct Animation {
    frame: usize,
    frame_count: usize,
    period: Duration,
    elapsed: Duration,
    while_idle: bool,
}

impl Animation {
    fn advance(&mut self, dt: Duration, moving: bool) {
        if !moving && !self.while_idle {
            self.frame = 0;
            self.elapsed = Duration::ZERO;
            return;
        }

        let frame_count = self.frame_count.max(1);
        if self.period.is_zero() {
            return;
        }

        self.elapsed = self.elapsed.saturating_add(dt);
        while self.elapsed >= self.period {
            self.elapsed -= self.period;
            self.frame = (self.frame + 1) % frame_count;
        }
    }
}

/// Authoritative state of a living character.
#[derive(Clone, Debug)]
pub(crate) struct Actor {
    bounds: Rect,
    hitbox_shape: HitboxShape,
    facing: Facing,
    speed: f32,
    health: Health,
    max_health: Health,
    alive: bool,
    moving: bool,
    invincibility: Duration,
    flicker_period: Duration,
    last_hit: Option<Duration>,
    animation: Animation,
    move_policy: MovePolicy,
    attack_policy: AttackPolicy,
}

impl Actor {
    /// Creates an input-driven actor whose visual box is centred on `center`.
    pub(crate) fn player(tuning: &ActorTuning, center: Vec2) -> Self {
        Self::from_tuning(tuning, center, MovePolicy::Input, AttackPolicy::None, false)
    }

    /// Creates a seeking actor that fires periodic volleys.
    ///
    /// The wander target starts at the spawn point and both timers start at
    /// `now`, so the first volley comes one interval after the spawn.
    pub(crate) fn boss(
        tuning: &ActorTuning,
        center: Vec2,
        retarget_interval: Duration,
        volley_interval: Duration,
        now: Duration,
    ) -> Self {
        let move_policy = MovePolicy::Seek {
            target: center,
            since_retarget: Duration::ZERO,
            retarget_interval,
        };
        let attack_policy = AttackPolicy::PeriodicVolley {
            interval: volley_interval,
            last_attack: now,
        };
        Self::from_tuning(tuning, center, move_policy, attack_policy, true)
    }

    fn from_tuning(
        tuning: &ActorTuning,
        center: Vec2,
        move_policy: MovePolicy,
        attack_policy: AttackPolicy,
        animate_while_idle: bool,
    ) -> Self {
        let max_health = Health::new(tuning.max_health);
        Self {
            bounds: Rect::from_center(center, tuning.size),
            hitbox_shape: tuning.hitbox,
            facing: Facing::Down,
            speed: tuning.speed,
            health: max_health,
            max_health,
            alive: max_health.get() > 0,
            moving: false,
            invincibility: tuning.invincibility,
            flicker_period: tuning.flicker_period,
            last_hit: None,
            animation: Animation {
                frame: 0,
                frame_count: tuning.frame_count,
                period: tuning.frame_period,
                elapsed: Duration::ZERO,
                while_idle: animate_while_idle,
            },
            move_policy,
            attack_policy,
        }
    }

    pub(crate) fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Collision rectangle derived from the visual box, so the two never drift.
    pub(crate) fn hitbox(&self) -> Rect {
        match self.hitbox_shape {
            HitboxShape::Offset { offset, size } => Rect::new(
                self.bounds.left() + offset.x,
                self.bounds.top() + offset.y,
                size.x,
                size.y,
            ),
            HitboxShape::Inset { shrink } => self.bounds.inflated(-shrink, -shrink),
        }
    }

    pub(crate) fn facing(&self) -> Facing {
        self.facing
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.alive
    }

    pub(crate) fn is_moving(&self) -> bool {
        self.moving
    }

    /// Stops walking. Returns `true` when the actor was moving.
    pub(crate) fn halt(&mut self) -> bool {
        std::mem::replace(&mut self.moving, false)
    }

    /// Moves the visual box so that it is centred on `center`.
    pub(crate) fn place_center(&mut self, center: Vec2) {
        self.bounds = self.bounds.with_center(center);
        self.moving = false;
    }

    /// Moves according to the held keys, sliding along `obstacles`.
    ///
    /// The actor counts as moving whenever a direction is held, even when
    /// walls swallow the whole displacement.
    pub(crate) fn steer_with_input(
        &mut self,
        input: &InputState,
        dt: Duration,
        obstacles: &[Rect],
        area: &Rect,
    ) {
        let Some(heading) = input.heading() else {
            self.moving = false;
            return;
        };

        self.facing = heading;
        self.moving = true;
        let displacement = heading.unit() * self.speed * dt.as_secs_f32();
        self.displace(displacement, obstacles, area);
    }

    /// Steers toward the wander target and accumulates the re-target timer.
    pub(crate) fn seek(&mut self, dt: Duration, obstacles: &[Rect], area: &Rect) {
        let MovePolicy::Seek {
            target,
            since_retarget,
            ..
        } = &mut self.move_policy
        else {
            return;
        };
        *since_retarget = since_retarget.saturating_add(dt);
        let target = *target;

        let to_target = target - self.bounds.center();
        if to_target.length() <= ARRIVAL_RADIUS {
            self.moving = false;
            return;
        }

        let direction = to_target.normalize_or_zero();
        if let Some(facing) = Facing::from_heading(direction) {
            self.facing = facing;
        }
        self.moving = true;

        let step = (self.speed * dt.as_secs_f32()).min(to_target.length());
        self.displace(direction * step, obstacles, area);
    }

    fn displace(&mut self, displacement: Vec2, obstacles: &[Rect], area: &Rect) {
        let hitbox = self.hitbox();
        let resolved = resolve(hitbox, displacement, obstacles);
        let contained = clamp_inside(resolved.hitbox, area);
        let delta = contained.origin() - hitbox.origin();
        self.bounds = self.bounds.translated(delta);
    }

    pub(crate) fn animate(&mut self, dt: Duration) {
        self.animation.advance(dt, self.moving);
    }

    /// Replaces the wander target and restarts the re-target timer.
    pub(crate) fn retarget(&mut self, new_target: Vec2) -> bool {
        let MovePolicy::Seek {
            target,
            since_retarget,
            ..
        } = &mut self.move_policy
        else {
            return false;
        };
        *target = new_target;
        *since_retarget = Duration::ZERO;
        true
    }

    pub(crate) fn wander_target(&self) -> Option<Vec2> {
        match self.move_policy {
            MovePolicy::Seek { target, .. } => Some(target),
            MovePolicy::Input => None,
        }
    }

    pub(crate) fn retarget_due(&self) -> bool {
        match self.move_policy {
            MovePolicy::Seek {
                since_retarget,
                retarget_interval,
                ..
            } => since_retarget > retarget_interval,
            MovePolicy::Input => false,
        }
    }

    pub(crate) fn volley_ready(&self, now: Duration) -> bool {
        match self.attack_policy {
            AttackPolicy::PeriodicVolley {
                interval,
                last_attack,
            } => now.saturating_sub(last_attack) > interval,
            AttackPolicy::None => false,
        }
    }

    /// Restarts the attack timer. Returns `false` for actors that never attack.
    pub(crate) fn record_attack(&mut self, now: Duration) -> bool {
        let AttackPolicy::PeriodicVolley { last_attack, .. } = &mut self.attack_policy else {
            return false;
        };
        *last_attack = now;
        true
    }

    pub(crate) fn is_invincible(&self, now: Duration) -> bool {
        self.last_hit
            .is_some_and(|hit| now.saturating_sub(hit) < self.invincibility)
    }

    /// Flicker phase while invincible: alternates every `flicker_period`
    /// measured from the last hit, starting transparent.
    pub(crate) fn is_visible(&self, now: Duration) -> bool {
        let Some(hit) = self.last_hit else {
            return true;
        };
        if !self.is_invincible(now) {
            return true;
        }
        let period = self.flicker_period.as_millis().max(1);
        (now.saturating_sub(hit).as_millis() / period) % 2 == 1
    }

    /// Applies damage unless the actor is dead or still invincible.
    ///
    /// Returns the remaining health when the hit registered.
    pub(crate) fn take_damage(&mut self, amount: u32, now: Duration) -> Option<Health> {
        if !self.alive || self.is_invincible(now) {
            return None;
        }

        self.health = self.health.saturating_sub(amount);
        self.last_hit = Some(now);
        if self.health.is_zero() {
            self.alive = false;
        }
        Some(self.health)
    }

    pub(crate) fn snapshot(&self, now: Duration) -> ActorSnapshot {
        ActorSnapshot {
            bounds: self.bounds,
            hitbox: self.hitbox(),
            facing: self.facing,
            frame: self.animation.frame,
            health: self.health,
            max_health: self.max_health,
            alive: self.alive,
            moving: self.moving,
            invincible: self.is_invincible(now),
            visible: self.is_visible(now),
        }
    }
}
