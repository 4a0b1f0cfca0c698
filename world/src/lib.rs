#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Angkor Escape.

mod actor;
mod hazards;
mod projectiles;

use std::time::Duration;

use angkor_escape_core::{
    Combatant, Command, DamageSource, Event, HazardKind, InputState, MazeLayout, Phase,
    ProjectileId, ProjectileOwner, Rect, RemovalReason, GAME_TITLE,
};
use glam::Vec2;

use actor::Actor;
use hazards::Hazard;
use projectiles::{Projectile, ProjectileStore};

/// How an actor's collision rectangle is derived from its visual box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HitboxShape {
    /// Fixed-size rectangle placed at an offset from the box's upper-left corner.
    Offset {
        /// Offset from the visual box origin.
        offset: Vec2,
        /// Size of the hitbox.
        size: Vec2,
    },
    /// Visual box shrunk around its centre by `shrink` on each axis.
    Inset {
        /// Total reduction of width and height.
        shrink: f32,
    },
}

/// Tunable parameters shared by every actor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActorTuning {
    /// Size of the visual box.
    pub size: Vec2,
    /// Collision rectangle derivation.
    pub hitbox: HitboxShape,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Health at spawn.
    pub max_health: u32,
    /// Window after a hit during which further damage is ignored.
    pub invincibility: Duration,
    /// Length of one flicker phase while invincible.
    pub flicker_period: Duration,
    /// Time each animation frame stays on screen.
    pub frame_period: Duration,
    /// Frames per facing strip.
    pub frame_count: usize,
}

/// Tunable parameters of a projectile kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileTuning {
    /// Side length of the square collision rectangle.
    pub size: f32,
    /// Speed in world units per second.
    pub speed: f32,
    /// Maximum age before the projectile expires.
    pub ttl: Duration,
}

/// Tunable parameters of hazard tiles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HazardTuning {
    /// Minimum time between animation steps.
    pub frame_duration: Duration,
    /// Time a hazard stays harmless after finishing its sweep.
    pub dormant_duration: Duration,
    /// Frames in the spike animation.
    pub spike_frames: usize,
    /// Frames in the fire animation.
    pub fire_frames: usize,
}

impl HazardTuning {
    fn frames_for(&self, kind: HazardKind) -> usize {
        match kind {
            HazardKind::Spike => self.spike_frames,
            HazardKind::Fire => self.fire_frames,
        }
    }
}

/// Tunable parameters of the boss arena.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArenaTuning {
    /// Side length of the square arena including its walls.
    pub size: f32,
    /// Thickness of the surrounding walls.
    pub wall_thickness: f32,
    /// Centre of the player's visual box on arrival.
    pub player_spawn: Vec2,
    /// Centre of the spear lying on the floor on arrival.
    pub spear_spawn: Vec2,
    /// Interval after which the boss may pick a new wander target.
    pub retarget_interval: Duration,
    /// Interval the boss waits between volleys.
    pub volley_interval: Duration,
    /// Delay between two spear throws.
    pub throw_cooldown: Duration,
}

/// Every tunable constant of the simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tuning {
    /// Player character parameters.
    pub player: ActorTuning,
    /// Boss parameters.
    pub boss: ActorTuning,
    /// Thrown spear parameters.
    pub player_projectile: ProjectileTuning,
    /// Boss fireball parameters.
    pub boss_projectile: ProjectileTuning,
    /// Hazard tile parameters.
    pub hazards: HazardTuning,
    /// Arena parameters.
    pub arena: ArenaTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player: ActorTuning {
                size: Vec2::splat(96.0),
                hitbox: HitboxShape::Offset {
                    offset: Vec2::new(40.0, 32.0),
                    size: Vec2::new(16.0, 32.0),
                },
                speed: 200.0,
                max_health: 100,
                invincibility: Duration::from_millis(1_000),
                flicker_period: Duration::from_millis(100),
                frame_period: Duration::from_millis(100),
                frame_count: 4,
            },
            boss: ActorTuning {
                size: Vec2::splat(128.0),
                hitbox: HitboxShape::Inset { shrink: 40.0 },
                speed: 100.0,
                max_health: 100,
                invincibility: Duration::ZERO,
                flicker_period: Duration::from_millis(100),
                frame_period: Duration::from_millis(150),
                frame_count: 4,
            },
            player_projectile: ProjectileTuning {
                size: 32.0,
                speed: 400.0,
                ttl: Duration::from_millis(5_000),
            },
            boss_projectile: ProjectileTuning {
                size: 12.0,
                speed: 200.0,
                ttl: Duration::from_millis(8_000),
            },
            hazards: HazardTuning {
                frame_duration: Duration::from_millis(150),
                dormant_duration: Duration::from_millis(1_500),
                spike_frames: 4,
                fire_frames: 6,
            },
            arena: ArenaTuning {
                size: 640.0,
                wall_thickness: 64.0,
                player_spawn: Vec2::new(320.0, 512.0),
                spear_spawn: Vec2::new(160.0, 512.0),
                retarget_interval: Duration::from_secs(2),
                volley_interval: Duration::from_millis(2_000),
                throw_cooldown: Duration::from_secs(1),
            },
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Spear {
    carried: bool,
    pickup: Option<Rect>,
    in_flight: Option<ProjectileId>,
    last_throw: Option<Duration>,
}

impl Spear {
    fn ready(&self, now: Duration, cooldown: Duration) -> bool {
        self.last_throw
            .map_or(true, |thrown| now.saturating_sub(thrown) >= cooldown)
    }
}

/// Represents the authoritative Angkor Escape world state.
#[derive(Debug)]
pub struct World {
    title: &'static str,
    tuning: Tuning,
    phase: Phase,
    clock: Duration,
    tick_index: u64,
    maze: Option<MazeLayout>,
    arena: Option<Rect>,
    obstacles: Vec<Rect>,
    movement_area: Rect,
    hazards: Vec<Hazard>,
    player: Actor,
    boss: Option<Actor>,
    projectiles: ProjectileStore,
    spear: Spear,
}

impl World {
    /// Creates a new world with default tuning, waiting for a maze.
    #[must_use]
    pub fn new() -> Self {
        Self::with_tuning(Tuning::default())
    }

    /// Creates a new world that uses the provided tuning.
    #[must_use]
    pub fn with_tuning(tuning: Tuning) -> Self {
        Self {
            title: GAME_TITLE,
            player: Actor::player(&tuning.player, Vec2::ZERO),
            tuning,
            phase: Phase::Maze,
            clock: Duration::ZERO,
            tick_index: 0,
            maze: None,
            arena: None,
            obstacles: Vec::new(),
            movement_area: Rect::new(0.0, 0.0, 0.0, 0.0),
            hazards: Vec::new(),
            boss: None,
            projectiles: ProjectileStore::new(),
            spear: Spear::default(),
        }
    }

    fn load_maze(&mut self, layout: MazeLayout, out_events: &mut Vec<Event>) {
        self.halt_player(out_events);

        let start = layout.tile_rect(layout.start()).center();
        self.player = Actor::player(&self.tuning.player, start);
        self.obstacles = layout.wall_rects();
        let bounds = layout.bounds();
        self.movement_area = Rect::new(
            bounds.left(),
            bounds.top(),
            bounds.width() + layout.tile_length(),
            bounds.height(),
        );

        let hazards = self.tuning.hazards;
        let now = self.clock;
        self.hazards = layout
            .hazard_tiles()
            .into_iter()
            .map(|(cell, kind)| {
                Hazard::new(
                    cell,
                    kind,
                    layout.tile_rect(cell),
                    hazards.frames_for(kind),
                    hazards.frame_duration,
                    hazards.dormant_duration,
                    now,
                )
            })
            .collect();

        self.boss = None;
        self.arena = None;
        self.projectiles.clear();
        self.spear = Spear::default();

        log::info!(
            "loaded {}x{} maze with {} hazards",
            layout.columns(),
            layout.rows(),
            self.hazards.len()
        );
        out_events.push(Event::MazeLoaded {
            columns: layout.columns(),
            rows: layout.rows(),
            exit: layout.exit(),
        });
        self.maze = Some(layout);
        self.change_phase(Phase::Maze, out_events);
    }

    fn enter_arena(&mut self, out_events: &mut Vec<Event>) {
        if self.phase.is_terminal() || self.phase == Phase::Arena {
            return;
        }

        let arena = self.tuning.arena;
        let size = arena.size;
        let wall = arena.wall_thickness;
        let outer = Rect::new(0.0, 0.0, size, size);
        let inner = outer.inflated(-2.0 * wall, -2.0 * wall);

        self.obstacles = vec![
            Rect::new(0.0, 0.0, size, wall),
            Rect::new(0.0, size - wall, size, wall),
            Rect::new(0.0, 0.0, wall, size),
            Rect::new(size - wall, 0.0, wall, size),
        ];
        self.movement_area = inner;
        self.arena = Some(inner);
        self.hazards.clear();
        self.projectiles.clear();

        self.halt_player(out_events);
        self.player.place_center(arena.player_spawn);
        self.boss = Some(Actor::boss(
            &self.tuning.boss,
            outer.center(),
            arena.retarget_interval,
            arena.volley_interval,
            self.clock,
        ));
        let spear = Rect::from_center(
            arena.spear_spawn,
            Vec2::splat(self.tuning.player_projectile.size),
        );
        self.spear = Spear {
            pickup: Some(spear.clamped_inside(&inner)),
            ..Spear::default()
        };

        out_events.push(Event::ArenaEntered);
        self.change_phase(Phase::Arena, out_events);
    }

    fn tick(&mut self, dt: Duration, now: Duration, input: InputState, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        self.clock = self.clock.max(now);
        let now = self.clock;
        out_events.push(Event::TimeAdvanced { dt, now });

        match self.phase {
            Phase::Maze => {
                if self.maze.is_none() {
                    return;
                }
                self.move_player(&input, dt, out_events);
                self.cycle_hazards(now, out_events);
                self.projectiles.advance(dt, now);
            }
            Phase::Arena => {
                self.move_player(&input, dt, out_events);
                self.projectiles.advance(dt, now);
                self.handle_spear(&input, now, out_events);
                self.move_boss(dt);
            }
            Phase::Escaped | Phase::Victory | Phase::Defeat => {}
        }
    }

    fn move_player(&mut self, input: &InputState, dt: Duration, out_events: &mut Vec<Event>) {
        if !self.player.is_alive() {
            return;
        }

        let was_moving = self.player.is_moving();
        self.player
            .steer_with_input(input, dt, &self.obstacles, &self.movement_area);
        self.player.animate(dt);

        match (was_moving, self.player.is_moving()) {
            (false, true) => out_events.push(Event::FootstepsStarted),
            (true, false) => out_events.push(Event::FootstepsStopped),
            _ => {}
        }
    }

    fn halt_player(&mut self, out_events: &mut Vec<Event>) {
        if self.player.halt() {
            out_events.push(Event::FootstepsStopped);
        }
    }

    fn cycle_hazards(&mut self, now: Duration, out_events: &mut Vec<Event>) {
        for hazard in &mut self.hazards {
            if hazard.update(now) {
                out_events.push(Event::HazardToggled {
                    cell: hazard.cell(),
                    kind: hazard.kind(),
                    active: hazard.is_active(),
                });
            }
        }
    }

    fn move_boss(&mut self, dt: Duration) {
        let Some(boss) = self.boss.as_mut() else {
            return;
        };
        if !boss.is_alive() {
            return;
        }
        boss.seek(dt, &self.obstacles, &self.movement_area);
        boss.animate(dt);
    }

    fn handle_spear(&mut self, input: &InputState, now: Duration, out_events: &mut Vec<Event>) {
        if !self.player.is_alive() {
            return;
        }

        if !self.spear.carried {
            let hitbox = self.player.hitbox();
            if self
                .spear
                .pickup
                .is_some_and(|pickup| pickup.intersects(&hitbox))
            {
                self.spear.carried = true;
                self.spear.pickup = None;
                out_events.push(Event::SpearCollected);
            }
        }

        let cooldown = self.tuning.arena.throw_cooldown;
        if !input.throw || !self.spear.carried || !self.spear.ready(now, cooldown) {
            return;
        }

        let spear = self.tuning.player_projectile;
        let origin = self.player.bounds().center();
        let direction = self.player.facing().unit();
        let Some(projectile) = self.spawn_projectile(
            ProjectileOwner::Player,
            origin,
            direction,
            spear.speed,
            spear.ttl,
            out_events,
        ) else {
            return;
        };

        self.spear.carried = false;
        self.spear.in_flight = Some(projectile);
        self.spear.last_throw = Some(now);
        out_events.push(Event::SpearThrown { projectile });
    }

    fn spawn_projectile(
        &mut self,
        owner: ProjectileOwner,
        origin: Vec2,
        direction: Vec2,
        speed: f32,
        ttl: Duration,
        out_events: &mut Vec<Event>,
    ) -> Option<ProjectileId> {
        if !matches!(self.phase, Phase::Maze | Phase::Arena) {
            return None;
        }

        let size = match owner {
            ProjectileOwner::Player => self.tuning.player_projectile.size,
            ProjectileOwner::Boss => self.tuning.boss_projectile.size,
        };
        let id = self.projectiles.allocate_id();
        let projectile =
            Projectile::spawn(id, owner, origin, direction, speed, size, ttl, self.clock)?;
        self.projectiles.insert(projectile);
        out_events.push(Event::ProjectileSpawned { id, owner });
        Some(id)
    }

    fn retarget_boss(&mut self, target: Vec2, out_events: &mut Vec<Event>) {
        if self.phase != Phase::Arena {
            return;
        }
        let Some(boss) = self.boss.as_mut().filter(|boss| boss.is_alive()) else {
            return;
        };
        if boss.retarget(target) {
            log::debug!("boss retargeted to ({:.1}, {:.1})", target.x, target.y);
            out_events.push(Event::BossRetargeted { target });
        }
    }

    fn fire_volley(&mut self, directions: &[Vec2], out_events: &mut Vec<Event>) {
        if self.phase != Phase::Arena || directions.is_empty() {
            return;
        }
        let now = self.clock;
        let Some(boss) = self.boss.as_mut().filter(|boss| boss.is_alive()) else {
            return;
        };
        if !boss.record_attack(now) {
            return;
        }
        let origin = boss.bounds().center();

        let fireball = self.tuning.boss_projectile;
        let mut count = 0;
        for direction in directions {
            if self
                .spawn_projectile(
                    ProjectileOwner::Boss,
                    origin,
                    *direction,
                    fireball.speed,
                    fireball.ttl,
                    out_events,
                )
                .is_some()
            {
                count += 1;
            }
        }

        log::debug!("boss fired a volley of {count} projectiles");
        out_events.push(Event::VolleyFired { count });
    }

    fn apply_damage(
        &mut self,
        target: Combatant,
        amount: u32,
        source: DamageSource,
        out_events: &mut Vec<Event>,
    ) {
        if !matches!(self.phase, Phase::Maze | Phase::Arena) {
            return;
        }

        let target_alive = match target {
            Combatant::Player => self.player.is_alive(),
            Combatant::Boss => self.boss.as_ref().is_some_and(Actor::is_alive),
        };
        if !target_alive {
            return;
        }

        if let DamageSource::Projectile(id) = source {
            let hostile = match target {
                Combatant::Player => ProjectileOwner::Boss,
                Combatant::Boss => ProjectileOwner::Player,
            };
            let owner = self.projectiles.get(id).map(|projectile| projectile.owner);
            if owner != Some(hostile) || !self.projectiles.mark_hit(id) {
                return;
            }
        }

        let now = self.clock;
        match target {
            Combatant::Player => {
                let Some(remaining) = self.player.take_damage(amount, now) else {
                    return;
                };
                log::debug!("player took {amount} damage, {} left", remaining.get());
                out_events.push(Event::PlayerDamaged {
                    amount,
                    source,
                    remaining,
                });
                if remaining.is_zero() {
                    out_events.push(Event::PlayerDied);
                }
            }
            Combatant::Boss => {
                let Some(boss) = self.boss.as_mut() else {
                    return;
                };
                let Some(remaining) = boss.take_damage(amount, now) else {
                    return;
                };
                log::debug!("boss took {amount} damage, {} left", remaining.get());
                out_events.push(Event::BossDamaged { amount, remaining });
                if remaining.is_zero() {
                    out_events.push(Event::BossDefeated);
                }
            }
        }
    }

    fn finish_tick(&mut self, out_events: &mut Vec<Event>) {
        for projectile in self.projectiles.compact() {
            out_events.push(Event::ProjectileRemoved {
                id: projectile.id,
                reason: projectile.spent.unwrap_or(RemovalReason::Expired),
            });
            if self.spear.in_flight == Some(projectile.id) {
                self.spear.in_flight = None;
                self.spear.pickup = Some(projectile.bounds.clamped_inside(&self.movement_area));
            }
        }

        if self.phase.is_terminal() {
            return;
        }

        if !self.player.is_alive() {
            self.change_phase(Phase::Defeat, out_events);
            return;
        }

        match self.phase {
            Phase::Arena => {
                if self.boss.as_ref().is_some_and(|boss| !boss.is_alive()) {
                    self.change_phase(Phase::Victory, out_events);
                }
            }
            Phase::Maze => {
                if self.player_escaped() {
                    self.change_phase(Phase::Escaped, out_events);
                }
            }
            Phase::Escaped | Phase::Victory | Phase::Defeat => {}
        }
    }

    fn player_escaped(&self) -> bool {
        self.maze
            .as_ref()
            .is_some_and(|maze| self.player.bounds().left() > maze.exit_rect().right())
    }

    fn change_phase(&mut self, phase: Phase, out_events: &mut Vec<Event>) {
        if self.phase == phase {
            return;
        }
        if phase != Phase::Arena {
            self.halt_player(out_events);
        }
        log::info!("phase changed from {:?} to {:?}", self.phase, phase);
        self.phase = phase;
        out_events.push(Event::PhaseChanged { phase });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::LoadMaze { layout } => world.load_maze(layout, out_events),
        Command::EnterArena => world.enter_arena(out_events),
        Command::Tick { dt, now, input } => world.tick(dt, now, input, out_events),
        Command::RetargetBoss { target } => world.retarget_boss(target, out_events),
        Command::FireVolley { directions } => world.fire_volley(&directions, out_events),
        Command::SpawnProjectile {
            owner,
            origin,
            direction,
            speed,
            ttl,
        } => {
            let _ = world.spawn_projectile(owner, origin, direction, speed, ttl, out_events);
        }
        Command::ApplyDamage {
            target,
            amount,
            source,
        } => world.apply_damage(target, amount, source, out_events),
        Command::FinishTick => world.finish_tick(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{Tuning, World};
    use angkor_escape_core::{
        ActorSnapshot, BossSnapshot, HazardView, MazeLayout, Phase, ProjectileOwner,
        ProjectileView, Rect, SpearSnapshot,
    };

    /// Retrieves the title adapters may display to players.
    #[must_use]
    pub fn title(world: &World) -> &'static str {
        world.title
    }

    /// Reports the current phase of the playthrough.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.phase
    }

    /// Reports the clock value of the latest tick.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Number of ticks processed since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Provides read-only access to the tuning in effect.
    #[must_use]
    pub fn tuning(world: &World) -> &Tuning {
        &world.tuning
    }

    /// Provides read-only access to the loaded maze, if any.
    #[must_use]
    pub fn maze(world: &World) -> Option<&MazeLayout> {
        world.maze.as_ref()
    }

    /// Static obstacles of the current stage.
    #[must_use]
    pub fn obstacles(world: &World) -> &[Rect] {
        &world.obstacles
    }

    /// Rectangle the player hitbox is kept inside.
    #[must_use]
    pub fn movement_area(world: &World) -> Rect {
        world.movement_area
    }

    /// Playable floor of the arena, once the player entered it.
    #[must_use]
    pub fn arena_bounds(world: &World) -> Option<Rect> {
        world.arena
    }

    /// Captures the player's state.
    #[must_use]
    pub fn player(world: &World) -> ActorSnapshot {
        world.player.snapshot(world.clock)
    }

    /// Captures the boss's state, once the arena has been entered.
    #[must_use]
    pub fn boss(world: &World) -> Option<BossSnapshot> {
        let boss = world.boss.as_ref()?;
        let now = world.clock;
        let projectiles = projectile_view(world)
            .live_owned_by(ProjectileOwner::Boss)
            .copied()
            .collect();

        Some(BossSnapshot {
            actor: boss.snapshot(now),
            wander_target: boss.wander_target().unwrap_or_else(|| boss.bounds().center()),
            retarget_due: boss.retarget_due(),
            volley_ready: boss.volley_ready(now),
            projectiles,
        })
    }

    /// Captures a read-only view of the hazard tiles.
    #[must_use]
    pub fn hazard_view(world: &World) -> HazardView {
        HazardView::from_snapshots(world.hazards.iter().map(|hazard| hazard.snapshot()).collect())
    }

    /// Captures a read-only view of every projectile, including spent ones
    /// awaiting removal.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .map(|projectile| projectile.snapshot())
                .collect(),
        )
    }

    /// Captures the spear's state.
    #[must_use]
    pub fn spear(world: &World) -> SpearSnapshot {
        SpearSnapshot {
            carried: world.spear.carried,
            pickup: world.spear.pickup,
            ready: world
                .spear
                .ready(world.clock, world.tuning.arena.throw_cooldown),
        }
    }
}
