#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Angkor Escape simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! presentation collaborators to react to. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub mod geometry;

pub use geometry::{Facing, Rect};

/// Title announced when the experience boots.
pub const GAME_TITLE: &str = "Out of Angkorwat";

/// Describes which stage of a playthrough the simulation is in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// The player navigates the generated maze.
    Maze,
    /// The player walked through the exit and awaits the arena transition.
    Escaped,
    /// The player fights the boss inside the arena.
    Arena,
    /// The boss was defeated. Terminal.
    Victory,
    /// The player ran out of health. Terminal.
    Defeat,
}

impl Phase {
    /// Reports whether the phase ends the playthrough.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Victory | Self::Defeat)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Installs a freshly generated maze and places the player at its start room.
    LoadMaze {
        /// Static geometry of the level.
        layout: MazeLayout,
    },
    /// Moves the player into the boss arena and spawns the boss.
    EnterArena,
    /// Advances the simulation by one frame.
    Tick {
        /// Simulated time that elapsed since the previous tick.
        dt: Duration,
        /// Monotonic clock value sampled once for the whole tick.
        now: Duration,
        /// Input held by the player during the tick.
        input: InputState,
    },
    /// Replaces the point the boss steers toward.
    RetargetBoss {
        /// New wander target in world units.
        target: Vec2,
    },
    /// Fires a radial volley from the boss centre.
    FireVolley {
        /// Unit directions, one projectile per entry.
        directions: Vec<Vec2>,
    },
    /// Spawns a single projectile owned by the provided emitter.
    SpawnProjectile {
        /// Emitter that owns the projectile.
        owner: ProjectileOwner,
        /// Centre of the projectile at spawn time.
        origin: Vec2,
        /// Direction of travel; normalised by the world.
        direction: Vec2,
        /// Speed in world units per second.
        speed: f32,
        /// Maximum age before the projectile expires.
        ttl: Duration,
    },
    /// Requests that damage be applied to a combatant.
    ApplyDamage {
        /// Combatant receiving the damage.
        target: Combatant,
        /// Health points to subtract.
        amount: u32,
        /// Origin of the damage.
        source: DamageSource,
    },
    /// Closes the tick: compacts removed projectiles and resolves outcomes.
    FinishTick,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a maze was installed.
    MazeLoaded {
        /// Number of tile columns in the maze.
        columns: u32,
        /// Number of tile rows in the maze.
        rows: u32,
        /// Tile that leads out of the maze.
        exit: CellCoord,
    },
    /// Confirms that the arena was prepared and the boss spawned.
    ArenaEntered,
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
        /// Clock value for the tick.
        now: Duration,
    },
    /// The player started moving.
    FootstepsStarted,
    /// The player stopped moving.
    FootstepsStopped,
    /// The player collected the spear.
    SpearCollected,
    /// The player threw the spear.
    SpearThrown {
        /// Identifier of the spawned projectile.
        projectile: ProjectileId,
    },
    /// A hazard switched between its active and dormant states.
    HazardToggled {
        /// Tile hosting the hazard.
        cell: CellCoord,
        /// Kind of hazard.
        kind: HazardKind,
        /// Whether the hazard now deals damage.
        active: bool,
    },
    /// The boss picked a new wander target.
    BossRetargeted {
        /// New wander target.
        target: Vec2,
    },
    /// The boss fired a radial volley.
    VolleyFired {
        /// Number of projectiles emitted.
        count: usize,
    },
    /// A projectile entered the simulation.
    ProjectileSpawned {
        /// Identifier assigned to the projectile.
        id: ProjectileId,
        /// Emitter that owns the projectile.
        owner: ProjectileOwner,
    },
    /// A projectile left the simulation during tick compaction.
    ProjectileRemoved {
        /// Identifier of the removed projectile.
        id: ProjectileId,
        /// Why the projectile was removed.
        reason: RemovalReason,
    },
    /// Damage was applied to the player.
    PlayerDamaged {
        /// Health points removed.
        amount: u32,
        /// Origin of the damage.
        source: DamageSource,
        /// Health remaining after the hit.
        remaining: Health,
    },
    /// Damage was applied to the boss.
    BossDamaged {
        /// Health points removed.
        amount: u32,
        /// Health remaining after the hit.
        remaining: Health,
    },
    /// The player's health reached zero.
    PlayerDied,
    /// The boss's health reached zero.
    BossDefeated,
    /// The playthrough moved to a new phase.
    PhaseChanged {
        /// Phase that became active.
        phase: Phase,
    },
}

/// Location of a single maze tile expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Contents of a single maze tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MazeCell {
    /// Walkable floor.
    Open,
    /// Solid wall that blocks movement.
    Wall,
    /// Walkable floor hosting an animated spike trap.
    Spike,
    /// Walkable floor hosting an animated fire trap.
    Fire,
}

impl MazeCell {
    /// Reports whether actors may occupy the tile.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        !matches!(self, Self::Wall)
    }

    /// Hazard hosted by the tile, if any.
    #[must_use]
    pub const fn hazard(self) -> Option<HazardKind> {
        match self {
            Self::Spike => Some(HazardKind::Spike),
            Self::Fire => Some(HazardKind::Fire),
            Self::Open | Self::Wall => None,
        }
    }
}

/// Kinds of animated hazard tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HazardKind {
    /// Spikes that pop out of the floor.
    Spike,
    /// Flames that burst out of the floor.
    Fire,
}

/// Immutable tile layout of a generated maze.
///
/// Cells are stored in row-major order. The layout records three notable
/// tiles: the entrance forced open on the left border, the start room the
/// player spawns in, and the single exit opened on the right border.
#[derive(Clone, Debug, PartialEq)]
pub struct MazeLayout {
    columns: u32,
    rows: u32,
    tile_length: f32,
    cells: Vec<MazeCell>,
    entrance: CellCoord,
    start: CellCoord,
    exit: CellCoord,
}

impl MazeLayout {
    /// Creates a layout from row-major cells.
    ///
    /// Missing cells are filled with walls and surplus cells are discarded so
    /// that the storage always matches the declared dimensions.
    #[must_use]
    pub fn new(
        columns: u32,
        rows: u32,
        tile_length: f32,
        mut cells: Vec<MazeCell>,
        entrance: CellCoord,
        start: CellCoord,
        exit: CellCoord,
    ) -> Self {
        let capacity = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        cells.resize(capacity, MazeCell::Wall);
        Self {
            columns,
            rows,
            tile_length,
            cells,
            entrance,
            start,
            exit,
        }
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a square tile in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Tile forced open on the left border.
    #[must_use]
    pub const fn entrance(&self) -> CellCoord {
        self.entrance
    }

    /// Room the player spawns in.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Tile opened on the right border.
    #[must_use]
    pub const fn exit(&self) -> CellCoord {
        self.exit
    }

    /// Contents of the provided tile, or `None` when it lies outside the grid.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<MazeCell> {
        self.index(coord)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Reports whether the provided tile exists and can be walked on.
    #[must_use]
    pub fn is_walkable(&self, coord: CellCoord) -> bool {
        self.cell(coord).is_some_and(MazeCell::is_walkable)
    }

    /// Iterator over every tile together with its coordinate, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, MazeCell)> + '_ {
        let columns = self.columns.max(1);
        self.cells.iter().enumerate().map(move |(index, cell)| {
            let index = index as u32;
            (CellCoord::new(index % columns, index / columns), *cell)
        })
    }

    /// World-space rectangle covered by the provided tile.
    #[must_use]
    pub fn tile_rect(&self, coord: CellCoord) -> Rect {
        Rect::new(
            coord.column() as f32 * self.tile_length,
            coord.row() as f32 * self.tile_length,
            self.tile_length,
            self.tile_length,
        )
    }

    /// World-space rectangle of the exit tile.
    #[must_use]
    pub fn exit_rect(&self) -> Rect {
        self.tile_rect(self.exit)
    }

    /// World-space rectangle covering the whole grid.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            self.columns as f32 * self.tile_length,
            self.rows as f32 * self.tile_length,
        )
    }

    /// Rectangles of every wall tile, used as the static obstacle set.
    #[must_use]
    pub fn wall_rects(&self) -> Vec<Rect> {
        self.iter()
            .filter(|(_, cell)| !cell.is_walkable())
            .map(|(coord, _)| self.tile_rect(coord))
            .collect()
    }

    /// Tiles hosting hazards, in row-major order.
    #[must_use]
    pub fn hazard_tiles(&self) -> Vec<(CellCoord, HazardKind)> {
        self.iter()
            .filter_map(|(coord, cell)| cell.hazard().map(|kind| (coord, kind)))
            .collect()
    }

    fn index(&self, coord: CellCoord) -> Option<usize> {
        if coord.column() < self.columns && coord.row() < self.rows {
            let row = usize::try_from(coord.row()).ok()?;
            let column = usize::try_from(coord.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Health points carried by an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Health(u32);

impl Health {
    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric health value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether no health remains.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Subtracts damage, flooring at zero.
    #[must_use]
    pub const fn saturating_sub(self, amount: u32) -> Self {
        Self(self.0.saturating_sub(amount))
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Emitter that owns a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileOwner {
    /// Thrown by the player; damages the boss.
    Player,
    /// Fired by the boss; damages the player.
    Boss,
}

/// Combatants that can receive damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Combatant {
    /// The player character.
    Player,
    /// The arena boss.
    Boss,
}

/// Origin of a damage application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DamageSource {
    /// Contact with an active hazard tile.
    Hazard(HazardKind),
    /// Contact with a projectile, which is consumed by the hit.
    Projectile(ProjectileId),
}

/// Reasons a projectile may leave the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RemovalReason {
    /// The projectile outlived its time-to-live.
    Expired,
    /// The projectile struck a combatant.
    Hit,
}

/// Directional keys and actions held during a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct InputState {
    /// Left key held.
    pub left: bool,
    /// Right key held.
    pub right: bool,
    /// Up key held.
    pub up: bool,
    /// Down key held.
    pub down: bool,
    /// Throw key held.
    pub throw: bool,
}

impl InputState {
    /// Resolves held keys into a single heading.
    ///
    /// Directions are mutually exclusive with priority left, right, up, down.
    #[must_use]
    pub const fn heading(&self) -> Option<Facing> {
        if self.left {
            Some(Facing::Left)
        } else if self.right {
            Some(Facing::Right)
        } else if self.up {
            Some(Facing::Up)
        } else if self.down {
            Some(Facing::Down)
        } else {
            None
        }
    }

    /// Input holding a single direction.
    #[must_use]
    pub const fn toward(facing: Facing) -> Self {
        Self {
            left: matches!(facing, Facing::Left),
            right: matches!(facing, Facing::Right),
            up: matches!(facing, Facing::Up),
            down: matches!(facing, Facing::Down),
            throw: false,
        }
    }
}

/// Immutable representation of an actor's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActorSnapshot {
    /// Visual footprint used for rendering and placement.
    pub bounds: Rect,
    /// Reduced collision rectangle used for gameplay contact.
    pub hitbox: Rect,
    /// Direction used to select the animation strip.
    pub facing: Facing,
    /// Index of the current animation frame.
    pub frame: usize,
    /// Remaining health.
    pub health: Health,
    /// Health ceiling.
    pub max_health: Health,
    /// Whether the actor is still alive.
    pub alive: bool,
    /// Whether the actor moved during the last tick.
    pub moving: bool,
    /// Whether the actor is inside its invincibility window.
    pub invincible: bool,
    /// Flicker phase: `false` while the actor should be drawn transparent.
    pub visible: bool,
}

impl ActorSnapshot {
    /// Upper-left corner of the visual footprint.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.bounds.origin()
    }
}

/// Immutable representation of the boss used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct BossSnapshot {
    /// Shared actor state.
    pub actor: ActorSnapshot,
    /// Point the boss steers toward.
    pub wander_target: Vec2,
    /// Whether the re-target interval elapsed.
    pub retarget_due: bool,
    /// Whether the attack interval elapsed.
    pub volley_ready: bool,
    /// Projectiles fired by the boss that are still in flight.
    pub projectiles: Vec<ProjectileSnapshot>,
}

/// Immutable representation of a projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Unique identifier of the projectile.
    pub id: ProjectileId,
    /// Emitter that owns the projectile.
    pub owner: ProjectileOwner,
    /// Collision rectangle of the projectile.
    pub bounds: Rect,
    /// Velocity in world units per second.
    pub velocity: Vec2,
    /// Clock value at which the projectile was spawned.
    pub spawned_at: Duration,
    /// Maximum age of the projectile.
    pub ttl: Duration,
    /// Whether the projectile is marked for removal at the end of the tick.
    pub spent: bool,
}

/// Read-only snapshot describing all projectiles in flight.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Iterator over live projectiles owned by the provided emitter.
    pub fn live_owned_by(
        &self,
        owner: ProjectileOwner,
    ) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots
            .iter()
            .filter(move |snapshot| snapshot.owner == owner && !snapshot.spent)
    }

    /// Number of captured projectiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a hazard tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HazardSnapshot {
    /// Tile hosting the hazard.
    pub cell: CellCoord,
    /// Kind of hazard.
    pub kind: HazardKind,
    /// World-space rectangle of the tile.
    pub bounds: Rect,
    /// Current animation frame.
    pub frame: usize,
    /// Whether the hazard currently deals damage.
    pub active: bool,
}

/// Read-only snapshot describing all hazard tiles.
#[derive(Clone, Debug, Default)]
pub struct HazardView {
    snapshots: Vec<HazardSnapshot>,
}

impl HazardView {
    /// Creates a new hazard view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<HazardSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| (snapshot.cell.row(), snapshot.cell.column()));
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &HazardSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<HazardSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of the spear the player throws at the boss.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpearSnapshot {
    /// Whether the player holds the spear.
    pub carried: bool,
    /// Rectangle of the spear lying on the floor, if any.
    pub pickup: Option<Rect>,
    /// Whether the throw cooldown elapsed.
    pub ready: bool,
}

/// Sink for health reductions, such as an on-screen HP bar.
pub trait HealthDisplay {
    /// Lowers the displayed health by `amount`.
    fn reduce(&mut self, amount: u32);

    /// Raises the displayed health by `amount`.
    fn heal(&mut self, amount: u32);
}

/// Sounds the simulation may request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Looping footstep sound while the player walks.
    Footsteps,
    /// A combatant was hurt.
    Hit,
    /// The boss fired a volley.
    Volley,
    /// The player threw the spear.
    Throw,
}

/// Fire-and-forget audio trigger. The simulation only signals intent.
pub trait AudioCues {
    /// Starts playing the cue.
    fn play(&mut self, cue: SoundCue);

    /// Stops a looping cue.
    fn stop(&mut self, cue: SoundCue);
}

/// Forwards presentation-relevant events to external collaborators.
pub fn notify_collaborators(
    events: &[Event],
    display: &mut dyn HealthDisplay,
    audio: &mut dyn AudioCues,
) {
    for event in events {
        match event {
            Event::PlayerDamaged { amount, .. } => {
                display.reduce(*amount);
                audio.play(SoundCue::Hit);
            }
            Event::BossDamaged { .. } => audio.play(SoundCue::Hit),
            Event::FootstepsStarted => audio.play(SoundCue::Footsteps),
            Event::FootstepsStopped => audio.stop(SoundCue::Footsteps),
            Event::VolleyFired { .. } => audio.play(SoundCue::Volley),
            Event::SpearThrown { .. } => audio.play(SoundCue::Throw),
            _ => {}
        }
    }
}
