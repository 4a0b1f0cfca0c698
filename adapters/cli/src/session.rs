//! Per-tick pipeline wiring the world to the pure systems.

use std::time::Duration;

use angkor_escape_core::{
    notify_collaborators, ActorSnapshot, BossSnapshot, Command, Event, InputState, MazeLayout,
    Phase,
};
use angkor_escape_system_boss::BossController;
use angkor_escape_system_combat::Combat;
use angkor_escape_system_maze_generation::MazeGenerator;
use angkor_escape_world::{self as world, query, World};

use crate::{
    config::GameConfig,
    hud::{HpBar, LoggingAudio},
};

/// State published after every tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Index of the tick that produced the frame.
    pub tick: u64,
    /// Clock value of the tick.
    pub now: Duration,
    /// Phase after the tick closed.
    pub phase: Phase,
    /// Player state after movement and damage.
    pub player: ActorSnapshot,
    /// Boss state, once the arena has been entered.
    pub boss: Option<BossSnapshot>,
    /// Every event emitted during the tick.
    pub events: Vec<Event>,
}

/// Headless game session: one world driven by the boss and combat systems.
#[derive(Debug)]
pub struct Session {
    world: World,
    generator: MazeGenerator,
    columns: u32,
    rows: u32,
    boss: BossController,
    combat: Combat,
    frame: Duration,
    hp_bar: HpBar,
    audio: LoggingAudio,
    events: Vec<Event>,
    commands: Vec<Command>,
}

impl Session {
    /// Creates a session and loads a freshly generated maze.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        let mut generator = MazeGenerator::new(config.generator());
        let layout = generator.generate(config.maze.columns, config.maze.rows);
        Self::assemble(config, generator, layout)
    }

    /// Creates a session around a prepared maze layout.
    #[must_use]
    pub fn with_layout(config: &GameConfig, layout: MazeLayout) -> Self {
        let generator = MazeGenerator::new(config.generator());
        Self::assemble(config, generator, layout)
    }

    fn assemble(config: &GameConfig, generator: MazeGenerator, layout: MazeLayout) -> Self {
        let tuning = config.tuning();
        let mut session = Self {
            world: World::with_tuning(tuning),
            generator,
            columns: config.maze.columns,
            rows: config.maze.rows,
            boss: BossController::new(config.boss()),
            combat: Combat::with_rules(config.damage_rules()),
            frame: config.frame_duration(),
            hp_bar: HpBar::new(tuning.player.max_health),
            audio: LoggingAudio::new(),
            events: Vec::new(),
            commands: Vec::new(),
        };
        session.load(layout);
        session
    }

    fn load(&mut self, layout: MazeLayout) {
        self.events.clear();
        world::apply(&mut self.world, Command::LoadMaze { layout }, &mut self.events);
        self.hp_bar = HpBar::new(query::tuning(&self.world).player.max_health);
        notify_collaborators(&self.events, &mut self.hp_bar, &mut self.audio);
    }

    /// Replaces the current level with the next maze from the generator.
    ///
    /// The player respawns at full health; the session clock keeps running.
    pub fn restart(&mut self) {
        let layout = self.generator.generate(self.columns, self.rows);
        self.load(layout);
    }

    /// Read-only access to the simulated world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Player HP bar fed by damage events.
    #[must_use]
    pub fn hp_bar(&self) -> &HpBar {
        &self.hp_bar
    }

    /// Audio sink fed by movement and combat events.
    #[must_use]
    pub fn audio(&self) -> &LoggingAudio {
        &self.audio
    }

    /// Simulated time covered by one tick.
    #[must_use]
    pub fn frame_duration(&self) -> Duration {
        self.frame
    }

    /// Current phase of the playthrough.
    #[must_use]
    pub fn phase(&self) -> Phase {
        query::phase(&self.world)
    }

    /// Reports whether the playthrough reached victory or defeat.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase().is_terminal()
    }

    /// Advances the simulation by one frame using the provided input.
    pub fn step(&mut self, input: InputState) -> Frame {
        self.events.clear();
        let now = query::clock(&self.world) + self.frame;
        world::apply(
            &mut self.world,
            Command::Tick {
                dt: self.frame,
                now,
                input,
            },
            &mut self.events,
        );

        let boss = query::boss(&self.world);
        self.boss.handle(
            &self.events,
            boss.as_ref(),
            query::arena_bounds(&self.world),
            &mut self.commands,
        );
        self.flush_commands();

        let boss = query::boss(&self.world);
        self.combat.handle(
            query::phase(&self.world),
            &query::player(&self.world),
            boss.as_ref(),
            query::hazard_view(&self.world),
            query::projectile_view(&self.world),
            &mut self.commands,
        );
        self.flush_commands();

        world::apply(&mut self.world, Command::FinishTick, &mut self.events);
        if query::phase(&self.world) == Phase::Escaped {
            world::apply(&mut self.world, Command::EnterArena, &mut self.events);
        }

        notify_collaborators(&self.events, &mut self.hp_bar, &mut self.audio);

        Frame {
            tick: query::tick_index(&self.world),
            now: query::clock(&self.world),
            phase: query::phase(&self.world),
            player: query::player(&self.world),
            boss: query::boss(&self.world),
            events: self.events.clone(),
        }
    }

    fn flush_commands(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }
}
