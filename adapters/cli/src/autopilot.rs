//! Scripted input source that plays a session without a human.
//!
//! In the maze it follows the distance field toward the exit and waits in
//! front of active hazards. In the arena it fetches the spear, lines up with
//! the boss on one axis and throws.

use std::time::Duration;

use angkor_escape_core::{CellCoord, Facing, InputState, MazeLayout, Phase};
use angkor_escape_world::{query, World};
use glam::Vec2;

use crate::navigation::DistanceField;

/// Largest offset from the boss centre along the cross axis at which a throw
/// is released.
const AIM_WINDOW: f32 = 24.0;

/// Input source that steers the player through a session.
#[derive(Debug)]
pub struct Autopilot {
    frame: Duration,
    field: DistanceField,
}

impl Autopilot {
    /// Creates an autopilot for a session ticking at `frame` intervals.
    #[must_use]
    pub fn new(frame: Duration) -> Self {
        Self {
            frame,
            field: DistanceField::default(),
        }
    }

    /// Chooses the input for the next tick from the current world state.
    pub fn decide(&mut self, world: &World) -> InputState {
        if !query::player(world).alive {
            return InputState::default();
        }
        match query::phase(world) {
            Phase::Maze => self.navigate_maze(world),
            Phase::Arena => self.fight_boss(world),
            Phase::Escaped | Phase::Victory | Phase::Defeat => InputState::default(),
        }
    }

    /// Distance the player covers in one tick, used as alignment tolerance.
    fn stride(&self, world: &World) -> f32 {
        (query::tuning(world).player.speed * self.frame.as_secs_f32()).max(1.0)
    }

    fn navigate_maze(&mut self, world: &World) -> InputState {
        let Some(layout) = query::maze(world) else {
            return InputState::default();
        };
        self.field
            .rebuild_with(layout.columns(), layout.rows(), layout.exit(), |cell| {
                !layout.is_walkable(cell)
            });

        let position = query::player(world).hitbox.center();
        let Some(current) = cell_at(layout, position) else {
            return InputState::default();
        };
        if current.column() >= layout.columns() || self.field.distance(current) == Some(0) {
            return InputState::toward(Facing::Right);
        }

        let Some((next, _)) = self.field.downhill(current) else {
            return InputState::default();
        };
        let hazard_ahead = query::hazard_view(world)
            .iter()
            .any(|hazard| hazard.cell == next && hazard.active);
        if hazard_ahead {
            return InputState::default();
        }

        let target = layout.tile_rect(next).center();
        let horizontal = next.row() == current.row();
        steer_along(position, target, horizontal, self.stride(world))
    }

    fn fight_boss(&self, world: &World) -> InputState {
        let position = query::player(world).hitbox.center();
        let stride = self.stride(world);
        let spear = query::spear(world);

        if !spear.carried {
            return match spear.pickup {
                Some(pickup) => approach(position, pickup.center(), stride),
                None => InputState::default(),
            };
        }

        let Some(boss) = query::boss(world).filter(|boss| boss.actor.alive) else {
            return InputState::default();
        };
        let offset = boss.actor.hitbox.center() - position;

        let aim = if offset.x.abs() <= AIM_WINDOW {
            Some(if offset.y < 0.0 { Facing::Up } else { Facing::Down })
        } else if offset.y.abs() <= AIM_WINDOW {
            Some(if offset.x < 0.0 { Facing::Left } else { Facing::Right })
        } else {
            None
        };

        match aim {
            Some(facing) if spear.ready => InputState {
                throw: true,
                ..InputState::toward(facing)
            },
            Some(_) => InputState::default(),
            None => InputState::toward(if offset.x < 0.0 {
                Facing::Left
            } else {
                Facing::Right
            }),
        }
    }
}

/// Tile containing `position`, including columns past the right border.
fn cell_at(layout: &MazeLayout, position: Vec2) -> Option<CellCoord> {
    if position.x < 0.0 || position.y < 0.0 {
        return None;
    }
    let tile = layout.tile_length();
    let column = (position.x / tile).floor() as u32;
    let row = (position.y / tile).floor() as u32;
    Some(CellCoord::new(column, row))
}

/// Moves toward `target` along one axis after centring on the other.
fn steer_along(position: Vec2, target: Vec2, horizontal: bool, tolerance: f32) -> InputState {
    let delta = target - position;
    let (cross, along) = if horizontal {
        (delta.y, delta.x)
    } else {
        (delta.x, delta.y)
    };

    let facing = match (horizontal, cross.abs() > tolerance) {
        (true, true) => vertical(cross),
        (true, false) => horizontal_facing(along),
        (false, true) => horizontal_facing(cross),
        (false, false) => vertical(along),
    };
    InputState::toward(facing)
}

/// Closes the larger gap toward `target` first.
fn approach(position: Vec2, target: Vec2, tolerance: f32) -> InputState {
    let delta = target - position;
    if delta.x.abs().max(delta.y.abs()) <= tolerance {
        return InputState::default();
    }
    if delta.x.abs() >= delta.y.abs() {
        InputState::toward(horizontal_facing(delta.x))
    } else {
        InputState::toward(vertical(delta.y))
    }
}

fn vertical(delta: f32) -> Facing {
    if delta < 0.0 {
        Facing::Up
    } else {
        Facing::Down
    }
}

fn horizontal_facing(delta: f32) -> Facing {
    if delta < 0.0 {
        Facing::Left
    } else {
        Facing::Right
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use angkor_escape_core::{Combatant, Command, DamageSource, HazardKind, MazeCell};
    use angkor_escape_world::apply;

    const FRAME: Duration = Duration::from_millis(20);

    /// Five by five maze with a single bend from the start room to the exit.
    fn bend() -> MazeLayout {
        let open = [(1, 1), (1, 2), (1, 3), (2, 3), (3, 3), (4, 3)];
        let mut cells = vec![MazeCell::Wall; 25];
        for (column, row) in open {
            cells[row * 5 + column] = MazeCell::Open;
        }
        MazeLayout::new(
            5,
            5,
            64.0,
            cells,
            CellCoord::new(0, 1),
            CellCoord::new(1, 1),
            CellCoord::new(4, 3),
        )
    }

    #[test]
    fn follows_the_corridor_toward_the_exit() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(&mut world, Command::LoadMaze { layout: bend() }, &mut events);
        let mut autopilot = Autopilot::new(FRAME);

        assert_eq!(
            autopilot.decide(&world),
            InputState::toward(Facing::Down),
            "the only way out of the start room is down"
        );
    }

    #[test]
    fn steering_centres_on_the_cross_axis_first() {
        let position = Vec2::new(100.0, 90.0);

        assert_eq!(
            steer_along(position, Vec2::new(160.0, 96.0), true, 4.0),
            InputState::toward(Facing::Down)
        );
        assert_eq!(
            steer_along(position, Vec2::new(160.0, 92.0), true, 4.0),
            InputState::toward(Facing::Right)
        );
        assert_eq!(
            steer_along(position, Vec2::new(96.0, 30.0), false, 4.0),
            InputState::toward(Facing::Up)
        );
    }

    #[test]
    fn approach_stops_on_target() {
        let position = Vec2::new(10.0, 10.0);

        assert_eq!(
            approach(position, Vec2::new(11.0, 12.0), 4.0),
            InputState::default()
        );
        assert_eq!(
            approach(position, Vec2::new(-50.0, 30.0), 4.0),
            InputState::toward(Facing::Left)
        );
    }

    #[test]
    fn terminal_phases_release_every_key() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(&mut world, Command::LoadMaze { layout: bend() }, &mut events);
        apply(&mut world, Command::EnterArena, &mut events);
        for _ in 0..10 {
            apply(
                &mut world,
                Command::ApplyDamage {
                    target: Combatant::Player,
                    amount: 100,
                    source: DamageSource::Hazard(HazardKind::Fire),
                },
                &mut events,
            );
        }
        apply(&mut world, Command::FinishTick, &mut events);

        assert_eq!(query::phase(&world), Phase::Defeat);
        assert_eq!(Autopilot::new(FRAME).decide(&world), InputState::default());
    }
}
