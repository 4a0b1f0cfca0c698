#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded maze generator producing the static geometry of a level.
//!
//! Rooms live on odd coordinates and walls between them on even ones. A
//! randomized depth-first walk carves a spanning tree over the room lattice
//! starting at (1, 1), so every open tile is reachable from the entrance.
//! Post-processing opens the entrance and a single exit on the right border
//! and scatters spike and fire hazards over the remaining floor.

use angkor_escape_core::{CellCoord, MazeCell, MazeLayout};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Default number of tile columns in a level.
pub const DEFAULT_COLUMNS: u32 = 25;
/// Default number of tile rows in a level.
pub const DEFAULT_ROWS: u32 = 25;

const MIN_DIMENSION: u32 = 3;
const CARVE_START: CellCoord = CellCoord::new(1, 1);
const ENTRANCE: CellCoord = CellCoord::new(0, 1);
const STEPS: [(i64, i64); 4] = [(-2, 0), (2, 0), (0, -2), (0, 2)];

/// Configuration parameters required to construct the maze generator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    spike_density: f32,
    fire_density: f32,
    tile_length: f32,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration.
    ///
    /// Densities are fractions of the eligible floor tiles and are clamped to
    /// the `[0, 1]` range.
    #[must_use]
    pub fn new(spike_density: f32, fire_density: f32, tile_length: f32, rng_seed: u64) -> Self {
        Self {
            spike_density: spike_density.clamp(0.0, 1.0),
            fire_density: fire_density.clamp(0.0, 1.0),
            tile_length,
            rng_seed,
        }
    }

    /// Returns a copy that uses the provided seed.
    #[must_use]
    pub const fn with_seed(mut self, rng_seed: u64) -> Self {
        self.rng_seed = rng_seed;
        self
    }

    /// Fraction of eligible floor tiles that receive spikes.
    #[must_use]
    pub const fn spike_density(&self) -> f32 {
        self.spike_density
    }

    /// Fraction of eligible floor tiles that receive fire.
    #[must_use]
    pub const fn fire_density(&self) -> f32 {
        self.fire_density
    }

    /// Side length of a tile in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(0.05, 0.03, 64.0, 0)
    }
}

/// Deterministic maze generator.
///
/// Successive calls to [`MazeGenerator::generate`] draw from the same random
/// stream, so one generator yields a reproducible sequence of levels.
#[derive(Debug)]
pub struct MazeGenerator {
    config: Config,
    rng: ChaCha8Rng,
}

impl MazeGenerator {
    /// Creates a new generator using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Generates a maze with the provided dimensions.
    ///
    /// Dimensions below 3x3 are raised to 3x3, the smallest grid that holds
    /// a room surrounded by walls.
    pub fn generate(&mut self, columns: u32, rows: u32) -> MazeLayout {
        let columns = columns.max(MIN_DIMENSION);
        let rows = rows.max(MIN_DIMENSION);
        let mut grid = Grid::filled(columns, rows);

        self.carve(&mut grid);
        grid.set(ENTRANCE, MazeCell::Open);
        let exit = self.open_exit(&mut grid);
        self.scatter_hazards(&mut grid, exit);

        log::debug!(
            "generated {columns}x{rows} maze with exit at ({}, {})",
            exit.column(),
            exit.row()
        );

        MazeLayout::new(
            columns,
            rows,
            self.config.tile_length,
            grid.cells,
            ENTRANCE,
            CARVE_START,
            exit,
        )
    }

    fn carve(&mut self, grid: &mut Grid) {
        let mut stack = vec![CARVE_START];
        let mut visited = vec![false; grid.cells.len()];
        if let Some(index) = grid.index(CARVE_START) {
            visited[index] = true;
        }

        let mut neighbors = Vec::with_capacity(STEPS.len());
        while let Some(&current) = stack.last() {
            grid.set(current, MazeCell::Open);

            neighbors.clear();
            for (dx, dy) in STEPS {
                let Some(next) = grid.room_at(current, dx, dy) else {
                    continue;
                };
                if grid.index(next).is_some_and(|index| !visited[index]) {
                    neighbors.push(next);
                }
            }

            let Some(&next) = neighbors.choose(&mut self.rng) else {
                let _ = stack.pop();
                continue;
            };

            let between = CellCoord::new(
                (current.column() + next.column()) / 2,
                (current.row() + next.row()) / 2,
            );
            grid.set(between, MazeCell::Open);
            if let Some(index) = grid.index(next) {
                visited[index] = true;
            }
            stack.push(next);
        }
    }

    fn open_exit(&mut self, grid: &mut Grid) -> CellCoord {
        let edge = grid.columns - 1;
        let room_column = last_room_column(grid.columns);

        let candidates: Vec<u32> = (0..grid.rows)
            .filter(|&row| {
                grid.get(CellCoord::new(room_column, row)) == Some(MazeCell::Open)
                    && grid.get(CellCoord::new(room_column + 1, row)) == Some(MazeCell::Wall)
            })
            .collect();

        let row = match candidates.choose(&mut self.rng) {
            Some(&row) => row,
            None => {
                let fallback = CARVE_START.row().min(grid.rows - 1);
                log::debug!("no exit candidate in column {room_column}, using row {fallback}");
                fallback
            }
        };

        for column in room_column..=edge {
            grid.set(CellCoord::new(column, row), MazeCell::Open);
        }
        CellCoord::new(edge, row)
    }

    fn scatter_hazards(&mut self, grid: &mut Grid, exit: CellCoord) {
        let mut pool: Vec<CellCoord> = grid
            .coords()
            .filter(|&coord| {
                coord != ENTRANCE
                    && coord != exit
                    && coord != CARVE_START
                    && grid.get(coord) == Some(MazeCell::Open)
            })
            .collect();

        let eligible = pool.len() as f32;
        let spikes = (eligible * self.config.spike_density).floor() as usize;
        let fires = (eligible * self.config.fire_density).floor() as usize;

        for (count, kind) in [(spikes, MazeCell::Spike), (fires, MazeCell::Fire)] {
            for _ in 0..count {
                if pool.is_empty() {
                    return;
                }
                let index = self.rng.gen_range(0..pool.len());
                grid.set(pool.swap_remove(index), kind);
            }
        }
    }
}

/// Largest odd column that still leaves a wall column to its right.
fn last_room_column(columns: u32) -> u32 {
    let limit = columns.saturating_sub(2).max(1);
    if limit % 2 == 1 {
        limit
    } else {
        limit - 1
    }
}

#[derive(Debug)]
struct Grid {
    columns: u32,
    rows: u32,
    cells: Vec<MazeCell>,
}

impl Grid {
    fn filled(columns: u32, rows: u32) -> Self {
        let len = columns as usize * rows as usize;
        Self {
            columns,
            rows,
            cells: vec![MazeCell::Wall; len],
        }
    }

    fn index(&self, coord: CellCoord) -> Option<usize> {
        (coord.column() < self.columns && coord.row() < self.rows)
            .then(|| coord.row() as usize * self.columns as usize + coord.column() as usize)
    }

    fn get(&self, coord: CellCoord) -> Option<MazeCell> {
        self.index(coord).map(|index| self.cells[index])
    }

    fn set(&mut self, coord: CellCoord, cell: MazeCell) {
        if let Some(index) = self.index(coord) {
            self.cells[index] = cell;
        }
    }

    /// Room two steps away, kept strictly inside the border walls.
    fn room_at(&self, from: CellCoord, dx: i64, dy: i64) -> Option<CellCoord> {
        let column = i64::from(from.column()) + dx;
        let row = i64::from(from.row()) + dy;
        let inside = column > 0
            && column < i64::from(self.columns) - 1
            && row > 0
            && row < i64::from(self.rows) - 1;
        inside.then(|| CellCoord::new(column as u32, row as u32))
    }

    fn coords(&self) -> impl Iterator<Item = CellCoord> {
        let columns = self.columns;
        (0..self.rows)
            .flat_map(move |row| (0..columns).map(move |column| CellCoord::new(column, row)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_room_column_leaves_a_wall_to_the_right() {
        assert_eq!(last_room_column(25), 23);
        assert_eq!(last_room_column(24), 21);
        assert_eq!(last_room_column(3), 1);
    }

    #[test]
    fn missing_candidates_fall_back_to_first_room_row() {
        let mut generator = MazeGenerator::new(Config::default());
        let mut grid = Grid::filled(7, 7);

        let exit = generator.open_exit(&mut grid);

        assert_eq!(exit, CellCoord::new(6, 1));
        assert_eq!(grid.get(CellCoord::new(5, 1)), Some(MazeCell::Open));
        assert_eq!(grid.get(CellCoord::new(6, 1)), Some(MazeCell::Open));
    }

    #[test]
    fn config_clamps_densities() {
        let config = Config::new(-0.5, 3.0, 64.0, 1);
        assert_eq!(config.spike_density(), 0.0);
        assert_eq!(config.fire_density(), 1.0);
    }
}
