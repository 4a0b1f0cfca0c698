//! Distance field toward the maze exit used by the autopilot.

use std::collections::VecDeque;

use angkor_escape_core::CellCoord;

/// Dense step-count grid seeded from a single goal cell.
///
/// Distances default to `u16::MAX` for walls and unreachable cells so callers
/// can distinguish them from traversable tiles.
#[derive(Clone, Debug, Default)]
pub(crate) struct DistanceField {
    width: u32,
    height: u32,
    distances: Vec<u16>,
}

impl DistanceField {
    /// Rebuilds the distances using a reverse breadth-first search from `goal`.
    pub(crate) fn rebuild_with<F>(
        &mut self,
        width: u32,
        height: u32,
        goal: CellCoord,
        is_blocked: F,
    ) where
        F: Fn(CellCoord) -> bool,
    {
        let width_usize = usize::try_from(width).unwrap_or(0);
        let height_usize = usize::try_from(height).unwrap_or(0);
        let cell_count = width_usize.checked_mul(height_usize).unwrap_or(0);

        self.width = width;
        self.height = height;
        if cell_count == 0 {
            self.distances.clear();
            return;
        }

        if self.distances.len() == cell_count {
            self.distances.fill(u16::MAX);
        } else {
            self.distances = vec![u16::MAX; cell_count];
        }

        if goal.column() >= width || goal.row() >= height || is_blocked(goal) {
            return;
        }
        let Some(goal_index) = index(width_usize, goal) else {
            return;
        };
        self.distances[goal_index] = 0;

        let mut queue = VecDeque::from([goal]);
        while let Some(cell) = queue.pop_front() {
            let Some(current_index) = index(width_usize, cell) else {
                continue;
            };
            let current = self.distances[current_index];
            if current >= u16::MAX.saturating_sub(1) {
                continue;
            }
            let next = current + 1;

            for neighbor in neighbors(cell, width, height) {
                if is_blocked(neighbor) {
                    continue;
                }
                let Some(neighbor_index) = index(width_usize, neighbor) else {
                    continue;
                };
                if self.distances[neighbor_index] <= next {
                    continue;
                }
                self.distances[neighbor_index] = next;
                queue.push_back(neighbor);
            }
        }
    }

    /// Steps to the goal from `cell`, or `None` when it is unreachable or
    /// outside the field.
    pub(crate) fn distance(&self, cell: CellCoord) -> Option<u16> {
        if cell.column() >= self.width || cell.row() >= self.height {
            return None;
        }
        let width = usize::try_from(self.width).ok()?;
        index(width, cell)
            .and_then(|offset| self.distances.get(offset).copied())
            .filter(|distance| *distance != u16::MAX)
    }

    /// Reachable neighbour of `cell` closest to the goal.
    pub(crate) fn downhill(&self, cell: CellCoord) -> Option<(CellCoord, u16)> {
        neighbors(cell, self.width, self.height)
            .filter_map(|neighbor| self.distance(neighbor).map(|distance| (neighbor, distance)))
            .min_by_key(|(_, distance)| *distance)
    }
}

fn neighbors(cell: CellCoord, width: u32, height: u32) -> impl Iterator<Item = CellCoord> {
    let mut candidates = [None; 4];
    let mut count = 0;

    if let Some(row) = cell.row().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(cell.column(), row));
        count += 1;
    }

    if let Some(column) = cell.column().checked_add(1) {
        if column < width {
            candidates[count] = Some(CellCoord::new(column, cell.row()));
            count += 1;
        }
    }

    if let Some(row) = cell.row().checked_add(1) {
        if row < height {
            candidates[count] = Some(CellCoord::new(cell.column(), row));
            count += 1;
        }
    }

    if let Some(column) = cell.column().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(column, cell.row()));
        count += 1;
    }

    candidates.into_iter().take(count).flatten()
}

fn index(width: usize, cell: CellCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_is_zero_and_distances_grow_outward() {
        let mut field = DistanceField::default();

        field.rebuild_with(3, 4, CellCoord::new(1, 2), |_| false);

        assert_eq!(field.distance(CellCoord::new(1, 2)), Some(0));
        assert_eq!(field.distance(CellCoord::new(1, 1)), Some(1));
        assert_eq!(field.distance(CellCoord::new(0, 0)), Some(3));
        assert_eq!(field.distance(CellCoord::new(3, 0)), None);
    }

    #[test]
    fn walls_are_routed_around() {
        let mut field = DistanceField::default();
        let wall = CellCoord::new(1, 1);

        field.rebuild_with(3, 4, CellCoord::new(1, 2), |cell| cell == wall);

        assert_eq!(field.distance(wall), None);
        assert_eq!(field.distance(CellCoord::new(1, 0)), Some(4));
        assert_eq!(
            field.downhill(CellCoord::new(1, 0)).map(|(_, distance)| distance),
            Some(3)
        );
    }

    #[test]
    fn blocked_goal_leaves_everything_unreachable() {
        let mut field = DistanceField::default();

        field.rebuild_with(2, 2, CellCoord::new(0, 0), |_| true);

        assert_eq!(field.distance(CellCoord::new(0, 0)), None);
        assert!(field.downhill(CellCoord::new(1, 1)).is_none());
    }
}
