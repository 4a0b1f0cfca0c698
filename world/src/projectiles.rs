//! Projectile storage with mark-and-compact removal.
//!
//! Projectiles are never removed while the tick is being resolved. Expiry and
//! hits only mark them as spent; [`ProjectileStore::compact`] drops every
//! spent projectile once, when the tick closes.

use std::time::Duration;

use angkor_escape_core::{
    ProjectileId, ProjectileOwner, ProjectileSnapshot, Rect, RemovalReason,
};
use glam::Vec2;

/// Single projectile in flight.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) owner: ProjectileOwner,
    pub(crate) bounds: Rect,
    pub(crate) velocity: Vec2,
    pub(crate) spawned_at: Duration,
    pub(crate) ttl: Duration,
    pub(crate) spent: Option<RemovalReason>,
}

impl Projectile {
    /// Creates a projectile centred on `origin` travelling along `direction`.
    ///
    /// Returns `None` when the direction has no length.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn spawn(
        id: ProjectileId,
        owner: ProjectileOwner,
        origin: Vec2,
        direction: Vec2,
        speed: f32,
        size: f32,
        ttl: Duration,
        now: Duration,
    ) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self {
            id,
            owner,
            bounds: Rect::from_center(origin, Vec2::splat(size)),
            velocity: direction * speed,
            spawned_at: now,
            ttl,
            spent: None,
        })
    }

    pub(crate) fn update(&mut self, dt: Duration) {
        self.bounds = self.bounds.translated(self.velocity * dt.as_secs_f32());
    }

    pub(crate) fn is_expired(&self, now: Duration) -> bool {
        now.saturating_sub(self.spawned_at) >= self.ttl
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            owner: self.owner,
            bounds: self.bounds,
            velocity: self.velocity,
            spawned_at: self.spawned_at,
            ttl: self.ttl,
            spent: self.spent.is_some(),
        }
    }
}

/// Registry that stores projectiles and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct ProjectileStore {
    entries: Vec<Projectile>,
    next_id: ProjectileId,
}

impl ProjectileStore {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: ProjectileId::new(0),
        }
    }

    /// Drops every projectile without reporting removals.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn allocate_id(&mut self) -> ProjectileId {
        let id = self.next_id;
        self.next_id = ProjectileId::new(id.get().wrapping_add(1));
        id
    }

    pub(crate) fn insert(&mut self, projectile: Projectile) {
        self.entries.push(projectile);
    }

    pub(crate) fn get(&self, id: ProjectileId) -> Option<&Projectile> {
        self.entries.iter().find(|projectile| projectile.id == id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.entries.iter()
    }

    /// Advances live projectiles and marks the ones whose time ran out.
    pub(crate) fn advance(&mut self, dt: Duration, now: Duration) {
        for projectile in self.entries.iter_mut() {
            if projectile.spent.is_some() {
                continue;
            }
            projectile.update(dt);
            if projectile.is_expired(now) {
                projectile.spent = Some(RemovalReason::Expired);
            }
        }
    }

    /// Marks a live projectile as consumed by a hit.
    ///
    /// Returns `false` when the projectile is unknown or already spent, so a
    /// projectile can never deliver damage twice.
    pub(crate) fn mark_hit(&mut self, id: ProjectileId) -> bool {
        let Some(projectile) = self
            .entries
            .iter_mut()
            .find(|projectile| projectile.id == id)
        else {
            return false;
        };
        if projectile.spent.is_some() {
            return false;
        }
        projectile.spent = Some(RemovalReason::Hit);
        true
    }

    /// Removes every spent projectile, returning them in identifier order.
    pub(crate) fn compact(&mut self) -> Vec<Projectile> {
        let (mut removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|projectile| projectile.spent.is_some());
        self.entries = kept;
        removed.sort_by_key(|projectile| projectile.id);
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spear(store: &mut ProjectileStore, now: Duration) -> ProjectileId {
        let id = store.allocate_id();
        let projectile = Projectile::spawn(
            id,
            ProjectileOwner::Player,
            Vec2::new(100.0, 100.0),
            Vec2::new(3.0, 4.0),
            400.0,
            32.0,
            Duration::from_millis(5_000),
            now,
        )
        .expect("direction has length");
        store.insert(projectile);
        id
    }

    #[test]
    fn velocity_is_normalized_direction_times_speed() {
        let mut store = ProjectileStore::new();
        let id = spear(&mut store, Duration::ZERO);
        let projectile = store.get(id).expect("stored");

        assert!((projectile.velocity - Vec2::new(240.0, 320.0)).length() < 1e-3);
        assert_eq!(projectile.bounds.center(), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn zero_direction_is_rejected() {
        let projectile = Projectile::spawn(
            ProjectileId::new(0),
            ProjectileOwner::Boss,
            Vec2::ZERO,
            Vec2::ZERO,
            200.0,
            12.0,
            Duration::from_secs(8),
            Duration::ZERO,
        );
        assert!(projectile.is_none());
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let mut store = ProjectileStore::new();
        let spawned = Duration::from_millis(1_234);
        let id = spear(&mut store, spawned);
        let projectile = store.get(id).expect("stored");

        assert!(!projectile.is_expired(spawned + Duration::from_millis(4_999)));
        assert!(projectile.is_expired(spawned + Duration::from_millis(5_000)));
        assert!(projectile.is_expired(spawned + Duration::from_secs(60)));
    }

    #[test]
    fn marked_projectiles_survive_until_compaction() {
        let mut store = ProjectileStore::new();
        let first = spear(&mut store, Duration::ZERO);
        let second = spear(&mut store, Duration::ZERO);

        assert!(store.mark_hit(second));
        assert!(!store.mark_hit(second), "a spent projectile cannot hit again");
        assert_eq!(store.iter().count(), 2);

        let removed = store.compact();
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id, second);
        assert_eq!(removed[0].spent, Some(RemovalReason::Hit));
        assert_eq!(store.iter().map(|p| p.id).collect::<Vec<_>>(), vec![first]);
    }

    #[test]
    fn advance_marks_expired_and_freezes_spent() {
        let mut store = ProjectileStore::new();
        let id = spear(&mut store, Duration::ZERO);

        store.advance(Duration::from_secs(1), Duration::from_secs(5));
        let position = store.get(id).expect("stored").bounds;
        assert_eq!(
            store.get(id).expect("stored").spent,
            Some(RemovalReason::Expired)
        );

        store.advance(Duration::from_secs(1), Duration::from_secs(6));
        assert_eq!(store.get(id).expect("stored").bounds, position);
    }
}
