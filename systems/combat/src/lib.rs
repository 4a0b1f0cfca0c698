#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns hazard and projectile contact into damage commands.
//!
//! Contact is tested against post-movement hitboxes. The system emits one
//! `ApplyDamage` per touching source and leaves the invincibility window and
//! projectile bookkeeping to the world, so overlapping sources in one tick
//! still land at most one hit per window.

use angkor_escape_core::{
    ActorSnapshot, BossSnapshot, Combatant, Command, DamageSource, HazardKind, HazardView, Phase,
    ProjectileOwner, ProjectileView, Rect,
};

/// Fixed damage amounts dealt by each source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageRules {
    /// Damage dealt by an active spike tile.
    pub spike: u32,
    /// Damage dealt by an active fire tile.
    pub fire: u32,
    /// Damage dealt to the player by a boss fireball.
    pub boss_projectile: u32,
    /// Damage dealt to the boss by a thrown spear.
    pub player_projectile: u32,
}

impl DamageRules {
    /// Creates a new rule set using the provided amounts.
    #[must_use]
    pub const fn new(spike: u32, fire: u32, boss_projectile: u32, player_projectile: u32) -> Self {
        Self {
            spike,
            fire,
            boss_projectile,
            player_projectile,
        }
    }

    fn hazard(&self, kind: HazardKind) -> u32 {
        match kind {
            HazardKind::Spike => self.spike,
            HazardKind::Fire => self.fire,
        }
    }
}

impl Default for DamageRules {
    fn default() -> Self {
        Self::new(10, 20, 5, 10)
    }
}

/// Combat system that queues damage commands for every contact in a tick.
#[derive(Debug, Default)]
pub struct Combat {
    rules: DamageRules,
    scratch: Vec<Command>,
}

impl Combat {
    /// Creates a new combat system with the default damage rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new combat system using the provided damage rules.
    #[must_use]
    pub fn with_rules(rules: DamageRules) -> Self {
        Self {
            rules,
            scratch: Vec::new(),
        }
    }

    /// Damage rules in effect.
    #[must_use]
    pub fn rules(&self) -> DamageRules {
        self.rules
    }

    /// Emits `Command::ApplyDamage` entries for hazards and projectiles that
    /// touch an opposing hitbox.
    pub fn handle(
        &mut self,
        phase: Phase,
        player: &ActorSnapshot,
        boss: Option<&BossSnapshot>,
        hazards: HazardView,
        projectiles: ProjectileView,
        out: &mut Vec<Command>,
    ) {
        if !matches!(phase, Phase::Maze | Phase::Arena) {
            return;
        }

        self.scratch.clear();

        if player.alive {
            self.hazard_contacts(&player.hitbox, &hazards);
            self.projectile_contacts(
                &player.hitbox,
                Combatant::Player,
                &projectiles,
                ProjectileOwner::Boss,
                self.rules.boss_projectile,
            );
        }

        if let Some(boss) = boss.filter(|boss| boss.actor.alive) {
            self.projectile_contacts(
                &boss.actor.hitbox,
                Combatant::Boss,
                &projectiles,
                ProjectileOwner::Player,
                self.rules.player_projectile,
            );
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }

    fn hazard_contacts(&mut self, hitbox: &Rect, hazards: &HazardView) {
        for hazard in hazards.iter() {
            if !hazard.active || !hazard.bounds.intersects(hitbox) {
                continue;
            }
            self.scratch.push(Command::ApplyDamage {
                target: Combatant::Player,
                amount: self.rules.hazard(hazard.kind),
                source: DamageSource::Hazard(hazard.kind),
            });
        }
    }

    fn projectile_contacts(
        &mut self,
        hitbox: &Rect,
        target: Combatant,
        projectiles: &ProjectileView,
        hostile: ProjectileOwner,
        amount: u32,
    ) {
        for projectile in projectiles.live_owned_by(hostile) {
            if projectile.bounds.intersects(hitbox) {
                self.scratch.push(Command::ApplyDamage {
                    target,
                    amount,
                    source: DamageSource::Projectile(projectile.id),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use angkor_escape_core::{
        CellCoord, Facing, HazardSnapshot, Health, ProjectileId, ProjectileSnapshot,
    };
    use glam::Vec2;
    use std::time::Duration;

    fn player_at(x: f32, y: f32) -> ActorSnapshot {
        ActorSnapshot {
            bounds: Rect::new(x - 40.0, y - 32.0, 96.0, 96.0),
            hitbox: Rect::new(x, y, 16.0, 32.0),
            facing: Facing::Down,
            frame: 0,
            health: Health::new(100),
            max_health: Health::new(100),
            alive: true,
            moving: false,
            invincible: false,
            visible: true,
        }
    }

    fn hazard(column: u32, row: u32, kind: HazardKind, active: bool) -> HazardSnapshot {
        HazardSnapshot {
            cell: CellCoord::new(column, row),
            kind,
            bounds: Rect::new(column as f32 * 64.0, row as f32 * 64.0, 64.0, 64.0),
            frame: 0,
            active,
        }
    }

    fn projectile(id: u32, owner: ProjectileOwner, center: Vec2, spent: bool) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: ProjectileId::new(id),
            owner,
            bounds: Rect::from_center(center, Vec2::splat(12.0)),
            velocity: Vec2::ZERO,
            spawned_at: Duration::ZERO,
            ttl: Duration::from_secs(8),
            spent,
        }
    }

    #[test]
    fn terminal_phases_are_silent() {
        let mut combat = Combat::new();
        let player = player_at(70.0, 70.0);
        let hazards = HazardView::from_snapshots(vec![hazard(1, 1, HazardKind::Fire, true)]);

        for phase in [Phase::Escaped, Phase::Victory, Phase::Defeat] {
            let mut out = Vec::new();
            combat.handle(
                phase,
                &player,
                None,
                hazards.clone(),
                ProjectileView::default(),
                &mut out,
            );
            assert!(out.is_empty());
        }
    }

    #[test]
    fn only_active_overlapping_hazards_deal_damage() {
        let mut combat = Combat::new();
        let player = player_at(120.0, 80.0);
        let hazards = HazardView::from_snapshots(vec![
            hazard(1, 1, HazardKind::Spike, true),
            hazard(2, 1, HazardKind::Fire, false),
            hazard(3, 1, HazardKind::Fire, true),
        ]);
        let mut out = Vec::new();

        combat.handle(
            Phase::Maze,
            &player,
            None,
            hazards,
            ProjectileView::default(),
            &mut out,
        );

        assert_eq!(
            out,
            vec![Command::ApplyDamage {
                target: Combatant::Player,
                amount: 10,
                source: DamageSource::Hazard(HazardKind::Spike),
            }]
        );
    }

    #[test]
    fn flush_contact_is_not_a_hit() {
        let mut combat = Combat::new();
        let player = player_at(128.0, 80.0);
        let hazards = HazardView::from_snapshots(vec![hazard(1, 1, HazardKind::Spike, true)]);
        let mut out = Vec::new();

        combat.handle(
            Phase::Maze,
            &player,
            None,
            hazards,
            ProjectileView::default(),
            &mut out,
        );

        assert!(out.is_empty());
    }

    #[test]
    fn projectiles_target_the_opposing_side_only() {
        let mut combat = Combat::new();
        let player = player_at(300.0, 500.0);
        let projectiles = ProjectileView::from_snapshots(vec![
            projectile(4, ProjectileOwner::Boss, Vec2::new(308.0, 510.0), false),
            projectile(5, ProjectileOwner::Player, Vec2::new(308.0, 510.0), false),
            projectile(6, ProjectileOwner::Boss, Vec2::new(308.0, 520.0), true),
        ]);
        let mut out = Vec::new();

        combat.handle(
            Phase::Arena,
            &player,
            None,
            HazardView::default(),
            projectiles,
            &mut out,
        );

        assert_eq!(
            out,
            vec![Command::ApplyDamage {
                target: Combatant::Player,
                amount: 5,
                source: DamageSource::Projectile(ProjectileId::new(4)),
            }]
        );
    }

    #[test]
    fn dead_player_takes_no_further_damage() {
        let mut combat = Combat::with_rules(DamageRules::new(1, 2, 3, 4));
        let mut player = player_at(70.0, 70.0);
        player.alive = false;
        let hazards = HazardView::from_snapshots(vec![hazard(1, 1, HazardKind::Fire, true)]);
        let mut out = Vec::new();

        combat.handle(
            Phase::Maze,
            &player,
            None,
            hazards,
            ProjectileView::default(),
            &mut out,
        );

        assert!(out.is_empty());
        assert_eq!(combat.rules().fire, 2);
    }
}
