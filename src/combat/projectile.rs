//! # Projectile System
//!
//! Ages in-flight projectiles and resolves their hits. Flight itself is plain
//! velocity integration done by the movement system.
//!
//! On contact a projectile either explodes (area damage, then removal), bounces
//! to the nearest enemy it has not struck yet, pierces through, or is removed.

use super::damage;
use crate::components::{ComponentTag, Health, Position, Projectile, Stats, Team, Velocity};
use crate::config::PROJECTILE_HIT_RADIUS;
use crate::ecs::{Entity, EntityId, System, World};
use crate::events::{DamageSource, GameEvent};
use log::trace;

/// How far a bouncing projectile looks for its next target.
pub const BOUNCE_SEARCH_RADIUS: f32 = 160.0;

#[derive(Debug, Clone)]
pub struct ProjectileSystem {
    hit_radius: f32,
}

impl Default for ProjectileSystem {
    fn default() -> Self {
        Self::new(PROJECTILE_HIT_RADIUS)
    }
}

impl ProjectileSystem {
    pub fn new(hit_radius: f32) -> Self {
        Self {
            hit_radius: hit_radius.max(0.0),
        }
    }

    fn step(
        &self,
        world: &mut World,
        id: EntityId,
        delta_time: f32,
        events: &mut Vec<GameEvent>,
    ) {
        if world.is_pending_removal(id) {
            return;
        }
        let Some(projectile) = world.get_mut::<Projectile>(id) else {
            return;
        };
        projectile.advance(delta_time);
        if projectile.is_expired() {
            world.remove_entity(id);
            events.push(GameEvent::ProjectileExpired { projectile: id });
            return;
        }

        let Some(entity) = world.entity(id) else {
            return;
        };
        let (Some(position), Some(mut projectile)) =
            (entity.position(), entity.get::<Projectile>().cloned())
        else {
            return;
        };
        let team = entity.team();

        let Some(target) = world.nearest_where(position, self.hit_radius, |candidate| {
            is_valid_target(candidate, id, &projectile, team.as_ref())
        }) else {
            return;
        };

        if projectile.explosive {
            let victims = world.within_radius(position, projectile.explosion_radius, |candidate| {
                is_valid_target(candidate, id, &projectile, team.as_ref())
            });
            trace!(
                "Projectile {} exploded on {} hitting {} entities",
                id,
                target,
                victims.len()
            );
            for victim in victims {
                strike(world, &projectile, victim, DamageSource::Explosion, events);
            }
            world.remove_entity(id);
            return;
        }

        strike(world, &projectile, target, DamageSource::Projectile, events);
        projectile.hit.push(target);

        if projectile.bounce > 0 {
            projectile.bounce -= 1;
            let next = world.nearest_where(position, BOUNCE_SEARCH_RADIUS, |candidate| {
                is_valid_target(candidate, id, &projectile, team.as_ref())
            });
            match next.and_then(|next| world.get::<Position>(next).copied()) {
                Some(aim) => {
                    trace!("Projectile {} bounced from {}", id, target);
                    let velocity = Velocity::toward(position, aim, projectile.speed);
                    if let Some(entity) = world.entity_mut(id) {
                        entity.add_component(velocity);
                    }
                }
                None => {
                    world.remove_entity(id);
                    return;
                }
            }
        } else if projectile.pierce > 0 {
            projectile.pierce -= 1;
        } else {
            world.remove_entity(id);
            return;
        }

        if let Some(entity) = world.entity_mut(id) {
            entity.add_component(projectile);
        }
    }
}

impl System for ProjectileSystem {
    fn name(&self) -> &'static str {
        "projectiles"
    }

    fn update(&mut self, world: &mut World, delta_time: f32, events: &mut Vec<GameEvent>) {
        for id in world.entities_with(&[ComponentTag::Projectile]) {
            self.step(world, id, delta_time, events);
        }
    }
}

/// Whether `candidate` can be struck by `projectile`.
///
/// Owners, projectiles, the dead, entities without health and anything already
/// hit are skipped. A projectile with a team only hits that team's enemies; an
/// unaligned one hits anyone but its owner.
fn is_valid_target(
    candidate: &Entity,
    projectile_id: EntityId,
    projectile: &Projectile,
    team: Option<&Team>,
) -> bool {
    let id = candidate.id();
    if id == projectile_id
        || projectile.owner == Some(id)
        || projectile.has_hit(id)
        || candidate.has::<Projectile>()
        || !candidate.has::<Health>()
        || candidate.is_dead()
    {
        return false;
    }
    match team {
        Some(team) => Team::are_enemies(Some(team), candidate.get::<Team>()),
        None => true,
    }
}

fn strike(
    world: &mut World,
    projectile: &Projectile,
    target_id: EntityId,
    source: DamageSource,
    events: &mut Vec<GameEvent>,
) {
    let Some(target) = world.entity_mut(target_id) else {
        return;
    };
    let amount = damage::mitigate_attack(
        projectile.damage,
        projectile.damage_type,
        target.get::<Stats>(),
    );
    let outcome = damage::apply_damage(target, amount);
    if outcome.absorbed > 0.0 {
        events.push(GameEvent::DamageAbsorbed {
            target: target_id,
            absorbed: outcome.absorbed,
            remaining: amount - outcome.absorbed,
        });
    }
    if outcome.applied > 0.0 {
        events.push(GameEvent::EntityDamaged {
            attacker: projectile.owner,
            target: target_id,
            amount: outcome.applied,
            critical: false,
            source,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{DamageType, ProjectileType};

    fn enemy(world: &mut World, x: f32) -> EntityId {
        world
            .create_entity()
            .with(Position::new(x, 0.0))
            .with(Health::new(50.0))
            .with(Team::new(2))
            .id()
    }

    fn shoot(world: &mut World, owner: EntityId, projectile: Projectile) -> EntityId {
        world
            .create_entity()
            .with(Position::new(0.0, 0.0))
            .with(Velocity::new(100.0, 0.0))
            .with(Team::new(1))
            .with(projectile.owned_by(owner))
            .id()
    }

    fn arrow(damage: f32) -> Projectile {
        Projectile::new(damage, DamageType::Physical, 100.0, 2.0, ProjectileType::Arrow)
    }

    fn health(world: &World, id: EntityId) -> f32 {
        world.get::<Health>(id).map_or(f32::NAN, |h| h.current)
    }

    #[test]
    fn test_projectile_expires_after_lifetime() {
        let mut world = World::new();
        let owner = world.create_entity().with(Team::new(1)).id();
        let bolt = shoot(&mut world, owner, arrow(5.0));
        world.update(0.0);

        let mut system = ProjectileSystem::default();
        let mut events = Vec::new();
        system.update(&mut world, 1.0, &mut events);
        assert!(!world.is_pending_removal(bolt));
        system.update(&mut world, 1.0, &mut events);
        assert!(world.is_pending_removal(bolt));
        assert!(events.contains(&GameEvent::ProjectileExpired { projectile: bolt }));
    }

    #[test]
    fn test_hit_damages_enemy_and_removes_projectile() {
        let mut world = World::new();
        let owner = world.create_entity().with(Team::new(1)).id();
        let target = enemy(&mut world, 5.0);
        let bolt = shoot(&mut world, owner, arrow(12.0));
        world.update(0.0);

        let mut system = ProjectileSystem::default();
        let mut events = Vec::new();
        system.update(&mut world, 0.1, &mut events);

        assert_eq!(health(&world, target), 38.0);
        assert!(world.is_pending_removal(bolt));
        assert!(events.iter().any(|event| matches!(
            event,
            GameEvent::EntityDamaged { attacker: Some(a), source: DamageSource::Projectile, .. } if *a == owner
        )));
    }

    #[test]
    fn test_allies_and_owner_are_ignored() {
        let mut world = World::new();
        let owner = world
            .create_entity()
            .with(Position::new(0.0, 0.0))
            .with(Health::new(50.0))
            .with(Team::new(1))
            .id();
        let ally = world
            .create_entity()
            .with(Position::new(3.0, 0.0))
            .with(Health::new(50.0))
            .with(Team::new(1))
            .id();
        let bolt = shoot(&mut world, owner, arrow(12.0));
        world.update(0.0);

        let mut system = ProjectileSystem::default();
        let mut events = Vec::new();
        system.update(&mut world, 0.1, &mut events);

        assert_eq!(health(&world, owner), 50.0);
        assert_eq!(health(&world, ally), 50.0);
        assert!(!world.is_pending_removal(bolt));
    }

    #[test]
    fn test_pierce_passes_through() {
        let mut world = World::new();
        let owner = world.create_entity().with(Team::new(1)).id();
        let first = enemy(&mut world, 4.0);
        let mut projectile = arrow(10.0);
        projectile.pierce = 1;
        let bolt = shoot(&mut world, owner, projectile);
        world.update(0.0);

        let mut system = ProjectileSystem::default();
        let mut events = Vec::new();
        system.update(&mut world, 0.1, &mut events);

        assert_eq!(health(&world, first), 40.0);
        assert!(!world.is_pending_removal(bolt));
        let state = world.get::<Projectile>(bolt).unwrap();
        assert_eq!(state.pierce, 0);
        assert!(state.has_hit(first));

        // Already struck, so the next step does not hit it again
        system.update(&mut world, 0.1, &mut events);
        assert_eq!(health(&world, first), 40.0);
    }

    #[test]
    fn test_bounce_retargets_nearest_unhit_enemy() {
        let mut world = World::new();
        let owner = world.create_entity().with(Team::new(1)).id();
        let first = enemy(&mut world, 4.0);
        let second = world
            .create_entity()
            .with(Position::new(0.0, 80.0))
            .with(Health::new(50.0))
            .with(Team::new(2))
            .id();
        let mut projectile = arrow(10.0);
        projectile.bounce = 1;
        let bolt = shoot(&mut world, owner, projectile);
        world.update(0.0);

        let mut system = ProjectileSystem::default();
        let mut events = Vec::new();
        system.update(&mut world, 0.1, &mut events);

        assert_eq!(health(&world, first), 40.0);
        assert_eq!(health(&world, second), 50.0);
        assert!(!world.is_pending_removal(bolt));
        assert_eq!(
            world.get::<Velocity>(bolt).copied(),
            Some(Velocity::new(0.0, 100.0))
        );
        assert_eq!(world.get::<Projectile>(bolt).map(|p| p.bounce), Some(0));
    }

    #[test]
    fn test_explosion_hits_every_enemy_in_radius() {
        let mut world = World::new();
        let owner = world.create_entity().with(Team::new(1)).id();
        let near = enemy(&mut world, 5.0);
        let splash = enemy(&mut world, -20.0);
        let outside = enemy(&mut world, 90.0);
        let mut projectile = arrow(10.0);
        projectile.explosive = true;
        projectile.explosion_radius = 30.0;
        let bomb = shoot(&mut world, owner, projectile);
        world.update(0.0);

        let mut system = ProjectileSystem::default();
        let mut events = Vec::new();
        system.update(&mut world, 0.1, &mut events);

        assert_eq!(health(&world, near), 40.0);
        assert_eq!(health(&world, splash), 40.0);
        assert_eq!(health(&world, outside), 50.0);
        assert!(world.is_pending_removal(bomb));
    }
}
