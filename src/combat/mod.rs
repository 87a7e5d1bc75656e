//! # Combat Module
//!
//! Attack resolution, projectiles and the per-tick cooldown and death pass.
//!
//! [`CombatSystem::attack`] resolves one attacker/target interaction:
//!
//! 1. reject dead participants, missing or cooling-down attacks
//! 2. hand off to projectile spawning for ranged weapons
//! 3. reject targets without health or out of range
//! 4. evasion roll (a miss still restarts the cooldown)
//! 5. base damage, crit roll, defense, resistance, floor of 1
//! 6. shield absorption, then health
//! 7. animation, particles, shake and flash, cooldown reset
//!
//! All randomness comes from the system's own seeded RNG, so an attack sequence
//! replays identically for the same seed.

pub mod damage;
pub mod projectile;

pub use projectile::*;

use crate::animation::trigger_animation;
use crate::components::{
    AnimationFollowup, AnimationState, Attack, ComponentTag, Dead, Equipment, Health, Layer,
    Position, Projectile, Stats, Team, Velocity, Weapon,
};
use crate::config::DEFAULT_GENRE;
use crate::ecs::{EntityId, System, World};
use crate::events::{DamageSource, GameEvent};
use crate::settings::CombatSettings;
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Resolves attacks and runs the cooldown and death cleanup passes.
#[derive(Debug, Clone)]
pub struct CombatSystem {
    rng: StdRng,
    settings: CombatSettings,
    genre_id: String,
}

impl CombatSystem {
    /// Creates a combat system with default settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use riftbound::{Attack, CombatSystem, DamageType, Health, World};
    ///
    /// let mut world = World::new();
    /// let attacker = world
    ///     .create_entity()
    ///     .with(Attack::new(15.0, 50.0, 1.0, DamageType::Physical))
    ///     .id();
    /// let target = world.create_entity().with(Health::new(100.0)).id();
    /// world.update(0.0);
    ///
    /// let mut combat = CombatSystem::new(7);
    /// let mut events = Vec::new();
    /// assert!(combat.attack(&mut world, attacker, target, &mut events));
    /// assert_eq!(world.get::<Health>(target).unwrap().current, 85.0);
    /// ```
    pub fn new(seed: u64) -> Self {
        Self::with_settings(seed, CombatSettings::default(), DEFAULT_GENRE)
    }

    /// Creates a combat system with explicit settings and particle genre.
    pub fn with_settings(seed: u64, settings: CombatSettings, genre_id: impl Into<String>) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            settings,
            genre_id: genre_id.into(),
        }
    }

    pub fn settings(&self) -> &CombatSettings {
        &self.settings
    }

    /// Executes one attack from `attacker_id` against `target_id`.
    ///
    /// Returns true when the attack was processed as a hit (including a hit
    /// fully soaked by a shield, or a projectile launched), false when it was
    /// rejected or evaded.
    pub fn attack(
        &mut self,
        world: &mut World,
        attacker_id: EntityId,
        target_id: EntityId,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        let (Some(attacker), Some(target)) = (world.entity(attacker_id), world.entity(target_id))
        else {
            return false;
        };
        if attacker.is_dead() || target.is_dead() {
            return false;
        }

        let Some(attack) = attacker.get::<Attack>().copied() else {
            return false;
        };
        if !attack.can_attack() {
            return false;
        }

        let attacker_stats = attacker.get::<Stats>().cloned();
        let attacker_position = attacker.position();

        if let Some(weapon) = attacker
            .get::<Equipment>()
            .and_then(Equipment::ranged_weapon)
            .cloned()
        {
            return self.fire_projectile(
                world,
                attacker_id,
                target_id,
                &attack,
                attacker_stats.as_ref(),
                &weapon,
                events,
            );
        }

        if !target.has::<Health>() {
            return false;
        }

        let target_position = target.position();
        if let (Some(from), Some(to)) = (attacker_position, target_position) {
            if from.distance(to) > attack.range {
                return false;
            }
        }

        let target_stats = target.get::<Stats>().cloned();
        if let Some(stats) = &target_stats {
            if damage::roll_chance(&mut self.rng, stats.evasion) {
                trace!("{} evaded attack from {}", target_id, attacker_id);
                reset_cooldown(world, attacker_id);
                events.push(GameEvent::AttackMissed {
                    attacker: attacker_id,
                    target: target_id,
                });
                return false;
            }
        }

        let mut raw = damage::base_damage(&attack, attacker_stats.as_ref());
        let mut critical = false;
        if let Some(stats) = &attacker_stats {
            if damage::roll_chance(&mut self.rng, stats.crit_chance) {
                raw *= stats.crit_damage;
                critical = true;
            }
        }
        let final_damage = damage::mitigate_attack(raw, attack.damage_type, target_stats.as_ref());

        let Some(target) = world.entity_mut(target_id) else {
            return false;
        };
        let outcome = damage::apply_damage(target, final_damage);
        trace!(
            "{} -> {}: raw {:.1}, final {:.1}, absorbed {:.1}, applied {:.1}{}",
            attacker_id,
            target_id,
            raw,
            final_damage,
            outcome.absorbed,
            outcome.applied,
            if critical { " (crit)" } else { "" }
        );

        if outcome.absorbed > 0.0 {
            events.push(GameEvent::DamageAbsorbed {
                target: target_id,
                absorbed: outcome.absorbed,
                remaining: final_damage - outcome.absorbed,
            });
        }
        if outcome.applied <= 0.0 {
            reset_cooldown(world, attacker_id);
            return true;
        }

        self.emit_hit_feedback(world, attacker_id, target_id, target_position, outcome.applied, events);

        reset_cooldown(world, attacker_id);
        events.push(GameEvent::EntityDamaged {
            attacker: Some(attacker_id),
            target: target_id,
            amount: outcome.applied,
            critical,
            source: DamageSource::Attack,
        });
        true
    }

    /// Animations, particles, camera shake and hit flash for a landed hit.
    fn emit_hit_feedback(
        &self,
        world: &mut World,
        attacker_id: EntityId,
        target_id: EntityId,
        target_position: Option<Position>,
        amount: f32,
        events: &mut Vec<GameEvent>,
    ) {
        trigger_animation(
            world,
            attacker_id,
            AnimationState::Attack,
            Some(AnimationFollowup::ResumeLocomotion),
            events,
        );
        trigger_animation(
            world,
            target_id,
            AnimationState::Hit,
            Some(AnimationFollowup::ResumeLocomotion),
            events,
        );

        if let Some(position) = target_position {
            events.push(GameEvent::HitSparks {
                x: position.x,
                y: position.y,
                seed: damage::hit_seed(position),
                genre_id: self.genre_id.clone(),
            });
        }
        events.push(GameEvent::ScreenShake {
            intensity: damage::feedback_intensity(
                amount,
                self.settings.shake_per_damage,
                self.settings.max_shake,
            ),
        });
        events.push(GameEvent::HitFlash {
            intensity: damage::feedback_intensity(
                amount,
                self.settings.flash_per_damage,
                self.settings.max_flash,
            ),
        });
    }

    /// Launches a projectile at the target's current position.
    ///
    /// Fails if either side has no position to aim from or at.
    #[allow(clippy::too_many_arguments)]
    fn fire_projectile(
        &mut self,
        world: &mut World,
        attacker_id: EntityId,
        target_id: EntityId,
        attack: &Attack,
        attacker_stats: Option<&Stats>,
        weapon: &Weapon,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        let origin = world.get::<Position>(attacker_id).copied();
        let aim = world.get::<Position>(target_id).copied();
        let (Some(origin), Some(aim)) = (origin, aim) else {
            return false;
        };
        let team = world.get::<Team>(attacker_id).copied();

        let projectile = Projectile::from_weapon(
            weapon,
            damage::base_damage(attack, attacker_stats),
            attack.damage_type,
        )
        .owned_by(attacker_id);

        let entity = world
            .create_entity()
            .with(origin)
            .with(Velocity::toward(origin, aim, weapon.projectile_speed))
            .with(projectile)
            .with(Layer::PROJECTILES);
        if let Some(team) = team {
            entity.with(team);
        }
        let projectile_id = entity.id();

        debug!(
            "{} fired {} ({}) at {}",
            attacker_id, projectile_id, weapon.name, target_id
        );
        trigger_animation(
            world,
            attacker_id,
            AnimationState::Attack,
            Some(AnimationFollowup::ResumeLocomotion),
            events,
        );
        reset_cooldown(world, attacker_id);
        events.push(GameEvent::ProjectileSpawned {
            projectile: projectile_id,
            owner: attacker_id,
        });
        true
    }

    /// Counts attack cooldowns down for living entities. Dead entities keep
    /// their cooldown frozen.
    pub fn update_cooldowns(&self, world: &mut World, delta_time: f32) {
        for id in world.entities_with(&[ComponentTag::Attack]) {
            let Some(entity) = world.entity_mut(id) else {
                continue;
            };
            if entity.is_dead() {
                continue;
            }
            if let Some(attack) = entity.get_mut::<Attack>() {
                attack.tick(delta_time);
            }
        }
    }

    /// Reports every entity whose health has dropped to zero or below.
    ///
    /// Each death is reported once: the entity is latched with [`Dead`] and
    /// skipped on later passes. Returns the entities that died this pass.
    pub fn cleanup_dead(&self, world: &mut World, events: &mut Vec<GameEvent>) -> Vec<EntityId> {
        let mut died = Vec::new();
        for id in world.entities_with(&[ComponentTag::Health]) {
            let Some(entity) = world.entity_mut(id) else {
                continue;
            };
            if entity.has::<Dead>() {
                continue;
            }
            let out_of_health = entity.get::<Health>().map_or(false, Health::is_dead);
            if out_of_health {
                entity.add_component(Dead);
                if let Some(velocity) = entity.get_mut::<Velocity>() {
                    *velocity = Velocity::zero();
                }
                info!("Entity {} died", id);
                events.push(GameEvent::EntityDied { entity: id });
                died.push(id);
            }
        }
        died
    }
}

impl System for CombatSystem {
    fn name(&self) -> &'static str {
        "combat"
    }

    fn update(&mut self, world: &mut World, delta_time: f32, events: &mut Vec<GameEvent>) {
        self.update_cooldowns(world, delta_time);
        self.cleanup_dead(world, events);
    }
}

/// Restarts an entity's attack cooldown.
pub fn reset_cooldown(world: &mut World, id: EntityId) {
    if let Some(attack) = world.get_mut::<Attack>(id) {
        attack.reset_cooldown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{
        Animation, DamageType, Equipment, ProjectileType, Shield, Stats, Weapon,
    };

    fn fighter(world: &mut World, x: f32, damage: f32) -> EntityId {
        world
            .create_entity()
            .with(Position::new(x, 0.0))
            .with(Health::new(100.0))
            .with(Attack::new(damage, 50.0, 1.0, DamageType::Physical))
            .id()
    }

    fn damage_events(events: &[GameEvent]) -> Vec<f32> {
        events
            .iter()
            .filter_map(|event| match event {
                GameEvent::EntityDamaged { amount, .. } => Some(*amount),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_basic_hit_applies_damage_and_resets_cooldown() {
        let mut world = World::new();
        let attacker = fighter(&mut world, 0.0, 12.0);
        let target = fighter(&mut world, 10.0, 5.0);
        world.update(0.0);

        let mut combat = CombatSystem::new(1);
        let mut events = Vec::new();
        assert!(combat.attack(&mut world, attacker, target, &mut events));

        assert_eq!(world.get::<Health>(target).map(|h| h.current), Some(88.0));
        assert_eq!(world.get::<Attack>(attacker).map(|a| a.cooldown_timer), Some(1.0));
        assert_eq!(damage_events(&events), vec![12.0]);
    }

    #[test]
    fn test_cooldown_blocks_second_attack() {
        let mut world = World::new();
        let attacker = fighter(&mut world, 0.0, 12.0);
        let target = fighter(&mut world, 10.0, 5.0);
        world.update(0.0);

        let mut combat = CombatSystem::new(1);
        let mut events = Vec::new();
        assert!(combat.attack(&mut world, attacker, target, &mut events));
        assert!(!combat.attack(&mut world, attacker, target, &mut events));
        assert_eq!(world.get::<Health>(target).map(|h| h.current), Some(88.0));

        combat.update_cooldowns(&mut world, 1.0);
        assert!(combat.attack(&mut world, attacker, target, &mut events));
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let mut world = World::new();
        let attacker = fighter(&mut world, 0.0, 12.0);
        let target = fighter(&mut world, 500.0, 5.0);
        world.update(0.0);

        let mut combat = CombatSystem::new(1);
        let mut events = Vec::new();
        assert!(!combat.attack(&mut world, attacker, target, &mut events));
        assert_eq!(world.get::<Attack>(attacker).map(|a| a.cooldown_timer), Some(0.0));
        assert!(events.is_empty());
    }

    #[test]
    fn test_missing_positions_skip_range_check() {
        let mut world = World::new();
        let attacker = world
            .create_entity()
            .with(Attack::new(10.0, 1.0, 1.0, DamageType::Physical))
            .id();
        let target = world.create_entity().with(Health::new(30.0)).id();
        world.update(0.0);

        let mut combat = CombatSystem::new(1);
        let mut events = Vec::new();
        assert!(combat.attack(&mut world, attacker, target, &mut events));
        assert_eq!(world.get::<Health>(target).map(|h| h.current), Some(20.0));
    }

    #[test]
    fn test_dead_participants_are_rejected() {
        let mut world = World::new();
        let attacker = fighter(&mut world, 0.0, 12.0);
        let target = fighter(&mut world, 10.0, 5.0);
        world.update(0.0);
        if let Some(health) = world.get_mut::<Health>(target) {
            health.current = 0.0;
        }

        let mut combat = CombatSystem::new(1);
        let mut events = Vec::new();
        assert!(!combat.attack(&mut world, attacker, target, &mut events));
        assert!(!combat.attack(&mut world, target, attacker, &mut events));
    }

    #[test]
    fn test_target_without_health_is_rejected() {
        let mut world = World::new();
        let attacker = fighter(&mut world, 0.0, 12.0);
        let post = world.create_entity().with(Position::new(5.0, 0.0)).id();
        world.update(0.0);

        let mut combat = CombatSystem::new(1);
        let mut events = Vec::new();
        assert!(!combat.attack(&mut world, attacker, post, &mut events));
    }

    #[test]
    fn test_certain_evasion_misses_and_resets_cooldown() {
        let mut world = World::new();
        let attacker = fighter(&mut world, 0.0, 12.0);
        let target = fighter(&mut world, 10.0, 5.0);
        world.update(0.0);
        if let Some(entity) = world.entity_mut(target) {
            entity.add_component(Stats {
                evasion: 1.0,
                ..Stats::default()
            });
        }

        let mut combat = CombatSystem::new(1);
        let mut events = Vec::new();
        assert!(!combat.attack(&mut world, attacker, target, &mut events));
        assert_eq!(world.get::<Health>(target).map(|h| h.current), Some(100.0));
        assert_eq!(world.get::<Attack>(attacker).map(|a| a.cooldown_timer), Some(1.0));
        assert!(matches!(events[0], GameEvent::AttackMissed { .. }));
    }

    #[test]
    fn test_certain_crit_multiplies_damage() {
        let mut world = World::new();
        let attacker = fighter(&mut world, 0.0, 10.0);
        let target = fighter(&mut world, 10.0, 5.0);
        world.update(0.0);
        if let Some(entity) = world.entity_mut(attacker) {
            entity.add_component(Stats {
                attack: 10.0,
                crit_chance: 1.0,
                crit_damage: 2.0,
                ..Stats::default()
            });
        }

        let mut combat = CombatSystem::new(1);
        let mut events = Vec::new();
        assert!(combat.attack(&mut world, attacker, target, &mut events));
        assert_eq!(world.get::<Health>(target).map(|h| h.current), Some(60.0));
        assert!(events.iter().any(|event| matches!(
            event,
            GameEvent::EntityDamaged { critical: true, .. }
        )));
    }

    #[test]
    fn test_fully_absorbed_hit_returns_true_without_feedback() {
        let mut world = World::new();
        let attacker = fighter(&mut world, 0.0, 10.0);
        let target = fighter(&mut world, 10.0, 5.0);
        world.update(0.0);
        if let Some(entity) = world.entity_mut(target) {
            entity.add_component(Shield::new(100.0, 5.0));
        }

        let mut combat = CombatSystem::new(1);
        let mut events = Vec::new();
        assert!(combat.attack(&mut world, attacker, target, &mut events));
        assert_eq!(world.get::<Health>(target).map(|h| h.current), Some(100.0));
        assert_eq!(world.get::<Shield>(target).map(|s| s.amount), Some(90.0));
        assert_eq!(world.get::<Attack>(attacker).map(|a| a.cooldown_timer), Some(1.0));
        assert!(!events
            .iter()
            .any(|event| matches!(event, GameEvent::ScreenShake { .. })));
    }

    #[test]
    fn test_hit_triggers_animation_and_feedback() {
        let mut world = World::new();
        let attacker = fighter(&mut world, 0.0, 10.0);
        let target = fighter(&mut world, 10.0, 5.0);
        world.update(0.0);
        for id in [attacker, target] {
            if let Some(entity) = world.entity_mut(id) {
                entity.add_component(Animation::new());
            }
        }

        let mut combat = CombatSystem::new(1);
        let mut events = Vec::new();
        assert!(combat.attack(&mut world, attacker, target, &mut events));

        assert_eq!(
            world.get::<Animation>(attacker).map(|a| a.state),
            Some(AnimationState::Attack)
        );
        assert_eq!(
            world.get::<Animation>(target).map(|a| a.state),
            Some(AnimationState::Hit)
        );
        assert!(events.iter().any(|event| matches!(
            event,
            GameEvent::HitSparks { x, .. } if *x == 10.0
        )));
        let shake = events.iter().find_map(|event| match event {
            GameEvent::ScreenShake { intensity } => Some(*intensity),
            _ => None,
        });
        assert!(shake.map_or(false, |s| s > 0.0 && s <= combat.settings().max_shake));
    }

    #[test]
    fn test_ranged_weapon_spawns_projectile() {
        let mut world = World::new();
        let archer = fighter(&mut world, 0.0, 8.0);
        let target = fighter(&mut world, 40.0, 5.0);
        world.update(0.0);
        if let Some(entity) = world.entity_mut(archer) {
            entity.add_component(Equipment::with_weapon(Weapon::ranged(
                "Shortbow",
                ProjectileType::Arrow,
                200.0,
                2.0,
            )));
            entity.add_component(Team::new(1));
        }

        let mut combat = CombatSystem::new(1);
        let mut events = Vec::new();
        assert!(combat.attack(&mut world, archer, target, &mut events));
        assert_eq!(world.get::<Health>(target).map(|h| h.current), Some(100.0));
        assert_eq!(world.pending_count(), 1);

        world.update(0.0);
        let projectiles = world.entities_with(&[ComponentTag::Projectile]);
        assert_eq!(projectiles.len(), 1);
        let projectile = world.get::<Projectile>(projectiles[0]).unwrap();
        assert_eq!(projectile.owner, Some(archer));
        assert_eq!(projectile.damage, 8.0);
        assert_eq!(world.get::<Team>(projectiles[0]).map(|t| t.id), Some(1));
        assert_eq!(
            world.get::<Velocity>(projectiles[0]).copied(),
            Some(Velocity::new(200.0, 0.0))
        );
    }

    #[test]
    fn test_cooldowns_freeze_when_dead() {
        let mut world = World::new();
        let alive = fighter(&mut world, 0.0, 10.0);
        let dead = fighter(&mut world, 10.0, 10.0);
        world.update(0.0);
        for id in [alive, dead] {
            reset_cooldown(&mut world, id);
        }
        if let Some(health) = world.get_mut::<Health>(dead) {
            health.current = -5.0;
        }

        let combat = CombatSystem::new(1);
        combat.update_cooldowns(&mut world, 0.25);
        assert_eq!(world.get::<Attack>(alive).map(|a| a.cooldown_timer), Some(0.75));
        assert_eq!(world.get::<Attack>(dead).map(|a| a.cooldown_timer), Some(1.0));
    }

    #[test]
    fn test_death_is_reported_once() {
        let mut world = World::new();
        let victim = fighter(&mut world, 0.0, 10.0);
        world.update(0.0);
        if let Some(health) = world.get_mut::<Health>(victim) {
            health.current = 0.0;
        }

        let mut combat = CombatSystem::new(1);
        let mut events = Vec::new();
        combat.update(&mut world, 0.1, &mut events);
        combat.update(&mut world, 0.1, &mut events);
        combat.update(&mut world, 0.1, &mut events);

        let deaths = events
            .iter()
            .filter(|event| matches!(event, GameEvent::EntityDied { .. }))
            .count();
        assert_eq!(deaths, 1);
        assert!(world.entity(victim).map_or(false, |e| e.has::<Dead>()));
    }
}
