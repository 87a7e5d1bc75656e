//! # Status Effects
//!
//! Timed single-occupancy effects, shield decay and chain lightning.
//!
//! An entity carries at most one [`StatusEffect`]. Applying a new one always
//! replaces the old: a stat modifier being replaced first restores the stat
//! baseline it captured, so modifiers never compound.
//!
//! Periodic effects fire at every `tick_interval` boundary that falls inside
//! the elapsed time, so a large `delta_time` cannot skip ticks. Boundaries
//! past the effect's remaining duration never fire: a 3 second poison ticking
//! every second deals exactly three ticks however the time is sliced. Effects
//! keep ticking on dead entities; a poison applied before death still runs out.

pub mod chain;

pub use chain::*;

use crate::components::{
    ComponentTag, Health, Shield, StatusCategory, StatusEffect, StatusKind, Stats,
};
use crate::config;
use crate::ecs::{Entity, EntityId, System, World};
use crate::events::{DamageSource, GameEvent};
use log::{debug, trace};

/// Slack for accumulated float error when deciding whether a tick is due.
const TICK_EPSILON: f32 = 1e-4;

/// Applies `effect` to `target`, replacing whatever effect it carried.
///
/// Stat modifiers capture the stat's current value as their baseline and then
/// scale it. Returns false if the target does not exist.
///
/// # Examples
///
/// ```
/// use riftbound::{apply_status, Stats, StatusEffect, StatusKind, World};
///
/// let mut world = World::new();
/// let id = world
///     .create_entity()
///     .with(Stats { attack: 20.0, ..Stats::default() })
///     .id();
/// world.update(0.0);
///
/// let mut events = Vec::new();
/// apply_status(&mut world, id, StatusEffect::modifier(StatusKind::Strength, 0.5, 5.0), &mut events);
/// assert_eq!(world.get::<Stats>(id).unwrap().attack, 30.0);
///
/// // Replacing restores the baseline before the new modifier applies
/// apply_status(&mut world, id, StatusEffect::modifier(StatusKind::Weakness, 0.5, 5.0), &mut events);
/// assert_eq!(world.get::<Stats>(id).unwrap().attack, 10.0);
/// ```
pub fn apply_status(
    world: &mut World,
    target: EntityId,
    mut effect: StatusEffect,
    events: &mut Vec<GameEvent>,
) -> bool {
    let Some(entity) = world.entity_mut(target) else {
        return false;
    };

    let replaced = entity.remove_component::<StatusEffect>().map(|previous| {
        revert_modifier(entity, &previous);
        previous.kind
    });

    effect.baseline = None;
    if let Some(field) = effect.kind.modified_stat() {
        if let Some(stats) = entity.get_mut::<Stats>() {
            let baseline = field.get(stats);
            field.set(stats, baseline * effect.kind.modifier_factor(effect.magnitude));
            effect.baseline = Some(baseline);
        }
    }

    debug!(
        "{} gained {} ({:.1}s){}",
        target,
        effect.kind,
        effect.duration,
        replaced.map_or(String::new(), |kind| format!(", replacing {}", kind))
    );
    let kind = effect.kind;
    entity.add_component(effect);
    events.push(GameEvent::StatusApplied {
        target,
        kind,
        replaced,
    });
    true
}

/// Removes the target's status effect, restoring any modified stat.
pub fn clear_status(world: &mut World, target: EntityId) -> Option<StatusEffect> {
    let entity = world.entity_mut(target)?;
    let effect = entity.remove_component::<StatusEffect>()?;
    revert_modifier(entity, &effect);
    Some(effect)
}

/// Gives `target` a fresh shield, replacing any existing one.
pub fn apply_shield(
    world: &mut World,
    target: EntityId,
    amount: f32,
    duration: f32,
    events: &mut Vec<GameEvent>,
) -> bool {
    let Some(entity) = world.entity_mut(target) else {
        return false;
    };
    entity.add_component(Shield::new(amount, duration));
    events.push(GameEvent::ShieldApplied { target, amount });
    true
}

/// Whether `id` currently carries an effect of `kind`.
pub fn has_status(world: &World, id: EntityId, kind: StatusKind) -> bool {
    world
        .get::<StatusEffect>(id)
        .map_or(false, |effect| effect.kind == kind)
}

fn revert_modifier(entity: &mut Entity, effect: &StatusEffect) {
    let (Some(field), Some(baseline)) = (effect.kind.modified_stat(), effect.baseline) else {
        return;
    };
    if let Some(stats) = entity.get_mut::<Stats>() {
        field.set(stats, baseline);
    }
}

/// Ticks status effects and shields.
#[derive(Debug, Clone, Default)]
pub struct StatusEffectSystem;

impl StatusEffectSystem {
    pub fn new() -> Self {
        Self
    }

    fn tick_status(
        &self,
        world: &mut World,
        id: EntityId,
        delta_time: f32,
        events: &mut Vec<GameEvent>,
    ) {
        let Some(entity) = world.entity_mut(id) else {
            return;
        };
        let Some(mut effect) = entity.get::<StatusEffect>().cloned() else {
            return;
        };

        let delta_time = delta_time.max(0.0);
        if effect.tick_interval > 0.0 {
            let interval = effect.tick_interval.max(config::MIN_STATUS_TICK_INTERVAL);
            // Boundaries are measured from the start of this step
            let window = delta_time.min(effect.duration.max(0.0)) + TICK_EPSILON;
            let mut boundary = effect.next_tick;
            while boundary <= window {
                fire_tick(entity, &effect, events);
                boundary += interval;
            }
            effect.next_tick = boundary - delta_time;
        }
        effect.duration -= delta_time;

        if effect.duration <= TICK_EPSILON {
            revert_modifier(entity, &effect);
            entity.remove_component::<StatusEffect>();
            trace!("{} lost {}", id, effect.kind);
            events.push(GameEvent::StatusExpired {
                target: id,
                kind: effect.kind,
            });
        } else {
            entity.add_component(effect);
        }
    }

    fn tick_shield(
        &self,
        world: &mut World,
        id: EntityId,
        delta_time: f32,
        events: &mut Vec<GameEvent>,
    ) {
        let Some(entity) = world.entity_mut(id) else {
            return;
        };
        let Some(shield) = entity.get_mut::<Shield>() else {
            return;
        };
        shield.tick(delta_time);
        if !shield.is_active() {
            entity.remove_component::<Shield>();
            events.push(GameEvent::ShieldExpired { target: id });
        }
    }
}

fn fire_tick(entity: &mut Entity, effect: &StatusEffect, events: &mut Vec<GameEvent>) {
    let target = entity.id();
    match effect.kind.category() {
        StatusCategory::DamageOverTime => {
            if let Some(health) = entity.get_mut::<Health>() {
                health.take_damage(effect.magnitude);
                events.push(GameEvent::EntityDamaged {
                    attacker: effect.source,
                    target,
                    amount: effect.magnitude,
                    critical: false,
                    source: DamageSource::StatusTick,
                });
            }
        }
        StatusCategory::HealOverTime => {
            if entity.is_dead() {
                return;
            }
            if let Some(health) = entity.get_mut::<Health>() {
                let amount = health.heal(effect.magnitude);
                if amount > 0.0 {
                    events.push(GameEvent::EntityHealed { target, amount });
                }
            }
        }
        StatusCategory::StatModifier | StatusCategory::Marker => {}
    }
}

impl System for StatusEffectSystem {
    fn name(&self) -> &'static str {
        "status"
    }

    fn update(&mut self, world: &mut World, delta_time: f32, events: &mut Vec<GameEvent>) {
        for id in world.entities_with(&[ComponentTag::StatusEffect]) {
            self.tick_status(world, id, delta_time, events);
        }
        for id in world.entities_with(&[ComponentTag::Shield]) {
            self.tick_shield(world, id, delta_time, events);
        }
    }
}
