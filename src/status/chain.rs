//! Chain lightning propagation.

use crate::combat::damage::apply_damage;
use crate::components::{Health, Position, Team};
use crate::ecs::{Entity, EntityId, World};
use crate::events::{DamageSource, GameEvent};
use crate::settings::ChainSettings;
use log::trace;

/// Arcs lightning outward from `first_target`.
///
/// Each hop jumps to the nearest living, not-yet-struck entity within
/// `settings.radius` of the previous one and deals `settings.damage_fraction`
/// of the previous hop's damage. `source` and `first_target` are never struck
/// by the chain itself, and propagation stops after `settings.hops` jumps or
/// when nothing is in reach.
///
/// Hops go to enemies of the source's team. A source without a team arcs
/// between allies of the first target instead.
///
/// Returns the entities struck, in hop order.
pub fn chain_lightning(
    world: &mut World,
    source: EntityId,
    first_target: EntityId,
    damage: f32,
    settings: &ChainSettings,
    events: &mut Vec<GameEvent>,
) -> Vec<EntityId> {
    let side = match world.get::<Team>(source).copied() {
        Some(team) if !team.is_neutral() => ChainSide::EnemiesOf(team),
        _ => match world.get::<Team>(first_target).copied() {
            Some(team) if !team.is_neutral() => ChainSide::AlliesOf(team),
            _ => return Vec::new(),
        },
    };

    let mut visited = vec![source, first_target];
    let mut struck = Vec::new();
    hop(
        world,
        source,
        first_target,
        damage,
        settings.hops,
        side,
        settings,
        &mut visited,
        &mut struck,
        events,
    );
    struck
}

#[derive(Debug, Clone, Copy)]
enum ChainSide {
    EnemiesOf(Team),
    AlliesOf(Team),
}

impl ChainSide {
    fn accepts(self, entity: &Entity) -> bool {
        let team = entity.get::<Team>();
        match self {
            ChainSide::EnemiesOf(own) => Team::are_enemies(Some(&own), team),
            ChainSide::AlliesOf(own) => Team::are_allies(Some(&own), team),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn hop(
    world: &mut World,
    source: EntityId,
    from: EntityId,
    damage: f32,
    hops_left: u32,
    side: ChainSide,
    settings: &ChainSettings,
    visited: &mut Vec<EntityId>,
    struck: &mut Vec<EntityId>,
    events: &mut Vec<GameEvent>,
) {
    if hops_left == 0 {
        return;
    }
    let Some(origin) = world.get::<Position>(from).copied() else {
        return;
    };
    let Some(next) = world.nearest_where(origin, settings.radius, |candidate| {
        !visited.contains(&candidate.id())
            && candidate.has::<Health>()
            && !candidate.is_dead()
            && side.accepts(candidate)
    }) else {
        return;
    };

    let hop_damage = damage * settings.damage_fraction;
    visited.push(next);
    struck.push(next);

    if let Some(target) = world.entity_mut(next) {
        let outcome = apply_damage(target, hop_damage);
        trace!(
            "Chain lightning {} -> {} for {:.1} ({} hops left)",
            from,
            next,
            hop_damage,
            hops_left - 1
        );
        if outcome.absorbed > 0.0 {
            events.push(GameEvent::DamageAbsorbed {
                target: next,
                absorbed: outcome.absorbed,
                remaining: hop_damage - outcome.absorbed,
            });
        }
        if outcome.applied > 0.0 {
            events.push(GameEvent::EntityDamaged {
                attacker: Some(source),
                target: next,
                amount: outcome.applied,
                critical: false,
                source: DamageSource::Chain,
            });
        }
    }

    hop(
        world,
        source,
        next,
        hop_damage,
        hops_left - 1,
        side,
        settings,
        visited,
        struck,
        events,
    );
}
