//! Target resolution for completed casts.

use super::spell::{Spell, SpellType, TargetMode};
use crate::components::{Health, Team};
use crate::ecs::{Entity, EntityId, World};

/// Picks the entities a spell cast by `caster` affects.
///
/// Offensive spells and debuffs consider living enemies of the caster's team.
/// Every other type considers living allies, the caster included, except in
/// [`TargetMode::AllEnemies`], which always selects enemies. Results are in
/// entity creation order.
///
/// Cone and line spells take the first valid entity within range.
pub fn resolve_targets(world: &World, caster: EntityId, spell: &Spell) -> Vec<EntityId> {
    let Some(caster_entity) = world.entity(caster) else {
        return Vec::new();
    };
    let team = caster_entity.team();
    // All-enemies spells hit enemies whatever their type
    let hostile =
        spell.spell_type.targets_enemies() || spell.target_mode == TargetMode::AllEnemies;
    let eligible = |candidate: &Entity| -> bool {
        if !candidate.has::<Health>() || candidate.is_dead() {
            return false;
        }
        if hostile {
            Team::are_enemies(team.as_ref(), candidate.get::<Team>())
        } else {
            candidate.id() == caster || Team::are_allies(team.as_ref(), candidate.get::<Team>())
        }
    };

    if spell.target_mode == TargetMode::SelfOnly {
        return vec![caster];
    }
    if spell.target_mode == TargetMode::AllEnemies {
        return world
            .iter()
            .filter(|candidate| eligible(*candidate))
            .map(Entity::id)
            .collect();
    }

    let Some(origin) = caster_entity.position() else {
        return Vec::new();
    };
    match spell.target_mode {
        TargetMode::Single if spell.spell_type == SpellType::Healing => world
            .nearest_where(origin, spell.range, |candidate| {
                eligible(candidate) && candidate.get::<Health>().map_or(false, Health::is_injured)
            })
            .into_iter()
            .collect(),
        TargetMode::Single => world
            .nearest_where(origin, spell.range, eligible)
            .into_iter()
            .collect(),
        TargetMode::Area => world.within_radius(origin, spell.area_radius, eligible),
        TargetMode::Cone | TargetMode::Line => world
            .within_radius(origin, spell.range, eligible)
            .into_iter()
            .take(1)
            .collect(),
        TargetMode::SelfOnly | TargetMode::AllEnemies => Vec::new(),
    }
}
