//! Filling a player's spell slots from the spell book generator.

use crate::components::SpellSlots;
use crate::ecs::{EntityId, World};
use crate::generation::{generate_seeded, GenerationParams, SpellGenerator};
use crate::{RiftError, RiftResult};
use log::info;

/// Generates a spell book and loads it into every slot of `player`.
///
/// The same seed, genre and depth always produce the same slots. The player
/// receives a [`SpellSlots`] component if it has none; existing slots are
/// overwritten and their cooldowns and cast progress cleared. Entities still
/// waiting for the next [`World::update`] can be loaded too.
///
/// # Errors
///
/// [`RiftError::GenerationFailed`] when the generator rejects the inputs
/// (unknown genre, depth 0), [`RiftError::EntityNotFound`] when `player` does
/// not exist. The player is untouched in both cases.
pub fn load_player_spells(
    world: &mut World,
    player: EntityId,
    seed: u64,
    genre: &str,
    depth: u32,
) -> RiftResult<()> {
    let params = GenerationParams::new(seed).with_genre(genre).with_depth(depth);
    let spells = generate_seeded(&SpellGenerator::new(), &params)?;

    let entity = world
        .entity_mut_any(player)
        .ok_or(RiftError::EntityNotFound(player))?;
    let mut slots = SpellSlots::new();
    for (index, spell) in spells.into_iter().enumerate() {
        slots.set_slot(index, spell);
    }
    info!(
        "Loaded {} spells for {} (seed {}, {}, depth {})",
        slots.filled(),
        player,
        seed,
        genre,
        depth
    );
    entity.add_component(slots);
    Ok(())
}
