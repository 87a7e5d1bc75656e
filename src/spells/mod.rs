//! # Spells Module
//!
//! Spell data, the cast state machine and effect dispatch.
//!
//! A cast moves through `idle → casting → idle`:
//!
//! - [`SpellCastingSystem::start_cast`] validates the slot, cooldown and mana
//!   and starts filling the cast bar. Nothing is spent yet.
//! - Every update adds `delta_time / cast_time` to the bar.
//! - When the bar reaches 1 the mana check runs again, mana is deducted once,
//!   the slot's cooldown starts and the effect lands.
//!
//! A cancelled cast, or one interrupted by the caster's death, never spends
//! mana.

pub mod effects;
pub mod loader;
pub mod spell;
pub mod targeting;

pub use effects::*;
pub use loader::*;
pub use spell::*;
pub use targeting::*;

use crate::components::{ComponentTag, Hotbar, Mana, SpellSlots};
use crate::config::SPELL_SLOT_COUNT;
use crate::ecs::{EntityId, System, World};
use crate::events::GameEvent;
use crate::settings::{ChainSettings, SpellSettings};
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Drives cast bars, slot cooldowns and mana regeneration.
#[derive(Debug, Clone)]
pub struct SpellCastingSystem {
    rng: StdRng,
    settings: SpellSettings,
    chain: ChainSettings,
}

impl SpellCastingSystem {
    pub fn new(seed: u64) -> Self {
        Self::with_settings(seed, SpellSettings::default(), ChainSettings::default())
    }

    pub fn with_settings(seed: u64, settings: SpellSettings, chain: ChainSettings) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            settings,
            chain,
        }
    }

    /// Begins casting the spell in `slot`.
    ///
    /// Returns false, changing nothing, when the slot index is invalid, the
    /// caster is dead or already casting, the slot is empty or cooling down,
    /// or the caster cannot afford the spell. A spell with no cast time
    /// completes immediately.
    ///
    /// # Examples
    ///
    /// ```
    /// use riftbound::*;
    ///
    /// let mut world = World::new();
    /// let mut slots = SpellSlots::new();
    /// slots.set_slot(
    ///     0,
    ///     Spell::new("Nova", SpellType::Offensive, Element::Arcane, TargetMode::Area)
    ///         .with_mana_cost(50.0)
    ///         .with_cast_time(1.0),
    /// );
    /// let caster = world
    ///     .create_entity()
    ///     .with(Health::new(100.0))
    ///     .with(Mana::new(100.0, 0.0))
    ///     .with(slots)
    ///     .id();
    /// world.update(0.0);
    ///
    /// let mut spells = SpellCastingSystem::new(1);
    /// let mut events = Vec::new();
    /// assert!(spells.start_cast(&mut world, caster, 0, &mut events));
    /// assert_eq!(world.get::<Mana>(caster).unwrap().current, 100.0);
    ///
    /// spells.update(&mut world, 1.0, &mut events);
    /// assert_eq!(world.get::<Mana>(caster).unwrap().current, 50.0);
    /// ```
    pub fn start_cast(
        &mut self,
        world: &mut World,
        caster: EntityId,
        slot: usize,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        if slot >= SPELL_SLOT_COUNT {
            return false;
        }
        let Some(entity) = world.entity_mut(caster) else {
            return false;
        };
        if entity.is_dead() {
            return false;
        }
        let mana = entity.get::<Mana>().copied();
        let Some(slots) = entity.get_mut::<SpellSlots>() else {
            return false;
        };
        if slots.is_casting() || slots.is_on_cooldown(slot) {
            return false;
        }
        let Some(spell) = slots.spell(slot) else {
            return false;
        };
        if !can_afford(mana.as_ref(), spell.mana_cost) {
            trace!(
                "{} cannot afford {} ({} mana)",
                caster,
                spell.name,
                spell.mana_cost
            );
            return false;
        }

        let instant = spell.cast_time <= 0.0;
        debug!("{} started casting {} from slot {}", caster, spell.name, slot);
        slots.casting = Some(slot);
        slots.casting_bar = 0.0;
        events.push(GameEvent::CastStarted { caster, slot });

        if instant {
            self.complete_cast(world, caster, events);
        }
        true
    }

    /// Starts the cast bound to hotbar position `key`. Unbound and
    /// out-of-range keys return false.
    pub fn cast_from_hotbar(
        &mut self,
        world: &mut World,
        caster: EntityId,
        key: usize,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        let Some(slot) = world.get::<Hotbar>(caster).and_then(|hotbar| hotbar.slot_for(key)) else {
            return false;
        };
        self.start_cast(world, caster, slot, events)
    }

    /// Abandons the current cast. Nothing was spent, so nothing is refunded.
    pub fn cancel_cast(
        &mut self,
        world: &mut World,
        caster: EntityId,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        let Some(slots) = world.get_mut::<SpellSlots>(caster) else {
            return false;
        };
        let Some(slot) = slots.casting else {
            return false;
        };
        slots.reset_cast();
        debug!("{} cancelled cast from slot {}", caster, slot);
        events.push(GameEvent::CastCancelled { caster, slot });
        true
    }

    /// Finishes the current cast: pay, start the cooldown, resolve targets and
    /// apply the effect.
    fn complete_cast(&mut self, world: &mut World, caster: EntityId, events: &mut Vec<GameEvent>) {
        let Some(entity) = world.entity_mut(caster) else {
            return;
        };
        let mana = entity.get::<Mana>().copied();
        let Some(slots) = entity.get_mut::<SpellSlots>() else {
            return;
        };
        let Some(slot) = slots.casting else {
            return;
        };
        let Some(spell) = slots.spell(slot).cloned() else {
            slots.reset_cast();
            return;
        };

        // Mana may have been drained while the bar was filling
        if !can_afford(mana.as_ref(), spell.mana_cost) {
            slots.reset_cast();
            debug!("{} fizzled {}: not enough mana", caster, spell.name);
            events.push(GameEvent::CastCancelled { caster, slot });
            return;
        }
        slots.start_cooldown(slot, spell.cooldown);
        slots.reset_cast();
        if spell.mana_cost > 0.0 {
            if let Some(mana) = entity.get_mut::<Mana>() {
                mana.spend(spell.mana_cost);
            }
        }

        let targets = resolve_targets(world, caster, &spell);
        debug!(
            "{} cast {} on {} target(s)",
            caster,
            spell.name,
            targets.len()
        );
        let mut ctx = EffectContext {
            rng: &mut self.rng,
            settings: &self.settings,
            chain: &self.chain,
        };
        apply_spell(world, caster, &spell, &targets, &mut ctx, events);
        events.push(GameEvent::CastCompleted {
            caster,
            slot,
            spell: spell.name,
            targets,
        });
    }

    fn update_caster(
        &mut self,
        world: &mut World,
        id: EntityId,
        delta_time: f32,
        events: &mut Vec<GameEvent>,
    ) {
        let Some(entity) = world.entity_mut(id) else {
            return;
        };
        let dead = entity.is_dead();
        if !dead {
            if let Some(mana) = entity.get_mut::<Mana>() {
                mana.regenerate(delta_time);
            }
        }
        let Some(slots) = entity.get_mut::<SpellSlots>() else {
            return;
        };
        slots.tick_cooldowns(delta_time);

        let Some(slot) = slots.casting else {
            return;
        };
        if dead {
            slots.reset_cast();
            events.push(GameEvent::CastCancelled { caster: id, slot });
            return;
        }
        let cast_time = slots.spell(slot).map_or(0.0, |spell| spell.cast_time);
        if cast_time > 0.0 {
            slots.casting_bar = (slots.casting_bar + delta_time / cast_time).min(1.0);
        } else {
            slots.casting_bar = 1.0;
        }
        if slots.casting_bar >= 1.0 {
            self.complete_cast(world, id, events);
        }
    }
}

fn can_afford(mana: Option<&Mana>, cost: f32) -> bool {
    match mana {
        Some(mana) => mana.can_afford(cost),
        None => cost <= 0.0,
    }
}

impl System for SpellCastingSystem {
    fn name(&self) -> &'static str {
        "spells"
    }

    fn update(&mut self, world: &mut World, delta_time: f32, events: &mut Vec<GameEvent>) {
        for id in world.entities_with(&[ComponentTag::SpellSlots]) {
            self.update_caster(world, id, delta_time, events);
        }
        // Regeneration for mana users without spell slots
        for id in world.entities_with(&[ComponentTag::Mana]) {
            let Some(entity) = world.entity_mut(id) else {
                continue;
            };
            if entity.has::<SpellSlots>() || entity.is_dead() {
                continue;
            }
            if let Some(mana) = entity.get_mut::<Mana>() {
                mana.regenerate(delta_time);
            }
        }
    }
}
