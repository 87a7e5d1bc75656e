//! # Casting Components
//!
//! Spell slots with their shared cast bar, and hotbar bindings.

use crate::config::{HOTBAR_SIZE, SPELL_SLOT_COUNT};
use crate::spells::Spell;
use serde::{Deserialize, Serialize};

/// Fixed set of spell slots.
///
/// Only one slot casts at a time; `casting_bar` tracks its progress in
/// `[0, 1]`. Slot indices outside `0..SPELL_SLOT_COUNT` are rejected by every
/// accessor rather than panicking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellSlots {
    pub slots: [Option<Spell>; SPELL_SLOT_COUNT],
    /// Seconds of cooldown left per slot
    pub cooldowns: [f32; SPELL_SLOT_COUNT],
    pub casting_bar: f32,
    /// Slot currently being cast
    pub casting: Option<usize>,
}

impl Default for SpellSlots {
    fn default() -> Self {
        Self::new()
    }
}

impl SpellSlots {
    /// Empty slots, nothing casting.
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
            cooldowns: [0.0; SPELL_SLOT_COUNT],
            casting_bar: 0.0,
            casting: None,
        }
    }

    /// Puts a spell into a slot. Returns false for an invalid index.
    pub fn set_slot(&mut self, index: usize, spell: Spell) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = Some(spell);
                true
            }
            None => false,
        }
    }

    /// Empties a slot and returns what it held.
    pub fn clear_slot(&mut self, index: usize) -> Option<Spell> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    pub fn spell(&self, index: usize) -> Option<&Spell> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Seconds of cooldown left, `None` for an invalid index.
    pub fn cooldown(&self, index: usize) -> Option<f32> {
        self.cooldowns.get(index).copied()
    }

    pub fn is_on_cooldown(&self, index: usize) -> bool {
        self.cooldown(index).map_or(false, |remaining| remaining > 0.0)
    }

    pub fn is_casting(&self) -> bool {
        self.casting.is_some()
    }

    /// The spell currently being cast.
    pub fn casting_spell(&self) -> Option<&Spell> {
        self.casting.and_then(|index| self.spell(index))
    }

    /// Counts every slot cooldown down, stopping at zero.
    pub fn tick_cooldowns(&mut self, delta_time: f32) {
        for remaining in self.cooldowns.iter_mut() {
            *remaining = (*remaining - delta_time).max(0.0);
        }
    }

    /// Starts a slot's cooldown.
    pub fn start_cooldown(&mut self, index: usize, seconds: f32) {
        if let Some(remaining) = self.cooldowns.get_mut(index) {
            *remaining = seconds.max(0.0);
        }
    }

    /// Clears the casting state.
    pub fn reset_cast(&mut self) {
        self.casting = None;
        self.casting_bar = 0.0;
    }

    /// Number of occupied slots.
    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

/// Key bindings from hotbar positions to spell slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotbar {
    pub bindings: [Option<usize>; HOTBAR_SIZE],
}

impl Default for Hotbar {
    fn default() -> Self {
        Self::new()
    }
}

impl Hotbar {
    /// A hotbar with nothing bound.
    pub fn new() -> Self {
        Self {
            bindings: [None; HOTBAR_SIZE],
        }
    }

    /// Binds keys `0..SPELL_SLOT_COUNT` to the slot of the same index.
    pub fn with_default_bindings() -> Self {
        let mut hotbar = Self::new();
        for slot in 0..SPELL_SLOT_COUNT {
            hotbar.bind(slot, slot);
        }
        hotbar
    }

    /// Binds a key to a slot. Returns false if either index is out of range.
    pub fn bind(&mut self, key: usize, slot: usize) -> bool {
        if slot >= SPELL_SLOT_COUNT {
            return false;
        }
        match self.bindings.get_mut(key) {
            Some(binding) => {
                *binding = Some(slot);
                true
            }
            None => false,
        }
    }

    pub fn unbind(&mut self, key: usize) {
        if let Some(binding) = self.bindings.get_mut(key) {
            *binding = None;
        }
    }

    /// Slot bound to `key`, `None` if unbound or out of range.
    pub fn slot_for(&self, key: usize) -> Option<usize> {
        self.bindings.get(key).copied().flatten()
    }
}
