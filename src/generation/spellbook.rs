//! # Spell Book Generation
//!
//! Deterministic generation of a full set of player spells.
//!
//! A spell book always fills every slot with the same layout, so hotbar
//! muscle memory survives a new run:
//!
//! | Slot | Spell |
//! |------|-------|
//! | 0 | single-target attack |
//! | 1 | single-target heal |
//! | 2 | self shield |
//! | 3 | area attack |
//! | 4 | buff, debuff or utility |
//!
//! Elements, numbers and names vary with the seed. Power grows with depth and
//! difficulty.

use super::{Generator, Genre, GenerationParams};
use crate::config::SPELL_SLOT_COUNT;
use crate::spells::{Element, Spell, SpellType, TargetMode};
use crate::{RiftError, RiftResult};
use rand::rngs::StdRng;
use rand::Rng;

/// Power gained per dungeon level below the first.
const POWER_PER_DEPTH: f32 = 0.15;

const ATTACK_ELEMENTS: [Element; 5] = [
    Element::Fire,
    Element::Ice,
    Element::Lightning,
    Element::Earth,
    Element::Arcane,
];

const AREA_ELEMENTS: [Element; 4] = [Element::Fire, Element::Ice, Element::Lightning, Element::Earth];

const WARD_ELEMENTS: [Element; 4] = [Element::Arcane, Element::Earth, Element::Ice, Element::Holy];

const SUPPORT_TYPES: [(SpellType, TargetMode); 3] = [
    (SpellType::Buff, TargetMode::SelfOnly),
    (SpellType::Debuff, TargetMode::Single),
    (SpellType::Utility, TargetMode::SelfOnly),
];

/// Generates the five-spell book loaded into a player's slots.
#[derive(Debug, Clone, Default)]
pub struct SpellGenerator;

impl SpellGenerator {
    pub fn new() -> Self {
        Self
    }

    fn power(params: &GenerationParams) -> f32 {
        params.difficulty * (1.0 + POWER_PER_DEPTH * params.depth.saturating_sub(1) as f32)
    }

    fn bolt(&self, rng: &mut StdRng, genre: Genre, power: f32, level: u32) -> Spell {
        let element = pick(rng, &ATTACK_ELEMENTS);
        let damage = round1((14.0 + rng.gen_range(0.0..6.0)) * power);
        Spell::new(
            spell_name(rng, genre, element, SpellType::Offensive, TargetMode::Single),
            SpellType::Offensive,
            element,
            TargetMode::Single,
        )
        .with_damage(damage)
        .with_mana_cost(round1(8.0 + damage * 0.4))
        .with_cooldown(round1(rng.gen_range(1.0..2.0)))
        .with_cast_time(round1(rng.gen_range(0.4..0.9)))
        .with_range(240.0)
        .with_level(level)
    }

    fn heal(&self, rng: &mut StdRng, genre: Genre, power: f32, level: u32) -> Spell {
        let amount = round1((18.0 + rng.gen_range(0.0..6.0)) * power);
        Spell::new(
            spell_name(rng, genre, Element::Holy, SpellType::Healing, TargetMode::Single),
            SpellType::Healing,
            Element::Holy,
            TargetMode::Single,
        )
        .with_damage(amount)
        .with_mana_cost(round1(12.0 + amount * 0.3))
        .with_cooldown(round1(rng.gen_range(4.0..6.0)))
        .with_cast_time(round1(rng.gen_range(0.8..1.2)))
        .with_level(level)
    }

    fn ward(&self, rng: &mut StdRng, genre: Genre, power: f32, level: u32) -> Spell {
        let element = pick(rng, &WARD_ELEMENTS);
        let shield = round1((25.0 + rng.gen_range(0.0..10.0)) * power);
        Spell::new(
            spell_name(rng, genre, element, SpellType::Defensive, TargetMode::SelfOnly),
            SpellType::Defensive,
            element,
            TargetMode::SelfOnly,
        )
        .with_damage(shield)
        .with_mana_cost(round1(15.0 + shield * 0.3))
        .with_cooldown(round1(rng.gen_range(8.0..12.0)))
        .with_cast_time(round1(rng.gen_range(0.3..0.6)))
        .with_level(level)
    }

    fn nova(&self, rng: &mut StdRng, genre: Genre, power: f32, level: u32) -> Spell {
        let element = pick(rng, &AREA_ELEMENTS);
        let damage = round1((10.0 + rng.gen_range(0.0..5.0)) * power);
        Spell::new(
            spell_name(rng, genre, element, SpellType::Offensive, TargetMode::Area),
            SpellType::Offensive,
            element,
            TargetMode::Area,
        )
        .with_damage(damage)
        .with_area_radius(rng.gen_range(70.0_f32..100.0).round())
        .with_mana_cost(round1(20.0 + damage * 0.5))
        .with_cooldown(round1(rng.gen_range(5.0..8.0)))
        .with_cast_time(round1(rng.gen_range(1.0..1.5)))
        .with_level(level)
    }

    fn support(&self, rng: &mut StdRng, genre: Genre, level: u32) -> Spell {
        let (spell_type, target_mode) = pick(rng, &SUPPORT_TYPES);
        let element = pick(rng, &Element::ALL);
        Spell::new(
            spell_name(rng, genre, element, spell_type, target_mode),
            spell_type,
            element,
            target_mode,
        )
        .with_mana_cost(round1(rng.gen_range(10.0..20.0)))
        .with_cooldown(round1(rng.gen_range(10.0..15.0)))
        .with_cast_time(0.5)
        .with_level(level)
    }
}

impl Generator<Vec<Spell>> for SpellGenerator {
    fn generate(&self, params: &GenerationParams, rng: &mut StdRng) -> RiftResult<Vec<Spell>> {
        let genre = params.check()?;
        let power = Self::power(params);
        let level = params.depth;

        Ok(vec![
            self.bolt(rng, genre, power, level),
            self.heal(rng, genre, power, level),
            self.ward(rng, genre, power, level),
            self.nova(rng, genre, power, level),
            self.support(rng, genre, level),
        ])
    }

    fn validate(&self, content: &Vec<Spell>, _params: &GenerationParams) -> RiftResult<()> {
        if content.len() != SPELL_SLOT_COUNT {
            return Err(RiftError::GenerationFailed(format!(
                "spell book has {} spells, expected {}",
                content.len(),
                SPELL_SLOT_COUNT
            )));
        }
        for spell in content {
            let numbers = [spell.damage, spell.mana_cost, spell.cooldown, spell.cast_time];
            if spell.name.trim().is_empty() {
                return Err(RiftError::GenerationFailed("spell without a name".to_string()));
            }
            if numbers.iter().any(|value| !value.is_finite() || *value < 0.0) {
                return Err(RiftError::GenerationFailed(format!(
                    "spell '{}' has invalid numbers",
                    spell.name
                )));
            }
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "SpellGenerator"
    }
}

fn pick<T: Copy>(rng: &mut StdRng, items: &[T]) -> T {
    items[rng.gen_range(0..items.len())]
}

fn round1(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

fn genre_prefixes(genre: Genre) -> &'static [&'static str] {
    match genre {
        Genre::Fantasy => &["Ancient", "Mystic", "Elder", "Runic"],
        Genre::SciFi => &["Quantum", "Ion", "Orbital", "Nano"],
        Genre::Horror => &["Cursed", "Hollow", "Wretched", "Grave"],
        Genre::Cyberpunk => &["Neon", "Chrome", "Glitch", "Synth"],
        Genre::PostApocalyptic => &["Scrap", "Rad", "Dust", "Rust"],
    }
}

fn element_nouns(element: Element) -> &'static [&'static str] {
    match element {
        Element::Fire => &["Flame", "Ember", "Inferno"],
        Element::Ice => &["Frost", "Glacier", "Rime"],
        Element::Lightning => &["Storm", "Spark", "Thunder"],
        Element::Earth => &["Stone", "Quake", "Thorn"],
        Element::Arcane => &["Rune", "Void", "Aether"],
        Element::Holy => &["Light", "Grace", "Dawn"],
    }
}

fn form_word(spell_type: SpellType, target_mode: TargetMode) -> &'static str {
    match (spell_type, target_mode) {
        (SpellType::Offensive, TargetMode::Area) => "Nova",
        (SpellType::Offensive, _) => "Bolt",
        (SpellType::Healing, _) => "Mend",
        (SpellType::Defensive, _) => "Ward",
        (SpellType::Buff, _) => "Blessing",
        (SpellType::Debuff, _) => "Hex",
        (SpellType::Utility, _) => "Step",
    }
}

fn spell_name(
    rng: &mut StdRng,
    genre: Genre,
    element: Element,
    spell_type: SpellType,
    target_mode: TargetMode,
) -> String {
    let prefix = pick(rng, genre_prefixes(genre));
    let noun = pick(rng, element_nouns(element));
    format!("{} {} {}", prefix, noun, form_word(spell_type, target_mode))
}
