//! Spell definitions.

use crate::components::DamageType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a spell does when it lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpellType {
    Offensive,
    Healing,
    Defensive,
    Buff,
    Debuff,
    /// Spends mana, does nothing else yet
    Utility,
}

impl SpellType {
    /// Whether the spell is aimed at the caster's enemies.
    pub fn targets_enemies(self) -> bool {
        matches!(self, SpellType::Offensive | SpellType::Debuff)
    }
}

/// Elemental flavor. Picks the side effect of offensive spells and the
/// modifier applied by buffs and debuffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Arcane,
    Fire,
    Ice,
    Lightning,
    Earth,
    Holy,
}

impl Element {
    pub const ALL: [Element; 6] = [
        Element::Arcane,
        Element::Fire,
        Element::Ice,
        Element::Lightning,
        Element::Earth,
        Element::Holy,
    ];

    /// Damage type dealt by spells of this element.
    pub fn damage_type(self) -> DamageType {
        match self {
            Element::Arcane | Element::Holy => DamageType::Magical,
            Element::Fire => DamageType::Fire,
            Element::Ice => DamageType::Ice,
            Element::Lightning => DamageType::Lightning,
            Element::Earth => DamageType::Physical,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Element::Arcane => "arcane",
            Element::Fire => "fire",
            Element::Ice => "ice",
            Element::Lightning => "lightning",
            Element::Earth => "earth",
            Element::Holy => "holy",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a spell picks its targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetMode {
    /// The caster only
    SelfOnly,
    /// Nearest valid target within range
    Single,
    /// Every valid target within `area_radius` of the caster
    Area,
    /// Every living enemy, regardless of range and spell type
    AllEnemies,
    /// First valid target within range
    Cone,
    /// First valid target within range
    Line,
}

/// A castable spell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spell {
    pub name: String,
    pub spell_type: SpellType,
    pub element: Element,
    pub target_mode: TargetMode,
    /// Damage, healing or shield strength depending on the spell type
    pub damage: f32,
    pub mana_cost: f32,
    /// Seconds before the slot can be cast again
    pub cooldown: f32,
    /// Seconds to fill the cast bar; zero casts instantly
    pub cast_time: f32,
    pub range: f32,
    pub area_radius: f32,
    pub level: u32,
}

impl Spell {
    /// A free, instant, level 1 spell with no power. Use the `with_*`
    /// builders to fill in numbers.
    pub fn new(
        name: impl Into<String>,
        spell_type: SpellType,
        element: Element,
        target_mode: TargetMode,
    ) -> Self {
        Self {
            name: name.into(),
            spell_type,
            element,
            target_mode,
            damage: 0.0,
            mana_cost: 0.0,
            cooldown: 0.0,
            cast_time: 0.0,
            range: 200.0,
            area_radius: 0.0,
            level: 1,
        }
    }

    pub fn with_damage(mut self, damage: f32) -> Self {
        self.damage = damage;
        self
    }

    pub fn with_mana_cost(mut self, cost: f32) -> Self {
        self.mana_cost = cost;
        self
    }

    pub fn with_cooldown(mut self, cooldown: f32) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_cast_time(mut self, cast_time: f32) -> Self {
        self.cast_time = cast_time;
        self
    }

    pub fn with_range(mut self, range: f32) -> Self {
        self.range = range;
        self
    }

    pub fn with_area_radius(mut self, radius: f32) -> Self {
        self.area_radius = radius;
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn damage_type(&self) -> DamageType {
        self.element.damage_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let spell = Spell::new("Frost Lance", SpellType::Offensive, Element::Ice, TargetMode::Line)
            .with_damage(22.0)
            .with_mana_cost(15.0)
            .with_cast_time(0.8)
            .with_cooldown(3.0);
        assert_eq!(spell.damage, 22.0);
        assert_eq!(spell.mana_cost, 15.0);
        assert_eq!(spell.damage_type(), DamageType::Ice);
        assert_eq!(spell.level, 1);
    }

    #[test]
    fn test_targets_enemies() {
        assert!(SpellType::Offensive.targets_enemies());
        assert!(SpellType::Debuff.targets_enemies());
        assert!(!SpellType::Healing.targets_enemies());
        assert!(!SpellType::Utility.targets_enemies());
    }
}
