//! # Offense Components
//!
//! Attack capability, combat stats, shields, equipment and projectiles.

use crate::ecs::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of damage an attack deals. Decides which offensive and defensive stat
/// apply and which resistance entry is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DamageType {
    Physical,
    Magical,
    Fire,
    Ice,
    Lightning,
    Poison,
}

impl DamageType {
    /// Whether attacks of this type scale with magic power and are reduced by
    /// magic defense. Only [`DamageType::Magical`] does; elemental weapon
    /// attacks use the physical stats and differ only by resistance.
    pub fn is_magical(self) -> bool {
        matches!(self, DamageType::Magical)
    }
}

/// Ability to make direct attacks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attack {
    pub damage: f32,
    pub range: f32,
    /// Seconds between attacks
    pub cooldown: f32,
    /// Seconds until the next attack is allowed; never negative
    pub cooldown_timer: f32,
    pub damage_type: DamageType,
}

impl Attack {
    /// Creates an attack that is ready immediately.
    pub fn new(damage: f32, range: f32, cooldown: f32, damage_type: DamageType) -> Self {
        Self {
            damage,
            range,
            cooldown,
            cooldown_timer: 0.0,
            damage_type,
        }
    }

    pub fn can_attack(&self) -> bool {
        self.cooldown_timer <= 0.0
    }

    /// Restarts the cooldown at its configured value.
    pub fn reset_cooldown(&mut self) {
        self.cooldown_timer = self.cooldown.max(0.0);
    }

    /// Counts the cooldown down by `delta_time`, stopping at zero.
    pub fn tick(&mut self, delta_time: f32) {
        self.cooldown_timer = (self.cooldown_timer - delta_time.max(0.0)).max(0.0);
    }
}

/// Offensive and defensive numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub attack: f32,
    pub defense: f32,
    pub magic_power: f32,
    pub magic_defense: f32,
    /// Probability in `[0, 1]`
    pub crit_chance: f32,
    /// Multiplier applied on a critical hit, at least 1
    pub crit_damage: f32,
    /// Probability in `[0, 1]`
    pub evasion: f32,
    /// Movement speed multiplier
    pub speed: f32,
    /// Fraction of damage ignored per type, each in `[0, 1]`
    pub resistances: BTreeMap<DamageType, f32>,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            attack: 0.0,
            defense: 0.0,
            magic_power: 0.0,
            magic_defense: 0.0,
            crit_chance: 0.0,
            crit_damage: 1.5,
            evasion: 0.0,
            speed: 1.0,
            resistances: BTreeMap::new(),
        }
    }
}

impl Stats {
    /// Sets a resistance, clamped into `[0, 1]`.
    pub fn with_resistance(mut self, damage_type: DamageType, value: f32) -> Self {
        self.resistances.insert(damage_type, value.clamp(0.0, 1.0));
        self
    }

    /// Resistance to `damage_type`; a missing entry means zero.
    pub fn resistance(&self, damage_type: DamageType) -> f32 {
        self.resistances
            .get(&damage_type)
            .copied()
            .unwrap_or(0.0)
            .clamp(0.0, 1.0)
    }

    /// Stat added to base damage for an attack of this type.
    pub fn offense_for(&self, damage_type: DamageType) -> f32 {
        if damage_type.is_magical() {
            self.magic_power
        } else {
            self.attack
        }
    }

    /// Stat subtracted from incoming damage of this type.
    pub fn defense_for(&self, damage_type: DamageType) -> f32 {
        if damage_type.is_magical() {
            self.magic_defense
        } else {
            self.defense
        }
    }
}

/// Damage absorber that soaks hits before health.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shield {
    pub amount: f32,
    pub max_amount: f32,
    /// Seconds left
    pub duration: f32,
    pub max_duration: f32,
}

impl Shield {
    /// Creates a full shield lasting `duration` seconds.
    pub fn new(amount: f32, duration: f32) -> Self {
        Self {
            amount,
            max_amount: amount,
            duration,
            max_duration: duration,
        }
    }

    pub fn is_active(&self) -> bool {
        self.amount > 0.0 && self.duration > 0.0
    }

    /// Soaks as much of `damage` as possible.
    ///
    /// Returns `(absorbed, remaining)` with `absorbed + remaining == damage`.
    /// An inactive shield absorbs nothing.
    pub fn absorb(&mut self, damage: f32) -> (f32, f32) {
        if !self.is_active() || damage <= 0.0 {
            return (0.0, damage);
        }
        let absorbed = damage.min(self.amount);
        self.amount -= absorbed;
        (absorbed, damage - absorbed)
    }

    /// Counts the duration down by `delta_time`.
    pub fn tick(&mut self, delta_time: f32) {
        self.duration = (self.duration - delta_time).max(0.0);
    }
}

/// Shape of a fired projectile, used by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileType {
    Arrow,
    Bolt,
    Fireball,
    Orb,
}

/// A weapon slot item. Only the ranged fields matter to the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    /// Attacks with this weapon fire projectiles instead of resolving instantly
    pub is_projectile: bool,
    pub projectile_type: ProjectileType,
    pub projectile_speed: f32,
    pub projectile_lifetime: f32,
    pub pierce: u32,
    pub bounce: u32,
    /// Blast radius, `None` for non-explosive ammunition
    pub explosion_radius: Option<f32>,
}

impl Weapon {
    /// A melee weapon.
    pub fn melee(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_projectile: false,
            projectile_type: ProjectileType::Arrow,
            projectile_speed: 0.0,
            projectile_lifetime: 0.0,
            pierce: 0,
            bounce: 0,
            explosion_radius: None,
        }
    }

    /// A ranged weapon firing `projectile_type` at `speed` for `lifetime` seconds.
    pub fn ranged(
        name: impl Into<String>,
        projectile_type: ProjectileType,
        speed: f32,
        lifetime: f32,
    ) -> Self {
        Self {
            name: name.into(),
            is_projectile: true,
            projectile_type,
            projectile_speed: speed,
            projectile_lifetime: lifetime,
            pierce: 0,
            bounce: 0,
            explosion_radius: None,
        }
    }
}

/// Equipped items.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Equipment {
    pub weapon: Option<Weapon>,
}

impl Equipment {
    pub fn with_weapon(weapon: Weapon) -> Self {
        Self {
            weapon: Some(weapon),
        }
    }

    /// The equipped weapon if it fires projectiles.
    pub fn ranged_weapon(&self) -> Option<&Weapon> {
        self.weapon.as_ref().filter(|weapon| weapon.is_projectile)
    }
}

/// An in-flight projectile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub damage: f32,
    pub damage_type: DamageType,
    pub speed: f32,
    pub lifetime: f32,
    /// Seconds alive; only ever increases
    pub age: f32,
    pub projectile_type: ProjectileType,
    /// Weak reference to the shooter
    pub owner: Option<EntityId>,
    /// Further entities this projectile may pass through
    pub pierce: u32,
    /// Further redirects to a new target after a hit
    pub bounce: u32,
    pub explosive: bool,
    pub explosion_radius: f32,
    /// Entities already struck
    pub hit: Vec<EntityId>,
}

impl Projectile {
    pub fn new(
        damage: f32,
        damage_type: DamageType,
        speed: f32,
        lifetime: f32,
        projectile_type: ProjectileType,
    ) -> Self {
        Self {
            damage,
            damage_type,
            speed,
            lifetime,
            age: 0.0,
            projectile_type,
            owner: None,
            pierce: 0,
            bounce: 0,
            explosive: false,
            explosion_radius: 0.0,
            hit: Vec::new(),
        }
    }

    /// Builds a projectile from a ranged weapon's ammunition profile.
    pub fn from_weapon(weapon: &Weapon, damage: f32, damage_type: DamageType) -> Self {
        let mut projectile = Self::new(
            damage,
            damage_type,
            weapon.projectile_speed,
            weapon.projectile_lifetime,
            weapon.projectile_type,
        );
        projectile.pierce = weapon.pierce;
        projectile.bounce = weapon.bounce;
        if let Some(radius) = weapon.explosion_radius {
            projectile.explosive = true;
            projectile.explosion_radius = radius;
        }
        projectile
    }

    pub fn owned_by(mut self, owner: EntityId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn is_expired(&self) -> bool {
        self.age >= self.lifetime
    }

    /// Ages the projectile by `delta_time` seconds.
    pub fn advance(&mut self, delta_time: f32) {
        self.age += delta_time.max(0.0);
    }

    pub fn has_hit(&self, id: EntityId) -> bool {
        self.hit.contains(&id)
    }
}
