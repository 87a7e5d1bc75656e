//! # Vital Components
//!
//! Health, mana, team affiliation and the death latch.

use serde::{Deserialize, Serialize};

/// Hit points.
///
/// Damage is applied without a floor, so `current` may drop below zero; any
/// value `<= 0` means dead. Healing never raises `current` above `max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    /// Creates full health.
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Creates health at a specific value, clamped into `[0, max]`.
    pub fn with_current(current: f32, max: f32) -> Self {
        Self {
            current: current.clamp(0.0, max),
            max,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn is_alive(&self) -> bool {
        !self.is_dead()
    }

    /// Whether the entity is below full health.
    pub fn is_injured(&self) -> bool {
        self.current < self.max
    }

    /// Current health as a fraction of max. Zero when `max` is not positive.
    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.current / self.max
        }
    }

    /// Subtracts `amount` with no lower bound.
    pub fn take_damage(&mut self, amount: f32) {
        self.current -= amount;
    }

    /// Restores up to `amount`, capped at `max`. Returns the amount restored.
    pub fn heal(&mut self, amount: f32) -> f32 {
        let before = self.current;
        self.current = (self.current + amount.max(0.0)).min(self.max);
        (self.current - before).max(0.0)
    }
}

/// Spell resource.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mana {
    pub current: f32,
    pub max: f32,
    /// Points restored per second
    pub regen: f32,
}

impl Mana {
    /// Creates a full mana pool.
    pub fn new(max: f32, regen: f32) -> Self {
        Self {
            current: max,
            max,
            regen,
        }
    }

    pub fn can_afford(&self, cost: f32) -> bool {
        self.current >= cost
    }

    /// Deducts `cost` if affordable. Returns whether the deduction happened.
    pub fn spend(&mut self, cost: f32) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.current -= cost;
        true
    }

    /// Applies `regen * delta_time`, capped at `max`.
    pub fn regenerate(&mut self, delta_time: f32) {
        self.current = (self.current + self.regen * delta_time).clamp(0.0, self.max);
    }
}

/// Team affiliation.
///
/// Team `0` is neutral: it is neither an enemy nor an ally of anything, not
/// even of other team-0 entities. Entities without a `Team` component are
/// treated the same way.
///
/// # Examples
///
/// ```
/// use riftbound::Team;
///
/// let players = Team::new(1);
/// let monsters = Team::new(2);
/// assert!(players.is_enemy(&monsters));
/// assert!(players.is_ally(&Team::new(1)));
/// assert!(!Team::NEUTRAL.is_enemy(&monsters));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Team {
    pub id: u32,
}

impl Team {
    pub const NEUTRAL: Team = Team { id: 0 };

    pub fn new(id: u32) -> Self {
        Self { id }
    }

    pub fn is_neutral(&self) -> bool {
        self.id == 0
    }

    pub fn is_enemy(&self, other: &Team) -> bool {
        !self.is_neutral() && !other.is_neutral() && self.id != other.id
    }

    pub fn is_ally(&self, other: &Team) -> bool {
        !self.is_neutral() && self.id == other.id
    }

    /// Hostility between two optional teams. Missing teams count as neutral.
    pub fn are_enemies(a: Option<&Team>, b: Option<&Team>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => a.is_enemy(b),
            _ => false,
        }
    }

    /// Alliance between two optional teams. Missing teams count as neutral.
    pub fn are_allies(a: Option<&Team>, b: Option<&Team>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => a.is_ally(b),
            _ => false,
        }
    }
}

/// Latched once the cleanup pass has reported an entity's death.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dead;
