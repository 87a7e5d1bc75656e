//! # Status Effect Component
//!
//! The single timed effect an entity may carry.

use super::offense::Stats;
use crate::config::MIN_STATUS_TICK_INTERVAL;
use crate::ecs::EntityId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Every status effect the simulation understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    Poison,
    Burn,
    Regeneration,
    Strength,
    Weakness,
    Fortify,
    Vulnerability,
    Haste,
    Frozen,
    Shocked,
}

/// How an effect behaves while active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
    /// Subtracts `magnitude` from health every tick
    DamageOverTime,
    /// Adds `magnitude` to health every tick
    HealOverTime,
    /// Multiplies one stat on activation, reverted on expiry
    StatModifier,
    /// Carries no periodic effect; other systems read it
    Marker,
}

/// The stat a modifier effect scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatField {
    Attack,
    Defense,
    Speed,
}

impl StatField {
    pub fn get(self, stats: &Stats) -> f32 {
        match self {
            StatField::Attack => stats.attack,
            StatField::Defense => stats.defense,
            StatField::Speed => stats.speed,
        }
    }

    pub fn set(self, stats: &mut Stats, value: f32) {
        match self {
            StatField::Attack => stats.attack = value,
            StatField::Defense => stats.defense = value,
            StatField::Speed => stats.speed = value,
        }
    }
}

impl StatusKind {
    /// Tag string used in logs and saved data.
    pub fn as_str(self) -> &'static str {
        match self {
            StatusKind::Poison => "poison",
            StatusKind::Burn => "burn",
            StatusKind::Regeneration => "regeneration",
            StatusKind::Strength => "strength",
            StatusKind::Weakness => "weakness",
            StatusKind::Fortify => "fortify",
            StatusKind::Vulnerability => "vulnerability",
            StatusKind::Haste => "haste",
            StatusKind::Frozen => "frozen",
            StatusKind::Shocked => "shocked",
        }
    }

    /// Parses a tag string. `"burning"` is accepted as an alias of `"burn"`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let kind = match tag {
            "poison" => StatusKind::Poison,
            "burn" | "burning" => StatusKind::Burn,
            "regeneration" => StatusKind::Regeneration,
            "strength" => StatusKind::Strength,
            "weakness" => StatusKind::Weakness,
            "fortify" => StatusKind::Fortify,
            "vulnerability" => StatusKind::Vulnerability,
            "haste" => StatusKind::Haste,
            "frozen" => StatusKind::Frozen,
            "shocked" => StatusKind::Shocked,
            _ => return None,
        };
        Some(kind)
    }

    pub fn category(self) -> StatusCategory {
        match self {
            StatusKind::Poison | StatusKind::Burn => StatusCategory::DamageOverTime,
            StatusKind::Regeneration => StatusCategory::HealOverTime,
            StatusKind::Strength
            | StatusKind::Weakness
            | StatusKind::Fortify
            | StatusKind::Vulnerability
            | StatusKind::Haste => StatusCategory::StatModifier,
            StatusKind::Frozen | StatusKind::Shocked => StatusCategory::Marker,
        }
    }

    /// Stat scaled by a modifier effect.
    pub fn modified_stat(self) -> Option<StatField> {
        match self {
            StatusKind::Strength | StatusKind::Weakness => Some(StatField::Attack),
            StatusKind::Fortify | StatusKind::Vulnerability => Some(StatField::Defense),
            StatusKind::Haste => Some(StatField::Speed),
            _ => None,
        }
    }

    /// Multiplier a modifier applies for the given magnitude.
    ///
    /// Buffs multiply by `1 + magnitude`, debuffs by `1 - magnitude` (never
    /// below zero). Non-modifiers return `1`.
    pub fn modifier_factor(self, magnitude: f32) -> f32 {
        match self {
            StatusKind::Strength | StatusKind::Fortify | StatusKind::Haste => 1.0 + magnitude,
            StatusKind::Weakness | StatusKind::Vulnerability => (1.0 - magnitude).max(0.0),
            _ => 1.0,
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A timed effect. An entity carries at most one; applying a new one replaces
/// the old.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: StatusKind,
    /// Per-tick amount for periodic effects, fractional strength otherwise
    pub magnitude: f32,
    /// Seconds left
    pub duration: f32,
    /// Seconds between ticks; zero for non-periodic effects
    pub tick_interval: f32,
    /// Seconds until the next tick
    pub next_tick: f32,
    /// Weak reference to whoever applied the effect
    pub source: Option<EntityId>,
    /// Stat value captured before a modifier was applied
    pub baseline: Option<f32>,
}

impl StatusEffect {
    /// Builds an effect whose first tick lands one `tick_interval` from now.
    ///
    /// A positive interval is raised to at least
    /// [`MIN_STATUS_TICK_INTERVAL`](crate::config::MIN_STATUS_TICK_INTERVAL);
    /// zero or less means the effect never ticks.
    pub fn new(kind: StatusKind, magnitude: f32, duration: f32, tick_interval: f32) -> Self {
        let tick_interval = if tick_interval > 0.0 {
            tick_interval.max(MIN_STATUS_TICK_INTERVAL)
        } else {
            0.0
        };
        Self {
            kind,
            magnitude,
            duration,
            tick_interval,
            next_tick: tick_interval,
            source: None,
            baseline: None,
        }
    }

    /// A periodic effect (damage or healing over time).
    pub fn periodic(kind: StatusKind, magnitude: f32, duration: f32, tick_interval: f32) -> Self {
        Self::new(kind, magnitude, duration, tick_interval)
    }

    /// A one-shot stat modifier.
    pub fn modifier(kind: StatusKind, magnitude: f32, duration: f32) -> Self {
        Self::new(kind, magnitude, duration, 0.0)
    }

    /// A marker with no periodic effect.
    pub fn marker(kind: StatusKind, magnitude: f32, duration: f32) -> Self {
        Self::new(kind, magnitude, duration, 0.0)
    }

    pub fn from_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn is_expired(&self) -> bool {
        self.duration <= 0.0
    }

    /// Tag string of the effect type.
    pub fn effect_type(&self) -> &'static str {
        self.kind.as_str()
    }
}
