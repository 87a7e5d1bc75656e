//! # Settings
//!
//! Runtime tuning for every system, loadable from JSON.
//!
//! Values read from disk are never trusted as-is: [`SimulationSettings::validated`]
//! clamps probabilities, radii and caps into their legal ranges and logs a
//! warning for every field it had to correct.

use crate::config;
use crate::{RiftError, RiftResult};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Feedback scaling for the combat system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatSettings {
    /// Camera shake per point of damage
    pub shake_per_damage: f32,
    pub max_shake: f32,
    /// Hit flash per point of damage
    pub flash_per_damage: f32,
    pub max_flash: f32,
    /// Radius within which projectiles connect
    pub projectile_hit_radius: f32,
}

impl Default for CombatSettings {
    fn default() -> Self {
        Self {
            shake_per_damage: 0.02,
            max_shake: config::MAX_SHAKE_INTENSITY,
            flash_per_damage: 0.01,
            max_flash: config::MAX_FLASH_INTENSITY,
            projectile_hit_radius: config::PROJECTILE_HIT_RADIUS,
        }
    }
}

/// Behavior machine timings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    pub detect_confirm_delay: f32,
    pub arrival_radius: f32,
    pub leash_multiplier: f32,
    pub default_melee_range: f32,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            detect_confirm_delay: config::DETECT_CONFIRM_DELAY,
            arrival_radius: config::ARRIVAL_RADIUS,
            leash_multiplier: config::LEASH_MULTIPLIER,
            default_melee_range: config::DEFAULT_MELEE_RANGE,
        }
    }
}

/// Chain lightning propagation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainSettings {
    pub radius: f32,
    pub hops: u32,
    pub damage_fraction: f32,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self {
            radius: config::CHAIN_RADIUS,
            hops: config::CHAIN_HOPS,
            damage_fraction: config::CHAIN_DAMAGE_FRACTION,
        }
    }
}

/// Magnitudes and durations of spell side effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellSettings {
    pub default_shield_amount: f32,
    pub default_shield_duration: f32,
    pub earth_poison_chance: f32,
    /// Burn tick damage as a fraction of the hit that caused it
    pub burn_fraction: f32,
    pub burn_duration: f32,
    /// Poison tick damage as a fraction of the hit that caused it
    pub poison_fraction: f32,
    pub poison_duration: f32,
    /// Movement slow applied by frozen, in `[0, 1]`
    pub freeze_slow: f32,
    pub freeze_duration: f32,
    pub shock_duration: f32,
    pub dot_tick_interval: f32,
    /// Strength of buff/debuff stat modifiers
    pub modifier_magnitude: f32,
    pub modifier_duration: f32,
}

impl Default for SpellSettings {
    fn default() -> Self {
        Self {
            default_shield_amount: config::DEFAULT_SHIELD_AMOUNT,
            default_shield_duration: config::DEFAULT_SHIELD_DURATION,
            earth_poison_chance: config::EARTH_POISON_CHANCE,
            burn_fraction: 0.2,
            burn_duration: 3.0,
            poison_fraction: 0.15,
            poison_duration: 4.0,
            freeze_slow: 0.5,
            freeze_duration: 2.0,
            shock_duration: 1.5,
            dot_tick_interval: 1.0,
            modifier_magnitude: 0.25,
            modifier_duration: 10.0,
        }
    }
}

/// Complete runtime configuration for a [`Simulation`](crate::Simulation).
///
/// # Examples
///
/// ```
/// use riftbound::SimulationSettings;
///
/// let settings = SimulationSettings::from_json(r#"{ "seed": 7, "ai": { "arrival_radius": -3.0 } }"#)
///     .unwrap()
///     .validated();
/// assert_eq!(settings.seed, 7);
/// assert_eq!(settings.ai.arrival_radius, 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Master seed; every system derives its own stream from it
    pub seed: u64,
    /// Genre passed along with particle effects
    pub genre_id: String,
    pub combat: CombatSettings,
    pub ai: AiSettings,
    pub chain: ChainSettings,
    pub spells: SpellSettings,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            seed: 42,
            genre_id: config::DEFAULT_GENRE.to_string(),
            combat: CombatSettings::default(),
            ai: AiSettings::default(),
            chain: ChainSettings::default(),
            spells: SpellSettings::default(),
        }
    }
}

impl SimulationSettings {
    /// Default settings with a specific seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parses settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> RiftResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes settings to pretty-printed JSON.
    pub fn to_json(&self) -> RiftResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reads and validates settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> RiftResult<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&contents)?;
        if settings.genre_id.trim().is_empty() {
            return Err(RiftError::InvalidSettings(format!(
                "{}: genre_id must not be empty",
                path.as_ref().display()
            )));
        }
        Ok(settings.validated())
    }

    /// Writes settings to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> RiftResult<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Returns a copy with every field clamped into its legal range.
    pub fn validated(mut self) -> Self {
        let combat = &mut self.combat;
        clamp_field("combat.shake_per_damage", &mut combat.shake_per_damage, 0.0, f32::MAX);
        clamp_field("combat.max_shake", &mut combat.max_shake, 0.0, f32::MAX);
        clamp_field("combat.flash_per_damage", &mut combat.flash_per_damage, 0.0, f32::MAX);
        clamp_field("combat.max_flash", &mut combat.max_flash, 0.0, f32::MAX);
        clamp_field(
            "combat.projectile_hit_radius",
            &mut combat.projectile_hit_radius,
            0.0,
            f32::MAX,
        );

        let ai = &mut self.ai;
        clamp_field("ai.detect_confirm_delay", &mut ai.detect_confirm_delay, 0.0, f32::MAX);
        clamp_field("ai.arrival_radius", &mut ai.arrival_radius, 0.0, f32::MAX);
        clamp_field("ai.leash_multiplier", &mut ai.leash_multiplier, 1.0, f32::MAX);
        clamp_field("ai.default_melee_range", &mut ai.default_melee_range, 0.0, f32::MAX);

        let chain = &mut self.chain;
        clamp_field("chain.radius", &mut chain.radius, 0.0, f32::MAX);
        clamp_field("chain.damage_fraction", &mut chain.damage_fraction, 0.0, 1.0);
        if chain.hops > 10 {
            warn!("Setting chain.hops={} clamped to 10", chain.hops);
            chain.hops = 10;
        }

        let spells = &mut self.spells;
        clamp_field("spells.default_shield_amount", &mut spells.default_shield_amount, 0.0, f32::MAX);
        clamp_field(
            "spells.default_shield_duration",
            &mut spells.default_shield_duration,
            0.0,
            f32::MAX,
        );
        clamp_field("spells.earth_poison_chance", &mut spells.earth_poison_chance, 0.0, 1.0);
        clamp_field("spells.burn_fraction", &mut spells.burn_fraction, 0.0, f32::MAX);
        clamp_field("spells.burn_duration", &mut spells.burn_duration, 0.0, f32::MAX);
        clamp_field("spells.poison_fraction", &mut spells.poison_fraction, 0.0, f32::MAX);
        clamp_field("spells.poison_duration", &mut spells.poison_duration, 0.0, f32::MAX);
        clamp_field("spells.freeze_slow", &mut spells.freeze_slow, 0.0, 1.0);
        clamp_field("spells.freeze_duration", &mut spells.freeze_duration, 0.0, f32::MAX);
        clamp_field("spells.shock_duration", &mut spells.shock_duration, 0.0, f32::MAX);
        clamp_field(
            "spells.dot_tick_interval",
            &mut spells.dot_tick_interval,
            config::MIN_STATUS_TICK_INTERVAL,
            f32::MAX,
        );
        clamp_field("spells.modifier_magnitude", &mut spells.modifier_magnitude, 0.0, f32::MAX);
        clamp_field("spells.modifier_duration", &mut spells.modifier_duration, 0.0, f32::MAX);

        self
    }
}

fn clamp_field(name: &str, value: &mut f32, min: f32, max: f32) {
    let original = *value;
    let clamped = if original.is_nan() {
        min
    } else {
        original.clamp(min, max)
    };
    if clamped != original || original.is_nan() {
        warn!("Setting {}={} clamped to {}", name, original, clamped);
        *value = clamped;
    }
}
