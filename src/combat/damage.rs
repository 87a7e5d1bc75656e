//! # Damage Math
//!
//! Pure functions behind attack resolution, shared by melee attacks,
//! projectiles, spells and chain lightning.

use crate::components::{Attack, DamageType, Health, Position, Shield, Stats};
use crate::config::MINIMUM_DAMAGE;
use crate::ecs::Entity;
use rand::Rng;

/// Rolls a probability.
///
/// Always draws one uniform `[0, 1)` value, even for chances at or beyond the
/// edges, so the RNG stream advances identically regardless of the odds. A
/// chance `<= 0` never succeeds and a chance `>= 1` always does.
pub fn roll_chance<R: Rng + ?Sized>(rng: &mut R, chance: f32) -> bool {
    let draw: f32 = rng.gen();
    draw < chance.clamp(0.0, 1.0)
}

/// Attack damage plus the attacker's matching offensive stat.
pub fn base_damage(attack: &Attack, stats: Option<&Stats>) -> f32 {
    attack.damage + stats.map_or(0.0, |stats| stats.offense_for(attack.damage_type))
}

/// Subtracts `defense`, scales by `1 - resistance` and floors the result at
/// [`MINIMUM_DAMAGE`].
///
/// # Examples
///
/// ```
/// use riftbound::combat::damage::mitigate;
///
/// assert_eq!(mitigate(30.0, 5.0, 0.2), 20.0);
/// assert_eq!(mitigate(3.0, 50.0, 0.0), 1.0);
/// ```
pub fn mitigate(raw: f32, defense: f32, resistance: f32) -> f32 {
    let reduced = (raw - defense) * (1.0 - resistance.clamp(0.0, 1.0));
    reduced.max(MINIMUM_DAMAGE)
}

/// Mitigation for weapon attacks: defense stat chosen by damage type.
pub fn mitigate_attack(raw: f32, damage_type: DamageType, target: Option<&Stats>) -> f32 {
    match target {
        Some(stats) => mitigate(
            raw,
            stats.defense_for(damage_type),
            stats.resistance(damage_type),
        ),
        None => mitigate(raw, 0.0, 0.0),
    }
}

/// Mitigation for spells: always magic defense, resistance by element.
pub fn mitigate_spell(raw: f32, damage_type: DamageType, target: Option<&Stats>) -> f32 {
    match target {
        Some(stats) => mitigate(raw, stats.magic_defense, stats.resistance(damage_type)),
        None => mitigate(raw, 0.0, 0.0),
    }
}

/// How a hit was split between shield and health.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DamageApplication {
    pub absorbed: f32,
    pub applied: f32,
}

/// Runs `damage` through the entity's shield (if active) and subtracts the
/// rest from health with no floor.
///
/// Entities without health still get their shield drained.
pub fn apply_damage(entity: &mut Entity, damage: f32) -> DamageApplication {
    let (absorbed, remaining) = match entity.get_mut::<Shield>() {
        Some(shield) => shield.absorb(damage),
        None => (0.0, damage),
    };

    let mut applied = 0.0;
    if remaining > 0.0 {
        if let Some(health) = entity.get_mut::<Health>() {
            health.take_damage(remaining);
            applied = remaining;
        }
    }

    DamageApplication { absorbed, applied }
}

/// Feedback intensity grows with damage and is capped at `cap`.
pub fn feedback_intensity(damage: f32, per_damage: f32, cap: f32) -> f32 {
    (damage * per_damage).clamp(0.0, cap.max(0.0))
}

/// Deterministic particle seed for a hit at `position`.
pub fn hit_seed(position: Position) -> u64 {
    let x = (position.x * 16.0).round() as i64 as u64;
    let y = (position.y * 16.0).round() as i64 as u64;
    x.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ y.rotate_left(32)
}
