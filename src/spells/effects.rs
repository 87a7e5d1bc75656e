//! Effect dispatch for completed casts.

use super::spell::{Element, Spell, SpellType};
use crate::combat::damage::{apply_damage, mitigate_spell, roll_chance};
use crate::components::{Health, StatusEffect, StatusKind, Stats};
use crate::ecs::{EntityId, World};
use crate::events::{DamageSource, GameEvent};
use crate::settings::{ChainSettings, SpellSettings};
use crate::status::{apply_shield, apply_status, chain_lightning};
use log::trace;
use rand::Rng;

/// Tuning shared by every effect of one cast.
pub struct EffectContext<'a, R: Rng + ?Sized> {
    pub rng: &'a mut R,
    pub settings: &'a SpellSettings,
    pub chain: &'a ChainSettings,
}

/// Applies `spell`'s effect from `caster` to each of `targets` in order.
pub fn apply_spell<R: Rng + ?Sized>(
    world: &mut World,
    caster: EntityId,
    spell: &Spell,
    targets: &[EntityId],
    ctx: &mut EffectContext<'_, R>,
    events: &mut Vec<GameEvent>,
) {
    for &target in targets {
        match spell.spell_type {
            SpellType::Offensive => offensive(world, caster, spell, target, ctx, events),
            SpellType::Healing => heal(world, spell, target, events),
            SpellType::Defensive => {
                let amount = if spell.damage > 0.0 {
                    spell.damage
                } else {
                    ctx.settings.default_shield_amount
                };
                apply_shield(
                    world,
                    target,
                    amount,
                    ctx.settings.default_shield_duration,
                    events,
                );
            }
            SpellType::Buff => {
                let effect = modifier(buff_kind(spell.element), ctx.settings).from_source(caster);
                apply_status(world, target, effect, events);
            }
            SpellType::Debuff => {
                let effect =
                    modifier(debuff_kind(spell.element), ctx.settings).from_source(caster);
                apply_status(world, target, effect, events);
            }
            SpellType::Utility => {}
        }
    }
}

fn offensive<R: Rng + ?Sized>(
    world: &mut World,
    caster: EntityId,
    spell: &Spell,
    target: EntityId,
    ctx: &mut EffectContext<'_, R>,
    events: &mut Vec<GameEvent>,
) {
    let magic_power = world.get::<Stats>(caster).map_or(0.0, |stats| stats.magic_power);
    let raw = spell.damage + magic_power;
    let Some(entity) = world.entity_mut(target) else {
        return;
    };
    let amount = mitigate_spell(raw, spell.damage_type(), entity.get::<Stats>());
    let outcome = apply_damage(entity, amount);
    trace!(
        "{} hit {} with {} for {:.1} ({:.1} absorbed)",
        caster,
        target,
        spell.name,
        amount,
        outcome.absorbed
    );
    if outcome.absorbed > 0.0 {
        events.push(GameEvent::DamageAbsorbed {
            target,
            absorbed: outcome.absorbed,
            remaining: amount - outcome.absorbed,
        });
    }
    if outcome.applied > 0.0 {
        events.push(GameEvent::EntityDamaged {
            attacker: Some(caster),
            target,
            amount: outcome.applied,
            critical: false,
            source: DamageSource::Spell,
        });
    }

    let settings = ctx.settings;
    match spell.element {
        Element::Fire => {
            let burn = StatusEffect::periodic(
                StatusKind::Burn,
                amount * settings.burn_fraction,
                settings.burn_duration,
                settings.dot_tick_interval,
            );
            apply_status(world, target, burn.from_source(caster), events);
        }
        Element::Ice => {
            let frozen =
                StatusEffect::marker(StatusKind::Frozen, settings.freeze_slow, settings.freeze_duration);
            apply_status(world, target, frozen.from_source(caster), events);
        }
        Element::Lightning => {
            let shocked = StatusEffect::marker(StatusKind::Shocked, 1.0, settings.shock_duration);
            apply_status(world, target, shocked.from_source(caster), events);
            chain_lightning(world, caster, target, amount, ctx.chain, events);
        }
        Element::Earth => {
            if roll_chance(ctx.rng, settings.earth_poison_chance) {
                let poison = StatusEffect::periodic(
                    StatusKind::Poison,
                    amount * settings.poison_fraction,
                    settings.poison_duration,
                    settings.dot_tick_interval,
                );
                apply_status(world, target, poison.from_source(caster), events);
            }
        }
        Element::Arcane | Element::Holy => {}
    }
}

fn heal(world: &mut World, spell: &Spell, target: EntityId, events: &mut Vec<GameEvent>) {
    let Some(entity) = world.entity_mut(target) else {
        return;
    };
    if entity.is_dead() {
        return;
    }
    if let Some(health) = entity.get_mut::<Health>() {
        let amount = health.heal(spell.damage);
        if amount > 0.0 {
            events.push(GameEvent::EntityHealed { target, amount });
        }
    }
}

/// Stat modifier a buff of `element` grants: fire and arcane empower,
/// earth, ice and holy harden, lightning quickens.
pub fn buff_kind(element: Element) -> StatusKind {
    match element {
        Element::Fire | Element::Arcane => StatusKind::Strength,
        Element::Earth | Element::Ice | Element::Holy => StatusKind::Fortify,
        Element::Lightning => StatusKind::Haste,
    }
}

/// Stat modifier a debuff of `element` inflicts: earth and ice make the
/// target brittle, everything else saps its strength.
pub fn debuff_kind(element: Element) -> StatusKind {
    match element {
        Element::Earth | Element::Ice => StatusKind::Vulnerability,
        Element::Arcane | Element::Fire | Element::Lightning | Element::Holy => {
            StatusKind::Weakness
        }
    }
}

fn modifier(kind: StatusKind, settings: &SpellSettings) -> StatusEffect {
    StatusEffect::modifier(kind, settings.modifier_magnitude, settings.modifier_duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Position, Shield, StatusCategory, Team};
    use crate::spells::TargetMode;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Fixture {
        world: World,
        caster: EntityId,
        target: EntityId,
        rng: StdRng,
        settings: SpellSettings,
        chain: ChainSettings,
    }

    impl Fixture {
        fn new() -> Self {
            let mut world = World::new();
            let caster = world
                .create_entity()
                .with(Position::new(0.0, 0.0))
                .with(Health::new(100.0))
                .with(Team::new(1))
                .with(Stats {
                    attack: 10.0,
                    magic_power: 5.0,
                    ..Stats::default()
                })
                .id();
            let target = world
                .create_entity()
                .with(Position::new(50.0, 0.0))
                .with(Health::with_current(80.0, 100.0))
                .with(Team::new(2))
                .with(Stats {
                    attack: 20.0,
                    defense: 50.0,
                    magic_defense: 5.0,
                    ..Stats::default()
                })
                .id();
            world.update(0.0);
            Self {
                world,
                caster,
                target,
                rng: StdRng::seed_from_u64(3),
                settings: SpellSettings::default(),
                chain: ChainSettings::default(),
            }
        }

        fn cast(&mut self, spell: &Spell, target: EntityId) -> Vec<GameEvent> {
            let mut events = Vec::new();
            let mut ctx = EffectContext {
                rng: &mut self.rng,
                settings: &self.settings,
                chain: &self.chain,
            };
            apply_spell(&mut self.world, self.caster, spell, &[target], &mut ctx, &mut events);
            events
        }

        fn health(&self, id: EntityId) -> f32 {
            self.world.get::<Health>(id).map_or(f32::NAN, |h| h.current)
        }

        fn status(&self, id: EntityId) -> Option<StatusKind> {
            self.world.get::<StatusEffect>(id).map(|effect| effect.kind)
        }
    }

    fn spell(spell_type: SpellType, element: Element, damage: f32) -> Spell {
        Spell::new("Test", spell_type, element, TargetMode::Single).with_damage(damage)
    }

    #[test]
    fn test_offensive_uses_magic_defense_and_magic_power() {
        let mut f = Fixture::new();
        let target = f.target;
        f.cast(&spell(SpellType::Offensive, Element::Arcane, 20.0), target);
        // (20 + 5) - 5 magic defense; physical defense of 50 is ignored
        assert_eq!(f.health(target), 60.0);
        assert_eq!(f.status(target), None);
    }

    #[test]
    fn test_fire_applies_burn_scaled_by_damage() {
        let mut f = Fixture::new();
        let target = f.target;
        f.cast(&spell(SpellType::Offensive, Element::Fire, 20.0), target);
        let burn = f.world.get::<StatusEffect>(target).cloned();
        assert_eq!(burn.as_ref().map(|e| e.kind), Some(StatusKind::Burn));
        assert_eq!(burn.as_ref().map(|e| e.magnitude), Some(20.0 * 0.2));
        assert_eq!(burn.and_then(|e| e.source), Some(f.caster));
    }

    #[test]
    fn test_ice_freezes() {
        let mut f = Fixture::new();
        let target = f.target;
        f.cast(&spell(SpellType::Offensive, Element::Ice, 10.0), target);
        assert_eq!(f.status(target), Some(StatusKind::Frozen));
    }

    #[test]
    fn test_lightning_shocks_and_chains() {
        let mut f = Fixture::new();
        let second = f
            .world
            .create_entity()
            .with(Position::new(100.0, 0.0))
            .with(Health::new(100.0))
            .with(Team::new(2))
            .id();
        f.world.update(0.0);

        let target = f.target;
        f.cast(&spell(SpellType::Offensive, Element::Lightning, 20.0), target);
        assert_eq!(f.status(target), Some(StatusKind::Shocked));
        assert_eq!(f.health(second), 90.0);
    }

    #[test]
    fn test_earth_poison_follows_configured_chance() {
        let mut f = Fixture::new();
        let target = f.target;
        f.settings.earth_poison_chance = 1.0;
        f.cast(&spell(SpellType::Offensive, Element::Earth, 20.0), target);
        assert_eq!(f.status(target), Some(StatusKind::Poison));

        let mut f = Fixture::new();
        let target = f.target;
        f.settings.earth_poison_chance = 0.0;
        f.cast(&spell(SpellType::Offensive, Element::Earth, 20.0), target);
        assert_eq!(f.status(target), None);
    }

    #[test]
    fn test_healing_caps_at_max() {
        let mut f = Fixture::new();
        let target = f.target;
        let events = f.cast(&spell(SpellType::Healing, Element::Holy, 50.0), target);
        assert_eq!(f.health(target), 100.0);
        assert!(events.contains(&GameEvent::EntityHealed {
            target,
            amount: 20.0
        }));
    }

    #[test]
    fn test_defensive_shield_falls_back_to_defaults() {
        let mut f = Fixture::new();
        let caster = f.caster;
        f.cast(&spell(SpellType::Defensive, Element::Arcane, 0.0), caster);
        assert_eq!(
            f.world.get::<Shield>(caster).copied(),
            Some(Shield::new(50.0, 10.0))
        );

        f.cast(&spell(SpellType::Defensive, Element::Arcane, 35.0), caster);
        assert_eq!(f.world.get::<Shield>(caster).map(|s| s.amount), Some(35.0));
    }

    #[test]
    fn test_buffs_and_debuffs_by_element() {
        let mut f = Fixture::new();
        let (caster, target) = (f.caster, f.target);

        f.cast(&spell(SpellType::Buff, Element::Fire, 0.0), caster);
        assert_eq!(f.status(caster), Some(StatusKind::Strength));
        assert_eq!(f.world.get::<Stats>(caster).map(|s| s.attack), Some(12.5));

        f.cast(&spell(SpellType::Buff, Element::Holy, 20.0), caster);
        assert_eq!(f.status(caster), Some(StatusKind::Fortify));
        assert_eq!(f.world.get::<Stats>(caster).map(|s| s.attack), Some(10.0));

        f.cast(&spell(SpellType::Debuff, Element::Earth, 0.0), target);
        assert_eq!(f.status(target), Some(StatusKind::Vulnerability));
        assert_eq!(f.world.get::<Stats>(target).map(|s| s.defense), Some(37.5));

        f.cast(&spell(SpellType::Debuff, Element::Arcane, 0.0), target);
        assert_eq!(f.status(target), Some(StatusKind::Weakness));
        assert_eq!(f.world.get::<Stats>(target).map(|s| s.attack), Some(15.0));
        assert_eq!(f.world.get::<Stats>(target).map(|s| s.defense), Some(50.0));
    }

    #[test]
    fn test_every_element_maps_to_a_stat_modifier() {
        for element in Element::ALL {
            for kind in [buff_kind(element), debuff_kind(element)] {
                assert_eq!(kind.category(), StatusCategory::StatModifier, "{:?}", element);
            }
            assert!(buff_kind(element).modifier_factor(0.25) > 1.0);
            assert!(debuff_kind(element).modifier_factor(0.25) < 1.0);

            let mut f = Fixture::new();
            let (caster, target) = (f.caster, f.target);
            f.cast(&spell(SpellType::Buff, element, 0.0), caster);
            assert_eq!(f.status(caster), Some(buff_kind(element)));
            f.cast(&spell(SpellType::Debuff, element, 0.0), target);
            assert_eq!(f.status(target), Some(debuff_kind(element)));
        }
    }

    #[test]
    fn test_utility_does_nothing() {
        let mut f = Fixture::new();
        let target = f.target;
        let events = f.cast(&spell(SpellType::Utility, Element::Arcane, 99.0), target);
        assert!(events.is_empty());
        assert_eq!(f.health(target), 80.0);
    }
}
