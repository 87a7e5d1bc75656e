//! # Prefabs
//!
//! Ready-made component bundles for the actors the demo arena and tests use.
//! Each function queues an entity; it becomes live on the next
//! [`World::update`].

use crate::components::{
    AiComponent, Animation, Attack, DamageType, Equipment, Health, Hotbar, Layer, Mana,
    Position, ProjectileType, SpellSlots, Stats, Team, Velocity, Weapon,
};
use crate::ecs::{EntityId, World};

/// Team the player and its allies belong to.
pub const PLAYER_TEAM: u32 = 1;

/// Team hostile monsters belong to.
pub const MONSTER_TEAM: u32 = 2;

/// A player with full vitals, empty spell slots and default hotbar bindings.
///
/// Load spells with [`load_player_spells`](crate::load_player_spells).
pub fn spawn_player(world: &mut World, position: Position) -> EntityId {
    let stats = Stats {
        attack: 8.0,
        defense: 4.0,
        magic_power: 6.0,
        magic_defense: 4.0,
        crit_chance: 0.1,
        crit_damage: 2.0,
        evasion: 0.05,
        ..Stats::default()
    };
    world
        .create_entity()
        .with(position)
        .with(Velocity::zero())
        .with(Layer::ACTORS)
        .with(Health::new(150.0))
        .with(Mana::new(120.0, 6.0))
        .with(Team::new(PLAYER_TEAM))
        .with(Attack::new(12.0, 32.0, 0.6, DamageType::Physical))
        .with(stats)
        .with(Equipment::with_weapon(Weapon::melee("Longsword")))
        .with(SpellSlots::new())
        .with(Hotbar::with_default_bindings())
        .with(Animation::new())
        .id()
}

/// A melee monster that guards `position`.
pub fn spawn_monster(world: &mut World, position: Position, team: u32) -> EntityId {
    let stats = Stats {
        attack: 4.0,
        defense: 2.0,
        crit_chance: 0.05,
        evasion: 0.05,
        ..Stats::default()
    };
    world
        .create_entity()
        .with(position)
        .with(Velocity::zero())
        .with(Layer::ACTORS)
        .with(Health::new(60.0))
        .with(Team::new(team))
        .with(Attack::new(8.0, 24.0, 1.0, DamageType::Physical))
        .with(stats)
        .with(AiComponent::new(position).with_patrol(60.0, 2.0))
        .with(Animation::new())
        .id()
}

/// A monster that keeps firing arrows from range and runs early.
pub fn spawn_archer(world: &mut World, position: Position, team: u32) -> EntityId {
    world
        .create_entity()
        .with(position)
        .with(Velocity::zero())
        .with(Layer::ACTORS)
        .with(Health::new(40.0))
        .with(Team::new(team))
        .with(Attack::new(6.0, 140.0, 1.5, DamageType::Physical))
        .with(Stats {
            evasion: 0.1,
            ..Stats::default()
        })
        .with(Equipment::with_weapon(Weapon::ranged(
            "Shortbow",
            ProjectileType::Arrow,
            220.0,
            1.2,
        )))
        .with(
            AiComponent::new(position)
                .with_detection_range(200.0)
                .with_flee_threshold(0.4),
        )
        .with(Animation::new())
        .id()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ComponentTag;

    #[test]
    fn test_prefabs_become_live_after_update() {
        let mut world = World::new();
        let player = spawn_player(&mut world, Position::new(0.0, 0.0));
        let monster = spawn_monster(&mut world, Position::new(50.0, 0.0), MONSTER_TEAM);
        let archer = spawn_archer(&mut world, Position::new(90.0, 0.0), MONSTER_TEAM);
        assert!(world.is_empty());

        world.update(0.0);
        assert_eq!(world.len(), 3);
        assert_eq!(world.entities_with(&[ComponentTag::Ai]), vec![monster, archer]);
        assert!(world.get::<SpellSlots>(player).is_some());
        assert!(world
            .get::<Equipment>(archer)
            .and_then(Equipment::ranged_weapon)
            .is_some());
    }

    #[test]
    fn test_player_and_monsters_are_enemies() {
        let mut world = World::new();
        let player = spawn_player(&mut world, Position::new(0.0, 0.0));
        let monster = spawn_monster(&mut world, Position::new(50.0, 0.0), MONSTER_TEAM);
        world.update(0.0);
        assert!(Team::are_enemies(
            world.get::<Team>(player),
            world.get::<Team>(monster)
        ));
    }
}
