//! # Movement
//!
//! Integrates velocity into position once per tick.

use crate::components::{ComponentTag, Position, StatusEffect, StatusKind, Velocity};
use crate::ecs::{System, World};
use crate::events::GameEvent;

/// Moves every living entity that has both a position and a velocity.
///
/// Frozen entities move at `1 - magnitude` of their speed.
#[derive(Debug, Clone, Default)]
pub struct MovementSystem {
    max_speed: Option<f32>,
}

impl MovementSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the speed of everything this system moves.
    pub fn with_max_speed(max_speed: f32) -> Self {
        Self {
            max_speed: Some(max_speed.max(0.0)),
        }
    }
}

impl System for MovementSystem {
    fn name(&self) -> &'static str {
        "movement"
    }

    fn update(&mut self, world: &mut World, delta_time: f32, _events: &mut Vec<GameEvent>) {
        for id in world.entities_with(&[ComponentTag::Position, ComponentTag::Velocity]) {
            let Some(entity) = world.entity_mut(id) else {
                continue;
            };
            if entity.is_dead() {
                continue;
            }
            let Some(mut velocity) = entity.get::<Velocity>().copied() else {
                continue;
            };
            if let Some(max_speed) = self.max_speed {
                velocity = velocity.clamped(max_speed);
            }
            if let Some(StatusEffect {
                kind: StatusKind::Frozen,
                magnitude,
                ..
            }) = entity.get::<StatusEffect>()
            {
                velocity = velocity.scaled((1.0 - magnitude).clamp(0.0, 1.0));
            }
            if let Some(position) = entity.get_mut::<Position>() {
                *position = position.advanced(velocity, delta_time);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Health;
    use crate::ecs::EntityId;

    fn mover(world: &mut World, velocity: Velocity) -> EntityId {
        world
            .create_entity()
            .with(Position::new(0.0, 0.0))
            .with(velocity)
            .with(Health::new(10.0))
            .id()
    }

    #[test]
    fn test_position_integrates_velocity() {
        let mut world = World::new();
        let id = mover(&mut world, Velocity::new(10.0, -4.0));
        world.update(0.0);

        MovementSystem::new().update(&mut world, 0.5, &mut Vec::new());
        assert_eq!(world.get::<Position>(id).copied(), Some(Position::new(5.0, -2.0)));
    }

    #[test]
    fn test_dead_entities_stay_put() {
        let mut world = World::new();
        let id = mover(&mut world, Velocity::new(10.0, 0.0));
        world.update(0.0);
        if let Some(health) = world.get_mut::<Health>(id) {
            health.current = 0.0;
        }

        MovementSystem::new().update(&mut world, 1.0, &mut Vec::new());
        assert_eq!(world.get::<Position>(id).copied(), Some(Position::new(0.0, 0.0)));
    }

    #[test]
    fn test_frozen_slows_movement() {
        let mut world = World::new();
        let id = mover(&mut world, Velocity::new(10.0, 0.0));
        world.update(0.0);
        if let Some(entity) = world.entity_mut(id) {
            entity.add_component(StatusEffect::marker(StatusKind::Frozen, 0.5, 2.0));
        }

        MovementSystem::new().update(&mut world, 1.0, &mut Vec::new());
        assert_eq!(world.get::<Position>(id).copied(), Some(Position::new(5.0, 0.0)));
    }

    #[test]
    fn test_max_speed_clamps() {
        let mut world = World::new();
        let id = mover(&mut world, Velocity::new(0.0, 200.0));
        world.update(0.0);

        MovementSystem::with_max_speed(100.0).update(&mut world, 1.0, &mut Vec::new());
        assert_eq!(world.get::<Position>(id).copied(), Some(Position::new(0.0, 100.0)));
    }
}
