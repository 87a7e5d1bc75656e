//! # World
//!
//! Owner of every entity. Entity creation and removal are two-phase: requests are
//! queued and only become visible when [`World::update`] commits them.

use super::entity::{Entity, EntityId};
use crate::components::{ComponentKind, ComponentTag, Position};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Entity/component store.
///
/// Live entities are kept ordered by ID. Because IDs grow monotonically this is
/// also insertion order, which is the iteration order every system relies on.
///
/// # Examples
///
/// ```
/// use riftbound::{Health, Position, World};
///
/// let mut world = World::new();
/// let id = world
///     .create_entity()
///     .with(Position::new(0.0, 0.0))
///     .with(Health::new(100.0))
///     .id();
///
/// // Not visible until the next update
/// assert!(world.entity(id).is_none());
/// world.update(0.0);
/// assert!(world.entity(id).is_some());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    next_id: u64,
    entities: BTreeMap<EntityId, Entity>,
    pending_add: Vec<Entity>,
    pending_remove: Vec<EntityId>,
    elapsed: f64,
}

impl World {
    /// Creates an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh entity and queues it for the next [`World::update`].
    ///
    /// The returned reference can be used to attach components right away.
    pub fn create_entity(&mut self) -> &mut Entity {
        self.next_id += 1;
        self.pending_add.push(Entity::new(EntityId(self.next_id)));
        let last = self.pending_add.len() - 1;
        &mut self.pending_add[last]
    }

    /// Queues an entity for removal at the next [`World::update`].
    pub fn remove_entity(&mut self, id: EntityId) {
        if !self.pending_remove.contains(&id) {
            self.pending_remove.push(id);
        }
    }

    /// Whether removal of `id` has been requested but not yet committed.
    pub fn is_pending_removal(&self, id: EntityId) -> bool {
        self.pending_remove.contains(&id)
    }

    /// Commits queued creations, then queued removals.
    ///
    /// An entity created and removed within the same tick therefore never shows
    /// up in [`World::entities`].
    pub fn update(&mut self, delta_time: f32) {
        let added = self.pending_add.len();
        for entity in self.pending_add.drain(..) {
            self.entities.insert(entity.id(), entity);
        }

        let mut removed = 0;
        for id in self.pending_remove.drain(..) {
            if self.entities.remove(&id).is_some() {
                removed += 1;
            }
        }

        if added > 0 || removed > 0 {
            debug!(
                "World commit: +{} -{} ({} live)",
                added,
                removed,
                self.entities.len()
            );
        }

        self.elapsed += f64::from(delta_time);
    }

    /// Snapshot of all live entity IDs in insertion order.
    pub fn entities(&self) -> Vec<EntityId> {
        self.entities.keys().copied().collect()
    }

    /// Live entities that carry every listed component tag.
    pub fn entities_with(&self, tags: &[ComponentTag]) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|entity| entity.has_all(tags))
            .map(Entity::id)
            .collect()
    }

    /// Iterates over live entities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Looks up a live entity.
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Looks up a live entity mutably.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Looks up an entity that is either live or still waiting to be committed.
    pub fn entity_mut_any(&mut self, id: EntityId) -> Option<&mut Entity> {
        if self.entities.contains_key(&id) {
            return self.entities.get_mut(&id);
        }
        self.pending_add.iter_mut().find(|entity| entity.id() == id)
    }

    /// Whether `id` refers to a live entity.
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Shortcut for `world.entity(id)?.get::<C>()`.
    pub fn get<C: ComponentKind>(&self, id: EntityId) -> Option<&C> {
        self.entities.get(&id).and_then(Entity::get::<C>)
    }

    /// Shortcut for `world.entity_mut(id)?.get_mut::<C>()`.
    pub fn get_mut<C: ComponentKind>(&mut self, id: EntityId) -> Option<&mut C> {
        self.entities.get_mut(&id).and_then(Entity::get_mut::<C>)
    }

    /// Nearest live entity within `max_distance` of `origin` that satisfies
    /// `predicate`. Entities without a position are never considered.
    ///
    /// Ties go to the entity that was created first.
    pub fn nearest_where<F>(&self, origin: Position, max_distance: f32, predicate: F) -> Option<EntityId>
    where
        F: Fn(&Entity) -> bool,
    {
        let mut best: Option<(EntityId, f32)> = None;
        for entity in self.entities.values() {
            let Some(position) = entity.position() else {
                continue;
            };
            let distance = origin.distance(position);
            if distance > max_distance || !predicate(entity) {
                continue;
            }
            if best.map_or(true, |(_, best_distance)| distance < best_distance) {
                best = Some((entity.id(), distance));
            }
        }
        best.map(|(id, _)| id)
    }

    /// All live entities within `radius` of `origin` that satisfy `predicate`,
    /// in insertion order.
    pub fn within_radius<F>(&self, origin: Position, radius: f32, predicate: F) -> Vec<EntityId>
    where
        F: Fn(&Entity) -> bool,
    {
        self.entities
            .values()
            .filter(|entity| {
                entity
                    .position()
                    .map_or(false, |position| origin.distance(position) <= radius)
            })
            .filter(|entity| predicate(*entity))
            .map(Entity::id)
            .collect()
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether there are no live entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of entities waiting to be committed.
    pub fn pending_count(&self) -> usize {
        self.pending_add.len()
    }

    /// Total simulated time in seconds.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Health, Team};

    #[test]
    fn test_ids_are_monotonic() {
        let mut world = World::new();
        let a = world.create_entity().id();
        let b = world.create_entity().id();
        let c = world.create_entity().id();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_creation_is_deferred() {
        let mut world = World::new();
        let id = world.create_entity().id();
        assert!(!world.contains(id));
        assert_eq!(world.pending_count(), 1);

        world.update(0.016);
        assert!(world.contains(id));
        assert_eq!(world.pending_count(), 0);
        assert_eq!(world.entities(), vec![id]);
    }

    #[test]
    fn test_removal_is_deferred() {
        let mut world = World::new();
        let id = world.create_entity().id();
        world.update(0.0);

        world.remove_entity(id);
        assert!(world.contains(id));
        assert!(world.is_pending_removal(id));

        world.update(0.0);
        assert!(!world.contains(id));
        assert!(world.entities().is_empty());
    }

    #[test]
    fn test_create_and_remove_in_same_tick() {
        let mut world = World::new();
        let id = world.create_entity().id();
        world.remove_entity(id);
        world.update(0.0);
        assert!(!world.contains(id));
    }

    #[test]
    fn test_removed_ids_are_not_reused() {
        let mut world = World::new();
        let first = world.create_entity().id();
        world.update(0.0);
        world.remove_entity(first);
        world.update(0.0);

        let second = world.create_entity().id();
        assert_ne!(first, second);
    }

    #[test]
    fn test_entities_with_filters_by_tag_intersection() {
        let mut world = World::new();
        let both = world
            .create_entity()
            .with(Position::new(0.0, 0.0))
            .with(Health::new(10.0))
            .id();
        let _only_position = world.create_entity().with(Position::new(1.0, 1.0)).id();
        let _only_health = world.create_entity().with(Health::new(5.0)).id();
        world.update(0.0);

        let found = world.entities_with(&[ComponentTag::Position, ComponentTag::Health]);
        assert_eq!(found, vec![both]);
        assert_eq!(world.entities_with(&[ComponentTag::Position]).len(), 2);
        assert_eq!(world.entities_with(&[]).len(), 3);
    }

    #[test]
    fn test_component_changes_are_immediate() {
        let mut world = World::new();
        let id = world.create_entity().id();
        world.update(0.0);

        if let Some(entity) = world.entity_mut(id) {
            entity.add_component(Team::new(2));
        }
        assert_eq!(world.get::<Team>(id).map(|t| t.id), Some(2));
    }

    #[test]
    fn test_entity_mut_any_sees_pending() {
        let mut world = World::new();
        let id = world.create_entity().id();
        assert!(world.entity_mut(id).is_none());
        assert!(world.entity_mut_any(id).is_some());
    }

    #[test]
    fn test_nearest_where_prefers_closest_then_oldest() {
        let mut world = World::new();
        let far = world.create_entity().with(Position::new(50.0, 0.0)).id();
        let near_a = world.create_entity().with(Position::new(10.0, 0.0)).id();
        let _near_b = world.create_entity().with(Position::new(-10.0, 0.0)).id();
        world.update(0.0);

        let origin = Position::new(0.0, 0.0);
        assert_eq!(world.nearest_where(origin, 100.0, |_| true), Some(near_a));
        assert_eq!(world.nearest_where(origin, 5.0, |_| true), None);
        assert_eq!(
            world.nearest_where(origin, 100.0, |e| e.id() == far),
            Some(far)
        );
    }

    #[test]
    fn test_within_radius() {
        let mut world = World::new();
        let a = world.create_entity().with(Position::new(3.0, 4.0)).id();
        let _b = world.create_entity().with(Position::new(30.0, 40.0)).id();
        world.update(0.0);

        assert_eq!(
            world.within_radius(Position::new(0.0, 0.0), 5.0, |_| true),
            vec![a]
        );
    }
}
