//! # Entities
//!
//! Entity identifiers and the per-entity component map.

use crate::components::{Component, ComponentKind, ComponentTag, Dead, Health, Position, Team};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Unique identifier for entities.
///
/// IDs are handed out by the [`World`](crate::World) in strictly increasing
/// order and never reused, so a stale ID can only ever miss, never alias a
/// newer entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Returns the raw numeric value of this ID.
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A bag of components identified by an [`EntityId`].
///
/// At most one component per [`ComponentTag`] is stored; adding a second one
/// replaces the first and hands the old value back.
///
/// # Examples
///
/// ```
/// use riftbound::{Entity, EntityId, Health, Position};
///
/// let mut entity = Entity::new(EntityId(1));
/// entity.with(Position::new(3.0, 4.0)).with(Health::new(50.0));
///
/// assert!(entity.has::<Health>());
/// assert_eq!(entity.get::<Position>().map(|p| p.x), Some(3.0));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    components: BTreeMap<ComponentTag, Component>,
}

impl Entity {
    /// Creates an empty entity. Normally called through
    /// [`World::create_entity`](crate::World::create_entity).
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            components: BTreeMap::new(),
        }
    }

    /// Returns this entity's ID.
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Adds a component, returning the component it replaced (if any).
    pub fn add_component<C: ComponentKind>(&mut self, component: C) -> Option<C> {
        self.components
            .insert(C::TAG, component.into_component())
            .and_then(C::from_component)
    }

    /// Builder-style variant of [`Entity::add_component`].
    pub fn with<C: ComponentKind>(&mut self, component: C) -> &mut Self {
        self.add_component(component);
        self
    }

    /// Removes and returns a component.
    pub fn remove_component<C: ComponentKind>(&mut self) -> Option<C> {
        self.components.remove(&C::TAG).and_then(C::from_component)
    }

    /// Removes whatever component is stored under `tag`.
    pub fn remove_tag(&mut self, tag: ComponentTag) -> Option<Component> {
        self.components.remove(&tag)
    }

    /// Gets a component by type.
    pub fn get<C: ComponentKind>(&self) -> Option<&C> {
        self.components.get(&C::TAG).and_then(C::from_ref)
    }

    /// Gets a component by type, mutably.
    pub fn get_mut<C: ComponentKind>(&mut self) -> Option<&mut C> {
        self.components.get_mut(&C::TAG).and_then(C::from_mut)
    }

    /// Gets the raw tagged component.
    pub fn component(&self, tag: ComponentTag) -> Option<&Component> {
        self.components.get(&tag)
    }

    /// Checks whether a component of type `C` is attached.
    pub fn has<C: ComponentKind>(&self) -> bool {
        self.components.contains_key(&C::TAG)
    }

    /// Checks whether a component with the given tag is attached.
    pub fn has_tag(&self, tag: ComponentTag) -> bool {
        self.components.contains_key(&tag)
    }

    /// Checks whether every listed tag is attached.
    pub fn has_all(&self, tags: &[ComponentTag]) -> bool {
        tags.iter().all(|tag| self.components.contains_key(tag))
    }

    /// Iterates over the tags of all attached components.
    pub fn tags(&self) -> impl Iterator<Item = ComponentTag> + '_ {
        self.components.keys().copied()
    }

    /// Number of attached components.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Terminal state check: either latched [`Dead`] or out of health.
    pub fn is_dead(&self) -> bool {
        self.has::<Dead>() || self.get::<Health>().map_or(false, Health::is_dead)
    }

    /// Copy of the entity's position, if it has one.
    pub fn position(&self) -> Option<Position> {
        self.get::<Position>().copied()
    }

    /// Copy of the entity's team, if it has one.
    pub fn team(&self) -> Option<Team> {
        self.get::<Team>().copied()
    }
}
