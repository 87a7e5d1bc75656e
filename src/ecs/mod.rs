//! # ECS Module
//!
//! Entity storage and the per-tick system contract.
//!
//! Entities are plain IDs owning a set of tagged components. The [`World`] defers
//! entity creation and removal until [`World::update`], which gives every system
//! in a tick the same stable entity list. Component mutation on the other hand is
//! immediate: a system that adds a shield to an entity is seen by the next system
//! in the same tick.

pub mod entity;
pub mod system;
pub mod world;

pub use entity::*;
pub use system::*;
pub use world::*;
