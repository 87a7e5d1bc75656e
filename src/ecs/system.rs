//! # Systems
//!
//! The per-tick update contract shared by every simulation system.

use super::world::World;
use crate::events::GameEvent;

/// A processor that reads and writes components once per tick.
///
/// Systems run sequentially in a fixed registration order. They mutate the
/// world directly and report anything an outside observer may care about by
/// pushing [`GameEvent`]s into `events`.
pub trait System {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Advances the system by `delta_time` seconds.
    fn update(&mut self, world: &mut World, delta_time: f32, events: &mut Vec<GameEvent>);
}
