//! # Riftbound
//!
//! Simulation core for a 2D action-RPG built on an entity-component store.
//!
//! ## Architecture Overview
//!
//! Everything the renderer, UI and content generators observe is produced by a
//! small set of cooperating systems that run once per simulation tick:
//!
//! - **ECS**: entities are opaque monotonically increasing IDs carrying at most one
//!   component per type tag. Entity creation and removal are deferred until the
//!   next [`World::update`], so systems always iterate a stable snapshot.
//! - **Combat**: single attack resolution (evasion, crits, mitigation, shields),
//!   projectile flight and the per-tick cooldown and death cleanup pass.
//! - **Status effects**: single-occupancy timed effects (damage/heal over time,
//!   stat modifiers with baseline revert, markers) plus chain lightning.
//! - **AI**: a seven-state behavior machine with spawn tethering and flee logic.
//! - **Spells**: cast bars, mana gating, target resolution and effect dispatch.
//!
//! Side effects the simulation cannot perform itself (particles, camera shake,
//! hit flashes, animation changes) are returned as [`GameEvent`] values from each
//! tick and can be forwarded to any [`FeedbackSink`].
//!
//! ## Determinism
//!
//! Every system that rolls dice owns its own seeded `StdRng`. Two simulations
//! built from identical settings and fed identical inputs produce identical
//! event streams.

pub mod ai;
pub mod animation;
pub mod combat;
pub mod components;
pub mod ecs;
pub mod events;
pub mod generation;
pub mod movement;
pub mod prefabs;
pub mod settings;
pub mod simulation;
pub mod spells;
pub mod status;

// Core module re-exports
pub use ai::*;
pub use combat::*;
pub use components::*;
pub use ecs::*;
pub use events::*;
pub use generation::*;
pub use movement::*;
pub use settings::*;
pub use simulation::*;
pub use spells::*;
pub use status::*;

/// Core error type for the Riftbound simulation.
#[derive(thiserror::Error, Debug)]
pub enum RiftError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Simulation state is invalid
    #[error("Invalid simulation state: {0}")]
    InvalidState(String),

    /// Settings could not be used
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// Entity is not present in the world
    #[error("Entity {0} not found")]
    EntityNotFound(EntityId),

    /// Entity lacks a component an operation requires
    #[error("Entity {entity} has no {component} component")]
    MissingComponent {
        entity: EntityId,
        component: &'static str,
    },
}

/// Result type used throughout the Riftbound codebase.
pub type RiftResult<T> = Result<T, RiftError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation configuration constants.
pub mod config {
    /// Number of spell slots every caster has
    pub const SPELL_SLOT_COUNT: usize = 5;

    /// Number of hotbar keys
    pub const HOTBAR_SIZE: usize = 10;

    /// Every successful hit deals at least this much damage
    pub const MINIMUM_DAMAGE: f32 = 1.0;

    /// Seconds an AI waits in Detect before committing to a chase
    pub const DETECT_CONFIRM_DELAY: f32 = 0.3;

    /// Distance at which an AI counts as having arrived at a point
    pub const ARRIVAL_RADIUS: f32 = 8.0;

    /// A tethered chaser (positive max chase distance) loses its target once
    /// it is this many detection ranges away
    pub const LEASH_MULTIPLIER: f32 = 2.0;

    /// Attack range used by AI entities without an Attack component
    pub const DEFAULT_MELEE_RANGE: f32 = 24.0;

    /// Chain lightning search radius around each struck entity
    pub const CHAIN_RADIUS: f32 = 120.0;

    /// Maximum number of chain lightning jumps after the first target
    pub const CHAIN_HOPS: u32 = 3;

    /// Fraction of damage carried over to each chain jump
    pub const CHAIN_DAMAGE_FRACTION: f32 = 0.5;

    /// Upper bound on camera shake intensity
    pub const MAX_SHAKE_INTENSITY: f32 = 1.0;

    /// Upper bound on hit flash intensity
    pub const MAX_FLASH_INTENSITY: f32 = 0.8;

    /// Shield size used by defensive spells that carry no power value
    pub const DEFAULT_SHIELD_AMOUNT: f32 = 50.0;

    /// Shield lifetime granted by defensive spells
    pub const DEFAULT_SHIELD_DURATION: f32 = 10.0;

    /// Chance that an earth spell poisons its target
    pub const EARTH_POISON_CHANCE: f32 = 0.3;

    /// Radius within which a projectile connects with an entity
    pub const PROJECTILE_HIT_RADIUS: f32 = 12.0;

    /// Genre identifier passed to particle effects by default
    pub const DEFAULT_GENRE: &str = "fantasy";

    /// Simulation step used by the demo binary
    pub const DEFAULT_TICK_SECONDS: f32 = 1.0 / 60.0;

    /// Shortest interval between periodic status ticks
    pub const MIN_STATUS_TICK_INTERVAL: f32 = 0.01;
}
