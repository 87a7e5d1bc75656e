//! # Events
//!
//! Everything the simulation wants the outside world to know about a tick.
//!
//! Systems never call into renderers, audio or UI directly. They push
//! [`GameEvent`]s, which [`Simulation::tick`](crate::Simulation::tick) hands
//! back to the caller. A frontend can inspect them directly or forward the
//! presentation-related ones to a [`FeedbackSink`] with [`dispatch_feedback`].

use crate::components::{AiState, AnimationState, StatusKind};
use crate::ecs::EntityId;
use serde::{Deserialize, Serialize};

/// Where a piece of damage came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageSource {
    Attack,
    Projectile,
    Explosion,
    Spell,
    Chain,
    StatusTick,
}

/// Events generated during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Health was reduced
    EntityDamaged {
        attacker: Option<EntityId>,
        target: EntityId,
        amount: f32,
        critical: bool,
        source: DamageSource,
    },
    /// A shield soaked some or all of a hit
    DamageAbsorbed {
        target: EntityId,
        absorbed: f32,
        remaining: f32,
    },
    /// The target evaded
    AttackMissed {
        attacker: EntityId,
        target: EntityId,
    },
    /// Health was restored
    EntityHealed {
        target: EntityId,
        amount: f32,
    },
    /// First tick on which an entity was found with no health
    EntityDied {
        entity: EntityId,
    },
    StatusApplied {
        target: EntityId,
        kind: StatusKind,
        replaced: Option<StatusKind>,
    },
    StatusExpired {
        target: EntityId,
        kind: StatusKind,
    },
    ShieldApplied {
        target: EntityId,
        amount: f32,
    },
    /// Shield depleted or timed out and was removed
    ShieldExpired {
        target: EntityId,
    },
    ProjectileSpawned {
        projectile: EntityId,
        owner: EntityId,
    },
    ProjectileExpired {
        projectile: EntityId,
    },
    AiStateChanged {
        entity: EntityId,
        from: AiState,
        to: AiState,
    },
    CastStarted {
        caster: EntityId,
        slot: usize,
    },
    CastCompleted {
        caster: EntityId,
        slot: usize,
        spell: String,
        targets: Vec<EntityId>,
    },
    CastCancelled {
        caster: EntityId,
        slot: usize,
    },
    AnimationChanged {
        entity: EntityId,
        state: AnimationState,
    },
    HitSparks {
        x: f32,
        y: f32,
        seed: u64,
        genre_id: String,
    },
    ScreenShake {
        intensity: f32,
    },
    HitFlash {
        intensity: f32,
    },
}

/// Fire-and-forget presentation hooks implemented by a frontend.
pub trait FeedbackSink {
    /// Spawn a burst of hit particles.
    fn spawn_hit_sparks(&mut self, x: f32, y: f32, seed: u64, genre_id: &str);

    /// Shake the camera.
    fn shake(&mut self, intensity: f32);

    /// Flash the screen.
    fn trigger_flash(&mut self, intensity: f32);

    /// Switch an entity's animation. Sinks that drive animation from the
    /// [`Animation`](crate::Animation) component can ignore this.
    fn animation_changed(&mut self, entity: EntityId, state: AnimationState) {
        let _ = (entity, state);
    }
}

/// Forwards presentation events to `sink`, ignoring everything else.
pub fn dispatch_feedback(events: &[GameEvent], sink: &mut dyn FeedbackSink) {
    for event in events {
        match event {
            GameEvent::HitSparks {
                x,
                y,
                seed,
                genre_id,
            } => sink.spawn_hit_sparks(*x, *y, *seed, genre_id),
            GameEvent::ScreenShake { intensity } => sink.shake(*intensity),
            GameEvent::HitFlash { intensity } => sink.trigger_flash(*intensity),
            GameEvent::AnimationChanged { entity, state } => sink.animation_changed(*entity, *state),
            _ => {}
        }
    }
}
