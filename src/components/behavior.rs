//! # AI Component
//!
//! Per-entity state for the behavior machine driven by
//! [`AiSystem`](crate::AiSystem).

use super::spatial::Position;
use crate::ecs::EntityId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Behavior states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiState {
    /// Standing still, scanning for enemies
    Idle,
    /// Wandering to a point near spawn, scanning for enemies
    Patrol,
    /// Candidate target spotted, waiting out the confirmation delay
    Detect,
    /// Moving toward the target
    Chase,
    /// In range, swinging whenever the cooldown allows
    Attack,
    /// Running home on low health
    Flee,
    /// Walking home after losing the target
    Return,
}

impl AiState {
    pub fn as_str(self) -> &'static str {
        match self {
            AiState::Idle => "idle",
            AiState::Patrol => "patrol",
            AiState::Detect => "detect",
            AiState::Chase => "chase",
            AiState::Attack => "attack",
            AiState::Flee => "flee",
            AiState::Return => "return",
        }
    }

    /// States whose behavior depends on a live target.
    pub fn uses_target(self) -> bool {
        matches!(self, AiState::Detect | AiState::Chase | AiState::Attack)
    }
}

impl fmt::Display for AiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Behavior state and tuning for one non-player entity.
///
/// `target` is a weak reference: it is only an ID and is re-resolved through
/// the world every time it is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiComponent {
    pub state: AiState,
    pub target: Option<EntityId>,
    pub spawn_x: f32,
    pub spawn_y: f32,
    pub detection_range: f32,
    /// Health fraction below which the entity flees
    pub flee_health_threshold: f32,
    /// Furthest the entity chases from spawn; `0` means unlimited
    pub max_chase_distance: f32,
    /// Seconds until the next decision
    pub decision_timer: f32,
    pub decision_interval: f32,
    /// Seconds spent in the current state
    pub state_timer: f32,
    /// Base movement speed in world units per second
    pub move_speed: f32,
    pub chase_speed: f32,
    pub flee_speed: f32,
    pub return_speed: f32,
    pub patrol_speed: f32,
    /// Patrol wander radius around spawn; `0` disables patrolling
    pub patrol_radius: f32,
    /// Seconds of idling before setting off on patrol
    pub patrol_delay: f32,
    pub patrol_point: Option<Position>,
}

impl AiComponent {
    /// Creates an idle AI tethered to `spawn` with default tuning.
    pub fn new(spawn: Position) -> Self {
        Self {
            state: AiState::Idle,
            target: None,
            spawn_x: spawn.x,
            spawn_y: spawn.y,
            detection_range: 150.0,
            flee_health_threshold: 0.25,
            max_chase_distance: 400.0,
            decision_timer: 0.0,
            decision_interval: 0.2,
            state_timer: 0.0,
            move_speed: 60.0,
            chase_speed: 1.2,
            flee_speed: 1.5,
            return_speed: 1.0,
            patrol_speed: 0.5,
            patrol_radius: 0.0,
            patrol_delay: 3.0,
            patrol_point: None,
        }
    }

    pub fn with_detection_range(mut self, range: f32) -> Self {
        self.detection_range = range;
        self
    }

    pub fn with_flee_threshold(mut self, threshold: f32) -> Self {
        self.flee_health_threshold = threshold;
        self
    }

    pub fn with_max_chase_distance(mut self, distance: f32) -> Self {
        self.max_chase_distance = distance;
        self
    }

    pub fn with_decision_interval(mut self, interval: f32) -> Self {
        self.decision_interval = interval;
        self
    }

    pub fn with_patrol(mut self, radius: f32, delay: f32) -> Self {
        self.patrol_radius = radius;
        self.patrol_delay = delay;
        self
    }

    pub fn with_move_speed(mut self, speed: f32) -> Self {
        self.move_speed = speed;
        self
    }

    pub fn spawn(&self) -> Position {
        Position::new(self.spawn_x, self.spawn_y)
    }

    /// Speed multiplier for the current state.
    pub fn state_speed(&self) -> f32 {
        match self.state {
            AiState::Chase => self.chase_speed,
            AiState::Flee => self.flee_speed,
            AiState::Return => self.return_speed,
            AiState::Patrol => self.patrol_speed,
            AiState::Idle | AiState::Detect | AiState::Attack => 0.0,
        }
    }
}
