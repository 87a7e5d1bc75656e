//! # Animation Component
//!
//! Named animation state plus the follow-up to run when the renderer reports
//! that a one-shot animation has finished.

use serde::{Deserialize, Serialize};

/// Animation clips the simulation asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationState {
    Idle,
    Walk,
    Attack,
    Hit,
}

impl AnimationState {
    pub fn as_str(self) -> &'static str {
        match self {
            AnimationState::Idle => "idle",
            AnimationState::Walk => "walk",
            AnimationState::Attack => "attack",
            AnimationState::Hit => "hit",
        }
    }
}

/// What to do once a one-shot animation completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationFollowup {
    /// Go back to `Walk` if moving, `Idle` otherwise
    ResumeLocomotion,
}

/// Current animation and its pending completion follow-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animation {
    pub state: AnimationState,
    pub on_complete: Option<AnimationFollowup>,
    /// Incremented on every trigger so stale completions can be told apart
    pub trigger_id: u64,
}

impl Default for Animation {
    fn default() -> Self {
        Self::new()
    }
}

impl Animation {
    pub fn new() -> Self {
        Self {
            state: AnimationState::Idle,
            on_complete: None,
            trigger_id: 0,
        }
    }
}
