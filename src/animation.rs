//! # Animation
//!
//! Sets animation states on entities and resolves one-shot completion
//! follow-ups.
//!
//! Combat triggers `Attack` and `Hit` clips with a
//! [`AnimationFollowup::ResumeLocomotion`] follow-up. The renderer calls
//! [`complete_animation`] when the clip ends; the follow-up then picks `Walk`
//! or `Idle` from the entity's velocity at that moment. A follow-up runs at
//! most once per trigger.

use crate::components::{Animation, AnimationFollowup, AnimationState, Velocity};
use crate::ecs::{EntityId, World};
use crate::events::GameEvent;

/// Speed above which an entity counts as walking.
pub const WALK_SPEED_THRESHOLD: f32 = 0.1;

/// Plays `state` on `entity` and arms `on_complete`.
///
/// Entities without an [`Animation`] component are skipped. Returns the new
/// trigger ID when a clip was started.
pub fn trigger_animation(
    world: &mut World,
    entity: EntityId,
    state: AnimationState,
    on_complete: Option<AnimationFollowup>,
    events: &mut Vec<GameEvent>,
) -> Option<u64> {
    let animation = world.get_mut::<Animation>(entity)?;
    animation.state = state;
    animation.on_complete = on_complete;
    animation.trigger_id += 1;
    let trigger_id = animation.trigger_id;

    events.push(GameEvent::AnimationChanged { entity, state });
    Some(trigger_id)
}

/// Reports that the current clip on `entity` finished.
///
/// Runs the armed follow-up exactly once; repeated calls are no-ops. Returns
/// the state the entity switched to, if any.
pub fn complete_animation(
    world: &mut World,
    entity: EntityId,
    events: &mut Vec<GameEvent>,
) -> Option<AnimationState> {
    let moving = world
        .get::<Velocity>(entity)
        .map_or(false, |velocity| velocity.magnitude() > WALK_SPEED_THRESHOLD);

    let animation = world.get_mut::<Animation>(entity)?;
    let followup = animation.on_complete.take()?;
    let next = match followup {
        AnimationFollowup::ResumeLocomotion => {
            if moving {
                AnimationState::Walk
            } else {
                AnimationState::Idle
            }
        }
    };
    animation.state = next;

    events.push(GameEvent::AnimationChanged {
        entity,
        state: next,
    });
    Some(next)
}

/// Like [`complete_animation`] but ignores completions for an older trigger.
pub fn complete_animation_trigger(
    world: &mut World,
    entity: EntityId,
    trigger_id: u64,
    events: &mut Vec<GameEvent>,
) -> Option<AnimationState> {
    let current = world.get::<Animation>(entity)?.trigger_id;
    if current != trigger_id {
        return None;
    }
    complete_animation(world, entity, events)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animated(world: &mut World, velocity: Velocity) -> EntityId {
        let id = world
            .create_entity()
            .with(Animation::new())
            .with(velocity)
            .id();
        world.update(0.0);
        id
    }

    #[test]
    fn test_trigger_sets_state() {
        let mut world = World::new();
        let id = animated(&mut world, Velocity::zero());
        let mut events = Vec::new();

        let trigger = trigger_animation(
            &mut world,
            id,
            AnimationState::Attack,
            Some(AnimationFollowup::ResumeLocomotion),
            &mut events,
        );
        assert_eq!(trigger, Some(1));
        assert_eq!(
            world.get::<Animation>(id).map(|a| a.state),
            Some(AnimationState::Attack)
        );
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_completion_branches_on_velocity() {
        let mut world = World::new();
        let still = animated(&mut world, Velocity::zero());
        let moving = animated(&mut world, Velocity::new(20.0, 0.0));
        let mut events = Vec::new();

        for id in [still, moving] {
            trigger_animation(
                &mut world,
                id,
                AnimationState::Hit,
                Some(AnimationFollowup::ResumeLocomotion),
                &mut events,
            );
        }

        assert_eq!(
            complete_animation(&mut world, still, &mut events),
            Some(AnimationState::Idle)
        );
        assert_eq!(
            complete_animation(&mut world, moving, &mut events),
            Some(AnimationState::Walk)
        );
    }

    #[test]
    fn test_completion_runs_once() {
        let mut world = World::new();
        let id = animated(&mut world, Velocity::zero());
        let mut events = Vec::new();
        trigger_animation(
            &mut world,
            id,
            AnimationState::Attack,
            Some(AnimationFollowup::ResumeLocomotion),
            &mut events,
        );

        assert!(complete_animation(&mut world, id, &mut events).is_some());
        assert!(complete_animation(&mut world, id, &mut events).is_none());
    }

    #[test]
    fn test_stale_trigger_is_ignored() {
        let mut world = World::new();
        let id = animated(&mut world, Velocity::zero());
        let mut events = Vec::new();
        let first = trigger_animation(
            &mut world,
            id,
            AnimationState::Attack,
            Some(AnimationFollowup::ResumeLocomotion),
            &mut events,
        )
        .unwrap();
        trigger_animation(
            &mut world,
            id,
            AnimationState::Hit,
            Some(AnimationFollowup::ResumeLocomotion),
            &mut events,
        );

        assert!(complete_animation_trigger(&mut world, id, first, &mut events).is_none());
        assert_eq!(
            world.get::<Animation>(id).map(|a| a.state),
            Some(AnimationState::Hit)
        );
    }

    #[test]
    fn test_entities_without_animation_are_skipped() {
        let mut world = World::new();
        let id = world.create_entity().id();
        world.update(0.0);
        let mut events = Vec::new();
        assert!(trigger_animation(&mut world, id, AnimationState::Hit, None, &mut events).is_none());
        assert!(events.is_empty());
    }
}
