//! # AI Module
//!
//! The behavior machine that drives non-player entities.
//!
//! ```text
//!            scan hit              delay elapsed        in range
//!   Idle ───────────────▶ Detect ───────────────▶ Chase ─────────▶ Attack
//!    ▲ ▲  arrived             │ lost / out of range   │ ▲  out of range │
//!    │ └───── Patrol ◀────────┼───────────────────────┼─┴───────────────┘
//!    │        (delay)         ▼                       │ low health / lost
//!    └──────── arrived ◀──── Return ◀── near spawn ── Flee
//! ```
//!
//! Transitions are evaluated once per decision interval. Steering and attack
//! attempts run every tick so movement stays smooth between decisions.
//!
//! The target is a weak reference. Every decision re-resolves it through the
//! world; a removed or dead target is treated as lost.

use crate::combat::CombatSystem;
use crate::components::{
    AiComponent, AiState, Attack, ComponentTag, Health, Position, Stats, Team, Velocity,
};
use crate::ecs::{EntityId, World};
use crate::events::GameEvent;
use crate::settings::AiSettings;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Runs the behavior machine for every entity with an [`AiComponent`].
#[derive(Debug, Clone)]
pub struct AiSystem {
    rng: StdRng,
    settings: AiSettings,
}

/// Everything a decision needs to know about the deciding entity.
struct Perception {
    position: Position,
    team: Option<Team>,
    health_fraction: Option<f32>,
    attack_range: f32,
}

impl AiSystem {
    pub fn new(seed: u64) -> Self {
        Self::with_settings(seed, AiSettings::default())
    }

    pub fn with_settings(seed: u64, settings: AiSettings) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            settings,
        }
    }

    pub fn settings(&self) -> &AiSettings {
        &self.settings
    }

    /// Advances every AI by `delta_time`. Attack-state entities swing through
    /// `combat`.
    pub fn update(
        &mut self,
        world: &mut World,
        delta_time: f32,
        combat: &mut CombatSystem,
        events: &mut Vec<GameEvent>,
    ) {
        for id in world.entities_with(&[ComponentTag::Ai, ComponentTag::Position]) {
            self.update_entity(world, id, delta_time, combat, events);
        }
    }

    fn update_entity(
        &mut self,
        world: &mut World,
        id: EntityId,
        delta_time: f32,
        combat: &mut CombatSystem,
        events: &mut Vec<GameEvent>,
    ) {
        let Some(entity) = world.entity(id) else {
            return;
        };
        if entity.is_dead() {
            if let Some(velocity) = world.get_mut::<Velocity>(id) {
                *velocity = Velocity::zero();
            }
            return;
        }
        let Some(mut ai) = entity.get::<AiComponent>().cloned() else {
            return;
        };
        let Some(perception) = self.perceive(world, id) else {
            return;
        };

        ai.state_timer += delta_time;
        ai.decision_timer -= delta_time;
        if ai.decision_timer <= 0.0 {
            ai.decision_timer = ai.decision_interval;
            self.decide(world, id, &mut ai, &perception, events);
        }

        let velocity = self.steer(world, id, &ai, &perception);

        if let Some(entity) = world.entity_mut(id) {
            entity.add_component(velocity);
        }

        if ai.state == AiState::Attack {
            let ready = world.get::<Attack>(id).map_or(false, Attack::can_attack);
            if let (true, Some((target, target_position))) = (ready, live_target(world, ai.target)) {
                if perception.position.distance(target_position) <= perception.attack_range {
                    combat.attack(world, id, target, events);
                }
            }
        }

        if let Some(entity) = world.entity_mut(id) {
            entity.add_component(ai);
        }
    }

    fn perceive(&self, world: &World, id: EntityId) -> Option<Perception> {
        let entity = world.entity(id)?;
        Some(Perception {
            position: entity.position()?,
            team: entity.team(),
            health_fraction: entity.get::<Health>().map(Health::fraction),
            attack_range: entity
                .get::<Attack>()
                .map_or(self.settings.default_melee_range, |attack| attack.range),
        })
    }

    fn decide(
        &mut self,
        world: &World,
        id: EntityId,
        ai: &mut AiComponent,
        me: &Perception,
        events: &mut Vec<GameEvent>,
    ) {
        let spawn = ai.spawn();
        let low_health = me
            .health_fraction
            .map_or(false, |fraction| fraction < ai.flee_health_threshold);
        let home = me.position.distance(spawn) <= self.settings.arrival_radius;
        let current_target = ai.target;
        let target = live_target(world, current_target);
        let target_distance = target.map(|(_, position)| me.position.distance(position));

        match ai.state {
            AiState::Idle => {
                if let Some(found) = scan(world, id, me, ai.detection_range) {
                    transition(ai, id, AiState::Detect, Some(found), events);
                } else if ai.patrol_radius > 0.0 && ai.state_timer >= ai.patrol_delay {
                    let point = self.patrol_point(spawn, ai.patrol_radius);
                    transition(ai, id, AiState::Patrol, None, events);
                    ai.patrol_point = Some(point);
                }
            }
            AiState::Patrol => {
                let arrived = ai.patrol_point.map_or(true, |point| {
                    me.position.distance(point) <= self.settings.arrival_radius
                });
                if let Some(found) = scan(world, id, me, ai.detection_range) {
                    transition(ai, id, AiState::Detect, Some(found), events);
                } else if arrived {
                    transition(ai, id, AiState::Idle, None, events);
                }
            }
            AiState::Detect => match target_distance {
                Some(distance) if distance <= ai.detection_range => {
                    if ai.state_timer >= self.settings.detect_confirm_delay {
                        transition(ai, id, AiState::Chase, current_target, events);
                    }
                }
                _ => transition(ai, id, AiState::Idle, None, events),
            },
            AiState::Chase => {
                // An unlimited chase (max distance 0) has no leash either
                let tethered = ai.max_chase_distance > 0.0;
                let leash = if tethered {
                    ai.detection_range * self.settings.leash_multiplier
                } else {
                    f32::INFINITY
                };
                let strayed = tethered && me.position.distance(spawn) > ai.max_chase_distance;
                if low_health {
                    transition(ai, id, AiState::Flee, None, events);
                } else {
                    match target_distance {
                        None => transition(ai, id, AiState::Return, None, events),
                        Some(_) if strayed => transition(ai, id, AiState::Return, None, events),
                        Some(distance) if distance > leash => {
                            transition(ai, id, AiState::Return, None, events)
                        }
                        Some(distance) if distance <= me.attack_range => {
                            transition(ai, id, AiState::Attack, current_target, events)
                        }
                        Some(_) => {}
                    }
                }
            }
            AiState::Attack => {
                if low_health {
                    transition(ai, id, AiState::Flee, None, events);
                } else {
                    match target_distance {
                        None => transition(ai, id, AiState::Return, None, events),
                        Some(distance) if distance > me.attack_range => {
                            transition(ai, id, AiState::Chase, current_target, events)
                        }
                        Some(_) => {}
                    }
                }
            }
            AiState::Flee => {
                let recovered = me
                    .health_fraction
                    .map_or(true, |fraction| fraction > ai.flee_health_threshold);
                if recovered || home {
                    transition(ai, id, AiState::Return, None, events);
                }
            }
            AiState::Return => {
                if home {
                    transition(ai, id, AiState::Idle, None, events);
                }
            }
        }
    }

    /// Velocity for the current state.
    fn steer(&self, world: &World, id: EntityId, ai: &AiComponent, me: &Perception) -> Velocity {
        let stats_speed = world.get::<Stats>(id).map_or(1.0, |stats| stats.speed);
        let speed = ai.move_speed * ai.state_speed() * stats_speed;

        let (destination, stop_distance) = match ai.state {
            AiState::Chase => (
                live_target(world, ai.target).map(|(_, position)| position),
                me.attack_range,
            ),
            AiState::Flee | AiState::Return => (Some(ai.spawn()), self.settings.arrival_radius),
            AiState::Patrol => (ai.patrol_point, self.settings.arrival_radius),
            AiState::Idle | AiState::Detect | AiState::Attack => (None, 0.0),
        };

        match destination {
            Some(destination) if me.position.distance(destination) > stop_distance => {
                Velocity::toward(me.position, destination, speed)
            }
            _ => Velocity::zero(),
        }
    }

    fn patrol_point(&mut self, spawn: Position, radius: f32) -> Position {
        let angle = self.rng.gen_range(0.0..TAU);
        let distance = self.rng.gen_range(0.0..=radius);
        Position::new(
            spawn.x + angle.cos() * distance,
            spawn.y + angle.sin() * distance,
        )
    }
}

/// Re-resolves a weak target reference. Removed, dead, health-less or
/// position-less targets resolve to `None`.
fn live_target(world: &World, target: Option<EntityId>) -> Option<(EntityId, Position)> {
    let entity = world.entity(target?)?;
    if entity.is_dead() || !entity.has::<Health>() {
        return None;
    }
    Some((entity.id(), entity.position()?))
}

/// Nearest living enemy within `range`.
fn scan(world: &World, id: EntityId, me: &Perception, range: f32) -> Option<EntityId> {
    world.nearest_where(me.position, range, |candidate| {
        candidate.id() != id
            && candidate.has::<Health>()
            && !candidate.is_dead()
            && Team::are_enemies(me.team.as_ref(), candidate.get::<Team>())
    })
}

fn transition(
    ai: &mut AiComponent,
    id: EntityId,
    to: AiState,
    target: Option<EntityId>,
    events: &mut Vec<GameEvent>,
) {
    let from = ai.state;
    if from == to {
        return;
    }
    ai.state = to;
    ai.state_timer = 0.0;
    ai.target = if to.uses_target() { target } else { None };
    ai.patrol_point = None;

    debug!("AI {}: {} -> {}", id, from, to);
    events.push(GameEvent::AiStateChanged {
        entity: id,
        from,
        to,
    });
}
