//! # Simulation
//!
//! The world plus every system, stepped together in a fixed order.
//!
//! One [`Simulation::tick`] runs:
//!
//! 1. world commit (queued creations, then removals)
//! 2. AI decisions and AI attacks
//! 3. spell casting and mana regeneration
//! 4. movement
//! 5. projectiles
//! 6. status effects and shields
//! 7. combat cooldowns and death cleanup
//! 8. extra systems, in registration order
//!
//! Player actions issued between ticks ([`Simulation::attack`],
//! [`Simulation::start_cast`], ...) resolve immediately; their events are
//! returned at the front of the next tick's batch.

use crate::ai::AiSystem;
use crate::combat::{CombatSystem, ProjectileSystem};
use crate::ecs::{EntityId, System, World};
use crate::events::GameEvent;
use crate::movement::MovementSystem;
use crate::settings::SimulationSettings;
use crate::spells::{self, SpellCastingSystem};
use crate::status::StatusEffectSystem;
use crate::RiftResult;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::mem;

const COMBAT_STREAM: u64 = 1;
const AI_STREAM: u64 = 2;
const SPELL_STREAM: u64 = 3;

/// Running totals gathered from tick events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationStatistics {
    /// Health removed from anything, by any source
    pub damage_dealt: f32,
    /// Damage soaked by shields
    pub damage_absorbed: f32,
    pub healing_done: f32,
    pub deaths: u32,
    pub attacks_missed: u32,
    pub spells_cast: u32,
    pub casts_cancelled: u32,
    pub projectiles_fired: u32,
}

impl SimulationStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one event into the totals.
    pub fn update_from_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::EntityDamaged { amount, .. } => {
                self.damage_dealt += *amount;
            }
            GameEvent::DamageAbsorbed { absorbed, .. } => {
                self.damage_absorbed += *absorbed;
            }
            GameEvent::EntityHealed { amount, .. } => {
                self.healing_done += *amount;
            }
            GameEvent::EntityDied { .. } => {
                self.deaths += 1;
            }
            GameEvent::AttackMissed { .. } => {
                self.attacks_missed += 1;
            }
            GameEvent::CastCompleted { .. } => {
                self.spells_cast += 1;
            }
            GameEvent::CastCancelled { .. } => {
                self.casts_cancelled += 1;
            }
            GameEvent::ProjectileSpawned { .. } => {
                self.projectiles_fired += 1;
            }
            _ => {}
        }
    }
}

/// World and systems driven as one unit.
pub struct Simulation {
    world: World,
    settings: SimulationSettings,
    statistics: SimulationStatistics,
    combat: CombatSystem,
    ai: AiSystem,
    spells: SpellCastingSystem,
    movement: MovementSystem,
    projectiles: ProjectileSystem,
    status: StatusEffectSystem,
    extra_systems: Vec<Box<dyn System>>,
    pending_events: Vec<GameEvent>,
    tick_count: u64,
}

impl Simulation {
    /// Builds an empty simulation. Settings are validated first.
    ///
    /// # Examples
    ///
    /// ```
    /// use riftbound::*;
    ///
    /// let mut sim = Simulation::new(SimulationSettings::with_seed(7));
    /// let player = prefabs::spawn_player(sim.world_mut(), Position::new(0.0, 0.0));
    /// sim.tick(0.016);
    /// assert!(sim.world().contains(player));
    /// assert_eq!(sim.tick_count(), 1);
    /// ```
    pub fn new(settings: SimulationSettings) -> Self {
        let settings = settings.validated();
        let seed = settings.seed;
        Self {
            world: World::new(),
            combat: CombatSystem::with_settings(
                derive_seed(seed, COMBAT_STREAM),
                settings.combat.clone(),
                settings.genre_id.clone(),
            ),
            ai: AiSystem::with_settings(derive_seed(seed, AI_STREAM), settings.ai.clone()),
            spells: SpellCastingSystem::with_settings(
                derive_seed(seed, SPELL_STREAM),
                settings.spells.clone(),
                settings.chain.clone(),
            ),
            movement: MovementSystem::new(),
            projectiles: ProjectileSystem::new(settings.combat.projectile_hit_radius),
            status: StatusEffectSystem::new(),
            extra_systems: Vec::new(),
            pending_events: Vec::new(),
            statistics: SimulationStatistics::new(),
            tick_count: 0,
            settings,
        }
    }

    /// Default settings with `seed`.
    pub fn from_seed(seed: u64) -> Self {
        Self::new(SimulationSettings::with_seed(seed))
    }

    /// Caps the speed of everything the movement system moves.
    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.movement = MovementSystem::with_max_speed(max_speed);
        self
    }

    /// Registers a system that runs after the built-in ones.
    pub fn add_system(&mut self, system: Box<dyn System>) {
        debug!("Registered system '{}'", system.name());
        self.extra_systems.push(system);
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    pub fn statistics(&self) -> &SimulationStatistics {
        &self.statistics
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Advances everything by `delta_time` seconds and returns the tick's
    /// events. Negative steps are treated as zero.
    pub fn tick(&mut self, delta_time: f32) -> Vec<GameEvent> {
        let dt = delta_time.max(0.0);
        let mut events = mem::take(&mut self.pending_events);

        self.world.update(dt);
        self.ai.update(&mut self.world, dt, &mut self.combat, &mut events);
        self.spells.update(&mut self.world, dt, &mut events);
        self.movement.update(&mut self.world, dt, &mut events);
        self.projectiles.update(&mut self.world, dt, &mut events);
        self.status.update(&mut self.world, dt, &mut events);
        self.combat.update(&mut self.world, dt, &mut events);
        for system in &mut self.extra_systems {
            system.update(&mut self.world, dt, &mut events);
        }

        for event in &events {
            self.statistics.update_from_event(event);
        }
        self.tick_count += 1;
        trace!("Tick {} produced {} events", self.tick_count, events.len());
        events
    }

    /// Direct attack, typically from player input.
    pub fn attack(&mut self, attacker: EntityId, target: EntityId) -> bool {
        self.combat
            .attack(&mut self.world, attacker, target, &mut self.pending_events)
    }

    pub fn start_cast(&mut self, caster: EntityId, slot: usize) -> bool {
        self.spells
            .start_cast(&mut self.world, caster, slot, &mut self.pending_events)
    }

    pub fn cast_from_hotbar(&mut self, caster: EntityId, key: usize) -> bool {
        self.spells
            .cast_from_hotbar(&mut self.world, caster, key, &mut self.pending_events)
    }

    pub fn cancel_cast(&mut self, caster: EntityId) -> bool {
        self.spells
            .cancel_cast(&mut self.world, caster, &mut self.pending_events)
    }

    /// Loads a generated spell book for the configured genre.
    pub fn load_player_spells(&mut self, player: EntityId, seed: u64, depth: u32) -> RiftResult<()> {
        spells::load_player_spells(&mut self.world, player, seed, &self.settings.genre_id, depth)
    }

    /// Serializes the world for inspection or debugging.
    pub fn world_to_json(&self) -> RiftResult<String> {
        Ok(serde_json::to_string_pretty(&self.world)?)
    }
}

/// Independent RNG stream for one system.
fn derive_seed(master: u64, stream: u64) -> u64 {
    master ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Health, Position};
    use crate::prefabs::{spawn_monster, spawn_player, MONSTER_TEAM};

    fn arena(seed: u64) -> (Simulation, EntityId, EntityId) {
        let mut sim = Simulation::from_seed(seed);
        let player = spawn_player(sim.world_mut(), Position::new(0.0, 0.0));
        let monster = spawn_monster(sim.world_mut(), Position::new(60.0, 0.0), MONSTER_TEAM);
        (sim, player, monster)
    }

    #[test]
    fn test_first_tick_commits_spawns() {
        let (mut sim, player, monster) = arena(1);
        assert!(sim.world().is_empty());
        sim.tick(0.0);
        assert!(sim.world().contains(player));
        assert!(sim.world().contains(monster));
    }

    #[test]
    fn test_same_seed_same_events() {
        let (mut a, _, _) = arena(9);
        let (mut b, _, _) = arena(9);
        for _ in 0..300 {
            assert_eq!(a.tick(1.0 / 30.0), b.tick(1.0 / 30.0));
        }
        assert_eq!(a.statistics(), b.statistics());
    }

    #[test]
    fn test_player_actions_reported_next_tick() {
        let (mut sim, player, monster) = arena(3);
        sim.tick(0.0);
        if let Some(position) = sim.world_mut().get_mut::<Position>(monster) {
            *position = Position::new(20.0, 0.0);
        }
        sim.attack(player, monster);
        assert_eq!(sim.tick_count(), 1);

        let events = sim.tick(0.0);
        assert!(events.iter().any(|event| matches!(
            event,
            GameEvent::EntityDamaged { attacker: Some(a), .. } if *a == player
        ) || matches!(
            event,
            GameEvent::AttackMissed { attacker, .. } if *attacker == player
        )));
    }

    #[test]
    fn test_statistics_count_deaths_once() {
        let (mut sim, _, monster) = arena(5);
        sim.tick(0.0);
        if let Some(health) = sim.world_mut().get_mut::<Health>(monster) {
            health.current = 0.0;
        }
        sim.tick(0.1);
        sim.tick(0.1);
        assert_eq!(sim.statistics().deaths, 1);
    }

    #[test]
    fn test_negative_delta_is_ignored() {
        let (mut sim, _, _) = arena(2);
        sim.tick(0.0);
        sim.tick(-5.0);
        assert_eq!(sim.world().elapsed(), 0.0);
    }

    #[test]
    fn test_extra_systems_run_last() {
        struct Counter;
        impl System for Counter {
            fn name(&self) -> &'static str {
                "counter"
            }
            fn update(&mut self, _world: &mut World, _dt: f32, events: &mut Vec<GameEvent>) {
                events.push(GameEvent::ScreenShake { intensity: 0.0 });
            }
        }

        let mut sim = Simulation::from_seed(1);
        sim.add_system(Box::new(Counter));
        let events = sim.tick(0.1);
        assert_eq!(events.last(), Some(&GameEvent::ScreenShake { intensity: 0.0 }));
    }
}
