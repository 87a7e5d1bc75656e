//! Behavior machine scenarios driven through the AI, movement and combat
//! systems together.

use riftbound::{
    AiComponent, AiState, AiSystem, CombatSystem, EntityId, GameEvent, Health, MovementSystem,
    Position, System, Team, Velocity, World,
};

struct Harness {
    world: World,
    ai: AiSystem,
    combat: CombatSystem,
    movement: MovementSystem,
    transitions: Vec<(AiState, AiState)>,
}

impl Harness {
    fn new() -> Self {
        Self {
            world: World::new(),
            ai: AiSystem::new(11),
            combat: CombatSystem::new(11),
            movement: MovementSystem::new(),
            transitions: Vec::new(),
        }
    }

    fn step(&mut self, dt: f32) {
        let mut events = Vec::new();
        self.world.update(dt);
        self.ai.update(&mut self.world, dt, &mut self.combat, &mut events);
        self.movement.update(&mut self.world, dt, &mut events);
        self.combat.update(&mut self.world, dt, &mut events);
        for event in events {
            if let GameEvent::AiStateChanged { from, to, .. } = event {
                self.transitions.push((from, to));
            }
        }
    }

    fn ai(&self, id: EntityId) -> AiComponent {
        self.world
            .get::<AiComponent>(id)
            .cloned()
            .unwrap_or_else(|| AiComponent::new(Position::new(f32::NAN, f32::NAN)))
    }

    fn run_until(&mut self, id: EntityId, max_steps: usize, done: impl Fn(&AiComponent) -> bool) -> bool {
        for _ in 0..max_steps {
            self.step(0.1);
            if done(&self.ai(id)) {
                return true;
            }
        }
        false
    }
}

fn guard(world: &mut World, health: Health) -> EntityId {
    let spawn = Position::new(0.0, 0.0);
    world
        .create_entity()
        .with(spawn)
        .with(Velocity::zero())
        .with(health)
        .with(Team::new(2))
        .with(AiComponent::new(spawn))
        .id()
}

fn intruder(world: &mut World, x: f32, team: u32) -> EntityId {
    world
        .create_entity()
        .with(Position::new(x, 0.0))
        .with(Health::new(100.0))
        .with(Team::new(team))
        .id()
}

#[test]
fn test_vanished_target_sends_ai_home() {
    let mut h = Harness::new();
    let guard = guard(&mut h.world, Health::new(100.0));
    let player = intruder(&mut h.world, 60.0, 1);

    assert!(h.run_until(guard, 50, |ai| ai.state.uses_target() && ai.state != AiState::Detect));
    assert_eq!(h.ai(guard).target, Some(player));
    assert!(h.transitions.contains(&(AiState::Idle, AiState::Detect)));
    assert!(h.transitions.contains(&(AiState::Detect, AiState::Chase)));

    h.world.remove_entity(player);
    assert!(h.run_until(guard, 20, |ai| ai.state == AiState::Return));
    assert_eq!(h.ai(guard).target, None);

    assert!(h.run_until(guard, 200, |ai| ai.state == AiState::Idle));
    let position = h.world.get::<Position>(guard).copied().unwrap_or_default();
    assert!(position.distance(Position::new(0.0, 0.0)) <= 8.0);
}

#[test]
fn test_wounded_ai_flees() {
    let mut h = Harness::new();
    let guard = guard(&mut h.world, Health::with_current(10.0, 100.0));
    intruder(&mut h.world, 100.0, 1);

    assert!(h.run_until(guard, 50, |ai| ai.state == AiState::Flee));
    assert_eq!(h.ai(guard).target, None);
}

#[test]
fn test_neutrals_are_ignored() {
    let mut h = Harness::new();
    let guard = guard(&mut h.world, Health::new(100.0));
    intruder(&mut h.world, 20.0, 0);

    assert!(!h.run_until(guard, 30, |ai| ai.state != AiState::Idle));
    assert!(h.transitions.is_empty());
}

#[test]
fn test_dead_ai_stands_still() {
    let mut h = Harness::new();
    let guard = guard(&mut h.world, Health::new(100.0));
    intruder(&mut h.world, 60.0, 1);
    assert!(h.run_until(guard, 50, |ai| ai.state == AiState::Chase));

    if let Some(health) = h.world.get_mut::<Health>(guard) {
        health.current = 0.0;
    }
    let before = h.world.get::<Position>(guard).copied().unwrap_or_default();
    for _ in 0..5 {
        h.step(0.1);
    }
    assert_eq!(h.world.get::<Position>(guard).copied(), Some(before));
    assert_eq!(h.world.get::<Velocity>(guard).copied(), Some(Velocity::zero()));
}
