//! # Riftbound Arena Entry Point
//!
//! Runs a headless arena: one player with a generated spell book against a
//! ring of monsters, stepped at a fixed rate until one side falls or the tick
//! budget runs out. Statistics are printed as JSON at the end.

use clap::Parser;
use riftbound::prefabs::{spawn_archer, spawn_monster, spawn_player, MONSTER_TEAM};
use riftbound::{
    config, dispatch_feedback, AiComponent, Attack, Entity, EntityId, FeedbackSink, GameEvent,
    Health, Position, RiftResult, Simulation, SimulationSettings, SpellSlots, Team,
};
use std::f32::consts::TAU;
use std::path::PathBuf;
#[cfg(feature = "dev-tools")]
use tracing::{debug, info, warn, Level};

#[cfg(not(feature = "dev-tools"))]
use log::{debug, info, warn};

/// Command line arguments for the arena demo.
#[derive(Parser, Debug)]
#[command(name = "riftbound")]
#[command(about = "Headless action-RPG arena driven by the Riftbound simulation core")]
#[command(version)]
struct Args {
    /// Master random seed; overrides the settings file
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON settings file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Genre for spell names and particle effects
    #[arg(short, long)]
    genre: Option<String>,

    /// Dungeon depth used to scale the player's spells
    #[arg(short, long, default_value_t = 1)]
    depth: u32,

    /// Number of monsters in the arena
    #[arg(short, long, default_value_t = 4)]
    enemies: u32,

    /// Maximum number of ticks to run
    #[arg(short, long, default_value_t = 3600)]
    ticks: u64,

    /// Seconds per tick
    #[arg(long, default_value_t = config::DEFAULT_TICK_SECONDS)]
    dt: f32,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> RiftResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level);

    info!("Starting Riftbound arena v{}", riftbound::VERSION);

    let mut settings = match &args.settings {
        Some(path) => SimulationSettings::load(path)?,
        None => SimulationSettings::default(),
    };
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    if let Some(genre) = &args.genre {
        settings.genre_id = genre.clone();
    }
    let seed = settings.seed;

    let mut sim = Simulation::new(settings);
    let player = spawn_player(sim.world_mut(), Position::new(0.0, 0.0));
    sim.load_player_spells(player, seed, args.depth)?;
    spawn_enemies(&mut sim, args.enemies);

    info!(
        "Arena seeded with {}: player {} against {} monsters",
        seed, player, args.enemies
    );

    let mut feedback = ConsoleFeedback::default();
    for _ in 0..args.ticks {
        let events = sim.tick(args.dt);
        report(&events, player);
        dispatch_feedback(&events, &mut feedback);

        if sim.world().entity(player).map_or(true, Entity::is_dead) {
            warn!("Player fell after {} ticks", sim.tick_count());
            break;
        }
        if living_monsters(&sim) == 0 && sim.tick_count() > 1 {
            info!("Arena cleared after {} ticks", sim.tick_count());
            break;
        }
        drive_player(&mut sim, player);
    }

    info!(
        "Feedback: {} spark bursts, peak shake {:.2}, peak flash {:.2}",
        feedback.sparks, feedback.peak_shake, feedback.peak_flash
    );
    println!("{}", serde_json::to_string_pretty(sim.statistics())?);
    Ok(())
}

/// Initializes logging at the requested level.
fn initialize_logging(log_level: &str) {
    #[cfg(feature = "dev-tools")]
    {
        let level = match log_level.to_lowercase().as_str() {
            "error" => Level::ERROR,
            "warn" => Level::WARN,
            "info" => Level::INFO,
            "debug" => Level::DEBUG,
            "trace" => Level::TRACE,
            _ => Level::INFO,
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .init();
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
            .format_target(false)
            .init();
    }
}

/// Places monsters evenly on a ring around the player, alternating melee and
/// ranged.
fn spawn_enemies(sim: &mut Simulation, count: u32) {
    let radius = 180.0;
    for index in 0..count {
        let angle = TAU * index as f32 / count.max(1) as f32;
        let position = Position::new(radius * angle.cos(), radius * angle.sin());
        if index % 2 == 0 {
            spawn_monster(sim.world_mut(), position, MONSTER_TEAM);
        } else {
            spawn_archer(sim.world_mut(), position, MONSTER_TEAM);
        }
    }
}

fn living_monsters(sim: &Simulation) -> usize {
    sim.world()
        .iter()
        .filter(|entity| entity.has::<AiComponent>() && !entity.is_dead())
        .count()
}

/// Simple autopilot: heal when hurt, otherwise cast whatever is ready and
/// swing at the nearest enemy in reach.
fn drive_player(sim: &mut Simulation, player: EntityId) {
    let Some(entity) = sim.world().entity(player) else {
        return;
    };
    let Some(position) = entity.position() else {
        return;
    };
    let team = entity.team();
    let injured = entity
        .get::<Health>()
        .map_or(false, |health| health.fraction() < 0.5);
    let reach = entity.get::<Attack>().map_or(0.0, |attack| attack.range);
    let casting = entity.get::<SpellSlots>().map_or(true, SpellSlots::is_casting);

    let is_enemy = |candidate: &Entity| {
        !candidate.is_dead() && Team::are_enemies(team.as_ref(), candidate.get::<Team>())
    };
    let target = sim.world().nearest_where(position, reach, &is_enemy);
    let enemy_near = sim.world().nearest_where(position, 240.0, &is_enemy).is_some();

    if !casting {
        let order: &[usize] = if injured { &[1, 2] } else { &[0, 3, 4, 2] };
        for &slot in order {
            if (enemy_near || slot == 1) && sim.start_cast(player, slot) {
                break;
            }
        }
    }
    if let Some(target) = target {
        sim.attack(player, target);
    }
}

fn report(events: &[GameEvent], player: EntityId) {
    for event in events {
        match event {
            GameEvent::EntityDied { entity } if *entity != player => {
                info!("{} was slain", entity);
            }
            GameEvent::CastCompleted { caster, spell, targets, .. } if *caster == player => {
                info!("Player cast {} on {} target(s)", spell, targets.len());
            }
            _ => {}
        }
    }
}

/// Headless stand-in for a renderer: logs feedback and keeps peaks.
#[derive(Debug, Default)]
struct ConsoleFeedback {
    sparks: u64,
    peak_shake: f32,
    peak_flash: f32,
}

impl FeedbackSink for ConsoleFeedback {
    fn spawn_hit_sparks(&mut self, x: f32, y: f32, seed: u64, genre_id: &str) {
        self.sparks += 1;
        debug!("{} sparks at ({:.1}, {:.1}) seed {}", genre_id, x, y, seed);
    }

    fn shake(&mut self, intensity: f32) {
        self.peak_shake = self.peak_shake.max(intensity);
    }

    fn trigger_flash(&mut self, intensity: f32) {
        self.peak_flash = self.peak_flash.max(intensity);
    }
}
