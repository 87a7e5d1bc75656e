//! # Generation Module
//!
//! Procedural content generation contract and the generators the simulation
//! consumes.
//!
//! Every generator is deterministic: the same [`GenerationParams`] (seed
//! included) always yields the same content. Callers go through
//! [`generate_seeded`], which seeds the RNG from the params, runs the
//! generator and validates its output before handing it back.

pub mod spellbook;

pub use spellbook::*;

use crate::{RiftError, RiftResult};
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Content themes. Drives naming and flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Fantasy,
    SciFi,
    Horror,
    Cyberpunk,
    PostApocalyptic,
}

impl Genre {
    /// Parses a genre ID such as `"fantasy"` or `"scifi"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use riftbound::Genre;
    ///
    /// assert_eq!(Genre::from_id("fantasy").unwrap(), Genre::Fantasy);
    /// assert_eq!(Genre::from_id("Sci-Fi").unwrap(), Genre::SciFi);
    /// assert!(Genre::from_id("western").is_err());
    /// ```
    pub fn from_id(id: &str) -> RiftResult<Self> {
        let normalized: String = id
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "fantasy" => Ok(Genre::Fantasy),
            "scifi" => Ok(Genre::SciFi),
            "horror" => Ok(Genre::Horror),
            "cyberpunk" => Ok(Genre::Cyberpunk),
            "postapoc" | "postapocalyptic" => Ok(Genre::PostApocalyptic),
            _ => Err(RiftError::GenerationFailed(format!("unknown genre '{}'", id))),
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Genre::Fantasy => "fantasy",
            Genre::SciFi => "scifi",
            Genre::Horror => "horror",
            Genre::Cyberpunk => "cyberpunk",
            Genre::PostApocalyptic => "postapoc",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Input to every generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Genre ID, parsed with [`Genre::from_id`]
    pub genre_id: String,
    /// Dungeon depth, starting at 1
    pub depth: u32,
    /// Scales generated power; 1.0 is normal
    pub difficulty: f32,
}

impl GenerationParams {
    /// Fantasy, depth 1, normal difficulty.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            genre_id: crate::config::DEFAULT_GENRE.to_string(),
            depth: 1,
            difficulty: 1.0,
        }
    }

    pub fn with_genre(mut self, genre_id: impl Into<String>) -> Self {
        self.genre_id = genre_id.into();
        self
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_difficulty(mut self, difficulty: f32) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn genre(&self) -> RiftResult<Genre> {
        Genre::from_id(&self.genre_id)
    }

    /// Rejects params no generator can work with and returns the parsed genre.
    pub fn check(&self) -> RiftResult<Genre> {
        if self.depth == 0 {
            return Err(RiftError::GenerationFailed(
                "depth must be at least 1".to_string(),
            ));
        }
        if !self.difficulty.is_finite() || self.difficulty <= 0.0 {
            return Err(RiftError::GenerationFailed(format!(
                "difficulty must be positive, got {}",
                self.difficulty
            )));
        }
        self.genre()
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content from `params`, drawing randomness only from `rng`.
    fn generate(&self, params: &GenerationParams, rng: &mut StdRng) -> RiftResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, params: &GenerationParams) -> RiftResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Seeds an RNG from `params.seed`, generates and validates.
pub fn generate_seeded<T, G>(generator: &G, params: &GenerationParams) -> RiftResult<T>
where
    G: Generator<T> + ?Sized,
{
    let mut rng = StdRng::seed_from_u64(params.seed);
    let content = generator.generate(params, &mut rng)?;
    generator.validate(&content, params)?;
    debug!(
        "{} generated content for seed {} ({}, depth {})",
        generator.generator_type(),
        params.seed,
        params.genre_id,
        params.depth
    );
    Ok(content)
}
