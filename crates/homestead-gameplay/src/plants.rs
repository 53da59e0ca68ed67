//! Plant species definitions and the growth state machine.
//!
//! A plant instance moves through its species' growth stages one transition
//! per tick, becomes fully grown after the final stage's duration elapses,
//! and can be harvested exactly once.

use ahash::AHashMap;
use homestead_common::{ItemId, PlantId, SpeciesId, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// One stage of a species' growth sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthStage {
    /// Time spent in this stage before advancing (seconds).
    pub duration: f32,
}

impl GrowthStage {
    /// Creates a stage with the given duration.
    #[must_use]
    pub const fn new(duration: f32) -> Self {
        Self { duration }
    }
}

/// Immutable definition of a plant species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantSpecies {
    /// Runtime identity.
    pub id: SpeciesId,
    /// Stable string key used by save files and content references.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Ordered growth stages (at least one).
    pub stages: Vec<GrowthStage>,
    /// Item produced on harvest.
    pub yield_item: ItemId,
    /// Units produced on harvest (at least one).
    pub yield_quantity: u32,
}

impl PlantSpecies {
    /// Creates a new species builder.
    #[must_use]
    pub fn builder(id: SpeciesId, key: &str, name: &str) -> PlantSpeciesBuilder {
        PlantSpeciesBuilder::new(id, key, name)
    }

    /// Total time from planting to fully grown (seconds).
    #[must_use]
    pub fn total_growth_time(&self) -> f32 {
        self.stages.iter().map(|s| s.duration).sum()
    }

    /// Number of growth stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}

/// Builder for plant species.
#[derive(Debug)]
pub struct PlantSpeciesBuilder {
    species: PlantSpecies,
}

impl PlantSpeciesBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(id: SpeciesId, key: &str, name: &str) -> Self {
        Self {
            species: PlantSpecies {
                id,
                key: key.to_string(),
                name: name.to_string(),
                stages: Vec::new(),
                yield_item: ItemId::new(0),
                yield_quantity: 1,
            },
        }
    }

    /// Appends a growth stage.
    #[must_use]
    pub fn stage(mut self, duration: f32) -> Self {
        self.species.stages.push(GrowthStage::new(duration));
        self
    }

    /// Sets stage durations from a slice.
    #[must_use]
    pub fn stages(mut self, durations: &[f32]) -> Self {
        self.species.stages = durations.iter().copied().map(GrowthStage::new).collect();
        self
    }

    /// Sets the harvest yield.
    #[must_use]
    pub fn yields(mut self, item: ItemId, quantity: u32) -> Self {
        self.species.yield_item = item;
        self.species.yield_quantity = quantity;
        self
    }

    /// Builds the species definition.
    #[must_use]
    pub fn build(self) -> PlantSpecies {
        self.species
    }
}

/// Species validation errors.
#[derive(Debug, Error)]
pub enum SpeciesError {
    /// A species must have at least one growth stage
    #[error("Species '{0}' has no growth stages")]
    NoStages(String),
    /// Stage durations must be positive
    #[error("Species '{key}' stage {stage} has non-positive duration {duration}")]
    NonPositiveStageDuration {
        /// Species key
        key: String,
        /// Offending stage index
        stage: usize,
        /// Offending duration
        duration: f32,
    },
    /// Harvest yield must be at least one unit
    #[error("Species '{0}' has zero yield quantity")]
    ZeroYield(String),
    /// Duplicate runtime ID
    #[error("Duplicate species id {0:?}")]
    DuplicateId(SpeciesId),
    /// Duplicate string key
    #[error("Duplicate species key '{0}'")]
    DuplicateKey(String),
    /// RON parse failure
    #[error("Species data parse error: {0}")]
    Parse(String),
}

/// Result type for species operations.
pub type SpeciesResult<T> = Result<T, SpeciesError>;

/// Registry of plant species, keyed by runtime ID and string key.
#[derive(Debug, Default)]
pub struct SpeciesRegistry {
    species: AHashMap<SpeciesId, PlantSpecies>,
    by_key: AHashMap<String, SpeciesId>,
}

impl SpeciesRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a species after validating its stages and yield.
    pub fn register(&mut self, species: PlantSpecies) -> SpeciesResult<()> {
        if species.stages.is_empty() {
            return Err(SpeciesError::NoStages(species.key));
        }
        for (stage, s) in species.stages.iter().enumerate() {
            if s.duration <= 0.0 {
                return Err(SpeciesError::NonPositiveStageDuration {
                    key: species.key.clone(),
                    stage,
                    duration: s.duration,
                });
            }
        }
        if species.yield_quantity == 0 {
            return Err(SpeciesError::ZeroYield(species.key));
        }
        if self.species.contains_key(&species.id) {
            return Err(SpeciesError::DuplicateId(species.id));
        }
        if self.by_key.contains_key(&species.key) {
            return Err(SpeciesError::DuplicateKey(species.key));
        }

        self.by_key.insert(species.key.clone(), species.id);
        self.species.insert(species.id, species);
        Ok(())
    }

    /// Looks up a species by runtime ID.
    #[must_use]
    pub fn get(&self, id: SpeciesId) -> Option<&PlantSpecies> {
        self.species.get(&id)
    }

    /// Looks up a species by stable string key.
    #[must_use]
    pub fn by_key(&self, key: &str) -> Option<&PlantSpecies> {
        self.by_key.get(key).and_then(|id| self.species.get(id))
    }

    /// Returns the number of registered species.
    #[must_use]
    pub fn len(&self) -> usize {
        self.species.len()
    }

    /// Checks if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// Iterates over all species.
    pub fn iter(&self) -> impl Iterator<Item = &PlantSpecies> {
        self.species.values()
    }

    /// Builds a registry from a RON list of species.
    pub fn from_ron_str(text: &str) -> SpeciesResult<Self> {
        let species: Vec<PlantSpecies> =
            ron::from_str(text).map_err(|e| SpeciesError::Parse(e.to_string()))?;
        let mut registry = Self::new();
        for s in species {
            registry.register(s)?;
        }
        Ok(registry)
    }
}

/// Outcome of a single growth tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlantTick {
    /// Advanced to the given stage index.
    StageAdvanced(usize),
    /// Finished the final stage and became fully grown.
    FullyGrown,
}

/// A live plant instance in the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantInstance {
    /// Instance identity.
    pub id: PlantId,
    /// Species this instance belongs to.
    pub species: SpeciesId,
    /// World position.
    pub position: Vec2,
    /// Current stage index into the species' stage list.
    pub stage_index: usize,
    /// Time elapsed in the current stage (seconds).
    pub elapsed: f32,
    /// Whether growth has completed.
    pub fully_grown: bool,
    /// Whether the harvest latch has fired.
    pub harvested: bool,
}

impl PlantInstance {
    /// Creates a freshly planted instance at stage 0.
    #[must_use]
    pub fn new(species: SpeciesId, position: Vec2) -> Self {
        Self {
            id: PlantId::new(),
            species,
            position,
            stage_index: 0,
            elapsed: 0.0,
            fully_grown: false,
            harvested: false,
        }
    }

    /// Advances growth by `dt` seconds.
    ///
    /// At most one transition happens per call: either a stage advance or
    /// the final transition to fully grown. Elapsed time resets to zero on a
    /// stage advance and stops accumulating once fully grown.
    pub fn tick(&mut self, dt: f32, species: &PlantSpecies) -> Option<PlantTick> {
        if self.fully_grown || self.harvested {
            return None;
        }

        let stage = species.stages.get(self.stage_index)?;
        self.elapsed += dt;
        if self.elapsed < stage.duration {
            return None;
        }

        if self.stage_index + 1 < species.stages.len() {
            self.stage_index += 1;
            self.elapsed = 0.0;
            debug!(plant = self.id.raw(), stage = self.stage_index, "plant advanced stage");
            Some(PlantTick::StageAdvanced(self.stage_index))
        } else {
            self.fully_grown = true;
            self.elapsed = stage.duration;
            debug!(plant = self.id.raw(), "plant fully grown");
            Some(PlantTick::FullyGrown)
        }
    }

    /// Checks whether this instance can be harvested right now.
    #[must_use]
    pub fn can_harvest(&self) -> bool {
        self.fully_grown && !self.harvested
    }

    /// Overall growth progress in `[0, 1]` across all stage durations.
    #[must_use]
    pub fn growth_progress(&self, species: &PlantSpecies) -> f32 {
        if self.fully_grown {
            return 1.0;
        }
        let total = species.total_growth_time();
        if total <= 0.0 {
            return 1.0;
        }
        let completed: f32 = species
            .stages
            .iter()
            .take(self.stage_index)
            .map(|s| s.duration)
            .sum();
        ((completed + self.elapsed) / total).clamp(0.0, 1.0)
    }

    /// Fires the one-shot harvest latch.
    pub fn mark_harvested(&mut self) {
        self.harvested = true;
    }
}
