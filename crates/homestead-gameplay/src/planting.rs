//! Seed placement checks.
//!
//! Placement is validated against an external surface query and the set of
//! live plants before anything mutates. The simulation context owns the
//! actual state changes; this module only decides whether a spot is legal.

use crate::items::{SeedData, SurfaceKind};
use crate::plants::PlantInstance;
use homestead_common::{ItemId, SpeciesId, Vec2};
use thiserror::Error;

/// Errors from seed placement validation.
#[derive(Debug, Error, PartialEq)]
pub enum PlacementError {
    /// Surface at the target is not plantable for this seed
    #[error("Cannot plant on {found:?}")]
    InvalidSurface {
        /// Surface found at the target
        found: SurfaceKind,
    },
    /// Another plant is within the minimum spacing
    #[error("Too close to another plant: {distance:.2} < {min:.2}")]
    TooClose {
        /// Distance to the nearest plant
        distance: f32,
        /// Required minimum spacing
        min: f32,
    },
    /// Item has no seed data
    #[error("Item {0:?} is not a seed")]
    NotASeed(ItemId),
    /// Seed references a species missing from the registry
    #[error("Unknown species {0:?}")]
    UnknownSpecies(SpeciesId),
}

/// Result type for placement checks.
pub type PlacementResult<T> = Result<T, PlacementError>;

/// External world collaborator answering surface lookups.
pub trait SurfaceQuery {
    /// Returns the surface type at a world position.
    fn surface_at(&self, position: Vec2) -> SurfaceKind;
}

/// Validates a placement: surface must be accepted by the seed and no live
/// plant may sit within the seed's minimum spacing.
pub fn check_placement<S: SurfaceQuery>(
    seed: &SeedData,
    position: Vec2,
    surfaces: &S,
    plants: &[PlantInstance],
) -> PlacementResult<()> {
    let found = surfaces.surface_at(position);
    if !seed.accepts_surface(found) {
        return Err(PlacementError::InvalidSurface { found });
    }

    let mut nearest: Option<f32> = None;
    for plant in plants {
        let distance = plant.position.distance(position);
        if distance < seed.min_spacing {
            nearest = Some(nearest.map_or(distance, |d: f32| d.min(distance)));
        }
    }
    if let Some(distance) = nearest {
        return Err(PlacementError::TooClose {
            distance,
            min: seed.min_spacing,
        });
    }

    Ok(())
}

/// Surface query test double backed by a position map.
#[derive(Debug)]
pub struct MockSurface {
    /// Override surfaces keyed by rounded position
    surfaces: std::collections::HashMap<(i64, i64), SurfaceKind>,
    /// Surface for positions not in the map
    default_surface: SurfaceKind,
}

impl Default for MockSurface {
    fn default() -> Self {
        Self {
            surfaces: std::collections::HashMap::new(),
            default_surface: SurfaceKind::Soil,
        }
    }
}

impl MockSurface {
    /// Creates a mock whose every position is soil.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn key(position: Vec2) -> (i64, i64) {
        (position.x.floor() as i64, position.y.floor() as i64)
    }

    /// Sets the surface at a position.
    pub fn set_surface(&mut self, position: Vec2, surface: SurfaceKind) {
        self.surfaces.insert(Self::key(position), surface);
    }

    /// Sets the default surface.
    pub fn set_default(&mut self, surface: SurfaceKind) {
        self.default_surface = surface;
    }
}

impl SurfaceQuery for MockSurface {
    fn surface_at(&self, position: Vec2) -> SurfaceKind {
        self.surfaces
            .get(&Self::key(position))
            .copied()
            .unwrap_or(self.default_surface)
    }
}
