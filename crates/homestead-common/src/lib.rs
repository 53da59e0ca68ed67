//! # Homestead Common
//!
//! Common types and shared abstractions for Homestead.
//!
//! This crate provides the foundational types used across all Homestead
//! subsystems:
//! - ID types (`ItemId`, `SpeciesId`, `PlantId`, container addressing)
//! - The `Vec2` world-position type
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::ids::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plant_id_generation() {
        let id1 = PlantId::new();
        let id2 = PlantId::new();
        assert_ne!(id1, id2);
        assert!(id1.is_valid());
    }

    #[test]
    fn test_vec2_distance() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < f32::EPSILON);
    }
}
