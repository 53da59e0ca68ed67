//! # Homestead Gameplay
//!
//! Core gameplay systems for Homestead.
//!
//! This crate provides the engine-agnostic simulation layer:
//! - Item definitions and registries
//! - Slot-based containers (inventory and hotbar)
//! - Plant species and the growth state machine
//! - Seed placement checks
//! - The tick-driven simulation context
//! - Interaction capability for world objects
//! - Event bus for change notification
//! - Save/load of simulation state

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod events;
pub mod hotbar;
pub mod interact;
pub mod inventory;
pub mod items;
pub mod planting;
pub mod plants;
pub mod save;
pub mod sim;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::events::*;
    pub use crate::hotbar::*;
    pub use crate::interact::*;
    pub use crate::inventory::*;
    pub use crate::items::*;
    pub use crate::planting::*;
    pub use crate::plants::*;
    pub use crate::save::*;
    pub use crate::sim::*;
}

pub use prelude::*;
