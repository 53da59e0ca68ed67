//! ID types for items, species, plant instances, and containers.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for plant instance IDs.
static PLANT_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for an item definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(u32);

impl ItemId {
    /// Creates an item ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Unique identifier for a plant species definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpeciesId(u32);

impl SpeciesId {
    /// Creates a species ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Unique identifier for a live plant instance in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlantId(u64);

impl PlantId {
    /// Creates a new unique plant instance ID.
    #[must_use]
    pub fn new() -> Self {
        Self(PLANT_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Creates a plant ID from a raw value (for deserialization).
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Null/invalid plant ID.
    pub const NULL: Self = Self(0);

    /// Checks if this is a valid (non-null) plant ID.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl Default for PlantId {
    fn default() -> Self {
        Self::new()
    }
}

/// The two logical item containers a player owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerKind {
    /// General inventory (larger capacity).
    Inventory,
    /// Quick-access hotbar (smaller capacity, has an active slot).
    Hotbar,
}

/// Addresses a single slot within a specific container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotRef {
    /// Which container the slot belongs to.
    pub container: ContainerKind,
    /// Slot index within the container.
    pub index: usize,
}

impl SlotRef {
    /// Creates a new slot reference.
    #[must_use]
    pub const fn new(container: ContainerKind, index: usize) -> Self {
        Self { container, index }
    }

    /// Shorthand for an inventory slot.
    #[must_use]
    pub const fn inventory(index: usize) -> Self {
        Self::new(ContainerKind::Inventory, index)
    }

    /// Shorthand for a hotbar slot.
    #[must_use]
    pub const fn hotbar(index: usize) -> Self {
        Self::new(ContainerKind::Hotbar, index)
    }
}
