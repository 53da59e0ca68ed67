//! Item definitions and the item registry.
//!
//! Definitions are created at content-load time (code or RON text) and are
//! immutable afterwards. Runtime state never lives here; containers track
//! `(ItemId, quantity)` pairs and look definitions up through the registry.

use ahash::AHashMap;
use homestead_common::{ItemId, SpeciesId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad category tag used for use-dispatch and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ItemCategory {
    /// Anything without special behavior.
    #[default]
    Misc,
    /// Tools (axes, hoes, watering cans).
    Tool,
    /// Weapons.
    Weapon,
    /// Consumed on use (food, potions).
    Consumable,
    /// Crafting materials.
    Material,
    /// Wearable or wieldable equipment.
    Equipment,
    /// Plantable seeds.
    Seed,
}

/// Surface types a seed can be planted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceKind {
    /// Untilled soil.
    Soil,
    /// Tilled farmland.
    TilledSoil,
    /// Grass-covered ground.
    Grass,
    /// Sand.
    Sand,
    /// Bare stone.
    Stone,
    /// Water.
    Water,
    /// Game-defined surface.
    Custom(u32),
}

/// Seed-specific data attached to plantable items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedData {
    /// Species this seed grows into.
    pub species: SpeciesId,
    /// Minimum distance to any existing plant (world units).
    pub min_spacing: f32,
    /// Surfaces this seed may be planted on.
    pub valid_surfaces: Vec<SurfaceKind>,
}

impl SeedData {
    /// Creates new seed data.
    #[must_use]
    pub fn new(species: SpeciesId, min_spacing: f32, valid_surfaces: Vec<SurfaceKind>) -> Self {
        Self {
            species,
            min_spacing,
            valid_surfaces,
        }
    }

    /// Checks whether a surface is valid for this seed.
    #[must_use]
    pub fn accepts_surface(&self, surface: SurfaceKind) -> bool {
        self.valid_surfaces.contains(&surface)
    }
}

/// Immutable definition of an item type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    /// Runtime identity.
    pub id: ItemId,
    /// Stable string key used by save files and content references.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Whether multiple units share one slot.
    pub stackable: bool,
    /// Maximum units per slot (1 when unstackable).
    pub max_stack: u32,
    /// Category tag.
    pub category: ItemCategory,
    /// Whether using removes one unit.
    pub consumable: bool,
    /// Whether the item can be equipped.
    pub equippable: bool,
    /// Seed data, present only for plantable items.
    pub seed: Option<SeedData>,
}

impl ItemDefinition {
    /// Creates a new definition builder.
    #[must_use]
    pub fn builder(id: ItemId, key: &str, name: &str) -> ItemDefinitionBuilder {
        ItemDefinitionBuilder::new(id, key, name)
    }

    /// Returns the effective stack limit (always at least 1).
    #[must_use]
    pub fn stack_limit(&self) -> u32 {
        if self.stackable {
            self.max_stack.max(1)
        } else {
            1
        }
    }

    /// Checks whether this item is a seed.
    #[must_use]
    pub fn is_seed(&self) -> bool {
        self.seed.is_some()
    }
}

/// Builder for item definitions.
#[derive(Debug)]
pub struct ItemDefinitionBuilder {
    def: ItemDefinition,
}

impl ItemDefinitionBuilder {
    /// Creates a new builder with sensible defaults.
    #[must_use]
    pub fn new(id: ItemId, key: &str, name: &str) -> Self {
        Self {
            def: ItemDefinition {
                id,
                key: key.to_string(),
                name: name.to_string(),
                stackable: true,
                max_stack: 99,
                category: ItemCategory::Misc,
                consumable: false,
                equippable: false,
                seed: None,
            },
        }
    }

    /// Sets stacking behavior.
    #[must_use]
    pub fn stackable(mut self, stackable: bool, max_stack: u32) -> Self {
        self.def.stackable = stackable;
        self.def.max_stack = max_stack;
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn category(mut self, category: ItemCategory) -> Self {
        self.def.category = category;
        self
    }

    /// Marks the item consumable.
    #[must_use]
    pub fn consumable(mut self, consumable: bool) -> Self {
        self.def.consumable = consumable;
        self
    }

    /// Marks the item equippable.
    #[must_use]
    pub fn equippable(mut self, equippable: bool) -> Self {
        self.def.equippable = equippable;
        self
    }

    /// Attaches seed data (also forces the seed category on build).
    #[must_use]
    pub fn seed(mut self, data: SeedData) -> Self {
        self.def.seed = Some(data);
        self
    }

    /// Builds the definition.
    #[must_use]
    pub fn build(self) -> ItemDefinition {
        self.def
    }
}

/// Errors from registry construction.
#[derive(Debug, Error)]
pub enum ItemRegistryError {
    /// Duplicate runtime ID
    #[error("Duplicate item id {0:?}")]
    DuplicateId(ItemId),
    /// Duplicate string key
    #[error("Duplicate item key '{0}'")]
    DuplicateKey(String),
    /// RON parse failure
    #[error("Item data parse error: {0}")]
    Parse(String),
}

/// Result type for registry operations.
pub type ItemRegistryResult<T> = Result<T, ItemRegistryError>;

/// Registry of item definitions, keyed by runtime ID and string key.
#[derive(Debug, Default)]
pub struct ItemRegistry {
    definitions: AHashMap<ItemId, ItemDefinition>,
    by_key: AHashMap<String, ItemId>,
}

impl ItemRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a definition.
    ///
    /// Seed items are normalized on insert: they always carry the `Seed`
    /// category and are always consumable. Unstackable items always have a
    /// stack limit of 1.
    pub fn register(&mut self, mut definition: ItemDefinition) -> ItemRegistryResult<()> {
        if self.definitions.contains_key(&definition.id) {
            return Err(ItemRegistryError::DuplicateId(definition.id));
        }
        if self.by_key.contains_key(&definition.key) {
            return Err(ItemRegistryError::DuplicateKey(definition.key));
        }

        if definition.seed.is_some() {
            definition.category = ItemCategory::Seed;
            definition.consumable = true;
        }
        if !definition.stackable {
            definition.max_stack = 1;
        } else if definition.max_stack == 0 {
            definition.max_stack = 1;
        }

        self.by_key.insert(definition.key.clone(), definition.id);
        self.definitions.insert(definition.id, definition);
        Ok(())
    }

    /// Looks up a definition by runtime ID.
    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&ItemDefinition> {
        self.definitions.get(&id)
    }

    /// Looks up a definition by stable string key.
    #[must_use]
    pub fn by_key(&self, key: &str) -> Option<&ItemDefinition> {
        self.by_key.get(key).and_then(|id| self.definitions.get(id))
    }

    /// Returns the number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Checks if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Iterates over all definitions.
    pub fn iter(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.definitions.values()
    }

    /// Builds a registry from a RON list of definitions.
    pub fn from_ron_str(text: &str) -> ItemRegistryResult<Self> {
        let defs: Vec<ItemDefinition> =
            ron::from_str(text).map_err(|e| ItemRegistryError::Parse(e.to_string()))?;
        let mut registry = Self::new();
        for def in defs {
            registry.register(def)?;
        }
        Ok(registry)
    }
}
