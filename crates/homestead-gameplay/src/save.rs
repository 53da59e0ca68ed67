//! Save/load of simulation state.
//!
//! Save files reference items and species by their stable string keys, never
//! by runtime IDs, so content can be re-registered in any order between
//! sessions. Files carry magic bytes and a version and are written atomically
//! (temp file then rename).

use crate::hotbar::Hotbar;
use crate::inventory::Container;
use crate::plants::PlantInstance;
use crate::sim::{SimConfig, Simulation};
use homestead_common::{ContainerKind, PlantId, Vec2};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::info;

/// Current save file format version.
pub const SAVE_VERSION: u32 = 1;

/// Magic bytes for save file identification.
const SAVE_MAGIC: [u8; 4] = *b"HMSV";

/// Errors that can occur during save/load operations.
#[derive(Debug, Error)]
pub enum SaveError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid magic bytes
    #[error("Invalid save file format")]
    InvalidFormat,

    /// Version mismatch
    #[error("Incompatible save version: expected {expected}, found {found}")]
    VersionMismatch {
        /// Expected version
        expected: u32,
        /// Found version
        found: u32,
    },

    /// Save file not found
    #[error("Save not found: {0}")]
    NotFound(String),

    /// Save file corrupted
    #[error("Save file corrupted: {0}")]
    Corrupted(String),

    /// Item key in the save is not registered
    #[error("Unknown item key '{0}'")]
    UnknownItemKey(String),

    /// Species key in the save is not registered
    #[error("Unknown species key '{0}'")]
    UnknownSpeciesKey(String),
}

/// Result type for save operations.
pub type SaveResult<T> = Result<T, SaveError>;

/// One saved container slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSaveData {
    /// Stable item key
    pub item_key: String,
    /// Quantity
    pub quantity: u32,
}

/// One saved plant instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantSaveData {
    /// Stable species key
    pub species_key: String,
    /// World position
    pub position: (f32, f32),
    /// Current stage index
    pub stage_index: usize,
    /// Elapsed time in the current stage (seconds)
    pub elapsed: f32,
    /// Whether growth has completed
    pub fully_grown: bool,
}

/// Complete saved simulation state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveGame {
    /// Save format version
    pub version: u32,
    /// Save timestamp (Unix seconds)
    pub timestamp: u64,
    /// Inventory slots, `None` where empty
    pub inventory: Vec<Option<SlotSaveData>>,
    /// Hotbar slots, `None` where empty
    pub hotbar: Vec<Option<SlotSaveData>>,
    /// Active hotbar slot index
    pub active_slot: usize,
    /// Live plants (harvested instances are never saved)
    pub plants: Vec<PlantSaveData>,
}

impl SaveGame {
    /// Serializes to binary format with magic bytes.
    pub fn to_bytes(&self) -> SaveResult<Vec<u8>> {
        let mut buffer = Vec::new();
        buffer.extend_from_slice(&SAVE_MAGIC);
        let data = bincode::serialize(self).map_err(|e| SaveError::Serialization(e.to_string()))?;
        buffer.extend(data);
        Ok(buffer)
    }

    /// Deserializes from binary format, checking magic bytes and version.
    pub fn from_bytes(bytes: &[u8]) -> SaveResult<Self> {
        if bytes.len() < 4 || bytes[0..4] != SAVE_MAGIC {
            return Err(SaveError::InvalidFormat);
        }
        let save: SaveGame =
            bincode::deserialize(&bytes[4..]).map_err(|e| SaveError::Corrupted(e.to_string()))?;
        if save.version > SAVE_VERSION {
            return Err(SaveError::VersionMismatch {
                expected: SAVE_VERSION,
                found: save.version,
            });
        }
        Ok(save)
    }
}

fn container_to_save(
    container: &Container,
    sim: &Simulation,
) -> SaveResult<Vec<Option<SlotSaveData>>> {
    container
        .iter()
        .map(|slot| match slot.item() {
            None => Ok(None),
            Some(item) => {
                let def = sim.items().get(item).ok_or_else(|| {
                    SaveError::Serialization(format!("item {item:?} has no definition"))
                })?;
                Ok(Some(SlotSaveData {
                    item_key: def.key.clone(),
                    quantity: slot.quantity(),
                }))
            },
        })
        .collect()
}

fn restore_container(
    kind: ContainerKind,
    slots: &[Option<SlotSaveData>],
    sim: &Simulation,
) -> SaveResult<Container> {
    let mut container = Container::new(kind, slots.len());
    for (index, saved) in slots.iter().enumerate() {
        if let Some(saved) = saved {
            let def = sim
                .items()
                .by_key(&saved.item_key)
                .ok_or_else(|| SaveError::UnknownItemKey(saved.item_key.clone()))?;
            if saved.quantity > def.stack_limit() {
                return Err(SaveError::Corrupted(format!(
                    "slot {index}: quantity {} exceeds max stack {} for '{}'",
                    saved.quantity,
                    def.stack_limit(),
                    saved.item_key
                )));
            }
            container
                .restore_slot(index, def.id, saved.quantity)
                .map_err(|e| SaveError::Corrupted(e.to_string()))?;
        }
    }
    // Restored slots should not produce change events.
    let _ = container.take_dirty();
    Ok(container)
}

impl Simulation {
    /// Captures the simulation state into a save record.
    ///
    /// Plants already harvested are terminal and are not saved.
    pub fn to_save(&self) -> SaveResult<SaveGame> {
        let mut plants = Vec::new();
        for plant in self.plants().filter(|p| !p.harvested) {
            let species = self.species().get(plant.species).ok_or_else(|| {
                SaveError::Serialization(format!("species {:?} has no definition", plant.species))
            })?;
            plants.push(PlantSaveData {
                species_key: species.key.clone(),
                position: (plant.position.x, plant.position.y),
                stage_index: plant.stage_index,
                elapsed: plant.elapsed,
                fully_grown: plant.fully_grown,
            });
        }

        Ok(SaveGame {
            version: SAVE_VERSION,
            timestamp: current_timestamp(),
            inventory: container_to_save(self.inventory(), self)?,
            hotbar: container_to_save(self.hotbar().container(), self)?,
            active_slot: self.active_slot_index(),
            plants,
        })
    }

    /// Restores a simulation from a save record and fresh registries.
    ///
    /// Any item or species key missing from the registries rejects the whole
    /// load, as does restored data the registries rule out (a quantity above
    /// the item's max stack, a stage index past the species' last stage);
    /// nothing is mutated on failure.
    pub fn from_save(
        save: &SaveGame,
        items: crate::items::ItemRegistry,
        species: crate::plants::SpeciesRegistry,
        config: SimConfig,
    ) -> SaveResult<Self> {
        let mut sim = Simulation::new(items, species, config);

        let inventory = restore_container(ContainerKind::Inventory, &save.inventory, &sim)?;
        let hotbar_container = restore_container(ContainerKind::Hotbar, &save.hotbar, &sim)?;

        let mut plants = Vec::with_capacity(save.plants.len());
        for saved in &save.plants {
            let species_def = sim
                .species()
                .by_key(&saved.species_key)
                .ok_or_else(|| SaveError::UnknownSpeciesKey(saved.species_key.clone()))?;
            if saved.stage_index >= species_def.stage_count() {
                return Err(SaveError::Corrupted(format!(
                    "plant '{}': stage index {} out of range ({} stages)",
                    saved.species_key,
                    saved.stage_index,
                    species_def.stage_count()
                )));
            }
            plants.push(PlantInstance {
                id: PlantId::new(),
                species: species_def.id,
                position: Vec2::new(saved.position.0, saved.position.1),
                stage_index: saved.stage_index,
                elapsed: saved.elapsed,
                fully_grown: saved.fully_grown,
                harvested: false,
            });
        }

        let mut hotbar = Hotbar::new(hotbar_container.len());
        *hotbar.container_mut() = hotbar_container;
        hotbar
            .set_active_slot(save.active_slot)
            .map_err(|e| SaveError::Corrupted(e.to_string()))?;
        let _ = hotbar.take_active_changed();

        sim.restore_state(inventory, hotbar, plants);
        Ok(sim)
    }
}

/// Save manager for handling save files on disk.
#[derive(Debug)]
pub struct SaveManager {
    save_dir: PathBuf,
}

impl SaveManager {
    /// Creates a new save manager with the given save directory.
    #[must_use]
    pub fn new(save_dir: impl Into<PathBuf>) -> Self {
        Self {
            save_dir: save_dir.into(),
        }
    }

    /// Gets the save directory path.
    #[must_use]
    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    /// Ensures the save directory exists.
    pub fn ensure_dir(&self) -> SaveResult<()> {
        fs::create_dir_all(&self.save_dir)?;
        Ok(())
    }

    fn save_path(&self, name: &str) -> PathBuf {
        self.save_dir.join(format!("{name}.sav"))
    }

    fn temp_path(&self, name: &str) -> PathBuf {
        self.save_dir.join(format!("{name}.sav.tmp"))
    }

    /// Saves a game to disk.
    ///
    /// Uses atomic write (write to temp, then rename) for safety.
    pub fn save(&self, name: &str, data: &SaveGame) -> SaveResult<()> {
        self.ensure_dir()?;

        let bytes = data.to_bytes()?;
        let temp_path = self.temp_path(name);
        let final_path = self.save_path(name);

        let mut file = fs::File::create(&temp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, &final_path)?;
        info!(name, "saved game");
        Ok(())
    }

    /// Loads a game from disk.
    pub fn load(&self, name: &str) -> SaveResult<SaveGame> {
        let path = self.save_path(name);
        if !path.exists() {
            return Err(SaveError::NotFound(name.to_string()));
        }

        let mut file = fs::File::open(&path)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        SaveGame::from_bytes(&bytes)
    }

    /// Checks if a save exists.
    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.save_path(name).exists()
    }

    /// Deletes a save file.
    pub fn delete(&self, name: &str) -> SaveResult<()> {
        let path = self.save_path(name);
        if !path.exists() {
            return Err(SaveError::NotFound(name.to_string()));
        }
        fs::remove_file(&path)?;
        Ok(())
    }

    /// Lists all save names, newest first.
    pub fn list_saves(&self) -> SaveResult<Vec<String>> {
        self.ensure_dir()?;

        let mut saves = Vec::new();
        for entry in fs::read_dir(&self.save_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "sav") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    let modified = entry
                        .metadata()
                        .and_then(|m| m.modified())
                        .unwrap_or(UNIX_EPOCH);
                    saves.push((modified, stem.to_string()));
                }
            }
        }

        saves.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(saves.into_iter().map(|(_, name)| name).collect())
    }
}

/// Returns current Unix timestamp.
fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
