//! Quick-access hotbar with an active slot.

use crate::inventory::{Container, InventoryError, InventoryResult, Slot};
use homestead_common::{ContainerKind, ItemId};

/// A hotbar: a small container plus the currently selected slot.
#[derive(Debug, Clone)]
pub struct Hotbar {
    container: Container,
    active_index: usize,
    active_changed: bool,
}

impl Hotbar {
    /// Creates a hotbar with the given slot count, slot 0 active.
    #[must_use]
    pub fn new(slot_count: usize) -> Self {
        Self {
            container: Container::new(ContainerKind::Hotbar, slot_count),
            active_index: 0,
            active_changed: false,
        }
    }

    /// Returns the underlying container.
    #[must_use]
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Returns the underlying container mutably.
    pub fn container_mut(&mut self) -> &mut Container {
        &mut self.container
    }

    /// Returns the active slot index.
    #[must_use]
    pub const fn active_index(&self) -> usize {
        self.active_index
    }

    /// Selects a slot by index.
    pub fn set_active_slot(&mut self, index: usize) -> InventoryResult<()> {
        let len = self.container.len();
        if index >= len {
            return Err(InventoryError::InvalidSlotIndex { index, len });
        }
        if index != self.active_index {
            self.active_index = index;
            self.active_changed = true;
        }
        Ok(())
    }

    /// Cycles the selection forward, wrapping to slot 0 past the end.
    pub fn select_next(&mut self) {
        let len = self.container.len();
        if len == 0 {
            return;
        }
        self.active_index = (self.active_index + 1) % len;
        self.active_changed = true;
    }

    /// Cycles the selection backward, wrapping to the last slot.
    pub fn select_prev(&mut self) {
        let len = self.container.len();
        if len == 0 {
            return;
        }
        self.active_index = (self.active_index + len - 1) % len;
        self.active_changed = true;
    }

    /// Returns the active slot.
    pub fn active_slot(&self) -> InventoryResult<&Slot> {
        self.container.get(self.active_index)
    }

    /// Returns the item in the active slot, if any.
    #[must_use]
    pub fn selected_item(&self) -> Option<ItemId> {
        self.container
            .get(self.active_index)
            .ok()
            .and_then(Slot::item)
    }

    /// Takes the pending active-slot-changed flag.
    pub fn take_active_changed(&mut self) -> bool {
        std::mem::take(&mut self.active_changed)
    }
}
