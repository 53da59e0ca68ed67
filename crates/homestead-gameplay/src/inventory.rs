//! Slot-based item containers.
//!
//! A `Container` is a fixed-length array of slots holding `(ItemId, quantity)`
//! pairs. All mutations are bounds-checked, return `Result`, and record the
//! touched slot indices so the simulation context can publish change events.

use crate::items::ItemRegistry;
use homestead_common::{ContainerKind, ItemId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Container operation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    /// Slot index out of range
    #[error("Invalid slot index {index} (container has {len} slots)")]
    InvalidSlotIndex {
        /// Requested index
        index: usize,
        /// Container length
        len: usize,
    },
    /// Zero or otherwise unusable quantity
    #[error("Invalid quantity {quantity}")]
    InvalidQuantity {
        /// Rejected quantity
        quantity: u32,
    },
    /// Item ID not present in the registry
    #[error("Unknown item {0:?}")]
    UnknownItem(ItemId),
}

/// Result type for container operations.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// A single container slot.
///
/// Invariant: `quantity > 0` exactly when `item` is present, and `quantity`
/// never exceeds the stack limit of the held item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    item: Option<ItemId>,
    quantity: u32,
}

impl Slot {
    /// Creates an empty slot.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            item: None,
            quantity: 0,
        }
    }

    /// Checks if the slot holds nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.item.is_none()
    }

    /// Returns the held item, if any.
    #[must_use]
    pub const fn item(&self) -> Option<ItemId> {
        self.item
    }

    /// Returns the held quantity (0 when empty).
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Clears the slot.
    pub fn clear(&mut self) {
        self.item = None;
        self.quantity = 0;
    }

    fn set(&mut self, item: ItemId, quantity: u32) {
        debug_assert!(quantity > 0);
        self.item = Some(item);
        self.quantity = quantity;
    }
}

/// A fixed-length slot container.
#[derive(Debug, Clone)]
pub struct Container {
    kind: ContainerKind,
    slots: Vec<Slot>,
    dirty: Vec<usize>,
}

impl Container {
    /// Creates a container with the given number of empty slots.
    #[must_use]
    pub fn new(kind: ContainerKind, slot_count: usize) -> Self {
        Self {
            kind,
            slots: vec![Slot::empty(); slot_count],
            dirty: Vec::new(),
        }
    }

    /// Returns the container's kind.
    #[must_use]
    pub const fn kind(&self) -> ContainerKind {
        self.kind
    }

    /// Returns the slot count (never changes after construction).
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Checks if the container has zero slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns a slot by index.
    pub fn get(&self, index: usize) -> InventoryResult<&Slot> {
        self.slots
            .get(index)
            .ok_or(InventoryError::InvalidSlotIndex {
                index,
                len: self.slots.len(),
            })
    }

    /// Iterates over all slots.
    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    /// Finds the first empty slot.
    #[must_use]
    pub fn find_first_empty(&self) -> Option<usize> {
        self.slots.iter().position(Slot::is_empty)
    }

    /// Finds the first slot holding `item` with spare stack capacity.
    #[must_use]
    pub fn find_first_matching(&self, item: ItemId, registry: &ItemRegistry) -> Option<usize> {
        let limit = registry.get(item)?.stack_limit();
        self.slots
            .iter()
            .position(|s| s.item == Some(item) && s.quantity < limit)
    }

    /// Total units of `item` across all slots.
    #[must_use]
    pub fn count_of(&self, item: ItemId) -> u64 {
        self.slots
            .iter()
            .filter(|s| s.item == Some(item))
            .map(|s| u64::from(s.quantity))
            .sum()
    }

    /// Adds items, stacking onto matching slots first and then filling
    /// empty slots. Returns the unplaced remainder (0 when fully absorbed).
    pub fn add_item(
        &mut self,
        item: ItemId,
        quantity: u32,
        registry: &ItemRegistry,
    ) -> InventoryResult<u32> {
        if quantity == 0 {
            return Err(InventoryError::InvalidQuantity { quantity });
        }
        let def = registry.get(item).ok_or(InventoryError::UnknownItem(item))?;
        let limit = def.stack_limit();
        let mut remaining = quantity;

        // Pass 1: top up existing stacks.
        if def.stackable {
            for (index, slot) in self.slots.iter_mut().enumerate() {
                if remaining == 0 {
                    break;
                }
                if slot.item == Some(item) && slot.quantity < limit {
                    let space = limit - slot.quantity;
                    let moved = space.min(remaining);
                    slot.quantity += moved;
                    remaining -= moved;
                    self.dirty.push(index);
                }
            }
        }

        // Pass 2: fill empty slots.
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if remaining == 0 {
                break;
            }
            if slot.is_empty() {
                let moved = limit.min(remaining);
                slot.set(item, moved);
                remaining -= moved;
                self.dirty.push(index);
            }
        }

        Ok(remaining)
    }

    /// Removes up to `quantity` units from a slot, clearing it at zero.
    /// Returns the number of units actually removed.
    ///
    /// A zero quantity is a no-op returning `Ok(0)`.
    pub fn remove_item(&mut self, index: usize, quantity: u32) -> InventoryResult<u32> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(InventoryError::InvalidSlotIndex { index, len })?;

        if quantity == 0 || slot.is_empty() {
            return Ok(0);
        }

        let removed = slot.quantity.min(quantity);
        slot.quantity -= removed;
        if slot.quantity == 0 {
            slot.clear();
        }
        self.dirty.push(index);
        Ok(removed)
    }

    /// Moves items between two slots of this container.
    ///
    /// Empty destination: the stack moves wholesale. Same stackable item:
    /// transfers as much as fits, leaving the remainder in the source.
    /// Different items: the slots swap. Moving from an empty slot or onto
    /// itself is a no-op.
    pub fn move_item(
        &mut self,
        from: usize,
        to: usize,
        registry: &ItemRegistry,
    ) -> InventoryResult<()> {
        let len = self.slots.len();
        if from >= len {
            return Err(InventoryError::InvalidSlotIndex { index: from, len });
        }
        if to >= len {
            return Err(InventoryError::InvalidSlotIndex { index: to, len });
        }
        if from == to || self.slots[from].is_empty() {
            return Ok(());
        }

        let src = self.slots[from].clone();
        let dst = self.slots[to].clone();
        let (new_src, new_dst) = merge_or_swap(&src, &dst, registry)?;
        self.slots[from] = new_src;
        self.slots[to] = new_dst;
        self.dirty.push(from);
        self.dirty.push(to);
        Ok(())
    }

    /// Moves items from a slot of this container into a slot of `other`.
    ///
    /// Same merge-or-swap policy as [`Container::move_item`].
    pub fn move_between(
        &mut self,
        from: usize,
        other: &mut Container,
        to: usize,
        registry: &ItemRegistry,
    ) -> InventoryResult<()> {
        let len = self.slots.len();
        if from >= len {
            return Err(InventoryError::InvalidSlotIndex { index: from, len });
        }
        let other_len = other.slots.len();
        if to >= other_len {
            return Err(InventoryError::InvalidSlotIndex {
                index: to,
                len: other_len,
            });
        }
        if self.slots[from].is_empty() {
            return Ok(());
        }

        let src = self.slots[from].clone();
        let dst = other.slots[to].clone();
        let (new_src, new_dst) = merge_or_swap(&src, &dst, registry)?;
        self.slots[from] = new_src;
        other.slots[to] = new_dst;
        self.dirty.push(from);
        other.dirty.push(to);
        Ok(())
    }

    /// Writes a slot directly, bypassing stacking rules. Load path only.
    pub(crate) fn restore_slot(
        &mut self,
        index: usize,
        item: ItemId,
        quantity: u32,
    ) -> InventoryResult<()> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(InventoryError::InvalidSlotIndex { index, len })?;
        if quantity == 0 {
            return Err(InventoryError::InvalidQuantity { quantity });
        }
        slot.set(item, quantity);
        Ok(())
    }

    /// Drains the list of slot indices touched since the last call.
    pub fn take_dirty(&mut self) -> Vec<usize> {
        let mut dirty = std::mem::take(&mut self.dirty);
        dirty.sort_unstable();
        dirty.dedup();
        dirty
    }
}

/// Resolves a move from `src` into `dst`: merge same stackable items up to
/// the stack limit, otherwise swap the slots.
fn merge_or_swap(src: &Slot, dst: &Slot, registry: &ItemRegistry) -> InventoryResult<(Slot, Slot)> {
    let Some(item) = src.item else {
        return Ok((src.clone(), dst.clone()));
    };

    if dst.is_empty() {
        return Ok((Slot::empty(), src.clone()));
    }

    if dst.item == Some(item) {
        let def = registry.get(item).ok_or(InventoryError::UnknownItem(item))?;
        if def.stackable {
            let limit = def.stack_limit();
            let space = limit.saturating_sub(dst.quantity);
            let moved = space.min(src.quantity);
            if moved > 0 {
                let mut new_src = src.clone();
                let mut new_dst = dst.clone();
                new_dst.quantity += moved;
                new_src.quantity -= moved;
                if new_src.quantity == 0 {
                    new_src.clear();
                }
                return Ok((new_src, new_dst));
            }
        }
    }

    // Different items, or no capacity to merge: swap.
    Ok((dst.clone(), src.clone()))
}
