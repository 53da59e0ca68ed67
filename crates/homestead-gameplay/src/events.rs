//! Event bus for inter-system communication.

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

use homestead_common::{ContainerKind, ItemId, PlantId, SpeciesId};

/// Event types that can be sent through the event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameEvent {
    /// A container slot's contents changed
    SlotChanged {
        /// Which container
        container: ContainerKind,
        /// Slot index
        index: usize,
        /// New item (None when cleared)
        item: Option<ItemId>,
        /// New quantity
        quantity: u32,
    },
    /// The hotbar selection moved
    ActiveSlotChanged {
        /// New active index
        index: usize,
    },
    /// A consumable was used
    ItemConsumed {
        /// Item consumed
        item: ItemId,
    },
    /// An equippable item was activated
    EquipRequested {
        /// Item to equip
        item: ItemId,
    },
    /// A seed was planted
    PlantCreated {
        /// New plant instance
        plant: PlantId,
        /// Species planted
        species: SpeciesId,
    },
    /// A plant advanced one growth stage
    PlantStageAdvanced {
        /// Plant instance
        plant: PlantId,
        /// New stage index
        stage: usize,
    },
    /// A plant finished growing
    PlantFullyGrown {
        /// Plant instance
        plant: PlantId,
    },
    /// A plant was harvested
    PlantHarvested {
        /// Plant instance
        plant: PlantId,
        /// Yield item
        item: ItemId,
        /// Units deposited into containers
        deposited: u32,
        /// Units that did not fit anywhere
        overflow: u32,
    },
    /// A harvested plant was removed from the world
    PlantRemoved {
        /// Plant instance
        plant: PlantId,
    },
}

/// Event bus for broadcasting events to subscribers.
#[derive(Debug)]
pub struct EventBus {
    /// Sender for broadcasting events
    sender: Sender<GameEvent>,
    /// Receiver for collecting events
    receiver: Receiver<GameEvent>,
    /// Channel capacity
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl EventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event to the bus.
    pub fn publish(&self, event: GameEvent) {
        // Non-blocking send - if full, event is dropped
        let _ = self.sender.try_send(event);
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates a new sender handle for publishing events.
    #[must_use]
    pub fn sender(&self) -> Sender<GameEvent> {
        self.sender.clone()
    }
}
