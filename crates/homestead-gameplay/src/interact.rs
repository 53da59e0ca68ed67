//! Interaction capability for world objects.
//!
//! Anything the player can walk up to and use implements [`Interactable`].
//! The presentation layer scans nearby objects, shows the prompt of the
//! closest one, and calls `interact` on confirmation.

use crate::sim::{HarvestOutcome, Simulation};
use homestead_common::{ItemId, PlantId, Vec2};

/// Result of an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractOutcome {
    /// Items were deposited into the player's containers.
    PickedUp {
        /// Item picked up
        item: ItemId,
        /// Units actually deposited
        quantity: u32,
    },
    /// A plant was harvested.
    Harvested(HarvestOutcome),
    /// Nothing happened.
    Nothing,
}

/// An object the player can interact with.
pub trait Interactable {
    /// Prompt text shown when this object is the interaction target.
    fn prompt(&self, sim: &Simulation) -> String;

    /// Whether interacting right now would do anything.
    fn can_interact(&self, sim: &Simulation) -> bool;

    /// Performs the interaction.
    fn interact(&mut self, sim: &mut Simulation) -> InteractOutcome;
}

/// A loose item stack lying in the world.
///
/// Picking up deposits hotbar-first. Units that do not fit stay in the
/// pickup for a later attempt.
#[derive(Debug, Clone)]
pub struct ItemPickup {
    /// Item type.
    pub item: ItemId,
    /// Units remaining in the pickup.
    pub quantity: u32,
    /// World position.
    pub position: Vec2,
}

impl ItemPickup {
    /// Creates a new pickup.
    #[must_use]
    pub fn new(item: ItemId, quantity: u32, position: Vec2) -> Self {
        Self {
            item,
            quantity,
            position,
        }
    }

    /// Whether everything has been collected.
    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.quantity == 0
    }
}

impl Interactable for ItemPickup {
    fn prompt(&self, sim: &Simulation) -> String {
        let name = sim
            .items()
            .get(self.item)
            .map_or("???", |def| def.name.as_str());
        if self.quantity > 1 {
            format!("Pick up {name} x{}", self.quantity)
        } else {
            format!("Pick up {name}")
        }
    }

    fn can_interact(&self, _sim: &Simulation) -> bool {
        self.quantity > 0
    }

    fn interact(&mut self, sim: &mut Simulation) -> InteractOutcome {
        if self.quantity == 0 {
            return InteractOutcome::Nothing;
        }
        let Ok((deposited, _overflow)) = sim.deposit(self.item, self.quantity) else {
            return InteractOutcome::Nothing;
        };
        if deposited == 0 {
            return InteractOutcome::Nothing;
        }
        self.quantity -= deposited;
        InteractOutcome::PickedUp {
            item: self.item,
            quantity: deposited,
        }
    }
}

/// A live plant as an interaction target.
#[derive(Debug, Clone, Copy)]
pub struct PlantTarget {
    /// Plant instance.
    pub plant: PlantId,
}

impl PlantTarget {
    /// Creates a target for a plant.
    #[must_use]
    pub fn new(plant: PlantId) -> Self {
        Self { plant }
    }
}

impl Interactable for PlantTarget {
    fn prompt(&self, sim: &Simulation) -> String {
        let Some(plant) = sim.plant(self.plant) else {
            return String::new();
        };
        let name = sim
            .species()
            .get(plant.species)
            .map_or("???", |s| s.name.as_str());
        if plant.can_harvest() {
            format!("Harvest {name}")
        } else {
            format!("{name} (growing)")
        }
    }

    fn can_interact(&self, sim: &Simulation) -> bool {
        sim.can_harvest(self.plant)
    }

    fn interact(&mut self, sim: &mut Simulation) -> InteractOutcome {
        match sim.harvest(self.plant) {
            Ok(outcome) => InteractOutcome::Harvested(outcome),
            Err(_) => InteractOutcome::Nothing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{ItemDefinition, ItemRegistry, SeedData, SurfaceKind};
    use crate::planting::MockSurface;
    use crate::plants::{PlantSpecies, SpeciesRegistry};
    use crate::sim::{SimConfig, UseOutcome};
    use homestead_common::{ContainerKind, SpeciesId};

    const BERRY: ItemId = ItemId::new(1);
    const BERRY_SEED: ItemId = ItemId::new(2);

    fn test_sim() -> Simulation {
        let mut items = ItemRegistry::new();
        items
            .register(
                ItemDefinition::builder(BERRY, "berry", "Berry")
                    .stackable(true, 10)
                    .build(),
            )
            .expect("register");
        items
            .register(
                ItemDefinition::builder(BERRY_SEED, "berry_seed", "Berry Seed")
                    .stackable(true, 50)
                    .seed(SeedData::new(
                        SpeciesId::new(1),
                        1.0,
                        vec![SurfaceKind::Soil],
                    ))
                    .build(),
            )
            .expect("register");

        let mut species = SpeciesRegistry::new();
        species
            .register(
                PlantSpecies::builder(SpeciesId::new(1), "berry_bush", "Berry Bush")
                    .stages(&[5.0])
                    .yields(BERRY, 4)
                    .build(),
            )
            .expect("register");

        Simulation::new(items, species, SimConfig::default())
    }

    #[test]
    fn test_pickup_full_deposit() {
        let mut sim = test_sim();
        let mut pickup = ItemPickup::new(BERRY, 6, Vec2::ZERO);

        assert!(pickup.can_interact(&sim));
        assert_eq!(pickup.prompt(&sim), "Pick up Berry x6");

        let outcome = pickup.interact(&mut sim);
        assert_eq!(
            outcome,
            InteractOutcome::PickedUp {
                item: BERRY,
                quantity: 6
            }
        );
        assert!(pickup.is_depleted());
        assert_eq!(sim.count_of(BERRY), 6);
    }

    #[test]
    fn test_pickup_partial_deposit_keeps_remainder() {
        let mut sim = test_sim();
        // Berry stacks to 10; fill both containers completely.
        let capacity: u64 = (24 + 8) * 10;
        sim.add_item(ContainerKind::Inventory, BERRY, 24 * 10)
            .expect("add");
        sim.add_item(ContainerKind::Hotbar, BERRY, 8 * 10 - 3)
            .expect("add");
        assert_eq!(sim.count_of(BERRY), capacity - 3);

        let mut pickup = ItemPickup::new(BERRY, 10, Vec2::ZERO);
        let outcome = pickup.interact(&mut sim);
        assert_eq!(
            outcome,
            InteractOutcome::PickedUp {
                item: BERRY,
                quantity: 3
            }
        );
        assert_eq!(pickup.quantity, 7);
        assert!(!pickup.is_depleted());

        // A second attempt with no space does nothing.
        assert_eq!(pickup.interact(&mut sim), InteractOutcome::Nothing);
        assert_eq!(pickup.quantity, 7);
    }

    #[test]
    fn test_plant_target_prompts() {
        let mut sim = test_sim();
        sim.add_item(ContainerKind::Hotbar, BERRY_SEED, 1)
            .expect("add");
        let surfaces = MockSurface::new();
        let UseOutcome::Planted(plant_id) = sim
            .use_active_slot(&surfaces, Some(Vec2::new(3.0, 3.0)))
            .expect("plant")
        else {
            panic!("expected Planted");
        };

        let mut target = PlantTarget::new(plant_id);
        assert_eq!(target.prompt(&sim), "Berry Bush (growing)");
        assert!(!target.can_interact(&sim));
        assert_eq!(target.interact(&mut sim), InteractOutcome::Nothing);

        sim.tick(5.0);
        assert_eq!(target.prompt(&sim), "Harvest Berry Bush");
        assert!(target.can_interact(&sim));

        let outcome = target.interact(&mut sim);
        assert_eq!(
            outcome,
            InteractOutcome::Harvested(HarvestOutcome {
                item: BERRY,
                deposited: 4,
                overflow: 0
            })
        );
        assert!(!target.can_interact(&sim));
    }
}
