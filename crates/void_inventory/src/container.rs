//! Player and container inventories the sorter can be pointed at

use crate::collection::{Collection, SlotRange};
use serde::{Deserialize, Serialize};

/// Size of the hotbar
pub const HOTBAR_SIZE: usize = 9;
/// Size of the main storage grid
pub const MAIN_SIZE: usize = 27;
/// Number of armor slots
pub const ARMOR_SIZE: usize = 4;
/// Total player slots: hotbar, main storage, armor, offhand
pub const PLAYER_SLOT_COUNT: usize = HOTBAR_SIZE + MAIN_SIZE + ARMOR_SIZE + 1;

/// Which side of a transfer an inventory sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerKind {
    /// The acting player's own inventory
    Player,
    /// A chest, barrel or any other storage block
    Container,
}

/// Capability a host inventory exposes to the sorter.
///
/// The sort range is resolved through this trait instead of poking at the
/// host's fields.
pub trait SortableInventory {
    /// Player or container
    fn kind(&self) -> ContainerKind;

    /// Slot contents
    fn collection(&self) -> &Collection;

    /// Mutable slot contents
    fn collection_mut(&mut self) -> &mut Collection;

    /// Slots the sorter is allowed to reorganize
    fn sort_range(&self) -> SlotRange;
}

/// Player inventory: hotbar `0..9`, main `9..36`, armor `36..40`, offhand `40`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInventory {
    slots: Collection,
    sort_range: SlotRange,
}

impl PlayerInventory {
    /// Create an empty player inventory sorting its main storage
    pub fn new() -> Self {
        Self {
            slots: Collection::new(PLAYER_SLOT_COUNT),
            sort_range: Self::main_range(),
        }
    }

    /// Override the sorted range.
    ///
    /// # Panics
    ///
    /// Panics if the range does not fit the inventory.
    pub fn with_sort_range(mut self, range: SlotRange) -> Self {
        assert!(
            self.slots.contains_range(range),
            "sort range {:?} does not fit a player inventory",
            range
        );
        self.sort_range = range;
        self
    }

    /// Hotbar slots
    pub fn hotbar_range() -> SlotRange {
        SlotRange::new(0, HOTBAR_SIZE)
    }

    /// Main storage slots
    pub fn main_range() -> SlotRange {
        SlotRange::new(HOTBAR_SIZE, HOTBAR_SIZE + MAIN_SIZE)
    }

    /// Armor slots
    pub fn armor_range() -> SlotRange {
        let start = HOTBAR_SIZE + MAIN_SIZE;
        SlotRange::new(start, start + ARMOR_SIZE)
    }

    /// Offhand slot index
    pub fn offhand_slot() -> usize {
        PLAYER_SLOT_COUNT - 1
    }
}

impl Default for PlayerInventory {
    fn default() -> Self {
        Self::new()
    }
}

impl SortableInventory for PlayerInventory {
    fn kind(&self) -> ContainerKind {
        ContainerKind::Player
    }

    fn collection(&self) -> &Collection {
        &self.slots
    }

    fn collection_mut(&mut self) -> &mut Collection {
        &mut self.slots
    }

    fn sort_range(&self) -> SlotRange {
        self.sort_range
    }
}

/// Storage container; every slot is sortable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerInventory {
    slots: Collection,
}

impl ContainerInventory {
    /// Create an empty container
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Collection::new(capacity),
        }
    }

    /// Wrap existing slots
    pub fn from_collection(slots: Collection) -> Self {
        Self { slots }
    }

    /// Single chest sized container
    pub fn chest() -> Self {
        Self::new(MAIN_SIZE)
    }
}

impl SortableInventory for ContainerInventory {
    fn kind(&self) -> ContainerKind {
        ContainerKind::Container
    }

    fn collection(&self) -> &Collection {
        &self.slots
    }

    fn collection_mut(&mut self) -> &mut Collection {
        &mut self.slots
    }

    fn sort_range(&self) -> SlotRange {
        SlotRange::full(self.slots.capacity())
    }
}
