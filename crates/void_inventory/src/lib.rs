//! Void Inventory - Slots, Stacks and Item Catalog
//!
//! This crate provides the slot model the inventory sorter works on.
//!
//! # Features
//!
//! - Validated item stacks with intrinsic max stack sizes
//! - Fixed-size slot collections and slot ranges
//! - Item catalog lookup (display name, category, max stack)
//! - Player and container inventories exposing their sortable range
//!
//! # Example
//!
//! ```ignore
//! use void_inventory::prelude::*;
//!
//! let registry = ItemRegistry::new()
//!     .with(ItemDefinition::new(1, "Cobblestone").with_category("block"))?;
//!
//! let mut chest = ContainerInventory::chest();
//! chest.collection_mut().set_slot(0, Some(registry.stack(1, 32)?));
//! ```

pub mod collection;
pub mod container;
pub mod item;
pub mod registry;

pub mod prelude {
    pub use crate::collection::{Collection, LinkedSlots, SlotRange, SlotStore};
    pub use crate::container::{
        ContainerInventory, ContainerKind, PlayerInventory, SortableInventory, HOTBAR_SIZE, MAIN_SIZE,
        PLAYER_SLOT_COUNT,
    };
    pub use crate::item::{ItemId, ItemStack, StackError};
    pub use crate::registry::{ItemCatalog, ItemDefinition, ItemRegistry, RegistryError};
}

pub use prelude::*;
