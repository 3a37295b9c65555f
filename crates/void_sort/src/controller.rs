//! Entry point for host glue
//!
//! A [`SortController`] is built once by the host with its item catalog and
//! settings, then handed the inventories a keybind targets.

use crate::config::SortSettings;
use crate::ordering::OrderingKey;
use crate::reorganize::{ReorganizeReport, Reorganizer};
use crate::strategy::OperationStrategy;
use crate::transfer::{choose_direction, transfer_view, TransferReport};
use crate::view::SlotView;
use std::sync::Arc;
use void_inventory::{ContainerKind, ItemCatalog, LinkedSlots, SlotRange, SlotStore, SortableInventory};

/// Sorts and transfers on behalf of a host
#[derive(Clone)]
pub struct SortController {
    catalog: Arc<dyn ItemCatalog>,
    settings: SortSettings,
}

impl SortController {
    /// Controller with default settings
    pub fn new(catalog: Arc<dyn ItemCatalog>) -> Self {
        Self::with_settings(catalog, SortSettings::default())
    }

    pub fn with_settings(catalog: Arc<dyn ItemCatalog>, settings: SortSettings) -> Self {
        Self { catalog, settings }
    }

    pub fn settings(&self) -> &SortSettings {
        &self.settings
    }

    /// Replace the settings, e.g. after the host reloads them
    pub fn set_settings(&mut self, settings: SortSettings) {
        self.settings = settings;
    }

    pub fn catalog(&self) -> &dyn ItemCatalog {
        self.catalog.as_ref()
    }

    /// Strategy for an actor: privileged actors write slots directly
    pub fn strategy_for(&self, privileged: bool) -> OperationStrategy {
        OperationStrategy::for_privilege(privileged)
    }

    /// Slots of `inventory` the controller touches
    pub fn sort_range(&self, inventory: &dyn SortableInventory) -> SlotRange {
        match (inventory.kind(), self.settings.player_sort_range) {
            (ContainerKind::Player, Some(range)) => range,
            _ => inventory.sort_range(),
        }
    }

    /// Sort with the configured key and merge flag
    pub fn sort(&self, inventory: &mut dyn SortableInventory, privileged: bool) -> ReorganizeReport {
        self.sort_with(inventory, self.settings.ordering, self.settings.merge_first, privileged)
    }

    /// Sort with explicit arguments
    pub fn sort_with(
        &self,
        inventory: &mut dyn SortableInventory,
        key: OrderingKey,
        merge_first: bool,
        privileged: bool,
    ) -> ReorganizeReport {
        let range = self.sort_range(inventory);
        let strategy = self.strategy_for(privileged);
        log::debug!(
            "sorting {:?} inventory slots {:?} by {}",
            inventory.kind(),
            range,
            key
        );

        let store: &mut dyn SlotStore = inventory.collection_mut();
        let mut view = self.view(SlotView::new(store, range));
        Reorganizer::new(self.catalog.as_ref()).reorganize_view(&mut view, range, key, merge_first, &strategy)
    }

    /// Move stacks between a player and an open container, direction
    /// chosen from their empty slot counts
    pub fn transfer(
        &self,
        player: &mut dyn SortableInventory,
        container: &mut dyn SortableInventory,
        privileged: bool,
    ) -> TransferReport {
        let player_range = self.sort_range(player);
        let container_range = self.sort_range(container);
        let direction = choose_direction(
            player.collection(),
            player_range,
            container.collection(),
            container_range,
        );
        let strategy = self.strategy_for(privileged);

        let mut linked = LinkedSlots::new(player.collection_mut(), container.collection_mut());
        let linked_container = linked.second_range(container_range);
        let mut view = self.view(SlotView::with_ranges(&mut linked, vec![player_range, linked_container]));
        transfer_view(&mut view, player_range, linked_container, direction, &strategy)
    }

    fn view<'a>(&self, view: SlotView<'a>) -> SlotView<'a> {
        if self.settings.record_actions {
            view.recording()
        } else {
            view
        }
    }
}
