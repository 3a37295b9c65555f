//! Reorganization engine: merge same-item stacks, then selection-sort
//!
//! Selection sort issues at most one mutating operation per position,
//! which is what matters when every operation may be a round trip.

use crate::ordering::{OrderingKey, StackOrdering};
use crate::strategy::SlotStrategy;
use crate::view::{OperationStats, SlotAction, SlotView};
use std::collections::{BTreeSet, HashMap};
use void_inventory::{Collection, ItemCatalog, ItemId, SlotRange};

/// Summary of one reorganization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorganizeReport {
    /// Key the range was sorted by
    pub key: OrderingKey,
    /// Item groups consolidated by the merge phase
    pub groups_merged: usize,
    /// Operations issued by this run
    pub stats: OperationStats,
    /// Primitive actions issued by this run (empty unless the view records).
    /// Actions recorded on the view before the run are not included.
    pub actions: Vec<SlotAction>,
}

impl ReorganizeReport {
    /// Check if the run changed nothing
    pub fn is_noop(&self) -> bool {
        self.stats.operations() == 0
    }
}

/// Sorts slot ranges into canonical order
pub struct Reorganizer<'a> {
    catalog: &'a dyn ItemCatalog,
}

impl<'a> Reorganizer<'a> {
    /// Create a reorganizer looking item metadata up in `catalog`
    pub fn new(catalog: &'a dyn ItemCatalog) -> Self {
        Self { catalog }
    }

    /// Reorganize `range` of a collection
    pub fn reorganize(
        &self,
        collection: &mut Collection,
        range: SlotRange,
        key: OrderingKey,
        merge_first: bool,
        strategy: &dyn SlotStrategy,
    ) -> ReorganizeReport {
        let mut view = SlotView::new(collection, range);
        self.reorganize_view(&mut view, range, key, merge_first, strategy)
    }

    /// Reorganize `range` through an existing view.
    ///
    /// # Panics
    ///
    /// Panics if `range` is not covered by the view's approved ranges.
    pub fn reorganize_view(
        &self,
        view: &mut SlotView<'_>,
        range: SlotRange,
        key: OrderingKey,
        merge_first: bool,
        strategy: &dyn SlotStrategy,
    ) -> ReorganizeReport {
        assert!(
            view.ranges().iter().any(|r| r.start <= range.start && range.end <= r.end),
            "range {:?} is not inside the view's ranges {:?}",
            range,
            view.ranges()
        );
        let before = view.stats();
        let journal_start = view.journal().len();
        self.warn_unknown_items(view, range);

        let groups_merged = if merge_first {
            self.merge_phase(view, range, strategy)
        } else {
            0
        };
        self.sort_phase(view, range, StackOrdering::new(key, self.catalog), strategy);

        let stats = view.stats() - before;
        log::debug!(
            "reorganized {:?} by {} with {} strategy: {} groups merged, {} operations, {} actions",
            range,
            key,
            strategy.name(),
            groups_merged,
            stats.operations(),
            stats.actions
        );
        ReorganizeReport {
            key,
            groups_merged,
            stats,
            actions: view.journal_since(journal_start),
        }
    }

    /// Consolidate every item type into the fewest slots.
    ///
    /// Each group that can shrink is left-packed over its own positions:
    /// earlier positions are filled to max stack first, later ones end up
    /// empty. A group already in its fewest slots is not reshuffled.
    fn merge_phase(&self, view: &mut SlotView<'_>, range: SlotRange, strategy: &dyn SlotStrategy) -> usize {
        let mut merged = 0;
        for (item, positions) in group_by_item(view, range) {
            if positions.len() < 2 {
                continue;
            }
            let total: u64 = positions
                .iter()
                .filter_map(|&i| view.get(i))
                .map(|s| u64::from(s.quantity()))
                .sum();
            // collections hold one max stack per item
            let max_stack = view.get(positions[0]).map_or(1, |s| s.max_stack());
            let needed = total.div_ceil(u64::from(max_stack));
            // minimal but not left-packed groups stay as they are
            if positions.len() as u64 == needed {
                log::trace!("{} already packed into {} slots", item, needed);
                continue;
            }
            log::trace!(
                "packing {} x{} from {} slots into {}",
                item,
                total,
                positions.len(),
                needed
            );
            pack_group(view, &positions, strategy);
            merged += 1;
        }
        merged
    }

    fn sort_phase(
        &self,
        view: &mut SlotView<'_>,
        range: SlotRange,
        ordering: StackOrdering<'_>,
        strategy: &dyn SlotStrategy,
    ) {
        for i in range.indices() {
            if view.is_vacant(i) {
                match position_of_min(view, &ordering, i + 1..range.end) {
                    Some(j) => strategy.move_stack(view, j, i),
                    // only empty slots remain
                    None => break,
                }
            } else if let Some(j) = position_of_min(view, &ordering, i..range.end) {
                if j != i {
                    strategy.swap(view, i, j);
                }
            }
        }
    }

    fn warn_unknown_items(&self, view: &SlotView<'_>, range: SlotRange) {
        let unknown: BTreeSet<ItemId> = range
            .indices()
            .filter_map(|i| view.get(i))
            .map(|s| s.item())
            .filter(|&item| !self.catalog.contains(item))
            .collect();
        if !unknown.is_empty() {
            log::warn!("items missing from the catalog sort as unnamed: {:?}", unknown);
        }
    }
}

/// Occupied positions per item, items in first-seen order
fn group_by_item(view: &SlotView<'_>, range: SlotRange) -> Vec<(ItemId, Vec<usize>)> {
    let mut groups: Vec<(ItemId, Vec<usize>)> = Vec::new();
    let mut index: HashMap<ItemId, usize> = HashMap::new();
    for i in range.indices() {
        if let Some(stack) = view.get(i) {
            let slot = *index.entry(stack.item()).or_insert_with(|| {
                groups.push((stack.item(), Vec::new()));
                groups.len() - 1
            });
            groups[slot].1.push(i);
        }
    }
    groups
}

/// Left-pack one item's stacks over its ascending positions.
///
/// Only transfers and moves between the group's own positions are issued,
/// so every intermediate state conserves the item's total.
fn pack_group(view: &mut SlotView<'_>, positions: &[usize], strategy: &dyn SlotStrategy) {
    let (mut dst, mut src) = (0, 1);
    while src < positions.len() {
        if dst == src {
            src += 1;
            continue;
        }
        let (target, source) = (positions[dst], positions[src]);
        if view.is_vacant(source) {
            src += 1;
            continue;
        }
        match view.get(target) {
            None => {
                strategy.move_stack(view, source, target);
                src += 1;
            }
            Some(stack) if stack.is_full() => dst += 1,
            Some(_) => {
                if !strategy.stack_transfer(view, source, target) {
                    dst += 1;
                } else if view.is_vacant(source) {
                    src += 1;
                }
            }
        }
    }
}

/// First occupied slot holding the smallest stack in `indices`
fn position_of_min(
    view: &SlotView<'_>,
    ordering: &StackOrdering<'_>,
    indices: std::ops::Range<usize>,
) -> Option<usize> {
    let mut best: Option<usize> = None;
    for j in indices {
        let Some(candidate) = view.get(j) else {
            continue;
        };
        let better = match best.and_then(|b| view.get(b)) {
            Some(current) => ordering.compare_stacks(candidate, current).is_lt(),
            None => true,
        };
        if better {
            best = Some(j);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::OperationStrategy;
    use void_inventory::{ItemDefinition, ItemRegistry, ItemStack};

    fn registry() -> ItemRegistry {
        ItemRegistry::new()
            .with(ItemDefinition::new(1, "A").with_category("b-block"))
            .and_then(|r| r.with(ItemDefinition::new(2, "B").with_category("a-food")))
            .and_then(|r| r.with(ItemDefinition::new(3, "C").with_max_stack(16).with_category("c-misc")))
            .unwrap()
    }

    fn stack(item: u32, quantity: u32) -> Option<ItemStack> {
        let max = if item == 3 { 16 } else { 64 };
        Some(ItemStack::new(item, quantity, max))
    }

    fn run(slots: Vec<Option<ItemStack>>, key: OrderingKey, merge_first: bool) -> (Collection, ReorganizeReport) {
        let registry = registry();
        let mut collection = Collection::from_slots(slots);
        let range = SlotRange::full(collection.capacity());
        let report = Reorganizer::new(&registry).reorganize(
            &mut collection,
            range,
            key,
            merge_first,
            &OperationStrategy::direct(),
        );
        (collection, report)
    }

    #[test]
    fn test_merge_then_sort() {
        let (collection, report) = run(vec![stack(1, 3), None, stack(2, 5), stack(1, 2)], OrderingKey::Name, true);

        assert_eq!(collection.slots(), &[stack(1, 5), stack(2, 5), None, None]);
        assert_eq!(report.groups_merged, 1);
    }

    #[test]
    fn test_single_swap() {
        let (collection, report) = run(vec![stack(2, 1), stack(1, 1)], OrderingKey::Name, false);

        assert_eq!(collection.slots(), &[stack(1, 1), stack(2, 1)]);
        assert_eq!(report.stats.swaps, 1);
        assert_eq!(report.stats.operations(), 1);
    }

    #[test]
    fn test_empty_range_is_noop() {
        let (collection, report) = run(vec![None, None], OrderingKey::Name, true);

        assert_eq!(collection.slots(), &[None, None]);
        assert!(report.is_noop());
    }

    #[test]
    fn test_single_stack_moves_to_front_only() {
        let (collection, report) = run(vec![None, None, stack(2, 9)], OrderingKey::Quantity, true);

        assert_eq!(collection.slots(), &[stack(2, 9), None, None]);
        assert_eq!(report.stats.moves, 1);
    }

    #[test]
    fn test_packed_group_left_alone() {
        let (collection, report) = run(vec![stack(1, 64), stack(1, 64), stack(1, 5)], OrderingKey::Name, true);

        assert_eq!(collection.slots(), &[stack(1, 64), stack(1, 64), stack(1, 5)]);
        assert_eq!(report.groups_merged, 0);
        assert!(report.is_noop());
    }

    #[test]
    fn test_pack_spills_into_later_positions() {
        let (collection, _) = run(
            vec![stack(1, 10), stack(1, 60), stack(3, 9), stack(1, 64), stack(3, 5), stack(1, 5)],
            OrderingKey::Name,
            true,
        );

        // 139 A over max 64 -> 64, 64, 11; 14 C over max 16 -> 14
        assert_eq!(
            collection.slots(),
            &[stack(1, 64), stack(1, 64), stack(1, 11), stack(3, 14), None, None]
        );
    }

    #[test]
    fn test_quantity_key() {
        let (collection, _) = run(vec![stack(1, 2), stack(2, 30), None, stack(3, 16)], OrderingKey::Quantity, false);

        assert_eq!(collection.slots(), &[stack(2, 30), stack(3, 16), stack(1, 2), None]);
    }

    #[test]
    fn test_type_key() {
        let (collection, _) = run(vec![stack(3, 1), stack(1, 2), stack(2, 3)], OrderingKey::Type, false);

        assert_eq!(collection.slots(), &[stack(2, 3), stack(1, 2), stack(3, 1)]);
    }

    #[test]
    fn test_only_range_is_touched() {
        let registry = registry();
        let mut collection = Collection::from_slots(vec![stack(2, 1), stack(2, 2), stack(1, 1), stack(1, 3)]);

        Reorganizer::new(&registry).reorganize(
            &mut collection,
            SlotRange::new(1, 3),
            OrderingKey::Name,
            true,
            &OperationStrategy::exchange(),
        );

        assert_eq!(collection.slots(), &[stack(2, 1), stack(1, 1), stack(2, 2), stack(1, 3)]);
    }

    #[test]
    fn test_records_actions_when_asked() {
        let registry = registry();
        let mut collection = Collection::from_slots(vec![stack(2, 1), stack(1, 1)]);
        let range = SlotRange::full(2);
        let mut view = SlotView::new(&mut collection, range).recording();

        let report = Reorganizer::new(&registry).reorganize_view(
            &mut view,
            range,
            OrderingKey::Name,
            false,
            &OperationStrategy::exchange(),
        );

        assert_eq!(report.actions.len(), 3);
        assert_eq!(report.stats.actions, 3);
    }

    #[test]
    fn test_reused_view_reports_only_its_run() {
        let registry = registry();
        let mut collection = Collection::from_slots(vec![stack(2, 1), stack(1, 1), stack(1, 2)]);
        let range = SlotRange::full(3);
        let mut view = SlotView::new(&mut collection, range).recording();
        let reorganizer = Reorganizer::new(&registry);
        let strategy = OperationStrategy::exchange();

        let first = reorganizer.reorganize_view(&mut view, range, OrderingKey::Name, false, &strategy);
        let second = reorganizer.reorganize_view(&mut view, range, OrderingKey::Name, true, &strategy);

        assert_eq!(first.actions.len(), first.stats.actions);
        assert!(second.groups_merged == 1 && !second.actions.is_empty());
        assert_eq!(second.actions.len(), second.stats.actions);
        assert_eq!(second.actions, view.journal()[first.actions.len()..].to_vec());
        assert_eq!(view.journal().len(), first.actions.len() + second.actions.len());
    }

    #[test]
    fn test_minimal_unpacked_group_kept() {
        let (collection, report) = run(vec![stack(1, 5), stack(1, 64)], OrderingKey::Type, true);

        assert_eq!(collection.slots(), &[stack(1, 5), stack(1, 64)]);
        assert_eq!(report.groups_merged, 0);
        assert!(report.is_noop());
    }
}
