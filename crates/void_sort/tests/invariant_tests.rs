//! Invariant tests for void_sort
//!
//! These tests check properties that must hold for every input, over
//! seeded random inventories.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use void_inventory::*;
use void_sort::*;

const ROUNDS: u64 = 200;

fn registry() -> ItemRegistry {
    let _ = env_logger::builder().is_test(true).try_init();
    ItemRegistry::new()
        .with(ItemDefinition::new(1, "Dirt").with_category("block"))
        .and_then(|r| r.with(ItemDefinition::new(2, "apple").with_category("food")))
        .and_then(|r| r.with(ItemDefinition::new(3, "Ender Pearl").with_max_stack(16).with_category("misc")))
        .and_then(|r| r.with(ItemDefinition::new(4, "Pickaxe").with_max_stack(1).with_category("tool")))
        .and_then(|r| r.with(ItemDefinition::new(5, "Bread").with_category("food")))
        .expect("registry builds")
}

/// A random collection; id 6 is deliberately missing from the registry
fn random_collection(rng: &mut StdRng, registry: &ItemRegistry, capacity: usize) -> Collection {
    let slots = (0..capacity)
        .map(|_| {
            if rng.gen_bool(0.35) {
                return None;
            }
            let id = rng.gen_range(1..=6u32);
            let max_stack = registry.max_stack(ItemId(id)).unwrap_or(64);
            Some(ItemStack::new(id, rng.gen_range(1..=max_stack), max_stack))
        })
        .collect();
    Collection::from_slots(slots)
}

fn random_key(rng: &mut StdRng) -> OrderingKey {
    OrderingKey::ALL[rng.gen_range(0..OrderingKey::ALL.len())]
}

/// Delegates to a strategy and checks item totals after every call
struct ConservationCheck {
    inner: OperationStrategy,
    expected: BTreeMap<ItemId, u64>,
}

impl ConservationCheck {
    fn new(inner: OperationStrategy, view: &SlotView<'_>) -> Self {
        let expected = totals(view);
        Self { inner, expected }
    }

    fn check(&self, view: &SlotView<'_>, call: &str) {
        assert_eq!(totals(view), self.expected, "totals changed by {}", call);
    }
}

fn totals(view: &SlotView<'_>) -> BTreeMap<ItemId, u64> {
    let mut totals = BTreeMap::new();
    for range in view.ranges() {
        for stack in range.indices().filter_map(|i| view.get(i)) {
            *totals.entry(stack.item()).or_insert(0) += u64::from(stack.quantity());
        }
    }
    totals
}

impl SlotStrategy for ConservationCheck {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn swap(&self, view: &mut SlotView<'_>, a: usize, b: usize) {
        self.inner.swap(view, a, b);
        self.check(view, "swap");
    }

    fn move_stack(&self, view: &mut SlotView<'_>, src: usize, dst: usize) {
        self.inner.move_stack(view, src, dst);
        self.check(view, "move");
    }

    fn stack_transfer(&self, view: &mut SlotView<'_>, src: usize, dst: usize) -> bool {
        let moved = self.inner.stack_transfer(view, src, dst);
        self.check(view, "stack transfer");
        moved
    }

    fn clear(&self, view: &mut SlotView<'_>, slot: usize) -> Option<ItemStack> {
        self.inner.clear(view, slot)
    }

    fn set(&self, view: &mut SlotView<'_>, slot: usize, stack: Option<ItemStack>) -> Option<ItemStack> {
        self.inner.set(view, slot, stack)
    }
}

/// INVARIANT: Item totals are conserved after every primitive call
#[test]
fn invariant_conservation_per_primitive() {
    let registry = registry();
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..ROUNDS {
        let capacity = rng.gen_range(1..=27);
        let mut collection = random_collection(&mut rng, &registry, capacity);
        let range = SlotRange::full(capacity);
        let key = random_key(&mut rng);
        let merge_first = rng.gen_bool(0.5);
        let privileged = rng.gen_bool(0.5);

        let mut view = SlotView::new(&mut collection, range);
        let strategy = ConservationCheck::new(OperationStrategy::for_privilege(privileged), &view);
        Reorganizer::new(&registry).reorganize_view(&mut view, range, key, merge_first, &strategy);
    }
}

/// INVARIANT: Without merging, occupied slots come first in comparator order
#[test]
fn invariant_canonical_order() {
    let registry = registry();
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..ROUNDS {
        let capacity = rng.gen_range(1..=27);
        let mut collection = random_collection(&mut rng, &registry, capacity);
        let key = random_key(&mut rng);
        let range = SlotRange::full(capacity);

        Reorganizer::new(&registry).reorganize(&mut collection, range, key, false, &OperationStrategy::exchange());

        let ordering = StackOrdering::new(key, &registry);
        assert!(ordering.is_sorted(collection.slots()), "{:?} not sorted by {}", collection, key);
        let first_empty = collection.slots().iter().position(Option::is_none).unwrap_or(capacity);
        assert!(collection.slots()[first_empty..].iter().all(Option::is_none));
    }
}

/// INVARIANT: Merging leaves ceil(total / max_stack) slots per item
#[test]
fn invariant_merge_minimality() {
    let registry = registry();
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..ROUNDS {
        let capacity = rng.gen_range(1..=27);
        let mut collection = random_collection(&mut rng, &registry, capacity);
        let range = SlotRange::full(capacity);
        let before = collection.totals(range);

        Reorganizer::new(&registry).reorganize(
            &mut collection,
            range,
            random_key(&mut rng),
            true,
            &OperationStrategy::direct(),
        );

        assert_eq!(collection.totals(range), before);
        for (item, total) in before {
            let max_stack = collection
                .occupied(range)
                .find(|(_, s)| s.item() == item)
                .map(|(_, s)| u64::from(s.max_stack()))
                .expect("item still present");
            let used = collection.occupied(range).filter(|(_, s)| s.item() == item).count() as u64;
            assert_eq!(used, total.div_ceil(max_stack), "{} spread over {} slots", item, used);
        }
    }
}

/// INVARIANT: Reorganizing twice equals reorganizing once
#[test]
fn invariant_idempotence() {
    let registry = registry();
    let mut rng = StdRng::seed_from_u64(1234);

    for _ in 0..ROUNDS {
        let capacity = rng.gen_range(1..=27);
        let mut collection = random_collection(&mut rng, &registry, capacity);
        let range = SlotRange::full(capacity);
        let key = random_key(&mut rng);
        let merge_first = rng.gen_bool(0.5);
        let reorganizer = Reorganizer::new(&registry);
        let strategy = OperationStrategy::for_privilege(rng.gen_bool(0.5));

        reorganizer.reorganize(&mut collection, range, key, merge_first, &strategy);
        let once = collection.clone();
        let report = reorganizer.reorganize(&mut collection, range, key, merge_first, &strategy);

        assert_eq!(collection, once);
        assert!(report.is_noop(), "second pass issued {:?}", report.stats);
    }
}

/// INVARIANT: Exchange and direct strategies end in the same arrangement
#[test]
fn invariant_strategy_equivalence() {
    let registry = registry();
    let mut rng = StdRng::seed_from_u64(99);

    for _ in 0..ROUNDS {
        let capacity = rng.gen_range(1..=27);
        let mut direct = random_collection(&mut rng, &registry, capacity);
        let mut exchange = direct.clone();
        let start = rng.gen_range(0..capacity);
        let range = SlotRange::new(start, rng.gen_range(start..=capacity));
        let key = random_key(&mut rng);
        let merge_first = rng.gen_bool(0.5);
        let reorganizer = Reorganizer::new(&registry);

        let direct_report =
            reorganizer.reorganize(&mut direct, range, key, merge_first, &OperationStrategy::direct());
        let exchange_report =
            reorganizer.reorganize(&mut exchange, range, key, merge_first, &OperationStrategy::exchange());

        assert_eq!(direct, exchange);
        assert_eq!(direct_report.stats.operations(), exchange_report.stats.operations());
        assert!(exchange_report.stats.actions <= 3 * exchange_report.stats.operations());
    }
}

/// INVARIANT: Transfers conserve the grand total and agree across strategies
#[test]
fn invariant_transfer_conservation() {
    let registry = registry();
    let mut rng = StdRng::seed_from_u64(2024);

    for _ in 0..ROUNDS {
        let source_capacity = rng.gen_range(1..=36);
        let dest_capacity = rng.gen_range(1..=27);
        let source = random_collection(&mut rng, &registry, source_capacity);
        let dest = random_collection(&mut rng, &registry, dest_capacity);
        let (source_range, dest_range) = (SlotRange::full(source_capacity), SlotRange::full(dest_capacity));

        let mut grand_total = source.totals(source_range);
        for (item, quantity) in dest.totals(dest_range) {
            *grand_total.entry(item).or_insert(0) += quantity;
        }

        let mut results = Vec::new();
        for strategy in [OperationStrategy::direct(), OperationStrategy::exchange()] {
            let (mut source, mut dest) = (source.clone(), dest.clone());
            let report = smart_transfer(&mut source, source_range, &mut dest, dest_range, &strategy);

            let mut after = source.totals(source_range);
            for (item, quantity) in dest.totals(dest_range) {
                *after.entry(item).or_insert(0) += quantity;
            }
            assert_eq!(after, grand_total);
            results.push((source, dest, report.units_moved));
        }
        assert_eq!(results[0], results[1]);
    }
}
