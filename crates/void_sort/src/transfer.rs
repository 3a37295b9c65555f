//! Transfer engine: move stacks between two slot ranges
//!
//! Each depositor stack first tops up same-item stacks in the receiver and
//! only then takes an empty receiver slot. Every step is a strategy
//! primitive, so stopping early never loses items.

use crate::strategy::SlotStrategy;
use crate::view::{OperationStats, SlotAction, SlotView};
use serde::{Deserialize, Serialize};
use std::fmt;
use void_inventory::{Collection, LinkedSlots, SlotRange};

/// Which side gives up its stacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferDirection {
    /// Source into destination
    Deposit,
    /// Destination into source
    Withdraw,
}

impl TransferDirection {
    /// Pick a direction from the empty slot counts of both sides.
    ///
    /// Deposit only when the destination has strictly more room; ties
    /// withdraw toward the source.
    pub fn from_vacancy(source_empty: usize, dest_empty: usize) -> Self {
        if dest_empty > source_empty {
            Self::Deposit
        } else {
            Self::Withdraw
        }
    }

    /// The other direction
    pub fn reversed(self) -> Self {
        match self {
            Self::Deposit => Self::Withdraw,
            Self::Withdraw => Self::Deposit,
        }
    }
}

impl fmt::Display for TransferDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit => write!(f, "deposit"),
            Self::Withdraw => write!(f, "withdraw"),
        }
    }
}

/// Summary of one transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReport {
    pub direction: TransferDirection,
    /// Item units that changed sides
    pub units_moved: u64,
    /// Depositor stacks the receiver had no room for, fully or partly
    pub stacks_left: usize,
    pub stats: OperationStats,
    /// Primitive actions issued by this transfer (empty unless the view records)
    pub actions: Vec<SlotAction>,
}

impl TransferReport {
    /// Check if everything on the depositor side was moved
    pub fn is_complete(&self) -> bool {
        self.stacks_left == 0
    }
}

/// Direction [`smart_transfer`] would choose for these ranges
pub fn choose_direction(
    source: &Collection,
    source_range: SlotRange,
    dest: &Collection,
    dest_range: SlotRange,
) -> TransferDirection {
    TransferDirection::from_vacancy(source.empty_count(source_range), dest.empty_count(dest_range))
}

/// Move stacks between two collections, picking the direction from their
/// empty slot counts
pub fn smart_transfer(
    source: &mut Collection,
    source_range: SlotRange,
    dest: &mut Collection,
    dest_range: SlotRange,
    strategy: &dyn SlotStrategy,
) -> TransferReport {
    assert_fits(source, source_range, "source");
    assert_fits(dest, dest_range, "destination");
    let direction = choose_direction(source, source_range, dest, dest_range);
    transfer(source, source_range, dest, dest_range, direction, strategy)
}

/// Move every source stack the destination has room for
pub fn deposit(
    source: &mut Collection,
    source_range: SlotRange,
    dest: &mut Collection,
    dest_range: SlotRange,
    strategy: &dyn SlotStrategy,
) -> TransferReport {
    transfer(source, source_range, dest, dest_range, TransferDirection::Deposit, strategy)
}

/// Move every destination stack the source has room for
pub fn withdraw(
    source: &mut Collection,
    source_range: SlotRange,
    dest: &mut Collection,
    dest_range: SlotRange,
    strategy: &dyn SlotStrategy,
) -> TransferReport {
    transfer(source, source_range, dest, dest_range, TransferDirection::Withdraw, strategy)
}

/// Move stacks between two collections in a fixed direction.
///
/// # Panics
///
/// Panics if a range does not fit its collection.
pub fn transfer(
    source: &mut Collection,
    source_range: SlotRange,
    dest: &mut Collection,
    dest_range: SlotRange,
    direction: TransferDirection,
    strategy: &dyn SlotStrategy,
) -> TransferReport {
    assert_fits(source, source_range, "source");
    assert_fits(dest, dest_range, "destination");
    let mut linked = LinkedSlots::new(source, dest);
    let linked_dest = linked.second_range(dest_range);
    let mut view = SlotView::with_ranges(&mut linked, vec![source_range, linked_dest]);
    transfer_view(&mut view, source_range, linked_dest, direction, strategy)
}

/// Move stacks between two disjoint ranges of one collection.
///
/// # Panics
///
/// Panics if a range does not fit the collection or the ranges overlap.
pub fn smart_transfer_within(
    collection: &mut Collection,
    source_range: SlotRange,
    dest_range: SlotRange,
    strategy: &dyn SlotStrategy,
) -> TransferReport {
    let mut view = SlotView::with_ranges(collection, vec![source_range, dest_range]);
    let direction =
        TransferDirection::from_vacancy(view.vacant_count(source_range), view.vacant_count(dest_range));
    transfer_view(&mut view, source_range, dest_range, direction, strategy)
}

/// Move stacks between two ranges of a view
pub fn transfer_view(
    view: &mut SlotView<'_>,
    source_range: SlotRange,
    dest_range: SlotRange,
    direction: TransferDirection,
    strategy: &dyn SlotStrategy,
) -> TransferReport {
    let (from, to) = match direction {
        TransferDirection::Deposit => (source_range, dest_range),
        TransferDirection::Withdraw => (dest_range, source_range),
    };
    let before = view.stats();
    let journal_start = view.journal().len();
    let received_before = units_in(view, to);

    let mut stacks_left = 0;
    for src in from.indices() {
        if view.is_vacant(src) {
            continue;
        }
        for dst in to.indices() {
            if view.is_vacant(src) {
                break;
            }
            strategy.stack_transfer(view, src, dst);
        }
        if view.is_vacant(src) {
            continue;
        }
        match to.indices().find(|&dst| view.is_vacant(dst)) {
            Some(dst) => strategy.move_stack(view, src, dst),
            None => stacks_left += 1,
        }
    }

    let units_moved = units_in(view, to) - received_before;
    let stats = view.stats() - before;
    if stacks_left > 0 {
        log::warn!(
            "{}: receiver {:?} is full, {} stacks stay in {:?}",
            direction,
            to,
            stacks_left,
            from
        );
    }
    log::debug!(
        "{} {:?} -> {:?} with {} strategy: {} units moved, {} operations",
        direction,
        from,
        to,
        strategy.name(),
        units_moved,
        stats.operations()
    );
    TransferReport {
        direction,
        units_moved,
        stacks_left,
        stats,
        actions: view.journal_since(journal_start),
    }
}

fn assert_fits(collection: &Collection, range: SlotRange, side: &str) {
    assert!(
        collection.contains_range(range),
        "{} range {:?} does not fit {} slots",
        side,
        range,
        collection.capacity()
    );
}

fn units_in(view: &SlotView<'_>, range: SlotRange) -> u64 {
    range
        .indices()
        .filter_map(|i| view.get(i))
        .map(|s| u64::from(s.quantity()))
        .sum()
}
