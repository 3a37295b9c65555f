//! Range-checked slot access for strategies

use std::ops::{AddAssign, Sub};
use void_inventory::{ItemStack, SlotRange, SlotStore};

/// Primitive action issued by a strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotAction {
    /// Direct overwrite of a slot with the given contents
    Write {
        slot: usize,
        stack: Option<ItemStack>,
    },
    /// Pick up, place, merge or exchange the carried stack with a slot
    Toggle(usize),
    /// Pick up part of a slot's stack into the empty carry
    Split { slot: usize, amount: u32 },
    /// Load the carry with a stack handed in by the caller
    Supply(ItemStack),
    /// Hand the carried stack back to the caller
    Release,
}

/// Counters for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperationStats {
    /// Logical swaps
    pub swaps: usize,
    /// Logical moves into empty slots
    pub moves: usize,
    /// Stack transfers that moved items
    pub transfers: usize,
    /// Slots cleared
    pub clears: usize,
    /// Slots overwritten
    pub sets: usize,
    /// Primitive actions issued
    pub actions: usize,
}

impl OperationStats {
    /// Total logical operations
    pub fn operations(&self) -> usize {
        self.swaps + self.moves + self.transfers + self.clears + self.sets
    }
}

impl AddAssign for OperationStats {
    fn add_assign(&mut self, other: Self) {
        self.swaps += other.swaps;
        self.moves += other.moves;
        self.transfers += other.transfers;
        self.clears += other.clears;
        self.sets += other.sets;
        self.actions += other.actions;
    }
}

impl Sub for OperationStats {
    type Output = Self;

    fn sub(self, earlier: Self) -> Self {
        Self {
            swaps: self.swaps - earlier.swaps,
            moves: self.moves - earlier.moves,
            transfers: self.transfers - earlier.transfers,
            clears: self.clears - earlier.clears,
            sets: self.sets - earlier.sets,
            actions: self.actions - earlier.actions,
        }
    }
}

/// A borrowed slot store restricted to the ranges the caller approved.
///
/// Touching an index outside every approved range panics.
pub struct SlotView<'a> {
    store: &'a mut dyn SlotStore,
    ranges: Vec<SlotRange>,
    stats: OperationStats,
    journal: Option<Vec<SlotAction>>,
}

impl<'a> SlotView<'a> {
    /// View over a single range
    pub fn new(store: &'a mut dyn SlotStore, range: SlotRange) -> Self {
        Self::with_ranges(store, vec![range])
    }

    /// View over several disjoint ranges.
    ///
    /// # Panics
    ///
    /// Panics if a range does not fit the store or two ranges overlap.
    pub fn with_ranges(store: &'a mut dyn SlotStore, ranges: Vec<SlotRange>) -> Self {
        let len = store.len();
        for (i, range) in ranges.iter().enumerate() {
            assert!(
                range.end <= len,
                "slot range {:?} does not fit a store of {} slots",
                range,
                len
            );
            for other in &ranges[i + 1..] {
                assert!(!range.overlaps(other), "slot ranges {:?} and {:?} overlap", range, other);
            }
        }
        Self {
            store,
            ranges,
            stats: OperationStats::default(),
            journal: None,
        }
    }

    /// Keep a journal of every primitive action
    pub fn recording(mut self) -> Self {
        self.journal = Some(Vec::new());
        self
    }

    /// Check if a journal is kept
    pub fn is_recording(&self) -> bool {
        self.journal.is_some()
    }

    /// Approved ranges
    pub fn ranges(&self) -> &[SlotRange] {
        &self.ranges
    }

    /// Check if an index is inside an approved range
    pub fn allows(&self, index: usize) -> bool {
        self.ranges.iter().any(|r| r.contains(index))
    }

    /// Contents of a slot
    pub fn get(&self, index: usize) -> Option<&ItemStack> {
        self.check(index);
        self.store.get(index)
    }

    /// Check if a slot is empty
    pub fn is_vacant(&self, index: usize) -> bool {
        self.get(index).is_none()
    }

    /// Number of empty slots in a range
    pub fn vacant_count(&self, range: SlotRange) -> usize {
        range.indices().filter(|&i| self.is_vacant(i)).count()
    }

    /// Counters accumulated so far
    pub fn stats(&self) -> OperationStats {
        self.stats
    }

    /// Journal accumulated so far (empty unless recording)
    pub fn journal(&self) -> &[SlotAction] {
        self.journal.as_deref().unwrap_or(&[])
    }

    /// Actions recorded from position `start` of the journal onwards
    pub fn journal_since(&self, start: usize) -> Vec<SlotAction> {
        let journal = self.journal();
        journal[start.min(journal.len())..].to_vec()
    }

    /// Drain the journal
    pub fn take_journal(&mut self) -> Vec<SlotAction> {
        self.journal.as_mut().map(std::mem::take).unwrap_or_default()
    }

    pub(crate) fn slot_mut(&mut self, index: usize) -> &mut Option<ItemStack> {
        self.check(index);
        self.store.get_mut(index)
    }

    pub(crate) fn stats_mut(&mut self) -> &mut OperationStats {
        &mut self.stats
    }

    pub(crate) fn record(&mut self, action: SlotAction) {
        log::trace!("slot action {:?}", action);
        self.stats.actions += 1;
        if let Some(journal) = &mut self.journal {
            journal.push(action);
        }
    }

    fn check(&self, index: usize) {
        assert!(
            self.allows(index),
            "slot {} is outside the approved ranges {:?}",
            index,
            self.ranges
        );
    }
}
