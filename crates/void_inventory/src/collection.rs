//! Fixed-size slot collections and the ranges the sorter may touch

use crate::item::{ItemId, ItemStack, StackError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::ops::Range;

/// A contiguous run of slot indices (`start..end`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotRange {
    /// First index in the range
    pub start: usize,
    /// One past the last index
    pub end: usize,
}

impl SlotRange {
    /// Create a range.
    ///
    /// # Panics
    ///
    /// Panics if `start > end`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(start <= end, "slot range start {} is past its end {}", start, end);
        Self { start, end }
    }

    /// Range covering `0..len`
    pub fn full(len: usize) -> Self {
        Self { start: 0, end: len }
    }

    /// Number of slots in the range
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the range has no slots
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if an index lies in the range
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }

    /// Indices of the range, ascending
    #[inline]
    pub fn indices(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Same range shifted by `by` slots
    pub fn offset(&self, by: usize) -> Self {
        Self {
            start: self.start + by,
            end: self.end + by,
        }
    }

    /// Check if two ranges share any index
    pub fn overlaps(&self, other: &SlotRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl From<Range<usize>> for SlotRange {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// Addressable slot storage the strategies mutate.
///
/// Indexing past `len()` is a caller bug and panics.
pub trait SlotStore {
    /// Number of addressable slots
    fn len(&self) -> usize;

    /// Contents of a slot (`None` = empty)
    fn get(&self, index: usize) -> Option<&ItemStack>;

    /// Mutable access to a slot
    fn get_mut(&mut self, index: usize) -> &mut Option<ItemStack>;

    /// Check if the store has no slots
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An ordered, fixed-length sequence of slots.
///
/// Every stack of one item carries the same max stack; constructors and
/// `set_slot` reject anything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CollectionRecord", into = "CollectionRecord")]
pub struct Collection {
    /// Slot contents (None = empty)
    slots: Vec<Option<ItemStack>>,
}

/// Serialized form of a collection, validated on the way in
#[derive(Serialize, Deserialize)]
struct CollectionRecord {
    slots: Vec<Option<ItemStack>>,
}

impl TryFrom<CollectionRecord> for Collection {
    type Error = StackError;

    fn try_from(record: CollectionRecord) -> Result<Self, Self::Error> {
        Collection::try_from_slots(record.slots)
    }
}

impl From<Collection> for CollectionRecord {
    fn from(collection: Collection) -> Self {
        Self {
            slots: collection.slots,
        }
    }
}

/// Fails on the first item seen with two different max stacks
fn check_max_stacks<'a>(stacks: impl IntoIterator<Item = &'a ItemStack>) -> Result<(), StackError> {
    let mut seen: HashMap<ItemId, u32> = HashMap::new();
    for stack in stacks {
        let first = *seen.entry(stack.item()).or_insert(stack.max_stack());
        if first != stack.max_stack() {
            return Err(StackError::MixedMaxStack {
                item: stack.item(),
                first,
                second: stack.max_stack(),
            });
        }
    }
    Ok(())
}

impl Collection {
    /// Create a collection of `capacity` empty slots
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    /// Create a collection from existing slot contents
    pub fn try_from_slots(slots: Vec<Option<ItemStack>>) -> Result<Self, StackError> {
        check_max_stacks(slots.iter().flatten())?;
        Ok(Self { slots })
    }

    /// Create a collection from existing slot contents.
    ///
    /// # Panics
    ///
    /// Panics if two stacks of one item have different max stacks. Use
    /// [`Collection::try_from_slots`] for untrusted input.
    pub fn from_slots(slots: Vec<Option<ItemStack>>) -> Self {
        match Self::try_from_slots(slots) {
            Ok(collection) => collection,
            Err(e) => panic!("invalid collection: {}", e),
        }
    }

    /// Number of slots
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// All slots
    pub fn slots(&self) -> &[Option<ItemStack>] {
        &self.slots
    }

    /// Slots of a range
    pub fn range_slots(&self, range: SlotRange) -> &[Option<ItemStack>] {
        &self.slots[range.indices()]
    }

    /// Get slot contents
    pub fn get_slot(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot)?.as_ref()
    }

    /// Replace a slot, returning the previous contents.
    ///
    /// Fails if another slot holds the same item with a different max stack.
    pub fn try_set_slot(
        &mut self,
        slot: usize,
        stack: Option<ItemStack>,
    ) -> Result<Option<ItemStack>, StackError> {
        if let Some(new) = &stack {
            let conflict = self
                .slots
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != slot)
                .filter_map(|(_, s)| s.as_ref())
                .find(|s| s.same_item(new) && s.max_stack() != new.max_stack());
            if let Some(existing) = conflict {
                return Err(StackError::MixedMaxStack {
                    item: new.item(),
                    first: existing.max_stack(),
                    second: new.max_stack(),
                });
            }
        }
        Ok(std::mem::replace(&mut self.slots[slot], stack))
    }

    /// Replace a slot, returning the previous contents.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of bounds or the stack's max stack disagrees
    /// with another stack of the same item.
    pub fn set_slot(&mut self, slot: usize, stack: Option<ItemStack>) -> Option<ItemStack> {
        match self.try_set_slot(slot, stack) {
            Ok(previous) => previous,
            Err(e) => panic!("invalid slot contents: {}", e),
        }
    }

    /// Check that both collections agree on every shared item's max stack
    pub fn check_compatible(&self, other: &Collection) -> Result<(), StackError> {
        check_max_stacks(self.slots.iter().chain(&other.slots).flatten())
    }

    /// Check if a range fits inside this collection
    pub fn contains_range(&self, range: SlotRange) -> bool {
        range.end <= self.slots.len()
    }

    /// Get number of used slots
    pub fn used_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Number of empty slots in a range
    pub fn empty_count(&self, range: SlotRange) -> usize {
        self.range_slots(range).iter().filter(|s| s.is_none()).count()
    }

    /// Occupied slots of a range with their indices
    pub fn occupied(&self, range: SlotRange) -> impl Iterator<Item = (usize, &ItemStack)> {
        self.range_slots(range)
            .iter()
            .enumerate()
            .filter_map(move |(i, s)| s.as_ref().map(|stack| (range.start + i, stack)))
    }

    /// Count total quantity of an item in a range
    pub fn count_item(&self, item: ItemId, range: SlotRange) -> u64 {
        self.occupied(range)
            .filter(|(_, s)| s.item() == item)
            .map(|(_, s)| u64::from(s.quantity()))
            .sum()
    }

    /// Total quantity per item type in a range
    pub fn totals(&self, range: SlotRange) -> BTreeMap<ItemId, u64> {
        let mut totals = BTreeMap::new();
        for (_, stack) in self.occupied(range) {
            *totals.entry(stack.item()).or_insert(0) += u64::from(stack.quantity());
        }
        totals
    }
}

impl SlotStore for Collection {
    fn len(&self) -> usize {
        self.slots.len()
    }

    fn get(&self, index: usize) -> Option<&ItemStack> {
        self.slots[index].as_ref()
    }

    fn get_mut(&mut self, index: usize) -> &mut Option<ItemStack> {
        &mut self.slots[index]
    }
}

/// Two collections addressed as one slot space.
///
/// Indices `0..first.capacity()` map to the first collection, the rest to
/// the second, the way a container screen lays out its slots.
pub struct LinkedSlots<'a> {
    first: &'a mut Collection,
    second: &'a mut Collection,
}

impl<'a> LinkedSlots<'a> {
    /// Link two collections.
    ///
    /// # Panics
    ///
    /// Panics if the collections disagree on an item's max stack.
    pub fn new(first: &'a mut Collection, second: &'a mut Collection) -> Self {
        if let Err(e) = first.check_compatible(second) {
            panic!("cannot link collections: {}", e);
        }
        Self { first, second }
    }

    /// Index at which the second collection starts
    pub fn second_offset(&self) -> usize {
        self.first.capacity()
    }

    /// Translate a range of the second collection into linked indices
    pub fn second_range(&self, range: SlotRange) -> SlotRange {
        range.offset(self.second_offset())
    }
}

impl SlotStore for LinkedSlots<'_> {
    fn len(&self) -> usize {
        self.first.capacity() + self.second.capacity()
    }

    fn get(&self, index: usize) -> Option<&ItemStack> {
        let offset = self.second_offset();
        if index < offset {
            SlotStore::get(&*self.first, index)
        } else {
            SlotStore::get(&*self.second, index - offset)
        }
    }

    fn get_mut(&mut self, index: usize) -> &mut Option<ItemStack> {
        let offset = self.second_offset();
        if index < offset {
            self.first.get_mut(index)
        } else {
            self.second.get_mut(index - offset)
        }
    }
}
