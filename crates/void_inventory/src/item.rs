//! Item ids and stacks

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Numeric item type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl ItemId {
    /// Get the raw id
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for ItemId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Errors raised when building a stack that would break its invariants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StackError {
    /// Empty slots are `None`, never a zero-quantity stack
    #[error("Stack of {item} has zero quantity")]
    ZeroQuantity { item: ItemId },
    /// Max stack must be at least one
    #[error("Item {item} has a max stack of zero")]
    ZeroMaxStack { item: ItemId },
    /// Quantity above the item's max stack
    #[error("Stack of {item} holds {quantity}, above its max stack of {max_stack}")]
    Overfull {
        item: ItemId,
        quantity: u32,
        max_stack: u32,
    },
    /// Two stacks of one item disagree on its max stack
    #[error("Item {item} appears with max stacks {first} and {second}")]
    MixedMaxStack { item: ItemId, first: u32, second: u32 },
}

/// A non-empty quantity of one item type occupying one slot.
///
/// `max_stack` is copied from the item's definition when the stack is built
/// and never changes afterwards. An empty slot is represented as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "StackRecord", into = "StackRecord")]
pub struct ItemStack {
    item: ItemId,
    quantity: u32,
    max_stack: u32,
}

impl ItemStack {
    /// Build a stack, validating `1 <= quantity <= max_stack`
    pub fn try_new(item: impl Into<ItemId>, quantity: u32, max_stack: u32) -> Result<Self, StackError> {
        let item = item.into();
        if max_stack == 0 {
            return Err(StackError::ZeroMaxStack { item });
        }
        if quantity == 0 {
            return Err(StackError::ZeroQuantity { item });
        }
        if quantity > max_stack {
            return Err(StackError::Overfull {
                item,
                quantity,
                max_stack,
            });
        }
        Ok(Self {
            item,
            quantity,
            max_stack,
        })
    }

    /// Build a stack.
    ///
    /// # Panics
    ///
    /// Panics if the quantity is zero or above `max_stack`. Use
    /// [`ItemStack::try_new`] for untrusted input.
    pub fn new(item: impl Into<ItemId>, quantity: u32, max_stack: u32) -> Self {
        match Self::try_new(item, quantity, max_stack) {
            Ok(stack) => stack,
            Err(e) => panic!("invalid item stack: {}", e),
        }
    }

    /// Item type of this stack
    #[inline]
    pub fn item(&self) -> ItemId {
        self.item
    }

    /// Number of items in the stack
    #[inline]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Max stack size of the item type
    #[inline]
    pub fn max_stack(&self) -> u32 {
        self.max_stack
    }

    /// Room left before the stack is full
    #[inline]
    pub fn space(&self) -> u32 {
        self.max_stack - self.quantity
    }

    /// Check if the stack is at its max size
    #[inline]
    pub fn is_full(&self) -> bool {
        self.quantity == self.max_stack
    }

    /// Check if both stacks hold the same item type
    #[inline]
    pub fn same_item(&self, other: &ItemStack) -> bool {
        self.item == other.item
    }

    /// Merge `other` into this stack.
    ///
    /// Returns whatever did not fit. A stack of a different item is handed
    /// back untouched.
    pub fn merge_from(&mut self, mut other: ItemStack) -> Option<ItemStack> {
        if !self.same_item(&other) {
            return Some(other);
        }
        let moved = other.quantity.min(self.space());
        self.quantity += moved;
        other.quantity -= moved;
        if other.quantity == 0 {
            None
        } else {
            Some(other)
        }
    }

    /// Split `amount` items off into a new stack.
    ///
    /// Returns `None` unless `0 < amount < quantity`; taking the whole stack
    /// is done by taking the slot itself.
    pub fn split_off(&mut self, amount: u32) -> Option<ItemStack> {
        if amount == 0 || amount >= self.quantity {
            return None;
        }
        self.quantity -= amount;
        Some(ItemStack {
            item: self.item,
            quantity: amount,
            max_stack: self.max_stack,
        })
    }
}

impl fmt::Display for ItemStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.item, self.quantity)
    }
}

/// Serialized form of a stack, validated on the way in
#[derive(Serialize, Deserialize)]
struct StackRecord {
    item: ItemId,
    quantity: u32,
    max_stack: u32,
}

impl TryFrom<StackRecord> for ItemStack {
    type Error = StackError;

    fn try_from(record: StackRecord) -> Result<Self, Self::Error> {
        ItemStack::try_new(record.item, record.quantity, record.max_stack)
    }
}

impl From<ItemStack> for StackRecord {
    fn from(stack: ItemStack) -> Self {
        Self {
            item: stack.item,
            quantity: stack.quantity,
            max_stack: stack.max_stack,
        }
    }
}
