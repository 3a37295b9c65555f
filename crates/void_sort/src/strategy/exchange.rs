//! Exchange strategy: every mutation goes through a carry register
//!
//! This is the request/acknowledge model of a client that cannot write
//! slots, only click them. A toggle picks a stack up, puts it down, tops up
//! a same-item stack, or trades the carried stack for the slot's. The carry
//! is empty again whenever a call returns.

use super::{assert_vacant, transferable, SlotStrategy};
use crate::view::{SlotAction, SlotView};
use void_inventory::ItemStack;

/// Expresses each operation as 2-3 toggles against a carry register
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExchangeStrategy;

/// The single implicit carry slot, scoped to one strategy call
#[derive(Default)]
struct Carry {
    held: Option<ItemStack>,
}

impl Carry {
    fn toggle(&mut self, view: &mut SlotView<'_>, slot: usize) {
        view.record(SlotAction::Toggle(slot));
        let current = view.slot_mut(slot).take();
        let (placed, carried) = match (self.held.take(), current) {
            (None, current) => (None, current),
            (Some(held), None) => (Some(held), None),
            (Some(held), Some(mut current)) if current.same_item(&held) => {
                let rest = current.merge_from(held);
                (Some(current), rest)
            }
            (Some(held), Some(current)) => (Some(held), Some(current)),
        };
        *view.slot_mut(slot) = placed;
        self.held = carried;
    }

    fn split(&mut self, view: &mut SlotView<'_>, slot: usize, amount: u32) {
        debug_assert!(self.held.is_none(), "split with a non-empty carry");
        view.record(SlotAction::Split { slot, amount });
        let contents = view.slot_mut(slot);
        let whole = contents.as_ref().is_some_and(|s| amount >= s.quantity());
        self.held = if whole {
            contents.take()
        } else {
            contents.as_mut().and_then(|s| s.split_off(amount))
        };
    }

    fn supply(&mut self, view: &mut SlotView<'_>, stack: ItemStack) {
        debug_assert!(self.held.is_none(), "supply with a non-empty carry");
        view.record(SlotAction::Supply(stack));
        self.held = Some(stack);
    }

    fn release(&mut self, view: &mut SlotView<'_>) -> Option<ItemStack> {
        view.record(SlotAction::Release);
        self.held.take()
    }

    fn finish(self) {
        assert!(
            self.held.is_none(),
            "exchange call left {:?} in the carry register",
            self.held
        );
    }
}

impl SlotStrategy for ExchangeStrategy {
    fn name(&self) -> &'static str {
        "exchange"
    }

    fn swap(&self, view: &mut SlotView<'_>, a: usize, b: usize) {
        if a == b {
            return;
        }
        let (first, second) = (view.get(a).copied(), view.get(b).copied());
        let mut carry = Carry::default();
        match (first, second) {
            (None, None) => return,
            // Toggling one same-item stack onto the other would merge them,
            // so shift only the quantity difference.
            (Some(x), Some(y)) if x.same_item(&y) => {
                if x.quantity() != y.quantity() {
                    let (from, to, amount) = if x.quantity() > y.quantity() {
                        (a, b, x.quantity() - y.quantity())
                    } else {
                        (b, a, y.quantity() - x.quantity())
                    };
                    carry.split(view, from, amount);
                    carry.toggle(view, to);
                }
            }
            (None, Some(_)) => {
                carry.toggle(view, b);
                carry.toggle(view, a);
            }
            (Some(_), None) => {
                carry.toggle(view, a);
                carry.toggle(view, b);
            }
            (Some(_), Some(_)) => {
                carry.toggle(view, a);
                carry.toggle(view, b);
                carry.toggle(view, a);
            }
        }
        carry.finish();
        view.stats_mut().swaps += 1;
    }

    fn move_stack(&self, view: &mut SlotView<'_>, src: usize, dst: usize) {
        assert_vacant(view, dst);
        if src == dst || view.is_vacant(src) {
            return;
        }
        let mut carry = Carry::default();
        carry.toggle(view, src);
        carry.toggle(view, dst);
        carry.finish();
        view.stats_mut().moves += 1;
    }

    fn stack_transfer(&self, view: &mut SlotView<'_>, src: usize, dst: usize) -> bool {
        if transferable(view, src, dst).is_none() {
            return false;
        }
        let mut carry = Carry::default();
        carry.toggle(view, src);
        carry.toggle(view, dst);
        if carry.held.is_some() {
            // dst could not take everything; put the rest back where it came from
            carry.toggle(view, src);
        }
        carry.finish();
        view.stats_mut().transfers += 1;
        true
    }

    fn clear(&self, view: &mut SlotView<'_>, slot: usize) -> Option<ItemStack> {
        if view.is_vacant(slot) {
            return None;
        }
        let mut carry = Carry::default();
        carry.toggle(view, slot);
        let taken = carry.release(view);
        carry.finish();
        view.stats_mut().clears += 1;
        taken
    }

    fn set(&self, view: &mut SlotView<'_>, slot: usize, stack: Option<ItemStack>) -> Option<ItemStack> {
        let mut carry = Carry::default();
        let previous = if view.is_vacant(slot) {
            None
        } else {
            carry.toggle(view, slot);
            carry.release(view)
        };
        if let Some(stack) = stack {
            carry.supply(view, stack);
            carry.toggle(view, slot);
        }
        carry.finish();
        view.stats_mut().sets += 1;
        previous
    }
}
