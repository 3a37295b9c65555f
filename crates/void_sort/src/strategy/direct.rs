//! Direct strategy: in-place slot writes

use super::{assert_vacant, transferable, SlotStrategy};
use crate::view::{SlotAction, SlotView};
use void_inventory::ItemStack;

/// Writes slots directly. Each call is one atomic mutation; every slot it
/// touches is reported as a [`SlotAction::Write`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectStrategy;

impl DirectStrategy {
    fn write(view: &mut SlotView<'_>, slot: usize, stack: Option<ItemStack>) -> Option<ItemStack> {
        let previous = std::mem::replace(view.slot_mut(slot), stack);
        view.record(SlotAction::Write { slot, stack });
        previous
    }
}

impl SlotStrategy for DirectStrategy {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn swap(&self, view: &mut SlotView<'_>, a: usize, b: usize) {
        if a == b {
            return;
        }
        view.stats_mut().swaps += 1;
        let first = view.slot_mut(a).take();
        let second = Self::write(view, b, first);
        Self::write(view, a, second);
    }

    fn move_stack(&self, view: &mut SlotView<'_>, src: usize, dst: usize) {
        assert_vacant(view, dst);
        if src == dst || view.is_vacant(src) {
            return;
        }
        view.stats_mut().moves += 1;
        let stack = Self::write(view, src, None);
        Self::write(view, dst, stack);
    }

    fn stack_transfer(&self, view: &mut SlotView<'_>, src: usize, dst: usize) -> bool {
        if transferable(view, src, dst).is_none() {
            return false;
        }
        view.stats_mut().transfers += 1;

        let source = view.slot_mut(src).take();
        let mut target = view.slot_mut(dst).take();
        let rest = match (&mut target, source) {
            (Some(target), Some(source)) => target.merge_from(source),
            (_, source) => source,
        };
        Self::write(view, dst, target);
        Self::write(view, src, rest);
        true
    }

    fn clear(&self, view: &mut SlotView<'_>, slot: usize) -> Option<ItemStack> {
        if view.is_vacant(slot) {
            return None;
        }
        view.stats_mut().clears += 1;
        Self::write(view, slot, None)
    }

    fn set(&self, view: &mut SlotView<'_>, slot: usize, stack: Option<ItemStack>) -> Option<ItemStack> {
        view.stats_mut().sets += 1;
        Self::write(view, slot, stack)
    }
}
