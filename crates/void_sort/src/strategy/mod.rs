//! Operation strategies: how slot mutations are expressed
//!
//! A strategy is picked once per run from the actor's execution mode.
//! [`DirectStrategy`] mutates slots in place; [`ExchangeStrategy`] only
//! toggles stacks through a carry register, the way a client without write
//! access has to.

pub mod direct;
pub mod exchange;

pub use direct::DirectStrategy;
pub use exchange::ExchangeStrategy;

use crate::view::SlotView;
use void_inventory::ItemStack;

/// The primitive slot operations the engines are written against.
///
/// Indices are absolute store indices and must lie in one of the view's
/// approved ranges.
pub trait SlotStrategy {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Exchange the contents of two slots
    fn swap(&self, view: &mut SlotView<'_>, a: usize, b: usize);

    /// Relocate a whole stack into an empty slot.
    ///
    /// # Panics
    ///
    /// Panics if `dst` is occupied.
    fn move_stack(&self, view: &mut SlotView<'_>, src: usize, dst: usize);

    /// Move as much of `src` onto a same-item stack at `dst` as fits.
    ///
    /// Returns false when the items differ, either slot is empty, or `dst`
    /// is already full.
    fn stack_transfer(&self, view: &mut SlotView<'_>, src: usize, dst: usize) -> bool;

    /// Empty a slot, handing its stack back to the caller
    fn clear(&self, view: &mut SlotView<'_>, slot: usize) -> Option<ItemStack>;

    /// Force a slot's contents, handing the previous stack back to the caller
    fn set(&self, view: &mut SlotView<'_>, slot: usize, stack: Option<ItemStack>) -> Option<ItemStack>;
}

/// Strategy chosen for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationStrategy {
    /// Random-access writes
    Direct(DirectStrategy),
    /// Pick-up/place toggles only
    Exchange(ExchangeStrategy),
}

impl OperationStrategy {
    /// Direct strategy
    pub fn direct() -> Self {
        Self::Direct(DirectStrategy)
    }

    /// Exchange strategy
    pub fn exchange() -> Self {
        Self::Exchange(ExchangeStrategy)
    }

    /// Privileged actors (creative mode) write directly, everyone else exchanges
    pub fn for_privilege(privileged: bool) -> Self {
        if privileged {
            Self::direct()
        } else {
            Self::exchange()
        }
    }

    fn inner(&self) -> &dyn SlotStrategy {
        match self {
            Self::Direct(strategy) => strategy,
            Self::Exchange(strategy) => strategy,
        }
    }
}

impl SlotStrategy for OperationStrategy {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn swap(&self, view: &mut SlotView<'_>, a: usize, b: usize) {
        self.inner().swap(view, a, b)
    }

    fn move_stack(&self, view: &mut SlotView<'_>, src: usize, dst: usize) {
        self.inner().move_stack(view, src, dst)
    }

    fn stack_transfer(&self, view: &mut SlotView<'_>, src: usize, dst: usize) -> bool {
        self.inner().stack_transfer(view, src, dst)
    }

    fn clear(&self, view: &mut SlotView<'_>, slot: usize) -> Option<ItemStack> {
        self.inner().clear(view, slot)
    }

    fn set(&self, view: &mut SlotView<'_>, slot: usize, stack: Option<ItemStack>) -> Option<ItemStack> {
        self.inner().set(view, slot, stack)
    }
}

/// Units a stack transfer from `src` to `dst` would move, if any
pub(crate) fn transferable(view: &SlotView<'_>, src: usize, dst: usize) -> Option<u32> {
    if src == dst {
        return None;
    }
    let source = view.get(src)?;
    let target = view.get(dst)?;
    if source.same_item(target) && !target.is_full() {
        Some(source.quantity().min(target.space()))
    } else {
        None
    }
}

pub(crate) fn assert_vacant(view: &SlotView<'_>, dst: usize) {
    assert!(
        view.is_vacant(dst),
        "move into occupied slot {} ({:?})",
        dst,
        view.get(dst)
    );
}
