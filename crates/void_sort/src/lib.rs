//! Void Sort - Inventory Reorganization and Transfer
//!
//! Sorts a slot range into a canonical order and moves stacks between two
//! inventories, using only primitive slot operations.
//!
//! # Features
//!
//! - Name, quantity and type orderings
//! - Direct (in-place) and exchange (carry register) operation strategies
//! - Merge-then-selection-sort reorganization
//! - Deposit/withdraw transfer that completes partial stacks first
//! - TOML sort settings
//!
//! # Example
//!
//! ```ignore
//! use void_sort::prelude::*;
//!
//! let controller = SortController::new(Arc::new(registry));
//! let report = controller.sort(&mut chest, player_is_creative);
//! log::debug!("sorted with {} operations", report.stats.operations());
//! ```

pub mod config;
pub mod controller;
pub mod ordering;
pub mod reorganize;
pub mod strategy;
pub mod transfer;
pub mod view;

pub mod prelude {
    pub use crate::config::{ConfigError, SortSettings};
    pub use crate::controller::SortController;
    pub use crate::ordering::{OrderingKey, StackOrdering};
    pub use crate::reorganize::{ReorganizeReport, Reorganizer};
    pub use crate::strategy::{DirectStrategy, ExchangeStrategy, OperationStrategy, SlotStrategy};
    pub use crate::transfer::{
        choose_direction, deposit, smart_transfer, smart_transfer_within, transfer, transfer_view, withdraw,
        TransferDirection, TransferReport,
    };
    pub use crate::view::{OperationStats, SlotAction, SlotView};
}

pub use prelude::*;
