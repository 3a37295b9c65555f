//! Stack ordering policies

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use void_inventory::{ItemCatalog, ItemStack};

/// Sort key selecting a comparator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderingKey {
    /// Display name ascending, then quantity descending
    #[default]
    Name,
    /// Quantity descending, then display name ascending
    Quantity,
    /// Category ascending; no further tie-break
    Type,
}

impl OrderingKey {
    /// All keys, in cycling order
    pub const ALL: [OrderingKey; 3] = [OrderingKey::Name, OrderingKey::Quantity, OrderingKey::Type];

    /// Lowercase name used in settings files
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Quantity => "quantity",
            Self::Type => "type",
        }
    }

    /// Next key in cycling order
    pub fn next(self) -> Self {
        match self {
            Self::Name => Self::Quantity,
            Self::Quantity => Self::Type,
            Self::Type => Self::Name,
        }
    }
}

impl fmt::Display for OrderingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderingKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "quantity" => Ok(Self::Quantity),
            "type" => Ok(Self::Type),
            other => Err(format!("unknown ordering key '{}'", other)),
        }
    }
}

/// A total order over slots for one key.
///
/// Empty slots compare greater than every stack and equal to each other.
#[derive(Clone, Copy)]
pub struct StackOrdering<'a> {
    key: OrderingKey,
    catalog: &'a dyn ItemCatalog,
}

impl<'a> StackOrdering<'a> {
    /// Create an ordering for a key
    pub fn new(key: OrderingKey, catalog: &'a dyn ItemCatalog) -> Self {
        Self { key, catalog }
    }

    /// Key this ordering sorts by
    pub fn key(&self) -> OrderingKey {
        self.key
    }

    /// Compare two slots
    pub fn compare(&self, a: Option<&ItemStack>, b: Option<&ItemStack>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => self.compare_stacks(a, b),
        }
    }

    /// Compare two non-empty stacks
    pub fn compare_stacks(&self, a: &ItemStack, b: &ItemStack) -> Ordering {
        match self.key {
            OrderingKey::Name => self
                .compare_names(a, b)
                .then_with(|| b.quantity().cmp(&a.quantity()))
                .then_with(|| a.item().cmp(&b.item())),
            OrderingKey::Quantity => b
                .quantity()
                .cmp(&a.quantity())
                .then_with(|| self.compare_names(a, b))
                .then_with(|| a.item().cmp(&b.item())),
            OrderingKey::Type => self
                .catalog
                .category(a.item())
                .cmp(self.catalog.category(b.item())),
        }
    }

    /// Check that every adjacent pair is in order
    pub fn is_sorted(&self, slots: &[Option<ItemStack>]) -> bool {
        slots
            .windows(2)
            .all(|pair| self.compare(pair[0].as_ref(), pair[1].as_ref()) != Ordering::Greater)
    }

    // Case-insensitive, without allocating lowercase copies
    fn compare_names(&self, a: &ItemStack, b: &ItemStack) -> Ordering {
        let left = self.catalog.display_name(a.item()).chars().flat_map(char::to_lowercase);
        let right = self.catalog.display_name(b.item()).chars().flat_map(char::to_lowercase);
        left.cmp(right)
    }
}
