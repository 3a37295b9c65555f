//! Item definitions and the catalog the sorter looks names up in

use crate::item::{ItemId, ItemStack, StackError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default max stack for definitions that do not set one
pub const DEFAULT_MAX_STACK: u32 = 64;

/// Category reported for items the catalog does not know
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Item registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Id registered twice
    #[error("Item {0} is already registered")]
    Duplicate(ItemId),
    /// Definition with a zero max stack
    #[error("Item {0} has a max stack of zero")]
    ZeroMaxStack(ItemId),
    /// Lookup of an id that was never registered
    #[error("Item {0} is not registered")]
    Unknown(ItemId),
    /// Stack could not be built
    #[error("Invalid stack: {0}")]
    Stack(#[from] StackError),
    /// Malformed registry file
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn default_max_stack() -> u32 {
    DEFAULT_MAX_STACK
}

fn default_category() -> String {
    "misc".to_string()
}

/// Item definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDefinition {
    /// Unique identifier
    pub id: ItemId,
    /// Display name
    pub name: String,
    /// Maximum stack size (1 = not stackable)
    #[serde(default = "default_max_stack")]
    pub max_stack: u32,
    /// Stable category string used by the type ordering
    #[serde(default = "default_category")]
    pub category: String,
}

impl ItemDefinition {
    /// Create a new item definition
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            max_stack: DEFAULT_MAX_STACK,
            category: default_category(),
        }
    }

    /// Set max stack size
    pub fn with_max_stack(mut self, max: u32) -> Self {
        self.max_stack = max;
        self
    }

    /// Set category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Check if stackable
    pub fn is_stackable(&self) -> bool {
        self.max_stack > 1
    }
}

/// Lookup of item metadata by id.
///
/// Hosts implement this over their own item registry; [`ItemRegistry`] is the
/// in-memory implementation.
pub trait ItemCatalog: Send + Sync {
    /// Definition for an id, if registered
    fn definition(&self, id: ItemId) -> Option<&ItemDefinition>;

    /// Display name, empty for unknown items
    fn display_name(&self, id: ItemId) -> &str {
        self.definition(id).map(|d| d.name.as_str()).unwrap_or("")
    }

    /// Category string, [`UNKNOWN_CATEGORY`] for unknown items
    fn category(&self, id: ItemId) -> &str {
        self.definition(id)
            .map(|d| d.category.as_str())
            .unwrap_or(UNKNOWN_CATEGORY)
    }

    /// Max stack size, if registered
    fn max_stack(&self, id: ItemId) -> Option<u32> {
        self.definition(id).map(|d| d.max_stack)
    }

    /// Check if an id is registered
    fn contains(&self, id: ItemId) -> bool {
        self.definition(id).is_some()
    }
}

/// On-disk registry layout
#[derive(Debug, Default, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    items: Vec<ItemDefinition>,
}

/// Registry of all item types
#[derive(Debug, Clone, Default)]
pub struct ItemRegistry {
    items: HashMap<ItemId, ItemDefinition>,
}

impl ItemRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new item
    pub fn register(&mut self, definition: ItemDefinition) -> Result<(), RegistryError> {
        if definition.max_stack == 0 {
            return Err(RegistryError::ZeroMaxStack(definition.id));
        }
        if self.items.contains_key(&definition.id) {
            return Err(RegistryError::Duplicate(definition.id));
        }
        self.items.insert(definition.id, definition);
        Ok(())
    }

    /// Register an item, builder style
    pub fn with(mut self, definition: ItemDefinition) -> Result<Self, RegistryError> {
        self.register(definition)?;
        Ok(self)
    }

    /// Get an item by ID
    pub fn get(&self, id: ItemId) -> Option<&ItemDefinition> {
        self.items.get(&id)
    }

    /// Number of registered items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All definitions, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.items.values()
    }

    /// Build a stack of a registered item with its registered max stack
    pub fn stack(&self, id: impl Into<ItemId>, quantity: u32) -> Result<ItemStack, RegistryError> {
        let id = id.into();
        let definition = self.get(id).ok_or(RegistryError::Unknown(id))?;
        Ok(ItemStack::try_new(id, quantity, definition.max_stack)?)
    }

    /// Parse a registry from TOML `[[items]]` tables
    pub fn from_toml_str(source: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = toml::from_str(source)?;
        let mut registry = Self::new();
        for definition in file.items {
            registry.register(definition)?;
        }
        Ok(registry)
    }

    /// Load a registry file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}

impl ItemCatalog for ItemRegistry {
    fn definition(&self, id: ItemId) -> Option<&ItemDefinition> {
        self.items.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ItemRegistry::new();
        registry
            .register(ItemDefinition::new(1, "Cobblestone").with_category("block"))
            .unwrap();
        registry
            .register(ItemDefinition::new(2, "Ender Pearl").with_max_stack(16))
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.display_name(ItemId(1)), "Cobblestone");
        assert_eq!(registry.category(ItemId(1)), "block");
        assert_eq!(registry.max_stack(ItemId(2)), Some(16));
        assert!(registry.get(ItemId(2)).unwrap().is_stackable());
    }

    #[test]
    fn test_unknown_item_fallbacks() {
        let registry = ItemRegistry::new();

        assert_eq!(registry.display_name(ItemId(9)), "");
        assert_eq!(registry.category(ItemId(9)), UNKNOWN_CATEGORY);
        assert!(matches!(registry.stack(9, 1), Err(RegistryError::Unknown(ItemId(9)))));
    }

    #[test]
    fn test_rejects_bad_definitions() {
        let mut registry = ItemRegistry::new();
        registry.register(ItemDefinition::new(1, "Stick")).unwrap();

        assert!(matches!(
            registry.register(ItemDefinition::new(1, "Stick")),
            Err(RegistryError::Duplicate(ItemId(1)))
        ));
        assert!(matches!(
            registry.register(ItemDefinition::new(2, "Air").with_max_stack(0)),
            Err(RegistryError::ZeroMaxStack(ItemId(2)))
        ));
    }

    #[test]
    fn test_stack_uses_registered_max() {
        let registry = ItemRegistry::new()
            .with(ItemDefinition::new(5, "Snowball").with_max_stack(16))
            .unwrap();

        assert_eq!(registry.stack(5, 16).unwrap().max_stack(), 16);
        assert!(matches!(registry.stack(5, 17), Err(RegistryError::Stack(_))));
    }

    #[test]
    fn test_from_toml() {
        let source = r#"
            [[items]]
            id = 1
            name = "Apple"
            category = "food"

            [[items]]
            id = 2
            name = "Diamond Sword"
            max_stack = 1
            category = "tool"
        "#;

        let registry = ItemRegistry::from_toml_str(source).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.max_stack(ItemId(1)), Some(DEFAULT_MAX_STACK));
        assert_eq!(registry.category(ItemId(2)), "tool");
        assert!(!registry.get(ItemId(2)).unwrap().is_stackable());
    }

    #[test]
    fn test_load_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[[items]]\nid = 7\nname = \"Torch\"\ncategory = \"light\"").unwrap();

        let registry = ItemRegistry::load(file.path()).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.display_name(ItemId(7)), "Torch");
        assert_eq!(registry.category(ItemId(7)), "light");
        assert_eq!(registry.max_stack(ItemId(7)), Some(DEFAULT_MAX_STACK));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ItemRegistry::load(dir.path().join("items.toml")).unwrap_err();
        assert!(matches!(err, RegistryError::Io(_)));
    }
}
