use crate::env::InventoryItem;
use crate::loot::LootError;

/// Last-in first-out pile of items held by a map object.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemStack {
    items: Vec<InventoryItem>,
}

impl ItemStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: InventoryItem) {
        self.items.push(item);
    }

    /// Removes the most recently pushed item.
    ///
    /// # Errors
    ///
    /// Popping an empty stack is a caller bug and returns
    /// [`LootError::EmptyItemStack`].
    pub fn pop(&mut self) -> Result<InventoryItem, LootError> {
        self.items.pop().ok_or(LootError::EmptyItemStack)
    }

    /// The item the next `pop` will return.
    pub fn peek(&self) -> Option<&InventoryItem> {
        self.items.last()
    }

    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Top of the stack first.
    pub fn iter(&self) -> impl Iterator<Item = &InventoryItem> {
        self.items.iter().rev()
    }
}

impl FromIterator<InventoryItem> for ItemStack {
    fn from_iter<T: IntoIterator<Item = InventoryItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
