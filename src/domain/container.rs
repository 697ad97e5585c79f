//! Item storage for a group: index-addressed or name-addressed, behind one interface.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::item::LineItem;

/// How a group addresses its items. Fixed when the group is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Addressing {
    Sequence,
    Keyed,
}

/// Identifies one item inside a group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemKey {
    Index(usize),
    Name(String),
}

impl ItemKey {
    pub fn name(name: impl Into<String>) -> Self {
        ItemKey::Name(name.into())
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKey::Index(idx) => write!(f, "#{}", idx + 1),
            ItemKey::Name(name) => f.write_str(name),
        }
    }
}

/// Ordered item storage. `Keyed` preserves insertion order so both shapes iterate the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "addressing", content = "items", rename_all = "snake_case")]
pub enum ItemContainer {
    Sequence(Vec<LineItem>),
    Keyed(Vec<(String, LineItem)>),
}

impl ItemContainer {
    pub fn empty(addressing: Addressing) -> Self {
        match addressing {
            Addressing::Sequence => ItemContainer::Sequence(Vec::new()),
            Addressing::Keyed => ItemContainer::Keyed(Vec::new()),
        }
    }

    pub fn addressing(&self) -> Addressing {
        match self {
            ItemContainer::Sequence(_) => Addressing::Sequence,
            ItemContainer::Keyed(_) => Addressing::Keyed,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ItemContainer::Sequence(items) => items.len(),
            ItemContainer::Keyed(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn position(&self, key: &ItemKey) -> Option<usize> {
        match (self, key) {
            (ItemContainer::Sequence(items), ItemKey::Index(idx)) => {
                (*idx < items.len()).then_some(*idx)
            }
            (ItemContainer::Keyed(entries), ItemKey::Name(name)) => {
                entries.iter().position(|(key, _)| key == name)
            }
            _ => None,
        }
    }

    pub fn contains(&self, key: &ItemKey) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: &ItemKey) -> Option<&LineItem> {
        let idx = self.position(key)?;
        match self {
            ItemContainer::Sequence(items) => items.get(idx),
            ItemContainer::Keyed(entries) => entries.get(idx).map(|(_, item)| item),
        }
    }

    /// Replaces an existing item, returning the previous value.
    pub fn set(&mut self, key: &ItemKey, item: LineItem) -> Option<LineItem> {
        let idx = self.position(key)?;
        let slot = match self {
            ItemContainer::Sequence(items) => &mut items[idx],
            ItemContainer::Keyed(entries) => &mut entries[idx].1,
        };
        Some(std::mem::replace(slot, item))
    }

    /// Appends an item (sequence) or keys it in under its name (keyed).
    pub fn insert(&mut self, item: LineItem) -> ItemKey {
        match self {
            ItemContainer::Sequence(items) => {
                items.push(item);
                ItemKey::Index(items.len() - 1)
            }
            ItemContainer::Keyed(entries) => {
                let key = item.name.clone();
                match entries.iter_mut().find(|(existing, _)| *existing == key) {
                    Some(entry) => entry.1 = item,
                    None => entries.push((key.clone(), item)),
                }
                ItemKey::Name(key)
            }
        }
    }

    pub fn delete(&mut self, key: &ItemKey) -> Option<LineItem> {
        let idx = self.position(key)?;
        match self {
            ItemContainer::Sequence(items) => Some(items.remove(idx)),
            ItemContainer::Keyed(entries) => Some(entries.remove(idx).1),
        }
    }

    /// Drops every item past the first `len`.
    pub fn truncate(&mut self, len: usize) {
        match self {
            ItemContainer::Sequence(items) => items.truncate(len),
            ItemContainer::Keyed(entries) => entries.truncate(len),
        }
    }

    /// Items paired with their keys, in display order.
    pub fn iter(&self) -> Box<dyn Iterator<Item = (ItemKey, &LineItem)> + '_> {
        match self {
            ItemContainer::Sequence(items) => Box::new(
                items
                    .iter()
                    .enumerate()
                    .map(|(idx, item)| (ItemKey::Index(idx), item)),
            ),
            ItemContainer::Keyed(entries) => Box::new(
                entries
                    .iter()
                    .map(|(key, item)| (ItemKey::Name(key.clone()), item)),
            ),
        }
    }

    pub fn values(&self) -> Box<dyn Iterator<Item = &LineItem> + '_> {
        match self {
            ItemContainer::Sequence(items) => Box::new(items.iter()),
            ItemContainer::Keyed(entries) => Box::new(entries.iter().map(|(_, item)| item)),
        }
    }

    pub fn values_mut(&mut self) -> Box<dyn Iterator<Item = &mut LineItem> + '_> {
        match self {
            ItemContainer::Sequence(items) => Box::new(items.iter_mut()),
            ItemContainer::Keyed(entries) => Box::new(entries.iter_mut().map(|(_, item)| item)),
        }
    }

    /// Resolves user input to a key: a 1-based position or an item name for sequences,
    /// the exact (then case-insensitive) name for keyed groups.
    pub fn resolve(&self, input: &str) -> Option<ItemKey> {
        let needle = input.trim();
        match self {
            ItemContainer::Sequence(items) => {
                if let Ok(position) = needle.parse::<usize>() {
                    if position >= 1 && position <= items.len() {
                        return Some(ItemKey::Index(position - 1));
                    }
                }
                items
                    .iter()
                    .position(|item| item.name == needle)
                    .or_else(|| {
                        items
                            .iter()
                            .position(|item| item.name.eq_ignore_ascii_case(needle))
                    })
                    .map(ItemKey::Index)
            }
            ItemContainer::Keyed(entries) => entries
                .iter()
                .find(|(key, _)| key == needle)
                .or_else(|| entries.iter().find(|(key, _)| key.eq_ignore_ascii_case(needle)))
                .map(|(key, _)| ItemKey::Name(key.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn item(name: &str, budget: i64) -> LineItem {
        LineItem::new(name, Decimal::from(budget), Decimal::from(10), Decimal::from(budget / 10))
    }

    fn both_shapes() -> [ItemContainer; 2] {
        let mut sequence = ItemContainer::empty(Addressing::Sequence);
        let mut keyed = ItemContainer::empty(Addressing::Keyed);
        for (name, budget) in [("Alpha", 100), ("Beta", 200), ("Gamma", 300)] {
            sequence.insert(item(name, budget));
            keyed.insert(item(name, budget));
        }
        [sequence, keyed]
    }

    #[test]
    fn both_shapes_iterate_in_insertion_order() {
        for container in both_shapes() {
            let names: Vec<&str> = container.values().map(|item| item.name.as_str()).collect();
            assert_eq!(names, ["Alpha", "Beta", "Gamma"]);
        }
    }

    #[test]
    fn both_shapes_support_get_set_delete() {
        for mut container in both_shapes() {
            let key = container.resolve("beta").expect("resolve by name");
            assert_eq!(container.get(&key).map(|item| item.budget), Some(Decimal::from(200)));

            let replaced = container.set(&key, item("Beta", 250));
            assert_eq!(replaced.map(|item| item.budget), Some(Decimal::from(200)));
            assert_eq!(container.get(&key).map(|item| item.budget), Some(Decimal::from(250)));

            assert!(container.delete(&key).is_some());
            assert_eq!(container.len(), 2);
            assert!(container.get(&key).map(|item| item.name != "Beta").unwrap_or(true));
        }
    }

    #[test]
    fn mismatched_key_kinds_do_not_resolve() {
        let [sequence, keyed] = both_shapes();
        assert!(sequence.get(&ItemKey::name("Alpha")).is_none());
        assert!(keyed.get(&ItemKey::Index(0)).is_none());
    }

    #[test]
    fn sequence_resolves_one_based_positions() {
        let [sequence, _] = both_shapes();
        assert_eq!(sequence.resolve("3"), Some(ItemKey::Index(2)));
        assert_eq!(sequence.resolve("4"), None);
        assert_eq!(sequence.resolve("0"), None);
    }

    #[test]
    fn keyed_insert_replaces_same_name() {
        let [_, mut keyed] = both_shapes();
        keyed.insert(item("Alpha", 900));
        assert_eq!(keyed.len(), 3);
        assert_eq!(
            keyed.get(&ItemKey::name("Alpha")).map(|item| item.budget),
            Some(Decimal::from(900))
        );
    }

    #[test]
    fn truncate_discards_tail() {
        for mut container in both_shapes() {
            container.truncate(1);
            assert_eq!(container.len(), 1);
            assert_eq!(container.values().next().map(|item| item.name.as_str()), Some("Alpha"));
        }
    }
}
