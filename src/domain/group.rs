use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::container::{Addressing, ItemContainer, ItemKey};
use super::item::LineItem;

/// Origin of a group. Custom and imported groups carry user-editable metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    #[default]
    Seed,
    Custom,
    Imported,
}

impl GroupKind {
    /// Whether the group can be renamed, resized, and counts toward the custom-group ceiling.
    pub fn is_user_editable(self) -> bool {
        match self {
            GroupKind::Seed => false,
            GroupKind::Custom | GroupKind::Imported => true,
        }
    }
}

/// A named collection of line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub kind: GroupKind,
    #[serde(flatten)]
    pub items: ItemContainer,
    pub expanded: bool,
    /// Items currently in view for custom and imported groups; `None` shows everything.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_items: Option<usize>,
}

impl Group {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: GroupKind,
        addressing: Addressing,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            items: ItemContainer::empty(addressing),
            expanded: true,
            num_items: None,
        }
    }

    pub fn with_items(mut self, items: impl IntoIterator<Item = LineItem>) -> Self {
        for item in items {
            self.items.insert(item);
        }
        self
    }

    pub fn is_user_editable(&self) -> bool {
        self.kind.is_user_editable()
    }

    pub fn item(&self, key: &ItemKey) -> Option<&LineItem> {
        self.items.get(key)
    }

    /// Sum of item budgets, saturating at the decimal range.
    pub fn subtotal(&self) -> Decimal {
        self.items
            .values()
            .fold(Decimal::ZERO, |total, item| total.saturating_add(item.budget))
    }

    pub fn visible_count(&self) -> usize {
        let len = self.items.len();
        match (self.kind.is_user_editable(), self.num_items) {
            (true, Some(limit)) => limit.min(len),
            _ => len,
        }
    }

    /// Items in display order, limited to the in-view count.
    pub fn visible_items(&self) -> impl Iterator<Item = (ItemKey, &LineItem)> + '_ {
        self.items.iter().take(self.visible_count())
    }

    pub fn hidden_count(&self) -> usize {
        self.items.len() - self.visible_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ScaleClass;

    fn custom_group(size: usize) -> Group {
        let items = (1..=size)
            .map(|idx| LineItem::placeholder(format!("Custom Item {idx}"), ScaleClass::Large));
        Group::new("custom_group_1", "Custom Group 1", GroupKind::Custom, Addressing::Sequence)
            .with_items(items)
    }

    #[test]
    fn only_custom_and_imported_groups_are_editable() {
        assert!(!GroupKind::Seed.is_user_editable());
        assert!(GroupKind::Custom.is_user_editable());
        assert!(GroupKind::Imported.is_user_editable());
    }

    #[test]
    fn subtotal_sums_item_budgets() {
        let group = Group::new("ops", "Operations", GroupKind::Seed, Addressing::Keyed).with_items([
            LineItem::new("Fuel", Decimal::from(150), Decimal::from(15), Decimal::from(10)),
            LineItem::new("Repairs", Decimal::from(350), Decimal::from(35), Decimal::from(10)),
        ]);
        assert_eq!(group.subtotal(), Decimal::from(500));
    }

    #[test]
    fn subtotal_saturates_instead_of_overflowing() {
        let group = Group::new("ops", "Operations", GroupKind::Seed, Addressing::Sequence)
            .with_items([
                LineItem::new("A", Decimal::MAX, Decimal::ONE, Decimal::ZERO),
                LineItem::new("B", Decimal::MAX, Decimal::ONE, Decimal::ZERO),
            ]);
        assert_eq!(group.subtotal(), Decimal::MAX);
    }

    #[test]
    fn num_items_limits_the_view_without_dropping_items() {
        let mut group = custom_group(5);
        group.num_items = Some(3);
        assert_eq!(group.visible_items().count(), 3);
        assert_eq!(group.hidden_count(), 2);
        assert_eq!(group.items.len(), 5);
    }

    #[test]
    fn seed_groups_ignore_num_items() {
        let mut group = custom_group(4);
        group.kind = GroupKind::Seed;
        group.num_items = Some(1);
        assert_eq!(group.visible_count(), 4);
    }
}
