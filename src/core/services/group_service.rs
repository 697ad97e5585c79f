use std::sync::Arc;

use crate::domain::{
    Addressing, Dataset, Group, GroupKind, ItemKey, LineItem, ScaleClass,
    DEFAULT_CUSTOM_GROUP_SIZE, MAX_CUSTOM_GROUPS, MAX_ITEMS_PER_GROUP, MIN_ITEMS_PER_GROUP,
};
use crate::errors::PlannerError;

use super::{item_not_found, update_item, ServiceResult};

/// Structural edits: adding and removing items and groups, resizing, renaming.
pub struct GroupService;

impl GroupService {
    /// Adds an empty item priced with the scale-class defaults.
    ///
    /// Sequence groups append; keyed groups key the item in under its name and refuse a
    /// name that is already taken. Editable groups grow their in-view count by one.
    pub fn add_item(
        dataset: &Dataset,
        group_id: &str,
        name: &str,
        scale: ScaleClass,
    ) -> ServiceResult<(Dataset, ItemKey)> {
        let name = require_name(name, "item")?;
        dataset.update_group(group_id, |group| {
            if group.items.addressing() == Addressing::Keyed
                && group.items.contains(&ItemKey::name(name))
            {
                return Err(PlannerError::DuplicateItem {
                    group: group.id.clone(),
                    item: name.to_string(),
                });
            }
            let in_view = group.visible_count();
            let key = group.items.insert(LineItem::placeholder(name, scale));
            if group.is_user_editable() {
                group.num_items = Some(in_view + 1);
            }
            tracing::debug!(group = %group.id, item = %key, "item added");
            Ok(key)
        })
    }

    pub fn delete_item(dataset: &Dataset, group_id: &str, key: &ItemKey) -> ServiceResult<Dataset> {
        let (updated, removed) = dataset.update_group(group_id, |group| {
            let removed = group
                .items
                .delete(key)
                .ok_or_else(|| item_not_found(group, key))?;
            if group.is_user_editable() {
                let remaining = group.items.len();
                group.num_items = Some(group.num_items.unwrap_or(remaining).min(remaining));
            }
            Ok(removed)
        })?;
        tracing::debug!(group = %group_id, item = %removed.name, "item deleted");
        Ok(updated)
    }

    /// Removes a group and hands it back so the caller can settle its counters.
    pub fn delete_group(dataset: &Dataset, group_id: &str) -> ServiceResult<(Dataset, Arc<Group>)> {
        let (updated, removed) = dataset.without_group(group_id)?;
        tracing::info!(group = %removed.id, name = %removed.name, "group deleted");
        Ok((updated, removed))
    }

    /// Resizes an editable group to `requested` items, clamped to the per-group bounds.
    ///
    /// Shrinking discards the trailing items. Growing appends `Custom Item {n}` placeholders.
    pub fn set_num_items(
        dataset: &Dataset,
        group_id: &str,
        requested: usize,
        scale: ScaleClass,
    ) -> ServiceResult<Dataset> {
        let count = requested.clamp(MIN_ITEMS_PER_GROUP, MAX_ITEMS_PER_GROUP);
        if count != requested {
            tracing::warn!(
                group = %group_id,
                requested,
                applied = count,
                "item count clamped"
            );
        }
        let (updated, ()) = dataset.update_group(group_id, |group| {
            require_editable(group)?;
            let len = group.items.len();
            if count < len {
                group.items.truncate(count);
            } else {
                for idx in len..count {
                    group
                        .items
                        .insert(LineItem::placeholder(format!("Custom Item {}", idx + 1), scale));
                }
            }
            group.num_items = Some(count);
            Ok(())
        })?;
        Ok(updated)
    }

    pub fn rename_group(dataset: &Dataset, group_id: &str, name: &str) -> ServiceResult<Dataset> {
        let name = require_name(name, "group")?;
        let (updated, ()) = dataset.update_group(group_id, |group| {
            require_editable(group)?;
            group.name = name.to_string();
            Ok(())
        })?;
        Ok(updated)
    }

    /// Renames an item of a sequence group. Keyed groups address items by name, so their
    /// names stay fixed.
    pub fn rename_item(
        dataset: &Dataset,
        group_id: &str,
        key: &ItemKey,
        name: &str,
    ) -> ServiceResult<Dataset> {
        let name = require_name(name, "item")?;
        let addressing = dataset
            .group(group_id)
            .map(|group| group.items.addressing())
            .ok_or_else(|| PlannerError::GroupNotFound(group_id.to_string()))?;
        if addressing == Addressing::Keyed {
            return Err(PlannerError::InvalidInput(format!(
                "items of `{group_id}` are addressed by name and cannot be renamed"
            )));
        }
        update_item(dataset, group_id, key, |item| {
            item.name = name.to_string();
            Ok(())
        })
    }

    /// Appends a fresh custom group while fewer than the allowed number exist.
    /// Returns the new snapshot and the id of the created group.
    pub fn create_group(
        dataset: &Dataset,
        custom_group_count: usize,
        scale: ScaleClass,
    ) -> ServiceResult<(Dataset, String)> {
        if custom_group_count >= MAX_CUSTOM_GROUPS {
            return Err(PlannerError::CustomGroupLimit(MAX_CUSTOM_GROUPS));
        }
        let mut ordinal = custom_group_count + 1;
        while dataset.group(&format!("custom_group_{ordinal}")).is_some() {
            ordinal += 1;
        }
        let id = format!("custom_group_{ordinal}");
        let mut group = Group::new(
            id.clone(),
            format!("Custom Group {ordinal}"),
            GroupKind::Custom,
            Addressing::Sequence,
        )
        .with_items(
            (1..=DEFAULT_CUSTOM_GROUP_SIZE)
                .map(|idx| LineItem::placeholder(format!("Custom Item {idx}"), scale)),
        );
        group.num_items = Some(DEFAULT_CUSTOM_GROUP_SIZE);
        tracing::info!(group = %id, "custom group created");
        Ok((dataset.with_group(group), id))
    }

    pub fn toggle_expand(dataset: &Dataset, group_id: &str) -> ServiceResult<Dataset> {
        let (updated, ()) = dataset.update_group(group_id, |group| {
            group.expanded = !group.expanded;
            Ok(())
        })?;
        Ok(updated)
    }

    /// Forces every item of the editable groups onto the scale-class range ceiling.
    /// Groups that already match are shared with the input snapshot.
    pub fn apply_custom_bounds(dataset: &Dataset, scale: ScaleClass) -> Dataset {
        let ceiling = scale.default_max();
        dataset.map_groups(|group| {
            if !group.is_user_editable() || group.items.values().all(|item| item.max == ceiling) {
                return None;
            }
            let mut bounded = group.clone();
            for item in bounded.items.values_mut() {
                item.max = ceiling;
            }
            Some(bounded)
        })
    }
}

fn require_name<'a>(name: &'a str, what: &str) -> ServiceResult<&'a str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(PlannerError::InvalidInput(format!("{what} name cannot be empty")))
    } else {
        Ok(trimmed)
    }
}

fn require_editable(group: &Group) -> ServiceResult<()> {
    if group.is_user_editable() {
        Ok(())
    } else {
        Err(PlannerError::NotEditable(group.id.clone()))
    }
}
