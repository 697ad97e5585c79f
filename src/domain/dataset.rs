//! Immutable snapshot of the working group list.

use std::sync::Arc;

use serde::{Serialize, Serializer};

use super::group::Group;
use crate::errors::{PlannerError, Result};

/// Ordered list of groups. Cloning is cheap: groups are shared, and every update
/// produces a new snapshot that reuses the untouched groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    groups: Vec<Arc<Group>>,
}

impl Dataset {
    pub fn new(groups: impl IntoIterator<Item = Group>) -> Self {
        Self {
            groups: groups.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> + '_ {
        self.groups.iter().map(Arc::as_ref)
    }

    pub fn group(&self, id: &str) -> Option<&Group> {
        self.shared_group(id).map(Arc::as_ref)
    }

    /// The shared handle for a group, useful to check that a snapshot reused it.
    pub fn shared_group(&self, id: &str) -> Option<&Arc<Group>> {
        self.groups.iter().find(|group| group.id == id)
    }

    pub fn user_editable_count(&self) -> usize {
        self.groups().filter(|group| group.is_user_editable()).count()
    }

    /// Returns a snapshot in which only the group `id` is replaced by the result of `update`.
    pub fn update_group<T>(
        &self,
        id: &str,
        update: impl FnOnce(&mut Group) -> Result<T>,
    ) -> Result<(Dataset, T)> {
        let idx = self
            .groups
            .iter()
            .position(|group| group.id == id)
            .ok_or_else(|| PlannerError::GroupNotFound(id.to_string()))?;
        let mut edited = Group::clone(&self.groups[idx]);
        let outcome = update(&mut edited)?;
        let mut groups = self.groups.clone();
        groups[idx] = Arc::new(edited);
        Ok((Dataset { groups }, outcome))
    }

    /// Rebuilds only the groups for which `update` returns a replacement.
    pub fn map_groups(&self, mut update: impl FnMut(&Group) -> Option<Group>) -> Dataset {
        let groups = self
            .groups
            .iter()
            .map(|group| match update(group) {
                Some(replacement) => Arc::new(replacement),
                None => Arc::clone(group),
            })
            .collect();
        Dataset { groups }
    }

    pub fn with_group(&self, group: Group) -> Dataset {
        let mut groups = self.groups.clone();
        groups.push(Arc::new(group));
        Dataset { groups }
    }

    pub fn without_group(&self, id: &str) -> Result<(Dataset, Arc<Group>)> {
        let idx = self
            .groups
            .iter()
            .position(|group| group.id == id)
            .ok_or_else(|| PlannerError::GroupNotFound(id.to_string()))?;
        let mut groups = self.groups.clone();
        let removed = groups.remove(idx);
        Ok((Dataset { groups }, removed))
    }
}

impl Serialize for Dataset {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.groups())
    }
}
