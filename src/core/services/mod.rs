pub mod allocation_service;
pub mod group_service;
pub mod summary_service;

pub use allocation_service::AllocationService;
pub use group_service::GroupService;
pub use summary_service::{
    AllocationSummary, ChartPoint, ChartSeries, GroupSubtotal, SummaryService,
};

use crate::domain::{Dataset, Group, ItemKey, LineItem};
use crate::errors::PlannerError;

pub type ServiceResult<T> = Result<T, PlannerError>;

/// Copies the item at `key`, lets `edit` change it, and writes it back into a new snapshot.
pub(crate) fn update_item(
    dataset: &Dataset,
    group_id: &str,
    key: &ItemKey,
    edit: impl FnOnce(&mut LineItem) -> ServiceResult<()>,
) -> ServiceResult<Dataset> {
    let (updated, ()) = dataset.update_group(group_id, |group| {
        let mut item = group
            .item(key)
            .cloned()
            .ok_or_else(|| item_not_found(group, key))?;
        edit(&mut item)?;
        group.items.set(key, item);
        Ok(())
    })?;
    Ok(updated)
}

pub(crate) fn item_not_found(group: &Group, key: &ItemKey) -> PlannerError {
    PlannerError::ItemNotFound {
        group: group.id.clone(),
        item: key.to_string(),
    }
}
