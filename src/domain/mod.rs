//! Budget allocation data model: line items, groups, item containers, and dataset snapshots.
//! No I/O here; only data types and the invariants they carry.

pub mod common;
pub mod container;
pub mod dataset;
pub mod group;
pub mod item;

pub use common::{
    DisplayScale, ScaleClass, DEFAULT_CUSTOM_GROUP_SIZE, MAX_CUSTOM_GROUPS, MAX_ITEMS_PER_GROUP,
    MAX_TOTAL_BUDGET, MIN_ITEMS_PER_GROUP,
};
pub use container::{Addressing, ItemContainer, ItemKey};
pub use dataset::Dataset;
pub use group::{Group, GroupKind};
pub use item::LineItem;
