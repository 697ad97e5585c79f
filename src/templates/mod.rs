//! Read-only catalog of seed templates embedded from `data/templates`.

use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::Deserialize;
use strsim::levenshtein;

use crate::domain::{
    Addressing, Dataset, Group, GroupKind, LineItem, ScaleClass, MAX_TOTAL_BUDGET,
};
use crate::errors::{PlannerError, Result};

/// Key of the session-owned entry produced by spreadsheet import.
pub const IMPORTED_TEMPLATE_KEY: &str = "Imported Template";
/// Template selected when nothing else is configured.
pub const DEFAULT_TEMPLATE_KEY: &str = "Default";

const EMBEDDED_SEEDS: &[(&str, &str)] = &[
    (
        "congressional_spending",
        include_str!("../../data/templates/congressional_spending.json"),
    ),
    (
        "force_structure_planner",
        include_str!("../../data/templates/force_structure_planner.json"),
    ),
    (
        "us_force_structure_template",
        include_str!("../../data/templates/us_force_structure_template.json"),
    ),
    (
        "personal_and_housing_budget",
        include_str!("../../data/templates/personal_and_housing_budget.json"),
    ),
    (
        "property_management_budget",
        include_str!("../../data/templates/property_management_budget.json"),
    ),
    (
        "small_business_construction_company",
        include_str!("../../data/templates/small_business_construction_company.json"),
    ),
    (
        "small_manufacturing_company",
        include_str!("../../data/templates/small_manufacturing_company.json"),
    ),
    (
        "custom_template_big",
        include_str!("../../data/templates/custom_template_big.json"),
    ),
    (
        "custom_template_small",
        include_str!("../../data/templates/custom_template_small.json"),
    ),
    (
        "agricultural_data_company",
        include_str!("../../data/templates/agricultural_data_company.json"),
    ),
];

static CATALOG: Lazy<TemplateCatalog> = Lazy::new(|| TemplateCatalog::from_sources(EMBEDDED_SEEDS));

/// A named starting dataset plus its total budget ceiling.
#[derive(Debug, Clone)]
pub struct Template {
    pub key: String,
    pub name: String,
    pub total_budget_limit: Decimal,
    pub scale: ScaleClass,
    pub seed: Dataset,
}

impl Template {
    /// The volatile entry that holds the most recent import.
    pub fn imported(seed: Dataset) -> Self {
        Self {
            key: IMPORTED_TEMPLATE_KEY.to_string(),
            name: IMPORTED_TEMPLATE_KEY.to_string(),
            total_budget_limit: Decimal::from(MAX_TOTAL_BUDGET),
            scale: ScaleClass::Large,
            seed,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TemplateSeed {
    key: String,
    name: String,
    total_budget_limit: Decimal,
    scale: ScaleClass,
    groups: Vec<GroupSeed>,
}

#[derive(Debug, Deserialize)]
struct GroupSeed {
    id: String,
    name: String,
    #[serde(default)]
    kind: GroupKind,
    addressing: Addressing,
    #[serde(default = "default_expanded")]
    expanded: bool,
    #[serde(default)]
    num_items: Option<usize>,
    items: Vec<ItemSeed>,
}

#[derive(Debug, Deserialize)]
struct ItemSeed {
    name: String,
    #[serde(default)]
    budget: Decimal,
    #[serde(default)]
    quantity: Decimal,
    #[serde(default)]
    unit_cost: Decimal,
    #[serde(default)]
    max: Option<Decimal>,
}

fn default_expanded() -> bool {
    true
}

impl TemplateSeed {
    fn into_template(self) -> Template {
        let scale = self.scale;
        let groups = self.groups.into_iter().map(|seed| {
            let mut group = Group::new(seed.id, seed.name, seed.kind, seed.addressing)
                .with_items(seed.items.into_iter().map(|item| {
                    let max = item.max.unwrap_or(if item.budget > Decimal::ZERO {
                        item.budget.saturating_mul(Decimal::from(5))
                    } else {
                        scale.default_max()
                    });
                    LineItem::new(item.name, item.budget, item.unit_cost, item.quantity)
                        .with_max(max)
                }));
            group.expanded = seed.expanded;
            group.num_items = seed.num_items;
            group
        });
        Template {
            key: self.key,
            name: self.name,
            total_budget_limit: self.total_budget_limit,
            scale,
            seed: Dataset::new(groups),
        }
    }
}

/// Catalog of seed templates, in presentation order.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: Vec<Template>,
}

impl TemplateCatalog {
    /// The catalog built from the templates embedded in the binary.
    pub fn global() -> &'static TemplateCatalog {
        &CATALOG
    }

    /// Parses `(label, json)` sources; sources that fail to parse are logged and skipped.
    pub fn from_sources(sources: &[(&str, &str)]) -> Self {
        let templates = sources
            .iter()
            .filter_map(|(label, json)| match serde_json::from_str::<TemplateSeed>(json) {
                Ok(seed) => Some(seed.into_template()),
                Err(err) => {
                    tracing::warn!(template = %label, error = %err, "skipping unreadable template");
                    None
                }
            })
            .collect();
        Self { templates }
    }

    pub fn from_templates(templates: Vec<Template>) -> Self {
        Self { templates }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> + '_ {
        self.templates.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.templates.iter().map(|template| template.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Template> {
        self.templates.iter().find(|template| template.key == key)
    }

    /// Finds a template by key or display name, ignoring case.
    pub fn lookup(&self, input: &str) -> Result<&Template> {
        let needle = input.trim();
        if let Some(template) = self.get(needle) {
            return Ok(template);
        }
        self.templates
            .iter()
            .find(|template| {
                template.key.eq_ignore_ascii_case(needle)
                    || template.name.eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| PlannerError::UnknownTemplate {
                key: needle.to_string(),
                suggestion: self.suggest(needle),
            })
    }

    fn suggest(&self, input: &str) -> Option<String> {
        let lowered = input.to_ascii_lowercase();
        self.keys()
            .chain(std::iter::once(IMPORTED_TEMPLATE_KEY))
            .map(|key| (levenshtein(&key.to_ascii_lowercase(), &lowered), key))
            .min_by_key(|(distance, _)| *distance)
            .filter(|(distance, _)| *distance <= 3)
            .map(|(_, key)| key.to_string())
    }
}
