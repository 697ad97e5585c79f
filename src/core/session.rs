//! Single-owner editing session over the working dataset.

use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use chrono::Local;
use rust_decimal::Decimal;

use crate::core::services::{
    AllocationService, AllocationSummary, ChartSeries, GroupService, SummaryService,
};
use crate::domain::{Dataset, DisplayScale, Group, ItemKey, ScaleClass, MAX_TOTAL_BUDGET};
use crate::errors::{ImportError, PlannerError, Result};
use crate::report::{Document, ReportInput};
use crate::spreadsheet::{self, ImportOutcome};
use crate::templates::{Template, TemplateCatalog, DEFAULT_TEMPLATE_KEY, IMPORTED_TEMPLATE_KEY};

/// Raised once when allocation moves above the total budget limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetWarning {
    pub allocated: Decimal,
    pub limit: Decimal,
}

impl fmt::Display for BudgetWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total allocated budget ({}) exceeds the limit ({})",
            crate::money::format_currency(self.allocated),
            crate::money::format_currency(self.limit)
        )
    }
}

/// The active template, the working dataset derived from it, and the presentation state
/// around it. Every edit swaps in a new dataset snapshot; a failed edit leaves the
/// previous snapshot in place.
#[derive(Debug, Clone)]
pub struct Session {
    catalog: &'static TemplateCatalog,
    template_key: String,
    template_name: String,
    scale_class: ScaleClass,
    dataset: Dataset,
    total_budget_limit: Decimal,
    display_scale: DisplayScale,
    custom_group_count: usize,
    warning_shown: bool,
    pending_warning: Option<BudgetWarning>,
    last_import: Option<Dataset>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A session over the embedded catalog with the default template selected.
    pub fn new() -> Self {
        Self::with_catalog(TemplateCatalog::global())
    }

    /// Starts on the `Default` template, or the first template when the catalog has none by
    /// that key, or an empty imported dataset when the catalog is empty.
    pub fn with_catalog(catalog: &'static TemplateCatalog) -> Self {
        let mut session = Self {
            catalog,
            template_key: IMPORTED_TEMPLATE_KEY.to_string(),
            template_name: IMPORTED_TEMPLATE_KEY.to_string(),
            scale_class: ScaleClass::Large,
            dataset: Dataset::default(),
            total_budget_limit: Decimal::from(MAX_TOTAL_BUDGET),
            display_scale: DisplayScale::default(),
            custom_group_count: 0,
            warning_shown: false,
            pending_warning: None,
            last_import: None,
        };
        let initial = catalog
            .get(DEFAULT_TEMPLATE_KEY)
            .or_else(|| catalog.iter().next())
            .cloned();
        if let Some(template) = initial {
            session.activate(&template);
        }
        session
    }

    pub fn catalog(&self) -> &'static TemplateCatalog {
        self.catalog
    }

    pub fn template_key(&self) -> &str {
        &self.template_key
    }

    pub fn template_name(&self) -> &str {
        &self.template_name
    }

    pub fn scale_class(&self) -> ScaleClass {
        self.scale_class
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn total_budget_limit(&self) -> Decimal {
        self.total_budget_limit
    }

    pub fn display_scale(&self) -> DisplayScale {
        self.display_scale
    }

    pub fn custom_group_count(&self) -> usize {
        self.custom_group_count
    }

    /// Upper bound of the total budget control for the active template.
    pub fn budget_ceiling(&self) -> Decimal {
        self.scale_class.budget_ceiling()
    }

    /// Replaces the working dataset with a template's seed.
    ///
    /// Selecting the imported entry restores the dataset of the most recent import, or an
    /// empty dataset when nothing was imported yet. Unknown keys leave the session untouched.
    pub fn select_template(&mut self, key: &str) -> Result<()> {
        if key.trim().eq_ignore_ascii_case(IMPORTED_TEMPLATE_KEY) {
            let seed = self.last_import.clone().unwrap_or_default();
            self.activate(&Template::imported(seed));
            return Ok(());
        }
        let template = self.catalog.lookup(key)?.clone();
        self.activate(&template);
        Ok(())
    }

    fn activate(&mut self, template: &Template) {
        self.template_key = template.key.clone();
        self.template_name = template.name.clone();
        self.scale_class = template.scale;
        self.dataset = GroupService::apply_custom_bounds(&template.seed, template.scale);
        self.total_budget_limit = template.total_budget_limit;
        self.custom_group_count = self.dataset.user_editable_count();
        self.warning_shown = false;
        self.pending_warning = None;
        self.refresh_warning();
        tracing::info!(
            template = %self.template_key,
            groups = self.dataset.len(),
            limit = %self.total_budget_limit,
            "template selected"
        );
    }

    pub fn summary(&self) -> AllocationSummary {
        SummaryService::summarize(&self.dataset, self.total_budget_limit)
    }

    pub fn pie_series(&self) -> ChartSeries {
        SummaryService::pie_series(&self.summary())
    }

    pub fn bar_series(&self) -> ChartSeries {
        SummaryService::bar_series(&self.summary())
    }

    /// Hands out the over-allocation warning at most once per excursion above the limit.
    pub fn take_warning(&mut self) -> Option<BudgetWarning> {
        self.pending_warning.take()
    }

    fn refresh_warning(&mut self) {
        let summary = self.summary();
        if summary.is_over_budget() {
            if !self.warning_shown {
                self.warning_shown = true;
                tracing::warn!(
                    allocated = %summary.allocated,
                    limit = %summary.total_budget_limit,
                    "allocation exceeds the total budget limit"
                );
                self.pending_warning = Some(BudgetWarning {
                    allocated: summary.allocated,
                    limit: summary.total_budget_limit,
                });
            }
        } else {
            self.warning_shown = false;
            self.pending_warning = None;
        }
    }

    fn commit(&mut self, dataset: Dataset) {
        self.dataset = dataset;
        self.refresh_warning();
    }

    /// Finds a group by id, then by name ignoring case.
    pub fn resolve_group(&self, input: &str) -> Result<&Group> {
        let needle = input.trim();
        self.dataset
            .group(needle)
            .or_else(|| self.dataset.groups().find(|g| g.name.eq_ignore_ascii_case(needle)))
            .or_else(|| self.dataset.groups().find(|g| g.id.eq_ignore_ascii_case(needle)))
            .ok_or_else(|| PlannerError::GroupNotFound(needle.to_string()))
    }

    /// Resolves `group` and `item` user input to a group id and item key.
    pub fn resolve_item(&self, group: &str, item: &str) -> Result<(String, ItemKey)> {
        let group = self.resolve_group(group)?;
        let key = group
            .items
            .resolve(item)
            .ok_or_else(|| PlannerError::ItemNotFound {
                group: group.id.clone(),
                item: item.trim().to_string(),
            })?;
        Ok((group.id.clone(), key))
    }

    pub fn set_budget(&mut self, group_id: &str, key: &ItemKey, budget: Decimal) -> Result<()> {
        let updated = AllocationService::set_budget(&self.dataset, group_id, key, budget)?;
        self.commit(updated);
        Ok(())
    }

    /// Range-control entry: `scaled` is expressed in the current display unit.
    pub fn set_budget_scaled(
        &mut self,
        group_id: &str,
        key: &ItemKey,
        scaled: Decimal,
    ) -> Result<()> {
        let budget = self.display_scale.to_stored(scaled).ok_or_else(|| {
            PlannerError::InvalidInput(format!(
                "{scaled} {} is outside the supported range",
                self.display_scale.label().to_lowercase()
            ))
        })?;
        self.set_budget(group_id, key, budget)
    }

    pub fn set_quantity(&mut self, group_id: &str, key: &ItemKey, raw: &str) -> Result<()> {
        let updated = AllocationService::set_quantity(&self.dataset, group_id, key, raw)?;
        self.commit(updated);
        Ok(())
    }

    pub fn set_unit_cost(&mut self, group_id: &str, key: &ItemKey, raw: &str) -> Result<()> {
        let updated = AllocationService::set_unit_cost(&self.dataset, group_id, key, raw)?;
        self.commit(updated);
        Ok(())
    }

    pub fn add_item(&mut self, group_id: &str, name: &str) -> Result<ItemKey> {
        let (updated, key) =
            GroupService::add_item(&self.dataset, group_id, name, self.scale_class)?;
        self.commit(GroupService::apply_custom_bounds(&updated, self.scale_class));
        Ok(key)
    }

    pub fn delete_item(&mut self, group_id: &str, key: &ItemKey) -> Result<()> {
        let updated = GroupService::delete_item(&self.dataset, group_id, key)?;
        self.commit(updated);
        Ok(())
    }

    pub fn delete_group(&mut self, group_id: &str) -> Result<()> {
        let (updated, removed) = GroupService::delete_group(&self.dataset, group_id)?;
        if removed.is_user_editable() {
            self.custom_group_count = self.custom_group_count.saturating_sub(1);
        }
        self.commit(updated);
        Ok(())
    }

    pub fn set_num_items(&mut self, group_id: &str, count: usize) -> Result<()> {
        let updated =
            GroupService::set_num_items(&self.dataset, group_id, count, self.scale_class)?;
        self.commit(GroupService::apply_custom_bounds(&updated, self.scale_class));
        Ok(())
    }

    pub fn rename_group(&mut self, group_id: &str, name: &str) -> Result<()> {
        let updated = GroupService::rename_group(&self.dataset, group_id, name)?;
        self.commit(updated);
        Ok(())
    }

    pub fn rename_item(&mut self, group_id: &str, key: &ItemKey, name: &str) -> Result<()> {
        let updated = GroupService::rename_item(&self.dataset, group_id, key, name)?;
        self.commit(updated);
        Ok(())
    }

    /// Appends a custom group and returns its id.
    pub fn create_group(&mut self) -> Result<String> {
        let (updated, id) =
            GroupService::create_group(&self.dataset, self.custom_group_count, self.scale_class)?;
        self.custom_group_count += 1;
        self.commit(updated);
        Ok(id)
    }

    pub fn toggle_expand(&mut self, group_id: &str) -> Result<()> {
        let updated = GroupService::toggle_expand(&self.dataset, group_id)?;
        self.commit(updated);
        Ok(())
    }

    /// Sets the total budget limit, clamped to `[0, 1e12]`.
    pub fn set_total_budget_limit(&mut self, limit: Decimal) -> Decimal {
        let clamped = limit.clamp(Decimal::ZERO, Decimal::from(MAX_TOTAL_BUDGET));
        if clamped != limit {
            tracing::warn!(requested = %limit, applied = %clamped, "total budget limit clamped");
        }
        self.total_budget_limit = clamped;
        self.refresh_warning();
        clamped
    }

    /// Like [`Session::set_total_budget_limit`]; values too large to convert clamp to the ceiling.
    pub fn set_total_budget_limit_scaled(&mut self, scaled: Decimal) -> Decimal {
        let limit = self.display_scale.to_stored(scaled).unwrap_or_else(|| {
            if scaled.is_sign_negative() {
                Decimal::ZERO
            } else {
                Decimal::from(MAX_TOTAL_BUDGET)
            }
        });
        self.set_total_budget_limit(limit)
    }

    pub fn set_display_scale(&mut self, scale: DisplayScale) {
        self.display_scale = scale;
    }

    /// Formats a stored amount in the current display unit.
    pub fn format_scaled(&self, value: Decimal) -> String {
        self.display_scale.format(value, 2)
    }

    /// Parses a sheet and, on success, makes it the working dataset under the imported
    /// template key. Structural failures leave the session unchanged.
    pub fn import_csv<R: Read>(&mut self, reader: R) -> Result<ImportOutcome> {
        let outcome = spreadsheet::read_dataset(reader)?;
        self.last_import = Some(outcome.dataset.clone());
        self.activate(&Template::imported(outcome.dataset.clone()));
        Ok(outcome)
    }

    pub fn import_path(&mut self, path: &Path) -> Result<ImportOutcome> {
        let file = File::open(path).map_err(ImportError::from)?;
        self.import_csv(file)
    }

    pub fn export_csv<W: Write>(&self, writer: W) -> Result<usize> {
        spreadsheet::write_dataset(&self.dataset, writer)
    }

    pub fn export_path(&self, path: &Path) -> Result<usize> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        self.export_csv(file)
    }

    /// Lays out the current view as a paginated document.
    pub fn report(&self, page_height: usize) -> Result<Document> {
        let summary = self.summary();
        Document::build(
            &ReportInput {
                template_name: &self.template_name,
                dataset: &self.dataset,
                summary: &summary,
                scale: self.display_scale,
                generated_at: Local::now().naive_local(),
            },
            page_height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_on(key: &str) -> Session {
        let mut session = Session::new();
        session.select_template(key).expect("template");
        session
    }

    #[test]
    fn starts_on_default_template() {
        let session = Session::new();
        assert_eq!(session.template_key(), DEFAULT_TEMPLATE_KEY);
        assert_eq!(
            session.total_budget_limit(),
            Decimal::from(3_023_000_000_000i64)
        );
        assert_eq!(session.display_scale(), DisplayScale::Billions);
    }

    #[test]
    fn unknown_template_leaves_state_untouched() {
        let mut session = session_on("Personal and Housing Budget");
        let before = session.dataset().clone();
        assert!(session.select_template("Nope").is_err());
        assert_eq!(session.template_key(), "Personal and Housing Budget");
        assert_eq!(session.dataset(), &before);
    }

    #[test]
    fn selecting_resets_limit_and_custom_count() {
        let mut session = session_on("Custom Template-Small");
        assert_eq!(session.custom_group_count(), 1);
        assert_eq!(session.budget_ceiling(), Decimal::from(1_000_000_000));
        session.set_total_budget_limit(Decimal::from(5));
        session.select_template("Custom Template-Small").expect("reselect");
        assert_eq!(session.total_budget_limit(), Decimal::from(100_000_000));
    }

    #[test]
    fn warning_fires_once_per_excursion() {
        let mut session = session_on("Custom Template-Small");
        let (group, key) = session.resolve_item("custom_group_1", "1").expect("item");
        session.set_total_budget_limit(Decimal::from(100));
        assert!(session.take_warning().is_none());

        session.set_quantity(&group, &key, "1").expect("quantity");
        let warning = session.take_warning().expect("warning raised");
        assert_eq!(warning.limit, Decimal::from(100));

        session.set_quantity(&group, &key, "2").expect("quantity");
        assert!(session.take_warning().is_none());

        session.set_quantity(&group, &key, "0").expect("quantity");
        session.set_quantity(&group, &key, "3").expect("quantity");
        assert!(session.take_warning().is_some());
    }

    #[test]
    fn total_limit_is_clamped() {
        let mut session = Session::new();
        assert_eq!(
            session.set_total_budget_limit(Decimal::from(-5)),
            Decimal::ZERO
        );
        assert_eq!(
            session.set_total_budget_limit_scaled(Decimal::from(5_000)),
            Decimal::from(MAX_TOTAL_BUDGET)
        );
    }

    #[test]
    fn deleting_custom_group_frees_a_slot() {
        let mut session = session_on("Custom Template-Big");
        let id = session.create_group().expect("create");
        assert_eq!(session.custom_group_count(), 2);
        session.delete_group(&id).expect("delete");
        session.delete_group("custom_group_1").expect("delete");
        assert_eq!(session.custom_group_count(), 0);
        assert!(session.dataset().is_empty());
    }

    #[test]
    fn failed_import_keeps_dataset() {
        let mut session = session_on("Force Structure Planner");
        let before = session.dataset().clone();
        let err = session
            .import_csv("Group,Quantity\nA,1\n".as_bytes())
            .expect_err("no item column");
        assert!(matches!(err, PlannerError::Import(ImportError::MissingColumns { .. })));
        assert_eq!(session.dataset(), &before);
        assert_eq!(session.template_key(), "Force Structure Planner");
    }

    #[test]
    fn import_activates_and_can_be_reselected() {
        let mut session = Session::new();
        session
            .import_csv("Group,Item,Quantity,Unit Cost,Total Cost\nOps,Fuel,2,5,10\n".as_bytes())
            .expect("import");
        assert_eq!(session.template_key(), IMPORTED_TEMPLATE_KEY);
        assert_eq!(session.total_budget_limit(), Decimal::from(MAX_TOTAL_BUDGET));
        assert_eq!(session.custom_group_count(), 1);

        session.select_template(DEFAULT_TEMPLATE_KEY).expect("default");
        session.select_template(IMPORTED_TEMPLATE_KEY).expect("imported");
        assert_eq!(session.dataset().len(), 1);
        assert!(session.resolve_group("ops").is_ok());
    }

    #[test]
    fn scaled_budget_uses_display_unit() {
        let mut session = session_on("Force Structure Planner");
        session.set_display_scale(DisplayScale::Millions);
        let (group, key) = session
            .resolve_item("Offensive Missile Forces", "arash 2 drones")
            .expect("item");
        session
            .set_budget_scaled(&group, &key, Decimal::new(25, 1))
            .expect("budget");
        let item = session
            .dataset()
            .group(&group)
            .and_then(|g| g.item(&key))
            .expect("item");
        assert_eq!(item.budget, Decimal::from(2_500_000));
        assert_eq!(item.quantity, Decimal::from(25));
    }
}
