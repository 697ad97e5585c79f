mod common;

use budget_planner::core::Session;
use budget_planner::domain::{DisplayScale, ScaleClass, MAX_TOTAL_BUDGET};
use budget_planner::errors::PlannerError;
use budget_planner::templates::{TemplateCatalog, DEFAULT_TEMPLATE_KEY, IMPORTED_TEMPLATE_KEY};
use common::session_on;
use rust_decimal::Decimal;

#[test]
fn catalog_lists_ten_templates_in_order() {
    let keys: Vec<_> = TemplateCatalog::global().keys().collect();
    assert_eq!(keys.len(), 10);
    assert_eq!(keys[0], DEFAULT_TEMPLATE_KEY);
    assert!(keys.contains(&"Agricultural Data Company"));
    assert!(!keys.contains(&IMPORTED_TEMPLATE_KEY));
}

#[test]
fn every_template_loads_with_its_limit_and_scale() {
    let expected = [
        ("Default", "3023000000000", ScaleClass::Large),
        ("Force Structure Planner", "143000000000", ScaleClass::Large),
        ("US Force Structure Template", "838450000000", ScaleClass::Large),
        ("Personal and Housing Budget", "50000", ScaleClass::Small),
        ("Property Management Budget", "500000", ScaleClass::Small),
        ("Small Business Construction Company", "1000000", ScaleClass::Small),
        ("Small Manufacturing Company", "2000000", ScaleClass::Small),
        ("Custom Template-Big", "135700000000", ScaleClass::Large),
        ("Custom Template-Small", "100000000", ScaleClass::Small),
        ("Agricultural Data Company", "1000000000", ScaleClass::Small),
    ];
    for (key, limit, scale) in expected {
        let session = session_on(key);
        let limit: Decimal = limit.parse().expect("limit");
        assert_eq!(session.total_budget_limit(), limit, "{key}");
        assert_eq!(session.scale_class(), scale, "{key}");
        assert!(!session.dataset().is_empty(), "{key}");
    }
}

#[test]
fn selecting_a_template_discards_edits() {
    let mut session = session_on("Personal and Housing Budget");
    let pristine = session.dataset().clone();
    session.create_group().expect("create");
    session.set_total_budget_limit(Decimal::from(10));

    session.select_template("Personal and Housing Budget").expect("reselect");
    assert_eq!(session.dataset(), &pristine);
    assert_eq!(session.total_budget_limit(), Decimal::from(50_000));
}

#[test]
fn lookup_is_case_insensitive_and_accepts_display_names() {
    let mut session = Session::new();
    session.select_template("force structure planner").expect("key");
    assert_eq!(session.template_key(), "Force Structure Planner");

    session.select_template("Congressional Spending Template").expect("name");
    assert_eq!(session.template_key(), DEFAULT_TEMPLATE_KEY);
}

#[test]
fn unknown_template_suggests_the_closest_key() {
    let mut session = Session::new();
    let err = session.select_template("Defualt").expect_err("unknown");
    match err {
        PlannerError::UnknownTemplate { suggestion, .. } => {
            assert_eq!(suggestion.as_deref(), Some(DEFAULT_TEMPLATE_KEY));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn imported_template_is_empty_before_any_import() {
    let mut session = Session::new();
    session.select_template(IMPORTED_TEMPLATE_KEY).expect("imported");
    assert!(session.dataset().is_empty());
    assert_eq!(session.total_budget_limit(), Decimal::from(MAX_TOTAL_BUDGET));
    assert_eq!(session.budget_ceiling(), Decimal::from(MAX_TOTAL_BUDGET));
}

#[test]
fn custom_items_use_the_template_scale_ceiling() {
    let session = session_on("Personal and Housing Budget");
    let custom = session.dataset().group("custom_group_1").expect("custom group");
    assert!(custom
        .items
        .values()
        .all(|item| item.max == ScaleClass::Small.default_max()));
    assert_eq!(session.budget_ceiling(), Decimal::from(1_000_000_000));
}

#[test]
fn display_scale_only_changes_presentation() {
    let mut session = session_on("Default");
    let allocated = session.summary().allocated;

    session.set_display_scale(DisplayScale::Trillions);
    assert_eq!(session.summary().allocated, allocated);
    assert_eq!(session.format_scaled(allocated), "$3.02T");

    session.set_display_scale(DisplayScale::Millions);
    assert_eq!(session.format_scaled(Decimal::new(1_234_567_890, 0)), "$1,234.57M");
}
