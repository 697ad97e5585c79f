mod common;

use budget_planner::core::Session;
use budget_planner::domain::{DisplayScale, LineItem};
use budget_planner::errors::PlannerError;
use budget_planner::money::max_amount;
use common::{item_ref, session_on};
use rust_decimal::Decimal;

fn item<'a>(session: &'a Session, group: &str, item: &str) -> &'a LineItem {
    let (group, key) = item_ref(session, group, item);
    session
        .dataset()
        .group(&group)
        .and_then(|g| g.item(&key))
        .expect("item present")
}

fn dec(raw: &str) -> Decimal {
    raw.parse().expect("decimal literal")
}

#[test]
fn budget_edit_floors_quantity_and_keeps_unit_cost() {
    let mut session = session_on("Personal and Housing Budget");
    let (group, key) = item_ref(&session, "housing_and_utilities", "Rent");

    session.set_budget(&group, &key, dec("5000")).expect("set budget");

    let rent = item(&session, "housing_and_utilities", "Rent");
    assert_eq!(rent.budget, dec("5000"));
    assert_eq!(rent.quantity, dec("4"));
    assert_eq!(rent.unit_cost, dec("1200"));
}

#[test]
fn quantity_edit_recomputes_budget() {
    let mut session = session_on("Personal and Housing Budget");
    let (group, key) = item_ref(&session, "transportation", "Fuel");

    session.set_quantity(&group, &key, "7.9").expect("set quantity");

    let fuel = item(&session, "transportation", "Fuel");
    assert_eq!(fuel.quantity, dec("7"));
    assert_eq!(fuel.budget, dec("1050"));
}

#[test]
fn unit_cost_edit_rounds_to_cents() {
    let mut session = session_on("Personal and Housing Budget");
    let (group, key) = item_ref(&session, "housing_and_utilities", "Water");

    session.set_unit_cost(&group, &key, "$33.335").expect("set cost");

    let water = item(&session, "housing_and_utilities", "Water");
    assert_eq!(water.unit_cost, dec("33.34"));
    assert_eq!(water.budget, dec("400.08"));
}

#[test]
fn unparseable_input_counts_as_zero() {
    let mut session = session_on("Personal and Housing Budget");
    let (group, key) = item_ref(&session, "housing_and_utilities", "Internet");

    session.set_quantity(&group, &key, "lots").expect("set quantity");
    let internet = item(&session, "housing_and_utilities", "Internet");
    assert_eq!(internet.quantity, Decimal::ZERO);
    assert_eq!(internet.budget, Decimal::ZERO);

    session.set_quantity(&group, &key, "3").expect("set quantity");
    session.set_unit_cost(&group, &key, "").expect("set cost");
    let internet = item(&session, "housing_and_utilities", "Internet");
    assert_eq!(internet.unit_cost, Decimal::ZERO);
    assert_eq!(internet.budget, Decimal::ZERO);
}

#[test]
fn zero_unit_cost_yields_zero_quantity_for_budget_edits() {
    let mut session = session_on("Personal and Housing Budget");
    let (group, key) = item_ref(&session, "food_groceries", "Groceries");

    session.set_unit_cost(&group, &key, "0").expect("set cost");
    session.set_budget(&group, &key, dec("900")).expect("set budget");

    let groceries = item(&session, "food_groceries", "Groceries");
    assert_eq!(groceries.budget, dec("900"));
    assert_eq!(groceries.quantity, Decimal::ZERO);
}

#[test]
fn negative_values_are_clamped() {
    let mut session = session_on("Personal and Housing Budget");
    let (group, key) = item_ref(&session, "transportation", "Maintenance");

    session.set_budget(&group, &key, dec("-50")).expect("set budget");
    assert_eq!(item(&session, "transportation", "Maintenance").budget, Decimal::ZERO);

    session.set_quantity(&group, &key, "-4").expect("set quantity");
    assert_eq!(item(&session, "transportation", "Maintenance").quantity, Decimal::ZERO);
}

#[test]
fn edits_only_touch_the_target_item() {
    let mut session = session_on("Personal and Housing Budget");
    let before = session.dataset().clone();
    let (group, key) = item_ref(&session, "housing_and_utilities", "Electricity");

    session.set_quantity(&group, &key, "6").expect("set quantity");

    for (old, new) in before.groups().zip(session.dataset().groups()) {
        if old.id != "housing_and_utilities" {
            assert_eq!(old, new);
        }
    }
    assert_eq!(item(&session, "housing_and_utilities", "Rent").budget, dec("14400"));
}

#[test]
fn summary_tracks_allocation_and_remaining() {
    let mut session = session_on("Personal and Housing Budget");
    let allocated = session.summary().allocated;
    let (group, key) = item_ref(&session, "housing_and_utilities", "Rent");

    session.set_budget(&group, &key, dec("15400")).expect("set budget");

    let summary = session.summary();
    assert_eq!(summary.allocated, allocated + dec("1000"));
    assert_eq!(summary.remaining, summary.total_budget_limit - summary.allocated);
    let subtotal: Decimal = summary.groups.iter().map(|g| g.subtotal).sum();
    assert_eq!(subtotal, summary.allocated);
}

#[test]
fn over_allocation_warns_once_until_back_within_limit() {
    let mut session = session_on("Personal and Housing Budget");
    let (group, key) = item_ref(&session, "housing_and_utilities", "Rent");
    assert!(session.take_warning().is_none());

    session.set_budget(&group, &key, dec("60000")).expect("over limit");
    assert!(session.take_warning().is_some());
    session.set_budget(&group, &key, dec("61000")).expect("still over");
    assert!(session.take_warning().is_none());

    session.set_total_budget_limit(dec("1000000"));
    session.set_total_budget_limit(dec("50000"));
    assert!(session.take_warning().is_some());
}

#[test]
fn pie_series_appends_remaining_floored_at_zero() {
    let mut session = session_on("Personal and Housing Budget");
    let pie = session.pie_series();
    let last = pie.points.last().expect("remaining point");
    assert_eq!(last.label, "Remaining Budget");
    assert_eq!(last.value, session.summary().remaining);

    session.set_total_budget_limit(Decimal::ZERO);
    let pie = session.pie_series();
    assert_eq!(pie.points.last().map(|p| p.value), Some(Decimal::ZERO));
    assert_eq!(pie.points.len(), session.dataset().len() + 1);
}

#[test]
fn trillion_scale_slider_rejects_values_past_the_decimal_range() {
    let mut session = session_on("Personal and Housing Budget");
    session.set_display_scale(DisplayScale::Trillions);
    let (group, key) = item_ref(&session, "housing_and_utilities", "Rent");
    let allocated = session.summary().allocated;

    let err = session
        .set_budget_scaled(&group, &key, dec("100000000000000000000"))
        .expect_err("product overflows");
    assert!(matches!(err, PlannerError::InvalidInput(_)));

    let err = session
        .set_budget_scaled(&group, &key, dec("5000"))
        .expect_err("five quadrillion is past the amount ceiling");
    assert!(matches!(err, PlannerError::InvalidInput(_)));

    assert_eq!(item(&session, "housing_and_utilities", "Rent").budget, dec("14400"));
    assert_eq!(session.summary().allocated, allocated);

    session.set_budget_scaled(&group, &key, dec("2.5")).expect("in range");
    assert_eq!(
        item(&session, "housing_and_utilities", "Rent").budget,
        dec("2500000000000")
    );
}

#[test]
fn oversized_budgets_are_refused_and_totals_stay_computable() {
    let mut session = session_on("Personal and Housing Budget");
    let (group, rent) = item_ref(&session, "housing_and_utilities", "Rent");
    let (_, water) = item_ref(&session, "housing_and_utilities", "Water");
    let before = session.summary();

    for key in [&rent, &water] {
        let err = session
            .set_budget(&group, key, dec("50000000000000000000000000000"))
            .expect_err("budget past ceiling");
        assert!(matches!(err, PlannerError::InvalidInput(_)));
    }
    assert_eq!(session.summary(), before);

    session.set_budget(&group, &rent, max_amount()).expect("rent at ceiling");
    session.set_budget(&group, &water, max_amount()).expect("water at ceiling");
    let summary = session.summary();
    assert_eq!(
        summary.allocated,
        before.allocated - dec("15000") + max_amount() + max_amount()
    );
    assert!(summary.remaining < Decimal::ZERO);
    assert!(session.take_warning().is_some());
}

#[test]
fn quantity_and_cost_edits_past_the_ceiling_are_refused() {
    let mut session = session_on("Personal and Housing Budget");
    let (group, key) = item_ref(&session, "housing_and_utilities", "Rent");

    let err = session
        .set_quantity(&group, &key, "10000000000000000000")
        .expect_err("quantity too large");
    assert!(matches!(err, PlannerError::InvalidInput(_)));
    let err = session
        .set_unit_cost(&group, &key, "999999999999999999")
        .expect_err("unit cost too large");
    assert!(matches!(err, PlannerError::InvalidInput(_)));

    let rent = item(&session, "housing_and_utilities", "Rent");
    assert_eq!(rent.quantity, dec("12"));
    assert_eq!(rent.unit_cost, dec("1200"));
}

#[test]
fn scaled_total_limit_clamps_instead_of_overflowing() {
    let mut session = session_on("Personal and Housing Budget");
    session.set_display_scale(DisplayScale::Trillions);

    let applied = session.set_total_budget_limit_scaled(dec("100000000000000000000"));
    assert_eq!(applied, dec("1000000000000"));
    let applied = session.set_total_budget_limit_scaled(dec("-100000000000000000000"));
    assert_eq!(applied, Decimal::ZERO);
    let applied = session.set_total_budget_limit_scaled(dec("0.5"));
    assert_eq!(applied, dec("500000000000"));
}
