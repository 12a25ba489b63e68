//! Worked examples run end to end through the engine

use benefit_engine::rules::freibetrag::{IncomeDisregardInput, SocialInsurance};
use benefit_engine::rules::kdu::{HousingCostInput, HousingStatus};
use benefit_engine::rules::mehrbedarf::{DietCategory, SupplementaryNeedsInput};
use benefit_engine::rules::sanktion::{SanctionInput, ViolationSequence, ViolationType};
use benefit_engine::rules::schonvermoegen::AssetInput;
use benefit_engine::{history_entry, to_export, BenefitEngine, CalculatorKind, HouseholdContext};
use chrono::{NaiveDate, TimeZone, Utc};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use shared_types::Lookup;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn setup() -> (BenefitEngine, NaiveDate) {
    init_tracing();
    let engine = BenefitEngine::with_builtin_rules().expect("builtin rules load");
    (engine, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
}

#[test]
fn income_600_without_child() {
    let (engine, on) = setup();
    let input = IncomeDisregardInput {
        gross_income: dec!(600),
        has_child: false,
        social_insurance: SocialInsurance::Amount(Decimal::ZERO),
        work_expense_allowance: Some(Decimal::ZERO),
        insurance_allowance: Some(Decimal::ZERO),
    };
    let report = engine.income_disregard(&input, on);

    assert_eq!(report.tier_disregard, dec!(208));
    assert_eq!(report.countable_before_deductions, dec!(392));

    let labels: Vec<&str> = report.result.lines().iter().map(|l| l.label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["Grundfreibetrag", "Freibetrag 100 bis 520 €", "Freibetrag 520 bis 1.000 €"]
    );
}

#[test]
fn unknown_jurisdiction_is_not_found() {
    let (engine, on) = setup();
    let input = HousingCostInput {
        jurisdiction: "Hintertupfingen".to_string(),
        household_size: 2,
        cold_rent: dec!(500),
        utilities: dec!(120),
        heating: dec!(90),
        living_area: dec!(60),
        in_waiting_period: false,
    };

    match engine.housing_cost(&input, on) {
        Lookup::NotFound { key } => assert_eq!(key, "Hintertupfingen"),
        Lookup::Found(report) => panic!("expected not found, got {:?}", report.status),
    }
}

#[test]
fn third_violation_on_563() {
    let (engine, on) = setup();
    let input = SanctionInput {
        regelsatz: dec!(563),
        violation: ViolationType::DutyViolation,
        sequence: ViolationSequence::from_number(3),
        under_25: false,
        housing_cost: Some(dec!(720)),
    };
    let report = engine.sanction(&input, on);

    assert_eq!(report.reduction, dec!(169));
    assert_eq!(report.duration_months, 3);
    assert_eq!(report.housing_cost, Some(dec!(720)));
    assert!(report.result.lines().iter().all(|l| l.amount == dec!(169)));
}

#[test]
fn single_parent_staffelung_examples() {
    let (engine, on) = setup();
    for ages in [vec![6], vec![10, 14]] {
        let input = SupplementaryNeedsInput {
            regelsatz: dec!(563),
            household_size: 1 + ages.len() as u32,
            child_ages: ages.clone(),
            single_parent: true,
            ..Default::default()
        };
        let result = engine.supplementary_needs(&input, on).found().unwrap();
        // 36 % of 563
        assert_eq!(result.total(), dec!(202.68), "children {:?}", ages);
    }
}

#[test]
fn diabetes_is_a_hint_not_an_amount() {
    let (engine, on) = setup();
    let input = SupplementaryNeedsInput {
        regelsatz: dec!(563),
        household_size: 1,
        diet: Some(DietCategory::Diabetes),
        ..Default::default()
    };
    let result = engine.supplementary_needs(&input, on).found().unwrap();

    assert!(result.is_empty());
    assert_eq!(result.total(), Decimal::ZERO);
    assert!(result.hints().iter().any(|h| h.contains("Diabetes")));
}

#[test]
fn asset_rules_change_with_calculation_date() {
    let (engine, on) = setup();
    let input = AssetInput {
        age: 28,
        household_size: 1,
        cash_holdings: dec!(9000),
        ..Default::default()
    };

    assert!(engine.asset_exemption(&input, on).eligible);

    let later = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
    let report = engine.asset_exemption(&input, later);
    assert_eq!(report.allowance, dec!(5000));
    assert_eq!(report.countable_assets, dec!(4000));
    assert!(!report.eligible);
}

#[test]
fn household_form_to_export_and_history() {
    let (engine, on) = setup();
    let ctx = HouseholdContext::from_form_fields([
        ("applicant_age", "45"),
        ("adults", "2"),
        ("child_ages", "8"),
        ("jurisdiction", "80331 München"),
        ("cold_rent", "1.150"),
        ("utilities", "180"),
        ("heating", "130"),
        ("living_area", "82,5"),
    ]);
    let report = engine
        .housing_cost(&ctx.to_housing_cost_input(), on)
        .found()
        .unwrap();

    // Three persons in München: 1230 € / 120 € / 75 m²
    assert_eq!(report.status, HousingStatus::Red);
    assert_eq!(report.excess, dec!(110));

    let doc = to_export(CalculatorKind::Kdu, &report);
    assert_eq!(doc.title, "KdU-Rechner");
    assert_eq!(doc.rows.last().map(|r| r.value.as_str()), Some("1.350,00 €"));
    assert!(doc.summary.starts_with("München: exceeds limits"));

    let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let entry = history_entry(CalculatorKind::Kdu, &report, at);
    assert_eq!(entry.slug, "kdu-rechner");
    assert_eq!(entry.summary, doc.summary);
}
