//! Erwerbstätigenfreibetrag (§ 11b SGB II)
//!
//! Earned income is disregarded band by band: 100 % of the first 100 €,
//! then 20 %, 30 % and (without a child) 10 % of the following slices.
//! With a minor child the 30 % band reaches up to 1.500 € instead.
//! Income above the last band counts in full.
//!
//! Social insurance, the work-expense flat rate and the insurance flat rate
//! are added on top of the band disregard, but never push the total
//! disregard above gross income.

use crate::money::{clamp_amount, percent_of, round_cents};
use crate::reference::RuleSet;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared_types::{BreakdownLine, CalculationResult};
use tracing::debug;

/// Social insurance contribution: from the payslip, or a flat estimate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "amount", rename_all = "snake_case")]
pub enum SocialInsurance {
    #[default]
    FlatEstimate,
    Amount(Decimal),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncomeDisregardInput {
    pub gross_income: Decimal,
    pub has_child: bool,
    pub social_insurance: SocialInsurance,
    /// Defaults to the table's flat rate
    pub work_expense_allowance: Option<Decimal>,
    /// Defaults to the table's flat rate
    pub insurance_allowance: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeDisregardReport {
    /// Band lines followed by fixed deduction lines; total is the full disregard
    pub result: CalculationResult,
    pub gross_income: Decimal,
    /// Disregard from the bands alone
    pub tier_disregard: Decimal,
    /// Fixed deductions actually applied (capped by remaining income)
    pub fixed_deductions: Decimal,
    pub total_disregard: Decimal,
    /// Gross income minus the band disregard
    pub countable_before_deductions: Decimal,
    /// Gross income minus the total disregard
    pub countable_income: Decimal,
}

pub fn calculate(input: &IncomeDisregardInput, rules: &RuleSet) -> IncomeDisregardReport {
    let table = &rules.income_disregard;
    let gross = clamp_amount(input.gross_income);
    let schedule = table.schedule(input.has_child);

    let mut result = CalculationResult::new();
    for portion in schedule.evaluate(gross) {
        if portion.portion.is_zero() {
            continue;
        }
        result.push_line(BreakdownLine::new(
            portion.band.label.clone(),
            portion.amount,
            portion.band.legal_reference.clone(),
            format!(
                "{} % von {} € Einkommensanteil",
                portion.band.rate_percent.normalize(),
                portion.portion.normalize()
            ),
        ));
    }
    let tier_disregard = result.total();

    let social_insurance = match input.social_insurance {
        SocialInsurance::Amount(amount) => clamp_amount(amount),
        SocialInsurance::FlatEstimate => {
            round_cents(percent_of(gross, table.social_insurance_estimate_percent))
        }
    };
    let deductions = [
        (
            "Sozialversicherungsbeiträge",
            social_insurance,
            "§ 11b Abs. 1 Satz 1 Nr. 2 SGB II",
            "Pflichtbeiträge zur Sozialversicherung",
        ),
        (
            "Werbungskostenpauschale",
            clamp_amount(input.work_expense_allowance.unwrap_or(table.work_expense_allowance)),
            "§ 11b Abs. 1 Satz 1 Nr. 5 SGB II",
            "Mit der Erzielung des Einkommens verbundene Ausgaben",
        ),
        (
            "Versicherungspauschale",
            clamp_amount(input.insurance_allowance.unwrap_or(table.insurance_allowance)),
            "§ 11b Abs. 1 Satz 1 Nr. 3 SGB II, § 6 Bürgergeld-V",
            "Pauschale für private Versicherungen",
        ),
    ];

    let mut remaining = gross - tier_disregard;
    for (label, amount, reference, explanation) in deductions {
        let applied = amount.min(remaining);
        if applied > Decimal::ZERO {
            result.push_line(BreakdownLine::new(label, applied, reference, explanation));
            remaining -= applied;
        }
    }

    if matches!(input.social_insurance, SocialInsurance::FlatEstimate) && gross > Decimal::ZERO {
        result.push_hint(format!(
            "Sozialversicherungsbeiträge wurden pauschal mit {} % des Bruttoeinkommens geschätzt. \
             Für ein genaues Ergebnis bitte den Betrag aus der Lohnabrechnung eintragen.",
            table.social_insurance_estimate_percent.normalize()
        ));
    }
    if let Some(top) = schedule.top() {
        if gross > top {
            result.push_hint(format!(
                "Einkommen oberhalb von {} € wird vollständig angerechnet.",
                top.normalize()
            ));
        }
    }

    let total_disregard = result.total();
    let report = IncomeDisregardReport {
        gross_income: gross,
        tier_disregard,
        fixed_deductions: total_disregard - tier_disregard,
        total_disregard,
        countable_before_deductions: (gross - tier_disregard).max(Decimal::ZERO),
        countable_income: (gross - total_disregard).max(Decimal::ZERO),
        result,
    };

    debug!(
        version = %rules.version,
        gross = %gross,
        has_child = input.has_child,
        tier_disregard = %report.tier_disregard,
        total_disregard = %report.total_disregard,
        "income disregard calculated"
    );
    report
}
