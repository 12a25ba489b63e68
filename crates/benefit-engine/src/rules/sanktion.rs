//! Leistungsminderung (§§ 31a, 32 SGB II)
//!
//! Only the Regelbedarf is reduced. Housing costs pass through untouched.

use crate::money::{clamp_amount, percent_of, round_euros};
use crate::reference::{RuleSet, SanctionTier};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared_types::{BreakdownLine, CalculationResult};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationType {
    /// Pflichtverletzung (§ 31 SGB II)
    #[default]
    DutyViolation,
    /// Meldeversäumnis (§ 32 SGB II)
    MissedAppointment,
}

impl ViolationType {
    pub fn legal_reference(&self) -> &'static str {
        match self {
            ViolationType::DutyViolation => "§ 31a Abs. 1 SGB II",
            ViolationType::MissedAppointment => "§ 32 SGB II",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSequence {
    #[default]
    First,
    Second,
    ThirdOrLater,
}

impl ViolationSequence {
    /// Map a 1-based violation count; zero is treated as the first
    pub fn from_number(n: u32) -> Self {
        match n {
            0 | 1 => ViolationSequence::First,
            2 => ViolationSequence::Second,
            _ => ViolationSequence::ThirdOrLater,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanctionInput {
    pub regelsatz: Decimal,
    pub violation: ViolationType,
    pub sequence: ViolationSequence,
    pub under_25: bool,
    /// Monthly KdU; reported back unchanged
    pub housing_cost: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanctionReport {
    /// Single reduction line; total is the monthly reduction
    pub result: CalculationResult,
    pub percent: Decimal,
    pub duration_months: u32,
    pub reduction: Decimal,
    pub reduced_regelsatz: Decimal,
    pub housing_cost: Option<Decimal>,
    pub important_reasons: Vec<String>,
}

fn tier_for(input: &SanctionInput, rules: &RuleSet) -> SanctionTier {
    let table = &rules.sanctions;
    match (input.violation, input.sequence) {
        (ViolationType::MissedAppointment, _) => table.missed_appointment,
        (ViolationType::DutyViolation, ViolationSequence::First) => table.first,
        (ViolationType::DutyViolation, ViolationSequence::Second) => table.second,
        (ViolationType::DutyViolation, ViolationSequence::ThirdOrLater) => table.repeated,
    }
}

pub fn calculate(input: &SanctionInput, rules: &RuleSet) -> SanctionReport {
    let table = &rules.sanctions;
    let regelsatz = clamp_amount(input.regelsatz);
    let tier = tier_for(input, rules);
    let percent = tier.percent.min(table.ceiling_percent);
    let reduction = round_euros(percent_of(regelsatz, percent));

    let mut result = CalculationResult::new();
    result.push_line(BreakdownLine::new(
        "Minderung des Regelbedarfs",
        reduction,
        input.violation.legal_reference(),
        format!(
            "{} % des Regelbedarfs von {} € für {} Monat(e)",
            percent.normalize(),
            regelsatz.normalize(),
            tier.duration_months
        ),
    ));

    result.push_hint(format!(
        "Gegen den Minderungsbescheid kann innerhalb von {} Monat(en) nach Bekanntgabe Widerspruch eingelegt werden.",
        table.objection_deadline_months
    ));
    result.push_hint(
        "Würde die Minderung eine außergewöhnliche Härte bedeuten, ist von ihr abzusehen (§ 31a Abs. 3 SGB II).",
    );
    if input.under_25 {
        result.push_hint(
            "Für Leistungsberechtigte unter 25 Jahren gelten keine verschärften Minderungsregeln mehr.",
        );
    }
    if input.housing_cost.is_some() {
        result.push_hint("Die Kosten der Unterkunft und Heizung werden nicht gemindert.");
    }

    debug!(
        version = %rules.version,
        violation = ?input.violation,
        sequence = ?input.sequence,
        percent = %percent,
        reduction = %reduction,
        "sanction calculated"
    );

    SanctionReport {
        result,
        percent,
        duration_months: tier.duration_months,
        reduction,
        reduced_regelsatz: (regelsatz - reduction).max(Decimal::ZERO),
        housing_cost: input.housing_cost,
        important_reasons: table.important_reasons.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferenceData;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn rules() -> RuleSet {
        ReferenceData::builtin().unwrap().versions()[0].clone()
    }

    fn duty(sequence: ViolationSequence) -> SanctionInput {
        SanctionInput {
            regelsatz: dec!(563),
            violation: ViolationType::DutyViolation,
            sequence,
            under_25: false,
            housing_cost: Some(dec!(650)),
        }
    }

    #[test]
    fn test_third_violation_reduces_by_thirty_percent() {
        let report = calculate(&duty(ViolationSequence::ThirdOrLater), &rules());
        assert_eq!(report.percent, dec!(30));
        assert_eq!(report.reduction, dec!(169));
        assert_eq!(report.duration_months, 3);
        assert_eq!(report.reduced_regelsatz, dec!(394));
        assert_eq!(report.housing_cost, Some(dec!(650)));
        assert_eq!(report.result.total(), dec!(169));
    }

    #[test]
    fn test_sequence_tiers() {
        let rules = rules();
        let first = calculate(&duty(ViolationSequence::First), &rules);
        let second = calculate(&duty(ViolationSequence::Second), &rules);

        assert_eq!((first.percent, first.duration_months), (dec!(10), 1));
        assert_eq!(first.reduction, dec!(56));
        assert_eq!((second.percent, second.duration_months), (dec!(20), 2));
        assert_eq!(second.reduction, dec!(113));
    }

    #[test]
    fn test_from_number() {
        assert_eq!(ViolationSequence::from_number(0), ViolationSequence::First);
        assert_eq!(ViolationSequence::from_number(2), ViolationSequence::Second);
        assert_eq!(ViolationSequence::from_number(7), ViolationSequence::ThirdOrLater);
    }

    #[test]
    fn test_missed_appointment_does_not_escalate() {
        let input = SanctionInput {
            violation: ViolationType::MissedAppointment,
            ..duty(ViolationSequence::ThirdOrLater)
        };
        let report = calculate(&input, &rules());
        assert_eq!(report.percent, dec!(10));
        assert_eq!(report.duration_months, 1);
        assert_eq!(report.result.lines()[0].legal_reference, "§ 32 SGB II");
    }

    #[test]
    fn test_tier_is_clamped_to_ceiling() {
        let mut rules = rules();
        rules.sanctions.ceiling_percent = dec!(25);
        let report = calculate(&duty(ViolationSequence::ThirdOrLater), &rules);
        assert_eq!(report.percent, dec!(25));
        // 563 * 0.25 = 140.75
        assert_eq!(report.reduction, dec!(141));
    }

    #[test]
    fn test_hints_and_important_reasons() {
        let input = SanctionInput {
            under_25: true,
            ..duty(ViolationSequence::First)
        };
        let report = calculate(&input, &rules());
        assert!(report.result.hints()[0].contains("Widerspruch"));
        assert!(report.result.hints().iter().any(|h| h.contains("§ 31a Abs. 3")));
        assert!(report.result.hints().iter().any(|h| h.contains("unter 25")));
        assert_eq!(report.important_reasons.len(), 6);
    }
}
