//! Mehrbedarfe (§ 21 SGB II)
//!
//! Each need is an independent rule: a predicate on the input plus an
//! amount. Rules never look at each other; the result is their sum.

use crate::money::{clamp_amount, percent_of, round_cents};
use crate::reference::{Regelbedarfsstufe, RuleSet};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared_types::{BreakdownLine, CalculationResult, Lookup};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisabilityBasis {
    /// Receives participation benefits (§ 21 Abs. 4 SGB II)
    ParticipationBenefits,
    /// Merkzeichen G without participation benefits (§ 23 Nr. 4 SGB II)
    MobilityImpairment,
}

/// Krankenkost category selected in the form
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DietCategory {
    Celiac,
    RenalInsufficiency,
    Dialysis,
    ConsumingDisease,
    CysticFibrosis,
    Diabetes,
    /// Any other table key
    Custom(String),
}

impl DietCategory {
    pub fn key(&self) -> &str {
        match self {
            DietCategory::Celiac => "zoeliakie",
            DietCategory::RenalInsufficiency => "niereninsuffizienz",
            DietCategory::Dialysis => "dialyse",
            DietCategory::ConsumingDisease => "konsumierende_erkrankung",
            DietCategory::CysticFibrosis => "mukoviszidose",
            DietCategory::Diabetes => "diabetes",
            DietCategory::Custom(key) => key,
        }
    }
}

impl From<String> for DietCategory {
    fn from(key: String) -> Self {
        match key.as_str() {
            "zoeliakie" => DietCategory::Celiac,
            "niereninsuffizienz" => DietCategory::RenalInsufficiency,
            "dialyse" => DietCategory::Dialysis,
            "konsumierende_erkrankung" => DietCategory::ConsumingDisease,
            "mukoviszidose" => DietCategory::CysticFibrosis,
            "diabetes" => DietCategory::Diabetes,
            _ => DietCategory::Custom(key),
        }
    }
}

impl From<DietCategory> for String {
    fn from(category: DietCategory) -> Self {
        category.key().to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupplementaryNeedsInput {
    /// Claimant's monthly Regelbedarf
    pub regelsatz: Decimal,
    pub household_size: u32,
    pub child_ages: Vec<u32>,
    pub pregnant: bool,
    pub single_parent: bool,
    pub disability: Option<DisabilityBasis>,
    pub diet: Option<DietCategory>,
    pub decentralized_hot_water: bool,
}

/// What a single rule contributes
#[derive(Debug, Clone, PartialEq)]
enum Outcome {
    Skip,
    Grant(BreakdownLine),
    Advise(String),
    Unresolved(String),
}

type NeedRule = fn(&SupplementaryNeedsInput, &RuleSet) -> Outcome;

const RULES: [NeedRule; 5] = [pregnancy, single_parent, disability, diet, hot_water];

pub fn calculate(input: &SupplementaryNeedsInput, rules: &RuleSet) -> Lookup<CalculationResult> {
    let mut result = CalculationResult::new();

    for rule in RULES {
        match rule(input, rules) {
            Outcome::Skip => {}
            Outcome::Grant(line) => result.push_line(line),
            Outcome::Advise(hint) => result.push_hint(hint),
            Outcome::Unresolved(key) => {
                warn!(key = %key, version = %rules.version, "unknown diet category");
                return Lookup::not_found(key);
            }
        }
    }

    debug!(
        version = %rules.version,
        lines = result.lines().len(),
        total = %result.total(),
        "supplementary needs calculated"
    );
    Lookup::Found(result)
}

/// Percent of the claimant's Regelbedarf as a rounded line amount
fn share(regelsatz: Decimal, percent: Decimal) -> Decimal {
    round_cents(percent_of(clamp_amount(regelsatz), percent))
}

fn pregnancy(input: &SupplementaryNeedsInput, rules: &RuleSet) -> Outcome {
    if !input.pregnant {
        return Outcome::Skip;
    }
    let percent = rules.mehrbedarf.pregnancy_percent;
    Outcome::Grant(BreakdownLine::new(
        "Mehrbedarf Schwangerschaft",
        share(input.regelsatz, percent),
        "§ 21 Abs. 2 SGB II",
        format!("{} % des Regelbedarfs ab der 13. Schwangerschaftswoche", percent.normalize()),
    ))
}

fn single_parent(input: &SupplementaryNeedsInput, rules: &RuleSet) -> Outcome {
    if !input.single_parent {
        return Outcome::Skip;
    }
    let staffelung = &rules.mehrbedarf.single_parent;
    let percent = staffelung.percent_for(&input.child_ages);
    if percent.is_zero() {
        return Outcome::Advise(format!(
            "Der Mehrbedarf für Alleinerziehende setzt mindestens ein Kind unter {} Jahren im Haushalt voraus.",
            staffelung.child_age_limit
        ));
    }
    Outcome::Grant(BreakdownLine::new(
        "Mehrbedarf Alleinerziehung",
        share(input.regelsatz, percent),
        "§ 21 Abs. 3 SGB II",
        format!(
            "{} % des Regelbedarfs bei {} Kind(ern), höchstens {} %",
            percent.normalize(),
            input.child_ages.len(),
            staffelung.cap_percent.normalize()
        ),
    ))
}

fn disability(input: &SupplementaryNeedsInput, rules: &RuleSet) -> Outcome {
    let rates = &rules.mehrbedarf.disability;
    let (percent, reference, explanation) = match input.disability {
        None => return Outcome::Skip,
        Some(DisabilityBasis::ParticipationBenefits) => (
            rates.participation_percent,
            "§ 21 Abs. 4 SGB II",
            "bei Leistungen zur Teilhabe am Arbeitsleben",
        ),
        Some(DisabilityBasis::MobilityImpairment) => (
            rates.mobility_percent,
            "§ 23 Nr. 4 SGB II",
            "bei Schwerbehindertenausweis mit Merkzeichen G",
        ),
    };
    Outcome::Grant(BreakdownLine::new(
        "Mehrbedarf Behinderung",
        share(input.regelsatz, percent),
        reference,
        format!("{} % des Regelbedarfs {}", percent.normalize(), explanation),
    ))
}

fn diet(input: &SupplementaryNeedsInput, rules: &RuleSet) -> Outcome {
    let Some(category) = &input.diet else {
        return Outcome::Skip;
    };
    let Some(rule) = rules.mehrbedarf.diet(category.key()) else {
        return Outcome::Unresolved(category.key().to_string());
    };

    match (rule.percent, &rule.hint) {
        (Some(percent), _) => {
            let base = rules.regelsatz.get(Regelbedarfsstufe::Rbs1);
            Outcome::Grant(BreakdownLine::new(
                format!("Mehrbedarf Krankenkost ({})", rule.name),
                share(base, percent),
                "§ 21 Abs. 5 SGB II",
                format!(
                    "{} % der Regelbedarfsstufe 1 nach den Empfehlungen des Deutschen Vereins",
                    percent.normalize()
                ),
            ))
        }
        (None, Some(hint)) => Outcome::Advise(hint.clone()),
        (None, None) => Outcome::Advise(format!(
            "Für {} ist kein pauschaler Mehrbedarf hinterlegt; bitte lassen Sie sich beraten.",
            rule.name
        )),
    }
}

/// One household member's share of the hot-water need
fn hot_water_share(rules: &RuleSet, stufe: Regelbedarfsstufe, regelbedarf: Decimal) -> Decimal {
    percent_of(regelbedarf, rules.mehrbedarf.hot_water.get(stufe))
}

/// Adult stufe whose table amount matches the claimant's Regelsatz.
///
/// Overrides that match no stufe are treated as stufe 1.
fn claimant_stufe(rules: &RuleSet, regelsatz: Decimal) -> Regelbedarfsstufe {
    [Regelbedarfsstufe::Rbs1, Regelbedarfsstufe::Rbs2, Regelbedarfsstufe::Rbs3]
        .into_iter()
        .find(|&stufe| rules.regelsatz.get(stufe) == regelsatz)
        .unwrap_or(Regelbedarfsstufe::Rbs1)
}

fn hot_water(input: &SupplementaryNeedsInput, rules: &RuleSet) -> Outcome {
    if !input.decentralized_hot_water {
        return Outcome::Skip;
    }

    let regelsatz = clamp_amount(input.regelsatz);
    let mut amount = hot_water_share(rules, claimant_stufe(rules, regelsatz), regelsatz);

    let children = u32::try_from(input.child_ages.len()).unwrap_or(u32::MAX);
    let other_adults = input.household_size.saturating_sub(children.saturating_add(1));
    let partner_stufe = Regelbedarfsstufe::Rbs2;
    amount += hot_water_share(rules, partner_stufe, rules.regelsatz.get(partner_stufe))
        * Decimal::from(other_adults);

    for &age in &input.child_ages {
        let stufe = Regelbedarfsstufe::for_child_age(age);
        amount += hot_water_share(rules, stufe, rules.regelsatz.get(stufe));
    }

    Outcome::Grant(BreakdownLine::new(
        "Mehrbedarf dezentrale Warmwassererzeugung",
        round_cents(amount),
        "§ 21 Abs. 7 SGB II",
        format!(
            "0,8 % bis 2,3 % des jeweiligen Regelbedarfs für {} Person(en)",
            other_adults.saturating_add(children).saturating_add(1)
        ),
    ))
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

    fn base_input() -> SupplementaryNeedsInput {
        SupplementaryNeedsInput {
            regelsatz: dec!(563),
            household_size: 1,
            ..Default::default()
        }
    }

    fn found(input: &SupplementaryNeedsInput) -> CalculationResult {
        calculate(input, &rules()).found().unwrap()
    }

    #[test]
    fn test_nothing_enabled_is_zero() {
        let result = found(&base_input());
        assert!(result.is_empty());
        assert_eq!(result.total(), Decimal::ZERO);
    }

    #[test]
    fn test_pregnancy() {
        let input = SupplementaryNeedsInput {
            pregnant: true,
            ..base_input()
        };
        let result = found(&input);
        // 17 % of 563 = 95.71
        assert_eq!(result.total(), dec!(95.71));
        assert_eq!(result.lines()[0].legal_reference, "§ 21 Abs. 2 SGB II");
    }

    #[test]
    fn test_single_parent_one_child_under_seven() {
        let input = SupplementaryNeedsInput {
            single_parent: true,
            household_size: 2,
            child_ages: vec![6],
            ..base_input()
        };
        // 36 % of 563 = 202.68
        assert_eq!(found(&input).total(), dec!(202.68));
    }

    #[test]
    fn test_single_parent_without_minor_child_advises() {
        let input = SupplementaryNeedsInput {
            single_parent: true,
            household_size: 2,
            child_ages: vec![19],
            ..base_input()
        };
        let result = found(&input);
        assert!(result.is_empty());
        assert_eq!(result.hints().len(), 1);
    }

    #[test]
    fn test_disability_rates_depend_on_basis() {
        let participation = SupplementaryNeedsInput {
            disability: Some(DisabilityBasis::ParticipationBenefits),
            ..base_input()
        };
        let mobility = SupplementaryNeedsInput {
            disability: Some(DisabilityBasis::MobilityImpairment),
            ..base_input()
        };
        // 35 % and 17 % of 563
        assert_eq!(found(&participation).total(), dec!(197.05));
        assert_eq!(found(&mobility).total(), dec!(95.71));
    }

    #[test]
    fn test_diet_uses_stufe_one() {
        let input = SupplementaryNeedsInput {
            regelsatz: dec!(506),
            diet: Some(DietCategory::Celiac),
            ..base_input()
        };
        // 20 % of 563, not of 506
        assert_eq!(found(&input).total(), dec!(112.60));
    }

    #[test]
    fn test_diabetes_advises_instead_of_granting() {
        let input = SupplementaryNeedsInput {
            diet: Some(DietCategory::Diabetes),
            ..base_input()
        };
        let result = found(&input);
        assert!(result.is_empty());
        assert_eq!(result.total(), Decimal::ZERO);
        assert!(result.hints()[0].contains("Diabetes"));
    }

    #[test]
    fn test_unknown_diet_is_not_found() {
        let input = SupplementaryNeedsInput {
            diet: Some(DietCategory::Custom("laktoseintoleranz".to_string())),
            ..base_input()
        };
        assert_eq!(
            calculate(&input, &rules()),
            Lookup::not_found("laktoseintoleranz")
        );
    }

    #[test]
    fn test_diet_category_round_trips_through_key() {
        assert_eq!(DietCategory::from("dialyse".to_string()), DietCategory::Dialysis);
        assert_eq!(String::from(DietCategory::CysticFibrosis), "mukoviszidose");
        assert_eq!(
            DietCategory::from("gicht".to_string()),
            DietCategory::Custom("gicht".to_string())
        );
    }

    #[test]
    fn test_hot_water_single_adult() {
        let input = SupplementaryNeedsInput {
            decentralized_hot_water: true,
            ..base_input()
        };
        // 2.3 % of 563 = 12.949
        assert_eq!(found(&input).total(), dec!(12.95));
    }

    #[test]
    fn test_hot_water_scales_with_household() {
        let input = SupplementaryNeedsInput {
            regelsatz: dec!(506),
            household_size: 4,
            child_ages: vec![4, 10],
            decentralized_hot_water: true,
            ..base_input()
        };
        // 2.3 % × 506 twice, 1.2 % × 390, 0.8 % × 357
        // 11.638 + 11.638 + 4.68 + 2.856 = 30.812
        assert_eq!(found(&input).total(), dec!(30.81));
    }

    #[test]
    fn test_hot_water_claimant_uses_own_stufe_rate() {
        let mut rules = rules();
        rules.mehrbedarf.hot_water.rbs2 = dec!(2.0);
        let input = SupplementaryNeedsInput {
            regelsatz: dec!(506),
            decentralized_hot_water: true,
            ..base_input()
        };
        // 2.0 % of 506 = 10.12
        let result = calculate(&input, &rules).found().unwrap();
        assert_eq!(result.total(), dec!(10.12));

        // Overrides fall back to the stufe 1 rate: 2.3 % of 600 = 13.80
        let input = SupplementaryNeedsInput {
            regelsatz: dec!(600),
            ..input
        };
        let result = calculate(&input, &rules).found().unwrap();
        assert_eq!(result.total(), dec!(13.80));
    }

    #[test]
    fn test_lines_are_additive() {
        let input = SupplementaryNeedsInput {
            pregnant: true,
            single_parent: true,
            household_size: 2,
            child_ages: vec![3],
            disability: Some(DisabilityBasis::MobilityImpairment),
            decentralized_hot_water: true,
            ..base_input()
        };
        let result = found(&input);
        let sum: Decimal = result.lines().iter().map(|l| l.amount).sum();
        assert_eq!(result.lines().len(), 4);
        assert_eq!(result.total(), sum);
    }
}
