//! Schonvermögen (§ 12 SGB II)
//!
//! Cash holdings are compared against a per-person allowance scaled by
//! household size. A vehicle and owner-occupied property are checked
//! against their own ceilings; whatever exceeds them becomes countable.
//! Protected retirement assets never count.

use crate::money::{clamp_amount, round_cents};
use crate::reference::{PropertyKind, RuleSet};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared_types::{BreakdownLine, CalculationResult};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetInput {
    pub age: u32,
    pub household_size: u32,
    pub cash_holdings: Decimal,
    pub vehicle_value: Option<Decimal>,
    pub owner_occupied_property: bool,
    pub property_kind: PropertyKind,
    /// Living area in m²
    pub property_area: Decimal,
    /// Verkehrswert, used to value an excess area
    pub property_value: Option<Decimal>,
    /// Riester and similar protected provision
    pub retirement_assets: Option<Decimal>,
    pub in_waiting_period: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClassStatus {
    Exempt,
    Excess,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetClassCheck {
    pub actual: Decimal,
    pub ceiling: Decimal,
    pub status: AssetClassStatus,
    /// Amount added to the countable assets
    pub countable: Decimal,
}

impl AssetClassCheck {
    pub fn is_excess(&self) -> bool {
        self.status == AssetClassStatus::Excess
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetReport {
    /// Countable parts as lines; total is the countable assets
    pub result: CalculationResult,
    pub allowance: Decimal,
    pub allowance_used: Decimal,
    pub allowance_remaining: Decimal,
    pub vehicle: Option<AssetClassCheck>,
    /// Area check in m²; `countable` is in euros
    pub property: Option<AssetClassCheck>,
    pub retirement_exempt: Decimal,
    pub countable_assets: Decimal,
    pub eligible: bool,
}

fn allowance(input: &AssetInput, rules: &RuleSet, result: &mut CalculationResult) -> Decimal {
    let table = &rules.assets;
    let size = input.household_size.max(1);

    if input.in_waiting_period {
        match table.waiting_period {
            Some(wp) => {
                result.push_hint(format!(
                    "Karenzzeit: In den ersten {} Monaten gilt ein erhöhter Freibetrag von {} € für die erste und {} € für jede weitere Person.",
                    wp.months,
                    wp.first_person.normalize(),
                    wp.additional_person.normalize()
                ));
                return wp.first_person + wp.additional_person * Decimal::from(size - 1);
            }
            None => result.push_hint(
                "Eine Karenzzeit für Vermögen gibt es nach der ab diesem Zeitpunkt geltenden Rechtslage nicht mehr. \
                 Es gilt der reguläre Freibetrag.",
            ),
        }
    }
    table.per_person_allowance(input.age) * Decimal::from(size)
}

fn vehicle_check(input: &AssetInput, rules: &RuleSet) -> Option<AssetClassCheck> {
    let value = clamp_amount(input.vehicle_value?);
    let ceiling = rules.assets.vehicle_ceiling;
    let excess = (value - ceiling).max(Decimal::ZERO);
    Some(AssetClassCheck {
        actual: value,
        ceiling,
        status: if excess > Decimal::ZERO {
            AssetClassStatus::Excess
        } else {
            AssetClassStatus::Exempt
        },
        countable: excess,
    })
}

fn property_check(input: &AssetInput, rules: &RuleSet) -> Option<AssetClassCheck> {
    if !input.owner_occupied_property {
        return None;
    }
    let area = clamp_amount(input.property_area);
    let ceiling = rules
        .assets
        .property_ceiling(input.property_kind, input.household_size.max(1));
    let excess_area = (area - ceiling).max(Decimal::ZERO);

    // The excess share of the market value counts, when a value is known
    let countable = match input.property_value {
        Some(value) if excess_area > Decimal::ZERO && area > Decimal::ZERO => {
            round_cents(clamp_amount(value) * excess_area / area)
        }
        _ => Decimal::ZERO,
    };
    Some(AssetClassCheck {
        actual: area,
        ceiling,
        status: if excess_area > Decimal::ZERO {
            AssetClassStatus::Excess
        } else {
            AssetClassStatus::Exempt
        },
        countable,
    })
}

pub fn calculate(input: &AssetInput, rules: &RuleSet) -> AssetReport {
    let mut result = CalculationResult::new();

    let allowance = allowance(input, rules, &mut result);
    let cash = clamp_amount(input.cash_holdings);
    let allowance_used = cash.min(allowance);
    let countable_cash = cash - allowance_used;

    result.push_line(BreakdownLine::new(
        "Anrechenbares Geldvermögen",
        countable_cash,
        "§ 12 Abs. 2 SGB II",
        format!(
            "Geldvermögen von {} € abzüglich Freibetrag von {} €",
            cash.normalize(),
            allowance.normalize()
        ),
    ));

    let vehicle = vehicle_check(input, rules);
    if let Some(check) = vehicle.filter(AssetClassCheck::is_excess) {
        result.push_line(BreakdownLine::new(
            "Fahrzeug über Freigrenze",
            check.countable,
            "§ 12 Abs. 1 Satz 2 Nr. 2 SGB II",
            format!(
                "Verkehrswert über der Grenze von {} €",
                check.ceiling.normalize()
            ),
        ));
    }

    let property = property_check(input, rules);
    if let Some(check) = property.filter(AssetClassCheck::is_excess) {
        result.push_line(BreakdownLine::new(
            "Wohneigentum über Angemessenheitsgrenze",
            check.countable,
            "§ 12 Abs. 1 Satz 2 Nr. 5 SGB II",
            format!(
                "{} m² Wohnfläche bei einer Grenze von {} m²",
                check.actual.normalize(),
                check.ceiling.normalize()
            ),
        ));
        if input.property_value.is_none() {
            result.push_hint(
                "Die Wohnfläche übersteigt die Angemessenheitsgrenze. \
                 Ohne Angabe des Verkehrswerts kann der anrechenbare Anteil nicht beziffert werden.",
            );
        }
    }

    let retirement_exempt = input.retirement_assets.map(clamp_amount).unwrap_or_default();
    if retirement_exempt > Decimal::ZERO {
        result.push_hint(format!(
            "Altersvorsorge von {} € ist geschützt und wird nicht angerechnet.",
            retirement_exempt.normalize()
        ));
    }

    let countable_assets = result.total();
    let has_excess = vehicle.is_some_and(|c| c.is_excess()) || property.is_some_and(|c| c.is_excess());
    let eligible = countable_assets <= Decimal::ZERO && !has_excess;

    debug!(
        version = %rules.version,
        allowance = %allowance,
        countable = %countable_assets,
        eligible,
        "asset exemption calculated"
    );

    AssetReport {
        result,
        allowance,
        allowance_used,
        allowance_remaining: allowance - allowance_used,
        vehicle,
        property,
        retirement_exempt,
        countable_assets,
        eligible,
    }
}
