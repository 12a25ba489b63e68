//! Shared household description collected once by the presentation layer
//!
//! Each calculator takes its own input type. [`HouseholdContext`] carries
//! the union of those fields and projects them, so a form filled once can
//! drive all five calculations.

use crate::extractors::{parse_amount, parse_count};
use crate::money::clamp_amount;
use crate::reference::{PropertyKind, Regelbedarfsstufe, RuleSet};
use crate::rules::freibetrag::{IncomeDisregardInput, SocialInsurance};
use crate::rules::kdu::HousingCostInput;
use crate::rules::mehrbedarf::{DietCategory, DisabilityBasis, SupplementaryNeedsInput};
use crate::rules::sanktion::{SanctionInput, ViolationSequence, ViolationType};
use crate::rules::schonvermoegen::AssetInput;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Minors for income and single-parent purposes
const CHILD_AGE_LIMIT: u32 = 18;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseholdContext {
    pub applicant_age: u32,
    /// Adults including the applicant
    pub adults: u32,
    pub child_ages: Vec<u32>,
    /// Overrides the Regelbedarfsstufe 1 amount
    pub regelsatz: Option<Decimal>,

    // Income
    pub gross_income: Decimal,
    /// From the payslip; flat estimate when absent
    pub social_insurance: Option<Decimal>,
    /// Replaces the 15,33 € flat work expense allowance
    pub work_expense_allowance: Option<Decimal>,
    /// Replaces the 30 € flat insurance allowance
    pub insurance_allowance: Option<Decimal>,

    // Mehrbedarf
    pub pregnant: bool,
    pub single_parent: bool,
    pub disability: Option<DisabilityBasis>,
    pub diet: Option<DietCategory>,
    pub decentralized_hot_water: bool,

    // Housing
    pub jurisdiction: String,
    pub cold_rent: Decimal,
    pub utilities: Decimal,
    pub heating: Decimal,
    pub living_area: Decimal,
    /// First year of receipt
    pub in_waiting_period: bool,

    // Sanction
    pub violation: ViolationType,
    pub violation_number: u32,

    // Assets
    pub cash_holdings: Decimal,
    pub vehicle_value: Option<Decimal>,
    pub owner_occupied_property: bool,
    pub property_kind: PropertyKind,
    pub property_area: Decimal,
    pub property_value: Option<Decimal>,
    pub retirement_assets: Option<Decimal>,
}

impl Default for HouseholdContext {
    fn default() -> Self {
        Self {
            applicant_age: 0,
            adults: 1,
            child_ages: Vec::new(),
            regelsatz: None,
            gross_income: Decimal::ZERO,
            social_insurance: None,
            work_expense_allowance: None,
            insurance_allowance: None,
            pregnant: false,
            single_parent: false,
            disability: None,
            diet: None,
            decentralized_hot_water: false,
            jurisdiction: String::new(),
            cold_rent: Decimal::ZERO,
            utilities: Decimal::ZERO,
            heating: Decimal::ZERO,
            living_area: Decimal::ZERO,
            in_waiting_period: false,
            violation: ViolationType::default(),
            violation_number: 1,
            cash_holdings: Decimal::ZERO,
            vehicle_value: None,
            owner_occupied_property: false,
            property_kind: PropertyKind::default(),
            property_area: Decimal::ZERO,
            property_value: None,
            retirement_assets: None,
        }
    }
}

impl HouseholdContext {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Build a context from raw form fields.
    ///
    /// Amounts go through [`parse_amount`], so unparseable or negative
    /// values become zero. Empty optional amounts stay `None`. Unknown
    /// fields are skipped.
    pub fn from_form_fields<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let optional = |value: &str| (!value.trim().is_empty()).then(|| parse_amount(value));
        let mut ctx = Self::default();

        for (name, value) in fields {
            match name {
                "applicant_age" => ctx.applicant_age = parse_count(value),
                "adults" => ctx.adults = parse_count(value).max(1),
                "child_ages" => {
                    ctx.child_ages = value
                        .split([',', ';'])
                        .filter(|part| !part.trim().is_empty())
                        .map(parse_count)
                        .collect()
                }
                "regelsatz" => ctx.regelsatz = optional(value),
                "gross_income" => ctx.gross_income = parse_amount(value),
                "social_insurance" => ctx.social_insurance = optional(value),
                "work_expense_allowance" => ctx.work_expense_allowance = optional(value),
                "insurance_allowance" => ctx.insurance_allowance = optional(value),
                "pregnant" => ctx.pregnant = parse_flag(value),
                "single_parent" => ctx.single_parent = parse_flag(value),
                "disability" => {
                    ctx.disability = match value.trim() {
                        "participation_benefits" => Some(DisabilityBasis::ParticipationBenefits),
                        "mobility_impairment" => Some(DisabilityBasis::MobilityImpairment),
                        _ => None,
                    }
                }
                "diet" => {
                    let key = value.trim();
                    ctx.diet = (!key.is_empty()).then(|| DietCategory::from(key.to_string()));
                }
                "decentralized_hot_water" => ctx.decentralized_hot_water = parse_flag(value),
                "jurisdiction" => ctx.jurisdiction = value.trim().to_string(),
                "cold_rent" => ctx.cold_rent = parse_amount(value),
                "utilities" => ctx.utilities = parse_amount(value),
                "heating" => ctx.heating = parse_amount(value),
                "living_area" => ctx.living_area = parse_amount(value),
                "in_waiting_period" => ctx.in_waiting_period = parse_flag(value),
                "violation" => {
                    ctx.violation = match value.trim() {
                        "missed_appointment" => ViolationType::MissedAppointment,
                        _ => ViolationType::DutyViolation,
                    }
                }
                "violation_number" => ctx.violation_number = parse_count(value),
                "cash_holdings" => ctx.cash_holdings = parse_amount(value),
                "vehicle_value" => ctx.vehicle_value = optional(value),
                "owner_occupied_property" => ctx.owner_occupied_property = parse_flag(value),
                "property_kind" => {
                    ctx.property_kind = match value.trim() {
                        "apartment" => PropertyKind::Apartment,
                        _ => PropertyKind::House,
                    }
                }
                "property_area" => ctx.property_area = parse_amount(value),
                "property_value" => ctx.property_value = optional(value),
                "retirement_assets" => ctx.retirement_assets = optional(value),
                other => debug!(field = other, "ignoring unknown form field"),
            }
        }
        ctx
    }

    pub fn household_size(&self) -> u32 {
        let children = u32::try_from(self.child_ages.len()).unwrap_or(u32::MAX);
        self.adults.max(1).saturating_add(children)
    }

    pub fn has_child(&self) -> bool {
        self.child_ages.iter().any(|&age| age < CHILD_AGE_LIMIT)
    }

    /// Regelsatz of the applicant, defaulting to stufe 1 of `rules`
    pub fn regelsatz(&self, rules: &RuleSet) -> Decimal {
        self.regelsatz
            .unwrap_or_else(|| rules.regelsatz.get(Regelbedarfsstufe::Rbs1))
    }

    pub fn to_income_disregard_input(&self) -> IncomeDisregardInput {
        IncomeDisregardInput {
            gross_income: self.gross_income,
            has_child: self.has_child(),
            social_insurance: self
                .social_insurance
                .map_or(SocialInsurance::FlatEstimate, SocialInsurance::Amount),
            work_expense_allowance: self.work_expense_allowance,
            insurance_allowance: self.insurance_allowance,
        }
    }

    pub fn to_supplementary_needs_input(&self, rules: &RuleSet) -> SupplementaryNeedsInput {
        SupplementaryNeedsInput {
            regelsatz: self.regelsatz(rules),
            household_size: self.household_size(),
            child_ages: self.child_ages.clone(),
            pregnant: self.pregnant,
            single_parent: self.single_parent,
            disability: self.disability,
            diet: self.diet.clone(),
            decentralized_hot_water: self.decentralized_hot_water,
        }
    }

    pub fn to_housing_cost_input(&self) -> HousingCostInput {
        HousingCostInput {
            jurisdiction: self.jurisdiction.clone(),
            household_size: self.household_size(),
            cold_rent: self.cold_rent,
            utilities: self.utilities,
            heating: self.heating,
            living_area: self.living_area,
            in_waiting_period: self.in_waiting_period,
        }
    }

    pub fn to_sanction_input(&self, rules: &RuleSet) -> SanctionInput {
        let housing_cost =
            clamp_amount(self.cold_rent) + clamp_amount(self.utilities) + clamp_amount(self.heating);
        SanctionInput {
            regelsatz: self.regelsatz(rules),
            violation: self.violation,
            sequence: ViolationSequence::from_number(self.violation_number),
            under_25: self.applicant_age < 25,
            housing_cost: (housing_cost > Decimal::ZERO).then_some(housing_cost),
        }
    }

    pub fn to_asset_input(&self) -> AssetInput {
        AssetInput {
            age: self.applicant_age,
            household_size: self.household_size(),
            cash_holdings: self.cash_holdings,
            vehicle_value: self.vehicle_value,
            owner_occupied_property: self.owner_occupied_property,
            property_kind: self.property_kind,
            property_area: self.property_area,
            property_value: self.property_value,
            retirement_assets: self.retirement_assets,
            in_waiting_period: self.in_waiting_period,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "on" | "yes" | "ja"
    )
}
