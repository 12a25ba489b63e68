//! SGB II benefit calculators
//!
//! Five stateless calculators over a versioned, read-only reference store:
//! - [`rules::freibetrag`]: income disregard on earned income
//! - [`rules::mehrbedarf`]: supplementary needs add-ons
//! - [`rules::kdu`]: housing cost adequacy
//! - [`rules::sanktion`]: benefit reductions
//! - [`rules::schonvermoegen`]: asset exemption
//!
//! [`BenefitEngine`] selects the rule version in force on the calculation
//! date and dispatches to the calculators. It is cheap to clone and safe to
//! share across threads.

pub mod bands;
pub mod error;
pub mod export;
pub mod extractors;
pub mod household;
pub mod jurisdiction;
pub mod money;
pub mod reference;
pub mod rules;

pub use error::ReferenceError;
pub use export::{format_euro, history_entry, to_export, Breakdown, CalculatorKind};
pub use household::HouseholdContext;
pub use reference::{ReferenceData, RuleSet};

use chrono::NaiveDate;
use rules::freibetrag::{IncomeDisregardInput, IncomeDisregardReport};
use rules::kdu::{HousingCostInput, HousingCostReport};
use rules::mehrbedarf::SupplementaryNeedsInput;
use rules::sanktion::{SanctionInput, SanctionReport};
use rules::schonvermoegen::{AssetInput, AssetReport};
use shared_types::{CalculationResult, Lookup};
use std::sync::Arc;

/// BenefitEngine entry point
#[derive(Debug, Clone)]
pub struct BenefitEngine {
    reference: Arc<ReferenceData>,
}

impl BenefitEngine {
    pub fn new(reference: ReferenceData) -> Self {
        Self::from_shared(Arc::new(reference))
    }

    pub fn from_shared(reference: Arc<ReferenceData>) -> Self {
        Self { reference }
    }

    /// Engine over the reference data compiled into the crate
    pub fn with_builtin_rules() -> Result<Self, ReferenceError> {
        Ok(Self::new(ReferenceData::builtin()?))
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn rules_for(&self, date: NaiveDate) -> &RuleSet {
        self.reference.for_date(date)
    }

    pub fn income_disregard(&self, input: &IncomeDisregardInput, date: NaiveDate) -> IncomeDisregardReport {
        rules::freibetrag::calculate(input, self.rules_for(date))
    }

    pub fn supplementary_needs(
        &self,
        input: &SupplementaryNeedsInput,
        date: NaiveDate,
    ) -> Lookup<CalculationResult> {
        rules::mehrbedarf::calculate(input, self.rules_for(date))
    }

    pub fn housing_cost(&self, input: &HousingCostInput, date: NaiveDate) -> Lookup<HousingCostReport> {
        rules::kdu::calculate(input, self.rules_for(date))
    }

    pub fn sanction(&self, input: &SanctionInput, date: NaiveDate) -> SanctionReport {
        rules::sanktion::calculate(input, self.rules_for(date))
    }

    pub fn asset_exemption(&self, input: &AssetInput, date: NaiveDate) -> AssetReport {
        rules::schonvermoegen::calculate(input, self.rules_for(date))
    }
}
