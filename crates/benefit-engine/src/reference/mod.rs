//! Reference Data Store
//!
//! Versioned, read-only tables shared by all calculators:
//! - Regelsatz per Regelbedarfsstufe
//! - Income disregard bands and flat deductions
//! - Mehrbedarf rates, single-parent staffelung and diet categories
//! - Per-city housing-cost ceilings
//! - Sanction tiers
//! - Asset allowances
//!
//! Each [`RuleSet`] applies from its `effective_from` date until the next
//! version starts. The data is parsed and validated once, then shared
//! behind an `Arc` by [`crate::BenefitEngine`]; there is no write path.

pub mod assets;
pub mod housing;
pub mod income;
pub mod mehrbedarf;
pub mod regelsatz;
pub mod sanction;

pub use assets::{AgeAllowance, AssetAllowanceTable, PropertyKind, WaitingPeriodAllowance};
pub use housing::{CityHousingLimits, HousingCostTable, HousingLimits};
pub use income::IncomeDisregardTable;
pub use mehrbedarf::{DietRule, DisabilityRates, MehrbedarfTable, SingleParentStaffelung};
pub use regelsatz::{PerStufe, Regelbedarfsstufe, RegelsatzTable};
pub use sanction::{SanctionTier, SanctionTierTable};

use crate::error::ReferenceError;
use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Reference data compiled into the crate
pub const BUILTIN_RULES: &str = include_str!("../../data/rules.toml");

/// One complete version of every reference table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSet {
    pub version: String,
    pub effective_from: NaiveDate,
    pub regelsatz: RegelsatzTable,
    pub income_disregard: IncomeDisregardTable,
    pub mehrbedarf: MehrbedarfTable,
    pub housing: HousingCostTable,
    pub sanctions: SanctionTierTable,
    pub assets: AssetAllowanceTable,
}

impl RuleSet {
    pub fn validate(&self) -> Result<(), ReferenceError> {
        let invalid = |message: String| ReferenceError::InvalidTable {
            version: self.version.clone(),
            message,
        };

        self.regelsatz
            .validate(None)
            .map_err(|e| invalid(format!("regelsatz: {}", e)))?;
        self.income_disregard.validate().map_err(invalid)?;
        self.mehrbedarf.validate().map_err(invalid)?;
        self.housing.validate().map_err(invalid)?;
        self.sanctions.validate().map_err(invalid)?;
        self.assets
            .validate()
            .map_err(|e| invalid(format!("assets: {}", e)))?;
        Ok(())
    }
}

/// A version as written in TOML; omitted tables inherit from the
/// previous version
#[derive(Debug, Clone, Deserialize)]
struct RawRuleSet {
    version: String,
    effective_from: NaiveDate,
    regelsatz: Option<RegelsatzTable>,
    income_disregard: Option<IncomeDisregardTable>,
    mehrbedarf: Option<MehrbedarfTable>,
    housing: Option<HousingCostTable>,
    sanctions: Option<SanctionTierTable>,
    assets: Option<AssetAllowanceTable>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawReferenceData {
    #[serde(default)]
    versions: Vec<RawRuleSet>,
}

fn inherit<T: Clone>(
    own: Option<T>,
    previous: Option<&T>,
    version: &str,
    table: &'static str,
) -> Result<T, ReferenceError> {
    own.or_else(|| previous.cloned())
        .ok_or_else(|| ReferenceError::MissingTable {
            version: version.to_string(),
            table,
        })
}

impl RawRuleSet {
    fn resolve(self, previous: Option<&RuleSet>) -> Result<RuleSet, ReferenceError> {
        let v = self.version.as_str();
        Ok(RuleSet {
            regelsatz: inherit(self.regelsatz, previous.map(|p| &p.regelsatz), v, "regelsatz")?,
            income_disregard: inherit(
                self.income_disregard,
                previous.map(|p| &p.income_disregard),
                v,
                "income_disregard",
            )?,
            mehrbedarf: inherit(self.mehrbedarf, previous.map(|p| &p.mehrbedarf), v, "mehrbedarf")?,
            housing: inherit(self.housing, previous.map(|p| &p.housing), v, "housing")?,
            sanctions: inherit(self.sanctions, previous.map(|p| &p.sanctions), v, "sanctions")?,
            assets: inherit(self.assets, previous.map(|p| &p.assets), v, "assets")?,
            version: self.version,
            effective_from: self.effective_from,
        })
    }
}

/// All rule versions, ordered by effective date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceData {
    // Non-empty and strictly ordered by effective_from (checked on construction)
    versions: Vec<RuleSet>,
}

impl ReferenceData {
    /// Load the reference data compiled into the crate
    pub fn builtin() -> Result<Self, ReferenceError> {
        Self::from_toml_str(BUILTIN_RULES)
    }

    /// Parse reference data from a TOML string
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed, the first version is
    /// missing a table, effective dates are not strictly increasing, or any
    /// table fails validation.
    pub fn from_toml_str(s: &str) -> Result<Self, ReferenceError> {
        let raw: RawReferenceData =
            toml::from_str(s).map_err(|e| ReferenceError::ParseError(e.to_string()))?;

        let mut versions: Vec<RuleSet> = Vec::with_capacity(raw.versions.len());
        for raw_version in raw.versions {
            let resolved = raw_version.resolve(versions.last())?;
            debug!(version = %resolved.version, effective_from = %resolved.effective_from, "resolved rule version");
            versions.push(resolved);
        }

        Self::from_versions(versions)
    }

    /// Load reference data from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read reference data file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid reference data in {}", path.display()))
    }

    /// Build reference data from fully specified versions
    pub fn from_versions(versions: Vec<RuleSet>) -> Result<Self, ReferenceError> {
        if versions.is_empty() {
            return Err(ReferenceError::NoVersions);
        }
        for pair in versions.windows(2) {
            if pair[1].effective_from <= pair[0].effective_from {
                return Err(ReferenceError::VersionOrder(format!(
                    "{} ({}) does not start after {} ({})",
                    pair[1].version, pair[1].effective_from, pair[0].version, pair[0].effective_from
                )));
            }
        }
        for version in &versions {
            version.validate()?;
        }

        info!(
            versions = versions.len(),
            first = %versions[0].effective_from,
            "loaded reference data"
        );
        Ok(Self { versions })
    }

    pub fn versions(&self) -> &[RuleSet] {
        &self.versions
    }

    /// Rule version in force on `date`.
    ///
    /// Dates before the first version resolve to the first version.
    pub fn for_date(&self, date: NaiveDate) -> &RuleSet {
        self.versions
            .iter()
            .rev()
            .find(|v| v.effective_from <= date)
            .unwrap_or(&self.versions[0])
    }

    pub fn latest(&self) -> &RuleSet {
        &self.versions[self.versions.len() - 1]
    }

    pub fn version(&self, label: &str) -> Option<&RuleSet> {
        self.versions.iter().find(|v| v.version == label)
    }
}
