//! Leistungsminderung tiers (§§ 31a, 32 SGB II)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanctionTier {
    pub percent: Decimal,
    pub duration_months: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanctionTierTable {
    /// Statutory maximum reduction of the Regelbedarf
    pub ceiling_percent: Decimal,
    pub objection_deadline_months: u32,
    pub first: SanctionTier,
    pub second: SanctionTier,
    /// Third and every later violation
    pub repeated: SanctionTier,
    /// Meldeversäumnis does not escalate
    pub missed_appointment: SanctionTier,
    #[serde(default)]
    pub important_reasons: Vec<String>,
}

impl SanctionTierTable {
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.ceiling_percent < Decimal::ZERO || self.ceiling_percent > Decimal::ONE_HUNDRED {
            return Err(format!(
                "sanction ceiling {} outside 0..=100",
                self.ceiling_percent
            ));
        }
        let tiers = [
            ("first", &self.first),
            ("second", &self.second),
            ("repeated", &self.repeated),
            ("missed appointment", &self.missed_appointment),
        ];
        for (name, tier) in tiers {
            if tier.percent < Decimal::ZERO || tier.percent > self.ceiling_percent {
                return Err(format!(
                    "{} sanction tier {} % exceeds ceiling {} %",
                    name, tier.percent, self.ceiling_percent
                ));
            }
        }
        Ok(())
    }
}
