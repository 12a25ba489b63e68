use crate::bands::BandSchedule;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Erwerbstätigenfreibetrag bands and flat deductions (§ 11b SGB II)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeDisregardTable {
    pub without_child: BandSchedule,
    /// Applies when a minor child lives in the household; widens the 30 % band
    pub with_child: BandSchedule,
    pub work_expense_allowance: Decimal,
    pub insurance_allowance: Decimal,
    /// Used when the caller has no payslip figure for social insurance
    pub social_insurance_estimate_percent: Decimal,
}

impl IncomeDisregardTable {
    pub fn schedule(&self, has_child: bool) -> &BandSchedule {
        if has_child {
            &self.with_child
        } else {
            &self.without_child
        }
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        self.without_child
            .validate()
            .map_err(|e| format!("income bands without child: {}", e))?;
        self.with_child
            .validate()
            .map_err(|e| format!("income bands with child: {}", e))?;

        if self.work_expense_allowance < Decimal::ZERO || self.insurance_allowance < Decimal::ZERO {
            return Err("flat income allowances must not be negative".to_string());
        }
        let estimate = self.social_insurance_estimate_percent;
        if estimate < Decimal::ZERO || estimate > Decimal::ONE_HUNDRED {
            return Err(format!(
                "social insurance estimate {} outside 0..=100",
                estimate
            ));
        }
        Ok(())
    }
}
