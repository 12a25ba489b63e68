//! Schonvermögen allowances (§ 12 SGB II)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetAllowanceTable {
    /// Karenzzeit amounts; absent once the waiting period no longer exists
    #[serde(default)]
    pub waiting_period: Option<WaitingPeriodAllowance>,
    /// Steady-state allowance per person, by the applicant's age
    pub per_person_by_age: Vec<AgeAllowance>,
    /// Verkehrswert up to which one vehicle per person stays exempt
    pub vehicle_ceiling: Decimal,
    pub property: PropertyAreaCeiling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitingPeriodAllowance {
    pub first_person: Decimal,
    pub additional_person: Decimal,
    pub months: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeAllowance {
    pub from_age: u32,
    /// Inclusive; `None` for the last, open-ended band
    #[serde(default)]
    pub to_age: Option<u32>,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyAreaCeiling {
    pub house_sqm: Decimal,
    pub apartment_sqm: Decimal,
    /// Household size covered by the base areas
    pub base_persons: u32,
    pub additional_person_sqm: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    #[default]
    House,
    Apartment,
}

impl AssetAllowanceTable {
    pub fn per_person_allowance(&self, age: u32) -> Decimal {
        self.per_person_by_age
            .iter()
            .find(|band| age >= band.from_age && band.to_age.map_or(true, |to| age <= to))
            .map(|band| band.amount)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn property_ceiling(&self, kind: PropertyKind, household_size: u32) -> Decimal {
        let base = match kind {
            PropertyKind::House => self.property.house_sqm,
            PropertyKind::Apartment => self.property.apartment_sqm,
        };
        let extra_persons = household_size.saturating_sub(self.property.base_persons);
        base + self.property.additional_person_sqm * Decimal::from(extra_persons)
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        let Some(first) = self.per_person_by_age.first() else {
            return Err("asset allowance needs at least one age band".to_string());
        };
        if first.from_age != 0 {
            return Err(format!("first age band must start at 0, starts at {}", first.from_age));
        }
        for (i, band) in self.per_person_by_age.iter().enumerate() {
            if band.amount < Decimal::ZERO {
                return Err(format!("age band {} has a negative amount", i));
            }
            match (band.to_age, self.per_person_by_age.get(i + 1)) {
                (Some(u32::MAX), Some(_)) => {
                    return Err(format!("age band {} ends at the maximum age and cannot be followed", i));
                }
                (Some(to), Some(next)) if next.from_age != to + 1 => {
                    return Err(format!(
                        "age band {} ends at {} but the next starts at {}",
                        i, to, next.from_age
                    ));
                }
                (Some(to), _) if to < band.from_age => {
                    return Err(format!("age band {} ends before it starts", i));
                }
                (None, Some(_)) => {
                    return Err(format!("only the last age band may be open-ended (band {})", i));
                }
                (Some(_), None) => {
                    return Err("the last age band must be open-ended".to_string());
                }
                _ => {}
            }
        }
        if self.vehicle_ceiling < Decimal::ZERO {
            return Err("vehicle ceiling must not be negative".to_string());
        }
        Ok(())
    }
}
