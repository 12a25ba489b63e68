//! Per-city adequacy ceilings for Kosten der Unterkunft (§ 22 SGB II)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HousingCostTable {
    pub cities: Vec<CityHousingLimits>,
}

impl HousingCostTable {
    pub fn city(&self, key: &str) -> Option<&CityHousingLimits> {
        self.cities.iter().find(|c| c.key == key)
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        let mut keys = HashSet::new();
        for city in &self.cities {
            if !keys.insert(city.key.as_str()) {
                return Err(format!("duplicate housing jurisdiction '{}'", city.key));
            }
            city.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityHousingLimits {
    /// Normalized lookup key, e.g. "muenchen"
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Inclusive postal code ranges
    #[serde(default)]
    pub postal_ranges: Vec<(u32, u32)>,
    /// Whether the jurisdiction's ceilings rest on a "schlüssiges Konzept"
    pub methodologically_sound_concept: bool,
    /// Ceilings by household size; index 0 is a one-person household
    pub rows: Vec<HousingLimits>,
    /// Added per person beyond the last row
    pub additional_person: HousingLimits,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HousingLimits {
    pub area_sqm: Decimal,
    pub rent_and_utilities: Decimal,
    pub heating: Decimal,
}

impl CityHousingLimits {
    /// Ceilings for a household of `household_size` persons (minimum 1)
    pub fn limits_for(&self, household_size: u32) -> HousingLimits {
        let size = household_size.max(1) as usize;
        match self.rows.get(size - 1) {
            Some(row) => *row,
            None => {
                let last = self.rows.last().copied().unwrap_or(HousingLimits {
                    area_sqm: Decimal::ZERO,
                    rent_and_utilities: Decimal::ZERO,
                    heating: Decimal::ZERO,
                });
                let extra = Decimal::from((size - self.rows.len()) as u64);
                HousingLimits {
                    area_sqm: last.area_sqm + self.additional_person.area_sqm * extra,
                    rent_and_utilities: last.rent_and_utilities
                        + self.additional_person.rent_and_utilities * extra,
                    heating: last.heating + self.additional_person.heating * extra,
                }
            }
        }
    }

    pub fn covers_postal_code(&self, code: u32) -> bool {
        self.postal_ranges
            .iter()
            .any(|&(from, to)| (from..=to).contains(&code))
    }

    fn validate(&self) -> Result<(), String> {
        if self.rows.is_empty() {
            return Err(format!("housing jurisdiction '{}' has no rows", self.key));
        }
        for &(from, to) in &self.postal_ranges {
            if from > to || to > 99999 {
                return Err(format!(
                    "housing jurisdiction '{}' has invalid postal range {}-{}",
                    self.key, from, to
                ));
            }
        }
        let negative = |l: &HousingLimits| {
            l.area_sqm < Decimal::ZERO
                || l.rent_and_utilities < Decimal::ZERO
                || l.heating < Decimal::ZERO
        };
        if self.rows.iter().any(negative) || negative(&self.additional_person) {
            return Err(format!(
                "housing jurisdiction '{}' has a negative ceiling",
                self.key
            ));
        }
        Ok(())
    }
}
