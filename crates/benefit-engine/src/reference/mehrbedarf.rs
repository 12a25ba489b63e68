//! Mehrbedarf rates (§ 21, § 23 SGB II)

use super::regelsatz::PerStufe;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MehrbedarfTable {
    pub pregnancy_percent: Decimal,
    pub single_parent: SingleParentStaffelung,
    pub disability: DisabilityRates,
    pub hot_water: PerStufe,
    pub diets: Vec<DietRule>,
}

impl MehrbedarfTable {
    pub fn diet(&self, key: &str) -> Option<&DietRule> {
        self.diets.iter().find(|d| d.key == key)
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        check_percent("pregnancy", self.pregnancy_percent)?;
        check_percent("disability participation", self.disability.participation_percent)?;
        check_percent("disability mobility", self.disability.mobility_percent)?;
        self.hot_water
            .validate(Some(Decimal::ONE_HUNDRED))
            .map_err(|e| format!("hot water: {}", e))?;
        self.single_parent.validate()?;

        let mut keys = HashSet::new();
        for diet in &self.diets {
            if !keys.insert(diet.key.as_str()) {
                return Err(format!("duplicate diet category '{}'", diet.key));
            }
            match (&diet.percent, &diet.hint) {
                (Some(percent), None) => check_percent(&diet.key, *percent)?,
                (None, Some(_)) => {}
                _ => {
                    return Err(format!(
                        "diet category '{}' needs exactly one of percent or hint",
                        diet.key
                    ))
                }
            }
        }
        Ok(())
    }
}

fn check_percent(what: &str, percent: Decimal) -> Result<(), String> {
    if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
        return Err(format!("{} rate {} outside 0..=100", what, percent));
    }
    Ok(())
}

/// Single-parent staffelung (§ 21 Abs. 3 SGB II)
///
/// Each minor child adds `per_child_percent`. A pattern such as "one child
/// under 7" guarantees its percent as a floor. The result never exceeds
/// `cap_percent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleParentStaffelung {
    pub per_child_percent: Decimal,
    pub child_age_limit: u32,
    pub cap_percent: Decimal,
    pub patterns: Vec<StaffelungPattern>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffelungPattern {
    pub min_children: u32,
    /// Children counted for the pattern must be younger than this
    pub under_age: u32,
    pub percent: Decimal,
}

impl StaffelungPattern {
    pub fn matches(&self, child_ages: &[u32]) -> bool {
        let qualifying = child_ages.iter().filter(|&&age| age < self.under_age).count();
        qualifying as u32 >= self.min_children
    }
}

impl SingleParentStaffelung {
    /// Percent of the Regelbedarf for the given children
    pub fn percent_for(&self, child_ages: &[u32]) -> Decimal {
        let minors = child_ages
            .iter()
            .filter(|&&age| age < self.child_age_limit)
            .count();
        let per_child = self.per_child_percent * Decimal::from(minors as u64);

        let pattern_floor = self
            .patterns
            .iter()
            .filter(|p| p.matches(child_ages))
            .map(|p| p.percent)
            .max()
            .unwrap_or(Decimal::ZERO);

        per_child.max(pattern_floor).min(self.cap_percent)
    }

    fn validate(&self) -> Result<(), String> {
        check_percent("single parent per child", self.per_child_percent)?;
        check_percent("single parent cap", self.cap_percent)?;
        for pattern in &self.patterns {
            check_percent("single parent pattern", pattern.percent)?;
            if pattern.percent > self.cap_percent {
                return Err(format!(
                    "single parent pattern {} exceeds cap {}",
                    pattern.percent, self.cap_percent
                ));
            }
            if pattern.min_children == 0 {
                return Err("single parent pattern needs at least one child".to_string());
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisabilityRates {
    /// § 21 Abs. 4 SGB II, tied to participation benefits
    pub participation_percent: Decimal,
    /// § 23 Nr. 4 SGB II, Merkzeichen G
    pub mobility_percent: Decimal,
}

/// Krankenkost category. Either grants a percent of stufe 1 or, where case
/// law no longer recognizes a standard need, carries an advisory hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietRule {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub percent: Option<Decimal>,
    #[serde(default)]
    pub hint: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn staffelung() -> SingleParentStaffelung {
        SingleParentStaffelung {
            per_child_percent: dec!(12),
            child_age_limit: 18,
            cap_percent: dec!(60),
            patterns: vec![
                StaffelungPattern {
                    min_children: 1,
                    under_age: 7,
                    percent: dec!(36),
                },
                StaffelungPattern {
                    min_children: 2,
                    under_age: 16,
                    percent: dec!(36),
                },
            ],
        }
    }

    #[test]
    fn test_one_young_child_gets_pattern_floor() {
        assert_eq!(staffelung().percent_for(&[6]), dec!(36));
    }

    #[test]
    fn test_two_children_under_16() {
        assert_eq!(staffelung().percent_for(&[10, 14]), dec!(36));
    }

    #[test]
    fn test_one_older_child_gets_per_child_rate() {
        assert_eq!(staffelung().percent_for(&[10]), dec!(12));
    }

    #[test]
    fn test_per_child_rate_beats_floor() {
        // 4 minors × 12 % = 48 % > 36 %
        assert_eq!(staffelung().percent_for(&[3, 8, 12, 15]), dec!(48));
    }

    #[test]
    fn test_capped_at_sixty() {
        assert_eq!(staffelung().percent_for(&[1, 2, 4, 6, 9, 11, 13]), dec!(60));
    }

    #[test]
    fn test_adult_children_do_not_count() {
        assert_eq!(staffelung().percent_for(&[18, 21]), Decimal::ZERO);
    }

    #[test]
    fn test_pattern_above_cap_is_rejected() {
        let mut s = staffelung();
        s.cap_percent = dec!(30);
        assert!(s.validate().is_err());
    }
}
