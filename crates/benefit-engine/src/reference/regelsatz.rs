//! Regelbedarfsstufen (§ 20, § 23 SGB II, Anlage zu § 28 SGB XII)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regelbedarfsstufe {
    /// Single adults and single parents
    Rbs1,
    /// Adult partners living together
    Rbs2,
    /// Adults aged 18 to 24 in the parents' household
    Rbs3,
    /// Youths aged 14 to 17
    Rbs4,
    /// Children aged 6 to 13
    Rbs5,
    /// Children under 6
    Rbs6,
}

impl Regelbedarfsstufe {
    pub fn number(&self) -> u8 {
        match self {
            Regelbedarfsstufe::Rbs1 => 1,
            Regelbedarfsstufe::Rbs2 => 2,
            Regelbedarfsstufe::Rbs3 => 3,
            Regelbedarfsstufe::Rbs4 => 4,
            Regelbedarfsstufe::Rbs5 => 5,
            Regelbedarfsstufe::Rbs6 => 6,
        }
    }

    /// Stufe of a child living in the household, by age in years
    pub fn for_child_age(age: u32) -> Self {
        match age {
            0..=5 => Regelbedarfsstufe::Rbs6,
            6..=13 => Regelbedarfsstufe::Rbs5,
            14..=17 => Regelbedarfsstufe::Rbs4,
            _ => Regelbedarfsstufe::Rbs3,
        }
    }

    pub fn all() -> [Self; 6] {
        [
            Regelbedarfsstufe::Rbs1,
            Regelbedarfsstufe::Rbs2,
            Regelbedarfsstufe::Rbs3,
            Regelbedarfsstufe::Rbs4,
            Regelbedarfsstufe::Rbs5,
            Regelbedarfsstufe::Rbs6,
        ]
    }
}

impl std::fmt::Display for Regelbedarfsstufe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Regelbedarfsstufe {}", self.number())
    }
}

/// One decimal value per Regelbedarfsstufe.
///
/// Used for the monthly amounts themselves and for per-stufe rates such as
/// the decentralized hot-water shares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerStufe {
    pub rbs1: Decimal,
    pub rbs2: Decimal,
    pub rbs3: Decimal,
    pub rbs4: Decimal,
    pub rbs5: Decimal,
    pub rbs6: Decimal,
}

impl PerStufe {
    pub fn get(&self, stufe: Regelbedarfsstufe) -> Decimal {
        match stufe {
            Regelbedarfsstufe::Rbs1 => self.rbs1,
            Regelbedarfsstufe::Rbs2 => self.rbs2,
            Regelbedarfsstufe::Rbs3 => self.rbs3,
            Regelbedarfsstufe::Rbs4 => self.rbs4,
            Regelbedarfsstufe::Rbs5 => self.rbs5,
            Regelbedarfsstufe::Rbs6 => self.rbs6,
        }
    }

    pub(crate) fn validate(&self, max: Option<Decimal>) -> Result<(), String> {
        for stufe in Regelbedarfsstufe::all() {
            let value = self.get(stufe);
            if value < Decimal::ZERO {
                return Err(format!("{} is negative ({})", stufe, value));
            }
            if let Some(max) = max {
                if value > max {
                    return Err(format!("{} exceeds {} ({})", stufe, max, value));
                }
            }
        }
        Ok(())
    }
}

/// Monthly Regelbedarf per stufe
pub type RegelsatzTable = PerStufe;
