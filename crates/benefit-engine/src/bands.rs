//! Marginal rate bands
//!
//! A schedule is an ordered list of `{lower, upper|unbounded, rate}` bands.
//! Each band applies its rate only to the slice of the value that falls
//! inside it, the way tax brackets work. Boundaries belong to the lower band:
//! a value exactly at `upper` fills that band and leaves the next one empty.

use crate::money::{percent_of, round_cents};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    pub lower: Decimal,
    /// `None` means the band is unbounded above
    #[serde(default)]
    pub upper: Option<Decimal>,
    pub rate_percent: Decimal,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub legal_reference: String,
}

impl Band {
    /// Portion of `value` that falls inside this band
    pub fn portion(&self, value: Decimal) -> Decimal {
        let above_lower = (value - self.lower).max(Decimal::ZERO);
        match self.upper {
            Some(upper) => above_lower.min(upper - self.lower),
            None => above_lower,
        }
    }
}

/// Result of applying one band to a value
#[derive(Debug, Clone, PartialEq)]
pub struct BandPortion<'a> {
    pub band: &'a Band,
    pub portion: Decimal,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BandSchedule {
    bands: Vec<Band>,
}

impl BandSchedule {
    pub fn new(bands: Vec<Band>) -> Result<Self, String> {
        let schedule = Self { bands };
        schedule.validate()?;
        Ok(schedule)
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Check that bands start at zero, are contiguous and have sane rates
    pub fn validate(&self) -> Result<(), String> {
        let Some(first) = self.bands.first() else {
            return Err("band schedule is empty".to_string());
        };
        if !first.lower.is_zero() {
            return Err(format!("first band must start at 0, starts at {}", first.lower));
        }

        for (i, band) in self.bands.iter().enumerate() {
            if band.rate_percent < Decimal::ZERO || band.rate_percent > Decimal::ONE_HUNDRED {
                return Err(format!(
                    "band {} has rate {} outside 0..=100",
                    i, band.rate_percent
                ));
            }
            match band.upper {
                Some(upper) if upper <= band.lower => {
                    return Err(format!("band {} has upper {} <= lower {}", i, upper, band.lower));
                }
                None if i + 1 != self.bands.len() => {
                    return Err(format!("only the last band may be unbounded (band {})", i));
                }
                _ => {}
            }
            if let Some(next) = self.bands.get(i + 1) {
                if band.upper != Some(next.lower) {
                    return Err(format!(
                        "band {} ends at {:?} but band {} starts at {}",
                        i,
                        band.upper,
                        i + 1,
                        next.lower
                    ));
                }
            }
        }

        Ok(())
    }

    /// Apply every band to `value`, amounts rounded to cents
    pub fn evaluate(&self, value: Decimal) -> Vec<BandPortion<'_>> {
        self.bands
            .iter()
            .map(|band| {
                let portion = band.portion(value);
                BandPortion {
                    band,
                    portion,
                    amount: round_cents(percent_of(portion, band.rate_percent)),
                }
            })
            .collect()
    }

    pub fn total(&self, value: Decimal) -> Decimal {
        self.evaluate(value).iter().map(|p| p.amount).sum()
    }

    /// Upper boundary of the last band, if it is bounded
    pub fn top(&self) -> Option<Decimal> {
        self.bands.last().and_then(|b| b.upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn band(lower: Decimal, upper: Option<Decimal>, rate: Decimal) -> Band {
        Band {
            lower,
            upper,
            rate_percent: rate,
            label: String::new(),
            legal_reference: String::new(),
        }
    }

    fn schedule() -> BandSchedule {
        BandSchedule::new(vec![
            band(dec!(0), Some(dec!(100)), dec!(100)),
            band(dec!(100), Some(dec!(520)), dec!(20)),
            band(dec!(520), Some(dec!(1000)), dec!(30)),
            band(dec!(1000), Some(dec!(1200)), dec!(10)),
        ])
        .unwrap()
    }

    #[test]
    fn test_marginal_evaluation() {
        let s = schedule();
        assert_eq!(s.total(dec!(600)), dec!(208));
        assert_eq!(s.total(dec!(1200)), dec!(348));
        // Above the top band nothing more is disregarded
        assert_eq!(s.total(dec!(5000)), dec!(348));
    }

    #[test]
    fn test_boundary_is_not_double_counted() {
        let s = schedule();
        let portions = s.evaluate(dec!(520));
        assert_eq!(portions[1].portion, dec!(420));
        assert_eq!(portions[2].portion, Decimal::ZERO);
        assert_eq!(s.total(dec!(520)), dec!(184));
    }

    #[test]
    fn test_zero_value() {
        assert_eq!(schedule().total(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_rejects_gap_between_bands() {
        let err = BandSchedule::new(vec![
            band(dec!(0), Some(dec!(100)), dec!(100)),
            band(dec!(150), None, dec!(20)),
        ])
        .unwrap_err();
        assert!(err.contains("starts at 150"));
    }

    #[test]
    fn test_rejects_unbounded_middle_band() {
        let err = BandSchedule::new(vec![
            band(dec!(0), None, dec!(100)),
            band(dec!(100), Some(dec!(200)), dec!(20)),
        ])
        .unwrap_err();
        assert!(err.contains("unbounded"));
    }

    #[test]
    fn test_rejects_rate_above_hundred() {
        assert!(BandSchedule::new(vec![band(dec!(0), None, dec!(120))]).is_err());
    }

    #[test]
    fn test_top() {
        assert_eq!(schedule().top(), Some(dec!(1200)));
        let open = BandSchedule::new(vec![band(dec!(0), None, dec!(5))]).unwrap();
        assert_eq!(open.top(), None);
    }
}
