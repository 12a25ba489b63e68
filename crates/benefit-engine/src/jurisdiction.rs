//! Jurisdiction key resolution for housing-cost tables
//!
//! A key is either a five-digit postal code or a city name. Postal codes are
//! matched against each city's ranges; names are compared after
//! normalization (case, umlauts, whitespace) against the city key, its
//! display name and its aliases. A leading postal code followed by a name
//! ("10115 Berlin") tries the code first, then the name.

use crate::reference::{CityHousingLimits, HousingCostTable};
use lazy_static::lazy_static;
use regex::Regex;
use shared_types::Lookup;

lazy_static! {
    /// Postal code, optionally followed by a place name
    static ref POSTAL_CODE_PATTERN: Regex = Regex::new(r"^\s*(\d{5})\b\s*(.*)$").unwrap();

    static ref WHITESPACE_PATTERN: Regex = Regex::new(r"[\s\-_]+").unwrap();
}

/// Parsed form of a user-supplied jurisdiction key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JurisdictionKey {
    PostalCode { code: u32, place: Option<String> },
    CityName(String),
}

impl JurisdictionKey {
    pub fn parse(raw: &str) -> Self {
        if let Some(caps) = POSTAL_CODE_PATTERN.captures(raw) {
            let code = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok());
            if let Some(code) = code {
                let place = caps
                    .get(2)
                    .map(|m| m.as_str().trim())
                    .filter(|s| !s.is_empty())
                    .map(normalize_city_name);
                return JurisdictionKey::PostalCode { code, place };
            }
        }
        JurisdictionKey::CityName(normalize_city_name(raw))
    }
}

/// Lowercase, transliterate umlauts and collapse separators
pub fn normalize_city_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let transliterated = lowered
        .replace('ä', "ae")
        .replace('ö', "oe")
        .replace('ü', "ue")
        .replace('ß', "ss");
    WHITESPACE_PATTERN
        .replace_all(&transliterated, " ")
        .trim()
        .to_string()
}

fn name_matches(city: &CityHousingLimits, normalized: &str) -> bool {
    city.key == normalized
        || normalize_city_name(&city.name) == normalized
        || city
            .aliases
            .iter()
            .any(|alias| normalize_city_name(alias) == normalized)
}

fn find_by_name<'t>(table: &'t HousingCostTable, normalized: &str) -> Option<&'t CityHousingLimits> {
    table.cities.iter().find(|c| name_matches(c, normalized))
}

/// Resolve a jurisdiction key to its housing-cost row set
pub fn resolve<'t>(table: &'t HousingCostTable, raw: &str) -> Lookup<&'t CityHousingLimits> {
    let found = match JurisdictionKey::parse(raw) {
        JurisdictionKey::PostalCode { code, place } => table
            .cities
            .iter()
            .find(|c| c.covers_postal_code(code))
            .or_else(|| place.and_then(|p| find_by_name(table, &p))),
        JurisdictionKey::CityName(name) if name.is_empty() => None,
        JurisdictionKey::CityName(name) => find_by_name(table, &name),
    };

    match found {
        Some(city) => Lookup::Found(city),
        None => Lookup::not_found(raw.trim()),
    }
}
