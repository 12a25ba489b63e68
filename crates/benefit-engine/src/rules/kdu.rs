//! Angemessenheit der Kosten der Unterkunft und Heizung (§ 22 SGB II)
//!
//! Rent plus utilities, heating and living area are each compared against
//! the jurisdiction's ceiling for the household size. The three results
//! collapse into a traffic light: all within limits is green, one exceeded
//! is yellow, two or more is red.

use crate::jurisdiction;
use crate::money::clamp_amount;
use crate::reference::RuleSet;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared_types::{BreakdownLine, CalculationResult, Lookup};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HousingCostInput {
    /// Postal code or city name
    pub jurisdiction: String,
    pub household_size: u32,
    pub cold_rent: Decimal,
    pub utilities: Decimal,
    pub heating: Decimal,
    pub living_area: Decimal,
    /// First year of receipt (Karenzzeit, § 22 Abs. 1 Satz 2 SGB II)
    pub in_waiting_period: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HousingStatus {
    Green,
    Yellow,
    Red,
}

impl HousingStatus {
    pub fn from_exceeded(exceeded: usize) -> Self {
        match exceeded {
            0 => HousingStatus::Green,
            1 => HousingStatus::Yellow,
            _ => HousingStatus::Red,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HousingStatus::Green => "adequate",
            HousingStatus::Yellow => "partial concern",
            HousingStatus::Red => "exceeds limits",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            HousingStatus::Green => "Die Kosten der Unterkunft sind angemessen.",
            HousingStatus::Yellow => "Ein Richtwert wird überschritten.",
            HousingStatus::Red => "Mehrere Richtwerte werden überschritten.",
        }
    }
}

impl std::fmt::Display for HousingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One compared dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionCheck {
    pub actual: Decimal,
    pub ceiling: Decimal,
    pub within_limit: bool,
}

impl DimensionCheck {
    pub fn new(actual: Decimal, ceiling: Decimal) -> Self {
        Self {
            actual,
            ceiling,
            within_limit: actual <= ceiling,
        }
    }

    pub fn excess(&self) -> Decimal {
        (self.actual - self.ceiling).max(Decimal::ZERO)
    }

    /// Amount recognized when only the adequate part is paid
    pub fn recognized(&self) -> Decimal {
        self.actual.min(self.ceiling)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HousingCostReport {
    pub jurisdiction: String,
    pub household_size: u32,
    pub rent_and_utilities: DimensionCheck,
    pub heating: DimensionCheck,
    pub living_area: DimensionCheck,
    pub status: HousingStatus,
    /// Monthly costs above the ceilings (area excluded)
    pub excess: Decimal,
    /// Recognized amounts; hints carry the advisory notes
    pub result: CalculationResult,
}

impl HousingCostReport {
    pub fn exceeded_dimensions(&self) -> usize {
        [&self.rent_and_utilities, &self.heating, &self.living_area]
            .iter()
            .filter(|d| !d.within_limit)
            .count()
    }
}

pub fn calculate(input: &HousingCostInput, rules: &RuleSet) -> Lookup<HousingCostReport> {
    let city = match jurisdiction::resolve(&rules.housing, &input.jurisdiction) {
        Lookup::Found(city) => city,
        Lookup::NotFound { key } => {
            warn!(key = %key, version = %rules.version, "jurisdiction not in housing table");
            return Lookup::NotFound { key };
        }
    };

    let household_size = input.household_size.max(1);
    let limits = city.limits_for(household_size);

    let rent_and_utilities = DimensionCheck::new(
        clamp_amount(input.cold_rent) + clamp_amount(input.utilities),
        limits.rent_and_utilities,
    );
    let heating = DimensionCheck::new(clamp_amount(input.heating), limits.heating);
    let living_area = DimensionCheck::new(clamp_amount(input.living_area), limits.area_sqm);

    let exceeded = [&rent_and_utilities, &heating, &living_area]
        .iter()
        .filter(|d| !d.within_limit)
        .count();
    let status = HousingStatus::from_exceeded(exceeded);

    let mut result = CalculationResult::new();
    if input.in_waiting_period {
        result.push_line(BreakdownLine::new(
            "Bruttokaltmiete (tatsächlich)",
            rent_and_utilities.actual,
            "§ 22 Abs. 1 Satz 2 SGB II",
            "In der Karenzzeit werden die tatsächlichen Kosten der Unterkunft anerkannt",
        ));
        result.push_hint(
            "Karenzzeit: Im ersten Jahr des Leistungsbezugs wird die tatsächliche Bruttokaltmiete übernommen. \
             Heizkosten werden auch in der Karenzzeit nur in angemessener Höhe anerkannt.",
        );
    } else {
        result.push_line(BreakdownLine::new(
            "Angemessene Bruttokaltmiete",
            rent_and_utilities.recognized(),
            "§ 22 Abs. 1 Satz 1 SGB II",
            format!(
                "Kaltmiete und Nebenkosten bis zum Richtwert von {} €",
                rent_and_utilities.ceiling.normalize()
            ),
        ));
    }
    result.push_line(BreakdownLine::new(
        "Angemessene Heizkosten",
        heating.recognized(),
        "§ 22 Abs. 1 Satz 1 SGB II",
        format!("Heizkosten bis zum Richtwert von {} €", heating.ceiling.normalize()),
    ));

    if status != HousingStatus::Green {
        result.push_hint(format!(
            "{} Das Jobcenter kann zur Senkung der Kosten auffordern; in der Regel gilt eine Übergangsfrist von sechs Monaten (§ 22 Abs. 1 Satz 7 SGB II).",
            status.description()
        ));
    }
    if !living_area.within_limit && rent_and_utilities.within_limit {
        result.push_hint(
            "Die Wohnfläche liegt über dem Richtwert, die Miete aber im Rahmen. \
             Nach der Produkttheorie ist allein die Gesamtmiete maßgeblich.",
        );
    }
    if !city.methodologically_sound_concept {
        result.push_hint(format!(
            "Für {} liegt kein schlüssiges Konzept zur Ermittlung der Mietobergrenzen vor. \
             Mieter haben dann bessere Chancen, Kosten oberhalb der Tabellenwerte durchzusetzen \
             (Wohngeldtabelle plus 10 % Sicherheitszuschlag).",
            city.name
        ));
    }

    let excess = if input.in_waiting_period {
        heating.excess()
    } else {
        rent_and_utilities.excess() + heating.excess()
    };

    debug!(
        version = %rules.version,
        jurisdiction = %city.key,
        household_size,
        status = %status,
        "housing costs assessed"
    );

    Lookup::Found(HousingCostReport {
        jurisdiction: city.name.clone(),
        household_size,
        rent_and_utilities,
        heating,
        living_area,
        status,
        excess,
        result,
    })
}
