//! Adapters for the export and history collaborators
//!
//! Rendering and persistence live outside the engine. This module only
//! shapes a result into the rows and summary values those collaborators
//! accept.

use crate::money::round_cents;
use crate::rules::freibetrag::IncomeDisregardReport;
use crate::rules::kdu::HousingCostReport;
use crate::rules::sanktion::SanctionReport;
use crate::rules::schonvermoegen::AssetReport;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared_types::{CalculationResult, ExportDocument, ExportRow, HistoryEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculatorKind {
    Freibetrag,
    Mehrbedarf,
    Kdu,
    Sanktion,
    Schonvermoegen,
}

impl CalculatorKind {
    pub fn all() -> [CalculatorKind; 5] {
        [
            CalculatorKind::Freibetrag,
            CalculatorKind::Mehrbedarf,
            CalculatorKind::Kdu,
            CalculatorKind::Sanktion,
            CalculatorKind::Schonvermoegen,
        ]
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            CalculatorKind::Freibetrag => "Freibetragsrechner",
            CalculatorKind::Mehrbedarf => "Mehrbedarfsrechner",
            CalculatorKind::Kdu => "KdU-Rechner",
            CalculatorKind::Sanktion => "Sanktionsrechner",
            CalculatorKind::Schonvermoegen => "Schonvermögen-Rechner",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            CalculatorKind::Freibetrag => "freibetrag-rechner",
            CalculatorKind::Mehrbedarf => "mehrbedarf-rechner",
            CalculatorKind::Kdu => "kdu-rechner",
            CalculatorKind::Sanktion => "sanktions-rechner",
            CalculatorKind::Schonvermoegen => "schonvermoegen-rechner",
        }
    }

    fn total_label(&self) -> &'static str {
        match self {
            CalculatorKind::Freibetrag => "Freibetrag gesamt",
            CalculatorKind::Mehrbedarf => "Mehrbedarf gesamt",
            CalculatorKind::Kdu => "Anerkannte Kosten",
            CalculatorKind::Sanktion => "Minderung pro Monat",
            CalculatorKind::Schonvermoegen => "Anrechenbares Vermögen",
        }
    }
}

/// Format an amount in German notation, e.g. `1.234,56 €`
pub fn format_euro(amount: Decimal) -> String {
    let rounded = round_cents(amount);
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*digit);
    }

    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{}{},{} €", sign, grouped, frac_part)
}

/// Anything that carries a breakdown and can summarize itself
pub trait Breakdown {
    fn result(&self) -> &CalculationResult;

    /// One-line summary for the export header and history list
    fn summary(&self) -> String {
        format!("Gesamt: {}", format_euro(self.result().total()))
    }
}

impl Breakdown for CalculationResult {
    fn result(&self) -> &CalculationResult {
        self
    }
}

impl Breakdown for IncomeDisregardReport {
    fn result(&self) -> &CalculationResult {
        &self.result
    }

    fn summary(&self) -> String {
        format!(
            "Freibetrag {}, anrechenbares Einkommen {}",
            format_euro(self.total_disregard),
            format_euro(self.countable_income)
        )
    }
}

impl Breakdown for HousingCostReport {
    fn result(&self) -> &CalculationResult {
        &self.result
    }

    fn summary(&self) -> String {
        format!(
            "{}: {}, anerkannt {}",
            self.jurisdiction,
            self.status.label(),
            format_euro(self.result.total())
        )
    }
}

impl Breakdown for SanctionReport {
    fn result(&self) -> &CalculationResult {
        &self.result
    }

    fn summary(&self) -> String {
        format!(
            "Minderung {} % ({}) für {} Monat(e)",
            self.percent.normalize(),
            format_euro(self.reduction),
            self.duration_months
        )
    }
}

impl Breakdown for AssetReport {
    fn result(&self) -> &CalculationResult {
        &self.result
    }

    fn summary(&self) -> String {
        let verdict = if self.eligible {
            "Vermögen steht dem Anspruch nicht entgegen"
        } else {
            "Vermögen übersteigt die Freibeträge"
        };
        format!("{} (anrechenbar {})", verdict, format_euro(self.countable_assets))
    }
}

/// Shape a result into the rows the document export expects
pub fn to_export<B: Breakdown + ?Sized>(kind: CalculatorKind, report: &B) -> ExportDocument {
    let result = report.result();
    let mut rows: Vec<ExportRow> = result
        .lines()
        .iter()
        .map(|line| ExportRow {
            label: line.label.clone(),
            value: format_euro(line.amount),
            highlight: false,
        })
        .collect();
    rows.push(ExportRow {
        label: kind.total_label().to_string(),
        value: format_euro(result.total()),
        highlight: true,
    });

    ExportDocument {
        title: kind.name().to_string(),
        summary: report.summary(),
        rows,
    }
}

pub fn history_entry<B: Breakdown + ?Sized>(
    kind: CalculatorKind,
    report: &B,
    at: DateTime<Utc>,
) -> HistoryEntry {
    HistoryEntry {
        calculator_name: kind.name().to_string(),
        slug: kind.slug().to_string(),
        summary: report.summary(),
        timestamp: at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use shared_types::BreakdownLine;

    fn sample() -> CalculationResult {
        let mut result = CalculationResult::new();
        result.push_line(BreakdownLine::new("Grundfreibetrag", dec!(100), "§ 11b Abs. 2 SGB II", ""));
        result.push_line(BreakdownLine::new("Freibetrag 100 bis 520 €", dec!(84), "§ 11b Abs. 3 SGB II", ""));
        result
    }

    #[test]
    fn test_format_euro() {
        assert_eq!(format_euro(dec!(0)), "0,00 €");
        assert_eq!(format_euro(dec!(12.5)), "12,50 €");
        assert_eq!(format_euro(dec!(169)), "169,00 €");
        assert_eq!(format_euro(dec!(1234.567)), "1.234,57 €");
        assert_eq!(format_euro(dec!(1000000)), "1.000.000,00 €");
        assert_eq!(format_euro(dec!(-45.1)), "-45,10 €");
    }

    #[test]
    fn test_export_rows_end_with_highlighted_total() {
        let doc = to_export(CalculatorKind::Freibetrag, &sample());

        assert_eq!(doc.title, "Freibetragsrechner");
        assert_eq!(doc.summary, "Gesamt: 184,00 €");
        assert_eq!(doc.rows.len(), 3);
        assert!(!doc.rows[0].highlight);
        assert_eq!(
            doc.rows[2],
            ExportRow {
                label: "Freibetrag gesamt".to_string(),
                value: "184,00 €".to_string(),
                highlight: true,
            }
        );
    }

    #[test]
    fn test_history_entry() {
        let at = Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap();
        let entry = history_entry(CalculatorKind::Schonvermoegen, &sample(), at);

        assert_eq!(entry.calculator_name, "Schonvermögen-Rechner");
        assert_eq!(entry.slug, "schonvermoegen-rechner");
        assert_eq!(entry.timestamp, at);
    }

    #[test]
    fn test_slugs_are_unique() {
        let mut slugs: Vec<&str> = CalculatorKind::all().iter().map(|k| k.slug()).collect();
        slugs.sort_unstable();
        slugs.dedup();
        assert_eq!(slugs.len(), 5);
    }
}
