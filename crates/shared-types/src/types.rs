use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One itemized entry of a calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownLine {
    pub label: String,
    pub amount: Decimal, // Never negative
    pub legal_reference: String, // e.g., "§ 11b Abs. 3 SGB II"
    pub explanation: String,
}

impl BreakdownLine {
    /// Create a line, clamping a negative amount to zero
    pub fn new(
        label: impl Into<String>,
        amount: Decimal,
        legal_reference: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            amount: amount.max(Decimal::ZERO),
            legal_reference: legal_reference.into(),
            explanation: explanation.into(),
        }
    }
}

/// Itemized breakdown returned by every calculator.
///
/// The total is maintained by [`CalculationResult::push_line`], so it always
/// equals the sum of the line amounts and is never negative. Deserialization
/// rebuilds the total from the lines and ignores any serialized total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SerializedResult")]
pub struct CalculationResult {
    lines: Vec<BreakdownLine>,
    total: Decimal,
    hints: Vec<String>,
}

impl CalculationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line; a negative amount is clamped to zero
    pub fn push_line(&mut self, mut line: BreakdownLine) {
        line.amount = line.amount.max(Decimal::ZERO);
        self.total += line.amount;
        self.lines.push(line);
    }

    pub fn push_hint(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    pub fn lines(&self) -> &[BreakdownLine] {
        &self.lines
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    /// Find a line by its label
    pub fn line(&self, label: &str) -> Option<&BreakdownLine> {
        self.lines.iter().find(|l| l.label == label)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Wire shape of [`CalculationResult`]
#[derive(Deserialize)]
struct SerializedResult {
    #[serde(default)]
    lines: Vec<BreakdownLine>,
    #[serde(default)]
    hints: Vec<String>,
}

impl From<SerializedResult> for CalculationResult {
    fn from(raw: SerializedResult) -> Self {
        let mut result = CalculationResult::new();
        for line in raw.lines {
            result.push_line(line);
        }
        result.hints = raw.hints;
        result
    }
}

/// Outcome of a reference table lookup.
///
/// Unresolvable keys are reported as data, never as an error, so callers
/// must handle the absent case explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Lookup<T> {
    Found(T),
    NotFound { key: String },
}

impl<T> Lookup<T> {
    pub fn not_found(key: impl Into<String>) -> Self {
        Lookup::NotFound { key: key.into() }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotFound { .. } => None,
        }
    }

    pub fn as_ref(&self) -> Lookup<&T> {
        match self {
            Lookup::Found(value) => Lookup::Found(value),
            Lookup::NotFound { key } => Lookup::NotFound { key: key.clone() },
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Lookup<U> {
        match self {
            Lookup::Found(value) => Lookup::Found(f(value)),
            Lookup::NotFound { key } => Lookup::NotFound { key },
        }
    }
}

/// A row handed to the document export collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    pub label: String,
    pub value: String,
    pub highlight: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub title: String,
    pub summary: String,
    pub rows: Vec<ExportRow>,
}

/// Summary values handed to the history collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub calculator_name: String,
    pub slug: String,
    pub summary: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_total_tracks_lines() {
        let mut result = CalculationResult::new();
        result.push_line(BreakdownLine::new("a", dec!(10.50), "§ 1", ""));
        result.push_line(BreakdownLine::new("b", dec!(4.25), "§ 2", ""));

        assert_eq!(result.total(), dec!(14.75));
        assert_eq!(result.lines().len(), 2);
        assert_eq!(result.line("b").map(|l| l.amount), Some(dec!(4.25)));
    }

    #[test]
    fn test_negative_line_amount_is_clamped() {
        let line = BreakdownLine::new("neg", dec!(-3), "§ 1", "");
        assert_eq!(line.amount, Decimal::ZERO);

        let mut result = CalculationResult::new();
        result.push_line(line);
        assert_eq!(result.total(), Decimal::ZERO);
    }

    #[test]
    fn test_push_line_clamps_literal_negative_amount() {
        let mut result = CalculationResult::new();
        result.push_line(BreakdownLine {
            label: "literal".to_string(),
            amount: dec!(-5),
            legal_reference: "§ 1".to_string(),
            explanation: String::new(),
        });
        result.push_line(BreakdownLine::new("b", dec!(2), "§ 2", ""));

        assert_eq!(result.lines()[0].amount, Decimal::ZERO);
        assert_eq!(result.total(), dec!(2));
    }

    #[test]
    fn test_deserialize_recomputes_total() {
        let json = r#"{
            "lines": [
                {"label": "a", "amount": "10", "legal_reference": "§ 1", "explanation": ""},
                {"label": "b", "amount": "-4", "legal_reference": "§ 2", "explanation": ""}
            ],
            "total": "-99",
            "hints": ["note"]
        }"#;
        let result: CalculationResult = serde_json::from_str(json).unwrap();

        assert_eq!(result.total(), dec!(10));
        assert_eq!(result.lines()[1].amount, Decimal::ZERO);
        assert_eq!(result.hints().to_vec(), vec!["note".to_string()]);
    }

    #[test]
    fn test_result_round_trips_through_json() {
        let mut result = CalculationResult::new();
        result.push_line(BreakdownLine::new("a", dec!(12.34), "§ 1", "x"));
        result.push_hint("hint");

        let json = serde_json::to_string(&result).unwrap();
        let back: CalculationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_empty_result_is_zero() {
        let result = CalculationResult::new();
        assert!(result.is_empty());
        assert_eq!(result.total(), Decimal::ZERO);
        assert!(result.hints().is_empty());
    }

    #[test]
    fn test_lookup_helpers() {
        let found: Lookup<u32> = Lookup::Found(7);
        assert!(found.is_found());
        assert_eq!(found.clone().map(|v| v * 2), Lookup::Found(14));
        assert_eq!(found.found(), Some(7));

        let missing: Lookup<u32> = Lookup::not_found("Atlantis");
        assert!(!missing.is_found());
        assert_eq!(missing.found(), None);
    }

    #[test]
    fn test_lookup_serializes_with_status_tag() {
        let missing: Lookup<u32> = Lookup::not_found("99999");
        let json = serde_json::to_value(&missing).unwrap();
        assert_eq!(json["status"], "not_found");
        assert_eq!(json["value"]["key"], "99999");
    }
}
