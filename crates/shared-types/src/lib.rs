pub mod types;

pub use types::{
    BreakdownLine, CalculationResult, ExportDocument, ExportRow, HistoryEntry, Lookup,
};
