//! The five calculators. Each is a pure function of its input and one
//! [`RuleSet`](crate::reference::RuleSet).

pub mod freibetrag;
pub mod kdu;
pub mod mehrbedarf;
pub mod sanktion;
pub mod schonvermoegen;
