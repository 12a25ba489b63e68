pub mod numeric;

pub use numeric::{parse_amount, parse_count};
