pub mod apr;
pub mod summary;

pub use apr::{compute_apr, format_percentage, round_for_display, AprInputs};
pub use summary::TradeSummary;
