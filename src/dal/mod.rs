pub mod advisory_sheet;
pub mod deal_sheet;
pub mod firm_sheet;
pub mod spreadsheet;

pub use advisory_sheet::*;
pub use deal_sheet::*;
pub use firm_sheet::*;
pub use spreadsheet::*;
