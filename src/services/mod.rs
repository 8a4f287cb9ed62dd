pub mod advisory_scraper;
pub mod deal_scraper;
pub mod droid;
pub mod google_scraper;
pub mod ticker;

pub use advisory_scraper::*;
pub use deal_scraper::*;
pub use droid::*;
pub use google_scraper::*;
pub use ticker::*;
