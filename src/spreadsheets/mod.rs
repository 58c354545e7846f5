pub mod export_xlsx;

pub use export_xlsx::{export_collected_xlsx, export_listings_xlsx};
