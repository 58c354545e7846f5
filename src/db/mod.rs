pub mod cache;
pub mod connection;
pub mod listings;
pub mod scrapes;

pub use connection::{init_db, Database};

/// Epoch seconds (UTC) stamped on `http_cache` and `scrape_runs` rows.
pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}
