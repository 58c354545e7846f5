pub mod collector;
pub mod extract;
pub mod fetch;
pub mod html;
pub mod probe;
mod scraper_error;
pub mod sites;

pub use fetch::{build_fetcher, Fetcher, HttpFetcher, Page};
pub use scraper_error::ScraperError;
pub use sites::{research_sites, ListingSite, ScrapeContext, SearchTarget};
