// src/tests/utils.rs
use crate::db::{init_db, Database};
use crate::domain::listing::{Listing, NewListing, Source};
use crate::scraper::{Fetcher, Page, ScraperError};
use chrono::{NaiveDate, NaiveDateTime};
use std::cell::RefCell;
use std::collections::HashMap;
use tempfile::TempDir;
use url::Url;

/// Fresh database in its own temp dir. Keep the `TempDir` alive for the test.
pub fn init_test_db() -> (TempDir, Database) {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir failed: {e}"));
    let db = Database::new(dir.path().join("test.sqlite"));
    init_db(&db).unwrap_or_else(|e| panic!("Database initialization failed: {e}"));
    (dir, db)
}

pub fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

pub fn sample_listing(url: &str, price: i64, now: NaiveDateTime) -> Listing {
    Listing::new(
        NewListing {
            source: Source::Immobiliare,
            title: "Trilocale vista mare".into(),
            description: "Appartamento ristrutturato".into(),
            description_en: "Renovated apartment".into(),
            price,
            size_sqm: Some(100),
            bedrooms: Some(3),
            location: "Crotone, Calabria".into(),
            url: url.into(),
            image_urls: vec!["https://pic.im/1.jpg".into()],
        },
        now,
    )
}

/// Serves canned pages by exact URL. Unknown URLs fail like a dropped connection.
#[derive(Default)]
pub struct StubFetcher {
    pages: HashMap<String, (u16, String)>,
    requested: RefCell<Vec<String>>,
}

impl StubFetcher {
    pub fn page(mut self, url: impl AsRef<str>, status: u16, body: impl Into<String>) -> Self {
        self.pages.insert(url.as_ref().to_string(), (status, body.into()));
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl Fetcher for StubFetcher {
    fn fetch(&self, url: &Url) -> Result<Page, ScraperError> {
        self.requested.borrow_mut().push(url.to_string());
        match self.pages.get(url.as_str()) {
            Some((status, body)) => Ok(Page {
                url: url.clone(),
                status: *status,
                body: body.clone(),
            }),
            None => Err(ScraperError::Network(format!("no stub for {url}"))),
        }
    }
}
