// src/domain/listing.rs

use crate::domain::condition::Condition;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt;

/// Property portals we scrape or link to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Immobiliare,
    Casa,
    Idealista,
    Subito,
}

impl Source {
    pub fn key(&self) -> &'static str {
        match self {
            Source::Immobiliare => "immobiliare",
            Source::Casa => "casa",
            Source::Idealista => "idealista",
            Source::Subito => "subito",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Source::Immobiliare => "Immobiliare.it",
            Source::Casa => "Casa.it",
            Source::Idealista => "Idealista.it",
            Source::Subito => "Subito.it",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "immobiliare" => Some(Source::Immobiliare),
            "casa" => Some(Source::Casa),
            "idealista" => Some(Source::Idealista),
            "subito" => Some(Source::Subito),
            _ => None,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePoint {
    pub observed_at: NaiveDateTime,
    pub price: i64,
}

/// A single advertisement as scraped from a portal, flattened and ready to store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub id: String,
    pub source: Source,
    pub title: String,
    pub description: String,
    pub description_en: String,
    pub price: i64,
    pub size_sqm: Option<i64>,
    pub bedrooms: Option<i64>,
    pub condition: Condition,
    /// "Town, Region"
    pub location: String,
    pub url: String,
    pub image_urls: Vec<String>,
    pub price_per_sqm: Option<f64>,
    pub coordinate: Option<Coordinate>,
    pub first_seen: NaiveDateTime,
    pub last_seen: NaiveDateTime,
    pub price_history: Vec<PricePoint>,
}

pub struct NewListing {
    pub source: Source,
    pub title: String,
    pub description: String,
    pub description_en: String,
    pub price: i64,
    pub size_sqm: Option<i64>,
    pub bedrooms: Option<i64>,
    pub location: String,
    pub url: String,
    pub image_urls: Vec<String>,
}

impl Listing {
    /// Builds a freshly scraped listing: stable id, derived price/m², one history point.
    pub fn new(fields: NewListing, now: NaiveDateTime) -> Self {
        let id = listing_id(fields.source, &fields.url);
        let price_per_sqm = price_per_sqm(fields.price, fields.size_sqm);

        Self {
            id,
            source: fields.source,
            title: fields.title,
            description: fields.description,
            description_en: fields.description_en,
            price: fields.price,
            size_sqm: fields.size_sqm,
            bedrooms: fields.bedrooms,
            condition: Condition::Unknown,
            location: fields.location,
            url: fields.url,
            image_urls: fields.image_urls,
            price_per_sqm,
            coordinate: None,
            first_seen: now,
            last_seen: now,
            price_history: vec![PricePoint {
                observed_at: now,
                price: fields.price,
            }],
        }
    }
}

pub fn price_per_sqm(price: i64, size_sqm: Option<i64>) -> Option<f64> {
    match size_sqm {
        Some(size) if size > 0 => Some(price as f64 / size as f64),
        _ => None,
    }
}

/// Prefix ids with the source so ids can't collide across portals.
/// Example: "immobiliare:1f2e3d4c5b6a7980"
pub fn listing_id(source: Source, url: &str) -> String {
    let digest = Sha256::digest(url.trim().as_bytes());
    let hex: String = digest.iter().take(8).map(|b| format!("{b:02x}")).collect();
    format!("{}:{}", source.key(), hex)
}

/// Keeps the first occurrence of each listing id, preserving order.
pub fn dedup_listings(listings: Vec<Listing>) -> Vec<Listing> {
    let mut seen = HashSet::new();
    listings
        .into_iter()
        .filter(|l| seen.insert(l.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn sample(url: &str, price: i64, size: Option<i64>) -> Listing {
        Listing::new(
            NewListing {
                source: Source::Immobiliare,
                title: "Trilocale".into(),
                description: String::new(),
                description_en: String::new(),
                price,
                size_sqm: size,
                bedrooms: Some(3),
                location: "Crotone, Calabria".into(),
                url: url.into(),
                image_urls: vec![],
            },
            now(),
        )
    }

    #[test]
    fn id_is_stable_and_scoped_by_source() {
        let url = "https://www.immobiliare.it/annunci/123/";
        let a = listing_id(Source::Immobiliare, url);
        let b = listing_id(Source::Immobiliare, url);
        assert_eq!(a, b);
        assert!(a.starts_with("immobiliare:"));
        assert_eq!(a.len(), "immobiliare:".len() + 16);
        assert_ne!(a, listing_id(Source::Casa, url));
        assert_ne!(a, listing_id(Source::Immobiliare, "https://www.immobiliare.it/annunci/124/"));
    }

    #[test]
    fn new_listing_derives_price_per_sqm_and_history() {
        let l = sample("https://x/1", 200_000, Some(80));
        assert_eq!(l.price_per_sqm, Some(2500.0));
        assert_eq!(l.price_history.len(), 1);
        assert_eq!(l.price_history[0].price, 200_000);
        assert_eq!(l.condition, Condition::Unknown);
        assert_eq!(l.first_seen, l.last_seen);
    }

    #[test]
    fn zero_or_missing_size_has_no_price_per_sqm() {
        assert_eq!(price_per_sqm(100_000, None), None);
        assert_eq!(price_per_sqm(100_000, Some(0)), None);
    }

    #[test]
    fn dedup_keeps_first_by_id() {
        let mut second = sample("https://x/1", 210_000, None);
        second.title = "Duplicate".into();
        let listings = vec![
            sample("https://x/1", 200_000, None),
            sample("https://x/2", 300_000, None),
            second,
        ];
        let deduped = dedup_listings(listings);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].title, "Trilocale");
        assert_eq!(deduped[0].price, 200_000);
    }
}
