// enrich/geocode.rs
use crate::config::GeocodeConfig;
use crate::domain::listing::Coordinate;
use crate::scraper::fetch::pause;
use crate::scraper::ScraperError;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

const USER_AGENT: &str = "casa_scout/0.1 (personal property research)";

// Nominatim usage policy: at most one request per second.
const NOMINATIM_INTERVAL_MS: u64 = 1000;

pub trait Geocoder {
    fn geocode(&self, query: &str) -> Result<Option<Coordinate>, ScraperError>;
}

// Nominatim returns coordinates as strings.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

pub struct NominatimGeocoder {
    client: Client,
    endpoint: String,
    interval_ms: u64,
    memo: RefCell<HashMap<String, Option<Coordinate>>>,
}

impl NominatimGeocoder {
    pub fn new(endpoint: String) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            client,
            endpoint,
            interval_ms: NOMINATIM_INTERVAL_MS,
            memo: RefCell::new(HashMap::new()),
        })
    }

    fn lookup(&self, query: &str) -> Result<Option<Coordinate>, ScraperError> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()?;

        if !resp.status().is_success() {
            return Err(ScraperError::Enrich(format!(
                "geocode {query}: status {}",
                resp.status()
            )));
        }

        let places: Vec<Place> = resp.json()?;
        Ok(parse_first(&places))
    }
}

fn parse_first(places: &[Place]) -> Option<Coordinate> {
    let place = places.first()?;
    let lat = place.lat.parse().ok()?;
    let lon = place.lon.parse().ok()?;
    Some(Coordinate { lat, lon })
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&self, query: &str) -> Result<Option<Coordinate>, ScraperError> {
        if let Some(hit) = self.memo.borrow().get(query) {
            return Ok(*hit);
        }

        pause(self.interval_ms);
        let coordinate = self.lookup(query)?;
        tracing::debug!(query, found = coordinate.is_some(), "geocoded");
        self.memo.borrow_mut().insert(query.to_string(), coordinate);
        Ok(coordinate)
    }
}

pub fn build_geocoder(config: &GeocodeConfig) -> Result<Option<Box<dyn Geocoder>>, ScraperError> {
    if !config.enabled {
        return Ok(None);
    }
    Ok(Some(Box::new(NominatimGeocoder::new(config.endpoint.clone())?)))
}
