// scraper/sites/mod.rs
mod casa;
mod immobiliare;

pub use casa::CasaSite;
pub use immobiliare::ImmobiliareSite;

use crate::config::{Delays, Limits};
use crate::domain::filter::SearchCriteria;
use crate::domain::listing::{Listing, Source};
use crate::enrich::Translator;
use crate::scraper::fetch::Fetcher;
use crate::scraper::ScraperError;
use crate::towns::{configured_name, lookup_configured, slugify};
use chrono::NaiveDateTime;
use url::Url;

/// A configured town resolved against the town table.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTarget {
    pub name: String,
    pub slug: String,
    pub region_slug: String,
    pub casa_path: String,
    /// "Town, Region"
    pub location: String,
}

impl SearchTarget {
    /// Accepts "Crotone" or "Crotone, Calabria"; the region part is ignored.
    pub fn resolve(name: &str) -> Self {
        let name = configured_name(name);
        match lookup_configured(name) {
            Some(town) => Self {
                name: town.name.to_string(),
                slug: town.slug(),
                region_slug: town.region_slug().to_string(),
                casa_path: town.casa_path(),
                location: town.location(),
            },
            None => {
                tracing::warn!(town = name, "Town not in reference table, searching all of Italy");
                let slug = slugify(name);
                Self {
                    name: name.to_string(),
                    region_slug: "italia".into(),
                    casa_path: format!("italia/{slug}"),
                    location: format!("{name}, Italy"),
                    slug,
                }
            }
        }
    }
}

/// Everything a site scraper borrows for one run.
pub struct ScrapeContext<'a> {
    pub fetcher: &'a dyn Fetcher,
    pub translator: &'a dyn Translator,
    pub criteria: &'a SearchCriteria,
    pub limits: &'a Limits,
    pub delays: &'a Delays,
    pub now: NaiveDateTime,
}

pub trait ListingSite {
    fn source(&self) -> Source;

    fn search_url(&self, target: &SearchTarget, criteria: &SearchCriteria) -> Result<Url, ScraperError>;

    /// Best-effort: bad cards are skipped, a failed search page yields no listings.
    fn scrape(&self, ctx: &ScrapeContext<'_>, target: &SearchTarget) -> Result<Vec<Listing>, ScraperError>;
}

/// Sites searched by a research run, in order.
pub fn research_sites() -> Vec<Box<dyn ListingSite>> {
    vec![Box::new(ImmobiliareSite), Box::new(CasaSite)]
}

/// Fields read off a search-result card before any detail page is fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub title: String,
    pub url: String,
    pub price: i64,
    pub bedrooms: Option<i64>,
    pub size_sqm: Option<i64>,
    pub image: Option<String>,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_town_resolves_from_table() {
        let t = SearchTarget::resolve("rodi garganico");
        assert_eq!(t.name, "Rodi Garganico");
        assert_eq!(t.region_slug, "puglia");
        assert_eq!(t.casa_path, "puglia/foggia/rodi-garganico");
        assert_eq!(t.location, "Rodi Garganico, Puglia");
    }

    #[test]
    fn region_suffix_is_ignored() {
        assert_eq!(SearchTarget::resolve("Catania, Sicily").location, "Catania, Sicily");
    }

    #[test]
    fn unknown_town_falls_back_to_italy() {
        let t = SearchTarget::resolve("Porto Cesareo");
        assert_eq!(t.region_slug, "italia");
        assert_eq!(t.slug, "porto-cesareo");
        assert_eq!(t.casa_path, "italia/porto-cesareo");
        assert_eq!(t.location, "Porto Cesareo, Italy");
    }
}
