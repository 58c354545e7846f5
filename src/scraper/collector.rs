// scraper/collector.rs
//
// Gathers listing URLs for manual review rather than full listings.

use crate::config::{Delays, Limits};
use crate::domain::listing::Source;
use crate::scraper::extract::price_label;
use crate::scraper::fetch::{pause, Fetcher};
use crate::scraper::html::{absolute, element_text, selector};
use crate::scraper::sites::SearchTarget;
use crate::scraper::ScraperError;
use chrono::NaiveDateTime;
use scraper::{ElementRef, Html};
use serde::Serialize;
use std::collections::HashSet;
use url::Url;

const CASA_KINDS: &[&str] = &["/casa-", "/appartamento-", "/villa-"];
const IMMOBILIARE_ROOT: &str = "https://www.immobiliare.it";

/// Column order matches the CSV export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectedUrl {
    pub town: String,
    pub site: String,
    pub title: String,
    pub estimated_price: String,
    pub url: String,
    pub found_date: NaiveDateTime,
}

pub struct Collector<'a> {
    pub fetcher: &'a dyn Fetcher,
    pub limits: &'a Limits,
    pub delays: &'a Delays,
    pub now: NaiveDateTime,
}

impl<'a> Collector<'a> {
    pub fn collect(&self, towns: &[String]) -> Vec<CollectedUrl> {
        let mut seen = HashSet::new();
        let mut all = Vec::new();

        for name in towns {
            let target = SearchTarget::resolve(name);
            tracing::info!(town = %target.name, "Collecting URLs");

            let casa = self.site_urls(Source::Casa, casa_town_url(&target), |html, base| {
                parse_casa_links(html, base, &target.name, self.now)
            });
            pause(self.delays.town_ms);

            let immobiliare = self.site_urls(
                Source::Immobiliare,
                immobiliare_town_url(&target),
                |html, _| parse_immobiliare_links(html, &target.name, self.now),
            );
            pause(self.delays.town_ms);

            for found in casa.into_iter().chain(immobiliare) {
                if seen.insert(found.url.clone()) {
                    all.push(found);
                }
            }
        }

        tracing::info!(count = all.len(), "Collection complete");
        all
    }

    fn site_urls<F>(&self, source: Source, url: Result<Url, ScraperError>, parse: F) -> Vec<CollectedUrl>
    where
        F: Fn(&str, &Url) -> Result<Vec<CollectedUrl>, ScraperError>,
    {
        let result = url.and_then(|url| {
            let page = self.fetcher.fetch(&url)?;
            if !page.is_ok() {
                return Err(ScraperError::Blocked(format!("{} returned {}", source, page.status)));
            }
            parse(&page.body, &page.url)
        });

        match result {
            Ok(mut urls) => {
                tracing::info!(site = %source, count = urls.len(), "Found potential properties");
                urls.truncate(self.limits.collector);
                urls
            }
            Err(e) => {
                tracing::warn!(site = %source, error = %e, "Collection failed");
                Vec::new()
            }
        }
    }
}

pub fn casa_town_url(target: &SearchTarget) -> Result<Url, ScraperError> {
    Ok(Url::parse(&format!(
        "https://www.casa.it/vendita/residenziale/{}/",
        target.casa_path
    ))?)
}

pub fn immobiliare_town_url(target: &SearchTarget) -> Result<Url, ScraperError> {
    Ok(Url::parse(&format!("{IMMOBILIARE_ROOT}/vendita-case/{}/", target.slug))?)
}

fn link_title(link: ElementRef<'_>) -> String {
    match element_text(link) {
        t if t.is_empty() => "Property".to_string(),
        t => t,
    }
}

pub fn parse_casa_links(
    html: &str,
    base: &Url,
    town: &str,
    found: NaiveDateTime,
) -> Result<Vec<CollectedUrl>, ScraperError> {
    let doc = Html::parse_document(html);
    let links = selector("a[href]")?;

    let mut urls = Vec::new();
    for link in doc.select(&links) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if !href.contains("/vendita/") || !CASA_KINDS.iter().any(|k| href.contains(k)) {
            continue;
        }
        let Some(url) = absolute(base, href) else {
            continue;
        };

        let estimated_price = link
            .parent()
            .and_then(ElementRef::wrap)
            .and_then(|parent| price_label(&element_text(parent)))
            .unwrap_or_else(|| "Unknown".to_string());

        urls.push(CollectedUrl {
            town: town.to_string(),
            site: Source::Casa.display_name().to_string(),
            title: link_title(link),
            estimated_price,
            url: url.to_string(),
            found_date: found,
        });
    }
    Ok(urls)
}

pub fn parse_immobiliare_links(
    html: &str,
    town: &str,
    found: NaiveDateTime,
) -> Result<Vec<CollectedUrl>, ScraperError> {
    let doc = Html::parse_document(html);
    let links = selector("a[href^=\"/annunci/\"]")?;

    Ok(doc
        .select(&links)
        .filter_map(|link| {
            let href = link.value().attr("href")?;
            Some(CollectedUrl {
                town: town.to_string(),
                site: Source::Immobiliare.display_name().to_string(),
                title: link_title(link),
                estimated_price: "Unknown".to_string(),
                url: format!("{IMMOBILIARE_ROOT}{href}"),
                found_date: found,
            })
        })
        .collect())
}
