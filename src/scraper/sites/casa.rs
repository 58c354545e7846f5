// scraper/sites/casa.rs
use super::{Card, ListingSite, ScrapeContext, SearchTarget};
use crate::domain::filter::SearchCriteria;
use crate::domain::listing::{Listing, NewListing, Source};
use crate::enrich::translate_or_original;
use crate::scraper::extract::{clean_text, extract_details, extract_price, truncate_chars};
use crate::scraper::fetch::pause;
use crate::scraper::html::{absolute, element_text, first_image, selector};
use crate::scraper::ScraperError;
use scraper::{ElementRef, Html};
use url::Url;

const BASE_URL: &str = "https://www.casa.it";
const CARD_CLASS_HINTS: &[&str] = &["property", "listing", "annuncio", "casa"];
const DESCRIPTION_CHARS: usize = 200;

pub struct CasaSite;

impl ListingSite for CasaSite {
    fn source(&self) -> Source {
        Source::Casa
    }

    fn search_url(&self, target: &SearchTarget, criteria: &SearchCriteria) -> Result<Url, ScraperError> {
        let mut url = Url::parse(&format!("{BASE_URL}/vendita/residenziale/{}/", target.region_slug))?;
        url.query_pairs_mut()
            .append_pair("prezzo_min", &criteria.min_price.to_string())
            .append_pair("prezzo_max", &criteria.max_price.to_string())
            .append_pair("locali_min", &criteria.min_bedrooms.to_string());
        Ok(url)
    }

    fn scrape(&self, ctx: &ScrapeContext<'_>, target: &SearchTarget) -> Result<Vec<Listing>, ScraperError> {
        let url = self.search_url(target, ctx.criteria)?;
        tracing::info!(town = %target.name, url = %url, "Searching Casa.it");

        let page = ctx.fetcher.fetch(&url)?;
        if !page.is_ok() {
            tracing::warn!(status = page.status, url = %url, "Failed to fetch Casa.it");
            return Ok(Vec::new());
        }

        let site_root = Url::parse(BASE_URL)?;
        let cards = parse_search_page(&page.body, &site_root, ctx.criteria, ctx.limits.casa)?;
        let mut listings = Vec::with_capacity(cards.len());

        for card in cards {
            let description_en = translate_or_original(ctx.translator, &card.description);
            listings.push(Listing::new(
                NewListing {
                    source: Source::Casa,
                    title: card.title,
                    description: card.description,
                    description_en,
                    price: card.price,
                    size_sqm: card.size_sqm,
                    bedrooms: card.bedrooms,
                    location: target.location.clone(),
                    url: card.url,
                    image_urls: card.image.into_iter().collect(),
                },
                ctx.now,
            ));

            pause(ctx.delays.casa_listing_ms);
        }

        tracing::info!(town = %target.name, count = listings.len(), "Casa.it listings");
        Ok(listings)
    }
}

fn looks_like_card(el: &ElementRef<'_>) -> bool {
    el.value()
        .attr("class")
        .map(|class| {
            let class = class.to_lowercase();
            CARD_CLASS_HINTS.iter().any(|hint| class.contains(hint))
        })
        .unwrap_or(false)
}

/// Casa.it has no stable card markup, so cards are any div/article whose class
/// mentions a listing and fields are read from the card's loose text.
pub fn parse_search_page(
    html: &str,
    base: &Url,
    criteria: &SearchCriteria,
    limit: usize,
) -> Result<Vec<Card>, ScraperError> {
    let doc = Html::parse_document(html);
    let candidates = selector("div[class], article[class]")?;
    let link_sel = selector("a[href]")?;

    let mut cards = Vec::new();
    for el in doc.select(&candidates).filter(looks_like_card).take(limit) {
        let Some(link) = el.select(&link_sel).next() else {
            continue;
        };
        let Some(url) = link.value().attr("href").and_then(|h| absolute(base, h)) else {
            continue;
        };

        let Some(price_text) = el.text().find(|t| t.contains('€')) else {
            continue;
        };
        let Some(price) = extract_price(price_text) else {
            continue;
        };
        if !criteria.price_in_range(price) {
            continue;
        }

        let text = element_text(el);
        let (bedrooms, size_sqm) = extract_details(&text);
        if !criteria.enough_bedrooms(bedrooms) {
            continue;
        }

        let title = match element_text(link) {
            t if t.is_empty() => "Property".to_string(),
            t => t,
        };

        cards.push(Card {
            title,
            url: url.to_string(),
            price,
            bedrooms,
            size_sqm,
            image: first_image(el, base)?,
            description: clean_text(truncate_chars(&text, DESCRIPTION_CHARS)),
        });
    }

    Ok(cards)
}
