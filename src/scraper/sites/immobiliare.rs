// scraper/sites/immobiliare.rs
use super::{Card, ListingSite, ScrapeContext, SearchTarget};
use crate::domain::filter::SearchCriteria;
use crate::domain::listing::{Listing, NewListing, Source};
use crate::enrich::translate_or_original;
use crate::scraper::extract::{extract_details, extract_price};
use crate::scraper::fetch::pause;
use crate::scraper::html::{absolute, element_text, first_image, first_within, select_with_fallbacks};
use crate::scraper::ScraperError;
use scraper::Html;
use url::Url;

const BASE_URL: &str = "https://www.immobiliare.it";

// The site has shipped several card layouts; newest last.
const CARD_SELECTORS: &[&str] = &["div.nd-list__item", "li.in-searchLayoutListItem", "div.in-card"];
const TITLE_SELECTORS: &[&str] = &["a.nd-list__title", "a.in-listingCardTitle", "a.in-card__title"];
const PRICE_SELECTORS: &[&str] = &["div.nd-list__price", ".in-listingCardPrice", ".in-card__price"];
const DETAIL_SELECTORS: &[&str] = &["div.nd-list__details", ".in-listingCardFeatureList", ".in-feat"];
const DESCRIPTION_SELECTORS: &[&str] = &["div.im-description__text", ".in-readAll", "[class*=\"description\"]"];

pub struct ImmobiliareSite;

impl ListingSite for ImmobiliareSite {
    fn source(&self) -> Source {
        Source::Immobiliare
    }

    fn search_url(&self, target: &SearchTarget, criteria: &SearchCriteria) -> Result<Url, ScraperError> {
        let mut url = Url::parse(&format!("{BASE_URL}/vendita-case/{}/", target.region_slug))?;
        url.query_pairs_mut()
            .append_pair("prezzoMinimo", &criteria.min_price.to_string())
            .append_pair("prezzoMassimo", &criteria.max_price.to_string())
            .append_pair("localiMinimo", &criteria.min_bedrooms.to_string())
            .append_pair("criterio", "rilevanza");
        Ok(url)
    }

    fn scrape(&self, ctx: &ScrapeContext<'_>, target: &SearchTarget) -> Result<Vec<Listing>, ScraperError> {
        let url = self.search_url(target, ctx.criteria)?;
        tracing::info!(town = %target.name, url = %url, "Searching Immobiliare.it");

        let page = ctx.fetcher.fetch(&url)?;
        if !page.is_ok() {
            tracing::warn!(status = page.status, url = %url, "Failed to fetch Immobiliare.it");
            return Ok(Vec::new());
        }

        let cards = parse_search_page(&page.body, &page.url, ctx.criteria, ctx.limits.immobiliare)?;
        let mut listings = Vec::with_capacity(cards.len());

        for card in cards {
            let description = fetch_description(ctx, &card.url);
            let description_en = translate_or_original(ctx.translator, &description);

            listings.push(Listing::new(
                NewListing {
                    source: Source::Immobiliare,
                    title: card.title,
                    description,
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

            pause(ctx.delays.listing_ms);
        }

        tracing::info!(town = %target.name, count = listings.len(), "Immobiliare.it listings");
        Ok(listings)
    }
}

/// Cards on a search page that pass the price and bedroom thresholds.
pub fn parse_search_page(
    html: &str,
    base: &Url,
    criteria: &SearchCriteria,
    limit: usize,
) -> Result<Vec<Card>, ScraperError> {
    let doc = Html::parse_document(html);
    let elements = select_with_fallbacks(&doc, CARD_SELECTORS)?;

    let mut cards = Vec::new();
    for el in elements.into_iter().take(limit) {
        let Some(title_el) = first_within(el, TITLE_SELECTORS)? else {
            continue;
        };
        let Some(url) = title_el.value().attr("href").and_then(|h| absolute(base, h)) else {
            continue;
        };

        let Some(price_el) = first_within(el, PRICE_SELECTORS)? else {
            continue;
        };
        let Some(price) = extract_price(&element_text(price_el)) else {
            tracing::debug!(url = %url, "unparseable price");
            continue;
        };
        if !criteria.price_in_range(price) {
            continue;
        }

        let details = first_within(el, DETAIL_SELECTORS)?
            .map(element_text)
            .unwrap_or_default();
        let (bedrooms, size_sqm) = extract_details(&details);
        if !criteria.enough_bedrooms(bedrooms) {
            continue;
        }

        cards.push(Card {
            title: element_text(title_el),
            url: url.to_string(),
            price,
            bedrooms,
            size_sqm,
            image: first_image(el, base)?,
            description: String::new(),
        });
    }

    Ok(cards)
}

/// Listing description from a detail page, or "" when none of the layouts match.
pub fn parse_description(html: &str) -> Result<String, ScraperError> {
    let doc = Html::parse_document(html);
    Ok(select_with_fallbacks(&doc, DESCRIPTION_SELECTORS)?
        .into_iter()
        .next()
        .map(element_text)
        .unwrap_or_default())
}

fn fetch_description(ctx: &ScrapeContext<'_>, listing_url: &str) -> String {
    let result = Url::parse(listing_url)
        .map_err(ScraperError::from)
        .and_then(|url| ctx.fetcher.fetch(&url))
        .and_then(|page| {
            if page.is_ok() {
                parse_description(&page.body)
            } else {
                Err(ScraperError::Blocked(format!("status {}", page.status)))
            }
        });

    match result {
        Ok(d) => d,
        Err(e) => {
            tracing::debug!(url = listing_url, error = %e, "Could not get description");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://www.immobiliare.it/vendita-case/calabria/").unwrap()
    }

    #[test]
    fn search_url_uses_region_and_criteria() {
        let target = SearchTarget::resolve("Crotone");
        let url = ImmobiliareSite
            .search_url(&target, &SearchCriteria::default())
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.immobiliare.it/vendita-case/calabria/?prezzoMinimo=150000&prezzoMassimo=400000&localiMinimo=2&criterio=rilevanza"
        );
    }

    #[test]
    fn parses_legacy_cards() {
        let html = r#"
            <div class="nd-list__item">
                <a class="nd-list__title" href="/annunci/101/">Trilocale vista mare</a>
                <div class="nd-list__price">€ 245.000</div>
                <div class="nd-list__details">3 locali 95 m²</div>
                <img src="https://pic.im/101.jpg">
            </div>
            <div class="nd-list__item">
                <a class="nd-list__title" href="/annunci/102/">Villa</a>
                <div class="nd-list__price">€ 900.000</div>
            </div>"#;

        let cards = parse_search_page(html, &base(), &SearchCriteria::default(), 20).unwrap();
        assert_eq!(cards.len(), 1);
        let c = &cards[0];
        assert_eq!(c.title, "Trilocale vista mare");
        assert_eq!(c.url, "https://www.immobiliare.it/annunci/101/");
        assert_eq!(c.price, 245_000);
        assert_eq!(c.bedrooms, Some(3));
        assert_eq!(c.size_sqm, Some(95));
        assert_eq!(c.image.as_deref(), Some("https://pic.im/101.jpg"));
    }

    #[test]
    fn falls_back_to_newer_layout() {
        let html = r#"
            <ul>
              <li class="in-searchLayoutListItem">
                <a class="in-listingCardTitle" href="https://www.immobiliare.it/annunci/7/">Quadrilocale</a>
                <div class="in-listingCardPrice"><span>€ 199.000</span></div>
                <ul class="in-listingCardFeatureList"><li>4 locali</li><li>120 m²</li></ul>
              </li>
            </ul>"#;

        let cards = parse_search_page(html, &base(), &SearchCriteria::default(), 20).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].price, 199_000);
        assert_eq!(cards[0].bedrooms, Some(4));
        assert_eq!(cards[0].size_sqm, Some(120));
    }

    #[test]
    fn skips_cards_missing_fields_or_below_bedrooms() {
        let html = r#"
            <div class="in-card"><div class="in-card__price">€ 200.000</div></div>
            <div class="in-card"><a class="in-card__title" href="/annunci/1/">No price</a></div>
            <div class="in-card">
                <a class="in-card__title" href="/annunci/2/">Monolocale</a>
                <div class="in-card__price">€ 160.000</div>
                <div class="in-feat">1 locali</div>
            </div>
            <div class="in-card">
                <a class="in-card__title" href="/annunci/3/">Prezzo su richiesta</a>
                <div class="in-card__price">Prezzo su richiesta</div>
            </div>"#;

        let cards = parse_search_page(html, &base(), &SearchCriteria::default(), 20).unwrap();
        assert!(cards.is_empty());
    }

    #[test]
    fn respects_card_limit() {
        let card = r#"<div class="in-card"><a class="in-card__title" href="/annunci/X/">T</a><div class="in-card__price">€ 200.000</div></div>"#;
        let html: String = (0..5).map(|i| card.replace('X', &i.to_string())).collect();
        let cards = parse_search_page(&html, &base(), &SearchCriteria::default(), 3).unwrap();
        assert_eq!(cards.len(), 3);
    }

    #[test]
    fn description_fallbacks() {
        assert_eq!(
            parse_description(r#"<div class="im-description__text"> Casa  luminosa, ottimo stato </div>"#).unwrap(),
            "Casa luminosa, ottimo stato"
        );
        assert_eq!(
            parse_description(r#"<section class="listing-description">Da ristrutturare</section>"#).unwrap(),
            "Da ristrutturare"
        );
        assert_eq!(parse_description("<p>none</p>").unwrap(), "");
    }
}
