// src/guides.rs
//
// Pre-filled portal searches and the static guide files built from the town table.

use crate::domain::filter::SearchCriteria;
use crate::domain::listing::Source;
use crate::errors::AppResult;
use crate::templates::pages::{coastal_guide_page, family_worksheet, manual_guide_page, portal_page};
use crate::towns::{slugify, Town};
use crate::wishlist::WishlistItem;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use url::Url;

/// Search links for one town, in display order.
pub fn search_urls(town: &Town, criteria: &SearchCriteria) -> AppResult<Vec<(Source, Url)>> {
    let main_term = town
        .search_terms
        .first()
        .map(|t| slugify(t))
        .unwrap_or_else(|| town.slug());
    let min = criteria.min_price.to_string();
    let max = criteria.max_price.to_string();
    let rooms = criteria.min_bedrooms.to_string();

    let mut immobiliare = Url::parse(&format!("https://www.immobiliare.it/vendita-case/{main_term}/"))?;
    immobiliare
        .query_pairs_mut()
        .append_pair("prezzoMinimo", &min)
        .append_pair("prezzoMassimo", &max)
        .append_pair("localiMinimo", &rooms)
        .append_pair("criterio", "rilevanza");

    let mut casa = Url::parse("https://www.casa.it/vendita/residenziale/")?;
    casa.query_pairs_mut()
        .append_pair("localita", town.name)
        .append_pair("prezzo_min", &min)
        .append_pair("prezzo_max", &max)
        .append_pair("locali_min", &rooms);

    let mut idealista = Url::parse(&format!("https://www.idealista.it/vendita-case/{main_term}/"))?;
    idealista
        .query_pairs_mut()
        .append_pair("prezzo-min", &min)
        .append_pair("prezzo-max", &max)
        .append_pair("ordine", "relevance");

    let mut subito = Url::parse("https://www.subito.it/annunci-italia/vendita/case/")?;
    subito
        .query_pairs_mut()
        .append_pair("q", town.name)
        .append_pair("prezzo_min", &min)
        .append_pair("prezzo_max", &max);

    Ok(vec![
        (Source::Immobiliare, immobiliare),
        (Source::Casa, casa),
        (Source::Idealista, idealista),
        (Source::Subito, subito),
    ])
}

fn write_page(dir: &Path, name: String, contents: &str) -> AppResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(name);
    std::fs::write(&path, contents)?;
    tracing::info!(path = %path.display(), "Guide written");
    Ok(path)
}

pub fn write_coastal_guide(dir: &Path, criteria: &SearchCriteria, now: NaiveDateTime) -> AppResult<PathBuf> {
    let page = coastal_guide_page(criteria, now)?;
    write_page(
        dir,
        format!("coastal_property_guide_{}.html", now.format("%Y%m%d")),
        &page.into_string(),
    )
}

/// Returns the HTML guide and the Markdown worksheet, in that order.
pub fn write_manual_guide(
    dir: &Path,
    towns: &[String],
    criteria: &SearchCriteria,
    now: NaiveDateTime,
) -> AppResult<(PathBuf, PathBuf)> {
    let stamp = now.format("%Y%m%d");
    let page = manual_guide_page(towns, criteria, now)?;
    let html = write_page(dir, format!("italian_property_guide_{stamp}.html"), &page.into_string())?;
    let worksheet = write_page(
        dir,
        format!("property_research_worksheet_{stamp}.md"),
        &family_worksheet(),
    )?;
    Ok((html, worksheet))
}

pub fn write_portal(dir: &Path, criteria: &SearchCriteria, wishlist: &[WishlistItem]) -> AppResult<PathBuf> {
    let page = portal_page(criteria, wishlist)?;
    write_page(dir, "family_property_portal.html".into(), &page.into_string())
}
