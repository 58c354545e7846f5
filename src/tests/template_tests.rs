// src/tests/template_tests.rs
use super::utils::{at, sample_listing};
use crate::domain::changes::PriceChange;
use crate::domain::filter::SearchCriteria;
use crate::guides::search_urls;
use crate::templates::pages::{
    coastal_guide_page, family_worksheet, manual_guide_page, portal_page, render_report, report_subject,
};
use crate::towns::{find_town, REGIONS};
use crate::wishlist::WishlistItem;

fn towns() -> Vec<String> {
    vec!["Crotone".into(), "Catania".into()]
}

#[test]
fn report_lists_criteria_and_properties() {
    let listing = sample_listing("https://www.immobiliare.it/annunci/101/", 245_000, at(1, 9));
    let html = render_report(&[listing], &SearchCriteria::default(), &towns(), &[], at(1, 9)).into_string();

    assert!(html.contains("<title>Italian Property Research Report - 2024-06-01</title>"));
    assert!(html.contains("Generated on June 01, 2024"));
    assert!(html.contains("Price range: €150,000 - €400,000"));
    assert!(html.contains("Locations: Crotone, Catania"));
    assert!(html.contains("€245,000"));
    assert!(html.contains("€2,450/m²"));
    assert!(html.contains("3 bedrooms"));
    assert!(html.contains(r#"href="https://www.immobiliare.it/annunci/101/""#));
    assert!(html.contains(r#"src="https://pic.im/1.jpg""#));
    assert!(!html.contains("Price changes"));
}

#[test]
fn report_escapes_scraped_text() {
    let mut listing = sample_listing("https://www.casa.it/immobili/1/", 200_000, at(1, 9));
    listing.title = "<script>alert(1)</script> Villa".into();
    listing.description_en = "Garden & pool".into();

    let html = render_report(&[listing], &SearchCriteria::default(), &towns(), &[], at(1, 9)).into_string();
    assert!(!html.contains("<script>alert(1)</script>"));
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt; Villa"));
    assert!(html.contains("Garden &amp; pool"));
}

#[test]
fn long_descriptions_are_previewed() {
    let mut listing = sample_listing("https://www.casa.it/immobili/2/", 200_000, at(1, 9));
    listing.description_en = "sea view ".repeat(100);

    let html = render_report(&[listing], &SearchCriteria::default(), &towns(), &[], at(1, 9)).into_string();
    assert!(html.contains("..."));
    assert!(!html.contains(&"sea view ".repeat(60)));
}

#[test]
fn missing_details_render_as_na() {
    let mut listing = sample_listing("https://www.casa.it/immobili/3/", 200_000, at(1, 9));
    listing.size_sqm = None;
    listing.bedrooms = None;
    listing.price_per_sqm = None;
    listing.image_urls.clear();

    let html = render_report(&[listing], &SearchCriteria::default(), &towns(), &[], at(1, 9)).into_string();
    assert_eq!(html.matches("N/A").count(), 3);
    assert!(!html.contains("<img"));
}

#[test]
fn price_changes_section_shows_direction() {
    let changes = vec![
        PriceChange {
            listing_id: "immobiliare:1".into(),
            title: "Trilocale".into(),
            url: "https://www.immobiliare.it/annunci/1/".into(),
            previous: 245_000,
            current: 235_000,
        },
        PriceChange {
            listing_id: "casa:2".into(),
            title: "Villetta".into(),
            url: "https://www.casa.it/immobili/2/".into(),
            previous: 300_000,
            current: 310_000,
        },
    ];

    let html = render_report(&[], &SearchCriteria::default(), &towns(), &changes, at(1, 9)).into_string();
    assert!(html.contains("Price changes"));
    assert!(html.contains(r#"<td class="drop">-€10,000</td>"#));
    assert!(html.contains(r#"<td class="rise">+€10,000</td>"#));
}

#[test]
fn subject_carries_date() {
    assert_eq!(report_subject(at(15, 7)), "Italian Property Research Report - 2024-06-15");
}

fn href(url: &url::Url) -> String {
    format!(r#"href="{}""#, url.as_str().replace('&', "&amp;"))
}

#[test]
fn manual_guide_covers_configured_towns() -> Result<(), Box<dyn std::error::Error>> {
    let criteria = SearchCriteria::default();
    let towns = vec!["Crotone, Calabria".to_string(), "Atlantis".to_string()];
    let html = manual_guide_page(&towns, &criteria, at(2, 10))?.into_string();

    assert!(html.contains("<title>Italian Property Manual Search Guide</title>"));
    assert!(html.contains("<h2>Crotone, Calabria</h2>"));
    assert!(!html.contains("Atlantis"));

    let crotone = find_town("Crotone").ok_or("Crotone missing")?;
    for (_, url) in search_urls(crotone, &criteria)? {
        assert!(html.contains(&href(&url)));
    }
    assert!(html.contains("Search Now"));
    Ok(())
}

#[test]
fn coastal_guide_groups_coastal_towns_by_region() -> Result<(), Box<dyn std::error::Error>> {
    let criteria = SearchCriteria::default();
    let html = coastal_guide_page(&criteria, at(2, 10))?.into_string();

    for region in REGIONS {
        assert!(html.contains(region.name));
    }
    assert!(html.contains("Polignano a Mare"));
    assert!(html.contains("Cefalù"));
    // inland towns stay out of the coastal guide
    assert!(!html.contains("Andria"));
    assert!(html.contains("Search Immobiliare.it"));

    let tropea = find_town("Tropea").ok_or("Tropea missing")?;
    let (_, first) = search_urls(tropea, &criteria)?.remove(0);
    assert!(html.contains(&href(&first)));
    Ok(())
}

#[test]
fn portal_lists_every_town_and_seeds_wishlist() -> Result<(), Box<dyn std::error::Error>> {
    let wishlist = vec![WishlistItem {
        region: "Sicily".into(),
        town: "Taormina".into(),
        notes: "Close to Catania airport".into(),
        added_by: "Family Member".into(),
        date_added: "2024-06-02".into(),
    }];
    let html = portal_page(&SearchCriteria::default(), &wishlist)?.into_string();

    for region in REGIONS {
        assert!(html.contains(region.name));
    }
    assert!(html.contains("Andria"));
    assert!(html.contains("Camogli"));
    assert!(html.contains("Search Casa.it"));
    assert!(html.contains(r#"data-town="Crotone""#));
    assert!(html.contains("Close to Catania airport"));
    Ok(())
}

#[test]
fn worksheet_has_property_slots() {
    let sheet = family_worksheet();
    assert!(sheet.starts_with("# Italian Property Research Worksheet"));
    assert!(sheet.contains("#### Property 1:"));
    assert!(sheet.contains("#### Property 3:"));
}
