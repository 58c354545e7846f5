// src/tests/db_tests.rs
use super::utils::{at, init_test_db, sample_listing};
use crate::db::cache::{get_cached_page, purge_expired, put_cached_page, CachedPage};
use crate::db::listings::{get_listing, get_price_history, get_recent_listings, save_listings};
use crate::db::scrapes::{end_scrape_run, get_recent_scrapes, start_scrape_run, RunOutcome};
use crate::domain::condition::Condition;
use crate::domain::listing::Coordinate;

const URL_A: &str = "https://www.immobiliare.it/annunci/101/";
const URL_B: &str = "https://www.immobiliare.it/annunci/202/";

#[test]
fn new_listings_are_inserted_with_first_price() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, db) = init_test_db();
    let mut listing = sample_listing(URL_A, 245_000, at(1, 9));
    listing.condition = Condition::Excellent;
    listing.coordinate = Some(Coordinate { lat: 39.08, lon: 17.12 });

    let summary = save_listings(&db, &[listing.clone()])?;
    assert_eq!(summary.inserted, 1);
    assert_eq!(summary.updated, 0);
    assert!(summary.price_changes.is_empty());

    let stored = get_listing(&db, &listing.id)?.ok_or("listing missing")?;
    assert_eq!(stored.title, listing.title);
    assert_eq!(stored.price, 245_000);
    assert_eq!(stored.condition, Condition::Excellent);
    assert_eq!(stored.coordinate, listing.coordinate);
    assert_eq!(stored.image_urls, listing.image_urls);
    assert_eq!(stored.price_per_sqm, Some(2450.0));
    assert_eq!(stored.price_history.len(), 1);
    Ok(())
}

#[test]
fn unchanged_price_only_refreshes_last_seen() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, db) = init_test_db();
    save_listings(&db, &[sample_listing(URL_A, 245_000, at(1, 9))])?;

    let again = sample_listing(URL_A, 245_000, at(3, 9));
    let summary = save_listings(&db, &[again.clone()])?;
    assert_eq!(summary.updated, 1);
    assert!(summary.price_changes.is_empty());

    let stored = get_listing(&db, &again.id)?.ok_or("listing missing")?;
    assert_eq!(stored.first_seen, at(1, 9));
    assert_eq!(stored.last_seen, at(3, 9));
    assert_eq!(get_price_history(&db, &again.id)?.len(), 1);
    Ok(())
}

#[test]
fn price_drop_is_reported_and_logged() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, db) = init_test_db();
    save_listings(&db, &[sample_listing(URL_A, 245_000, at(1, 9))])?;

    let cheaper = sample_listing(URL_A, 229_000, at(8, 9));
    let summary = save_listings(&db, &[cheaper.clone()])?;

    assert_eq!(summary.price_changes.len(), 1);
    let change = &summary.price_changes[0];
    assert_eq!(change.previous, 245_000);
    assert_eq!(change.current, 229_000);
    assert!(change.is_drop());

    let history = get_price_history(&db, &cheaper.id)?;
    let prices: Vec<i64> = history.iter().map(|p| p.price).collect();
    assert_eq!(prices, vec![245_000, 229_000]);
    assert_eq!(history[1].observed_at, at(8, 9));

    let stored = get_listing(&db, &cheaper.id)?.ok_or("listing missing")?;
    assert_eq!(stored.price, 229_000);
    Ok(())
}

#[test]
fn recent_listings_respect_cutoff_and_sort_by_price() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, db) = init_test_db();
    save_listings(
        &db,
        &[
            sample_listing(URL_A, 300_000, at(10, 9)),
            sample_listing(URL_B, 180_000, at(10, 9)),
            sample_listing("https://www.immobiliare.it/annunci/303/", 200_000, at(1, 9)),
        ],
    )?;

    let recent = get_recent_listings(&db, at(5, 0))?;
    let prices: Vec<i64> = recent.iter().map(|l| l.price).collect();
    assert_eq!(prices, vec![180_000, 300_000]);
    assert!(recent.iter().all(|l| l.price_history.len() == 1));
    Ok(())
}

#[test]
fn missing_listing_is_none() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, db) = init_test_db();
    assert!(get_listing(&db, "immobiliare:0000000000000000")?.is_none());
    Ok(())
}

#[test]
fn scrape_runs_record_outcome() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, db) = init_test_db();

    let ok_run = db.with_conn(|conn| start_scrape_run(conn, "Crotone", 1_000))?;
    let failed_run = db.with_conn(|conn| start_scrape_run(conn, "Catania", 2_000))?;
    db.with_conn(|conn| {
        end_scrape_run(
            conn,
            ok_run,
            1_050,
            &RunOutcome {
                sites: 2,
                props: 7,
                error: None,
            },
        )
    })?;
    db.with_conn(|conn| {
        end_scrape_run(
            conn,
            failed_run,
            2_010,
            &RunOutcome {
                sites: 1,
                props: 3,
                error: Some("Casa.it: Network error: timeout".into()),
            },
        )
    })?;

    let runs = db.with_conn(|conn| get_recent_scrapes(conn))?;
    assert_eq!(runs.len(), 2);

    // newest first
    assert_eq!(runs[0].town, "Catania");
    assert_eq!(runs[0].success, Some(false));
    assert_eq!(runs[0].error_message.as_deref(), Some("Casa.it: Network error: timeout"));

    assert_eq!(runs[1].town, "Crotone");
    assert_eq!(runs[1].finished_at, Some(1_050));
    assert_eq!(runs[1].sites_fetched, Some(2));
    assert_eq!(runs[1].properties_seen, Some(7));
    assert_eq!(runs[1].success, Some(true));
    Ok(())
}

#[test]
fn cached_pages_expire_after_ttl() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, db) = init_test_db();
    let page = CachedPage {
        status: 200,
        body: "<html>ok</html>".into(),
    };
    put_cached_page(&db, URL_A, 1_000, &page)?;

    assert_eq!(get_cached_page(&db, URL_A, 1_500, 3_600)?, Some(page.clone()));
    assert_eq!(get_cached_page(&db, URL_A, 5_000, 3_600)?, None);
    assert_eq!(get_cached_page(&db, URL_B, 1_500, 3_600)?, None);

    // a refetch overwrites the entry
    let fresh = CachedPage {
        status: 200,
        body: "<html>new</html>".into(),
    };
    put_cached_page(&db, URL_A, 4_900, &fresh)?;
    assert_eq!(get_cached_page(&db, URL_A, 5_000, 3_600)?, Some(fresh));

    put_cached_page(&db, URL_B, 100, &page)?;
    assert_eq!(purge_expired(&db, 5_000, 3_600)?, 1);
    assert_eq!(get_cached_page(&db, URL_A, 5_000, 3_600)?.map(|p| p.status), Some(200));
    Ok(())
}
