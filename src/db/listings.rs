use crate::db::connection::Database;
use crate::domain::changes::{PriceChange, TrackedListing};
use crate::domain::condition::Condition;
use crate::domain::listing::{Coordinate, Listing, PricePoint, Source};
use crate::errors::AppError;
use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

const LISTING_COLUMNS: &str = r#"
    id, source, title, description, description_en,
    price, size_sqm, bedrooms, condition, location, url,
    image_urls, price_per_sqm, latitude, longitude,
    first_seen_at, last_seen_at
"#;

/// Outcome of persisting one batch of scraped listings.
#[derive(Debug, Default)]
pub struct SaveSummary {
    pub inserted: usize,
    pub updated: usize,
    pub price_changes: Vec<PriceChange>,
}

/// Main entry point for saving scraped listings.
///
/// Runs in a single transaction so `listings` and `price_history` stay consistent.
/// New ids are inserted with their first price point; known ids get their
/// `last_seen_at` refreshed and, when the price moved, a new history row.
pub fn save_listings(db: &Database, listings: &[Listing]) -> Result<SaveSummary, AppError> {
    db.with_conn(|conn| {
        let tx = conn.transaction()?;
        let mut summary = SaveSummary::default();

        for listing in listings {
            match find_tracked(&tx, &listing.id)? {
                Some(tracked) => {
                    if let Some(change) = tracked.diff(listing) {
                        tracing::info!(
                            title = %listing.title,
                            previous = change.previous,
                            current = change.current,
                            "Price change detected"
                        );
                        log_price(&tx, &listing.id, listing.last_seen, listing.price)?;
                        summary.price_changes.push(change);
                    }
                    update_listing(&tx, listing)?;
                    summary.updated += 1;
                }
                None => {
                    insert_listing(&tx, listing)?;
                    for point in &listing.price_history {
                        log_price(&tx, &listing.id, point.observed_at, point.price)?;
                    }
                    summary.inserted += 1;
                }
            }
        }

        tx.commit()?;
        Ok(summary)
    })
}

fn find_tracked(conn: &Connection, id: &str) -> Result<Option<TrackedListing>, AppError> {
    let tracked = conn
        .query_row(
            "SELECT id, price FROM listings WHERE id = ?1",
            params![id],
            |row| {
                Ok(TrackedListing {
                    id: row.get(0)?,
                    price: row.get(1)?,
                })
            },
        )
        .optional()?;
    Ok(tracked)
}

fn insert_listing(tx: &Connection, l: &Listing) -> Result<(), AppError> {
    let image_urls = serde_json::to_string(&l.image_urls)?;
    tx.execute(
        r#"
        INSERT INTO listings (
            id, source, title, description, description_en,
            price, size_sqm, bedrooms, condition, location, url,
            image_urls, price_per_sqm, latitude, longitude,
            first_seen_at, last_seen_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)
        "#,
        params![
            &l.id,
            l.source.key(),
            &l.title,
            &l.description,
            &l.description_en,
            l.price,
            l.size_sqm,
            l.bedrooms,
            l.condition.key(),
            &l.location,
            &l.url,
            image_urls,
            l.price_per_sqm,
            l.coordinate.map(|c| c.lat),
            l.coordinate.map(|c| c.lon),
            l.first_seen,
            l.last_seen,
        ],
    )?;
    Ok(())
}

/// Refreshes the current state of a known listing. `first_seen_at` is never touched.
fn update_listing(tx: &Connection, l: &Listing) -> Result<(), AppError> {
    let image_urls = serde_json::to_string(&l.image_urls)?;
    tx.execute(
        r#"
        UPDATE listings SET
            title = ?1, description = ?2, description_en = ?3,
            price = ?4, size_sqm = ?5, bedrooms = ?6, condition = ?7,
            image_urls = ?8, price_per_sqm = ?9,
            latitude = COALESCE(?10, latitude), longitude = COALESCE(?11, longitude),
            last_seen_at = ?12
        WHERE id = ?13
        "#,
        params![
            &l.title,
            &l.description,
            &l.description_en,
            l.price,
            l.size_sqm,
            l.bedrooms,
            l.condition.key(),
            image_urls,
            l.price_per_sqm,
            l.coordinate.map(|c| c.lat),
            l.coordinate.map(|c| c.lon),
            l.last_seen,
            &l.id,
        ],
    )?;
    Ok(())
}

fn log_price(
    tx: &Connection,
    listing_id: &str,
    observed_at: NaiveDateTime,
    price: i64,
) -> Result<(), AppError> {
    tx.execute(
        "INSERT INTO price_history (listing_id, observed_at, price) VALUES (?1, ?2, ?3)",
        params![listing_id, observed_at, price],
    )?;
    Ok(())
}

fn listing_from_row(row: &Row) -> rusqlite::Result<Listing> {
    let source_key: String = row.get(1)?;
    let source = Source::from_key(&source_key)
        .ok_or_else(|| rusqlite::Error::InvalidColumnType(1, "source".into(), Type::Text))?;

    let condition: String = row.get(8)?;
    let image_urls: String = row.get(11)?;
    let image_urls: Vec<String> = serde_json::from_str(&image_urls).unwrap_or_default();

    let latitude: Option<f64> = row.get(13)?;
    let longitude: Option<f64> = row.get(14)?;
    let coordinate = match (latitude, longitude) {
        (Some(lat), Some(lon)) => Some(Coordinate { lat, lon }),
        _ => None,
    };

    Ok(Listing {
        id: row.get(0)?,
        source,
        title: row.get(2)?,
        description: row.get(3)?,
        description_en: row.get(4)?,
        price: row.get(5)?,
        size_sqm: row.get(6)?,
        bedrooms: row.get(7)?,
        condition: Condition::from_key(&condition),
        location: row.get(9)?,
        url: row.get(10)?,
        image_urls,
        price_per_sqm: row.get(12)?,
        coordinate,
        first_seen: row.get(15)?,
        last_seen: row.get(16)?,
        price_history: Vec::new(),
    })
}

/// Loads one listing together with its full price history.
pub fn get_listing(db: &Database, id: &str) -> Result<Option<Listing>, AppError> {
    db.with_conn(|conn| {
        let sql = format!("SELECT {LISTING_COLUMNS} FROM listings WHERE id = ?1");
        let listing = conn
            .query_row(&sql, params![id], listing_from_row)
            .optional()?;

        match listing {
            Some(mut listing) => {
                listing.price_history = query_price_history(conn, id)?;
                Ok(Some(listing))
            }
            None => Ok(None),
        }
    })
}

pub fn get_price_history(db: &Database, listing_id: &str) -> Result<Vec<PricePoint>, AppError> {
    db.with_conn(|conn| query_price_history(conn, listing_id))
}

fn query_price_history(conn: &Connection, listing_id: &str) -> Result<Vec<PricePoint>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT observed_at, price FROM price_history WHERE listing_id = ?1 ORDER BY observed_at, id",
    )?;

    let rows = stmt.query_map(params![listing_id], |row| {
        Ok(PricePoint {
            observed_at: row.get(0)?,
            price: row.get(1)?,
        })
    })?;

    let mut history = Vec::new();
    for r in rows {
        history.push(r?);
    }
    Ok(history)
}

/// Listings seen at or after `since`, grouped by location and cheapest first.
pub fn get_recent_listings(db: &Database, since: NaiveDateTime) -> Result<Vec<Listing>, AppError> {
    db.with_conn(|conn| {
        let sql = format!(
            "SELECT {LISTING_COLUMNS} FROM listings WHERE last_seen_at >= ?1 ORDER BY location, price"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![since], listing_from_row)?;

        let mut listings = Vec::new();
        for r in rows {
            let mut listing = r?;
            listing.price_history = query_price_history(conn, &listing.id)?;
            listings.push(listing);
        }
        Ok(listings)
    })
}
