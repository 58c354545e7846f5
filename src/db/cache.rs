use crate::db::connection::Database;
use crate::errors::AppError;
use rusqlite::{params, OptionalExtension};

#[derive(Debug, Clone, PartialEq)]
pub struct CachedPage {
    pub status: u16,
    pub body: String,
}

/// Returns the cached body when it was stored less than `ttl_secs` before `now`.
pub fn get_cached_page(
    db: &Database,
    url: &str,
    now: i64,
    ttl_secs: i64,
) -> Result<Option<CachedPage>, AppError> {
    db.with_conn(|conn| {
        let page = conn
            .query_row(
                "SELECT status, body FROM http_cache WHERE url = ?1 AND fetched_at > ?2",
                params![url, now - ttl_secs],
                |row| {
                    Ok(CachedPage {
                        status: row.get(0)?,
                        body: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(page)
    })
}

pub fn put_cached_page(db: &Database, url: &str, now: i64, page: &CachedPage) -> Result<(), AppError> {
    db.with_conn(|conn| {
        conn.execute(
            r#"
            INSERT INTO http_cache (url, fetched_at, status, body) VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(url) DO UPDATE SET
                fetched_at = excluded.fetched_at,
                status = excluded.status,
                body = excluded.body
            "#,
            params![url, now, page.status, &page.body],
        )?;
        Ok(())
    })
}

pub fn purge_expired(db: &Database, now: i64, ttl_secs: i64) -> Result<usize, AppError> {
    db.with_conn(|conn| {
        let n = conn.execute(
            "DELETE FROM http_cache WHERE fetched_at <= ?1",
            params![now - ttl_secs],
        )?;
        Ok(n)
    })
}
