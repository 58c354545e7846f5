use crate::errors::AppError;
use rusqlite::{params, Connection};

#[derive(Debug)]
pub struct ScrapeRun {
    pub id: i64,
    pub town: String,
    pub started_at: i64,
    pub finished_at: Option<i64>,
    pub sites_fetched: Option<i64>,
    pub properties_seen: Option<i64>,
    pub success: Option<bool>,
    pub error_message: Option<String>,
}

pub fn start_scrape_run(conn: &Connection, town: &str, now: i64) -> Result<i64, AppError> {
    conn.execute(
        "INSERT INTO scrape_runs (town, started_at, success) VALUES (?, ?, 0)",
        params![town, now],
    )?;
    Ok(conn.last_insert_rowid())
}

pub struct RunOutcome {
    pub sites: usize,
    pub props: usize,
    pub error: Option<String>,
}

pub fn end_scrape_run(
    conn: &Connection,
    run_id: i64,
    now: i64,
    outcome: &RunOutcome,
) -> Result<(), AppError> {
    conn.execute(
        "UPDATE scrape_runs SET finished_at = ?, sites_fetched = ?, properties_seen = ?, success = ?, error_message = ? WHERE id = ?",
        params![
            now,
            outcome.sites as i64,
            outcome.props as i64,
            outcome.error.is_none(),
            outcome.error,
            run_id
        ],
    )?;
    Ok(())
}

pub fn get_recent_scrapes(conn: &Connection) -> Result<Vec<ScrapeRun>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT id, town, started_at, finished_at, sites_fetched, properties_seen, success, error_message FROM scrape_runs ORDER BY started_at DESC, id DESC LIMIT 50",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(ScrapeRun {
            id: row.get(0)?,
            town: row.get(1)?,
            started_at: row.get(2)?,
            finished_at: row.get(3)?,
            sites_fetched: row.get(4)?,
            properties_seen: row.get(5)?,
            success: row.get(6)?,
            error_message: row.get(7)?,
        })
    })?;

    let mut runs = Vec::new();
    for r in rows {
        runs.push(r?);
    }
    Ok(runs)
}
