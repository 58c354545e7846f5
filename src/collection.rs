// src/collection.rs
//
// Writes collected listing URLs in every format the family uses.

use crate::domain::filter::SearchCriteria;
use crate::errors::AppResult;
use crate::scraper::collector::CollectedUrl;
use crate::spreadsheets::export_collected_xlsx;
use crate::templates::pages::collection_page;
use chrono::NaiveDateTime;
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct CollectionFiles {
    pub csv: PathBuf,
    pub json: PathBuf,
    pub html: PathBuf,
    pub xlsx: PathBuf,
}

pub fn write_csv(urls: &[CollectedUrl], path: &Path) -> AppResult<()> {
    let mut writer = csv::Writer::from_writer(File::create(path)?);
    for u in urls {
        writer.serialize(u)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_collection(
    urls: &[CollectedUrl],
    dir: &Path,
    criteria: &SearchCriteria,
    towns: &[String],
    now: NaiveDateTime,
) -> AppResult<CollectionFiles> {
    std::fs::create_dir_all(dir)?;
    let stem = format!("property_urls_{}", now.format("%Y%m%d_%H%M"));
    let files = CollectionFiles {
        csv: dir.join(format!("{stem}.csv")),
        json: dir.join(format!("{stem}.json")),
        html: dir.join(format!("{stem}.html")),
        xlsx: dir.join(format!("{stem}.xlsx")),
    };

    write_csv(urls, &files.csv)?;
    std::fs::write(&files.json, serde_json::to_string_pretty(urls)?)?;
    std::fs::write(
        &files.html,
        collection_page(urls, criteria, towns, now).into_string(),
    )?;
    export_collected_xlsx(urls, &files.xlsx)?;

    tracing::info!(
        csv = %files.csv.display(),
        json = %files.json.display(),
        html = %files.html.display(),
        xlsx = %files.xlsx.display(),
        "Results saved"
    );
    Ok(files)
}
