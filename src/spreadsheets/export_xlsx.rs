use crate::domain::listing::Listing;
use crate::errors::AppError;
use crate::scraper::collector::CollectedUrl;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;

fn xlsx_err(what: &str) -> impl Fn(XlsxError) -> AppError + '_ {
    move |e| AppError::XlsxError(format!("Failed to write {what}: {e}"))
}

fn write_headers(worksheet: &mut Worksheet, headers: &[&str]) -> Result<(), AppError> {
    let bold = Format::new().set_bold();
    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .map_err(xlsx_err(header))?;
    }
    Ok(())
}

fn write_opt_number(worksheet: &mut Worksheet, row: u32, col: u16, value: Option<f64>) -> Result<(), AppError> {
    let written = match value {
        Some(v) => worksheet.write_number(row, col, v),
        None => worksheet.write_string(row, col, "N/A"),
    };
    written.map_err(xlsx_err("number"))?;
    Ok(())
}

/// Stored listings, one row each, with the current price and when it was first/last seen.
pub fn export_listings_xlsx(listings: &[Listing], path: &Path) -> Result<(), AppError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Listings").map_err(xlsx_err("sheet name"))?;

    write_headers(
        worksheet,
        &[
            "Title",
            "Location",
            "Source",
            "Price (EUR)",
            "Size (m²)",
            "Bedrooms",
            "Price/m²",
            "Condition",
            "Price changes",
            "First seen",
            "Last seen",
            "URL",
        ],
    )?;

    for (i, l) in listings.iter().enumerate() {
        let r = (i + 1) as u32;

        worksheet.write_string(r, 0, &l.title).map_err(xlsx_err("title"))?;
        worksheet.write_string(r, 1, &l.location).map_err(xlsx_err("location"))?;
        worksheet
            .write_string(r, 2, l.source.display_name())
            .map_err(xlsx_err("source"))?;
        worksheet.write_number(r, 3, l.price as f64).map_err(xlsx_err("price"))?;
        write_opt_number(worksheet, r, 4, l.size_sqm.map(|s| s as f64))?;
        write_opt_number(worksheet, r, 5, l.bedrooms.map(|b| b as f64))?;
        write_opt_number(worksheet, r, 6, l.price_per_sqm.map(f64::round))?;
        worksheet
            .write_string(r, 7, l.condition.label())
            .map_err(xlsx_err("condition"))?;
        worksheet
            .write_number(r, 8, l.price_history.len().saturating_sub(1) as f64)
            .map_err(xlsx_err("price changes"))?;
        worksheet
            .write_string(r, 9, l.first_seen.format("%Y-%m-%d").to_string())
            .map_err(xlsx_err("first seen"))?;
        worksheet
            .write_string(r, 10, l.last_seen.format("%Y-%m-%d").to_string())
            .map_err(xlsx_err("last seen"))?;
        worksheet.write_url(r, 11, l.url.as_str()).map_err(xlsx_err("url"))?;
    }

    worksheet.autofit();
    workbook.save(path)?;
    Ok(())
}

/// Same columns as the collector's CSV.
pub fn export_collected_xlsx(urls: &[CollectedUrl], path: &Path) -> Result<(), AppError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    write_headers(
        worksheet,
        &["town", "site", "title", "estimated_price", "url", "found_date"],
    )?;

    for (i, u) in urls.iter().enumerate() {
        let r = (i + 1) as u32;
        worksheet.write_string(r, 0, &u.town).map_err(xlsx_err("town"))?;
        worksheet.write_string(r, 1, &u.site).map_err(xlsx_err("site"))?;
        worksheet.write_string(r, 2, &u.title).map_err(xlsx_err("title"))?;
        worksheet
            .write_string(r, 3, &u.estimated_price)
            .map_err(xlsx_err("estimated price"))?;
        worksheet.write_string(r, 4, &u.url).map_err(xlsx_err("url"))?;
        worksheet
            .write_string(r, 5, u.found_date.format("%Y-%m-%dT%H:%M:%S").to_string())
            .map_err(xlsx_err("found date"))?;
    }

    worksheet.autofit();
    workbook.save(path)?;
    Ok(())
}
