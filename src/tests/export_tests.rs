// src/tests/export_tests.rs
use super::utils::{at, sample_listing};
use crate::collection::save_collection;
use crate::domain::filter::SearchCriteria;
use crate::scraper::collector::CollectedUrl;
use crate::spreadsheets::export_listings_xlsx;

fn collected() -> Vec<CollectedUrl> {
    vec![
        CollectedUrl {
            town: "Crotone".into(),
            site: "Immobiliare.it".into(),
            title: "Trilocale vista mare".into(),
            estimated_price: "€ 189000".into(),
            url: "https://www.immobiliare.it/annunci/101/".into(),
            found_date: at(2, 10),
        },
        CollectedUrl {
            town: "Catania".into(),
            site: "Casa.it".into(),
            title: "Villa, con giardino".into(),
            estimated_price: "Price not shown".into(),
            url: "https://www.casa.it/immobili/4455/".into(),
            found_date: at(2, 10),
        },
    ]
}

#[test]
fn collection_is_written_in_every_format() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let out = dir.path().join("results");
    let towns = vec!["Crotone".to_string(), "Catania".to_string()];
    let files = save_collection(&collected(), &out, &SearchCriteria::default(), &towns, at(2, 10))?;

    for path in [&files.csv, &files.json, &files.html, &files.xlsx] {
        assert!(path.exists(), "{} missing", path.display());
        assert_eq!(path.parent(), Some(out.as_path()));
        assert_eq!(
            path.file_stem().and_then(|s| s.to_str()),
            Some("property_urls_20240602_1000")
        );
    }

    let csv = std::fs::read_to_string(&files.csv)?;
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("town,site,title,estimated_price,url,found_date"));
    assert_eq!(
        lines.next(),
        Some("Crotone,Immobiliare.it,Trilocale vista mare,€ 189000,https://www.immobiliare.it/annunci/101/,2024-06-02T10:00:00")
    );
    // commas in scraped titles get quoted
    assert!(lines.next().is_some_and(|l| l.contains(r#""Villa, con giardino""#)));

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&files.json)?)?;
    assert_eq!(json.as_array().map(Vec::len), Some(2));
    assert_eq!(json[1]["site"], "Casa.it");

    let html = std::fs::read_to_string(&files.html)?;
    assert!(html.contains("https://www.casa.it/immobili/4455/"));
    Ok(())
}

#[test]
fn listings_export_writes_workbook() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("properties.xlsx");
    let listings = vec![
        sample_listing("https://www.immobiliare.it/annunci/101/", 245_000, at(1, 9)),
        sample_listing("https://www.immobiliare.it/annunci/202/", 310_000, at(1, 9)),
    ];

    export_listings_xlsx(&listings, &path)?;

    // xlsx is a zip archive
    let bytes = std::fs::read(&path)?;
    assert!(bytes.starts_with(b"PK"));
    Ok(())
}
