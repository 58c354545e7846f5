// src/research.rs
//
// One research run: scrape every configured town, filter, store, report, mail.

use crate::config::{Config, Schedule};
use crate::db::cache::purge_expired;
use crate::db::listings::{save_listings, SaveSummary};
use crate::db::scrapes::{end_scrape_run, start_scrape_run, RunOutcome};
use crate::db::{unix_now, Database};
use crate::domain::filter::filter_listings;
use crate::domain::listing::{dedup_listings, Listing};
use crate::enrich::{Geocoder, Translator};
use crate::errors::AppResult;
use crate::mailer::BrevoMailer;
use crate::scraper::fetch::pause;
use crate::scraper::{research_sites, Fetcher, ListingSite, ScrapeContext, SearchTarget};
use crate::templates::pages::{render_report, report_subject};
use chrono::{Local, NaiveDateTime};
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct RunSummary {
    pub matched: usize,
    pub saved: SaveSummary,
    pub report_path: Option<PathBuf>,
    pub emailed: bool,
}

pub struct Researcher<'a> {
    config: &'a Config,
    db: Database,
    fetcher: &'a dyn Fetcher,
    translator: &'a dyn Translator,
    geocoder: Option<&'a dyn Geocoder>,
    mailer: Option<&'a BrevoMailer>,
    sites: Vec<Box<dyn ListingSite>>,
}

impl<'a> Researcher<'a> {
    pub fn new(config: &'a Config, db: Database, fetcher: &'a dyn Fetcher, translator: &'a dyn Translator) -> Self {
        Self {
            config,
            db,
            fetcher,
            translator,
            geocoder: None,
            mailer: None,
            sites: research_sites(),
        }
    }

    pub fn with_geocoder(mut self, geocoder: &'a dyn Geocoder) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    pub fn with_mailer(mut self, mailer: &'a BrevoMailer) -> Self {
        self.mailer = Some(mailer);
        self
    }

    pub fn run_search(&self, now: NaiveDateTime) -> AppResult<RunSummary> {
        tracing::info!(towns = self.config.target_towns.len(), "Starting property search...");

        let ttl = self.config.http.cache_ttl_secs;
        if ttl > 0 {
            let purged = purge_expired(&self.db, unix_now(), ttl)?;
            tracing::debug!(purged, "expired cache entries removed");
        }

        let mut matched = Vec::new();
        for town in &self.config.target_towns {
            let target = SearchTarget::resolve(town);
            matched.extend(self.search_town(&target, now)?);
            pause(self.config.delays.town_ms);
        }

        let mut matched = dedup_listings(matched);
        self.geocode(&mut matched);

        let saved = save_listings(&self.db, &matched)?;
        tracing::info!(
            inserted = saved.inserted,
            updated = saved.updated,
            price_changes = saved.price_changes.len(),
            "Listings saved"
        );

        let mut summary = RunSummary {
            matched: matched.len(),
            ..RunSummary::default()
        };

        if matched.is_empty() {
            tracing::info!("No properties found matching criteria");
        } else {
            let html = render_report(
                &matched,
                &self.config.criteria,
                &self.config.target_towns,
                &saved.price_changes,
                now,
            )
            .into_string();

            std::fs::create_dir_all(&self.config.output_dir)?;
            let path = self
                .config
                .output_dir
                .join(format!("property_report_{}.html", now.format("%Y%m%d")));
            std::fs::write(&path, &html)?;
            tracing::info!(path = %path.display(), "Report saved");

            summary.emailed = self.send_report(&report_subject(now), &html);
            summary.report_path = Some(path);
        }

        summary.saved = saved;
        tracing::info!("Property search completed");
        Ok(summary)
    }

    /// Scrapes one town on every site. Site failures are recorded on the run and skipped.
    fn search_town(&self, target: &SearchTarget, now: NaiveDateTime) -> AppResult<Vec<Listing>> {
        tracing::info!(town = %target.name, "Searching properties");
        let run_id = self
            .db
            .with_conn(|conn| start_scrape_run(conn, &target.name, unix_now()))?;

        let ctx = ScrapeContext {
            fetcher: self.fetcher,
            translator: self.translator,
            criteria: &self.config.criteria,
            limits: &self.config.limits,
            delays: &self.config.delays,
            now,
        };

        let mut found = Vec::new();
        let mut sites_ok = 0;
        let mut errors = Vec::new();

        for site in &self.sites {
            match site.scrape(&ctx, target) {
                Ok(listings) => {
                    sites_ok += 1;
                    found.extend(listings);
                }
                Err(e) => {
                    tracing::error!(town = %target.name, site = %site.source(), error = %e, "Site scrape failed");
                    errors.push(format!("{}: {e}", site.source()));
                }
            }
        }

        let total = found.len();
        let filtered = filter_listings(found, &self.config.criteria);
        tracing::info!(town = %target.name, total, matching = filtered.len(), "Filtered listings");

        let outcome = RunOutcome {
            sites: sites_ok,
            props: total,
            error: (!errors.is_empty()).then(|| errors.join("; ")),
        };
        self.db
            .with_conn(|conn| end_scrape_run(conn, run_id, unix_now(), &outcome))?;

        Ok(filtered)
    }

    fn geocode(&self, listings: &mut [Listing]) {
        let Some(geocoder) = self.geocoder else {
            return;
        };
        for listing in listings.iter_mut() {
            match geocoder.geocode(&listing.location) {
                Ok(coordinate) => listing.coordinate = coordinate,
                Err(e) => tracing::warn!(location = %listing.location, error = %e, "Geocoding failed"),
            }
        }
    }

    /// Returns whether the report went out. Failures are logged, never fatal.
    fn send_report(&self, subject: &str, html: &str) -> bool {
        let Some(mailer) = self.mailer else {
            tracing::warn!("Email not configured - skipping email send");
            return false;
        };
        match mailer.send_report(&self.config.email.recipients, subject, html) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "Failed to send email report");
                false
            }
        }
    }

    /// Runs now, then again at each scheduled time until the schedule says stop.
    pub fn run_scheduled(&self, schedule: &Schedule) -> AppResult<()> {
        loop {
            let now = Local::now().naive_local();
            if let Err(e) = self.run_search(now) {
                tracing::error!(error = %e, "Research run failed");
            }

            let after = Local::now().naive_local();
            let Some(next) = schedule.next_run_after(after)? else {
                return Ok(());
            };
            tracing::info!(next = %next, "Next run scheduled");
            let wait = (next - after).to_std().unwrap_or_default();
            std::thread::sleep(wait);
        }
    }
}
