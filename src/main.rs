use crate::config::{Config, Frequency, HttpConfig};
use crate::db::{init_db, Database};
use crate::errors::{AppError, AppResult};
use chrono::{Duration, Local, NaiveDateTime};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod collection;
mod config;
mod db;
mod domain;
mod enrich;
mod errors;
mod guides;
mod mailer;
mod research;
mod scraper;
mod spreadsheets;
mod templates;
mod towns;
mod wishlist;

#[cfg(test)]
mod tests;

#[derive(Parser)]
#[command(name = "casa_scout", version, about = "Italian coastal property research")]
struct Cli {
    /// YAML settings file; built-in defaults when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape, filter, store and report; repeats on the configured schedule
    Research {
        /// Run once and exit
        #[arg(long)]
        once: bool,
    },
    /// Render a report from listings seen in the last N days
    Report {
        #[arg(long, default_value_t = 7)]
        days: i64,
    },
    /// Price history of one stored listing
    History { listing_id: String },
    /// Most recent scrape runs
    Runs,
    /// Export stored listings to a spreadsheet
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Collect listing URLs for manual review
    Collect,
    /// Check which portals are reachable and how their pages are built
    Probe,
    /// Generate a static search guide
    Guide {
        #[arg(value_enum)]
        kind: GuideKind,
    },
    /// Generate the family portal page
    Portal,
    /// Manage the family wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum GuideKind {
    Coastal,
    Manual,
}

#[derive(Subcommand)]
enum WishlistAction {
    Add {
        region: String,
        town: String,
        #[arg(long, default_value = "Interested in this town")]
        notes: String,
        #[arg(long, default_value = "Family Member")]
        added_by: String,
    },
    /// Remove by position as shown by `wishlist list`
    Remove { index: usize },
    List,
}

fn init_tracing(config: &Config) -> AppResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    let file_layer = match &config.log.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(Arc::new(file))
                    .with_ansi(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();
    Ok(())
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn open_db(config: &Config) -> AppResult<Database> {
    let db = Database::new(&config.database_path);
    init_db(&db)?;
    Ok(db)
}

fn research(config: &Config, once: bool) -> AppResult<()> {
    let db = open_db(config)?;
    let fetcher = scraper::build_fetcher(&config.http, Some(db.clone()))?;
    let translator = enrich::build_translator(&config.translate)?;
    let geocoder = enrich::build_geocoder(&config.geocode)?;

    let mailer = if config.email.is_configured() {
        Some(mailer::BrevoMailer::from_config(&config.email)?)
    } else {
        None
    };

    let mut researcher = research::Researcher::new(config, db, fetcher.as_ref(), translator.as_ref());
    if let Some(g) = geocoder.as_deref() {
        researcher = researcher.with_geocoder(g);
    }
    if let Some(m) = mailer.as_ref() {
        researcher = researcher.with_mailer(m);
    }

    tracing::info!(
        budget_min = config.criteria.min_price,
        budget_max = config.criteria.max_price,
        towns = %config.target_towns.join(", "),
        "Starting Italian property search"
    );

    if once || config.schedule.frequency == Frequency::Once {
        let summary = researcher.run_search(now())?;
        match summary.report_path {
            Some(path) => println!("{} properties, report at {}", summary.matched, path.display()),
            None => println!("No properties found matching criteria"),
        }
        return Ok(());
    }

    researcher.run_scheduled(&config.schedule)
}

fn report(config: &Config, days: i64) -> AppResult<()> {
    let db = open_db(config)?;
    let generated = now();
    let listings = db::listings::get_recent_listings(&db, generated - Duration::days(days))?;
    let changes: Vec<_> = listings.iter().filter_map(domain::changes::latest_change).collect();

    let html = templates::pages::render_report(
        &listings,
        &config.criteria,
        &config.target_towns,
        &changes,
        generated,
    );

    std::fs::create_dir_all(&config.output_dir)?;
    let path = config
        .output_dir
        .join(format!("property_report_{}.html", generated.format("%Y%m%d")));
    std::fs::write(&path, html.into_string())?;
    println!("{} listings, report at {}", listings.len(), path.display());
    Ok(())
}

fn history(config: &Config, listing_id: &str) -> AppResult<()> {
    let db = open_db(config)?;
    let listing = db::listings::get_listing(&db, listing_id)?
        .ok_or_else(|| AppError::NotFound(format!("listing {listing_id}")))?;

    println!("{} ({})", listing.title, listing.location);
    println!("{}", listing.url);
    for point in &listing.price_history {
        println!(
            "  {}  {}",
            point.observed_at.format("%Y-%m-%d %H:%M"),
            templates::format_eur(point.price)
        );
    }
    Ok(())
}

fn runs(config: &Config) -> AppResult<()> {
    let db = open_db(config)?;
    let runs = db.with_conn(|conn| db::scrapes::get_recent_scrapes(conn))?;

    for run in runs {
        let started = chrono::DateTime::from_timestamp(run.started_at, 0)
            .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        let status = match (run.success, run.finished_at) {
            (_, None) => "running",
            (Some(true), _) => "ok",
            _ => "failed",
        };
        println!(
            "#{:<5} {:<16} {:<20} {:<8} sites={} listings={} {}",
            run.id,
            started,
            run.town,
            status,
            run.sites_fetched.unwrap_or(0),
            run.properties_seen.unwrap_or(0),
            run.error_message.unwrap_or_default()
        );
    }
    Ok(())
}

fn export(config: &Config, out: Option<PathBuf>) -> AppResult<()> {
    let db = open_db(config)?;
    let listings = db::listings::get_recent_listings(&db, NaiveDateTime::default())?;
    let path = out.unwrap_or_else(|| {
        config
            .output_dir
            .join(format!("properties_{}.xlsx", now().format("%Y%m%d")))
    });
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    spreadsheets::export_listings_xlsx(&listings, &path)?;
    println!("{} listings exported to {}", listings.len(), path.display());
    Ok(())
}

fn collect(config: &Config) -> AppResult<()> {
    let db = open_db(config)?;
    let fetcher = scraper::build_fetcher(&config.http, Some(db))?;
    let started = now();

    let collector = scraper::collector::Collector {
        fetcher: fetcher.as_ref(),
        limits: &config.limits,
        delays: &config.delays,
        now: started,
    };
    let urls = collector.collect(&config.target_towns);

    if urls.is_empty() {
        println!("No property URLs found");
        return Ok(());
    }
    let files = collection::save_collection(
        &urls,
        &config.output_dir,
        &config.criteria,
        &config.target_towns,
        started,
    )?;
    println!("{} URLs collected", urls.len());
    println!("  CSV:  {}", files.csv.display());
    println!("  JSON: {}", files.json.display());
    println!("  HTML: {}", files.html.display());
    println!("  XLSX: {}", files.xlsx.display());
    Ok(())
}

fn probe(config: &Config) -> AppResult<()> {
    let http = HttpConfig {
        cache_ttl_secs: 0,
        ..config.http.clone()
    };
    let fetcher = scraper::build_fetcher(&http, None)?;
    let report = scraper::probe::run_probe(fetcher.as_ref(), 1000)?;

    for check in &report.checks {
        let mark = if check.is_working() { "ok " } else { "-- " };
        println!("{mark} {} {:?}", check.url, check.status);
    }
    println!("Working sites: {}/{}", report.working(), report.checks.len());

    if let Some(s) = &report.casa_structure {
        println!("Casa.it results page:");
        println!("  class-based cards:   {}", s.class_cards);
        println!("  property links:      {}", s.property_links);
        println!("  price mentions:      {}", s.price_mentions);
        println!("  data-id elements:    {}", s.data_id_elements);
        println!("  generic cards:       {}", s.generic_cards);
        for (text, href) in &s.sample_links {
            println!("    - {text} -> {href}");
        }
        if s.js_rendered {
            println!(
                "  Page appears to be JavaScript-rendered ({} scripts); try http.render_js with the `browser` feature",
                s.script_count
            );
        }
    }
    Ok(())
}

fn wishlist_cmd(config: &Config, action: WishlistAction) -> AppResult<()> {
    let mut list = wishlist::Wishlist::load(&config.wishlist_path)?;
    match action {
        WishlistAction::Add {
            region,
            town,
            notes,
            added_by,
        } => {
            list.add(wishlist::WishlistItem {
                region,
                town,
                notes,
                added_by,
                date_added: now().format("%Y-%m-%d").to_string(),
            });
            list.save()?;
        }
        WishlistAction::Remove { index } => {
            let removed = list.remove(index)?;
            list.save()?;
            println!("Removed {}, {}", removed.town, removed.region);
        }
        WishlistAction::List => {}
    }

    for (i, item) in list.items().iter().enumerate() {
        println!(
            "[{i}] {}, {} - {} (added by {} on {})",
            item.town, item.region, item.notes, item.added_by, item.date_added
        );
    }
    Ok(())
}

fn run(cli: Cli, config: Config) -> AppResult<()> {
    match cli.command {
        Command::Research { once } => research(&config, once),
        Command::Report { days } => report(&config, days),
        Command::History { listing_id } => history(&config, &listing_id),
        Command::Runs => runs(&config),
        Command::Export { out } => export(&config, out),
        Command::Collect => collect(&config),
        Command::Probe => probe(&config),
        Command::Guide { kind } => {
            let path = match kind {
                GuideKind::Coastal => guides::write_coastal_guide(&config.output_dir, &config.criteria, now())?,
                GuideKind::Manual => {
                    let (html, worksheet) = guides::write_manual_guide(
                        &config.output_dir,
                        &config.target_towns,
                        &config.criteria,
                        now(),
                    )?;
                    println!("Worksheet: {}", worksheet.display());
                    html
                }
            };
            println!("Guide: {}", path.display());
            Ok(())
        }
        Command::Portal => {
            let list = wishlist::Wishlist::load(&config.wishlist_path)?;
            let path = guides::write_portal(&config.output_dir, &config.criteria, list.items())?;
            println!("Portal: {}", path.display());
            Ok(())
        }
        Command::Wishlist { action } => wishlist_cmd(&config, action),
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = init_tracing(&config) {
        eprintln!("❌ Logging setup failed: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run(cli, config) {
        tracing::error!(error = %e, "command failed");
        std::process::exit(1);
    }
}
