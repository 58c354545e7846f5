// scraper/fetch.rs
use crate::config::HttpConfig;
use crate::db::cache::{get_cached_page, put_cached_page, CachedPage};
use crate::db::connection::Database;
use crate::db::unix_now;
use crate::scraper::ScraperError;
use rand::Rng;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, DNT, UPGRADE_INSECURE_REQUESTS};
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const MAX_BACKOFF_SECS: u64 = 10;
const JITTER_MAX_SECS: u64 = 2;

/// A fetched document. Non-200 statuses are returned rather than raised,
/// callers decide whether a status is worth a warning.
#[derive(Debug, Clone)]
pub struct Page {
    pub url: Url,
    pub status: u16,
    pub body: String,
}

impl Page {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

pub trait Fetcher {
    fn fetch(&self, url: &Url) -> Result<Page, ScraperError>;
}

pub struct HttpFetcher {
    client: Client,
    cache: Option<Database>,
    cache_ttl_secs: i64,
    max_attempts: u32,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig, cache: Option<Database>) -> Result<Self, ScraperError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9,it;q=0.8"));
        headers.insert(DNT, HeaderValue::from_static("1"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .gzip(true)
            .timeout(config.timeout())
            .build()?;

        let cache = if config.cache_ttl_secs > 0 { cache } else { None };

        Ok(Self {
            client,
            cache,
            cache_ttl_secs: config.cache_ttl_secs,
            max_attempts: config.max_attempts.max(1),
        })
    }

    fn try_fetch(&self, url: &Url) -> Result<Page, ScraperError> {
        let resp = self.client.get(url.clone()).send()?;
        let status = resp.status().as_u16();
        let body = resp.text()?;
        Ok(Page {
            url: url.clone(),
            status,
            body,
        })
    }

    fn cached(&self, url: &Url) -> Option<Page> {
        let db = self.cache.as_ref()?;
        let now = unix_now();
        match get_cached_page(db, url.as_str(), now, self.cache_ttl_secs) {
            Ok(Some(page)) => {
                tracing::debug!(url = %url, "cache hit");
                Some(Page {
                    url: url.clone(),
                    status: page.status,
                    body: page.body,
                })
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "cache lookup failed");
                None
            }
        }
    }

    fn store(&self, page: &Page) {
        let Some(db) = self.cache.as_ref() else {
            return;
        };
        let cached = CachedPage {
            status: page.status,
            body: page.body.clone(),
        };
        if let Err(e) = put_cached_page(db, page.url.as_str(), unix_now(), &cached) {
            tracing::warn!(url = %page.url, error = %e, "cache store failed");
        }
    }
}

fn is_retryable(status: u16) -> bool {
    status == 429 || status >= 500
}

fn backoff(attempt: u32) -> Duration {
    let base = std::cmp::min(2 * attempt as u64, MAX_BACKOFF_SECS);
    let jitter = rand::thread_rng().gen_range(0..=JITTER_MAX_SECS);
    Duration::from_secs(base + jitter)
}

/// Runs `attempt` until it yields a page worth keeping. Network errors, 429 and 5xx
/// are retried; any other status is handed back as a `Page` for the caller to judge.
fn with_retries<A, S>(url: &Url, max_attempts: u32, mut attempt: A, sleep: S) -> Result<Page, ScraperError>
where
    A: FnMut() -> Result<Page, ScraperError>,
    S: Fn(Duration),
{
    let mut last_err = None;

    for n in 1..=max_attempts {
        let start = std::time::Instant::now();

        match attempt() {
            Ok(page) if is_retryable(page.status) && n < max_attempts => {
                tracing::warn!(url = %url, status = page.status, attempt = n, "retryable status");
            }
            Ok(page) => {
                tracing::debug!(url = %url, status = page.status, elapsed = ?start.elapsed(), "fetched");
                return Ok(page);
            }
            Err(e) => {
                tracing::warn!(url = %url, attempt = n, elapsed = ?start.elapsed(), error = %e, "fetch failed");
                last_err = Some(e);
            }
        }

        if n < max_attempts {
            sleep(backoff(n));
        }
    }

    Err(last_err.unwrap_or_else(|| ScraperError::Network(format!("retry loop failed for {url}"))))
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<Page, ScraperError> {
        if let Some(page) = self.cached(url) {
            return Ok(page);
        }

        let page = with_retries(url, self.max_attempts, || self.try_fetch(url), std::thread::sleep)?;
        if page.is_ok() {
            self.store(&page);
        }
        Ok(page)
    }
}

/// Renders pages in headless Chrome so client-side listings are present in the DOM.
#[cfg(feature = "browser")]
pub struct BrowserFetcher {
    browser: headless_chrome::Browser,
}

#[cfg(feature = "browser")]
impl BrowserFetcher {
    pub fn new() -> Result<Self, ScraperError> {
        use headless_chrome::{Browser, LaunchOptions};

        tracing::info!("Launching headless Chrome...");
        let options = LaunchOptions::default_builder()
            .headless(true)
            .build()
            .map_err(|e| ScraperError::Browser(e.to_string()))?;
        let browser = Browser::new(options).map_err(|e| ScraperError::Browser(e.to_string()))?;
        Ok(Self { browser })
    }
}

#[cfg(feature = "browser")]
fn browser_err(e: impl std::fmt::Display) -> ScraperError {
    ScraperError::Browser(e.to_string())
}

#[cfg(feature = "browser")]
impl Fetcher for BrowserFetcher {
    fn fetch(&self, url: &Url) -> Result<Page, ScraperError> {
        let tab = self.browser.new_tab().map_err(browser_err)?;
        tab.navigate_to(url.as_str()).map_err(browser_err)?;
        tab.wait_until_navigated().map_err(browser_err)?;
        let body = tab.get_content().map_err(browser_err)?;
        if let Err(e) = tab.close(true) {
            tracing::debug!(url = %url, error = %e, "tab close failed");
        }

        Ok(Page {
            url: url.clone(),
            status: 200,
            body,
        })
    }
}

/// HTTP by default, headless Chrome when `render_js` is set and compiled in.
pub fn build_fetcher(config: &HttpConfig, cache: Option<Database>) -> Result<Box<dyn Fetcher>, ScraperError> {
    if config.render_js {
        #[cfg(feature = "browser")]
        {
            return Ok(Box::new(BrowserFetcher::new()?));
        }
        #[cfg(not(feature = "browser"))]
        tracing::warn!("render_js requested but built without the `browser` feature; using plain HTTP");
    }
    Ok(Box::new(HttpFetcher::new(config, cache)?))
}

pub fn pause(ms: u64) {
    if ms > 0 {
        std::thread::sleep(Duration::from_millis(ms));
    }
}
