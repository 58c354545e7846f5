// scraper/probe.rs
//
// Checks which portals answer plain HTTP and how a Casa.it results page is built.

use crate::scraper::extract::truncate_chars;
use crate::scraper::fetch::{pause, Fetcher};
use crate::scraper::html::{element_text, selector};
use crate::scraper::ScraperError;
use scraper::Html;
use url::Url;

pub const HOME_URLS: &[&str] = &[
    "https://www.immobiliare.it",
    "https://www.casa.it",
    "https://www.idealista.it",
];

const CASA_HOME: &str = "https://www.casa.it";
const CASA_SAMPLE_SEARCH: &str = "https://www.casa.it/vendita/residenziale/puglia/";

#[derive(Debug, Clone, PartialEq)]
pub enum SiteStatus {
    Status(u16),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SiteCheck {
    pub url: String,
    pub status: SiteStatus,
}

impl SiteCheck {
    pub fn is_working(&self) -> bool {
        self.status == SiteStatus::Status(200)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageStructure {
    pub class_cards: usize,
    pub property_links: usize,
    pub price_mentions: usize,
    pub data_id_elements: usize,
    pub generic_cards: usize,
    /// (link text, href), at most three.
    pub sample_links: Vec<(String, String)>,
    pub script_count: usize,
    pub js_rendered: bool,
}

#[derive(Debug)]
pub struct ProbeReport {
    pub checks: Vec<SiteCheck>,
    pub casa_structure: Option<PageStructure>,
}

impl ProbeReport {
    pub fn working(&self) -> usize {
        self.checks.iter().filter(|c| c.is_working()).count()
    }
}

pub fn run_probe(fetcher: &dyn Fetcher, delay_ms: u64) -> Result<ProbeReport, ScraperError> {
    let mut checks = Vec::new();

    for home in HOME_URLS {
        let url = Url::parse(home)?;
        let status = match fetcher.fetch(&url) {
            Ok(page) => SiteStatus::Status(page.status),
            Err(e) => SiteStatus::Failed(e.to_string()),
        };
        tracing::info!(url = home, status = ?status, "Probed site");
        checks.push(SiteCheck {
            url: home.to_string(),
            status,
        });
        pause(delay_ms);
    }

    let casa_ok = checks.iter().any(|c| c.url == CASA_HOME && c.is_working());
    let casa_structure = if casa_ok {
        let page = fetcher.fetch(&Url::parse(CASA_SAMPLE_SEARCH)?)?;
        tracing::info!(status = page.status, "Casa.it search status");
        if page.is_ok() {
            Some(analyse_structure(&page.body)?)
        } else {
            None
        }
    } else {
        None
    };

    Ok(ProbeReport {
        checks,
        casa_structure,
    })
}

fn class_has_any(class: Option<&str>, terms: &[&str]) -> bool {
    class
        .map(|c| {
            let c = c.to_lowercase();
            terms.iter().any(|t| c.contains(t))
        })
        .unwrap_or(false)
}

/// Counts the listing-shaped parts of a results page under several strategies.
pub fn analyse_structure(html: &str) -> Result<PageStructure, ScraperError> {
    let doc = Html::parse_document(html);

    let blocks = selector("div, article")?;
    let links = selector("a[href]")?;
    let data_ids = selector("[data-id]")?;
    let data_property_ids = selector("[data-property-id]")?;
    let scripts = selector("script")?;

    let mut structure = PageStructure::default();

    for el in doc.select(&blocks) {
        let class = el.value().attr("class");
        if class_has_any(class, &["property", "listing", "annuncio", "casa"]) {
            structure.class_cards += 1;
        }
        if class_has_any(class, &["card", "item", "box", "result"]) {
            structure.generic_cards += 1;
        }
    }

    for link in doc.select(&links) {
        let href = link.value().attr("href").unwrap_or_default();
        if ["/vendita/", "/annuncio/", "/immobile/"].iter().any(|p| href.contains(p)) {
            structure.property_links += 1;
            if structure.sample_links.len() < 3 {
                let text = element_text(link);
                structure.sample_links.push((
                    truncate_chars(&text, 50).to_string(),
                    truncate_chars(href, 80).to_string(),
                ));
            }
        }
    }

    structure.price_mentions = doc
        .root_element()
        .text()
        .filter(|t| t.contains('€') && t.chars().any(|c| c.is_ascii_digit()))
        .filter(|t| t.trim().chars().count() < 50)
        .count();

    structure.data_id_elements =
        doc.select(&data_ids).count() + doc.select(&data_property_ids).count();

    let script_bodies: Vec<String> = doc
        .select(&scripts)
        .map(|s| s.html().to_lowercase())
        .collect();
    structure.script_count = script_bodies.len();
    structure.js_rendered = structure.script_count > 10
        || script_bodies
            .iter()
            .any(|s| s.contains("react") || s.contains("vue") || s.contains("angular"));

    Ok(structure)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_each_strategy() {
        let html = r#"
            <html><body>
              <article class="listing-card" data-id="1">
                <a href="/vendita/residenziale/casa-1/">Casa uno</a><span>€ 120.000</span>
              </article>
              <div class="listing-card" data-property-id="2">
                <a href="/annuncio/2/">Casa due</a><span>150.000 €</span>
              </div>
              <div class="result-box"><a href="/immobile/3/">Tre</a></div>
              <a href="/immobile/4/">Quattro</a>
              <a href="/chi-siamo/">About</a>
              <p>Il prezzo medio in Puglia è di € 1.500 al metro quadro, molto più basso della media nazionale.</p>
              <script>window.__APP__ = 1;</script>
            </body></html>"#;

        let s = analyse_structure(html).unwrap();
        assert_eq!(s.class_cards, 2);
        assert_eq!(s.generic_cards, 3);
        assert_eq!(s.property_links, 4);
        assert_eq!(s.sample_links.len(), 3);
        assert_eq!(s.sample_links[0], ("Casa uno".to_string(), "/vendita/residenziale/casa-1/".to_string()));
        assert_eq!(s.price_mentions, 2);
        assert_eq!(s.data_id_elements, 2);
        assert_eq!(s.script_count, 1);
        assert!(!s.js_rendered);
    }

    #[test]
    fn framework_scripts_mark_page_as_rendered() {
        let s = analyse_structure(r#"<script src="/static/react-dom.production.min.js"></script>"#).unwrap();
        assert!(s.js_rendered);

        let many: String = (0..11).map(|i| format!("<script>var a{i};</script>")).collect();
        assert!(analyse_structure(&many).unwrap().js_rendered);
    }
}
