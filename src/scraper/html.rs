// scraper/html.rs
//
// Selector helpers shared by the site scrapers, the collector and the probe.

use crate::scraper::extract::clean_text;
use crate::scraper::ScraperError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

pub fn selector(css: &str) -> Result<Selector, ScraperError> {
    Selector::parse(css).map_err(|e| ScraperError::HtmlParse(format!("selector {css}: {e:?}")))
}

/// Elements for the first strategy that matches anything, in order.
pub fn select_with_fallbacks<'a>(
    doc: &'a Html,
    strategies: &[&str],
) -> Result<Vec<ElementRef<'a>>, ScraperError> {
    for css in strategies {
        let sel = selector(css)?;
        let found: Vec<_> = doc.select(&sel).collect();
        if !found.is_empty() {
            tracing::debug!(selector = css, count = found.len(), "selector strategy matched");
            return Ok(found);
        }
    }
    Ok(Vec::new())
}

/// First descendant matching any of the strategies.
pub fn first_within<'a>(
    el: ElementRef<'a>,
    strategies: &[&str],
) -> Result<Option<ElementRef<'a>>, ScraperError> {
    for css in strategies {
        let sel = selector(css)?;
        if let Some(found) = el.select(&sel).next() {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

pub fn element_text(el: ElementRef<'_>) -> String {
    clean_text(&el.text().collect::<Vec<_>>().join(" "))
}

/// Resolves `href` against `base`; anything that doesn't form a URL is dropped.
pub fn absolute(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
        return None;
    }
    base.join(href).ok()
}

pub fn first_image(el: ElementRef<'_>, base: &Url) -> Result<Option<String>, ScraperError> {
    let sel = selector("img[src]")?;
    Ok(el
        .select(&sel)
        .filter_map(|img| img.value().attr("src"))
        .find_map(|src| absolute(base, src))
        .map(|u| u.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallbacks_use_first_matching_strategy() {
        let doc = Html::parse_document(
            r#"<div class="b">one</div><div class="b">two</div><div class="c">three</div>"#,
        );
        let found = select_with_fallbacks(&doc, &["div.a", "div.b", "div.c"]).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(element_text(found[0]), "one");
    }

    #[test]
    fn no_strategy_matches() {
        let doc = Html::parse_document("<p>nothing</p>");
        assert!(select_with_fallbacks(&doc, &["div.a"]).unwrap().is_empty());
    }

    #[test]
    fn absolute_joins_relative_paths() {
        let base = Url::parse("https://www.casa.it/vendita/residenziale/puglia/").unwrap();
        assert_eq!(
            absolute(&base, "/immobili/123/").unwrap().as_str(),
            "https://www.casa.it/immobili/123/"
        );
        assert_eq!(
            absolute(&base, "https://other.it/x").unwrap().as_str(),
            "https://other.it/x"
        );
        assert!(absolute(&base, "#top").is_none());
        assert!(absolute(&base, "  ").is_none());
    }

    #[test]
    fn invalid_selector_is_an_error() {
        assert!(selector("div[").is_err());
    }
}
