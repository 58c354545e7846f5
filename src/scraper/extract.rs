// scraper/extract.rs
//
// Regex field extraction over the loose text of listing cards.

use regex::Regex;
use std::sync::OnceLock;

fn price_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"€\s*(\d+)").expect("static regex"))
}

fn price_suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\s*€").expect("static regex"))
}

fn bedrooms_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\s*(?:locali|camere|cam)").expect("static regex"))
}

fn size_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\s*m[²2]").expect("static regex"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

/// Numeric EUR price from text like "€ 250.000" or "250.000 €".
/// Thousands separators are stripped before matching, so cents are not supported.
pub fn extract_price(text: &str) -> Option<i64> {
    let digits = text.replace(['.', ','], "");

    price_prefix_re()
        .captures(&digits)
        .or_else(|| price_suffix_re().captures(&digits))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i64>().ok())
}

/// (bedrooms, size in m²) from a card's detail line.
pub fn extract_details(text: &str) -> (Option<i64>, Option<i64>) {
    let lower = text.to_lowercase();

    let bedrooms = bedrooms_re()
        .captures(&lower)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok());

    let size_sqm = size_re()
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok());

    (bedrooms, size_sqm)
}

/// "€ 250.000"-style label for the collector, or None when no price is present.
pub fn price_label(text: &str) -> Option<String> {
    if !text.contains('€') {
        return None;
    }
    let without_dots = text.replace('.', "");
    price_prefix_re()
        .find(&without_dots)
        .map(|m| m.as_str().to_string())
}

pub fn clean_text(text: &str) -> String {
    whitespace_re().replace_all(text.trim(), " ").into_owned()
}

pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_with_euro_prefix_and_dots() {
        assert_eq!(extract_price("€ 250.000"), Some(250_000));
        assert_eq!(extract_price("€1.250.000"), Some(1_250_000));
    }

    #[test]
    fn price_with_euro_suffix() {
        assert_eq!(extract_price("189.000 €"), Some(189_000));
    }

    #[test]
    fn price_with_surrounding_text() {
        assert_eq!(extract_price("Prezzo: da € 320.000 trattabili"), Some(320_000));
    }

    #[test]
    fn no_price_found() {
        assert_eq!(extract_price("Prezzo su richiesta"), None);
        assert_eq!(extract_price(""), None);
    }

    #[test]
    fn overflowing_price_is_none() {
        assert_eq!(extract_price("€ 99999999999999999999999"), None);
    }

    #[test]
    fn details_bedrooms_and_size() {
        assert_eq!(extract_details("3 locali | 95 m² | 2 bagni"), (Some(3), Some(95)));
        assert_eq!(extract_details("2 Camere, 70m2"), (Some(2), Some(70)));
        assert_eq!(extract_details("4 cam."), (Some(4), None));
    }

    #[test]
    fn details_missing() {
        assert_eq!(extract_details("Piano terra, giardino"), (None, None));
    }

    #[test]
    fn price_label_keeps_euro_sign() {
        assert_eq!(price_label("Villa € 245.000 Rodi"), Some("€ 245000".to_string()));
        assert_eq!(price_label("Villa Rodi"), None);
    }

    #[test]
    fn clean_and_truncate() {
        assert_eq!(clean_text("  Casa \n\t al   mare "), "Casa al mare");
        assert_eq!(truncate_chars("Cefalù è bella", 6), "Cefalù");
        assert_eq!(truncate_chars("corto", 200), "corto");
    }
}
