use crate::domain::listing::Source;
use maud::{html, Markup};
use url::Url;

pub mod listing_card;

pub use listing_card::listing_card;

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        div class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

/// One button per portal, opening the pre-filled search in a new tab.
pub fn search_buttons(urls: &[(Source, Url)]) -> Markup {
    html! {
        div class="search-buttons" {
            @for (source, url) in urls {
                a class="btn" href=(url.as_str()) target="_blank" rel="noopener" {
                    "Search " (source.display_name())
                }
            }
        }
    }
}

/// "€250,000"
pub fn format_eur(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    format!("{sign}€{}", group_thousands(amount.unsigned_abs()))
}

pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
