use crate::domain::changes::PriceChange;
use crate::domain::filter::SearchCriteria;
use crate::domain::listing::Listing;
use crate::templates::components::{format_eur, listing_card};
use crate::templates::layouts::desktop::desktop_layout;
use chrono::NaiveDateTime;
use maud::{html, Markup};

const REPORT_CSS: &str = r#"
.property img { max-width: 300px; height: auto; }
.price { font-size: 24px; color: #d32f2f; font-weight: bold; }
.details { margin: 10px 0; }
.description { margin: 15px 0; padding: 10px; background: #f5f5f5; }
.changes td, .changes th { padding: 4px 10px; text-align: left; }
.drop { color: #2e7d32; }
.rise { color: #d32f2f; }
"#;

pub fn report_subject(generated_at: NaiveDateTime) -> String {
    format!(
        "Italian Property Research Report - {}",
        generated_at.format("%Y-%m-%d")
    )
}

pub fn render_report(
    listings: &[Listing],
    criteria: &SearchCriteria,
    towns: &[String],
    price_changes: &[PriceChange],
    generated_at: NaiveDateTime,
) -> Markup {
    desktop_layout(
        &report_subject(generated_at),
        REPORT_CSS,
        html! {
            div class="header" {
                h1 { "Italian Property Research Report" }
                p { "Generated on " (generated_at.format("%B %d, %Y")) }
            }

            div class="summary" {
                h2 { "Summary" }
                p { strong { (listings.len()) } " properties found matching your criteria:" }
                ul {
                    li { "Price range: " (format_eur(criteria.min_price)) " - " (format_eur(criteria.max_price)) }
                    li { "Minimum bedrooms: " (criteria.min_bedrooms) }
                    li { "Locations: " (towns.join(", ")) }
                }
            }

            @if !price_changes.is_empty() {
                (price_changes_section(price_changes))
            }

            @for listing in listings {
                (listing_card(listing))
            }
        },
    )
}

fn price_changes_section(changes: &[PriceChange]) -> Markup {
    html! {
        div class="card changes" {
            h2 { "Price changes" }
            table {
                tr { th { "Property" } th { "Was" } th { "Now" } th { "Change" } }
                @for change in changes {
                    tr {
                        td { a href=(change.url) target="_blank" { (change.title) } }
                        td { (format_eur(change.previous)) }
                        td { (format_eur(change.current)) }
                        td class=(if change.is_drop() { "drop" } else { "rise" }) {
                            @if !change.is_drop() { "+" }
                            (format_eur(change.delta()))
                        }
                    }
                }
            }
        }
    }
}
