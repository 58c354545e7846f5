use crate::domain::filter::SearchCriteria;
use crate::scraper::collector::CollectedUrl;
use crate::templates::components::format_eur;
use crate::templates::layouts::desktop::desktop_layout;
use chrono::NaiveDateTime;
use maud::{html, Markup};

const COLLECTION_CSS: &str = r#"
.property { border: 1px solid #ddd; margin: 15px 0; padding: 15px; border-radius: 5px; }
.price { font-weight: bold; color: #d32f2f; font-size: 18px; }
.site { background: #e3f2fd; padding: 5px 10px; border-radius: 3px; font-size: 12px; }
.town { background: #f1f8e9; padding: 5px 10px; border-radius: 3px; font-size: 12px; margin-left: 10px; }
.found { font-size: 12px; color: #666; }
"#;

/// Groups by town, keeping the order towns first appear in.
fn by_town(urls: &[CollectedUrl]) -> Vec<(&str, Vec<&CollectedUrl>)> {
    let mut groups: Vec<(&str, Vec<&CollectedUrl>)> = Vec::new();
    for u in urls {
        match groups.iter_mut().find(|(town, _)| *town == u.town) {
            Some((_, list)) => list.push(u),
            None => groups.push((u.town.as_str(), vec![u])),
        }
    }
    groups
}

pub fn collection_page(
    urls: &[CollectedUrl],
    criteria: &SearchCriteria,
    towns: &[String],
    generated_at: NaiveDateTime,
) -> Markup {
    desktop_layout(
        &format!("Italian Property URLs - {}", generated_at.format("%Y-%m-%d")),
        COLLECTION_CSS,
        html! {
            div class="header" {
                h1 { "Italian Property URLs Collection" }
                p { "Generated on " (generated_at.format("%B %d, %Y at %I:%M %p")) }
            }

            div class="summary" {
                h2 { "Summary" }
                p { strong { (urls.len()) " property URLs collected" } }
                p { "Budget Range: " (format_eur(criteria.min_price)) " - " (format_eur(criteria.max_price)) }
                p { "Target Towns: " (towns.join(", ")) }
            }

            @for (town, found) in by_town(urls) {
                h2 { (town) " (" (found.len()) " properties)" }
                @for u in found {
                    div class="property" {
                        div {
                            span class="site" { (u.site) }
                            span class="town" { (u.town) }
                        }
                        h3 { a href=(u.url) target="_blank" { (u.title) } }
                        div class="price" { (u.estimated_price) }
                        p class="found" { "Found: " (u.found_date.format("%Y-%m-%d")) }
                    }
                }
            }
        },
    )
}
