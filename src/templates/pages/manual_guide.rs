use crate::domain::filter::SearchCriteria;
use crate::domain::listing::Source;
use crate::errors::AppResult;
use crate::guides::search_urls;
use crate::templates::components::format_eur;
use crate::templates::layouts::desktop::desktop_layout;
use crate::towns::{lookup_configured, Town};
use chrono::NaiveDateTime;
use maud::{html, Markup};
use url::Url;

const MANUAL_CSS: &str = r#"
.budget { background: #c8e6c9; color: #1b5e20; padding: 10px; border-radius: 5px; display: inline-block; font-weight: bold; }
.town-section { margin: 30px 0; border: 2px solid #e3f2fd; border-radius: 10px; padding: 20px; }
.site-links { display: grid; grid-template-columns: repeat(auto-fit, minmax(250px, 1fr)); gap: 15px; }
.site-card { border: 1px solid #ddd; border-radius: 8px; padding: 15px; background: #f8f9fa; }
.manual-link { color: #f57c00; font-size: 14px; }
.tips { background: #fff3e0; padding: 15px; border-radius: 8px; margin: 15px 0; }
.checklist { background: #f3e5f5; padding: 15px; border-radius: 8px; }
"#;

fn blurb(source: Source) -> (&'static str, &'static str) {
    match source {
        Source::Immobiliare => ("Italy's largest property site", "https://www.immobiliare.it"),
        Source::Casa => ("Regional property listings", "https://www.casa.it"),
        Source::Idealista => ("Modern property platform", "https://www.idealista.it"),
        Source::Subito => ("Local classifieds and direct sales", "https://www.subito.it"),
    }
}

fn town_section(town: &Town, urls: &[(Source, Url)]) -> Markup {
    html! {
        div class="town-section" {
            h2 { (town.location()) }
            div class="site-links" {
                @for (source, url) in urls {
                    @let (about, home) = blurb(*source);
                    div class="site-card" {
                        h3 { (source.display_name()) }
                        p { (about) }
                        a class="btn" href=(url.as_str()) target="_blank" { "Search Now" }
                        br;
                        a class="manual-link" href=(home) target="_blank" { "Manual Search" }
                    }
                }
            }
        }
    }
}

pub fn manual_guide_page(towns: &[String], criteria: &SearchCriteria, now: NaiveDateTime) -> AppResult<Markup> {
    let mut sections = Vec::new();
    for name in towns {
        match lookup_configured(name) {
            Some(town) => sections.push(town_section(town, &search_urls(town, criteria)?)),
            None => tracing::warn!(town = %name, "Town not in reference table, left out of guide"),
        }
    }

    Ok(desktop_layout(
        "Italian Property Manual Search Guide",
        MANUAL_CSS,
        html! {
            div class="header" {
                h1 { "Italian Property Manual Search Guide" }
                p { "Generated on " (now.format("%B %d, %Y at %I:%M %p")) }
                div class="budget" {
                    "Budget: " (format_eur(criteria.min_price)) " - " (format_eur(criteria.max_price))
                }
            }

            div class="summary" {
                h2 { "How to use this guide" }
                ol {
                    li { strong { "Click \"Search Now\"" } " to open a pre-configured search" }
                    li { strong { "Browse results" } " and save interesting properties to a shared document" }
                    li { strong { "Use \"Manual Search\"" } " if the direct links don't work" }
                    li { strong { "Share findings" } " in the family group chat with property URLs" }
                }
            }

            @for section in &sections { (section) }

            div class="tips" {
                h2 { "Search tips" }
                ul {
                    li { strong { "Price formats: " } "€150.000 = €150,000 (periods vs commas)" }
                    li { strong { "Key words: " } "\"vendita\" = for sale, \"locali\" = rooms, \"mq\" = square meters" }
                    li { strong { "Property types: " } "\"casa\" = house, \"appartamento\" = apartment, \"villa\" = villa" }
                    li { strong { "Conditions: " } "\"abitabile\" = livable, \"da ristrutturare\" = needs renovation" }
                }
            }

            div class="checklist" {
                h2 { "Family research checklist" }
                ul {
                    li { "Exact address and neighborhood" }
                    li { "Price and price per square meter" }
                    li { "Size, bedrooms, bathrooms" }
                    li { "Condition (move-in ready vs renovation needed)" }
                    li { "How long on market" }
                    li { "Agent contact information" }
                    li { "The property URL" }
                }
            }
        },
    ))
}

fn worksheet_property(n: usize) -> String {
    format!(
        "#### Property {n}:\n\
         - **URL:** \n\
         - **Price:** €_______\n\
         - **Size:** _____ m²\n\
         - **Bedrooms:** _____\n\
         - **Condition:** \n\
         - **Notes:** \n\n"
    )
}

/// Markdown sheet for family members to fill in while browsing.
pub fn family_worksheet() -> String {
    let mut sheet = String::from(
        "# Italian Property Research Worksheet\n\n\
         ## Family Member: _______________\n\
         ## Research Date: _______________\n\
         ## Town Focus: __________________\n\n\
         ### Properties Found:\n\n",
    );
    for n in 1..=3 {
        sheet.push_str(&worksheet_property(n));
    }
    sheet.push_str(
        "### Research Notes:\n\
         - **Average prices in this town:** €_______\n\
         - **Best neighborhoods:** \n\
         - **Properties to visit on trip:** \n\
         - **Questions for real estate agents:** \n\n\
         ### Next Steps:\n\
         - [ ] Share findings with family\n\
         - [ ] Schedule virtual tour if available\n\
         - [ ] Contact agent for more info\n\
         - [ ] Research neighborhood amenities\n",
    );
    sheet
}
