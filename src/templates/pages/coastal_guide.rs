use crate::domain::filter::SearchCriteria;
use crate::errors::AppResult;
use crate::guides::search_urls;
use crate::templates::components::{format_eur, search_buttons};
use crate::templates::layouts::desktop::desktop_layout;
use crate::towns::{towns_in_region, Setting, Town, REGIONS};
use chrono::NaiveDateTime;
use maud::{html, Markup};

const GUIDE_CSS: &str = r#"
.budget { background: #c8e6c9; color: #1b5e20; padding: 10px; border-radius: 5px; display: inline-block; font-weight: bold; }
.region { margin: 30px 0; }
.region-header { background: #1976d2; color: white; padding: 12px 20px; border-radius: 5px; font-size: 20px; }
.towns-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(320px, 1fr)); gap: 20px; margin-top: 15px; }
.town-card { border: 1px solid #ddd; border-radius: 8px; padding: 15px; background: #fafafa; }
.town-name { font-size: 18px; font-weight: bold; color: #1976d2; margin-bottom: 8px; }
.vibe { background: #fff3e0; padding: 8px; border-radius: 5px; margin: 10px 0; }
.tips { background: #f5f5f5; padding: 20px; border-radius: 8px; }
"#;

fn town_card(town: &Town, criteria: &SearchCriteria) -> AppResult<Markup> {
    let urls = search_urls(town, criteria)?;
    Ok(html! {
        div class="town-card" {
            div class="town-name" { (town.name) }
            div { strong { "Airport: " } (town.airport_time) }
            div { strong { "Type: " } (town.kind) }
            div { strong { "Town centre: " } (town.town_center) }
            div { strong { "Beach access: " } (town.beach_walk) }
            @if let Some(price) = town.price_range {
                div { strong { "Prices: " } (price) }
            }
            div class="vibe" {
                strong { "Pros: " } (town.pros)
                @if let Some(cons) = town.cons {
                    br; strong { "Cons: " } (cons)
                }
            }
            (search_buttons(&urls))
        }
    })
}

pub fn coastal_guide_page(criteria: &SearchCriteria, now: NaiveDateTime) -> AppResult<Markup> {
    let mut regions = Vec::new();
    for region in REGIONS {
        let mut cards = Vec::new();
        for town in towns_in_region(region.name).filter(|t| t.setting == Setting::Coastal) {
            cards.push(town_card(town, criteria)?);
        }
        regions.push((region, cards));
    }

    Ok(desktop_layout(
        "Italian Coastal Property Guide",
        GUIDE_CSS,
        html! {
            div class="header" {
                h1 { "Italian Coastal Property Guide" }
                h2 { "Walk to Beach + Town Center + Easy Airport Access" }
                div class="budget" {
                    "Budget: " (format_eur(criteria.min_price)) " - " (format_eur(criteria.max_price))
                }
            }

            div class="summary" {
                h2 { "Coastal town criteria" }
                ul {
                    li { strong { "Coastal location: " } "walking distance to beach and water" }
                    li { strong { "Walkable town center: " } "shops, restaurants, daily necessities on foot" }
                    li { strong { "Airport access: " } "major airport within 1-2 hours" }
                    li { strong { "Right-sized property: " } (criteria.min_bedrooms) "+ bedrooms, move-in ready or minor renovation" }
                }
            }

            @for (region, cards) in &regions {
                div class="region" {
                    div class="region-header" { (region.name) " - " (region.description) }
                    p { strong { "Climate: " } (region.climate) " · " strong { "Airport hub: " } (region.airport_hub) }
                    div class="towns-grid" {
                        @for card in cards { (card) }
                    }
                }
            }

            div class="tips" {
                h2 { "Coastal property search tips" }
                h3 { "Search keywords" }
                ul {
                    li { strong { "\"vista mare\"" } " = sea view" }
                    li { strong { "\"fronte mare\"" } " = seafront" }
                    li { strong { "\"centro storico\"" } " = historic center" }
                    li { strong { "\"a piedi dal mare\"" } " = walking to sea" }
                }
                h3 { "Things to check" }
                ul {
                    li { "Summer vs winter population" }
                    li { "Seasonal restaurant closures" }
                    li { "Parking situation in town" }
                    li { "Public transportation options" }
                }
            }

            p style="text-align: center; color: #666;" {
                "Last updated: " (now.format("%B %d, %Y"))
            }
        },
    ))
}
