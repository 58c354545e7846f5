use crate::domain::listing::Listing;
use crate::scraper::extract::truncate_chars;
use crate::templates::components::{format_eur, group_thousands};
use maud::{html, Markup};

const DESCRIPTION_PREVIEW_CHARS: usize = 500;

pub fn listing_card(listing: &Listing) -> Markup {
    let size = listing
        .size_sqm
        .map(|s| format!("{s} m²"))
        .unwrap_or_else(|| "N/A".into());
    let bedrooms = listing
        .bedrooms
        .map(|b| format!("{b} bedrooms"))
        .unwrap_or_else(|| "N/A".into());
    let per_sqm = listing
        .price_per_sqm
        .map(|p| format!("€{}/m²", group_thousands(p.round() as u64)))
        .unwrap_or_else(|| "N/A".into());

    let preview = truncate_chars(&listing.description_en, DESCRIPTION_PREVIEW_CHARS);
    let truncated = preview.len() < listing.description_en.len();

    html! {
        div class="property card" {
            h3 { (listing.title) }
            div class="price" { (format_eur(listing.price)) }
            div class="details" {
                strong { "Location:" } " " (listing.location) br;
                strong { "Source:" } " " (listing.source.display_name()) br;
                strong { "Size:" } " " (size) br;
                strong { "Bedrooms:" } " " (bedrooms) br;
                strong { "Price/m²:" } " " (per_sqm) br;
                strong { "Condition:" } " " (listing.condition.label()) br;
                strong { "Link:" } " " a href=(listing.url) target="_blank" { "View Property" }
            }
            @if let Some(image) = listing.image_urls.first() {
                img src=(image) alt="Property photo";
            }
            div class="description" {
                h4 { "Description (English)" }
                p { (preview) @if truncated { "..." } }
            }
        }
    }
}
