use crate::domain::filter::SearchCriteria;
use crate::errors::AppResult;
use crate::guides::search_urls;
use crate::templates::components::{card, format_eur, search_buttons};
use crate::templates::layouts::desktop::desktop_layout;
use crate::towns::{slugify, towns_in_region, Region, Setting, Town, REGIONS};
use crate::wishlist::WishlistItem;
use maud::{html, Markup, PreEscaped};

const PORTAL_CSS: &str = r#"
.tabs { margin: 20px 0; }
.tab { background: #eee; border: none; padding: 10px 18px; border-radius: 5px 5px 0 0; cursor: pointer; font-size: 15px; }
.tab.active { background: #1976d2; color: white; }
.tab-content { display: none; }
.tab-content.active { display: block; }
.region-header { background: #1976d2; color: white; padding: 12px 20px; border-radius: 5px; cursor: pointer; }
.towns-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(320px, 1fr)); gap: 20px; margin: 15px 0; }
.town-card { border: 1px solid #ddd; border-radius: 8px; padding: 15px; }
.inland { background: #fffde7; }
.wishlist-btn { background: #ff9800; color: white; border: none; padding: 6px 12px; border-radius: 4px; cursor: pointer; }
.wishlist-item { display: flex; justify-content: space-between; border: 1px solid #ffccbc; border-radius: 8px; padding: 12px; margin: 10px 0; }
.remove-btn { background: #e53935; color: white; border: none; padding: 6px 12px; border-radius: 4px; cursor: pointer; height: 32px; }
.custom-form input { padding: 8px; border: 1px solid #ddd; border-radius: 5px; margin-right: 6px; }
"#;

// Renders the wishlist client-side; `wishlist` is injected as JSON above this script.
const PORTAL_JS: &str = r#"
function showTab(name, btn) {
  document.querySelectorAll('.tab-content').forEach(t => t.classList.remove('active'));
  document.querySelectorAll('.tab').forEach(t => t.classList.remove('active'));
  document.getElementById(name).classList.add('active');
  btn.classList.add('active');
  if (name === 'wishlist') { displayWishlist(); }
}

function toggleRegion(slug) {
  const el = document.getElementById(slug + '-towns');
  el.style.display = el.style.display === 'none' ? 'grid' : 'none';
}

function addToWishlist(region, town, notes) {
  wishlist.push({ region: region, town: town, notes: notes, added_by: 'Family Member', date_added: new Date().toLocaleDateString() });
  alert('Added to wishlist: ' + town + ', ' + region);
  displayWishlist();
}

function addCustomToWishlist() {
  const region = document.getElementById('custom-region').value;
  const town = document.getElementById('custom-town').value;
  const notes = document.getElementById('custom-notes').value;
  if (!region || !town || !notes) { alert('Please fill in all fields'); return; }
  addToWishlist(region, town, notes);
  ['custom-region', 'custom-town', 'custom-notes'].forEach(id => document.getElementById(id).value = '');
}

function removeFromWishlist(index) {
  wishlist.splice(index, 1);
  displayWishlist();
}

function escapeHtml(s) {
  const d = document.createElement('div');
  d.textContent = s;
  return d.innerHTML;
}

function displayWishlist() {
  const container = document.getElementById('wishlist-items');
  if (wishlist.length === 0) {
    container.innerHTML = '<p>No items in wishlist yet. Browse regions and towns, then click "Add to Wishlist".</p>';
    return;
  }
  let out = '<h3>' + wishlist.length + ' items to review</h3>';
  wishlist.forEach((item, i) => {
    out += '<div class="wishlist-item"><div><h4>' + escapeHtml(item.town) + ', ' + escapeHtml(item.region) + '</h4>'
      + '<p><strong>Notes:</strong> ' + escapeHtml(item.notes) + '</p>'
      + '<small>Added by ' + escapeHtml(item.added_by) + ' on ' + escapeHtml(item.date_added) + '</small></div>'
      + '<button class="remove-btn" onclick="removeFromWishlist(' + i + ')">Remove</button></div>';
  });
  container.innerHTML = out;
}

document.querySelectorAll('.wishlist-btn').forEach(btn => {
  btn.addEventListener('click', () => addToWishlist(btn.dataset.region, btn.dataset.town, 'Interested in this town'));
});

displayWishlist();
"#;

/// Wishlist as a JS literal. `</` is escaped so notes can't close the script tag.
pub fn wishlist_json(items: &[WishlistItem]) -> AppResult<String> {
    Ok(serde_json::to_string(items)?.replace("</", "<\\/"))
}

fn town_card(region: &Region, town: &Town, criteria: &SearchCriteria) -> AppResult<Markup> {
    let urls = search_urls(town, criteria)?;
    let class = match town.setting {
        Setting::Coastal => "town-card",
        Setting::Inland => "town-card inland",
    };
    Ok(html! {
        div class=(class) {
            h3 { (town.name) }
            p { em { (town.kind) } @if let Some(pop) = town.population { " · pop. " (pop) } }
            div { strong { "Beach: " } (town.beach_walk) }
            div { strong { "Centre: " } (town.town_center) }
            div { strong { "Airport: " } (town.airport_time) }
            @if let Some(price) = town.price_range {
                div { strong { "Prices: " } (price) }
            }
            div { strong { "Pros: " } (town.pros) }
            @if let Some(cons) = town.cons {
                div { strong { "Cons: " } (cons) }
            }
            (search_buttons(&urls))
            button class="wishlist-btn" data-region=(region.name) data-town=(town.name) { "Add to Wishlist" }
        }
    })
}

pub fn portal_page(criteria: &SearchCriteria, wishlist: &[WishlistItem]) -> AppResult<Markup> {
    let mut regions = Vec::new();
    for region in REGIONS {
        let mut cards = Vec::new();
        for town in towns_in_region(region.name) {
            cards.push(town_card(region, town, criteria)?);
        }
        regions.push((region, slugify(region.name), cards));
    }
    let seed = wishlist_json(wishlist)?;

    Ok(desktop_layout(
        "Family Italian Property Portal",
        PORTAL_CSS,
        html! {
            div class="header" {
                h1 { "Family Italian Property Portal" }
                p { "Browse regions, explore towns, find houses, build the wishlist" }
                p { "Budget: " (format_eur(criteria.min_price)) " - " (format_eur(criteria.max_price)) }
            }

            div class="tabs" {
                button class="tab active" onclick="showTab('explore', this)" { "Explore Regions" }
                button class="tab" onclick="showTab('wishlist', this)" { "Wishlist" }
                button class="tab" onclick="showTab('search-tips', this)" { "Search Tips" }
            }

            div id="explore" class="tab-content active" {
                @for (region, slug, cards) in &regions {
                    div class="region" {
                        div class="region-header" onclick={ "toggleRegion('" (slug) "')" } {
                            (region.name) " - " (region.description)
                        }
                        p { (region.climate) " · " (region.airport_hub) }
                        div id={ (slug) "-towns" } class="towns-grid" {
                            @for card in cards { (card) }
                        }
                    }
                }
            }

            div id="wishlist" class="tab-content" {
                h2 { "Property Wishlist" }
                div class="custom-form" {
                    input type="text" id="custom-region" placeholder="Region (e.g. Puglia)";
                    input type="text" id="custom-town" placeholder="Town Name";
                    input type="text" id="custom-notes" placeholder="Property details, price, URL, notes...";
                    button class="btn" onclick="addCustomToWishlist()" { "Add to Wishlist" }
                }
                div id="wishlist-items" {}
            }

            div id="search-tips" class="tab-content" {
                (card("Property search terms", html! {
                    ul {
                        li { strong { "\"vista mare\"" } " = sea view" }
                        li { strong { "\"fronte mare\"" } " = seafront" }
                        li { strong { "\"centro storico\"" } " = historic center" }
                        li { strong { "\"ristrutturato\"" } " = renovated" }
                        li { strong { "\"abitabile\"" } " = livable condition" }
                    }
                }))
                (card("Evaluation checklist", html! {
                    ul {
                        li { "Walk time to beach (under 10 min?)" }
                        li { "Walk time to shops and restaurants" }
                        li { "Drive time to airport" }
                        li { "Parking availability" }
                        li { "Internet connectivity" }
                    }
                }))
            }

            script { "let wishlist = " (PreEscaped(&seed)) ";" }
            script { (PreEscaped(PORTAL_JS)) }
        },
    ))
}
