// src/domain/filter.rs

use crate::config::default_acceptable_conditions;
use crate::domain::condition::{determine_condition, Condition};
use crate::domain::listing::Listing;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchCriteria {
    pub min_price: i64,
    pub max_price: i64,
    pub min_bedrooms: i64,
    pub acceptable_conditions: Vec<Condition>,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            min_price: 150_000,
            max_price: 400_000,
            min_bedrooms: 2,
            acceptable_conditions: default_acceptable_conditions(),
        }
    }
}

impl SearchCriteria {
    pub fn price_in_range(&self, price: i64) -> bool {
        price >= self.min_price && price <= self.max_price
    }

    /// Unknown bedroom counts pass; portals often omit them from the card.
    pub fn enough_bedrooms(&self, bedrooms: Option<i64>) -> bool {
        bedrooms.map_or(true, |b| b >= self.min_bedrooms)
    }

    pub fn condition_ok(&self, condition: Condition) -> bool {
        condition == Condition::Unknown || self.acceptable_conditions.contains(&condition)
    }
}

/// Applies the threshold checks and classifies each surviving listing's condition.
pub fn filter_listings(listings: Vec<Listing>, criteria: &SearchCriteria) -> Vec<Listing> {
    listings
        .into_iter()
        .filter_map(|mut listing| {
            if !criteria.price_in_range(listing.price) {
                return None;
            }
            if !criteria.enough_bedrooms(listing.bedrooms) {
                return None;
            }

            let text = format!("{} {}", listing.description, listing.description_en);
            listing.condition = determine_condition(&text);

            criteria.condition_ok(listing.condition).then_some(listing)
        })
        .collect()
}
