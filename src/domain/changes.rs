// src/domain/changes.rs

use crate::domain::listing::Listing;
use serde::Serialize;

/// The stored state of a listing we are tracking, as read back from `listings`.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedListing {
    pub id: String,
    pub price: i64,
}

/// A price movement between two observations of the same listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceChange {
    pub listing_id: String,
    pub title: String,
    pub url: String,
    pub previous: i64,
    pub current: i64,
}

impl PriceChange {
    /// Negative when the price went down.
    pub fn delta(&self) -> i64 {
        self.current - self.previous
    }

    pub fn is_drop(&self) -> bool {
        self.current < self.previous
    }
}

impl TrackedListing {
    /// Compares the stored price with a newly scraped version of the listing.
    pub fn diff(&self, new: &Listing) -> Option<PriceChange> {
        if self.price == new.price {
            return None;
        }
        Some(PriceChange {
            listing_id: self.id.clone(),
            title: new.title.clone(),
            url: new.url.clone(),
            previous: self.price,
            current: new.price,
        })
    }
}

/// The most recent movement in a stored listing's history, if it ever moved.
pub fn latest_change(listing: &Listing) -> Option<PriceChange> {
    let [.., before, last] = listing.price_history.as_slice() else {
        return None;
    };
    (before.price != last.price).then(|| PriceChange {
        listing_id: listing.id.clone(),
        title: listing.title.clone(),
        url: listing.url.clone(),
        previous: before.price,
        current: last.price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::{NewListing, PricePoint, Source};
    use chrono::NaiveDate;

    fn scraped(price: i64) -> Listing {
        let now = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Listing::new(
            NewListing {
                source: Source::Immobiliare,
                title: "Villa con giardino".into(),
                description: String::new(),
                description_en: String::new(),
                price,
                size_sqm: Some(120),
                bedrooms: Some(4),
                location: "Tropea, Calabria".into(),
                url: "https://www.immobiliare.it/annunci/42/".into(),
                image_urls: vec![],
            },
            now,
        )
    }

    #[test]
    fn same_price_is_no_change() {
        let listing = scraped(300_000);
        let tracked = TrackedListing {
            id: listing.id.clone(),
            price: 300_000,
        };
        assert_eq!(tracked.diff(&listing), None);
    }

    #[test]
    fn price_drop_is_reported_with_delta() {
        let listing = scraped(285_000);
        let tracked = TrackedListing {
            id: listing.id.clone(),
            price: 300_000,
        };
        let change = tracked.diff(&listing).unwrap();
        assert_eq!(change.previous, 300_000);
        assert_eq!(change.current, 285_000);
        assert_eq!(change.delta(), -15_000);
        assert!(change.is_drop());
        assert_eq!(change.listing_id, listing.id);
    }

    #[test]
    fn price_increase_is_not_a_drop() {
        let listing = scraped(310_000);
        let tracked = TrackedListing {
            id: listing.id.clone(),
            price: 300_000,
        };
        let change = tracked.diff(&listing).unwrap();
        assert_eq!(change.delta(), 10_000);
        assert!(!change.is_drop());
    }

    #[test]
    fn change_carries_the_scraped_title() {
        let mut listing = scraped(290_000);
        listing.title = "Villa con giardino, prezzo ribassato".into();
        let tracked = TrackedListing {
            id: listing.id.clone(),
            price: 300_000,
        };
        let change = tracked.diff(&listing).unwrap();
        assert_eq!(change.title, "Villa con giardino, prezzo ribassato");
        assert_eq!(change.url, listing.url);
    }

    #[test]
    fn latest_change_reads_last_two_points() {
        let mut listing = scraped(280_000);
        assert_eq!(latest_change(&listing), None);

        let first = listing.price_history[0].clone();
        listing.price_history = vec![
            PricePoint { price: 300_000, ..first.clone() },
            PricePoint { price: 280_000, ..first },
        ];
        let change = latest_change(&listing).unwrap();
        assert_eq!((change.previous, change.current), (300_000, 280_000));
    }
}
