//! Lodging records

use crate::error::AdvisorError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Coarse quality band derived from star and guest ratings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingTier {
    /// At least 4 stars and 4.5 from guests
    Highly,
    /// At least 3.5 stars and 4.0 from guests
    Well,
    /// Under 3 stars or under 3.5 from guests
    Lower,
}

impl fmt::Display for RatingTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatingTier::Highly => write!(f, "highly rated"),
            RatingTier::Well => write!(f, "well rated"),
            RatingTier::Lower => write!(f, "lower ratings"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelOption {
    pub name: String,
    /// Nightly rate in USD
    pub nightly_price: f64,
    #[serde(default)]
    pub loyalty_program: Option<String>,
    #[serde(default)]
    pub amenities: BTreeSet<String>,
    /// Rate is discounted because the stay overlaps forecast storms
    #[serde(default)]
    pub storm_discount: bool,
    /// First night the rate is bookable; open-ended when absent
    #[serde(default)]
    pub available_from: Option<NaiveDate>,
    /// Last night the rate is bookable; open-ended when absent
    #[serde(default)]
    pub available_until: Option<NaiveDate>,
    /// Official star rating, 0-5
    #[serde(default)]
    pub star_rating: Option<f32>,
    /// Average guest review score, 0-5
    #[serde(default)]
    pub guest_rating: Option<f32>,
}

impl HotelOption {
    /// Whether every night of `[start, end)` is bookable
    #[must_use]
    pub fn is_available(&self, start: NaiveDate, end: NaiveDate) -> bool {
        let last_night = end.pred_opt().unwrap_or(end);
        self.available_from.is_none_or(|from| from <= start)
            && self.available_until.is_none_or(|until| last_night <= until)
    }

    /// Quality band, or `None` when the ratings place it in no band
    #[must_use]
    pub fn rating_tier(&self) -> Option<RatingTier> {
        match (self.star_rating, self.guest_rating) {
            (Some(stars), Some(guests)) if stars >= 4.0 && guests >= 4.5 => Some(RatingTier::Highly),
            (Some(stars), Some(guests)) if stars >= 3.5 && guests >= 4.0 => Some(RatingTier::Well),
            (stars, guests)
                if stars.is_some_and(|s| s < 3.0) || guests.is_some_and(|g| g < 3.5) =>
            {
                Some(RatingTier::Lower)
            }
            _ => None,
        }
    }

    pub fn validate(&self, field: &str) -> crate::Result<()> {
        if self.name.trim().is_empty() {
            return Err(AdvisorError::validation(
                format!("{field}.name"),
                "cannot be empty",
            ));
        }
        if !self.nightly_price.is_finite() || self.nightly_price < 0.0 {
            return Err(AdvisorError::validation(
                format!("{field}.nightly_price"),
                "must be a non-negative amount",
            ));
        }
        for (name, rating) in [
            ("star_rating", self.star_rating),
            ("guest_rating", self.guest_rating),
        ] {
            if rating.is_some_and(|r| !(0.0..=5.0).contains(&r)) {
                return Err(AdvisorError::validation(
                    format!("{field}.{name}"),
                    "must be between 0 and 5",
                ));
            }
        }
        if let (Some(from), Some(until)) = (self.available_from, self.available_until) {
            if until < from {
                return Err(AdvisorError::validation(
                    format!("{field}.available_until"),
                    format!("{until} is before {from}"),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn hotel() -> HotelOption {
        HotelOption {
            name: "Wailea Beach Resort".to_string(),
            nightly_price: 280.0,
            loyalty_program: Some("marriott_bonvoy".to_string()),
            amenities: ["pool", "spa"].into_iter().map(String::from).collect(),
            storm_discount: false,
            available_from: None,
            available_until: None,
            star_rating: None,
            guest_rating: None,
        }
    }

    #[test]
    fn test_open_availability() {
        assert!(hotel().is_available(date(1), date(8)));
    }

    #[test]
    fn test_bounded_availability() {
        let mut bounded = hotel();
        bounded.available_from = Some(date(3));
        bounded.available_until = Some(date(9));

        // nights 3..=9 are bookable, so a stay ending on the 10th fits
        assert!(bounded.is_available(date(3), date(10)));
        assert!(!bounded.is_available(date(2), date(9)));
        assert!(!bounded.is_available(date(4), date(11)));
    }

    #[rstest]
    #[case::highly(Some(4.5), Some(4.8), Some(RatingTier::Highly))]
    #[case::well(Some(3.5), Some(4.2), Some(RatingTier::Well))]
    #[case::low_stars(Some(2.5), Some(4.2), Some(RatingTier::Lower))]
    #[case::low_guests(None, Some(3.0), Some(RatingTier::Lower))]
    #[case::middling(Some(3.0), Some(3.8), None)]
    #[case::unrated(None, None, None)]
    fn test_rating_tier(
        #[case] stars: Option<f32>,
        #[case] guests: Option<f32>,
        #[case] expected: Option<RatingTier>,
    ) {
        let mut rated = hotel();
        rated.star_rating = stars;
        rated.guest_rating = guests;
        assert_eq!(rated.rating_tier(), expected);
    }

    #[test]
    fn test_validation() {
        assert!(hotel().validate("hotels[0]").is_ok());

        let mut unnamed = hotel();
        unnamed.name = "  ".to_string();
        assert_eq!(
            unnamed.validate("hotels[1]").unwrap_err().field(),
            Some("hotels[1].name")
        );

        let mut inverted = hotel();
        inverted.available_from = Some(date(9));
        inverted.available_until = Some(date(3));
        assert_eq!(
            inverted.validate("hotels[2]").unwrap_err().field(),
            Some("hotels[2].available_until")
        );

        let mut overrated = hotel();
        overrated.guest_rating = Some(9.0);
        assert_eq!(
            overrated.validate("hotels[3]").unwrap_err().field(),
            Some("hotels[3].guest_rating")
        );
    }
}
