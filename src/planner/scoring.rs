//! Scoring functions for weather, flights and hotels
//!
//! Every scorer is a pure function of its input record, the traveller
//! profile and the [`ScoringConfig`] tunables, and returns a 0-100 score
//! together with the reasons that produced it.

use crate::config::ScoringConfig;
use crate::models::{
    DepartureBucket, FlightOption, HotelOption, RainTolerance, RatingTier, StormTolerance,
    UserProfile, WeatherDay,
};
use chrono::{Datelike, Weekday};
use serde::Serialize;

/// Normalised score with the reasoning behind it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    /// Score in 0-100
    pub score: f64,
    /// Human-readable reasons, in the order they were applied
    pub reasons: Vec<String>,
    /// Option must not be considered at all (e.g. far over budget)
    pub excluded: bool,
}

impl Assessment {
    fn scored(score: f64, reasons: Vec<String>) -> Self {
        // non-finite scores count as 0 so the ranking order stays total
        let score = if score.is_finite() {
            score.clamp(0.0, 100.0)
        } else {
            0.0
        };
        Self {
            score,
            reasons,
            excluded: false,
        }
    }

    fn exclude(reason: String) -> Self {
        Self {
            score: 0.0,
            reasons: vec![reason],
            excluded: true,
        }
    }

    /// Score for a category with nothing to choose from
    #[must_use]
    pub fn no_options() -> Self {
        Self::scored(0.0, vec!["no options available".to_string()])
    }
}

/// Score how well a run of forecast days suits the traveller.
///
/// A day is comfortable when its high falls inside the preferred range and
/// it is not storm-flagged. A comfortable day with a reported rain chance
/// counts only for the damping factor of the traveller's rain tolerance.
/// Each storm day additionally costs a penalty that depends on the
/// profile's storm tolerance.
#[must_use]
pub fn score_weather_compatibility(
    days: &[WeatherDay],
    profile: &UserProfile,
    config: &ScoringConfig,
) -> Assessment {
    if days.is_empty() {
        return Assessment::scored(0.0, vec!["no weather data available".to_string()]);
    }

    let range = profile.preferred_temperature();
    let mut comfortable = 0usize;
    let mut credit = 0.0;
    let mut damped_days = 0usize;
    let mut storm_reasons = Vec::new();

    for day in days {
        if day.is_storm(&config.storm) {
            storm_reasons.push(format!(
                "storm expected on {} ({})",
                day.date,
                day.storm_cause(&config.storm)
            ));
        } else if range.contains(day.temp_max) {
            comfortable += 1;
            let factor = day
                .precipitation_chance
                .map_or(1.0, |chance| rain_factor(profile.rain_tolerance(), chance, config));
            if factor < 1.0 {
                damped_days += 1;
            }
            credit += factor;
        }
    }

    let (lowest_high, highest_high) = days.iter().fold(
        (f32::INFINITY, f32::NEG_INFINITY),
        |(low, high), day| (low.min(day.temp_max), high.max(day.temp_max)),
    );

    let total = days.len();
    let storm_days = storm_reasons.len();
    let penalty_per_day = match profile.storm_tolerance() {
        StormTolerance::Avoid => config.storm_penalty_per_day,
        StormTolerance::Tolerate => config.tolerated_storm_penalty_per_day,
    };

    #[allow(clippy::cast_precision_loss)]
    let score = 100.0 * credit / total as f64 - penalty_per_day * storm_days as f64;

    let mut reasons = vec![format!(
        "{comfortable}/{total} days comfortable (highs {lowest_high:.0}-{highest_high:.0}°F, preferred {:.0}-{:.0}°F)",
        range.min, range.max
    )];
    if storm_days == 0 {
        reasons.push("no storms expected".to_string());
    } else {
        reasons.extend(storm_reasons);
    }
    if damped_days > 0 {
        reasons.push(format!(
            "rain likely on {damped_days} otherwise comfortable day(s) ({} rain tolerance)",
            profile.rain_tolerance()
        ));
    }

    Assessment::scored(score, reasons)
}

fn rain_factor(tolerance: RainTolerance, chance: u8, config: &ScoringConfig) -> f64 {
    match tolerance {
        RainTolerance::Low => config.low_rain_tolerance.factor(chance),
        RainTolerance::Medium => config.medium_rain_tolerance.factor(chance),
        RainTolerance::High => 1.0,
    }
}

/// Score a single outbound flight against the flight budget and preferences
#[must_use]
pub fn score_flight_option(
    flight: &FlightOption,
    profile: &UserProfile,
    config: &ScoringConfig,
) -> Assessment {
    let budget = profile.flight_budget();
    let mut score = config.flight_base_score;
    let mut reasons = Vec::new();

    if flight.price > budget.max {
        let over_percent = percent_beyond(flight.price, budget.max)
            .filter(|percent| *percent <= config.flight_over_budget_tolerance * 100.0);
        let Some(over_percent) = over_percent else {
            return Assessment::exclude(format!(
                "${:.0} fare exceeds the ${:.0} budget by more than {:.0}%",
                flight.price,
                budget.max,
                config.flight_over_budget_tolerance * 100.0
            ));
        };
        score -= config.over_budget_penalty * over_percent;
        reasons.push(format!(
            "${:.0} fare is {over_percent:.0}% over the ${:.0} budget",
            flight.price, budget.max
        ));
    } else if let Some(target) = profile
        .flight_target()
        .filter(|target| flight.price <= *target)
    {
        score += config.flight_target_bonus;
        reasons.push(format!(
            "${:.0} fare at or under the ${target:.0} target",
            flight.price
        ));
    } else {
        reasons.push(format!(
            "${:.0} fare within the ${:.0} budget",
            flight.price, budget.max
        ));
    }

    match flight.stops {
        0 => reasons.push("nonstop".to_string()),
        1 => {
            score -= config.stop_penalty;
            reasons.push("1 stop".to_string());
        }
        stops => {
            score -= config.stop_penalty * f64::from(stops);
            reasons.push(format!("{stops} stops"));
        }
    }

    if f64::from(flight.duration_hours) > config.long_flight_hours {
        score -= config.long_flight_penalty;
        reasons.push(format!("long journey ({:.1} h)", flight.duration_hours));
    }

    if flight.departure_bucket == DepartureBucket::RedEye && !profile.accepts_red_eye() {
        score -= config.red_eye_penalty;
        reasons.push("red-eye departure".to_string());
    }

    if let Some(preferred) = profile.preferred_departure() {
        if preferred == flight.departure_bucket {
            score += config.departure_match_bonus;
            reasons.push(format!("departs in the preferred {preferred} slot"));
        } else {
            reasons.push(format!(
                "departs in the {}, not the preferred {preferred}",
                flight.departure_bucket
            ));
        }
    }

    if profile.prefers_weekday_departure() {
        let weekday = flight.departure_date.weekday();
        if matches!(weekday, Weekday::Fri | Weekday::Sat | Weekday::Sun) {
            score -= config.weekend_departure_penalty;
            reasons.push(format!("weekend departure ({weekday})"));
        } else {
            reasons.push(format!("weekday departure ({weekday})"));
        }
    }

    Assessment::scored(score, reasons)
}

/// Score a hotel outside the context of any window (no storm exposure)
#[must_use]
pub fn score_hotel_option(
    hotel: &HotelOption,
    profile: &UserProfile,
    config: &ScoringConfig,
) -> Assessment {
    score_hotel_for_window(hotel, profile, 0, config)
}

/// Score a hotel for a window containing `storm_days` storm-flagged days
#[must_use]
pub fn score_hotel_for_window(
    hotel: &HotelOption,
    profile: &UserProfile,
    storm_days: usize,
    config: &ScoringConfig,
) -> Assessment {
    let budget = profile.budget();
    let price = hotel.nightly_price;
    let mut score = config.hotel_base_score;
    let mut reasons = Vec::new();

    if price > budget.max {
        match percent_beyond(price, budget.max) {
            Some(over_percent) => {
                score -= config.out_of_budget_penalty * over_percent;
                reasons.push(format!(
                    "${price:.0}/night is {over_percent:.0}% over the ${:.0} nightly budget",
                    budget.max
                ));
            }
            None => {
                score = 0.0;
                reasons.push(format!(
                    "${price:.0}/night exceeds a ${:.0} nightly budget",
                    budget.max
                ));
            }
        }
    } else if price < budget.min {
        // budget.min > price >= 0 here, so the division is safe
        let under_percent = (budget.min - price) / budget.min * 100.0;
        score -= config.out_of_budget_penalty * under_percent;
        reasons.push(format!(
            "${price:.0}/night is {under_percent:.0}% under the ${:.0} minimum",
            budget.min
        ));
    } else {
        reasons.push(format!(
            "${price:.0}/night within the ${:.0}-${:.0} budget",
            budget.min, budget.max
        ));
    }

    if let Some(program) = &hotel.loyalty_program {
        if profile.is_loyalty_member(program) {
            score += config.loyalty_bonus;
            reasons.push(format!("earns {program} loyalty points"));
        }
    }

    if let Some(tier) = hotel.rating_tier() {
        score += match tier {
            RatingTier::Highly => config.highly_rated_bonus,
            RatingTier::Well => config.well_rated_bonus,
            RatingTier::Lower => -config.low_rating_penalty,
        };
        reasons.push(format!("{tier} ({})", rating_label(hotel)));
    }

    if hotel.storm_discount {
        if storm_days > 0 {
            score += config.storm_discount_bonus;
            reasons.push(format!(
                "storm discount applies ({storm_days} storm day(s) in window)"
            ));
        } else {
            reasons.push("storm discount not applicable".to_string());
        }
    }

    Assessment::scored(score, reasons)
}

/// Why a hotel falls short of the traveller's safety or comfort priority.
///
/// Only priorities at or above `strict_priority_level` filter, and only on
/// ratings the hotel actually reports.
#[must_use]
pub fn hotel_priority_shortfall(
    hotel: &HotelOption,
    profile: &UserProfile,
    config: &ScoringConfig,
) -> Option<String> {
    if profile.safety_priority() >= config.strict_priority_level {
        if let Some(stars) = hotel
            .star_rating
            .filter(|stars| *stars < config.safety_min_star_rating)
        {
            return Some(format!(
                "{stars:.1} stars is below the {:.1} required by safety priority {}",
                config.safety_min_star_rating,
                profile.safety_priority()
            ));
        }
    }

    if profile.comfort_priority() >= config.strict_priority_level {
        if let Some(guests) = hotel
            .guest_rating
            .filter(|guests| *guests < config.comfort_min_guest_rating)
        {
            return Some(format!(
                "guest rating {guests:.1} is below the {:.1} required by comfort priority {}",
                config.comfort_min_guest_rating,
                profile.comfort_priority()
            ));
        }
    }

    None
}

fn rating_label(hotel: &HotelOption) -> String {
    let mut parts = Vec::new();
    if let Some(stars) = hotel.star_rating {
        parts.push(format!("{stars:.1} stars"));
    }
    if let Some(guests) = hotel.guest_rating {
        parts.push(format!("guests {guests:.1}/5"));
    }
    parts.join(", ")
}

/// How far `price` sits above `limit`, in percent of `limit`; `None` for a zero limit
fn percent_beyond(price: f64, limit: f64) -> Option<f64> {
    (limit > 0.0).then(|| (price - limit) / limit * 100.0)
}
