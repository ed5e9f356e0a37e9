//! Recommendation synthesis
//!
//! Ties the window generator, the scorers and the ranker together: every
//! candidate window gets its weather slice scored, its best flight and hotel
//! picked, and an explanation trail recorded before the ranker splits the
//! set into best, alternatives and rejected windows.

use crate::AdvisorError;
use crate::config::{AdvisorConfig, RankingConfig, ScoringConfig};
use crate::models::{
    Category, CategoryScores, FlightOption, HotelOption, TravelRecommendation, TravelWindow,
    UserProfile, WeatherDay, WeatherHorizon,
};
use crate::planner::ranker::{Ranker, Ranking, ScoredOption, select_best};
use crate::planner::scoring::{
    Assessment, hotel_priority_shortfall, score_flight_option, score_hotel_for_window,
    score_weather_compatibility,
};
use crate::planner::windows::{DateWindow, generate_windows};
use crate::planner::CategoryWeights;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Per-request search parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HorizonParams {
    /// Preferred start date; starts are limited to the profile's flexibility around it
    #[serde(default)]
    pub anchor: Option<NaiveDate>,
    /// Overrides the configured composite weights
    #[serde(default)]
    pub weights: Option<CategoryWeights>,
}

/// Builds recommendations with a fixed set of tunables
#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    scoring: ScoringConfig,
    ranking: RankingConfig,
}

impl Synthesizer {
    #[must_use]
    pub fn new(scoring: ScoringConfig, ranking: RankingConfig) -> Self {
        Self { scoring, ranking }
    }

    #[must_use]
    pub fn from_config(config: &AdvisorConfig) -> Self {
        Self::new(config.scoring.clone(), config.ranking.clone())
    }

    /// Score every candidate window and select the recommendation
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(
            trip_length = profile.trip_length_days(),
            weather_days = weather_days.len(),
            flights = flights.len(),
            hotels = hotels.len()
        )
    )]
    pub fn synthesize(
        &self,
        profile: &UserProfile,
        weather_days: &[WeatherDay],
        flights: &[FlightOption],
        hotels: &[HotelOption],
        params: &HorizonParams,
    ) -> crate::Result<TravelRecommendation> {
        for (index, flight) in flights.iter().enumerate() {
            flight.validate(&format!("flights[{index}]"))?;
        }
        for (index, hotel) in hotels.iter().enumerate() {
            hotel.validate(&format!("hotels[{index}]"))?;
        }
        let horizon = WeatherHorizon::new(weather_days.to_vec())?;

        let weights = params.weights.unwrap_or(self.ranking.weights);
        let ranker = Ranker::new(weights, &self.ranking)?;

        let candidates = generate_windows(
            &horizon.dates(),
            profile.trip_length_days(),
            profile.flexibility_days(),
            params.anchor,
        );
        if candidates.is_empty() {
            warn!(
                horizon_days = horizon.len(),
                trip_length = profile.trip_length_days(),
                "no candidate windows fit the horizon"
            );
            return Err(AdvisorError::NoFeasibleWindow {
                horizon_days: horizon.len(),
                trip_length_days: profile.trip_length_days(),
                anchor: params.anchor,
                flexibility_days: profile.flexibility_days(),
            });
        }

        debug!("Evaluating {} candidate windows", candidates.len());

        let windows = candidates
            .iter()
            .map(|candidate| self.evaluate_window(candidate, &horizon, profile, flights, hotels))
            .collect::<crate::Result<Vec<_>>>()?;

        let ranking = ranker.rank(windows)?;
        if let Some(shortfall) = &ranking.shortfall {
            warn!(
                best_start = %ranking.best.start,
                %shortfall,
                "no window met every requirement"
            );
        }
        let reasoning = Self::reasoning_for(&ranking.best, profile, ranking.shortfall.as_deref());
        let why_not = self.why_not(&ranking, &horizon);

        info!(
            best_start = %ranking.best.start,
            composite = ranking.best.composite(),
            alternatives = ranking.alternatives.len(),
            rejected = ranking.rejected.len(),
            "Recommendation ready"
        );

        Ok(TravelRecommendation {
            best: ranking.best,
            alternatives: ranking.alternatives,
            rejected: ranking.rejected,
            reasoning,
            why_not,
            shortfall: ranking.shortfall,
        })
    }

    fn evaluate_window(
        &self,
        candidate: &DateWindow,
        horizon: &WeatherHorizon,
        profile: &UserProfile,
        flights: &[FlightOption],
        hotels: &[HotelOption],
    ) -> crate::Result<TravelWindow> {
        let days = horizon.slice(candidate.start, candidate.end).ok_or_else(|| {
            AdvisorError::validation(
                "weather_days",
                format!(
                    "no forecast coverage for {}..{}",
                    candidate.start, candidate.end
                ),
            )
        })?;

        let weather = score_weather_compatibility(days, profile, &self.scoring);
        let storm_days: Vec<NaiveDate> = days
            .iter()
            .filter(|day| day.is_storm(&self.scoring.storm))
            .map(|day| day.date)
            .collect();

        let (flight_pool, excluded_flights): (Vec<_>, Vec<_>) =
            flights_for_window(flights, candidate, profile.flexibility_days())
                .into_iter()
                .map(|flight| ScoredOption {
                    option: flight,
                    assessment: score_flight_option(flight, profile, &self.scoring),
                })
                .partition(|scored| !scored.assessment.excluded);

        let mut filtered_hotels = Vec::new();
        let hotel_pool: Vec<_> = hotels
            .iter()
            .filter(|hotel| hotel.is_available(candidate.start, candidate.end))
            .filter(|hotel| match hotel_priority_shortfall(hotel, profile, &self.scoring) {
                Some(reason) => {
                    filtered_hotels.push((hotel.name.clone(), reason));
                    false
                }
                None => true,
            })
            .map(|hotel| ScoredOption {
                option: hotel,
                assessment: score_hotel_for_window(hotel, profile, storm_days.len(), &self.scoring),
            })
            .collect();

        let best_flight = select_best(&flight_pool, |flight| flight.price);
        let best_hotel = select_best(&hotel_pool, |hotel| hotel.nightly_price);

        let flight_assessment = best_flight.map_or_else(Assessment::no_options, |f| f.assessment.clone());
        let hotel_assessment = best_hotel.map_or_else(Assessment::no_options, |h| h.assessment.clone());

        let scores = CategoryScores {
            weather: weather.score,
            flight: flight_assessment.score,
            hotel: hotel_assessment.score,
        };

        let mut window = TravelWindow::new(
            candidate.start,
            candidate.end,
            scores,
            best_flight.map(|f| f.option.clone()),
            best_hotel.map(|h| h.option.clone()),
        )
        .with_candidates(flight_pool.len(), hotel_pool.len())
        .with_storm_days(storm_days);

        for reason in weather.reasons {
            window.explain(Category::Weather, reason);
        }

        if let Some(flight) = best_flight {
            window.explain(
                Category::Flight,
                format!(
                    "best of {}: {} departing {}",
                    flight_pool.len(),
                    flight.option.label(),
                    flight.option.departure_date
                ),
            );
            let delay = (flight.option.departure_date - candidate.start).num_days();
            if delay > 0 {
                window.explain(
                    Category::Flight,
                    format!("departs {delay} day(s) after the window opens"),
                );
            }
        }
        for reason in flight_assessment.reasons {
            window.explain(Category::Flight, reason);
        }
        for excluded in &excluded_flights {
            warn!(
                flight = %excluded.option.label(),
                date = %excluded.option.departure_date,
                "flight excluded"
            );
            for reason in &excluded.assessment.reasons {
                window.explain(
                    Category::Flight,
                    format!("excluded {}: {reason}", excluded.option.label()),
                );
            }
        }

        if let Some(hotel) = best_hotel {
            window.explain(
                Category::Hotel,
                format!("best of {}: {}", hotel_pool.len(), hotel.option.name),
            );
        }
        for reason in hotel_assessment.reasons {
            window.explain(Category::Hotel, reason);
        }
        for (name, reason) in filtered_hotels {
            window.explain(Category::Hotel, format!("filtered {name}: {reason}"));
        }

        debug!(
            start = %window.start,
            weather = window.scores.weather,
            flight = window.scores.flight,
            hotel = window.scores.hotel,
            "scored window"
        );

        Ok(window)
    }

    /// Templated reasons for recommending `best`
    fn reasoning_for(
        best: &TravelWindow,
        profile: &UserProfile,
        shortfall: Option<&str>,
    ) -> Vec<String> {
        let mut reasoning = Vec::new();

        if let Some(shortfall) = shortfall {
            reasoning.push(format!(
                "No window met every requirement; these dates are the strongest available ({shortfall})"
            ));
        }

        let weather_summary = best
            .reasons_for(Category::Weather)
            .next()
            .unwrap_or("no weather data available");
        let weather_quality = match best.scores.weather {
            s if s >= 85.0 => "excellent",
            s if s >= 70.0 => "favorable",
            _ => "acceptable",
        };
        reasoning.push(format!("Weather is {weather_quality}: {weather_summary}"));

        if best.storm_days.is_empty() {
            reasoning.push(format!(
                "Dates {} avoid all forecast storms",
                best.span_label()
            ));
        } else {
            reasoning.push(format!(
                "{} storm day(s) fall inside {}; other windows scored lower overall",
                best.storm_days.len(),
                best.span_label()
            ));
        }

        match &best.flight {
            Some(flight) => {
                let stops = match flight.stops {
                    0 => "nonstop".to_string(),
                    1 => "1 stop".to_string(),
                    n => format!("{n} stops"),
                };
                let budget = profile.flight_budget();
                let fit = match profile.flight_target() {
                    Some(target) if flight.price <= target => {
                        format!("well within your ${target:.0} target")
                    }
                    _ if flight.price <= budget.max => {
                        format!("within your ${:.0} maximum", budget.max)
                    }
                    _ => format!("over your ${:.0} budget", budget.max),
                };
                reasoning.push(format!(
                    "{} at ${:.0} ({fit}), {stops}, {} departure",
                    flight.label(),
                    flight.price,
                    flight.departure_bucket
                ));
            }
            None => reasoning.push(format!(
                "No flights within your ${:.0} budget for this window; consider another date or a higher budget",
                profile.flight_budget().max
            )),
        }

        match &best.hotel {
            Some(hotel) => {
                let mut line = format!("{} at ${:.0}/night", hotel.name, hotel.nightly_price);
                if let Some(program) = &hotel.loyalty_program {
                    if best
                        .reasons_for(Category::Hotel)
                        .any(|reason| reason.contains("loyalty points"))
                    {
                        line.push_str(&format!(", earning {program} points"));
                    }
                }
                if let Some(stars) = hotel.star_rating {
                    line.push_str(&format!(", {stars:.1}-star comfort"));
                }
                if hotel.storm_discount && !best.storm_days.is_empty() {
                    line.push_str(", with a storm-period discount");
                }
                reasoning.push(line);
            }
            None => reasoning.push(
                "No lodging meeting your safety and comfort priorities is available for these dates"
                    .to_string(),
            ),
        }

        reasoning.push(format!(
            "Composite score {:.1}/100 ({}) with weather {:.0}, flight {:.0}, hotel {:.0}",
            best.composite(),
            best.rating(),
            best.scores.weather,
            best.scores.flight,
            best.scores.hotel
        ));

        reasoning
    }

    /// Summary of why the other periods lost out
    fn why_not(&self, ranking: &Ranking, horizon: &WeatherHorizon) -> String {
        let mut notes = Vec::new();

        let storm_periods = horizon.storm_periods(&self.scoring.storm);
        if !storm_periods.is_empty() {
            let spans: Vec<String> = storm_periods.iter().map(ToString::to_string).collect();
            notes.push(format!(
                "Storm periods ({}) were penalised for weather safety",
                spans.join(", ")
            ));
        }

        let stranded = ranking
            .rejected
            .iter()
            .filter(|r| !r.window.has_transport_and_lodging())
            .count();
        if stranded > 0 {
            notes.push(format!(
                "{stranded} window(s) lacked flight or hotel options"
            ));
        }

        let scored: Vec<&TravelWindow> = ranking
            .rejected
            .iter()
            .map(|r| &r.window)
            .filter(|w| w.has_transport_and_lodging())
            .collect();
        let weak_weather = scored.iter().filter(|w| w.scores.weather < 50.0).count();
        let weak_flights = scored.iter().filter(|w| w.scores.flight < 60.0).count();
        let weak_hotels = scored.iter().filter(|w| w.scores.hotel < 60.0).count();

        if weak_weather > 0 {
            notes.push(format!("{weak_weather} window(s) had poor weather"));
        }
        if weak_flights > 0 {
            notes.push(format!(
                "{weak_flights} window(s) had costly or inconvenient flights"
            ));
        }
        if weak_hotels > 0 {
            notes.push(format!(
                "{weak_hotels} window(s) had weaker lodging options"
            ));
        }

        if notes.is_empty() {
            "Other periods were viable but scored lower on the combination of weather, pricing and schedule".to_string()
        } else {
            format!("{}.", notes.join(". "))
        }
    }
}

/// Score every window with default tunables.
///
/// Equivalent to `Synthesizer::default().synthesize(..)`.
pub fn synthesize_recommendation(
    profile: &UserProfile,
    weather_days: &[WeatherDay],
    flights: &[FlightOption],
    hotels: &[HotelOption],
    params: &HorizonParams,
) -> crate::Result<TravelRecommendation> {
    Synthesizer::default().synthesize(profile, weather_days, flights, hotels, params)
}

/// Flights departing on the window start; failing that, within the
/// flexibility after it while still inside the window
fn flights_for_window<'a>(
    flights: &'a [FlightOption],
    window: &DateWindow,
    flexibility_days: u32,
) -> Vec<&'a FlightOption> {
    let exact: Vec<_> = flights
        .iter()
        .filter(|flight| flight.departure_date == window.start)
        .collect();
    if !exact.is_empty() {
        return exact;
    }

    let latest = window.start + Duration::days(i64::from(flexibility_days));
    flights
        .iter()
        .filter(|flight| {
            flight.departure_date > window.start
                && flight.departure_date <= latest
                && flight.departure_date < window.end
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DepartureBucket;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn profile(flexibility: u32) -> UserProfile {
        UserProfile::builder()
            .preferred_temperature(72.0, 85.0)
            .budget(150.0, 300.0)
            .flight_budget(300.0, 600.0)
            .trip_length_days(3)
            .flexibility_days(flexibility)
            .build()
            .unwrap()
    }

    fn weather(days: u32) -> Vec<WeatherDay> {
        (1..=days)
            .map(|day| WeatherDay {
                date: date(day),
                temp_min: 70.0,
                temp_max: 80.0,
                precipitation: 0.0,
                precipitation_chance: None,
                wind_gust: 10.0,
                storm_warning: false,
                conditions: None,
            })
            .collect()
    }

    fn flight(day: u32, price: f64) -> FlightOption {
        FlightOption {
            origin: "SFO".to_string(),
            destination: "OGG".to_string(),
            departure_date: date(day),
            return_date: None,
            airline: None,
            price,
            duration_hours: 5.5,
            stops: 0,
            departure_bucket: DepartureBucket::Morning,
        }
    }

    fn hotel(price: f64) -> HotelOption {
        HotelOption {
            name: format!("Hotel {price}"),
            nightly_price: price,
            loyalty_program: None,
            amenities: Default::default(),
            storm_discount: false,
            available_from: None,
            available_until: None,
            star_rating: None,
            guest_rating: None,
        }
    }

    #[test]
    fn test_flexible_departure_fallback() {
        let flights = vec![flight(2, 400.0), flight(5, 400.0)];
        let window = DateWindow {
            start: date(1),
            end: date(4),
        };

        assert!(flights_for_window(&flights, &window, 0).is_empty());
        let flexible = flights_for_window(&flights, &window, 4);
        assert_eq!(flexible.len(), 1);
        assert_eq!(flexible[0].departure_date, date(2));
    }

    #[test]
    fn test_exact_departures_take_precedence() {
        let flights = vec![flight(1, 500.0), flight(2, 300.0)];
        let window = DateWindow {
            start: date(1),
            end: date(4),
        };
        let pool = flights_for_window(&flights, &window, 3);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].price, 500.0);
    }

    #[test]
    fn test_excluded_flights_are_explained() {
        let flights = vec![flight(1, 450.0), flight(1, 900.0), flight(2, 450.0), flight(3, 450.0)];
        let recommendation = synthesize_recommendation(
            &profile(0),
            &weather(5),
            &flights,
            &[hotel(200.0)],
            &HorizonParams::default(),
        )
        .unwrap();

        let first = recommendation
            .all_windows()
            .find(|w| w.start == date(1))
            .unwrap();
        assert_eq!(first.flight_candidates(), 1);
        assert!(first.reasons_for(Category::Flight).any(|r| r.starts_with("excluded SFO-OGG")));
    }

    #[test]
    fn test_priority_filtered_hotels_are_explained() {
        let cautious = UserProfile::builder()
            .preferred_temperature(72.0, 85.0)
            .budget(150.0, 300.0)
            .trip_length_days(3)
            .safety_priority(5)
            .build()
            .unwrap();
        let hostel = HotelOption {
            star_rating: Some(2.0),
            ..hotel(160.0)
        };
        let flights: Vec<_> = (1..=3).map(|day| flight(day, 250.0)).collect();

        let recommendation = synthesize_recommendation(
            &cautious,
            &weather(5),
            &flights,
            &[hostel, hotel(250.0)],
            &HorizonParams::default(),
        )
        .unwrap();

        let best = &recommendation.best;
        assert_eq!(best.hotel_candidates(), 1);
        assert_eq!(best.hotel().map(|h| h.name.as_str()), Some("Hotel 250"));
        assert!(
            best.reasons_for(Category::Hotel)
                .any(|r| r.starts_with("filtered Hotel 160: 2.0 stars"))
        );
    }

    #[test]
    fn test_weight_override_changes_composite() {
        let params = HorizonParams {
            anchor: None,
            weights: Some(CategoryWeights::new(1.0, 0.0, 0.0).unwrap()),
        };
        let flights: Vec<_> = (1..=3).map(|day| flight(day, 450.0)).collect();
        let recommendation =
            synthesize_recommendation(&profile(0), &weather(5), &flights, &[hotel(200.0)], &params)
                .unwrap();

        assert_eq!(recommendation.best.composite(), 100.0);
    }

    #[test]
    fn test_invalid_override_weights_are_rejected() {
        let params = HorizonParams {
            anchor: None,
            weights: Some(CategoryWeights {
                weather: 0.9,
                flight: 0.9,
                hotel: 0.9,
            }),
        };
        let err = synthesize_recommendation(&profile(0), &weather(5), &[], &[], &params).unwrap_err();
        assert_eq!(err.field(), Some("weights"));
    }

    #[test]
    fn test_invalid_flight_record_is_rejected() {
        let err = synthesize_recommendation(
            &profile(0),
            &weather(5),
            &[flight(1, 450.0), flight(2, -5.0)],
            &[],
            &HorizonParams::default(),
        )
        .unwrap_err();
        assert_eq!(err.field(), Some("flights[1].price"));
    }

    #[test]
    fn test_reasoning_mentions_choices() {
        let flights: Vec<_> = (1..=3).map(|day| flight(day, 450.0)).collect();
        let recommendation = synthesize_recommendation(
            &profile(0),
            &weather(5),
            &flights,
            &[hotel(200.0)],
            &HorizonParams::default(),
        )
        .unwrap();

        assert!(recommendation.reasoning[0].starts_with("Weather is excellent"));
        assert!(recommendation.reasoning.iter().any(|r| r.contains("SFO-OGG at $450")));
        assert!(recommendation.reasoning.iter().any(|r| r.contains("Hotel 200 at $200/night")));
        assert!(!recommendation.why_not.is_empty());
    }
}
