//! Recommendation scenarios: everything one synthesis run needs
//!
//! A scenario bundles the traveller profile with already-fetched weather,
//! flight and hotel records. Scenarios are read from JSON files or built
//! from the sample fixture used by the `demo` command.

use crate::models::{
    DepartureBucket, FlightOption, HotelOption, StormTolerance, UserProfile, WeatherDay,
};
use crate::planner::HorizonParams;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::info;

/// Input for one recommendation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub profile: UserProfile,
    pub weather_days: Vec<WeatherDay>,
    #[serde(default)]
    pub flights: Vec<FlightOption>,
    #[serde(default)]
    pub hotels: Vec<HotelOption>,
    #[serde(default)]
    pub params: HorizonParams,
}

impl Scenario {
    /// Load a scenario from a JSON file
    pub fn from_path(path: &Path) -> crate::Result<Self> {
        info!("Loading scenario from: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let scenario: Scenario = serde_json::from_str(&content)?;
        info!(
            "Loaded scenario with {} weather days, {} flights, {} hotels",
            scenario.weather_days.len(),
            scenario.flights.len(),
            scenario.hotels.len()
        );
        Ok(scenario)
    }

    /// Thirty day Maui sample starting at `start`.
    ///
    /// Days 18-21 are a storm period and every seventh day is rainy. Flights
    /// only depart between days 7 and 16, so early and late windows have no
    /// transport and are rejected.
    pub fn sample(start: NaiveDate) -> crate::Result<Self> {
        let profile = UserProfile::builder()
            .preferred_temperature(75.0, 85.0)
            .budget(180.0, 350.0)
            .flight_budget(400.0, 850.0)
            .trip_length_days(7)
            .flexibility_days(4)
            .loyalty_program("marriott_bonvoy")
            .storm_tolerance(StormTolerance::Avoid)
            .preferred_departure(DepartureBucket::Morning)
            .accepts_red_eye(false)
            .safety_priority(4)
            .comfort_priority(4)
            .build()?;

        Ok(Self {
            profile,
            weather_days: sample_weather(start),
            flights: sample_flights(start),
            hotels: sample_hotels(start),
            params: HorizonParams::default(),
        })
    }
}

fn sample_weather(start: NaiveDate) -> Vec<WeatherDay> {
    (0..30)
        .map(|offset| {
            let date = start + Duration::days(offset);
            match offset {
                18..=21 => WeatherDay {
                    date,
                    temp_min: 70.0,
                    temp_max: 78.0,
                    precipitation: 1.2,
                    precipitation_chance: Some(90),
                    wind_gust: 42.0,
                    storm_warning: true,
                    conditions: Some("stormy".to_string()),
                },
                _ if offset % 7 == 0 => WeatherDay {
                    date,
                    temp_min: 72.0,
                    temp_max: 79.0,
                    precipitation: 0.3,
                    precipitation_chance: Some(70),
                    wind_gust: 18.0,
                    storm_warning: false,
                    conditions: Some("rainy".to_string()),
                },
                _ => WeatherDay {
                    date,
                    temp_min: 73.0,
                    temp_max: 81.0,
                    precipitation: 0.05,
                    precipitation_chance: Some(10),
                    wind_gust: 12.0,
                    storm_warning: false,
                    conditions: Some("sunny".to_string()),
                },
            }
        })
        .collect()
}

fn sample_flights(start: NaiveDate) -> Vec<FlightOption> {
    let flight = |departure_date: NaiveDate,
                  airline: &str,
                  price: f64,
                  stops: u8,
                  duration_hours: f32,
                  hour: u32| FlightOption {
        origin: "SFO".to_string(),
        destination: "OGG".to_string(),
        departure_date,
        return_date: Some(departure_date + Duration::days(7)),
        airline: Some(airline.to_string()),
        price,
        duration_hours,
        stops,
        departure_bucket: DepartureBucket::from_hour(hour),
    };

    let mut flights = Vec::new();
    for offset in [7, 8, 9, 10, 11, 12, 14, 15, 16] {
        let date = start + Duration::days(offset);
        let weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);

        flights.push(flight(date, "United Airlines", 725.0, 1, 7.5, 14));
        flights.push(flight(date, "Spirit Airlines", 630.0, 1, 9.0, 11));
        flights.push(flight(
            date,
            "Hawaiian Airlines",
            if weekend { 720.0 } else { 620.0 },
            0,
            5.5,
            10,
        ));
        if offset % 2 == 0 {
            flights.push(flight(
                date,
                "United Airlines",
                if weekend { 640.0 } else { 540.0 },
                1,
                8.5,
                6,
            ));
        }
        if offset == 10 {
            flights.push(flight(date, "Hawaiian Airlines", 1150.0, 0, 5.5, 9));
        }
    }
    flights
}

fn sample_hotels(start: NaiveDate) -> Vec<HotelOption> {
    vec![
        HotelOption {
            name: "Wailea Beach Resort - Marriott".to_string(),
            nightly_price: 295.0,
            loyalty_program: Some("marriott_bonvoy".to_string()),
            amenities: amenities(&["beach_access", "pool", "restaurant", "spa"]),
            storm_discount: false,
            available_from: None,
            available_until: None,
            star_rating: Some(4.0),
            guest_rating: Some(4.4),
        },
        HotelOption {
            name: "Andaz Maui at Wailea".to_string(),
            nightly_price: 265.0,
            loyalty_program: Some("world_of_hyatt".to_string()),
            amenities: amenities(&["beach_access", "pool", "restaurant"]),
            storm_discount: false,
            available_from: Some(start + Duration::days(5)),
            available_until: Some(start + Duration::days(25)),
            star_rating: Some(4.5),
            guest_rating: Some(4.7),
        },
        HotelOption {
            name: "Hilton Maui Resort & Spa".to_string(),
            nightly_price: 215.0,
            loyalty_program: Some("hilton_honors".to_string()),
            amenities: amenities(&["beach_access", "pool"]),
            storm_discount: true,
            available_from: None,
            available_until: None,
            star_rating: Some(3.5),
            guest_rating: Some(4.1),
        },
    ]
}

fn amenities(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}
