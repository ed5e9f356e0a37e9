//! Travel Advisor - recommends when to travel to a destination
//!
//! This library scores forecast weather, flight and lodging options against a
//! traveller profile, ranks candidate date windows and explains the result.

pub mod config;
pub mod error;
pub mod models;
pub mod planner;
pub mod report;
pub mod scenario;

// Re-export core types for public API
pub use config::{AdvisorConfig, LoggingConfig, RankingConfig, ScoringConfig};
pub use error::AdvisorError;
pub use models::{
    BudgetRange, Category, CategoryScores, DepartureBucket, Explanation, FlightOption,
    HotelOption, RainDamping, RainTolerance, RatingTier, RejectedWindow, StormPeriod,
    StormThresholds, StormTolerance, TemperatureRange, TravelRecommendation, TravelWindow,
    UserProfile, UserProfileBuilder, WeatherDay, WeatherHorizon, WindowRating,
};
pub use planner::{
    Assessment, CategoryWeights, DateWindow, HorizonParams, Ranker, Synthesizer,
    generate_windows, hotel_priority_shortfall, score_flight_option, score_hotel_for_window,
    score_hotel_option, score_weather_compatibility, synthesize_recommendation,
};
pub use report::render_text;
pub use scenario::Scenario;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, AdvisorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
