//! Data models for the travel advisor
//!
//! This module contains the core domain models organized by concern:
//! - Profile: Traveller preferences and validated ranges
//! - Weather: Daily forecasts and the search horizon
//! - Flight / Hotel: Pre-fetched travel options
//! - Window: Scored candidate trips and the final recommendation

pub mod flight;
pub mod hotel;
pub mod profile;
pub mod weather;
pub mod window;

// Re-export all public types for convenient access
pub use flight::{DepartureBucket, FlightOption};
pub use hotel::{HotelOption, RatingTier};
pub use profile::{
    BudgetRange, RainTolerance, StormTolerance, TemperatureRange, UserProfile, UserProfileBuilder,
};
pub use weather::{RainDamping, StormPeriod, StormThresholds, WeatherDay, WeatherHorizon};
pub use window::{
    Category, CategoryScores, Explanation, RejectedWindow, TravelRecommendation, TravelWindow,
    WindowRating,
};
