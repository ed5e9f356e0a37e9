//! Travel window planning engine
//!
//! - Scoring: per-category 0-100 scores with reasons
//! - Windows: candidate date spans over the forecast horizon
//! - Ranker: composite scores, ordering and selection
//! - Synthesis: orchestration into a [`crate::models::TravelRecommendation`]

pub mod ranker;
pub mod scoring;
pub mod synthesis;
pub mod windows;

pub use ranker::{CategoryWeights, Ranker, Ranking, ScoredOption, select_best};
pub use scoring::{
    Assessment, hotel_priority_shortfall, score_flight_option, score_hotel_for_window,
    score_hotel_option, score_weather_compatibility,
};
pub use synthesis::{HorizonParams, Synthesizer, synthesize_recommendation};
pub use windows::{DateWindow, generate_windows};
