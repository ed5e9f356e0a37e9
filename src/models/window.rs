//! Candidate travel windows and the final recommendation

use crate::models::{FlightOption, HotelOption, WeatherDay, WeatherHorizon};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scored aspect of a trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Weather,
    Flight,
    Hotel,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Weather, Category::Flight, Category::Hotel];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Weather => write!(f, "weather"),
            Category::Flight => write!(f, "flight"),
            Category::Hotel => write!(f, "hotel"),
        }
    }
}

/// One reason attached to a window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub category: Category,
    pub reason: String,
}

/// Per-category scores, each 0-100
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryScores {
    pub weather: f64,
    pub flight: f64,
    pub hotel: f64,
}

impl CategoryScores {
    #[must_use]
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Weather => self.weather,
            Category::Flight => self.flight,
            Category::Hotel => self.hotel,
        }
    }

    /// Weakest category; ties resolve in weather, flight, hotel order
    #[must_use]
    pub fn lowest(&self) -> (Category, f64) {
        Category::ALL
            .iter()
            .map(|&category| (category, self.get(category)))
            .fold((Category::Weather, self.weather), |lowest, current| {
                if current.1 < lowest.1 { current } else { lowest }
            })
    }
}

/// Rating band for a composite score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowRating {
    /// Composite >= 80
    Excellent,
    /// Composite >= 65
    Good,
    /// Composite >= 50
    Fair,
    /// Composite < 50
    Poor,
}

impl WindowRating {
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 80.0 => WindowRating::Excellent,
            s if s >= 65.0 => WindowRating::Good,
            s if s >= 50.0 => WindowRating::Fair,
            _ => WindowRating::Poor,
        }
    }

    /// Get emoji representation of the rating
    #[must_use]
    pub fn emoji(&self) -> &'static str {
        match self {
            WindowRating::Excellent => "🟢",
            WindowRating::Good => "🟡",
            WindowRating::Fair => "🟠",
            WindowRating::Poor => "🔴",
        }
    }
}

impl fmt::Display for WindowRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowRating::Excellent => write!(f, "Excellent"),
            WindowRating::Good => write!(f, "Good"),
            WindowRating::Fair => write!(f, "Fair"),
            WindowRating::Poor => write!(f, "Poor"),
        }
    }
}

/// A scored candidate trip.
///
/// `end` is exclusive: the window covers `end - start` calendar days and the
/// traveller flies home on `end`. Weather is not owned; it is looked up in
/// the horizon by date through [`TravelWindow::weather_slice`].
///
/// Scores, picks and candidate counts are fixed once evaluated; only the
/// explanations, composite and rejection flag change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TravelWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub(crate) scores: CategoryScores,
    pub(crate) flight: Option<FlightOption>,
    pub(crate) hotel: Option<HotelOption>,
    pub(crate) flight_candidates: usize,
    pub(crate) hotel_candidates: usize,
    pub(crate) storm_days: Vec<NaiveDate>,
    composite: f64,
    explanations: Vec<Explanation>,
    rejected: bool,
}

impl TravelWindow {
    #[must_use]
    pub fn new(
        start: NaiveDate,
        end: NaiveDate,
        scores: CategoryScores,
        flight: Option<FlightOption>,
        hotel: Option<HotelOption>,
    ) -> Self {
        Self {
            start,
            end,
            scores,
            flight,
            hotel,
            flight_candidates: 0,
            hotel_candidates: 0,
            storm_days: Vec::new(),
            composite: 0.0,
            explanations: Vec::new(),
            rejected: false,
        }
    }

    /// Record how many viable options each category had to choose from
    #[must_use]
    pub(crate) fn with_candidates(mut self, flights: usize, hotels: usize) -> Self {
        self.flight_candidates = flights;
        self.hotel_candidates = hotels;
        self
    }

    #[must_use]
    pub(crate) fn with_storm_days(mut self, storm_days: Vec<NaiveDate>) -> Self {
        self.storm_days = storm_days;
        self
    }

    #[must_use]
    pub fn scores(&self) -> CategoryScores {
        self.scores
    }

    /// Chosen outbound flight, if any was viable
    #[must_use]
    pub fn flight(&self) -> Option<&FlightOption> {
        self.flight.as_ref()
    }

    /// Chosen hotel, if any was available
    #[must_use]
    pub fn hotel(&self) -> Option<&HotelOption> {
        self.hotel.as_ref()
    }

    #[must_use]
    pub fn flight_candidates(&self) -> usize {
        self.flight_candidates
    }

    #[must_use]
    pub fn hotel_candidates(&self) -> usize {
        self.hotel_candidates
    }

    /// Storm-flagged days inside the window, ascending
    #[must_use]
    pub fn storm_days(&self) -> &[NaiveDate] {
        &self.storm_days
    }

    /// Number of days (and hotel nights) covered
    #[must_use]
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Last calendar day spent at the destination
    #[must_use]
    pub fn last_day(&self) -> NaiveDate {
        self.end.pred_opt().unwrap_or(self.end)
    }

    #[must_use]
    pub fn composite(&self) -> f64 {
        self.composite
    }

    #[must_use]
    pub fn rating(&self) -> WindowRating {
        WindowRating::from_score(self.composite)
    }

    #[must_use]
    pub fn is_rejected(&self) -> bool {
        self.rejected
    }

    #[must_use]
    pub fn explanations(&self) -> &[Explanation] {
        &self.explanations
    }

    /// Reasons recorded for one category, in the order they were added
    pub fn reasons_for(&self, category: Category) -> impl Iterator<Item = &str> {
        self.explanations
            .iter()
            .filter(move |e| e.category == category)
            .map(|e| e.reason.as_str())
    }

    #[must_use]
    pub fn has_transport_and_lodging(&self) -> bool {
        self.flight_candidates > 0 && self.hotel_candidates > 0
    }

    /// Weather days this window covers
    #[must_use]
    pub fn weather_slice<'a>(&self, horizon: &'a WeatherHorizon) -> Option<&'a [WeatherDay]> {
        horizon.slice(self.start, self.end)
    }

    /// "Mar 01 - Mar 07"
    #[must_use]
    pub fn span_label(&self) -> String {
        format!(
            "{} - {}",
            self.start.format("%b %d"),
            self.last_day().format("%b %d")
        )
    }

    pub(crate) fn explain<S: Into<String>>(&mut self, category: Category, reason: S) {
        self.explanations.push(Explanation {
            category,
            reason: reason.into(),
        });
    }

    pub(crate) fn set_composite(&mut self, composite: f64) {
        self.composite = composite;
    }

    /// Flags the window as rejected; returns false if it already was
    pub(crate) fn mark_rejected(&mut self) -> bool {
        !std::mem::replace(&mut self.rejected, true)
    }
}

/// A window that was not recommended, with its primary reason
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedWindow {
    pub window: TravelWindow,
    pub reason: String,
}

/// Final recommendation handed back to the orchestration layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TravelRecommendation {
    pub best: TravelWindow,
    /// Score-descending, distinct from `best` and from each other
    pub alternatives: Vec<TravelWindow>,
    /// In ranking order
    pub rejected: Vec<RejectedWindow>,
    /// Templated reasons the best window was chosen
    pub reasoning: Vec<String>,
    /// Summary of why other periods lost out
    pub why_not: String,
    /// Set when no window met every requirement and `best` is only the
    /// strongest of the rejected ones
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortfall: Option<String>,
}

impl TravelRecommendation {
    /// Every evaluated window: best, alternatives, then rejected
    pub fn all_windows(&self) -> impl Iterator<Item = &TravelWindow> {
        std::iter::once(&self.best)
            .chain(self.alternatives.iter())
            .chain(self.rejected.iter().map(|r| &r.window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    #[test]
    fn test_lowest_category_tie_order() {
        let scores = CategoryScores {
            weather: 50.0,
            flight: 20.0,
            hotel: 20.0,
        };
        assert_eq!(scores.lowest(), (Category::Flight, 20.0));

        let even = CategoryScores {
            weather: 10.0,
            flight: 10.0,
            hotel: 10.0,
        };
        assert_eq!(even.lowest().0, Category::Weather);
    }

    #[test]
    fn test_window_span() {
        let window = TravelWindow::new(date(1), date(8), CategoryScores::default(), None, None);
        assert_eq!(window.duration_days(), 7);
        assert_eq!(window.last_day(), date(7));
        assert_eq!(window.span_label(), "Mar 01 - Mar 07");
    }

    #[test]
    fn test_evaluated_details() {
        let window = TravelWindow::new(date(1), date(8), CategoryScores::default(), None, None)
            .with_candidates(2, 0)
            .with_storm_days(vec![date(3)]);
        assert_eq!(window.flight_candidates(), 2);
        assert_eq!(window.hotel_candidates(), 0);
        assert!(!window.has_transport_and_lodging());
        assert_eq!(window.storm_days(), &[date(3)]);
        assert!(window.flight().is_none());
    }

    #[test]
    fn test_rejection_is_set_once() {
        let mut window = TravelWindow::new(date(1), date(8), CategoryScores::default(), None, None);
        assert!(!window.is_rejected());
        assert!(window.mark_rejected());
        assert!(!window.mark_rejected());
        assert!(window.is_rejected());
    }

    #[test]
    fn test_reasons_for_category() {
        let mut window = TravelWindow::new(date(1), date(8), CategoryScores::default(), None, None);
        window.explain(Category::Weather, "7/7 days within 70-85°F");
        window.explain(Category::Hotel, "no options available");
        window.explain(Category::Weather, "no storms expected");

        let weather: Vec<&str> = window.reasons_for(Category::Weather).collect();
        assert_eq!(weather, vec!["7/7 days within 70-85°F", "no storms expected"]);
        assert_eq!(window.reasons_for(Category::Flight).count(), 0);
    }

    #[test]
    fn test_rating_bands() {
        assert_eq!(WindowRating::from_score(92.0), WindowRating::Excellent);
        assert_eq!(WindowRating::from_score(65.0), WindowRating::Good);
        assert_eq!(WindowRating::from_score(55.0), WindowRating::Fair);
        assert_eq!(WindowRating::from_score(10.0), WindowRating::Poor);
    }
}
