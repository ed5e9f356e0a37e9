//! Composite scoring, ordering and selection of travel windows

use crate::AdvisorError;
use crate::config::RankingConfig;
use crate::models::{CategoryScores, RejectedWindow, TravelWindow};
use crate::planner::Assessment;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use tracing::debug;

const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Relative weight of each category in the composite score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub weather: f64,
    pub flight: f64,
    pub hotel: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            weather: 1.0 / 3.0,
            flight: 1.0 / 3.0,
            hotel: 1.0 / 3.0,
        }
    }
}

impl CategoryWeights {
    /// Build validated weights
    pub fn new(weather: f64, flight: f64, hotel: f64) -> crate::Result<Self> {
        let weights = Self {
            weather,
            flight,
            hotel,
        };
        weights.validate()?;
        Ok(weights)
    }

    /// Weights must be non-negative and sum to 1
    pub fn validate(&self) -> crate::Result<()> {
        for (name, value) in [
            ("weather", self.weather),
            ("flight", self.flight),
            ("hotel", self.hotel),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AdvisorError::validation(
                    format!("weights.{name}"),
                    "must be a non-negative number",
                ));
            }
        }

        let sum = self.weather + self.flight + self.hotel;
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(AdvisorError::validation(
                "weights",
                format!("must sum to 1, got {sum}"),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn composite(&self, scores: &CategoryScores) -> f64 {
        self.weather * scores.weather + self.flight * scores.flight + self.hotel * scores.hotel
    }
}

/// An option together with its assessment
#[derive(Debug, Clone)]
pub struct ScoredOption<'a, T> {
    pub option: &'a T,
    pub assessment: Assessment,
}

/// Highest score wins; ties go to the lower price, then to input order
pub fn select_best<'s, 'a, T>(
    scored: &'s [ScoredOption<'a, T>],
    price: impl Fn(&T) -> f64,
) -> Option<&'s ScoredOption<'a, T>> {
    scored
        .iter()
        .enumerate()
        .min_by(|(left_index, left), (right_index, right)| {
            right
                .assessment
                .score
                .partial_cmp(&left.assessment.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| {
                    price(left.option)
                        .partial_cmp(&price(right.option))
                        .unwrap_or(Ordering::Equal)
                })
                .then_with(|| left_index.cmp(right_index))
        })
        .map(|(_, best)| best)
}

/// Outcome of ranking a set of windows
#[derive(Debug, Clone)]
pub struct Ranking {
    pub best: TravelWindow,
    pub alternatives: Vec<TravelWindow>,
    /// In ranking order
    pub rejected: Vec<RejectedWindow>,
    /// Rejection reason `best` would have had, when every window fell short
    pub shortfall: Option<String>,
}

/// Orders windows by composite score and selects best / alternatives / rejected
#[derive(Debug, Clone)]
pub struct Ranker {
    weights: CategoryWeights,
    max_alternatives: usize,
    min_acceptable_score: f64,
}

impl Ranker {
    pub fn new(weights: CategoryWeights, config: &RankingConfig) -> crate::Result<Self> {
        weights.validate()?;
        Ok(Self {
            weights,
            max_alternatives: config.max_alternatives,
            min_acceptable_score: config.min_acceptable_score,
        })
    }

    #[must_use]
    pub fn weights(&self) -> CategoryWeights {
        self.weights
    }

    #[must_use]
    pub fn composite(&self, scores: &CategoryScores) -> f64 {
        self.weights.composite(scores)
    }

    /// Composite descending, earlier start first on ties
    fn compare(left: &TravelWindow, right: &TravelWindow) -> Ordering {
        right
            .composite()
            .partial_cmp(&left.composite())
            .unwrap_or(Ordering::Equal)
            .then_with(|| left.start.cmp(&right.start))
    }

    /// Compute composites and sort into ranking order
    pub fn sort(&self, windows: &mut [TravelWindow]) {
        for window in windows.iter_mut() {
            window.set_composite(self.composite(&window.scores));
        }
        windows.sort_by(Self::compare);
    }

    /// Rank windows and split them into best, alternatives and rejected.
    ///
    /// When every window is rejected the top-ranked one is still returned as
    /// `best`, with its rejection reason moved to [`Ranking::shortfall`].
    pub fn rank(&self, mut windows: Vec<TravelWindow>) -> crate::Result<Ranking> {
        if windows.is_empty() {
            return Err(AdvisorError::validation(
                "windows",
                "at least one window is required for ranking",
            ));
        }
        self.sort(&mut windows);

        let mut best: Option<TravelWindow> = None;
        let mut alternatives = Vec::new();
        let mut pending = Vec::new();
        let mut selected_spans = BTreeSet::new();

        for window in windows {
            if let Some(reason) = self.rejection_reason(&window) {
                pending.push((window, reason));
                continue;
            }

            if !selected_spans.insert((window.start, window.end)) {
                pending.push((
                    window,
                    "duplicate of an already selected date span".to_string(),
                ));
                continue;
            }

            if best.is_none() {
                best = Some(window);
            } else if alternatives.len() < self.max_alternatives {
                alternatives.push(window);
            } else {
                let (category, score) = window.scores.lowest();
                let reason = format!(
                    "outranked by {} higher-scoring window(s); weakest category: {category} at {score:.1}/100",
                    1 + alternatives.len()
                );
                pending.push((window, reason));
            }
        }

        let mut shortfall = None;
        let best = match best {
            Some(best) => best,
            None => {
                // pending is in ranking order and holds every window here
                let (window, reason) = pending.remove(0);
                debug!(start = %window.start, %reason, "no acceptable window; keeping the strongest");
                shortfall = Some(reason);
                window
            }
        };

        Ok(Ranking {
            best,
            alternatives,
            rejected: pending
                .into_iter()
                .map(|(window, reason)| Self::reject(window, reason))
                .collect(),
            shortfall,
        })
    }

    fn rejection_reason(&self, window: &TravelWindow) -> Option<String> {
        if !window.has_transport_and_lodging() {
            let missing = if window.flight_candidates == 0 && window.hotel_candidates == 0 {
                "no flights or hotels"
            } else if window.flight_candidates == 0 {
                "no flights"
            } else {
                "no hotels"
            };
            return Some(format!("no transport/lodging options ({missing})"));
        }

        if window.composite() < self.min_acceptable_score {
            let (category, score) = window.scores.lowest();
            return Some(format!(
                "composite {:.1} below minimum {:.1}; weakest category: {category} at {score:.1}/100",
                window.composite(),
                self.min_acceptable_score
            ));
        }

        None
    }

    fn reject(mut window: TravelWindow, reason: String) -> RejectedWindow {
        window.mark_rejected();
        debug!(start = %window.start, composite = window.composite(), %reason, "window rejected");
        RejectedWindow { window, reason }
    }
}
