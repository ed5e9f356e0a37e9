//! Configuration management for the travel advisor
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all scoring and ranking tunables.

use crate::AdvisorError;
use crate::models::{RainDamping, StormThresholds};
use crate::planner::CategoryWeights;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the travel advisor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// Scoring tunables
    #[serde(default)]
    pub scoring: ScoringConfig,
    /// Ranking and selection settings
    #[serde(default)]
    pub ranking: RankingConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Point values used by the scoring functions.
///
/// None of these magnitudes is a contract; they are tuned by config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Limits above which a day counts as stormy
    pub storm: StormThresholds,
    /// Weather points lost per storm day when storms are avoided
    pub storm_penalty_per_day: f64,
    /// Weather points lost per storm day when storms are tolerated
    pub tolerated_storm_penalty_per_day: f64,
    /// Rain-chance scaling for travellers with low rain tolerance
    pub low_rain_tolerance: RainDamping,
    /// Rain-chance scaling for travellers with medium rain tolerance
    pub medium_rain_tolerance: RainDamping,
    /// Flight score before adjustments
    pub flight_base_score: f64,
    /// Flight points lost per percent over the flight budget
    pub over_budget_penalty: f64,
    /// Fraction over the flight budget beyond which a flight is excluded
    pub flight_over_budget_tolerance: f64,
    /// Flight points lost per stop
    pub stop_penalty: f64,
    /// Journeys longer than this many hours are penalised
    pub long_flight_hours: f64,
    pub long_flight_penalty: f64,
    /// Applied when the traveller does not accept red-eye departures
    pub red_eye_penalty: f64,
    /// Bonus for departing in the preferred part of the day
    pub departure_match_bonus: f64,
    /// Bonus for a fare at or under the flight budget's lower bound
    pub flight_target_bonus: f64,
    /// Applied to Friday-Sunday departures when weekdays are preferred
    pub weekend_departure_penalty: f64,
    /// Hotel score before adjustments
    pub hotel_base_score: f64,
    /// Hotel points lost per percent outside the nightly budget
    pub out_of_budget_penalty: f64,
    pub loyalty_bonus: f64,
    /// Bonus for a storm-discounted rate in a storm-exposed window
    pub storm_discount_bonus: f64,
    pub highly_rated_bonus: f64,
    pub well_rated_bonus: f64,
    pub low_rating_penalty: f64,
    /// Safety or comfort priority at which hotels are filtered by rating
    pub strict_priority_level: u8,
    /// Fewest stars accepted under a strict safety priority
    pub safety_min_star_rating: f32,
    /// Lowest guest rating accepted under a strict comfort priority
    pub comfort_min_guest_rating: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            storm: StormThresholds::default(),
            storm_penalty_per_day: 15.0,
            tolerated_storm_penalty_per_day: 5.0,
            low_rain_tolerance: RainDamping {
                heavy_chance: 40,
                heavy_factor: 0.3,
                moderate_chance: 20,
                moderate_factor: 0.6,
            },
            medium_rain_tolerance: RainDamping {
                heavy_chance: 60,
                heavy_factor: 0.5,
                moderate_chance: 40,
                moderate_factor: 0.8,
            },
            flight_base_score: 90.0,
            over_budget_penalty: 1.0,
            flight_over_budget_tolerance: 0.25,
            stop_penalty: 10.0,
            long_flight_hours: 12.0,
            long_flight_penalty: 10.0,
            red_eye_penalty: 20.0,
            departure_match_bonus: 10.0,
            flight_target_bonus: 5.0,
            weekend_departure_penalty: 5.0,
            hotel_base_score: 80.0,
            out_of_budget_penalty: 1.0,
            loyalty_bonus: 10.0,
            storm_discount_bonus: 10.0,
            highly_rated_bonus: 10.0,
            well_rated_bonus: 5.0,
            low_rating_penalty: 10.0,
            strict_priority_level: 4,
            safety_min_star_rating: 3.5,
            comfort_min_guest_rating: 4.0,
        }
    }
}

/// Ranking and selection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Composite weights, equal thirds unless configured
    #[serde(default)]
    pub weights: CategoryWeights,
    /// Number of runner-up windows to report
    #[serde(default = "default_max_alternatives")]
    pub max_alternatives: usize,
    /// Composite score below which a window is rejected
    #[serde(default = "default_min_acceptable_score")]
    pub min_acceptable_score: f64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty, compact or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_max_alternatives() -> usize {
    3
}

fn default_min_acceptable_score() -> f64 {
    40.0
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            weights: CategoryWeights::default(),
            max_alternatives: default_max_alternatives(),
            min_acceptable_score: default_min_acceptable_score(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl AdvisorConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = &config_path {
            if !path.exists() {
                return Err(AdvisorError::config(format!(
                    "Config file not found: {}",
                    path.display()
                ))
                .into());
            }
        }

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. TRAVEL_ADVISOR_RANKING__MAX_ALTERNATIVES=5
        builder = builder.add_source(
            Environment::with_prefix("TRAVEL_ADVISOR")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AdvisorConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("travel-advisor").join("config.toml"))
    }

    /// Apply default values to blank configuration fields
    pub fn apply_defaults(&mut self) {
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_scoring()?;
        self.validate_ranking()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate scoring tunables
    fn validate_scoring(&self) -> Result<()> {
        let scoring = &self.scoring;
        let non_negative = [
            ("storm.precipitation", f64::from(scoring.storm.precipitation)),
            ("storm.wind_gust", f64::from(scoring.storm.wind_gust)),
            ("storm_penalty_per_day", scoring.storm_penalty_per_day),
            (
                "tolerated_storm_penalty_per_day",
                scoring.tolerated_storm_penalty_per_day,
            ),
            ("over_budget_penalty", scoring.over_budget_penalty),
            (
                "flight_over_budget_tolerance",
                scoring.flight_over_budget_tolerance,
            ),
            ("stop_penalty", scoring.stop_penalty),
            ("long_flight_hours", scoring.long_flight_hours),
            ("long_flight_penalty", scoring.long_flight_penalty),
            ("red_eye_penalty", scoring.red_eye_penalty),
            ("departure_match_bonus", scoring.departure_match_bonus),
            ("flight_target_bonus", scoring.flight_target_bonus),
            ("weekend_departure_penalty", scoring.weekend_departure_penalty),
            ("out_of_budget_penalty", scoring.out_of_budget_penalty),
            ("loyalty_bonus", scoring.loyalty_bonus),
            ("storm_discount_bonus", scoring.storm_discount_bonus),
            ("highly_rated_bonus", scoring.highly_rated_bonus),
            ("well_rated_bonus", scoring.well_rated_bonus),
            ("low_rating_penalty", scoring.low_rating_penalty),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(AdvisorError::config(format!(
                    "scoring.{name} must be a non-negative number"
                ))
                .into());
            }
        }

        for (name, value) in [
            ("flight_base_score", scoring.flight_base_score),
            ("hotel_base_score", scoring.hotel_base_score),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(AdvisorError::config(format!(
                    "scoring.{name} must be between 0 and 100"
                ))
                .into());
            }
        }

        for (name, damping) in [
            ("low_rain_tolerance", &scoring.low_rain_tolerance),
            ("medium_rain_tolerance", &scoring.medium_rain_tolerance),
        ] {
            Self::validate_rain_damping(name, damping)?;
        }

        if !(1..=5).contains(&scoring.strict_priority_level) {
            return Err(
                AdvisorError::config("scoring.strict_priority_level must be between 1 and 5")
                    .into(),
            );
        }

        for (name, value) in [
            ("safety_min_star_rating", scoring.safety_min_star_rating),
            ("comfort_min_guest_rating", scoring.comfort_min_guest_rating),
        ] {
            if !(0.0..=5.0).contains(&value) {
                return Err(AdvisorError::config(format!(
                    "scoring.{name} must be between 0 and 5"
                ))
                .into());
            }
        }

        Ok(())
    }

    fn validate_rain_damping(name: &str, damping: &RainDamping) -> Result<()> {
        if damping.heavy_chance > 100 || damping.moderate_chance > damping.heavy_chance {
            return Err(AdvisorError::config(format!(
                "scoring.{name} chances must satisfy moderate_chance <= heavy_chance <= 100"
            ))
            .into());
        }
        for factor in [damping.heavy_factor, damping.moderate_factor] {
            if !(0.0..=1.0).contains(&factor) {
                return Err(AdvisorError::config(format!(
                    "scoring.{name} factors must be between 0 and 1"
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Validate ranking settings
    fn validate_ranking(&self) -> Result<()> {
        if let Err(AdvisorError::Validation { field, message }) = self.ranking.weights.validate() {
            return Err(AdvisorError::config(format!("ranking.{field} {message}")).into());
        }

        if !(0.0..=100.0).contains(&self.ranking.min_acceptable_score) {
            return Err(AdvisorError::config(
                "ranking.min_acceptable_score must be between 0 and 100",
            )
            .into());
        }

        if self.ranking.max_alternatives > 50 {
            return Err(
                AdvisorError::config("ranking.max_alternatives cannot exceed 50").into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(AdvisorError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "compact", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(AdvisorError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}
