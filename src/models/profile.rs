//! Traveller profile and its validating builder

use crate::error::AdvisorError;
use crate::models::flight::DepartureBucket;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Neutral level for the 1-5 safety and comfort priorities
const DEFAULT_PRIORITY: u8 = 3;

/// Preferred daytime temperature range in °F
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRange {
    pub min: f32,
    pub max: f32,
}

impl TemperatureRange {
    #[must_use]
    pub fn contains(&self, temperature: f32) -> bool {
        temperature >= self.min && temperature <= self.max
    }
}

/// Spending range in USD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetRange {
    pub min: f64,
    pub max: f64,
}

impl BudgetRange {
    #[must_use]
    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }
}

/// How the traveller feels about storm days during the trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StormTolerance {
    #[default]
    Avoid,
    Tolerate,
}

/// How much rain the traveller is willing to put up with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RainTolerance {
    Low,
    #[default]
    Medium,
    /// Rain chances never reduce the weather score
    High,
}

impl fmt::Display for RainTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RainTolerance::Low => write!(f, "low"),
            RainTolerance::Medium => write!(f, "medium"),
            RainTolerance::High => write!(f, "high"),
        }
    }
}

/// Traveller preferences and constraints for one recommendation request.
///
/// Only obtainable through [`UserProfileBuilder::build`] (or deserialisation,
/// which runs the same checks), so every instance holds validated ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UserProfileBuilder")]
pub struct UserProfile {
    preferred_temperature: TemperatureRange,
    budget: BudgetRange,
    flight_budget: Option<BudgetRange>,
    trip_length_days: u32,
    flexibility_days: u32,
    loyalty_programs: BTreeSet<String>,
    storm_tolerance: StormTolerance,
    rain_tolerance: RainTolerance,
    preferred_departure: Option<DepartureBucket>,
    accepts_red_eye: bool,
    prefers_weekday_departure: bool,
    safety_priority: u8,
    comfort_priority: u8,
}

impl UserProfile {
    #[must_use]
    pub fn builder() -> UserProfileBuilder {
        UserProfileBuilder::default()
    }

    #[must_use]
    pub fn preferred_temperature(&self) -> TemperatureRange {
        self.preferred_temperature
    }

    /// Nightly lodging budget, also used for flights without a dedicated budget
    #[must_use]
    pub fn budget(&self) -> BudgetRange {
        self.budget
    }

    /// Budget applied to flight prices
    #[must_use]
    pub fn flight_budget(&self) -> BudgetRange {
        self.flight_budget.unwrap_or(self.budget)
    }

    /// Fare the traveller hopes to stay under: the lower bound of a
    /// dedicated flight budget, when one was given and is above zero
    #[must_use]
    pub fn flight_target(&self) -> Option<f64> {
        self.flight_budget
            .map(|budget| budget.min)
            .filter(|target| *target > 0.0)
    }

    #[must_use]
    pub fn trip_length_days(&self) -> u32 {
        self.trip_length_days
    }

    #[must_use]
    pub fn flexibility_days(&self) -> u32 {
        self.flexibility_days
    }

    #[must_use]
    pub fn loyalty_programs(&self) -> &BTreeSet<String> {
        &self.loyalty_programs
    }

    #[must_use]
    pub fn is_loyalty_member(&self, program: &str) -> bool {
        self.loyalty_programs.contains(program)
    }

    #[must_use]
    pub fn storm_tolerance(&self) -> StormTolerance {
        self.storm_tolerance
    }

    #[must_use]
    pub fn rain_tolerance(&self) -> RainTolerance {
        self.rain_tolerance
    }

    #[must_use]
    pub fn preferred_departure(&self) -> Option<DepartureBucket> {
        self.preferred_departure
    }

    #[must_use]
    pub fn accepts_red_eye(&self) -> bool {
        self.accepts_red_eye
    }

    /// Friday to Sunday departures count against the flight
    #[must_use]
    pub fn prefers_weekday_departure(&self) -> bool {
        self.prefers_weekday_departure
    }

    /// 1 (indifferent) to 5 (essential); high values filter out low-star hotels
    #[must_use]
    pub fn safety_priority(&self) -> u8 {
        self.safety_priority
    }

    /// 1 (indifferent) to 5 (essential); high values filter out poorly reviewed hotels
    #[must_use]
    pub fn comfort_priority(&self) -> u8 {
        self.comfort_priority
    }
}

/// Builder and wire form of [`UserProfile`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserProfileBuilder {
    #[serde(default)]
    preferred_temperature: Option<TemperatureRange>,
    #[serde(default)]
    budget: Option<BudgetRange>,
    #[serde(default)]
    flight_budget: Option<BudgetRange>,
    #[serde(default)]
    trip_length_days: Option<u32>,
    #[serde(default)]
    flexibility_days: u32,
    #[serde(default)]
    loyalty_programs: BTreeSet<String>,
    #[serde(default)]
    storm_tolerance: StormTolerance,
    #[serde(default)]
    rain_tolerance: RainTolerance,
    #[serde(default)]
    preferred_departure: Option<DepartureBucket>,
    #[serde(default = "default_accepts_red_eye")]
    accepts_red_eye: bool,
    #[serde(default)]
    prefers_weekday_departure: bool,
    #[serde(default = "default_priority")]
    safety_priority: u8,
    #[serde(default = "default_priority")]
    comfort_priority: u8,
}

fn default_accepts_red_eye() -> bool {
    true
}

fn default_priority() -> u8 {
    DEFAULT_PRIORITY
}

impl Default for UserProfileBuilder {
    fn default() -> Self {
        Self {
            preferred_temperature: None,
            budget: None,
            flight_budget: None,
            trip_length_days: None,
            flexibility_days: 0,
            loyalty_programs: BTreeSet::new(),
            storm_tolerance: StormTolerance::default(),
            rain_tolerance: RainTolerance::default(),
            preferred_departure: None,
            accepts_red_eye: default_accepts_red_eye(),
            prefers_weekday_departure: false,
            safety_priority: DEFAULT_PRIORITY,
            comfort_priority: DEFAULT_PRIORITY,
        }
    }
}

impl UserProfileBuilder {
    #[must_use]
    pub fn preferred_temperature(mut self, min: f32, max: f32) -> Self {
        self.preferred_temperature = Some(TemperatureRange { min, max });
        self
    }

    #[must_use]
    pub fn budget(mut self, min: f64, max: f64) -> Self {
        self.budget = Some(BudgetRange { min, max });
        self
    }

    #[must_use]
    pub fn flight_budget(mut self, min: f64, max: f64) -> Self {
        self.flight_budget = Some(BudgetRange { min, max });
        self
    }

    #[must_use]
    pub fn trip_length_days(mut self, days: u32) -> Self {
        self.trip_length_days = Some(days);
        self
    }

    #[must_use]
    pub fn flexibility_days(mut self, days: u32) -> Self {
        self.flexibility_days = days;
        self
    }

    #[must_use]
    pub fn loyalty_program<S: Into<String>>(mut self, program: S) -> Self {
        self.loyalty_programs.insert(program.into());
        self
    }

    #[must_use]
    pub fn storm_tolerance(mut self, tolerance: StormTolerance) -> Self {
        self.storm_tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn rain_tolerance(mut self, tolerance: RainTolerance) -> Self {
        self.rain_tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn preferred_departure(mut self, bucket: DepartureBucket) -> Self {
        self.preferred_departure = Some(bucket);
        self
    }

    #[must_use]
    pub fn accepts_red_eye(mut self, accepts: bool) -> Self {
        self.accepts_red_eye = accepts;
        self
    }

    #[must_use]
    pub fn prefers_weekday_departure(mut self, prefers: bool) -> Self {
        self.prefers_weekday_departure = prefers;
        self
    }

    #[must_use]
    pub fn safety_priority(mut self, priority: u8) -> Self {
        self.safety_priority = priority;
        self
    }

    #[must_use]
    pub fn comfort_priority(mut self, priority: u8) -> Self {
        self.comfort_priority = priority;
        self
    }

    /// Validate all ranges and produce an immutable profile
    pub fn build(self) -> crate::Result<UserProfile> {
        let preferred_temperature = self
            .preferred_temperature
            .ok_or_else(|| AdvisorError::validation("preferred_temperature", "is required"))?;
        validate_temperature(&preferred_temperature)?;

        let budget = self
            .budget
            .ok_or_else(|| AdvisorError::validation("budget", "is required"))?;
        validate_budget("budget", &budget)?;

        if let Some(flight_budget) = &self.flight_budget {
            validate_budget("flight_budget", flight_budget)?;
        }

        let trip_length_days = self
            .trip_length_days
            .ok_or_else(|| AdvisorError::validation("trip_length_days", "is required"))?;
        if trip_length_days == 0 {
            return Err(AdvisorError::validation(
                "trip_length_days",
                "must be at least 1 day",
            ));
        }

        for (name, priority) in [
            ("safety_priority", self.safety_priority),
            ("comfort_priority", self.comfort_priority),
        ] {
            if !(1..=5).contains(&priority) {
                return Err(AdvisorError::validation(
                    name,
                    format!("{priority} is outside the 1-5 scale"),
                ));
            }
        }

        if self.loyalty_programs.iter().any(|p| p.trim().is_empty()) {
            return Err(AdvisorError::validation(
                "loyalty_programs",
                "program identifiers cannot be empty",
            ));
        }

        Ok(UserProfile {
            preferred_temperature,
            budget,
            flight_budget: self.flight_budget,
            trip_length_days,
            flexibility_days: self.flexibility_days,
            loyalty_programs: self.loyalty_programs,
            storm_tolerance: self.storm_tolerance,
            rain_tolerance: self.rain_tolerance,
            preferred_departure: self.preferred_departure,
            accepts_red_eye: self.accepts_red_eye,
            prefers_weekday_departure: self.prefers_weekday_departure,
            safety_priority: self.safety_priority,
            comfort_priority: self.comfort_priority,
        })
    }
}

impl TryFrom<UserProfileBuilder> for UserProfile {
    type Error = AdvisorError;

    fn try_from(builder: UserProfileBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

fn validate_temperature(range: &TemperatureRange) -> crate::Result<()> {
    if !range.min.is_finite() || !range.max.is_finite() {
        return Err(AdvisorError::validation(
            "preferred_temperature",
            "bounds must be finite numbers",
        ));
    }
    if range.min > range.max {
        return Err(AdvisorError::validation(
            "preferred_temperature",
            format!("min {} exceeds max {}", range.min, range.max),
        ));
    }
    Ok(())
}

fn validate_budget(field: &str, range: &BudgetRange) -> crate::Result<()> {
    if !range.min.is_finite() || !range.max.is_finite() {
        return Err(AdvisorError::validation(
            field,
            "bounds must be finite numbers",
        ));
    }
    if range.min < 0.0 {
        return Err(AdvisorError::validation(
            format!("{field}.min"),
            "must not be negative",
        ));
    }
    if range.min > range.max {
        return Err(AdvisorError::validation(
            field,
            format!("min {} exceeds max {}", range.min, range.max),
        ));
    }
    Ok(())
}
