//! Daily weather records and the forecast horizon they form

use crate::error::AdvisorError;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Single day of forecast weather at the destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherDay {
    pub date: NaiveDate,
    /// Daily low in °F
    pub temp_min: f32,
    /// Daily high in °F
    pub temp_max: f32,
    /// Precipitation amount in inches
    pub precipitation: f32,
    /// Chance of rain in percent, when the provider reports one
    #[serde(default)]
    pub precipitation_chance: Option<u8>,
    /// Maximum wind gust in mph
    pub wind_gust: f32,
    /// Storm warning issued by the weather provider
    #[serde(default)]
    pub storm_warning: bool,
    /// Human-readable conditions ("sunny", "rainy", ...)
    #[serde(default)]
    pub conditions: Option<String>,
}

/// Limits above which a day counts as stormy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StormThresholds {
    /// Inches of precipitation
    pub precipitation: f32,
    /// Gust speed in mph
    pub wind_gust: f32,
}

impl Default for StormThresholds {
    fn default() -> Self {
        Self {
            precipitation: 0.5,
            wind_gust: 35.0,
        }
    }
}

/// Chance-of-rain bands that scale down a comfortable day's credit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RainDamping {
    /// Chance (percent) at or above which `heavy_factor` applies
    pub heavy_chance: u8,
    pub heavy_factor: f64,
    /// Chance (percent) at or above which `moderate_factor` applies
    pub moderate_chance: u8,
    pub moderate_factor: f64,
}

impl RainDamping {
    #[must_use]
    pub fn factor(&self, chance: u8) -> f64 {
        if chance >= self.heavy_chance {
            self.heavy_factor
        } else if chance >= self.moderate_chance {
            self.moderate_factor
        } else {
            1.0
        }
    }
}

impl WeatherDay {
    /// Storm flag derived from precipitation, gusts and provider warnings
    #[must_use]
    pub fn is_storm(&self, thresholds: &StormThresholds) -> bool {
        self.storm_warning
            || self.precipitation > thresholds.precipitation
            || self.wind_gust > thresholds.wind_gust
    }

    /// Short description of why a day is flagged as stormy
    #[must_use]
    pub fn storm_cause(&self, thresholds: &StormThresholds) -> String {
        let mut causes = Vec::new();
        if self.precipitation > thresholds.precipitation {
            causes.push(format!("{:.2} in precipitation", self.precipitation));
        }
        if self.wind_gust > thresholds.wind_gust {
            causes.push(format!("gusts to {:.0} mph", self.wind_gust));
        }
        if self.storm_warning {
            causes.push("provider storm warning".to_string());
        }
        causes.join(", ")
    }

    pub fn validate(&self, field: &str) -> crate::Result<()> {
        let numbers = [
            ("temp_min", self.temp_min),
            ("temp_max", self.temp_max),
            ("precipitation", self.precipitation),
            ("wind_gust", self.wind_gust),
        ];
        for (name, value) in numbers {
            if !value.is_finite() {
                return Err(AdvisorError::validation(
                    format!("{field}.{name}"),
                    "must be a finite number",
                ));
            }
        }
        if self.temp_min > self.temp_max {
            return Err(AdvisorError::validation(
                format!("{field}.temp_min"),
                format!("low {} exceeds high {}", self.temp_min, self.temp_max),
            ));
        }
        if self.precipitation < 0.0 {
            return Err(AdvisorError::validation(
                format!("{field}.precipitation"),
                "must not be negative",
            ));
        }
        if self.wind_gust < 0.0 {
            return Err(AdvisorError::validation(
                format!("{field}.wind_gust"),
                "must not be negative",
            ));
        }
        if let Some(chance) = self.precipitation_chance.filter(|chance| *chance > 100) {
            return Err(AdvisorError::validation(
                format!("{field}.precipitation_chance"),
                format!("{chance}% is not a percentage"),
            ));
        }
        Ok(())
    }
}

/// Contiguous run of storm-flagged days (inclusive bounds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StormPeriod {
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
}

impl std::fmt::Display for StormPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.first_day == self.last_day {
            write!(f, "{}", self.first_day.format("%b %d"))
        } else {
            write!(
                f,
                "{}-{}",
                self.first_day.format("%b %d"),
                self.last_day.format("%b %d")
            )
        }
    }
}

/// Weather coverage for the whole search, sorted by date with no gaps or duplicates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherHorizon {
    days: Vec<WeatherDay>,
}

impl WeatherHorizon {
    /// Sort and validate the supplied days
    pub fn new(mut days: Vec<WeatherDay>) -> crate::Result<Self> {
        if days.is_empty() {
            return Err(AdvisorError::validation(
                "weather_days",
                "at least one forecast day is required",
            ));
        }

        for (index, day) in days.iter().enumerate() {
            day.validate(&format!("weather_days[{index}]"))?;
        }

        days.sort_by_key(|day| day.date);

        for (index, pair) in days.windows(2).enumerate() {
            let gap = (pair[1].date - pair[0].date).num_days();
            if gap == 0 {
                return Err(AdvisorError::validation(
                    format!("weather_days[{}].date", index + 1),
                    format!("duplicate forecast for {}", pair[1].date),
                ));
            }
            if gap > 1 {
                return Err(AdvisorError::validation(
                    "weather_days",
                    format!(
                        "forecast is not consecutive: missing {} day(s) after {}",
                        gap - 1,
                        pair[0].date
                    ),
                ));
            }
        }

        Ok(Self { days })
    }

    #[must_use]
    pub fn days(&self) -> &[WeatherDay] {
        &self.days
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    #[must_use]
    pub fn first_date(&self) -> NaiveDate {
        self.days[0].date
    }

    /// Dates covered by the horizon, ascending
    #[must_use]
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.days.iter().map(|day| day.date).collect()
    }

    /// Days in `[start, end)`, or `None` if the span leaves the horizon
    #[must_use]
    pub fn slice(&self, start: NaiveDate, end: NaiveDate) -> Option<&[WeatherDay]> {
        let offset = usize::try_from((start - self.first_date()).num_days()).ok()?;
        let length = usize::try_from((end - start).num_days()).ok()?;
        self.days.get(offset..offset.checked_add(length)?)
    }

    /// Contiguous storm runs across the horizon
    #[must_use]
    pub fn storm_periods(&self, thresholds: &StormThresholds) -> Vec<StormPeriod> {
        let mut periods: Vec<StormPeriod> = Vec::new();

        for day in self.days.iter().filter(|d| d.is_storm(thresholds)) {
            match periods.last_mut() {
                Some(period) if period.last_day + Duration::days(1) == day.date => {
                    period.last_day = day.date;
                }
                _ => periods.push(StormPeriod {
                    first_day: day.date,
                    last_day: day.date,
                }),
            }
        }

        periods
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(offset: i64, precipitation: f32, wind_gust: f32) -> WeatherDay {
        WeatherDay {
            date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap() + Duration::days(offset),
            temp_min: 68.0,
            temp_max: 80.0,
            precipitation,
            precipitation_chance: None,
            wind_gust,
            storm_warning: false,
            conditions: None,
        }
    }

    #[test]
    fn test_storm_flag_derivation() {
        let thresholds = StormThresholds::default();
        assert!(!day(0, 0.1, 20.0).is_storm(&thresholds));
        assert!(day(0, 0.8, 20.0).is_storm(&thresholds));
        assert!(day(0, 0.1, 40.0).is_storm(&thresholds));

        let mut warned = day(0, 0.0, 0.0);
        warned.storm_warning = true;
        assert!(warned.is_storm(&thresholds));
        assert_eq!(warned.storm_cause(&thresholds), "provider storm warning");
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let thresholds = StormThresholds::default();
        assert!(!day(0, 0.5, 35.0).is_storm(&thresholds));
    }

    #[test]
    fn test_horizon_sorts_days() {
        let horizon = WeatherHorizon::new(vec![day(2, 0.0, 0.0), day(0, 0.0, 0.0), day(1, 0.0, 0.0)])
            .unwrap();
        let dates = horizon.dates();
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(horizon.len(), 3);
    }

    #[test]
    fn test_horizon_rejects_duplicates() {
        let err = WeatherHorizon::new(vec![day(0, 0.0, 0.0), day(0, 0.0, 0.0)]).unwrap_err();
        assert_eq!(err.field(), Some("weather_days[1].date"));
    }

    #[test]
    fn test_horizon_rejects_gaps() {
        let err = WeatherHorizon::new(vec![day(0, 0.0, 0.0), day(3, 0.0, 0.0)]).unwrap_err();
        assert_eq!(err.field(), Some("weather_days"));
    }

    #[test]
    fn test_horizon_rejects_inverted_temperatures() {
        let mut bad = day(0, 0.0, 0.0);
        bad.temp_min = 90.0;
        let err = WeatherHorizon::new(vec![bad]).unwrap_err();
        assert_eq!(err.field(), Some("weather_days[0].temp_min"));
    }

    #[test]
    fn test_horizon_rejects_impossible_rain_chance() {
        let mut bad = day(0, 0.0, 0.0);
        bad.precipitation_chance = Some(140);
        let err = WeatherHorizon::new(vec![bad]).unwrap_err();
        assert_eq!(err.field(), Some("weather_days[0].precipitation_chance"));
    }

    #[test]
    fn test_rain_damping_bands() {
        let damping = RainDamping {
            heavy_chance: 60,
            heavy_factor: 0.5,
            moderate_chance: 40,
            moderate_factor: 0.8,
        };
        assert_eq!(damping.factor(10), 1.0);
        assert_eq!(damping.factor(40), 0.8);
        assert_eq!(damping.factor(59), 0.8);
        assert_eq!(damping.factor(60), 0.5);
        assert_eq!(damping.factor(100), 0.5);
    }

    #[test]
    fn test_slice_lookup() {
        let horizon = WeatherHorizon::new((0..10).map(|i| day(i, 0.0, 0.0)).collect()).unwrap();
        let start = horizon.first_date() + Duration::days(3);
        let slice = horizon.slice(start, start + Duration::days(7)).unwrap();
        assert_eq!(slice.len(), 7);
        assert_eq!(slice[0].date, start);

        assert!(horizon.slice(start, start + Duration::days(8)).is_none());
        assert!(
            horizon
                .slice(start - Duration::days(4), start)
                .is_none()
        );
    }

    #[test]
    fn test_storm_periods() {
        let days = (0..10)
            .map(|i| {
                if (3..=5).contains(&i) || i == 8 {
                    day(i, 1.0, 10.0)
                } else {
                    day(i, 0.0, 10.0)
                }
            })
            .collect();
        let horizon = WeatherHorizon::new(days).unwrap();
        let periods = horizon.storm_periods(&StormThresholds::default());

        assert_eq!(periods.len(), 2);
        assert_eq!((periods[0].last_day - periods[0].first_day).num_days(), 2);
        assert_eq!(periods[1].first_day, periods[1].last_day);
        assert_eq!(periods[0].to_string(), "Mar 04-Mar 06");
    }
}
