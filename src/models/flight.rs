//! Flight itinerary records

use crate::error::AdvisorError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Part of the day an outbound flight leaves in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepartureBucket {
    /// 06:00-12:00
    Morning,
    /// 12:00-17:00
    Afternoon,
    /// 17:00-22:00
    Evening,
    /// 22:00-06:00
    RedEye,
}

impl DepartureBucket {
    /// Bucket for a departure hour (0-23)
    #[must_use]
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => DepartureBucket::Morning,
            12..=16 => DepartureBucket::Afternoon,
            17..=21 => DepartureBucket::Evening,
            _ => DepartureBucket::RedEye,
        }
    }
}

impl fmt::Display for DepartureBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepartureBucket::Morning => write!(f, "morning"),
            DepartureBucket::Afternoon => write!(f, "afternoon"),
            DepartureBucket::Evening => write!(f, "evening"),
            DepartureBucket::RedEye => write!(f, "red-eye"),
        }
    }
}

/// One outbound flight option to the destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightOption {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    #[serde(default)]
    pub return_date: Option<NaiveDate>,
    #[serde(default)]
    pub airline: Option<String>,
    /// Round-trip fare in USD
    pub price: f64,
    pub duration_hours: f32,
    pub stops: u8,
    pub departure_bucket: DepartureBucket,
}

impl FlightOption {
    /// Label used in explanations
    #[must_use]
    pub fn label(&self) -> String {
        match &self.airline {
            Some(airline) => format!("{airline} {}-{}", self.origin, self.destination),
            None => format!("{}-{}", self.origin, self.destination),
        }
    }

    pub fn validate(&self, field: &str) -> crate::Result<()> {
        if self.origin.trim().is_empty() {
            return Err(AdvisorError::validation(
                format!("{field}.origin"),
                "cannot be empty",
            ));
        }
        if self.destination.trim().is_empty() {
            return Err(AdvisorError::validation(
                format!("{field}.destination"),
                "cannot be empty",
            ));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(AdvisorError::validation(
                format!("{field}.price"),
                "must be a non-negative amount",
            ));
        }
        if !self.duration_hours.is_finite() || self.duration_hours <= 0.0 {
            return Err(AdvisorError::validation(
                format!("{field}.duration_hours"),
                "must be positive",
            ));
        }
        if let Some(return_date) = self.return_date {
            if return_date < self.departure_date {
                return Err(AdvisorError::validation(
                    format!("{field}.return_date"),
                    format!("{return_date} is before departure {}", self.departure_date),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flight() -> FlightOption {
        FlightOption {
            origin: "SFO".to_string(),
            destination: "OGG".to_string(),
            departure_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            return_date: None,
            airline: Some("Hawaiian Airlines".to_string()),
            price: 420.0,
            duration_hours: 5.5,
            stops: 0,
            departure_bucket: DepartureBucket::Morning,
        }
    }

    #[test]
    fn test_bucket_from_hour() {
        assert_eq!(DepartureBucket::from_hour(6), DepartureBucket::Morning);
        assert_eq!(DepartureBucket::from_hour(12), DepartureBucket::Afternoon);
        assert_eq!(DepartureBucket::from_hour(21), DepartureBucket::Evening);
        assert_eq!(DepartureBucket::from_hour(23), DepartureBucket::RedEye);
        assert_eq!(DepartureBucket::from_hour(2), DepartureBucket::RedEye);
    }

    #[test]
    fn test_label() {
        assert_eq!(flight().label(), "Hawaiian Airlines SFO-OGG");
        let mut anonymous = flight();
        anonymous.airline = None;
        assert_eq!(anonymous.label(), "SFO-OGG");
    }

    #[test]
    fn test_validation() {
        assert!(flight().validate("flights[0]").is_ok());

        let mut negative = flight();
        negative.price = -1.0;
        let err = negative.validate("flights[0]").unwrap_err();
        assert_eq!(err.field(), Some("flights[0].price"));

        let mut backwards = flight();
        backwards.return_date = NaiveDate::from_ymd_opt(2026, 2, 20);
        let err = backwards.validate("flights[3]").unwrap_err();
        assert_eq!(err.field(), Some("flights[3].return_date"));
    }

    #[test]
    fn test_bucket_serde_names() {
        let json = serde_json::to_string(&DepartureBucket::RedEye).unwrap();
        assert_eq!(json, "\"red_eye\"");
    }
}
