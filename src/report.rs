//! Plain-text rendering of a recommendation for the terminal

use crate::models::{Category, TravelRecommendation, TravelWindow, UserProfile};
use std::fmt::{self, Write};

/// Render the recommendation as a human-readable report
#[must_use]
pub fn render_text(recommendation: &TravelRecommendation, profile: &UserProfile) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    write_report(&mut out, recommendation, profile).ok();
    out
}

fn write_report(
    out: &mut String,
    recommendation: &TravelRecommendation,
    profile: &UserProfile,
) -> fmt::Result {
    let best = &recommendation.best;
    let temperature = profile.preferred_temperature();
    let budget = profile.budget();

    writeln!(
        out,
        "Travel profile: {:.0}-{:.0}°F, ${:.0}-${:.0}/night, {} day trip",
        temperature.min,
        temperature.max,
        budget.min,
        budget.max,
        profile.trip_length_days()
    )?;
    writeln!(out)?;

    writeln!(
        out,
        "{} Best window: {} ({} days) - {} {:.1}/100",
        best.rating().emoji(),
        best.span_label(),
        best.duration_days(),
        best.rating(),
        best.composite()
    )?;
    if let Some(shortfall) = &recommendation.shortfall {
        writeln!(out, "  Note: no window met every requirement ({shortfall})")?;
    }
    write_window_details(out, best)?;

    writeln!(out)?;
    writeln!(out, "Why this window:")?;
    for line in &recommendation.reasoning {
        writeln!(out, "  - {line}")?;
    }

    if !recommendation.alternatives.is_empty() {
        writeln!(out)?;
        writeln!(out, "Alternatives:")?;
        for (index, window) in recommendation.alternatives.iter().enumerate() {
            writeln!(
                out,
                "  {}. {} {} - {} {:.1}/100 ({})",
                index + 1,
                window.rating().emoji(),
                window.span_label(),
                window.rating(),
                window.composite(),
                score_breakdown(window)
            )?;
        }
    }

    if !recommendation.rejected.is_empty() {
        writeln!(out)?;
        writeln!(out, "Rejected windows:")?;
        for rejected in &recommendation.rejected {
            writeln!(
                out,
                "  - {}: {}",
                rejected.window.span_label(),
                rejected.reason
            )?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Why not other dates: {}", recommendation.why_not)
}

fn write_window_details(out: &mut String, window: &TravelWindow) -> fmt::Result {
    writeln!(out, "  Scores: {}", score_breakdown(window))?;
    for category in Category::ALL {
        let reasons: Vec<&str> = window.reasons_for(category).collect();
        if !reasons.is_empty() {
            writeln!(out, "  {category}: {}", reasons.join("; "))?;
        }
    }
    Ok(())
}

fn score_breakdown(window: &TravelWindow) -> String {
    let scores = window.scores();
    format!(
        "weather {:.0}, flight {:.0}, hotel {:.0}",
        scores.weather, scores.flight, scores.hotel
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::synthesize_recommendation;
    use crate::scenario::Scenario;
    use chrono::NaiveDate;

    fn sample() -> (Scenario, TravelRecommendation) {
        let scenario = Scenario::sample(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()).unwrap();
        let recommendation = synthesize_recommendation(
            &scenario.profile,
            &scenario.weather_days,
            &scenario.flights,
            &scenario.hotels,
            &scenario.params,
        )
        .unwrap();
        (scenario, recommendation)
    }

    #[test]
    fn test_render_sample_report() {
        let (scenario, recommendation) = sample();

        let report = render_text(&recommendation, &scenario.profile);
        assert!(report.starts_with("Travel profile: 75-85°F"));
        assert!(report.contains("Best window: "));
        assert!(report.contains(&recommendation.best.span_label()));
        assert!(report.contains("Alternatives:"));
        assert!(report.contains("Rejected windows:"));
        assert!(report.contains("no transport/lodging options"));
        assert!(report.contains("Why not other dates: "));
        assert!(!report.contains("Note: "));
    }

    #[test]
    fn test_render_shortfall_note() {
        let (scenario, mut recommendation) = sample();
        recommendation.shortfall = Some("no flights".to_string());

        let report = render_text(&recommendation, &scenario.profile);
        assert!(report.contains("  Note: no window met every requirement (no flights)\n"));
    }
}
