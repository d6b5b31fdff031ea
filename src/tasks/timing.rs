//! Publish-timing recommendations from past video performance.

use crate::error::{Result, SkriveError};
use crate::generation::decode::ListShape;
use crate::generation::normalize::extract_payload;
use crate::generation::validate::{non_empty, Validation, ValidationRule, Violation};
use crate::generation::{vars, GenerationContext, Generator, TaskKind};
use chrono::{DateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use tracing::{info, instrument};

/// Object field wrapping the recommendation array.
pub const TIMING_FIELD: &str = "recommendations";

/// Accepted number of recommendations.
pub const RECOMMENDATION_COUNT: RangeInclusive<usize> = 6..=8;

/// Canonical day names, Monday first.
pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Performance of one published video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoAnalytics {
    pub video_id: String,
    pub title: String,
    pub published_at: DateTime<Utc>,
    pub views: u64,
    /// Impressions click-through rate, in percent.
    #[serde(default)]
    pub click_through_rate: f64,
    #[serde(default)]
    pub average_view_duration_seconds: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: u64,
}

/// A recommended weekly publishing slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingRecommendation {
    pub day: String,
    /// 24-hour `HH:MM`, UTC.
    pub time: String,
    pub reasoning: String,
}

impl TimingRecommendation {
    pub fn weekday(&self) -> Option<Weekday> {
        const ORDER: [Weekday; 7] = [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ];
        WEEKDAYS
            .iter()
            .position(|d| *d == self.day)
            .map(|i| ORDER[i])
    }
}

impl Generator {
    /// Recommend publishing slots based on `analytics`.
    #[instrument(skip(self, ctx, analytics), fields(task = "timing", videos = analytics.len()))]
    pub async fn generate_timing(
        &self,
        ctx: &GenerationContext,
        analytics: &[VideoAnalytics],
    ) -> Result<Vec<TimingRecommendation>> {
        let task = TaskKind::Timing;
        if analytics.is_empty() {
            return Err(SkriveError::InvalidInput(format!(
                "{}: no analytics records",
                task
            )));
        }

        let prompt = self.render(
            task,
            &vars([
                ("analytics", render_analytics(analytics)),
                ("video_count", analytics.len().to_string()),
            ]),
        )?;
        let raw = self.invoke(ctx, task, &prompt).await?;

        let recommendations = parse_timing(&raw).map_err(|e| e.with_context(task.name()))?;
        info!("Generated {} timing recommendations", recommendations.len());
        Ok(recommendations)
    }
}

/// One line per video: publish weekday and UTC time followed by its metrics.
pub fn render_analytics(analytics: &[VideoAnalytics]) -> String {
    analytics
        .iter()
        .map(|a| {
            format!(
                "- \"{}\" ({}): published {} {} UTC, {} views, {:.1}% CTR, {}s average view duration, {} likes, {} comments",
                a.title,
                a.video_id,
                a.published_at.format("%A"),
                a.published_at.format("%H:%M"),
                a.views,
                a.click_through_rate,
                a.average_view_duration_seconds,
                a.likes,
                a.comments
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Decode recommendations from a bare array or a `recommendations` object.
pub fn parse_timing(raw: &str) -> Result<Vec<TimingRecommendation>> {
    let payload = extract_payload(raw);
    let recommendations =
        ListShape::<TimingRecommendation>::decode(&payload, TIMING_FIELD)?.into_items();
    validate_timing(&recommendations)?;
    Ok(recommendations)
}

fn validate_timing(recommendations: &[TimingRecommendation]) -> Validation<()> {
    let actual = recommendations.len();
    if !RECOMMENDATION_COUNT.contains(&actual) {
        return Err(Violation::new(
            "recommendations",
            ValidationRule::ListLength {
                min: *RECOMMENDATION_COUNT.start(),
                max: *RECOMMENDATION_COUNT.end(),
                actual,
            },
            &format!("{} entries", actual),
        ));
    }

    for (i, rec) in recommendations.iter().enumerate() {
        if !WEEKDAYS.contains(&rec.day.as_str()) {
            return Err(Violation::new(
                format!("recommendations[{}].day", i),
                ValidationRule::Weekday,
                &rec.day,
            ));
        }
        if !is_time_of_day(&rec.time) {
            return Err(Violation::new(
                format!("recommendations[{}].time", i),
                ValidationRule::TimeOfDay,
                &rec.time,
            ));
        }
        non_empty(&format!("recommendations[{}].reasoning", i), &rec.reasoning)?;
    }
    Ok(())
}

/// Strict two-digit `HH:MM` with hour 00-23 and minute 00-59.
fn is_time_of_day(time: &str) -> bool {
    let bytes = time.as_bytes();
    bytes.len() == 5
        && bytes[2] == b':'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 2 || b.is_ascii_digit())
        && NaiveTime::parse_from_str(time, "%H:%M").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn slots(n: usize) -> Vec<serde_json::Value> {
        (0..n)
            .map(|i| {
                serde_json::json!({
                    "day": WEEKDAYS[i % 7],
                    "time": format!("{:02}:30", 8 + i),
                    "reasoning": "High CTR in this slot."
                })
            })
            .collect()
    }

    fn rule_of(err: SkriveError) -> ValidationRule {
        match err {
            SkriveError::Validation(v) => v.rule,
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_accepts_six_to_eight() {
        for n in 6..=8 {
            let raw = serde_json::to_string(&slots(n)).unwrap();
            assert_eq!(parse_timing(&raw).unwrap().len(), n);
        }
        let wrapped = serde_json::json!({ "recommendations": slots(7) }).to_string();
        assert_eq!(parse_timing(&wrapped).unwrap().len(), 7);
    }

    #[test]
    fn test_rejects_five_and_nine() {
        for n in [5, 9] {
            let raw = serde_json::to_string(&slots(n)).unwrap();
            assert_eq!(
                rule_of(parse_timing(&raw).unwrap_err()),
                ValidationRule::ListLength {
                    min: 6,
                    max: 8,
                    actual: n
                }
            );
        }
    }

    #[test]
    fn test_rejects_unknown_day() {
        let mut items = slots(6);
        items[3]["day"] = serde_json::json!("Funday");
        let raw = serde_json::to_string(&items).unwrap();
        assert_eq!(rule_of(parse_timing(&raw).unwrap_err()), ValidationRule::Weekday);

        items[3]["day"] = serde_json::json!("monday");
        let raw = serde_json::to_string(&items).unwrap();
        assert_eq!(rule_of(parse_timing(&raw).unwrap_err()), ValidationRule::Weekday);
    }

    #[test]
    fn test_rejects_out_of_range_times() {
        for bad in ["24:00", "09:60", "9:00", "09:00:00", "ab:cd"] {
            let mut items = slots(6);
            items[0]["time"] = serde_json::json!(bad);
            let raw = serde_json::to_string(&items).unwrap();
            assert_eq!(
                rule_of(parse_timing(&raw).unwrap_err()),
                ValidationRule::TimeOfDay,
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_time_bounds() {
        assert!(is_time_of_day("00:00"));
        assert!(is_time_of_day("23:59"));
        assert!(!is_time_of_day("24:00"));
        assert!(!is_time_of_day("+1:00"));
    }

    #[test]
    fn test_weekday_mapping() {
        let rec = TimingRecommendation {
            day: "Sunday".to_string(),
            time: "10:00".to_string(),
            reasoning: "r".to_string(),
        };
        assert_eq!(rec.weekday(), Some(Weekday::Sun));
    }

    #[test]
    fn test_render_analytics() {
        let analytics = vec![VideoAnalytics {
            video_id: "abc123".to_string(),
            title: "Crossplane in 10 minutes".to_string(),
            published_at: Utc.with_ymd_and_hms(2024, 3, 5, 16, 0, 0).unwrap(),
            views: 12000,
            click_through_rate: 6.25,
            average_view_duration_seconds: 240,
            likes: 500,
            comments: 42,
        }];
        let text = render_analytics(&analytics);
        assert!(text.contains("published Tuesday 16:00 UTC"));
        assert!(text.contains("12000 views"));
        assert!(text.contains("6.2% CTR") || text.contains("6.3% CTR"));
        assert!(text.contains("42 comments"));
    }
}
