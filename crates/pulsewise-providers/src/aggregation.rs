// ABOUTME: Reduces sleep analysis and mindful session samples into per-interval metrics
// ABOUTME: Sample durations are clipped to the queried interval before summing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

use chrono::Duration;
use pulsewise_core::models::{DateInterval, HealthEvent, MindfulnessData, SleepData, SleepStage};

fn minutes(duration: Duration) -> f64 {
    duration.num_seconds() as f64 / 60.0
}

fn hours(duration: Duration) -> f64 {
    duration.num_seconds() as f64 / 3600.0
}

/// Summarize sleep analysis samples
///
/// Stage fields stay `None` when the source never reported that stage,
/// which happens for sources that only record "asleep". Samples with
/// unknown stage codes are ignored.
#[must_use]
pub fn summarize_sleep(events: &[HealthEvent], interval: DateInterval) -> SleepData {
    let mut asleep = None::<Duration>;
    let mut deep = None::<Duration>;
    let mut rem = None::<Duration>;
    let mut awake = None::<Duration>;

    for event in events {
        let Some(stage) = SleepStage::from_code(event.value) else {
            continue;
        };
        let clipped = interval.overlap(event.start, event.end);
        let add = |slot: &mut Option<Duration>| {
            *slot = Some(slot.unwrap_or_else(Duration::zero) + clipped);
        };
        if stage.is_asleep() {
            add(&mut asleep);
        }
        match stage {
            SleepStage::Deep => add(&mut deep),
            SleepStage::Rem => add(&mut rem),
            SleepStage::Awake => add(&mut awake),
            SleepStage::InBed | SleepStage::AsleepUnspecified | SleepStage::Core => {}
        }
    }

    SleepData {
        total_sleep_hours: asleep.map(hours),
        deep_sleep_hours: deep.map(hours),
        rem_sleep_hours: rem.map(hours),
        awake_minutes: awake.map(minutes),
    }
}

/// Summarize mindful session samples
#[must_use]
pub fn summarize_mindfulness(events: &[HealthEvent], interval: DateInterval) -> MindfulnessData {
    if events.is_empty() {
        return MindfulnessData::default();
    }
    let total: Duration = events
        .iter()
        .map(|event| interval.overlap(event.start, event.end))
        .fold(Duration::zero(), |acc, d| acc + d);
    let total_minutes = minutes(total);
    let count = u32::try_from(events.len()).unwrap_or(u32::MAX);

    MindfulnessData {
        mindful_minutes: Some(total_minutes),
        session_count: Some(count),
        average_session_minutes: Some(total_minutes / f64::from(count)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn event(start_hour: u32, end_hour: u32, stage: SleepStage) -> HealthEvent {
        HealthEvent {
            start: Utc.with_ymd_and_hms(2025, 3, 2, start_hour, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 3, 2, end_hour, 0, 0).unwrap(),
            value: stage.code(),
        }
    }

    fn day() -> DateInterval {
        DateInterval::new(
            Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 3, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_sleep_stages_are_summed() {
        let events = [
            event(0, 8, SleepStage::InBed),
            event(0, 3, SleepStage::Core),
            event(3, 5, SleepStage::Deep),
            event(5, 6, SleepStage::Awake),
            event(6, 8, SleepStage::Rem),
        ];
        let sleep = summarize_sleep(&events, day());

        assert_eq!(sleep.total_sleep_hours, Some(7.0));
        assert_eq!(sleep.deep_sleep_hours, Some(2.0));
        assert_eq!(sleep.rem_sleep_hours, Some(2.0));
        assert_eq!(sleep.awake_minutes, Some(60.0));
    }

    #[test]
    fn test_in_bed_only_is_missing_total_sleep() {
        let sleep = summarize_sleep(&[event(0, 8, SleepStage::InBed)], day());
        assert!(sleep.total_sleep_hours.is_none());
        assert_eq!(sleep.awake_minutes, None);
    }

    #[test]
    fn test_unreported_awake_stage_stays_none() {
        let sleep = summarize_sleep(&[event(0, 7, SleepStage::AsleepUnspecified)], day());
        assert!((sleep.total_sleep_hours.unwrap() - 7.0).abs() < 1e-9);
        assert_eq!(sleep.awake_minutes, None);
        assert_eq!(sleep.deep_sleep_hours, None);
    }

    #[test]
    fn test_no_samples_yield_empty_records() {
        assert_eq!(summarize_sleep(&[], day()), SleepData::default());
        assert_eq!(summarize_mindfulness(&[], day()), MindfulnessData::default());
    }

    #[test]
    fn test_mindful_sessions() {
        let start = Utc.with_ymd_and_hms(2025, 3, 2, 7, 0, 0).unwrap();
        let events = [
            HealthEvent {
                start,
                end: start + Duration::minutes(10),
                value: 0,
            },
            HealthEvent {
                start: start + Duration::hours(12),
                end: start + Duration::hours(12) + Duration::minutes(20),
                value: 0,
            },
        ];
        let data = summarize_mindfulness(&events, day());
        assert_eq!(data.mindful_minutes, Some(30.0));
        assert_eq!(data.session_count, Some(2));
        assert_eq!(data.average_session_minutes, Some(15.0));
    }
}
