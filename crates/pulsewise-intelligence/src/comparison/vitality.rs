// ABOUTME: Vitality comparison judged against clinical bands rather than raw percentages
// ABOUTME: Oxygen saturation, BMI, body mass and respiratory rate each use their own band rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

use super::CategoryComparison;
use crate::change::{classify_relative, percent_change, Polarity};
use crate::delta::{Change, MetricDelta, Unit};
use pulsewise_core::constants::thresholds::{
    BMI_HEALTHY_MAX, BMI_HEALTHY_MIN, BMI_POINTS, BODY_MASS_PCT, OXYGEN_SATURATION_HEALTHY,
    OXYGEN_SATURATION_LOW, OXYGEN_SATURATION_POINTS, RESPIRATORY_RATE_MAX, RESPIRATORY_RATE_MIN,
};
use pulsewise_core::models::{HealthCategory, TrendDirection, VitalityData};

/// Vital sign data for two adjacent periods
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VitalityComparison {
    /// Earlier period
    pub previous: VitalityData,
    /// Most recent period
    pub current: VitalityData,
}

impl VitalityComparison {
    /// Pair two periods
    #[must_use]
    pub const fn new(previous: VitalityData, current: VitalityData) -> Self {
        Self { previous, current }
    }

    fn oxygen_saturation(&self) -> Option<MetricDelta> {
        let current = self.current.oxygen_saturation?;
        let previous = self.previous.oxygen_saturation;
        let change = absolute_change(previous, current);
        let direction = if current < OXYGEN_SATURATION_LOW {
            TrendDirection::Declining
        } else if current >= OXYGEN_SATURATION_HEALTHY {
            TrendDirection::Stable
        } else {
            match change {
                Change::Absolute(diff) if diff >= OXYGEN_SATURATION_POINTS => {
                    TrendDirection::Improving
                }
                Change::Absolute(diff) if diff <= -OXYGEN_SATURATION_POINTS => {
                    TrendDirection::Declining
                }
                _ => TrendDirection::Stable,
            }
        };
        Some(MetricDelta::judged(
            "Blood Oxygen",
            Unit::Percent,
            previous,
            current,
            change,
            direction,
        ))
    }

    fn body_mass_index(&self) -> Option<MetricDelta> {
        let current = self.current.body_mass_index?;
        let previous = self.previous.body_mass_index;
        let direction = previous.map_or(TrendDirection::Stable, |prev| {
            match (bmi_in_band(prev), bmi_in_band(current)) {
                (false, true) => TrendDirection::Improving,
                (true, false) => TrendDirection::Declining,
                (true, true) => TrendDirection::Stable,
                (false, false) => {
                    let moved = bmi_distance(current) - bmi_distance(prev);
                    if moved <= -BMI_POINTS {
                        TrendDirection::Improving
                    } else if moved >= BMI_POINTS {
                        TrendDirection::Declining
                    } else {
                        TrendDirection::Stable
                    }
                }
            }
        });
        Some(MetricDelta::judged(
            "BMI",
            Unit::Index,
            previous,
            current,
            absolute_change(previous, current),
            direction,
        ))
    }

    fn body_mass(&self) -> Option<MetricDelta> {
        let current = self.current.body_mass?;
        let previous = self.previous.body_mass;
        let pct = percent_change(previous, Some(current));
        // Weight change only matters relative to which side of the BMI band the user is on
        let polarity = match self.current.body_mass_index {
            Some(bmi) if bmi > BMI_HEALTHY_MAX => Some(Polarity::LowerIsBetter),
            Some(bmi) if bmi < BMI_HEALTHY_MIN => Some(Polarity::HigherIsBetter),
            _ => None,
        };
        let direction = match (pct, polarity) {
            (Some(pct), Some(polarity)) => classify_relative(pct, BODY_MASS_PCT, polarity),
            _ => TrendDirection::Stable,
        };
        Some(MetricDelta::judged(
            "Body Mass",
            Unit::Kilograms,
            previous,
            current,
            pct.map_or(Change::Unknown, Change::Percent),
            direction,
        ))
    }

    fn respiratory_rate(&self) -> Option<MetricDelta> {
        let current = self.current.respiratory_rate?;
        let previous = self.previous.respiratory_rate;
        let direction = if (RESPIRATORY_RATE_MIN..=RESPIRATORY_RATE_MAX).contains(&current) {
            TrendDirection::Stable
        } else {
            TrendDirection::Declining
        };
        Some(MetricDelta::judged(
            "Respiratory Rate",
            Unit::BreathsPerMinute,
            previous,
            current,
            absolute_change(previous, current),
            direction,
        ))
    }
}

fn absolute_change(previous: Option<f64>, current: f64) -> Change {
    previous.map_or(Change::Unknown, |prev| Change::Absolute(current - prev))
}

fn bmi_in_band(bmi: f64) -> bool {
    (BMI_HEALTHY_MIN..=BMI_HEALTHY_MAX).contains(&bmi)
}

fn bmi_distance(bmi: f64) -> f64 {
    if bmi < BMI_HEALTHY_MIN {
        BMI_HEALTHY_MIN - bmi
    } else if bmi > BMI_HEALTHY_MAX {
        bmi - BMI_HEALTHY_MAX
    } else {
        0.0
    }
}

impl CategoryComparison for VitalityComparison {
    fn category(&self) -> HealthCategory {
        HealthCategory::Vitality
    }

    fn deltas(&self) -> Vec<MetricDelta> {
        [
            self.oxygen_saturation(),
            self.body_mass_index(),
            self.body_mass(),
            self.respiratory_rate(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn has_data(&self) -> bool {
        self.current.has_any_data()
    }

    fn missing_critical(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oxygen(previous: Option<f64>, current: f64) -> TrendDirection {
        VitalityComparison::new(
            VitalityData {
                oxygen_saturation: previous,
                ..VitalityData::default()
            },
            VitalityData {
                oxygen_saturation: Some(current),
                ..VitalityData::default()
            },
        )
        .deltas()[0]
            .direction
    }

    fn bmi(previous: f64, current: f64) -> TrendDirection {
        VitalityComparison::new(
            VitalityData {
                body_mass_index: Some(previous),
                ..VitalityData::default()
            },
            VitalityData {
                body_mass_index: Some(current),
                ..VitalityData::default()
            },
        )
        .deltas()[0]
            .direction
    }

    #[test]
    fn test_oxygen_saturation_bands() {
        assert_eq!(oxygen(Some(97.0), 89.0), TrendDirection::Declining);
        assert_eq!(oxygen(Some(90.0), 96.0), TrendDirection::Stable);
        assert_eq!(oxygen(Some(91.0), 92.5), TrendDirection::Improving);
        assert_eq!(oxygen(Some(94.0), 92.0), TrendDirection::Declining);
        assert_eq!(oxygen(Some(92.0), 92.5), TrendDirection::Stable);
        assert_eq!(oxygen(None, 92.0), TrendDirection::Stable);
    }

    #[test]
    fn test_bmi_band_transitions() {
        assert_eq!(bmi(26.0, 24.5), TrendDirection::Improving);
        assert_eq!(bmi(24.0, 25.5), TrendDirection::Declining);
        assert_eq!(bmi(22.0, 23.0), TrendDirection::Stable);
        assert_eq!(bmi(28.0, 27.0), TrendDirection::Improving);
        assert_eq!(bmi(27.0, 27.3), TrendDirection::Stable);
        assert_eq!(bmi(17.8, 17.0), TrendDirection::Declining);
    }

    #[test]
    fn test_body_mass_polarity_follows_bmi() {
        let comparison = VitalityComparison::new(
            VitalityData {
                body_mass: Some(90.0),
                ..VitalityData::default()
            },
            VitalityData {
                body_mass_index: Some(28.0),
                body_mass: Some(87.0),
                ..VitalityData::default()
            },
        );
        assert_eq!(comparison.deltas()[1].direction, TrendDirection::Improving);

        let in_band = VitalityComparison::new(
            VitalityData {
                body_mass: Some(70.0),
                ..VitalityData::default()
            },
            VitalityData {
                body_mass_index: Some(22.0),
                body_mass: Some(65.0),
                ..VitalityData::default()
            },
        );
        assert_eq!(in_band.deltas()[1].direction, TrendDirection::Stable);
    }

    #[test]
    fn test_respiratory_rate_outside_band_declines() {
        let comparison = VitalityComparison::new(
            VitalityData::default(),
            VitalityData {
                respiratory_rate: Some(22.0),
                ..VitalityData::default()
            },
        );
        let deltas = comparison.deltas();
        assert_eq!(deltas[0].direction, TrendDirection::Declining);
        assert_eq!(deltas[0].change, Change::Unknown);
    }
}
