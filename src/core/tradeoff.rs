//! Closed-form breadth-versus-depth model: a hump-shaped tax revenue curve
//! feeding a fixed budget that is split across the people served.

use std::fmt;

use tracing::debug;

use super::sampler::{ALLOCATION_CURVE_SAMPLES, REVENUE_CURVE_SAMPLES, sample_curve};
use super::types::{BreadthLabel, CurvePoint, TradeoffInputs, TradeoffOutputs, TradeoffResult};

pub const REVENUE_SCALE: f64 = 100.0;
pub const REVENUE_EXPONENT: f64 = 1.0;
pub const MIN_PEOPLE_SERVED: f64 = 5.0;
pub const MAX_PEOPLE_SERVED: f64 = 100.0;
pub const OVERHEAD_BROAD: f64 = 0.06;
pub const OVERHEAD_NARROW: f64 = 0.02;
pub const UTILITY_SCALE: f64 = 1.2;

pub const DEFAULT_BREADTH_PERCENT: f64 = 55.0;
pub const DEFAULT_TAX_PERCENT: f64 = 35.0;

const CONCENTRATED_MAX_PERCENT: f64 = 10.0;
const BROAD_MIN_PERCENT: f64 = 90.0;

pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

impl TradeoffInputs {
    pub fn from_percent(breadth_percent: f64, tax_percent: f64) -> Self {
        Self {
            breadth_fraction: clamp_unit(breadth_percent / 100.0),
            tax_fraction: clamp_unit(tax_percent / 100.0),
        }
    }
}

pub fn tax_revenue(tax_fraction: f64) -> f64 {
    let t = clamp_unit(tax_fraction);
    REVENUE_SCALE * (t * (1.0 - t.powf(REVENUE_EXPONENT)))
}

pub fn people_served(breadth_fraction: f64) -> f64 {
    let b = clamp_unit(breadth_fraction);
    MIN_PEOPLE_SERVED + (MAX_PEOPLE_SERVED - MIN_PEOPLE_SERVED) * b
}

pub fn overhead_factor(breadth_fraction: f64) -> f64 {
    let b = clamp_unit(breadth_fraction);
    1.0 + OVERHEAD_BROAD * b + OVERHEAD_NARROW * (1.0 - b)
}

/// Budget left after overhead, shared evenly. Negative or NaN revenue counts
/// as no budget.
pub fn help_per_person(revenue: f64, breadth_fraction: f64) -> f64 {
    let effective_budget = revenue.max(0.0) / overhead_factor(breadth_fraction);
    effective_budget / people_served(breadth_fraction)
}

pub fn utility_per_person(help: f64) -> f64 {
    1.0 - (-help.max(0.0) / UTILITY_SCALE).exp()
}

pub fn total_impact(revenue: f64, breadth_fraction: f64) -> f64 {
    people_served(breadth_fraction) * utility_per_person(help_per_person(revenue, breadth_fraction))
}

pub fn breadth_label(breadth_percent: f64) -> BreadthLabel {
    let percent = if breadth_percent.is_nan() {
        0.0
    } else {
        breadth_percent.clamp(0.0, 100.0)
    };
    if percent <= CONCENTRATED_MAX_PERCENT {
        BreadthLabel::Concentrated
    } else if percent >= BROAD_MIN_PERCENT {
        BreadthLabel::Broad
    } else {
        BreadthLabel::Mix(percent.round() as u32)
    }
}

impl fmt::Display for BreadthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreadthLabel::Concentrated => write!(f, "Concentrated (few people)"),
            BreadthLabel::Broad => write!(f, "Broad (many people)"),
            BreadthLabel::Mix(percent) => write!(f, "Mix ({percent} / 100)"),
        }
    }
}

pub fn evaluate(inputs: TradeoffInputs) -> TradeoffOutputs {
    let revenue = tax_revenue(inputs.tax_fraction);
    TradeoffOutputs {
        tax_revenue: revenue,
        people_served: people_served(inputs.breadth_fraction),
        help_per_person: help_per_person(revenue, inputs.breadth_fraction),
        impact_score: total_impact(revenue, inputs.breadth_fraction),
    }
}

/// Evaluates the model at the given slider positions and resamples both
/// curves. The allocation curve depends on revenue, so it is rebuilt on every
/// call rather than cached across tax changes.
pub fn run_tradeoff(breadth_percent: f64, tax_percent: f64) -> TradeoffResult {
    let inputs = TradeoffInputs::from_percent(breadth_percent, tax_percent);
    let outputs = evaluate(inputs);
    let revenue = outputs.tax_revenue;

    let revenue_curve = sample_curve(tax_revenue, REVENUE_CURVE_SAMPLES);
    let allocation_curve = sample_curve(
        |b| help_per_person(revenue, b),
        ALLOCATION_CURVE_SAMPLES,
    );

    debug!(
        breadth = inputs.breadth_fraction,
        tax = inputs.tax_fraction,
        revenue,
        impact = outputs.impact_score,
        revenue_peak_x = revenue_curve.peak_x(),
        "tradeoff evaluated"
    );

    TradeoffResult {
        inputs,
        outputs,
        breadth_label: breadth_label(breadth_percent),
        revenue_marker: CurvePoint {
            x: inputs.tax_fraction,
            y: revenue,
        },
        revenue_curve,
        allocation_marker: CurvePoint {
            x: inputs.breadth_fraction,
            y: outputs.help_per_person,
        },
        allocation_curve,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn assert_approx_tol(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    #[test]
    fn tax_revenue_is_zero_at_both_ends_and_peaks_midway() {
        assert_approx(tax_revenue(0.0), 0.0);
        assert_approx(tax_revenue(1.0), 0.0);
        assert_approx(tax_revenue(0.5), 25.0);
        assert!(tax_revenue(0.35) < tax_revenue(0.5));
    }

    #[test]
    fn people_served_spans_min_to_max() {
        assert_approx(people_served(0.0), 5.0);
        assert_approx(people_served(1.0), 100.0);
        assert_approx(people_served(0.55), 57.25);
    }

    #[test]
    fn overhead_moves_from_narrow_to_broad() {
        assert_approx(overhead_factor(0.0), 1.02);
        assert_approx(overhead_factor(1.0), 1.06);
    }

    #[test]
    fn fractions_are_clamped_regardless_of_caller() {
        assert_approx(tax_revenue(-0.4), 0.0);
        assert_approx(tax_revenue(1.7), 0.0);
        assert_approx(people_served(2.0), 100.0);
        assert_approx(people_served(-1.0), 5.0);
        assert_approx(people_served(f64::NAN), 5.0);

        let inputs = TradeoffInputs::from_percent(150.0, -20.0);
        assert_approx(inputs.breadth_fraction, 1.0);
        assert_approx(inputs.tax_fraction, 0.0);
    }

    #[test]
    fn evaluate_default_sliders_matches_reference_values() {
        let outputs = evaluate(TradeoffInputs::from_percent(
            DEFAULT_BREADTH_PERCENT,
            DEFAULT_TAX_PERCENT,
        ));
        assert_approx_tol(outputs.tax_revenue, 22.75, 1e-9);
        assert_approx_tol(outputs.people_served, 57.25, 1e-9);
        assert_approx_tol(outputs.help_per_person, 0.381_362_680_099_573_3, 1e-12);
        assert_approx_tol(outputs.impact_score, 15.586_501_530_217_303, 1e-9);
    }

    #[test]
    fn help_per_person_strictly_decreases_with_breadth() {
        for revenue in [0.5, 10.0, 25.0] {
            let mut previous = help_per_person(revenue, 0.0);
            for i in 1..=100 {
                let current = help_per_person(revenue, i as f64 / 100.0);
                assert!(
                    current < previous,
                    "revenue {revenue}: help rose at breadth {i}%"
                );
                previous = current;
            }
        }
    }

    #[test]
    fn impact_approaches_people_served_with_unbounded_help() {
        for b in [0.0, 0.3, 1.0] {
            assert_approx_tol(total_impact(1e9, b), people_served(b), 1e-6);
        }
        assert_approx(utility_per_person(0.0), 0.0);
        assert_approx(utility_per_person(f64::INFINITY), 1.0);
    }

    #[test]
    fn breadth_label_matches_slider_bands() {
        assert_eq!(breadth_label(0.0), BreadthLabel::Concentrated);
        assert_eq!(breadth_label(10.0), BreadthLabel::Concentrated);
        assert_eq!(breadth_label(11.0), BreadthLabel::Mix(11));
        assert_eq!(breadth_label(55.0), BreadthLabel::Mix(55));
        assert_eq!(breadth_label(90.0), BreadthLabel::Broad);
        assert_eq!(breadth_label(140.0), BreadthLabel::Broad);
        assert_eq!(breadth_label(f64::NAN), BreadthLabel::Concentrated);
        assert_eq!(BreadthLabel::Mix(55).to_string(), "Mix (55 / 100)");
        assert_eq!(BreadthLabel::Broad.to_string(), "Broad (many people)");
    }

    #[test]
    fn run_tradeoff_samples_both_curves() {
        let result = run_tradeoff(DEFAULT_BREADTH_PERCENT, DEFAULT_TAX_PERCENT);

        assert_eq!(result.revenue_curve.points.len(), REVENUE_CURVE_SAMPLES + 1);
        assert_eq!(result.revenue_curve.peak_index, 110);
        assert_approx(result.revenue_curve.peak_value, 25.0);
        assert_approx(result.revenue_curve.peak_x(), 0.5);

        assert_eq!(
            result.allocation_curve.points.len(),
            ALLOCATION_CURVE_SAMPLES + 1
        );
        assert_eq!(result.allocation_curve.peak_index, 0);
        assert_approx(
            result.allocation_curve.peak_value,
            help_per_person(result.outputs.tax_revenue, 0.0),
        );

        assert_approx(result.revenue_marker.x, 0.35);
        assert_approx(result.revenue_marker.y, result.outputs.tax_revenue);
        assert_approx(result.allocation_marker.x, 0.55);
        assert_approx(result.allocation_marker.y, result.outputs.help_per_person);
        assert_eq!(result.breadth_label, BreadthLabel::Mix(55));
    }

    #[test]
    fn allocation_curve_follows_tax_changes() {
        let low = run_tradeoff(50.0, 10.0);
        let high = run_tradeoff(50.0, 50.0);

        assert_eq!(low.revenue_curve, high.revenue_curve);
        assert_ne!(low.allocation_curve, high.allocation_curve);
        assert!(high.allocation_curve.peak_value > low.allocation_curve.peak_value);
    }

    #[test]
    fn zero_tax_yields_flat_allocation_curve() {
        let result = run_tradeoff(40.0, 0.0);
        assert_approx(result.outputs.tax_revenue, 0.0);
        assert_approx(result.outputs.impact_score, 0.0);
        assert!(result.allocation_curve.points.iter().all(|p| p.y == 0.0));
        assert_approx(result.allocation_curve.y_scale(), 1.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_outputs_are_finite_and_non_negative(
            breadth in -50.0f64..150.0,
            tax in -50.0f64..150.0
        ) {
            let outputs = evaluate(TradeoffInputs::from_percent(breadth, tax));
            for value in [
                outputs.tax_revenue,
                outputs.people_served,
                outputs.help_per_person,
                outputs.impact_score,
            ] {
                prop_assert!(value.is_finite());
                prop_assert!(value >= 0.0);
            }
            prop_assert!(outputs.impact_score <= outputs.people_served);
        }

        #[test]
        fn prop_impact_is_non_negative_for_any_revenue(
            revenue in 0.0f64..1_000.0,
            b in 0.0f64..=1.0
        ) {
            let impact = total_impact(revenue, b);
            prop_assert!(impact >= 0.0);
            prop_assert!(impact < people_served(b) + 1e-9);
        }
    }
}
