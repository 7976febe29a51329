use tracing::debug;

use super::types::{
    AvailabilitySummary, MonthlyRecord, SimulationParameters, SimulationResult, SimulationTrace,
    SummaryStatistics, UnitChangeDirection,
};

const ON_TARGET_MIN_PERCENT: f64 = 92.0;
const ON_TARGET_MAX_PERCENT: f64 = 94.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HousingState {
    pub total_units: i64,
    pub occupied_units: i64,
}

impl HousingState {
    pub fn initial(params: &SimulationParameters) -> Self {
        Self {
            total_units: params.initial_units,
            occupied_units: params.initial_occupied(),
        }
    }

    fn gap_to_target(self, target_fraction: f64) -> i64 {
        ((self.total_units as f64 * target_fraction).round() as i64)
            .saturating_sub(self.occupied_units)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthStep {
    pub state: HousingState,
    pub new_units: i64,
    pub turnover: i64,
}

pub fn step_month(state: HousingState, params: &SimulationParameters) -> MonthStep {
    let params = params.sanitized();

    // floor, not truncation: shrinking stock loses the extra unit
    let new_units = (state.total_units as f64 * params.monthly_growth_rate()).floor() as i64;
    let total_units = state.total_units.saturating_add(new_units);

    let turnover = (state.occupied_units as f64 * params.monthly_turnover_rate()).round() as i64;
    let occupied_units = state
        .occupied_units
        .saturating_sub(turnover)
        .saturating_add(params.monthly_inflow)
        .min(total_units)
        .max(0);

    MonthStep {
        state: HousingState {
            total_units,
            occupied_units,
        },
        new_units,
        turnover,
    }
}

pub fn occupancy_rate_percent(state: HousingState) -> f64 {
    if state.total_units <= 0 {
        return 0.0;
    }
    (state.occupied_units as f64 / state.total_units as f64 * 1000.0).round() / 10.0
}

pub fn is_on_target(rate_percent: f64) -> bool {
    (ON_TARGET_MIN_PERCENT..=ON_TARGET_MAX_PERCENT).contains(&rate_percent)
}

struct AvailabilityAccumulator {
    month1_available_units: i64,
    cumulative_available_units: i64,
}

impl AvailabilityAccumulator {
    fn new(initial: HousingState, target_fraction: f64) -> Self {
        Self {
            month1_available_units: initial.gap_to_target(target_fraction),
            cumulative_available_units: 0,
        }
    }

    fn observe(&mut self, step: &MonthStep) {
        let added = step.new_units.max(0).saturating_add(step.turnover);
        self.cumulative_available_units = self.cumulative_available_units.saturating_add(added);
    }

    fn finish(self, final_state: HousingState, target_fraction: f64) -> AvailabilitySummary {
        let year10_available_units = final_state.gap_to_target(target_fraction);
        AvailabilitySummary {
            month1_available_units: self.month1_available_units,
            month1_annual_available: self.month1_available_units.saturating_mul(12),
            year10_available_units,
            year10_annual_available: year10_available_units.saturating_mul(12),
            cumulative_available_units: self.cumulative_available_units,
        }
    }
}

fn monthly_record(
    month_index: u32,
    step: &MonthStep,
    params: &SimulationParameters,
) -> MonthlyRecord {
    MonthlyRecord {
        month_index,
        year_index: month_index / 12,
        total_units: step.state.total_units,
        occupied_units: step.state.occupied_units,
        occupancy_rate_percent: occupancy_rate_percent(step.state),
        turnover_units: step.turnover,
        inflow_units: params.monthly_inflow,
    }
}

pub fn run_simulation(params: &SimulationParameters) -> SimulationResult {
    let params = params.sanitized();
    let target = params.target_occupancy_fraction;

    let mut state = HousingState::initial(&params);
    let mut availability = AvailabilityAccumulator::new(state, target);
    let mut records = Vec::with_capacity(params.horizon_months as usize + 1);

    for month_index in 0..=params.horizon_months {
        let step = step_month(state, &params);
        availability.observe(&step);
        records.push(monthly_record(month_index, &step, &params));
        state = step.state;
    }

    let trace = SimulationTrace::from_records(records);
    let availability = availability.finish(state, target);
    let summary = summarize(&trace, &params);

    debug!(
        months = trace.len(),
        final_units = state.total_units,
        final_occupied = state.occupied_units,
        cumulative_available = availability.cumulative_available_units,
        "housing simulation complete"
    );

    SimulationResult {
        trace,
        availability,
        summary,
    }
}

pub fn summarize(trace: &SimulationTrace, params: &SimulationParameters) -> SummaryStatistics {
    let params = params.sanitized();
    let horizon = params.horizon_months as usize;
    let month1_rate = trace.get(0).map_or(0.0, |r| r.occupancy_rate_percent);
    let year10_rate = trace.get(horizon).map_or(0.0, |r| r.occupancy_rate_percent);
    let year1_units = trace.get(12).map_or(params.initial_units, |r| r.total_units);
    let year10_units = trace.get(horizon).map_or(params.initial_units, |r| r.total_units);

    let year_one_unit_change = round_half_up(
        params.initial_units as f64 * (params.annual_growth_rate_percent / 100.0),
    ) as i64;

    SummaryStatistics {
        month1_occupancy_rate_percent: month1_rate,
        year10_occupancy_rate_percent: year10_rate,
        month1_on_target: is_on_target(month1_rate),
        year10_on_target: is_on_target(year10_rate),
        year1_units,
        year10_units,
        year1_budget: year1_units.saturating_mul(params.housing_cost_per_unit),
        year10_budget: year10_units.saturating_mul(params.housing_cost_per_unit),
        year_one_unit_change,
        year_one_change_direction: if year_one_unit_change >= 0 {
            UnitChangeDirection::Added
        } else {
            UnitChangeDirection::Removed
        },
        monthly_churn_percent: (params.monthly_turnover_rate() * 1000.0).round() / 10.0,
        annual_churn_percent: (1.0 / params.stay_length_years * 1000.0).round() / 10.0,
    }
}

// Ties go toward positive infinity, so -453.5 becomes -453.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
