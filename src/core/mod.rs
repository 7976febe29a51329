mod engine;
mod error;
mod sampler;
mod tradeoff;
mod types;

pub use engine::{
    HousingState, MonthStep, is_on_target, occupancy_rate_percent, run_simulation, step_month,
    summarize,
};
pub use error::{ParameterError, Result};
pub use sampler::{ALLOCATION_CURVE_SAMPLES, PlotArea, REVENUE_CURVE_SAMPLES, sample_curve};
pub use tradeoff::{
    DEFAULT_BREADTH_PERCENT, DEFAULT_TAX_PERCENT, breadth_label, clamp_unit, evaluate,
    help_per_person, overhead_factor, people_served, run_tradeoff, tax_revenue, total_impact,
    utility_per_person,
};
pub use types::{
    AvailabilitySummary, BreadthLabel, CurvePoint, CurveSample, DEFAULT_HOUSING_COST_PER_UNIT,
    DEFAULT_INITIAL_UNITS, DEFAULT_MONTHLY_INFLOW, DEFAULT_STAY_LENGTH_YEARS, GROWTH_RATE_RANGE,
    HORIZON_MONTHS, HOUSING_COST_RANGE, INITIAL_UNITS_RANGE, MONTHLY_INFLOW_RANGE, MonthlyRecord,
    STAY_LENGTH_RANGE, SimulationParameters, SimulationResult, SimulationTrace, SummaryStatistics,
    TARGET_OCCUPANCY, TradeoffInputs, TradeoffOutputs, TradeoffResult, UnitChangeDirection,
};
