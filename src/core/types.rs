use serde::Serialize;

pub const TARGET_OCCUPANCY: f64 = 0.93;
pub const HORIZON_MONTHS: u32 = 120;
pub const DEFAULT_INITIAL_UNITS: i64 = 9_070;
pub const DEFAULT_MONTHLY_INFLOW: i64 = 70;
pub const DEFAULT_STAY_LENGTH_YEARS: f64 = 10.0;
pub const DEFAULT_HOUSING_COST_PER_UNIT: i64 = 40_000;

// keeps the monthly turnover hazard below one
pub const MIN_STAY_LENGTH_YEARS: f64 = 0.1;
pub const MAX_ABS_GROWTH_RATE_PERCENT: f64 = 100.0;

pub const INITIAL_UNITS_RANGE: (i64, i64) = (1, 1_000_000);
pub const HOUSING_COST_RANGE: (i64, i64) = (20_000, 70_000);
pub const GROWTH_RATE_RANGE: (f64, f64) = (-10.0, 10.0);
pub const MONTHLY_INFLOW_RANGE: (i64, i64) = (0, 500);
pub const STAY_LENGTH_RANGE: (f64, f64) = (1.0, 20.0);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationParameters {
    pub initial_units: i64,
    pub target_occupancy_fraction: f64,
    pub monthly_inflow: i64,
    pub stay_length_years: f64,
    pub annual_growth_rate_percent: f64,
    pub horizon_months: u32,
    pub housing_cost_per_unit: i64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            initial_units: DEFAULT_INITIAL_UNITS,
            target_occupancy_fraction: TARGET_OCCUPANCY,
            monthly_inflow: DEFAULT_MONTHLY_INFLOW,
            stay_length_years: DEFAULT_STAY_LENGTH_YEARS,
            annual_growth_rate_percent: 0.0,
            horizon_months: HORIZON_MONTHS,
            housing_cost_per_unit: DEFAULT_HOUSING_COST_PER_UNIT,
        }
    }
}

impl SimulationParameters {
    pub fn sanitized(self) -> Self {
        let stay_length_years = if self.stay_length_years.is_nan() {
            DEFAULT_STAY_LENGTH_YEARS
        } else {
            self.stay_length_years.max(MIN_STAY_LENGTH_YEARS)
        };
        let annual_growth_rate_percent = if self.annual_growth_rate_percent.is_nan() {
            0.0
        } else {
            self.annual_growth_rate_percent
                .clamp(-MAX_ABS_GROWTH_RATE_PERCENT, MAX_ABS_GROWTH_RATE_PERCENT)
        };

        Self {
            initial_units: self.initial_units.max(1),
            target_occupancy_fraction: TARGET_OCCUPANCY,
            monthly_inflow: self.monthly_inflow.max(0),
            stay_length_years,
            annual_growth_rate_percent,
            horizon_months: HORIZON_MONTHS,
            housing_cost_per_unit: self.housing_cost_per_unit.max(1),
        }
    }

    pub fn initial_occupied(&self) -> i64 {
        (self.initial_units as f64 * self.target_occupancy_fraction).round() as i64
    }

    pub fn monthly_growth_rate(&self) -> f64 {
        self.annual_growth_rate_percent / (100.0 * 12.0)
    }

    pub fn monthly_turnover_rate(&self) -> f64 {
        1.0 / (self.stay_length_years * 12.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRecord {
    pub month_index: u32,
    pub year_index: u32,
    pub total_units: i64,
    pub occupied_units: i64,
    pub occupancy_rate_percent: f64,
    pub turnover_units: i64,
    pub inflow_units: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SimulationTrace {
    records: Vec<MonthlyRecord>,
}

impl SimulationTrace {
    pub(crate) fn from_records(records: Vec<MonthlyRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[MonthlyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, month_index: usize) -> Option<&MonthlyRecord> {
        self.records.get(month_index)
    }

    pub fn last(&self) -> Option<&MonthlyRecord> {
        self.records.last()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySummary {
    pub month1_available_units: i64,
    pub month1_annual_available: i64,
    pub year10_available_units: i64,
    pub year10_annual_available: i64,
    pub cumulative_available_units: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitChangeDirection {
    Added,
    Removed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStatistics {
    pub month1_occupancy_rate_percent: f64,
    pub year10_occupancy_rate_percent: f64,
    pub month1_on_target: bool,
    pub year10_on_target: bool,
    pub year1_units: i64,
    pub year10_units: i64,
    pub year1_budget: i64,
    pub year10_budget: i64,
    pub year_one_unit_change: i64,
    pub year_one_change_direction: UnitChangeDirection,
    pub monthly_churn_percent: f64,
    pub annual_churn_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub trace: SimulationTrace,
    pub availability: AvailabilitySummary,
    pub summary: SummaryStatistics,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeoffInputs {
    pub breadth_fraction: f64,
    pub tax_fraction: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeoffOutputs {
    pub tax_revenue: f64,
    pub people_served: f64,
    pub help_per_person: f64,
    pub impact_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveSample {
    pub points: Vec<CurvePoint>,
    pub peak_index: usize,
    pub peak_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "percent", rename_all = "lowercase")]
pub enum BreadthLabel {
    Concentrated,
    Broad,
    Mix(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeoffResult {
    pub inputs: TradeoffInputs,
    pub outputs: TradeoffOutputs,
    pub breadth_label: BreadthLabel,
    pub revenue_curve: CurveSample,
    pub revenue_marker: CurvePoint,
    pub allocation_curve: CurveSample,
    pub allocation_marker: CurvePoint,
}

