use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::{
    AvailabilitySummary, CurvePoint, DEFAULT_BREADTH_PERCENT, DEFAULT_HOUSING_COST_PER_UNIT,
    DEFAULT_INITIAL_UNITS, DEFAULT_MONTHLY_INFLOW, DEFAULT_STAY_LENGTH_YEARS, DEFAULT_TAX_PERCENT,
    GROWTH_RATE_RANGE, HOUSING_COST_RANGE, INITIAL_UNITS_RANGE, MONTHLY_INFLOW_RANGE,
    ParameterError, PlotArea, Result, STAY_LENGTH_RANGE, SimulationParameters, SimulationTrace,
    SummaryStatistics, TradeoffResult, run_simulation, run_tradeoff,
};

#[derive(Parser, Debug)]
#[command(
    name = "psh-models",
    about = "Supportive housing occupancy projection and breadth/depth tradeoff model"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Log engine passes at debug level")]
    pub verbose: bool,
    #[arg(long, global = true, help = "Indent the JSON output")]
    pub pretty: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Project occupancy, turnover, and budget over a ten-year horizon
    Simulate(SimulateArgs),
    /// Evaluate tax revenue, help per person, and impact at a breadth/tax setting
    Tradeoff(TradeoffArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    #[arg(long, default_value_t = DEFAULT_INITIAL_UNITS, help = "Housing units at month 0")]
    pub initial_units: i64,
    #[arg(
        long,
        default_value_t = DEFAULT_HOUSING_COST_PER_UNIT,
        help = "Annual cost per unit, used for budgets only"
    )]
    pub housing_cost: i64,
    #[arg(long, default_value_t = DEFAULT_MONTHLY_INFLOW, help = "New occupants per month")]
    pub monthly_inflow: i64,
    #[arg(
        long,
        default_value_t = DEFAULT_STAY_LENGTH_YEARS,
        help = "Average length of stay in years"
    )]
    pub stay_length: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        allow_hyphen_values = true,
        help = "Annual housing stock growth rate in percent, e.g. -2.5"
    )]
    pub growth_rate: f64,
    #[arg(long, help = "Omit the month-by-month trace from the output")]
    pub summary_only: bool,
    #[arg(long, help = "JSON object of camelCase overrides applied on top of the flags")]
    pub payload: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct TradeoffArgs {
    #[arg(
        long,
        default_value_t = DEFAULT_BREADTH_PERCENT,
        allow_hyphen_values = true,
        help = "Service breadth in percent; clamped to 0..=100"
    )]
    pub breadth: f64,
    #[arg(
        long,
        default_value_t = DEFAULT_TAX_PERCENT,
        allow_hyphen_values = true,
        help = "Tax rate in percent; clamped to 0..=100"
    )]
    pub tax: f64,
    #[arg(long, help = "Canvas width; with --plot-height, adds projected curve coordinates")]
    pub plot_width: Option<f64>,
    #[arg(long, help = "Canvas height; with --plot-width, adds projected curve coordinates")]
    pub plot_height: Option<f64>,
    #[arg(long, help = "JSON object of camelCase overrides applied on top of the flags")]
    pub payload: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
struct SimulatePayload {
    initial_units: Option<i64>,
    housing_cost: Option<i64>,
    monthly_inflow: Option<i64>,
    stay_length: Option<f64>,
    growth_rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
struct TradeoffPayload {
    breadth: Option<f64>,
    tax: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulateResponse<'a> {
    parameters: SimulationParameters,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<&'a SimulationTrace>,
    availability: &'a AvailabilitySummary,
    summary: &'a SummaryStatistics,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DisplayOutputs {
    tax_revenue: String,
    people_served: String,
    help_per_person: String,
    impact_score: String,
    breadth: String,
    tax: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Projection {
    revenue_curve: Vec<CurvePoint>,
    revenue_marker: CurvePoint,
    allocation_curve: Vec<CurvePoint>,
    allocation_marker: CurvePoint,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TradeoffResponse<'a> {
    #[serde(flatten)]
    result: &'a TradeoffResult,
    display: DisplayOutputs,
    #[serde(skip_serializing_if = "Option::is_none")]
    projection: Option<Projection>,
}

fn ensure_finite(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ParameterError::NonFinite { field })
    }
}

fn ensure_within(field: &'static str, value: f64, (min, max): (f64, f64)) -> Result<()> {
    ensure_finite(field, value)?;
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ParameterError::OutOfRange {
            field,
            min,
            max,
            value,
        })
    }
}

fn as_f64_range((min, max): (i64, i64)) -> (f64, f64) {
    (min as f64, max as f64)
}

fn apply_simulate_payload(args: &mut SimulateArgs, json: &str) -> Result<()> {
    let payload = serde_json::from_str::<SimulatePayload>(json)?;
    if let Some(v) = payload.initial_units {
        args.initial_units = v;
    }
    if let Some(v) = payload.housing_cost {
        args.housing_cost = v;
    }
    if let Some(v) = payload.monthly_inflow {
        args.monthly_inflow = v;
    }
    if let Some(v) = payload.stay_length {
        args.stay_length = v;
    }
    if let Some(v) = payload.growth_rate {
        args.growth_rate = v;
    }
    Ok(())
}

fn apply_tradeoff_payload(args: &mut TradeoffArgs, json: &str) -> Result<()> {
    let payload = serde_json::from_str::<TradeoffPayload>(json)?;
    if let Some(v) = payload.breadth {
        args.breadth = v;
    }
    if let Some(v) = payload.tax {
        args.tax = v;
    }
    Ok(())
}

fn build_params(args: &SimulateArgs) -> Result<SimulationParameters> {
    if args.initial_units <= 0 {
        return Err(ParameterError::NonPositiveUnits(args.initial_units));
    }
    ensure_within(
        "initial-units",
        args.initial_units as f64,
        as_f64_range(INITIAL_UNITS_RANGE),
    )?;
    ensure_within(
        "housing-cost",
        args.housing_cost as f64,
        as_f64_range(HOUSING_COST_RANGE),
    )?;
    ensure_within(
        "monthly-inflow",
        args.monthly_inflow as f64,
        as_f64_range(MONTHLY_INFLOW_RANGE),
    )?;
    ensure_within("stay-length", args.stay_length, STAY_LENGTH_RANGE)?;
    ensure_within("growth-rate", args.growth_rate, GROWTH_RATE_RANGE)?;

    Ok(SimulationParameters {
        initial_units: args.initial_units,
        monthly_inflow: args.monthly_inflow,
        stay_length_years: args.stay_length,
        annual_growth_rate_percent: args.growth_rate,
        housing_cost_per_unit: args.housing_cost,
        ..SimulationParameters::default()
    })
}

fn clamp_percent_with_warning(field: &'static str, value: f64) -> Result<f64> {
    ensure_finite(field, value)?;
    if !(0.0..=100.0).contains(&value) {
        warn!(field, value, "outside 0..=100, clamping");
    }
    Ok(value.clamp(0.0, 100.0))
}

fn display_outputs(result: &TradeoffResult) -> DisplayOutputs {
    let outputs = &result.outputs;
    DisplayOutputs {
        tax_revenue: format!("{:.2} units", outputs.tax_revenue),
        people_served: format!("{:.0} people (relative)", outputs.people_served),
        help_per_person: format!("{:.3} units/person", outputs.help_per_person),
        impact_score: format!("{:.1} impact units", outputs.impact_score),
        breadth: result.breadth_label.to_string(),
        tax: format!("{:.0}%", result.inputs.tax_fraction * 100.0),
    }
}

fn build_projection(result: &TradeoffResult, area: PlotArea) -> Projection {
    Projection {
        revenue_curve: area.project(&result.revenue_curve),
        revenue_marker: area.project_point(result.revenue_marker, &result.revenue_curve),
        allocation_curve: area.project(&result.allocation_curve),
        allocation_marker: area.project_point(result.allocation_marker, &result.allocation_curve),
    }
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

fn simulate_command(mut args: SimulateArgs, pretty: bool) -> Result<String> {
    if let Some(json) = args.payload.take() {
        apply_simulate_payload(&mut args, &json)?;
    }
    let params = build_params(&args)?;
    let result = run_simulation(&params);

    info!(
        initial_units = params.initial_units,
        monthly_inflow = params.monthly_inflow,
        stay_length_years = params.stay_length_years,
        growth_rate = params.annual_growth_rate_percent,
        year10_occupancy = result.summary.year10_occupancy_rate_percent,
        "simulation finished"
    );

    to_json(
        &SimulateResponse {
            parameters: params,
            trace: (!args.summary_only).then_some(&result.trace),
            availability: &result.availability,
            summary: &result.summary,
        },
        pretty,
    )
}

fn tradeoff_command(mut args: TradeoffArgs, pretty: bool) -> Result<String> {
    if let Some(json) = args.payload.take() {
        apply_tradeoff_payload(&mut args, &json)?;
    }
    let breadth = clamp_percent_with_warning("breadth", args.breadth)?;
    let tax = clamp_percent_with_warning("tax", args.tax)?;
    let result = run_tradeoff(breadth, tax);

    let projection = match (args.plot_width, args.plot_height) {
        (Some(width), Some(height)) => {
            ensure_finite("plot-width", width)?;
            ensure_finite("plot-height", height)?;
            Some(build_projection(&result, PlotArea::for_canvas(width, height)))
        }
        (None, None) => None,
        _ => {
            return Err(ParameterError::Incomplete(
                "--plot-width and --plot-height must be given together",
            ));
        }
    };

    info!(
        breadth,
        tax,
        impact = result.outputs.impact_score,
        "tradeoff finished"
    );

    to_json(
        &TradeoffResponse {
            result: &result,
            display: display_outputs(&result),
            projection,
        },
        pretty,
    )
}

pub fn run(cli: Cli) -> Result<String> {
    match cli.command {
        Command::Simulate(args) => simulate_command(args, cli.pretty),
        Command::Tradeoff(args) => tradeoff_command(args, cli.pretty),
    }
}
