use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::BatteryRoiError;
use crate::roi::calculator::{calculate, RoiOutputs};
use crate::roi::inputs::RoiInputs;
use crate::types::*;
use crate::BatteryRoiResult;

/// Upper bound on evaluated cells in one grid.
const MAX_GRID_CELLS: usize = 2500;

/// A numeric `RoiInputs` field that can be swept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoiField {
    CapexCogs,
    GrantPct,
    CapacityKwh,
    InverterKw,
    Dod,
    Efficiency,
    PvCyclesPerYear,
    ArbitrageCyclesPerYear,
    AnnualPvKwh,
    PurchasePriceSekPerKwh,
    DemandPriceSekPerKwMonth,
    SpreadSekPerKwh,
    OAndM,
    Wacc,
    Degradation,
}

impl RoiField {
    fn slot<'a>(&self, input: &'a mut RoiInputs) -> &'a mut Decimal {
        match self {
            RoiField::CapexCogs => &mut input.capex_cogs,
            RoiField::GrantPct => &mut input.grant_pct,
            RoiField::CapacityKwh => &mut input.capacity_kwh,
            RoiField::InverterKw => &mut input.inverter_kw,
            RoiField::Dod => &mut input.dod,
            RoiField::Efficiency => &mut input.efficiency,
            RoiField::PvCyclesPerYear => &mut input.pv_cycles_per_year,
            RoiField::ArbitrageCyclesPerYear => &mut input.arbitrage_cycles_per_year,
            RoiField::AnnualPvKwh => &mut input.annual_pv_kwh,
            RoiField::PurchasePriceSekPerKwh => &mut input.purchase_price_sek_per_kwh,
            RoiField::DemandPriceSekPerKwMonth => &mut input.demand_price_sek_per_kw_month,
            RoiField::SpreadSekPerKwh => &mut input.spread_sek_per_kwh,
            RoiField::OAndM => &mut input.o_and_m,
            RoiField::Wacc => &mut input.wacc,
            RoiField::Degradation => &mut input.degradation,
        }
    }

    fn current(&self, input: &RoiInputs) -> Decimal {
        match self {
            RoiField::CapexCogs => input.capex_cogs,
            RoiField::GrantPct => input.grant_pct,
            RoiField::CapacityKwh => input.capacity_kwh,
            RoiField::InverterKw => input.inverter_kw,
            RoiField::Dod => input.dod,
            RoiField::Efficiency => input.efficiency,
            RoiField::PvCyclesPerYear => input.pv_cycles_per_year,
            RoiField::ArbitrageCyclesPerYear => input.arbitrage_cycles_per_year,
            RoiField::AnnualPvKwh => input.annual_pv_kwh,
            RoiField::PurchasePriceSekPerKwh => input.purchase_price_sek_per_kwh,
            RoiField::DemandPriceSekPerKwMonth => input.demand_price_sek_per_kw_month,
            RoiField::SpreadSekPerKwh => input.spread_sek_per_kwh,
            RoiField::OAndM => input.o_and_m,
            RoiField::Wacc => input.wacc,
            RoiField::Degradation => input.degradation,
        }
    }
}

/// Output figure read from each evaluated cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoiMetric {
    AnnualNet,
    Npv,
    Payback,
    Irr,
    NetInvestment,
}

impl RoiMetric {
    /// `None` when the metric is a sentinel for this outcome.
    pub fn extract(&self, out: &RoiOutputs) -> Option<Decimal> {
        match self {
            RoiMetric::AnnualNet => Some(out.annual_net_sek),
            RoiMetric::Npv => Some(out.npv),
            RoiMetric::Payback => out.payback.years(),
            RoiMetric::Irr => out.irr.rate(),
            RoiMetric::NetInvestment => Some(out.details.net_investment),
        }
    }
}

/// Sweep specification for one input field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityVariable {
    pub field: RoiField,
    pub min: Decimal,
    pub max: Decimal,
    pub step: Decimal,
}

/// Input for 2-way sensitivity analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityInput {
    /// Base case inputs; every cell overrides two of these fields
    pub base_inputs: RoiInputs,
    /// Row variable
    pub variable_1: SensitivityVariable,
    /// Column variable
    pub variable_2: SensitivityVariable,
    pub output_metric: RoiMetric,
}

/// Output of 2-way sensitivity analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityOutput {
    pub variable_1: RoiField,
    pub variable_2: RoiField,
    pub variable_1_values: Vec<Decimal>,
    pub variable_2_values: Vec<Decimal>,
    pub output_metric: RoiMetric,
    /// Matrix[i][j] = metric when variable_1 = variable_1_values[i], variable_2 = variable_2_values[j]
    pub matrix: Vec<Vec<Option<Decimal>>>,
    /// Metric at the unmodified base inputs
    pub base_case_value: Option<Decimal>,
    /// Grid cell closest to the base inputs (row, col)
    pub base_case_position: (usize, usize),
}

/// Generate the sweep values for a sensitivity variable from min to max with step.
fn generate_sweep_values(var: &SensitivityVariable) -> BatteryRoiResult<Vec<Decimal>> {
    let field = format!("variable:{:?}", var.field);
    if var.step <= Decimal::ZERO {
        return Err(BatteryRoiError::InvalidInput {
            field,
            reason: "Step must be positive".into(),
        });
    }
    if var.min > var.max {
        return Err(BatteryRoiError::InvalidInput {
            field,
            reason: "Min must be <= max".into(),
        });
    }

    let mut values = Vec::new();
    let mut current = var.min;
    while current <= var.max {
        values.push(current);
        if values.len() > MAX_GRID_CELLS {
            return Err(BatteryRoiError::InvalidInput {
                field,
                reason: format!("Sweep exceeds {MAX_GRID_CELLS} values"),
            });
        }
        match current.checked_add(var.step) {
            Some(next) => current = next,
            None => break,
        }
    }
    // Ensure max is included if step doesn't land exactly on it
    if let Some(&last) = values.last() {
        if last < var.max {
            values.push(var.max);
        }
    }

    Ok(values)
}

/// Find the closest index to a target value in a sorted list.
fn closest_index(values: &[Decimal], target: Decimal) -> usize {
    values
        .iter()
        .enumerate()
        .min_by_key(|(_, v)| v.checked_sub(target).map_or(Decimal::MAX, |d| d.abs()))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Evaluate a 2-way sensitivity grid by re-running the full ROI calculation
/// for every combination of the two swept fields.
pub fn evaluate_sensitivity(
    input: &SensitivityInput,
) -> BatteryRoiResult<ComputationOutput<SensitivityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.variable_1.field == input.variable_2.field {
        return Err(BatteryRoiError::invalid(
            "variable_2",
            "Sensitivity variables must be different fields",
        ));
    }

    let v1_values = generate_sweep_values(&input.variable_1)?;
    let v2_values = generate_sweep_values(&input.variable_2)?;
    if v1_values.len() * v2_values.len() > MAX_GRID_CELLS {
        return Err(BatteryRoiError::invalid(
            "variable_1",
            format!("Grid exceeds {MAX_GRID_CELLS} cells"),
        ));
    }

    let base = calculate(&input.base_inputs)?;
    let base_case_value = input.output_metric.extract(&base.result);

    let mut matrix = Vec::with_capacity(v1_values.len());
    let mut sentinel_cells = 0usize;

    for v1 in &v1_values {
        let mut row = Vec::with_capacity(v2_values.len());
        for v2 in &v2_values {
            let mut cell_inputs = input.base_inputs.clone();
            *input.variable_1.field.slot(&mut cell_inputs) = *v1;
            *input.variable_2.field.slot(&mut cell_inputs) = *v2;

            let cell = calculate(&cell_inputs)?;
            let value = input.output_metric.extract(&cell.result);
            if value.is_none() {
                sentinel_cells += 1;
            }
            row.push(value);
        }
        matrix.push(row);
    }

    if sentinel_cells > 0 {
        warnings.push(format!(
            "{sentinel_cells} cell(s) have no {:?} value (unattainable or indeterminate)",
            input.output_metric
        ));
    }

    let base_row = closest_index(&v1_values, input.variable_1.field.current(&input.base_inputs));
    let base_col = closest_index(&v2_values, input.variable_2.field.current(&input.base_inputs));

    debug!(
        rows = v1_values.len(),
        cols = v2_values.len(),
        sentinel_cells,
        "sensitivity grid evaluated"
    );

    let output = SensitivityOutput {
        variable_1: input.variable_1.field,
        variable_2: input.variable_2.field,
        variable_1_values: v1_values,
        variable_2_values: v2_values,
        output_metric: input.output_metric,
        matrix,
        base_case_value,
        base_case_position: (base_row, base_col),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "2-Way Sensitivity Analysis (Battery ROI)",
        &serde_json::json!({
            "variable_1": input.variable_1.field,
            "variable_2": input.variable_2.field,
            "output_metric": input.output_metric,
        }),
        warnings,
        elapsed,
        output,
    ))
}
