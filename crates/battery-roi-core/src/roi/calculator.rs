use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use super::inputs::RoiInputs;
use super::projection::project_cash_flows;
use super::savings::{calculate_savings, SavingsBreakdown};
use crate::time_value::{self, DegradingBenefit, IRR_SEED};
use crate::types::*;
use crate::BatteryRoiResult;

/// Headline return figures for one battery investment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoiOutputs {
    /// First-year net benefit; negative when costs exceed savings
    pub annual_net_sek: Money,
    pub payback: Payback,
    pub npv: Money,
    pub irr: Irr,
    pub details: SavingsBreakdown,
}

/// Run the full ROI pipeline: savings, projection, NPV and IRR.
pub fn calculate(input: &RoiInputs) -> BatteryRoiResult<ComputationOutput<RoiOutputs>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.validate()?;

    let savings = calculate_savings(input)?;
    let net_investment = savings.details.net_investment;
    let benefit = DegradingBenefit::new(savings.annual_net, input.degradation, input.years);

    let projection = project_cash_flows(&benefit, input.wacc, net_investment)?;

    let irr = match time_value::irr(&benefit, net_investment, IRR_SEED) {
        Ok(rate) => Irr::Rate(rate),
        Err(e) => {
            warn!(error = %e, "IRR indeterminate");
            warnings.push(format!("IRR calculation warning: {e}"));
            Irr::Indeterminate
        }
    };

    if !savings.payback.is_attainable() {
        warnings.push("Annual net benefit is not positive; payback is unattainable".into());
    }

    debug!(
        annual_net = %savings.annual_net,
        npv = %projection.npv,
        years = input.years,
        "ROI calculated"
    );

    let output = RoiOutputs {
        annual_net_sek: savings.annual_net,
        payback: savings.payback,
        npv: projection.npv,
        irr,
        details: savings.details,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Battery ROI: capped PV shifting, peak shaving, arbitrage; degraded DCF with Newton-Raphson IRR",
        &serde_json::json!({
            "usable_kwh": savings.usable_kwh.to_string(),
            "pv_energy_kwh": savings.pv_energy_kwh.to_string(),
            "peak_shaving_cap_kw": savings.peak_shaving_cap_kw.to_string(),
            "wacc": input.wacc.to_string(),
            "degradation": input.degradation.to_string(),
            "years": input.years,
        }),
        warnings,
        elapsed,
        output,
    ))
}
