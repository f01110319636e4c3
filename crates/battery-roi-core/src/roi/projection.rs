use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::BatteryRoiError;
use crate::time_value::{discount_step, DegradingBenefit};
use crate::types::{Money, Rate};
use crate::BatteryRoiResult;

/// One projected year of the benefit stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowYear {
    pub year: u32,
    /// Benefit after compounded degradation
    pub degraded_net: Money,
    /// (1 + wacc)^(−year)
    pub discount_factor: Decimal,
    pub discounted_value: Money,
}

/// Projected series and the NPV it sums to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    pub years: Vec<CashFlowYear>,
    pub npv: Money,
}

/// Project the degraded, discounted benefit for every year of the horizon and
/// net the investment off their sum.
pub fn project_cash_flows(
    benefit: &DegradingBenefit,
    wacc: Rate,
    net_investment: Money,
) -> BatteryRoiResult<Projection> {
    if wacc <= Decimal::NEGATIVE_ONE {
        return Err(BatteryRoiError::invalid(
            "wacc",
            "Discount rate must be greater than -100%",
        ));
    }

    let one_plus_wacc = Decimal::ONE + wacc;
    let mut discount_factor = Decimal::ONE;
    let mut years = Vec::with_capacity(benefit.years as usize);
    let mut total = Decimal::ZERO;

    for (year, degraded_net) in benefit.yearly() {
        discount_factor = discount_step(discount_factor, one_plus_wacc, year)?;
        let discounted_value = degraded_net
            .checked_mul(discount_factor)
            .ok_or_else(|| BatteryRoiError::overflow(format!("discounted value at year {year}")))?;
        total = total
            .checked_add(discounted_value)
            .ok_or_else(|| BatteryRoiError::overflow("projected cash-flow sum"))?;
        years.push(CashFlowYear {
            year,
            degraded_net,
            discount_factor,
            discounted_value,
        });
    }

    let npv = total
        .checked_sub(net_investment)
        .ok_or_else(|| BatteryRoiError::overflow("NPV net of investment"))?;

    Ok(Projection { years, npv })
}
