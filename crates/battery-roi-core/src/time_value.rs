use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::error::BatteryRoiError;
use crate::types::{Money, Rate};
use crate::BatteryRoiResult;

const CONVERGENCE_THRESHOLD: Decimal = dec!(0.000001);
const MAX_IRR_ITERATIONS: u32 = 50;

/// Lower (exclusive) bound of a plausible IRR: -100%.
pub const IRR_LOWER_BOUND: Rate = dec!(-1);
/// Upper (exclusive) bound of a plausible IRR: 1000%.
pub const IRR_UPPER_BOUND: Rate = dec!(10);
/// Newton-Raphson seed rate.
pub const IRR_SEED: Rate = dec!(0.10);

/// A level annual benefit that declines by a fixed fraction each year.
///
/// Year `y` (1-based) is worth `annual_net × (1 − degradation)^(y−1)`. The
/// factor is compounded by repeated multiplication so a zero degradation
/// leaves every year exactly equal to `annual_net`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DegradingBenefit {
    pub annual_net: Money,
    pub degradation: Rate,
    pub years: u32,
}

impl DegradingBenefit {
    pub fn new(annual_net: Money, degradation: Rate, years: u32) -> Self {
        Self {
            annual_net,
            degradation,
            years,
        }
    }

    /// Undiscounted benefit per year as `(year, amount)`.
    pub fn yearly(&self) -> impl Iterator<Item = (u32, Money)> {
        let annual_net = self.annual_net;
        let retention = Decimal::ONE - self.degradation;
        (1..=self.years).scan(Decimal::ONE, move |factor, year| {
            let amount = annual_net * *factor;
            *factor *= retention;
            Some((year, amount))
        })
    }

    /// Sum of the undiscounted yearly benefits, `None` on overflow.
    pub fn total(&self) -> Option<Money> {
        self.yearly()
            .try_fold(Decimal::ZERO, |acc, (_, amount)| acc.checked_add(amount))
    }
}

fn one_plus(rate: Rate) -> BatteryRoiResult<Decimal> {
    if rate <= IRR_LOWER_BOUND {
        return Err(BatteryRoiError::invalid(
            "rate",
            "Discount rate must be greater than -100%",
        ));
    }
    Ok(Decimal::ONE + rate)
}

/// Advance a running `(1 + rate)^(−year)` factor by one year.
pub(crate) fn discount_step(
    factor: Decimal,
    one_plus_rate: Decimal,
    year: u32,
) -> BatteryRoiResult<Decimal> {
    factor
        .checked_div(one_plus_rate)
        .ok_or_else(|| BatteryRoiError::overflow(format!("discount factor at year {year}")))
}

/// Net present value of a degrading benefit stream against an upfront
/// investment: `Σ benefit(y) / (1 + rate)^y − net_investment`.
pub fn npv(
    rate: Rate,
    benefit: &DegradingBenefit,
    net_investment: Money,
) -> BatteryRoiResult<Money> {
    let one_plus_r = one_plus(rate)?;
    let mut factor = Decimal::ONE;
    let mut total = Decimal::ZERO;

    for (year, amount) in benefit.yearly() {
        factor = discount_step(factor, one_plus_r, year)?;
        let discounted = amount
            .checked_mul(factor)
            .ok_or_else(|| BatteryRoiError::overflow(format!("NPV discounting at year {year}")))?;
        total = total
            .checked_add(discounted)
            .ok_or_else(|| BatteryRoiError::overflow("NPV accumulation"))?;
    }

    total
        .checked_sub(net_investment)
        .ok_or_else(|| BatteryRoiError::overflow("NPV net of investment"))
}

/// Analytic derivative of [`npv`] with respect to the rate:
/// `Σ −y × benefit(y) / (1 + rate)^(y+1)`.
pub fn npv_derivative(rate: Rate, benefit: &DegradingBenefit) -> BatteryRoiResult<Money> {
    let one_plus_r = one_plus(rate)?;
    let mut factor = Decimal::ONE;
    let mut total = Decimal::ZERO;

    for (year, amount) in benefit.yearly() {
        factor = discount_step(factor, one_plus_r, year)?;
        // Divide last: (1 + r)^−(y+1) on its own can round to zero
        let term = amount
            .checked_mul(Decimal::from(year))
            .and_then(|weighted| weighted.checked_mul(factor))
            .and_then(|discounted| discounted.checked_div(one_plus_r))
            .ok_or_else(|| {
                BatteryRoiError::overflow(format!("NPV derivative term at year {year}"))
            })?;
        total = total
            .checked_sub(term)
            .ok_or_else(|| BatteryRoiError::overflow("NPV derivative accumulation"))?;
    }

    Ok(total)
}

/// Internal Rate of Return of a degrading benefit stream using Newton-Raphson.
///
/// Stops once successive rates differ by less than 1e-6. Fails when the
/// iteration cap is reached, when the derivative vanishes, when an evaluation
/// overflows or leaves the `1 + r > 0` domain, and when the converged rate
/// lies outside `(-1, 10)`.
pub fn irr(
    benefit: &DegradingBenefit,
    net_investment: Money,
    guess: Rate,
) -> BatteryRoiResult<Rate> {
    let mut rate = guess;

    for i in 0..MAX_IRR_ITERATIONS {
        let npv_val = npv(rate, benefit, net_investment)?;
        let dnpv = npv_derivative(rate, benefit)?;

        if dnpv.is_zero() {
            return Err(BatteryRoiError::DivisionByZero {
                context: format!("IRR derivative at iteration {i}"),
            });
        }

        let step = npv_val
            .checked_div(dnpv)
            .ok_or_else(|| BatteryRoiError::overflow("IRR Newton step"))?;
        let next = rate
            .checked_sub(step)
            .ok_or_else(|| BatteryRoiError::overflow("IRR rate update"))?;
        let delta = next
            .checked_sub(rate)
            .ok_or_else(|| BatteryRoiError::overflow("IRR convergence test"))?;

        if delta.abs() < CONVERGENCE_THRESHOLD {
            if next <= IRR_LOWER_BOUND || next >= IRR_UPPER_BOUND {
                return Err(BatteryRoiError::FinancialImpossibility(format!(
                    "IRR {next} lies outside the plausible band ({IRR_LOWER_BOUND}, {IRR_UPPER_BOUND})"
                )));
            }
            debug!(iterations = i + 1, irr = %next, "IRR converged");
            return Ok(next);
        }

        rate = next;
    }

    Err(BatteryRoiError::ConvergenceFailure {
        function: "IRR".into(),
        iterations: MAX_IRR_ITERATIONS,
        last_delta: npv(rate, benefit, net_investment).unwrap_or(Decimal::MAX),
    })
}
