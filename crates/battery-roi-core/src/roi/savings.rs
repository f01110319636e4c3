use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::inputs::RoiInputs;
use crate::error::BatteryRoiError;
use crate::types::{Kw, Kwh, Money, Payback};
use crate::BatteryRoiResult;

/// Share of inverter power assumed available for shaving a monthly peak.
pub const PEAK_SHAVING_INVERTER_SHARE: Decimal = dec!(0.6);

/// Breakdown of the yearly benefit and the investment it pays back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsBreakdown {
    pub pv_savings: Money,
    pub demand_savings: Money,
    pub arbitrage_savings: Money,
    pub o_and_m: Money,
    pub net_investment: Money,
}

/// Result of the first-year savings and investment pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsResult {
    /// Energy moved per cycle after depth-of-discharge and losses
    pub usable_kwh: Kwh,
    /// PV energy shifted per year after the generation cap
    pub pv_energy_kwh: Kwh,
    /// Discharge power available for peak shaving
    pub peak_shaving_cap_kw: Kw,
    /// pv + demand + arbitrage − o_and_m
    pub annual_net: Money,
    pub payback: Payback,
    pub details: SavingsBreakdown,
}

/// Energy delivered per full cycle.
pub fn usable_energy(input: &RoiInputs) -> Kwh {
    // dod and efficiency are fractions, so this never exceeds capacity
    input.capacity_kwh * input.dod * input.efficiency
}

/// Yearly savings, operating cost and simple payback. Inputs are assumed
/// validated.
pub fn calculate_savings(input: &RoiInputs) -> BatteryRoiResult<SavingsResult> {
    let usable_kwh = usable_energy(input);

    // PV throughput is bounded by what the site actually generates; a
    // throughput too large to represent is past that bound
    let pv_energy_kwh = usable_kwh
        .checked_mul(input.pv_cycles_per_year)
        .map_or(input.annual_pv_kwh, |kwh| kwh.min(input.annual_pv_kwh));
    let pv_savings = pv_energy_kwh
        .checked_mul(input.purchase_price_sek_per_kwh)
        .ok_or_else(|| BatteryRoiError::overflow("PV savings"))?;

    let peak_shaving_cap_kw = input.inverter_kw * PEAK_SHAVING_INVERTER_SHARE;
    let demand_savings = input
        .monthly_peaks_kw
        .iter()
        .try_fold(Decimal::ZERO, |acc, peak| {
            (*peak)
                .min(peak_shaving_cap_kw)
                .checked_mul(input.demand_price_sek_per_kw_month)
                .and_then(|month| acc.checked_add(month))
        })
        .ok_or_else(|| BatteryRoiError::overflow("demand savings"))?;

    let arbitrage_savings = usable_kwh
        .checked_mul(input.arbitrage_cycles_per_year)
        .and_then(|kwh| kwh.checked_mul(input.spread_sek_per_kwh))
        .ok_or_else(|| BatteryRoiError::overflow("arbitrage savings"))?;

    let annual_net = pv_savings
        .checked_add(demand_savings)
        .and_then(|sum| sum.checked_add(arbitrage_savings))
        .and_then(|sum| sum.checked_sub(input.o_and_m))
        .ok_or_else(|| BatteryRoiError::overflow("annual net benefit"))?;
    let net_investment = input.capex_cogs * (Decimal::ONE - input.grant_pct);

    let payback = if annual_net > Decimal::ZERO {
        let years = net_investment
            .checked_div(annual_net)
            .ok_or_else(|| BatteryRoiError::overflow("simple payback"))?;
        Payback::Years(years)
    } else {
        Payback::Unattainable
    };

    Ok(SavingsResult {
        usable_kwh,
        pv_energy_kwh,
        peak_shaving_cap_kw,
        annual_net,
        payback,
        details: SavingsBreakdown {
            pv_savings,
            demand_savings,
            arbitrage_savings,
            o_and_m: input.o_and_m,
            net_investment,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roi::inputs::tests::reference_inputs;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reference_scenario_figures() {
        let result = calculate_savings(&reference_inputs()).unwrap();
        assert_eq!(result.usable_kwh, dec!(216.252));
        assert_eq!(result.pv_energy_kwh, dec!(38726));
        assert_eq!(result.peak_shaving_cap_kw, dec!(75));
        assert_eq!(result.details.pv_savings, dec!(60412.56));
        assert_eq!(result.details.demand_savings, dec!(103320));
        assert_eq!(result.details.arbitrage_savings, dec!(5190.048));
        assert_eq!(result.annual_net, dec!(163702.608));
        assert_eq!(result.details.net_investment, dec!(442400));
        let payback = result.payback.years().unwrap();
        assert!((payback - dec!(2.702)).abs() < dec!(0.001));
        assert_eq!(payback, dec!(442400) / dec!(163702.608));
    }

    #[test]
    fn test_pv_uncapped_when_battery_is_binding() {
        let mut input = reference_inputs();
        input.annual_pv_kwh = dec!(100000);
        let result = calculate_savings(&input).unwrap();
        // 216.252 × 220
        assert_eq!(result.pv_energy_kwh, dec!(47575.44));
    }

    #[test]
    fn test_demand_savings_capped_by_inverter() {
        let mut input = reference_inputs();
        input.monthly_peaks_kw = vec![dec!(10000); 12];
        let result = calculate_savings(&input).unwrap();
        let ceiling = dec!(12) * dec!(0.6) * input.inverter_kw * input.demand_price_sek_per_kw_month;
        assert_eq!(result.details.demand_savings, ceiling);
    }

    #[test]
    fn test_small_peaks_shaved_fully() {
        let mut input = reference_inputs();
        input.monthly_peaks_kw = vec![
            dec!(10), dec!(20), dec!(30), dec!(40), dec!(50), dec!(60),
            dec!(70), dec!(80), dec!(90), dec!(0), dec!(0), dec!(0),
        ];
        let result = calculate_savings(&input).unwrap();
        // 10+..+70 = 280, plus 75 for each of 80 and 90
        assert_eq!(result.details.demand_savings, dec!(430) * dec!(114.8));
    }

    #[test]
    fn test_negative_net_is_unattainable() {
        let mut input = reference_inputs();
        input.o_and_m = dec!(1000000);
        let result = calculate_savings(&input).unwrap();
        assert!(result.annual_net < Decimal::ZERO);
        assert_eq!(result.payback, Payback::Unattainable);
    }

    #[test]
    fn test_zero_net_is_unattainable() {
        let mut input = reference_inputs();
        input.pv_cycles_per_year = Decimal::ZERO;
        input.arbitrage_cycles_per_year = Decimal::ZERO;
        input.demand_price_sek_per_kw_month = Decimal::ZERO;
        input.o_and_m = Decimal::ZERO;
        let result = calculate_savings(&input).unwrap();
        assert!(result.annual_net.is_zero());
        assert_eq!(result.payback, Payback::Unattainable);
    }

    #[test]
    fn test_full_grant_gives_zero_payback() {
        let mut input = reference_inputs();
        input.grant_pct = Decimal::ONE;
        let result = calculate_savings(&input).unwrap();
        assert!(result.details.net_investment.is_zero());
        assert_eq!(result.payback, Payback::Years(Decimal::ZERO));
    }

    #[test]
    fn test_unrepresentable_pv_throughput_hits_generation_cap() {
        let mut input = reference_inputs();
        input.capacity_kwh = dec!(100000000000000000000);
        input.pv_cycles_per_year = dec!(10000000000);
        assert!(input.validate().is_ok());
        let result = calculate_savings(&input).unwrap();
        assert_eq!(result.pv_energy_kwh, input.annual_pv_kwh);
        assert_eq!(result.details.pv_savings, dec!(60412.56));
    }

    #[test]
    fn test_unrepresentable_arbitrage_is_an_error() {
        let mut input = reference_inputs();
        input.capacity_kwh = dec!(100000000000000000000);
        input.spread_sek_per_kwh = dec!(10000000000);
        assert!(input.validate().is_ok());
        let err = calculate_savings(&input).unwrap_err();
        assert!(matches!(err, BatteryRoiError::NumericOverflow { .. }));
    }
}
