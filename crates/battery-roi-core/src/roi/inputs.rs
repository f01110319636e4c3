use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::BatteryRoiError;
use crate::types::{Kw, Kwh, Money, Rate};
use crate::BatteryRoiResult;

/// Number of monthly peak-demand readings a tariff year carries.
pub const MONTHS_PER_YEAR: usize = 12;

/// Technical and tariff parameters for one battery investment evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiInputs {
    /// Upfront system cost before any grant
    pub capex_cogs: Money,
    /// Fraction of capex covered by a grant (0.65 = 65%)
    pub grant_pct: Rate,
    /// Nameplate storage capacity
    pub capacity_kwh: Kwh,
    /// Nameplate inverter power
    pub inverter_kw: Kw,
    /// Depth of discharge
    pub dod: Rate,
    /// Round-trip efficiency
    pub efficiency: Rate,
    /// Full cycles per year shifting PV surplus
    pub pv_cycles_per_year: Decimal,
    /// Full cycles per year used for price arbitrage
    pub arbitrage_cycles_per_year: Decimal,
    /// Yearly PV surplus available for self-consumption
    pub annual_pv_kwh: Kwh,
    /// Grid purchase price avoided per kWh of PV shifted
    pub purchase_price_sek_per_kwh: Money,
    /// Demand charge per kW of monthly peak
    pub demand_price_sek_per_kw_month: Money,
    /// Average buy/sell price spread captured by arbitrage
    pub spread_sek_per_kwh: Money,
    /// One peak reading per calendar month, January first
    pub monthly_peaks_kw: Vec<Kw>,
    /// Annual operation and maintenance cost
    pub o_and_m: Money,
    /// Discount rate
    pub wacc: Rate,
    /// Annual benefit decline
    pub degradation: Rate,
    /// Evaluation horizon
    pub years: u32,
}

fn require_non_negative(field: &str, value: Decimal) -> BatteryRoiResult<()> {
    if value < Decimal::ZERO {
        return Err(BatteryRoiError::invalid(field, "Must be non-negative"));
    }
    Ok(())
}

fn require_positive(field: &str, value: Decimal) -> BatteryRoiResult<()> {
    if value <= Decimal::ZERO {
        return Err(BatteryRoiError::invalid(field, "Must be positive"));
    }
    Ok(())
}

fn require_fraction(field: &str, value: Decimal) -> BatteryRoiResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(BatteryRoiError::invalid(field, "Must be between 0 and 1"));
    }
    Ok(())
}

impl RoiInputs {
    /// Check every precondition. A failure here means no calculation runs.
    pub fn validate(&self) -> BatteryRoiResult<()> {
        require_non_negative("capex_cogs", self.capex_cogs)?;
        require_fraction("grant_pct", self.grant_pct)?;
        require_positive("capacity_kwh", self.capacity_kwh)?;
        require_positive("inverter_kw", self.inverter_kw)?;
        require_fraction("dod", self.dod)?;
        require_fraction("efficiency", self.efficiency)?;
        require_non_negative("pv_cycles_per_year", self.pv_cycles_per_year)?;
        require_non_negative("arbitrage_cycles_per_year", self.arbitrage_cycles_per_year)?;
        require_non_negative("annual_pv_kwh", self.annual_pv_kwh)?;
        require_non_negative("purchase_price_sek_per_kwh", self.purchase_price_sek_per_kwh)?;
        require_non_negative(
            "demand_price_sek_per_kw_month",
            self.demand_price_sek_per_kw_month,
        )?;
        require_non_negative("spread_sek_per_kwh", self.spread_sek_per_kwh)?;
        require_non_negative("o_and_m", self.o_and_m)?;
        require_fraction("degradation", self.degradation)?;

        if self.monthly_peaks_kw.len() != MONTHS_PER_YEAR {
            return Err(BatteryRoiError::invalid(
                "monthly_peaks_kw",
                format!(
                    "Expected {MONTHS_PER_YEAR} monthly peaks, got {}",
                    self.monthly_peaks_kw.len()
                ),
            ));
        }
        for (month, peak) in self.monthly_peaks_kw.iter().enumerate() {
            if *peak < Decimal::ZERO {
                return Err(BatteryRoiError::invalid(
                    "monthly_peaks_kw",
                    format!("Peak for month {} must be non-negative", month + 1),
                ));
            }
        }

        if self.wacc <= Decimal::NEGATIVE_ONE {
            return Err(BatteryRoiError::invalid(
                "wacc",
                "Discount rate must be greater than -100%",
            ));
        }
        if self.years == 0 {
            return Err(BatteryRoiError::invalid(
                "years",
                "Evaluation horizon must be at least one year",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    pub(crate) fn reference_inputs() -> RoiInputs {
        RoiInputs {
            capex_cogs: dec!(1264000),
            grant_pct: dec!(0.65),
            capacity_kwh: dec!(261),
            inverter_kw: dec!(125),
            dod: dec!(0.9),
            efficiency: dec!(0.92),
            pv_cycles_per_year: dec!(220),
            arbitrage_cycles_per_year: dec!(80),
            annual_pv_kwh: dec!(38726),
            purchase_price_sek_per_kwh: dec!(1.56),
            demand_price_sek_per_kw_month: dec!(114.8),
            spread_sek_per_kwh: dec!(0.30),
            monthly_peaks_kw: vec![dec!(75); MONTHS_PER_YEAR],
            o_and_m: dec!(5220),
            wacc: dec!(0.08),
            degradation: dec!(0.02),
            years: 12,
        }
    }

    fn field_of(err: BatteryRoiError) -> String {
        match err {
            BatteryRoiError::InvalidInput { field, .. } => field,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_reference_inputs_are_valid() {
        assert!(reference_inputs().validate().is_ok());
    }

    #[test]
    fn test_eleven_peaks_rejected() {
        let mut input = reference_inputs();
        input.monthly_peaks_kw.pop();
        assert_eq!(field_of(input.validate().unwrap_err()), "monthly_peaks_kw");
    }

    #[test]
    fn test_negative_peak_rejected() {
        let mut input = reference_inputs();
        input.monthly_peaks_kw[3] = dec!(-1);
        assert_eq!(field_of(input.validate().unwrap_err()), "monthly_peaks_kw");
    }

    #[test]
    fn test_grant_above_one_rejected() {
        let mut input = reference_inputs();
        input.grant_pct = dec!(1.01);
        assert_eq!(field_of(input.validate().unwrap_err()), "grant_pct");
    }

    #[test]
    fn test_zero_years_rejected() {
        let mut input = reference_inputs();
        input.years = 0;
        assert_eq!(field_of(input.validate().unwrap_err()), "years");
    }

    #[test]
    fn test_wacc_at_minus_one_rejected() {
        let mut input = reference_inputs();
        input.wacc = dec!(-1);
        assert_eq!(field_of(input.validate().unwrap_err()), "wacc");
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut input = reference_inputs();
        input.capacity_kwh = Decimal::ZERO;
        assert_eq!(field_of(input.validate().unwrap_err()), "capacity_kwh");
    }

    #[test]
    fn test_zero_capex_is_valid() {
        let mut input = reference_inputs();
        input.capex_cogs = Decimal::ZERO;
        assert!(input.validate().is_ok());
    }
}
