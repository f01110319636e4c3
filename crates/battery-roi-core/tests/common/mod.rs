use battery_roi_core::roi::RoiInputs;
use rust_decimal_macros::dec;

/// 261 kWh / 125 kW commercial install with a 65% grant, 8% WACC and 2%
/// yearly degradation over twelve years.
pub fn reference_inputs() -> RoiInputs {
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
        monthly_peaks_kw: vec![dec!(75); 12],
        o_and_m: dec!(5220),
        wacc: dec!(0.08),
        degradation: dec!(0.02),
        years: 12,
    }
}
