use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use battery_roi_core::roi::{calculator, RoiInputs};

use crate::input;

/// Individual `RoiInputs` fields as flags, used when no input document is given
#[derive(Args)]
pub struct RoiInputArgs {
    /// Upfront system cost before grant (SEK)
    #[arg(long)]
    pub capex: Option<Decimal>,

    /// Grant fraction of capex (e.g. 0.65 for 65%)
    #[arg(long)]
    pub grant_pct: Option<Decimal>,

    /// Battery capacity (kWh)
    #[arg(long)]
    pub capacity_kwh: Option<Decimal>,

    /// Inverter power (kW)
    #[arg(long)]
    pub inverter_kw: Option<Decimal>,

    /// Depth of discharge
    #[arg(long)]
    pub dod: Option<Decimal>,

    /// Round-trip efficiency
    #[arg(long)]
    pub efficiency: Option<Decimal>,

    /// PV-shifting cycles per year
    #[arg(long)]
    pub pv_cycles: Option<Decimal>,

    /// Arbitrage cycles per year
    #[arg(long)]
    pub arbitrage_cycles: Option<Decimal>,

    /// Yearly PV surplus available to the battery (kWh)
    #[arg(long)]
    pub annual_pv_kwh: Option<Decimal>,

    /// Grid purchase price (SEK/kWh)
    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    /// Demand charge (SEK/kW/month)
    #[arg(long)]
    pub demand_price: Option<Decimal>,

    /// Arbitrage price spread (SEK/kWh)
    #[arg(long)]
    pub spread: Option<Decimal>,

    /// Twelve monthly peaks in kW (comma-separated, January first)
    #[arg(long, value_delimiter = ',')]
    pub monthly_peaks: Option<Vec<Decimal>>,

    /// Annual operation and maintenance cost (SEK)
    #[arg(long)]
    pub o_and_m: Option<Decimal>,

    /// Discount rate (e.g. 0.08)
    #[arg(long, allow_hyphen_values = true)]
    pub wacc: Option<Decimal>,

    /// Annual degradation (e.g. 0.02)
    #[arg(long)]
    pub degradation: Option<Decimal>,

    /// Evaluation horizon in years
    #[arg(long)]
    pub years: Option<u32>,
}

fn required<T>(value: Option<T>, flag: &str) -> Result<T, Box<dyn std::error::Error>> {
    value.ok_or_else(|| format!("--{flag} is required (or provide --input)").into())
}

impl RoiInputArgs {
    pub fn into_inputs(self) -> Result<RoiInputs, Box<dyn std::error::Error>> {
        Ok(RoiInputs {
            capex_cogs: required(self.capex, "capex")?,
            grant_pct: self.grant_pct.unwrap_or(Decimal::ZERO),
            capacity_kwh: required(self.capacity_kwh, "capacity-kwh")?,
            inverter_kw: required(self.inverter_kw, "inverter-kw")?,
            dod: required(self.dod, "dod")?,
            efficiency: required(self.efficiency, "efficiency")?,
            pv_cycles_per_year: required(self.pv_cycles, "pv-cycles")?,
            arbitrage_cycles_per_year: required(self.arbitrage_cycles, "arbitrage-cycles")?,
            annual_pv_kwh: required(self.annual_pv_kwh, "annual-pv-kwh")?,
            purchase_price_sek_per_kwh: required(self.purchase_price, "purchase-price")?,
            demand_price_sek_per_kw_month: required(self.demand_price, "demand-price")?,
            spread_sek_per_kwh: required(self.spread, "spread")?,
            monthly_peaks_kw: required(self.monthly_peaks, "monthly-peaks")?,
            o_and_m: self.o_and_m.unwrap_or(Decimal::ZERO),
            wacc: required(self.wacc, "wacc")?,
            degradation: self.degradation.unwrap_or(Decimal::ZERO),
            years: required(self.years, "years")?,
        })
    }
}

/// Arguments for the full ROI calculation
#[derive(Args)]
pub struct RoiArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub fields: RoiInputArgs,
}

pub fn run_roi(args: RoiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let roi_input: RoiInputs = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        args.fields.into_inputs()?
    };

    let result = calculator::calculate(&roi_input)?;
    Ok(serde_json::to_value(result)?)
}
