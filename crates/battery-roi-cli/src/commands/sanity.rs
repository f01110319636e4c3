use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use battery_roi_core::roi::sanity::{self, SanityCheckInput};
use battery_roi_core::Payback;

use super::roi::RoiInputArgs;
use crate::input;

/// Arguments for the sanity check
#[derive(Args)]
pub struct SanityArgs {
    /// Path to JSON or YAML file holding inputs and the figures to check
    #[arg(long)]
    pub input: Option<String>,

    /// Annual net benefit currently displayed (SEK)
    #[arg(long, allow_hyphen_values = true)]
    pub actual_annual_net: Option<Decimal>,

    /// Payback currently displayed in years; omit when shown as unattainable
    #[arg(long)]
    pub actual_payback: Option<Decimal>,

    #[command(flatten)]
    pub fields: RoiInputArgs,
}

pub fn run_sanity_check(args: SanityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let check: SanityCheckInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let actual_annual_net = args
            .actual_annual_net
            .ok_or("--actual-annual-net is required (or provide --input)")?;
        SanityCheckInput {
            inputs: args.fields.into_inputs()?,
            actual_annual_net,
            actual_payback: Payback::from(args.actual_payback),
        }
    };

    let result = sanity::run_sanity_check(&check)?;
    Ok(serde_json::to_value(result)?)
}
