use clap::Args;
use serde_json::Value;

use battery_roi_core::scenarios::sensitivity::{self, SensitivityInput};

use crate::input;

/// Arguments for sensitivity analysis
#[derive(Args)]
pub struct SensitivityArgs {
    /// Path to JSON or YAML input file with base inputs and two sweep variables
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sens_input: SensitivityInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for sensitivity analysis".into());
    };
    let result = sensitivity::evaluate_sensitivity(&sens_input)?;
    Ok(serde_json::to_value(result)?)
}
