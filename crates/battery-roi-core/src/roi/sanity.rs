use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use super::inputs::RoiInputs;
use super::savings::calculate_savings;
use crate::error::BatteryRoiError;
use crate::types::*;
use crate::BatteryRoiResult;

/// Absolute floor of the annual-net tolerance, in SEK.
pub const ANNUAL_NET_TOLERANCE_FLOOR: Money = dec!(5000);
/// Relative annual-net tolerance as a share of the expected value.
pub const ANNUAL_NET_TOLERANCE_SHARE: Rate = dec!(0.10);
/// Payback tolerance in years.
pub const PAYBACK_TOLERANCE: Years = dec!(0.25);

/// Figures reported elsewhere, checked against a fresh calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanityCheckInput {
    pub inputs: RoiInputs,
    pub actual_annual_net: Money,
    pub actual_payback: Payback,
}

/// Verdict of a sanity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanityResult {
    pub ok: bool,
    pub expected_annual_net: Money,
    pub expected_payback: Payback,
    /// actual − expected
    pub annual_net_delta: Money,
    /// actual − expected; absent when either side is unattainable
    pub payback_delta: Option<Years>,
    pub annual_net_tolerance: Money,
    pub payback_tolerance: Years,
    pub note: String,
}

/// Recompute annual net and payback from `input` and compare them with the
/// supplied figures. Never mutates anything; a mismatch is a verdict, not an
/// error.
pub fn sanity_check(
    input: &RoiInputs,
    actual_annual_net: Money,
    actual_payback: Payback,
) -> BatteryRoiResult<SanityResult> {
    input.validate()?;

    let expected = calculate_savings(input)?;
    let annual_net_tolerance =
        ANNUAL_NET_TOLERANCE_FLOOR.max(ANNUAL_NET_TOLERANCE_SHARE * expected.annual_net);

    let annual_net_delta = actual_annual_net
        .checked_sub(expected.annual_net)
        .ok_or_else(|| BatteryRoiError::overflow("annual net delta"))?;
    let annual_net_ok = annual_net_delta.abs() <= annual_net_tolerance;

    let (payback_delta, payback_ok) = match (actual_payback, expected.payback) {
        (Payback::Years(actual), Payback::Years(expected)) => {
            let delta = actual
                .checked_sub(expected)
                .ok_or_else(|| BatteryRoiError::overflow("payback delta"))?;
            (Some(delta), delta.abs() <= PAYBACK_TOLERANCE)
        }
        (Payback::Unattainable, Payback::Unattainable) => (None, true),
        _ => (None, false),
    };

    let ok = annual_net_ok && payback_ok;
    let note = if ok {
        format!(
            "OK: annual net within {annual_net_tolerance} SEK and payback within {PAYBACK_TOLERANCE} years"
        )
    } else {
        let mut problems = Vec::new();
        if !annual_net_ok {
            problems.push(format!(
                "annual net off by {annual_net_delta} SEK (tolerance {annual_net_tolerance})"
            ));
        }
        if !payback_ok {
            problems.push(match payback_delta {
                Some(delta) => format!(
                    "payback off by {delta} years (tolerance {PAYBACK_TOLERANCE})"
                ),
                None => format!(
                    "payback disagrees on attainability (actual {}, expected {})",
                    describe(actual_payback),
                    describe(expected.payback)
                ),
            });
        }
        format!("MISMATCH: {}", problems.join("; "))
    };

    if ok {
        debug!(%annual_net_delta, "sanity check passed");
    } else {
        warn!(%annual_net_delta, payback_delta = ?payback_delta, "{note}");
    }

    Ok(SanityResult {
        ok,
        expected_annual_net: expected.annual_net,
        expected_payback: expected.payback,
        annual_net_delta,
        payback_delta,
        annual_net_tolerance,
        payback_tolerance: PAYBACK_TOLERANCE,
        note,
    })
}

fn describe(payback: Payback) -> String {
    match payback {
        Payback::Years(y) => format!("{} years", y.round_dp(2)),
        Payback::Unattainable => "unattainable".into(),
    }
}

/// Envelope-returning wrapper for JSON callers.
pub fn run_sanity_check(
    input: &SanityCheckInput,
) -> BatteryRoiResult<ComputationOutput<SanityResult>> {
    let start = Instant::now();
    let result = sanity_check(&input.inputs, input.actual_annual_net, input.actual_payback)?;

    let warnings = if result.ok {
        Vec::new()
    } else {
        vec![result.note.clone()]
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Sanity check: recomputed annual net and payback within fixed tolerances",
        &serde_json::json!({
            "annual_net_tolerance_floor": ANNUAL_NET_TOLERANCE_FLOOR.to_string(),
            "annual_net_tolerance_share": ANNUAL_NET_TOLERANCE_SHARE.to_string(),
            "payback_tolerance_years": PAYBACK_TOLERANCE.to_string(),
        }),
        warnings,
        elapsed,
        result,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roi::inputs::tests::reference_inputs;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn reference_payback() -> Payback {
        Payback::Years(dec!(442400) / dec!(163702.608))
    }

    #[test]
    fn test_exact_figures_pass() {
        let result =
            sanity_check(&reference_inputs(), dec!(163702.608), reference_payback()).unwrap();
        assert!(result.ok);
        assert!(result.annual_net_delta.is_zero());
        assert_eq!(result.payback_delta, Some(Decimal::ZERO));
        assert!(result.note.starts_with("OK"));
    }

    #[test]
    fn test_relative_tolerance_applies_above_floor() {
        // 10% of 163,702.608 = 16,370.2608
        let result =
            sanity_check(&reference_inputs(), dec!(150000), reference_payback()).unwrap();
        assert_eq!(result.annual_net_tolerance, dec!(16370.2608));
        assert!(result.ok);
    }

    #[test]
    fn test_annual_net_outside_tolerance_fails() {
        let result =
            sanity_check(&reference_inputs(), dec!(140000), reference_payback()).unwrap();
        assert!(!result.ok);
        assert_eq!(result.annual_net_delta, dec!(-23702.608));
        assert!(result.note.starts_with("MISMATCH"));
    }

    #[test]
    fn test_payback_tolerance_is_quarter_year() {
        let inside = sanity_check(
            &reference_inputs(),
            dec!(163702.608),
            Payback::Years(dec!(2.9)),
        )
        .unwrap();
        assert!(inside.ok);

        let outside = sanity_check(
            &reference_inputs(),
            dec!(163702.608),
            Payback::Years(dec!(3.0)),
        )
        .unwrap();
        assert!(!outside.ok);
    }

    #[test]
    fn test_floor_used_for_loss_making_system() {
        let mut input = reference_inputs();
        input.o_and_m = dec!(500000);
        let expected_net = dec!(163702.608) + dec!(5220) - dec!(500000);
        let result = sanity_check(&input, expected_net + dec!(4000), Payback::Unattainable).unwrap();
        assert_eq!(result.annual_net_tolerance, dec!(5000));
        assert!(result.ok);
        assert_eq!(result.payback_delta, None);
    }

    #[test]
    fn test_unattainable_versus_numeric_fails() {
        let result = sanity_check(
            &reference_inputs(),
            dec!(163702.608),
            Payback::Unattainable,
        )
        .unwrap();
        assert!(!result.ok);
        assert!(result.note.contains("attainability"));
    }

    #[test]
    fn test_envelope_carries_mismatch_warning() {
        let input = SanityCheckInput {
            inputs: reference_inputs(),
            actual_annual_net: dec!(0),
            actual_payback: reference_payback(),
        };
        let output = run_sanity_check(&input).unwrap();
        assert!(!output.result.ok);
        assert_eq!(output.warnings.len(), 1);
        assert!(output.result.annual_net_delta.abs() > dec!(163000));
    }
}
