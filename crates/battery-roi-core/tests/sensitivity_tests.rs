mod common;

use battery_roi_core::roi::calculate;
use battery_roi_core::scenarios::sensitivity::{
    evaluate_sensitivity, RoiField, RoiMetric, SensitivityInput, SensitivityVariable,
};
use common::reference_inputs;
use rust_decimal_macros::dec;

#[test]
fn test_payback_grid_over_spread_and_capex() {
    let input = SensitivityInput {
        base_inputs: reference_inputs(),
        variable_1: SensitivityVariable {
            field: RoiField::SpreadSekPerKwh,
            min: dec!(0.10),
            max: dec!(0.50),
            step: dec!(0.20),
        },
        variable_2: SensitivityVariable {
            field: RoiField::CapexCogs,
            min: dec!(1000000),
            max: dec!(1500000),
            step: dec!(250000),
        },
        output_metric: RoiMetric::Payback,
    };
    let out = evaluate_sensitivity(&input).unwrap().result;

    assert_eq!(out.variable_1_values, vec![dec!(0.10), dec!(0.30), dec!(0.50)]);
    assert_eq!(out.variable_2_values.len(), 3);

    // Wider spread shortens payback; dearer system lengthens it
    for row in &out.matrix {
        assert!(row[0].unwrap() < row[1].unwrap());
        assert!(row[1].unwrap() < row[2].unwrap());
    }
    assert!(out.matrix[0][0].unwrap() > out.matrix[2][0].unwrap());
}

#[test]
fn test_base_case_value_matches_calculator() {
    let input = SensitivityInput {
        base_inputs: reference_inputs(),
        variable_1: SensitivityVariable {
            field: RoiField::Degradation,
            min: dec!(0),
            max: dec!(0.04),
            step: dec!(0.01),
        },
        variable_2: SensitivityVariable {
            field: RoiField::Wacc,
            min: dec!(0.06),
            max: dec!(0.10),
            step: dec!(0.02),
        },
        output_metric: RoiMetric::Irr,
    };
    let out = evaluate_sensitivity(&input).unwrap().result;
    let direct = calculate(&reference_inputs()).unwrap().result;
    assert_eq!(out.base_case_value, direct.irr.rate());

    // IRR does not depend on the discount rate
    for row in &out.matrix {
        assert_eq!(row[0], row[2]);
    }
}

#[test]
fn test_sensitivity_input_from_json() {
    let json = serde_json::json!({
        "base_inputs": serde_json::to_value(reference_inputs()).unwrap(),
        "variable_1": { "field": "grant_pct", "min": "0.5", "max": "0.7", "step": "0.1" },
        "variable_2": { "field": "o_and_m", "min": "0", "max": "10000", "step": "5000" },
        "output_metric": "annual_net"
    });
    let input: SensitivityInput = serde_json::from_value(json).unwrap();
    let out = evaluate_sensitivity(&input).unwrap().result;
    // Grant does not touch annual net; O&M lowers it one-for-one
    assert_eq!(out.matrix[0], out.matrix[2]);
    assert_eq!(
        out.matrix[0][0].unwrap() - out.matrix[0][2].unwrap(),
        dec!(10000)
    );
}
