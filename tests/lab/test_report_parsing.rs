// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Parsing realistic OCR output from lab reports

use labreport_ocr::lab::{format_output, parse_lab_tests};

const CBC_REPORT: &str = "\
CITY DIAGNOSTICS LABORATORY
Patient: 42 Years

Hemoglobin 11.2 g/dL (12.0-15.5)
RBC Count: 4.6 mill/cumm (4.5-5.5)
Platelet Count 250000 /cumm (150000-450000)
WBC 12.4 (4.0-11.0)
Neutrophils 60 % 40-80
Remarks: see doctor
";

#[test]
fn test_cbc_report() {
    let tests = format_output(&parse_lab_tests(CBC_REPORT));

    let names: Vec<&str> = tests.iter().map(|t| t.test_name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "PATIENT",
            "HEMOGLOBIN",
            "RBC COUNT",
            "PLATELET COUNT",
            "WBC",
            "NEUTROPHILS"
        ]
    );

    let hb = &tests[1];
    assert_eq!(hb.test_value, "11.2");
    assert_eq!(hb.test_unit, "g/dL");
    assert_eq!(hb.bio_reference_range, "12.0-15.5");
    assert!(hb.lab_test_out_of_range);

    let rbc = &tests[2];
    assert_eq!(rbc.test_unit, "mill/cumm");
    assert!(!rbc.lab_test_out_of_range);

    let platelets = &tests[3];
    assert_eq!(platelets.test_unit, "/cumm");
    assert!(!platelets.lab_test_out_of_range);

    let wbc = &tests[4];
    assert_eq!(wbc.test_unit, "");
    assert_eq!(wbc.bio_reference_range, "4.0-11.0");
    assert!(wbc.lab_test_out_of_range);

    let neutrophils = &tests[5];
    assert_eq!(neutrophils.test_unit, "%");
    assert_eq!(neutrophils.bio_reference_range, "40-80");
    assert!(!neutrophils.lab_test_out_of_range);
}

#[test]
fn test_carriage_return_line_endings() {
    let text = "Glucose 95 mg/dL (70-110)\r\nUrea 50 mg/dL (15-40)\r\n";
    let tests = parse_lab_tests(text);
    assert_eq!(tests.len(), 2);
    assert!(!tests[0].lab_test_out_of_range);
    assert!(tests[1].lab_test_out_of_range);
    assert_eq!(tests[1].test_name, "UREA");
}

#[test]
fn test_serialized_field_order() {
    let tests = format_output(&parse_lab_tests("Sodium: 140 mmol/L (135-145)"));
    let json = serde_json::to_string(&tests).unwrap();
    assert_eq!(
        json,
        r#"[{"test_name":"SODIUM","test_value":"140","bio_reference_range":"135-145","test_unit":"mmol/L","lab_test_out_of_range":false}]"#
    );
}
