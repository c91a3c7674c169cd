use crate::constants::{PARAM_LINE_COUNT, PARAM_TEMPLATE, SZA_KEY};
use crate::error::AuricError;
use crate::inputs::params::{ParamEntry, ParamFile, update_params};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_template_round_trips_byte_for_byte() {
    let params = ParamFile::template().unwrap();
    assert_eq!(params.entries().len(), PARAM_LINE_COUNT);
    assert_eq!(params.to_string(), PARAM_TEMPLATE);
}

#[test]
fn test_sections_and_records() {
    let params = ParamFile::template().unwrap();
    let sections: Vec<&ParamEntry> = params
        .entries()
        .iter()
        .filter(|e| matches!(e, ParamEntry::Section(_)))
        .collect();
    assert_eq!(sections.len(), 2);
    assert_eq!(params.records().count(), 30);

    assert_eq!(params.get("NALT"), Some(100.0));
    assert_eq!(params.get(SZA_KEY), Some(30.0));
    assert_eq!(params.get("AP(7)"), Some(-1.0));
    assert_eq!(params.get("MISSING"), None);

    let values = params.values();
    assert_eq!(values["YYDDD"], 92080.0);
    assert_eq!(values.len(), 30);
}

#[test]
fn test_modify_sza_changes_only_that_line() {
    let mut params = ParamFile::template().unwrap();
    let missing = params.modify([(SZA_KEY, 45.5)]);
    assert!(missing.is_empty());

    let before: Vec<&str> = PARAM_TEMPLATE.lines().collect();
    let written = params.to_string();
    let after: Vec<&str> = written.lines().collect();

    let changed: Vec<usize> = (0..before.len()).filter(|&i| before[i] != after[i]).collect();
    assert_eq!(changed, vec![20]);
    assert_eq!(after[20], "         SZA =      45.50 : solar zenith angle (deg)");
}

#[test]
fn test_modify_reports_missing_keys() {
    let mut params = ParamFile::template().unwrap();
    let missing = params.modify([("GLAT", 65.0), ("BOGUS", 1.0)]);
    assert_eq!(missing, vec!["BOGUS".to_string()]);
    assert_eq!(params.get("GLAT"), Some(65.0));
    assert_eq!(params.entries().len(), PARAM_LINE_COUNT);
}

#[test]
fn test_integer_and_unset_formatting() {
    let mut params = ParamFile::template().unwrap();
    params.modify([("NALT", 120.0), ("GLON", -1.0), ("AP(2)", 4.0)]);
    let text = params.to_string();
    assert!(text.contains("        NALT =        120 : number of altitude points\n"));
    assert!(text.contains("        GLON =         -1 : longitude (deg)\n"));
    assert!(text.contains("       AP(2) =       4.00 : 3-hour Ap\n"));
}

#[test]
fn test_bad_line_names_line_number() {
    let mut text = PARAM_TEMPLATE.replace("45000.00", "noon");
    match ParamFile::parse(&text) {
        Err(AuricError::InvalidParamLine { line_number, .. }) => assert_eq!(line_number, 5),
        other => panic!("expected InvalidParamLine, got {other:?}"),
    }

    text = PARAM_TEMPLATE.replace("ZUB =    1000.00", "ZUB 1000.00");
    assert!(matches!(
        ParamFile::parse(&text),
        Err(AuricError::InvalidParamLine { line_number: 3, .. })
    ));
}

#[test]
fn test_wrong_line_count() {
    let short: String = PARAM_TEMPLATE.lines().take(31).map(|l| format!("{l}\n")).collect();
    assert!(matches!(
        ParamFile::parse(&short),
        Err(AuricError::ParamLayout {
            expected: 32,
            found: 31
        })
    ));
}

#[test]
fn test_update_params_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("param.inp");
    fs::write(&path, PARAM_TEMPLATE).unwrap();

    let missing = update_params(&path, [("F10DAY", 150.0), ("UNKNOWN", 2.0)]).unwrap();
    assert_eq!(missing, vec!["UNKNOWN".to_string()]);

    let reread = ParamFile::read(&path).unwrap();
    assert_eq!(reread.get("F10DAY"), Some(150.0));
    assert_eq!(reread.get("F10PRE"), Some(76.8));
}

#[test]
fn test_read_missing_file() {
    assert!(matches!(
        ParamFile::read("/nonexistent/param.inp"),
        Err(AuricError::FileAccess { .. })
    ));
}
