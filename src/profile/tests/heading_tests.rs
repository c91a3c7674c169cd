//! Heading detection and classification priority

use crate::profile::heading::{HeadingKind, classify_heading, heading_of};

#[test]
fn test_heading_is_text_before_equals() {
    assert_eq!(heading_of("ZOBS = 300.000 km"), Some("ZOBS"));
    assert_eq!(heading_of("1356 A (initial) ="), Some("1356 A (initial)"));
    assert_eq!(heading_of("Volume emission rates"), Some("Volume emission rates"));
    assert_eq!(heading_of("   1.200E+01"), None);
    assert_eq!(heading_of(""), Some(""));
}

#[test]
fn test_classification_of_known_sections() {
    assert_eq!(classify_heading("ZOBS"), HeadingKind::ObserverAltitude);
    assert_eq!(
        classify_heading("Zenith Angles (deg)"),
        HeadingKind::ZenithSection
    );
    assert_eq!(
        classify_heading("  5 Zenith Angles (deg)"),
        HeadingKind::ZenithSection
    );
    assert_eq!(classify_heading("Altitudes (km)"), HeadingKind::AltitudeSection);
    assert_eq!(classify_heading("Volume emission rates"), HeadingKind::TypeLabel);
}

#[test]
fn test_profile_name_shapes() {
    for name in ["1356 A (initial)", "989 A", "O+e 832 A (initial)", "N2 LBH", "[OI] 6300"] {
        assert_eq!(
            classify_heading(name),
            HeadingKind::ProfileName(name.to_string()),
            "{name} should be a profile name"
        );
    }
}

#[test]
fn test_unrecognized_headings() {
    for heading in ["", "10.0 20.0", "end", "-----", "total"] {
        assert_eq!(classify_heading(heading), HeadingKind::Unrecognized, "{heading:?}");
    }
}

#[test]
fn test_priority_sections_before_type_label() {
    // Both would also satisfy the type label rule
    assert_eq!(classify_heading("Altitudes (km)"), HeadingKind::AltitudeSection);
    assert_eq!(
        classify_heading("Zenith Angles (deg)"),
        HeadingKind::ZenithSection
    );
}

#[test]
fn test_priority_type_label_before_profile_name() {
    // Capitalized word followed by a digit matches both rules
    assert_eq!(classify_heading("Oxygen 1356 A"), HeadingKind::TypeLabel);
    assert_eq!(
        classify_heading("OI 1356 A"),
        HeadingKind::ProfileName("OI 1356 A".to_string())
    );
}
