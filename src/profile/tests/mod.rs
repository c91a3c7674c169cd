//! Tests for the profile output parser
//!
//! Fixtures mimic the layout of AURIC view, volume emission rate and
//! line-of-sight intensity files.

mod heading_tests;

/// Volume emission rate file with two profiles over three altitudes
pub const VER_FIXTURE: &str = "    3 altitudes    2 profiles
ZOBS = 300.000 km
Altitudes (km) =
   100.00000   200.00000   300.00000
Volume emission rates
1356 A (initial) =
   1.200E+01   3.400E+01
   5.600E+01
O+e 834 A (initial) =
   7.000E-01   8.000E-01   9.000E-01
";

/// Split a fixture into lines the way the file reader does
pub fn fixture_lines(text: &str) -> Vec<&str> {
    text.lines().collect()
}
