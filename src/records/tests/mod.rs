//! Tests for the stacked-block record parser


/// Line-of-sight intensity file: free text, an index block, a title and two
/// data blocks each spanning two rows
pub const LOSINT_FIXTURE: &str = "AURIC line-of-sight intensities
Observer at 300.00 km
ZA (deg)
       10.00       20.00       30.00       40.00       50.00       60.00
       70.00
Intensity (R)
O I 1356 A
   1.000E+02   2.000E+02   3.000E+02   4.000E+02   5.000E+02   6.000E+02
   7.000E+02
O I 1304 A
   1.100E+03   1.200E+03   1.300E+03   1.400E+03   1.500E+03   1.600E+03
   1.700E+03
";

pub fn fixture_lines(text: &str) -> Vec<&str> {
    text.lines().collect()
}
