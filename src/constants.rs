//! Application constants for the AURIC processor
//!
//! File names, environment variable names, canonical key lists and the
//! stock parameter layout shared by the readers, writers and sequencer.

// =============================================================================
// Working Directory Files
// =============================================================================

/// Observer altitude and zenith angles for line-of-sight integration
pub const VIEW_FILE: &str = "view.inp";

/// Radiative transfer switches, one per transition
pub const RADTRANS_FILE: &str = "radtrans.opt";

/// Mandatory and derived model parameters
pub const PARAM_FILE: &str = "param.inp";

/// Presence of this file enables the Lyman-alpha correction stage
pub const LYMAN_ALPHA_FILE: &str = "ly_alpha.opt";

/// Presence of this file enables the Lyman-beta correction stage
pub const LYMAN_BETA_FILE: &str = "ly_beta.opt";

/// File patterns copied when cloning a working directory
pub const INPUT_FILE_PATTERNS: &[&str] = &["*.inp", "*.opt"];

// =============================================================================
// Environment
// =============================================================================

/// Environment variable naming the AURIC installation
pub const AURIC_ROOT_ENV: &str = "AURIC_ROOT";

/// Directory under the user's home used when AURIC_ROOT is unset
pub const DEFAULT_ROOT_DIR_NAME: &str = "auric";

/// Directory under the root holding per-platform binaries
pub const BIN_DIR_NAME: &str = "bin";

/// Program run to derive geophysical parameters
pub const GEOPARM_COMMAND: &str = "geoparm";

// =============================================================================
// Solar Zenith Angle Regimes
// =============================================================================

/// Parameter key holding the solar zenith angle
pub const SZA_KEY: &str = "SZA";

/// Exclusive bounds of the daytime regime (degrees)
pub const DAYTIME_SZA: (f64, f64) = (0.0, 90.0);

/// Exclusive bounds of the nighttime regime (degrees)
pub const NIGHTTIME_SZA: (f64, f64) = (110.0, 180.0);

// =============================================================================
// Radiative Transfer Options
// =============================================================================

/// Transition keys written to radtrans.opt, in file order
pub const RADTRANS_KEYS: &[&str] = &[
    "832", "833", "834", "1304", "1356", "1040", "1026", "989", "1048", "1066", "1135", "1199",
];

pub const RADTRANS_BANNER: &str = "Options for code RADTRANS:";
pub const RADTRANS_RULE: &str = "-------------------------------------------------------";

// =============================================================================
// Parameter File Layout
// =============================================================================

/// Number of lines in param.inp
pub const PARAM_LINE_COUNT: usize = 32;

/// Keys written without fractional digits
pub const PARAM_INTEGER_KEYS: &[&str] = &["NALT", "YYDDD"];

/// Sentinel value meaning "not set"; also written without fractional digits
pub const PARAM_UNSET: f64 = -1.0;

/// Stock param.inp shipped with AURIC
pub const PARAM_TEMPLATE: &str = "Mandatory parameters:
        NALT =        100 : number of altitude points
         ZUB =    1000.00 : upper bound of atmosphere (km)
       YYDDD =      92080 : year & day (YYDDD format)
       UTSEC =   45000.00 : universal time (sec)
        GLAT =      42.00 : latitude (deg)
        GLON =       0.00 : longitude (deg)
   SCALE(N2) =       1.00 : N2 density scale factor
   SCALE(O2) =       1.00 : O2 density scale factor
    SCALE(O) =       1.00 : O  density scale factor
   SCALE(O3) =       1.00 : O3 density scale factor
   SCALE(NO) =       1.00 : NO density scale factor
    SCALE(N) =       1.00 : N  density scale factor
   SCALE(He) =       1.00 : He density scale factor
    SCALE(H) =       1.00 : H  density scale factor
   SCALE(Ar) =       1.00 : Ar density scale factor
Derived parameters:
       GMLAT =      51.84 : geomagnetic latitude (deg)
       GMLON =       1.71 : geomagnetic longitude (deg)
       DPANG =      70.16 : magnetic dip angle (deg)
         SZA =      30.00 : solar zenith angle (deg)
         SLT =       1.00 : solar local time (hours)
      F10DAY =      79.30 : F10.7 (current day)
      F10PRE =      76.80 : F10.7 (previous day)
      F10AVE =      79.40 : F10.7 (81-day average)
       AP(1) =       9.00 : daily Ap
       AP(2) =         -1 : 3-hour Ap
       AP(3) =         -1 : 3-hour Ap
       AP(4) =         -1 : 3-hour Ap
       AP(5) =         -1 : 3-hour Ap
       AP(6) =         -1 : average 3-hour Ap
       AP(7) =         -1 : average 3-hour Ap
";

// =============================================================================
// Output File Grammars
// =============================================================================

/// Default Fortran format of index rows in stacked-block output files
pub const DEFAULT_INDEX_FORMAT: &str = "6F12.2";

/// Default Fortran format of data rows in stacked-block output files
pub const DEFAULT_DATA_FORMAT: &str = "6E12.3";

/// Marker on the first line of files that start with an observer altitude
pub const OBSERVER_ALTITUDE_MARKER: &str = "observer altitude (km)";

/// Profiles retrieved when no feature list is given
pub const DEFAULT_FEATURES: &[&str] = &[
    "O+e 832 A (initial)",
    "O+e 833 A (initial)",
    "O+e 834 A (initial)",
    "O+hv 832 A (initial)",
    "O+hv 833 A (initial)",
    "O+hv 834 A (initial)",
];
