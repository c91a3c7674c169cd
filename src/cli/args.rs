//! Command-line argument definitions for the AURIC processor
//!
//! Global options select the AURIC installation, the working directory and
//! the synthetic spectra to compute; subcommands act on the working directory.

use crate::config::{AuricConfig, ConfigBuilder};
use crate::error::{AuricError, Result};
use crate::models::Band;
use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments for the AURIC processor
///
/// Sequences and runs AURIC batch stages, edits input files and reads the
/// files the stages produce.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "auric",
    version,
    about = "Sequence AURIC airglow model runs and read their output",
    long_about = "Drives the AURIC airglow model from a working directory: assembles the \
                  batch stage sequence from param.inp, radtrans.opt and the Lyman option \
                  files, runs the stages in order, edits the input files and parses profile \
                  and stacked-block output files, optionally exporting them to Parquet or CSV."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Options shared by every subcommand
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct GlobalArgs {
    /// AURIC installation directory
    ///
    /// Defaults to the AURIC_ROOT environment variable, then ~/auric.
    #[arg(short = 'r', long = "root", value_name = "PATH", global = true)]
    pub root: Option<PathBuf>,

    /// Directory the stages run in (defaults to the installation directory)
    #[arg(short = 'w', long = "working-dir", value_name = "PATH", global = true)]
    pub working_dir: Option<PathBuf>,

    /// JSON configuration file; command-line options override its values
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Synthetic spectrum bands to compute (comma-separated, e.g. n2_lbh,o2_atm)
    #[arg(
        short = 'b',
        long = "band",
        value_name = "BAND",
        value_delimiter = ',',
        global = true
    )]
    pub bands: Vec<Band>,

    /// Use the energy-flux photoelectron method
    #[arg(long = "eflux", global = true)]
    pub use_energy_flux: bool,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose", global = true)]
    pub quiet: bool,

    /// Output format for results
    #[arg(
        short = 'f',
        long = "format",
        value_enum,
        default_value_t = OutputFormat::Human,
        global = true
    )]
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored summaries for people
    #[default]
    Human,
    /// Pretty-printed JSON
    Json,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Print the batch stage sequence
    Sequence(SequenceArgs),
    /// Run the batch sequence, or the given commands, in the working directory
    Run(RunArgs),
    /// Read view.inp, radtrans.opt or a profile output file
    Read(ReadArgs),
    /// Pull the axes and selected profiles from a profile output file
    Retrieve(RetrieveArgs),
    /// Read a stacked-block output file, optionally exporting it
    Load(LoadArgs),
    /// Change values in param.inp
    SetParam(SetParamArgs),
    /// Run geoparm
    Geoparm(GeoparmArgs),
    /// Copy the input files to another directory
    Clone(CloneArgs),
    /// Update view.inp
    WriteView(WriteViewArgs),
    /// Rewrite radtrans.opt
    WriteRadtrans(WriteRadtransArgs),
    /// Write the stock param.inp
    InitParams(InitParamsArgs),
}

#[derive(Debug, Clone, Parser)]
pub struct SequenceArgs {
    /// Solar zenith angle (deg); read from param.inp when omitted
    #[arg(long = "sza", value_name = "DEG")]
    pub zenith_angle: Option<f64>,

    /// Treat the atmosphere as optically thick (only with --sza)
    #[arg(long = "thick", requires = "zenith_angle")]
    pub optically_thick: bool,

    /// Include the Lyman-alpha stage (only with --sza)
    #[arg(long = "lyman-alpha", requires = "zenith_angle")]
    pub lyman_alpha: bool,

    /// Include the Lyman-beta stage (only with --sza)
    #[arg(long = "lyman-beta", requires = "zenith_angle")]
    pub lyman_beta: bool,
}

#[derive(Debug, Clone, Parser)]
pub struct RunArgs {
    /// Commands to run instead of the batch sequence, e.g. "atmos" "ionos"
    #[arg(value_name = "COMMAND")]
    pub commands: Vec<String>,
}

#[derive(Debug, Clone, Parser)]
pub struct ReadArgs {
    /// File name in the working directory
    #[arg(value_name = "FILE")]
    pub file: String,
}

#[derive(Debug, Clone, Parser)]
pub struct RetrieveArgs {
    /// Profile output file in the working directory
    #[arg(value_name = "FILE", default_value = "ionos.dat")]
    pub file: String,

    /// Profile names to retrieve (defaults to the O+ 832-834 A sources)
    #[arg(short = 'p', long = "profile", value_name = "NAME")]
    pub profiles: Vec<String>,
}

#[derive(Debug, Clone, Parser)]
pub struct LoadArgs {
    /// Stacked-block output file in the working directory
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Export to this path; the extension selects Parquet or CSV
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Parser)]
pub struct SetParamArgs {
    /// Assignments such as SZA=30 F107=150
    #[arg(value_name = "KEY=VALUE", required = true)]
    pub assignments: Vec<ParamAssignment>,
}

#[derive(Debug, Clone, Parser)]
pub struct GeoparmArgs {
    /// Let geoparm compute F10.7 and Ap from its index files
    #[arg(long = "compute-indices")]
    pub compute_indices: bool,
}

#[derive(Debug, Clone, Parser)]
pub struct CloneArgs {
    /// Destination directory, created if needed
    #[arg(value_name = "DIR")]
    pub destination: PathBuf,
}

#[derive(Debug, Clone, Parser)]
pub struct WriteViewArgs {
    /// Observer altitude (km)
    #[arg(long = "altitude", value_name = "KM", allow_hyphen_values = true)]
    pub observer_altitude: Option<f64>,

    /// Zenith angles (deg), comma-separated
    #[arg(
        long = "zenith-angles",
        value_name = "DEG",
        value_delimiter = ',',
        allow_hyphen_values = true
    )]
    pub zenith_angles: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Parser)]
pub struct WriteRadtransArgs {
    /// Transitions to treat as optically thick; all others are written OFF
    #[arg(value_name = "KEY")]
    pub enabled: Vec<String>,
}

#[derive(Debug, Clone, Parser)]
pub struct InitParamsArgs {
    /// Overwrite an existing param.inp
    #[arg(long = "force")]
    pub force: bool,
}

/// A `KEY=VALUE` parameter change
#[derive(Debug, Clone, PartialEq)]
pub struct ParamAssignment {
    pub key: String,
    pub value: f64,
}

impl FromStr for ParamAssignment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (key, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("missing parameter name in '{s}'"));
        }
        let value = value
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("'{}' is not a number", value.trim()))?;
        Ok(Self {
            key: key.to_string(),
            value,
        })
    }
}

impl GlobalArgs {
    /// Log level for the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Progress bars only make sense for people watching a terminal
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.output_format == OutputFormat::Human
    }

    /// Layer these options over the configuration file, if any
    pub fn config_builder(&self) -> Result<ConfigBuilder> {
        let mut builder = AuricConfig::builder();
        if let Some(path) = &self.config_file {
            builder = builder.with_base(AuricConfig::from_json_file(path)?);
        }
        if let Some(root) = &self.root {
            builder = builder.with_root(root);
        }
        if let Some(dir) = &self.working_dir {
            builder = builder.with_working_dir(dir);
        }
        for band in &self.bands {
            builder = builder.with_band(*band, true);
        }
        if self.use_energy_flux {
            builder = builder.with_energy_flux(true);
        }
        Ok(builder)
    }

    pub fn build_config(&self) -> Result<AuricConfig> {
        self.config_builder()?.build()
    }
}

impl WriteRadtransArgs {
    /// Reject transition keys AURIC does not know
    pub fn validate(&self) -> Result<()> {
        use crate::constants::RADTRANS_KEYS;

        match self
            .enabled
            .iter()
            .find(|key| !RADTRANS_KEYS.contains(&key.as_str()))
        {
            Some(key) => Err(AuricError::configuration(format!(
                "Unknown radtrans transition '{}'; expected one of {}",
                key,
                RADTRANS_KEYS.join(", ")
            ))),
            None => Ok(()),
        }
    }
}
