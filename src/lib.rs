//! AURIC Processor Library
//!
//! Batch sequencing and output parsing for the AURIC airglow model.
//!
//! This library provides tools for:
//! - Parsing profile output files with a heading/data classification parser
//! - Parsing stacked-block output files bottom-up with Fortran record formats
//! - Assembling the ordered batch stage sequence from a run configuration
//! - Reading and writing param.inp, view.inp and radtrans.opt
//! - Running stages in a working directory with the AURIC environment
//! - Exporting parsed datasets to Parquet or CSV

pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod inputs;
pub mod manager;
pub mod models;
pub mod profile;
pub mod records;
pub mod sequencer;
pub mod switch;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use config::{AuricConfig, ConfigBuilder};
pub use error::{AuricError, Result};
pub use inputs::{ParamFile, ParamRecord, RadtransOptions};
pub use manager::{AuricManager, Invocation, ProcessExecutor, StageExecutor};
pub use models::{
    Band, BandOptions, ParsedProfileSet, PipelineStage, StageSequence, TabularDataset,
    ViewGeometry,
};
pub use profile::{parse_profile_lines, read_profile_file};
pub use records::{StackedRecordReader, read_stacked_file};
pub use sequencer::{SequencerInputs, assemble_sequence};
pub use switch::OptionSwitch;
