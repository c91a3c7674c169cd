//! Readers and writers for AURIC input files
//!
//! - [`view`]: observer altitude and lines of sight (`view.inp`)
//! - [`radtrans`]: radiative transfer switches (`radtrans.opt`)
//! - [`params`]: model parameters (`param.inp`)

pub mod params;
pub mod radtrans;
pub mod view;

#[cfg(test)]
mod tests;

pub use params::{ParamEntry, ParamFile, ParamRecord, update_params};
pub use radtrans::{RadtransOptions, read_radtrans_options, write_radtrans_options};
pub use view::{read_view, write_view};
