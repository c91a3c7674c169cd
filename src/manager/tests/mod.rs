//! Tests for the working directory manager and stage executors

mod manager_tests;

use crate::config::AuricConfig;
use crate::constants::PARAM_TEMPLATE;
use crate::error::Result;
use crate::manager::{AuricManager, Invocation, StageExecutor};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

/// Records every invocation and answers with configured exit codes
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    pub invocations: RefCell<Vec<Invocation>>,
    exit_codes: HashMap<String, i32>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, program: &str, code: i32) -> Self {
        self.exit_codes.insert(program.to_string(), code);
        self
    }

    pub fn programs(&self) -> Vec<String> {
        self.invocations
            .borrow()
            .iter()
            .map(|i| i.program.clone())
            .collect()
    }
}

impl StageExecutor for RecordingExecutor {
    fn execute(&self, invocation: &Invocation) -> Result<i32> {
        self.invocations.borrow_mut().push(invocation.clone());
        Ok(self.exit_codes.get(&invocation.program).copied().unwrap_or(0))
    }
}

pub const VIEW_FIXTURE: &str = "   600.0000   observer altitude (km)
    90.00000
   120.00000
";

/// Profile output with altitude axis and two initial profiles
pub const PROFILE_FIXTURE: &str = "    2 altitudes    2 profiles
Altitudes (km) =
   100.00000   200.00000
Volume emission rates
O+e 834 A (initial) =
   1.000E+01   2.000E+01
O+hv 834 A (initial) =
   3.000E+00   4.000E+00
";

pub const STACKED_FIXTURE: &str = "ALT (km)
      100.00      200.00
Emission rate
1356 A
   1.000E+01   2.000E+01
";

/// Working directory holding the stock inputs with the given zenith angle
pub fn working_dir(zenith_angle: f64) -> TempDir {
    let dir = TempDir::new().unwrap();
    let params = PARAM_TEMPLATE.replace(
        "         SZA =      30.00",
        &format!("         SZA = {zenith_angle:>10.2}"),
    );
    fs::write(dir.path().join("param.inp"), params).unwrap();
    fs::write(dir.path().join("view.inp"), VIEW_FIXTURE).unwrap();
    fs::write(dir.path().join("dayglo.ver"), PROFILE_FIXTURE).unwrap();
    fs::write(dir.path().join("losint.dat"), STACKED_FIXTURE).unwrap();
    dir
}

pub fn manager_for(dir: &TempDir) -> AuricManager {
    AuricManager::new(AuricConfig::new("/opt/auric").with_working_dir(dir.path())).unwrap()
}
