//! AURIC working directory manager
//!
//! An [`AuricManager`] is bound to one working directory. It reads and writes
//! the input files there, assembles the batch sequence from them and runs
//! stages through a [`StageExecutor`] with the AURIC environment.

pub mod executor;

#[cfg(test)]
mod tests;

pub use executor::{Invocation, ProcessExecutor, StageExecutor};

use crate::config::AuricConfig;
use crate::constants::{
    AURIC_ROOT_ENV, GEOPARM_COMMAND, INPUT_FILE_PATTERNS, LYMAN_ALPHA_FILE, LYMAN_BETA_FILE,
    PARAM_FILE, RADTRANS_FILE, SZA_KEY, VIEW_FILE,
};
use crate::error::{AuricError, Result};
use crate::inputs::{
    ParamFile, RadtransOptions, read_radtrans_options, read_view, update_params,
    write_radtrans_options, write_view,
};
use crate::models::{
    ParsedProfileSet, PipelineStage, Profile, StageSequence, TabularDataset, ViewGeometry,
};
use crate::profile::read_profile_file;
use crate::sequencer::{SequencerInputs, assemble_sequence};
use serde::Serialize;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// How a file in the working directory is read and written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    View,
    Radtrans,
    /// Any other file is read as profile output
    Profile,
}

impl FileKind {
    pub fn of(name: &str) -> Self {
        match name {
            VIEW_FILE => FileKind::View,
            RADTRANS_FILE => FileKind::Radtrans,
            _ => FileKind::Profile,
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FileKind::View => "view",
            FileKind::Radtrans => "radtrans",
            FileKind::Profile => "profile",
        })
    }
}

/// Contents of a file read through [`AuricManager::read`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AuricFile {
    View(ViewGeometry),
    Radtrans(RadtransOptions),
    Profile(ParsedProfileSet),
}

/// What to write through [`AuricManager::write`]
#[derive(Debug, Clone, PartialEq)]
pub enum WriteRequest {
    /// Fields left as `None` keep their current value
    View {
        observer_altitude: Option<f64>,
        zenith_angles: Option<Vec<f64>>,
    },
    Radtrans(RadtransOptions),
}

impl WriteRequest {
    pub fn kind(&self) -> FileKind {
        match self {
            WriteRequest::View { .. } => FileKind::View,
            WriteRequest::Radtrans(_) => FileKind::Radtrans,
        }
    }
}

/// Result of one program run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageOutcome {
    /// Pipeline stage, when the run was part of a batch
    pub stage: Option<PipelineStage>,
    pub command: String,
    pub exit_code: i32,
}

impl StageOutcome {
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

/// Results of a sequential run that stops at the first failure
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    pub planned: usize,
    pub outcomes: Vec<StageOutcome>,
}

impl RunReport {
    /// Every planned command ran and exited with 0
    pub fn succeeded(&self) -> bool {
        self.outcomes.len() == self.planned && self.outcomes.iter().all(StageOutcome::succeeded)
    }

    pub fn failure(&self) -> Option<&StageOutcome> {
        self.outcomes.iter().find(|outcome| !outcome.succeeded())
    }
}

/// Axes and selected profiles pulled from a profile output file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedProfiles {
    pub altitudes: Vec<f64>,
    pub zenith_angles: Vec<f64>,
    pub profiles: Vec<Profile>,
}

/// Manages one AURIC working directory
#[derive(Debug, Clone)]
pub struct AuricManager {
    config: AuricConfig,
    root: PathBuf,
}

impl AuricManager {
    /// Bind to the configured working directory, which must exist
    pub fn new(mut config: AuricConfig) -> Result<Self> {
        // A relative root would resolve against each stage's working directory
        config.auric_root = std::path::absolute(&config.auric_root)
            .map_err(|e| AuricError::file_access(config.auric_root.clone(), e))?;
        let dir = config.working_dir();
        if !dir.is_dir() {
            return Err(AuricError::RootNotFound {
                path: dir.to_path_buf(),
            });
        }
        let root = std::path::absolute(dir).map_err(|e| AuricError::file_access(dir, e))?;
        debug!("AURIC manager bound to {}", root.display());
        Ok(Self { config, root })
    }

    pub fn config(&self) -> &AuricConfig {
        &self.config
    }

    /// Absolute working directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_to(&self, name: impl AsRef<Path>) -> PathBuf {
        self.root.join(name)
    }

    /// Whether `name` is a regular file in the working directory
    pub fn exists(&self, name: impl AsRef<Path>) -> bool {
        self.path_to(name).is_file()
    }

    /// Environment every stage runs with
    ///
    /// AURIC_ROOT names the installation and PATH starts with its platform
    /// binary directory.
    pub fn environment(&self) -> Result<BTreeMap<String, OsString>> {
        let mut paths = vec![self.config.bin_dir()];
        if let Some(current) = std::env::var_os("PATH") {
            paths.extend(std::env::split_paths(&current));
        }
        let path = std::env::join_paths(paths)
            .map_err(|e| AuricError::configuration(format!("Cannot build PATH: {e}")))?;

        let mut env = BTreeMap::new();
        env.insert(
            AURIC_ROOT_ENV.to_string(),
            self.config.auric_root.clone().into_os_string(),
        );
        env.insert("PATH".to_string(), path);
        Ok(env)
    }

    /// Read a file, choosing the reader from its name
    pub fn read(&self, name: &str) -> Result<AuricFile> {
        let path = self.path_to(name);
        Ok(match FileKind::of(name) {
            FileKind::View => AuricFile::View(read_view(&path)?),
            FileKind::Radtrans => AuricFile::Radtrans(read_radtrans_options(&path)?),
            FileKind::Profile => AuricFile::Profile(read_profile_file(&path)?),
        })
    }

    /// Write a view or radtrans file
    pub fn write(&self, name: &str, request: WriteRequest) -> Result<()> {
        let kind = FileKind::of(name);
        if kind != request.kind() {
            return Err(AuricError::UnsupportedWrite {
                file: name.to_string(),
                requested: request.kind().to_string(),
            });
        }

        let path = self.path_to(name);
        match request {
            WriteRequest::View {
                observer_altitude: Some(observer_altitude),
                zenith_angles: Some(zenith_angles),
            } => write_view(
                &path,
                &ViewGeometry {
                    observer_altitude,
                    zenith_angles,
                },
            ),
            WriteRequest::View {
                observer_altitude,
                zenith_angles,
            } => {
                let current = read_view(&path)?;
                let geometry = ViewGeometry {
                    observer_altitude: observer_altitude.unwrap_or(current.observer_altitude),
                    zenith_angles: zenith_angles.unwrap_or(current.zenith_angles),
                };
                write_view(&path, &geometry)
            }
            WriteRequest::Radtrans(options) => write_radtrans_options(&path, &options),
        }
    }

    pub fn params(&self) -> Result<ParamFile> {
        ParamFile::read(self.path_to(PARAM_FILE))
    }

    /// Change values in param.inp; returns keys not found in the file
    pub fn set_params<'a, I>(&self, changes: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        update_params(self.path_to(PARAM_FILE), changes)
    }

    pub fn view(&self) -> Result<ViewGeometry> {
        read_view(self.path_to(VIEW_FILE))
    }

    pub fn radtrans_options(&self) -> Result<RadtransOptions> {
        read_radtrans_options(self.path_to(RADTRANS_FILE))
    }

    /// Gather the sequencer inputs from the working directory
    pub fn sequencer_inputs(&self) -> Result<SequencerInputs> {
        let zenith_angle = self.params()?.get(SZA_KEY).ok_or_else(|| {
            AuricError::configuration(format!("{SZA_KEY} is missing from {PARAM_FILE}"))
        })?;

        let optically_thick = if self.exists(RADTRANS_FILE) {
            self.radtrans_options()?.any_enabled()
        } else {
            debug!(
                "No {} in {}; treating atmosphere as optically thin",
                RADTRANS_FILE,
                self.root.display()
            );
            false
        };

        Ok(SequencerInputs::new(zenith_angle)
            .with_optically_thick(optically_thick)
            .with_lyman_alpha(self.exists(LYMAN_ALPHA_FILE))
            .with_lyman_beta(self.exists(LYMAN_BETA_FILE))
            .with_bands(self.config.bands)
            .with_energy_flux(self.config.use_energy_flux))
    }

    /// Stage sequence of a batch run in this directory
    pub fn batch(&self) -> Result<StageSequence> {
        assemble_sequence(&self.sequencer_inputs()?)
    }

    /// Invocation of `command` (program plus arguments) in this directory
    pub fn invocation(&self, command: &str) -> Result<Invocation> {
        let mut parts = command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| AuricError::configuration("empty command"))?;
        Ok(Invocation::new(program, &self.root)
            .with_args(parts)
            .with_env(self.environment()?))
    }

    /// Run the batch sequence
    pub fn run_batch(&self, executor: &dyn StageExecutor) -> Result<RunReport> {
        let sequence = self.batch()?;
        self.run_sequence(executor, &sequence, |_: &StageOutcome| {})
    }

    /// Run `sequence` stage by stage, stopping at the first non-zero exit
    pub fn run_sequence<F>(
        &self,
        executor: &dyn StageExecutor,
        sequence: &StageSequence,
        mut on_stage: F,
    ) -> Result<RunReport>
    where
        F: FnMut(&StageOutcome),
    {
        let commands = sequence
            .iter()
            .map(|stage| (Some(*stage), stage.command().to_string()));
        self.run_commands(executor, commands, sequence.len(), &mut on_stage)
    }

    /// Run arbitrary commands in order, stopping at the first non-zero exit
    pub fn custom_run<S: AsRef<str>>(
        &self,
        executor: &dyn StageExecutor,
        commands: &[S],
    ) -> Result<RunReport> {
        let planned = commands.len();
        let commands = commands
            .iter()
            .map(|command| (None, command.as_ref().to_string()));
        self.run_commands(executor, commands, planned, &mut |_: &StageOutcome| {})
    }

    fn run_commands<I>(
        &self,
        executor: &dyn StageExecutor,
        commands: I,
        planned: usize,
        on_stage: &mut dyn FnMut(&StageOutcome),
    ) -> Result<RunReport>
    where
        I: Iterator<Item = (Option<PipelineStage>, String)>,
    {
        let mut report = RunReport {
            planned,
            outcomes: Vec::with_capacity(planned),
        };

        for (stage, command) in commands {
            let invocation = self.invocation(&command)?;
            let exit_code = executor.execute(&invocation)?;
            let outcome = StageOutcome {
                stage,
                command,
                exit_code,
            };
            on_stage(&outcome);
            report.outcomes.push(outcome);

            if exit_code != 0 {
                warn!(
                    "'{}' exited with {}; skipping {} remaining commands",
                    invocation.command_line(),
                    exit_code,
                    planned - report.outcomes.len()
                );
                break;
            }
        }

        info!(
            "Ran {}/{} commands in {}",
            report.outcomes.len(),
            planned,
            self.root.display()
        );
        Ok(report)
    }

    /// Run geoparm, answering whether F10.7 and Ap should be computed
    pub fn run_geoparm(&self, executor: &dyn StageExecutor, compute_indices: bool) -> Result<i32> {
        let answer: &[u8] = if compute_indices { b"Y\n" } else { b"N\n" };
        let invocation = self.invocation(GEOPARM_COMMAND)?.with_stdin(answer);
        executor.execute(&invocation)
    }

    /// Altitudes, zenith angles and the named profiles of a profile file
    pub fn retrieve<S: AsRef<str>>(&self, name: &str, features: &[S]) -> Result<RetrievedProfiles> {
        let path = self.path_to(name);
        let parsed = read_profile_file(&path)?;

        let profiles = features
            .iter()
            .map(|feature| {
                let feature = feature.as_ref();
                parsed
                    .profile(feature)
                    .map(|values| Profile {
                        name: feature.to_string(),
                        values: values.to_vec(),
                    })
                    .ok_or_else(|| AuricError::FeatureNotFound {
                        name: feature.to_string(),
                        path: path.clone(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(RetrievedProfiles {
            altitudes: parsed.altitudes,
            zenith_angles: parsed.zenith_angles,
            profiles,
        })
    }

    /// Read a stacked-block output file with the configured formats
    pub fn load(&self, name: &str) -> Result<TabularDataset> {
        self.config.record_reader()?.read(self.path_to(name))
    }

    /// Copy every input file into `dir` and manage that directory instead
    pub fn clone_into(&self, dir: impl AsRef<Path>) -> Result<AuricManager> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|e| AuricError::file_access(dir, e))?;

        let escaped = glob::Pattern::escape(&self.root.to_string_lossy());
        let mut copied = 0;
        for pattern in INPUT_FILE_PATTERNS {
            let paths = glob::glob(&format!("{escaped}/{pattern}")).map_err(|e| {
                AuricError::configuration(format!("Invalid file pattern '{pattern}': {e}"))
            })?;
            for entry in paths {
                let source = entry.map_err(|e| {
                    let path = e.path().to_path_buf();
                    AuricError::file_access(path, std::io::Error::from(e))
                })?;
                if !source.is_file() {
                    continue;
                }
                if let Some(file_name) = source.file_name() {
                    let target = dir.join(file_name);
                    std::fs::copy(&source, &target)
                        .map_err(|e| AuricError::file_access(&source, e))?;
                    copied += 1;
                }
            }
        }

        info!("Copied {} input files to {}", copied, dir.display());
        AuricManager::new(self.config.clone().with_working_dir(dir))
    }
}
