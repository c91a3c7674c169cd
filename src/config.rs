//! Configuration for an AURIC working directory.
//!
//! [`AuricConfig`] holds everything a [`crate::manager::AuricManager`] needs:
//! where AURIC is installed, which directory to run in, which synthetic
//! spectra to compute and how output tables are laid out.
//!
//! Configurations are assembled with [`ConfigBuilder`]. Precedence, highest
//! first:
//!
//! 1. explicit settings (`with_root`, `with_band`, ...)
//! 2. a supplied band mapping or configuration file
//! 3. the environment (`AURIC_ROOT`) and built-in defaults

use crate::constants::{
    AURIC_ROOT_ENV, BIN_DIR_NAME, DEFAULT_DATA_FORMAT, DEFAULT_INDEX_FORMAT, DEFAULT_ROOT_DIR_NAME,
};
use crate::error::{AuricError, Result};
use crate::models::{Band, BandOptions};
use crate::records::{RecordFormat, StackedRecordReader};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings for one AURIC working directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuricConfig {
    /// AURIC installation (exported to stages as AURIC_ROOT)
    pub auric_root: PathBuf,

    /// Directory stages run in; the installation itself when unset
    #[serde(default)]
    pub working_dir: Option<PathBuf>,

    /// Synthetic spectra to compute
    #[serde(default)]
    pub bands: BandOptions,

    /// Use the energy-flux photoelectron method instead of photon flux
    #[serde(default)]
    pub use_energy_flux: bool,

    /// Fortran format of index rows in stacked output files
    #[serde(default = "default_index_format")]
    pub index_format: String,

    /// Fortran format of data rows in stacked output files
    #[serde(default = "default_data_format")]
    pub data_format: String,
}

fn default_index_format() -> String {
    DEFAULT_INDEX_FORMAT.to_string()
}

fn default_data_format() -> String {
    DEFAULT_DATA_FORMAT.to_string()
}

impl AuricConfig {
    /// Configuration for an installation with every other setting at its default
    pub fn new(auric_root: impl Into<PathBuf>) -> Self {
        Self {
            auric_root: auric_root.into(),
            working_dir: None,
            bands: BandOptions::default(),
            use_energy_flux: false,
            index_format: default_index_format(),
            data_format: default_data_format(),
        }
    }

    /// Load a JSON configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| AuricError::file_access(path, e))?;
        let config: AuricConfig = serde_json::from_str(&content).map_err(|e| {
            AuricError::configuration(format!("Invalid config file {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Directory stages run in
    pub fn working_dir(&self) -> &Path {
        self.working_dir.as_deref().unwrap_or(&self.auric_root)
    }

    /// Platform binary directory of the installation
    pub fn bin_dir(&self) -> PathBuf {
        bin_dir(&self.auric_root)
    }

    /// Reader for stacked output files using the configured formats
    pub fn record_reader(&self) -> Result<StackedRecordReader> {
        StackedRecordReader::with_formats(&self.index_format, &self.data_format)
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_bands(mut self, bands: BandOptions) -> Self {
        self.bands = bands;
        self
    }

    pub fn with_energy_flux(mut self, use_energy_flux: bool) -> Self {
        self.use_energy_flux = use_energy_flux;
        self
    }

    /// Check that the record formats parse
    pub fn validate(&self) -> Result<()> {
        self.index_format.parse::<RecordFormat>()?;
        self.data_format.parse::<RecordFormat>()?;
        Ok(())
    }
}

/// Builds an [`AuricConfig`] with explicit precedence
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    base: Option<AuricConfig>,
    root: Option<PathBuf>,
    working_dir: Option<PathBuf>,
    band_mapping: BTreeMap<String, bool>,
    band_flags: Vec<(Band, bool)>,
    use_energy_flux: Option<bool>,
    index_format: Option<String>,
    data_format: Option<String>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a loaded configuration (e.g. a config file)
    pub fn with_base(mut self, base: AuricConfig) -> Self {
        self.base = Some(base);
        self
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Band flags by name; unknown names fail in [`ConfigBuilder::build`]
    pub fn with_band_mapping<K, I>(mut self, mapping: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, bool)>,
    {
        self.band_mapping
            .extend(mapping.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    /// Explicit band flag; wins over any mapping
    pub fn with_band(mut self, band: Band, enabled: bool) -> Self {
        self.band_flags.push((band, enabled));
        self
    }

    pub fn with_energy_flux(mut self, use_energy_flux: bool) -> Self {
        self.use_energy_flux = Some(use_energy_flux);
        self
    }

    pub fn with_index_format(mut self, format: impl Into<String>) -> Self {
        self.index_format = Some(format.into());
        self
    }

    pub fn with_data_format(mut self, format: impl Into<String>) -> Self {
        self.data_format = Some(format.into());
        self
    }

    pub fn build(self) -> Result<AuricConfig> {
        self.build_from(std::env::var_os(AURIC_ROOT_ENV), dirs::home_dir())
    }

    fn build_from(self, env_root: Option<OsString>, home: Option<PathBuf>) -> Result<AuricConfig> {
        let mut config = match self.base {
            Some(base) => base,
            None => AuricConfig::new(resolve_root_from(self.root.clone(), env_root, home)?),
        };

        if let Some(root) = self.root {
            config.auric_root = root;
        }
        if let Some(dir) = self.working_dir {
            config.working_dir = Some(dir);
        }

        // Mapping first, then explicit flags on top
        config
            .bands
            .apply_mapping(self.band_mapping.iter().map(|(k, v)| (k.as_str(), *v)))?;
        for (band, enabled) in self.band_flags {
            config.bands.set(band, enabled);
        }

        if let Some(use_energy_flux) = self.use_energy_flux {
            config.use_energy_flux = use_energy_flux;
        }
        if let Some(format) = self.index_format {
            config.index_format = format;
        }
        if let Some(format) = self.data_format {
            config.data_format = format;
        }

        config.validate()?;
        debug!(
            "Configuration: root={}, working_dir={}, bands={:?}",
            config.auric_root.display(),
            config.working_dir().display(),
            config.bands.enabled().map(|b| b.key()).collect::<Vec<_>>()
        );
        Ok(config)
    }
}

/// Resolve the AURIC installation: explicit path, then `AURIC_ROOT`, then `~/auric`
pub fn resolve_root(explicit: Option<PathBuf>) -> Result<PathBuf> {
    resolve_root_from(explicit, std::env::var_os(AURIC_ROOT_ENV), dirs::home_dir())
}

fn resolve_root_from(
    explicit: Option<PathBuf>,
    env_root: Option<OsString>,
    home: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    if let Some(root) = env_root.filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(root));
    }
    home.map(|home| home.join(DEFAULT_ROOT_DIR_NAME)).ok_or_else(|| {
        AuricError::configuration(format!(
            "{AURIC_ROOT_ENV} is not set and the home directory is unknown"
        ))
    })
}

/// Name AURIC uses for the current platform's binary directory
pub fn platform_name() -> &'static str {
    match std::env::consts::OS {
        "linux" => "Linux",
        "macos" => "Darwin",
        other => other,
    }
}

/// `<root>/bin/<platform>`
pub fn bin_dir(root: &Path) -> PathBuf {
    root.join(BIN_DIR_NAME).join(platform_name())
}
