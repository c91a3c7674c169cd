//! Core data structures and types for AURIC processing.
//!
//! Defines synthetic-spectrum bands, pipeline stages and stage sequences,
//! and the datasets produced by the output file parsers.

use crate::error::{AuricError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

const BAND_COUNT: usize = 9;

/// Synthetic-spectrum bands AURIC can synthesize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Band {
    /// N2 Lyman-Birge-Hopfield
    #[serde(rename = "n2_lbh")]
    N2Lbh,
    /// N2 Vegard-Kaplan
    #[serde(rename = "n2_vk")]
    N2Vk,
    /// N2 First Positive
    #[serde(rename = "n2_1pg")]
    N2FirstPositive,
    /// N2 Second Positive
    #[serde(rename = "n2_2pg")]
    N2SecondPositive,
    /// N2+ First Negative
    #[serde(rename = "n2p_1ng")]
    N2PlusFirstNegative,
    /// N2+ Meinel
    #[serde(rename = "n2p_mnl")]
    N2PlusMeinel,
    /// NO gamma, delta and epsilon bands
    #[serde(rename = "no_bands")]
    NoBands,
    /// O2 nightglow (Herzberg and Chamberlain)
    #[serde(rename = "o2_nglow")]
    O2Nightglow,
    /// O2 Atmospheric
    #[serde(rename = "o2_atm")]
    O2Atmospheric,
}

impl Band {
    /// Canonical band order; synthesis stages are always emitted in this order
    pub const ALL: [Band; BAND_COUNT] = [
        Band::N2Lbh,
        Band::N2Vk,
        Band::N2FirstPositive,
        Band::N2SecondPositive,
        Band::N2PlusFirstNegative,
        Band::N2PlusMeinel,
        Band::NoBands,
        Band::O2Nightglow,
        Band::O2Atmospheric,
    ];

    /// Key used in configuration mappings
    pub fn key(&self) -> &'static str {
        match self {
            Band::N2Lbh => "n2_lbh",
            Band::N2Vk => "n2_vk",
            Band::N2FirstPositive => "n2_1pg",
            Band::N2SecondPositive => "n2_2pg",
            Band::N2PlusFirstNegative => "n2p_1ng",
            Band::N2PlusMeinel => "n2p_mnl",
            Band::NoBands => "no_bands",
            Band::O2Nightglow => "o2_nglow",
            Band::O2Atmospheric => "o2_atm",
        }
    }

    /// AURIC program that synthesizes this band
    pub fn command(&self) -> &'static str {
        match self {
            Band::N2Lbh => "syn_lbh",
            Band::N2Vk => "syn_vk",
            Band::N2FirstPositive => "syn_1pg",
            Band::N2SecondPositive => "syn_2pg",
            Band::N2PlusFirstNegative => "syn_1ng",
            Band::N2PlusMeinel => "syn_mnl",
            Band::NoBands => "syn_no",
            Band::O2Nightglow => "syn_o2",
            Band::O2Atmospheric => "syn_atm",
        }
    }

    /// Identifier of the synthesis stage for this band
    pub fn stage_id(&self) -> &'static str {
        match self {
            Band::N2Lbh => "synthesis-n2-lbh",
            Band::N2Vk => "synthesis-n2-vk",
            Band::N2FirstPositive => "synthesis-n2-1pg",
            Band::N2SecondPositive => "synthesis-n2-2pg",
            Band::N2PlusFirstNegative => "synthesis-n2p-1ng",
            Band::N2PlusMeinel => "synthesis-n2p-mnl",
            Band::NoBands => "synthesis-no-bands",
            Band::O2Nightglow => "synthesis-o2-nglow",
            Band::O2Atmospheric => "synthesis-o2-atm",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl FromStr for Band {
    type Err = AuricError;

    fn from_str(s: &str) -> Result<Self> {
        Band::ALL
            .into_iter()
            .find(|band| band.key() == s || band.command() == s)
            .ok_or_else(|| AuricError::UnknownBand {
                name: s.to_string(),
            })
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One enabled flag per canonical band
///
/// This is a plain `Copy` value: every configuration owns its own flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, bool>",
    into = "BTreeMap<String, bool>"
)]
pub struct BandOptions {
    flags: [bool; BAND_COUNT],
}

impl BandOptions {
    pub fn get(&self, band: Band) -> bool {
        self.flags[band.index()]
    }

    pub fn set(&mut self, band: Band, enabled: bool) {
        self.flags[band.index()] = enabled;
    }

    pub fn with(mut self, band: Band, enabled: bool) -> Self {
        self.set(band, enabled);
        self
    }

    /// Enabled bands in canonical order
    pub fn enabled(&self) -> impl Iterator<Item = Band> + '_ {
        Band::ALL.into_iter().filter(|band| self.get(*band))
    }

    pub fn any_enabled(&self) -> bool {
        self.flags.iter().any(|enabled| *enabled)
    }

    /// Apply a name -> flag mapping on top of the current flags
    pub fn apply_mapping<'a, I>(&mut self, mapping: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        for (name, enabled) in mapping {
            self.set(name.parse()?, enabled);
        }
        Ok(())
    }
}

impl TryFrom<BTreeMap<String, bool>> for BandOptions {
    type Error = AuricError;

    fn try_from(mapping: BTreeMap<String, bool>) -> Result<Self> {
        let mut options = BandOptions::default();
        options.apply_mapping(mapping.iter().map(|(k, v)| (k.as_str(), *v)))?;
        Ok(options)
    }
}

impl From<BandOptions> for BTreeMap<String, bool> {
    fn from(options: BandOptions) -> Self {
        Band::ALL
            .into_iter()
            .map(|band| (band.key().to_string(), options.get(band)))
            .collect()
    }
}

/// A single external program run as one step of the batch pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    AtmosphereModel,
    IonosphereModel,
    SolarFlux,
    ColumnDensity,
    PhotoelectronSource,
    EnergyFlux,
    PhotonFlux,
    ElectronImpact,
    DayChemistry,
    MergeVertical,
    Nightglow,
    LineOfSightDensity,
    RadiativeTransfer,
    LineOfSightIntegration,
    LymanAlphaCorrection,
    LymanBetaCorrection,
    MergeIntensity,
    Synthesis(Band),
    MergeSynthetic,
}

impl PipelineStage {
    const FIXED: [PipelineStage; 18] = [
        PipelineStage::AtmosphereModel,
        PipelineStage::IonosphereModel,
        PipelineStage::SolarFlux,
        PipelineStage::ColumnDensity,
        PipelineStage::PhotoelectronSource,
        PipelineStage::EnergyFlux,
        PipelineStage::PhotonFlux,
        PipelineStage::ElectronImpact,
        PipelineStage::DayChemistry,
        PipelineStage::MergeVertical,
        PipelineStage::Nightglow,
        PipelineStage::LineOfSightDensity,
        PipelineStage::RadiativeTransfer,
        PipelineStage::LineOfSightIntegration,
        PipelineStage::LymanAlphaCorrection,
        PipelineStage::LymanBetaCorrection,
        PipelineStage::MergeIntensity,
        PipelineStage::MergeSynthetic,
    ];

    /// Stable stage identifier
    pub fn id(&self) -> &'static str {
        match self {
            PipelineStage::AtmosphereModel => "atmosphere-model",
            PipelineStage::IonosphereModel => "ionosphere-model",
            PipelineStage::SolarFlux => "solar-flux",
            PipelineStage::ColumnDensity => "column-density",
            PipelineStage::PhotoelectronSource => "photoelectron-source",
            PipelineStage::EnergyFlux => "energy-flux",
            PipelineStage::PhotonFlux => "photon-flux",
            PipelineStage::ElectronImpact => "electron-impact",
            PipelineStage::DayChemistry => "day-chemistry",
            PipelineStage::MergeVertical => "merge-vertical",
            PipelineStage::Nightglow => "nightglow",
            PipelineStage::LineOfSightDensity => "line-of-sight-density",
            PipelineStage::RadiativeTransfer => "radiative-transfer",
            PipelineStage::LineOfSightIntegration => "line-of-sight-integration",
            PipelineStage::LymanAlphaCorrection => "lyman-alpha-correction",
            PipelineStage::LymanBetaCorrection => "lyman-beta-correction",
            PipelineStage::MergeIntensity => "merge-intensity",
            PipelineStage::Synthesis(band) => band.stage_id(),
            PipelineStage::MergeSynthetic => "merge-synthetic",
        }
    }

    /// Name of the AURIC executable implementing this stage
    pub fn command(&self) -> &'static str {
        match self {
            PipelineStage::AtmosphereModel => "atmos",
            PipelineStage::IonosphereModel => "ionos",
            PipelineStage::SolarFlux => "solar",
            PipelineStage::ColumnDensity => "colden",
            PipelineStage::PhotoelectronSource => "pesource",
            PipelineStage::EnergyFlux => "eflux",
            PipelineStage::PhotonFlux => "peflux",
            PipelineStage::ElectronImpact => "e_impact",
            PipelineStage::DayChemistry => "daychem",
            PipelineStage::MergeVertical => "mergever",
            PipelineStage::Nightglow => "niteglo",
            PipelineStage::LineOfSightDensity => "losden",
            PipelineStage::RadiativeTransfer => "radtrans",
            PipelineStage::LineOfSightIntegration => "losint",
            PipelineStage::LymanAlphaCorrection => "ly_alpha",
            PipelineStage::LymanBetaCorrection => "ly_beta",
            PipelineStage::MergeIntensity => "mergeint",
            PipelineStage::Synthesis(band) => band.command(),
            PipelineStage::MergeSynthetic => "mergesyn",
        }
    }
}

impl FromStr for PipelineStage {
    type Err = AuricError;

    /// Accepts either the stage identifier or the executable name
    fn from_str(s: &str) -> Result<Self> {
        let fixed = PipelineStage::FIXED.into_iter();
        let synthesis = Band::ALL.into_iter().map(PipelineStage::Synthesis);
        fixed
            .chain(synthesis)
            .find(|stage| stage.id() == s || stage.command() == s)
            .ok_or_else(|| AuricError::UnknownStage {
                name: s.to_string(),
            })
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl Serialize for PipelineStage {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.id())
    }
}

/// Ordered, duplicate-free list of stages in execution order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StageSequence {
    stages: Vec<PipelineStage>,
}

impl StageSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage unless it is already scheduled; returns whether it was added
    pub(crate) fn push(&mut self, stage: PipelineStage) -> bool {
        if self.stages.contains(&stage) {
            return false;
        }
        self.stages.push(stage);
        true
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn contains(&self, stage: PipelineStage) -> bool {
        self.stages.contains(&stage)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PipelineStage> {
        self.stages.iter()
    }

    pub fn as_slice(&self) -> &[PipelineStage] {
        &self.stages
    }

    /// Stage identifiers in order
    pub fn ids(&self) -> Vec<&'static str> {
        self.stages.iter().map(PipelineStage::id).collect()
    }

    /// Executable names in order
    pub fn commands(&self) -> Vec<&'static str> {
        self.stages.iter().map(PipelineStage::command).collect()
    }
}

impl<'a> IntoIterator for &'a StageSequence {
    type Item = &'a PipelineStage;
    type IntoIter = std::slice::Iter<'a, PipelineStage>;

    fn into_iter(self) -> Self::IntoIter {
        self.stages.iter()
    }
}

/// A named quantity's values as read from a profile output file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub name: String,
    pub values: Vec<f64>,
}

/// Structured contents of a profile output file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedProfileSet {
    /// Observer altitude (km), when the file declares one
    pub observer_altitude: Option<f64>,
    pub zenith_angles: Vec<f64>,
    pub altitudes: Vec<f64>,
    /// Dataset type label, e.g. "Volume emission rates"
    pub type_label: Option<String>,
    /// Profiles in order of first appearance
    pub profiles: Vec<Profile>,
}

impl ParsedProfileSet {
    pub fn profile(&self, name: &str) -> Option<&[f64]> {
        self.profiles
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.values.as_slice())
    }

    pub fn profile_names(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|p| p.name.as_str())
    }

    pub(crate) fn profile_index(&self, name: &str) -> Option<usize> {
        self.profiles.iter().position(|p| p.name == name)
    }
}

/// A named column of values
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

/// Structured contents of a stacked-block output file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TabularDataset {
    /// File name the dataset was read from
    pub source: String,
    /// Heading found between the index block and the data blocks
    pub title: String,
    pub index: Column,
    /// Data columns in file order
    pub columns: Vec<Column>,
    /// Lines above the index block
    pub info: Vec<String>,
    /// Every line of the file, unmodified
    #[serde(skip)]
    pub raw_lines: Vec<String>,
}

impl TabularDataset {
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn row_count(&self) -> usize {
        self.index.values.len()
    }
}

/// Observer geometry stored in view.inp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewGeometry {
    /// Observer altitude (km)
    pub observer_altitude: f64,
    /// Zenith angles of the lines of sight (deg)
    pub zenith_angles: Vec<f64>,
}
