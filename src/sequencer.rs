//! Batch pipeline sequencing
//!
//! Turns a handful of physical and configuration flags into the ordered list
//! of AURIC stages a batch run must execute. Sequencing is a pure function of
//! [`SequencerInputs`]; nothing here touches the filesystem.

use crate::constants::{DAYTIME_SZA, NIGHTTIME_SZA};
use crate::error::{AuricError, Result};
use crate::models::{BandOptions, PipelineStage, StageSequence};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Illumination regime selected by the solar zenith angle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    Daytime,
    Nighttime,
}

impl Regime {
    /// Classify a solar zenith angle (deg)
    ///
    /// Both regimes are open intervals; the twilight gap between them, the
    /// boundaries themselves and NaN are rejected.
    pub fn from_zenith_angle(zenith_angle: f64) -> Result<Self> {
        let within = |(low, high): (f64, f64)| low < zenith_angle && zenith_angle < high;
        if within(DAYTIME_SZA) {
            Ok(Regime::Daytime)
        } else if within(NIGHTTIME_SZA) {
            Ok(Regime::Nighttime)
        } else {
            Err(AuricError::InvalidZenithAngle {
                value: zenith_angle,
            })
        }
    }
}

/// Everything the sequencer needs to know about a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SequencerInputs {
    /// Solar zenith angle (deg)
    pub zenith_angle: f64,
    /// At least one radiative transfer switch is on
    pub optically_thick: bool,
    /// Lyman-alpha correction options are present
    pub lyman_alpha: bool,
    /// Lyman-beta correction options are present
    pub lyman_beta: bool,
    /// Synthetic spectra to compute
    pub bands: BandOptions,
    /// Use the energy-flux photoelectron method instead of photon flux
    pub use_energy_flux: bool,
}

impl SequencerInputs {
    pub fn new(zenith_angle: f64) -> Self {
        Self {
            zenith_angle,
            optically_thick: false,
            lyman_alpha: false,
            lyman_beta: false,
            bands: BandOptions::default(),
            use_energy_flux: false,
        }
    }

    pub fn with_optically_thick(mut self, optically_thick: bool) -> Self {
        self.optically_thick = optically_thick;
        self
    }

    pub fn with_lyman_alpha(mut self, present: bool) -> Self {
        self.lyman_alpha = present;
        self
    }

    pub fn with_lyman_beta(mut self, present: bool) -> Self {
        self.lyman_beta = present;
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
}

/// Assemble the ordered stage sequence for a batch run
pub fn assemble_sequence(inputs: &SequencerInputs) -> Result<StageSequence> {
    let regime = Regime::from_zenith_angle(inputs.zenith_angle)?;
    let mut sequence = StageSequence::new();

    sequence.push(PipelineStage::AtmosphereModel);
    sequence.push(PipelineStage::IonosphereModel);

    match regime {
        Regime::Daytime => {
            sequence.push(PipelineStage::SolarFlux);
            sequence.push(PipelineStage::ColumnDensity);
            sequence.push(PipelineStage::PhotoelectronSource);
            sequence.push(if inputs.use_energy_flux {
                PipelineStage::EnergyFlux
            } else {
                PipelineStage::PhotonFlux
            });
            sequence.push(PipelineStage::ElectronImpact);
            sequence.push(PipelineStage::DayChemistry);
            sequence.push(PipelineStage::MergeVertical);
        }
        Regime::Nighttime => {
            sequence.push(PipelineStage::Nightglow);
        }
    }

    sequence.push(PipelineStage::LineOfSightDensity);
    if inputs.optically_thick {
        sequence.push(PipelineStage::RadiativeTransfer);
    }
    sequence.push(PipelineStage::LineOfSightIntegration);

    if inputs.lyman_alpha {
        sequence.push(PipelineStage::LymanAlphaCorrection);
    }
    if inputs.lyman_beta {
        sequence.push(PipelineStage::LymanBetaCorrection);
    }
    sequence.push(PipelineStage::MergeIntensity);

    for band in inputs.bands.enabled() {
        sequence.push(PipelineStage::Synthesis(band));
    }
    if inputs.bands.any_enabled() {
        sequence.push(PipelineStage::MergeSynthetic);
    }

    debug!(
        "Assembled {:?} sequence of {} stages for SZA {}",
        regime,
        sequence.len(),
        inputs.zenith_angle
    );
    Ok(sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Band;

    const DAYTIME_PREFIX: [&str; 10] = [
        "atmosphere-model",
        "ionosphere-model",
        "solar-flux",
        "column-density",
        "photoelectron-source",
        "photon-flux",
        "electron-impact",
        "day-chemistry",
        "merge-vertical",
        "line-of-sight-density",
    ];

    #[test]
    fn test_regime_boundaries() {
        assert_eq!(Regime::from_zenith_angle(30.0).unwrap(), Regime::Daytime);
        assert_eq!(Regime::from_zenith_angle(150.0).unwrap(), Regime::Nighttime);
        for bad in [0.0, 90.0, 100.0, 110.0, 180.0, -5.0, f64::NAN] {
            assert!(matches!(
                Regime::from_zenith_angle(bad),
                Err(AuricError::InvalidZenithAngle { .. })
            ));
        }
    }

    #[test]
    fn test_daytime_prefix() {
        let sequence = assemble_sequence(&SequencerInputs::new(30.0)).unwrap();
        assert_eq!(&sequence.ids()[..10], &DAYTIME_PREFIX);

        let eflux = assemble_sequence(&SequencerInputs::new(30.0).with_energy_flux(true)).unwrap();
        assert_eq!(eflux.ids()[5], "energy-flux");
        assert!(!eflux.contains(PipelineStage::PhotonFlux));
    }

    #[test]
    fn test_minimal_nighttime_sequence() {
        let sequence = assemble_sequence(&SequencerInputs::new(150.0)).unwrap();
        assert_eq!(
            sequence.ids(),
            vec![
                "atmosphere-model",
                "ionosphere-model",
                "nightglow",
                "line-of-sight-density",
                "line-of-sight-integration",
                "merge-intensity",
            ]
        );
    }

    #[test]
    fn test_invalid_angle_produces_no_stages() {
        for bad in [100.0, 0.0, 90.0] {
            let err = assemble_sequence(&SequencerInputs::new(bad)).unwrap_err();
            assert!(err.to_string().contains(&bad.to_string()));
        }
    }

    #[test]
    fn test_optional_stages_in_order() {
        let inputs = SequencerInputs::new(45.0)
            .with_optically_thick(true)
            .with_lyman_alpha(true)
            .with_lyman_beta(true);
        let ids = assemble_sequence(&inputs).unwrap().ids();
        let tail = &ids[ids.len() - 6..];
        assert_eq!(
            tail,
            &[
                "line-of-sight-density",
                "radiative-transfer",
                "line-of-sight-integration",
                "lyman-alpha-correction",
                "lyman-beta-correction",
                "merge-intensity",
            ]
        );
    }

    #[test]
    fn test_bands_follow_canonical_order() {
        let mut bands = BandOptions::default();
        bands
            .apply_mapping([("o2_atm", true), ("n2_lbh", true), ("no_bands", true)])
            .unwrap();
        let sequence =
            assemble_sequence(&SequencerInputs::new(150.0).with_bands(bands)).unwrap();
        let commands = sequence.commands();
        assert_eq!(
            &commands[commands.len() - 4..],
            &["syn_lbh", "syn_no", "syn_atm", "mergesyn"]
        );
        assert!(sequence.contains(PipelineStage::Synthesis(Band::O2Atmospheric)));
    }

    #[test]
    fn test_no_merge_without_bands() {
        let sequence = assemble_sequence(&SequencerInputs::new(60.0)).unwrap();
        assert!(!sequence.contains(PipelineStage::MergeSynthetic));
        assert_eq!(sequence.ids().last(), Some(&"merge-intensity"));
    }

    #[test]
    fn test_sequences_have_no_duplicates() {
        let inputs = SequencerInputs::new(20.0)
            .with_optically_thick(true)
            .with_lyman_alpha(true)
            .with_bands(Band::ALL.into_iter().fold(BandOptions::default(), |b, band| {
                b.with(band, true)
            }));
        let ids = assemble_sequence(&inputs).unwrap().ids();
        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), ids.len());
        assert_eq!(ids.len(), 10 + 3 + 1 + 9 + 1);
    }
}
