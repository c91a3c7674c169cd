//! Integration tests for a complete AURIC working-directory workflow
//!
//! These tests drive the public API the way the CLI does: prepare the input
//! files, assemble and run the batch with a recording executor, then parse
//! and export the output files a real run would leave behind.

use auric_processor::constants::{PARAM_FILE, RADTRANS_FILE, VIEW_FILE};
use auric_processor::export::write_dataset;
use auric_processor::manager::{AuricFile, WriteRequest};
use auric_processor::{
    AuricConfig, AuricManager, Band, BandOptions, Invocation, OptionSwitch, ParamFile,
    PipelineStage, RadtransOptions, Result, StageExecutor,
};
use std::cell::RefCell;
use tempfile::TempDir;

/// Records invocations and writes the files the stages would produce
#[derive(Default)]
struct FakeAuric {
    invocations: RefCell<Vec<Invocation>>,
}

impl FakeAuric {
    fn programs(&self) -> Vec<String> {
        self.invocations
            .borrow()
            .iter()
            .map(|i| i.program.clone())
            .collect()
    }
}

impl StageExecutor for FakeAuric {
    fn execute(&self, invocation: &Invocation) -> Result<i32> {
        self.invocations.borrow_mut().push(invocation.clone());
        if invocation.program == "losint" {
            std::fs::write(invocation.working_dir.join("losint.dat"), LOSINT_OUTPUT)?;
        }
        if invocation.program == "ionos" {
            std::fs::write(invocation.working_dir.join("ionos.dat"), IONOS_OUTPUT)?;
        }
        Ok(0)
    }
}

const LOSINT_OUTPUT: &str = "AURIC line-of-sight column intensities
ZA (deg)
       90.00      120.00
Intensity (R)
O I 1356 A
   1.500E+02   2.500E+02
O I 1304 A
   3.500E+03   4.500E+03
";

const IONOS_OUTPUT: &str = "    2 altitudes    2 profiles
Altitudes (km) =
   100.00000   200.00000
Volume emission rates
O+e 834 A (initial) =
   1.000E+01   2.000E+01
O+hv 834 A (initial) =
   3.000E+00   4.000E+00
";

fn prepared_manager(dir: &TempDir, bands: BandOptions) -> AuricManager {
    let config = AuricConfig::builder()
        .with_root("/opt/auric")
        .with_working_dir(dir.path())
        .build()
        .unwrap()
        .with_bands(bands);
    let manager = AuricManager::new(config).unwrap();

    ParamFile::template()
        .unwrap()
        .write(manager.path_to(PARAM_FILE))
        .unwrap();
    manager
        .write(
            VIEW_FILE,
            WriteRequest::View {
                observer_altitude: Some(600.0),
                zenith_angles: Some(vec![90.0, 120.0]),
            },
        )
        .unwrap();
    manager
}

#[test]
fn test_daytime_batch_end_to_end() {
    let dir = TempDir::new().unwrap();
    let manager = prepared_manager(&dir, BandOptions::default().with(Band::N2Lbh, true));
    manager
        .write(
            RADTRANS_FILE,
            WriteRequest::Radtrans(RadtransOptions::new().with("834", OptionSwitch::ON)),
        )
        .unwrap();

    let sequence = manager.batch().unwrap();
    assert_eq!(sequence.as_slice()[0], PipelineStage::AtmosphereModel);
    assert!(sequence.contains(PipelineStage::RadiativeTransfer));
    assert!(sequence.contains(PipelineStage::Synthesis(Band::N2Lbh)));

    let executor = FakeAuric::default();
    let report = manager.run_batch(&executor).unwrap();
    assert!(report.succeeded());
    assert_eq!(report.outcomes.len(), sequence.len());
    assert_eq!(executor.programs(), sequence.commands());

    let invocation = &executor.invocations.borrow()[0];
    assert_eq!(invocation.working_dir, manager.root());
    assert_eq!(invocation.env["AURIC_ROOT"], "/opt/auric");

    let retrieved = manager
        .retrieve("ionos.dat", &["O+hv 834 A (initial)"])
        .unwrap();
    assert_eq!(retrieved.altitudes, vec![100.0, 200.0]);
    assert_eq!(retrieved.profiles[0].values, vec![3.0, 4.0]);

    let dataset = manager.load("losint.dat").unwrap();
    assert_eq!(dataset.title, "Intensity (R)");
    assert_eq!(dataset.index.values, vec![90.0, 120.0]);
    assert_eq!(dataset.column("O I 1304 A"), Some(&[3500.0, 4500.0][..]));

    let csv_path = dir.path().join("losint.csv");
    write_dataset(&dataset, &csv_path).unwrap();
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert!(csv.starts_with("ZA (deg),O I 1356 A,O I 1304 A"));
}

#[test]
fn test_nighttime_batch_after_param_update() {
    let dir = TempDir::new().unwrap();
    let manager = prepared_manager(&dir, BandOptions::default());

    let missing = manager.set_params([("SZA", 150.0)]).unwrap();
    assert!(missing.is_empty());

    let ids = manager.batch().unwrap().ids();
    assert_eq!(
        &ids[..4],
        &[
            "atmosphere-model",
            "ionosphere-model",
            "nightglow",
            "line-of-sight-density"
        ]
    );
    assert!(!ids.contains(&"merge-synthetic"));
}

#[test]
fn test_twilight_zenith_angle_blocks_the_batch() {
    let dir = TempDir::new().unwrap();
    let manager = prepared_manager(&dir, BandOptions::default());
    manager.set_params([("SZA", 100.0)]).unwrap();

    let executor = FakeAuric::default();
    assert!(manager.run_batch(&executor).is_err());
    assert!(executor.programs().is_empty());
}

#[test]
fn test_clone_keeps_inputs_and_installation() {
    let dir = TempDir::new().unwrap();
    let manager = prepared_manager(&dir, BandOptions::default());
    let target = TempDir::new().unwrap();

    let cloned = manager.clone_into(target.path().join("run-2")).unwrap();
    assert!(cloned.exists(PARAM_FILE));
    assert!(cloned.exists(VIEW_FILE));
    assert_eq!(cloned.config().auric_root, manager.config().auric_root);

    match cloned.read(VIEW_FILE).unwrap() {
        AuricFile::View(view) => {
            assert_eq!(view.observer_altitude, 600.0);
            assert_eq!(view.zenith_angles, vec![90.0, 120.0]);
        }
        other => panic!("expected a view file, got {other:?}"),
    }
}
