use super::*;
use crate::error::AuricError;
use crate::inputs::RadtransOptions;
use crate::manager::{AuricFile, FileKind, WriteRequest};
use crate::models::{Band, PipelineStage};
use std::path::PathBuf;

#[test]
fn test_missing_root_is_rejected() {
    let config = AuricConfig::new("/opt/auric").with_working_dir("/nonexistent/auric/run");
    assert!(matches!(
        AuricManager::new(config),
        Err(AuricError::RootNotFound { .. })
    ));
}

#[test]
fn test_paths_and_existence() {
    let dir = working_dir(30.0);
    let manager = manager_for(&dir);

    assert!(manager.root().is_absolute());
    assert_eq!(manager.path_to("view.inp"), manager.root().join("view.inp"));
    assert!(manager.exists("param.inp"));
    assert!(!manager.exists("ly_alpha.opt"));
}

#[test]
fn test_environment() {
    let dir = working_dir(30.0);
    let env = manager_for(&dir).environment().unwrap();

    assert_eq!(env["AURIC_ROOT"], "/opt/auric");
    let first = std::env::split_paths(&env["PATH"]).next().unwrap();
    assert!(first.starts_with("/opt/auric/bin"));
    assert_eq!(env.len(), 2);
}

#[test]
fn test_relative_root_is_made_absolute() {
    let dir = working_dir(30.0);
    let config = AuricConfig::new("auric-install").with_working_dir(dir.path());
    let manager = AuricManager::new(config).unwrap();

    let expected = std::env::current_dir().unwrap().join("auric-install");
    assert!(manager.config().auric_root.is_absolute());
    assert_eq!(manager.config().auric_root, expected);

    let env = manager.environment().unwrap();
    assert_eq!(PathBuf::from(&env["AURIC_ROOT"]), expected);
    let first = std::env::split_paths(&env["PATH"]).next().unwrap();
    assert_eq!(first, crate::config::bin_dir(&expected));
}

#[test]
fn test_read_dispatches_on_name() {
    let dir = working_dir(30.0);
    let manager = manager_for(&dir);

    match manager.read("view.inp").unwrap() {
        AuricFile::View(view) => {
            assert_eq!(view.observer_altitude, 600.0);
            assert_eq!(view.zenith_angles, vec![90.0, 120.0]);
        }
        other => panic!("expected a view, got {other:?}"),
    }
    match manager.read("dayglo.ver").unwrap() {
        AuricFile::Profile(parsed) => assert_eq!(parsed.profiles.len(), 2),
        other => panic!("expected a profile set, got {other:?}"),
    }
    assert_eq!(FileKind::of("radtrans.opt"), FileKind::Radtrans);
}

#[test]
fn test_write_view_overlays_current_values() {
    let dir = working_dir(30.0);
    let manager = manager_for(&dir);

    manager
        .write(
            "view.inp",
            WriteRequest::View {
                observer_altitude: Some(250.0),
                zenith_angles: None,
            },
        )
        .unwrap();

    let view = manager.view().unwrap();
    assert_eq!(view.observer_altitude, 250.0);
    assert_eq!(view.zenith_angles, vec![90.0, 120.0]);
}

#[test]
fn test_write_kind_mismatch() {
    let dir = working_dir(30.0);
    let manager = manager_for(&dir);

    let err = manager
        .write("view.inp", WriteRequest::Radtrans(RadtransOptions::new()))
        .unwrap_err();
    assert!(matches!(err, AuricError::UnsupportedWrite { .. }));

    assert!(
        manager
            .write(
                "dayglo.ver",
                WriteRequest::View {
                    observer_altitude: Some(1.0),
                    zenith_angles: Some(vec![]),
                },
            )
            .is_err()
    );
}

#[test]
fn test_params_and_set_params() {
    let dir = working_dir(30.0);
    let manager = manager_for(&dir);

    let missing = manager.set_params([("SZA", 140.0), ("NOPE", 0.0)]).unwrap();
    assert_eq!(missing, vec!["NOPE".to_string()]);
    assert_eq!(manager.params().unwrap().get("SZA"), Some(140.0));
}

#[test]
fn test_batch_reads_working_directory() {
    let dir = working_dir(150.0);
    let manager = manager_for(&dir);

    let base = manager.batch().unwrap();
    assert!(!base.contains(PipelineStage::RadiativeTransfer));
    assert!(base.contains(PipelineStage::Nightglow));

    manager
        .write(
            "radtrans.opt",
            WriteRequest::Radtrans(RadtransOptions::new().with("1304", true)),
        )
        .unwrap();
    fs::write(manager.path_to("ly_beta.opt"), "").unwrap();

    let inputs = manager.sequencer_inputs().unwrap();
    assert_eq!(inputs.zenith_angle, 150.0);
    assert!(inputs.optically_thick);
    assert!(!inputs.lyman_alpha);
    assert!(inputs.lyman_beta);

    let sequence = manager.batch().unwrap();
    assert!(sequence.contains(PipelineStage::RadiativeTransfer));
    assert!(sequence.contains(PipelineStage::LymanBetaCorrection));
}

#[test]
fn test_batch_uses_configured_bands() {
    let dir = working_dir(150.0);
    let config = AuricConfig::new("/opt/auric")
        .with_working_dir(dir.path())
        .with_bands(crate::models::BandOptions::default().with(Band::O2Atmospheric, true));
    let manager = AuricManager::new(config).unwrap();

    let commands = manager.batch().unwrap().commands();
    assert_eq!(&commands[commands.len() - 2..], &["syn_atm", "mergesyn"]);
}

#[test]
fn test_twilight_batch_is_rejected() {
    let dir = working_dir(100.0);
    assert!(matches!(
        manager_for(&dir).batch(),
        Err(AuricError::InvalidZenithAngle { .. })
    ));
}

#[test]
fn test_run_batch_executes_in_order() {
    let dir = working_dir(150.0);
    let manager = manager_for(&dir);
    let executor = RecordingExecutor::new();

    let report = manager.run_batch(&executor).unwrap();

    assert!(report.succeeded());
    assert_eq!(
        executor.programs(),
        vec!["atmos", "ionos", "niteglo", "losden", "losint", "mergeint"]
    );
    let invocations = executor.invocations.borrow();
    assert!(invocations.iter().all(|i| i.working_dir == manager.root()));
    assert!(invocations.iter().all(|i| i.env.contains_key("AURIC_ROOT")));
}

#[test]
fn test_run_batch_stops_at_first_failure() {
    let dir = working_dir(150.0);
    let manager = manager_for(&dir);
    let executor = RecordingExecutor::new().failing("niteglo", 2);

    let report = manager.run_batch(&executor).unwrap();

    assert!(!report.succeeded());
    assert_eq!(report.planned, 6);
    assert_eq!(report.outcomes.len(), 3);
    let failure = report.failure().unwrap();
    assert_eq!(failure.stage, Some(PipelineStage::Nightglow));
    assert_eq!(failure.exit_code, 2);
    assert_eq!(executor.programs(), vec!["atmos", "ionos", "niteglo"]);
}

#[test]
fn test_run_sequence_reports_progress() {
    let dir = working_dir(150.0);
    let manager = manager_for(&dir);
    let sequence = manager.batch().unwrap();
    let mut seen = Vec::new();

    manager
        .run_sequence(&RecordingExecutor::new(), &sequence, |outcome| {
            seen.push(outcome.command.clone())
        })
        .unwrap();
    assert_eq!(seen, sequence.commands());
}

#[test]
fn test_custom_run_splits_arguments() {
    let dir = working_dir(30.0);
    let manager = manager_for(&dir);
    let executor = RecordingExecutor::new();

    let report = manager
        .custom_run(&executor, &["atmos", "radtrans -quiet"])
        .unwrap();

    assert!(report.succeeded());
    assert!(report.outcomes.iter().all(|o| o.stage.is_none()));
    let invocations = executor.invocations.borrow();
    assert_eq!(invocations[1].program, "radtrans");
    assert_eq!(invocations[1].args, vec!["-quiet"]);
}

#[test]
fn test_geoparm_answers_on_stdin() {
    let dir = working_dir(30.0);
    let manager = manager_for(&dir);
    let executor = RecordingExecutor::new();

    assert_eq!(manager.run_geoparm(&executor, true).unwrap(), 0);
    manager.run_geoparm(&executor, false).unwrap();

    let invocations = executor.invocations.borrow();
    assert_eq!(invocations[0].program, "geoparm");
    assert_eq!(invocations[0].stdin.as_deref(), Some(&b"Y\n"[..]));
    assert_eq!(invocations[1].stdin.as_deref(), Some(&b"N\n"[..]));
}

#[test]
fn test_retrieve_features() {
    let dir = working_dir(30.0);
    let manager = manager_for(&dir);

    let retrieved = manager
        .retrieve("dayglo.ver", &["O+hv 834 A (initial)"])
        .unwrap();
    assert_eq!(retrieved.altitudes, vec![100.0, 200.0]);
    assert_eq!(retrieved.profiles[0].values, vec![3.0, 4.0]);

    assert!(matches!(
        manager.retrieve("dayglo.ver", &["O+e 832 A (initial)"]),
        Err(AuricError::FeatureNotFound { .. })
    ));
}

#[test]
fn test_load_stacked_file() {
    let dir = working_dir(30.0);
    let dataset = manager_for(&dir).load("losint.dat").unwrap();
    assert_eq!(dataset.index.name, "ALT (km)");
    assert_eq!(dataset.column("1356 A").unwrap(), &[10.0, 20.0]);
}

#[test]
fn test_clone_into_copies_inputs_only() {
    let dir = working_dir(30.0);
    let manager = manager_for(&dir);
    manager
        .write("radtrans.opt", WriteRequest::Radtrans(RadtransOptions::new()))
        .unwrap();

    let target = TempDir::new().unwrap();
    let run_dir: PathBuf = target.path().join("run1");
    let clone = manager.clone_into(&run_dir).unwrap();

    assert_eq!(clone.root(), std::path::absolute(&run_dir).unwrap());
    assert!(clone.exists("param.inp"));
    assert!(clone.exists("view.inp"));
    assert!(clone.exists("radtrans.opt"));
    assert!(!clone.exists("dayglo.ver"));
    assert_eq!(clone.environment().unwrap()["AURIC_ROOT"], "/opt/auric");
    assert_eq!(clone.params().unwrap(), manager.params().unwrap());
}
