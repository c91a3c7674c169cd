//! Command implementations for the AURIC processor CLI
//!
//! Every subcommand is blocking; [`run`] moves it onto a tokio blocking task
//! so the binary can race it against Ctrl-C.

use crate::cli::args::{
    Args, CloneArgs, Commands, GeoparmArgs, GlobalArgs, InitParamsArgs, LoadArgs, OutputFormat,
    ReadArgs, RetrieveArgs, RunArgs, SequenceArgs, SetParamArgs, WriteRadtransArgs,
    WriteViewArgs,
};
use crate::constants::{DEFAULT_FEATURES, PARAM_FILE, RADTRANS_FILE, VIEW_FILE};
use crate::export::write_dataset;
use crate::inputs::{ParamFile, RadtransOptions};
use crate::manager::{
    AuricFile, AuricManager, ProcessExecutor, RunReport, StageOutcome, WriteRequest,
};
use crate::models::{ParsedProfileSet, StageSequence, TabularDataset, ViewGeometry};
use crate::sequencer::{SequencerInputs, assemble_sequence};
use crate::switch::OptionSwitch;
use anyhow::{Context, Result, bail};
use colored::Colorize;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info};

/// Run the parsed command line
pub async fn run(args: Args) -> Result<()> {
    setup_logging(&args.global)?;
    debug!("Command line arguments: {:?}", args);

    let Some(command) = args.command else {
        return Ok(());
    };
    let global = args.global;

    tokio::task::spawn_blocking(move || execute(&global, command))
        .await
        .context("Command task failed")?
}

/// Set up structured logging based on CLI arguments
fn setup_logging(global: &GlobalArgs) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = global.get_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("auric_processor={}", log_level)));

    if global.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
            .context("Failed to initialize logging")?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .context("Failed to initialize logging")?;
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

fn execute(global: &GlobalArgs, command: Commands) -> Result<()> {
    match command {
        Commands::Sequence(args) => run_sequence_command(global, &args),
        Commands::Run(args) => run_stages(global, &args),
        Commands::Read(args) => read_file(global, &args),
        Commands::Retrieve(args) => retrieve_profiles(global, &args),
        Commands::Load(args) => load_dataset(global, &args),
        Commands::SetParam(args) => set_params(global, &args),
        Commands::Geoparm(args) => run_geoparm(global, &args),
        Commands::Clone(args) => clone_inputs(global, &args),
        Commands::WriteView(args) => write_view(global, &args),
        Commands::WriteRadtrans(args) => write_radtrans(global, &args),
        Commands::InitParams(args) => init_params(global, &args),
    }
}

fn open_manager(global: &GlobalArgs) -> Result<AuricManager> {
    let config = global
        .build_config()
        .context("Failed to load configuration")?;
    let dir = config.working_dir().to_path_buf();
    AuricManager::new(config)
        .with_context(|| format!("Cannot use {} as the AURIC working directory", dir.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_sequence_command(global: &GlobalArgs, args: &SequenceArgs) -> Result<()> {
    let sequence = match args.zenith_angle {
        Some(zenith_angle) => {
            let config = global
                .build_config()
                .context("Failed to load configuration")?;
            let inputs = SequencerInputs::new(zenith_angle)
                .with_optically_thick(args.optically_thick)
                .with_lyman_alpha(args.lyman_alpha)
                .with_lyman_beta(args.lyman_beta)
                .with_bands(config.bands)
                .with_energy_flux(config.use_energy_flux);
            assemble_sequence(&inputs)?
        }
        None => open_manager(global)?
            .batch()
            .context("Failed to assemble the batch sequence")?,
    };

    match global.output_format {
        OutputFormat::Json => print_json(&sequence),
        OutputFormat::Human => {
            print_sequence(&sequence);
            Ok(())
        }
    }
}

fn print_sequence(sequence: &StageSequence) {
    println!("{}", "Batch sequence".bold());
    for (i, stage) in sequence.iter().enumerate() {
        println!("  {:>2}. {:<32} {}", i + 1, stage.id(), stage.command().dimmed());
    }
}

fn run_stages(global: &GlobalArgs, args: &RunArgs) -> Result<()> {
    let manager = open_manager(global)?;
    let start_time = Instant::now();

    let report = if args.commands.is_empty() {
        let sequence = manager
            .batch()
            .context("Failed to assemble the batch sequence")?;
        info!("Running {} stages in {}", sequence.len(), manager.root().display());

        let progress_bar = if global.show_progress() {
            let pb = ProgressBar::new(sequence.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                    )?
                    .progress_chars("#>-"),
            );
            pb.set_message("Starting...");
            Some(pb)
        } else {
            None
        };

        let report = manager.run_sequence(&ProcessExecutor, &sequence, |outcome: &StageOutcome| {
            if let Some(pb) = &progress_bar {
                pb.inc(1);
                pb.set_message(outcome.command.clone());
            }
        })?;

        if let Some(pb) = &progress_bar {
            if report.succeeded() {
                pb.finish_with_message("Batch complete");
            } else {
                pb.abandon_with_message("Batch stopped");
            }
        }
        report
    } else {
        manager.custom_run(&ProcessExecutor, &args.commands)?
    };

    match global.output_format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Human => print_run_report(&report, start_time),
    }

    if let Some(failure) = report.failure() {
        bail!(
            "'{}' exited with code {} after {}/{} commands",
            failure.command,
            failure.exit_code,
            report.outcomes.len(),
            report.planned
        );
    }
    Ok(())
}

fn print_run_report(report: &RunReport, start_time: Instant) {
    println!();
    for outcome in &report.outcomes {
        let label = outcome
            .stage
            .map(|stage| stage.id().to_string())
            .unwrap_or_else(|| outcome.command.clone());
        if outcome.succeeded() {
            println!("  {} {}", "✓".green(), label);
        } else {
            println!(
                "  {} {} (exit code {})",
                "✗".red(),
                label,
                outcome.exit_code
            );
        }
    }

    let summary = format!(
        "{}/{} commands completed in {}",
        report.outcomes.iter().filter(|o| o.succeeded()).count(),
        report.planned,
        HumanDuration(start_time.elapsed())
    );
    if report.succeeded() {
        println!("{}", summary.green().bold());
    } else {
        println!("{}", summary.red().bold());
    }
}

fn read_file(global: &GlobalArgs, args: &ReadArgs) -> Result<()> {
    let manager = open_manager(global)?;
    let contents = manager
        .read(&args.file)
        .with_context(|| format!("Failed to read {}", args.file))?;

    match global.output_format {
        OutputFormat::Json => print_json(&contents),
        OutputFormat::Human => {
            match &contents {
                AuricFile::View(view) => print_view(view),
                AuricFile::Radtrans(options) => print_radtrans(options),
                AuricFile::Profile(profiles) => print_profile_set(&args.file, profiles),
            }
            Ok(())
        }
    }
}

fn print_view(view: &ViewGeometry) {
    println!("{}", VIEW_FILE.bold());
    println!("  Observer altitude: {} km", view.observer_altitude);
    println!("  Zenith angles:     {:?}", view.zenith_angles);
}

fn print_radtrans(options: &RadtransOptions) {
    println!("{}", RADTRANS_FILE.bold());
    for (key, switch) in options.iter() {
        let switch = if switch.is_on() {
            switch.to_string().green()
        } else {
            switch.to_string().dimmed()
        };
        println!("  {:<4} = {}", key, switch);
    }
}

fn print_profile_set(file: &str, profiles: &ParsedProfileSet) {
    println!("{}", file.bold());
    if let Some(label) = &profiles.type_label {
        println!("  Type:              {}", label);
    }
    if let Some(altitude) = profiles.observer_altitude {
        println!("  Observer altitude: {} km", altitude);
    }
    println!("  Altitudes:         {}", profiles.altitudes.len());
    println!("  Zenith angles:     {}", profiles.zenith_angles.len());
    println!("  Profiles:          {}", profiles.profiles.len());
    for profile in &profiles.profiles {
        println!("    • {} ({} values)", profile.name, profile.values.len());
    }
}

fn retrieve_profiles(global: &GlobalArgs, args: &RetrieveArgs) -> Result<()> {
    let manager = open_manager(global)?;
    let features: Vec<String> = if args.profiles.is_empty() {
        DEFAULT_FEATURES.iter().map(|f| f.to_string()).collect()
    } else {
        args.profiles.clone()
    };

    let retrieved = manager
        .retrieve(&args.file, &features)
        .with_context(|| format!("Failed to retrieve profiles from {}", args.file))?;

    match global.output_format {
        OutputFormat::Json => print_json(&retrieved),
        OutputFormat::Human => {
            println!("{}", args.file.bold());
            println!("  Altitudes:     {}", retrieved.altitudes.len());
            println!("  Zenith angles: {}", retrieved.zenith_angles.len());
            for profile in &retrieved.profiles {
                println!("    • {} ({} values)", profile.name, profile.values.len());
            }
            Ok(())
        }
    }
}

fn load_dataset(global: &GlobalArgs, args: &LoadArgs) -> Result<()> {
    let manager = open_manager(global)?;
    let dataset = manager
        .load(&args.file)
        .with_context(|| format!("Failed to load {}", args.file))?;

    if let Some(output) = &args.output {
        let format = write_dataset(&dataset, output)
            .with_context(|| format!("Failed to export {}", output.display()))?;
        info!("Exported {} as {:?} to {}", args.file, format, output.display());
    }

    match global.output_format {
        OutputFormat::Json => print_json(&dataset)?,
        OutputFormat::Human => print_dataset(&dataset),
    }
    if let (Some(output), OutputFormat::Human) = (&args.output, global.output_format) {
        println!("{} {}", "Wrote".green(), output.display());
    }
    Ok(())
}

fn print_dataset(dataset: &TabularDataset) {
    println!("{}", dataset.source.bold());
    println!("  Title:   {}", dataset.title);
    println!("  Index:   {} ({} rows)", dataset.index.name, dataset.row_count());
    println!("  Columns: {}", dataset.columns.len());
    for column in &dataset.columns {
        println!("    • {} ({} values)", column.name, column.values.len());
    }
}

fn set_params(global: &GlobalArgs, args: &SetParamArgs) -> Result<()> {
    let manager = open_manager(global)?;
    let missing = manager
        .set_params(args.assignments.iter().map(|a| (a.key.as_str(), a.value)))
        .with_context(|| format!("Failed to update {}", PARAM_FILE))?;

    match global.output_format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "updated": args.assignments.len() - missing.len(),
            "missing": missing,
        })),
        OutputFormat::Human => {
            for key in &missing {
                println!("{} '{}' is not in {}", "Skipped".yellow(), key, PARAM_FILE);
            }
            println!(
                "{} {} of {} parameters",
                "Updated".green(),
                args.assignments.len() - missing.len(),
                args.assignments.len()
            );
            Ok(())
        }
    }
}

fn run_geoparm(global: &GlobalArgs, args: &GeoparmArgs) -> Result<()> {
    let manager = open_manager(global)?;
    let exit_code = manager.run_geoparm(&ProcessExecutor, args.compute_indices)?;
    if exit_code != 0 {
        bail!("geoparm exited with code {}", exit_code);
    }
    if global.output_format == OutputFormat::Human {
        println!("{}", "geoparm finished".green());
    }
    Ok(())
}

fn clone_inputs(global: &GlobalArgs, args: &CloneArgs) -> Result<()> {
    let manager = open_manager(global)?;
    let cloned = manager
        .clone_into(&args.destination)
        .with_context(|| format!("Failed to clone into {}", args.destination.display()))?;

    match global.output_format {
        OutputFormat::Json => print_json(&serde_json::json!({ "working_dir": cloned.root() })),
        OutputFormat::Human => {
            println!("{} {}", "Cloned inputs to".green(), cloned.root().display());
            Ok(())
        }
    }
}

fn write_view(global: &GlobalArgs, args: &WriteViewArgs) -> Result<()> {
    if args.observer_altitude.is_none() && args.zenith_angles.is_none() {
        bail!("Nothing to write: give --altitude and/or --zenith-angles");
    }
    let manager = open_manager(global)?;
    manager
        .write(
            VIEW_FILE,
            WriteRequest::View {
                observer_altitude: args.observer_altitude,
                zenith_angles: args.zenith_angles.clone(),
            },
        )
        .with_context(|| format!("Failed to write {}", VIEW_FILE))?;

    if global.output_format == OutputFormat::Human {
        print_view(&manager.view()?);
    } else {
        print_json(&manager.view()?)?;
    }
    Ok(())
}

fn write_radtrans(global: &GlobalArgs, args: &WriteRadtransArgs) -> Result<()> {
    args.validate()?;
    let manager = open_manager(global)?;
    let options: RadtransOptions = args
        .enabled
        .iter()
        .map(|key| (key.as_str(), OptionSwitch::ON))
        .collect();
    manager
        .write(RADTRANS_FILE, WriteRequest::Radtrans(options))
        .with_context(|| format!("Failed to write {}", RADTRANS_FILE))?;

    let written = manager.radtrans_options()?;
    match global.output_format {
        OutputFormat::Json => print_json(&written),
        OutputFormat::Human => {
            print_radtrans(&written);
            Ok(())
        }
    }
}

fn init_params(global: &GlobalArgs, args: &InitParamsArgs) -> Result<()> {
    let manager = open_manager(global)?;
    let path = manager.path_to(PARAM_FILE);
    if path.exists() && !args.force {
        bail!(
            "{} already exists; use --force to overwrite it",
            path.display()
        );
    }
    ParamFile::template()?.write(&path)?;

    if global.output_format == OutputFormat::Human {
        println!("{} {}", "Wrote".green(), path.display());
    }
    Ok(())
}
