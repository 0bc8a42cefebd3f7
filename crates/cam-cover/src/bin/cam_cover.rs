use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use cam_cover::config::PlanConfig;
use cam_cover::core::{init_with_level, level_from_verbosity};
use cam_cover::io::{read_input, write_submission_file};
use cam_cover::model::InfeasiblePolicy;
use cam_cover::placement::{CandidateSet, CoverageIndex};
use cam_cover::plan::{problem_from_input, CoverPlan, PlanError, PlanReport};
use chrono::Utc;
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
#[cfg(feature = "tracing")]
use tracing_log::LogTracer;

/// Minimum-cost camera placement over a grid of pieces.
#[derive(Parser, Debug)]
#[command(name = "cam-cover", version, about)]
struct Cli {
    /// JSON run configuration; flags below override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Amount subtracted from each camera range before building centers.
    #[arg(long, global = true)]
    margin: Option<f64>,
    /// Keep candidate centers with negative coordinates.
    #[arg(long, global = true)]
    no_grid_clip: bool,
    /// Leave uncoverable pieces out of the model instead of failing.
    #[arg(long, global = true)]
    allow_uncovered: bool,
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[arg(short, long, action = ArgAction::Count, global = true)]
    quiet: u8,
    /// Emit JSON log lines through `tracing` instead of the plain logger.
    #[cfg(feature = "tracing")]
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate candidates and coverage sets and print a summary.
    Candidates {
        input: PathBuf,
        /// Dump candidates, coverage sets and summary as JSON.
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Write the covering model as CPLEX LP for an external solver.
    Model {
        input: PathBuf,
        #[arg(long)]
        lp: PathBuf,
    },
    /// Run the full pipeline through SCIP and write the submission file.
    Solve {
        input: PathBuf,
        /// Path to the `scip` executable.
        #[arg(long)]
        scip: Option<PathBuf>,
        /// Solver time limit in seconds.
        #[arg(long)]
        time_limit: Option<f64>,
        /// Keep the LP and solution files here.
        #[arg(long)]
        work_dir: Option<PathBuf>,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct CandidatesDump<'a> {
    summary: &'a PlanReport,
    candidates: &'a CandidateSet,
    coverage: &'a CoverageIndex,
}

fn init_logging(cli: &Cli) {
    let level = level_from_verbosity(cli.verbose, cli.quiet);
    #[cfg(feature = "tracing")]
    {
        if cli.log_json {
            let _ = LogTracer::init();
            cam_cover::core::init_tracing(level, true);
            return;
        }
    }
    if let Err(err) = init_with_level(level) {
        eprintln!("failed to install logger: {err}");
    }
}

fn load_config(cli: &Cli) -> Result<PlanConfig, PlanError> {
    let mut config = match &cli.config {
        Some(path) => PlanConfig::load_json(path)?,
        None => PlanConfig::default(),
    };
    if let Some(margin) = cli.margin {
        config.range_safety_margin = margin;
    }
    if cli.no_grid_clip {
        config.restrict_to_grid = false;
    }
    if cli.allow_uncovered {
        config.infeasible_policy = InfeasiblePolicy::DropUncovered;
    }
    Ok(config)
}

fn prepare(input: &Path, config: &PlanConfig) -> Result<CoverPlan, PlanError> {
    log::info!("reading {}", input.display());
    let problem = problem_from_input(read_input(input)?, config)?;
    CoverPlan::prepare(problem, config)
}

fn print_summary(report: &PlanReport) {
    println!("pieces: {}", report.pieces);
    if let Some(extent) = report.extent {
        println!("grid: {} x {}", extent.width(), extent.height());
    }
    println!(
        "candidates: {} (short {}, long {})",
        report.candidates.total, report.candidates.short, report.candidates.long
    );
    println!("isolated pieces: {}", report.isolated);
    println!("memberships: {}", report.memberships);
    if !report.uncovered.is_empty() {
        println!("uncovered pieces: {}", report.uncovered.len());
    }
}

fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<(), PlanError> {
    let raw = serde_json::to_string_pretty(value)
        .map_err(|e| PlanError::Config(e.into()))?;
    std::fs::write(path, raw)?;
    Ok(())
}

fn run(cli: &Cli) -> Result<(), PlanError> {
    let mut config = load_config(cli)?;
    match &cli.command {
        Command::Candidates { input, json } => {
            let plan = prepare(input, &config)?;
            let report = plan.report(None);
            print_summary(&report);
            if let Some(path) = json {
                let dump = CandidatesDump {
                    summary: &report,
                    candidates: &plan.generation.candidates,
                    coverage: &plan.coverage,
                };
                write_json(&dump, path)?;
                log::info!("wrote {}", path.display());
            }
        }
        Command::Model { input, lp } => {
            let plan = prepare(input, &config)?;
            plan.write_lp_file(lp)?;
            println!(
                "wrote {}: {} variables, {} constraints",
                lp.display(),
                plan.model.variables().len(),
                plan.model.constraints().len()
            );
        }
        Command::Solve {
            input,
            scip,
            time_limit,
            work_dir,
            out_dir,
            report,
        } => {
            if let Some(path) = scip {
                config.solver.executable = path.clone();
            }
            if let Some(limit) = time_limit {
                config.solver.time_limit = Some(*limit);
            }
            if let Some(dir) = work_dir {
                config.solver.work_dir = Some(dir.clone());
            }
            if let Some(dir) = out_dir {
                config.output_dir = dir.clone();
            }
            if let Some(path) = report {
                config.report_path = Some(path.clone());
            }

            let plan = prepare(input, &config)?;
            let assignment = plan.solve(&config.solver)?;
            let selected = plan.selected(&assignment);
            let date = Utc::now().date_naive();
            let path = write_submission_file(&config.output_dir, date, &selected)?;
            println!(
                "{} cameras, total cost {} -> {}",
                selected.len(),
                assignment.objective,
                path.display()
            );

            if let Some(report_path) = &config.report_path {
                plan.report(Some(&assignment)).write_json(report_path)?;
                log::info!("wrote {}", report_path.display());
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    let started = Instant::now();
    let result = run(&cli);
    log::info!("completed in {:.3}s", started.elapsed().as_secs_f64());

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
