use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use room_scheduler::config::{Cli, Command, RunArgs, SolveArgs, SolverKind};
use room_scheduler::data::Dataset;
use room_scheduler::generator::generate_dataset;
use room_scheduler::result::ScheduleResult;
use room_scheduler::server;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Command::Serve(args) => {
            server::run_server(args.bind, args.search.solver_config()).await?;
        }
        Command::Run(args) => run(&args)?,
        Command::Solve(args) => solve(&args)?,
    }

    Ok(())
}

fn write_result(path: &Path, result: &ScheduleResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}

/// Generates a dataset, runs both solvers on it and writes one file per solver.
fn run(args: &RunArgs) -> Result<()> {
    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating {}", args.output_dir.display()))?;

    let dataset = generate_dataset(&args.generator_config());
    info!(
        "Generated {} courses over {} rooms and {} periods",
        dataset.courses.len(),
        dataset.rooms.len(),
        dataset.periods
    );
    let tag = format!("{}_{}_{}", args.rooms, args.periods, args.overflow_courses);

    let start = Instant::now();
    let exact = ScheduleResult::from(&dataset.solve_exact(&args.solver_config())?);
    let elapsed = start.elapsed().as_secs_f64();
    let path = args
        .output_dir
        .join(format!("exact_schedule_{}_{:.2}_seconds.json", tag, elapsed));
    write_result(&path, &exact)?;
    info!("Exact schedule saved to {} in {:.2}s", path.display(), elapsed);

    let start = Instant::now();
    let approximate = ScheduleResult::from(&dataset.solve_approx()?);
    let elapsed = start.elapsed().as_secs_f64();
    let path = args
        .output_dir
        .join(format!("approximate_schedule_{}_{:.2}_seconds.json", tag, elapsed));
    write_result(&path, &approximate)?;
    info!(
        "Approximate schedule saved to {} in {:.2}s",
        path.display(),
        elapsed
    );

    Ok(())
}

fn solve(args: &SolveArgs) -> Result<()> {
    let raw = fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let dataset: Dataset = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", args.input.display()))?;

    let solution = match args.solver {
        SolverKind::Exact => dataset.solve_exact(&args.search.solver_config())?,
        SolverKind::Approx => dataset.solve_approx()?,
    };
    let result = ScheduleResult::from(&solution);
    info!(
        "{} booked, {} unscheduled",
        result.total_courses_booked, result.total_courses_unscheduled
    );

    match &args.output {
        Some(path) => write_result(path, &result)?,
        None => println!("{}", serde_json::to_string_pretty(&result)?),
    }
    Ok(())
}
