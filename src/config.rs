//! Command-line and environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::generator::GeneratorConfig;
use crate::solver::{BacktrackPolicy, SolverConfig};

/// Default probe budget for the complete search when run as a service.
pub const DEFAULT_STEP_LIMIT: u64 = 5_000_000;

#[derive(Parser, Debug)]
#[command(name = "room_scheduler")]
#[command(about = "Assigns courses to (room, period) slots with exact and greedy solvers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging (RUST_LOG still takes precedence)
    #[arg(long, short, global = true, env = "SCHEDULER_VERBOSE")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the solvers over HTTP.
    Serve(ServeArgs),
    /// Generate a dataset, run both solvers and write the results.
    Run(RunArgs),
    /// Solve a dataset file with one solver.
    Solve(SolveArgs),
}

/// Solver settings shared by every command.
#[derive(clap::Args, Debug, Clone)]
pub struct SearchArgs {
    /// Backtracking variant for the exact solver [default: complete; best-effort for `run`]
    #[arg(long, env = "SCHEDULER_POLICY", value_enum)]
    pub policy: Option<BacktrackPolicy>,

    /// Probe budget for the complete search (0 = unbounded)
    #[arg(long, env = "SCHEDULER_STEP_LIMIT", default_value_t = DEFAULT_STEP_LIMIT)]
    pub step_limit: u64,
}

impl SearchArgs {
    pub fn solver_config(&self) -> SolverConfig {
        self.solver_config_or(BacktrackPolicy::CompleteOrFail)
    }

    /// Settings with `policy` used when none was given.
    pub fn solver_config_or(&self, policy: BacktrackPolicy) -> SolverConfig {
        SolverConfig {
            policy: self.policy.unwrap_or(policy),
            step_limit: (self.step_limit > 0).then_some(self.step_limit),
            ..SolverConfig::default()
        }
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "SCHEDULER_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    #[command(flatten)]
    pub search: SearchArgs,
}

#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    /// Number of rooms
    pub rooms: usize,

    /// Number of periods
    #[arg(long, default_value_t = 20)]
    pub periods: u32,

    /// Courses added beyond room capacity
    #[arg(long, default_value_t = 10)]
    pub overflow_courses: usize,

    /// Directory to write the result files into
    #[arg(long, default_value = "output")]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub search: SearchArgs,
}

impl RunArgs {
    /// Generated datasets overflow on purpose, so the exact solver keeps
    /// whatever fits unless asked for the complete search.
    pub fn solver_config(&self) -> SolverConfig {
        self.search.solver_config_or(BacktrackPolicy::BestEffort)
    }

    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            rooms: self.rooms,
            periods: self.periods,
            overflow_courses: self.overflow_courses,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverKind {
    Exact,
    Approx,
}

#[derive(clap::Args, Debug, Clone)]
pub struct SolveArgs {
    /// Dataset JSON file
    #[arg(long, short)]
    pub input: PathBuf,

    /// Which solver to run
    #[arg(long, value_enum, default_value = "exact")]
    pub solver: SolverKind,

    /// Write the result here instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub search: SearchArgs,
}
