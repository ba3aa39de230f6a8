//! Course-to-room scheduling engine.
//!
//! Courses request a room class; rooms supply one. A course may only sit in
//! a room of its class, and a room holds at most one course per period.
//! [`solver::solve_exact`] searches for a placement of every course;
//! [`solver::solve_approx`] makes a single greedy pass. Both return a
//! [`solver::Solution`] that [`result::to_result`] renders for output.

pub mod config;
pub mod data;
pub mod feasibility;
pub mod generator;
pub mod result;
pub mod server;
pub mod solver;

pub use data::{Assignment, Course, Dataset, Period, Room, RoomClass};
pub use result::{ScheduleResult, to_result};
pub use solver::{BacktrackPolicy, Solution, SolverConfig, SolverError, solve_approx, solve_exact};
