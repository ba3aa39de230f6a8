//! Assignment engine: configuration, preconditions and the solution type
//! shared by the exact and greedy solvers.

mod exact;
mod greedy;

pub use exact::solve_exact;
pub use greedy::solve_approx;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::{Assignment, Course, CourseId, Dataset, Period, Room, RoomId};

/// Errors that stop a solver before it produces a solution.
///
/// An unschedulable course is not an error; it lands in
/// [`Solution::unscheduled`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    #[error("Period count must not be negative (got {0})")]
    NegativePeriods(i64),
    #[error("Period count {0} is out of range")]
    TooManyPeriods(i64),
    #[error("{courses} courses given but the period count is zero")]
    NoPeriods { courses: usize },
    #[error("{courses} courses given but the room list is empty")]
    NoRooms { courses: usize },
    #[error("Duplicate course id: {0}")]
    DuplicateCourse(CourseId),
    #[error("Duplicate room id: {0}")]
    DuplicateRoom(RoomId),
    #[error("Search aborted after {limit} probes without a result")]
    StepLimitExceeded { limit: u64 },
}

impl SolverError {
    /// True for errors caused by the caller's input rather than the search.
    pub fn is_precondition(&self) -> bool {
        !matches!(self, SolverError::StepLimitExceeded { .. })
    }
}

/// Which backtracking behavior `solve_exact` uses.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum BacktrackPolicy {
    /// Full search with retraction. Either every course is placed or none is.
    #[default]
    #[serde(alias = "complete")]
    #[value(name = "complete")]
    CompleteOrFail,
    /// First feasible slot per course, never undone. Courses with no slot
    /// left are reported unscheduled.
    BestEffort,
}

/// Per-invocation solver settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    pub policy: BacktrackPolicy,
    /// Maximum number of (period, room) probes the complete search may make.
    pub step_limit: Option<u64>,
    /// Fail the complete search up front when some class has more courses
    /// than room-periods. Never changes which schedule is found.
    pub capacity_precheck: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            policy: BacktrackPolicy::CompleteOrFail,
            step_limit: None,
            capacity_precheck: true,
        }
    }
}

impl SolverConfig {
    pub fn best_effort() -> Self {
        Self {
            policy: BacktrackPolicy::BestEffort,
            ..Self::default()
        }
    }

    pub fn with_step_limit(mut self, limit: u64) -> Self {
        self.step_limit = Some(limit);
        self
    }
}

/// Output of one solver run: placed courses in commit order plus the
/// courses that could not be placed, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution<'a> {
    pub schedule: Vec<Assignment<'a>>,
    pub unscheduled: Vec<&'a Course>,
    /// Slots examined during the run. The exact solver only counts slots
    /// whose room matches the course's class; the greedy solver counts queue
    /// pops. Not comparable to the full period × room enumeration.
    pub probes: u64,
}

impl<'a> Solution<'a> {
    /// Every course was placed.
    pub fn complete(&self) -> bool {
        self.unscheduled.is_empty()
    }

    pub fn booked(&self) -> usize {
        self.schedule.len()
    }

    /// The outcome of a complete-or-fail search that found nothing.
    fn failed(courses: &'a [Course], probes: u64) -> Self {
        Self {
            schedule: Vec::new(),
            unscheduled: courses.iter().collect(),
            probes,
        }
    }
}

/// Rejects inputs for which no search makes sense.
pub fn check_preconditions(
    courses: &[Course],
    rooms: &[Room],
    periods: Period,
) -> Result<(), SolverError> {
    if !courses.is_empty() {
        if periods == 0 {
            return Err(SolverError::NoPeriods {
                courses: courses.len(),
            });
        }
        if rooms.is_empty() {
            return Err(SolverError::NoRooms {
                courses: courses.len(),
            });
        }
    }
    if let Some(id) = courses.iter().map(|c| &c.id).duplicates().next() {
        return Err(SolverError::DuplicateCourse(id.clone()));
    }
    if let Some(id) = rooms.iter().map(|r| &r.id).duplicates().next() {
        return Err(SolverError::DuplicateRoom(id.clone()));
    }
    Ok(())
}

impl Dataset {
    pub fn solve_exact(&self, config: &SolverConfig) -> Result<Solution<'_>, SolverError> {
        solve_exact(&self.courses, &self.rooms, self.period_count()?, config)
    }

    pub fn solve_approx(&self) -> Result<Solution<'_>, SolverError> {
        solve_approx(&self.courses, &self.rooms, self.period_count()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RoomClass;

    #[test]
    fn zero_periods_with_courses_is_rejected() {
        let courses = vec![Course::new("1001", RoomClass::Small, "T1")];
        let rooms = vec![Room::new("R1", RoomClass::Small)];
        assert_eq!(
            check_preconditions(&courses, &rooms, 0),
            Err(SolverError::NoPeriods { courses: 1 })
        );
    }

    #[test]
    fn empty_rooms_with_courses_is_rejected() {
        let courses = vec![Course::new("1001", RoomClass::Small, "T1")];
        assert_eq!(
            check_preconditions(&courses, &[], 3),
            Err(SolverError::NoRooms { courses: 1 })
        );
    }

    #[test]
    fn empty_input_is_accepted() {
        assert_eq!(check_preconditions(&[], &[], 0), Ok(()));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let courses = vec![
            Course::new("1001", RoomClass::Small, "T1"),
            Course::new("1001", RoomClass::Medium, "T2"),
        ];
        let rooms = vec![
            Room::new("R1", RoomClass::Small),
            Room::new("R1", RoomClass::Medium),
        ];
        assert_eq!(
            check_preconditions(&courses, &rooms[..1], 1),
            Err(SolverError::DuplicateCourse("1001".to_string()))
        );
        assert_eq!(
            check_preconditions(&courses[..1], &rooms, 1),
            Err(SolverError::DuplicateRoom("R1".to_string()))
        );
    }

    #[test]
    fn step_limit_is_not_a_precondition() {
        assert!(!SolverError::StepLimitExceeded { limit: 1 }.is_precondition());
        assert!(SolverError::NegativePeriods(-1).is_precondition());
    }

    #[test]
    fn policy_parses_from_kebab_case() {
        let policy: BacktrackPolicy = serde_json::from_str(r#""best-effort""#).unwrap();
        assert_eq!(policy, BacktrackPolicy::BestEffort);
        let policy: BacktrackPolicy = serde_json::from_str(r#""complete-or-fail""#).unwrap();
        assert_eq!(policy, BacktrackPolicy::CompleteOrFail);
    }
}
