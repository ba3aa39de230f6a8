use std::collections::HashMap;

use itertools::Itertools;
use log::{debug, info, trace, warn};

use super::{BacktrackPolicy, Solution, SolverConfig, SolverError, check_preconditions};
use crate::data::{Assignment, Course, Period, Room, RoomClass};
use crate::feasibility::Occupancy;

/// Places every course by backtracking search over (period, room) slots.
///
/// Courses are taken in input order. For each course the slots are tried
/// period-major, room-minor, both in input order, and the first feasible one
/// is committed. Slots whose room is of another class are skipped without a
/// probe, since they can never pass the class check. What happens when a
/// course has no feasible slot depends on `config.policy`:
///
/// - `CompleteOrFail` retracts the previous commitment and resumes that
///   course's scan after the slot it had taken. The result places every
///   course whenever that is possible; otherwise the schedule is empty and
///   every course is unscheduled.
/// - `BestEffort` records the course as unscheduled and moves on.
pub fn solve_exact<'a>(
    courses: &'a [Course],
    rooms: &'a [Room],
    periods: Period,
    config: &SolverConfig,
) -> Result<Solution<'a>, SolverError> {
    check_preconditions(courses, rooms, periods)?;
    info!(
        "Exact solver ({:?}) on {} courses, {} rooms, {} periods",
        config.policy,
        courses.len(),
        rooms.len(),
        periods
    );

    let slots = SlotSpace::new(rooms, periods);
    let solution = match config.policy {
        BacktrackPolicy::CompleteOrFail => complete_or_fail(courses, &slots, config)?,
        BacktrackPolicy::BestEffort => best_effort(courses, &slots),
    };

    trace!("Exact solver made {} probes", solution.probes);
    info!(
        "Exact solver booked {} of {} courses",
        solution.booked(),
        courses.len()
    );
    Ok(solution)
}

/// The (period, room) candidates for each class, in enumeration order.
///
/// Rooms of other classes can never pass the class check, so they are left
/// out of the scan. The relative order of the remaining slots is unchanged.
struct SlotSpace<'a> {
    rooms_by_class: HashMap<&'a RoomClass, Vec<&'a Room>>,
    periods: Period,
}

impl<'a> SlotSpace<'a> {
    fn new(rooms: &'a [Room], periods: Period) -> Self {
        Self {
            rooms_by_class: rooms.iter().map(|r| (&r.class, r)).into_group_map(),
            periods,
        }
    }

    fn rooms_for(&self, class: &RoomClass) -> &[&'a Room] {
        self.rooms_by_class
            .get(class)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of candidate slots for a course of `class`.
    fn len(&self, class: &RoomClass) -> usize {
        self.rooms_for(class).len() * self.periods as usize
    }

    /// The `index`-th candidate slot for `class`.
    fn get(&self, class: &RoomClass, index: usize) -> (Period, &'a Room) {
        let rooms = self.rooms_for(class);
        let period = (index / rooms.len()) as Period;
        (period, rooms[index % rooms.len()])
    }

    /// Whether the room-periods of each class cover the courses requesting it.
    fn has_capacity_for(&self, courses: &[Course]) -> bool {
        courses
            .iter()
            .map(Course::requested_class)
            .counts()
            .into_iter()
            .all(|(class, wanted)| wanted <= self.len(class))
    }
}

fn complete_or_fail<'a>(
    courses: &'a [Course],
    slots: &SlotSpace<'a>,
    config: &SolverConfig,
) -> Result<Solution<'a>, SolverError> {
    if config.capacity_precheck && !slots.has_capacity_for(courses) {
        warn!("Some room class is oversubscribed; no complete schedule exists");
        return Ok(Solution::failed(courses, 0));
    }

    let mut schedule: Vec<Assignment<'a>> = Vec::with_capacity(courses.len());
    let mut occupancy = Occupancy::new();
    // next_slot[d] is where the scan for course d resumes.
    // Invariant: next_slot.len() == schedule.len() + 1.
    let mut next_slot: Vec<usize> = vec![0];
    let mut probes: u64 = 0;

    while schedule.len() < courses.len() {
        let depth = schedule.len();
        let course = &courses[depth];
        let class = course.requested_class();

        let mut placed = None;
        for index in next_slot[depth]..slots.len(class) {
            probes += 1;
            if let Some(limit) = config.step_limit {
                if probes > limit {
                    warn!("Exact solver gave up after {} probes", limit);
                    return Err(SolverError::StepLimitExceeded { limit });
                }
            }
            let (period, room) = slots.get(class, index);
            if occupancy.is_feasible(course, room, period) {
                placed = Some((index, period, room));
                break;
            }
        }

        match placed {
            Some((index, period, room)) => {
                let assignment = Assignment {
                    course,
                    room,
                    period,
                };
                debug!("Commit {}", assignment);
                let fresh = occupancy.insert(&assignment);
                debug_assert!(fresh, "slot probed free but already occupied");
                schedule.push(assignment);
                debug_assert_eq!(occupancy.len(), schedule.len());
                next_slot[depth] = index + 1;
                next_slot.push(0);
            }
            None => {
                next_slot.pop();
                match schedule.pop() {
                    Some(retracted) => {
                        debug!("Retract {}", retracted);
                        occupancy.remove(&retracted);
                        debug_assert_eq!(occupancy.len(), schedule.len());
                    }
                    None => {
                        warn!(
                            "No complete schedule exists for {} courses",
                            courses.len()
                        );
                        return Ok(Solution::failed(courses, probes));
                    }
                }
            }
        }
    }

    Ok(Solution {
        schedule,
        unscheduled: Vec::new(),
        probes,
    })
}

fn best_effort<'a>(courses: &'a [Course], slots: &SlotSpace<'a>) -> Solution<'a> {
    let mut schedule: Vec<Assignment<'a>> = Vec::with_capacity(courses.len());
    let mut unscheduled = Vec::new();
    let mut occupancy = Occupancy::new();
    let mut probes: u64 = 0;

    for course in courses {
        let class = course.requested_class();
        let found = (0..slots.len(class))
            .map(|index| slots.get(class, index))
            .find(|(period, room)| {
                probes += 1;
                occupancy.is_feasible(course, room, *period)
            });

        match found {
            Some((period, room)) => {
                let assignment = Assignment {
                    course,
                    room,
                    period,
                };
                debug!("Commit {}", assignment);
                let fresh = occupancy.insert(&assignment);
                debug_assert!(fresh, "slot probed free but already occupied");
                schedule.push(assignment);
            }
            None => {
                warn!("No available {} room for course {}", class, course.id);
                unscheduled.push(course);
            }
        }
    }

    Solution {
        schedule,
        unscheduled,
        probes,
    }
}
