use std::collections::{HashMap, VecDeque};

use itertools::Itertools;
use log::{debug, info, trace, warn};

use super::{Solution, SolverError, check_preconditions};
use crate::data::{Assignment, Course, Period, Room, RoomClass};

/// Queue of rooms of one class still free in the earliest period that has any.
///
/// Courses always take the earliest period with a free room, so the queues of
/// later periods stay full until every earlier one is drained. Only the
/// frontier period's queue is held; the next one is filled when it empties.
struct ClassQueue<'a> {
    rooms: Vec<&'a Room>,
    period: Period,
    free: VecDeque<&'a Room>,
}

impl<'a> ClassQueue<'a> {
    fn new(rooms: Vec<&'a Room>) -> Self {
        let free = rooms.iter().copied().collect();
        Self {
            rooms,
            period: 0,
            free,
        }
    }

    /// Pops the front room of the earliest non-empty (period, class) queue.
    fn take(&mut self, periods: Period, probes: &mut u64) -> Option<(Period, &'a Room)> {
        loop {
            *probes += 1;
            if let Some(room) = self.free.pop_front() {
                return Some((self.period, room));
            }
            if self.rooms.is_empty() || self.period + 1 >= periods {
                return None;
            }
            self.period += 1;
            self.free.extend(self.rooms.iter().copied());
        }
    }
}

/// Single-pass placement without backtracking.
///
/// Every (period, class) pair has its own queue of rooms, full at the start
/// of the run. Each course, in input order, takes the front room of the
/// first period whose queue for its class is non-empty. A room taken for a
/// period stays taken for the rest of the run; a course that finds every
/// queue for its class empty is unscheduled.
///
/// Setup and per-course work do not depend on the period count.
pub fn solve_approx<'a>(
    courses: &'a [Course],
    rooms: &'a [Room],
    periods: Period,
) -> Result<Solution<'a>, SolverError> {
    check_preconditions(courses, rooms, periods)?;
    info!(
        "Greedy solver on {} courses, {} rooms, {} periods",
        courses.len(),
        rooms.len(),
        periods
    );

    let mut queues: HashMap<&RoomClass, ClassQueue<'a>> = rooms
        .iter()
        .map(|r| (&r.class, r))
        .into_group_map()
        .into_iter()
        .map(|(class, rooms)| (class, ClassQueue::new(rooms)))
        .collect();

    let mut schedule = Vec::with_capacity(courses.len());
    let mut unscheduled = Vec::new();
    let mut probes: u64 = 0;

    for course in courses {
        let class = course.requested_class();
        let slot = queues
            .get_mut(class)
            .and_then(|queue| queue.take(periods, &mut probes));

        match slot {
            Some((period, room)) => {
                let assignment = Assignment {
                    course,
                    room,
                    period,
                };
                debug!("Commit {}", assignment);
                schedule.push(assignment);
            }
            None => {
                warn!("No available {} room for course {}", class, course.id);
                unscheduled.push(course);
            }
        }
    }

    trace!("Greedy solver made {} probes", probes);
    info!(
        "Greedy solver booked {} of {} courses",
        schedule.len(),
        courses.len()
    );
    Ok(Solution {
        schedule,
        unscheduled,
        probes,
    })
}
