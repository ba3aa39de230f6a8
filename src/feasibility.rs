//! The placement rule shared by every solver.
//!
//! A course fits a (room, period) slot when the room supplies the class the
//! course requests and nothing else holds that room during that period.
//! Only the (room, period) pair is exclusive.

use std::collections::HashMap;

use crate::data::{Assignment, Course, CourseId, Period, Room, RoomId};

/// Whether `course` may occupy `room` during `period`, given `schedule`.
///
/// Linear in the length of `schedule`.
pub fn is_feasible(schedule: &[Assignment<'_>], course: &Course, room: &Room, period: Period) -> bool {
    if course.requested_class() != &room.class {
        return false;
    }
    !schedule
        .iter()
        .any(|a| a.period == period && a.room.id == room.id)
}

/// Index of occupied (room, period) slots.
///
/// Kept in step with a schedule so that feasibility is a single lookup.
/// Holds at most one course per key.
#[derive(Debug, Default, Clone)]
pub struct Occupancy {
    slots: HashMap<(RoomId, Period), CourseId>,
}

impl Occupancy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_free(&self, room: &Room, period: Period) -> bool {
        !self.slots.contains_key(&(room.id.clone(), period))
    }

    /// Same answer as [`is_feasible`] over the schedule this index tracks.
    pub fn is_feasible(&self, course: &Course, room: &Room, period: Period) -> bool {
        course.requested_class() == &room.class && self.is_free(room, period)
    }

    /// Records an assignment. Returns false if the slot was already taken.
    pub fn insert(&mut self, assignment: &Assignment<'_>) -> bool {
        let key = (assignment.room.id.clone(), assignment.period);
        if self.slots.contains_key(&key) {
            return false;
        }
        self.slots.insert(key, assignment.course.id.clone());
        true
    }

    pub fn remove(&mut self, assignment: &Assignment<'_>) {
        self.slots
            .remove(&(assignment.room.id.clone(), assignment.period));
    }

    /// Number of occupied slots.
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RoomClass;

    fn fixtures() -> (Vec<Course>, Vec<Room>) {
        let courses = vec![
            Course::new("1001", RoomClass::Small, "T1"),
            Course::new("1002", RoomClass::Small, "T2"),
            Course::new("1003", RoomClass::Large, "T3"),
        ];
        let rooms = vec![
            Room::new("R1", RoomClass::Small),
            Room::new("R2", RoomClass::Small),
            Room::new("R3", RoomClass::Large),
        ];
        (courses, rooms)
    }

    #[test]
    fn class_mismatch_is_infeasible() {
        let (courses, rooms) = fixtures();
        assert!(!is_feasible(&[], &courses[0], &rooms[2], 0));
        assert!(!is_feasible(&[], &courses[2], &rooms[0], 0));
    }

    #[test]
    fn occupied_room_period_is_infeasible() {
        let (courses, rooms) = fixtures();
        let schedule = vec![Assignment {
            course: &courses[0],
            room: &rooms[0],
            period: 0,
        }];
        assert!(!is_feasible(&schedule, &courses[1], &rooms[0], 0));
        // Same room, other period.
        assert!(is_feasible(&schedule, &courses[1], &rooms[0], 1));
        // Same period, other room.
        assert!(is_feasible(&schedule, &courses[1], &rooms[1], 0));
    }

    #[test]
    fn occupancy_agrees_with_linear_scan() {
        let (courses, rooms) = fixtures();
        let schedule = vec![
            Assignment {
                course: &courses[0],
                room: &rooms[0],
                period: 0,
            },
            Assignment {
                course: &courses[2],
                room: &rooms[2],
                period: 1,
            },
        ];
        let mut occupancy = Occupancy::new();
        for assignment in &schedule {
            assert!(occupancy.insert(assignment));
        }
        for course in &courses {
            for room in &rooms {
                for period in 0..3 {
                    assert_eq!(
                        occupancy.is_feasible(course, room, period),
                        is_feasible(&schedule, course, room, period),
                        "{} / {} / {}",
                        course.id,
                        room.id,
                        period
                    );
                }
            }
        }
    }

    #[test]
    fn occupancy_insert_and_remove() {
        let (courses, rooms) = fixtures();
        let first = Assignment {
            course: &courses[0],
            room: &rooms[0],
            period: 0,
        };
        let clash = Assignment {
            course: &courses[1],
            room: &rooms[0],
            period: 0,
        };
        let mut occupancy = Occupancy::new();
        assert!(occupancy.insert(&first));
        assert!(!occupancy.insert(&clash));
        assert!(!occupancy.is_free(&rooms[0], 0));
        assert_eq!(occupancy.len(), 1);

        occupancy.remove(&first);
        assert_eq!(occupancy.len(), 0);
        assert!(occupancy.insert(&clash));
        assert_eq!(occupancy.len(), 1);
    }
}
