//! Solver-independent view of a run, shaped for the output document.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize, Serializer};

use crate::data::{Assignment, Course, CourseId, Dataset, Period, RoomClass, RoomId, TeacherId};
use crate::solver::Solution;

/// Text written in place of fields that do not apply to unscheduled courses.
pub const NOT_APPLICABLE: &str = "N/A";

/// A value, or the explicit not-applicable marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marked<T> {
    At(T),
    NotApplicable,
}

impl<T> Marked<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Marked::At(value) => Some(value),
            Marked::NotApplicable => None,
        }
    }
}

impl<T: Serialize> Serialize for Marked<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Marked::At(value) => value.serialize(serializer),
            Marked::NotApplicable => serializer.serialize_str(NOT_APPLICABLE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    Booked,
    #[serde(rename = "Not available room")]
    NotAvailableRoom,
}

/// One line of the output document. Exactly one per input course.
///
/// When read back, `Status` decides whether the slot fields hold values or
/// the not-applicable marker, so a room literally named "N/A" survives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRecord")]
pub struct AssignmentRecord {
    #[serde(rename = "Course")]
    pub course: CourseId,
    #[serde(rename = "Period")]
    pub period: Marked<Period>,
    #[serde(rename = "Room")]
    pub room: Marked<RoomId>,
    #[serde(rename = "RequestedRoomSize")]
    pub requested_room_size: RoomClass,
    #[serde(rename = "AssignedRoomSize")]
    pub assigned_room_size: Marked<RoomClass>,
    #[serde(rename = "Teacher")]
    pub teacher: TeacherId,
    #[serde(rename = "Status")]
    pub status: BookingStatus,
}

#[derive(Deserialize)]
struct RawRecord {
    #[serde(rename = "Course")]
    course: CourseId,
    #[serde(rename = "Period")]
    period: serde_json::Value,
    #[serde(rename = "Room")]
    room: String,
    #[serde(rename = "RequestedRoomSize")]
    requested_room_size: RoomClass,
    #[serde(rename = "AssignedRoomSize")]
    assigned_room_size: RoomClass,
    #[serde(rename = "Teacher")]
    teacher: TeacherId,
    #[serde(rename = "Status")]
    status: BookingStatus,
}

impl TryFrom<RawRecord> for AssignmentRecord {
    type Error = String;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        let (period, room, assigned_room_size) = match raw.status {
            BookingStatus::Booked => {
                let Some(period) = raw.period.as_u64().and_then(|p| Period::try_from(p).ok())
                else {
                    return Err(format!("booked course {} has no period index", raw.course));
                };
                (
                    Marked::At(period),
                    Marked::At(raw.room),
                    Marked::At(raw.assigned_room_size),
                )
            }
            BookingStatus::NotAvailableRoom => (
                Marked::NotApplicable,
                Marked::NotApplicable,
                Marked::NotApplicable,
            ),
        };
        Ok(Self {
            course: raw.course,
            period,
            room,
            requested_room_size: raw.requested_room_size,
            assigned_room_size,
            teacher: raw.teacher,
            status: raw.status,
        })
    }
}

impl AssignmentRecord {
    pub fn booked(assignment: &Assignment<'_>) -> Self {
        Self {
            course: assignment.course.id.clone(),
            period: Marked::At(assignment.period),
            room: Marked::At(assignment.room.id.clone()),
            requested_room_size: assignment.course.requested_class().clone(),
            assigned_room_size: Marked::At(assignment.room.class.clone()),
            teacher: assignment.course.teacher.clone(),
            status: BookingStatus::Booked,
        }
    }

    pub fn unscheduled(course: &Course) -> Self {
        Self {
            course: course.id.clone(),
            period: Marked::NotApplicable,
            room: Marked::NotApplicable,
            requested_room_size: course.requested_class().clone(),
            assigned_room_size: Marked::NotApplicable,
            teacher: course.teacher.clone(),
            status: BookingStatus::NotAvailableRoom,
        }
    }
}

/// The final output of a solver run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleResult {
    #[serde(rename = "Assignments")]
    pub assignments: Vec<AssignmentRecord>,
    #[serde(rename = "TotalCoursesBooked")]
    pub total_courses_booked: usize,
    #[serde(rename = "TotalCoursesUnscheduled")]
    pub total_courses_unscheduled: usize,
}

/// Renders booked records first, in commit order, then unscheduled ones.
pub fn to_result(schedule: &[Assignment<'_>], unscheduled: &[&Course]) -> ScheduleResult {
    let assignments = schedule
        .iter()
        .map(AssignmentRecord::booked)
        .chain(unscheduled.iter().map(|c| AssignmentRecord::unscheduled(c)))
        .collect();
    ScheduleResult {
        assignments,
        total_courses_booked: schedule.len(),
        total_courses_unscheduled: unscheduled.len(),
    }
}

impl From<&Solution<'_>> for ScheduleResult {
    fn from(solution: &Solution<'_>) -> Self {
        to_result(&solution.schedule, &solution.unscheduled)
    }
}

impl ScheduleResult {
    pub fn booked(&self) -> impl Iterator<Item = &AssignmentRecord> {
        self.assignments
            .iter()
            .filter(|r| r.status == BookingStatus::Booked)
    }

    /// Lists every way this result breaks the scheduling invariants for
    /// `dataset`. Empty when the result is sound.
    pub fn validate(&self, dataset: &Dataset) -> Vec<String> {
        let mut violations = Vec::new();

        let mut seen: HashMap<&str, usize> = HashMap::new();
        for record in &self.assignments {
            *seen.entry(record.course.as_str()).or_default() += 1;
        }
        for course in &dataset.courses {
            match seen.remove(course.id.as_str()) {
                None => violations.push(format!("course {} is missing", course.id)),
                Some(1) => {}
                Some(n) => violations.push(format!("course {} appears {} times", course.id, n)),
            }
        }
        for course in seen.keys() {
            violations.push(format!("course {} is not in the dataset", course));
        }

        let booked = self.booked().count();
        if booked != self.total_courses_booked {
            violations.push(format!(
                "TotalCoursesBooked is {} but {} records are booked",
                self.total_courses_booked, booked
            ));
        }
        let unscheduled = self.assignments.len() - booked;
        if unscheduled != self.total_courses_unscheduled {
            violations.push(format!(
                "TotalCoursesUnscheduled is {} but {} records are unscheduled",
                self.total_courses_unscheduled, unscheduled
            ));
        }

        let room_classes: HashMap<&str, &RoomClass> = dataset
            .rooms
            .iter()
            .map(|r| (r.id.as_str(), &r.class))
            .collect();
        let mut occupied: HashSet<(&str, Period)> = HashSet::new();
        for record in self.booked() {
            let (Some(room), Some(period)) = (record.room.value(), record.period.value()) else {
                violations.push(format!("course {} is booked without a slot", record.course));
                continue;
            };
            match room_classes.get(room.as_str()) {
                None => violations.push(format!("course {} booked in unknown room {}", record.course, room)),
                Some(class) if **class != record.requested_room_size => violations.push(format!(
                    "course {} requests {} but room {} is {}",
                    record.course, record.requested_room_size, room, class
                )),
                Some(_) => {}
            }
            if record.assigned_room_size.value() != Some(&record.requested_room_size) {
                violations.push(format!(
                    "course {} has mismatched requested and assigned sizes",
                    record.course
                ));
            }
            if !occupied.insert((room.as_str(), *period)) {
                violations.push(format!("room {} is double-booked in period {}", room, period));
            }
        }

        violations
    }
}
