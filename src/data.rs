use serde::{Deserialize, Serialize};
use std::fmt;

use crate::solver::SolverError;

// Type aliases for clarity
pub type RoomId = String;
pub type CourseId = String;
pub type TeacherId = String;
pub type Period = u32;

/// Capacity class a course requests and a room supplies.
///
/// The three well-known classes get their own variants; any other label is
/// carried verbatim in `Other`. Serialized as the bare label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum RoomClass {
    Small,
    Medium,
    Large,
    Other(String),
}

impl RoomClass {
    pub const STANDARD: [RoomClass; 3] = [RoomClass::Small, RoomClass::Medium, RoomClass::Large];

    pub fn label(&self) -> &str {
        match self {
            RoomClass::Small => "Small",
            RoomClass::Medium => "Medium",
            RoomClass::Large => "Large",
            RoomClass::Other(label) => label,
        }
    }
}

impl From<String> for RoomClass {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Small" => RoomClass::Small,
            "Medium" => RoomClass::Medium,
            "Large" => RoomClass::Large,
            _ => RoomClass::Other(label),
        }
    }
}

impl From<&str> for RoomClass {
    fn from(label: &str) -> Self {
        RoomClass::from(label.to_string())
    }
}

impl From<RoomClass> for String {
    fn from(class: RoomClass) -> Self {
        match class {
            RoomClass::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for RoomClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A room with a fixed capacity class, reusable across periods.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Room {
    #[serde(rename = "Room")]
    pub id: RoomId,
    #[serde(rename = "Type")]
    pub class: RoomClass,
}

impl Room {
    pub fn new(id: impl Into<RoomId>, class: impl Into<RoomClass>) -> Self {
        Self {
            id: id.into(),
            class: class.into(),
        }
    }
}

/// The room a course asks for.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RoomsRequested {
    #[serde(rename = "Type")]
    pub class: RoomClass,
}

/// A course to be placed in one room for one period.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Course {
    #[serde(rename = "Course")]
    pub id: CourseId,
    #[serde(rename = "RoomsRequested")]
    pub rooms_requested: RoomsRequested,
    #[serde(rename = "Teacher")]
    pub teacher: TeacherId,
}

impl Course {
    pub fn new(
        id: impl Into<CourseId>,
        class: impl Into<RoomClass>,
        teacher: impl Into<TeacherId>,
    ) -> Self {
        Self {
            id: id.into(),
            rooms_requested: RoomsRequested {
                class: class.into(),
            },
            teacher: teacher.into(),
        }
    }

    pub fn requested_class(&self) -> &RoomClass {
        &self.rooms_requested.class
    }
}

/// The complete input for one scheduling run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Dataset {
    #[serde(rename = "Courses")]
    pub courses: Vec<Course>,
    #[serde(rename = "Periods")]
    pub periods: i64,
    #[serde(rename = "Rooms")]
    pub rooms: Vec<Room>,
    /// Informational only; solvers read teachers from each course.
    #[serde(rename = "Teachers", default)]
    pub teachers: Vec<TeacherId>,
}

impl Dataset {
    /// Number of periods as a solver argument. Rejects negative counts.
    pub fn period_count(&self) -> Result<Period, SolverError> {
        if self.periods < 0 {
            return Err(SolverError::NegativePeriods(self.periods));
        }
        Period::try_from(self.periods).map_err(|_| SolverError::TooManyPeriods(self.periods))
    }
}

/// A committed placement of a course in a room during a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment<'a> {
    pub course: &'a Course,
    pub room: &'a Room,
    pub period: Period,
}

impl fmt::Display for Assignment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "course {} -> room {} ({}) @ period {}",
            self.course.id, self.room.id, self.room.class, self.period
        )
    }
}
