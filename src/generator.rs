//! Dataset generator.
//!
//! Builds datasets that exactly saturate room capacity, optionally followed
//! by overflow courses that cannot all be placed.

use crate::data::{Course, Dataset, Room, RoomClass};

/// Configuration for generating datasets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Number of rooms. Classes cycle Small, Medium, Large.
    pub rooms: usize,
    /// Number of periods.
    pub periods: u32,
    /// Extra `Medium` courses added after the saturating ones.
    pub overflow_courses: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            rooms: 10,
            periods: 20,
            overflow_courses: 10,
        }
    }
}

/// Generates a dataset.
///
/// Rooms are `R1..Rn`. For each class in order, one course per
/// (room of that class, period) pair requests it, then `overflow_courses`
/// courses request `Medium`. Course `n` has id `100{n}` and teacher `T{n}`.
pub fn generate_dataset(config: &GeneratorConfig) -> Dataset {
    let classes = RoomClass::STANDARD;
    let rooms: Vec<Room> = (0..config.rooms)
        .map(|i| Room::new(format!("R{}", i + 1), classes[i % classes.len()].clone()))
        .collect();

    let mut courses = Vec::new();
    let mut next_id = 1;
    let mut push_course = |class: &RoomClass| {
        courses.push(Course::new(
            format!("100{}", next_id),
            class.clone(),
            format!("T{}", next_id),
        ));
        next_id += 1;
    };

    for class in &classes {
        let rooms_of_class = rooms.iter().filter(|r| &r.class == class).count();
        for _ in 0..rooms_of_class * config.periods as usize {
            push_course(class);
        }
    }
    for _ in 0..config.overflow_courses {
        push_course(&RoomClass::Medium);
    }

    let teachers = (1..=courses.len()).map(|n| format!("T{}", n)).collect();
    Dataset {
        courses,
        periods: i64::from(config.periods),
        rooms,
        teachers,
    }
}
