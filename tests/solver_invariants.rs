use std::collections::HashSet;

use clap::Parser;
use room_scheduler::config::{Cli, Command};
use room_scheduler::generator::{GeneratorConfig, generate_dataset};
use room_scheduler::result::BookingStatus;
use room_scheduler::{
    Course, Dataset, Room, RoomClass, ScheduleResult, SolverConfig, Solution, solve_approx,
    solve_exact, to_result,
};

fn assert_sound(dataset: &Dataset, solution: &Solution<'_>) {
    assert_eq!(
        solution.schedule.len() + solution.unscheduled.len(),
        dataset.courses.len()
    );
    let mut ids = HashSet::new();
    for id in solution
        .schedule
        .iter()
        .map(|a| &a.course.id)
        .chain(solution.unscheduled.iter().map(|c| &c.id))
    {
        assert!(ids.insert(id), "course {} listed twice", id);
    }
    let result = ScheduleResult::from(solution);
    assert_eq!(result.validate(dataset), Vec::<String>::new());
}

fn dataset(courses: Vec<Course>, rooms: Vec<Room>, periods: i64) -> Dataset {
    Dataset {
        courses,
        periods,
        rooms,
        teachers: vec![],
    }
}

#[test]
fn generated_datasets_keep_invariants_for_every_solver() {
    for (rooms, periods, overflow) in [(3, 2, 0), (5, 4, 3), (10, 20, 10), (7, 1, 5)] {
        let dataset = generate_dataset(&GeneratorConfig {
            rooms,
            periods,
            overflow_courses: overflow,
        });

        let exact = dataset.solve_exact(&SolverConfig::default()).unwrap();
        assert_sound(&dataset, &exact);
        let best = dataset.solve_exact(&SolverConfig::best_effort()).unwrap();
        assert_sound(&dataset, &best);
        let approx = dataset.solve_approx().unwrap();
        assert_sound(&dataset, &approx);

        if overflow == 0 {
            assert!(exact.complete());
            assert!(approx.complete());
        } else {
            // Overflow courses exceed Medium capacity.
            assert!(!exact.complete());
            assert!(exact.schedule.is_empty());
            assert_eq!(best.unscheduled.len(), overflow);
            assert_eq!(approx.unscheduled.len(), overflow);
        }
    }
}

#[test]
fn run_command_defaults_book_everything_that_fits() {
    let cli = Cli::try_parse_from(["room_scheduler", "run", "10"]).unwrap();
    let Command::Run(args) = cli.command else {
        panic!("expected run command");
    };
    let data = generate_dataset(&args.generator_config());
    let exact = data.solve_exact(&args.solver_config()).unwrap();
    assert_eq!(data.courses.len(), 210);
    assert_eq!(exact.booked(), 200);
    assert_eq!(exact.unscheduled.len(), 10);
}

#[test]
fn one_room_per_course_with_enough_periods_places_everyone() {
    let n = 6;
    let courses: Vec<Course> = (0..n)
        .map(|i| Course::new(format!("C{i}"), RoomClass::STANDARD[i % 3].clone(), "T1"))
        .collect();
    let rooms: Vec<Room> = (0..n)
        .map(|i| Room::new(format!("R{i}"), RoomClass::STANDARD[i % 3].clone()))
        .collect();
    let solution = solve_exact(&courses, &rooms, n as u32, &SolverConfig::default()).unwrap();
    assert_eq!(solution.schedule.len(), n);
    assert!(solution.unscheduled.is_empty());
}

#[test]
fn exact_places_two_small_and_one_medium() {
    let data = dataset(
        vec![
            Course::new("1001", RoomClass::Small, "T1"),
            Course::new("1002", RoomClass::Small, "T2"),
            Course::new("1003", RoomClass::Medium, "T3"),
        ],
        vec![
            Room::new("R1", RoomClass::Small),
            Room::new("R2", RoomClass::Medium),
        ],
        2,
    );
    let solution = data.solve_exact(&SolverConfig::default()).unwrap();
    let result = to_result(&solution.schedule, &solution.unscheduled);

    assert_eq!(result.total_courses_booked, 3);
    assert_eq!(result.total_courses_unscheduled, 0);
    let placed: Vec<(String, String, u32)> = result
        .booked()
        .map(|r| {
            (
                r.course.clone(),
                r.room.value().cloned().unwrap(),
                *r.period.value().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        placed,
        vec![
            ("1001".to_string(), "R1".to_string(), 0),
            ("1002".to_string(), "R1".to_string(), 1),
            ("1003".to_string(), "R2".to_string(), 0),
        ]
    );
}

#[test]
fn greedy_and_best_effort_book_one_of_two_competing_courses() {
    let data = dataset(
        vec![
            Course::new("1001", RoomClass::Small, "T1"),
            Course::new("1002", RoomClass::Small, "T2"),
        ],
        vec![Room::new("R1", RoomClass::Small)],
        1,
    );
    for solution in [
        data.solve_approx().unwrap(),
        data.solve_exact(&SolverConfig::best_effort()).unwrap(),
    ] {
        let result = ScheduleResult::from(&solution);
        assert_eq!(result.total_courses_booked, 1);
        assert_eq!(result.total_courses_unscheduled, 1);
        assert_eq!(result.assignments[1].course, "1002");
        assert_eq!(result.assignments[1].status, BookingStatus::NotAvailableRoom);
    }
}

#[test]
fn greedy_is_deterministic_on_generated_input() {
    let data = generate_dataset(&GeneratorConfig::default());
    let first = ScheduleResult::from(&data.solve_approx().unwrap());
    let second = ScheduleResult::from(&data.solve_approx().unwrap());
    assert_eq!(first, second);
}

#[test]
fn unknown_class_is_unscheduled_by_greedy() {
    let data = dataset(
        vec![
            Course::new("1001", "Lab", "T1"),
            Course::new("1002", RoomClass::Large, "T2"),
        ],
        vec![Room::new("R1", RoomClass::Large)],
        2,
    );
    let solution = solve_approx(&data.courses, &data.rooms, 2).unwrap();
    assert_sound(&data, &solution);
    assert_eq!(solution.unscheduled.len(), 1);
    assert_eq!(solution.unscheduled[0].id, "1001");
}

#[test]
fn solvers_run_concurrently_on_shared_input() {
    let data = generate_dataset(&GeneratorConfig {
        rooms: 6,
        periods: 5,
        overflow_courses: 2,
    });
    let (exact, approx) = std::thread::scope(|s| {
        let exact = s.spawn(|| data.solve_exact(&SolverConfig::best_effort()).unwrap());
        let approx = s.spawn(|| data.solve_approx().unwrap());
        (exact.join().unwrap(), approx.join().unwrap())
    });
    assert_sound(&data, &exact);
    assert_sound(&data, &approx);
}
