use chrono::{NaiveDate, NaiveDateTime};
use schedule_audit::{Project, Relationship, RelationshipType, Schedule, Task};
use std::collections::HashSet;

fn dt(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn task(id: &str, start: Option<NaiveDateTime>, hours: f64) -> Task {
    let mut task = Task::new(id, "p1", id, id);
    task.target_start = start;
    task.target_duration_hours = hours;
    task
}

fn base_schedule() -> Schedule {
    let mut schedule = Schedule::new();
    schedule.projects.push(Project::new("p1", "P1", "Project"));
    schedule
}

#[test]
fn fs_chain_computes_expected_dates_and_zero_float() {
    let mut schedule = base_schedule();
    schedule
        .tasks
        .push(task("t1", Some(dt(2024, 1, 15, 8)), 80.0));
    schedule
        .tasks
        .push(task("t2", Some(dt(2024, 1, 15, 8)), 80.0));
    schedule.relationships.push(Relationship::new(
        "t2",
        "t1",
        RelationshipType::FinishToStart,
        0.0,
    ));

    schedule.recalculate();

    let t1 = schedule.task_by_id("t1").unwrap();
    let t2 = schedule.task_by_id("t2").unwrap();
    assert_eq!(t1.early_start, Some(dt(2024, 1, 15, 8)));
    assert_eq!(t1.early_end, Some(dt(2024, 1, 18, 16)));
    assert_eq!(t2.early_start, Some(dt(2024, 1, 18, 16)));
    assert_eq!(t2.early_end, Some(dt(2024, 1, 22, 0)));
    assert_eq!(t1.late_start, Some(dt(2024, 1, 15, 8)));
    assert_eq!(t2.late_end, Some(dt(2024, 1, 22, 0)));
    assert_eq!(t1.total_float_hours, Some(0.0));
    assert_eq!(t2.total_float_hours, Some(0.0));
    assert!(t1.is_critical() && t2.is_critical());
}

#[test]
fn lag_shifts_successor_by_whole_days() {
    let mut schedule = base_schedule();
    schedule.tasks.push(task("a", Some(dt(2024, 3, 4, 8)), 8.0));
    schedule.tasks.push(task("b", None, 8.0));
    schedule.relationships.push(Relationship::new(
        "b",
        "a",
        RelationshipType::FinishToStart,
        2.0,
    ));

    schedule.recalculate();

    // a finishes Mar 4 16:00; two days of lag push b to Mar 6 16:00.
    let b = schedule.task_by_id("b").unwrap();
    assert_eq!(b.early_start, Some(dt(2024, 3, 6, 16)));
}

#[test]
fn negative_lag_pulls_successor_earlier() {
    let mut schedule = base_schedule();
    schedule.tasks.push(task("a", Some(dt(2024, 3, 4, 8)), 16.0));
    schedule.tasks.push(task("b", None, 8.0));
    schedule.relationships.push(Relationship::new(
        "b",
        "a",
        RelationshipType::FinishToStart,
        -1.0,
    ));

    schedule.recalculate();

    // a finishes Mar 5 00:00; one day of lead brings b back to Mar 4 00:00.
    let b = schedule.task_by_id("b").unwrap();
    assert_eq!(b.early_start, Some(dt(2024, 3, 4, 0)));
}

#[test]
fn ss_edge_aligns_starts() {
    let mut schedule = base_schedule();
    schedule.tasks.push(task("a", Some(dt(2024, 3, 4, 8)), 16.0));
    schedule.tasks.push(task("b", None, 8.0));
    schedule.relationships.push(Relationship::new(
        "b",
        "a",
        RelationshipType::StartToStart,
        0.0,
    ));

    schedule.recalculate();
    assert_eq!(
        schedule.task_by_id("b").unwrap().early_start,
        Some(dt(2024, 3, 4, 8))
    );
}

#[test]
fn ff_edge_aligns_finishes() {
    let mut schedule = base_schedule();
    schedule.tasks.push(task("a", Some(dt(2024, 3, 4, 8)), 16.0));
    schedule.tasks.push(task("b", None, 8.0));
    schedule.relationships.push(Relationship::new(
        "b",
        "a",
        RelationshipType::FinishToFinish,
        0.0,
    ));

    schedule.recalculate();

    // a finishes Mar 5 00:00, so b may start no earlier than 8h before that.
    let b = schedule.task_by_id("b").unwrap();
    assert_eq!(b.early_start, Some(dt(2024, 3, 4, 16)));
    assert_eq!(b.early_end, Some(dt(2024, 3, 5, 0)));
}

#[test]
fn sf_edge_ties_finish_to_predecessor_start() {
    let mut schedule = base_schedule();
    schedule.tasks.push(task("a", Some(dt(2024, 3, 4, 8)), 16.0));
    schedule.tasks.push(task("b", None, 8.0));
    schedule.relationships.push(Relationship::new(
        "b",
        "a",
        RelationshipType::StartToFinish,
        0.0,
    ));

    schedule.recalculate();

    let b = schedule.task_by_id("b").unwrap();
    assert_eq!(b.early_start, Some(dt(2024, 3, 4, 0)));
    assert_eq!(b.early_end, Some(dt(2024, 3, 4, 8)));
}

#[test]
fn parallel_branch_with_slack_gets_positive_float() {
    let mut schedule = base_schedule();
    schedule.tasks.push(task("start", Some(dt(2024, 5, 6, 8)), 8.0));
    schedule.tasks.push(task("long", None, 40.0));
    schedule.tasks.push(task("short", None, 8.0));
    schedule.tasks.push(task("end", None, 8.0));
    for (succ, pred) in [("long", "start"), ("short", "start"), ("end", "long"), ("end", "short")] {
        schedule.relationships.push(Relationship::new(
            succ,
            pred,
            RelationshipType::FinishToStart,
            0.0,
        ));
    }

    schedule.recalculate();

    let long = schedule.task_by_id("long").unwrap();
    let short = schedule.task_by_id("short").unwrap();
    assert_eq!(long.total_float_hours, Some(0.0));
    assert_eq!(short.total_float_hours, Some(32.0));
    assert!(!short.is_critical());
}

#[test]
fn repeated_runs_produce_identical_computed_fields() {
    let mut schedule = base_schedule();
    schedule.tasks.push(task("a", Some(dt(2024, 5, 6, 8)), 24.0));
    schedule.tasks.push(task("b", None, 16.0));
    schedule.relationships.push(Relationship::new(
        "b",
        "a",
        RelationshipType::FinishToFinish,
        1.0,
    ));

    schedule.recalculate();
    let first = schedule.tasks.clone();
    schedule.recalculate();
    schedule.recalculate();
    assert_eq!(schedule.tasks, first);
}

#[test]
fn reversed_declaration_order_keeps_the_critical_set() {
    let build = |reversed: bool| {
        let mut schedule = base_schedule();
        let mut tasks = vec![
            task("start", Some(dt(2024, 5, 6, 8)), 8.0),
            task("long", None, 40.0),
            task("short", None, 8.0),
            task("end", None, 8.0),
        ];
        if reversed {
            tasks.reverse();
        }
        schedule.tasks = tasks;
        for (succ, pred) in
            [("long", "start"), ("short", "start"), ("end", "long"), ("end", "short")]
        {
            schedule.relationships.push(Relationship::new(
                succ,
                pred,
                RelationshipType::FinishToStart,
                0.0,
            ));
        }
        schedule.recalculate();
        schedule
            .tasks
            .iter()
            .filter(|t| t.is_critical())
            .map(|t| t.id.clone())
            .collect::<HashSet<String>>()
    };

    assert_eq!(build(false), build(true));
}

#[test]
fn task_without_anchor_or_predecessors_sits_on_the_sentinel() {
    let mut schedule = base_schedule();
    schedule.tasks.push(task("floating", None, 8.0));
    schedule.tasks.push(task("anchored", Some(dt(2024, 5, 6, 8)), 8.0));

    schedule.recalculate();

    let floating = schedule.task_by_id("floating").unwrap();
    assert_eq!(floating.early_start, Some(dt(1900, 1, 1, 0)));
    // Unlinked tasks anchor their late dates to the project end.
    let anchored = schedule.task_by_id("anchored").unwrap();
    assert_eq!(floating.late_end, anchored.early_end);
}
