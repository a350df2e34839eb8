use chrono::{NaiveDate, NaiveDateTime};
use schedule_audit::{
    Project, Relationship, RelationshipType, Resource, ResourceAssignment, Schedule,
    ScheduleAnalyzer, Task, TaskActivityCode, TaskGrouping, TaskType,
};

fn dt(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn task(id: &str, float_hours: Option<f64>) -> Task {
    let mut task = Task::new(id, "p1", id, id);
    task.total_float_hours = float_hours;
    task
}

fn base_schedule() -> Schedule {
    let mut schedule = Schedule::new();
    schedule.projects.push(Project::new("p1", "P1", "Project"));
    schedule
}

#[test]
fn critical_path_contains_only_zero_or_negative_float_tasks() {
    let mut schedule = base_schedule();
    schedule.tasks.push(task("t1", Some(40.0)));
    schedule.tasks.push(task("t2", Some(0.0)));

    let analyzer = ScheduleAnalyzer::new(&schedule);
    let summary = analyzer.critical_path();
    assert_eq!(summary.task_ids, vec!["t2".to_string()]);
}

#[test]
fn critical_path_sorts_by_target_start_with_undated_last() {
    let mut schedule = base_schedule();
    let mut late = task("late", Some(0.0));
    late.target_start = Some(dt(2024, 6, 1, 8));
    late.target_duration_hours = 16.0;
    let mut early = task("early", Some(-8.0));
    early.target_start = Some(dt(2024, 5, 1, 8));
    early.target_duration_hours = 24.0;
    let undated = task("undated", Some(0.0));
    schedule.tasks.push(late);
    schedule.tasks.push(undated);
    schedule.tasks.push(early);

    let summary = ScheduleAnalyzer::new(&schedule).critical_path();
    assert_eq!(
        summary.task_ids,
        vec!["early".to_string(), "late".to_string(), "undated".to_string()]
    );
    // 24h + 16h at 8 hours per day.
    assert_eq!(summary.total_duration_days, 5);
}

#[test]
fn float_buckets_split_on_the_threshold() {
    let mut schedule = base_schedule();
    schedule.tasks.push(task("deep", Some(80.0)));
    schedule.tasks.push(task("behind", Some(-8.0)));
    schedule.tasks.push(task("close", Some(16.0)));
    schedule.tasks.push(task("critical", Some(0.0)));

    let analysis = ScheduleAnalyzer::new(&schedule).float_analysis(5);

    assert_eq!(analysis.high_float, vec!["deep".to_string()]);
    assert_eq!(analysis.negative_float, vec!["behind".to_string()]);
    assert_eq!(analysis.near_critical, vec!["close".to_string()]);
    assert_eq!(analysis.average_float_hours, (80.0 - 8.0 + 16.0) / 4.0);
}

#[test]
fn float_analysis_of_empty_schedule_is_zeroed() {
    let schedule = base_schedule();
    let analysis = ScheduleAnalyzer::new(&schedule).float_analysis(5);
    assert_eq!(analysis.average_float_hours, 0.0);
    assert!(analysis.high_float.is_empty());
}

#[test]
fn chain_reports_open_start_and_open_end() {
    let mut schedule = base_schedule();
    for id in ["t1", "t2", "t3"] {
        schedule.tasks.push(task(id, None));
    }
    schedule.relationships.push(Relationship::new(
        "t2",
        "t1",
        RelationshipType::FinishToStart,
        0.0,
    ));
    schedule.relationships.push(Relationship::new(
        "t3",
        "t2",
        RelationshipType::FinishToStart,
        0.0,
    ));

    let logic = ScheduleAnalyzer::new(&schedule).logic_check();
    assert_eq!(logic.open_starts, vec!["t1".to_string()]);
    assert_eq!(logic.open_ends, vec!["t3".to_string()]);
    assert!(logic.dangling.is_empty());
}

#[test]
fn milestones_are_exempt_from_their_open_end() {
    let mut schedule = base_schedule();
    let mut start = task("kickoff", None);
    start.task_type = TaskType::StartMilestone;
    let mut finish = task("handover", None);
    finish.task_type = TaskType::FinishMilestone;
    schedule.tasks.push(start);
    schedule.tasks.push(finish);
    schedule.relationships.push(Relationship::new(
        "handover",
        "kickoff",
        RelationshipType::FinishToStart,
        0.0,
    ));

    let logic = ScheduleAnalyzer::new(&schedule).logic_check();
    assert!(logic.open_starts.is_empty());
    assert!(logic.open_ends.is_empty());
}

#[test]
fn dangling_edges_are_reported_not_dropped() {
    let mut schedule = base_schedule();
    schedule.tasks.push(task("t1", None));
    schedule.relationships.push(Relationship::new(
        "t1",
        "ghost",
        RelationshipType::FinishToStart,
        0.0,
    ));
    schedule.relationships.push(Relationship::new(
        "phantom",
        "t1",
        RelationshipType::FinishToStart,
        0.0,
    ));

    let logic = ScheduleAnalyzer::new(&schedule).logic_check();
    assert_eq!(logic.dangling.len(), 2);
}

#[test]
fn resource_loading_sums_assignments_and_flags_overallocation() {
    let mut schedule = base_schedule();
    schedule
        .resources
        .push(Resource::new("r1", "CRANE", "Tower crane"));
    schedule.resources.push(Resource::new("r2", "CREW", "Crew"));
    for index in 0..11 {
        schedule.tasks.push(task(&format!("t{index}"), None));
        schedule.assignments.push(ResourceAssignment {
            task_id: format!("t{index}"),
            resource_id: "r1".to_string(),
            project_id: "p1".to_string(),
            target_quantity: 8.0,
            actual_quantity: 0.0,
            remaining_quantity: 8.0,
            target_cost: 0.0,
            actual_cost: 0.0,
        });
    }

    let loading = ScheduleAnalyzer::new(&schedule).resource_loading();
    let crane = loading
        .iter()
        .find(|entry| entry.resource_id == "r1")
        .unwrap();
    assert_eq!(crane.assignment_count, 11);
    assert_eq!(crane.total_target_quantity, 88.0);
    assert!(crane.over_allocated);

    let crew = loading
        .iter()
        .find(|entry| entry.resource_id == "r2")
        .unwrap();
    assert_eq!(crew.assignment_count, 0);
    assert!(!crew.over_allocated);
}

#[test]
fn grouping_by_activity_code_type_buckets_tasks() {
    let mut schedule = base_schedule();
    schedule.tasks.push(task("t1", None));
    schedule.tasks.push(task("t2", None));
    schedule.tasks.push(task("t3", None));
    schedule.task_activity_codes.push(TaskActivityCode {
        task_id: "t1".to_string(),
        code_id: "phase-1".to_string(),
        type_id: "phase".to_string(),
        project_id: "p1".to_string(),
    });
    schedule.task_activity_codes.push(TaskActivityCode {
        task_id: "t2".to_string(),
        code_id: "phase-2".to_string(),
        type_id: "phase".to_string(),
        project_id: "p1".to_string(),
    });

    let grouping = TaskGrouping::ActivityCodeType("phase".to_string());
    assert_eq!(grouping, TaskGrouping::ActivityCodeType("phase".to_string()));

    let groups = ScheduleAnalyzer::new(&schedule).group_tasks(&grouping);
    assert_eq!(groups["phase-1"], vec!["t1".to_string()]);
    assert_eq!(groups["phase-2"], vec!["t2".to_string()]);
    assert_eq!(groups[""], vec!["t3".to_string()]);
}
