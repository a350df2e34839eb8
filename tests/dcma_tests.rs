use chrono::{NaiveDate, NaiveDateTime};
use schedule_audit::{Project, Relationship, RelationshipType, Schedule, ScheduleAnalyzer, Task};

fn dt(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn task(id: &str) -> Task {
    Task::new(id, "p1", id, id)
}

fn base_schedule() -> Schedule {
    let mut schedule = Schedule::new();
    schedule.projects.push(Project::new("p1", "P1", "Project"));
    schedule
}

fn chain(count: usize) -> Schedule {
    let mut schedule = base_schedule();
    for index in 0..count {
        schedule.tasks.push(task(&format!("t{index}")));
    }
    for index in 1..count {
        schedule.relationships.push(Relationship::new(
            format!("t{index}"),
            format!("t{}", index - 1),
            RelationshipType::FinishToStart,
            0.0,
        ));
    }
    schedule
}

fn check<'a>(
    assessment: &'a schedule_audit::DcmaAssessment,
    name: &str,
) -> &'a schedule_audit::DcmaCheck {
    assessment
        .checks
        .iter()
        .find(|check| check.name == name)
        .unwrap()
}

#[test]
fn panel_has_eleven_checks() {
    let schedule = base_schedule();
    let assessment = ScheduleAnalyzer::new(&schedule).dcma_assessment();
    assert_eq!(assessment.checks.len(), 11);
}

#[test]
fn logic_check_needs_one_and_a_half_relationships_per_task() {
    let sparse = chain(10);
    let assessment = ScheduleAnalyzer::new(&sparse).dcma_assessment();
    let logic = check(&assessment, "Logic");
    assert_eq!(logic.actual_value, Some(0.9));
    assert!(!logic.passed);

    let mut dense = chain(10);
    for index in 0..8 {
        dense.relationships.push(Relationship::new(
            format!("t{}", index + 2),
            format!("t{index}"),
            RelationshipType::StartToStart,
            0.0,
        ));
    }
    let assessment = ScheduleAnalyzer::new(&dense).dcma_assessment();
    let logic = check(&assessment, "Logic");
    assert_eq!(logic.actual_value, Some(1.7));
    assert!(logic.passed);
}

#[test]
fn leads_and_lags_checks_count_signed_lag() {
    let mut schedule = chain(3);
    schedule.relationships[0].lag_days = -1.0;
    schedule.relationships[1].lag_days = 2.0;

    let assessment = ScheduleAnalyzer::new(&schedule).dcma_assessment();
    let leads = check(&assessment, "Leads");
    // One of two relationships is a lead.
    assert_eq!(leads.actual_value, Some(50.0));
    assert!(!leads.passed);
    let lags = check(&assessment, "Lags");
    assert_eq!(lags.actual_value, Some(50.0));
    assert!(!lags.passed);
}

#[test]
fn relationship_type_check_tolerates_up_to_ten_percent_non_fs() {
    let mut schedule = chain(21);
    schedule.relationships[0].kind = RelationshipType::FinishToFinish;

    let assessment = ScheduleAnalyzer::new(&schedule).dcma_assessment();
    let kinds = check(&assessment, "Relationship Types");
    assert_eq!(kinds.actual_value, Some(5.0));
    assert!(kinds.passed);
}

#[test]
fn hard_constraints_check_is_not_applicable_but_passes() {
    let schedule = chain(2);
    let assessment = ScheduleAnalyzer::new(&schedule).dcma_assessment();
    let constraints = check(&assessment, "Hard Constraints");
    assert_eq!(constraints.actual_value, None);
    assert!(constraints.passed);
}

#[test]
fn negative_float_check_requires_exactly_zero() {
    let mut schedule = chain(2);
    schedule.tasks[0].total_float_hours = Some(-1.0);

    let assessment = ScheduleAnalyzer::new(&schedule).dcma_assessment();
    assert!(!check(&assessment, "Negative Float").passed);
}

#[test]
fn high_float_and_high_duration_use_the_44_day_ceiling() {
    let mut schedule = chain(2);
    schedule.tasks[0].total_float_hours = Some(45.0 * 8.0);
    schedule.tasks[1].target_duration_hours = 45.0 * 8.0;

    let assessment = ScheduleAnalyzer::new(&schedule).dcma_assessment();
    let high_float = check(&assessment, "High Float");
    assert_eq!(high_float.actual_value, Some(50.0));
    assert!(!high_float.passed);
    let high_duration = check(&assessment, "High Duration");
    assert_eq!(high_duration.actual_value, Some(50.0));
    assert!(!high_duration.passed);
}

#[test]
fn invalid_dates_check_counts_reversed_actuals() {
    let mut schedule = chain(2);
    schedule.tasks[0].actual_start = Some(dt(2024, 5, 10, 8));
    schedule.tasks[0].actual_end = Some(dt(2024, 5, 8, 8));

    let assessment = ScheduleAnalyzer::new(&schedule).dcma_assessment();
    let invalid = check(&assessment, "Invalid Dates");
    assert_eq!(invalid.actual_value, Some(1.0));
    assert!(!invalid.passed);
}

#[test]
fn open_ends_feed_the_missing_link_checks() {
    // A chain has exactly one open start and one open end out of ten tasks,
    // landing right on the 10% failure side of the 5% threshold.
    let schedule = chain(10);
    let assessment = ScheduleAnalyzer::new(&schedule).dcma_assessment();
    let missing_pred = check(&assessment, "Missing Predecessors");
    assert_eq!(missing_pred.actual_value, Some(10.0));
    assert!(!missing_pred.passed);
    let missing_succ = check(&assessment, "Missing Successors");
    assert_eq!(missing_succ.actual_value, Some(10.0));
    assert!(!missing_succ.passed);
}

#[test]
fn empty_schedule_scores_without_dividing_by_zero() {
    let schedule = base_schedule();
    let assessment = ScheduleAnalyzer::new(&schedule).dcma_assessment();
    assert!(assessment.overall_score.is_finite());
    // Logic fails (0 relationships), leads/lags/types/float/dates pass.
    let logic = check(&assessment, "Logic");
    assert_eq!(logic.actual_value, Some(0.0));
    assert!(!logic.passed);
}

#[test]
fn overall_score_is_share_of_passed_checks() {
    let schedule = chain(10);
    let assessment = ScheduleAnalyzer::new(&schedule).dcma_assessment();
    let passed = assessment.checks.iter().filter(|check| check.passed).count();
    let expected = passed as f64 / assessment.checks.len() as f64 * 100.0;
    assert_eq!(assessment.overall_score, expected);
}
