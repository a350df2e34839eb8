//! MSPDI (MS Project XML export) reader.
//!
//! Emits the same normalized `Schedule` the XER path produces. Only the
//! XML export is accepted; the compound-binary MPP container is rejected at
//! the front door. quick-xml performs no external entity resolution, so
//! XXE-style inputs cannot reach the filesystem or network.

use chrono::{NaiveDate, NaiveDateTime};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::calendar::{CalendarException, WorkCalendar};
use crate::error::{ImportError, ImportResult};
use crate::project::Project;
use crate::relationship::{Relationship, RelationshipType};
use crate::resource::{Resource, ResourceAssignment, ResourceType};
use crate::schedule::{Schedule, HOURS_PER_DAY};
use crate::task::{Task, TaskStatus, TaskType};

const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Synthetic project id: the MSPDI format has no project identifier.
const PROJECT_ID: &str = "1";

#[derive(Default)]
struct XmlLink {
    predecessor_uid: String,
    kind: i64,
    lag_tenths_of_minutes: f64,
}

#[derive(Default)]
struct XmlTask {
    uid: String,
    name: String,
    wbs: Option<String>,
    start: Option<NaiveDateTime>,
    finish: Option<NaiveDateTime>,
    actual_start: Option<NaiveDateTime>,
    actual_finish: Option<NaiveDateTime>,
    duration_hours: f64,
    remaining_hours: f64,
    percent_complete: f64,
    milestone: bool,
    summary: bool,
    links: Vec<XmlLink>,
}

#[derive(Default)]
struct XmlResource {
    uid: String,
    name: String,
    kind: i64,
}

#[derive(Default)]
struct XmlAssignment {
    task_uid: String,
    resource_uid: String,
    work_hours: f64,
    actual_work_hours: f64,
    remaining_work_hours: f64,
    cost: f64,
    actual_cost: f64,
}

#[derive(Default)]
struct XmlCalendar {
    uid: String,
    name: String,
    work_days: Vec<chrono::Weekday>,
    exceptions: Vec<(NaiveDate, f64)>,
    current_day_type: i64,
    current_day_working: bool,
    current_exception_from: Option<NaiveDate>,
}

#[derive(Default)]
struct XmlProject {
    name: String,
    title: Option<String>,
    start: Option<NaiveDateTime>,
    finish: Option<NaiveDateTime>,
    status_date: Option<NaiveDateTime>,
    tasks: Vec<XmlTask>,
    resources: Vec<XmlResource>,
    assignments: Vec<XmlAssignment>,
    calendars: Vec<XmlCalendar>,
}

/// Parses an MSPDI document into a normalized schedule.
pub fn parse_project_xml(xml: &str) -> ImportResult<Schedule> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut doc = XmlProject::default();
    let mut task: Option<XmlTask> = None;
    let mut link: Option<XmlLink> = None;
    let mut resource: Option<XmlResource> = None;
    let mut assignment: Option<XmlAssignment> = None;
    let mut calendar: Option<XmlCalendar> = None;
    let mut saw_project = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref element)) => {
                let name = local_name(element.name().as_ref())?;
                match name.as_str() {
                    "Project" => saw_project = true,
                    "Task" if task.is_none() => task = Some(XmlTask::default()),
                    "PredecessorLink" => {
                        link = Some(XmlLink {
                            kind: 1,
                            ..XmlLink::default()
                        })
                    }
                    "Resource" if resource.is_none() => resource = Some(XmlResource::default()),
                    "Assignment" if assignment.is_none() => {
                        assignment = Some(XmlAssignment::default())
                    }
                    "Calendar" if calendar.is_none() => calendar = Some(XmlCalendar::default()),
                    _ => {}
                }
                path.push(name);
            }
            Ok(Event::End(_)) => {
                let closed = path.pop().unwrap_or_default();
                match closed.as_str() {
                    "Task" => {
                        if let Some(done) = task.take() {
                            doc.tasks.push(done);
                        }
                    }
                    "PredecessorLink" => {
                        if let (Some(done), Some(owner)) = (link.take(), task.as_mut()) {
                            owner.links.push(done);
                        }
                    }
                    "Resource" => {
                        if let Some(done) = resource.take() {
                            doc.resources.push(done);
                        }
                    }
                    "Assignment" => {
                        if let Some(done) = assignment.take() {
                            doc.assignments.push(done);
                        }
                    }
                    "Calendar" => {
                        if let Some(done) = calendar.take() {
                            doc.calendars.push(done);
                        }
                    }
                    "WeekDay" => {
                        if let Some(cal) = calendar.as_mut() {
                            finish_week_day(cal);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(ref content)) => {
                let value = content
                    .unescape()
                    .map_err(|err| ImportError::XmlParsingFailed(err.to_string()))?
                    .trim()
                    .to_string();
                if value.is_empty() {
                    continue;
                }
                apply_text(
                    &path,
                    &value,
                    &mut doc,
                    &mut task,
                    &mut link,
                    &mut resource,
                    &mut assignment,
                    &mut calendar,
                );
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(ImportError::XmlParsingFailed(err.to_string())),
            _ => {}
        }
    }

    if !saw_project {
        return Err(ImportError::XmlParsingFailed(
            "no Project element found".to_string(),
        ));
    }

    Ok(into_schedule(doc))
}

#[allow(clippy::too_many_arguments)]
fn apply_text(
    path: &[String],
    value: &str,
    doc: &mut XmlProject,
    task: &mut Option<XmlTask>,
    link: &mut Option<XmlLink>,
    resource: &mut Option<XmlResource>,
    assignment: &mut Option<XmlAssignment>,
    calendar: &mut Option<XmlCalendar>,
) {
    let Some(leaf) = path.last() else {
        return;
    };
    let parent = path.len().checked_sub(2).map(|idx| path[idx].as_str());

    if let (Some(current), Some("PredecessorLink")) = (link.as_mut(), parent) {
        match leaf.as_str() {
            "PredecessorUID" => current.predecessor_uid = value.to_string(),
            "Type" => current.kind = value.parse().unwrap_or(1),
            "LinkLag" => current.lag_tenths_of_minutes = value.parse().unwrap_or(0.0),
            _ => {}
        }
        return;
    }

    if let (Some(current), Some("Task")) = (task.as_mut(), parent) {
        match leaf.as_str() {
            "UID" => current.uid = value.to_string(),
            "Name" => current.name = value.to_string(),
            "WBS" => current.wbs = Some(value.to_string()),
            "Start" => current.start = parse_date(value),
            "Finish" => current.finish = parse_date(value),
            "ActualStart" => current.actual_start = parse_date(value),
            "ActualFinish" => current.actual_finish = parse_date(value),
            "Duration" => current.duration_hours = parse_duration_hours(value),
            "RemainingDuration" => current.remaining_hours = parse_duration_hours(value),
            "PercentComplete" => current.percent_complete = value.parse().unwrap_or(0.0),
            "Milestone" => current.milestone = value == "1",
            "Summary" => current.summary = value == "1",
            _ => {}
        }
        return;
    }

    if let (Some(current), Some("Resource")) = (resource.as_mut(), parent) {
        match leaf.as_str() {
            "UID" => current.uid = value.to_string(),
            "Name" => current.name = value.to_string(),
            "Type" => current.kind = value.parse().unwrap_or(1),
            _ => {}
        }
        return;
    }

    if let (Some(current), Some("Assignment")) = (assignment.as_mut(), parent) {
        match leaf.as_str() {
            "TaskUID" => current.task_uid = value.to_string(),
            "ResourceUID" => current.resource_uid = value.to_string(),
            "Work" => current.work_hours = parse_duration_hours(value),
            "ActualWork" => current.actual_work_hours = parse_duration_hours(value),
            "RemainingWork" => current.remaining_work_hours = parse_duration_hours(value),
            "Cost" => current.cost = value.parse().unwrap_or(0.0),
            "ActualCost" => current.actual_cost = value.parse().unwrap_or(0.0),
            _ => {}
        }
        return;
    }

    if let Some(current) = calendar.as_mut() {
        match (parent, leaf.as_str()) {
            (Some("Calendar"), "UID") => current.uid = value.to_string(),
            (Some("Calendar"), "Name") => current.name = value.to_string(),
            (Some("WeekDay"), "DayType") => {
                current.current_day_type = value.parse().unwrap_or(0)
            }
            (Some("WeekDay"), "DayWorking") => current.current_day_working = value == "1",
            (Some("TimePeriod"), "FromDate") => {
                current.current_exception_from = parse_date(value).map(|stamp| stamp.date())
            }
            _ => {}
        }
        return;
    }

    if parent == Some("Project") {
        match leaf.as_str() {
            "Name" => doc.name = value.to_string(),
            "Title" => doc.title = Some(value.to_string()),
            "StartDate" => doc.start = parse_date(value),
            "FinishDate" => doc.finish = parse_date(value),
            "StatusDate" => doc.status_date = parse_date(value),
            _ => {}
        }
    }
}

/// MSPDI DayType runs 1 (Sunday) through 7 (Saturday); 0 marks an exception
/// entry carrying a TimePeriod instead of a weekday.
fn finish_week_day(calendar: &mut XmlCalendar) {
    use chrono::Weekday::*;
    match calendar.current_day_type {
        1..=7 => {
            if calendar.current_day_working {
                let day = match calendar.current_day_type {
                    1 => Sun,
                    2 => Mon,
                    3 => Tue,
                    4 => Wed,
                    5 => Thu,
                    6 => Fri,
                    _ => Sat,
                };
                calendar.work_days.push(day);
            }
        }
        _ => {
            if let Some(date) = calendar.current_exception_from.take() {
                let hours = if calendar.current_day_working { 8.0 } else { 0.0 };
                calendar.exceptions.push((date, hours));
            }
        }
    }
    calendar.current_day_type = 0;
    calendar.current_day_working = false;
    calendar.current_exception_from = None;
}

fn into_schedule(doc: XmlProject) -> Schedule {
    let mut schedule = Schedule::new();

    let display_name = doc.title.clone().unwrap_or_else(|| doc.name.clone());
    let mut project = Project::new(PROJECT_ID, doc.name.clone(), display_name);
    project.plan_start = doc.start;
    project.plan_end = doc.finish;
    project.data_date = doc.status_date;
    schedule.projects.push(project);

    for entry in doc.tasks {
        let mut task = Task::new(entry.uid.clone(), PROJECT_ID, entry.uid.clone(), entry.name);
        task.wbs_id = entry.wbs;
        task.task_type = if entry.summary {
            TaskType::WbsSummary
        } else if entry.milestone {
            TaskType::StartMilestone
        } else {
            TaskType::TaskDependent
        };
        task.status = if entry.actual_finish.is_some() {
            TaskStatus::Completed
        } else if entry.actual_start.is_some() {
            TaskStatus::InProgress
        } else {
            TaskStatus::NotStarted
        };
        task.percent_complete = entry.percent_complete;
        task.target_start = entry.start;
        task.target_end = entry.finish;
        task.actual_start = entry.actual_start;
        task.actual_end = entry.actual_finish;
        task.target_duration_hours = entry.duration_hours;
        task.remaining_duration_hours = entry.remaining_hours;
        schedule.tasks.push(task);

        for dependency in entry.links {
            schedule.relationships.push(Relationship::new(
                entry.uid.clone(),
                dependency.predecessor_uid,
                link_type(dependency.kind),
                dependency.lag_tenths_of_minutes / 600.0 / HOURS_PER_DAY,
            ));
        }
    }

    for entry in doc.resources {
        let mut resource = Resource::new(entry.uid.clone(), entry.name.clone(), entry.name);
        resource.resource_type = match entry.kind {
            0 => ResourceType::Material,
            2 => ResourceType::NonLabor,
            _ => ResourceType::Labor,
        };
        schedule.resources.push(resource);
    }

    for entry in doc.assignments {
        schedule.assignments.push(ResourceAssignment {
            task_id: entry.task_uid,
            resource_id: entry.resource_uid,
            project_id: PROJECT_ID.to_string(),
            target_quantity: entry.work_hours,
            actual_quantity: entry.actual_work_hours,
            remaining_quantity: entry.remaining_work_hours,
            target_cost: entry.cost,
            actual_cost: entry.actual_cost,
        });
    }

    for entry in doc.calendars {
        let mut calendar = WorkCalendar::new(entry.uid.clone(), entry.name);
        calendar.project_id = Some(PROJECT_ID.to_string());
        if !entry.work_days.is_empty() {
            calendar.work_days = entry.work_days;
        }
        for (date, hours_worked) in entry.exceptions {
            schedule.calendar_exceptions.push(CalendarException {
                calendar_id: entry.uid.clone(),
                date,
                hours_worked,
            });
        }
        schedule.calendars.push(calendar);
    }

    schedule
}

/// MSPDI link types: 0 = FF, 1 = FS, 2 = SS, 3 = SF. FS is the default.
fn link_type(code: i64) -> RelationshipType {
    match code {
        0 => RelationshipType::FinishToFinish,
        2 => RelationshipType::StartToStart,
        3 => RelationshipType::StartToFinish,
        _ => RelationshipType::FinishToStart,
    }
}

fn local_name(qualified: &[u8]) -> ImportResult<String> {
    let name = std::str::from_utf8(qualified)
        .map_err(|err| ImportError::XmlParsingFailed(err.to_string()))?;
    Ok(name.rsplit(':').next().unwrap_or(name).to_string())
}

fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    match NaiveDateTime::parse_from_str(raw, DATE_FORMAT) {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::debug!("unparseable MSPDI date '{raw}', treating as absent");
            None
        }
    }
}

/// MSPDI durations look like `PT80H0M0S`.
fn parse_duration_hours(raw: &str) -> f64 {
    let Some(body) = raw.strip_prefix("PT") else {
        return 0.0;
    };
    let mut hours = 0.0;
    let mut digits = String::new();
    for ch in body.chars() {
        match ch {
            '0'..='9' | '.' => digits.push(ch),
            'H' => {
                hours += digits.parse::<f64>().unwrap_or(0.0);
                digits.clear();
            }
            'M' => {
                hours += digits.parse::<f64>().unwrap_or(0.0) / 60.0;
                digits.clear();
            }
            'S' => {
                hours += digits.parse::<f64>().unwrap_or(0.0) / 3_600.0;
                digits.clear();
            }
            _ => digits.clear(),
        }
    }
    hours
}
