//! JSON snapshot and tabular CSV export for host persistence.
//!
//! The JSON form is the output contract: pretty-printed, ISO-8601 dates, and
//! every entity collection sorted by id so byte output is stable across runs.
//! XER writing is not supported.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::PersistenceResult;
use crate::schedule::Schedule;
use crate::task::Task;

/// Deterministic clone: entity vectors ordered by their natural ids.
fn snapshot(schedule: &Schedule) -> Schedule {
    let mut copy = schedule.clone();
    copy.projects.sort_by(|a, b| a.id.cmp(&b.id));
    copy.wbs_elements.sort_by(|a, b| a.id.cmp(&b.id));
    copy.tasks.sort_by(|a, b| a.id.cmp(&b.id));
    copy.relationships.sort_by(|a, b| {
        (a.successor_task_id.as_str(), a.predecessor_task_id.as_str())
            .cmp(&(b.successor_task_id.as_str(), b.predecessor_task_id.as_str()))
    });
    copy.resources.sort_by(|a, b| a.id.cmp(&b.id));
    copy.assignments.sort_by(|a, b| {
        (a.task_id.as_str(), a.resource_id.as_str())
            .cmp(&(b.task_id.as_str(), b.resource_id.as_str()))
    });
    copy.calendars.sort_by(|a, b| a.id.cmp(&b.id));
    copy.activity_code_types.sort_by(|a, b| a.id.cmp(&b.id));
    copy.activity_codes.sort_by(|a, b| a.id.cmp(&b.id));
    copy.task_activity_codes.sort_by(|a, b| {
        (a.task_id.as_str(), a.code_id.as_str()).cmp(&(b.task_id.as_str(), b.code_id.as_str()))
    });
    copy
}

pub fn save_schedule_to_json<P: AsRef<Path>>(
    schedule: &Schedule,
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot(schedule))?;
    Ok(())
}

pub fn load_schedule_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Schedule> {
    let file = File::open(path)?;
    let schedule: Schedule = serde_json::from_reader(file)?;
    Ok(schedule)
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TaskCsvRecord {
    id: String,
    project_id: String,
    wbs_id: String,
    task_code: String,
    name: String,
    task_type: String,
    status: String,
    percent_complete: f64,
    target_start: String,
    target_end: String,
    actual_start: String,
    actual_end: String,
    early_start: String,
    early_end: String,
    late_start: String,
    late_end: String,
    target_duration_hours: f64,
    remaining_duration_hours: f64,
    total_float_hours: String,
    free_float_hours: String,
    is_critical: bool,
}

impl From<&Task> for TaskCsvRecord {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            project_id: task.project_id.clone(),
            wbs_id: task.wbs_id.clone().unwrap_or_default(),
            task_code: task.task_code.clone(),
            name: task.name.clone(),
            task_type: task.task_type.as_raw().to_string(),
            status: task.status.as_raw().to_string(),
            percent_complete: task.percent_complete,
            target_start: format_date(task.target_start),
            target_end: format_date(task.target_end),
            actual_start: format_date(task.actual_start),
            actual_end: format_date(task.actual_end),
            early_start: format_date(task.early_start),
            early_end: format_date(task.early_end),
            late_start: format_date(task.late_start),
            late_end: format_date(task.late_end),
            target_duration_hours: task.target_duration_hours,
            remaining_duration_hours: task.remaining_duration_hours,
            total_float_hours: format_option_f64(task.total_float_hours),
            free_float_hours: format_option_f64(task.free_float_hours),
            is_critical: task.is_critical(),
        }
    }
}

pub fn save_tasks_to_csv<P: AsRef<Path>>(schedule: &Schedule, path: P) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for task in &snapshot(schedule).tasks {
        writer.serialize(TaskCsvRecord::from(task))?;
    }
    writer.flush()?;
    Ok(())
}

fn format_date(date: Option<NaiveDateTime>) -> String {
    date.map(|stamp| stamp.format("%Y-%m-%dT%H:%M:%S").to_string())
        .unwrap_or_default()
}

fn format_option_f64(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
