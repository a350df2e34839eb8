//! Maps the raw XER tables onto the normalized schedule model.
//!
//! Every recognized table that is missing simply yields an empty collection;
//! only `PROJECT` is required. String cells are coerced tolerantly: malformed
//! dates become None, malformed numbers fall back to documented defaults, and
//! every anomaly is logged rather than raised.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;

use super::reader::{XerDocument, XerTable};
use crate::activity_code::{ActivityCode, ActivityCodeScope, ActivityCodeType, TaskActivityCode};
use crate::calendar::WorkCalendar;
use crate::error::{ImportError, ImportResult};
use crate::project::Project;
use crate::relationship::{Relationship, RelationshipType};
use crate::resource::{Resource, ResourceAssignment, ResourceType};
use crate::schedule::{DiagnosticKind, Schedule, HOURS_PER_DAY};
use crate::task::{Task, TaskStatus, TaskType};
use crate::wbs::WbsElement;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn build_schedule(document: &XerDocument) -> ImportResult<Schedule> {
    let mut schedule = Schedule::new();

    if !document.has_header {
        schedule.push_diagnostic(
            DiagnosticKind::MissingHeader,
            "no ERMHDR line in file, proceeding without header",
        );
    }

    build_projects(document, &mut schedule)?;
    build_wbs(document, &mut schedule);
    build_calendars(document, &mut schedule);
    build_tasks(document, &mut schedule);
    build_relationships(document, &mut schedule);
    build_resources(document, &mut schedule);
    build_assignments(document, &mut schedule);
    build_activity_code_types(document, &mut schedule);
    build_activity_codes(document, &mut schedule);
    build_task_activity_codes(document, &mut schedule);

    Ok(schedule)
}

fn build_projects(document: &XerDocument, schedule: &mut Schedule) -> ImportResult<()> {
    let table = document
        .table("PROJECT")
        .ok_or_else(|| ImportError::MissingRequiredTable("PROJECT".to_string()))?;

    for row in &table.rows {
        let Some(id) = text(table, row, "proj_id") else {
            continue;
        };
        let mut project = Project::new(
            id,
            text(table, row, "proj_short_name").unwrap_or_default(),
            text(table, row, "proj_name").unwrap_or_default(),
        );
        project.plan_start = date(table, row, "plan_start_date");
        project.plan_end = date(table, row, "plan_end_date");
        project.data_date = date(table, row, "last_recalc_date");
        schedule.projects.push(project);
    }
    Ok(())
}

fn build_wbs(document: &XerDocument, schedule: &mut Schedule) {
    let Some(table) = document.table("PROJWBS") else {
        return;
    };
    for row in &table.rows {
        let (Some(id), Some(project_id)) =
            (text(table, row, "wbs_id"), text(table, row, "proj_id"))
        else {
            continue;
        };
        schedule.wbs_elements.push(WbsElement {
            id,
            project_id,
            parent_id: text(table, row, "parent_wbs_id"),
            name: text(table, row, "wbs_name").unwrap_or_default(),
            short_name: text(table, row, "wbs_short_name").unwrap_or_default(),
            sequence_number: integer(table, row, "seq_num", 0),
        });
    }
}

fn build_calendars(document: &XerDocument, schedule: &mut Schedule) {
    let Some(table) = document.table("CALENDAR") else {
        return;
    };
    for row in &table.rows {
        let Some(id) = text(table, row, "clndr_id") else {
            continue;
        };
        let mut calendar =
            WorkCalendar::new(id, text(table, row, "clndr_name").unwrap_or_default());
        calendar.project_id = text(table, row, "proj_id");
        calendar.is_default = cell(table, row, "default_flag") == Some("Y");
        calendar.hours_per_day = number(table, row, "day_hr_cnt", 8.0);
        calendar.hours_per_week = number(table, row, "week_hr_cnt", 40.0);
        calendar.hours_per_month = number(table, row, "month_hr_cnt", 172.0);
        calendar.hours_per_year = number(table, row, "year_hr_cnt", 2080.0);
        schedule.calendars.push(calendar);
    }
}

fn build_tasks(document: &XerDocument, schedule: &mut Schedule) {
    let Some(table) = document.table("TASK") else {
        return;
    };
    let project_ids: HashSet<String> = schedule
        .projects
        .iter()
        .map(|project| project.id.clone())
        .collect();

    // Declaration order is load-bearing for the CPM traversal; a duplicate id
    // replaces the earlier record in place instead of re-appending.
    let mut position_by_id: HashMap<String, usize> = HashMap::new();

    for row in &table.rows {
        let (Some(id), Some(project_id)) =
            (text(table, row, "task_id"), text(table, row, "proj_id"))
        else {
            continue;
        };
        if !project_ids.contains(&project_id) {
            tracing::warn!("task {id} references unknown project {project_id}, dropping");
            schedule.push_diagnostic(
                DiagnosticKind::OrphanTask,
                format!("task {id} references unknown project {project_id}"),
            );
            continue;
        }

        let mut task = Task::new(
            id.clone(),
            project_id,
            text(table, row, "task_code").unwrap_or_default(),
            text(table, row, "task_name").unwrap_or_default(),
        );
        task.wbs_id = text(table, row, "wbs_id");
        task.task_type = TaskType::from_raw(cell(table, row, "task_type").unwrap_or_default());
        task.status = TaskStatus::from_raw(cell(table, row, "status_code").unwrap_or_default());
        task.percent_complete = number(table, row, "phys_complete_pct", 0.0);
        task.target_start = date(table, row, "target_start_date");
        task.target_end = date(table, row, "target_end_date");
        task.actual_start = date(table, row, "act_start_date");
        task.actual_end = date(table, row, "act_end_date");
        task.target_duration_hours = number(table, row, "target_drtn_hr_cnt", 0.0);
        task.remaining_duration_hours = number(table, row, "remain_drtn_hr_cnt", 0.0);
        task.total_float_hours = opt_number(table, row, "total_float_hr_cnt");
        task.free_float_hours = opt_number(table, row, "free_float_hr_cnt");

        match position_by_id.get(&id) {
            Some(&position) => {
                tracing::warn!("duplicate task id {id}, later row wins");
                schedule.push_diagnostic(
                    DiagnosticKind::DuplicateTaskId,
                    format!("duplicate task id {id}, later row wins"),
                );
                schedule.tasks[position] = task;
            }
            None => {
                position_by_id.insert(id, schedule.tasks.len());
                schedule.tasks.push(task);
            }
        }
    }
}

fn build_relationships(document: &XerDocument, schedule: &mut Schedule) {
    let Some(table) = document.table("TASKPRED") else {
        return;
    };
    for row in &table.rows {
        let (Some(successor), Some(predecessor)) = (
            text(table, row, "task_id"),
            text(table, row, "pred_task_id"),
        ) else {
            continue;
        };
        let kind = RelationshipType::from_raw(cell(table, row, "pred_type").unwrap_or_default());
        let lag_days = number(table, row, "lag_hr_cnt", 0.0) / HOURS_PER_DAY;
        schedule
            .relationships
            .push(Relationship::new(successor, predecessor, kind, lag_days));
    }
}

fn build_resources(document: &XerDocument, schedule: &mut Schedule) {
    let Some(table) = document.table("RSRC") else {
        return;
    };
    for row in &table.rows {
        let Some(id) = text(table, row, "rsrc_id") else {
            continue;
        };
        let mut resource = Resource::new(
            id,
            text(table, row, "rsrc_short_name").unwrap_or_default(),
            text(table, row, "rsrc_name").unwrap_or_default(),
        );
        resource.resource_type =
            ResourceType::from_raw(cell(table, row, "rsrc_type").unwrap_or_default());
        resource.unit = text(table, row, "unit_of_measure");
        resource.default_units_per_time = number(table, row, "def_qty_per_hr", 1.0);
        schedule.resources.push(resource);
    }
}

fn build_assignments(document: &XerDocument, schedule: &mut Schedule) {
    let Some(table) = document.table("TASKRSRC") else {
        return;
    };
    for row in &table.rows {
        let (Some(task_id), Some(resource_id)) =
            (text(table, row, "task_id"), text(table, row, "rsrc_id"))
        else {
            continue;
        };
        schedule.assignments.push(ResourceAssignment {
            task_id,
            resource_id,
            project_id: text(table, row, "proj_id").unwrap_or_default(),
            target_quantity: number(table, row, "target_qty", 0.0),
            actual_quantity: number(table, row, "act_reg_qty", 0.0),
            remaining_quantity: number(table, row, "remain_qty", 0.0),
            target_cost: number(table, row, "target_cost", 0.0),
            actual_cost: number(table, row, "act_reg_cost", 0.0),
        });
    }
}

fn build_activity_code_types(document: &XerDocument, schedule: &mut Schedule) {
    let Some(table) = document.table("ACTVTYPE") else {
        return;
    };
    for row in &table.rows {
        let Some(id) = text(table, row, "actv_code_type_id") else {
            continue;
        };
        schedule.activity_code_types.push(ActivityCodeType {
            id,
            name: text(table, row, "actv_code_type").unwrap_or_default(),
            short_length: integer(table, row, "actv_short_len", 0),
            sequence_number: integer(table, row, "seq_num", 0),
            project_id: text(table, row, "proj_id"),
            scope: ActivityCodeScope::from_raw(
                cell(table, row, "actv_code_type_scope").unwrap_or_default(),
            ),
        });
    }
}

fn build_activity_codes(document: &XerDocument, schedule: &mut Schedule) {
    let Some(table) = document.table("ACTVCODE") else {
        return;
    };
    for row in &table.rows {
        let (Some(id), Some(type_id)) = (
            text(table, row, "actv_code_id"),
            text(table, row, "actv_code_type_id"),
        ) else {
            continue;
        };
        schedule.activity_codes.push(ActivityCode {
            id,
            type_id,
            parent_id: text(table, row, "parent_actv_code_id"),
            name: text(table, row, "actv_code_name").unwrap_or_default(),
            short_name: text(table, row, "short_name").unwrap_or_default(),
            sequence_number: integer(table, row, "seq_num", 0),
            color: text(table, row, "color"),
        });
    }
}

fn build_task_activity_codes(document: &XerDocument, schedule: &mut Schedule) {
    let Some(table) = document.table("TASKACTV") else {
        return;
    };
    for row in &table.rows {
        let (Some(task_id), Some(code_id)) = (
            text(table, row, "task_id"),
            text(table, row, "actv_code_id"),
        ) else {
            continue;
        };
        schedule.task_activity_codes.push(TaskActivityCode {
            task_id,
            code_id,
            type_id: text(table, row, "actv_code_type_id").unwrap_or_default(),
            project_id: text(table, row, "proj_id").unwrap_or_default(),
        });
    }
}

fn cell<'a>(table: &XerTable, row: &'a [String], field: &str) -> Option<&'a str> {
    table.cell(row, field)
}

fn text(table: &XerTable, row: &[String], field: &str) -> Option<String> {
    table.cell(row, field).map(str::to_string)
}

fn date(table: &XerTable, row: &[String], field: &str) -> Option<NaiveDateTime> {
    let raw = table.cell(row, field)?;
    match NaiveDateTime::parse_from_str(raw, DATE_FORMAT) {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::debug!("unparseable date '{raw}' in field {field}, treating as absent");
            None
        }
    }
}

fn number(table: &XerTable, row: &[String], field: &str, default: f64) -> f64 {
    opt_number(table, row, field).unwrap_or(default)
}

fn opt_number(table: &XerTable, row: &[String], field: &str) -> Option<f64> {
    let raw = table.cell(row, field)?;
    match raw.trim().parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::debug!("unparseable number '{raw}' in field {field}");
            None
        }
    }
}

fn integer(table: &XerTable, row: &[String], field: &str, default: i64) -> i64 {
    match table.cell(row, field) {
        Some(raw) => raw.trim().parse::<i64>().unwrap_or_else(|_| {
            tracing::debug!("unparseable integer '{raw}' in field {field}");
            default
        }),
        None => default,
    }
}
