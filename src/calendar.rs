use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Working-time calendar from the CALENDAR table.
///
/// Calendars are carried on the schedule for hosts that need them; the CPM
/// engine does not consult them and works on the fixed 8-hour day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkCalendar {
    pub id: String,
    pub name: String,
    pub project_id: Option<String>,
    pub is_default: bool,
    pub hours_per_day: f64,
    pub hours_per_week: f64,
    pub hours_per_month: f64,
    pub hours_per_year: f64,
    pub work_days: Vec<Weekday>,
}

impl WorkCalendar {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            project_id: None,
            is_default: false,
            hours_per_day: 8.0,
            hours_per_week: 40.0,
            hours_per_month: 172.0,
            hours_per_year: 2080.0,
            work_days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
        }
    }

    pub fn is_work_day(&self, day: Weekday) -> bool {
        self.work_days.contains(&day)
    }
}

/// Date-specific override on a calendar. Zero hours worked marks a holiday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarException {
    pub calendar_id: String,
    pub date: NaiveDate,
    pub hours_worked: f64,
}

impl CalendarException {
    pub fn is_holiday(&self) -> bool {
        self.hours_worked == 0.0
    }
}
