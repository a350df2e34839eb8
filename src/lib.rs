pub mod activity_code;
pub mod analysis;
pub mod calculations;
pub mod calendar;
pub mod error;
pub mod graph;
pub mod import;
pub mod msproject;
pub mod persistence;
pub mod project;
pub mod relationship;
pub mod resource;
pub mod schedule;
pub mod task;
pub mod wbs;
pub mod xer;

pub use activity_code::{ActivityCode, ActivityCodeScope, ActivityCodeType, TaskActivityCode};
pub use analysis::{
    CriticalPathSummary, DcmaAssessment, DcmaCheck, FloatAnalysis, LogicCheck, ResourceUtilization,
    ScheduleAnalyzer, TaskGrouping,
};
pub use calendar::{CalendarException, WorkCalendar};
pub use error::{ImportError, ImportResult};
pub use import::{detect_format, import_schedule, SourceFormat};
pub use persistence::{
    load_schedule_from_json, save_schedule_to_json, save_tasks_to_csv, PersistenceError,
};
pub use project::Project;
pub use relationship::{Relationship, RelationshipType};
pub use resource::{Resource, ResourceAssignment, ResourceType};
pub use schedule::{Diagnostic, DiagnosticKind, RecalcSummary, Schedule, HOURS_PER_DAY};
pub use task::{Task, TaskStatus, TaskType};
pub use wbs::WbsElement;
