pub mod schedule_dag;
