//! Service layer shared by the REST handlers and the Discord commands.

pub mod planner;

pub use planner::{Planner, PlannedTasks, TaskOverrides};
