use chrono::{DateTime, Utc};

use super::TaskId;

/// Snapshot of one task as fetched from the board.
///
/// The core never writes to a `Task`; it only computes intended changes
/// that the caller applies through [`TaskBoard`](crate::ports::TaskBoard).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub description: String,
    /// `None` means "no due date yet".
    pub due: Option<DateTime<Utc>>,
    pub completed: bool,
}

impl Task {
    pub fn new(id: impl Into<TaskId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            due: None,
            completed: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_due(mut self, due: DateTime<Utc>) -> Self {
        self.due = Some(due);
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}
