//! Classification - 1 回の run で繰り返しタスクに何をするか

use chrono::{DateTime, Utc};

use super::IntervalSpec;

/// The outcome of classifying one recurring task.
///
/// Exactly one variant per task per run. Pure data: applying it (writing the
/// due date, posting the notification) is the orchestrator's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Set the due date to `new_due` (first scheduling or completed task).
    Reschedule { new_due: DateTime<Utc> },

    /// The task is overdue and still open; surface it to a human.
    Notify { elapsed: IntervalSpec },

    NoAction,
}

impl Classification {
    pub fn is_no_action(&self) -> bool {
        matches!(self, Classification::NoAction)
    }
}
