//! RecurrenceClassifier - 繰り返しタスク 1 件の判定
//!
//! # 設計原則
//! - 純粋関数：`now`、タスクのスナップショット、interval だけから判定する
//! - due の書き込みや通知は app 層の仕事
//! - 判定方針は `Classifier` trait で差し替えられる

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::domain::{Classification, IntervalSpec, Task};

/// Trait for deciding the action for a recurring task.
pub trait Classifier: Send + Sync {
    /// Only called for tasks whose description carries a valid directive.
    fn classify(&self, now: DateTime<Utc>, task: &Task, spec: &IntervalSpec) -> Classification;
}

/// Default decision table, evaluated in order:
///
/// 1. no due date          -> reschedule to `now + interval`
/// 2. completed            -> reschedule to `now + interval`
/// 3. due at or before now -> notify (overdue)
/// 4. otherwise            -> no action
///
/// Rule 2 precedes rule 3, so a completed task is never reported as overdue.
/// Rule 2 anchors on the run time rather than the real completion time; with a
/// daily trigger the two differ by at most a day.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultClassifier;

impl DefaultClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl Classifier for DefaultClassifier {
    fn classify(&self, now: DateTime<Utc>, task: &Task, spec: &IntervalSpec) -> Classification {
        match task.due {
            None => reschedule(now, task, spec),
            Some(_) if task.completed => reschedule(now, task, spec),
            Some(due) if due <= now => Classification::Notify {
                elapsed: spec.clone(),
            },
            Some(_) => Classification::NoAction,
        }
    }
}

fn reschedule(now: DateTime<Utc>, task: &Task, spec: &IntervalSpec) -> Classification {
    match spec.add_to(now) {
        Some(new_due) => Classification::Reschedule { new_due },
        None => {
            warn!(
                task_id = %task.id,
                interval = %spec,
                "next due date out of range, leaving task alone"
            );
            Classification::NoAction
        }
    }
}
