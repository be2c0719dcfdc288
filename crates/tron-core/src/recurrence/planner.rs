//! DailyRunPlanner - タスク一覧を解析・判定して振り分ける
//!
//! # フロー
//! 1. 説明文を parse（ディレクティブなしは無視、壊れたものは skipped へ）
//! 2. Classifier で判定
//! 3. reschedule / notify に入力順のまま追加

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::classifier::{Classifier, DefaultClassifier};
use super::parser::{ParseOutcome, parse};
use crate::domain::{Classification, IntervalSpec, ParseFailure, Task, TaskId};

/// A task whose due date should move to `new_due`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedReschedule {
    pub task: Task,
    pub new_due: DateTime<Utc>,
}

/// An open task that is past its due date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverdueTask {
    pub task: Task,
    pub elapsed: IntervalSpec,
}

/// A task with a `!repeat` directive that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedTask {
    pub task_id: TaskId,
    pub name: String,
    pub reason: ParseFailure,
}

/// Output of one planning pass. Each batch keeps input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunPlan {
    pub reschedule: Vec<PlannedReschedule>,
    pub notify: Vec<OverdueTask>,
    pub skipped: Vec<SkippedTask>,
}

impl RunPlan {
    pub fn is_empty(&self) -> bool {
        self.reschedule.is_empty() && self.notify.is_empty() && self.skipped.is_empty()
    }
}

/// Applies the parser and a [`Classifier`] to a task snapshot.
///
/// Tasks are independent: a malformed directive only lands in
/// [`RunPlan::skipped`] and never affects the other tasks.
#[derive(Debug, Clone, Default)]
pub struct DailyRunPlanner<C = DefaultClassifier> {
    classifier: C,
}

impl DailyRunPlanner {
    pub fn new() -> Self {
        Self {
            classifier: DefaultClassifier,
        }
    }
}

impl<C: Classifier> DailyRunPlanner<C> {
    pub fn with_classifier(classifier: C) -> Self {
        Self { classifier }
    }

    pub fn plan(&self, now: DateTime<Utc>, tasks: &[Task]) -> RunPlan {
        let mut plan = RunPlan::default();

        for task in tasks {
            let spec = match parse(&task.description) {
                ParseOutcome::NoDirective => continue,
                ParseOutcome::Malformed(reason) => {
                    warn!(
                        task_id = %task.id,
                        task = %task.name,
                        %reason,
                        "skipping malformed !repeat directive"
                    );
                    plan.skipped.push(SkippedTask {
                        task_id: task.id.clone(),
                        name: task.name.clone(),
                        reason,
                    });
                    continue;
                }
                ParseOutcome::Parsed(spec) => spec,
            };

            match self.classifier.classify(now, task, &spec) {
                Classification::Reschedule { new_due } => {
                    debug!(task_id = %task.id, %new_due, "reschedule");
                    plan.reschedule.push(PlannedReschedule {
                        task: task.clone(),
                        new_due,
                    });
                }
                Classification::Notify { elapsed } => {
                    debug!(task_id = %task.id, "overdue");
                    plan.notify.push(OverdueTask {
                        task: task.clone(),
                        elapsed,
                    });
                }
                Classification::NoAction => {}
            }
        }

        plan
    }
}
