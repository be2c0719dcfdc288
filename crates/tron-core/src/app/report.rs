//! Report - run の結果をテキストで表す

use std::fmt;

use crate::pipeline::Cadence;
use crate::recurrence::{OverdueTask, RunPlan};

/// Result of a recurring pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecurringReport {
    pub plan: RunPlan,
    /// Overdue notifications that reached the chat channel.
    pub delivered: usize,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub from: String,
    pub to: String,
    pub moved: usize,
    pub reported: bool,
}

/// Result of a pipeline advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvanceReport {
    pub cadence: Cadence,
    pub transitions: Vec<TransitionOutcome>,
    pub dry_run: bool,
}

/// Chat line for an overdue recurring task.
pub fn overdue_message(overdue: &OverdueTask) -> String {
    let task = &overdue.task;
    match task.due {
        Some(due) => format!(
            "Overdue: {} (due {} UTC, repeats every {})",
            task.name,
            due.format("%Y-%m-%d %H:%M"),
            overdue.elapsed
        ),
        None => format!("Overdue: {} (repeats every {})", task.name, overdue.elapsed),
    }
}

fn prefix(dry_run: bool) -> &'static str {
    if dry_run { "[dry-run] " } else { "" }
}

impl fmt::Display for RecurringReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = prefix(self.dry_run);
        writeln!(
            f,
            "{p}rescheduled {}, overdue {} ({} notified), skipped {}",
            self.plan.reschedule.len(),
            self.plan.notify.len(),
            self.delivered,
            self.plan.skipped.len()
        )?;
        for r in &self.plan.reschedule {
            writeln!(f, "  reschedule {} -> {}", r.task.name, r.new_due.format("%Y-%m-%d %H:%M"))?;
        }
        for o in &self.plan.notify {
            writeln!(f, "  {}", overdue_message(o))?;
        }
        for s in &self.plan.skipped {
            writeln!(f, "  skipped {}: {}", s.name, s.reason)?;
        }
        Ok(())
    }
}

impl fmt::Display for AdvanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = prefix(self.dry_run);
        if self.transitions.is_empty() {
            return writeln!(f, "{p}no {} transitions configured", self.cadence);
        }
        for t in &self.transitions {
            write!(f, "{p}{} -> {}: moved {}", t.from, t.to, t.moved)?;
            if t.reported {
                write!(f, " (leftover report sent)")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IntervalSpec, IntervalUnit, Task};
    use chrono::{TimeZone, Utc};

    #[test]
    fn overdue_line() {
        let overdue = OverdueTask {
            task: Task::new("c", "Pay rent")
                .with_due(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()),
            elapsed: IntervalSpec::new(IntervalUnit::Months, 1).unwrap(),
        };
        assert_eq!(
            overdue_message(&overdue),
            "Overdue: Pay rent (due 2024-05-01 09:00 UTC, repeats every 1 month)"
        );
    }

    #[test]
    fn advance_summary() {
        let report = AdvanceReport {
            cadence: Cadence::Weekly,
            transitions: vec![TransitionOutcome {
                from: "Today".into(),
                to: "Someday".into(),
                moved: 3,
                reported: true,
            }],
            dry_run: true,
        };
        assert_eq!(
            report.to_string(),
            "[dry-run] Today -> Someday: moved 3 (leftover report sent)\n"
        );
    }
}
