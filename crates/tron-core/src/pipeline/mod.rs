//! BoardPipelineMover - ステージのタスクを次のステージへ全件移動
//!
//! transition は単純な集合の移し替えです。判断するのは
//! 「移動前にやり残しレポートを送るか」だけで、transition ごとに設定します
//! （ふつうは weekly 側）。

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::domain::{Task, TaskId};

/// How often a transition fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    Daily,
    Weekly,
}

impl Cadence {
    pub fn as_str(self) -> &'static str {
        match self {
            Cadence::Daily => "daily",
            Cadence::Weekly => "weekly",
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cadence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(Cadence::Daily),
            "weekly" => Ok(Cadence::Weekly),
            other => Err(format!("unknown cadence {other:?} (expected daily or weekly)")),
        }
    }
}

/// One configured stage-to-stage move, e.g. "This Week" -> "Today" daily.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Transition {
    pub from: String,
    pub to: String,
    pub cadence: Cadence,
    #[serde(default)]
    pub report_leftovers: bool,
}

/// What a transition intends to do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovePlan {
    /// Every task at the source stage, in board order.
    pub moves: Vec<TaskId>,
    /// The same tasks when a leftover report is wanted, otherwise empty.
    pub leftovers: Vec<Task>,
}

pub fn decide_moves(stage_tasks: &[Task], report_leftovers: bool) -> MovePlan {
    MovePlan {
        moves: stage_tasks.iter().map(|t| t.id.clone()).collect(),
        leftovers: if report_leftovers {
            stage_tasks.to_vec()
        } else {
            Vec::new()
        },
    }
}

/// Plain-text body of a leftover report: one `- name` line per task.
pub fn leftover_report(from: &str, leftovers: &[Task]) -> String {
    let mut body = format!("Not finished in {from}:\n");
    for task in leftovers {
        body.push_str("- ");
        body.push_str(&task.name);
        body.push('\n');
    }
    body
}
