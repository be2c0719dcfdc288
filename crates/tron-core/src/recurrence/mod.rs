//! Recurrence - 繰り返しタスクの判定エンジン
//!
//! # 構成
//! - **parser**: `!repeat` ディレクティブの解析
//! - **classifier**: 1 タスク分の判定（reschedule / notify / no action）
//! - **planner**: タスク一覧を判定して RunPlan に振り分ける
//!
//! ここにあるものはすべて純粋関数で、I/O は持ちません。

pub mod classifier;
pub mod parser;
pub mod planner;

pub use classifier::{Classifier, DefaultClassifier};
pub use parser::{MAX_COUNT, ParseOutcome, parse};
pub use planner::{DailyRunPlanner, OverdueTask, PlannedReschedule, RunPlan, SkippedTask};
