//! TaskBoard port - タスクボード（Trello など）が実装する正本
//!
//! コアはタスクを直接書き換えません。planner が作った「意図」を
//! app 層がこの trait 経由で反映します。

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{RemoteError, StageId, Task, TaskId};

/// TaskBoard はタスクの読み書きを提供
///
/// # 設計原則
/// - 読み取りはステージ単位のスナップショット
/// - 書き込みは冪等（同じ値で二回呼んでも結果は同じ）
/// - 失敗は `RemoteError` で返し、リトライはしない
#[async_trait]
pub trait TaskBoard: Send + Sync {
    /// Look a stage up by board name and stage name.
    async fn resolve_stage(&self, board: &str, stage: &str) -> Result<StageId, RemoteError>;

    async fn fetch_tasks(&self, stage: &StageId) -> Result<Vec<Task>, RemoteError>;

    /// Set a new due date and mark the task as not completed, so the next
    /// run sees an open task rather than rescheduling it again.
    async fn set_due_date(&self, task: &TaskId, due: DateTime<Utc>) -> Result<(), RemoteError>;

    async fn move_task(&self, task: &TaskId, target: &StageId) -> Result<(), RemoteError>;
}
