//! In-memory ports - テスト用・ローカル実験用
//!
//! - **InMemoryBoard**: ステージごとにタスクを保持し、書き込みを記録する
//! - **RecordingNotifier**: 投稿を記録する（部分的な失敗を注入できる）
//! - **RecordingReporter**: 送信したレポートを記録する

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::{RemoteError, StageId, Task, TaskId};
use crate::ports::{ChatNotifier, ReportSender, TaskBoard};

const SERVICE: &str = "in-memory";

fn injected_failure() -> RemoteError {
    RemoteError::Status {
        service: SERVICE,
        status: 503,
        body: "injected failure".to_string(),
    }
}

#[derive(Default)]
struct BoardState {
    names: HashMap<(String, String), StageId>,
    stages: HashMap<StageId, Vec<Task>>,
    due_writes: Vec<(TaskId, DateTime<Utc>)>,
    moves: Vec<(TaskId, StageId)>,
    failing: HashSet<TaskId>,
}

#[derive(Default)]
pub struct InMemoryBoard {
    state: Mutex<BoardState>,
}

impl InMemoryBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a stage and its tasks; returns its id.
    pub async fn add_stage(&self, board: &str, stage: &str, tasks: Vec<Task>) -> StageId {
        let id = StageId::new(format!("{board}/{stage}"));
        let mut state = self.state.lock().await;
        state
            .names
            .insert((board.to_string(), stage.to_string()), id.clone());
        state.stages.insert(id.clone(), tasks);
        id
    }

    /// Make every write touching `task` fail with a `RemoteError`.
    pub async fn fail_writes_for(&self, task: impl Into<TaskId>) {
        self.state.lock().await.failing.insert(task.into());
    }

    pub async fn tasks_in(&self, stage: &StageId) -> Vec<Task> {
        self.state
            .lock()
            .await
            .stages
            .get(stage)
            .cloned()
            .unwrap_or_default()
    }

    /// Applied due-date writes, in call order.
    pub async fn due_writes(&self) -> Vec<(TaskId, DateTime<Utc>)> {
        self.state.lock().await.due_writes.clone()
    }

    /// Applied moves, in call order.
    pub async fn moves(&self) -> Vec<(TaskId, StageId)> {
        self.state.lock().await.moves.clone()
    }
}

#[async_trait]
impl TaskBoard for InMemoryBoard {
    async fn resolve_stage(&self, board: &str, stage: &str) -> Result<StageId, RemoteError> {
        self.state
            .lock()
            .await
            .names
            .get(&(board.to_string(), stage.to_string()))
            .cloned()
            .ok_or_else(|| RemoteError::NotFound {
                kind: "stage",
                name: format!("{board}/{stage}"),
            })
    }

    async fn fetch_tasks(&self, stage: &StageId) -> Result<Vec<Task>, RemoteError> {
        self.state
            .lock()
            .await
            .stages
            .get(stage)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound {
                kind: "stage",
                name: stage.to_string(),
            })
    }

    async fn set_due_date(&self, task: &TaskId, due: DateTime<Utc>) -> Result<(), RemoteError> {
        let mut state = self.state.lock().await;
        if state.failing.contains(task) {
            return Err(injected_failure());
        }
        let card = state
            .stages
            .values_mut()
            .flat_map(|tasks| tasks.iter_mut())
            .find(|t| t.id == *task)
            .ok_or_else(|| RemoteError::NotFound {
                kind: "task",
                name: task.to_string(),
            })?;
        card.due = Some(due);
        card.completed = false;
        state.due_writes.push((task.clone(), due));
        Ok(())
    }

    async fn move_task(&self, task: &TaskId, target: &StageId) -> Result<(), RemoteError> {
        let mut state = self.state.lock().await;
        if state.failing.contains(task) {
            return Err(injected_failure());
        }
        if !state.stages.contains_key(target) {
            return Err(RemoteError::NotFound {
                kind: "stage",
                name: target.to_string(),
            });
        }

        let mut moved = None;
        for tasks in state.stages.values_mut() {
            if let Some(pos) = tasks.iter().position(|t| t.id == *task) {
                moved = Some(tasks.remove(pos));
                break;
            }
        }
        let card = moved.ok_or_else(|| RemoteError::NotFound {
            kind: "task",
            name: task.to_string(),
        })?;

        state.stages.entry(target.clone()).or_default().push(card);
        state.moves.push((task.clone(), target.clone()));
        Ok(())
    }
}

/// Records every post; texts containing a configured pattern fail instead.
#[derive(Default)]
pub struct RecordingNotifier {
    posts: Mutex<Vec<(String, String)>>,
    fail_matching: Option<String>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_matching(pattern: impl Into<String>) -> Self {
        Self {
            posts: Mutex::default(),
            fail_matching: Some(pattern.into()),
        }
    }

    /// Successful posts as `(channel, text)`.
    pub async fn posts(&self) -> Vec<(String, String)> {
        self.posts.lock().await.clone()
    }
}

#[async_trait]
impl ChatNotifier for RecordingNotifier {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn post_notification(&self, channel: &str, text: &str) -> Result<(), RemoteError> {
        if let Some(pattern) = &self.fail_matching
            && text.contains(pattern.as_str())
        {
            return Err(injected_failure());
        }
        self.posts
            .lock()
            .await
            .push((channel.to_string(), text.to_string()));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentReport {
    pub recipient: String,
    pub subject: String,
    pub text: String,
}

#[derive(Default)]
pub struct RecordingReporter {
    sent: Mutex<Vec<SentReport>>,
    failing: bool,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::default(),
            failing: true,
        }
    }

    pub async fn sent(&self) -> Vec<SentReport> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl ReportSender for RecordingReporter {
    async fn send_report(
        &self,
        recipient: &str,
        subject: &str,
        text: &str,
    ) -> Result<(), RemoteError> {
        if self.failing {
            return Err(injected_failure());
        }
        self.sent.lock().await.push(SentReport {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }
}
