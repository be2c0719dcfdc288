//! DryRun - 書き込み系の呼び出しをログに置き換えるデコレータ
//!
//! 読み取り（resolve_stage / fetch_tasks）はそのまま委譲し、
//! 書き込み・投稿・送信は「やったつもり」で Ok を返します。
//! 判定ロジックは dry-run でも本番と同じ経路を通ります。

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::{RemoteError, StageId, Task, TaskId};
use crate::ports::{ChatNotifier, ReportSender, TaskBoard};

pub struct DryRun<T: ?Sized> {
    inner: Arc<T>,
}

impl<T: ?Sized> DryRun<T> {
    pub fn new(inner: Arc<T>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: TaskBoard + ?Sized> TaskBoard for DryRun<T> {
    async fn resolve_stage(&self, board: &str, stage: &str) -> Result<StageId, RemoteError> {
        self.inner.resolve_stage(board, stage).await
    }

    async fn fetch_tasks(&self, stage: &StageId) -> Result<Vec<Task>, RemoteError> {
        self.inner.fetch_tasks(stage).await
    }

    async fn set_due_date(&self, task: &TaskId, due: DateTime<Utc>) -> Result<(), RemoteError> {
        info!(task_id = %task, %due, "[dry-run] would set due date");
        Ok(())
    }

    async fn move_task(&self, task: &TaskId, target: &StageId) -> Result<(), RemoteError> {
        info!(task_id = %task, target = %target, "[dry-run] would move task");
        Ok(())
    }
}

#[async_trait]
impl<T: ChatNotifier + ?Sized> ChatNotifier for DryRun<T> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn post_notification(&self, channel: &str, text: &str) -> Result<(), RemoteError> {
        info!(notifier = self.inner.name(), channel, text, "[dry-run] would post");
        Ok(())
    }
}

#[async_trait]
impl<T: ReportSender + ?Sized> ReportSender for DryRun<T> {
    async fn send_report(
        &self,
        recipient: &str,
        subject: &str,
        text: &str,
    ) -> Result<(), RemoteError> {
        info!(
            to = recipient,
            subject,
            lines = text.lines().count(),
            "[dry-run] would send report"
        );
        Ok(())
    }
}
