//! AppBuilder - アプリケーションの構築とワイヤリング
//!
//! - 設定から本番用の ports（Trello / Slack / SMTP）を組み立てる
//! - テストでは in-memory の ports を差し込む
//! - 起動時検証（Fail-fast 設計）：run の途中で設定不備に気付かない

use std::sync::Arc;

use crate::config::TronConfig;
use crate::impls::{DryRun, TrelloBoard};
use crate::pipeline::Transition;
use crate::ports::{ChatNotifier, ReportSender, TaskBoard};
use crate::recurrence::DailyRunPlanner;

use super::{Notifications, RunContext};

/// AppBuilder はアプリケーションを構築
///
/// # 使用例
/// ```ignore
/// let app = AppBuilder::new()
///     .board(Arc::new(InMemoryBoard::new()), "Home")
///     .recurring_stages(["Today"])
///     .build()?;
/// ```
pub struct AppBuilder {
    board: Option<Arc<dyn TaskBoard>>,
    board_name: String,
    notifications: Notifications,
    recurring_stages: Vec<String>,
    pipeline: Vec<Transition>,
}

/// BuildError はアプリケーション構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no task board configured")]
    MissingBoard,

    #[error("board name must not be empty")]
    EmptyBoardName,

    #[error("nothing to do: no recurring stages and no pipeline transitions")]
    NothingToDo,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            board: None,
            board_name: String::new(),
            notifications: Notifications::disabled(),
            recurring_stages: Vec::new(),
            pipeline: Vec::new(),
        }
    }

    /// Wire the production adapters described by `config`.
    ///
    /// `[slack]` and `[email]` are optional; when absent the matching
    /// channel stays disabled.
    pub fn from_config(config: &TronConfig) -> Self {
        let board = TrelloBoard::new(&config.trello.app_key, &config.trello.token);
        let mut builder = Self::new()
            .board(Arc::new(board), &config.trello.board)
            .recurring_stages(config.recurring.stages.iter().cloned())
            .pipeline(config.pipeline.iter().cloned());
        builder.notifications = Notifications::from_config(config);
        builder
    }

    pub fn board(mut self, board: Arc<dyn TaskBoard>, name: impl Into<String>) -> Self {
        self.board = Some(board);
        self.board_name = name.into();
        self
    }

    pub fn chat(mut self, notifier: Arc<dyn ChatNotifier>, channel: impl Into<String>) -> Self {
        self.notifications = self.notifications.with_chat(notifier, channel);
        self
    }

    pub fn reports(mut self, sender: Arc<dyn ReportSender>, recipient: impl Into<String>) -> Self {
        self.notifications = self.notifications.with_report(sender, recipient);
        self
    }

    pub fn recurring_stages<S: Into<String>>(
        mut self,
        stages: impl IntoIterator<Item = S>,
    ) -> Self {
        self.recurring_stages = stages.into_iter().map(Into::into).collect();
        self
    }

    pub fn pipeline(mut self, transitions: impl IntoIterator<Item = Transition>) -> Self {
        self.pipeline = transitions.into_iter().collect();
        self
    }

    /// # 検証
    /// - board が設定されているか
    /// - recurring / pipeline のどちらかに仕事があるか
    pub fn build(self) -> Result<App, BuildError> {
        let board = self.board.ok_or(BuildError::MissingBoard)?;
        if self.board_name.trim().is_empty() {
            return Err(BuildError::EmptyBoardName);
        }
        if self.recurring_stages.is_empty() && self.pipeline.is_empty() {
            return Err(BuildError::NothingToDo);
        }
        Ok(App {
            board,
            board_name: self.board_name,
            notifications: self.notifications,
            recurring_stages: self.recurring_stages,
            pipeline: self.pipeline,
            planner: DailyRunPlanner::new(),
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// App は 1 回の run を実行する
///
/// 状態は持たず、`RunContext` を受け取って ports 経由で読み書きします。
pub struct App {
    pub(super) board: Arc<dyn TaskBoard>,
    pub(super) board_name: String,
    pub(super) notifications: Notifications,
    pub(super) recurring_stages: Vec<String>,
    pub(super) pipeline: Vec<Transition>,
    pub(super) planner: DailyRunPlanner,
}

impl App {
    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    /// Board and notifications for this run; dry-run swaps in the decorators.
    pub(super) fn ports_for(&self, ctx: &RunContext) -> (Arc<dyn TaskBoard>, Notifications) {
        if !ctx.dry_run {
            return (Arc::clone(&self.board), self.notifications.clone());
        }
        let board: Arc<dyn TaskBoard> = Arc::new(DryRun::new(Arc::clone(&self.board)));
        (board, self.notifications.dry_run())
    }
}
