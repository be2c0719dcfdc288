//! Recurring pass - `!repeat` タスクの再スケジュールと期限切れ通知
//!
//! # フロー
//! 1. 対象ステージを名前で解決し、タスクのスナップショットを取得
//! 2. DailyRunPlanner で reschedule / notify / skipped に振り分け
//! 3. reschedule を TaskBoard に反映（失敗したら run を中断）
//! 4. notify をチャットに投稿（失敗してもログだけ残して続行）

use tracing::{info, warn};

use crate::domain::RemoteError;

use super::report::{RecurringReport, overdue_message};
use super::{App, RunContext};

impl App {
    pub async fn recur(&self, ctx: &RunContext) -> Result<RecurringReport, RemoteError> {
        let (board, notifications) = self.ports_for(ctx);

        let mut tasks = Vec::new();
        for stage in &self.recurring_stages {
            let stage_id = board.resolve_stage(&self.board_name, stage).await?;
            let fetched = board.fetch_tasks(&stage_id).await?;
            info!(stage = %stage, count = fetched.len(), "fetched tasks");
            tasks.extend(fetched);
        }

        let plan = self.planner.plan(ctx.now, &tasks);

        // Writes already applied stay applied if a later one fails;
        // re-running with the same snapshot is safe.
        for item in &plan.reschedule {
            board.set_due_date(&item.task.id, item.new_due).await?;
            info!(
                task_id = %item.task.id,
                task = %item.task.name,
                new_due = %item.new_due,
                "rescheduled"
            );
        }

        let mut delivered = 0;
        for overdue in &plan.notify {
            if notifications.post(&overdue_message(overdue)).await {
                delivered += 1;
            }
        }

        if !plan.skipped.is_empty() {
            warn!(
                count = plan.skipped.len(),
                "tasks with malformed !repeat directives were skipped"
            );
        }

        Ok(RecurringReport {
            plan,
            delivered,
            dry_run: ctx.dry_run,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{DateTime, Duration, TimeZone, Utc};

    use crate::app::AppBuilder;
    use crate::domain::{Task, TaskId};
    use crate::impls::{InMemoryBoard, RecordingNotifier};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 6, 0, 0).unwrap()
    }

    async fn board() -> Arc<InMemoryBoard> {
        let board = Arc::new(InMemoryBoard::new());
        board
            .add_stage(
                "Home",
                "Today",
                vec![
                    Task::new("a", "Clean filter").with_description("!repeat every 3 days"),
                    Task::new("c", "Pay rent")
                        .with_description("!repeat every month")
                        .with_due(now() - Duration::hours(1)),
                ],
            )
            .await;
        board
            .add_stage(
                "Home",
                "This Week",
                vec![
                    Task::new("e", "Stretch")
                        .with_description("!repeat every day")
                        .with_due(now() - Duration::days(9))
                        .with_completed(true),
                    Task::new("d", "Sync").with_description("!repeat every fortnight"),
                    Task::new("g", "Water cactus")
                        .with_description("!repeat every 2 weeks")
                        .with_due(now() - Duration::days(3)),
                ],
            )
            .await;
        board
    }

    fn app(board: Arc<InMemoryBoard>, chat: Arc<RecordingNotifier>) -> App {
        AppBuilder::new()
            .board(board, "Home")
            .chat(chat, "#chores")
            .recurring_stages(["Today", "This Week"])
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn applies_reschedules_and_posts_overdue() {
        let board = board().await;
        let chat = Arc::new(RecordingNotifier::new());

        let report = app(board.clone(), chat.clone())
            .recur(&RunContext::new(now()))
            .await
            .unwrap();

        assert_eq!(
            board.due_writes().await,
            vec![
                (TaskId::new("a"), now() + Duration::days(3)),
                (TaskId::new("e"), now() + Duration::days(1)),
            ]
        );
        let posts = chat.posts().await;
        assert_eq!(posts.len(), 2);
        assert!(posts[0].1.starts_with("Overdue: Pay rent"));
        assert!(posts[1].1.starts_with("Overdue: Water cactus"));
        assert_eq!(report.delivered, 2);
        assert_eq!(report.plan.skipped.len(), 1);
    }

    #[tokio::test]
    async fn second_run_on_the_same_day_changes_nothing_new() {
        let board = board().await;
        let chat = Arc::new(RecordingNotifier::new());
        let app = app(board.clone(), chat);
        let ctx = RunContext::new(now());

        app.recur(&ctx).await.unwrap();
        let second = app.recur(&ctx).await.unwrap();

        // rescheduled tasks are now open and due in the future
        assert!(second.plan.reschedule.is_empty());
        assert_eq!(second.plan.notify.len(), 2);
        assert_eq!(board.due_writes().await.len(), 2);
    }

    #[tokio::test]
    async fn dry_run_plans_the_same_but_writes_nothing() {
        let board = board().await;
        let chat = Arc::new(RecordingNotifier::new());
        let app = app(board.clone(), chat.clone());

        let dry = app.recur(&RunContext::new(now()).with_dry_run(true)).await.unwrap();
        assert!(board.due_writes().await.is_empty());
        assert!(chat.posts().await.is_empty());

        let real = app.recur(&RunContext::new(now())).await.unwrap();
        assert_eq!(dry.plan, real.plan);
        assert!(dry.dry_run);
    }

    #[tokio::test]
    async fn failing_chat_post_does_not_stop_the_others() {
        let board = board().await;
        let chat = Arc::new(RecordingNotifier::fail_matching("Pay rent"));

        let report = app(board, chat.clone())
            .recur(&RunContext::new(now()))
            .await
            .unwrap();

        assert_eq!(report.plan.notify.len(), 2);
        assert_eq!(report.delivered, 1);
        assert!(chat.posts().await[0].1.contains("Water cactus"));
    }

    #[tokio::test]
    async fn remote_error_aborts_the_run() {
        let board = board().await;
        board.fail_writes_for("e").await;
        let chat = Arc::new(RecordingNotifier::new());

        let err = app(board.clone(), chat.clone())
            .recur(&RunContext::new(now()))
            .await
            .unwrap_err();

        assert!(matches!(err, RemoteError::Status { status: 503, .. }));
        // "a" was written before the failure and stays written
        assert_eq!(board.due_writes().await.len(), 1);
        assert!(chat.posts().await.is_empty());
    }

    #[tokio::test]
    async fn unknown_stage_is_a_remote_error() {
        let board = Arc::new(InMemoryBoard::new());
        let app = AppBuilder::new()
            .board(board, "Home")
            .recurring_stages(["Nowhere"])
            .build()
            .unwrap();

        let err = app.recur(&RunContext::new(now())).await.unwrap_err();
        assert!(matches!(err, RemoteError::NotFound { kind: "stage", .. }));
    }
}
