//! Pipeline advance - ステージ間のタスク移動
//!
//! # フロー
//! 1. cadence が一致する transition の移動元を設定順にすべて取得（スナップショット）
//! 2. スナップショットから transition ごとの移動計画を作る
//! 3. report_leftovers なら移動前にやり残しレポートを送る（失敗はログのみ）
//! 4. 計画どおりに移動先へ移動（失敗したら run を中断）
//!
//! 連鎖した transition（Today -> This Week -> Someday）でも、
//! 1 回の run で動くのは 1 段だけです。

use tracing::{error, info};

use crate::domain::{RemoteError, StageId};
use crate::pipeline::{Cadence, MovePlan, Transition, decide_moves, leftover_report};

use super::report::{AdvanceReport, TransitionOutcome};
use super::{App, RunContext};

struct PlannedTransition<'a> {
    transition: &'a Transition,
    to: StageId,
    plan: MovePlan,
}

impl App {
    pub async fn advance(
        &self,
        ctx: &RunContext,
        cadence: Cadence,
    ) -> Result<AdvanceReport, RemoteError> {
        let (board, notifications) = self.ports_for(ctx);

        // every read happens before the first move
        let mut planned = Vec::new();
        for transition in self.pipeline.iter().filter(|t| t.cadence == cadence) {
            let from = board.resolve_stage(&self.board_name, &transition.from).await?;
            let to = board.resolve_stage(&self.board_name, &transition.to).await?;
            let tasks = board.fetch_tasks(&from).await?;
            planned.push(PlannedTransition {
                transition,
                to,
                plan: decide_moves(&tasks, transition.report_leftovers),
            });
        }

        let mut transitions = Vec::new();
        for PlannedTransition {
            transition,
            to,
            plan,
        } in planned
        {
            let mut reported = false;
            if !plan.leftovers.is_empty() {
                let subject = format!(
                    "tron: {} unfinished in {}",
                    plan.leftovers.len(),
                    transition.from
                );
                let body = leftover_report(&transition.from, &plan.leftovers);
                match notifications.report(&subject, &body).await {
                    Ok(sent) => reported = sent,
                    Err(e) => error!(
                        from = %transition.from,
                        error = %e,
                        "failed to send leftover report"
                    ),
                }
            }

            for task in &plan.moves {
                board.move_task(task, &to).await?;
            }
            info!(
                from = %transition.from,
                to = %transition.to,
                moved = plan.moves.len(),
                %cadence,
                "advanced stage"
            );

            transitions.push(TransitionOutcome {
                from: transition.from.clone(),
                to: transition.to.clone(),
                moved: plan.moves.len(),
                reported,
            });
        }

        Ok(AdvanceReport {
            cadence,
            transitions,
            dry_run: ctx.dry_run,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};

    use crate::app::AppBuilder;
    use crate::domain::{Task, TaskId};
    use crate::impls::{InMemoryBoard, RecordingReporter};
    use crate::ports::TaskBoard;

    use super::*;

    fn ctx() -> RunContext {
        RunContext::new(Utc.with_ymd_and_hms(2024, 5, 12, 18, 0, 0).unwrap())
    }

    fn transition(from: &str, to: &str, cadence: Cadence, report: bool) -> Transition {
        Transition {
            from: from.into(),
            to: to.into(),
            cadence,
            report_leftovers: report,
        }
    }

    struct Fixture {
        board: Arc<InMemoryBoard>,
        mail: Arc<RecordingReporter>,
        app: App,
    }

    async fn fixture(mail: RecordingReporter) -> Fixture {
        let board = Arc::new(InMemoryBoard::new());
        board
            .add_stage(
                "Home",
                "Today",
                vec![Task::new("t1", "Write report"), Task::new("t2", "Call plumber")],
            )
            .await;
        board
            .add_stage("Home", "This Week", vec![Task::new("w1", "Book flights")])
            .await;
        board.add_stage("Home", "Someday", vec![]).await;

        let mail = Arc::new(mail);
        let app = AppBuilder::new()
            .board(board.clone(), "Home")
            .reports(mail.clone(), "me@example.com")
            .pipeline([
                transition("This Week", "Today", Cadence::Daily, false),
                transition("Today", "Someday", Cadence::Weekly, true),
            ])
            .build()
            .unwrap();
        Fixture { board, mail, app }
    }

    #[tokio::test]
    async fn daily_moves_without_report() {
        let f = fixture(RecordingReporter::new()).await;

        let report = f.app.advance(&ctx(), Cadence::Daily).await.unwrap();

        assert_eq!(report.transitions.len(), 1);
        assert_eq!(report.transitions[0].moved, 1);
        assert!(!report.transitions[0].reported);
        let today = f.board.resolve_stage("Home", "Today").await.unwrap();
        assert_eq!(f.board.tasks_in(&today).await.len(), 3);
        assert!(f.mail.sent().await.is_empty());
    }

    #[tokio::test]
    async fn weekly_reports_leftovers_before_moving() {
        let f = fixture(RecordingReporter::new()).await;

        let report = f.app.advance(&ctx(), Cadence::Weekly).await.unwrap();

        assert!(report.transitions[0].reported);
        let sent = f.mail.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient, "me@example.com");
        assert_eq!(sent[0].subject, "tron: 2 unfinished in Today");
        assert!(sent[0].text.contains("- Write report"));
        assert_eq!(f.board.moves().await.len(), 2);
    }

    #[tokio::test]
    async fn report_failure_does_not_block_the_move() {
        let f = fixture(RecordingReporter::failing()).await;

        let report = f.app.advance(&ctx(), Cadence::Weekly).await.unwrap();

        assert!(!report.transitions[0].reported);
        assert_eq!(report.transitions[0].moved, 2);
    }

    #[tokio::test]
    async fn dry_run_moves_nothing() {
        let f = fixture(RecordingReporter::new()).await;

        let report = f
            .app
            .advance(&ctx().with_dry_run(true), Cadence::Weekly)
            .await
            .unwrap();

        assert_eq!(report.transitions[0].moved, 2);
        assert!(f.board.moves().await.is_empty());
        assert!(f.mail.sent().await.is_empty());
    }

    #[tokio::test]
    async fn failed_move_aborts() {
        let f = fixture(RecordingReporter::new()).await;
        f.board.fail_writes_for("t2").await;

        let err = f.app.advance(&ctx(), Cadence::Weekly).await.unwrap_err();

        assert!(matches!(err, RemoteError::Status { .. }));
        assert_eq!(f.board.moves().await.len(), 1);
    }

    #[tokio::test]
    async fn chained_transitions_move_one_step_per_run() {
        let board = Arc::new(InMemoryBoard::new());
        let today = board
            .add_stage("Home", "Today", vec![Task::new("t1", "Write report")])
            .await;
        let week = board
            .add_stage("Home", "This Week", vec![Task::new("w1", "Book flights")])
            .await;
        let someday = board.add_stage("Home", "Someday", vec![]).await;
        let app = AppBuilder::new()
            .board(board.clone(), "Home")
            .pipeline([
                transition("Today", "This Week", Cadence::Weekly, false),
                transition("This Week", "Someday", Cadence::Weekly, false),
            ])
            .build()
            .unwrap();

        let dry = app
            .advance(&ctx().with_dry_run(true), Cadence::Weekly)
            .await
            .unwrap();
        let real = app.advance(&ctx(), Cadence::Weekly).await.unwrap();

        let moved = |r: &AdvanceReport| r.transitions.iter().map(|t| t.moved).collect::<Vec<_>>();
        assert_eq!(moved(&dry), vec![1, 1]);
        assert_eq!(moved(&dry), moved(&real));

        assert!(board.tasks_in(&today).await.is_empty());
        let ids = |tasks: Vec<Task>| tasks.into_iter().map(|t| t.id).collect::<Vec<_>>();
        assert_eq!(ids(board.tasks_in(&week).await), vec![TaskId::new("t1")]);
        assert_eq!(ids(board.tasks_in(&someday).await), vec![TaskId::new("w1")]);
    }
}
