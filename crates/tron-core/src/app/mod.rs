//! App - アプリケーション層
//!
//! ports を組み合わせて 1 回の run を実行します。
//!
//! # 主要コンポーネント
//! - **AppBuilder**: 設定からのワイヤリングと起動時検証
//! - **App::recur**: `!repeat` タスクの再スケジュールと期限切れ通知
//! - **App::advance**: パイプラインのステージ移動とやり残しレポート
//! - **App::alert_failure**: 失敗時のメール通知

pub mod advance;
pub mod alert;
pub mod builder;
pub mod context;
pub mod notifications;
pub mod recurring;
pub mod report;

pub use self::alert::{FAILURE_SUBJECT, error_chain};
pub use self::builder::{App, AppBuilder, BuildError};
pub use self::context::RunContext;
pub use self::notifications::Notifications;
pub use self::report::{AdvanceReport, RecurringReport, TransitionOutcome, overdue_message};
