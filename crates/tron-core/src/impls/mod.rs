//! Impls - ports の実装
//!
//! # 本番用
//! - **TrelloBoard**: Trello REST API
//! - **SlackNotifier**: Slack chat.postMessage
//! - **SmtpReporter**: SMTP (lettre)
//!
//! # 開発用・テスト用
//! - **InMemoryBoard / RecordingNotifier / RecordingReporter**
//! - **DryRun**: 書き込みをログに置き換えるデコレータ

pub mod dry_run;
pub mod inmem;
pub mod slack;
pub mod smtp;
pub mod trello;

// 主要な型を再エクスポート
pub use self::dry_run::DryRun;
pub use self::inmem::{InMemoryBoard, RecordingNotifier, RecordingReporter, SentReport};
pub use self::slack::SlackNotifier;
pub use self::smtp::SmtpReporter;
pub use self::trello::TrelloBoard;
