//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 各 trait は外部システム（Trello, Slack, SMTP）への
//! インターフェースを提供し、実装の詳細を隠蔽します。
//!
//! # 設計原則
//! - ボードが source of truth（正本）。プロセス内に状態は持たない
//! - コアの判定ロジックは ports にしか依存しない
//! - dry-run は ports のデコレータで実現する（impls::dry_run）

pub mod clock;
pub mod notifier;
pub mod reporter;
pub mod task_board;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::notifier::ChatNotifier;
pub use self::reporter::ReportSender;
pub use self::task_board::TaskBoard;
