//! tron-core
//!
//! Board housekeeping for a Trello-style task board.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, task, interval, classification, errors）
//! - **recurrence**: `!repeat` ディレクティブの解析・分類・日次計画（純粋関数）
//! - **pipeline**: ステージ間移動の計画とやり残しレポート
//! - **ports**: 抽象化レイヤー（TaskBoard, ChatNotifier, ReportSender, Clock）
//! - **impls**: 実装（Trello, Slack, SMTP, in-memory, dry-run）
//! - **app**: ports を組み合わせた run（recur, advance, alert_failure）
//! - **config**: TOML 設定の読み込みと検証

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod pipeline;
pub mod ports;
pub mod recurrence;
