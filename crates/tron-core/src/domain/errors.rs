//! Errors - エラー型と分類
//!
//! - `ParseFailure`: タスク単位。握りつぶしてスキップ一覧に載せる
//! - `RemoteError`: 外部 I/O の失敗。現在の run を中断する
//! - `ConfigError`: 起動時のみ。run の途中では発生しない

use std::path::PathBuf;

use thiserror::Error;

use super::IntervalUnit;

/// Why a `!repeat` directive could not be turned into an interval.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("no interval after !repeat")]
    EmptyInterval,

    #[error("empty clause in interval")]
    EmptyClause,

    #[error("invalid count {0:?}")]
    InvalidCount(String),

    #[error("count must be positive")]
    ZeroCount,

    #[error("{count} {unit} is out of range (max {max})")]
    CountOutOfRange {
        unit: IntervalUnit,
        count: u64,
        max: u32,
    },

    #[error("unknown interval unit {0:?}")]
    UnknownUnit(String),

    #[error("unrecognised clause {0:?}")]
    UnrecognisedClause(String),
}

/// Failure at the board / chat / mail boundary.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} returned {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("{service} API error: {message}")]
    Api {
        service: &'static str,
        message: String,
    },

    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("email delivery failed: {0}")]
    Mail(String),
}

/// Missing or invalid configuration (fatal at startup).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("missing required config key `{0}`")]
    Missing(&'static str),

    #[error("invalid config key `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// TronError はトップレベルのエラー（CLI が一度だけ捕まえて通知する）
#[derive(Debug, Error)]
pub enum TronError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}
