//! Clock port - 時刻の抽象化
//!
//! run の "now" は起動時に一度だけ読み、以降は RunContext で持ち回ります。

use chrono::{DateTime, Utc};

/// Clock は現在時刻を提供
///
/// # テスト容易性
/// - trait により時刻を差し替え可能
/// - テストでは FixedClock を使用
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// 本番用
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// テスト用・`--now` 指定用の固定時刻
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    at: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { at }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.at
    }
}
