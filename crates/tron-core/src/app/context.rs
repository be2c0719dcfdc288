//! RunContext - 1 回の run で共有する値
//!
//! "now" は run の開始時に一度だけ決め、途中で読み直しません。
//! 同じ now と同じスナップショットなら、何度実行しても同じ判定になります。

use chrono::{DateTime, Utc};

use crate::ports::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunContext {
    pub now: DateTime<Utc>,
    /// When set, every write/post/send is logged instead of performed.
    pub dry_run: bool,
}

impl RunContext {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            dry_run: false,
        }
    }

    pub fn from_clock(clock: &dyn Clock) -> Self {
        Self::new(clock.now())
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}
