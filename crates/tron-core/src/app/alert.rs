//! Failure alert - 失敗した run が終了前に送るメール

use std::error::Error;
use std::fmt::Write;

use tracing::{error, warn};

use super::{App, Notifications, RunContext};

pub const FAILURE_SUBJECT: &str = "tron: run failed";

/// `error` and its `source()` chain, one cause per line.
pub fn error_chain(error: &dyn Error) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let _ = write!(text, "\ncaused by: {cause}");
        source = cause.source();
    }
    text
}

impl Notifications {
    /// Mail the error chain to the report recipient.
    ///
    /// Usable before an [`App`] exists, e.g. when wiring fails after the
    /// config loaded. Returns whether an alert went out; a failing alert is
    /// only logged.
    pub async fn alert_failure(&self, ctx: &RunContext, failure: &dyn Error) -> bool {
        let notifications = if ctx.dry_run {
            self.dry_run()
        } else {
            self.clone()
        };
        let body = format!(
            "run at {} failed:\n\n{}",
            ctx.now.format("%Y-%m-%d %H:%M UTC"),
            error_chain(failure)
        );
        match notifications.report(FAILURE_SUBJECT, &body).await {
            Ok(sent) => {
                if !sent {
                    warn!("no report recipient configured, failure alert not sent");
                }
                sent
            }
            Err(e) => {
                error!(error = %e, "failed to send failure alert");
                false
            }
        }
    }
}

impl App {
    pub async fn alert_failure(&self, ctx: &RunContext, failure: &dyn Error) -> bool {
        self.notifications.alert_failure(ctx, failure).await
    }
}
