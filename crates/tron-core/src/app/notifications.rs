//! Notifications - チャット通知とレポート送信の束
//!
//! 設定がない経路は黙って無効になります（エラーにはしない）。

use std::sync::Arc;

use tracing::{debug, error};

use crate::config::TronConfig;
use crate::domain::RemoteError;
use crate::impls::{DryRun, SlackNotifier, SmtpReporter};
use crate::ports::{ChatNotifier, ReportSender};

#[derive(Clone)]
struct ChatTarget {
    notifier: Arc<dyn ChatNotifier>,
    channel: String,
}

#[derive(Clone)]
struct ReportTarget {
    sender: Arc<dyn ReportSender>,
    recipient: String,
}

/// Optional chat channel plus optional report recipient.
#[derive(Clone, Default)]
pub struct Notifications {
    chat: Option<ChatTarget>,
    report: Option<ReportTarget>,
}

impl Notifications {
    /// Both channels off.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Production channels for `config`: Slack when `[slack]` has a channel,
    /// SMTP when `[email]` is present.
    pub fn from_config(config: &TronConfig) -> Self {
        let mut notifications = Self::disabled();
        if let (Some(slack), Some(channel)) = (&config.slack, config.notify_channel()) {
            notifications =
                notifications.with_chat(Arc::new(SlackNotifier::new(&slack.token)), channel);
        }
        if let Some(email) = &config.email {
            let recipient = email.to.clone();
            notifications =
                notifications.with_report(Arc::new(SmtpReporter::new(email.clone())), recipient);
        }
        notifications
    }

    pub fn with_chat(
        mut self,
        notifier: Arc<dyn ChatNotifier>,
        channel: impl Into<String>,
    ) -> Self {
        self.chat = Some(ChatTarget {
            notifier,
            channel: channel.into(),
        });
        self
    }

    pub fn with_report(
        mut self,
        sender: Arc<dyn ReportSender>,
        recipient: impl Into<String>,
    ) -> Self {
        self.report = Some(ReportTarget {
            sender,
            recipient: recipient.into(),
        });
        self
    }

    pub fn has_chat(&self) -> bool {
        self.chat.is_some()
    }

    pub fn has_report(&self) -> bool {
        self.report.is_some()
    }

    /// Same targets, with every send replaced by a log line.
    pub fn dry_run(&self) -> Self {
        Self {
            chat: self.chat.as_ref().map(|c| ChatTarget {
                notifier: Arc::new(DryRun::new(Arc::clone(&c.notifier))),
                channel: c.channel.clone(),
            }),
            report: self.report.as_ref().map(|r| ReportTarget {
                sender: Arc::new(DryRun::new(Arc::clone(&r.sender))),
                recipient: r.recipient.clone(),
            }),
        }
    }

    /// Best-effort chat post. Failures are logged, never returned.
    ///
    /// Returns whether the message was delivered.
    pub async fn post(&self, text: &str) -> bool {
        let Some(chat) = &self.chat else {
            debug!("chat not configured, skipping notification");
            return false;
        };
        match chat.notifier.post_notification(&chat.channel, text).await {
            Ok(()) => true,
            Err(e) => {
                error!(
                    notifier = chat.notifier.name(),
                    channel = %chat.channel,
                    error = %e,
                    "failed to post notification"
                );
                false
            }
        }
    }

    /// Send a report to the configured recipient.
    ///
    /// `Ok(false)` when reports are not configured.
    pub async fn report(&self, subject: &str, text: &str) -> Result<bool, RemoteError> {
        let Some(report) = &self.report else {
            debug!(subject, "email not configured, skipping report");
            return Ok(false);
        };
        report
            .sender
            .send_report(&report.recipient, subject, text)
            .await?;
        Ok(true)
    }
}
