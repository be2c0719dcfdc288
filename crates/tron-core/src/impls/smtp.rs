//! SmtpReporter - SMTP リレー（STARTTLS）による ReportSender 実装
//!
//! 本文は text/plain。送信ごとにトランスポートを作ります。

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::config::EmailConfig;
use crate::domain::RemoteError;
use crate::ports::ReportSender;

pub struct SmtpReporter {
    config: EmailConfig,
}

impl SmtpReporter {
    pub const fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn build_message(
        &self,
        recipient: &str,
        subject: &str,
        text: &str,
    ) -> Result<Message, RemoteError> {
        let from: Mailbox = self.config.from.parse().map_err(|e| {
            RemoteError::Mail(format!("invalid from address {:?}: {e}", self.config.from))
        })?;
        let to: Mailbox = recipient
            .parse()
            .map_err(|e| RemoteError::Mail(format!("invalid recipient {recipient:?}: {e}")))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(text.to_string())
            .map_err(|e| RemoteError::Mail(format!("failed to build message: {e}")))
    }
}

#[async_trait]
impl ReportSender for SmtpReporter {
    async fn send_report(
        &self,
        recipient: &str,
        subject: &str,
        text: &str,
    ) -> Result<(), RemoteError> {
        let email = self.build_message(recipient, subject, text)?;

        let creds = Credentials::new(self.config.username.clone(), self.config.password.clone());
        let mailer: AsyncSmtpTransport<Tokio1Executor> =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)
                .map_err(|e| RemoteError::Mail(format!("failed to create SMTP transport: {e}")))?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build();

        mailer
            .send(email)
            .await
            .map_err(|e| RemoteError::Mail(e.to_string()))?;

        info!(to = recipient, subject, "report sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reporter() -> SmtpReporter {
        SmtpReporter::new(EmailConfig {
            smtp_host: "smtp.example.com".into(),
            smtp_port: 587,
            username: "tron".into(),
            password: "secret".into(),
            from: "Tron <tron@example.com>".into(),
            to: "me@example.com".into(),
        })
    }

    #[test]
    fn builds_a_plain_text_message() {
        let message = reporter()
            .build_message("me@example.com", "tron: run failed", "boom")
            .unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: tron: run failed"));
        assert!(raw.contains("To: me@example.com"));
        assert!(raw.contains("text/plain"));
    }

    #[test]
    fn bad_recipient_is_a_mail_error() {
        let err = reporter()
            .build_message("not an address", "s", "t")
            .unwrap_err();
        assert!(matches!(err, RemoteError::Mail(msg) if msg.contains("invalid recipient")));
    }
}
