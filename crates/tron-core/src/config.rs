//! Config - TOML 設定ファイル（起動時に一度だけ検証）
//!
//! ```toml
//! [trello]
//! app_key = "..."          # or TRELLO_APP_KEY
//! token = "..."            # or TRELLO_TOKEN
//! board = "What's Next"
//!
//! [recurring]
//! stages = ["Today", "This Week"]
//!
//! [[pipeline]]
//! from = "This Week"
//! to = "Today"
//! cadence = "daily"
//!
//! [slack]                  # optional: chat notifications
//! token = "xoxb-..."
//! channel = "#chores"
//!
//! [email]                  # optional: leftover reports and failure alerts
//! smtp_host = "smtp.example.com"
//! username = "tron"
//! password = "..."
//! from = "tron@example.com"
//! to = "me@example.com"
//! ```
//!
//! # 設計原則
//! - 任意セクションがなければ、その経路は黙って無効になる
//! - Trello の認証情報は環境変数で上書きできる
//! - 秘密情報は `Debug` 出力に出さない

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::domain::ConfigError;
use crate::pipeline::Transition;

pub const ENV_TRELLO_APP_KEY: &str = "TRELLO_APP_KEY";
pub const ENV_TRELLO_TOKEN: &str = "TRELLO_TOKEN";

const REDACTED: &str = "<redacted>";

#[derive(Debug, Clone)]
pub struct TronConfig {
    pub trello: TrelloConfig,
    pub recurring: RecurringConfig,
    pub pipeline: Vec<Transition>,
    pub slack: Option<SlackConfig>,
    pub email: Option<EmailConfig>,
}

#[derive(Clone)]
pub struct TrelloConfig {
    pub app_key: String,
    pub token: String,
    /// Board name; stages are looked up on this board.
    pub board: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecurringConfig {
    /// Stage names scanned for `!repeat` directives.
    #[serde(default)]
    pub stages: Vec<String>,
    /// Overrides `slack.channel` for overdue notifications.
    #[serde(default)]
    pub notify_channel: Option<String>,
}

#[derive(Clone, Deserialize)]
pub struct SlackConfig {
    pub token: String,
    pub channel: String,
}

#[derive(Clone, Deserialize)]
pub struct EmailConfig {
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    /// Recipient of reports and failure alerts.
    pub to: String,
}

fn default_smtp_port() -> u16 {
    587
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    trello: RawTrello,
    #[serde(default)]
    recurring: RecurringConfig,
    #[serde(default)]
    pipeline: Vec<Transition>,
    slack: Option<SlackConfig>,
    email: Option<EmailConfig>,
}

#[derive(Debug, Default, Deserialize)]
struct RawTrello {
    app_key: Option<String>,
    token: Option<String>,
    board: Option<String>,
}

impl TronConfig {
    /// Read `path`, apply environment overrides and validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, |key| std::env::var(key).ok())
    }

    /// Parse and validate; `env` looks up override variables.
    pub fn from_toml_str(
        text: &str,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text)?;

        let app_key = env(ENV_TRELLO_APP_KEY).or(raw.trello.app_key);
        let token = env(ENV_TRELLO_TOKEN).or(raw.trello.token);
        let trello = TrelloConfig {
            app_key: required(app_key, "trello.app_key")?,
            token: required(token, "trello.token")?,
            board: required(raw.trello.board, "trello.board")?,
        };

        if raw.recurring.stages.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                key: "recurring.stages",
                reason: "stage names must not be empty".to_string(),
            });
        }
        if let Some(t) = raw
            .pipeline
            .iter()
            .find(|t| t.from.trim().is_empty() || t.to.trim().is_empty() || t.from == t.to)
        {
            return Err(ConfigError::Invalid {
                key: "pipeline",
                reason: format!("bad transition {:?} -> {:?}", t.from, t.to),
            });
        }
        if let Some(slack) = &raw.slack
            && (slack.token.is_empty() || slack.channel.is_empty())
        {
            return Err(ConfigError::Invalid {
                key: "slack",
                reason: "token and channel must be set".to_string(),
            });
        }
        if let Some(email) = &raw.email
            && (email.smtp_host.is_empty() || email.to.is_empty() || email.from.is_empty())
        {
            return Err(ConfigError::Invalid {
                key: "email",
                reason: "smtp_host, from and to must be set".to_string(),
            });
        }

        Ok(Self {
            trello,
            recurring: raw.recurring,
            pipeline: raw.pipeline,
            slack: raw.slack,
            email: raw.email,
        })
    }

    /// Channel for overdue notifications, if chat is configured at all.
    pub fn notify_channel(&self) -> Option<&str> {
        let slack = self.slack.as_ref()?;
        Some(
            self.recurring
                .notify_channel
                .as_deref()
                .unwrap_or(&slack.channel),
        )
    }
}

fn required(value: Option<String>, key: &'static str) -> Result<String, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(key)),
    }
}

impl fmt::Debug for TrelloConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrelloConfig")
            .field("app_key", &REDACTED)
            .field("token", &REDACTED)
            .field("board", &self.board)
            .finish()
    }
}

impl fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackConfig")
            .field("token", &REDACTED)
            .field("channel", &self.channel)
            .finish()
    }
}

impl fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("username", &self.username)
            .field("password", &REDACTED)
            .field("from", &self.from)
            .field("to", &self.to)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Cadence;

    const FULL: &str = r##"
        [trello]
        app_key = "file-key"
        token = "file-token"
        board = "What's Next"

        [recurring]
        stages = ["Today", "This Week"]

        [[pipeline]]
        from = "This Week"
        to = "Today"
        cadence = "daily"

        [[pipeline]]
        from = "Today"
        to = "Someday"
        cadence = "weekly"
        report_leftovers = true

        [slack]
        token = "xoxb-1"
        channel = "#chores"

        [email]
        smtp_host = "smtp.example.com"
        username = "tron"
        password = "hunter2"
        from = "tron@example.com"
        to = "me@example.com"
    "##;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn full_config() {
        let config = TronConfig::from_toml_str(FULL, no_env).unwrap();
        assert_eq!(config.trello.board, "What's Next");
        assert_eq!(config.recurring.stages, vec!["Today", "This Week"]);
        assert_eq!(config.pipeline.len(), 2);
        assert_eq!(config.pipeline[1].cadence, Cadence::Weekly);
        assert!(config.pipeline[1].report_leftovers);
        assert_eq!(config.email.as_ref().unwrap().smtp_port, 587);
        assert_eq!(config.notify_channel(), Some("#chores"));
    }

    #[test]
    fn optional_sections_can_be_absent() {
        let config = TronConfig::from_toml_str(
            r#"
            [trello]
            app_key = "k"
            token = "t"
            board = "b"
            "#,
            no_env,
        )
        .unwrap();
        assert!(config.slack.is_none());
        assert!(config.email.is_none());
        assert!(config.pipeline.is_empty());
        assert_eq!(config.notify_channel(), None);
    }

    #[test]
    fn env_overrides_credentials() {
        let config = TronConfig::from_toml_str(FULL, |key| match key {
            ENV_TRELLO_TOKEN => Some("env-token".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.trello.token, "env-token");
        assert_eq!(config.trello.app_key, "file-key");
    }

    #[test]
    fn credentials_may_come_only_from_env() {
        let config = TronConfig::from_toml_str("[trello]\nboard = \"b\"\n", |key| {
            Some(format!("{key}-value"))
        })
        .unwrap();
        assert_eq!(config.trello.app_key, "TRELLO_APP_KEY-value");
    }

    #[test]
    fn missing_credentials_are_reported_by_key() {
        let err = TronConfig::from_toml_str("[trello]\napp_key = \"k\"\nboard = \"b\"\n", no_env)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("trello.token")));

        let err = TronConfig::from_toml_str("", no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("trello.app_key")));
    }

    #[test]
    fn notify_channel_override() {
        let text = FULL.replace(
            "stages = [\"Today\", \"This Week\"]",
            "stages = [\"Today\"]\nnotify_channel = \"#overdue\"",
        );
        let config = TronConfig::from_toml_str(&text, no_env).unwrap();
        assert_eq!(config.notify_channel(), Some("#overdue"));
    }

    #[test]
    fn self_transition_is_invalid() {
        let text = FULL.replace("to = \"Today\"", "to = \"This Week\"");
        let err = TronConfig::from_toml_str(&text, no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "pipeline", .. }));
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let err = TronConfig::from_toml_str("[trello", no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn debug_hides_secrets() {
        let config = TronConfig::from_toml_str(FULL, no_env).unwrap();
        let shown = format!("{config:?}");
        assert!(!shown.contains("file-token"));
        assert!(!shown.contains("hunter2"));
        assert!(!shown.contains("xoxb-1"));
        assert!(shown.contains("What's Next"));
    }
}
