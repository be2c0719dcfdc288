//! ChatNotifier port - チャット通知（Slack など）

use async_trait::async_trait;

use crate::domain::RemoteError;

/// ChatNotifier は 1 行のテキストをチャンネルに投稿
///
/// 呼び出し側は失敗をログに残すだけで、他のタスクの処理は続けます。
#[async_trait]
pub trait ChatNotifier: Send + Sync {
    fn name(&self) -> &'static str;

    async fn post_notification(&self, channel: &str, text: &str) -> Result<(), RemoteError>;
}
