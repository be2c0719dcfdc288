//! ReportSender port - レポート送信（メール）
//!
//! 用途は二つ：やり残しレポートと、run 失敗時のアラート。

use async_trait::async_trait;

use crate::domain::RemoteError;

#[async_trait]
pub trait ReportSender: Send + Sync {
    async fn send_report(
        &self,
        recipient: &str,
        subject: &str,
        text: &str,
    ) -> Result<(), RemoteError>;
}
