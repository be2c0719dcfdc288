//! TrelloBoard - Trello REST API (v1) による TaskBoard 実装
//!
//! | port                | Trello                                   |
//! |---------------------|------------------------------------------|
//! | stage               | list                                     |
//! | task                | card                                     |
//! | `resolve_stage`     | `GET /members/me/boards`, `GET /boards/{id}/lists` |
//! | `fetch_tasks`       | `GET /lists/{id}/cards`                  |
//! | `set_due_date`      | `PUT /cards/{id}?due=..&dueComplete=false` |
//! | `move_task`         | `PUT /cards/{id}?idList=..`              |
//!
//! 認証は app key + user token をクエリパラメータで渡す方式。

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::{RemoteError, StageId, Task, TaskId};
use crate::ports::TaskBoard;

const API_BASE: &str = "https://api.trello.com/1";
const SERVICE: &str = "trello";

pub struct TrelloBoard {
    client: reqwest::Client,
    base_url: String,
    app_key: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct NamedDto {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardDto {
    id: String,
    name: String,
    #[serde(default)]
    desc: String,
    #[serde(default)]
    due: Option<DateTime<Utc>>,
    #[serde(default)]
    due_complete: bool,
}

impl From<CardDto> for Task {
    fn from(card: CardDto) -> Self {
        Task {
            id: TaskId::new(card.id),
            name: card.name,
            description: card.desc,
            due: card.due,
            completed: card.due_complete,
        }
    }
}

impl TrelloBoard {
    pub fn new(app_key: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: API_BASE.to_string(),
            app_key: app_key.into(),
            token: token.into(),
        }
    }

    /// Point the client at another host (a proxy or a local stub).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn auth(&self) -> [(&'static str, &str); 2] {
        [("key", self.app_key.as_str()), ("token", self.token.as_str())]
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, RemoteError> {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .query(&self.auth())
            .query(query)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn put(&self, path: &str, query: &[(&str, &str)]) -> Result<(), RemoteError> {
        let response = self
            .client
            .put(format!("{}{path}", self.base_url))
            .query(&self.auth())
            .query(query)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}

async fn check(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RemoteError::Status {
        service: SERVICE,
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl TaskBoard for TrelloBoard {
    async fn resolve_stage(&self, board: &str, stage: &str) -> Result<StageId, RemoteError> {
        let boards: Vec<NamedDto> = self
            .get("/members/me/boards", &[("fields", "name"), ("filter", "open")])
            .await?;
        let board_id = find_by_name(boards, board).ok_or_else(|| RemoteError::NotFound {
            kind: "board",
            name: board.to_string(),
        })?;

        let lists: Vec<NamedDto> = self
            .get(
                &format!("/boards/{board_id}/lists"),
                &[("fields", "name"), ("filter", "open")],
            )
            .await?;
        let list_id = find_by_name(lists, stage).ok_or_else(|| RemoteError::NotFound {
            kind: "stage",
            name: format!("{board}/{stage}"),
        })?;

        debug!(board, stage, %list_id, "resolved stage");
        Ok(StageId::new(list_id))
    }

    async fn fetch_tasks(&self, stage: &StageId) -> Result<Vec<Task>, RemoteError> {
        let cards: Vec<CardDto> = self
            .get(
                &format!("/lists/{stage}/cards"),
                &[("fields", "name,desc,due,dueComplete")],
            )
            .await?;
        Ok(cards.into_iter().map(Task::from).collect())
    }

    async fn set_due_date(&self, task: &TaskId, due: DateTime<Utc>) -> Result<(), RemoteError> {
        let due = due.to_rfc3339_opts(SecondsFormat::Millis, true);
        self.put(
            &format!("/cards/{task}"),
            &[("due", due.as_str()), ("dueComplete", "false")],
        )
        .await
    }

    async fn move_task(&self, task: &TaskId, target: &StageId) -> Result<(), RemoteError> {
        self.put(&format!("/cards/{task}"), &[("idList", target.as_str())])
            .await
    }
}

fn find_by_name(items: Vec<NamedDto>, name: &str) -> Option<String> {
    items
        .into_iter()
        .find(|item| item.name.trim() == name.trim())
        .map(|item| item.id)
}
