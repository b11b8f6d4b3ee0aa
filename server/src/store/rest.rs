use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use super::{StoreError, TodoStore};
use crate::model::{NewTodo, Patch, Todo, TodoChanges};
use crate::upstream::{check_status, UpstreamError};

/// `todos` table behind a PostgREST endpoint (Supabase's `/rest/v1`).
///
/// Writes ask for `return=representation` so the stored row, including the
/// server-assigned `created_at`, comes back in the same round-trip.
#[derive(Debug, Clone)]
pub struct RestStore {
    table_url: String,
    api_key: String,
    client: Client,
}

impl RestStore {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self::with_client(base_url, api_key, Client::new())
    }

    pub fn with_client(base_url: &str, api_key: &str, client: Client) -> Self {
        Self {
            table_url: format!("{}/rest/v1/todos", base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            client,
        }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn rows(&self, request: RequestBuilder) -> Result<Vec<Todo>, StoreError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(UpstreamError::from)?;
        let response = check_status(response).await?;
        response
            .json::<Vec<Todo>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    fn id_filter(id: Uuid) -> [(&'static str, String); 1] {
        [("id", format!("eq.{id}"))]
    }
}

/// PATCH body holding only the columns that change.
fn changes_body(changes: TodoChanges) -> Value {
    let mut body = Map::new();
    body.insert("text".into(), Value::String(changes.text));
    body.insert(
        "priority".into(),
        Value::String(changes.priority.as_str().to_string()),
    );
    match changes.due_date {
        Patch::Keep => {}
        Patch::Clear => {
            body.insert("due_date".into(), Value::Null);
        }
        Patch::Set(date) => {
            body.insert("due_date".into(), Value::String(date.to_string()));
        }
    }
    if let Some(completed) = changes.completed {
        body.insert("completed".into(), Value::Bool(completed));
    }
    Value::Object(body)
}

#[async_trait]
impl TodoStore for RestStore {
    async fn list(&self) -> Result<Vec<Todo>, StoreError> {
        let request = self
            .client
            .get(&self.table_url)
            .query(&[("select", "*"), ("order", "created_at.desc")]);
        self.rows(request).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<Todo>, StoreError> {
        let request = self
            .client
            .get(&self.table_url)
            .query(&[("select", "*")])
            .query(&Self::id_filter(id));
        Ok(self.rows(request).await?.into_iter().next())
    }

    async fn insert(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        debug!(id = %todo.id, "inserting todo");
        let request = self
            .client
            .post(&self.table_url)
            .header("Prefer", "return=representation")
            .json(&[todo]);
        self.rows(request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("insert returned no rows".to_string()))
    }

    async fn update(&self, id: Uuid, changes: TodoChanges) -> Result<Option<Todo>, StoreError> {
        let request = self
            .client
            .patch(&self.table_url)
            .query(&Self::id_filter(id))
            .header("Prefer", "return=representation")
            .json(&changes_body(changes));
        Ok(self.rows(request).await?.into_iter().next())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let request = self
            .client
            .delete(&self.table_url)
            .query(&Self::id_filter(id))
            .header("Prefer", "return=representation");
        Ok(!self.rows(request).await?.is_empty())
    }
}
