//! Persistence seam for todo records.
//!
//! Handlers only see `TodoStore`. `RestStore` talks to a hosted PostgREST
//! endpoint; `MemoryStore` keeps rows in process for local runs and tests.

mod memory;
mod rest;

pub use memory::MemoryStore;
pub use rest::RestStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::model::{NewTodo, Todo, TodoChanges};
use crate::upstream::UpstreamError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Request(#[from] UpstreamError),

    #[error("duplicate key value violates unique constraint: {0}")]
    Conflict(Uuid),

    #[error("unexpected store response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait TodoStore: Send + Sync {
    /// All rows, newest `created_at` first.
    async fn list(&self) -> Result<Vec<Todo>, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Todo>, StoreError>;

    /// Insert a row and return it as stored, `created_at` included.
    async fn insert(&self, todo: NewTodo) -> Result<Todo, StoreError>;

    /// Returns `None` when no row has this id.
    async fn update(&self, id: Uuid, changes: TodoChanges) -> Result<Option<Todo>, StoreError>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}
