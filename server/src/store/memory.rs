use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, TodoStore};
use crate::model::{NewTodo, Todo, TodoChanges};

struct Row {
    seq: u64,
    todo: Todo,
}

#[derive(Default)]
struct Table {
    rows: HashMap<Uuid, Row>,
    next_seq: u64,
}

impl Table {
    fn push(&mut self, todo: Todo) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.rows.insert(todo.id, Row { seq, todo });
    }
}

/// In-process `todos` table.
///
/// Rows with equal `created_at` list most recently inserted first.
#[derive(Default)]
pub struct MemoryStore {
    table: RwLock<Table>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the table with existing rows, kept as given, in insertion order.
    pub fn with_rows(rows: impl IntoIterator<Item = Todo>) -> Self {
        let mut table = Table::default();
        for todo in rows {
            table.push(todo);
        }
        Self {
            table: RwLock::new(table),
        }
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Todo>, StoreError> {
        let table = self.table.read().await;
        let mut rows: Vec<&Row> = table.rows.values().collect();
        rows.sort_by(|a, b| {
            b.todo
                .created_at
                .cmp(&a.todo.created_at)
                .then(b.seq.cmp(&a.seq))
        });
        Ok(rows.into_iter().map(|row| row.todo.clone()).collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Todo>, StoreError> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).map(|row| row.todo.clone()))
    }

    async fn insert(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        let mut table = self.table.write().await;
        if table.rows.contains_key(&todo.id) {
            return Err(StoreError::Conflict(todo.id));
        }
        let stored = Todo {
            id: todo.id,
            text: todo.text,
            priority: Some(todo.priority),
            due_date: todo.due_date,
            completed: todo.completed,
            created_at: Utc::now(),
        };
        table.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: Uuid, changes: TodoChanges) -> Result<Option<Todo>, StoreError> {
        let mut table = self.table.write().await;
        let Some(row) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply_to(&mut row.todo);
        Ok(Some(row.todo.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut table = self.table.write().await;
        Ok(table.rows.remove(&id).is_some())
    }
}
