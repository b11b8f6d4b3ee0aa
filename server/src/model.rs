//! Todo records and the request bodies that create or change them.
//!
//! Request bodies decode every field as optional so that missing required
//! fields surface as a 400 with a readable message instead of an extractor
//! rejection. `validate` turns a body into the typed values the store takes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::AppError;

pub const REQUIRED_FIELDS_MESSAGE: &str = "Text and priority are required.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

/// A row of the `todos` table, serialized with the table's column names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub text: String,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// A per-field update instruction.
///
/// Absent fields decode to `Keep` through `#[serde(default)]`; an explicit
/// `null` decodes to `Clear`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Patch<T> {
    Keep,
    Clear,
    Set(T),
}

impl<T> Patch<T> {
    pub fn apply(self, current: &mut Option<T>) {
        match self {
            Patch::Keep => {}
            Patch::Clear => *current = None,
            Patch::Set(value) => *current = Some(value),
        }
    }
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Keep
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Patch::Set(value),
            None => Patch::Clear,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    pub text: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodo {
    pub text: Option<String>,
    pub priority: Option<Priority>,
    #[serde(default)]
    pub due_date: Patch<String>,
    /// Only a JSON boolean counts; any other value is ignored.
    #[serde(default, deserialize_with = "boolean_only")]
    pub completed: Option<bool>,
}

fn boolean_only<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Ok(Value::deserialize(deserializer)?.as_bool())
}

/// A validated record ready for insertion. The store assigns `created_at`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewTodo {
    pub id: Uuid,
    pub text: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
}

/// Validated column changes for an existing record.
#[derive(Clone, Debug, PartialEq)]
pub struct TodoChanges {
    pub text: String,
    pub priority: Priority,
    pub due_date: Patch<NaiveDate>,
    pub completed: Option<bool>,
}

impl TodoChanges {
    pub fn apply_to(self, todo: &mut Todo) {
        todo.text = self.text;
        todo.priority = Some(self.priority);
        self.due_date.apply(&mut todo.due_date);
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
    }
}

impl CreateTodo {
    pub fn validate(self) -> Result<NewTodo, AppError> {
        let (text, priority) = required_fields(self.text, self.priority)?;
        let due_date = match self.due_date {
            Some(raw) => parse_due_date(&raw)?,
            None => None,
        };
        Ok(NewTodo {
            id: Uuid::new_v4(),
            text,
            priority,
            due_date,
            completed: false,
        })
    }
}

impl UpdateTodo {
    pub fn validate(self) -> Result<TodoChanges, AppError> {
        let (text, priority) = required_fields(self.text, self.priority)?;
        let due_date = match self.due_date {
            Patch::Keep => Patch::Keep,
            Patch::Clear => Patch::Clear,
            Patch::Set(raw) => match parse_due_date(&raw)? {
                Some(date) => Patch::Set(date),
                None => Patch::Clear,
            },
        };
        Ok(TodoChanges {
            text,
            priority,
            due_date,
            completed: self.completed,
        })
    }
}

fn required_fields(
    text: Option<String>,
    priority: Option<Priority>,
) -> Result<(String, Priority), AppError> {
    match (text, priority) {
        (Some(text), Some(priority)) if !text.trim().is_empty() => Ok((text, priority)),
        _ => Err(AppError::Validation(REQUIRED_FIELDS_MESSAGE.to_string())),
    }
}

/// Blank strings mean "no due date".
fn parse_due_date(raw: &str) -> Result<Option<NaiveDate>, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| AppError::Validation(format!("Invalid due date: {raw}")))
}
