//! Client application state for a todo UI.
//!
//! `TodoApp` is the single owner of what a screen shows: the list, the
//! add/edit form, the edit target, the last summary and the last toast.
//! Every user action returns an `HttpRequest` for the host to execute, and
//! the matching `apply_*` method folds the response back into the state.
//! Nothing here is retried; a failed action only sets a failure notice.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{NewTodo, Patch, Priority, Todo, TodoUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

/// A toast. Messages are fixed per action, never the server's error text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: &'static str,
}

impl Notice {
    fn success(message: &'static str) -> Self {
        Self {
            kind: NoticeKind::Success,
            message,
        }
    }

    fn failure(message: &'static str) -> Self {
        Self {
            kind: NoticeKind::Failure,
            message,
        }
    }
}

pub const ADDED: &str = "Todo added successfully!";
pub const UPDATED: &str = "Todo updated successfully!";
pub const SAVE_FAILED: &str = "Error saving todo.";
pub const DELETED: &str = "Todo deleted successfully!";
pub const DELETE_FAILED: &str = "Failed to delete todo.";
pub const TOGGLE_FAILED: &str = "Failed to toggle completion.";
pub const SUMMARY_SENT: &str = "Summary sent to Slack!";
pub const SUMMARY_FAILED: &str = "Failed to send summary.";

/// Add/edit form fields, kept as the user typed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoForm {
    pub text: String,
    pub priority: Priority,
    /// `YYYY-MM-DD` or empty.
    pub due_date: String,
}

impl TodoForm {
    /// Blank means no date. Anything else must parse, so a typo never clears
    /// a stored date.
    fn due_date(&self) -> Result<Option<NaiveDate>, ApiError> {
        let raw = self.due_date.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ApiError::InvalidDueDate(raw.to_string()))
    }
}

/// What a form submission does, fixed when its request is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitKind {
    Create,
    Update(Uuid),
}

#[derive(Debug, Clone)]
pub struct Submission {
    pub kind: SubmitKind,
    pub request: HttpRequest,
}

/// What the host should do after applying a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Followup {
    None,
    /// Run `refresh_request` and feed the result to `apply_list`.
    Refresh,
}

#[derive(Debug, Clone)]
pub struct TodoApp {
    client: TodoClient,
    pub todos: Vec<Todo>,
    pub form: TodoForm,
    pub edit_target: Option<Uuid>,
    pub summary: Option<String>,
    pub notice: Option<Notice>,
}

impl TodoApp {
    pub fn new(client: TodoClient) -> Self {
        Self {
            client,
            todos: Vec::new(),
            form: TodoForm::default(),
            edit_target: None,
            summary: None,
            notice: None,
        }
    }

    pub fn todo(&self, id: Uuid) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Fetch the whole list. Issued on mount and after every mutation.
    pub fn refresh_request(&self) -> HttpRequest {
        self.client.build_list_todos()
    }

    /// A failed fetch keeps the current list and raises no notice.
    pub fn apply_list(&mut self, response: HttpResponse) -> Result<(), ApiError> {
        self.todos = self.client.parse_list_todos(response)?;
        Ok(())
    }

    /// Load a todo into the form and make it the edit target.
    pub fn start_edit(&mut self, id: Uuid) -> bool {
        let Some(todo) = self.todo(id) else {
            return false;
        };
        self.form = TodoForm {
            text: todo.text.clone(),
            priority: todo.priority.unwrap_or_default(),
            due_date: todo.due_date.map(|d| d.to_string()).unwrap_or_default(),
        };
        self.edit_target = Some(id);
        true
    }

    pub fn cancel_edit(&mut self) {
        self.form = TodoForm::default();
        self.edit_target = None;
    }

    /// Create or update from the form. `None` when the text is blank.
    pub fn submit(&self) -> Option<Result<Submission, ApiError>> {
        if self.form.text.trim().is_empty() {
            return None;
        }
        Some(self.build_submission())
    }

    fn build_submission(&self) -> Result<Submission, ApiError> {
        let due_date = self.form.due_date()?;
        match self.edit_target {
            Some(id) => {
                let request = self.client.build_update_todo(
                    id,
                    &TodoUpdate {
                        text: self.form.text.clone(),
                        priority: self.form.priority,
                        due_date: Patch::from(due_date),
                        completed: None,
                    },
                )?;
                Ok(Submission {
                    kind: SubmitKind::Update(id),
                    request,
                })
            }
            None => {
                let request = self.client.build_create_todo(&NewTodo {
                    text: self.form.text.clone(),
                    priority: self.form.priority,
                    due_date,
                })?;
                Ok(Submission {
                    kind: SubmitKind::Create,
                    request,
                })
            }
        }
    }

    /// `kind` is the one `submit` returned with the request. The form is only
    /// reset when it still shows what was submitted.
    pub fn apply_submit(&mut self, kind: SubmitKind, response: HttpResponse) -> Followup {
        let result = match kind {
            SubmitKind::Update(_) => self.client.parse_update_todo(response).map(|_| UPDATED),
            SubmitKind::Create => self.client.parse_create_todo(response).map(|_| ADDED),
        };
        match result {
            Ok(message) => {
                self.notice = Some(Notice::success(message));
                let current = match self.edit_target {
                    Some(id) => SubmitKind::Update(id),
                    None => SubmitKind::Create,
                };
                if current == kind {
                    self.cancel_edit();
                }
                Followup::Refresh
            }
            Err(_) => {
                self.notice = Some(Notice::failure(SAVE_FAILED));
                Followup::None
            }
        }
    }

    /// Flip `completed`, echoing every other field. `None` for unknown ids.
    pub fn toggle_request(&self, id: Uuid) -> Option<Result<HttpRequest, ApiError>> {
        let todo = self.todo(id)?;
        Some(self.client.build_update_todo(id, &TodoUpdate::toggle(todo)))
    }

    pub fn apply_toggle(&mut self, response: HttpResponse) -> Followup {
        match self.client.parse_update_todo(response) {
            Ok(_) => Followup::Refresh,
            Err(_) => {
                self.notice = Some(Notice::failure(TOGGLE_FAILED));
                Followup::None
            }
        }
    }

    pub fn delete_request(&self, id: Uuid) -> HttpRequest {
        self.client.build_delete_todo(id)
    }

    pub fn apply_delete(&mut self, response: HttpResponse) -> Followup {
        match self.client.parse_delete_todo(response) {
            Ok(()) => {
                self.notice = Some(Notice::success(DELETED));
                Followup::Refresh
            }
            Err(_) => {
                self.notice = Some(Notice::failure(DELETE_FAILED));
                Followup::None
            }
        }
    }

    pub fn summarize_request(&self) -> HttpRequest {
        self.client.build_summarize()
    }

    pub fn apply_summary(&mut self, response: HttpResponse) {
        match self.client.parse_summarize(response) {
            Ok(summary) => {
                self.summary = Some(summary);
                self.notice = Some(Notice::success(SUMMARY_SENT));
            }
            Err(_) => self.notice = Some(Notice::failure(SUMMARY_FAILED)),
        }
    }
}
