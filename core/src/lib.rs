//! I/O-free client core for the todo summary service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). On top of that, `TodoApp`
//! holds the state a todo screen renders and turns user actions into
//! requests.
//!
//! # Design
//! - `TodoClient` is stateless; it holds only `base_url`.
//! - Each route is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so the I/O boundary is explicit.
//! - `TodoApp` changes only in response to server replies; there is no
//!   optimistic update and no retry.
//! - DTOs are defined independently from the server crate; integration
//!   tests catch schema drift.

pub mod app;
pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use app::{Followup, Notice, NoticeKind, SubmitKind, Submission, TodoApp, TodoForm};
pub use client::TodoClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{NewTodo, Patch, Priority, Todo, TodoUpdate};
