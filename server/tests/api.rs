use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::{self, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use todo_server::error::ErrorBody;
use todo_server::store::MemoryStore;
use todo_server::summarize::{Notifier, TextGenerator, Unconfigured, NO_SUMMARY};
use todo_server::upstream::UpstreamError;
use todo_server::{app, AppState, Priority, Todo};
use tower::ServiceExt;
use uuid::Uuid;

/// Answers every prompt with a canned reply and remembers the prompts.
#[derive(Default)]
struct FakeGenerator {
    reply: Option<String>,
    fail: bool,
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<Option<String>, UpstreamError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail {
            return Err(UpstreamError::Status {
                status: 429,
                message: "Resource has been exhausted".to_string(),
            });
        }
        Ok(self.reply.clone())
    }
}

#[derive(Default)]
struct RecordingNotifier {
    fail: bool,
    messages: Mutex<Vec<String>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, text: &str) -> Result<(), UpstreamError> {
        if self.fail {
            return Err(UpstreamError::Status {
                status: 404,
                message: "no_service".to_string(),
            });
        }
        self.messages.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

fn app_with(
    store: MemoryStore,
    generator: Arc<FakeGenerator>,
    notifier: Arc<RecordingNotifier>,
) -> Router {
    app(AppState::new(Arc::new(store), generator, notifier))
}

fn test_app() -> Router {
    app_with(
        MemoryStore::new(),
        Arc::new(FakeGenerator::default()),
        Arc::new(RecordingNotifier::default()),
    )
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

async fn list(app: &Router) -> Vec<Todo> {
    let resp = app.clone().oneshot(empty_request("GET", "/todos")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await
}

async fn create(app: &Router, body: &str) -> Todo {
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/todos", body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await
}

fn seeded(text: &str, minutes: i64, completed: bool) -> Todo {
    let base = DateTime::parse_from_rfc3339("2025-01-01T09:00:00Z")
        .unwrap()
        .with_timezone(&Utc);
    Todo {
        id: Uuid::new_v4(),
        text: text.to_string(),
        priority: None,
        due_date: None,
        completed,
        created_at: base + Duration::minutes(minutes),
    }
}

// --- health ---

#[tokio::test]
async fn health_reports_ok() {
    let resp = test_app().oneshot(empty_request("GET", "/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["status"], "ok");
}

// --- list ---

#[tokio::test]
async fn list_todos_empty() {
    assert!(list(&test_app()).await.is_empty());
}

#[tokio::test]
async fn list_todos_newest_first() {
    let store = MemoryStore::with_rows([
        seeded("middle", 10, false),
        seeded("oldest", 0, true),
        seeded("newest", 20, false),
    ]);
    let app = app_with(
        store,
        Arc::new(FakeGenerator::default()),
        Arc::new(RecordingNotifier::default()),
    );
    let texts: Vec<String> = list(&app).await.into_iter().map(|t| t.text).collect();
    assert_eq!(texts, ["newest", "middle", "oldest"]);
}

// --- create ---

#[tokio::test]
async fn create_todo_returns_201() {
    let app = test_app();
    let todo = create(&app, r#"{"text":"Buy milk","priority":"Medium"}"#).await;
    assert_eq!(todo.text, "Buy milk");
    assert!(!todo.completed);
    assert_eq!(todo.due_date, None);
    assert_ne!(todo.id, Uuid::nil());
    assert_eq!(list(&app).await, [todo]);
}

#[tokio::test]
async fn create_todo_with_due_date() {
    let todo = create(
        &test_app(),
        r#"{"text":"Renew passport","priority":"High","dueDate":"2025-09-01"}"#,
    )
    .await;
    assert_eq!(todo.due_date.unwrap().to_string(), "2025-09-01");
}

#[tokio::test]
async fn create_todo_empty_text_returns_400_and_persists_nothing() {
    let app = test_app();
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/todos", r#"{"text":"","priority":"Low"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.error, "Text and priority are required.");
    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn create_todo_missing_priority_returns_400() {
    let resp = test_app()
        .oneshot(json_request("POST", "/todos", r#"{"text":"Buy milk"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_todo_malformed_json_returns_400() {
    let resp = test_app()
        .oneshot(json_request("POST", "/todos", r#"{"text":"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = body_json(resp).await;
    assert!(!body.error.is_empty());
}

#[tokio::test]
async fn routes_are_also_served_under_api_prefix() {
    let app = test_app();
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/todos",
            r#"{"text":"Prefixed","priority":"Low"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(list(&app).await.len(), 1);
}

// --- update ---

#[tokio::test]
async fn update_completed_alone_returns_400() {
    let app = test_app();
    let todo = create(&app, r#"{"text":"Walk dog","priority":"Low"}"#).await;
    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/todos/{}", todo.id),
            r#"{"completed":true}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(!list(&app).await[0].completed);
}

#[tokio::test]
async fn update_without_completed_leaves_it_unchanged() {
    let app = test_app();
    let todo = create(&app, r#"{"text":"Walk dog","priority":"Low","dueDate":"2025-05-05"}"#).await;
    let uri = format!("/todos/{}", todo.id);

    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &uri,
            r#"{"text":"Walk dog","priority":"Low","completed":true}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Todo = body_json(resp).await;
    assert!(updated.completed);
    assert_eq!(updated.due_date, todo.due_date);

    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &uri,
            r#"{"text":"Walk the dog","priority":"High","dueDate":""}"#,
        ))
        .await
        .unwrap();
    let updated: Todo = body_json(resp).await;
    assert_eq!(updated.text, "Walk the dog");
    assert!(updated.completed);
    assert_eq!(updated.due_date, None);
    assert_eq!(updated.created_at, todo.created_at);
}

#[tokio::test]
async fn update_ignores_non_boolean_completed() {
    let app = test_app();
    let todo = create(&app, r#"{"text":"a","priority":"Low"}"#).await;
    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/todos/{}", todo.id),
            r#"{"text":"b","priority":"High","completed":"true"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Todo = body_json(resp).await;
    assert_eq!(updated.text, "b");
    assert_eq!(updated.priority, Some(Priority::High));
    assert!(!updated.completed);
}

#[tokio::test]
async fn update_todo_not_found() {
    let resp = test_app()
        .oneshot(json_request(
            "PUT",
            "/todos/00000000-0000-0000-0000-000000000000",
            r#"{"text":"Nope","priority":"Low"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.error, "Todo not found");
}

#[tokio::test]
async fn update_todo_bad_uuid_returns_400() {
    let resp = test_app()
        .oneshot(json_request(
            "PUT",
            "/todos/not-a-uuid",
            r#"{"text":"x","priority":"Low"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- delete ---

#[tokio::test]
async fn delete_incomplete_todo_returns_400() {
    let app = test_app();
    let todo = create(&app, r#"{"text":"Not yet","priority":"Medium"}"#).await;
    let resp = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("/todos/{}", todo.id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.error, "Only completed todos can be deleted.");
    assert_eq!(list(&app).await.len(), 1);
}

#[tokio::test]
async fn delete_todo_not_found() {
    let resp = test_app()
        .oneshot(empty_request(
            "DELETE",
            "/todos/00000000-0000-0000-0000-000000000000",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    let app = test_app();

    // create
    let created = create(&app, r#"{"text":"Walk dog","priority":"Medium"}"#).await;
    let id = created.id;

    // list contains it
    let todos = list(&app).await;
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].id, id);

    // complete, echoing the other fields
    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/todos/{id}"),
            r#"{"text":"Walk dog","priority":"Medium","dueDate":null,"completed":true}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Todo = body_json(resp).await;
    assert_eq!(updated.text, "Walk dog");
    assert!(updated.completed);

    // delete
    let resp = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("/todos/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body, serde_json::json!({ "success": true }));

    // list no longer contains it
    assert!(list(&app).await.is_empty());

    // delete again
    let resp = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("/todos/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- summarize ---

#[tokio::test]
async fn summarize_posts_summary_and_returns_it() {
    let generator = Arc::new(FakeGenerator {
        reply: Some("File taxes before anything else.".to_string()),
        ..Default::default()
    });
    let notifier = Arc::new(RecordingNotifier::default());
    let store = MemoryStore::with_rows([seeded("File taxes", 0, false), seeded("Old chore", 1, true)]);
    let app = app_with(store, generator.clone(), notifier.clone());

    let resp = app.oneshot(empty_request("POST", "/summarize")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["summary"], "File taxes before anything else.");

    let prompts = generator.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("- File taxes (Priority: N/A, Due: N/A)"));
    assert!(!prompts[0].contains("Old chore"));

    assert_eq!(
        *notifier.messages.lock().unwrap(),
        ["📝 Todo Summary:\nFile taxes before anything else."]
    );
}

#[tokio::test]
async fn summarize_empty_list_falls_back_and_still_notifies() {
    let notifier = Arc::new(RecordingNotifier::default());
    let app = app_with(
        MemoryStore::new(),
        Arc::new(FakeGenerator::default()),
        notifier.clone(),
    );

    let resp = app.oneshot(empty_request("POST", "/summarize")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["summary"], NO_SUMMARY);
    assert_eq!(
        *notifier.messages.lock().unwrap(),
        [format!("📝 Todo Summary:\n{NO_SUMMARY}")]
    );
}

#[tokio::test]
async fn summarize_generation_failure_returns_500_without_notifying() {
    let notifier = Arc::new(RecordingNotifier::default());
    let app = app_with(
        MemoryStore::new(),
        Arc::new(FakeGenerator {
            fail: true,
            ..Default::default()
        }),
        notifier.clone(),
    );

    let resp = app.oneshot(empty_request("POST", "/summarize")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.error, "Resource has been exhausted");
    assert!(notifier.messages.lock().unwrap().is_empty());
}

#[tokio::test]
async fn summarize_webhook_failure_returns_500() {
    let app = app_with(
        MemoryStore::new(),
        Arc::new(FakeGenerator {
            reply: Some("ok".to_string()),
            ..Default::default()
        }),
        Arc::new(RecordingNotifier {
            fail: true,
            ..Default::default()
        }),
    );

    let resp = app.oneshot(empty_request("POST", "/summarize")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.error, "no_service");
}

#[tokio::test]
async fn summarize_unconfigured_generator_returns_500() {
    let app = app(AppState::new(
        Arc::new(MemoryStore::new()),
        Arc::new(Unconfigured("generation service")),
        Arc::new(Unconfigured("notification webhook")),
    ));

    let resp = app.oneshot(empty_request("POST", "/api/summarize")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.error, "generation service is not configured");
}
