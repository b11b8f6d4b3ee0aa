//! HTTP backend for the todo summary assistant.
//!
//! # Overview
//! Serves todo CRUD over a hosted relational store and a `/summarize` action
//! that turns the pending todos into a paragraph via a text-generation API,
//! then posts it to a chat webhook.
//!
//! # Design
//! - Each request runs at most one sequential chain of upstream calls; there
//!   is no retry and no shared mutable state beyond the store itself.
//! - Upstreams sit behind traits (`TodoStore`, `TextGenerator`, `Notifier`)
//!   held in `AppState`, so tests swap in in-process fakes.
//! - Routes are served at the root and again under `/api`.

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod store;
pub mod summarize;
pub mod upstream;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use config::Config;
use store::{MemoryStore, RestStore, TodoStore};
use summarize::{GeminiClient, Notifier, SlackWebhook, TextGenerator, Unconfigured};

pub use error::AppError;
pub use model::{Priority, Todo};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
    pub generator: Arc<dyn TextGenerator>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn TodoStore>,
        generator: Arc<dyn TextGenerator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            generator,
            notifier,
        }
    }

    /// Wire the upstream clients the configuration names. Missing
    /// credentials fall back to the in-process store or to `Unconfigured`.
    pub fn from_config(config: &Config) -> Self {
        let store: Arc<dyn TodoStore> = match &config.store {
            Some(store) => Arc::new(RestStore::new(&store.url, &store.key)),
            None => Arc::new(MemoryStore::new()),
        };
        let generator: Arc<dyn TextGenerator> = match &config.generation.api_key {
            Some(key) => Arc::new(GeminiClient::new(
                &config.generation.api_url,
                &config.generation.model,
                key,
            )),
            None => Arc::new(Unconfigured("generation service")),
        };
        let notifier: Arc<dyn Notifier> = match &config.webhook_url {
            Some(url) => Arc::new(SlackWebhook::new(url)),
            None => Arc::new(Unconfigured("notification webhook")),
        };
        Self::new(store, generator, notifier)
    }
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/todos",
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route(
            "/todos/{id}",
            put(handlers::update_todo).delete(handlers::delete_todo),
        )
        .route("/summarize", post(handlers::summarize_todos))
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(api_routes())
        .nest("/api", api_routes())
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}
