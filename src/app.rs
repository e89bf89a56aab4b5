use std::str::FromStr;
use std::{ops::Deref, sync::Arc};

use axum::Router as HttpRouter;
use axum::body::Bytes;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::route;
use crate::routing::{Method, Outcome, Router};
use crate::store::{AccountStore, SqliteStore};

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Request-scoped context handed to route handlers: the collaborators plus the
/// buffered request body. Handlers see nothing process-global.
pub struct RequestContext {
	pub store: Arc<dyn AccountStore>,
	pub config: Arc<AppConfig>,
	pub body: Bytes,
}

pub struct AppStateInner {
	pub routes: Router,
	pub store: Arc<dyn AccountStore>,
	pub config: Arc<AppConfig>,
}

#[derive(Clone)]
pub struct AppState(Arc<AppStateInner>);

impl Deref for AppState {
	type Target = AppStateInner;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

pub async fn app(config: AppConfig) -> anyhow::Result<HttpRouter> {
	let pool = SqlitePoolOptions::new()
		.connect_with(
			SqliteConnectOptions::new()
				.filename(&config.database_file)
				.journal_mode(SqliteJournalMode::Wal)
				.foreign_keys(true)
				.create_if_missing(true),
		)
		.await?;
	sqlx::migrate!().run(&pool).await?;

	app_with_store(config, Arc::new(SqliteStore::new(pool)))
}

/// Wires the route table and the dispatch entrypoint around a store. Split out
/// so tests can substitute an in-memory store.
pub fn app_with_store(
	config: AppConfig,
	store: Arc<dyn AccountStore>,
) -> anyhow::Result<HttpRouter> {
	let state = AppState(Arc::new(AppStateInner {
		routes: route::table()?,
		store,
		config: Arc::new(config),
	}));

	Ok(HttpRouter::new()
		.fallback(dispatch)
		.layer(TraceLayer::new_for_http())
		.with_state(state))
}

/// HTTP entrypoint: hands (method, path) to the route table and writes the
/// outcome. Everything the table does not claim becomes a plain-text 404,
/// including methods the table never registers.
async fn dispatch(State(state): State<AppState>, req: Request) -> Response {
	let Ok(method) = Method::from_str(req.method().as_str()) else {
		return not_found();
	};
	let path = req.uri().path().to_string();

	let body = match axum::body::to_bytes(req.into_body(), MAX_BODY_BYTES).await {
		Ok(body) => body,
		Err(_) => {
			return (StatusCode::PAYLOAD_TOO_LARGE, "request body too large").into_response();
		}
	};

	let ctx = RequestContext {
		store: Arc::clone(&state.store),
		config: Arc::clone(&state.config),
		body,
	};

	match state.routes.dispatch(method, &path, &ctx).await {
		Outcome::Handled(response) => response,
		Outcome::NotFound => not_found(),
	}
}

fn not_found() -> Response {
	(StatusCode::NOT_FOUND, "Not Found").into_response()
}
