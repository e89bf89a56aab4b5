mod account;
mod feed;
mod user;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::app::RequestContext;
use crate::routing::{Handler, Method, PathParams, Router};

static APPLICATION_RSS_XML: HeaderValue = HeaderValue::from_static("application/rss+xml");

/// A finished RSS document served with the feed content type.
struct Rss(String);

impl IntoResponse for Rss {
	fn into_response(self) -> Response {
		(
			[(header::CONTENT_TYPE, &APPLICATION_RSS_XML)],
			self.0,
		)
			.into_response()
	}
}

/// Logs the underlying error and answers with a generic body. Raw errors never
/// reach the client.
fn internal_error(err: &anyhow::Error) -> Response {
	tracing::error!("request failed: {err:#}");

	(StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
}

fn bad_request(message: impl Into<String>) -> Response {
	(StatusCode::BAD_REQUEST, message.into()).into_response()
}

fn not_found() -> Response {
	(StatusCode::NOT_FOUND, "Not Found").into_response()
}

/// Builds the route table. Registration order matters: the table matches
/// first-registered-wins, so earlier placeholder routes shadow later literal
/// ones.
pub fn table() -> anyhow::Result<Router> {
	let mut router = Router::new();

	router.register(Method::Get, "/", Arc::new(Index))?;
	router.register(
		Method::Get,
		"/feeds/{user}/{account}",
		Arc::new(feed::FeedHandler),
	)?;

	router.register(Method::Post, "/users", Arc::new(user::CreateUser))?;
	router.register(Method::Get, "/users/{user}", Arc::new(user::ShowUser))?;

	router.register(Method::Get, "/accounts/{user}", Arc::new(account::ListAccounts))?;
	router.register(Method::Post, "/accounts/{user}", Arc::new(account::CreateAccount))?;
	router.register(
		Method::Post,
		"/accounts/{user}/{account}/delete",
		Arc::new(account::DeleteAccount),
	)?;
	router.register(
		Method::Post,
		"/accounts/{user}/{account}/statuses",
		Arc::new(account::CreateStatus),
	)?;

	Ok(router)
}

struct Index;

#[async_trait]
impl Handler for Index {
	async fn handle(&self, ctx: &RequestContext, _params: PathParams) -> Response {
		ctx.config.site_title.clone().into_response()
	}
}
