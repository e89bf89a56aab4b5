use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::{Rss, internal_error};
use crate::app::RequestContext;
use crate::feed::{self, FeedError};
use crate::routing::{Handler, PathParams};

/// `GET /feeds/{user}/{account}` — the account's content stream as RSS.
pub struct FeedHandler;

#[async_trait]
impl Handler for FeedHandler {
	#[tracing::instrument(name = "feed", skip(self, ctx))]
	async fn handle(&self, ctx: &RequestContext, params: PathParams) -> Response {
		let owner = params.get("user").unwrap_or_default();
		let account = params.get("account").unwrap_or_default();

		match feed::generate(
			ctx.store.as_ref(),
			owner,
			account,
			ctx.config.public_url.as_ref(),
		)
		.await
		{
			Ok(xml) => Rss(xml).into_response(),
			Err(err @ FeedError::InvalidParams) => {
				tracing::error!("feed rejected: {err}");
				(StatusCode::BAD_REQUEST, err.to_string()).into_response()
			}
			Err(err @ FeedError::NotFound) => {
				tracing::error!("feed rejected: {err}");
				(StatusCode::NOT_FOUND, String::from("Not Found")).into_response()
			}
			Err(FeedError::Store(err)) => internal_error(&err),
		}
	}
}
