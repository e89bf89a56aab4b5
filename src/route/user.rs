use async_trait::async_trait;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use super::{bad_request, internal_error, not_found};
use crate::app::RequestContext;
use crate::routing::{Handler, PathParams};

#[derive(Deserialize)]
struct NewUser {
	username: String,
}

/// `POST /users` — create a user from a JSON body.
pub struct CreateUser;

#[async_trait]
impl Handler for CreateUser {
	async fn handle(&self, ctx: &RequestContext, _params: PathParams) -> Response {
		let new: NewUser = match serde_json::from_slice(&ctx.body) {
			Ok(new) => new,
			Err(err) => return bad_request(format!("invalid body: {err}")),
		};
		let username = new.username.trim();
		if username.is_empty() {
			return bad_request("username must be non-empty");
		}

		match ctx.store.user(username).await {
			Ok(Some(_)) => (StatusCode::CONFLICT, "user already exists").into_response(),
			Ok(None) => match ctx.store.create_user(username).await {
				Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
				Err(err) => internal_error(&err),
			},
			Err(err) => internal_error(&err),
		}
	}
}

/// `GET /users/{user}` — the user record as JSON.
pub struct ShowUser;

#[async_trait]
impl Handler for ShowUser {
	async fn handle(&self, ctx: &RequestContext, params: PathParams) -> Response {
		let username = params.get("user").unwrap_or_default().trim();

		match ctx.store.user(username).await {
			Ok(Some(user)) => Json(user).into_response(),
			Ok(None) => not_found(),
			Err(err) => internal_error(&err),
		}
	}
}
