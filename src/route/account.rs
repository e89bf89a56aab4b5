use async_trait::async_trait;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::{bad_request, internal_error, not_found};
use crate::app::RequestContext;
use crate::routing::{Handler, PathParams};
use crate::store::{NewAccount, NewStatus};

/// `GET /accounts/{user}` — all of a user's accounts as JSON.
pub struct ListAccounts;

#[async_trait]
impl Handler for ListAccounts {
	async fn handle(&self, ctx: &RequestContext, params: PathParams) -> Response {
		let owner = params.get("user").unwrap_or_default().trim();

		match ctx.store.user(owner).await {
			Ok(Some(_)) => match ctx.store.accounts(owner).await {
				Ok(accounts) => Json(accounts).into_response(),
				Err(err) => internal_error(&err),
			},
			Ok(None) => not_found(),
			Err(err) => internal_error(&err),
		}
	}
}

/// `POST /accounts/{user}` — create an account from a JSON body.
pub struct CreateAccount;

#[async_trait]
impl Handler for CreateAccount {
	async fn handle(&self, ctx: &RequestContext, params: PathParams) -> Response {
		let owner = params.get("user").unwrap_or_default().trim();

		let mut new: NewAccount = match serde_json::from_slice(&ctx.body) {
			Ok(new) => new,
			Err(err) => return bad_request(format!("invalid body: {err}")),
		};
		new.name = new.name.trim().to_string();
		if new.name.is_empty() || new.name.contains('/') {
			return bad_request("account name must be non-empty and must not contain `/`");
		}

		match ctx.store.user(owner).await {
			Ok(Some(_)) => {}
			Ok(None) => return not_found(),
			Err(err) => return internal_error(&err),
		}

		match ctx.store.account(owner, &new.name).await {
			Ok(Some(_)) => (StatusCode::CONFLICT, "account already exists").into_response(),
			Ok(None) => match ctx.store.create_account(owner, new).await {
				Ok(account) => (StatusCode::CREATED, Json(account)).into_response(),
				Err(err) => internal_error(&err),
			},
			Err(err) => internal_error(&err),
		}
	}
}

/// `POST /accounts/{user}/{account}/delete` — remove an account and its
/// statuses. POST rather than DELETE: the route table only knows GET and POST.
pub struct DeleteAccount;

#[async_trait]
impl Handler for DeleteAccount {
	async fn handle(&self, ctx: &RequestContext, params: PathParams) -> Response {
		let owner = params.get("user").unwrap_or_default().trim();
		let name = params.get("account").unwrap_or_default().trim();

		match ctx.store.delete_account(owner, name).await {
			Ok(true) => StatusCode::NO_CONTENT.into_response(),
			Ok(false) => not_found(),
			Err(err) => internal_error(&err),
		}
	}
}

/// `POST /accounts/{user}/{account}/statuses` — append a status to an account.
pub struct CreateStatus;

#[async_trait]
impl Handler for CreateStatus {
	async fn handle(&self, ctx: &RequestContext, params: PathParams) -> Response {
		let owner = params.get("user").unwrap_or_default().trim();
		let name = params.get("account").unwrap_or_default().trim();

		let new: NewStatus = match serde_json::from_slice(&ctx.body) {
			Ok(new) => new,
			Err(err) => return bad_request(format!("invalid body: {err}")),
		};
		if new.title.trim().is_empty() {
			return bad_request("status title must be non-empty");
		}

		let account = match ctx.store.account(owner, name).await {
			Ok(Some(account)) => account,
			Ok(None) => return not_found(),
			Err(err) => return internal_error(&err),
		};

		match ctx.store.create_status(account.id, new).await {
			Ok(status) => (StatusCode::CREATED, Json(status)).into_response(),
			Err(err) => internal_error(&err),
		}
	}
}
