mod pattern;

use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use strum::{Display, EnumString};

use crate::app::RequestContext;

pub use pattern::{PathParams, Pattern};

/// Request methods the route table knows about. Anything else never matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive, serialize_all = "UPPERCASE")]
pub enum Method {
	Get,
	Post,
}

/// A route target. Handlers receive the request-scoped context and the
/// captured path parameters; they never reach for process-global state.
#[async_trait]
pub trait Handler: Send + Sync {
	async fn handle(&self, ctx: &RequestContext, params: PathParams) -> Response;
}

struct Route {
	method: Method,
	pattern: Pattern,
	handler: Arc<dyn Handler>,
}

/// Result of a dispatch. `NotFound` leaves the 404 to the caller; `dispatch`
/// itself never writes a response.
pub enum Outcome {
	Handled(Response),
	NotFound,
}

/// Ordered route table, immutable after startup.
///
/// Matching is first-registered-wins with no specificity scoring: a
/// `/accounts/{id}` route registered before `/accounts/special` shadows the
/// literal one. Deliberate simplification, kept as documented behaviour.
#[derive(Default)]
pub struct Router {
	routes: Vec<Route>,
}

impl Router {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a route. The pattern is compiled here, once; `dispatch` only
	/// runs precompiled matchers.
	pub fn register(
		&mut self,
		method: Method,
		pattern: &str,
		handler: Arc<dyn Handler>,
	) -> anyhow::Result<()> {
		let pattern = Pattern::compile(pattern)?;
		self.routes.push(Route {
			method,
			pattern,
			handler,
		});

		Ok(())
	}

	/// Resolves `path` against the table and invokes the first matching
	/// handler. Stateless across calls.
	pub async fn dispatch(&self, method: Method, path: &str, ctx: &RequestContext) -> Outcome {
		for route in self.routes.iter().filter(|r| r.method == method) {
			if let Some(params) = route.pattern.matches(path) {
				tracing::debug!("{method} {path} -> {}", route.pattern.raw());
				return Outcome::Handled(route.handler.handle(ctx, params).await);
			}
		}

		Outcome::NotFound
	}
}
