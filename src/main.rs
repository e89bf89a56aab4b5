#![warn(clippy::pedantic)]

use std::net::SocketAddr;

use crate::{app::app, config::AppConfig};

mod app;
mod config;
mod feed;
mod route;
mod routing;
mod store;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	tracing_subscriber::fmt::init();

	let config = AppConfig::load()?;
	let addr = SocketAddr::new(config.address, config.port);

	let listener = tokio::net::TcpListener::bind(addr).await?;
	tracing::info!("Listening on {addr}");
	axum::serve(listener, app(config).await?).await?;

	Ok(())
}
