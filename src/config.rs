use std::net::IpAddr;

use confique::Config;
use url::Url;

#[derive(Config)]
pub struct AppConfig {
	#[config(env = "PORT", default = 3434)]
	pub port: u16,

	#[config(env = "LISTEN_ADDRESS", default = "::")]
	pub address: IpAddr,

	#[config(env = "DATABASE_FILE", default = "socialrss.db")]
	pub database_file: String,

	/// Base URL used for channel and item links in generated feeds. Links fall
	/// back to absolute paths when unset.
	#[config(env = "PUBLIC_URL")]
	pub public_url: Option<Url>,

	#[config(env = "SITE_TITLE", default = "SocialRSS")]
	pub site_title: String,
}

impl AppConfig {
	pub fn load() -> anyhow::Result<AppConfig> {
		Ok(Config::builder().env().file("socialrss.toml").load()?)
	}

	#[cfg(test)]
	pub(crate) fn for_tests() -> AppConfig {
		AppConfig {
			port: 0,
			address: "::1".parse().unwrap(),
			database_file: String::new(),
			public_url: None,
			site_title: "SocialRSS".to_string(),
		}
	}
}
