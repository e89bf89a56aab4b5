#[cfg(test)]
mod memory;
mod sqlite;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(test)]
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[derive(Debug, Clone, Serialize)]
pub struct StoredUser {
	pub id: Uuid,
	pub username: String,
	pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoredAccount {
	pub id: Uuid,
	/// Username of the owning user.
	pub owner: String,
	pub name: String,
	pub title: String,
	pub description: String,
	pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoredStatus {
	pub id: Uuid,
	pub account_id: Uuid,
	pub title: String,
	pub body: String,
	pub link: Option<String>,
	pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
	pub name: String,
	pub title: String,
	#[serde(default)]
	pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewStatus {
	pub title: String,
	#[serde(default)]
	pub body: String,
	#[serde(default)]
	pub link: Option<String>,
}

/// Persistence collaborator for users, accounts and their status streams.
///
/// The routing/feed core treats this as an opaque provider: one synchronous
/// round-trip per call, failures propagate immediately, no retries.
#[async_trait]
pub trait AccountStore: Send + Sync {
	async fn user(&self, username: &str) -> anyhow::Result<Option<StoredUser>>;
	async fn create_user(&self, username: &str) -> anyhow::Result<StoredUser>;

	async fn accounts(&self, owner: &str) -> anyhow::Result<Vec<StoredAccount>>;
	async fn account(&self, owner: &str, name: &str) -> anyhow::Result<Option<StoredAccount>>;
	async fn create_account(&self, owner: &str, new: NewAccount) -> anyhow::Result<StoredAccount>;
	/// Returns whether an account was actually deleted.
	async fn delete_account(&self, owner: &str, name: &str) -> anyhow::Result<bool>;

	/// Statuses for one account, newest first.
	async fn statuses(&self, account: Uuid) -> anyhow::Result<Vec<StoredStatus>>;
	async fn create_status(&self, account: Uuid, new: NewStatus) -> anyhow::Result<StoredStatus>;
}
