use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use uuid::{NoContext, Timestamp, Uuid};

use super::{AccountStore, NewAccount, NewStatus, StoredAccount, StoredStatus, StoredUser};

/// sqlx-backed store. Ids are UUIDv7 blobs, timestamps RFC 3339 text.
pub struct SqliteStore {
	pool: SqlitePool,
}

impl SqliteStore {
	#[must_use]
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}
}

fn new_id() -> Uuid {
	Uuid::new_v7(Timestamp::now(NoContext))
}

fn user_from_row(row: &SqliteRow) -> anyhow::Result<StoredUser> {
	Ok(StoredUser {
		id: Uuid::from_slice(row.get("id"))?,
		username: row.get("username"),
		created_at: row.get("created_at"),
	})
}

fn account_from_row(row: &SqliteRow) -> anyhow::Result<StoredAccount> {
	Ok(StoredAccount {
		id: Uuid::from_slice(row.get("id"))?,
		owner: row.get("owner"),
		name: row.get("name"),
		title: row.get("title"),
		description: row.get("description"),
		created_at: row.get("created_at"),
	})
}

fn status_from_row(row: &SqliteRow) -> anyhow::Result<StoredStatus> {
	Ok(StoredStatus {
		id: Uuid::from_slice(row.get("id"))?,
		account_id: Uuid::from_slice(row.get("account_id"))?,
		title: row.get("title"),
		body: row.get("body"),
		link: row.get("link"),
		published_at: row.get("published_at"),
	})
}

const ACCOUNT_COLUMNS: &str = "a.id, u.username AS owner, a.name, a.title, a.description, \
                               a.created_at";

#[async_trait]
impl AccountStore for SqliteStore {
	async fn user(&self, username: &str) -> anyhow::Result<Option<StoredUser>> {
		let row = sqlx::query("SELECT id, username, created_at FROM users WHERE username = ?")
			.bind(username)
			.fetch_optional(&self.pool)
			.await?;

		row.as_ref().map(user_from_row).transpose()
	}

	async fn create_user(&self, username: &str) -> anyhow::Result<StoredUser> {
		let user = StoredUser {
			id: new_id(),
			username: username.to_string(),
			created_at: Utc::now(),
		};

		sqlx::query("INSERT INTO users (id, username, created_at) VALUES (?, ?, ?)")
			.bind(user.id.as_bytes().as_slice())
			.bind(&user.username)
			.bind(user.created_at)
			.execute(&self.pool)
			.await?;

		Ok(user)
	}

	async fn accounts(&self, owner: &str) -> anyhow::Result<Vec<StoredAccount>> {
		let rows = sqlx::query(&format!(
			"SELECT {ACCOUNT_COLUMNS} FROM accounts a \
			 JOIN users u ON u.id = a.user_id \
			 WHERE u.username = ? ORDER BY a.created_at"
		))
		.bind(owner)
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(account_from_row).collect()
	}

	async fn account(&self, owner: &str, name: &str) -> anyhow::Result<Option<StoredAccount>> {
		let row = sqlx::query(&format!(
			"SELECT {ACCOUNT_COLUMNS} FROM accounts a \
			 JOIN users u ON u.id = a.user_id \
			 WHERE u.username = ? AND a.name = ?"
		))
		.bind(owner)
		.bind(name)
		.fetch_optional(&self.pool)
		.await?;

		row.as_ref().map(account_from_row).transpose()
	}

	async fn create_account(&self, owner: &str, new: NewAccount) -> anyhow::Result<StoredAccount> {
		let user_row = sqlx::query("SELECT id FROM users WHERE username = ?")
			.bind(owner)
			.fetch_one(&self.pool)
			.await?;
		let user_id = Uuid::from_slice(user_row.get("id"))?;

		let account = StoredAccount {
			id: new_id(),
			owner: owner.to_string(),
			name: new.name,
			title: new.title,
			description: new.description,
			created_at: Utc::now(),
		};

		sqlx::query(
			"INSERT INTO accounts (id, user_id, name, title, description, created_at) \
			 VALUES (?, ?, ?, ?, ?, ?)",
		)
		.bind(account.id.as_bytes().as_slice())
		.bind(user_id.as_bytes().as_slice())
		.bind(&account.name)
		.bind(&account.title)
		.bind(&account.description)
		.bind(account.created_at)
		.execute(&self.pool)
		.await?;

		Ok(account)
	}

	async fn delete_account(&self, owner: &str, name: &str) -> anyhow::Result<bool> {
		let result = sqlx::query(
			"DELETE FROM accounts WHERE name = ? \
			 AND user_id = (SELECT id FROM users WHERE username = ?)",
		)
		.bind(name)
		.bind(owner)
		.execute(&self.pool)
		.await?;

		Ok(result.rows_affected() > 0)
	}

	async fn statuses(&self, account: Uuid) -> anyhow::Result<Vec<StoredStatus>> {
		let rows = sqlx::query(
			"SELECT id, account_id, title, body, link, published_at FROM statuses \
			 WHERE account_id = ? ORDER BY published_at DESC",
		)
		.bind(account.as_bytes().as_slice())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(status_from_row).collect()
	}

	async fn create_status(&self, account: Uuid, new: NewStatus) -> anyhow::Result<StoredStatus> {
		let status = StoredStatus {
			id: new_id(),
			account_id: account,
			title: new.title,
			body: new.body,
			link: new.link,
			published_at: Utc::now(),
		};

		sqlx::query(
			"INSERT INTO statuses (id, account_id, title, body, link, published_at) \
			 VALUES (?, ?, ?, ?, ?, ?)",
		)
		.bind(status.id.as_bytes().as_slice())
		.bind(status.account_id.as_bytes().as_slice())
		.bind(&status.title)
		.bind(&status.body)
		.bind(&status.link)
		.bind(status.published_at)
		.execute(&self.pool)
		.await?;

		Ok(status)
	}
}

#[cfg(test)]
mod tests {
	use sqlx::sqlite::SqlitePoolOptions;

	use super::*;

	async fn store() -> SqliteStore {
		let pool = SqlitePoolOptions::new()
			.max_connections(1)
			.connect("sqlite::memory:")
			.await
			.unwrap();
		sqlx::migrate!().run(&pool).await.unwrap();

		SqliteStore::new(pool)
	}

	#[tokio::test]
	async fn user_account_status_round_trip() {
		let store = store().await;

		let user = store.create_user("alice").await.unwrap();
		assert_eq!(store.user("alice").await.unwrap().unwrap().id, user.id);
		assert!(store.user("bob").await.unwrap().is_none());

		let account = store
			.create_account(
				"alice",
				NewAccount {
					name: "daily".to_string(),
					title: "Daily status".to_string(),
					description: "What alice is up to".to_string(),
				},
			)
			.await
			.unwrap();

		let found = store.account("alice", "daily").await.unwrap().unwrap();
		assert_eq!(found.id, account.id);
		assert_eq!(found.owner, "alice");
		assert_eq!(store.accounts("alice").await.unwrap().len(), 1);

		let status = store
			.create_status(
				account.id,
				NewStatus {
					title: "hello".to_string(),
					body: "first".to_string(),
					link: None,
				},
			)
			.await
			.unwrap();

		let statuses = store.statuses(account.id).await.unwrap();
		assert_eq!(statuses.len(), 1);
		assert_eq!(statuses[0].id, status.id);

		assert!(store.delete_account("alice", "daily").await.unwrap());
		assert!(!store.delete_account("alice", "daily").await.unwrap());
		assert!(store.account("alice", "daily").await.unwrap().is_none());
	}
}
