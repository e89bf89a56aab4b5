use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::bail;
use async_trait::async_trait;
use chrono::Utc;
use uuid::{NoContext, Timestamp, Uuid};

use super::{AccountStore, NewAccount, NewStatus, StoredAccount, StoredStatus, StoredUser};

#[derive(Default)]
struct Tables {
	users: Vec<StoredUser>,
	accounts: Vec<StoredAccount>,
	statuses: Vec<StoredStatus>,
}

/// In-process store used by tests and fixtures. Counts account lookups so
/// callers can assert that a code path never reached the store.
#[derive(Default)]
pub struct MemoryStore {
	tables: Mutex<Tables>,
	lookups: AtomicUsize,
}

impl MemoryStore {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of `account` lookups performed so far.
	pub fn lookups(&self) -> usize {
		self.lookups.load(Ordering::SeqCst)
	}
}

fn new_id() -> Uuid {
	Uuid::new_v7(Timestamp::now(NoContext))
}

#[async_trait]
impl AccountStore for MemoryStore {
	async fn user(&self, username: &str) -> anyhow::Result<Option<StoredUser>> {
		let tables = self.tables.lock().unwrap();

		Ok(tables.users.iter().find(|u| u.username == username).cloned())
	}

	async fn create_user(&self, username: &str) -> anyhow::Result<StoredUser> {
		let mut tables = self.tables.lock().unwrap();
		if tables.users.iter().any(|u| u.username == username) {
			bail!("user `{username}` already exists");
		}

		let user = StoredUser {
			id: new_id(),
			username: username.to_string(),
			created_at: Utc::now(),
		};
		tables.users.push(user.clone());

		Ok(user)
	}

	async fn accounts(&self, owner: &str) -> anyhow::Result<Vec<StoredAccount>> {
		let tables = self.tables.lock().unwrap();

		Ok(tables
			.accounts
			.iter()
			.filter(|a| a.owner == owner)
			.cloned()
			.collect())
	}

	async fn account(&self, owner: &str, name: &str) -> anyhow::Result<Option<StoredAccount>> {
		self.lookups.fetch_add(1, Ordering::SeqCst);
		let tables = self.tables.lock().unwrap();

		Ok(tables
			.accounts
			.iter()
			.find(|a| a.owner == owner && a.name == name)
			.cloned())
	}

	async fn create_account(&self, owner: &str, new: NewAccount) -> anyhow::Result<StoredAccount> {
		let mut tables = self.tables.lock().unwrap();
		if !tables.users.iter().any(|u| u.username == owner) {
			bail!("no such user `{owner}`");
		}
		if tables
			.accounts
			.iter()
			.any(|a| a.owner == owner && a.name == new.name)
		{
			bail!("account `{}` already exists for `{owner}`", new.name);
		}

		let account = StoredAccount {
			id: new_id(),
			owner: owner.to_string(),
			name: new.name,
			title: new.title,
			description: new.description,
			created_at: Utc::now(),
		};
		tables.accounts.push(account.clone());

		Ok(account)
	}

	async fn delete_account(&self, owner: &str, name: &str) -> anyhow::Result<bool> {
		let mut tables = self.tables.lock().unwrap();
		let Some(index) = tables
			.accounts
			.iter()
			.position(|a| a.owner == owner && a.name == name)
		else {
			return Ok(false);
		};

		let account = tables.accounts.remove(index);
		tables.statuses.retain(|s| s.account_id != account.id);

		Ok(true)
	}

	async fn statuses(&self, account: Uuid) -> anyhow::Result<Vec<StoredStatus>> {
		let tables = self.tables.lock().unwrap();
		let mut statuses: Vec<_> = tables
			.statuses
			.iter()
			.filter(|s| s.account_id == account)
			.cloned()
			.collect();
		statuses.sort_by(|a, b| b.published_at.cmp(&a.published_at));

		Ok(statuses)
	}

	async fn create_status(&self, account: Uuid, new: NewStatus) -> anyhow::Result<StoredStatus> {
		let mut tables = self.tables.lock().unwrap();
		let status = StoredStatus {
			id: new_id(),
			account_id: account,
			title: new.title,
			body: new.body,
			link: new.link,
			published_at: Utc::now(),
		};
		tables.statuses.push(status.clone());

		Ok(status)
	}
}
