use rss::{ChannelBuilder, GuidBuilder, Item, ItemBuilder};
use thiserror::Error;
use url::Url;

use crate::store::{AccountStore, StoredAccount, StoredStatus};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

#[derive(Debug, Error)]
pub enum FeedError {
	#[error("owner and account identifiers must be non-empty")]
	InvalidParams,
	#[error("no such account")]
	NotFound,
	#[error(transparent)]
	Store(#[from] anyhow::Error),
}

/// Builds the RSS 2.0 document for `(owner, account)`.
///
/// Both identifiers are trimmed first; empty input fails before the store is
/// consulted. Store failures propagate fail-fast, with no retry. On any error
/// no partial XML is produced.
pub async fn generate(
	store: &dyn AccountStore,
	owner: &str,
	account: &str,
	public_url: Option<&Url>,
) -> Result<String, FeedError> {
	let owner = owner.trim();
	let account = account.trim();
	if owner.is_empty() || account.is_empty() {
		return Err(FeedError::InvalidParams);
	}

	let Some(record) = store.account(owner, account).await? else {
		return Err(FeedError::NotFound);
	};
	let statuses = store.statuses(record.id).await?;

	Ok(render(&record, &statuses, public_url))
}

fn render(account: &StoredAccount, statuses: &[StoredStatus], public_url: Option<&Url>) -> String {
	let link = channel_link(account, public_url);
	let items: Vec<Item> = statuses
		.iter()
		.map(|status| item(status, &link))
		.collect();

	let channel = ChannelBuilder::default()
		.title(account.title.clone())
		.link(link)
		.description(account.description.clone())
		.items(items)
		.build();

	// The writer escapes text content; the declaration is not part of
	// `Channel`'s own serialisation.
	format!("{XML_DECLARATION}{channel}")
}

fn item(status: &StoredStatus, channel_link: &str) -> Item {
	ItemBuilder::default()
		.title(status.title.clone())
		.description(status.body.clone())
		.link(status.link.clone().unwrap_or_else(|| channel_link.to_string()))
		.pub_date(status.published_at.to_rfc2822())
		.guid(
			GuidBuilder::default()
				.value(status.id.to_string())
				.permalink(false)
				.build(),
		)
		.build()
}

fn channel_link(account: &StoredAccount, public_url: Option<&Url>) -> String {
	let path = format!("feeds/{}/{}", account.owner, account.name);

	match public_url {
		Some(base) => base
			.join(&path)
			.map_or_else(|_| format!("/{path}"), |url| url.to_string()),
		None => format!("/{path}"),
	}
}

/// Parses a generated document back into a channel. Test aid.
#[cfg(test)]
pub(crate) fn parse(xml: &str) -> anyhow::Result<rss::Channel> {
	Ok(rss::Channel::read_from(xml.as_bytes())?)
}
