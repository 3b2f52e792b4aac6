use std::collections::HashSet;

use tracing::debug;

use crate::api::{MastodonClient, Result, account_statuses_path};
use crate::transport::{Request, Transport};

/// Status ids that must survive the purge regardless of age
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtectedSet {
    ids: HashSet<u64>,
}

impl ProtectedSet {
    pub fn from_ids(ids: impl IntoIterator<Item = u64>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn contains(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Fetch the account's pinned statuses in a single request.
///
/// Mastodon returns all pinned statuses in one page, so this does not paginate.
pub async fn load_protected<T: Transport>(
    client: &MastodonClient<T>,
    account_id: u64,
) -> Result<ProtectedSet> {
    let request = Request::get(account_statuses_path(account_id)).param("pinned", true);
    let listing = client.list_statuses(request).await?;

    let protected = ProtectedSet::from_ids(listing.statuses.iter().map(|status| status.id));
    debug!(account_id, pinned = protected.len(), "Loaded pinned statuses");
    Ok(protected)
}
