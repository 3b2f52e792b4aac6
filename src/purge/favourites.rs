use tracing::{debug, info, warn};

use super::report::PurgeReport;
use super::retention::RetentionPolicy;
use super::{PurgeError, PurgeOptions};
use crate::api::{FAVOURITES_PATH, MastodonClient, Status};
use crate::pagination::{CursorStrategy, PageWalker};
use crate::transport::Transport;

/// Un-favourites statuses older than the cutoff.
///
/// The whole favourites timeline is collected before anything is touched, so
/// the walk never sees its own mutations.
pub struct FavouritePurger<'c, T> {
    client: &'c MastodonClient<T>,
    options: &'c PurgeOptions,
    policy: RetentionPolicy,
}

impl<'c, T: Transport> FavouritePurger<'c, T> {
    pub fn new(client: &'c MastodonClient<T>, options: &'c PurgeOptions) -> Self {
        Self {
            client,
            options,
            policy: RetentionPolicy::new(options.cutoff),
        }
    }

    pub async fn run(&self) -> Result<PurgeReport, PurgeError> {
        let mut report = PurgeReport::default();
        let candidates = self.collect(&mut report).await?;
        info!(count = candidates.len(), "Collected favourites older than the cutoff");

        for status in &candidates {
            self.unfavourite(status, &mut report).await;
        }

        Ok(report)
    }

    async fn collect(&self, report: &mut PurgeReport) -> Result<Vec<Status>, PurgeError> {
        let mut walker = PageWalker::new(self.client, FAVOURITES_PATH, CursorStrategy::LinkHeader)
            .limit(self.options.page_limit);
        let mut candidates = Vec::new();

        while let Some(page) = walker.next_page().await? {
            debug!(page = page.number, count = page.statuses.len(), "Fetched favourites");
            report.pages += 1;
            report.examined += page.statuses.len();

            for status in page.statuses {
                if self.policy.is_expired(&status) {
                    candidates.push(status);
                } else {
                    report.retained += 1;
                }
            }
        }

        Ok(candidates)
    }

    async fn unfavourite(&self, status: &Status, report: &mut PurgeReport) {
        let author = status.account.acct.as_str();
        if self.options.dry_run {
            info!(status_id = status.id, author, created_at = %status.created_at, "[dry run] Would remove favourite");
            report.planned.push(status.id);
            return;
        }

        match self.client.unfavourite(status.id).await {
            Ok(()) => {
                debug!(status_id = status.id, author, "Removed favourite");
                self.client.stats().favourite_removed();
                report.removed += 1;
            }
            Err(e) => {
                warn!(status_id = status.id, error = %e, "Could not remove favourite");
                self.client.stats().item_failed();
                report.failed.push(status.id);
            }
        }
    }
}
